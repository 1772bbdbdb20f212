// WDLオラクルとのインターフェース

pub mod process;
pub mod stub;

pub use process::{OracleConfig, PipeOracle};
pub use stub::ScriptedOracle;

use crate::constants::W;
use crate::domain::board::Board49;
use anyhow::Result;

/// 1回の照会に対するオラクルの応答
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct OracleReply {
    /// 終局局面か
    pub terminal: bool,
    /// 各列に着手した後のWDL値（親の手番視点）。満杯列はNone
    pub vals: [Option<i8>; W],
}

impl OracleReply {
    /// 合法手の最大WDL値（= 親局面の評価値）
    pub fn best_value(&self) -> Option<i8> {
        self.vals.iter().flatten().copied().max()
    }
}

/// 強解集合への照会窓口
///
/// 1インスタンスにつき同時照会は1件。ワーカーはそれぞれ自分の
/// インスタンスを所有する。
pub trait WdlOracle {
    fn query(&mut self, board: Board49, depth: usize) -> Result<OracleReply>;
}

/// コンパクト応答行のパース。適合しない行（診断など）はNone
///
/// 形式: `T v0 v1 v2 v3 v4 v5 v6`、T∈{0,1}、vi∈{-1,-0,0,1,.}
pub fn parse_compact_line(line: &str) -> Option<OracleReply> {
    let mut tokens = line.split_whitespace();
    let terminal = match tokens.next()? {
        "0" => false,
        "1" => true,
        _ => return None,
    };
    let mut vals = [None; W];
    for slot in vals.iter_mut() {
        *slot = match tokens.next()? {
            "." => None,
            "-1" => Some(-1),
            "0" | "-0" => Some(0),
            "1" => Some(1),
            _ => return None,
        };
    }
    if tokens.next().is_some() {
        return None;
    }
    Some(OracleReply { terminal, vals })
}
