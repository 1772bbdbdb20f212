// テスト用のスクリプトオラクル

use super::{OracleReply, WdlOracle};
use crate::constants::{U64Map, W};
use crate::domain::board::Board49;
use anyhow::{anyhow, Result};

/// 盤面キーごとに応答を台本化したオラクル（サブプロセス不要）
///
/// 台本にない盤面の照会は既定ではエラー。`terminal_by_default` を
/// 立てると終局応答を返し、先を打ち切った台本で全深さを回せる。
#[derive(Clone, Default)]
pub struct ScriptedOracle {
    replies: U64Map<OracleReply>,
    terminal_by_default: bool,
    queries: u64,
}

impl ScriptedOracle {
    pub fn new() -> Self {
        Self::default()
    }

    /// 台本にない盤面を終局扱いにする
    pub fn terminal_by_default(mut self) -> Self {
        self.terminal_by_default = true;
        self
    }

    /// 応答を登録する
    pub fn script(&mut self, board: Board49, reply: OracleReply) -> &mut Self {
        self.replies.insert(board, reply);
        self
    }

    /// 全列同値の非終局応答を登録する
    pub fn script_uniform(&mut self, board: Board49, wdl: i8) -> &mut Self {
        self.script(
            board,
            OracleReply {
                terminal: false,
                vals: [Some(wdl); W],
            },
        )
    }

    /// 終局応答を登録する
    pub fn script_terminal(&mut self, board: Board49) -> &mut Self {
        self.script(
            board,
            OracleReply {
                terminal: true,
                vals: [None; W],
            },
        )
    }

    /// これまでの照会回数
    pub fn query_count(&self) -> u64 {
        self.queries
    }
}

impl WdlOracle for ScriptedOracle {
    fn query(&mut self, board: Board49, _depth: usize) -> Result<OracleReply> {
        self.queries += 1;
        if let Some(reply) = self.replies.get(&board) {
            return Ok(*reply);
        }
        if self.terminal_by_default {
            return Ok(OracleReply {
                terminal: true,
                vals: [None; W],
            });
        }
        Err(anyhow!("台本にない盤面が照会されました: {}", board))
    }
}
