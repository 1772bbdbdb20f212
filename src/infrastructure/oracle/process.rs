// パイプ接続のWDLオラクル実装

use super::{parse_compact_line, OracleReply, WdlOracle};
use crate::domain::board::{Board49, EMPTY_BOARD};
use anyhow::{anyhow, bail, Context, Result};
use std::io::{BufRead, BufReader, Write};
use std::path::PathBuf;
use std::process::{Child, ChildStdin, ChildStdout, Command, Stdio};

/// wdlサーバーの起動設定
#[derive(Clone, Debug)]
pub struct OracleConfig {
    /// サーバーの実行ファイル
    pub binary: PathBuf,
    /// 強解アーティファクトのディレクトリ
    pub solution_dir: PathBuf,
    /// メモリマップせず全読み込みする（-Xmmap）
    pub in_memory: bool,
}

/// サブプロセスのwdlサーバーと匿名パイプ2本で会話するクライアント
///
/// リクエストは `B <depth> <board49>` の1行。depthは参考値で、
/// サーバーは盤面から真の深さを導く。応答はコンパクト行1本で、
/// 適合しない行は診断として読み飛ばす。
pub struct PipeOracle {
    child: Child,
    stdin: ChildStdin,
    stdout: BufReader<ChildStdout>,
    line: String,
}

impl PipeOracle {
    /// サーバーを起動する
    pub fn start(config: &OracleConfig) -> Result<Self> {
        let mut cmd = Command::new(&config.binary);
        cmd.arg(&config.solution_dir).arg("--server").arg("--compact");
        if config.in_memory {
            cmd.arg("-Xmmap");
        }
        let mut child = cmd
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .spawn()
            .with_context(|| {
                format!("wdlサーバーを起動できません: {}", config.binary.display())
            })?;

        let stdin = child
            .stdin
            .take()
            .ok_or_else(|| anyhow!("wdlサーバーのstdinを取得できません"))?;
        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| anyhow!("wdlサーバーのstdoutを取得できません"))?;

        Ok(Self {
            child,
            stdin,
            stdout: BufReader::new(stdout),
            line: String::new(),
        })
    }

    /// 起動直後の初期化待ち。空盤面を1回照会して応答を捨てる
    pub fn warm_up(&mut self) -> Result<()> {
        self.query(EMPTY_BOARD, 0).map(|_| ())
    }
}

impl WdlOracle for PipeOracle {
    fn query(&mut self, board: Board49, depth: usize) -> Result<OracleReply> {
        writeln!(self.stdin, "B {} {}", depth, board)
            .context("wdlサーバーへの書き込みに失敗しました")?;

        loop {
            self.line.clear();
            let n = self
                .stdout
                .read_line(&mut self.line)
                .context("wdlサーバーからの読み取りに失敗しました")?;
            if n == 0 {
                bail!(
                    "wdlサーバーが予期せず終了しました（board49={} depth={}）",
                    board,
                    depth
                );
            }
            let line = self.line.trim_end();
            if let Some(reply) = parse_compact_line(line) {
                return Ok(reply);
            }
            // 診断行は読み飛ばす
            log::debug!("wdl診断行: {}", line);
        }
    }
}

impl Drop for PipeOracle {
    fn drop(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}
