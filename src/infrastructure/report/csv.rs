// 深さ別集計のCSV出力

use crate::domain::search::DepthRow;
use anyhow::Result;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

/// CSVヘッダ
pub const CSV_HEADER: &str = "Depth,SolutionArtifactCount,ProofCertificateCount,NodeCount";

/// 集計行を書き込むためのtrait
pub trait RowWriter {
    /// 1行を書き込む
    fn write_row(&mut self, row: &DepthRow) -> Result<()>;

    /// 書き込みを完了（フラッシュ）
    fn flush(&mut self) -> Result<()>;

    /// 書き込んだ行数
    fn count(&self) -> u64;
}

/// stdoutとファイルの両方に書くCSVライター
///
/// ファイル側はベストエフォート。書き込みに失敗しても集計は
/// 止めず、警告してstdoutだけで続行する。
pub struct CsvRowWriter {
    out: io::Stdout,
    file: Option<BufWriter<File>>,
    count: u64,
}

impl CsvRowWriter {
    pub fn create(path: Option<&Path>) -> Result<Self> {
        let file = match path {
            Some(p) => match File::create(p) {
                Ok(f) => Some(BufWriter::new(f)),
                Err(e) => {
                    log::warn!(
                        "CSVファイルを作成できません（stdoutのみで続行します）: {}: {}",
                        p.display(),
                        e
                    );
                    None
                }
            },
            None => None,
        };
        let mut writer = Self {
            out: io::stdout(),
            file,
            count: 0,
        };
        writer.write_line(CSV_HEADER);
        Ok(writer)
    }

    fn write_line(&mut self, line: &str) {
        if let Err(e) = writeln!(self.out, "{}", line) {
            log::warn!("stdoutへの書き込みに失敗しました: {}", e);
        }
        if let Some(mut f) = self.file.take() {
            match writeln!(f, "{}", line) {
                Ok(()) => self.file = Some(f),
                Err(e) => {
                    log::warn!("CSVファイルへの書き込みに失敗しました（以後stdoutのみ）: {}", e);
                }
            }
        }
    }
}

impl RowWriter for CsvRowWriter {
    fn write_row(&mut self, row: &DepthRow) -> Result<()> {
        let line = format!(
            "{},{},{},{}",
            row.depth,
            row.solution_count,
            row.proof_count,
            row.node_count()
        );
        self.write_line(&line);
        self.count += 1;
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        if let Err(e) = self.out.flush() {
            log::warn!("stdoutのフラッシュに失敗しました: {}", e);
        }
        if let Some(mut f) = self.file.take() {
            match f.flush() {
                Ok(()) => self.file = Some(f),
                Err(e) => log::warn!("CSVファイルのフラッシュに失敗しました: {}", e),
            }
        }
        Ok(())
    }

    fn count(&self) -> u64 {
        self.count
    }
}

impl Drop for CsvRowWriter {
    fn drop(&mut self) {
        let _ = RowWriter::flush(self);
    }
}

/// メモリ内ライター（テスト用）
#[derive(Default)]
pub struct MemoryRowWriter {
    rows: Vec<DepthRow>,
}

impl MemoryRowWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rows(&self) -> &[DepthRow] {
        &self.rows
    }
}

impl RowWriter for MemoryRowWriter {
    fn write_row(&mut self, row: &DepthRow) -> Result<()> {
        self.rows.push(*row);
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        Ok(())
    }

    fn count(&self) -> u64 {
        self.rows.len() as u64
    }
}
