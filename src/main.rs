// 証明木局面センサス CLI

use anyhow::{bail, Result};
use clap::Parser;
use std::path::PathBuf;

use proofcensus::application::census::{CensusEvent, CensusService};
use proofcensus::domain::search::{SearchConfig, TableCapacity, WorkerCount};
use proofcensus::infrastructure::oracle::OracleConfig;
use proofcensus::infrastructure::report::{CsvRowWriter, RowWriter};

/// 強解証明木に現れる7×6コネクトフォー局面を深さ別に数え上げる
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// wdlサーバーの実行ファイル
    #[arg(long, default_value = "./wdl.out")]
    oracle: PathBuf,

    /// 強解アーティファクトのディレクトリ
    #[arg(long, default_value = "solution_w7_h6")]
    solution_dir: PathBuf,

    /// メモリマップせず全読み込みする
    #[arg(long)]
    in_memory: bool,

    /// ハッシュ表のスロット数
    #[arg(long, default_value_t = TableCapacity::DEFAULT_SLOTS)]
    capacity: usize,

    /// ワーカースレッド数（既定は論理コア数）
    #[arg(long)]
    threads: Option<usize>,

    /// CSVの出力先（stdoutには常に出力する）
    #[arg(long, default_value = "output.csv")]
    output: PathBuf,
}

fn main() -> Result<()> {
    env_logger::init_from_env(
        env_logger::Env::default().filter_or(env_logger::DEFAULT_FILTER_ENV, "info"),
    );
    let args = Args::parse();

    let workers = match args.threads {
        Some(n) => WorkerCount::new(n)?,
        None => WorkerCount::from_cpus(),
    };
    let config = SearchConfig {
        capacity: TableCapacity::new(args.capacity)?,
        workers,
    };
    let oracle_config = OracleConfig {
        binary: args.oracle,
        solution_dir: args.solution_dir,
        in_memory: args.in_memory,
    };

    log::info!("wdlサーバーを起動します（{}本）", config.workers.get());
    let (rx, handle) = CensusService::start(config, oracle_config)?;
    log::info!("wdlサーバーの初期化が完了しました");

    let mut writer = CsvRowWriter::create(Some(&args.output))?;
    let mut failure: Option<String> = None;
    for event in rx.iter() {
        match event {
            CensusEvent::Log(message) => log::info!("{message}"),
            CensusEvent::Row(row) => writer.write_row(&row)?,
            CensusEvent::Finished(summary) => {
                log::info!(
                    "完了: {}行 / 総局面{} / 最大フロンティア{} / {:.1}秒",
                    summary.rows_emitted,
                    summary.total_nodes,
                    summary.peak_frontier,
                    summary.elapsed_secs
                );
                break;
            }
            CensusEvent::Error(message) => {
                failure = Some(message);
                break;
            }
        }
    }
    writer.flush()?;

    handle
        .join()
        .map_err(|_| anyhow::anyhow!("集計スレッドの終了待ちに失敗しました"))?;

    if let Some(message) = failure {
        bail!("集計が異常終了しました: {message}");
    }
    Ok(())
}
