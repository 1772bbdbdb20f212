// 集計サービス（起動と配線）

use crate::application::census::engine::run_census;
use crate::application::census::event::CensusEvent;
use crate::domain::search::SearchConfig;
use crate::infrastructure::oracle::{OracleConfig, PipeOracle};
use anyhow::{Context, Result};
use crossbeam_channel::{unbounded, Receiver};
use std::thread::{self, JoinHandle};

/// 集計の起動を担うサービス
pub struct CensusService;

impl CensusService {
    /// オラクル群を起動して集計スレッドを開始する
    ///
    /// ワーカーごとに1本のwdlサーバーを立てる（パイプの混線を
    /// 避ける）。イベント受信側とjoin用ハンドルを返す
    pub fn start(
        config: SearchConfig,
        oracle_config: OracleConfig,
    ) -> Result<(Receiver<CensusEvent>, JoinHandle<()>)> {
        config.validate().context("集計設定が不正です")?;

        let workers = config.workers.get();
        let mut oracles = Vec::with_capacity(workers);
        for i in 0..workers {
            let mut oracle = PipeOracle::start(&oracle_config)
                .with_context(|| format!("{}本目のオラクル起動に失敗しました", i + 1))?;
            oracle
                .warm_up()
                .with_context(|| format!("{}本目のオラクル初期化に失敗しました", i + 1))?;
            oracles.push(oracle);
        }

        let (tx, rx) = unbounded::<CensusEvent>();
        let handle = thread::spawn(move || match run_census(&mut oracles, &config, &tx) {
            Ok(summary) => {
                let _ = tx.send(CensusEvent::Finished(summary));
            }
            Err(e) => {
                let _ = tx.send(CensusEvent::Error(format!("{e:#}")));
            }
        });

        Ok((rx, handle))
    }
}
