// 幅優先の集計エンジン

use crate::application::census::event::CensusEvent;
use crate::application::census::expand::expand_entry;
use crate::constants::{MAX_PLY, SCAN_CHUNK};
use crate::domain::board::EMPTY_BOARD;
use crate::domain::proof::RoleMask;
use crate::domain::search::{CensusSummary, ChildPack, DepthRow, NodeMeta, SearchConfig};
use crate::infrastructure::oracle::WdlOracle;
use crate::infrastructure::table::FrontierTable;
use anyhow::{anyhow, ensure, Context, Result};
use crossbeam_channel::Sender;
use rayon::prelude::*;
use std::thread;
use std::time::Instant;

/// ワーカーが1回の送信にまとめる子局面パック数
const BATCH_LEN: usize = 4096;

/// 深さ0..MAX_PLYを2表ピンポンで回し、深さごとの集計行を送出する
///
/// フロンティア表は2枚だけを使い回す。各深さでは現表を読み取り専用で
/// ワーカーに分配し、生成された子パックをこのスレッドだけが次表へ
/// 併合する。行の送出は併合完了後に行うため、深さ間の順序は厳密
pub fn run_census<O>(
    oracles: &mut [O],
    config: &SearchConfig,
    tx: &Sender<CensusEvent>,
) -> Result<CensusSummary>
where
    O: WdlOracle + Send,
{
    ensure!(!oracles.is_empty(), "オラクルが1つも与えられていません");
    config.validate()?;
    let capacity = config.capacity.get();
    let started = Instant::now();

    let mut front = FrontierTable::new(capacity).context("フロンティア表の確保に失敗しました")?;
    let mut back = FrontierTable::new(capacity).context("フロンティア表の確保に失敗しました")?;

    // 深さ0: 空盤面を主順として登録
    let reply = oracles[0]
        .query(EMPTY_BOARD, 0)
        .context("空盤面の照会に失敗しました")?;
    ensure!(!reply.terminal, "空盤面が終局と報告されました");
    let root_value = reply
        .best_value()
        .ok_or_else(|| anyhow!("空盤面に合法手がありません"))?;
    front.insert_merge(EMPTY_BOARD, NodeMeta::new(root_value, RoleMask::PRINCIPAL)?)?;

    let mut summary = CensusSummary::default();
    emit_row(&front, 0, tx, &mut summary);

    let _ = tx.send(CensusEvent::Log(format!(
        "BFSを開始します（ワーカー{} / 容量{}）",
        oracles.len(),
        capacity
    )));

    for depth in 0..MAX_PLY {
        back.clear();
        scan_ply(&front, &mut back, oracles, depth)
            .with_context(|| format!("深さ{}の展開に失敗しました", depth))?;
        emit_row(&back, depth + 1, tx, &mut summary);
        std::mem::swap(&mut front, &mut back);
    }

    summary.elapsed_secs = started.elapsed().as_secs_f64();
    let _ = tx.send(CensusEvent::Log(format!(
        "BFSが終了しました（{:.1}秒）",
        summary.elapsed_secs
    )));
    Ok(summary)
}

/// 1深さぶんの並列展開
///
/// frontは読み取り専用。backへの書き込みはこのスレッドだけが行う
fn scan_ply<O>(
    front: &FrontierTable,
    back: &mut FrontierTable,
    oracles: &mut [O],
    depth: usize,
) -> Result<()>
where
    O: WdlOracle + Send,
{
    let workers = oracles.len();
    let (btx, brx) = crossbeam_channel::unbounded::<Vec<ChildPack>>();

    thread::scope(|scope| -> Result<()> {
        let mut handles = Vec::with_capacity(workers);
        for (worker, oracle) in oracles.iter_mut().enumerate() {
            let btx = btx.clone();
            handles.push(
                scope.spawn(move || scan_slice(front, oracle, depth, worker, workers, btx)),
            );
        }
        drop(btx);

        // 受信ループ。エラー後も受信は続け、ワーカーを詰まらせない
        let mut drained = Ok(());
        for batch in brx.iter() {
            if drained.is_ok() {
                drained = drain_batch(back, &batch);
            }
        }

        for handle in handles {
            let joined = handle
                .join()
                .map_err(|_| anyhow!("ワーカースレッドがpanicしました"))?;
            joined?;
        }
        drained
    })
}

/// ワーカー本体。静的に割り当てたチャンクを歩き、子パックをバッチ送信する
fn scan_slice<O: WdlOracle>(
    front: &FrontierTable,
    oracle: &mut O,
    depth: usize,
    worker: usize,
    workers: usize,
    btx: Sender<Vec<ChildPack>>,
) -> Result<()> {
    let slots = front.slot_count();
    let chunks = (slots + SCAN_CHUNK - 1) / SCAN_CHUNK;
    let mut local = Vec::with_capacity(BATCH_LEN);

    for chunk in (worker..chunks).step_by(workers) {
        let lo = chunk * SCAN_CHUNK;
        let hi = slots.min(lo + SCAN_CHUNK);
        for idx in lo..hi {
            let Some((board, meta)) = front.entry(idx) else {
                continue;
            };
            expand_entry(oracle, board, depth, meta.roles(), &mut local)?;
            if local.len() >= BATCH_LEN {
                let batch = std::mem::replace(&mut local, Vec::with_capacity(BATCH_LEN));
                btx.send(batch)
                    .map_err(|_| anyhow!("ドレイン側が停止しています"))?;
            }
        }
    }

    if !local.is_empty() {
        btx.send(local)
            .map_err(|_| anyhow!("ドレイン側が停止しています"))?;
    }
    Ok(())
}

/// 子パックのバッチを次表へ併合する
fn drain_batch(back: &mut FrontierTable, batch: &[ChildPack]) -> Result<()> {
    for pack in batch {
        back.insert_merge(pack.board(), pack.meta())?;
    }
    Ok(())
}

/// 表を集計して1行を送出し、サマリーを更新する
fn emit_row(
    table: &FrontierTable,
    depth: usize,
    tx: &Sender<CensusEvent>,
    summary: &mut CensusSummary,
) {
    let (solution_count, proof_count) = count_frontier(table);
    let row = DepthRow {
        depth: depth as u32,
        solution_count,
        proof_count,
    };
    summary.rows_emitted += 1;
    summary.total_nodes += row.node_count();
    summary.peak_frontier = summary.peak_frontier.max(row.node_count());
    let _ = tx.send(CensusEvent::Row(row));
}

/// スロット配列を並列走査し、解の側／証明の側の占有数を数える
fn count_frontier(table: &FrontierTable) -> (u64, u64) {
    let slots = table.slot_count();
    let chunks = (slots + SCAN_CHUNK - 1) / SCAN_CHUNK;
    (0..chunks)
        .into_par_iter()
        .map(|chunk| {
            let lo = chunk * SCAN_CHUNK;
            let hi = slots.min(lo + SCAN_CHUNK);
            let mut solution = 0u64;
            let mut proof = 0u64;
            for idx in lo..hi {
                if let Some((_, meta)) = table.entry(idx) {
                    if meta.roles().is_solution() {
                        solution += 1;
                    } else {
                        proof += 1;
                    }
                }
            }
            (solution, proof)
        })
        .reduce(|| (0, 0), |a, b| (a.0 + b.0, a.1 + b.1))
}
