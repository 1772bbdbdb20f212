// フロンティア1項目の展開規則

use crate::constants::{MOVE_ORDERING, W};
use crate::domain::board::{apply_move, Board49};
use crate::domain::proof::{child_roles, RoleMask};
use crate::domain::search::{ChildPack, NodeMeta};
use crate::infrastructure::oracle::WdlOracle;
use anyhow::{anyhow, Context, Result};

/// 勝ち確定時に最善手以外を刈る対象の親役割（C | A | A'）
const WIN_PRUNE_ROLES: RoleMask = RoleMask::CONFIRMATION
    .union(RoleMask::ALTERNATIVE)
    .union(RoleMask::ALT_ON_PRINCIPAL);

/// 1局面を展開して子局面パックをoutへ積む
///
/// オラクルに照会し、終局なら何も積まない。非終局なら親評価値
/// （合法手の最大WDL）と最善手（優先順で最初に評価値へ達する列）を
/// 決め、刈り込み規則を通った合法手ごとに子を1つ作る。子のWDLは
/// 手番が替わるため符号反転する。
pub fn expand_entry<O: WdlOracle>(
    oracle: &mut O,
    board: Board49,
    depth: usize,
    parent_roles: RoleMask,
    out: &mut Vec<ChildPack>,
) -> Result<()> {
    let reply = oracle
        .query(board, depth)
        .with_context(|| format!("深さ{}の照会に失敗しました（board49={}）", depth, board))?;
    if reply.terminal {
        return Ok(());
    }

    let parent_value = reply
        .best_value()
        .ok_or_else(|| anyhow!("非終局なのに合法手がありません（board49={}）", board))?;
    let best_move = MOVE_ORDERING
        .iter()
        .copied()
        .find(|&col| reply.vals[col] == Some(parent_value))
        .ok_or_else(|| anyhow!("最善手を特定できません（board49={}）", board))?;

    for col in 0..W {
        let Some(val) = reply.vals[col] else { continue };
        let is_best = col == best_move;
        if !is_best {
            // C単独の親は確認手だけを残す
            if parent_roles == RoleMask::CONFIRMATION {
                continue;
            }
            // 勝ち確定かつ親役割がC/A/A'に収まるなら最善手のみ
            if parent_value == 1 && parent_roles.is_subset_of(WIN_PRUNE_ROLES) {
                continue;
            }
        }

        let roles = child_roles(parent_roles, is_best);
        debug_assert!(!roles.is_empty());
        let child = apply_move(board, col, depth).with_context(|| {
            format!(
                "オラクルと盤面が矛盾しています（board49={} col={}）",
                board, col
            )
        })?;
        out.push(ChildPack::new(child, NodeMeta::new(-val, roles)?));
    }
    Ok(())
}
