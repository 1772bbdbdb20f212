// 結合テスト - スタブオラクルによる自己完結シナリオ

use crossbeam_channel::unbounded;
use proofcensus::application::census::{expand_entry, run_census, CensusEvent};
use proofcensus::constants::{U64Set, MAX_PLY, W};
use proofcensus::domain::board::{apply_move, stone_count, EMPTY_BOARD};
use proofcensus::domain::proof::RoleMask;
use proofcensus::domain::search::{
    DepthRow, NodeMeta, SearchConfig, TableCapacity, WorkerCount,
};
use proofcensus::infrastructure::oracle::{OracleReply, ScriptedOracle, WdlOracle};
use proofcensus::infrastructure::report::{MemoryRowWriter, RowWriter};
use proofcensus::infrastructure::table::FrontierTable;

fn small_config(workers: usize) -> SearchConfig {
    SearchConfig {
        capacity: TableCapacity::new(1 << 12).unwrap(),
        workers: WorkerCount::new(workers).unwrap(),
    }
}

/// スタブのクローンをワーカー数ぶん用意して全深さを回し、行を集める
fn collect_rows(oracle: &ScriptedOracle, workers: usize, config: &SearchConfig) -> Vec<DepthRow> {
    let mut oracles: Vec<ScriptedOracle> = (0..workers).map(|_| oracle.clone()).collect();
    let (tx, rx) = unbounded();
    run_census(&mut oracles, config, &tx).unwrap();
    drop(tx);
    rx.iter()
        .filter_map(|event| match event {
            CensusEvent::Row(row) => Some(row),
            _ => None,
        })
        .collect()
}

/// エンジン全体の結合テスト
mod engine_integration {
    use super::*;

    #[test]
    fn depth_zero_counts_single_principal_node() {
        // 空盤面だけの台本。子はすべて終局扱い
        let mut oracle = ScriptedOracle::new().terminal_by_default();
        oracle.script_uniform(EMPTY_BOARD, 0);

        let rows = collect_rows(&oracle, 1, &small_config(1));
        assert_eq!(rows.len(), MAX_PLY + 1);
        assert_eq!(
            rows[0],
            DepthRow {
                depth: 0,
                solution_count: 1,
                proof_count: 0,
            }
        );
        assert_eq!(rows[0].node_count(), 1);
    }

    #[test]
    fn principal_expansion_fills_depth_one() {
        // 親評価+1・最善手列3。深さ1は主順1 + 変化6の計7局面
        let mut oracle = ScriptedOracle::new().terminal_by_default();
        oracle.script(
            EMPTY_BOARD,
            OracleReply {
                terminal: false,
                vals: [
                    Some(0),
                    Some(-1),
                    Some(-1),
                    Some(1),
                    Some(-1),
                    Some(-1),
                    Some(0),
                ],
            },
        );

        let rows = collect_rows(&oracle, 1, &small_config(1));
        assert_eq!(
            rows[1],
            DepthRow {
                depth: 1,
                solution_count: 7,
                proof_count: 0,
            }
        );
    }

    #[test]
    fn terminal_children_contribute_nothing() {
        // 深さ1の局面が全部終局なら深さ2は空
        let mut oracle = ScriptedOracle::new().terminal_by_default();
        oracle.script_uniform(EMPTY_BOARD, 0);

        let rows = collect_rows(&oracle, 1, &small_config(1));
        assert_eq!(rows[1].node_count(), 7);
        assert_eq!(rows[2].node_count(), 0);
        assert!(rows[3..].iter().all(|row| row.node_count() == 0));
    }

    #[test]
    fn two_ply_roles_split_into_solution_and_proof() {
        // 全局面引き分け評価。深さ1の役割は {P}×1 + {A'}×6、
        // 深さ2は P親から解の側7、A'親それぞれから P'×1 + C×6
        let mut oracle = ScriptedOracle::new().terminal_by_default();
        oracle.script_uniform(EMPTY_BOARD, 0);
        for col in 0..W {
            let child = apply_move(EMPTY_BOARD, col, 0).unwrap();
            oracle.script_uniform(child, 0);
        }

        let rows = collect_rows(&oracle, 1, &small_config(1));
        assert_eq!(
            rows[1],
            DepthRow {
                depth: 1,
                solution_count: 7,
                proof_count: 0,
            }
        );
        assert_eq!(
            rows[2],
            DepthRow {
                depth: 2,
                solution_count: 13,
                proof_count: 36,
            }
        );
        // 解の側+証明の側=総数
        for row in &rows {
            assert_eq!(row.solution_count + row.proof_count, row.node_count());
        }
    }

    #[test]
    fn worker_count_does_not_change_results() {
        let mut oracle = ScriptedOracle::new().terminal_by_default();
        oracle.script_uniform(EMPTY_BOARD, 0);
        for col in 0..W {
            let child = apply_move(EMPTY_BOARD, col, 0).unwrap();
            oracle.script_uniform(child, 0);
        }

        let config = small_config(1);
        let rows1 = collect_rows(&oracle, 1, &config);
        let rows3 = collect_rows(&oracle, 3, &config);
        assert_eq!(rows1, rows3);
    }

    #[test]
    fn multiple_chunks_are_scanned_by_all_workers() {
        // チャンク幅(2^20)を超える容量で静的分割の経路を通す
        let mut oracle = ScriptedOracle::new().terminal_by_default();
        oracle.script_uniform(EMPTY_BOARD, 0);
        for col in 0..W {
            let child = apply_move(EMPTY_BOARD, col, 0).unwrap();
            oracle.script_uniform(child, 0);
        }

        let config = SearchConfig {
            capacity: TableCapacity::new((1 << 20) + 1).unwrap(),
            workers: WorkerCount::new(2).unwrap(),
        };
        let rows = collect_rows(&oracle, 2, &config);
        assert_eq!(rows[2].node_count(), 49);
    }

    #[test]
    fn rows_feed_row_writer() {
        let mut oracle = ScriptedOracle::new().terminal_by_default();
        oracle.script_uniform(EMPTY_BOARD, 0);

        let rows = collect_rows(&oracle, 1, &small_config(1));
        let mut writer = MemoryRowWriter::new();
        for row in &rows {
            writer.write_row(row).unwrap();
        }
        assert_eq!(writer.count(), (MAX_PLY + 1) as u64);
        assert_eq!(writer.rows()[0].node_count(), 1);
    }
}

/// 展開規則と盤面コーデックの整合
mod expansion_integration {
    use super::*;

    #[test]
    fn children_are_one_ply_deeper_and_distinct() {
        let mut oracle = ScriptedOracle::new();
        oracle.script_uniform(EMPTY_BOARD, 0);
        for col in 0..W {
            let child = apply_move(EMPTY_BOARD, col, 0).unwrap();
            oracle.script_uniform(child, 0);
        }

        let mut depth1 = Vec::new();
        expand_entry(&mut oracle, EMPTY_BOARD, 0, RoleMask::PRINCIPAL, &mut depth1).unwrap();
        assert_eq!(depth1.len(), W);

        let mut seen = U64Set::default();
        for pack in &depth1 {
            assert_eq!(stone_count(pack.board()).unwrap(), 1);
            let mut depth2 = Vec::new();
            expand_entry(
                &mut oracle,
                pack.board(),
                1,
                pack.meta().roles(),
                &mut depth2,
            )
            .unwrap();
            for child in &depth2 {
                assert_eq!(stone_count(child.board()).unwrap(), 2);
                seen.insert(child.board());
            }
        }
        // 2手までに合流は存在しない
        assert_eq!(seen.len(), W * W);
    }
}

/// 併合の収束（ドレイン相当の操作）
mod merge_integration {
    use super::*;

    #[test]
    fn same_child_from_two_parents_unions_roles() {
        // 異なる親が同じ子キーを {P} と {A'} で生む。value2は同一
        let mut table = FrontierTable::new(64).unwrap();
        let key = apply_move(EMPTY_BOARD, 3, 0).unwrap();
        table
            .insert_merge(key, NodeMeta::new(0, RoleMask::PRINCIPAL).unwrap())
            .unwrap();
        table
            .insert_merge(key, NodeMeta::new(0, RoleMask::ALT_ON_PRINCIPAL).unwrap())
            .unwrap();

        let meta = table.get(key).unwrap().unwrap();
        assert_eq!(
            meta.roles(),
            RoleMask::PRINCIPAL | RoleMask::ALT_ON_PRINCIPAL
        );
        assert_eq!(meta.wdl(), 0);
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn role_mask_grows_monotonically() {
        let mut table = FrontierTable::new(64).unwrap();
        let key = 77;
        let mut expect = RoleMask::EMPTY;
        for roles in [
            RoleMask::CONFIRMATION,
            RoleMask::ALTERNATIVE,
            RoleMask::CONFIRMATION,
            RoleMask::REFUTATION,
        ] {
            table
                .insert_merge(key, NodeMeta::new(-1, roles).unwrap())
                .unwrap();
            expect |= roles;
            let stored = table.get(key).unwrap().unwrap().roles();
            assert_eq!(stored, expect);
        }
    }
}

/// オラクルスタブの振る舞い
mod oracle_integration {
    use super::*;

    #[test]
    fn scripted_oracle_counts_queries() {
        let mut oracle = ScriptedOracle::new().terminal_by_default();
        oracle.script_uniform(EMPTY_BOARD, 0);
        let _ = oracle.query(EMPTY_BOARD, 0).unwrap();
        let _ = oracle.query(123, 1).unwrap();
        assert_eq!(oracle.query_count(), 2);
    }
}
