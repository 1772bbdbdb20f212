// 盤面エンコーディング

pub mod board49;

pub use board49::{
    apply_move, column_code, column_height, column_sides, pack_column, stone_count, Board49, Side,
    COL_CODE_MAX, EMPTY_BOARD,
};
