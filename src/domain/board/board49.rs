// 49ビット盤面コーデック - 7列×7ビットの逐次更新表現

use crate::constants::{H, W};
use anyhow::{ensure, Result};

/// 7列×7ビットにパックした盤面（上位15ビットは常に0）
///
/// 列cの7ビットは「列コード」で、高さhとパターン（下から順の手番ビット列）を
/// `col_code = (2^h - 1) + pattern` として同時に符号化する。
pub type Board49 = u64;

/// 空盤面
pub const EMPTY_BOARD: Board49 = 0;

/// 列コードの上限（高さ6・パターン全1）
pub const COL_CODE_MAX: u64 = 126;

const COL_BITS: usize = 7;
const COL_MASK: u64 = (1 << COL_BITS) - 1;

/// 高さhの列コード下限（2^h - 1）
const BASE_OF_H: [u64; 8] = [0, 1, 3, 7, 15, 31, 63, 127];

/// 手番。深さの偶奇で決まる
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Side {
    /// 先手（偶数深さで着手）
    First,
    /// 後手（奇数深さで着手）
    Second,
}

impl Side {
    pub fn from_depth(depth: usize) -> Side {
        if depth % 2 == 0 {
            Side::First
        } else {
            Side::Second
        }
    }

    /// パターンに立てるビット値（先手0 / 後手1）
    pub fn pattern_bit(self) -> u64 {
        match self {
            Side::First => 0,
            Side::Second => 1,
        }
    }
}

/// 列cの7ビット列コードを取り出す
#[inline(always)]
pub fn column_code(board: Board49, col: usize) -> u64 {
    (board >> (COL_BITS * col)) & COL_MASK
}

/// 列コードから高さを得る。126超は盤面破損
#[inline]
pub fn column_height(col_code: u64) -> Result<usize> {
    ensure!(
        col_code <= COL_CODE_MAX,
        "列コードが破損しています: {}",
        col_code
    );
    let mut h = 0;
    while h < H && col_code >= BASE_OF_H[h + 1] {
        h += 1;
    }
    Ok(h)
}

/// 1手を適用した新しい盤面を返す。手番はdepthの偶奇から決まる
pub fn apply_move(board: Board49, col: usize, depth: usize) -> Result<Board49> {
    ensure!(col < W, "列番号が範囲外です: {}", col);

    let code = column_code(board, col);
    let h = column_height(code)?;
    ensure!(h < H, "列{}は満杯で着手できません", col);

    let mut pattern = code - BASE_OF_H[h];
    pattern |= Side::from_depth(depth).pattern_bit() << h;
    let new_code = BASE_OF_H[h + 1] + pattern;
    debug_assert!(new_code <= COL_CODE_MAX);

    let shift = COL_BITS * col;
    Ok((board & !(COL_MASK << shift)) | (new_code << shift))
}

/// 総石数（全列の高さの和）。BFSの深さと一致する
pub fn stone_count(board: Board49) -> Result<usize> {
    let mut total = 0;
    for col in 0..W {
        total += column_height(column_code(board, col))?;
    }
    Ok(total)
}

/// 列コードを下から順の手番列に展開する
pub fn column_sides(col_code: u64) -> Result<Vec<Side>> {
    let h = column_height(col_code)?;
    let pattern = col_code - BASE_OF_H[h];
    Ok((0..h)
        .map(|i| {
            if pattern & (1 << i) == 0 {
                Side::First
            } else {
                Side::Second
            }
        })
        .collect())
}

/// 下から順の手番列から列コードを組み立てる
pub fn pack_column(sides: &[Side]) -> Result<u64> {
    ensure!(sides.len() <= H, "列の高さが上限を超えています: {}", sides.len());
    let mut pattern = 0u64;
    for (i, side) in sides.iter().enumerate() {
        pattern |= side.pattern_bit() << i;
    }
    Ok(BASE_OF_H[sides.len()] + pattern)
}
