// 証明木における局面の役割ビット

use anyhow::{ensure, Result};
use std::fmt;
use std::ops::{BitOr, BitOrAssign};

/// 役割ビット数
pub const ROLE_BITS: u32 = 5;

/// 役割の集合（5ビット）
///
/// 1局面は証明木の中で複数の役割を兼ねることがあるため、集合で持つ。
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct RoleMask(u8);

impl RoleMask {
    /// 主順（P）
    pub const PRINCIPAL: RoleMask = RoleMask(1);
    /// 主順上の変化（A'）
    pub const ALT_ON_PRINCIPAL: RoleMask = RoleMask(1 << 1);
    /// 主順の反証（P'）
    pub const REFUTATION: RoleMask = RoleMask(1 << 2);
    /// 確認（C）
    pub const CONFIRMATION: RoleMask = RoleMask(1 << 3);
    /// 変化（A）
    pub const ALTERNATIVE: RoleMask = RoleMask(1 << 4);

    /// 解の側（P | A' | P'）
    pub const SOLUTION: RoleMask = RoleMask(0b00111);
    /// 証明の側（C | A）
    pub const PROOF: RoleMask = RoleMask(0b11000);

    pub const EMPTY: RoleMask = RoleMask(0);

    pub fn from_bits(bits: u8) -> Result<RoleMask> {
        ensure!(
            bits < (1 << ROLE_BITS) as u8,
            "役割ビットが範囲外です: {:#x}",
            bits
        );
        Ok(RoleMask(bits))
    }

    /// 下位5ビットだけを採用して構築する（予約ビットの剥ぎ取り用）
    pub const fn from_bits_truncate(bits: u8) -> RoleMask {
        RoleMask(bits & 0b11111)
    }

    pub const fn bits(self) -> u8 {
        self.0
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub const fn contains(self, other: RoleMask) -> bool {
        self.0 & other.0 == other.0
    }

    pub const fn intersects(self, other: RoleMask) -> bool {
        self.0 & other.0 != 0
    }

    pub const fn is_subset_of(self, other: RoleMask) -> bool {
        self.0 & !other.0 == 0
    }

    pub const fn union(self, other: RoleMask) -> RoleMask {
        RoleMask(self.0 | other.0)
    }

    /// 解の側に属するか（P/A'/P'のいずれかを含む）
    pub const fn is_solution(self) -> bool {
        self.intersects(Self::SOLUTION)
    }
}

impl BitOr for RoleMask {
    type Output = RoleMask;
    fn bitor(self, rhs: RoleMask) -> RoleMask {
        self.union(rhs)
    }
}

impl BitOrAssign for RoleMask {
    fn bitor_assign(&mut self, rhs: RoleMask) {
        self.0 |= rhs.0;
    }
}

impl fmt::Debug for RoleMask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names = [
            (RoleMask::PRINCIPAL, "P"),
            (RoleMask::ALT_ON_PRINCIPAL, "A'"),
            (RoleMask::REFUTATION, "P'"),
            (RoleMask::CONFIRMATION, "C"),
            (RoleMask::ALTERNATIVE, "A"),
        ];
        let mut first = true;
        for (bit, name) in names {
            if self.contains(bit) {
                if !first {
                    write!(f, "|")?;
                }
                write!(f, "{}", name)?;
                first = false;
            }
        }
        if first {
            write!(f, "∅")?;
        }
        Ok(())
    }
}

/// 親の役割1ビットに対する子の役割（最善手／それ以外）
const fn child_of_single(bit: u8, is_best_move: bool) -> u8 {
    match bit {
        // P: 最善手なら主順を引き継ぎ、他は主順上の変化
        1 => {
            if is_best_move {
                1
            } else {
                2
            }
        }
        // A': 最善手は反証、他は確認
        2 => {
            if is_best_move {
                4
            } else {
                8
            }
        }
        // P' -> A'
        4 => 2,
        // C -> A
        8 => 16,
        // A -> C
        16 => 8,
        _ => 0,
    }
}

const fn build_child_table() -> [u8; 64] {
    let mut table = [0u8; 64];
    let mut idx = 0;
    while idx < 64 {
        let mask = (idx & 0b11111) as u8;
        let is_best_move = idx >= 32;
        let mut out = 0u8;
        let mut bit = 0;
        while bit < ROLE_BITS {
            if mask & (1u8 << bit) != 0 {
                out |= child_of_single(1u8 << bit, is_best_move);
            }
            bit += 1;
        }
        table[idx] = out;
        idx += 1;
    }
    table
}

/// (親役割集合, 最善手か) -> 子役割集合 の64エントリ表
const CHILD_TABLE: [u8; 64] = build_child_table();

/// 親の役割集合から子の役割集合を得る
#[inline(always)]
pub fn child_roles(parent: RoleMask, is_best_move: bool) -> RoleMask {
    RoleMask(CHILD_TABLE[parent.0 as usize | ((is_best_move as usize) << 5)])
}
