// フロンティア項目のパック表現

use crate::domain::board::Board49;
use crate::domain::proof::RoleMask;
use anyhow::{ensure, Result};

/// 格納する値のビット幅（value2:2 | roles:5 | 予約:7）
pub const META_BITS: u32 = 14;

const VALUE2_MASK: u16 = 0b11;
const ROLE_SHIFT: u32 = 2;
const ROLE_FIELD: u16 = 0b11111 << ROLE_SHIFT;

const BOARD_MASK: u64 = (1 << 49) - 1;
const PACK_VALUE2_SHIFT: u32 = 49;
const PACK_ROLE_SHIFT: u32 = 51;

/// 1局面のメタ情報。手番側から見たWDL値と役割集合
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NodeMeta {
    value2: u8,
    roles: RoleMask,
}

impl NodeMeta {
    /// wdl ∈ {-1, 0, +1}
    pub fn new(wdl: i8, roles: RoleMask) -> Result<NodeMeta> {
        ensure!((-1..=1).contains(&wdl), "WDL値が範囲外です: {}", wdl);
        Ok(NodeMeta {
            value2: (wdl + 1) as u8,
            roles,
        })
    }

    pub fn wdl(self) -> i8 {
        self.value2 as i8 - 1
    }

    pub fn value2(self) -> u8 {
        self.value2
    }

    pub fn roles(self) -> RoleMask {
        self.roles
    }

    /// 14ビット値へ詰める。予約ビットは0
    pub fn pack(self) -> u16 {
        (self.value2 as u16 & VALUE2_MASK) | ((self.roles.bits() as u16) << ROLE_SHIFT)
    }

    /// 14ビット値から復元する。予約ビットは読み捨てる
    pub fn unpack(meta: u16) -> NodeMeta {
        NodeMeta {
            value2: (meta & VALUE2_MASK) as u8,
            roles: RoleMask::from_bits_truncate((meta >> ROLE_SHIFT) as u8),
        }
    }

    /// 併合規則: value2は一致必須（不一致は契約違反）、役割はOR
    pub fn merge_packed(old: u16, new: u16) -> Result<u16> {
        ensure!(
            old & VALUE2_MASK == new & VALUE2_MASK,
            "併合でvalue2が衝突しました（既存{} / 新規{}）",
            old & VALUE2_MASK,
            new & VALUE2_MASK
        );
        Ok((old & VALUE2_MASK) | ((old | new) & ROLE_FIELD))
    }
}

/// ワーカーのローカルバッファに積む子局面パック
///
/// bits 0..48: board49 / 49..50: value2 / 51..55: 役割
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ChildPack(u64);

impl ChildPack {
    pub fn new(board: Board49, meta: NodeMeta) -> ChildPack {
        ChildPack(
            (board & BOARD_MASK)
                | ((meta.value2 as u64) << PACK_VALUE2_SHIFT)
                | ((meta.roles.bits() as u64) << PACK_ROLE_SHIFT),
        )
    }

    pub fn board(self) -> Board49 {
        self.0 & BOARD_MASK
    }

    pub fn meta(self) -> NodeMeta {
        NodeMeta {
            value2: ((self.0 >> PACK_VALUE2_SHIFT) & 0b11) as u8,
            roles: RoleMask::from_bits_truncate((self.0 >> PACK_ROLE_SHIFT) as u8),
        }
    }
}
