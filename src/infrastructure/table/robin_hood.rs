// ロビンフッド法の開番地フロンティア表

use crate::domain::board::Board49;
use crate::domain::search::{NodeMeta, META_BITS};
use anyhow::{bail, ensure, Context, Result};

/// 格納可能な最大キー（49ビット）
pub const KEY_MAX: u64 = (1 << 49) - 1;

// スロットは board49 + 1 を下位50ビットに持つ（0は空き）
const KEY_BITS: u32 = 50;
const KEY_MASK: u64 = (1 << KEY_BITS) - 1;
const VAL_SHIFT: u32 = KEY_BITS;

/// 固定容量のロビンフッド開番地ハッシュ表（50ビットキー + 14ビット値）
///
/// 1ply分のフロンティアを保持する。挿入は既存キーに対して値の併合
/// （NodeMetaの併合規則）を行い、スロットの移動は起こさない。
pub struct FrontierTable {
    slots: Vec<u64>,
    len: u64,
}

impl FrontierTable {
    pub fn new(capacity: usize) -> Result<Self> {
        ensure!(capacity > 0, "ハッシュ表容量は1以上である必要があります");
        Ok(Self {
            slots: vec![0; capacity],
            len: 0,
        })
    }

    /// splittable-mix の最終段
    #[inline(always)]
    fn hash64(mut x: u64) -> u64 {
        x = x.wrapping_add(0x9e37_79b9_7f4a_7c15);
        x = (x ^ (x >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
        x = (x ^ (x >> 27)).wrapping_mul(0x94d0_49bb_1331_11eb);
        x ^ (x >> 31)
    }

    #[inline(always)]
    fn home(&self, key_plus: u64) -> usize {
        (Self::hash64(key_plus) % self.slots.len() as u64) as usize
    }

    /// スロットidxに居る要素のホームからの変位
    #[inline(always)]
    fn displacement(&self, idx: usize, home: usize) -> usize {
        if idx >= home {
            idx - home
        } else {
            idx + self.slots.len() - home
        }
    }

    /// 全スロットをゼロ化して空にする
    pub fn clear(&mut self) {
        self.slots.fill(0);
        self.len = 0;
    }

    pub fn len(&self) -> u64 {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn slot_count(&self) -> usize {
        self.slots.len()
    }

    /// スロットを直接読む（空ならNone）。並列走査と集計用
    #[inline]
    pub fn entry(&self, idx: usize) -> Option<(Board49, NodeMeta)> {
        let e = self.slots[idx];
        if e == 0 {
            return None;
        }
        Some(((e & KEY_MASK) - 1, NodeMeta::unpack((e >> VAL_SHIFT) as u16)))
    }

    pub fn get(&self, key: Board49) -> Result<Option<NodeMeta>> {
        ensure!(key <= KEY_MAX, "キーが49ビット範囲外です: {}", key);
        let kp = key + 1;
        let mut i = self.home(kp);
        let mut dib = 0;
        while dib < self.slots.len() {
            let e = self.slots[i];
            if e == 0 {
                return Ok(None);
            }
            let ekp = e & KEY_MASK;
            if ekp == kp {
                return Ok(Some(NodeMeta::unpack((e >> VAL_SHIFT) as u16)));
            }
            // 自分より浅い変位の要素に出会ったら不在が確定する
            if self.displacement(i, self.home(ekp)) < dib {
                return Ok(None);
            }
            i += 1;
            if i == self.slots.len() {
                i = 0;
            }
            dib += 1;
        }
        Ok(None)
    }

    /// 挿入または併合。既存キーにはNodeMetaの併合規則を適用する
    pub fn insert_merge(&mut self, key: Board49, meta: NodeMeta) -> Result<()> {
        ensure!(key <= KEY_MAX, "キーが49ビット範囲外です: {}", key);
        let value = meta.pack();
        ensure!(
            (value as u32) < (1u32 << META_BITS),
            "値が14ビット範囲外です: {}",
            value
        );

        let mut entry = (key + 1) | ((value as u64) << VAL_SHIFT);
        let mut i = self.home(key + 1);
        let mut dib = 0;

        while dib < self.slots.len() {
            let e = self.slots[i];
            if e == 0 {
                self.slots[i] = entry;
                self.len += 1;
                return Ok(());
            }

            let ekp = e & KEY_MASK;
            if ekp == entry & KEY_MASK {
                let old = (e >> VAL_SHIFT) as u16;
                let new = (entry >> VAL_SHIFT) as u16;
                let merged = NodeMeta::merge_packed(old, new)
                    .with_context(|| format!("キー{}の併合に失敗しました", ekp - 1))?;
                self.slots[i] = ekp | ((merged as u64) << VAL_SHIFT);
                return Ok(());
            }

            let inc_dib = self.displacement(i, self.home(ekp));
            if inc_dib < dib {
                // ロビンフッド: 深い方が席を奪い、追い出された要素を運び続ける
                self.slots[i] = entry;
                entry = e;
                dib = inc_dib;
            }

            i += 1;
            if i == self.slots.len() {
                i = 0;
            }
            dib += 1;
        }

        bail!("ハッシュ表が満杯です（容量{}）", self.slots.len());
    }
}
