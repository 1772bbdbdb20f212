// 探索設定のValue Objects

use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};

/// ハッシュ表のスロット数を表すValue Object
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableCapacity(usize);

impl TableCapacity {
    /// 参照実装の既定値（(2^33 + 2^32) / 2 スロット）
    pub const DEFAULT_SLOTS: usize = ((1usize << 33) + (1usize << 32)) / 2;

    pub fn new(slots: usize) -> Result<Self> {
        if slots == 0 {
            return Err(anyhow!("ハッシュ表容量は1以上である必要があります"));
        }
        Ok(Self(slots))
    }

    pub fn get(&self) -> usize {
        self.0
    }
}

/// ワーカースレッド数を表すValue Object
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkerCount(usize);

impl WorkerCount {
    pub fn new(workers: usize) -> Result<Self> {
        if workers == 0 {
            return Err(anyhow!("ワーカー数は1以上である必要があります"));
        }
        Ok(Self(workers))
    }

    /// 論理コア数から決める既定値
    pub fn from_cpus() -> Self {
        Self(num_cpus::get().max(1))
    }

    pub fn get(&self) -> usize {
        self.0
    }
}

/// 集計実行の設定
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct SearchConfig {
    pub capacity: TableCapacity,
    pub workers: WorkerCount,
}

impl SearchConfig {
    pub fn validate(&self) -> Result<()> {
        // Value Objectsで既に検証済み
        Ok(())
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            capacity: TableCapacity::new(TableCapacity::DEFAULT_SLOTS).unwrap(),
            workers: WorkerCount::from_cpus(),
        }
    }
}
