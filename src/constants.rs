// 盤面定数とユーティリティ型定義

use nohash_hasher::BuildNoHashHasher;

/// ====== 盤面定数 ======
pub const W: usize = 7;
pub const H: usize = 6;

/// 最終深さ（全マス埋まり）
pub const MAX_PLY: usize = W * H;

/// 着手の優先順（中央寄りの列から）
pub const MOVE_ORDERING: [usize; W] = [3, 2, 4, 1, 5, 0, 6];

/// スロット配列走査のチャンク幅（ワーカー割り当ての単位）
pub const SCAN_CHUNK: usize = 1 << 20;

// u64 キー専用のノーハッシュ（高速化）
pub type U64Map<V> = std::collections::HashMap<u64, V, BuildNoHashHasher<u64>>;
pub type U64Set = std::collections::HashSet<u64, BuildNoHashHasher<u64>>;
