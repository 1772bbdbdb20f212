// 証明木局面センサス - ライブラリモジュール

pub mod constants;
pub mod domain;
pub mod application;
pub mod infrastructure;

// 外部クレートの再エクスポート
pub use anyhow::{anyhow, Context, Result};

// 主要な型を再エクスポート
pub use constants::{MAX_PLY, MOVE_ORDERING, H, W};
pub use domain::board::Board49;
pub use domain::proof::RoleMask;
pub use domain::search::{DepthRow, SearchConfig};
