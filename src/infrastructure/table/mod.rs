// フロンティア表

pub mod robin_hood;

pub use robin_hood::{FrontierTable, KEY_MAX};
