// アプリケーション層 - 集計の実装

pub mod census;
