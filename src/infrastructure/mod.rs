// インフラ層 - ハッシュ表・オラクル接続・出力

pub mod oracle;
pub mod report;
pub mod table;
