// 集計結果の出力

pub mod csv;

pub use csv::{CsvRowWriter, MemoryRowWriter, RowWriter, CSV_HEADER};
