pub mod text_source;
pub mod timestamp;

pub use text_source::{RawTable, TextSource};
pub use timestamp::parse_timestamp;
