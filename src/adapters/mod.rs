// Adapters layer: concrete implementations of the domain ports.

pub mod http;
pub mod storage;

pub use http::{parse_draws, HistoryFetcher};
pub use storage::CsvStore;
