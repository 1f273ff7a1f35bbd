pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::cli::Cli;
pub use config::AppConfig;

pub use adapters::{CsvStore, HistoryFetcher};
pub use crate::core::{
    loader::DataLoader,
    prize::{PrizeChecker, PrizeTable, Ticket, Tier},
    query::QueryIndex,
    statistics::Statistics,
};
pub use domain::model::DrawRecord;
pub use utils::error::{Result, SsqError};
