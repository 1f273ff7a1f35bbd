pub mod loader;
pub mod prize;
pub mod query;
pub mod statistics;

pub use crate::domain::model::DrawRecord;
pub use crate::domain::ports::{ConfigProvider, DrawSource, RecordStore};
pub use crate::utils::error::Result;
