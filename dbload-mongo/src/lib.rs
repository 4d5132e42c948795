//! MongoDB side of `dbload`: synthetic documents, bulk populate, index management and the
//! timed queries the harness runs.

mod document;
mod error;
mod queries;
mod store;

pub use document::{DUMMY_NAME, INDEXED_FIELD, NAME_FIELD, UNINDEXED_FIELD};
pub use error::{Error, Result};
pub use queries::{BenchQueries, BenchQuery, RwQueries, RwQuery};
pub use store::{ConnectOptions, MongoStore};
