use mongodb::bson::doc;

use dbload_core::Operations;

use crate::document::{DUMMY_NAME, INDEXED_FIELD, NAME_FIELD, UNINDEXED_FIELD};
use crate::error::Error;
use crate::store::MongoStore;

/// Timed queries of the benchmark runner.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    strum::EnumString,
    strum::Display,
    strum::VariantNames,
    strum::EnumIter,
)]
#[strum(serialize_all = "snake_case")]
pub enum BenchQuery {
    /// First document of the collection, no filter.
    Simple,
    /// Point lookup on the indexed field.
    IndexedFind,
    /// The same lookup on a field without an index.
    NonindexedFind,
}

/// Timed queries of the read/write loop.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    strum::EnumString,
    strum::Display,
    strum::VariantNames,
    strum::EnumIter,
)]
#[strum(serialize_all = "snake_case")]
pub enum RwQuery {
    /// Look up the fixed dummy document by name.
    Read,
    /// Overwrite the dummy document with a freshly stamped copy.
    Write,
}

#[derive(Debug)]
pub struct BenchQueries {
    store: MongoStore,
}

impl BenchQueries {
    pub fn new(store: MongoStore) -> Self {
        Self { store }
    }
}

impl Operations for BenchQueries {
    type Operation = BenchQuery;
    type Error = Error;

    async fn populate(&self, count: u64) -> Result<(), Error> {
        self.store.populate(count).await
    }

    async fn ensure_index(&self) -> Result<(), Error> {
        self.store.ensure_index(INDEXED_FIELD).await
    }

    async fn purge(&self) -> Result<(), Error> {
        self.store.drop_collection().await
    }

    async fn invoke(&self, operation: BenchQuery, worker_id: u64) -> Result<(), Error> {
        let filter = match operation {
            BenchQuery::Simple => doc! {},
            BenchQuery::IndexedFind => doc! { INDEXED_FIELD: self.store.random_value() },
            BenchQuery::NonindexedFind => doc! { UNINDEXED_FIELD: self.store.random_value() },
        };

        let found = self.store.find_one(filter).await?;
        tracing::trace!(worker_id, %operation, found, "query done");
        Ok(())
    }
}

#[derive(Debug)]
pub struct RwQueries {
    store: MongoStore,
}

impl RwQueries {
    pub fn new(store: MongoStore) -> Self {
        Self { store }
    }
}

impl Operations for RwQueries {
    type Operation = RwQuery;
    type Error = Error;

    /// Seeds the dummy document, plus `count` synthetic documents as background data.
    async fn populate(&self, count: u64) -> Result<(), Error> {
        self.store.seed_dummy().await?;
        if count > 0 {
            self.store.populate(count).await?;
        }
        Ok(())
    }

    async fn ensure_index(&self) -> Result<(), Error> {
        self.store.ensure_index(NAME_FIELD).await
    }

    async fn purge(&self) -> Result<(), Error> {
        self.store.drop_collection().await
    }

    async fn invoke(&self, operation: RwQuery, worker_id: u64) -> Result<(), Error> {
        match operation {
            RwQuery::Read => {
                let found = self.store.find_one(doc! { NAME_FIELD: DUMMY_NAME }).await?;
                if !found {
                    tracing::debug!(worker_id, "dummy document not found");
                }
            }
            RwQuery::Write => self.store.write_dummy(worker_id).await?,
        }
        Ok(())
    }
}
