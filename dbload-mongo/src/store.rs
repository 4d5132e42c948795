use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use mongodb::bson::{Document, doc};
use mongodb::options::ClientOptions;
use mongodb::{Client, Collection, IndexModel};
use rand::Rng;

use crate::document::{self, DUMMY_NAME, NAME_FIELD};
use crate::error::{Error, Result};

const POPULATE_BATCH: u64 = 1_000;

/// Lookup values are drawn from `[0, value_space)`; this is used until a populate says otherwise.
const DEFAULT_VALUE_SPACE: u64 = 1_000;

#[derive(Debug, Clone)]
pub struct ConnectOptions {
    pub host: String,
    pub port: u16,
    pub database: String,
    pub collection: String,
    /// Should be at least the number of workers so nobody waits on the pool.
    pub max_pool_size: u32,
    pub server_selection_timeout: Duration,
}

impl ConnectOptions {
    #[must_use]
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// A handle on the target collection, shared by every worker through one pooled client.
#[derive(Debug)]
pub struct MongoStore {
    collection: Collection<Document>,
    value_space: AtomicU64,
}

impl MongoStore {
    /// Connects and pings the server so an unreachable database fails here, not in a worker.
    pub async fn connect(opts: &ConnectOptions) -> Result<Self> {
        let address = opts.address();
        let connect_err = |source| Error::Connect {
            address: address.clone(),
            source,
        };

        let uri = format!("mongodb://{address}");
        let mut options = ClientOptions::parse(uri.as_str())
            .await
            .map_err(connect_err)?;
        options.app_name = Some("dbload".to_string());
        options.max_pool_size = Some(opts.max_pool_size.max(1));
        options.server_selection_timeout = Some(opts.server_selection_timeout);
        options.connect_timeout = Some(opts.server_selection_timeout);

        let client = Client::with_options(options).map_err(connect_err)?;
        let database = client.database(&opts.database);
        database
            .run_command(doc! { "ping": 1 })
            .await
            .map_err(connect_err)?;

        tracing::info!(
            %address,
            database = %opts.database,
            collection = %opts.collection,
            max_pool_size = opts.max_pool_size,
            "connected to mongodb"
        );

        Ok(Self {
            collection: database.collection(&opts.collection),
            value_space: AtomicU64::new(DEFAULT_VALUE_SPACE),
        })
    }

    /// Inserts `count` synthetic documents in unordered batches.
    ///
    /// A `count` of 0 leaves the collection and the lookup value space untouched.
    pub async fn populate(&self, count: u64) -> Result<()> {
        if count == 0 {
            return Ok(());
        }
        let value_space = count;
        self.value_space.store(value_space, Ordering::Relaxed);

        let started = Instant::now();
        let mut inserted = 0u64;
        while inserted < count {
            let len = POPULATE_BATCH.min(count - inserted);
            let batch = document::synthetic_batch(inserted, len, value_space);
            self.collection.insert_many(batch).ordered(false).await?;
            inserted += len;
            tracing::debug!(inserted, count, "populate batch written");
        }

        tracing::info!(count, elapsed = ?started.elapsed(), "populated collection");
        Ok(())
    }

    /// Ascending single-field index on `field`. A no-op if it already exists.
    pub async fn ensure_index(&self, field: &str) -> Result<()> {
        let model = IndexModel::builder().keys(doc! { field: 1 }).build();
        let created = self.collection.create_index(model).await?;
        tracing::info!(index = %created.index_name, "index ready");
        Ok(())
    }

    pub async fn drop_collection(&self) -> Result<()> {
        self.collection.drop().await?;
        tracing::info!(collection = %self.collection.name(), "collection dropped");
        Ok(())
    }

    /// Upserts the fixed dummy document so reads have something to hit.
    pub async fn seed_dummy(&self) -> Result<()> {
        self.collection
            .replace_one(doc! { NAME_FIELD: DUMMY_NAME }, document::dummy())
            .upsert(true)
            .await?;
        Ok(())
    }

    /// Overwrites the dummy document in place; writes never grow the collection.
    pub async fn write_dummy(&self, worker_id: u64) -> Result<()> {
        self.collection
            .replace_one(
                doc! { NAME_FIELD: DUMMY_NAME },
                document::dummy_written_by(worker_id),
            )
            .upsert(true)
            .await?;
        Ok(())
    }

    pub async fn count(&self) -> Result<u64> {
        Ok(self.collection.count_documents(doc! {}).await?)
    }

    pub async fn index_names(&self) -> Result<Vec<String>> {
        Ok(self.collection.list_index_names().await?)
    }

    /// Returns whether a matching document was found.
    pub async fn find_one(&self, filter: Document) -> Result<bool> {
        Ok(self.collection.find_one(filter).await?.is_some())
    }

    /// A lookup value with the same distribution as the populated documents.
    pub fn random_value(&self) -> i64 {
        let space = self.value_space.load(Ordering::Relaxed).max(1);
        rand::rng().random_range(0..space) as i64
    }
}
