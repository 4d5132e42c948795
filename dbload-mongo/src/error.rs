pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("failed to connect to mongodb at {address}: {source}")]
    Connect {
        address: String,
        #[source]
        source: mongodb::error::Error,
    },

    #[error("mongodb error: {0}")]
    Mongo(#[from] mongodb::error::Error),
}
