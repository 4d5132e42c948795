use mongodb::bson::{self, Document, doc};
use rand::Rng;
use rand::distr::Alphanumeric;

/// Field carrying the secondary index.
pub const INDEXED_FIELD: &str = "indexed_value";
/// Same value distribution as [`INDEXED_FIELD`], never indexed.
pub const UNINDEXED_FIELD: &str = "unindexed_value";
pub const NAME_FIELD: &str = "name";
/// `name` of the fixed document the read/write loop works on.
pub const DUMMY_NAME: &str = "dbload-dummy";

const PAYLOAD_LEN: usize = 64;

/// One synthetic benchmark document. Both lookup fields share `value`.
pub(crate) fn synthetic(seq: u64, value: u64, payload: String) -> Document {
    doc! {
        "seq": seq as i64,
        INDEXED_FIELD: value as i64,
        UNINDEXED_FIELD: value as i64,
        NAME_FIELD: format!("doc-{seq}"),
        "payload": payload,
    }
}

/// Documents `start..start + len` with lookup values drawn from `[0, value_space)`.
pub(crate) fn synthetic_batch(start: u64, len: u64, value_space: u64) -> Vec<Document> {
    let mut rng = rand::rng();
    (start..start + len)
        .map(|seq| {
            let value = rng.random_range(0..value_space.max(1));
            let payload: String = (&mut rng)
                .sample_iter(Alphanumeric)
                .take(PAYLOAD_LEN)
                .map(char::from)
                .collect();
            synthetic(seq, value, payload)
        })
        .collect()
}

/// The fixed document used by the read/write loop.
pub(crate) fn dummy() -> Document {
    doc! {
        NAME_FIELD: DUMMY_NAME,
        "kind": "dummy",
        "tags": ["load", "test", "dummy"],
        "profile": {
            "first_name": "Jane",
            "last_name": "Doe",
            "age": 42,
            "active": true,
            "address": {
                "street": "1 Main St",
                "city": "Springfield",
                "zip": "12345",
            },
        },
        "notes": "fixed payload written and read back by the dbload read/write loop",
    }
}

/// A fresh copy of [`dummy`] tagged with the writing worker.
pub(crate) fn dummy_written_by(worker_id: u64) -> Document {
    let mut doc = dummy();
    doc.insert("worker", worker_id as i64);
    doc.insert("written_at", bson::DateTime::now());
    doc
}
