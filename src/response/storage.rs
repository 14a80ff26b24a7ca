use super::{entry_documents, Reply};
use crate::errors::ProvenError;
use bson::{Bson, Document, Timestamp};
use serde::Serialize;

/// Storage used by one collection, in bytes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CollectionStorage {
    pub collection: String,
    pub size: i64,
}

/// Reply to `listStorage`. The server answers with a list of single-pair
/// `{collection: size}` documents; each pair becomes one entry here.
#[derive(Debug, Clone, Serialize)]
pub struct ListStorageResponse {
    pub storage: Vec<CollectionStorage>,
    raw: Document,
}

impl ListStorageResponse {
    pub fn from_reply(reply: Document) -> Result<Self, ProvenError> {
        let mut storage = Vec::new();
        for entry in entry_documents(&reply, "storageList")? {
            for (collection, value) in entry.iter() {
                let size = match value {
                    Bson::Int32(v) => i64::from(*v),
                    Bson::Int64(v) => *v,
                    Bson::Double(v) => *v as i64,
                    _ => return Err(ProvenError::malformed("storageList")),
                };
                storage.push(CollectionStorage { collection: collection.to_string(), size });
            }
        }
        Ok(Self { storage, raw: reply })
    }
}

impl Reply for ListStorageResponse {
    fn raw(&self) -> &Document {
        &self.raw
    }
}

/// Reply to `createIgnored`: nothing beyond operation timestamp metadata.
#[derive(Debug, Clone, Serialize)]
pub struct CreateIgnoredResponse {
    pub operation_time: Timestamp,
    pub cluster_time: Option<Document>,
    raw: Document,
}

impl CreateIgnoredResponse {
    pub fn from_reply(reply: Document) -> Result<Self, ProvenError> {
        let operation_time = match reply.get("operationTime") {
            Some(Bson::Timestamp(ts)) => *ts,
            _ => return Err(ProvenError::malformed("operationTime")),
        };
        let cluster_time = match reply.get("$clusterTime") {
            Some(Bson::Document(doc)) => Some(doc.clone()),
            _ => None,
        };
        Ok(Self { operation_time, cluster_time, raw: reply })
    }
}

impl Reply for CreateIgnoredResponse {
    fn raw(&self) -> &Document {
        &self.raw
    }
}
