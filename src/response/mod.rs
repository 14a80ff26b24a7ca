//! Typed views over raw command replies.
//!
//! Every view is constructed in one step from one reply document and never
//! mutated afterwards. Each keeps the reply it was built from, so beside the
//! typed fields every raw field stays reachable through [`Reply::get`].
//! Construction does no validation beyond direct extraction: a missing or
//! mistyped required field fails with `ProvenError::MalformedReply`.

mod bulk;
mod forget;
mod history;
mod proofs;
mod storage;
mod versions;

pub use bulk::{
    BulkLoadKillResponse, BulkLoadStartResponse, BulkLoadStatus, BulkLoadStatusResponse,
    BulkLoadStopResponse,
};
pub use forget::{
    ForgetExecuteResponse, ForgetExecuteSummary, ForgetPrepareResponse, ForgetPrepareSummary,
};
pub use history::{DocumentHistory, DocumentHistoryResponse, HistoryVersion};
pub use proofs::{
    DocumentProof, DocumentProofDetail, DocumentProofResponse, FailedDocumentProof,
    SubmitProofResponse, VerifyProofResponse, VersionProofResponse, VersionProofSummary,
};
pub use storage::{CollectionStorage, CreateIgnoredResponse, ListStorageResponse};
pub use versions::{
    CompactResponse, ListVersionsResponse, RollbackResponse, RollbackVersion, VersionResponse,
    VersionSummary,
};

use crate::errors::ProvenError;
use bson::{Bson, Document};
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Read-only access to the reply document a view was built from.
pub trait Reply {
    /// The raw reply exactly as the server returned it.
    fn raw(&self) -> &Document;

    /// Looks up any field of the raw reply by key.
    fn get(&self, field: &str) -> Option<&Bson> {
        self.raw().get(field)
    }
}

/// Reply to `showMetadata` / `hideMetadata`, which return nothing beyond the
/// success indicator.
#[derive(Debug, Clone, Serialize)]
pub struct MetadataResponse {
    pub ok: bool,
    raw: Document,
}

impl MetadataResponse {
    pub fn from_reply(reply: Document) -> Result<Self, ProvenError> {
        let ok = integer(&reply, "ok")? != 0;
        Ok(Self { ok, raw: reply })
    }
}

impl Reply for MetadataResponse {
    fn raw(&self) -> &Document {
        &self.raw
    }
}

pub(crate) fn expect<'a>(reply: &'a Document, field: &str) -> Result<&'a Bson, ProvenError> {
    reply.get(field).ok_or_else(|| ProvenError::malformed(field))
}

pub(crate) fn string(reply: &Document, field: &str) -> Result<String, ProvenError> {
    match expect(reply, field)? {
        Bson::String(value) => Ok(value.clone()),
        _ => Err(ProvenError::malformed(field)),
    }
}

/// Integral reply fields arrive as any of the three BSON numeric types
/// depending on server version, and a few proof fields as decimal strings.
pub(crate) fn integer(reply: &Document, field: &str) -> Result<i64, ProvenError> {
    match expect(reply, field)? {
        Bson::Int32(value) => Ok(i64::from(*value)),
        Bson::Int64(value) => Ok(*value),
        Bson::Double(value) => Ok(*value as i64),
        Bson::String(value) => value.parse().map_err(|_| ProvenError::malformed(field)),
        _ => Err(ProvenError::malformed(field)),
    }
}

pub(crate) fn document(reply: &Document, field: &str) -> Result<Document, ProvenError> {
    match expect(reply, field)? {
        Bson::Document(value) => Ok(value.clone()),
        _ => Err(ProvenError::malformed(field)),
    }
}

pub(crate) fn array<'a>(reply: &'a Document, field: &str) -> Result<&'a Vec<Bson>, ProvenError> {
    match expect(reply, field)? {
        Bson::Array(value) => Ok(value),
        _ => Err(ProvenError::malformed(field)),
    }
}

/// An array field whose entries must all be documents.
pub(crate) fn entry_documents<'a>(
    reply: &'a Document,
    field: &str,
) -> Result<Vec<&'a Document>, ProvenError> {
    array(reply, field)?
        .iter()
        .map(|entry| match entry {
            Bson::Document(doc) => Ok(doc),
            _ => Err(ProvenError::malformed(field)),
        })
        .collect()
}

/// Timestamps arrive as BSON datetimes or as RFC 3339 strings depending on
/// the operation.
pub(crate) fn date_time(reply: &Document, field: &str) -> Result<DateTime<Utc>, ProvenError> {
    match expect(reply, field)? {
        Bson::DateTime(value) => DateTime::from_timestamp_millis(value.timestamp_millis())
            .ok_or_else(|| ProvenError::malformed(field)),
        Bson::String(value) => value
            .parse::<DateTime<Utc>>()
            .map_err(|_| ProvenError::malformed(field)),
        _ => Err(ProvenError::malformed(field)),
    }
}
