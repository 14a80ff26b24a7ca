//! Command builders and the argument types they accept.
//!
//! Every operation maps to one ordered BSON command document. `bson::Document`
//! preserves insertion order, and each builder emits the operation name as the
//! first key; this matters on the wire because the first key is the command
//! verb the server executes. Optional parameters are added only when the
//! caller supplied a value. The server treats an absent key and a key holding
//! a default differently, so omission is the contract here, never a null
//! placeholder.

use bson::{doc, Bson, Document};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Version identifier accepted by `setVersion`: a version number, a point in
/// time, or the literal `current`.
#[derive(Debug, Clone, PartialEq)]
pub enum VersionSpec {
    Number(i64),
    Date(DateTime<Utc>),
    Current,
}

impl VersionSpec {
    pub(crate) fn to_bson(&self) -> Bson {
        match self {
            Self::Number(version) => Bson::Int64(*version),
            Self::Date(date) => Bson::DateTime(bson::DateTime::from_millis(date.timestamp_millis())),
            Self::Current => Bson::String("current".to_string()),
        }
    }
}

impl From<i64> for VersionSpec {
    fn from(version: i64) -> Self {
        Self::Number(version)
    }
}

impl From<DateTime<Utc>> for VersionSpec {
    fn from(date: DateTime<Utc>) -> Self {
        Self::Date(date)
    }
}

impl fmt::Display for VersionSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(version) => write!(f, "{version}"),
            Self::Date(date) => write!(f, "{}", date.to_rfc3339()),
            Self::Current => f.write_str("current"),
        }
    }
}

/// Sort order for `listVersions`, encoded as the server expects (1 / -1).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortDirection {
    Ascending,
    Descending,
}

impl SortDirection {
    pub(crate) fn as_i32(self) -> i32 {
        match self {
            Self::Ascending => 1,
            Self::Descending => -1,
        }
    }
}

/// Encoding requested for proof payloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProofFormat {
    Json,
    Binary,
}

impl ProofFormat {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Binary => "binary",
        }
    }
}

/// Sub-verb of the `bulkLoad` command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BulkLoadAction {
    Start,
    Stop,
    Kill,
    Status,
}

impl BulkLoadAction {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::Stop => "stop",
            Self::Kill => "kill",
            Self::Status => "status",
        }
    }
}

/// Optional parameters of `listVersions`. Unset fields are omitted from the
/// command so the server-side defaults apply.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListVersionsOptions {
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub limit: Option<i64>,
    pub sort_direction: Option<SortDirection>,
}

/// Optional range bounds for `forget` preparation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ForgetOptions {
    pub min_version: Option<i64>,
    pub max_version: Option<i64>,
    pub inclusive_range: Option<bool>,
}

/// Optional parameters of `submitProof`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SubmitProofOptions {
    pub collections: Option<Vec<String>>,
    pub filter: Option<Document>,
    /// Ledger the proof is anchored to, e.g. `ETH` or `BTC`.
    pub anchor_type: Option<String>,
    pub n_checks: Option<i32>,
}

/// Optional parameters of `getVersionProof`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VersionProofOptions {
    pub format: Option<ProofFormat>,
    pub list_collections: Option<bool>,
}

/// Argument of `getVersionProof`: either a proof id or a version number.
#[derive(Debug, Clone, PartialEq)]
pub enum VersionProofArg {
    ProofId(String),
    Version(i64),
}

impl VersionProofArg {
    pub(crate) fn to_bson(&self) -> Bson {
        match self {
            Self::ProofId(id) => Bson::String(id.clone()),
            Self::Version(version) => Bson::Int64(*version),
        }
    }
}

impl From<&str> for VersionProofArg {
    fn from(proof_id: &str) -> Self {
        Self::ProofId(proof_id.to_string())
    }
}

impl From<String> for VersionProofArg {
    fn from(proof_id: String) -> Self {
        Self::ProofId(proof_id)
    }
}

impl From<i64> for VersionProofArg {
    fn from(version: i64) -> Self {
        Self::Version(version)
    }
}

fn bson_date(date: DateTime<Utc>) -> Bson {
    Bson::DateTime(bson::DateTime::from_millis(date.timestamp_millis()))
}

pub fn get_version() -> Document {
    doc! { "getVersion": 1 }
}

pub fn set_version(version: &VersionSpec) -> Document {
    doc! { "setVersion": version.to_bson() }
}

pub fn list_versions(options: &ListVersionsOptions) -> Document {
    let mut args = Document::new();
    if let Some(start) = options.start_date {
        args.insert("startDate", bson_date(start));
    }
    if let Some(end) = options.end_date {
        args.insert("endDate", bson_date(end));
    }
    if let Some(limit) = options.limit {
        args.insert("limit", limit);
    }
    if let Some(direction) = options.sort_direction {
        args.insert("sortDirection", direction.as_i32());
    }
    doc! { "listVersions": args }
}

pub fn bulk_load(action: BulkLoadAction) -> Document {
    doc! { "bulkLoad": action.as_str() }
}

pub fn compact_versions(
    start_version: i64,
    end_version: i64,
    destroy_proofs: Option<bool>,
) -> Document {
    let mut args = doc! { "startVersion": start_version, "endVersion": end_version };
    if let Some(destroy) = destroy_proofs {
        args.insert("destroyProofs", destroy);
    }
    doc! { "compact": args }
}

pub fn create_ignored(collection: &str) -> Document {
    doc! { "createIgnored": collection }
}

pub fn doc_history(collection: &str, filter: Document, projection: Option<Document>) -> Document {
    let mut args = doc! { "collection": collection, "filter": filter };
    if let Some(projection) = projection {
        args.insert("projection", projection);
    }
    doc! { "docHistory": args }
}

pub fn forget_prepare(collection: &str, filter: Document, options: &ForgetOptions) -> Document {
    let mut args = doc! { "collection": collection, "filter": filter };
    if let Some(min) = options.min_version {
        args.insert("minVersion", min);
    }
    if let Some(max) = options.max_version {
        args.insert("maxVersion", max);
    }
    if let Some(inclusive) = options.inclusive_range {
        args.insert("inclusiveRange", inclusive);
    }
    doc! { "forget": { "prepare": args } }
}

pub fn forget_execute(forget_id: i64, password: &str) -> Document {
    doc! { "forget": { "execute": { "forgetId": forget_id, "password": password } } }
}

pub fn get_document_proof(
    collection: &str,
    filter: Document,
    version: i64,
    format: Option<ProofFormat>,
) -> Document {
    let mut args = doc! { "collection": collection, "filter": filter, "version": version };
    if let Some(format) = format {
        args.insert("format", format.as_str());
    }
    doc! { "getDocumentProof": args }
}

/// `getVersionProof` carries its optional keys beside the verb rather than in
/// a nested args document, so the verb must be inserted before them.
pub fn get_version_proof(target: &VersionProofArg, options: &VersionProofOptions) -> Document {
    let mut command = doc! { "getVersionProof": target.to_bson() };
    if let Some(format) = options.format {
        command.insert("format", format.as_str());
    }
    if let Some(list) = options.list_collections {
        command.insert("listCollections", list);
    }
    command
}

pub fn list_storage() -> Document {
    doc! { "listStorage": 1 }
}

pub fn rollback() -> Document {
    doc! { "rollback": 1 }
}

pub fn show_metadata() -> Document {
    doc! { "showMetadata": 1 }
}

pub fn hide_metadata() -> Document {
    doc! { "hideMetadata": 1 }
}

/// Like `getVersionProof`, `submitProof` is a flat command: the verb first,
/// then any supplied optionals in a fixed order (collections, filter,
/// anchorType, nChecks).
pub fn submit_proof(version: i64, options: &SubmitProofOptions) -> Document {
    let mut command = doc! { "submitProof": version };
    if let Some(collections) = &options.collections {
        command.insert("collections", collections.clone());
    }
    if let Some(filter) = &options.filter {
        command.insert("filter", filter.clone());
    }
    if let Some(anchor) = &options.anchor_type {
        command.insert("anchorType", anchor.as_str());
    }
    if let Some(n_checks) = options.n_checks {
        command.insert("nChecks", n_checks);
    }
    command
}

pub fn verify_proof(proof_id: &str, format: Option<ProofFormat>) -> Document {
    let mut command = doc! { "verifyProof": proof_id };
    if let Some(format) = format {
        command.insert("format", format.as_str());
    }
    command
}
