use super::{entry_documents, integer, string, Reply};
use crate::errors::ProvenError;
use bson::{Bson, Document};
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Reply to `getVersion` and `setVersion`: the confirmation text, the version
/// number the database is now pinned to, and its status (`current` or
/// `userDefined`).
#[derive(Debug, Clone, Serialize)]
pub struct VersionResponse {
    pub response: String,
    pub version: i64,
    pub status: String,
    raw: Document,
}

impl VersionResponse {
    pub fn from_reply(reply: Document) -> Result<Self, ProvenError> {
        let response = string(&reply, "response")?;
        let version = integer(&reply, "version")?;
        let status = string(&reply, "status")?;
        Ok(Self { response, version, status, raw: reply })
    }
}

impl Reply for VersionResponse {
    fn raw(&self) -> &Document {
        &self.raw
    }
}

/// One entry of a `listVersions` reply.
#[derive(Debug, Clone, Serialize)]
pub struct VersionSummary {
    pub version: i64,
    pub status: String,
    pub effective_date: DateTime<Utc>,
    raw: Document,
}

impl VersionSummary {
    pub fn from_entry(entry: &Document) -> Result<Self, ProvenError> {
        Ok(Self {
            version: integer(entry, "version")?,
            status: string(entry, "status")?,
            effective_date: super::date_time(entry, "effectiveDate")?,
            raw: entry.clone(),
        })
    }
}

impl Reply for VersionSummary {
    fn raw(&self) -> &Document {
        &self.raw
    }
}

/// Reply to `listVersions`: the matching versions in the requested order.
#[derive(Debug, Clone, Serialize)]
pub struct ListVersionsResponse {
    pub versions: Vec<VersionSummary>,
    raw: Document,
}

impl ListVersionsResponse {
    pub fn from_reply(reply: Document) -> Result<Self, ProvenError> {
        let versions = entry_documents(&reply, "versions")?
            .into_iter()
            .map(VersionSummary::from_entry)
            .collect::<Result<_, _>>()?;
        Ok(Self { versions, raw: reply })
    }
}

impl Reply for ListVersionsResponse {
    fn raw(&self) -> &Document {
        &self.raw
    }
}

/// Reply to `compact`: how much the operation removed.
#[derive(Debug, Clone, Serialize)]
pub struct CompactResponse {
    pub proofs_deleted: i64,
    pub versions_deleted: i64,
    raw: Document,
}

impl CompactResponse {
    pub fn from_reply(reply: Document) -> Result<Self, ProvenError> {
        let proofs_deleted = integer(&reply, "nProofsDeleted")?;
        let versions_deleted = integer(&reply, "nVersionsDeleted")?;
        Ok(Self { proofs_deleted, versions_deleted, raw: reply })
    }
}

impl Reply for CompactResponse {
    fn raw(&self) -> &Document {
        &self.raw
    }
}

/// One database rolled back to a version.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RollbackVersion {
    pub database: String,
    pub version: i64,
}

/// Reply to `rollback`. The server answers with a list of single-pair
/// `{database: version}` documents; each pair becomes one entry here.
#[derive(Debug, Clone, Serialize)]
pub struct RollbackResponse {
    pub versions: Vec<RollbackVersion>,
    raw: Document,
}

impl RollbackResponse {
    pub fn from_reply(reply: Document) -> Result<Self, ProvenError> {
        let mut versions = Vec::new();
        for entry in entry_documents(&reply, "version")? {
            for (database, value) in entry.iter() {
                let version = match value {
                    Bson::Int32(v) => i64::from(*v),
                    Bson::Int64(v) => *v,
                    Bson::Double(v) => *v as i64,
                    _ => return Err(ProvenError::malformed("version")),
                };
                versions.push(RollbackVersion { database: database.to_string(), version });
            }
        }
        Ok(Self { versions, raw: reply })
    }
}

impl Reply for RollbackResponse {
    fn raw(&self) -> &Document {
        &self.raw
    }
}
