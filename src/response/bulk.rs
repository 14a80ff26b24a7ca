use super::{integer, string, Reply};
use crate::errors::ProvenError;
use bson::Document;
use serde::{Deserialize, Serialize};

/// Whether the database is currently in bulk-load mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BulkLoadStatus {
    On,
    Off,
}

impl BulkLoadStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::On => "on",
            Self::Off => "off",
        }
    }

    fn parse(value: &str) -> Result<Self, ProvenError> {
        match value.to_ascii_lowercase().as_str() {
            "on" => Ok(Self::On),
            "off" => Ok(Self::Off),
            _ => Err(ProvenError::malformed("status")),
        }
    }
}

/// Reply to `bulkLoad: start`, carrying the version the load writes into.
#[derive(Debug, Clone, Serialize)]
pub struct BulkLoadStartResponse {
    pub version: i64,
    raw: Document,
}

impl BulkLoadStartResponse {
    pub fn from_reply(reply: Document) -> Result<Self, ProvenError> {
        let version = integer(&reply, "version")?;
        Ok(Self { version, raw: reply })
    }
}

impl Reply for BulkLoadStartResponse {
    fn raw(&self) -> &Document {
        &self.raw
    }
}

/// Reply to `bulkLoad: stop`.
#[derive(Debug, Clone, Serialize)]
pub struct BulkLoadStopResponse {
    raw: Document,
}

impl BulkLoadStopResponse {
    pub fn from_reply(reply: Document) -> Result<Self, ProvenError> {
        Ok(Self { raw: reply })
    }
}

impl Reply for BulkLoadStopResponse {
    fn raw(&self) -> &Document {
        &self.raw
    }
}

/// Reply to `bulkLoad: kill`, which stops the load regardless of outstanding
/// operations.
#[derive(Debug, Clone, Serialize)]
pub struct BulkLoadKillResponse {
    raw: Document,
}

impl BulkLoadKillResponse {
    pub fn from_reply(reply: Document) -> Result<Self, ProvenError> {
        Ok(Self { raw: reply })
    }
}

impl Reply for BulkLoadKillResponse {
    fn raw(&self) -> &Document {
        &self.raw
    }
}

/// Reply to `bulkLoad: status`.
#[derive(Debug, Clone, Serialize)]
pub struct BulkLoadStatusResponse {
    pub status: BulkLoadStatus,
    raw: Document,
}

impl BulkLoadStatusResponse {
    pub fn from_reply(reply: Document) -> Result<Self, ProvenError> {
        let status = BulkLoadStatus::parse(&string(&reply, "status")?)?;
        Ok(Self { status, raw: reply })
    }
}

impl Reply for BulkLoadStatusResponse {
    fn raw(&self) -> &Document {
        &self.raw
    }
}
