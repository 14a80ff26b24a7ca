use super::{date_time, document, entry_documents, expect, integer, string, Reply};
use crate::errors::ProvenError;
use bson::{Bson, Document};
use chrono::{DateTime, Utc};
use serde::Serialize;

/// One version range in a document's history: the span of versions during
/// which the snapshot below was the document's content.
#[derive(Debug, Clone, Serialize)]
pub struct HistoryVersion {
    pub min_version: i64,
    pub max_version: i64,
    pub status: String,
    pub started: DateTime<Utc>,
    pub ended: DateTime<Utc>,
    pub document: Document,
    raw: Document,
}

impl HistoryVersion {
    pub fn from_entry(entry: &Document) -> Result<Self, ProvenError> {
        Ok(Self {
            min_version: integer(entry, "minVersion")?,
            max_version: integer(entry, "maxVersion")?,
            status: string(entry, "status")?,
            started: date_time(entry, "started")?,
            ended: date_time(entry, "ended")?,
            document: document(entry, "document")?,
            raw: entry.clone(),
        })
    }
}

impl Reply for HistoryVersion {
    fn raw(&self) -> &Document {
        &self.raw
    }
}

/// History of one document: its id and every version range it went through.
#[derive(Debug, Clone, Serialize)]
pub struct DocumentHistory {
    /// Collection the document lives in, when the server includes it.
    pub collection: Option<String>,
    pub id: Bson,
    pub versions: Vec<HistoryVersion>,
    raw: Document,
}

impl DocumentHistory {
    pub fn from_entry(entry: &Document) -> Result<Self, ProvenError> {
        let collection = match entry.get("collection") {
            Some(Bson::String(name)) => Some(name.clone()),
            _ => None,
        };
        let id = expect(entry, "_id")?.clone();
        // Newer servers nest the ranges under history.versions; older ones
        // put the versions array on the entry itself.
        let ranges = match entry.get("history") {
            Some(Bson::Document(history)) => entry_documents(history, "versions")?,
            _ => entry_documents(entry, "versions")?,
        };
        let versions =
            ranges.into_iter().map(HistoryVersion::from_entry).collect::<Result<_, _>>()?;
        Ok(Self { collection, id, versions, raw: entry.clone() })
    }
}

impl Reply for DocumentHistory {
    fn raw(&self) -> &Document {
        &self.raw
    }
}

/// Reply to `docHistory`: one entry per matched document.
#[derive(Debug, Clone, Serialize)]
pub struct DocumentHistoryResponse {
    pub history: Vec<DocumentHistory>,
    raw: Document,
}

impl DocumentHistoryResponse {
    pub fn from_reply(reply: Document) -> Result<Self, ProvenError> {
        let history = entry_documents(&reply, "docHistory")?
            .into_iter()
            .map(DocumentHistory::from_entry)
            .collect::<Result<_, _>>()?;
        Ok(Self { history, raw: reply })
    }
}

impl Reply for DocumentHistoryResponse {
    fn raw(&self) -> &Document {
        &self.raw
    }
}
