use super::{document, integer, string, Reply};
use crate::errors::ProvenError;
use bson::Document;
use serde::Serialize;

/// Summary counts returned by forget preparation.
#[derive(Debug, Clone, Serialize)]
pub struct ForgetPrepareSummary {
    pub documents_to_be_forgotten: i64,
    pub unique_documents: i64,
    raw: Document,
}

impl ForgetPrepareSummary {
    fn from_entry(entry: Document) -> Result<Self, ProvenError> {
        Ok(Self {
            documents_to_be_forgotten: integer(&entry, "documentsToBeForgotten")?,
            unique_documents: integer(&entry, "uniqueDocuments")?,
            raw: entry,
        })
    }
}

impl Reply for ForgetPrepareSummary {
    fn raw(&self) -> &Document {
        &self.raw
    }
}

/// Reply to the forget prepare phase: the id and password needed to confirm
/// the forget, plus what it will affect.
#[derive(Debug, Clone, Serialize)]
pub struct ForgetPrepareResponse {
    pub forget_id: i64,
    pub password: String,
    pub summary: ForgetPrepareSummary,
    raw: Document,
}

impl ForgetPrepareResponse {
    pub fn from_reply(reply: Document) -> Result<Self, ProvenError> {
        Ok(Self {
            forget_id: integer(&reply, "forgetId")?,
            password: string(&reply, "password")?,
            summary: ForgetPrepareSummary::from_entry(document(&reply, "forgetSummary")?)?,
            raw: reply,
        })
    }
}

impl Reply for ForgetPrepareResponse {
    fn raw(&self) -> &Document {
        &self.raw
    }
}

/// Summary counts returned by forget execution.
#[derive(Debug, Clone, Serialize)]
pub struct ForgetExecuteSummary {
    pub documents_forgotten: i64,
    pub unique_documents: i64,
    raw: Document,
}

impl ForgetExecuteSummary {
    fn from_entry(entry: Document) -> Result<Self, ProvenError> {
        Ok(Self {
            documents_forgotten: integer(&entry, "documentsForgotten")?,
            unique_documents: integer(&entry, "uniqueDocuments")?,
            raw: entry,
        })
    }
}

impl Reply for ForgetExecuteSummary {
    fn raw(&self) -> &Document {
        &self.raw
    }
}

/// Reply to the forget execute phase.
#[derive(Debug, Clone, Serialize)]
pub struct ForgetExecuteResponse {
    pub status: String,
    pub summary: ForgetExecuteSummary,
    raw: Document,
}

impl ForgetExecuteResponse {
    pub fn from_reply(reply: Document) -> Result<Self, ProvenError> {
        Ok(Self {
            status: string(&reply, "status")?,
            summary: ForgetExecuteSummary::from_entry(document(&reply, "forgetSummary")?)?,
            raw: reply,
        })
    }
}

impl Reply for ForgetExecuteResponse {
    fn raw(&self) -> &Document {
        &self.raw
    }
}
