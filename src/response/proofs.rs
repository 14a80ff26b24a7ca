use super::{date_time, entry_documents, expect, integer, string, Reply};
use crate::errors::ProvenError;
use bson::{oid::ObjectId, Bson, Document};
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Everything the server attests about one successfully proven document.
#[derive(Debug, Clone, Serialize)]
pub struct DocumentProofDetail {
    pub collection: String,
    pub scope: String,
    pub proven_db_id: String,
    pub document_id: Bson,
    pub version: i64,
    pub status: String,
    pub btc_transaction: String,
    pub btc_block_number: i64,
    pub version_proof_id: String,
    pub document_hash: String,
    pub version_hash: String,
    /// Raw proof payload in whichever format was requested.
    pub proof: Bson,
    raw: Document,
}

impl DocumentProofDetail {
    fn from_entry(entry: &Document) -> Result<Self, ProvenError> {
        Ok(Self {
            collection: string(entry, "collection")?,
            scope: string(entry, "scope")?,
            proven_db_id: string(entry, "ProvenDbId")?,
            document_id: expect(entry, "documentId")?.clone(),
            version: integer(entry, "version")?,
            status: string(entry, "status")?,
            btc_transaction: string(entry, "btcTransaction")?,
            btc_block_number: integer(entry, "btcBlockNumber")?,
            version_proof_id: string(entry, "versionProofId")?,
            document_hash: string(entry, "documentHash")?,
            version_hash: string(entry, "versionHash")?,
            proof: expect(entry, "proof")?.clone(),
            raw: entry.clone(),
        })
    }
}

impl Reply for DocumentProofDetail {
    fn raw(&self) -> &Document {
        &self.raw
    }
}

/// A per-document proof the server could not produce. Only the error message
/// is available on this variant.
#[derive(Debug, Clone, Serialize)]
pub struct FailedDocumentProof {
    pub errmsg: String,
    raw: Document,
}

impl FailedDocumentProof {
    fn from_entry(entry: &Document) -> Result<Self, ProvenError> {
        Ok(Self { errmsg: string(entry, "errmsg")?, raw: entry.clone() })
    }
}

impl Reply for FailedDocumentProof {
    fn raw(&self) -> &Document {
        &self.raw
    }
}

/// One entry of a `getDocumentProof` reply. Entries are polymorphic: the
/// presence of an `errmsg` field marks a failure, its absence a success.
/// A failed proof inside an otherwise successful batch is data, not an error;
/// callers inspect each entry.
#[derive(Debug, Clone, Serialize)]
pub enum DocumentProof {
    Success(DocumentProofDetail),
    Failed(FailedDocumentProof),
}

impl DocumentProof {
    pub fn from_entry(entry: &Document) -> Result<Self, ProvenError> {
        if entry.contains_key("errmsg") {
            Ok(Self::Failed(FailedDocumentProof::from_entry(entry)?))
        } else {
            Ok(Self::Success(DocumentProofDetail::from_entry(entry)?))
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    /// The failure message, when this entry is a failure.
    pub fn errmsg(&self) -> Option<&str> {
        match self {
            Self::Failed(failed) => Some(&failed.errmsg),
            Self::Success(_) => None,
        }
    }
}

/// Reply to `getDocumentProof`.
#[derive(Debug, Clone, Serialize)]
pub struct DocumentProofResponse {
    pub proofs: Vec<DocumentProof>,
    raw: Document,
}

impl DocumentProofResponse {
    pub fn from_reply(reply: Document) -> Result<Self, ProvenError> {
        let proofs = entry_documents(&reply, "proofs")?
            .into_iter()
            .map(DocumentProof::from_entry)
            .collect::<Result<_, _>>()?;
        Ok(Self { proofs, raw: reply })
    }
}

impl Reply for DocumentProofResponse {
    fn raw(&self) -> &Document {
        &self.raw
    }
}

/// One entry of a `getVersionProof` reply.
#[derive(Debug, Clone, Serialize)]
pub struct VersionProofSummary {
    pub object_id: ObjectId,
    pub proof_id: String,
    raw: Document,
}

impl VersionProofSummary {
    pub fn from_entry(entry: &Document) -> Result<Self, ProvenError> {
        let object_id = match expect(entry, "_id")? {
            Bson::ObjectId(oid) => *oid,
            _ => return Err(ProvenError::malformed("_id")),
        };
        Ok(Self { object_id, proof_id: string(entry, "proofId")?, raw: entry.clone() })
    }
}

impl Reply for VersionProofSummary {
    fn raw(&self) -> &Document {
        &self.raw
    }
}

/// Reply to `getVersionProof`.
#[derive(Debug, Clone, Serialize)]
pub struct VersionProofResponse {
    pub proofs: Vec<VersionProofSummary>,
    raw: Document,
}

impl VersionProofResponse {
    pub fn from_reply(reply: Document) -> Result<Self, ProvenError> {
        let proofs = entry_documents(&reply, "proofs")?
            .into_iter()
            .map(VersionProofSummary::from_entry)
            .collect::<Result<_, _>>()?;
        Ok(Self { proofs, raw: reply })
    }
}

impl Reply for VersionProofResponse {
    fn raw(&self) -> &Document {
        &self.raw
    }
}

/// Reply to `submitProof`: the version that was anchored and the identity of
/// the resulting proof.
#[derive(Debug, Clone, Serialize)]
pub struct SubmitProofResponse {
    pub version: i64,
    pub date_time: DateTime<Utc>,
    pub hash: String,
    pub proof_id: String,
    pub status: String,
    raw: Document,
}

impl SubmitProofResponse {
    pub fn from_reply(reply: Document) -> Result<Self, ProvenError> {
        Ok(Self {
            version: integer(&reply, "version")?,
            date_time: date_time(&reply, "dateTime")?,
            hash: string(&reply, "hash")?,
            proof_id: string(&reply, "proofId")?,
            status: string(&reply, "status")?,
            raw: reply,
        })
    }
}

impl Reply for SubmitProofResponse {
    fn raw(&self) -> &Document {
        &self.raw
    }
}

/// Reply to `verifyProof`.
#[derive(Debug, Clone, Serialize)]
pub struct VerifyProofResponse {
    pub proof: Bson,
    pub proof_id: String,
    pub proof_status: String,
    pub version: i64,
    raw: Document,
}

impl VerifyProofResponse {
    pub fn from_reply(reply: Document) -> Result<Self, ProvenError> {
        Ok(Self {
            proof: expect(&reply, "proof")?.clone(),
            proof_id: string(&reply, "proofId")?,
            proof_status: string(&reply, "proofStatus")?,
            version: integer(&reply, "version")?,
            raw: reply,
        })
    }
}

impl Reply for VerifyProofResponse {
    fn raw(&self) -> &Document {
        &self.raw
    }
}
