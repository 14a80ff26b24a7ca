use crate::command::{BulkLoadAction, VersionSpec};
use thiserror::Error;

/// Failure reported by the underlying driver or carried in-band by a reply.
///
/// The dispatcher folds both shapes into this one type so the per-operation
/// translation never needs to know which path a failure took.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct DriverError {
    /// Human-readable driver or server message.
    pub message: String,
    /// Numeric server error code, when the driver exposes one.
    pub code: Option<i32>,
    /// Originating low-level error, kept for deeper diagnosis by callers.
    #[source]
    pub cause: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl DriverError {
    pub fn new(message: impl Into<String>) -> Self {
        Self { message: message.into(), code: None, cause: None }
    }

    pub fn with_code(message: impl Into<String>, code: i32) -> Self {
        Self { message: message.into(), code: Some(code), cause: None }
    }

    pub fn with_cause(
        message: impl Into<String>,
        cause: Box<dyn std::error::Error + Send + Sync>,
    ) -> Self {
        Self { message: message.into(), code: None, cause: Some(cause) }
    }
}

/// One variant per operation family. Every variant keeps the full message
/// (database name plus the driver's own text) and, for remote failures, the
/// originating [`DriverError`] as its source.
#[derive(Debug, Error)]
pub enum ProvenError {
    #[error("get version: {message}")]
    GetVersion {
        message: String,
        #[source]
        source: Option<DriverError>,
    },

    #[error("set version: {message}")]
    SetVersion {
        message: String,
        #[source]
        source: Option<DriverError>,
    },

    #[error("list versions: {message}")]
    ListVersions {
        message: String,
        #[source]
        source: Option<DriverError>,
    },

    #[error("bulk load: {message}")]
    BulkLoad {
        message: String,
        #[source]
        source: Option<DriverError>,
    },

    /// Raised locally by the pre-flight check or remotely by the server when
    /// a start is requested while a bulk load is running.
    #[error("bulk load already started: {message}")]
    BulkLoadAlreadyStarted {
        message: String,
        #[source]
        source: Option<DriverError>,
    },

    /// Raised locally by the pre-flight check or remotely by the server when
    /// a stop or kill is requested with no bulk load running.
    #[error("bulk load not started: {message}")]
    BulkLoadNotStarted {
        message: String,
        #[source]
        source: Option<DriverError>,
    },

    #[error("compact: {message}")]
    Compact {
        message: String,
        #[source]
        source: Option<DriverError>,
    },

    #[error("compact rejected a version argument: {message}")]
    CompactInvalidValue {
        message: String,
        #[source]
        source: Option<DriverError>,
    },

    #[error("compact requires a proof above the range: {message}")]
    CompactProofAboveRange {
        message: String,
        #[source]
        source: Option<DriverError>,
    },

    #[error("create ignored: {message}")]
    CreateIgnored {
        message: String,
        #[source]
        source: Option<DriverError>,
    },

    #[error("document history: {message}")]
    DocumentHistory {
        message: String,
        #[source]
        source: Option<DriverError>,
    },

    #[error("forget prepare: {message}")]
    ForgetPrepare {
        message: String,
        #[source]
        source: Option<DriverError>,
    },

    #[error("forget execute: {message}")]
    ForgetExecute {
        message: String,
        #[source]
        source: Option<DriverError>,
    },

    #[error("document proof: {message}")]
    DocumentProof {
        message: String,
        #[source]
        source: Option<DriverError>,
    },

    #[error("version proof: {message}")]
    VersionProof {
        message: String,
        #[source]
        source: Option<DriverError>,
    },

    #[error("rollback: {message}")]
    Rollback {
        message: String,
        #[source]
        source: Option<DriverError>,
    },

    #[error("list storage: {message}")]
    ListStorage {
        message: String,
        #[source]
        source: Option<DriverError>,
    },

    #[error("metadata toggle: {message}")]
    Metadata {
        message: String,
        #[source]
        source: Option<DriverError>,
    },

    #[error("submit proof: {message}")]
    SubmitProof {
        message: String,
        #[source]
        source: Option<DriverError>,
    },

    #[error("verify proof: {message}")]
    VerifyProof {
        message: String,
        #[source]
        source: Option<DriverError>,
    },

    /// A reply lacked a field its view contract requires. This indicates a
    /// contract mismatch with the server, not a recoverable condition.
    #[error("malformed reply: missing or mistyped field `{field}`")]
    MalformedReply { field: String },
}

impl ProvenError {
    pub(crate) fn malformed(field: impl Into<String>) -> Self {
        Self::MalformedReply { field: field.into() }
    }

    pub(crate) fn get_version(db: &str, err: DriverError) -> Self {
        Self::GetVersion {
            message: format!("failed to get version from db {db}: {err}"),
            source: Some(err),
        }
    }

    pub(crate) fn set_version(db: &str, version: &VersionSpec, err: DriverError) -> Self {
        Self::SetVersion {
            message: format!("failed to set version {version} on db {db}: {err}"),
            source: Some(err),
        }
    }

    pub(crate) fn list_versions(db: &str, err: DriverError) -> Self {
        Self::ListVersions {
            message: format!("failed to list versions of db {db}: {err}"),
            source: Some(err),
        }
    }

    /// Translates a remote bulk-load failure, picking the already-started or
    /// not-started sub-kind where the server's answer identifies one.
    ///
    /// ProvenDB does not publish stable codes for these rejections, so the
    /// discriminator falls back to message text. The message strings are not
    /// a stable contract; revisit when codes appear.
    pub(crate) fn bulk_load(db: &str, action: BulkLoadAction, err: DriverError) -> Self {
        let message = format!("failed to run bulk load {} on db {db}: {err}", action.as_str());
        let lowered = err.message.to_ascii_lowercase();
        if lowered.contains("already") {
            Self::BulkLoadAlreadyStarted { message, source: Some(err) }
        } else if lowered.contains("not started")
            || lowered.contains("not running")
            || lowered.contains("no bulk load")
        {
            Self::BulkLoadNotStarted { message, source: Some(err) }
        } else {
            Self::BulkLoad { message, source: Some(err) }
        }
    }

    pub(crate) fn bulk_load_already_started(db: &str) -> Self {
        Self::BulkLoadAlreadyStarted {
            message: format!("bulk load is already started on db {db}"),
            source: None,
        }
    }

    pub(crate) fn bulk_load_not_started(db: &str, action: BulkLoadAction) -> Self {
        Self::BulkLoadNotStarted {
            message: format!(
                "cannot {} bulk load on db {db}: no bulk load is running",
                action.as_str()
            ),
            source: None,
        }
    }

    /// Same fallback caveat as [`ProvenError::bulk_load`]: sub-kinds are
    /// picked from message text until the server exposes stable codes.
    pub(crate) fn compact(
        db: &str,
        start_version: i64,
        end_version: i64,
        err: DriverError,
    ) -> Self {
        let message =
            format!("failed to compact versions {start_version}..={end_version} on db {db}: {err}");
        let lowered = err.message.to_ascii_lowercase();
        if lowered.contains("proof") && (lowered.contains("above") || lowered.contains("after")) {
            Self::CompactProofAboveRange { message, source: Some(err) }
        } else if lowered.contains("invalid") || lowered.contains("must be") {
            Self::CompactInvalidValue { message, source: Some(err) }
        } else {
            Self::Compact { message, source: Some(err) }
        }
    }

    pub(crate) fn create_ignored(db: &str, collection: &str, err: DriverError) -> Self {
        Self::CreateIgnored {
            message: format!("failed to ignore collection {collection} on db {db}: {err}"),
            source: Some(err),
        }
    }

    pub(crate) fn doc_history(db: &str, collection: &str, err: DriverError) -> Self {
        Self::DocumentHistory {
            message: format!(
                "failed to get document history of collection {collection} on db {db}: {err}"
            ),
            source: Some(err),
        }
    }

    pub(crate) fn forget_prepare(db: &str, collection: &str, err: DriverError) -> Self {
        Self::ForgetPrepare {
            message: format!(
                "failed to prepare forget on collection {collection} of db {db}: {err}"
            ),
            source: Some(err),
        }
    }

    pub(crate) fn forget_execute(db: &str, forget_id: i64, err: DriverError) -> Self {
        Self::ForgetExecute {
            message: format!("failed to execute forget {forget_id} on db {db}: {err}"),
            source: Some(err),
        }
    }

    pub(crate) fn document_proof(db: &str, collection: &str, err: DriverError) -> Self {
        Self::DocumentProof {
            message: format!(
                "failed to get document proofs for collection {collection} on db {db}: {err}"
            ),
            source: Some(err),
        }
    }

    pub(crate) fn version_proof(db: &str, err: DriverError) -> Self {
        Self::VersionProof {
            message: format!("failed to get version proof from db {db}: {err}"),
            source: Some(err),
        }
    }

    pub(crate) fn rollback(db: &str, err: DriverError) -> Self {
        Self::Rollback {
            message: format!("failed to rollback db {db}: {err}"),
            source: Some(err),
        }
    }

    pub(crate) fn list_storage(db: &str, err: DriverError) -> Self {
        Self::ListStorage {
            message: format!("failed to list storage of db {db}: {err}"),
            source: Some(err),
        }
    }

    pub(crate) fn metadata(db: &str, err: DriverError) -> Self {
        Self::Metadata {
            message: format!("failed to toggle metadata on db {db}: {err}"),
            source: Some(err),
        }
    }

    pub(crate) fn submit_proof(db: &str, version: i64, err: DriverError) -> Self {
        Self::SubmitProof {
            message: format!("failed to submit proof for version {version} of db {db}: {err}"),
            source: Some(err),
        }
    }

    pub(crate) fn verify_proof(db: &str, proof_id: &str, err: DriverError) -> Self {
        Self::VerifyProof {
            message: format!("failed to verify proof {proof_id} on db {db}: {err}"),
            source: Some(err),
        }
    }
}
