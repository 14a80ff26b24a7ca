//! Typed client for ProvenDB administrative commands.
//!
//! ProvenDB speaks the MongoDB wire protocol and adds its own administrative
//! commands for version control, bulk loading, document history, forgetting,
//! blockchain proofs, and storage listing. This crate wraps a caller-supplied
//! database handle (any implementor of [`DatabaseHandle`]) and exposes those
//! commands as typed methods on [`ProvenDb`]: each call builds an ordered BSON
//! command document, runs it through the handle, translates failures into the
//! [`ProvenError`] taxonomy, and wraps the raw reply in an immutable view that
//! exposes both named fields and raw key lookup.
//!
//! Every operation is one synchronous, blocking round trip. The crate holds
//! no connection state of its own; cancellation, timeouts, and retries belong
//! to the underlying driver and the caller.

pub mod command;
pub mod errors;
pub mod handle;
pub mod logger;
pub mod response;

use parking_lot::Mutex;

pub use command::{
    BulkLoadAction, ForgetOptions, ListVersionsOptions, ProofFormat, SortDirection,
    SubmitProofOptions, VersionProofArg, VersionProofOptions, VersionSpec,
};
pub use errors::{DriverError, ProvenError};
pub use handle::DatabaseHandle;
pub use response::{
    BulkLoadKillResponse, BulkLoadStartResponse, BulkLoadStatus, BulkLoadStatusResponse,
    BulkLoadStopResponse, CollectionStorage, CompactResponse, CreateIgnoredResponse,
    DocumentHistory, DocumentHistoryResponse, DocumentProof, DocumentProofDetail,
    DocumentProofResponse, FailedDocumentProof, ForgetExecuteResponse, ForgetExecuteSummary,
    ForgetPrepareResponse, ForgetPrepareSummary, HistoryVersion, ListStorageResponse,
    ListVersionsResponse, MetadataResponse, Reply, RollbackResponse, RollbackVersion,
    SubmitProofResponse, VerifyProofResponse, VersionProofResponse, VersionProofSummary,
    VersionResponse, VersionSummary,
};

use bson::Document;

/// Last-known bulk-load state, used only for the pre-flight short-circuit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BulkLoadState {
    On,
    Off,
}

/// The ProvenDB wrapper around an open database handle.
///
/// The wrapper never owns the handle's lifecycle; it only issues commands
/// through it. All operations take `&self` and the wrapper is safe to share
/// across threads when the handle is, but interleaving correctness (for
/// example a status check followed by a stop) is the caller's responsibility.
pub struct ProvenDb<D: DatabaseHandle> {
    db: D,
    bulk_load: Mutex<BulkLoadState>,
}

impl<D: DatabaseHandle> ProvenDb<D> {
    /// Wraps an open database handle.
    pub fn new(db: D) -> Self {
        Self { db, bulk_load: Mutex::new(BulkLoadState::Off) }
    }

    /// Name of the wrapped logical database.
    pub fn name(&self) -> &str {
        self.db.name()
    }

    /// Borrows the wrapped handle.
    pub fn handle(&self) -> &D {
        &self.db
    }

    /// Gives the wrapped handle back to the caller.
    pub fn into_inner(self) -> D {
        self.db
    }

    /// Addresses a named collection of the wrapped database.
    pub fn collection(&self, name: &str) -> D::Collection {
        self.db.collection(name)
    }

    /// Gets the version the database is currently set to.
    pub fn get_version(&self) -> Result<VersionResponse, ProvenError> {
        let reply = handle::dispatch(&self.db, command::get_version())
            .map_err(|err| ProvenError::get_version(self.db.name(), err))?;
        VersionResponse::from_reply(reply)
    }

    /// Sets the database to a version number, a point in time, or back to
    /// `current`.
    pub fn set_version(
        &self,
        version: impl Into<VersionSpec>,
    ) -> Result<VersionResponse, ProvenError> {
        let version = version.into();
        let reply = handle::dispatch(&self.db, command::set_version(&version))
            .map_err(|err| ProvenError::set_version(self.db.name(), &version, err))?;
        VersionResponse::from_reply(reply)
    }

    /// Lists versions matching the given search window. Unset options are
    /// omitted from the command so server-side defaults apply.
    pub fn list_versions(
        &self,
        options: &ListVersionsOptions,
    ) -> Result<ListVersionsResponse, ProvenError> {
        let reply = handle::dispatch(&self.db, command::list_versions(options))
            .map_err(|err| ProvenError::list_versions(self.db.name(), err))?;
        ListVersionsResponse::from_reply(reply)
    }

    /// Starts a bulk load. Short-circuits locally with
    /// [`ProvenError::BulkLoadAlreadyStarted`] when the last-known state says
    /// one is already running; the state may have changed on the server since
    /// it was cached, so this is a convenience, not a guarantee.
    pub fn bulk_load_start(&self) -> Result<BulkLoadStartResponse, ProvenError> {
        if *self.bulk_load.lock() == BulkLoadState::On {
            return Err(ProvenError::bulk_load_already_started(self.db.name()));
        }
        match handle::dispatch(&self.db, command::bulk_load(BulkLoadAction::Start)) {
            Ok(reply) => {
                let response = BulkLoadStartResponse::from_reply(reply)?;
                *self.bulk_load.lock() = BulkLoadState::On;
                Ok(response)
            }
            Err(err) => Err(self.resync_bulk_load(ProvenError::bulk_load(
                self.db.name(),
                BulkLoadAction::Start,
                err,
            ))),
        }
    }

    /// Stops the running bulk load once outstanding operations finish.
    /// Short-circuits locally with [`ProvenError::BulkLoadNotStarted`] when
    /// the last-known state says nothing is running.
    pub fn bulk_load_stop(&self) -> Result<BulkLoadStopResponse, ProvenError> {
        if *self.bulk_load.lock() == BulkLoadState::Off {
            return Err(ProvenError::bulk_load_not_started(self.db.name(), BulkLoadAction::Stop));
        }
        match handle::dispatch(&self.db, command::bulk_load(BulkLoadAction::Stop)) {
            Ok(reply) => {
                let response = BulkLoadStopResponse::from_reply(reply)?;
                *self.bulk_load.lock() = BulkLoadState::Off;
                Ok(response)
            }
            Err(err) => Err(self.resync_bulk_load(ProvenError::bulk_load(
                self.db.name(),
                BulkLoadAction::Stop,
                err,
            ))),
        }
    }

    /// Stops the running bulk load regardless of outstanding operations.
    /// Same pre-flight behavior as [`ProvenDb::bulk_load_stop`].
    pub fn bulk_load_kill(&self) -> Result<BulkLoadKillResponse, ProvenError> {
        if *self.bulk_load.lock() == BulkLoadState::Off {
            return Err(ProvenError::bulk_load_not_started(self.db.name(), BulkLoadAction::Kill));
        }
        match handle::dispatch(&self.db, command::bulk_load(BulkLoadAction::Kill)) {
            Ok(reply) => {
                let response = BulkLoadKillResponse::from_reply(reply)?;
                *self.bulk_load.lock() = BulkLoadState::Off;
                Ok(response)
            }
            Err(err) => Err(self.resync_bulk_load(ProvenError::bulk_load(
                self.db.name(),
                BulkLoadAction::Kill,
                err,
            ))),
        }
    }

    /// Asks the server for the current bulk-load status and refreshes the
    /// cached state from the answer.
    pub fn bulk_load_status(&self) -> Result<BulkLoadStatusResponse, ProvenError> {
        let reply = handle::dispatch(&self.db, command::bulk_load(BulkLoadAction::Status))
            .map_err(|err| ProvenError::bulk_load(self.db.name(), BulkLoadAction::Status, err))?;
        let response = BulkLoadStatusResponse::from_reply(reply)?;
        *self.bulk_load.lock() = match response.status {
            BulkLoadStatus::On => BulkLoadState::On,
            BulkLoadStatus::Off => BulkLoadState::Off,
        };
        Ok(response)
    }

    /// The server's answer is fresher than whatever was cached, so a remote
    /// already-started or not-started rejection corrects the cache.
    fn resync_bulk_load(&self, err: ProvenError) -> ProvenError {
        match &err {
            ProvenError::BulkLoadAlreadyStarted { .. } => {
                *self.bulk_load.lock() = BulkLoadState::On;
            }
            ProvenError::BulkLoadNotStarted { .. } => {
                *self.bulk_load.lock() = BulkLoadState::Off;
            }
            _ => {}
        }
        err
    }

    /// Deletes old versions and proofs between the two bounds to reclaim
    /// storage.
    pub fn compact_versions(
        &self,
        start_version: i64,
        end_version: i64,
        destroy_proofs: Option<bool>,
    ) -> Result<CompactResponse, ProvenError> {
        let reply = handle::dispatch(
            &self.db,
            command::compact_versions(start_version, end_version, destroy_proofs),
        )
        .map_err(|err| ProvenError::compact(self.db.name(), start_version, end_version, err))?;
        CompactResponse::from_reply(reply)
    }

    /// Creates a collection excluded from versioning, metadata, and proofs.
    pub fn create_ignored(&self, collection: &str) -> Result<CreateIgnoredResponse, ProvenError> {
        let reply = handle::dispatch(&self.db, command::create_ignored(collection))
            .map_err(|err| ProvenError::create_ignored(self.db.name(), collection, err))?;
        CreateIgnoredResponse::from_reply(reply)
    }

    /// Returns the version history of the documents in `collection` matching
    /// `filter`, optionally projected.
    pub fn doc_history(
        &self,
        collection: &str,
        filter: Document,
        projection: Option<Document>,
    ) -> Result<DocumentHistoryResponse, ProvenError> {
        let reply =
            handle::dispatch(&self.db, command::doc_history(collection, filter, projection))
                .map_err(|err| ProvenError::doc_history(self.db.name(), collection, err))?;
        DocumentHistoryResponse::from_reply(reply)
    }

    /// First phase of forgetting: marks the matching documents and returns
    /// the id and password needed to confirm.
    pub fn forget_prepare(
        &self,
        collection: &str,
        filter: Document,
        options: &ForgetOptions,
    ) -> Result<ForgetPrepareResponse, ProvenError> {
        let reply =
            handle::dispatch(&self.db, command::forget_prepare(collection, filter, options))
                .map_err(|err| ProvenError::forget_prepare(self.db.name(), collection, err))?;
        ForgetPrepareResponse::from_reply(reply)
    }

    /// Second phase of forgetting: erases the content of the prepared
    /// documents while keeping their hashes, so existing proofs stay valid.
    pub fn forget_execute(
        &self,
        forget_id: i64,
        password: &str,
    ) -> Result<ForgetExecuteResponse, ProvenError> {
        let reply = handle::dispatch(&self.db, command::forget_execute(forget_id, password))
            .map_err(|err| ProvenError::forget_execute(self.db.name(), forget_id, err))?;
        ForgetExecuteResponse::from_reply(reply)
    }

    /// Gets proofs for the matching documents at a version. A document the
    /// server cannot prove yields a failed entry in the reply, not an error;
    /// only whole-command failures raise.
    pub fn get_document_proof(
        &self,
        collection: &str,
        filter: Document,
        version: i64,
        format: Option<ProofFormat>,
    ) -> Result<DocumentProofResponse, ProvenError> {
        let reply = handle::dispatch(
            &self.db,
            command::get_document_proof(collection, filter, version, format),
        )
        .map_err(|err| ProvenError::document_proof(self.db.name(), collection, err))?;
        DocumentProofResponse::from_reply(reply)
    }

    /// Gets the proof for a version, addressed by proof id or version number.
    pub fn get_version_proof(
        &self,
        target: impl Into<VersionProofArg>,
        options: &VersionProofOptions,
    ) -> Result<VersionProofResponse, ProvenError> {
        let target = target.into();
        let reply = handle::dispatch(&self.db, command::get_version_proof(&target, options))
            .map_err(|err| ProvenError::version_proof(self.db.name(), err))?;
        VersionProofResponse::from_reply(reply)
    }

    /// Lists the storage used by each collection.
    pub fn list_storage(&self) -> Result<ListStorageResponse, ProvenError> {
        let reply = handle::dispatch(&self.db, command::list_storage())
            .map_err(|err| ProvenError::list_storage(self.db.name(), err))?;
        ListStorageResponse::from_reply(reply)
    }

    /// Rolls the database back to its last valid version.
    pub fn rollback(&self) -> Result<RollbackResponse, ProvenError> {
        let reply = handle::dispatch(&self.db, command::rollback())
            .map_err(|err| ProvenError::rollback(self.db.name(), err))?;
        RollbackResponse::from_reply(reply)
    }

    /// Makes ProvenDB metadata visible in query results.
    pub fn show_metadata(&self) -> Result<MetadataResponse, ProvenError> {
        let reply = handle::dispatch(&self.db, command::show_metadata())
            .map_err(|err| ProvenError::metadata(self.db.name(), err))?;
        MetadataResponse::from_reply(reply)
    }

    /// Hides ProvenDB metadata from query results.
    pub fn hide_metadata(&self) -> Result<MetadataResponse, ProvenError> {
        let reply = handle::dispatch(&self.db, command::hide_metadata())
            .map_err(|err| ProvenError::metadata(self.db.name(), err))?;
        MetadataResponse::from_reply(reply)
    }

    /// Anchors a version's hash to an external ledger.
    pub fn submit_proof(
        &self,
        version: i64,
        options: &SubmitProofOptions,
    ) -> Result<SubmitProofResponse, ProvenError> {
        let reply = handle::dispatch(&self.db, command::submit_proof(version, options))
            .map_err(|err| ProvenError::submit_proof(self.db.name(), version, err))?;
        SubmitProofResponse::from_reply(reply)
    }

    /// Checks a previously submitted proof against the ledger it was
    /// anchored to.
    pub fn verify_proof(
        &self,
        proof_id: &str,
        format: Option<ProofFormat>,
    ) -> Result<VerifyProofResponse, ProvenError> {
        let reply = handle::dispatch(&self.db, command::verify_proof(proof_id, format))
            .map_err(|err| ProvenError::verify_proof(self.db.name(), proof_id, err))?;
        VerifyProofResponse::from_reply(reply)
    }
}
