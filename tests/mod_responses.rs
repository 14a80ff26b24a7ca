use bson::{doc, oid::ObjectId, Bson, Timestamp};
use chrono::DateTime;
use provenlite::response::{
    BulkLoadStartResponse, BulkLoadStatus, BulkLoadStatusResponse, CompactResponse,
    CreateIgnoredResponse, DocumentHistoryResponse, DocumentProof, DocumentProofResponse,
    ForgetExecuteResponse, ForgetPrepareResponse, ListStorageResponse, ListVersionsResponse,
    Reply, RollbackResponse, RollbackVersion, SubmitProofResponse, VerifyProofResponse,
    VersionProofResponse, VersionResponse,
};
use provenlite::ProvenError;

#[test]
fn version_response_exposes_fields_by_name_and_by_key() {
    let reply = doc! {
        "response": "The version is set to: '5'",
        "version": 5i64,
        "status": "userDefined",
        "ok": 1.0,
    };
    let view = VersionResponse::from_reply(reply.clone()).unwrap();
    assert_eq!(view.response, "The version is set to: '5'");
    assert_eq!(view.version, 5);
    assert_eq!(view.status, "userDefined");
    // Every raw field stays reachable by key with the original value.
    for (key, value) in reply.iter() {
        assert_eq!(view.get(key), Some(value));
    }
    assert_eq!(view.raw(), &reply);
}

#[test]
fn version_response_coerces_numeric_widths() {
    let view = VersionResponse::from_reply(doc! {
        "response": "r", "version": 3.0, "status": "current", "ok": 1,
    })
    .unwrap();
    assert_eq!(view.version, 3);
}

#[test]
fn version_response_missing_field_is_a_malformed_reply() {
    let err = VersionResponse::from_reply(doc! { "version": 5i64, "status": "s" }).unwrap_err();
    match err {
        ProvenError::MalformedReply { field } => assert_eq!(field, "response"),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn list_versions_parses_each_entry() {
    let reply = doc! {
        "versions": [
            {
                "version": 1i64,
                "status": "valid",
                "effectiveDate": Bson::DateTime(bson::DateTime::from_millis(1_600_000_000_000)),
            },
            {
                "version": 2i64,
                "status": "valid",
                "effectiveDate": "2020-09-14T12:00:00Z",
            },
        ],
        "ok": 1.0,
    };
    let view = ListVersionsResponse::from_reply(reply).unwrap();
    assert_eq!(view.versions.len(), 2);
    assert_eq!(view.versions[0].version, 1);
    assert_eq!(
        view.versions[0].effective_date,
        DateTime::from_timestamp_millis(1_600_000_000_000).unwrap()
    );
    assert_eq!(view.versions[1].version, 2);
    assert_eq!(view.versions[1].get("status"), Some(&Bson::String("valid".to_string())));
}

#[test]
fn bulk_load_views() {
    let start = BulkLoadStartResponse::from_reply(doc! { "ok": 1.0, "version": 8i64 }).unwrap();
    assert_eq!(start.version, 8);
    let status = BulkLoadStatusResponse::from_reply(doc! { "ok": 1.0, "status": "on" }).unwrap();
    assert_eq!(status.status, BulkLoadStatus::On);
    let off = BulkLoadStatusResponse::from_reply(doc! { "ok": 1.0, "status": "off" }).unwrap();
    assert_eq!(off.status, BulkLoadStatus::Off);
    assert!(BulkLoadStatusResponse::from_reply(doc! { "ok": 1.0, "status": "maybe" }).is_err());
}

#[test]
fn compact_counts() {
    let view = CompactResponse::from_reply(doc! {
        "ok": 1.0, "nProofsDeleted": 2i32, "nVersionsDeleted": 5i64,
    })
    .unwrap();
    assert_eq!(view.proofs_deleted, 2);
    assert_eq!(view.versions_deleted, 5);
}

#[test]
fn document_history_parses_nested_version_ranges() {
    let reply = doc! {
        "docHistory": [{
            "collection": "accounts",
            "_id": 12i64,
            "history": {
                "versions": [{
                    "minVersion": 1i64,
                    "maxVersion": 4i64,
                    "status": "active",
                    "started": "2020-01-01T00:00:00Z",
                    "ended": "2020-02-01T00:00:00Z",
                    "document": { "balance": 10 },
                }],
            },
        }],
        "ok": 1.0,
    };
    let view = DocumentHistoryResponse::from_reply(reply).unwrap();
    assert_eq!(view.history.len(), 1);
    let entry = &view.history[0];
    assert_eq!(entry.collection.as_deref(), Some("accounts"));
    assert_eq!(entry.id, Bson::Int64(12));
    assert_eq!(entry.versions.len(), 1);
    let range = &entry.versions[0];
    assert_eq!(range.min_version, 1);
    assert_eq!(range.max_version, 4);
    assert_eq!(range.document, doc! { "balance": 10 });
}

#[test]
fn document_history_accepts_the_flat_layout() {
    let reply = doc! {
        "docHistory": [{
            "_id": "k1",
            "versions": [{
                "minVersion": 2i64,
                "maxVersion": 2i64,
                "status": "deleted",
                "started": "2020-01-01T00:00:00Z",
                "ended": "2020-01-02T00:00:00Z",
                "document": {},
            }],
        }],
        "ok": 1.0,
    };
    let view = DocumentHistoryResponse::from_reply(reply).unwrap();
    assert_eq!(view.history[0].versions[0].status, "deleted");
}

fn successful_proof_entry() -> bson::Document {
    doc! {
        "collection": "accounts",
        "scope": "collection",
        "ProvenDbId": "pdb-1",
        "documentId": "doc-1",
        "version": 4i64,
        "status": "valid",
        "btcTransaction": "deadbeef",
        "btcBlockNumber": 650_000i64,
        "versionProofId": "vp-1",
        "documentHash": "abcd",
        "versionHash": "ef01",
        "proof": { "nodes": [] },
    }
}

#[test]
fn document_proofs_classify_by_errmsg_presence() {
    let reply = doc! {
        "proofs": [
            successful_proof_entry(),
            { "errmsg": "document is not covered by any proof" },
        ],
        "ok": 1.0,
    };
    let view = DocumentProofResponse::from_reply(reply).unwrap();
    assert_eq!(view.proofs.len(), 2);

    let success = &view.proofs[0];
    assert!(success.is_success());
    assert_eq!(success.errmsg(), None);
    match success {
        DocumentProof::Success(detail) => {
            assert_eq!(detail.collection, "accounts");
            assert_eq!(detail.version, 4);
            assert_eq!(detail.btc_block_number, 650_000);
            assert_eq!(detail.version_hash, "ef01");
            // No error message is reachable on a success entry.
            assert_eq!(detail.get("errmsg"), None);
        }
        DocumentProof::Failed(_) => panic!("classified a success entry as failed"),
    }

    let failed = &view.proofs[1];
    assert!(!failed.is_success());
    assert_eq!(failed.errmsg(), Some("document is not covered by any proof"));
    match failed {
        DocumentProof::Failed(entry) => {
            // None of the success-only fields exist on the failure entry.
            assert_eq!(entry.get("documentHash"), None);
            assert_eq!(entry.get("btcTransaction"), None);
        }
        DocumentProof::Success(_) => panic!("classified a failure entry as success"),
    }
}

#[test]
fn document_proof_block_number_accepts_a_decimal_string() {
    let mut entry = successful_proof_entry();
    entry.insert("btcBlockNumber", "650123");
    let view = DocumentProofResponse::from_reply(doc! { "proofs": [entry], "ok": 1.0 }).unwrap();
    match &view.proofs[0] {
        DocumentProof::Success(detail) => assert_eq!(detail.btc_block_number, 650_123),
        DocumentProof::Failed(_) => panic!("entry without errmsg must be a success"),
    }
}

#[test]
fn version_proof_entries() {
    let oid = ObjectId::new();
    let reply = doc! {
        "proofs": [{ "_id": oid, "proofId": "vp-9" }],
        "ok": 1.0,
    };
    let view = VersionProofResponse::from_reply(reply).unwrap();
    assert_eq!(view.proofs[0].object_id, oid);
    assert_eq!(view.proofs[0].proof_id, "vp-9");
}

#[test]
fn forget_views() {
    let prepare = ForgetPrepareResponse::from_reply(doc! {
        "ok": 1.0,
        "forgetId": 33.0,
        "password": "pw",
        "forgetSummary": { "documentsToBeForgotten": 10i64, "uniqueDocuments": 4i64 },
    })
    .unwrap();
    assert_eq!(prepare.forget_id, 33);
    assert_eq!(prepare.password, "pw");
    assert_eq!(prepare.summary.documents_to_be_forgotten, 10);
    assert_eq!(prepare.summary.unique_documents, 4);

    let execute = ForgetExecuteResponse::from_reply(doc! {
        "ok": 1.0,
        "status": "Forget applied",
        "forgetSummary": { "documentsForgotten": 10i64, "uniqueDocuments": 4i64 },
    })
    .unwrap();
    assert_eq!(execute.status, "Forget applied");
    assert_eq!(execute.summary.documents_forgotten, 10);
}

#[test]
fn list_storage_splits_single_pair_entries() {
    let reply = doc! {
        "storageList": [ { "accounts": 4096i64 }, { "audit": 1024i32 } ],
        "ok": 1.0,
    };
    let view = ListStorageResponse::from_reply(reply).unwrap();
    assert_eq!(view.storage.len(), 2);
    assert_eq!(view.storage[0].collection, "accounts");
    assert_eq!(view.storage[0].size, 4096);
    assert_eq!(view.storage[1].size, 1024);
}

#[test]
fn rollback_splits_single_pair_entries() {
    let reply = doc! { "version": [ { "ledger": 12i64 } ], "ok": 1.0 };
    let view = RollbackResponse::from_reply(reply).unwrap();
    assert_eq!(
        view.versions,
        vec![RollbackVersion { database: "ledger".to_string(), version: 12 }]
    );
}

#[test]
fn create_ignored_reads_operation_time() {
    let reply = doc! {
        "ok": 1.0,
        "operationTime": Bson::Timestamp(Timestamp { time: 1_700_000_000, increment: 3 }),
    };
    let view = CreateIgnoredResponse::from_reply(reply).unwrap();
    assert_eq!(view.operation_time.time, 1_700_000_000);
    assert_eq!(view.operation_time.increment, 3);
    assert!(view.cluster_time.is_none());
}

#[test]
fn submit_and_verify_proof_views() {
    let submitted = SubmitProofResponse::from_reply(doc! {
        "ok": 1.0,
        "version": 12i64,
        "dateTime": Bson::DateTime(bson::DateTime::from_millis(1_650_000_000_000)),
        "hash": "aa55",
        "proofId": "p-12",
        "status": "Pending",
    })
    .unwrap();
    assert_eq!(submitted.version, 12);
    assert_eq!(submitted.proof_id, "p-12");
    assert_eq!(
        submitted.date_time,
        DateTime::from_timestamp_millis(1_650_000_000_000).unwrap()
    );

    let verified = VerifyProofResponse::from_reply(doc! {
        "ok": 1.0,
        "proof": { "nodes": [] },
        "proofId": "p-12",
        "proofStatus": "Valid",
        "version": 12i64,
    })
    .unwrap();
    assert_eq!(verified.proof_status, "Valid");
    assert_eq!(verified.version, 12);
    assert_eq!(verified.proof, Bson::Document(doc! { "nodes": [] }));
}
