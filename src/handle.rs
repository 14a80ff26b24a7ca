//! The capability seam between this crate and the caller's database driver.

use crate::errors::DriverError;
use bson::{Bson, Document};

/// The two driver capabilities this crate actually uses, plus a name for
/// diagnostics. Deliberately enumerated rather than forwarding the whole
/// driver surface: callers keep ownership of the connection lifecycle, and
/// this crate only ever reads from the handle.
pub trait DatabaseHandle {
    /// Handle type for a named sub-collection of the wrapped database.
    type Collection;

    /// Name of the wrapped logical database. Used in error messages and log
    /// lines only.
    fn name(&self) -> &str;

    /// Executes an administrative command and returns the raw reply.
    ///
    /// The command document's key order is significant and must reach the
    /// server unchanged: the first key is the command verb.
    fn run_command(&self, command: Document) -> Result<Document, DriverError>;

    /// Addresses a named sub-collection of the wrapped database.
    fn collection(&self, name: &str) -> Self::Collection;
}

/// Runs one command against the handle. Failures are passed through untouched
/// for the per-operation translation; replies that report failure in-band
/// (`executeFailed`, `ok: 0`) are normalized into [`DriverError`] here so no
/// caller has to inspect a reply for success.
pub(crate) fn dispatch<D: DatabaseHandle>(
    db: &D,
    command: Document,
) -> Result<Document, DriverError> {
    let verb = command.keys().next().map(|k| k.to_string()).unwrap_or_default();
    log::debug!("dispatching {verb} against db {}", db.name());
    log::trace!(
        "{verb} command body: {}",
        serde_json::to_string(&command).unwrap_or_default()
    );
    let reply = db.run_command(command)?;
    check_reply(&verb, reply)
}

fn check_reply(verb: &str, reply: Document) -> Result<Document, DriverError> {
    if let Some(failure) = reply.get("executeFailed") {
        log::warn!("{verb} reported executeFailed inside an ok reply");
        return Err(in_band_failure(failure));
    }
    match numeric(reply.get("ok")) {
        Some(ok) if ok != 0.0 => Ok(reply),
        Some(_) => Err(reply_failure(&reply)),
        None => Err(DriverError::new(format!("{verb} reply carried no ok field"))),
    }
}

/// The server sometimes answers `ok: 1` with an `executeFailed` sub-document
/// holding the real outcome. Treated as a command failure.
fn in_band_failure(failure: &Bson) -> DriverError {
    match failure {
        Bson::Document(doc) => reply_failure(doc),
        other => DriverError::new(format!("command reported executeFailed: {other:?}")),
    }
}

fn reply_failure(reply: &Document) -> DriverError {
    let message = match reply.get("errmsg") {
        Some(Bson::String(errmsg)) => errmsg.clone(),
        _ => "command failed without an errmsg".to_string(),
    };
    match numeric(reply.get("code")) {
        Some(code) => DriverError::with_code(message, code as i32),
        None => DriverError::new(message),
    }
}

fn numeric(value: Option<&Bson>) -> Option<f64> {
    match value {
        Some(Bson::Int32(v)) => Some(f64::from(*v)),
        Some(Bson::Int64(v)) => Some(*v as f64),
        Some(Bson::Double(v)) => Some(*v),
        _ => None,
    }
}
