use bson::Document;
use parking_lot::Mutex;
use provenlite::errors::DriverError;
use provenlite::handle::DatabaseHandle;
use std::collections::VecDeque;

/// Scripted database handle: hands out queued outcomes in order and records
/// every command it was asked to run.
pub struct ScriptedHandle {
    name: String,
    outcomes: Mutex<VecDeque<Result<Document, DriverError>>>,
    commands: Mutex<Vec<Document>>,
}

impl ScriptedHandle {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            outcomes: Mutex::new(VecDeque::new()),
            commands: Mutex::new(Vec::new()),
        }
    }

    pub fn push_reply(&self, reply: Document) {
        self.outcomes.lock().push_back(Ok(reply));
    }

    pub fn push_failure(&self, err: DriverError) {
        self.outcomes.lock().push_back(Err(err));
    }

    /// Every command dispatched so far, in order.
    pub fn commands(&self) -> Vec<Document> {
        self.commands.lock().clone()
    }

    pub fn command_count(&self) -> usize {
        self.commands.lock().len()
    }
}

impl DatabaseHandle for ScriptedHandle {
    type Collection = String;

    fn name(&self) -> &str {
        &self.name
    }

    fn run_command(&self, command: Document) -> Result<Document, DriverError> {
        self.commands.lock().push(command);
        self.outcomes
            .lock()
            .pop_front()
            .unwrap_or_else(|| Err(DriverError::new("no scripted outcome queued")))
    }

    fn collection(&self, name: &str) -> String {
        name.to_string()
    }
}
