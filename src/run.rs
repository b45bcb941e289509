//! Application runner: transports and the form lifecycle.
//!
//! [`FormApp`] owns the transport and the live session and exposes the
//! three lifecycle operations: `load` (fetch and render), `save` (validate
//! and submit) and `reset` (discard everything and load again). Both
//! request boundaries are fire-and-forget: no retry, no timeout beyond the
//! transport's own, no cancellation. A failure is reported once and the
//! user repeats the action.

use std::{
    fs,
    path::{Path, PathBuf},
};

use log::{debug, warn};
use serde_json::{Map, Value};

use crate::{
    error::TransportError,
    host::{NodeId, RenderHost},
    session::FormSession,
};

/// Request/response boundary for the schema fetch and the save submission.
pub trait FormTransport {
    /// Fetch the schema document. Called once per load or reset.
    fn fetch_schema(&mut self) -> Result<Value, TransportError>;

    /// Submit the validated snapshot.
    fn submit(&mut self, snapshot: &Map<String, Value>) -> Result<(), TransportError>;
}

/// Transport backed by local files, for offline use: reads the schema from
/// a JSON file and writes submissions to an output file.
pub struct FileTransport {
    schema: PathBuf,
    output: PathBuf,
}

impl FileTransport {
    pub fn new(schema: impl AsRef<Path>, output: impl AsRef<Path>) -> Self {
        Self {
            schema: schema.as_ref().to_path_buf(),
            output: output.as_ref().to_path_buf(),
        }
    }
}

impl FormTransport for FileTransport {
    fn fetch_schema(&mut self) -> Result<Value, TransportError> {
        let content = fs::read_to_string(&self.schema)?;
        Ok(serde_json::from_str(&content)?)
    }

    fn submit(&mut self, snapshot: &Map<String, Value>) -> Result<(), TransportError> {
        let body = serde_json::to_string_pretty(&Value::Object(snapshot.clone()))?;
        fs::write(&self.output, body)?;
        Ok(())
    }
}

/// Outcome of a save command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveOutcome {
    /// Every field validated and the snapshot was submitted.
    Saved,
    /// One or more required fields were empty; nothing was submitted.
    ValidationFailed,
    /// The submission itself failed; the user was notified once.
    TransportFailed,
    /// No form has been loaded yet.
    NotLoaded,
}

/// Form lifecycle driver.
pub struct FormApp {
    transport: Box<dyn FormTransport>,
    mount: NodeId,
    session: Option<FormSession>,
}

impl FormApp {
    pub fn new(transport: Box<dyn FormTransport>, mount: NodeId) -> Self {
        Self {
            transport,
            mount,
            session: None,
        }
    }

    /// The live session, once `load` has succeeded.
    pub fn session(&self) -> Option<&FormSession> {
        self.session.as_ref()
    }

    pub fn session_mut(&mut self) -> Option<&mut FormSession> {
        self.session.as_mut()
    }

    /// Fetch the schema and render the form. Until this succeeds, no
    /// fields exist.
    ///
    /// # Errors
    ///
    /// Transport and schema-shape failures are reported to the user once
    /// through the host and returned to the caller.
    pub fn load(&mut self, host: &mut dyn RenderHost) -> anyhow::Result<()> {
        let document = self.transport.fetch_schema().map_err(|err| {
            warn!("schema fetch failed: {err}");
            host.notify("Failed to load configuration.");
            anyhow::Error::from(err).context("schema fetch failed")
        })?;
        match FormSession::new(host, self.mount, &document) {
            Ok(session) => {
                debug!("form rendered with {} fields", session.registry().len());
                self.session = Some(session);
                Ok(())
            }
            Err(err) => {
                warn!("schema rejected: {err}");
                host.notify("Failed to load configuration.");
                Err(err.into())
            }
        }
    }

    /// Validate every field and submit the snapshot; one aggregate notice
    /// reports the outcome. Validation failures show inline per field and
    /// block submission without a notice.
    pub fn save(&mut self, host: &mut dyn RenderHost) -> SaveOutcome {
        let Some(session) = self.session.as_ref() else {
            host.notify("Nothing to save.");
            return SaveOutcome::NotLoaded;
        };
        let Some(payload) = session.validate(host) else {
            return SaveOutcome::ValidationFailed;
        };
        match self.transport.submit(&payload) {
            Ok(()) => {
                host.notify("Configuration saved.");
                SaveOutcome::Saved
            }
            Err(err) => {
                warn!("save failed: {err}");
                host.notify("Failed to save configuration.");
                SaveOutcome::TransportFailed
            }
        }
    }

    /// Discard all in-memory state and restart the initial load from
    /// scratch. Equivalent to a full restart of the form, not a rollback.
    pub fn reset(&mut self, host: &mut dyn RenderHost) -> anyhow::Result<()> {
        self.session = None;
        host.clear_children(self.mount);
        self.load(host)
    }
}
