//! Response envelope: one normalized result per request.
//!
//! Every request builds its own [`Envelope`], fills in output and status,
//! and renders it once with [`Envelope::json`]. Nothing is shared between
//! requests.
//!
//! ```
//! use artisan_api::envelope::Envelope;
//!
//! let mut envelope = Envelope::new();
//! envelope.error("boom", Some(422));
//!
//! let rendered = envelope.json(None).unwrap();
//! assert_eq!(rendered.status, 422);
//! assert_eq!(rendered.body.to_string(), r#"{"ok":false,"output":"boom"}"#);
//! ```

mod error;

pub use error::EnvelopeError;

use serde_json::{json, Value};

/// A rendered envelope: status code plus JSON body.
#[derive(Clone, Debug, PartialEq)]
pub struct Rendered {
    /// HTTP status code.
    pub status: u16,
    /// JSON body.
    pub body: Value,
}

/// Output and status of a single request.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Envelope {
    output: String,
    status: Option<u16>,
}

impl Envelope {
    /// An empty envelope: no output, no status.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the output text. Without a status the stored status is kept.
    pub fn set_output(&mut self, output: impl Into<String>, status: Option<u16>) -> &mut Self {
        self.output = output.into();
        if let Some(status) = status {
            self.status = Some(status);
        }
        self
    }

    /// Set the status code.
    pub fn set_status(&mut self, status: u16) -> &mut Self {
        self.status = Some(status);
        self
    }

    /// Record a failure message; callers pass a non-2xx status.
    pub fn error(&mut self, message: impl Into<String>, status: Option<u16>) -> &mut Self {
        self.set_output(message, status)
    }

    /// Current output text.
    pub fn output(&self) -> &str {
        &self.output
    }

    /// Current status, if one was set.
    pub fn status(&self) -> Option<u16> {
        self.status
    }

    /// Only an exact 200 counts as ok.
    pub fn is_ok(&self) -> bool {
        self.status == Some(200)
    }

    /// Render the envelope.
    ///
    /// An explicit payload is passed through verbatim; otherwise the body is
    /// `{"ok": status == 200, "output": output}`. Rendering without a status,
    /// or with a code outside 100..=999, is an error.
    pub fn json(&self, data: Option<Value>) -> Result<Rendered, EnvelopeError> {
        let status = self.status.ok_or(EnvelopeError::StatusUnset)?;
        if !(100..=999).contains(&status) {
            return Err(EnvelopeError::InvalidStatus(status));
        }

        let body = data.unwrap_or_else(|| {
            json!({
                "ok": status == 200,
                "output": self.output,
            })
        });

        Ok(Rendered { status, body })
    }
}
