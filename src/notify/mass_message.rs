use std::collections::HashSet;

use serde::Deserialize;
use tracing::info;

use crate::checkout::Checkout;
use crate::error::{LibraryError, LibraryResult};
use crate::model::{ModelStore, ModelsExt};

use super::{MessageTarget, MessagingSink};

/// One message addressed to a set of checkouts.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct MassMessage {
    pub checkout_ids: Vec<String>,
    pub subject: Option<String>,
    pub body: String,
}

impl MassMessage {
    pub fn new(checkout_ids: Vec<String>, subject: Option<String>, body: impl Into<String>) -> Self {
        Self {
            checkout_ids,
            subject,
            body: body.into(),
        }
    }

    /// The selected checkouts, each once, in selection order.
    pub fn targets(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        self.checkout_ids
            .iter()
            .map(String::as_str)
            .filter(|id| seen.insert(*id))
            .collect()
    }

    /// Post the message to every selected checkout's log on `channel`.
    ///
    /// Each post stands alone: when one fails, the ones before it stay
    /// posted. A checkout selected twice gets one message. Returns the number
    /// of messages posted.
    pub fn send<S: ModelStore>(
        &self,
        store: &S,
        sink: &dyn MessagingSink,
        channel: &str,
    ) -> LibraryResult<usize> {
        if self.checkout_ids.is_empty() {
            return Err(LibraryError::user("No Checkouts were selected."));
        }
        // A body of only whitespace is as empty as no body.
        if self.body.trim().is_empty() {
            return Err(LibraryError::user("A message body is required"));
        }

        let targets = self.targets();
        let checkouts = store.models::<Checkout>();
        for &id in &targets {
            if !checkouts.exists(id)? {
                return Err(LibraryError::not_found::<Checkout>(id));
            }
        }

        for &id in &targets {
            sink.post(
                &MessageTarget::of::<Checkout>(id),
                self.subject.as_deref(),
                &self.body,
                channel,
            )?;
        }

        let count = targets.len();
        info!(count, targets = ?targets, "posted messages to checkouts");
        Ok(count)
    }
}
