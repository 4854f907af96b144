//! Store-backed communication log ("chatter").
//!
//! Every posted message becomes a [`LogMessage`] record, so a record's
//! discussion thread can be read back with [`ChatterSink::thread`].

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::actor::UserRef;
use crate::clock::Clock;
use crate::model::{Filter, ModelStore, ModelsExt, Query, StoreError};
use crate::Model;

use super::{MessageTarget, MessagingError, MessagingSink};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, Model)]
#[model(collection = "log_messages")]
pub struct LogMessage {
    pub id: String,
    pub model: String,
    pub res_id: String,
    pub subject: Option<String>,
    pub body: String,
    pub channel: String,
    pub author_id: Option<String>,
    pub date: DateTime<Utc>,
}

impl LogMessage {
    pub fn target(&self) -> MessageTarget {
        MessageTarget::new(self.model.clone(), self.res_id.clone())
    }
}

pub struct ChatterSink<'a, S> {
    store: &'a S,
    clock: &'a dyn Clock,
    author: Option<UserRef>,
}

impl<'a, S: ModelStore> ChatterSink<'a, S> {
    pub fn new(store: &'a S, clock: &'a dyn Clock) -> Self {
        Self {
            store,
            clock,
            author: None,
        }
    }

    /// Stamp posted messages with `author`.
    pub fn authored_by(mut self, author: UserRef) -> Self {
        self.author = Some(author);
        self
    }

    /// Messages posted to `target`, oldest first.
    pub fn thread(&self, target: &MessageTarget) -> Result<Vec<LogMessage>, StoreError> {
        let query = Query::filter(
            Filter::new()
                .eq("model", target.model.as_str())
                .eq("res_id", target.res_id.as_str()),
        );
        self.store.models::<LogMessage>().query_records(&query)
    }
}

impl<S: ModelStore> MessagingSink for ChatterSink<'_, S> {
    fn post(
        &self,
        target: &MessageTarget,
        subject: Option<&str>,
        body: &str,
        channel: &str,
    ) -> Result<(), MessagingError> {
        let message = LogMessage {
            id: uuid::Uuid::new_v4().to_string(),
            model: target.model.clone(),
            res_id: target.res_id.clone(),
            subject: subject.map(str::to_string),
            body: body.to_string(),
            channel: channel.to_string(),
            author_id: self.author.as_ref().map(|u| u.id.clone()),
            date: self.clock.now(),
        };
        self.store.models::<LogMessage>().insert(&message)?;
        Ok(())
    }
}
