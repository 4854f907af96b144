//! Messaging: posting messages to a record's communication log.
//!
//! [`MessagingSink`] is the seam. Sinks that ship with the crate:
//!
//! - [`BufferSink`]: collects messages in memory (tests, previews)
//! - [`LogSink`]: writes messages to the `tracing` log
//! - [`ChatterSink`]: stores [`LogMessage`] records next to the data
//! - [`EmitterSink`]: emits `message.posted` events (feature `emitter`)

mod chatter;
mod mass_message;
mod sink;

pub use chatter::{ChatterSink, LogMessage};
pub use mass_message::MassMessage;
#[cfg(feature = "emitter")]
pub use sink::EmitterSink;
pub use sink::{BufferSink, LogSink, MessageTarget, MessagingError, MessagingSink, PostedMessage};
