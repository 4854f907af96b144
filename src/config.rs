use anyhow::Context;
use serde::Deserialize;

/// When the "no checkout starts open or done" rule is enforced.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CreationGuard {
    /// Resolve the initial stage and reject before anything is written.
    #[default]
    PreValidate,
    /// Insert first, then check the stored record and roll the
    /// transaction back on violation.
    RollbackAfterInsert,
}

impl std::str::FromStr for CreationGuard {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pre_validate" => Ok(CreationGuard::PreValidate),
            "rollback_after_insert" => Ok(CreationGuard::RollbackAfterInsert),
            other => anyhow::bail!(
                "unknown creation guard {other:?} (expected pre_validate or rollback_after_insert)"
            ),
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct LibraryConfig {
    pub creation_guard: CreationGuard,
    /// Channel tag used when posting to a record's communication log.
    pub message_channel: String,
    /// Copies assigned to a new book when none are given.
    pub default_copies: i32,
}

impl Default for LibraryConfig {
    fn default() -> Self {
        Self {
            creation_guard: CreationGuard::default(),
            message_channel: "comment".to_string(),
            default_copies: 1,
        }
    }
}

impl LibraryConfig {
    /// Load configuration from environment variables, applying defaults where appropriate.
    ///
    /// # Errors
    /// Returns an error if `LIBRARY_CREATION_GUARD` names an unknown policy or
    /// `LIBRARY_DEFAULT_COPIES` is not an integer.
    pub fn from_env() -> anyhow::Result<Self> {
        let defaults = Self::default();

        let creation_guard = match std::env::var("LIBRARY_CREATION_GUARD") {
            Ok(value) => value
                .parse()
                .context("LIBRARY_CREATION_GUARD is invalid")?,
            Err(_) => defaults.creation_guard,
        };
        let message_channel =
            std::env::var("LIBRARY_MESSAGE_CHANNEL").unwrap_or(defaults.message_channel);
        let default_copies = match std::env::var("LIBRARY_DEFAULT_COPIES") {
            Ok(value) => value
                .parse()
                .context("LIBRARY_DEFAULT_COPIES must be an integer")?,
            Err(_) => defaults.default_copies,
        };

        Ok(Self {
            creation_guard,
            message_channel,
            default_copies,
        })
    }
}
