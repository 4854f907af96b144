//! Current-actor provider: who is performing the operation.

use serde::{Deserialize, Serialize};

/// Reference to an application user (the librarian on a checkout).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserRef {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl UserRef {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: None,
        }
    }

    pub fn named(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: Some(name.into()),
        }
    }
}

/// Supplies the user on whose behalf an operation runs.
pub trait CurrentActor: Send + Sync {
    fn current_user(&self) -> UserRef;
}

/// A `UserRef` is its own provider.
impl CurrentActor for UserRef {
    fn current_user(&self) -> UserRef {
        self.clone()
    }
}
