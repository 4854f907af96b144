use std::fmt;

use serde::{Deserialize, Serialize};

use crate::Model;

/// The state tag a stage carries. Several stages may share a tag.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StageState {
    New,
    Open,
    Done,
    Cancel,
}

impl StageState {
    pub fn as_str(&self) -> &'static str {
        match self {
            StageState::New => "new",
            StageState::Open => "open",
            StageState::Done => "done",
            StageState::Cancel => "cancel",
        }
    }

    /// States a checkout may not be created in.
    pub fn forbidden_at_creation(&self) -> bool {
        matches!(self, StageState::Open | StageState::Done)
    }
}

impl fmt::Display for StageState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, Model)]
#[model(collection = "checkout_stages")]
pub struct CheckoutStage {
    pub id: String,
    pub name: String,
    /// Ordering key; ties are broken by id.
    pub sequence: i32,
    pub state: StageState,
    /// Shown collapsed in kanban views.
    #[serde(default)]
    pub fold: bool,
}

impl CheckoutStage {
    pub fn new(name: impl Into<String>, sequence: i32, state: StageState) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            name: name.into(),
            sequence,
            state,
            fold: false,
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    pub fn folded(mut self) -> Self {
        self.fold = true;
        self
    }
}
