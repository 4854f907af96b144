use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::Model;

/// A checkout request: a member borrowing books, tracked through stages.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, Model)]
#[model(collection = "checkouts")]
pub struct Checkout {
    pub id: String,
    #[model(relation = "members")]
    pub member_id: String,
    /// The librarian handling the request.
    pub user_id: Option<String>,
    pub request_date: NaiveDate,
    #[model(relation = "checkout_stages")]
    pub stage_id: Option<String>,
    /// Set when the checkout enters an open stage.
    pub checkout_date: Option<NaiveDate>,
    /// Set when the checkout enters a done stage.
    pub close_date: Option<NaiveDate>,
}

impl Checkout {
    /// Reset the request date after a member change. Returns a notice when
    /// the date actually moved.
    pub fn on_member_change(&mut self, today: NaiveDate) -> Option<Notice> {
        if self.request_date == today {
            return None;
        }
        self.request_date = today;
        Some(Notice::request_date_changed())
    }
}

/// A borrowed book on a checkout. Lines are deleted with their checkout.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, Model)]
#[model(collection = "checkout_lines")]
pub struct CheckoutLine {
    pub id: String,
    #[model(relation = "checkouts")]
    pub checkout_id: String,
    #[model(relation = "books")]
    pub book_id: String,
}

impl CheckoutLine {
    pub fn new(checkout_id: impl Into<String>, book_id: impl Into<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            checkout_id: checkout_id.into(),
            book_id: book_id.into(),
        }
    }
}

/// Input for a new checkout. Unset fields take their defaults: the current
/// actor as librarian, today as request date, the default stage.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct NewCheckout {
    pub member_id: String,
    pub user_id: Option<String>,
    pub request_date: Option<NaiveDate>,
    pub stage_id: Option<String>,
    pub book_ids: Vec<String>,
}

impl NewCheckout {
    pub fn for_member(member_id: impl Into<String>) -> Self {
        Self {
            member_id: member_id.into(),
            ..Self::default()
        }
    }

    pub fn in_stage(mut self, stage_id: impl Into<String>) -> Self {
        self.stage_id = Some(stage_id.into());
        self
    }

    pub fn with_books(mut self, book_ids: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.book_ids = book_ids.into_iter().map(Into::into).collect();
        self
    }
}

/// A partial update. Checkout and close dates are stamped by the
/// workflow and cannot be written directly.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct CheckoutChanges {
    pub member_id: Option<String>,
    pub user_id: Option<String>,
    pub request_date: Option<NaiveDate>,
    pub stage_id: Option<String>,
}

impl CheckoutChanges {
    pub fn stage(stage_id: impl Into<String>) -> Self {
        Self {
            stage_id: Some(stage_id.into()),
            ..Self::default()
        }
    }

    pub fn member(member_id: impl Into<String>) -> Self {
        Self {
            member_id: Some(member_id.into()),
            ..Self::default()
        }
    }
}

/// Advisory message returned alongside a successful write.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    pub title: String,
    pub message: String,
}

impl Notice {
    pub fn request_date_changed() -> Self {
        Self {
            title: "Changed Request Date".to_string(),
            message: "Request date changed to today!".to_string(),
        }
    }
}

/// Result of [`CheckoutWorkflow::write`](super::CheckoutWorkflow::write).
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct WriteOutcome {
    pub checkout: Checkout,
    pub notices: Vec<Notice>,
}
