//! Generic partner and reference records the library domain points at:
//! contacts (publishers, authors, the people behind members), countries and
//! currencies.

use serde::{Deserialize, Serialize};

use crate::Model;

/// A person or organization.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, Model)]
#[model(collection = "contacts")]
pub struct Contact {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    #[model(relation = "countries")]
    pub country_id: Option<String>,
}

impl Contact {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            name: name.into(),
            email: None,
            phone: None,
            country_id: None,
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    pub fn in_country(mut self, country_id: impl Into<String>) -> Self {
        self.country_id = Some(country_id.into());
        self
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, Model)]
#[model(collection = "countries")]
pub struct Country {
    pub id: String,
    /// ISO 3166-1 alpha-2 code.
    pub code: String,
    pub name: String,
}

impl Country {
    pub fn new(code: impl Into<String>, name: impl Into<String>) -> Self {
        let code = code.into();
        Self {
            id: code.to_lowercase(),
            code,
            name: name.into(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, Model)]
#[model(collection = "currencies")]
pub struct Currency {
    pub id: String,
    /// ISO 4217 code.
    pub code: String,
    pub symbol: String,
}

impl Currency {
    pub fn new(code: impl Into<String>, symbol: impl Into<String>) -> Self {
        let code = code.into();
        Self {
            id: code.to_lowercase(),
            code,
            symbol: symbol.into(),
        }
    }
}
