use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{LibraryError, LibraryResult};
use crate::isbn;
use crate::model::Constraint;
use crate::Model;

/// Physical or digital format of a book.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BookType {
    Paper,
    Hard,
    Electronic,
    Other,
}

impl BookType {
    pub fn label(&self) -> &'static str {
        match self {
            BookType::Paper => "Paperback",
            BookType::Hard => "Hardcover",
            BookType::Electronic => "Electronic",
            BookType::Other => "Other",
        }
    }
}

/// A catalog entry.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, Model)]
#[model(collection = "books", constraints = "book_constraints")]
pub struct Book {
    pub id: String,
    pub title: String,
    pub isbn: Option<String>,
    pub book_type: Option<BookType>,
    /// Internal notes.
    pub notes: Option<String>,
    /// Rich-text (HTML) description.
    pub description: Option<String>,
    pub copies: i32,
    /// Average rating, two decimal places.
    pub avg_rating: Decimal,
    pub price: Option<Decimal>,
    #[model(relation = "currencies")]
    pub currency_id: Option<String>,
    #[model(relation = "contacts")]
    pub publisher_id: Option<String>,
    pub author_ids: Vec<String>,
    pub date_published: Option<NaiveDate>,
    pub last_borrow_date: DateTime<Utc>,
    pub active: bool,
    #[serde(default, with = "cover")]
    pub cover: Option<Vec<u8>>,
}

fn book_constraints() -> Vec<Constraint<Book>> {
    vec![
        Constraint::Unique {
            name: "library_book_name_date_uq",
            message: "Title and publication date must be unique.",
            key: |book| {
                book.date_published
                    .map(|date| format!("{}\u{1f}{}", book.title, date))
            },
        },
        Constraint::Check {
            name: "library_book_check_date",
            message: "Publication date must not be in the future.",
            check: |book, today| book.date_published.map_or(true, |date| date <= today),
        },
    ]
}

impl Book {
    /// Checks run on every create and update before the store sees the record.
    pub fn validate(&self) -> LibraryResult<()> {
        if self.title.trim().is_empty() {
            return Err(LibraryError::validation("A book title is required."));
        }
        self.validate_isbn()
    }

    /// Fails when an ISBN is present and does not pass the ISBN-13 checksum.
    pub fn validate_isbn(&self) -> LibraryResult<()> {
        match self.isbn.as_deref() {
            Some(value) if !value.is_empty() && !isbn::validate(value) => Err(
                LibraryError::validation(format!("{} is an invalid ISBN", value)),
            ),
            _ => Ok(()),
        }
    }

    /// Explicit ISBN check: an absent ISBN is an error too.
    pub fn check_isbn_or_fail(&self) -> LibraryResult<()> {
        match self.isbn.as_deref() {
            None | Some("") => Err(LibraryError::validation(format!(
                "Please provide an ISBN for {}",
                self.title
            ))),
            Some(value) if !isbn::validate(value) => Err(LibraryError::validation(format!(
                "{} ISBN is invalid",
                value
            ))),
            Some(_) => Ok(()),
        }
    }
}

/// Fields for a new book. Unset fields take their defaults.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct NewBook {
    pub title: String,
    pub isbn: Option<String>,
    pub book_type: Option<BookType>,
    pub notes: Option<String>,
    pub description: Option<String>,
    pub copies: Option<i32>,
    pub avg_rating: Option<Decimal>,
    pub price: Option<Decimal>,
    pub currency_id: Option<String>,
    pub publisher_id: Option<String>,
    pub author_ids: Vec<String>,
    pub date_published: Option<NaiveDate>,
    pub active: Option<bool>,
    #[serde(with = "cover")]
    pub cover: Option<Vec<u8>>,
}

impl NewBook {
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    pub(crate) fn into_book(self, now: DateTime<Utc>, default_copies: i32) -> Book {
        Book {
            id: uuid::Uuid::new_v4().to_string(),
            title: self.title,
            isbn: self.isbn,
            book_type: self.book_type,
            notes: self.notes,
            description: self.description,
            copies: self.copies.unwrap_or(default_copies),
            avg_rating: self.avg_rating.unwrap_or_default().round_dp(2),
            price: self.price,
            currency_id: self.currency_id,
            publisher_id: self.publisher_id,
            author_ids: self.author_ids,
            date_published: self.date_published,
            last_borrow_date: now,
            active: self.active.unwrap_or(true),
            cover: self.cover,
        }
    }
}

/// Partial update of a book. `None` leaves a field untouched; for optional
/// fields `Some(None)` (JSON `null`) clears it.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct BookChanges {
    pub title: Option<String>,
    #[serde(deserialize_with = "nullable")]
    pub isbn: Option<Option<String>>,
    #[serde(deserialize_with = "nullable")]
    pub book_type: Option<Option<BookType>>,
    #[serde(deserialize_with = "nullable")]
    pub notes: Option<Option<String>>,
    #[serde(deserialize_with = "nullable")]
    pub description: Option<Option<String>>,
    pub copies: Option<i32>,
    pub avg_rating: Option<Decimal>,
    #[serde(deserialize_with = "nullable")]
    pub price: Option<Option<Decimal>>,
    #[serde(deserialize_with = "nullable")]
    pub currency_id: Option<Option<String>>,
    #[serde(deserialize_with = "nullable")]
    pub publisher_id: Option<Option<String>>,
    pub author_ids: Option<Vec<String>>,
    #[serde(deserialize_with = "nullable")]
    pub date_published: Option<Option<NaiveDate>>,
    pub last_borrow_date: Option<DateTime<Utc>>,
    pub active: Option<bool>,
    #[serde(deserialize_with = "nullable_cover")]
    pub cover: Option<Option<Vec<u8>>>,
    /// Writes through to the publisher's country.
    #[serde(deserialize_with = "nullable")]
    pub publisher_country_id: Option<Option<String>>,
}

impl BookChanges {
    /// Apply the stored-field changes. The derived publisher country is
    /// returned for the caller to write through the publisher.
    pub(crate) fn apply(self, book: &mut Book) -> Option<Option<String>> {
        if let Some(title) = self.title {
            book.title = title;
        }
        if let Some(isbn) = self.isbn {
            book.isbn = isbn;
        }
        if let Some(book_type) = self.book_type {
            book.book_type = book_type;
        }
        if let Some(notes) = self.notes {
            book.notes = notes;
        }
        if let Some(description) = self.description {
            book.description = description;
        }
        if let Some(copies) = self.copies {
            book.copies = copies;
        }
        if let Some(rating) = self.avg_rating {
            book.avg_rating = rating.round_dp(2);
        }
        if let Some(price) = self.price {
            book.price = price;
        }
        if let Some(currency_id) = self.currency_id {
            book.currency_id = currency_id;
        }
        if let Some(publisher_id) = self.publisher_id {
            book.publisher_id = publisher_id;
        }
        if let Some(author_ids) = self.author_ids {
            book.author_ids = author_ids;
        }
        if let Some(date) = self.date_published {
            book.date_published = date;
        }
        if let Some(timestamp) = self.last_borrow_date {
            book.last_borrow_date = timestamp;
        }
        if let Some(active) = self.active {
            book.active = active;
        }
        if let Some(cover) = self.cover {
            book.cover = cover;
        }
        self.publisher_country_id
    }
}

fn nullable<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

fn nullable_cover<'de, D>(deserializer: D) -> Result<Option<Option<Vec<u8>>>, D::Error>
where
    D: Deserializer<'de>,
{
    cover::deserialize(deserializer).map(Some)
}

/// Cover images travel as base64 strings.
mod cover {
    use base64::{engine::general_purpose::STANDARD, Engine};
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S>(cover: &Option<Vec<u8>>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        cover
            .as_ref()
            .map(|bytes| STANDARD.encode(bytes))
            .serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<Vec<u8>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Option::<String>::deserialize(deserializer)?
            .map(|s| STANDARD.decode(&s).map_err(serde::de::Error::custom))
            .transpose()
    }
}
