mod model;

use proc_macro::TokenStream;

// ============================================================================
// #[derive(Model)] derive macro
// ============================================================================

/// Derive macro for the `Model` trait.
///
/// # Usage
///
/// ```ignore
/// #[derive(Clone, Serialize, Deserialize, Model)]
/// #[model(collection = "books", constraints = "book_constraints")]
/// struct Book {
///     #[model(id)]
///     pub id: String,
///     pub title: String,
///     #[model(relation = "contacts")]
///     pub publisher_id: Option<String>,
/// }
/// ```
///
/// - `#[model(collection = "...")]` sets the collection name.
///   If omitted, defaults to snake_case struct name + "s".
/// - `#[model(constraints = "path::to::fn")]` names a function returning
///   `Vec<Constraint<Self>>` that the store enforces on every write.
/// - `#[model(id)]` marks the field used as the unique identifier.
///   If omitted, defaults to a field named `id`.
/// - `#[model(relation = "collection")]` declares a many-to-one field whose
///   value is the id of a record in another collection. Dotted filter paths
///   follow these relations.
#[proc_macro_derive(Model, attributes(model))]
pub fn derive_model(input: TokenStream) -> TokenStream {
    model::derive_model(input)
}
