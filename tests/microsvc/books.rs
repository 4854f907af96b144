//! Book commands.

use library_workflow::microsvc::{HandlerError, Session};
use serde_json::json;

use crate::support::{book, id_of, service};

#[test]
fn every_command_is_registered() {
    let service = service();
    let mut commands = service.commands();
    commands.sort();
    assert_eq!(
        commands,
        vec![
            "book.check_isbn",
            "book.create",
            "book.search",
            "book.update",
            "checkout.add_line",
            "checkout.create",
            "checkout.mass_message",
            "checkout.stages",
            "checkout.write",
            "member.create",
        ]
    );
}

#[test]
fn create_and_search() {
    let service = service();
    service
        .dispatch(
            "book.create",
            json!({ "title": "Rust in Action", "isbn": "9780306406157", "book_type": "paper" }),
            Session::new(),
        )
        .unwrap();
    book(&service, "Odoo 17 Development");

    let result = service
        .dispatch(
            "book.search",
            json!({ "filter": [{ "field": "title", "op": "i_like", "value": "rust" }] }),
            Session::new(),
        )
        .unwrap();

    assert_eq!(result["count"], 1);
    assert_eq!(result["books"][0]["title"], "Rust in Action");
    assert_eq!(result["books"][0]["copies"], 1);
}

#[test]
fn guard_rejects_missing_title() {
    let service = service();
    let err = service
        .dispatch("book.create", json!({ "isbn": "9780306406157" }), Session::new())
        .unwrap_err();
    assert!(matches!(err, HandlerError::GuardRejected(_)));
}

#[test]
fn invalid_isbn_is_a_rejection() {
    let service = service();
    let err = service
        .dispatch(
            "book.create",
            json!({ "title": "Broken", "isbn": "9780306406150" }),
            Session::new(),
        )
        .unwrap_err();

    assert_eq!(err.status_code(), 422);
    assert_eq!(err.to_string(), "9780306406150 is an invalid ISBN");
}

#[test]
fn update_clears_fields_with_null() {
    let service = service();
    let created = service
        .dispatch(
            "book.create",
            json!({ "title": "Notes", "notes": "shelf 3" }),
            Session::new(),
        )
        .unwrap();

    let updated = service
        .dispatch(
            "book.update",
            json!({ "id": id_of(&created), "changes": { "notes": null, "copies": 4 } }),
            Session::new(),
        )
        .unwrap();

    assert!(updated["notes"].is_null());
    assert_eq!(updated["copies"], 4);
}

#[test]
fn check_isbn() {
    let service = service();
    let id = book(&service, "No ISBN");

    let err = service
        .dispatch("book.check_isbn", json!({ "id": id }), Session::new())
        .unwrap_err();
    assert_eq!(err.to_string(), "Please provide an ISBN for No ISBN");

    service
        .dispatch(
            "book.update",
            json!({ "id": id, "changes": { "isbn": "978-0-306-40615-7" } }),
            Session::new(),
        )
        .unwrap();
    let result = service
        .dispatch("book.check_isbn", json!({ "id": id }), Session::new())
        .unwrap();
    assert_eq!(result, json!({ "id": id, "valid": true }));
}

#[test]
fn unknown_book_is_404() {
    let service = service();
    let err = service
        .dispatch("book.check_isbn", json!({ "id": "nope" }), Session::new())
        .unwrap_err();
    assert_eq!(err.status_code(), 404);
}
