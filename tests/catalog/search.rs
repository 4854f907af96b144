//! Catalog search: filters, ordering, limits and archived books.

use library_workflow::{Condition, Filter, NewBook, Op, Order, Query};
use serde_json::json;

use crate::support::Fixture;

fn seed(fx: &Fixture) {
    for (title, copies) in [("Rust in Action", 2), ("Programming Rust", 5), ("Odoo 17", 1)] {
        fx.catalog()
            .create(NewBook {
                copies: Some(copies),
                ..NewBook::titled(title)
            })
            .unwrap();
    }
}

fn titles(books: &[library_workflow::Book]) -> Vec<&str> {
    books.iter().map(|b| b.title.as_str()).collect()
}

#[test]
fn ilike_order_and_limit() {
    let fx = Fixture::new();
    seed(&fx);

    let query = Query::filter(Filter::new().and(Condition::new("title", Op::ILike, "rust")))
        .order_by(Order::desc("copies"));
    let books = fx.catalog().search(query).unwrap();
    assert_eq!(titles(&books), ["Programming Rust", "Rust in Action"]);

    let first = fx
        .catalog()
        .search(Query::new().order_by(Order::asc("title")).limit(1))
        .unwrap();
    assert_eq!(titles(&first), ["Odoo 17"]);
}

#[test]
fn in_and_comparison_operators() {
    let fx = Fixture::new();
    seed(&fx);

    let query = Query::filter(
        Filter::new()
            .and(Condition::new("copies", Op::In, json!([1, 2])))
            .and(Condition::new("copies", Op::Ge, 2)),
    );
    assert_eq!(titles(&fx.catalog().search(query).unwrap()), ["Rust in Action"]);
}

#[test]
fn archived_books_are_hidden_unless_asked_for() {
    let fx = Fixture::new();
    seed(&fx);
    let odoo = fx
        .catalog()
        .search(Query::filter(Filter::new().eq("title", "Odoo 17")))
        .unwrap()
        .remove(0);

    let archived = fx.catalog().archive(&odoo.id).unwrap();
    assert!(!archived.active);
    assert_eq!(fx.catalog().search(Query::new()).unwrap().len(), 2);

    let inactive = fx
        .catalog()
        .search(Query::filter(Filter::new().eq("active", false)))
        .unwrap();
    assert_eq!(titles(&inactive), ["Odoo 17"]);

    fx.catalog().unarchive(&odoo.id).unwrap();
    assert_eq!(fx.catalog().search(Query::new()).unwrap().len(), 3);
}

#[test]
fn deserialized_query_runs() {
    let fx = Fixture::new();
    seed(&fx);

    let query: Query = serde_json::from_value(json!({
        "filter": [{ "field": "copies", "op": "lt", "value": 5 }],
        "order": [{ "field": "title" }]
    }))
    .unwrap();
    assert_eq!(
        titles(&fx.catalog().search(query).unwrap()),
        ["Odoo 17", "Rust in Action"]
    );
}
