//! Creating and updating books: store constraints and ISBN validation.

use chrono::Duration;
use library_workflow::{
    BookChanges, Clock, LibraryError, NewBook, NewCheckout, NewMember, StoreError,
};
use rust_decimal::Decimal;

use crate::support::{today, Fixture};

fn dated(title: &str, days_from_today: i64) -> NewBook {
    NewBook {
        date_published: Some(today() + Duration::days(days_from_today)),
        ..NewBook::titled(title)
    }
}

#[test]
fn create_applies_defaults() {
    let fx = Fixture::new();

    let book = fx.catalog().create(NewBook::titled("Odoo Development Essentials")).unwrap();

    assert_eq!(book.copies, 1);
    assert!(book.active);
    assert_eq!(book.avg_rating, Decimal::ZERO);
    assert_eq!(book.last_borrow_date, fx.clock.now());
    assert_eq!(fx.catalog().get(&book.id).unwrap(), book);
}

#[test]
fn duplicate_title_and_date_is_rejected() {
    let fx = Fixture::new();
    fx.catalog().create(dated("Odoo Cookbook", -30)).unwrap();

    let err = fx.catalog().create(dated("Odoo Cookbook", -30)).unwrap_err();

    assert!(matches!(
        err,
        LibraryError::Store(StoreError::Constraint { ref name, .. }) if name == "library_book_name_date_uq"
    ));
    assert_eq!(err.to_string(), "Title and publication date must be unique.");
    assert!(err.is_user_facing());
}

#[test]
fn same_title_without_dates_is_allowed() {
    let fx = Fixture::new();
    fx.catalog().create(NewBook::titled("Untitled Draft")).unwrap();
    fx.catalog().create(NewBook::titled("Untitled Draft")).unwrap();

    // A different date is a different edition.
    fx.catalog().create(dated("Untitled Draft", -1)).unwrap();
    fx.catalog().create(dated("Untitled Draft", -2)).unwrap();
}

#[test]
fn publish_date_tomorrow_fails_today_succeeds() {
    let fx = Fixture::new();

    let err = fx.catalog().create(dated("Tomorrow's Book", 1)).unwrap_err();
    assert_eq!(err.to_string(), "Publication date must not be in the future.");

    let book = fx.catalog().create(dated("Today's Book", 0)).unwrap();
    assert_eq!(book.date_published, Some(today()));
}

#[test]
fn update_is_checked_against_the_same_constraints() {
    let fx = Fixture::new();
    fx.catalog().create(dated("First", -3)).unwrap();
    let second = fx.catalog().create(dated("Second", -3)).unwrap();

    let err = fx
        .catalog()
        .update(
            &second.id,
            BookChanges {
                title: Some("First".into()),
                ..BookChanges::default()
            },
        )
        .unwrap_err();
    assert!(matches!(err, LibraryError::Store(StoreError::Constraint { .. })));

    // The rejected update left the record as it was.
    assert_eq!(fx.catalog().get(&second.id).unwrap().title, "Second");
}

#[test]
fn clock_moving_forward_makes_a_future_date_valid() {
    let fx = Fixture::new();
    assert!(fx.catalog().create(dated("Preorder", 2)).is_err());

    fx.clock.advance_days(2);
    assert!(fx.catalog().create(dated("Preorder", 2)).is_ok());
}

#[test]
fn invalid_isbn_is_rejected_on_create_and_update() {
    let fx = Fixture::new();

    let err = fx
        .catalog()
        .create(NewBook {
            isbn: Some("9780306406150".into()),
            ..NewBook::titled("Bad ISBN")
        })
        .unwrap_err();
    assert!(matches!(err, LibraryError::Validation(_)));
    assert_eq!(err.to_string(), "9780306406150 is an invalid ISBN");

    let book = fx.catalog().create(NewBook::titled("No ISBN yet")).unwrap();
    let err = fx
        .catalog()
        .update(
            &book.id,
            BookChanges {
                isbn: Some(Some("978-0-306-40615-0".into())),
                ..BookChanges::default()
            },
        )
        .unwrap_err();
    assert!(matches!(err, LibraryError::Validation(_)));
}

#[test]
fn check_isbn_reports_missing_and_invalid() {
    let fx = Fixture::new();
    let missing = fx.catalog().create(NewBook::titled("Mystery")).unwrap();
    let valid = fx
        .catalog()
        .create(NewBook {
            isbn: Some("978-0-306-40615-7".into()),
            ..NewBook::titled("Numbers")
        })
        .unwrap();

    let err = fx.catalog().check_isbn(&missing.id).unwrap_err();
    assert_eq!(err.to_string(), "Please provide an ISBN for Mystery");

    assert!(fx.catalog().check_isbn(&valid.id).is_ok());
}

#[test]
fn empty_title_is_rejected() {
    let fx = Fixture::new();
    let err = fx.catalog().create(NewBook::titled("   ")).unwrap_err();
    assert_eq!(err.to_string(), "A book title is required.");
}

#[test]
fn rating_is_rounded_to_two_places() {
    let fx = Fixture::new();
    let book = fx
        .catalog()
        .create(NewBook {
            avg_rating: Some(Decimal::new(43567, 4)),
            ..NewBook::titled("Rated")
        })
        .unwrap();
    assert_eq!(book.avg_rating, Decimal::new(436, 2));
}

#[test]
fn missing_book_is_not_found() {
    let fx = Fixture::new();
    let err = fx.catalog().get("nope").unwrap_err();
    assert!(matches!(err, LibraryError::NotFound { .. }));
    assert!(!fx.catalog().delete("nope").unwrap());
}

#[test]
fn book_on_a_checkout_cannot_be_deleted() {
    let fx = Fixture::new();
    let book = fx.catalog().create(NewBook::titled("Lent Out")).unwrap();
    let member = fx.library.members().create(NewMember::named("Reader")).unwrap();
    let checkout = fx
        .library
        .checkouts()
        .create(NewCheckout::for_member(member.id()).with_books([book.id.clone()]))
        .unwrap();

    let err = fx.catalog().delete(&book.id).unwrap_err();
    assert!(matches!(err, LibraryError::Validation(_)));
    assert_eq!(err.to_string(), "This book is on a checkout and cannot be deleted.");
    assert!(fx.catalog().get(&book.id).is_ok());

    let line = &fx.library.checkouts().lines(&checkout.id).unwrap()[0];
    fx.library.checkouts().remove_line(&line.id).unwrap();
    assert!(fx.catalog().delete(&book.id).unwrap());
}
