//! Checkout lines are owned by their checkout.

use library_workflow::{CheckoutLine, LibraryError, ModelsExt, NewCheckout};

use crate::support::Fixture;

#[test]
fn add_and_remove_lines() {
    let fx = Fixture::new();
    let checkout = fx
        .workflow()
        .create(NewCheckout::for_member(&fx.member_id))
        .unwrap();

    let line = fx.workflow().add_line(&checkout.id, &fx.book_ids[0]).unwrap();
    fx.workflow().add_line(&checkout.id, &fx.book_ids[1]).unwrap();
    assert_eq!(fx.workflow().lines(&checkout.id).unwrap().len(), 2);

    assert!(fx.workflow().remove_line(&line.id).unwrap());
    let remaining = fx.workflow().lines(&checkout.id).unwrap();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].book_id, fx.book_ids[1]);
}

#[test]
fn line_needs_an_existing_checkout_and_book() {
    let fx = Fixture::new();
    let checkout = fx
        .workflow()
        .create(NewCheckout::for_member(&fx.member_id))
        .unwrap();

    let err = fx.workflow().add_line("nope", &fx.book_ids[0]).unwrap_err();
    assert!(matches!(err, LibraryError::NotFound { .. }));

    let err = fx.workflow().add_line(&checkout.id, "nope").unwrap_err();
    assert!(matches!(err, LibraryError::NotFound { .. }));
}

#[test]
fn deleting_a_checkout_deletes_its_lines() {
    let fx = Fixture::new();
    let keep = fx
        .workflow()
        .create(NewCheckout::for_member(&fx.member_id).with_books([fx.book_ids[0].clone()]))
        .unwrap();
    let doomed = fx
        .workflow()
        .create(NewCheckout::for_member(&fx.member_id).with_books(fx.book_ids.clone()))
        .unwrap();

    assert!(fx.workflow().delete(&doomed.id).unwrap());
    assert!(!fx.workflow().delete(&doomed.id).unwrap());

    let lines = fx
        .library
        .store()
        .models::<CheckoutLine>()
        .find(&|_| true)
        .unwrap();
    assert_eq!(lines.len(), 1);
    assert_eq!(lines[0].data.checkout_id, keep.id);
}
