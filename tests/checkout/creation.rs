//! Creating checkouts: defaults and the forbidden initial states.

use library_workflow::{
    Checkout, CheckoutLine, CreationGuard, LibraryError, ModelsExt, NewCheckout, StageState,
};

use crate::support::{today, Fixture, LENT, REQUESTED, RETURNED};

#[test]
fn create_fills_in_defaults() {
    let fx = Fixture::new();

    let checkout = fx.workflow().create(NewCheckout::for_member(&fx.member_id)).unwrap();

    assert_eq!(checkout.stage_id.as_deref(), Some(REQUESTED));
    assert_eq!(checkout.user_id.as_deref(), Some("librarian"));
    assert_eq!(checkout.request_date, today());
    assert_eq!(checkout.checkout_date, None);
    assert_eq!(checkout.close_date, None);
    assert_eq!(fx.workflow().state_of(&checkout.id).unwrap(), Some(StageState::New));
}

#[test]
fn create_as_another_actor() {
    let fx = Fixture::new();
    let actor = library_workflow::UserRef::new("night-shift");

    let checkout = fx
        .library
        .checkouts_as(&actor)
        .create(NewCheckout::for_member(&fx.member_id))
        .unwrap();

    assert_eq!(checkout.user_id.as_deref(), Some("night-shift"));
}

#[test]
fn create_with_lines() {
    let fx = Fixture::new();

    let checkout = fx
        .workflow()
        .create(NewCheckout::for_member(&fx.member_id).with_books(fx.book_ids.clone()))
        .unwrap();

    let lines = fx.workflow().lines(&checkout.id).unwrap();
    let mut books: Vec<_> = lines.iter().map(|l| l.book_id.clone()).collect();
    books.sort();
    let mut expected = fx.book_ids.clone();
    expected.sort();
    assert_eq!(books, expected);
}

#[test]
fn open_or_done_initial_stage_is_refused() {
    for guard in [CreationGuard::PreValidate, CreationGuard::RollbackAfterInsert] {
        let fx = Fixture::with_guard(guard);

        for stage in [LENT, RETURNED] {
            let err = fx
                .workflow()
                .create(
                    NewCheckout::for_member(&fx.member_id)
                        .in_stage(stage)
                        .with_books(fx.book_ids.clone()),
                )
                .unwrap_err();

            assert!(matches!(err, LibraryError::UserError(_)), "{guard:?} {stage}");
            assert_eq!(err.to_string(), "State not allowed for new checkouts.");
        }

        // Nothing was left behind by either policy.
        let store = fx.library.store();
        assert!(store.models::<Checkout>().find(&|_| true).unwrap().is_empty());
        assert!(store.models::<CheckoutLine>().find(&|_| true).unwrap().is_empty());
    }
}

#[test]
fn new_stage_is_accepted_by_both_policies() {
    for guard in [CreationGuard::PreValidate, CreationGuard::RollbackAfterInsert] {
        let fx = Fixture::with_guard(guard);
        let checkout = fx
            .workflow()
            .create(NewCheckout::for_member(&fx.member_id).in_stage(REQUESTED))
            .unwrap();
        assert_eq!(fx.workflow().get(&checkout.id).unwrap(), checkout);
    }
}

#[test]
fn unknown_member_or_book_is_not_found() {
    let fx = Fixture::new();

    let err = fx.workflow().create(NewCheckout::for_member("ghost")).unwrap_err();
    assert!(matches!(err, LibraryError::NotFound { ref collection, .. } if collection == "members"));

    let err = fx
        .workflow()
        .create(NewCheckout::for_member(&fx.member_id).with_books(["missing-book"]))
        .unwrap_err();
    assert!(matches!(err, LibraryError::NotFound { ref collection, .. } if collection == "books"));

    // The checkout inserted before the bad line was rolled back.
    let store = fx.library.store();
    assert!(store.models::<Checkout>().find(&|_| true).unwrap().is_empty());
}
