//! Changing the member resets the request date.

use chrono::Duration;
use library_workflow::{CheckoutChanges, NewCheckout, Notice};

use crate::support::{today, Fixture};

#[test]
fn member_change_resets_an_old_request_date() {
    let fx = Fixture::new();
    let checkout = fx
        .workflow()
        .create(NewCheckout {
            request_date: Some(today() - Duration::days(5)),
            ..NewCheckout::for_member(&fx.member_id)
        })
        .unwrap();
    let other = fx.other_member();

    let outcome = fx
        .workflow()
        .write(&checkout.id, CheckoutChanges::member(&other))
        .unwrap();

    assert_eq!(outcome.checkout.member_id, other);
    assert_eq!(outcome.checkout.request_date, today());
    assert_eq!(outcome.notices, [Notice::request_date_changed()]);
    assert_eq!(outcome.notices[0].title, "Changed Request Date");
    assert_eq!(outcome.notices[0].message, "Request date changed to today!");
}

#[test]
fn member_change_on_a_todays_request_is_silent() {
    let fx = Fixture::new();
    let checkout = fx
        .workflow()
        .create(NewCheckout::for_member(&fx.member_id))
        .unwrap();
    let other = fx.other_member();

    let outcome = fx
        .workflow()
        .write(&checkout.id, CheckoutChanges::member(&other))
        .unwrap();

    assert!(outcome.notices.is_empty());
    assert_eq!(outcome.checkout.request_date, today());
}

#[test]
fn same_member_is_not_a_change() {
    let fx = Fixture::new();
    let checkout = fx
        .workflow()
        .create(NewCheckout {
            request_date: Some(today() - Duration::days(5)),
            ..NewCheckout::for_member(&fx.member_id)
        })
        .unwrap();

    let outcome = fx
        .workflow()
        .write(&checkout.id, CheckoutChanges::member(&fx.member_id))
        .unwrap();

    assert!(outcome.notices.is_empty());
    assert_eq!(outcome.checkout.request_date, today() - Duration::days(5));
}
