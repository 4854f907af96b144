//! Stage ordering and the kanban grouping.

use library_workflow::{CheckoutChanges, CheckoutStage, NewCheckout, StageState};

use crate::support::{Fixture, CANCELLED, LENT, OVERDUE, REQUESTED, RETURNED};

#[test]
fn default_stage_is_the_first_new_stage() {
    let fx = Fixture::new();
    assert_eq!(fx.workflow().default_stage().unwrap().unwrap().id, REQUESTED);

    // Same sequence: the lower id wins.
    fx.workflow()
        .add_stage(CheckoutStage::new("Draft", 10, StageState::New).with_id("draft"))
        .unwrap();
    assert_eq!(fx.workflow().default_stage().unwrap().unwrap().id, "draft");

    fx.workflow()
        .add_stage(CheckoutStage::new("Waitlist", 5, StageState::New).with_id("waitlist"))
        .unwrap();
    assert_eq!(fx.workflow().default_stage().unwrap().unwrap().id, "waitlist");
}

#[test]
fn empty_library_has_no_stages() {
    let fx = Fixture::new();
    let empty = library_workflow::Library::in_memory(
        fx.clock.clone(),
        std::sync::Arc::new(library_workflow::UserRef::new("librarian")),
    );
    assert!(empty.checkouts().default_stage().unwrap().is_none());
    assert!(empty.checkouts().expand_stages().unwrap().is_empty());
}

#[test]
fn expand_stages_lists_every_stage_in_order() {
    let fx = Fixture::new();
    let ids: Vec<_> = fx
        .workflow()
        .expand_stages()
        .unwrap()
        .into_iter()
        .map(|s| s.id)
        .collect();
    assert_eq!(ids, [REQUESTED, LENT, OVERDUE, RETURNED, CANCELLED]);
}

#[test]
fn group_by_stage_includes_empty_columns() {
    let fx = Fixture::new();
    let first = fx
        .workflow()
        .create(NewCheckout::for_member(&fx.member_id))
        .unwrap();
    fx.workflow()
        .create(NewCheckout::for_member(&fx.member_id))
        .unwrap();
    fx.workflow().write(&first.id, CheckoutChanges::stage(LENT)).unwrap();

    let columns = fx.workflow().group_by_stage().unwrap();
    let counts: Vec<_> = columns
        .iter()
        .map(|c| (c.stage.id.as_str(), c.checkouts.len()))
        .collect();
    assert_eq!(
        counts,
        [(REQUESTED, 1), (LENT, 1), (OVERDUE, 0), (RETURNED, 0), (CANCELLED, 0)]
    );
    assert!(columns[3].stage.fold);
}
