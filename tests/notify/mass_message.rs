//! Sending one message to many checkouts.

use library_workflow::{BufferSink, Checkout, LibraryError, MassMessage, MessageTarget, ModelsExt};

use crate::support::Fixture;

#[test]
fn empty_selection_fails() {
    let fx = Fixture::new();
    let sink = BufferSink::new();

    let err = fx
        .library
        .mass_message(&MassMessage::new(vec![], None, "Please return"), &sink)
        .unwrap_err();

    assert!(matches!(err, LibraryError::UserError(_)));
    assert_eq!(err.to_string(), "No Checkouts were selected.");
    assert!(sink.messages().is_empty());
}

#[test]
fn empty_body_fails() {
    let fx = Fixture::new();
    let sink = BufferSink::new();

    let err = fx
        .library
        .mass_message(&MassMessage::new(fx.checkout_ids.clone(), Some("Due".into()), ""), &sink)
        .unwrap_err();

    assert_eq!(err.to_string(), "A message body is required");
    assert!(sink.messages().is_empty());
}

#[test]
fn posts_one_message_per_checkout() {
    let fx = Fixture::new();
    let sink = BufferSink::new();
    let message = MassMessage::new(
        fx.checkout_ids.clone(),
        Some("Library closing".into()),
        "<p>We close early on Friday.</p>",
    );

    let count = fx.library.mass_message(&message, &sink).unwrap();

    assert_eq!(count, fx.checkout_ids.len());
    let posted = sink.messages();
    assert_eq!(posted.len(), 2);
    for (message, id) in posted.iter().zip(&fx.checkout_ids) {
        assert_eq!(message.target, MessageTarget::of::<Checkout>(id));
        assert_eq!(message.subject.as_deref(), Some("Library closing"));
        assert_eq!(message.body, "<p>We close early on Friday.</p>");
        assert_eq!(message.channel, "comment");
    }
}

#[test]
fn unknown_checkout_is_not_found_and_nothing_is_posted() {
    let fx = Fixture::new();
    let sink = BufferSink::new();
    let mut ids = fx.checkout_ids.clone();
    ids.push("missing".into());

    let err = fx
        .library
        .mass_message(&MassMessage::new(ids, None, "Hello"), &sink)
        .unwrap_err();

    assert!(matches!(err, LibraryError::NotFound { .. }));
    assert!(sink.messages().is_empty());
}

#[test]
fn chatter_keeps_each_checkouts_thread() {
    let fx = Fixture::new();
    let chatter = fx.library.chatter();

    fx.library
        .mass_message(&MassMessage::new(fx.checkout_ids.clone(), None, "Reminder"), &chatter)
        .unwrap();

    for id in &fx.checkout_ids {
        let thread = chatter.thread(&MessageTarget::of::<Checkout>(id)).unwrap();
        assert_eq!(thread.len(), 1);
        assert_eq!(thread[0].body, "Reminder");
        assert_eq!(thread[0].author_id.as_deref(), Some("librarian"));
    }
    // Messages live in the store next to the checkouts.
    let stored = fx
        .library
        .store()
        .models::<library_workflow::LogMessage>()
        .find(&|_| true)
        .unwrap();
    assert_eq!(stored.len(), 2);
}

#[test]
fn repeated_checkout_gets_one_message() {
    let fx = Fixture::new();
    let sink = BufferSink::new();
    let first = fx.checkout_ids[0].clone();
    let second = fx.checkout_ids[1].clone();
    let message = MassMessage::new(
        vec![first.clone(), second.clone(), first.clone()],
        None,
        "Reminder",
    );

    assert_eq!(message.targets(), [first.as_str(), second.as_str()]);
    let count = fx.library.mass_message(&message, &sink).unwrap();

    assert_eq!(count, 2);
    let targets: Vec<_> = sink.messages().into_iter().map(|m| m.target.res_id).collect();
    assert_eq!(targets, [first, second]);
}

#[test]
fn blank_body_fails() {
    let fx = Fixture::new();
    let sink = BufferSink::new();

    let err = fx
        .library
        .mass_message(&MassMessage::new(fx.checkout_ids.clone(), None, "  \n\t"), &sink)
        .unwrap_err();

    assert_eq!(err.to_string(), "A message body is required");
    assert!(sink.messages().is_empty());
}
