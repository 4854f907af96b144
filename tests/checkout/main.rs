//! Checkout workflow integration tests.

mod support;
mod creation;
mod member_change;
mod lines;
mod stages;
