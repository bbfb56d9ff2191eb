//! Shared helpers for in-crate unit tests.

pub(crate) mod socket_guard;
