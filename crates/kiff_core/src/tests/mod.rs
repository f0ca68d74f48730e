//! Test doubles and end-to-end bootstrap scenarios

pub(crate) mod mock;
