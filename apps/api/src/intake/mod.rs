//! Document intake pipeline — upload validation, text extraction, archival.
//!
//! Stages run strictly in order per request:
//! validate → rate-limit → extract → parse (see `profile`).

pub mod archive;
pub mod extract;
pub mod handlers;
pub mod validate;
