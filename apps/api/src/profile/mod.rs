//! Candidate profile domain — heuristic parsing of extracted resume text and
//! the insert-only profile store.
//!
//! The parser is a pipeline of independent extractors (contact, sections,
//! entries, vocabulary) rather than one monolithic pattern, so each rule can
//! be unit-tested and extended on its own.

pub mod contact;
pub mod experience;
pub mod handlers;
pub mod models;
pub mod parser;
pub mod sections;
pub mod store;
pub mod vocab;
