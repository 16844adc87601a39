//! Storage for the service layer
//!
//! The JSON file is the single source of truth: every operation reads it
//! whole and every mutation rewrites it whole.

pub mod document_store;
