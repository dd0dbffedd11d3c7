//! Profile and interview-result persistence.

pub mod handlers;
