//! Domain rules for the company/student agreement lifecycle.
//!
//! This crate has no I/O. The storage layer (`gigbridge-db`) and the HTTP
//! server (`gigbridge-api`) both build on the types and pure functions here.

pub mod duration;
pub mod error;
pub mod matching;
pub mod modification;
pub mod party;
pub mod terms;
pub mod types;
