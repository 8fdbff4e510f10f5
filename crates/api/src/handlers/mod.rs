pub mod amendments;
pub mod contracts;
pub mod modifications;
pub mod requests;
