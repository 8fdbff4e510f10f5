pub mod amendment;
pub mod contract;
pub mod modification;
pub mod request;
