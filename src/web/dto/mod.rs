//! Data Transfer Objects for the contact API.

pub mod request;
pub mod response;

pub use request::*;
pub use response::*;
