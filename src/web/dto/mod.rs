//! Form payloads for the web front end.

pub mod request;

pub use request::*;
