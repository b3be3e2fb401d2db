//! HTTP response domain types

mod error_body;
mod spec;

pub use error_body::{BodyDecode, ErrorResponse};
pub use spec::{ApiResponse, StatusCode};
