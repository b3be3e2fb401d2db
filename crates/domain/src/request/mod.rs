//! HTTP request domain types

mod auth;
mod header;
mod method;
mod query;
mod spec;

pub use auth::{AuthHeader, TOKEN_HEADER};
pub use header::{Header, Headers};
pub use method::HttpMethod;
pub use query::{ParamEncoding, QueryParam, QueryParams};
pub use spec::ApiRequest;
pub(crate) use spec::duration_millis;
