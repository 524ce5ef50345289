//! Job-application tracker backend: credential handling, user records and
//! job application CRUD behind a REST API.

pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
pub mod settings;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use domain::{TRACE_ID_HEADER, TraceId};
pub use middleware::Trace;
