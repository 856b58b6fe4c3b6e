//! Response interception
//!
//! Passive observation of the dashboard's backend traffic. Captured responses
//! are attributed to the section that was current when they arrived.

pub mod interceptor;
pub mod listener;

pub use interceptor::{RelevanceFilter, ResponseInterceptor, ResponseMeta, parse_body};
pub use listener::spawn_response_listener;
