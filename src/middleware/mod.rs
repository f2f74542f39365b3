//! HTTP request helpers shared by handlers and the middleware stack.
//!
//! - **Client IP**: forwarded-header-or-peer resolution for geo lookups
//! - **Request ID**: `x-request-id` generation and propagation
//!
//! # Architecture
//!
//! ```text
//! Request → Trace → Set Request ID → Handler → Propagate Request ID → Response
//! ```

pub mod ip;
pub mod request_id;

pub use ip::{FORWARDED_FOR_HEADER, forwarded_for, resolve_client_ip};
pub use request_id::{
    REQUEST_ID_HEADER, propagate_request_id_layer, request_id, set_request_id_layer,
};
