pub mod error_handling;
pub mod request_id;

pub use request_id::{RequestId, RequestIdValue};
