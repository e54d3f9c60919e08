pub mod csrf;
pub mod request_id;

pub use csrf::CsrfGuard;
pub use request_id::{REQUEST_ID_HEADER, RequestId, RequestIdMiddleware};
