//! Transport-facing handlers over `practicals_core`.

pub mod api;

pub use api::{ApiResponse, ApiStatus};
