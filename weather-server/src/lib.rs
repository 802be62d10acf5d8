//! HTTP surface of the weather aggregation endpoint.
//!
//! The binary in `main.rs` adds the command line on top of this.

pub mod error;
pub mod handlers;
pub mod routes;
pub mod server;
pub mod state;

pub use error::{ApiError, ErrorResponse};
pub use routes::create_router;
pub use server::serve;
pub use state::AppState;
