//! HTTP server: state, handlers and assembly

pub mod builder;
pub mod handlers;
pub mod state;

pub use builder::{build_router, serve};
pub use state::AppState;
