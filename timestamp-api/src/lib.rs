pub mod api;
pub mod config;
pub mod format;
pub mod handlers;
pub mod metrics_middleware;
pub mod normalize;
pub mod parse;
pub mod router;
pub mod server;
pub mod time;
