//! HTTP exposition of metrics and node status

mod handlers;
mod server;

pub use server::run_server;
