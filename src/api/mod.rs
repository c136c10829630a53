//! API server module exposing the optimization service over REST

pub mod handlers;
pub mod routes;
pub mod server;
pub mod types;

pub use server::serve_api;
