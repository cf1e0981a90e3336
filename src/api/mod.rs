//! API Module
//!
//! HTTP handlers and routing for the cache server REST API.
//!
//! # Endpoints
//! - `PUT /store` - Store a value under a generated key
//! - `GET /retrieve/:key` - Retrieve a value, optionally decoded
//! - `GET /calls/:operation` - Invocation count of an operation
//! - `GET /replay/:operation` - Recorded call trace of an operation
//! - `GET /fetch` - Memoized page fetch
//! - `GET /memo/stats` - Memoizer statistics
//! - `GET /health` - Health check endpoint

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
