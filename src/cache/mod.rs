//! Cache Module
//!
//! Provides the instrumented key-value cache and the values it stores.

mod store;
mod value;


// Re-export public types
pub use store::{Cache, StoreValue};
pub use value::{decode_float, decode_int, decode_text, Value};

// == Public Constants ==
/// Maximum value size accepted over HTTP, in bytes
pub const MAX_VALUE_SIZE: usize = 1024 * 1024; // 1 MB
