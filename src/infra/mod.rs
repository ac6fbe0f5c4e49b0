mod config;
mod kv;
mod session_store;

pub use config::*;
pub use kv::*;
pub use session_store::*;
