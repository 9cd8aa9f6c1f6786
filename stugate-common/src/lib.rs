//! # Stugate Common Library
//!
//! Shared code for the stugate services including:
//! - Session resolution from the inbound signed token
//! - Tiered TTL cache
//! - Common error types

pub mod cache;
pub mod error;
pub mod session;

pub use cache::TieredCache;
pub use error::{Error, Result};
pub use session::{Session, SessionError};
