//! # campus-core
//!
//! Core crate for the campus presence service. Contains configuration
//! schemas, typed identifiers, the clock abstraction, and the unified
//! error system.
//!
//! This crate has **no** internal dependencies on other campus crates.

pub mod config;
pub mod error;
pub mod result;
pub mod traits;
pub mod types;

pub use error::AppError;
pub use result::AppResult;
