//! Core domain concepts shared across all subdomains.
//!
//! - [`error::DomainError`]: engine error taxonomy
//! - [`error::ValidationError`]: user-input rejections
//! - [`time::Timestamp`]: millisecond timestamps passed in by callers

pub mod error;
pub mod time;
