//! # Domain Layer
//!
//! Core models and errors, independent of transport and framework concerns.

pub mod error;
pub mod models;

pub use error::*;
pub use models::*;
