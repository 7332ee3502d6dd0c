//! # NutriVision Core
//!
//! The domain layer of the NutriVision API.
//! This crate holds the user model, error types and the ports that
//! infrastructure implements. It has no infrastructure dependencies.

pub mod domain;
pub mod error;
pub mod ports;
pub mod validation;

pub use error::{DomainError, RepoError};
