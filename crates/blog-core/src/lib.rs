//! # Blog Core
//!
//! The domain layer of the blog backend.
//! This crate contains pure business logic with zero infrastructure dependencies:
//! entities, the ownership rule, pagination, the error taxonomy and the ports
//! that storage, cache and token adapters implement.

pub mod domain;
pub mod error;
pub mod ports;

pub use error::{DomainError, RepoError};
