//! # Blog Shared
//!
//! Wire types shared between the HTTP server and its clients: request DTOs
//! with their validation rules, response payloads, and the JSON envelope
//! every response is wrapped in.

pub mod dto;
pub mod response;

pub use response::{ApiResponse, ErrorResponse};
