//! # Pratik Shared
//!
//! Wire types shared by the blog server and its HTTP client.

pub mod dto;
pub mod response;

pub use response::{ApiResponse, ErrorResponse};
