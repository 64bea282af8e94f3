//! # Fleet Shared
//!
//! Request/response types shared between the backend and its clients.

pub mod dto;
pub mod response;

pub use response::{ApiResponse, ErrorResponse};
