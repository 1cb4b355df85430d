//! Request and Response models for the HTTP API
//!
//! This module defines the DTOs (Data Transfer Objects) used for
//! serializing/deserializing HTTP request and response bodies.

pub mod requests;
pub mod responses;

// Re-export commonly used types
pub use requests::{CreateItemRequest, ItemsQuery, KeyQuery, PatternQuery};
pub use responses::{
    HealthResponse, InvalidateResponse, Item, ItemsPage, KeysResponse, StatsResponse,
};
