//! Remote resource client for the recipe archive REST API.
//!
//! One module per concern: typed entities, duration conversions, wire
//! payload formatting, and the reqwest client itself.

pub mod client;
pub mod duration;
pub mod payload;
pub mod types;

pub use client::ApiClient;
