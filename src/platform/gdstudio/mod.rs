//! GD Studio integration
//!
//! Search, stream URL, cover art and lyrics from the GD Studio music API.

pub mod dto;
mod adapter;
mod client;

pub use client::{DEFAULT_BASE_URL, GdstudioClient};
