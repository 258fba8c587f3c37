//! Cenguigui integration
//!
//! Douyin music search with inline stream URL, cover and lyrics.

pub mod dto;
mod adapter;
mod client;

pub use client::{CenguiguiClient, DEFAULT_BASE_URL};
