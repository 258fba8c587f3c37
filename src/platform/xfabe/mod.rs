//! XF Netease integration
//!
//! Netease search, stream URLs with inline cover art, and raw lyrics.

pub mod dto;
mod adapter;
mod client;

pub use client::{DEFAULT_BASE_URL, XfabeClient};
