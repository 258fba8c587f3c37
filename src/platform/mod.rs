//! Platform adapters - one hand-written translation layer per upstream music API.
//!
//! # Architecture
//!
//! Each provider module is split the same way:
//! - **DTOs** (`dto.rs`) - Exact upstream response shapes
//! - **Adapter** (`adapter.rs`) - Converts DTOs to domain models, tolerating junk payloads
//! - **Client** (`client.rs`) - Builds provider URLs and performs the HTTP calls
//!
//! The provider set is fixed. [`Platforms`] holds exactly one adapter per
//! [`PlatformKey`] and is the only lookup the gateway performs.

pub mod domain;
pub mod http;
pub mod traits;

pub mod cenguigui;
pub mod gdstudio;
pub mod xfabe;

use std::sync::Arc;

use crate::config::UpstreamConfig;

pub use cenguigui::CenguiguiClient;
pub use domain::{
    DetailOptions, LyricPayload, LyricText, NormalizedSong, Operation, Picture, PictureOptions,
    PlatformError, PlatformKey, SearchOptions, TrackDetail,
};
pub use gdstudio::GdstudioClient;
pub use traits::PlatformApi;
pub use xfabe::XfabeClient;

/// The registered adapters, one per provider.
#[derive(Clone)]
pub struct Platforms {
    gdstudio: Arc<dyn PlatformApi>,
    cenguigui: Arc<dyn PlatformApi>,
    xfabe: Arc<dyn PlatformApi>,
}

impl Platforms {
    /// Assemble a set from explicit adapters.
    pub fn new(
        gdstudio: Arc<dyn PlatformApi>,
        cenguigui: Arc<dyn PlatformApi>,
        xfabe: Arc<dyn PlatformApi>,
    ) -> Self {
        Self {
            gdstudio,
            cenguigui,
            xfabe,
        }
    }

    /// Build the real HTTP adapters from configuration.
    pub fn from_config(config: &UpstreamConfig) -> Self {
        let timeout = config.request_timeout();
        Self::new(
            Arc::new(GdstudioClient::with_base_url(&config.gdstudio_base_url, timeout)),
            Arc::new(CenguiguiClient::with_base_url(&config.cenguigui_base_url, timeout)),
            Arc::new(XfabeClient::with_base_url(&config.xfabe_base_url, timeout)),
        )
    }

    /// Adapter for a provider.
    pub fn get(&self, key: PlatformKey) -> &dyn PlatformApi {
        match key {
            PlatformKey::Gdstudio => self.gdstudio.as_ref(),
            PlatformKey::Cenguigui => self.cenguigui.as_ref(),
            PlatformKey::Xfabe => self.xfabe.as_ref(),
        }
    }
}

impl Default for Platforms {
    fn default() -> Self {
        Self::from_config(&UpstreamConfig::default())
    }
}
