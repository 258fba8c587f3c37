//! The uniform `{success, data?, error?}` wrapper around every gateway response.

use serde::{Deserialize, Serialize};

use crate::platform::{LyricPayload, NormalizedSong, Picture, TrackDetail};

/// Success/error wrapper returned by the gateway.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> Envelope<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn err(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }
}

/// Payload of a successful gateway call; the shape depends on the operation.
///
/// A detail/lyric/picture lookup that found nothing serializes as `null`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum GatewayData {
    Songs(Vec<NormalizedSong>),
    Detail(Option<TrackDetail>),
    Lyric(Option<LyricPayload>),
    Picture(Option<Picture>),
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_error_envelope_shape() {
        let envelope: Envelope<GatewayData> = Envelope::err("Invalid platform parameter");
        assert_eq!(
            serde_json::to_value(&envelope).unwrap(),
            json!({"success": false, "error": "Invalid platform parameter"})
        );
    }

    #[test]
    fn test_empty_detail_serializes_as_null() {
        let envelope = Envelope::ok(GatewayData::Detail(None));
        assert_eq!(
            serde_json::to_value(&envelope).unwrap(),
            json!({"success": true, "data": null})
        );
    }

    #[test]
    fn test_decode_generic_envelope() {
        let envelope: Envelope<serde_json::Value> =
            serde_json::from_str(r#"{"success": true, "data": {"url": "https://a/b.mp3"}}"#)
                .unwrap();
        assert!(envelope.success);
        assert_eq!(envelope.data.unwrap()["url"], "https://a/b.mp3");
    }
}
