//! LRC lyric parsing.
//!
//! Only the first `[mm:ss]` / `[mm:ss.xx]` / `[mm:ss.xxx]` tag of a line sets
//! its time; every tag is stripped from the text. Lines without a tag, or
//! with nothing left after stripping, are dropped. Cues keep source order.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

static TIME_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[(\d{2}):(\d{2})(?:\.(\d{2,3}))?\]").expect("valid regex"));

/// One timestamped lyric line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimedCue {
    /// Seconds from track start, millisecond precision.
    /// Serialized as a fixed three-decimal string, e.g. `"62.500"`.
    #[serde(serialize_with = "serialize_time", deserialize_with = "deserialize_time")]
    pub time: f64,
    #[serde(alias = "name")]
    pub text: String,
}

impl TimedCue {
    fn from_millis(millis: u64, text: String) -> Self {
        Self {
            time: millis as f64 / 1000.0,
            text,
        }
    }

    /// Time as a three-decimal string.
    pub fn time_label(&self) -> String {
        format!("{:.3}", self.time)
    }
}

/// Parse LRC markup into timed cues.
pub fn parse_lyric(lrc: &str) -> Vec<TimedCue> {
    lrc.lines()
        .filter_map(|line| {
            let caps = TIME_TAG.captures(line)?;
            let minutes: u64 = caps[1].parse().ok()?;
            let seconds: u64 = caps[2].parse().ok()?;
            // The fraction is a raw millisecond count, whatever its width
            let fraction_ms: u64 = caps.get(3).map_or(Ok(0), |m| m.as_str().parse()).ok()?;

            let text = TIME_TAG.replace_all(line, "").trim().to_string();
            if text.is_empty() {
                return None;
            }

            let millis = (minutes * 60 + seconds) * 1000 + fraction_ms;
            Some(TimedCue::from_millis(millis, text))
        })
        .collect()
}

fn serialize_time<S: Serializer>(time: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&format!("{:.3}", time))
}

fn deserialize_time<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Time {
        Number(f64),
        Text(String),
    }

    match Time::deserialize(deserializer)? {
        Time::Number(n) => Ok(n),
        Time::Text(s) => s.trim().parse().map_err(serde::de::Error::custom),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::fmt::Write as _;

    /// Render cues back to LRC, one `[mm:ss.mmm]` line per cue.
    fn to_lrc(cues: &[TimedCue]) -> String {
        let mut out = String::new();
        for cue in cues {
            let millis = (cue.time * 1000.0).round() as u64;
            let _ = writeln!(
                out,
                "[{:02}:{:02}.{:03}]{}",
                millis / 60_000,
                (millis / 1000) % 60,
                millis % 1000,
                cue.text
            );
        }
        out
    }

    #[test]
    fn test_parse_millisecond_tag() {
        let cues = parse_lyric("[01:02.500]hello");
        assert_eq!(cues.len(), 1);
        assert_eq!(cues[0].time_label(), "62.500");
        assert_eq!(cues[0].text, "hello");
    }

    #[test]
    fn test_two_digit_fraction_counts_milliseconds() {
        let cues = parse_lyric("[00:01.50]a\n[00:02]b\n[00:03.050]c");
        assert_eq!(cues[0].time_label(), "1.050");
        assert_eq!(cues[1].time_label(), "2.000");
        assert_eq!(cues[2].time_label(), "3.050");
    }

    #[test]
    fn test_drops_untimed_and_empty_lines() {
        let lrc = "[ti:晴天]\n[ar:周杰伦]\nplain text\n[00:10.00]\n[00:12.00]   \n[00:15.00]故事的小黄花\r\n";
        let cues = parse_lyric(lrc);
        assert_eq!(cues.len(), 1);
        assert_eq!(cues[0].text, "故事的小黄花");
    }

    #[test]
    fn test_keeps_source_order_and_first_tag() {
        let cues = parse_lyric("[00:30.00]later\n[00:05.00][00:40.00]chorus");
        assert_eq!(cues[0].text, "later");
        assert_eq!(cues[1].text, "chorus");
        assert_eq!(cues[1].time_label(), "5.000");
    }

    #[test]
    fn test_serialized_shape() {
        let cue = TimedCue {
            time: 62.5,
            text: "hello".to_string(),
        };
        assert_eq!(
            serde_json::to_value(&cue).unwrap(),
            serde_json::json!({"time": "62.500", "text": "hello"})
        );

        // Records persisted by older clients use `name` for the text
        let old: TimedCue = serde_json::from_str(r#"{"time": "1.000", "name": "x"}"#).unwrap();
        assert_eq!(old.text, "x");
        assert_eq!(old.time, 1.0);
    }

    fn lrc_line() -> impl Strategy<Value = String> {
        prop_oneof![
            (0u32..100, 0u32..60, 0u32..1000, "[a-zA-Z0-9 ]{0,12}")
                .prop_map(|(m, s, ms, t)| format!("[{:02}:{:02}.{:03}]{}", m, s, ms, t)),
            (0u32..100, 0u32..60, 0u32..100, "[a-zA-Z0-9 ]{0,12}")
                .prop_map(|(m, s, ms, t)| format!("[{:02}:{:02}.{:02}]{}", m, s, ms, t)),
            "[a-zA-Z0-9 ]{0,12}",
        ]
    }

    proptest! {
        #[test]
        fn prop_reparse_is_stable(lines in proptest::collection::vec(lrc_line(), 0..20)) {
            let cues = parse_lyric(&lines.join("\n"));
            prop_assert_eq!(parse_lyric(&to_lrc(&cues)), cues.clone());
            prop_assert!(cues.iter().all(|c| !c.text.is_empty()));
        }

        #[test]
        fn prop_fraction_is_raw_milliseconds(s in 0u32..60, ms in 0u32..100) {
            let cues = parse_lyric(&format!("[00:{:02}.{:02}]x", s, ms));
            prop_assert_eq!(cues[0].time_label(), format!("{}.{:03}", s, ms));
        }
    }
}
