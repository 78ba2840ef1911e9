//! Deterministic highlight colors.
//!
//! Colors are pastel, low-opacity HSLA values so highlighted text stays readable.
//! Two policies exist: keyed (hash of a group name, stable across renders) and
//! by-index (hue steps of 60 degrees for an ordered batch).

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

pub const HIGHLIGHT_SATURATION: u8 = 70;
pub const HIGHLIGHT_LIGHTNESS: u8 = 70;
pub const HIGHLIGHT_ALPHA: f32 = 0.3;

/// Hue step used by [`color_for_index`].
const INDEX_HUE_STEP: usize = 60;

/// A CSS `hsla()` color.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hsla {
    pub hue: u16,
    pub saturation: u8,
    pub lightness: u8,
    pub alpha: f32,
}

impl Hsla {
    /// Highlight color with the fixed saturation, lightness and alpha.
    pub fn highlight(hue: u16) -> Self {
        Self {
            hue: hue % 360,
            saturation: HIGHLIGHT_SATURATION,
            lightness: HIGHLIGHT_LIGHTNESS,
            alpha: HIGHLIGHT_ALPHA,
        }
    }
}

impl fmt::Display for Hsla {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "hsla({}, {}%, {}%, {})",
            self.hue, self.saturation, self.lightness, self.alpha
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid hsla color: {0:?}")]
pub struct ParseColorError(String);

impl FromStr for Hsla {
    type Err = ParseColorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseColorError(s.to_string());

        let inner = s
            .trim()
            .strip_prefix("hsla(")
            .and_then(|rest| rest.strip_suffix(')'))
            .ok_or_else(err)?;

        let parts: Vec<&str> = inner.split(',').map(str::trim).collect();
        if parts.len() != 4 {
            return Err(err());
        }

        let percent = |p: &str| -> Result<u8, ParseColorError> {
            p.strip_suffix('%')
                .ok_or_else(err)?
                .parse::<u8>()
                .map_err(|_| err())
        };

        Ok(Hsla {
            hue: parts[0].parse::<u16>().map_err(|_| err())?,
            saturation: percent(parts[1])?,
            lightness: percent(parts[2])?,
            alpha: parts[3].parse::<f32>().map_err(|_| err())?,
        })
    }
}

impl Serialize for Hsla {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Hsla {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// How a call site assigns colors to the highlights it generates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColorPolicy {
    /// One color per group name, via [`color_for`].
    #[default]
    Keyed,
    /// One color per quote position in the batch, via [`color_for_index`].
    ByIndex,
}

impl ColorPolicy {
    pub fn pick(self, key: &str, index: usize) -> Hsla {
        match self {
            ColorPolicy::Keyed => color_for(key),
            ColorPolicy::ByIndex => color_for_index(index),
        }
    }
}

/// Shift-and-subtract string hash (`c + (h << 5) - h`) over UTF-16 code units.
///
/// The shift operates on the low 32 bits of the accumulator while the subtraction
/// uses the full value, so the result matches the browser-side hash exactly.
pub fn string_hash(key: &str) -> i64 {
    key.encode_utf16().fold(0i64, |acc, unit| {
        let shifted = (acc as i32).wrapping_shl(5) as i64;
        unit as i64 + (shifted - acc)
    })
}

/// Deterministic color for a named group (e.g. a criterion).
pub fn color_for(key: &str) -> Hsla {
    let hue = (string_hash(key) % 360).unsigned_abs() as u16;
    Hsla::highlight(hue)
}

/// Color for the `index`-th highlight of an ordered batch.
pub fn color_for_index(index: usize) -> Hsla {
    let hue = ((index % (360 / INDEX_HUE_STEP)) * INDEX_HUE_STEP) as u16;
    Hsla::highlight(hue)
}
