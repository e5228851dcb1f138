//! Board configuration.

use crate::background::BackgroundConfig;
use crate::error::BoardResult;
use crate::items::Paint;
use crate::transformer::{HandleMetrics, TransformerConfig};
use serde::{Deserialize, Serialize};

/// Tunables of the board. Every field has a default, so partial JSON is accepted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoardConfig {
    pub min_zoom: f64,
    pub max_zoom: f64,
    /// Relative zoom change per wheel notch.
    pub zoom_step: f64,
    /// Pointer-move coalescing window in milliseconds.
    pub move_throttle_ms: f64,
    /// Visible corner handle size, screen pixels.
    pub handle_size: f64,
    /// Invisible padding around handle hit regions, screen pixels.
    pub handle_hit_padding: f64,
    /// Distance of the rotate knob above the selection, screen pixels.
    pub rotate_handle_offset: f64,
    /// Rounding step for transformer positions and angles.
    pub transform_precision: f64,
    /// Item hit-test tolerance, screen pixels.
    pub hit_tolerance: f64,
    pub background: BackgroundConfig,
    /// Style given to newly drawn items.
    pub default_style: Paint,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            min_zoom: 0.3,
            max_zoom: 10.0,
            zoom_step: 0.1,
            move_throttle_ms: 20.0,
            handle_size: 8.0,
            handle_hit_padding: 8.0,
            rotate_handle_offset: 30.0,
            transform_precision: 0.1,
            hit_tolerance: 4.0,
            background: BackgroundConfig::default(),
            default_style: Paint::default(),
        }
    }
}

impl BoardConfig {
    /// Parse a configuration from JSON.
    pub fn from_json(json: &str) -> BoardResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        log::info!(
            "loaded board config: zoom {}..{}, throttle {}ms",
            config.min_zoom,
            config.max_zoom,
            config.move_throttle_ms
        );
        Ok(config)
    }

    /// Serialize the configuration to JSON.
    pub fn to_json(&self) -> BoardResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn transformer(&self) -> TransformerConfig {
        TransformerConfig {
            handles: HandleMetrics {
                size: self.handle_size,
                hit_padding: self.handle_hit_padding,
                rotate_offset: self.rotate_handle_offset,
            },
            precision: self.transform_precision,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::background::PatternStyle;
    use crate::error::BoardError;

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = BoardConfig::from_json(r#"{ "max_zoom": 4.0, "background": { "style": "grid" } }"#).unwrap();
        assert_eq!(config.max_zoom, 4.0);
        assert_eq!(config.min_zoom, 0.3);
        assert_eq!(config.background.style, PatternStyle::Grid);
        assert_eq!(config.background.tile_size, 40.0);
        assert_eq!(config.default_style, Paint::default());
    }

    #[test]
    fn test_round_trip() {
        let config = BoardConfig::default();
        let json = config.to_json().unwrap();
        assert_eq!(BoardConfig::from_json(&json).unwrap(), config);
    }

    #[test]
    fn test_invalid_json() {
        let result = BoardConfig::from_json("{ \"min_zoom\": \"small\" }");
        assert!(matches!(result, Err(BoardError::Config(_))));
    }
}
