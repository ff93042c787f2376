//! Immutable badge configuration.
//!
//! Every dimension here is expressed in output (target) pixels. The renderer
//! multiplies by `canvas.scale_factor` when it draws on the supersampled canvas.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::color::Rgb;
use crate::error::{BadgeError, BadgeResult};

/// Top-level configuration injected into the badge composer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct BadgeConfig {
    pub canvas: CanvasConfig,
    pub limits: LimitsConfig,
    pub colors: ColorConfig,
    pub assets: AssetNames,
    pub layout: LayoutConfig,
}

/// Output size and supersampling factor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CanvasConfig {
    pub target_width: u32,
    pub target_height: u32,
    /// Geometry is drawn at this multiple of the target size, then downsampled once.
    pub scale_factor: u32,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            target_width: 400,
            target_height: 460,
            scale_factor: 8,
        }
    }
}

/// Maxima that progress is measured against.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LimitsConfig {
    pub max_points: i64,
    pub max_nights: i64,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_points: 14_000,
            max_nights: 60,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColorConfig {
    /// Flat backdrop used when the background image is missing (beige, email template).
    pub background: Rgb,
    pub text: Rgb,
    /// Opacity of the tier tint overlay, 0.0..=1.0.
    pub tint_alpha: f32,
    pub points_track: Rgb,
    pub nights_track: Rgb,
    pub points_fill: Rgb,
    pub nights_fill: Rgb,
    /// Disc drawn behind every icon.
    pub icon_backing: Rgb,
}

impl Default for ColorConfig {
    fn default() -> Self {
        Self {
            background: Rgb::new(226, 192, 156),
            text: Rgb::WHITE,
            tint_alpha: 0.40,
            points_track: Rgb::new(230, 242, 245),
            nights_track: Rgb::new(227, 230, 238),
            points_fill: Rgb::new(45, 228, 216),
            nights_fill: Rgb::new(72, 94, 234),
            icon_backing: Rgb::WHITE,
        }
    }
}

/// Logical asset names resolved through an asset provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssetNames {
    pub background: String,
    pub font: String,
    pub bold_font: String,
    pub points_icon: String,
    pub nights_icon: String,
    /// Absolute font paths tried when the named fonts are unavailable.
    pub system_fonts: Vec<String>,
}

impl Default for AssetNames {
    fn default() -> Self {
        Self {
            background: "background.png".to_string(),
            font: "badge_font.ttf".to_string(),
            bold_font: "bold_font.ttf".to_string(),
            points_icon: "icon_points.png".to_string(),
            nights_icon: "icon_nights.png".to_string(),
            system_fonts: vec![
                "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf".to_string(),
                "/usr/share/fonts/TTF/DejaVuSans.ttf".to_string(),
                "/usr/share/fonts/dejavu/DejaVuSans.ttf".to_string(),
                "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf".to_string(),
                "/Library/Fonts/Arial.ttf".to_string(),
            ],
        }
    }
}

/// Layout metrics, in target pixels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    pub top_padding: f32,
    pub text_gap: f32,

    pub tier_font_size: f32,
    pub tier_letter_spacing: f32,
    pub tier_stroke: f32,
    pub reward_font_size: f32,
    pub reward_stroke: f32,
    pub discount_font_size: f32,

    /// Space between the discount line and the top of the outer arc.
    pub arc_gap: f32,
    pub outer_radius: f32,
    pub inner_radius: f32,
    pub arc_stroke: f32,

    /// Diameter of the white disc behind an arc endpoint icon.
    pub arc_icon_backing: f32,
    pub arc_icon_size: f32,

    pub next_tier_font_size: f32,
    /// Distance from the inner arc's inner edge down to the "To achieve" line.
    pub next_tier_offset: f32,

    pub card_width: f32,
    /// Width / height used to reserve space when the card image is missing.
    pub card_default_aspect: f32,
    pub card_gap: f32,

    pub stats_gap: f32,
    pub stats_font_size: f32,
    pub stats_value_stroke: f32,
    pub stats_icon_backing: f32,
    pub stats_icon_size: f32,
    pub stats_icon_gap: f32,
    pub stats_label_gap: f32,
    pub stats_row_padding: f32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            top_padding: 28.0,
            text_gap: 8.0,
            tier_font_size: 34.0,
            tier_letter_spacing: 4.0,
            tier_stroke: 1.0,
            reward_font_size: 20.0,
            reward_stroke: 0.5,
            discount_font_size: 14.0,
            arc_gap: 16.0,
            outer_radius: 150.0,
            inner_radius: 112.0,
            arc_stroke: 18.0,
            arc_icon_backing: 26.0,
            arc_icon_size: 16.0,
            next_tier_font_size: 12.0,
            next_tier_offset: 48.0,
            card_width: 140.0,
            card_default_aspect: 1.586,
            card_gap: 8.0,
            stats_gap: 24.0,
            stats_font_size: 16.0,
            stats_value_stroke: 0.5,
            stats_icon_backing: 28.0,
            stats_icon_size: 18.0,
            stats_icon_gap: 10.0,
            stats_label_gap: 6.0,
            stats_row_padding: 12.0,
        }
    }
}

impl BadgeConfig {
    /// Load configuration from a YAML string. Missing keys take their defaults.
    pub fn from_yaml_str(yaml: &str) -> BadgeResult<Self> {
        let config: BadgeConfig = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a YAML file
    pub fn from_file(path: impl AsRef<Path>) -> BadgeResult<Self> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(|e| {
            BadgeError::Config(format!("cannot read {}: {}", path.as_ref().display(), e))
        })?;
        Self::from_yaml_str(&content)
    }

    /// Copy of this configuration with a different supersampling factor.
    pub fn with_scale_factor(&self, scale_factor: u32) -> Self {
        let mut config = self.clone();
        config.canvas.scale_factor = scale_factor;
        config
    }

    pub fn validate(&self) -> BadgeResult<()> {
        let canvas = &self.canvas;
        if canvas.target_width == 0 || canvas.target_height == 0 {
            return Err(BadgeError::Config(
                "target dimensions must be non-zero".to_string(),
            ));
        }
        if canvas.scale_factor == 0 || canvas.scale_factor > 16 {
            return Err(BadgeError::Config(format!(
                "scale_factor must be in 1..=16, got {}",
                canvas.scale_factor
            )));
        }
        if self.limits.max_points <= 0 || self.limits.max_nights <= 0 {
            return Err(BadgeError::Config("maxima must be positive".to_string()));
        }
        if !(0.0..=1.0).contains(&self.colors.tint_alpha) {
            return Err(BadgeError::Config(format!(
                "tint_alpha must be within 0..=1, got {}",
                self.colors.tint_alpha
            )));
        }

        let layout = &self.layout;
        if layout.inner_radius >= layout.outer_radius {
            return Err(BadgeError::Config(
                "inner_radius must be smaller than outer_radius".to_string(),
            ));
        }
        if layout.arc_stroke <= 0.0 || layout.arc_stroke >= layout.inner_radius {
            return Err(BadgeError::Config(
                "arc_stroke must be positive and smaller than inner_radius".to_string(),
            ));
        }
        if layout.card_default_aspect <= 0.0 || layout.card_width <= 0.0 {
            return Err(BadgeError::Config(
                "card dimensions must be positive".to_string(),
            ));
        }

        Ok(())
    }
}
