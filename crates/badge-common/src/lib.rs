//! Common types shared by the status badge renderer and service.

pub mod color;
pub mod config;
pub mod error;
pub mod request;
pub mod tier;

pub use color::Rgb;
pub use config::{AssetNames, BadgeConfig, CanvasConfig, ColorConfig, LayoutConfig, LimitsConfig};
pub use error::{BadgeError, BadgeResult};
pub use request::{BadgeParams, BadgeRequest, DisplayNumber};
pub use tier::{Tier, TierAssets, TierPolicy};
