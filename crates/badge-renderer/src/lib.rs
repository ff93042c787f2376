//! Status badge rendering.
//!
//! Draws the loyalty status badge on a supersampled canvas and downsamples it
//! to the output size:
//! - Capped progress arcs
//! - Centered single-line text with simulated bold and letter spacing
//! - Tier tint, card and icon compositing
//! - RGBA PNG encoding

pub mod arc;
pub mod assets;
pub mod canvas;
pub mod composer;
pub mod png;
pub mod text;

pub use assets::{AssetProvider, FsAssetProvider, HttpAssetProvider, MemoryAssetProvider};
pub use composer::{BadgeComposer, BadgeLayout, Rect, RenderedBadge, RingLayout, StatsRowLayout};
pub use text::{BadgeFont, FontFace};
