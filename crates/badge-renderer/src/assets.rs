//! Asset providers.
//!
//! Fonts, backgrounds, cards and icons are addressed by logical name and may
//! be absent. A provider only has to hand out raw bytes; decoding and the
//! conversion of every failure into `None` happen in the trait's provided
//! methods, so nothing an asset store does can abort a render.

use image::RgbaImage;
use std::collections::HashMap;
use std::path::{Component, Path, PathBuf};
use std::time::Duration;
use tracing::{debug, warn};

use badge_common::{BadgeError, BadgeResult};

use crate::png::encode_png;
use crate::text::FontFace;

/// Source of raw asset bytes.
pub trait AssetProvider: Send + Sync {
    /// Fetch raw bytes for `name`. Errors describe why the asset is unavailable.
    fn fetch(&self, name: &str) -> BadgeResult<Vec<u8>>;

    /// Short description for logs.
    fn describe(&self) -> String;

    /// Load and decode a raster asset as RGBA. `None` when missing or undecodable.
    fn load(&self, name: &str) -> Option<RgbaImage> {
        let bytes = match self.fetch(name) {
            Ok(bytes) => bytes,
            Err(e) => {
                warn!(asset = %name, provider = %self.describe(), error = %e, "Image asset unavailable");
                return None;
            }
        };
        match image::load_from_memory(&bytes) {
            Ok(img) => {
                debug!(asset = %name, width = img.width(), height = img.height(), "Loaded image asset");
                Some(img.to_rgba8())
            }
            Err(e) => {
                warn!(asset = %name, error = %e, "Image asset could not be decoded");
                None
            }
        }
    }

    /// Load and parse a TrueType/OpenType font. `None` when missing or unparsable.
    fn load_font_face(&self, name: &str) -> Option<FontFace> {
        let bytes = match self.fetch(name) {
            Ok(bytes) => bytes,
            Err(e) => {
                warn!(asset = %name, provider = %self.describe(), error = %e, "Font asset unavailable");
                return None;
            }
        };
        let face = FontFace::from_bytes(bytes);
        if face.is_none() {
            warn!(asset = %name, "Font asset could not be parsed");
        }
        face
    }
}

impl<P: AssetProvider + ?Sized> AssetProvider for std::sync::Arc<P> {
    fn fetch(&self, name: &str) -> BadgeResult<Vec<u8>> {
        (**self).fetch(name)
    }

    fn describe(&self) -> String {
        (**self).describe()
    }
}

// ============================================================================
// Filesystem
// ============================================================================

/// Assets stored as files under a root directory.
#[derive(Debug, Clone)]
pub struct FsAssetProvider {
    root: PathBuf,
}

impl FsAssetProvider {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolve a logical name below the root. Names that would escape it are refused.
    fn resolve(&self, name: &str) -> Option<PathBuf> {
        let relative = Path::new(name);
        let escapes = relative
            .components()
            .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir));
        if name.is_empty() || escapes {
            return None;
        }
        Some(self.root.join(relative))
    }
}

impl AssetProvider for FsAssetProvider {
    fn fetch(&self, name: &str) -> BadgeResult<Vec<u8>> {
        let path = self
            .resolve(name)
            .ok_or_else(|| BadgeError::asset(name, "invalid asset name"))?;
        if !path.is_file() {
            return Err(BadgeError::asset(
                name,
                format!("{} not found", path.display()),
            ));
        }
        std::fs::read(&path).map_err(|e| BadgeError::asset(name, e))
    }

    fn describe(&self) -> String {
        format!("fs:{}", self.root.display())
    }
}

// ============================================================================
// HTTP
// ============================================================================

/// Assets fetched from `{base_url}/{name}` with a bounded timeout.
///
/// Uses a blocking client; call it from a blocking thread, never from inside
/// an async task.
#[derive(Debug, Clone)]
pub struct HttpAssetProvider {
    base_url: String,
    client: reqwest::blocking::Client,
}

impl HttpAssetProvider {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> BadgeResult<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .connect_timeout(timeout)
            .build()
            .map_err(|e| BadgeError::Config(format!("HTTP client: {}", e)))?;
        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client,
        })
    }

    pub fn url_for(&self, name: &str) -> String {
        format!("{}/{}", self.base_url, name.trim_start_matches('/'))
    }
}

impl AssetProvider for HttpAssetProvider {
    fn fetch(&self, name: &str) -> BadgeResult<Vec<u8>> {
        let url = self.url_for(name);
        let response = self
            .client
            .get(&url)
            .send()
            .and_then(|r| r.error_for_status())
            .map_err(|e| BadgeError::asset(name, e))?;
        let bytes = response.bytes().map_err(|e| BadgeError::asset(name, e))?;
        Ok(bytes.to_vec())
    }

    fn describe(&self) -> String {
        format!("http:{}", self.base_url)
    }
}

// ============================================================================
// In-memory
// ============================================================================

/// Assets held in memory. Used for embedding and in tests.
#[derive(Debug, Clone, Default)]
pub struct MemoryAssetProvider {
    assets: HashMap<String, Vec<u8>>,
}

impl MemoryAssetProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, bytes: Vec<u8>) {
        self.assets.insert(name.into(), bytes);
    }

    /// Store an image, PNG-encoded.
    pub fn insert_image(&mut self, name: impl Into<String>, image: &RgbaImage) -> BadgeResult<()> {
        let bytes = encode_png(image)?;
        self.insert(name, bytes);
        Ok(())
    }

    pub fn with(mut self, name: impl Into<String>, bytes: Vec<u8>) -> Self {
        self.insert(name, bytes);
        self
    }

    pub fn len(&self) -> usize {
        self.assets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assets.is_empty()
    }
}

impl AssetProvider for MemoryAssetProvider {
    fn fetch(&self, name: &str) -> BadgeResult<Vec<u8>> {
        self.assets
            .get(name)
            .cloned()
            .ok_or_else(|| BadgeError::asset(name, "not in memory store"))
    }

    fn describe(&self) -> String {
        format!("memory:{} assets", self.assets.len())
    }
}
