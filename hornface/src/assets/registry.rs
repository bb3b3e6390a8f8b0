use std::{
    collections::{BTreeMap, HashMap},
    path::{Path, PathBuf},
};

use rayon::prelude::*;

use crate::{
    assets::decode::{PreparedImage, decode_image_file},
    foundation::error::{HornfaceError, HornfaceResult},
};

/// Closed set of sprite assets the compositor knows how to place.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub enum AssetKind {
    /// Horn drawn above the left side of the face.
    #[serde(rename = "leftHorn")]
    LeftHorn,
    /// Horn drawn above the right side of the face.
    #[serde(rename = "rightHorn")]
    RightHorn,
    /// Eye sprite, drawn twice per face.
    #[serde(rename = "eye")]
    Eye,
    /// Whisker bar drawn across the lower face.
    #[serde(rename = "morr")]
    Whiskers,
}

impl AssetKind {
    /// Every kind, in manifest order.
    pub const ALL: [AssetKind; 4] = [
        AssetKind::LeftHorn,
        AssetKind::RightHorn,
        AssetKind::Eye,
        AssetKind::Whiskers,
    ];

    /// Stable identifier used in manifests and logs.
    pub fn identifier(self) -> &'static str {
        match self {
            AssetKind::LeftHorn => "leftHorn",
            AssetKind::RightHorn => "rightHorn",
            AssetKind::Eye => "eye",
            AssetKind::Whiskers => "morr",
        }
    }

    /// Path of the bundled sprite relative to the assets root.
    pub fn default_path(self) -> &'static str {
        match self {
            AssetKind::LeftHorn => "items/L-horn.png",
            AssetKind::RightHorn => "items/R-horn.png",
            AssetKind::Eye => "items/eye.png",
            AssetKind::Whiskers => "items/morr.png",
        }
    }

    /// Inverse of [`AssetKind::identifier`].
    pub fn from_identifier(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.identifier() == id)
    }
}

/// A decoded sprite with its natural pixel dimensions.
#[derive(Clone, Debug)]
pub struct OverlayAsset {
    /// Which sprite this is.
    pub kind: AssetKind,
    /// Decoded premultiplied pixels.
    pub image: PreparedImage,
}

impl OverlayAsset {
    /// Pair a decoded image with its kind, rejecting empty bitmaps.
    pub fn new(kind: AssetKind, image: PreparedImage) -> HornfaceResult<Self> {
        if image.width == 0 || image.height == 0 {
            return Err(HornfaceError::asset_load(format!(
                "{} decoded to an empty {}x{} bitmap",
                kind.identifier(),
                image.width,
                image.height
            )));
        }
        Ok(Self { kind, image })
    }

    /// Decoded width in pixels.
    pub fn natural_width(&self) -> u32 {
        self.image.width
    }

    /// Decoded height in pixels.
    pub fn natural_height(&self) -> u32 {
        self.image.height
    }

    /// `natural_height / natural_width`.
    pub fn aspect_ratio(&self) -> f64 {
        f64::from(self.image.height) / f64::from(self.image.width)
    }
}

/// Where each sprite is loaded from. Always names all four kinds exactly once.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AssetManifest {
    paths: BTreeMap<AssetKind, PathBuf>,
}

impl Default for AssetManifest {
    fn default() -> Self {
        Self {
            paths: AssetKind::ALL
                .into_iter()
                .map(|k| (k, PathBuf::from(k.default_path())))
                .collect(),
        }
    }
}

impl AssetManifest {
    /// Parse a JSON object mapping identifiers (`leftHorn`, `rightHorn`, `eye`, `morr`) to paths.
    pub fn from_json_str(json: &str) -> HornfaceResult<Self> {
        let raw: BTreeMap<String, PathBuf> = serde_json::from_str(json)
            .map_err(|e| HornfaceError::serde(format!("asset manifest: {e}")))?;

        let mut paths = BTreeMap::new();
        for (id, path) in raw {
            let kind = AssetKind::from_identifier(&id).ok_or_else(|| {
                HornfaceError::validation(format!("asset manifest: unknown asset '{id}'"))
            })?;
            paths.insert(kind, path);
        }
        for kind in AssetKind::ALL {
            if !paths.contains_key(&kind) {
                return Err(HornfaceError::validation(format!(
                    "asset manifest: missing '{}'",
                    kind.identifier()
                )));
            }
        }
        Ok(Self { paths })
    }

    /// Read a JSON manifest from disk.
    pub fn from_path(path: &Path) -> HornfaceResult<Self> {
        let json = std::fs::read_to_string(path).map_err(|e| {
            HornfaceError::validation(format!("read asset manifest '{}': {e}", path.display()))
        })?;
        Self::from_json_str(&json)
    }

    /// Replace the path of one sprite.
    pub fn with_path(mut self, kind: AssetKind, path: impl Into<PathBuf>) -> Self {
        self.paths.insert(kind, path.into());
        self
    }

    /// Join every relative path onto `root`; absolute paths are kept.
    pub fn resolved(&self, root: &Path) -> Self {
        Self {
            paths: self
                .paths
                .iter()
                .map(|(k, p)| (*k, root.join(p)))
                .collect(),
        }
    }

    /// Path configured for `kind`.
    pub fn path(&self, kind: AssetKind) -> &Path {
        // Construction guarantees every kind is present.
        self.paths
            .get(&kind)
            .map(PathBuf::as_path)
            .unwrap_or_else(|| Path::new(kind.default_path()))
    }
}

/// Owns the decoded sprites for the lifetime of a session.
#[derive(Clone, Debug)]
pub struct AssetRegistry {
    manifest: AssetManifest,
    assets: Option<HashMap<AssetKind, OverlayAsset>>,
}

impl AssetRegistry {
    /// A registry that has not decoded anything yet.
    pub fn new(manifest: AssetManifest) -> Self {
        Self {
            manifest,
            assets: None,
        }
    }

    /// A registry built from already decoded sprites. All four kinds are required.
    pub fn preloaded(assets: impl IntoIterator<Item = OverlayAsset>) -> HornfaceResult<Self> {
        let assets: HashMap<AssetKind, OverlayAsset> =
            assets.into_iter().map(|a| (a.kind, a)).collect();
        if let Some(missing) = AssetKind::ALL.iter().find(|k| !assets.contains_key(k)) {
            return Err(HornfaceError::asset_load(format!(
                "missing sprite '{}'",
                missing.identifier()
            )));
        }
        Ok(Self {
            manifest: AssetManifest::default(),
            assets: Some(assets),
        })
    }

    /// Manifest the registry loads from.
    pub fn manifest(&self) -> &AssetManifest {
        &self.manifest
    }

    /// Decode every sprite concurrently. Any single failure fails the whole registry.
    ///
    /// Calling this again after a successful load is a no-op.
    #[tracing::instrument(skip(self))]
    pub fn load(&mut self) -> HornfaceResult<()> {
        if self.assets.is_some() {
            return Ok(());
        }

        let decoded = AssetKind::ALL
            .par_iter()
            .map(|&kind| -> HornfaceResult<(AssetKind, OverlayAsset)> {
                let path = self.manifest.path(kind);
                let image = decode_image_file(path).map_err(|e| {
                    HornfaceError::asset_load(format!("failed to load {}: {e}", path.display()))
                })?;
                let asset = OverlayAsset::new(kind, image)?;
                tracing::info!(
                    path = %path.display(),
                    width = asset.natural_width(),
                    height = asset.natural_height(),
                    "loaded sprite"
                );
                Ok((kind, asset))
            })
            .collect::<HornfaceResult<HashMap<_, _>>>()?;

        self.assets = Some(decoded);
        Ok(())
    }

    /// Whether [`AssetRegistry::load`] has completed successfully.
    pub fn is_ready(&self) -> bool {
        self.assets.is_some()
    }

    /// Decoded sprite for `kind`, or `AssetNotReady` before loading finished.
    pub fn get(&self, kind: AssetKind) -> HornfaceResult<&OverlayAsset> {
        self.assets
            .as_ref()
            .and_then(|m| m.get(&kind))
            .ok_or_else(|| HornfaceError::asset_not_ready(kind.identifier()))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/registry.rs"]
mod tests;
