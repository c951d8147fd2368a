//! Asset registry
//!
//! Components never own GPU or file data. They carry typed handles into an
//! [`AssetRegistry`] of descriptors (what mesh, which image file, which font
//! at what size), and a renderer resolves those descriptors however it likes.
//! Nothing here parses files.

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::foundation::collections::{TypedHandle, TypedHandleMap};
use crate::foundation::math::Vec3;

/// Handle to a registered mesh
pub type MeshHandle = TypedHandle<MeshAsset>;
/// Handle to a registered texture
pub type TextureHandle = TypedHandle<TextureAsset>;
/// Handle to a registered font
pub type FontHandle = TypedHandle<FontAsset>;

/// Geometry a mesh is built from
#[derive(Debug, Clone, PartialEq)]
pub enum MeshSource {
    /// Axis-aligned box with the given edge lengths
    Cuboid {
        /// Edge lengths along X, Y and Z
        size: Vec3,
    },
    /// UV sphere of radius 0.5
    Sphere {
        /// Slices around the Y axis
        sectors: u32,
        /// Slices from pole to pole
        stacks: u32,
    },
    /// Cylinder capped with two hemispheres
    Capsule {
        /// Radius of the cylinder and caps
        radius: f32,
        /// Height of the cylindrical part
        cylinder_height: f32,
        /// Slices around the Y axis
        sectors: u32,
    },
    /// Model file on disk
    Model(PathBuf),
}

/// Mesh descriptor
#[derive(Debug, Clone, PartialEq)]
pub struct MeshAsset {
    /// Name used in logs
    pub name: String,
    /// Geometry
    pub source: MeshSource,
}

impl MeshAsset {
    /// Unit cube
    pub fn cube() -> Self {
        Self {
            name: "cube".to_string(),
            source: MeshSource::Cuboid { size: Vec3::new(1.0, 1.0, 1.0) },
        }
    }

    /// Sphere with 36 sectors and 18 stacks
    pub fn sphere() -> Self {
        Self {
            name: "sphere".to_string(),
            source: MeshSource::Sphere { sectors: 36, stacks: 18 },
        }
    }

    /// Capsule of radius 0.5 with a unit-height body
    pub fn capsule() -> Self {
        Self {
            name: "capsule".to_string(),
            source: MeshSource::Capsule {
                radius: 0.5,
                cylinder_height: 1.0,
                sectors: 36,
            },
        }
    }

    /// Model loaded from `path` by the renderer
    pub fn model(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        Self {
            name: path.display().to_string(),
            source: MeshSource::Model(path),
        }
    }
}

/// Texture descriptor
#[derive(Debug, Clone, PartialEq)]
pub struct TextureAsset {
    /// Image file
    pub path: PathBuf,
}

/// Font descriptor
#[derive(Debug, Clone, PartialEq)]
pub struct FontAsset {
    /// Font file
    pub path: PathBuf,
    /// Glyph height in pixels
    pub size: u32,
}

/// Asset registration errors
#[derive(Error, Debug)]
pub enum AssetError {
    /// No search path contains the file
    #[error("Asset not found: {0}")]
    NotFound(String),

    /// The descriptor cannot describe a usable asset
    #[error("Invalid asset descriptor: {0}")]
    InvalidDescriptor(String),
}

/// Typed storage for mesh, texture and font descriptors
#[derive(Default)]
pub struct AssetRegistry {
    search_paths: Vec<PathBuf>,
    meshes: TypedHandleMap<MeshAsset>,
    textures: TypedHandleMap<TextureAsset>,
    fonts: TypedHandleMap<FontAsset>,
}

impl AssetRegistry {
    /// Empty registry that resolves paths relative to the working directory
    pub fn new() -> Self {
        Self::default()
    }

    /// Empty registry that resolves paths against `search_paths`, in order
    pub fn with_search_paths(search_paths: impl IntoIterator<Item = impl Into<PathBuf>>) -> Self {
        Self {
            search_paths: search_paths.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    /// First existing file named `path` under the search paths, or `path` itself
    pub fn resolve_path(&self, path: impl AsRef<Path>) -> Result<PathBuf, AssetError> {
        let path = path.as_ref();
        self.search_paths
            .iter()
            .map(|root| root.join(path))
            .chain(std::iter::once(path.to_path_buf()))
            .find(|candidate| candidate.exists())
            .ok_or_else(|| AssetError::NotFound(path.display().to_string()))
    }

    /// Register a mesh
    pub fn add_mesh(&mut self, mesh: MeshAsset) -> Result<MeshHandle, AssetError> {
        let valid = match &mesh.source {
            MeshSource::Cuboid { size } => size.iter().all(|edge| *edge > 0.0),
            MeshSource::Sphere { sectors, stacks } => *sectors >= 3 && *stacks >= 2,
            MeshSource::Capsule { radius, cylinder_height, sectors } => {
                *radius > 0.0 && *cylinder_height >= 0.0 && *sectors >= 3
            }
            MeshSource::Model(path) => !path.as_os_str().is_empty(),
        };
        if !valid {
            return Err(AssetError::InvalidDescriptor(format!("mesh '{}': {:?}", mesh.name, mesh.source)));
        }

        log::debug!("Registered mesh '{}'", mesh.name);
        Ok(self.meshes.insert(mesh))
    }

    /// Register a texture
    pub fn add_texture(&mut self, path: impl Into<PathBuf>) -> Result<TextureHandle, AssetError> {
        let path = path.into();
        if path.as_os_str().is_empty() {
            return Err(AssetError::InvalidDescriptor("texture with empty path".to_string()));
        }

        log::debug!("Registered texture {}", path.display());
        Ok(self.textures.insert(TextureAsset { path }))
    }

    /// Register a font at a pixel size
    pub fn add_font(&mut self, path: impl Into<PathBuf>, size: u32) -> Result<FontHandle, AssetError> {
        let path = path.into();
        if path.as_os_str().is_empty() || size == 0 {
            return Err(AssetError::InvalidDescriptor(format!(
                "font {} at size {size}",
                path.display()
            )));
        }

        log::debug!("Registered font {} at {}px", path.display(), size);
        Ok(self.fonts.insert(FontAsset { path, size }))
    }

    /// Look up a mesh
    pub fn mesh(&self, handle: MeshHandle) -> Option<&MeshAsset> {
        self.meshes.get(handle)
    }

    /// Look up a texture
    pub fn texture(&self, handle: TextureHandle) -> Option<&TextureAsset> {
        self.textures.get(handle)
    }

    /// Look up a font
    pub fn font(&self, handle: FontHandle) -> Option<&FontAsset> {
        self.fonts.get(handle)
    }

    /// Drop a mesh; its handle stops resolving
    pub fn remove_mesh(&mut self, handle: MeshHandle) -> Option<MeshAsset> {
        self.meshes.remove(handle)
    }

    /// Number of registered meshes, textures and fonts
    pub fn counts(&self) -> (usize, usize, usize) {
        (self.meshes.len(), self.textures.len(), self.fonts.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_handles_resolve_to_their_descriptors() {
        let mut assets = AssetRegistry::new();
        let sphere = assets.add_mesh(MeshAsset::sphere()).expect("sphere");
        let cube = assets.add_mesh(MeshAsset::cube()).expect("cube");
        let font = assets.add_font("fonts/arial.ttf", 48).expect("font");

        assert_eq!(assets.mesh(sphere).map(|mesh| mesh.name.as_str()), Some("sphere"));
        assert_eq!(assets.mesh(cube).map(|mesh| mesh.name.as_str()), Some("cube"));
        assert_eq!(assets.font(font).map(|font| font.size), Some(48));
        assert_eq!(assets.counts(), (2, 0, 1));
    }

    #[test]
    fn test_removed_mesh_handle_is_stale() {
        let mut assets = AssetRegistry::new();
        let handle = assets.add_mesh(MeshAsset::capsule()).expect("capsule");

        assert!(assets.remove_mesh(handle).is_some());
        assert!(assets.mesh(handle).is_none());
    }

    #[test]
    fn test_invalid_descriptors_are_rejected() {
        let mut assets = AssetRegistry::new();
        let flat = MeshAsset {
            name: "flat".to_string(),
            source: MeshSource::Cuboid { size: Vec3::new(1.0, 0.0, 1.0) },
        };

        assert!(matches!(assets.add_mesh(flat), Err(AssetError::InvalidDescriptor(_))));
        assert!(assets.add_font("fonts/arial.ttf", 0).is_err());
        assert!(assets.add_texture("").is_err());
    }

    #[test]
    fn test_resolve_path_searches_roots_in_order() {
        let root = std::env::temp_dir().join(format!("nora_assets_{}", std::process::id()));
        std::fs::create_dir_all(&root).expect("temp dir");
        std::fs::write(root.join("brick.png"), b"png").expect("write");

        let assets = AssetRegistry::with_search_paths([PathBuf::from("missing_root"), root.clone()]);
        let resolved = assets.resolve_path("brick.png");
        let missing = assets.resolve_path("nope.png");
        let _ = std::fs::remove_dir_all(&root);

        assert_eq!(resolved.expect("found"), root.join("brick.png"));
        assert!(matches!(missing, Err(AssetError::NotFound(_))));
    }
}
