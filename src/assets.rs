use image::imageops::FilterType;
use image::RgbaImage;
use macroquad::prelude::*;
use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::asset_gen;
use crate::dialogue::Speaker;
use crate::game::{Biome, PLAY_HEIGHT, PLAY_WIDTH};

#[derive(Debug)]
pub enum AssetError {
    NotFound { name: String, tried: Vec<PathBuf> },
    Decode { name: String, message: String },
}

impl fmt::Display for AssetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AssetError::NotFound { name, tried } => {
                write!(f, "asset {name} not found (tried {} paths)", tried.len())
            }
            AssetError::Decode { name, message } => write!(f, "could not decode {name}: {message}"),
        }
    }
}

impl std::error::Error for AssetError {}

/// Where to look for a logical asset name, in order.
pub fn candidate_paths(root: &Path, name: &str) -> Vec<PathBuf> {
    let mut paths = vec![root.join(name), root.join("images").join(name)];
    let exe_dir = std::env::current_exe()
        .ok()
        .and_then(|p| p.parent().map(Path::to_path_buf));
    if let Some(dir) = exe_dir {
        paths.push(dir.join("assets").join(name));
    }
    paths
}

pub fn read_image(root: &Path, name: &str) -> Result<RgbaImage, AssetError> {
    let tried = candidate_paths(root, name);
    let found = tried.iter().find_map(|p| fs::read(p).ok());
    let Some(bytes) = found else {
        return Err(AssetError::NotFound {
            name: name.to_string(),
            tried,
        });
    };
    image::load_from_memory(&bytes)
        .map(|img| img.to_rgba8())
        .map_err(|e| AssetError::Decode {
            name: name.to_string(),
            message: e.to_string(),
        })
}

/// Take the top-left `source`-sized tile of a sheet and scale it to `size`.
pub fn tile_from_sheet(sheet: &RgbaImage, source: u32, size: u32) -> RgbaImage {
    let w = source.min(sheet.width());
    let h = source.min(sheet.height());
    let tile = image::imageops::crop_imm(sheet, 0, 0, w, h).to_image();
    image::imageops::resize(&tile, size, size, FilterType::Nearest)
}

pub fn texture_from_image(img: &RgbaImage) -> Texture2D {
    let texture = Texture2D::from_rgba8(img.width() as u16, img.height() as u16, img.as_raw());
    texture.set_filter(FilterMode::Nearest);
    texture
}

/// Load an image as a texture, optionally resized to `size`.
pub fn load_texture(
    root: &Path,
    name: &str,
    size: Option<(u32, u32)>,
) -> Result<Texture2D, AssetError> {
    let img = read_image(root, name)?;
    let img = match size {
        Some((w, h)) if (w, h) != img.dimensions() => {
            image::imageops::resize(&img, w, h, FilterType::Nearest)
        }
        _ => img,
    };
    Ok(texture_from_image(&img))
}

fn optional(root: &Path, name: &str, size: Option<(u32, u32)>) -> Option<Texture2D> {
    match load_texture(root, name, size) {
        Ok(texture) => Some(texture),
        Err(e) => {
            warn!("{e}; drawing a placeholder instead");
            None
        }
    }
}

fn or_placeholder(
    root: &Path,
    name: &str,
    size: (u32, u32),
    placeholder: impl FnOnce() -> RgbaImage,
) -> Texture2D {
    optional(root, name, Some(size)).unwrap_or_else(|| texture_from_image(&placeholder()))
}

/// Every texture the renderer uses. Sprites are optional and drawn as flat
/// rectangles when missing; backgrounds and the tile always exist.
pub struct Sprites {
    pub player: Option<Texture2D>,
    pub cyclops: Option<Texture2D>,
    pub siren: Option<Texture2D>,
    pub pickup: Option<Texture2D>,
    pub heart: Option<Texture2D>,
    pub menu: Option<Texture2D>,
    pub victory: Option<Texture2D>,
    pub game_over: Option<Texture2D>,
    pub tile: Texture2D,
    pub cave_background: Texture2D,
    pub sea_background: Texture2D,
    portraits: HashMap<&'static str, Texture2D>,
}

impl Sprites {
    pub fn load(root: &Path, tile_size: u32, cave_pursuer: f32, sea_pursuer: f32) -> Self {
        let screen = (PLAY_WIDTH as u32, PLAY_HEIGHT as u32);
        let square = |side: f32| Some((side as u32, side as u32));

        let tile = match read_image(root, "tileset.png") {
            Ok(sheet) => texture_from_image(&tile_from_sheet(&sheet, 16, tile_size)),
            Err(e) => {
                warn!("{e}; using a plain tile");
                texture_from_image(&asset_gen::bordered_tile(tile_size))
            }
        };

        // portraits keep their native size; the dialogue screen fits them to a slot
        let mut portraits = HashMap::new();
        for speaker in [Speaker::Odysseus, Speaker::Cyclops, Speaker::SirenA, Speaker::SirenB] {
            if let Some(t) = optional(root, speaker.portrait(), None) {
                portraits.insert(speaker.portrait(), t);
            }
        }

        let sprites = Self {
            player: optional(root, "player.png", square(32.0)),
            cyclops: optional(root, "cyclops.png", square(cave_pursuer)),
            siren: optional(root, "siren.png", square(sea_pursuer)),
            pickup: optional(root, "pickup.png", square(48.0)),
            heart: optional(root, "heart.png", square(48.0)),
            menu: optional(root, "menu_background.png", Some(screen)),
            victory: optional(root, "victory.png", Some(screen)),
            game_over: optional(root, "game_over.png", Some(screen)),
            tile,
            cave_background: or_placeholder(root, "cave_background.png", screen, || {
                asset_gen::cave_background(screen.0, screen.1)
            }),
            sea_background: or_placeholder(root, "sea_background.png", screen, || {
                asset_gen::sea_background(screen.0, screen.1)
            }),
            portraits,
        };
        info!(portraits = sprites.portraits.len(), "sprites ready");
        sprites
    }

    pub fn pursuer(&self, biome: Biome) -> Option<&Texture2D> {
        match biome {
            Biome::Cave => self.cyclops.as_ref(),
            Biome::Sea => self.siren.as_ref(),
        }
    }

    pub fn background(&self, biome: Biome) -> &Texture2D {
        match biome {
            Biome::Cave => &self.cave_background,
            Biome::Sea => &self.sea_background,
        }
    }

    pub fn portrait(&self, speaker: Speaker) -> Option<&Texture2D> {
        self.portraits.get(speaker.portrait())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    fn scratch_dir(tag: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("odyssey-assets-{tag}-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn missing_asset_lists_every_candidate() {
        let err = read_image(Path::new("no/such/root"), "nothing.png").unwrap_err();
        match err {
            AssetError::NotFound { name, tried } => {
                assert_eq!(name, "nothing.png");
                assert!(tried.len() >= 2);
                assert_eq!(tried[0], Path::new("no/such/root/nothing.png"));
            }
            other => panic!("unexpected {other}"),
        }
    }

    #[test]
    fn garbage_bytes_are_a_decode_error() {
        let dir = scratch_dir("decode");
        fs::write(dir.join("broken.png"), b"not an image").unwrap();
        let err = read_image(&dir, "broken.png").unwrap_err();
        assert!(matches!(err, AssetError::Decode { .. }));
        assert!(err.to_string().contains("broken.png"));
    }

    #[test]
    fn finds_images_in_the_images_subdirectory() {
        let dir = scratch_dir("subdir");
        fs::create_dir_all(dir.join("images")).unwrap();
        asset_gen::solid(3, 2, [1, 2, 3, 255])
            .save(dir.join("images").join("thing.png"))
            .unwrap();
        let img = read_image(&dir, "thing.png").unwrap();
        assert_eq!(img.dimensions(), (3, 2));
    }

    #[test]
    fn sheet_tile_is_cropped_then_scaled() {
        let sheet = RgbaImage::from_fn(64, 64, |x, y| {
            if x < 16 && y < 16 {
                Rgba([200, 10, 10, 255])
            } else {
                Rgba([0, 0, 255, 255])
            }
        });
        let tile = tile_from_sheet(&sheet, 16, 32);
        assert_eq!(tile.dimensions(), (32, 32));
        assert!(tile.pixels().all(|p| p.0 == [200, 10, 10, 255]));
    }
}
