use image::{ImageBuffer, Rgba, RgbaImage};
use std::f32::consts::PI;
use std::fs;
use std::io::Cursor;
use std::path::{Path, PathBuf};

pub const SAMPLE_RATE: u32 = 44_100;

pub fn solid(width: u32, height: u32, color: [u8; 4]) -> RgbaImage {
    ImageBuffer::from_fn(width, height, |_x, _y| Rgba(color))
}

/// Top-to-bottom gradient where `shade` maps the row fraction in [0, 1) to a colour.
pub fn vertical_gradient(width: u32, height: u32, shade: impl Fn(f32) -> [u8; 3]) -> RgbaImage {
    let h = height.max(1) as f32;
    ImageBuffer::from_fn(width, height, |_x, y| {
        let [r, g, b] = shade(y as f32 / h);
        Rgba([r, g, b, 255])
    })
}

/// Dark blue-grey rock, slightly lighter towards the floor.
pub fn cave_background(width: u32, height: u32) -> RgbaImage {
    vertical_gradient(width, height, |t| {
        let v = 30.0 + t * 30.0;
        [v as u8, v as u8, (v + 40.0) as u8]
    })
}

/// Open water, deepening from teal near the surface.
pub fn sea_background(width: u32, height: u32) -> RgbaImage {
    vertical_gradient(width, height, |t| {
        let v = 50.0 + t * 100.0;
        [20, v as u8, (v + 50.0) as u8]
    })
}

/// Brown block with a darker two-pixel rim.
pub fn bordered_tile(size: u32) -> RgbaImage {
    let edge = size.saturating_sub(2);
    ImageBuffer::from_fn(size, size, |x, y| {
        if x < 2 || y < 2 || x >= edge || y >= edge {
            Rgba([92, 51, 23, 255])
        } else {
            Rgba([139, 90, 43, 255])
        }
    })
}

/// Filled circle on a transparent square; stands in for round icons.
pub fn disc(size: u32, color: [u8; 4]) -> RgbaImage {
    let r = size as f32 / 2.0;
    ImageBuffer::from_fn(size, size, |x, y| {
        let dx = x as f32 + 0.5 - r;
        let dy = y as f32 + 0.5 - r;
        if dx * dx + dy * dy <= r * r {
            Rgba(color)
        } else {
            Rgba([0, 0, 0, 0])
        }
    })
}

/// Short sound effects the game plays. Synthesized so the game has audio
/// without shipping any files.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Cue {
    Jump,
    Hit,
    Pickup,
    LevelClear,
}

impl Cue {
    pub const ALL: [Cue; 4] = [Cue::Jump, Cue::Hit, Cue::Pickup, Cue::LevelClear];

    pub fn file_name(self) -> &'static str {
        match self {
            Cue::Jump => "jump.wav",
            Cue::Hit => "hit.wav",
            Cue::Pickup => "pickup.wav",
            Cue::LevelClear => "level_clear.wav",
        }
    }

    /// WAV bytes for this cue.
    pub fn synthesize(self) -> Result<Vec<u8>, String> {
        match self {
            Cue::Jump => tone_wav(520.0, 0.09, 0.5),
            Cue::Hit => tone_wav(140.0, 0.2, 0.6),
            Cue::Pickup => glissando_wav(600.0, 1200.0, 0.18, 0.5),
            Cue::LevelClear => glissando_wav(330.0, 990.0, 0.45, 0.4),
        }
    }
}

pub fn tone_wav(freq_hz: f32, duration_s: f32, volume: f32) -> Result<Vec<u8>, String> {
    glissando_wav(freq_hz, freq_hz, duration_s, volume)
}

pub fn glissando_wav(
    start_freq: f32,
    end_freq: f32,
    duration_s: f32,
    volume: f32,
) -> Result<Vec<u8>, String> {
    let total_samples = (duration_s * SAMPLE_RATE as f32) as u32;
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate: SAMPLE_RATE,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };

    let mut buffer = Cursor::new(Vec::new());
    {
        let mut writer = hound::WavWriter::new(&mut buffer, spec).map_err(to_string)?;
        let mut phase = 0.0f32;
        for n in 0..total_samples {
            let t = n as f32 / SAMPLE_RATE as f32;
            let freq = start_freq + (end_freq - start_freq) * (t / duration_s.max(f32::EPSILON));
            phase += 2.0 * PI * freq / SAMPLE_RATE as f32;
            // linear fade out so cues do not click
            let fade = 1.0 - n as f32 / total_samples.max(1) as f32;
            let sample = (volume * fade * i16::MAX as f32 * phase.sin()) as i16;
            writer.write_sample(sample).map_err(to_string)?;
        }
        writer.finalize().map_err(to_string)?;
    }
    Ok(buffer.into_inner())
}

/// Every image the game looks up, paired with a placeholder for it.
pub fn placeholder_images() -> Vec<(&'static str, RgbaImage)> {
    vec![
        ("player.png", solid(32, 32, [70, 140, 230, 255])),
        ("cyclops.png", solid(32, 32, [170, 120, 60, 255])),
        ("siren.png", solid(64, 64, [90, 200, 180, 255])),
        ("pickup.png", disc(48, [120, 170, 255, 255])),
        ("heart.png", disc(48, [220, 40, 60, 255])),
        ("tileset.png", bordered_tile(16)),
        ("cave_background.png", cave_background(960, 640)),
        ("sea_background.png", sea_background(960, 640)),
        ("menu_background.png", vertical_gradient(960, 640, |t| {
            let v = (20.0 + t * 40.0) as u8;
            [v / 2, v / 3, v]
        })),
        ("victory.png", solid(960, 640, [30, 24, 6, 255])),
        ("game_over.png", solid(960, 640, [24, 6, 6, 255])),
        ("portrait_odysseus.png", solid(200, 200, [70, 140, 230, 255])),
        ("portrait_cyclops.png", solid(200, 200, [170, 120, 60, 255])),
        ("portrait_siren_a.png", solid(200, 200, [90, 200, 180, 255])),
        ("portrait_siren_b.png", solid(200, 200, [150, 90, 200, 255])),
    ]
}

/// Write every placeholder image and cue under `dir`. Returns the written paths.
#[allow(dead_code)]
pub fn write_placeholder_set(dir: &Path) -> Result<Vec<PathBuf>, String> {
    fs::create_dir_all(dir.join("sounds")).map_err(to_string)?;
    let mut written = Vec::new();
    for (name, img) in placeholder_images() {
        let path = dir.join(name);
        img.save(&path).map_err(|e| format!("{}: {e}", path.display()))?;
        written.push(path);
    }
    for cue in Cue::ALL {
        let path = dir.join("sounds").join(cue.file_name());
        fs::write(&path, cue.synthesize()?).map_err(to_string)?;
        written.push(path);
    }
    Ok(written)
}

fn to_string<E: std::fmt::Display>(e: E) -> String {
    e.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cave_gradient_lightens_downwards() {
        let img = cave_background(4, 640);
        assert_eq!(img.get_pixel(0, 0).0, [30, 30, 70, 255]);
        let bottom = img.get_pixel(0, 639).0;
        assert!(bottom[0] > 30 && bottom[0] <= 60);
        assert_eq!(bottom[2], bottom[0] + 40);
    }

    #[test]
    fn sea_gradient_keeps_red_low() {
        let img = sea_background(2, 100);
        assert!(img.pixels().all(|p| p.0[0] == 20));
        assert_eq!(img.get_pixel(1, 0).0, [20, 50, 100, 255]);
    }

    #[test]
    fn tile_has_darker_rim() {
        let tile = bordered_tile(32);
        assert_ne!(tile.get_pixel(0, 0), tile.get_pixel(16, 16));
        assert_eq!(tile.get_pixel(31, 31), tile.get_pixel(0, 0));
    }

    #[test]
    fn cues_decode_as_mono_wav() {
        for cue in Cue::ALL {
            let bytes = cue.synthesize().unwrap();
            let reader = hound::WavReader::new(Cursor::new(bytes)).unwrap();
            assert_eq!(reader.spec().channels, 1);
            assert_eq!(reader.spec().sample_rate, SAMPLE_RATE);
            assert!(reader.len() > 1000, "{cue:?} too short");
        }
    }

    #[test]
    fn placeholder_names_are_unique() {
        let images = placeholder_images();
        let mut names: Vec<_> = images.iter().map(|(n, _)| *n).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), images.len());
    }
}
