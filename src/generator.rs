use crate::entities::{ExitZone, Physics, Pickup, Platform, Pursuer, TileKind};
use macroquad::math::{vec2, Rect, Vec2};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fs;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GameRules {
    pub seed: Option<u64>,
    pub fps: u32,
    pub player_speed: f32,
    pub gravity: f32,
    pub terminal_velocity: f32,
    pub jump_strength: f32,
    pub max_jumps: u8,
    pub max_lives: u32,
    pub player_size: f32,
    pub player_spawn_x: f32,
    pub player_spawn_y: f32,
    pub pursuer_speed: f32,
    pub cave_pursuer_size: f32,
    pub sea_pursuer_size: f32,
    pub tile_size: u32,
    pub base_platform_count: u32,
    pub platform_count_cycle: u32,
    pub platform_widths: Vec<u32>,
    pub platform_height: u32,
    pub max_pursuers: usize,
    pub max_pickups: u32,
    pub pickup_size: f32,
    pub levels_per_biome: u32,
    pub biome_count: u32,
    pub sfx_enabled: bool,
    pub sfx_volume: f32,
    pub show_debug_overlay: bool,
}

impl Default for GameRules {
    fn default() -> Self {
        Self {
            seed: None,
            fps: 60,
            player_speed: 6.0,
            gravity: 0.5,
            terminal_velocity: 15.0,
            jump_strength: 10.0,
            max_jumps: 2,
            max_lives: 5,
            player_size: 32.0,
            player_spawn_x: 80.0,
            player_spawn_y: 440.0,
            pursuer_speed: 1.5,
            cave_pursuer_size: 32.0,
            sea_pursuer_size: 64.0,
            tile_size: 32,
            base_platform_count: 12,
            platform_count_cycle: 5,
            platform_widths: vec![64, 96, 128, 160],
            platform_height: 32,
            max_pursuers: 10,
            max_pickups: 5,
            pickup_size: 48.0,
            levels_per_biome: 3,
            biome_count: 2,
            sfx_enabled: true,
            sfx_volume: 0.4,
            show_debug_overlay: false,
        }
    }
}

impl GameRules {
    pub fn physics(&self) -> Physics {
        Physics {
            gravity: self.gravity,
            terminal_velocity: self.terminal_velocity,
            jump_strength: -self.jump_strength.abs(),
            max_jumps: self.max_jumps,
        }
    }

    pub fn player_spawn(&self) -> Vec2 {
        vec2(self.player_spawn_x, self.player_spawn_y)
    }

    pub fn max_level(&self) -> u32 {
        (self.levels_per_biome * self.biome_count).max(1)
    }
}

pub fn load_rules(path: &str) -> GameRules {
    match fs::read_to_string(path) {
        Ok(text) => match serde_json::from_str(&text) {
            Ok(rules) => {
                info!("Loaded rules from {path}");
                rules
            }
            Err(e) => {
                warn!("Failed to parse rules from {path}: {e}. Using defaults.");
                GameRules::default()
            }
        },
        Err(e) => {
            warn!("Could not read rules file {path}: {e}. Using defaults.");
            GameRules::default()
        }
    }
}

/// Everything one room needs. Replaced wholesale on every level change.
#[derive(Clone, Debug)]
pub struct LevelLayout {
    pub platforms: Vec<Platform>,
    pub pickups: Vec<Pickup>,
    pub exit: ExitZone,
    pub pursuers: Vec<Pursuer>,
}

/// The opening left in the right-hand border, five tiles tall around the
/// vertical middle of the room.
pub fn exit_gap(area: &Rect, tile: u32) -> Rect {
    let t = tile as f32;
    let first_row = exit_first_row(area, tile);
    Rect::new(
        area.x + area.w - 2.0 * t,
        area.y + first_row as f32 * t,
        2.0 * t,
        5.0 * t,
    )
}

fn exit_first_row(area: &Rect, tile: u32) -> u32 {
    let rows = (area.h as u32) / tile.max(1);
    (rows / 2).saturating_sub(2)
}

pub fn generate_level(
    level: u32,
    pursuer_size: Vec2,
    area: &Rect,
    rules: &GameRules,
    rng: &mut impl Rng,
) -> LevelLayout {
    let tile = rules.tile_size.max(1);
    let t = tile as f32;
    let cols = (area.w as u32) / tile;
    let rows = (area.h as u32) / tile;

    let mut platforms = Vec::new();

    // Border: two tiles thick, open on the right around the exit.
    for col in 0..cols {
        let x = area.x + col as f32 * t;
        for y in [area.y, area.y + t, area.y + area.h - t, area.y + area.h - 2.0 * t] {
            platforms.push(Platform::new(x, y, t, t, TileKind::Wall));
        }
    }
    let gap_start = exit_first_row(area, tile);
    for row in 0..rows {
        let y = area.y + row as f32 * t;
        platforms.push(Platform::new(area.x, y, t, t, TileKind::Wall));
        platforms.push(Platform::new(area.x + t, y, t, t, TileKind::Wall));
        if row < gap_start || row > gap_start + 4 {
            platforms.push(Platform::new(area.x + area.w - t, y, t, t, TileKind::Wall));
            platforms.push(Platform::new(area.x + area.w - 2.0 * t, y, t, t, TileKind::Wall));
        }
    }

    let exit = ExitZone::new(
        area.x + area.w - 3.0 * t,
        area.y + area.h / 2.0 - 2.0 * t,
        2.0 * t,
        4.0 * t,
    );

    let x_min = 4 * tile;
    let x_max = (area.w as u32).saturating_sub(6 * tile).max(x_min);
    let y_min = 4 * tile;
    let y_max = (area.h as u32).saturating_sub(4 * tile).max(y_min);

    let strip_count = rules.base_platform_count + level % rules.platform_count_cycle.max(1);
    let mut spawns = Vec::with_capacity(strip_count as usize);
    for _ in 0..strip_count {
        let x = rng.gen_range(x_min..=x_max) / tile * tile;
        let y = rng.gen_range(y_min..=y_max) / tile * tile;
        let width = rules.platform_widths.choose(rng).copied().unwrap_or(2 * tile);
        let (x, y, w) = (area.x + x as f32, area.y + y as f32, width as f32);
        platforms.push(Platform::new(x, y, w, rules.platform_height as f32, TileKind::Block));
        spawns.push(vec2(x + w / 2.0 - pursuer_size.x / 2.0, y - pursuer_size.y));
    }

    let pickup_count = (level / 2).min(rules.max_pickups);
    let pickup_y = area.y + area.h - 4.0 * t;
    let pickups = (0..pickup_count)
        .map(|_| {
            let x = rng.gen_range(x_min..=x_max) / tile * tile;
            Pickup::new(area.x + x as f32, pickup_y, rules.pickup_size)
        })
        .collect::<Vec<_>>();

    spawns.shuffle(rng);
    let pursuers = spawns
        .into_iter()
        .take(rules.max_pursuers)
        .map(|spawn| Pursuer::new(spawn, pursuer_size, rules.pursuer_speed))
        .collect::<Vec<_>>();

    debug!(
        level,
        strips = strip_count,
        pickups = pickups.len(),
        pursuers = pursuers.len(),
        "generated level"
    );

    LevelLayout {
        platforms,
        pickups,
        exit,
        pursuers,
    }
}

pub fn random_seed_from_time() -> u64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default();
    // mix seconds and nanos a bit
    now.as_secs() ^ (now.subsec_nanos() as u64).rotate_left(32)
}
