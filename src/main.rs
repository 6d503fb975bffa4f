mod asset_gen;
mod assets;
mod dialogue;
mod entities;
mod game;
mod generator;
mod geometry;
mod render;

use crate::asset_gen::Cue;
use crate::assets::Sprites;
use crate::game::{
    play_area, FrameInput, Game, GameEvent, InputEvent, PLAY_HEIGHT, PLAY_WIDTH, WINDOW_TITLE,
};
use crate::generator::{load_rules, random_seed_from_time, GameRules};
use macroquad::audio::{load_sound_from_bytes, play_sound, PlaySoundParams, Sound};
use macroquad::prelude::*;
use std::collections::HashMap;
use std::path::Path;
use std::time::{Duration, Instant};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

const ASSETS_ROOT: &str = "assets";
const RULES_PATH: &str = "assets/config/rules.json";

fn window_conf() -> Conf {
    Conf {
        window_title: WINDOW_TITLE.to_owned(),
        window_width: PLAY_WIDTH as i32,
        window_height: PLAY_HEIGHT as i32,
        window_resizable: false,
        ..Default::default()
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();
}

#[macroquad::main(window_conf)]
async fn main() {
    init_tracing();

    let rules = load_rules(RULES_PATH);
    let seed = rules.seed.unwrap_or_else(random_seed_from_time);
    info!(seed, fps = rules.fps, "starting");

    prevent_quit();

    let sprites = Sprites::load(
        Path::new(ASSETS_ROOT),
        rules.tile_size,
        rules.cave_pursuer_size,
        rules.sea_pursuer_size,
    );
    let sounds = Sounds::load(&rules).await;

    let frame_budget = Duration::from_secs_f64(1.0 / rules.fps.max(1) as f64);
    let mut game = Game::new(rules, seed, play_area());

    while game.running {
        let frame_start = Instant::now();

        if is_key_pressed(KeyCode::F3) {
            game.rules.show_debug_overlay = !game.rules.show_debug_overlay;
        }

        let input = poll_input();
        let events = game.tick(&input);
        sounds.play_for(&events, &game.rules);

        render::draw(&game, &sprites);

        let elapsed = frame_start.elapsed();
        if elapsed < frame_budget {
            std::thread::sleep(frame_budget - elapsed);
        }

        next_frame().await;
    }

    info!("bye");
}

fn poll_input() -> FrameInput {
    let mut events = Vec::new();

    if is_quit_requested() || is_key_pressed(KeyCode::Escape) {
        events.push(InputEvent::Quit);
    }
    if is_key_pressed(KeyCode::Space) {
        events.push(InputEvent::Jump);
        events.push(InputEvent::AdvanceDialogue);
    }
    if is_key_pressed(KeyCode::R) {
        events.push(InputEvent::Restart);
    }

    let (mx, my) = mouse_position();
    let mouse = vec2(mx, my);
    events.push(InputEvent::MouseMove(mouse));
    if is_mouse_button_pressed(MouseButton::Left) {
        events.push(InputEvent::Click(mouse));
    }

    FrameInput {
        left: is_key_down(KeyCode::Left) || is_key_down(KeyCode::A),
        right: is_key_down(KeyCode::Right) || is_key_down(KeyCode::D),
        events,
    }
}

/// Synthesized cues, keyed by what they announce. Empty when sfx are off.
struct Sounds {
    cues: HashMap<Cue, Sound>,
}

impl Sounds {
    async fn load(rules: &GameRules) -> Self {
        let mut cues = HashMap::new();
        if rules.sfx_enabled {
            for cue in Cue::ALL {
                if let Some(sound) = synthesize(cue).await {
                    cues.insert(cue, sound);
                }
            }
        }
        Self { cues }
    }

    fn play_for(&self, events: &[GameEvent], rules: &GameRules) {
        if !rules.sfx_enabled {
            return;
        }
        for event in events {
            let cue = match event {
                GameEvent::Jumped => Cue::Jump,
                GameEvent::PlayerHit { .. } | GameEvent::GameOver => Cue::Hit,
                GameEvent::PickupCollected { .. } => Cue::Pickup,
                GameEvent::LevelCleared { .. } | GameEvent::Victory => Cue::LevelClear,
                _ => continue,
            };
            if let Some(s) = self.cues.get(&cue) {
                play_sound(
                    s,
                    PlaySoundParams {
                        looped: false,
                        volume: rules.sfx_volume,
                    },
                );
            }
        }
    }
}

async fn synthesize(cue: Cue) -> Option<Sound> {
    let bytes = match cue.synthesize() {
        Ok(bytes) => bytes,
        Err(e) => {
            warn!("Failed to synthesize {}: {e}", cue.file_name());
            return None;
        }
    };
    match load_sound_from_bytes(&bytes).await {
        Ok(s) => Some(s),
        Err(e) => {
            warn!("Failed to decode {}: {e}", cue.file_name());
            None
        }
    }
}
