use macroquad::math::{vec2, Rect, Vec2};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::info;

use crate::dialogue::{DialogueScript, Scenario};
use crate::entities::{
    Animated, Collidable, ExitZone, Physics, Pickup, Platform, Player, Pursuer,
};
use crate::generator::{generate_level, GameRules};

pub const PLAY_WIDTH: f32 = 960.0;
pub const PLAY_HEIGHT: f32 = 640.0;
pub const WINDOW_TITLE: &str = "L'Odyssée : Le Retour du Roi";

/// Hit region of the menu's play button.
pub const PLAY_BUTTON: Rect = Rect {
    x: 95.0,
    y: 250.0,
    w: 280.0,
    h: 75.0,
};

pub fn play_area() -> Rect {
    Rect::new(0.0, 0.0, PLAY_WIDTH, PLAY_HEIGHT)
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Biome {
    Cave,
    Sea,
}

impl Biome {
    pub fn for_level(level: u32, levels_per_biome: u32) -> Self {
        let index = level.saturating_sub(1) / levels_per_biome.max(1);
        if index == 0 {
            Biome::Cave
        } else {
            Biome::Sea
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Biome::Cave => "Java Cave",
            Biome::Sea => "Prosanta's Sea",
        }
    }

    pub fn number(self) -> u32 {
        match self {
            Biome::Cave => 1,
            Biome::Sea => 2,
        }
    }

    pub fn scenario(self) -> Scenario {
        match self {
            Biome::Cave => Scenario::Cyclops,
            Biome::Sea => Scenario::Sirens,
        }
    }

    pub fn pursuer_size(self, rules: &GameRules) -> Vec2 {
        let side = match self {
            Biome::Cave => rules.cave_pursuer_size,
            Biome::Sea => rules.sea_pursuer_size,
        };
        vec2(side, side)
    }
}

/// One generated room. Dropped and rebuilt on every level change.
#[derive(Clone, Debug)]
pub struct Level {
    pub number: u32,
    pub biome: Biome,
    pub platforms: Vec<Platform>,
    pub pickups: Vec<Pickup>,
    pub pursuers: Vec<Pursuer>,
    pub exit: ExitZone,
    pub spawn: Vec2,
}

impl Level {
    pub fn generate(number: u32, rules: &GameRules, area: &Rect, rng: &mut StdRng) -> Self {
        let biome = Biome::for_level(number, rules.levels_per_biome);
        let layout = generate_level(number, biome.pursuer_size(rules), area, rules, rng);
        Self {
            number,
            biome,
            platforms: layout.platforms,
            pickups: layout.pickups,
            pursuers: layout.pursuers,
            exit: layout.exit,
            spawn: rules.player_spawn(),
        }
    }

    pub fn level_in_biome(&self, levels_per_biome: u32) -> u32 {
        let per = levels_per_biome.max(1);
        (self.number.saturating_sub(1)) % per + 1
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Screen {
    Menu,
    Dialogue,
    Playing,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum InputEvent {
    Quit,
    Jump,
    AdvanceDialogue,
    Restart,
    MouseMove(Vec2),
    Click(Vec2),
}

/// Held keys plus the discrete events polled this frame.
#[derive(Clone, Debug, Default)]
pub struct FrameInput {
    pub left: bool,
    pub right: bool,
    pub events: Vec<InputEvent>,
}

impl FrameInput {
    fn has(&self, event: InputEvent) -> bool {
        self.events.contains(&event)
    }
}

/// What happened during a tick. The main loop turns these into sounds.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameEvent {
    Started,
    DialogueFinished,
    Jumped,
    PickupCollected { healed: bool },
    PlayerHit { lives_left: u32 },
    LevelCleared { next_level: u32 },
    BiomeEntered(Biome),
    Victory,
    GameOver,
    Restarted,
    Quit,
}

pub struct Game {
    pub screen: Screen,
    pub level: Level,
    pub player: Player,
    pub dialogue: DialogueScript,
    pub game_over: bool,
    pub victory: bool,
    pub resume_after_dialogue: bool,
    pub menu_hovered: bool,
    pub running: bool,
    pub rules: GameRules,
    pub bounds: Rect,
    physics: Physics,
    rng: StdRng,
}

impl Game {
    pub fn new(rules: GameRules, seed: u64, bounds: Rect) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let level = Level::generate(1, &rules, &bounds, &mut rng);
        let player = new_player(&rules);
        Self {
            screen: Screen::Menu,
            dialogue: DialogueScript::new(level.biome.scenario()),
            level,
            player,
            game_over: false,
            victory: false,
            resume_after_dialogue: false,
            menu_hovered: false,
            running: true,
            physics: rules.physics(),
            rules,
            bounds,
            rng,
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.game_over || self.victory
    }

    pub fn tick(&mut self, input: &FrameInput) -> Vec<GameEvent> {
        let mut events = Vec::new();
        if input.has(InputEvent::Quit) {
            self.running = false;
            events.push(GameEvent::Quit);
            return events;
        }
        match self.screen {
            Screen::Menu => self.tick_menu(input, &mut events),
            Screen::Dialogue => self.tick_dialogue(input, &mut events),
            Screen::Playing => self.tick_playing(input, &mut events),
        }
        events
    }

    fn tick_menu(&mut self, input: &FrameInput, events: &mut Vec<GameEvent>) {
        for event in &input.events {
            match *event {
                InputEvent::MouseMove(pos) => self.menu_hovered = PLAY_BUTTON.contains(pos),
                InputEvent::Click(pos) if PLAY_BUTTON.contains(pos) => {
                    info!("starting from menu");
                    self.screen = Screen::Dialogue;
                    events.push(GameEvent::Started);
                    return;
                }
                _ => {}
            }
        }
    }

    fn tick_dialogue(&mut self, input: &FrameInput, events: &mut Vec<GameEvent>) {
        for event in &input.events {
            if *event != InputEvent::AdvanceDialogue {
                continue;
            }
            self.dialogue.advance();
            if self.dialogue.is_finished() {
                info!(scenario = ?self.dialogue.scenario, "dialogue finished");
                self.screen = Screen::Playing;
                self.resume_after_dialogue = false;
                events.push(GameEvent::DialogueFinished);
                return;
            }
        }
    }

    fn tick_playing(&mut self, input: &FrameInput, events: &mut Vec<GameEvent>) {
        if self.is_terminal() {
            if input.has(InputEvent::Restart) {
                self.restart();
                events.push(GameEvent::Restarted);
            }
            return;
        }

        for event in &input.events {
            if *event == InputEvent::Jump && self.player.jump(&self.physics) {
                events.push(GameEvent::Jumped);
            }
        }
        self.player
            .steer(input.left, input.right, self.rules.player_speed);
        self.player.update(
            self.level.platforms.iter().map(|p| &p.rect),
            &self.physics,
            &self.bounds,
        );

        for pickup in &mut self.level.pickups {
            pickup.animate();
        }
        self.level.exit.animate();
        let target = self.player.rect();
        for pursuer in &mut self.level.pursuers {
            pursuer.seek(&target);
        }

        let player = &mut self.player;
        self.level.pickups.retain(|pickup| {
            if pickup.collides_with(&*player) {
                let healed = player.heal();
                events.push(GameEvent::PickupCollected { healed });
                false
            } else {
                true
            }
        });

        if self
            .level
            .pursuers
            .iter()
            .any(|p| p.collides_with(&self.player))
        {
            if self.player.lose_life() {
                info!(level = self.level.number, "game over");
                self.game_over = true;
                events.push(GameEvent::GameOver);
                return;
            }
            self.reset_room();
            events.push(GameEvent::PlayerHit {
                lives_left: self.player.lives,
            });
        }

        if self.player.collides_with(&self.level.exit) {
            self.clear_level(events);
        }
    }

    fn reset_room(&mut self) {
        self.player.respawn(self.level.spawn);
        for pursuer in &mut self.level.pursuers {
            pursuer.reset();
        }
    }

    fn clear_level(&mut self, events: &mut Vec<GameEvent>) {
        if self.level.number >= self.rules.max_level() {
            info!(level = self.level.number, "victory");
            self.victory = true;
            events.push(GameEvent::Victory);
            return;
        }
        let previous = self.level.biome;
        let next = self.level.number + 1;
        self.enter_level(next);
        events.push(GameEvent::LevelCleared { next_level: next });
        info!(level = next, biome = self.level.biome.name(), "level cleared");

        if self.level.biome != previous {
            self.dialogue = DialogueScript::new(self.level.biome.scenario());
            self.screen = Screen::Dialogue;
            self.resume_after_dialogue = true;
            events.push(GameEvent::BiomeEntered(self.level.biome));
        }
    }

    /// Replace the live level with a freshly generated one and put the
    /// player at its spawn. Lives carry over.
    pub fn enter_level(&mut self, number: u32) {
        self.level = Level::generate(number, &self.rules, &self.bounds, &mut self.rng);
        self.player.respawn(self.level.spawn);
        self.player.body.jump_count = 0;
    }

    pub fn restart(&mut self) {
        info!("restart");
        self.player = new_player(&self.rules);
        self.enter_level(1);
        self.game_over = false;
        self.victory = false;
        self.resume_after_dialogue = false;
        self.screen = Screen::Playing;
    }
}

fn new_player(rules: &GameRules) -> Player {
    Player::new(
        rules.player_spawn(),
        vec2(rules.player_size, rules.player_size),
        rules.max_lives,
    )
}
