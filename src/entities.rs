use macroquad::math::{vec2, Rect, Vec2};

use crate::geometry::{self, VerticalContact};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Facing {
    Left,
    Right,
}

impl Facing {
    pub fn flipped(self) -> bool {
        matches!(self, Facing::Left)
    }
}

/// Anything with a bounding box the game loop tests against.
pub trait Collidable {
    fn bounds(&self) -> Rect;

    fn collides_with(&self, other: &impl Collidable) -> bool {
        geometry::intersects(&self.bounds(), &other.bounds())
    }
}

/// Entities that advance a purely visual counter once per tick.
pub trait Animated {
    fn animate(&mut self);
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TileKind {
    Wall,
    Block,
}

#[derive(Clone, Debug)]
pub struct Platform {
    pub rect: Rect,
    pub tile: TileKind,
}

impl Platform {
    pub fn new(x: f32, y: f32, w: f32, h: f32, tile: TileKind) -> Self {
        Self {
            rect: Rect::new(x, y, w, h),
            tile,
        }
    }
}

impl Collidable for Platform {
    fn bounds(&self) -> Rect {
        self.rect
    }
}

pub const PICKUP_FRAMES: u32 = 30;

#[derive(Clone, Debug)]
pub struct Pickup {
    pub rect: Rect,
    pub frame: u32,
}

impl Pickup {
    pub fn new(x: f32, y: f32, size: f32) -> Self {
        Self {
            rect: Rect::new(x, y, size, size),
            frame: 0,
        }
    }

    /// Which of the three fallback shades to show this tick.
    pub fn shade(&self) -> usize {
        (self.frame / (PICKUP_FRAMES / 3)) as usize
    }
}

impl Collidable for Pickup {
    fn bounds(&self) -> Rect {
        self.rect
    }
}

impl Animated for Pickup {
    fn animate(&mut self) {
        self.frame = (self.frame + 1) % PICKUP_FRAMES;
    }
}

pub const EXIT_FRAMES: u32 = 60;

#[derive(Clone, Debug)]
pub struct ExitZone {
    pub rect: Rect,
    pub frame: u32,
}

impl ExitZone {
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self {
            rect: Rect::new(x, y, w, h),
            frame: 0,
        }
    }

    /// Pulse in [0, 1]: bright at both ends of the cycle, dark in the middle.
    pub fn glow(&self) -> f32 {
        let half = (EXIT_FRAMES / 2) as f32;
        (self.frame as f32 - half).abs() / half
    }
}

impl Collidable for ExitZone {
    fn bounds(&self) -> Rect {
        self.rect
    }
}

impl Animated for ExitZone {
    fn animate(&mut self) {
        self.frame = (self.frame + 1) % EXIT_FRAMES;
    }
}

/// Tunables for the player's vertical motion.
#[derive(Clone, Copy, Debug)]
pub struct Physics {
    pub gravity: f32,
    pub terminal_velocity: f32,
    pub jump_strength: f32,
    pub max_jumps: u8,
}

/// The moving part of the player: everything the physics step reads and writes.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Body {
    pub rect: Rect,
    pub velocity: Vec2,
    pub grounded: bool,
    pub jump_count: u8,
}

/// One physics tick. Horizontal first, then vertical, then keep the box on
/// screen. Returns the new body instead of mutating so it can be tested alone.
pub fn step_body<'a, I>(body: Body, obstacles: I, physics: &Physics, bounds: &Rect) -> Body
where
    I: IntoIterator<Item = &'a Rect>,
    I::IntoIter: Clone,
{
    let obstacles = obstacles.into_iter();
    let mut velocity = body.velocity;
    velocity.y = (velocity.y + physics.gravity).min(physics.terminal_velocity);

    let moved = geometry::translated(body.rect, vec2(velocity.x, 0.0));
    let rect = geometry::resolve_x(moved, velocity.x, obstacles.clone());

    let moved = geometry::translated(rect, vec2(0.0, velocity.y));
    let (rect, contact) = geometry::resolve_y(moved, velocity.y, obstacles);

    let mut grounded = false;
    let mut jump_count = body.jump_count;
    match contact {
        VerticalContact::Landed => {
            velocity.y = 0.0;
            grounded = true;
            jump_count = 0;
        }
        VerticalContact::HeadBump => velocity.y = 0.0,
        VerticalContact::None => {}
    }

    Body {
        rect: geometry::clamp_inside(rect, bounds),
        velocity,
        grounded,
        jump_count,
    }
}

#[derive(Clone, Debug)]
pub struct Player {
    pub body: Body,
    pub facing: Facing,
    pub lives: u32,
    pub max_lives: u32,
}

impl Player {
    pub fn new(spawn: Vec2, size: Vec2, max_lives: u32) -> Self {
        Self {
            body: Body {
                rect: Rect::new(spawn.x, spawn.y, size.x, size.y),
                velocity: Vec2::ZERO,
                grounded: false,
                jump_count: 0,
            },
            facing: Facing::Right,
            lives: max_lives,
            max_lives,
        }
    }

    pub fn rect(&self) -> Rect {
        self.body.rect
    }

    /// Returns true if the jump happened. The second jump does not need ground.
    pub fn jump(&mut self, physics: &Physics) -> bool {
        if self.body.jump_count >= physics.max_jumps {
            return false;
        }
        self.body.velocity.y = physics.jump_strength;
        self.body.jump_count += 1;
        self.body.grounded = false;
        true
    }

    /// Set horizontal speed from held keys. Right wins when both are held.
    pub fn steer(&mut self, left: bool, right: bool, speed: f32) {
        self.body.velocity.x = 0.0;
        if left {
            self.body.velocity.x = -speed;
            self.facing = Facing::Left;
        }
        if right {
            self.body.velocity.x = speed;
            self.facing = Facing::Right;
        }
    }

    pub fn update<'a, I>(&mut self, obstacles: I, physics: &Physics, bounds: &Rect)
    where
        I: IntoIterator<Item = &'a Rect>,
        I::IntoIter: Clone,
    {
        self.body = step_body(self.body, obstacles, physics, bounds);
    }

    pub fn respawn(&mut self, spawn: Vec2) {
        self.body.rect.x = spawn.x;
        self.body.rect.y = spawn.y;
        self.body.velocity = Vec2::ZERO;
    }

    /// Take one life. Returns true when none are left.
    pub fn lose_life(&mut self) -> bool {
        self.lives = self.lives.saturating_sub(1);
        self.lives == 0
    }

    /// Restore one life, capped at the maximum. Returns true if a life was gained.
    pub fn heal(&mut self) -> bool {
        if self.lives < self.max_lives {
            self.lives += 1;
            true
        } else {
            false
        }
    }
}

impl Collidable for Player {
    fn bounds(&self) -> Rect {
        self.body.rect
    }
}

#[derive(Clone, Debug)]
pub struct Pursuer {
    pub rect: Rect,
    pub spawn: Vec2,
    pub facing: Facing,
    pub speed: f32,
}

impl Pursuer {
    pub fn new(spawn: Vec2, size: Vec2, speed: f32) -> Self {
        Self {
            rect: Rect::new(spawn.x, spawn.y, size.x, size.y),
            spawn,
            facing: Facing::Right,
            speed,
        }
    }

    /// Step straight at the target's center. Within one step of it, snap onto
    /// it instead of overshooting.
    pub fn seek(&mut self, target: &Rect) {
        let goal = geometry::center(target);
        let delta = goal - geometry::center(&self.rect);
        let dist = delta.length();
        if dist == 0.0 {
            return;
        }
        if dist <= self.speed {
            self.rect.x = goal.x - self.rect.w / 2.0;
            self.rect.y = goal.y - self.rect.h / 2.0;
        } else {
            let step = delta / dist * self.speed;
            self.rect.x += step.x;
            self.rect.y += step.y;
        }
        self.facing = if delta.x > 0.0 { Facing::Right } else { Facing::Left };
    }

    pub fn reset(&mut self) {
        self.rect.x = self.spawn.x;
        self.rect.y = self.spawn.y;
    }
}

impl Collidable for Pursuer {
    fn bounds(&self) -> Rect {
        self.rect
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const BOUNDS: Rect = Rect {
        x: 0.0,
        y: 0.0,
        w: 960.0,
        h: 640.0,
    };

    fn physics() -> Physics {
        Physics {
            gravity: 0.5,
            terminal_velocity: 15.0,
            jump_strength: -10.0,
            max_jumps: 2,
        }
    }

    fn player_at(x: f32, y: f32) -> Player {
        Player::new(vec2(x, y), vec2(32.0, 32.0), 5)
    }

    #[test]
    fn gravity_accumulates_up_to_terminal_velocity() {
        let mut p = player_at(100.0, 0.0);
        let floor: Vec<Rect> = Vec::new();
        for _ in 0..100 {
            p.update(&floor, &physics(), &Rect::new(0.0, 0.0, 960.0, 100_000.0));
        }
        assert_eq!(p.body.velocity.y, 15.0);
    }

    #[test]
    fn landing_resets_jumps_and_grounds() {
        let floor = vec![Rect::new(0.0, 200.0, 960.0, 32.0)];
        let mut p = player_at(100.0, 100.0);
        p.body.jump_count = 2;
        for _ in 0..60 {
            p.update(&floor, &physics(), &BOUNDS);
        }
        assert!(p.body.grounded);
        assert_eq!(p.body.jump_count, 0);
        assert_eq!(p.rect().y, 168.0);
        assert_eq!(p.body.velocity.y, 0.0);
    }

    #[test]
    fn double_jump_then_refused() {
        let mut p = player_at(100.0, 100.0);
        assert!(p.jump(&physics()));
        assert!(p.jump(&physics()));
        assert!(!p.jump(&physics()));
        assert_eq!(p.body.jump_count, 2);
        assert_eq!(p.body.velocity.y, -10.0);
    }

    #[test]
    fn head_bump_zeroes_upward_velocity() {
        let ceiling = vec![Rect::new(0.0, 60.0, 960.0, 32.0)];
        let mut p = player_at(100.0, 95.0);
        p.jump(&physics());
        p.update(&ceiling, &physics(), &BOUNDS);
        assert_eq!(p.rect().y, 92.0);
        assert_eq!(p.body.velocity.y, 0.0);
        assert!(!p.body.grounded);
    }

    #[test]
    fn walls_do_not_zero_horizontal_velocity() {
        let wall = vec![Rect::new(140.0, 0.0, 32.0, 640.0)];
        let mut p = player_at(100.0, 300.0);
        p.steer(false, true, 6.0);
        for _ in 0..5 {
            p.update(&wall, &physics(), &BOUNDS);
        }
        assert_eq!(p.rect().x, 108.0);
        assert_eq!(p.body.velocity.x, 6.0);
    }

    #[test]
    fn right_wins_when_both_held() {
        let mut p = player_at(0.0, 0.0);
        p.steer(true, true, 6.0);
        assert_eq!(p.body.velocity.x, 6.0);
        assert_eq!(p.facing, Facing::Right);
        p.steer(true, false, 6.0);
        assert_eq!(p.facing, Facing::Left);
    }

    #[test]
    fn lives_saturate_at_both_ends() {
        let mut p = player_at(0.0, 0.0);
        assert!(!p.heal());
        assert_eq!(p.lives, 5);
        for _ in 0..4 {
            assert!(!p.lose_life());
        }
        assert!(p.lose_life());
        assert!(p.lose_life());
        assert_eq!(p.lives, 0);
    }

    #[test]
    fn pursuer_does_not_move_onto_exact_center() {
        let target = Rect::new(100.0, 100.0, 32.0, 32.0);
        let mut e = Pursuer::new(vec2(100.0, 100.0), vec2(32.0, 32.0), 1.5);
        e.seek(&target);
        assert_eq!(e.rect, target);
    }

    #[test]
    fn pursuer_faces_target() {
        let target = Rect::new(0.0, 100.0, 32.0, 32.0);
        let mut e = Pursuer::new(vec2(200.0, 100.0), vec2(32.0, 32.0), 1.5);
        e.seek(&target);
        assert_eq!(e.facing, Facing::Left);
        assert_eq!(e.rect.x, 198.5);
        e.reset();
        assert_eq!(e.rect.x, 200.0);
    }

    #[test]
    fn exit_glow_and_pickup_shade_cycle() {
        let mut exit = ExitZone::new(0.0, 0.0, 64.0, 128.0);
        assert_eq!(exit.glow(), 1.0);
        for _ in 0..30 {
            exit.animate();
        }
        assert_eq!(exit.glow(), 0.0);

        let mut pickup = Pickup::new(0.0, 0.0, 48.0);
        let mut shades = Vec::new();
        for _ in 0..PICKUP_FRAMES {
            shades.push(pickup.shade());
            pickup.animate();
        }
        assert_eq!(pickup.frame, 0);
        assert!(shades.iter().all(|&s| s < 3));
        assert_eq!(shades[29], 2);
    }

    proptest! {
        #[test]
        fn pursuit_is_monotonic(
            px in 0.0f32..900.0, py in 0.0f32..600.0,
            tx in 0.0f32..900.0, ty in 0.0f32..600.0,
        ) {
            let target = Rect::new(tx, ty, 32.0, 32.0);
            let mut e = Pursuer::new(vec2(px, py), vec2(32.0, 32.0), 1.5);
            for _ in 0..50 {
                let before = geometry::center(&e.rect).distance(geometry::center(&target));
                e.seek(&target);
                let after = geometry::center(&e.rect).distance(geometry::center(&target));
                if before > 1e-3 {
                    prop_assert!(after < before || after < 1e-3);
                }
            }
        }

        #[test]
        fn player_never_rests_inside_a_platform(
            moves in proptest::collection::vec((0u8..3, any::<bool>()), 1..200)
        ) {
            let obstacles = vec![
                Rect::new(0.0, 576.0, 960.0, 64.0),
                Rect::new(0.0, 0.0, 64.0, 640.0),
                Rect::new(896.0, 0.0, 64.0, 640.0),
                Rect::new(320.0, 448.0, 128.0, 32.0),
                Rect::new(640.0, 352.0, 96.0, 32.0),
            ];
            let mut p = player_at(96.0, 440.0);
            for (dir, jump) in moves {
                p.steer(dir == 1, dir == 2, 6.0);
                if jump {
                    p.jump(&physics());
                }
                p.update(&obstacles, &physics(), &BOUNDS);
                for o in &obstacles {
                    prop_assert!(!geometry::intersects(&p.rect(), o));
                }
            }
        }

        #[test]
        fn jump_count_never_exceeds_two(
            jumps in proptest::collection::vec(any::<bool>(), 1..120)
        ) {
            let floor = vec![Rect::new(0.0, 400.0, 960.0, 32.0)];
            let mut p = player_at(300.0, 368.0);
            for jump in jumps {
                if jump {
                    p.jump(&physics());
                }
                p.update(&floor, &physics(), &BOUNDS);
                prop_assert!(p.body.jump_count <= 2);
                if p.body.grounded {
                    prop_assert_eq!(p.body.jump_count, 0);
                }
            }
        }
    }
}
