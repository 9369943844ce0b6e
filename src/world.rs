//! Simulation core: player physics, obstacles, ambient birds, spawn timing
//! and the per-frame outcome. Everything here is render-free and integrates
//! in fixed per-tick units; the selected difficulty decides how many ticks
//! run per wall-clock second.

use rand::Rng;
use rand::rngs::StdRng;
use std::time::{Duration, Instant};

// World coordinate space. The renderer scales this into whatever terminal
// size it gets; the simulation never sees the terminal.
pub const WORLD_W: f64 = 1280.0;
pub const WORLD_H: f64 = 720.0;
pub const GROUND_Y: f64 = WORLD_H - 50.0;

pub const PLAYER_X: f64 = 60.0;
pub const PLAYER_W: f64 = 80.0;
pub const PLAYER_H: f64 = 100.0;
pub const PLAYER_START_Y: f64 = GROUND_Y - PLAYER_H;

pub const GRAVITY: f64 = 0.3;
pub const JUMP_IMPULSE: f64 = -15.0;
pub const JUMP_APEX: f64 = 400.0;
pub const BASE_SPEED: f64 = 2.0;
pub const BOOSTED_SPEED: f64 = 3.0;

pub const ANIM_CADENCE: u32 = 10;
pub const PLAYER_FRAMES: u32 = 8;
pub const BIRD_FRAMES: u32 = 9;

pub const OBSTACLE_SIZE: f64 = 80.0;
pub const OBSTACLE_BONUS: u32 = 50;

pub const BIRD_W: f64 = 60.0;
pub const BIRD_H: f64 = 40.0;
pub const BIRD_SPEED: f64 = BASE_SPEED * 3.0;

const SPAWN_X_MIN: f64 = WORLD_W;
const SPAWN_X_MAX: f64 = WORLD_W + 100.0;
const BIRD_Y_MIN: f64 = 50.0;
const BIRD_Y_MAX: f64 = WORLD_H - 550.0;

/// Axis-aligned box in world units.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
}

impl Rect {
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.x < other.x + other.w
            && other.x < self.x + self.w
            && self.y < other.y + other.h
            && other.y < self.y + self.h
    }
}

/// Shared animation capability: a frame counter advanced cyclically every
/// `cadence` ticks. The player and the birds both drive their sprite poses
/// off one of these.
#[derive(Clone, Copy, Debug)]
pub struct Animator {
    frames: u32,
    cadence: u32,
    timer: u32,
    pub frame: u32,
}

impl Animator {
    pub fn new(frames: u32, cadence: u32) -> Self {
        Self {
            frames,
            cadence,
            timer: 0,
            frame: 0,
        }
    }

    pub fn tick(&mut self) {
        self.timer += 1;
        if self.timer >= self.cadence {
            self.frame = (self.frame + 1) % self.frames;
            self.timer = 0;
        }
    }
}

/// The auto-running player. `y` is the top edge; the body rests with its
/// bottom on the ground line.
#[derive(Clone, Debug)]
pub struct Player {
    pub y: f64,
    pub vel_y: f64,
    pub vel_x: f64,
    pub on_ground: bool,
    pub anim: Animator,
}

impl Player {
    pub fn new() -> Self {
        Self {
            y: PLAYER_START_Y,
            vel_y: 0.0,
            vel_x: BASE_SPEED,
            on_ground: false,
            anim: Animator::new(PLAYER_FRAMES, ANIM_CADENCE),
        }
    }

    /// Advance physics one tick. A jump request is honored only while
    /// grounded; both clamps are hard stops with no bounce.
    pub fn update(&mut self, jump_pressed: bool) {
        if jump_pressed && self.on_ground {
            self.vel_y = JUMP_IMPULSE;
            self.on_ground = false;
        }

        self.vel_y += GRAVITY;
        self.y += self.vel_y;

        let apex = PLAYER_START_Y - JUMP_APEX;
        if self.y < apex {
            self.y = apex;
            self.vel_y = 0.0;
        }
        if self.y + PLAYER_H >= GROUND_Y {
            self.y = GROUND_Y - PLAYER_H;
            self.vel_y = 0.0;
            self.on_ground = true;
        }

        self.anim.tick();

        // Airborne boost: the whole world scrolls faster while the player
        // is above the rest height.
        self.vel_x = if self.y < PLAYER_START_Y {
            BOOSTED_SPEED
        } else {
            BASE_SPEED
        };
    }

    pub fn rect(&self) -> Rect {
        Rect {
            x: PLAYER_X,
            y: self.y,
            w: PLAYER_W,
            h: PLAYER_H,
        }
    }
}

/// A crate the player has to clear. Scrolls at the player's current
/// horizontal speed and awards its pass bonus exactly once.
#[derive(Clone, Debug)]
pub struct Obstacle {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
    pub scored: bool,
}

impl Obstacle {
    pub fn spawn(rng: &mut StdRng, difficulty: Difficulty) -> Self {
        // Expert stacks two crates, anchored one crate-height higher.
        let h = if difficulty.profile().tall_obstacles {
            OBSTACLE_SIZE * 2.0
        } else {
            OBSTACLE_SIZE
        };
        Self {
            x: rng.gen_range(SPAWN_X_MIN..SPAWN_X_MAX),
            y: GROUND_Y - h,
            w: OBSTACLE_SIZE,
            h,
            scored: false,
        }
    }

    pub fn advance(&mut self, scroll_speed: f64) {
        self.x -= scroll_speed;
    }

    pub fn off_screen(&self) -> bool {
        self.x + self.w < 0.0
    }

    pub fn rect(&self) -> Rect {
        Rect {
            x: self.x,
            y: self.y,
            w: self.w,
            h: self.h,
        }
    }
}

/// Decorative bird. Flies at a fixed multiple of the base speed regardless
/// of the player's boost, and wraps to a fresh off-screen position instead
/// of despawning.
#[derive(Clone, Debug)]
pub struct Bird {
    pub x: f64,
    pub y: f64,
    pub anim: Animator,
}

impl Bird {
    pub fn spawn(rng: &mut StdRng) -> Self {
        Self {
            x: rng.gen_range(SPAWN_X_MIN..SPAWN_X_MAX),
            y: rng.gen_range(BIRD_Y_MIN..BIRD_Y_MAX),
            anim: Animator::new(BIRD_FRAMES, ANIM_CADENCE),
        }
    }

    pub fn advance(&mut self, rng: &mut StdRng) {
        self.anim.tick();
        self.x -= BIRD_SPEED;
        if self.x + BIRD_W < 0.0 {
            self.x = rng.gen_range(SPAWN_X_MIN..SPAWN_X_MAX);
            self.y = rng.gen_range(BIRD_Y_MIN..BIRD_Y_MAX);
        }
    }
}

/// Difficulty presets. Spawn interval tightens and the tick rate rises
/// monotonically; expert additionally doubles the obstacle height. Physics
/// integrates per tick, so a higher tick rate also speeds up the simulation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Difficulty {
    Beginner,
    Normal,
    Expert,
}

pub struct Profile {
    pub tick_rate: u32,
    pub spawn_interval: Duration,
    pub tall_obstacles: bool,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [
        Difficulty::Beginner,
        Difficulty::Normal,
        Difficulty::Expert,
    ];

    pub fn profile(self) -> Profile {
        match self {
            Difficulty::Beginner => Profile {
                tick_rate: 75,
                spawn_interval: Duration::from_secs(7),
                tall_obstacles: false,
            },
            Difficulty::Normal => Profile {
                tick_rate: 120,
                spawn_interval: Duration::from_secs(5),
                tall_obstacles: false,
            },
            Difficulty::Expert => Profile {
                tick_rate: 240,
                spawn_interval: Duration::from_secs(3),
                tall_obstacles: true,
            },
        }
    }

    /// Key used for the per-level score table.
    pub fn key(self) -> &'static str {
        match self {
            Difficulty::Beginner => "beginner",
            Difficulty::Normal => "normal",
            Difficulty::Expert => "expert",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Difficulty::Beginner => "BEGINNER",
            Difficulty::Normal => "NORMAL",
            Difficulty::Expert => "EXPERT",
        }
    }
}

/// Wall-clock gate for obstacle creation. The only place real time enters
/// the simulation besides the elapsed-time display.
#[derive(Clone, Copy, Debug)]
pub struct Spawner {
    interval: Duration,
    last_spawn: Instant,
}

impl Spawner {
    pub fn new(interval: Duration, now: Instant) -> Self {
        Self {
            interval,
            last_spawn: now,
        }
    }

    pub fn should_spawn(&mut self, now: Instant) -> bool {
        if now.duration_since(self.last_spawn) >= self.interval {
            self.last_spawn = now;
            true
        } else {
            false
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    Alive,
    Dead,
}

/// One play session: player, hazards, ambient birds, scroll offset, score
/// and elapsed time. Restart means building a fresh one.
pub struct World {
    pub difficulty: Difficulty,
    pub player: Player,
    pub obstacles: Vec<Obstacle>,
    pub birds: Vec<Bird>,
    pub bg_offset: f64,
    pub score: u32,
    pub play_time: Duration,
    spawner: Spawner,
    rng: StdRng,
}

impl World {
    pub fn new(difficulty: Difficulty, mut rng: StdRng, now: Instant) -> Self {
        let birds = (0..rng.gen_range(1..=3))
            .map(|_| Bird::spawn(&mut rng))
            .collect();
        Self {
            difficulty,
            player: Player::new(),
            obstacles: Vec::new(),
            birds,
            bg_offset: 0.0,
            score: 0,
            play_time: Duration::ZERO,
            spawner: Spawner::new(difficulty.profile().spawn_interval, now),
            rng,
        }
    }

    /// Advance the world one tick: spawn check, entity updates, background
    /// scroll, then the terminal checks. Pass bonuses are only awarded on
    /// ticks that did not end the run, so a fatal frame never also scores.
    pub fn step(&mut self, jump_pressed: bool, now: Instant, dt: Duration) -> Outcome {
        self.play_time += dt;

        if self.spawner.should_spawn(now) {
            self.obstacles
                .push(Obstacle::spawn(&mut self.rng, self.difficulty));
        }

        self.player.update(jump_pressed);
        let scroll = self.player.vel_x;

        for obstacle in &mut self.obstacles {
            obstacle.advance(scroll);
        }
        self.obstacles.retain(|o| !o.off_screen());

        for bird in &mut self.birds {
            bird.advance(&mut self.rng);
        }

        self.bg_offset -= scroll;
        if self.bg_offset <= -WORLD_W {
            self.bg_offset = 0.0;
        }

        let player_rect = self.player.rect();
        if self.obstacles.iter().any(|o| player_rect.overlaps(&o.rect())) {
            return Outcome::Dead;
        }
        if player_rect.y + player_rect.h > WORLD_H {
            return Outcome::Dead;
        }

        for obstacle in &mut self.obstacles {
            if !obstacle.scored && obstacle.x + obstacle.w < player_rect.x {
                obstacle.scored = true;
                self.score += OBSTACLE_BONUS;
            }
        }
        Outcome::Alive
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn rng() -> StdRng {
        StdRng::seed_from_u64(7)
    }

    fn world(difficulty: Difficulty) -> World {
        World::new(difficulty, rng(), Instant::now())
    }

    #[test]
    fn player_stays_between_apex_and_ground() {
        let mut player = Player::new();
        for tick in 0..10_000 {
            player.update(tick % 3 == 0);
            assert!(player.y >= PLAYER_START_Y - JUMP_APEX);
            assert!(player.y + PLAYER_H <= GROUND_Y);
        }
    }

    #[test]
    fn jump_only_applies_while_grounded() {
        let mut player = Player::new();
        player.update(false);
        assert!(player.on_ground);

        player.update(true);
        assert!(!player.on_ground);
        assert_eq!(player.vel_y, JUMP_IMPULSE + GRAVITY);

        // A second request mid-air only accumulates gravity.
        let before = player.vel_y;
        player.update(true);
        assert_eq!(player.vel_y, before + GRAVITY);
    }

    #[test]
    fn airborne_player_scrolls_faster() {
        let mut player = Player::new();
        player.update(false);
        assert_eq!(player.vel_x, BASE_SPEED);
        player.update(true);
        assert_eq!(player.vel_x, BOOSTED_SPEED);
        while !player.on_ground {
            player.update(false);
        }
        assert_eq!(player.vel_x, BASE_SPEED);
    }

    #[test]
    fn passed_obstacle_scores_exactly_once() {
        let mut w = world(Difficulty::Normal);
        // Already behind the player but still on screen.
        w.obstacles.push(Obstacle {
            x: -50.0,
            y: GROUND_Y - OBSTACLE_SIZE,
            w: OBSTACLE_SIZE,
            h: OBSTACLE_SIZE,
            scored: false,
        });
        let now = Instant::now();
        assert_eq!(w.step(false, now, Duration::ZERO), Outcome::Alive);
        assert_eq!(w.score, OBSTACLE_BONUS);
        assert_eq!(w.step(false, now, Duration::ZERO), Outcome::Alive);
        assert_eq!(w.score, OBSTACLE_BONUS);
    }

    #[test]
    fn obstacle_ahead_of_player_does_not_score() {
        let mut w = world(Difficulty::Normal);
        w.obstacles.push(Obstacle {
            x: 600.0,
            y: GROUND_Y - OBSTACLE_SIZE,
            w: OBSTACLE_SIZE,
            h: OBSTACLE_SIZE,
            scored: false,
        });
        assert_eq!(w.step(false, Instant::now(), Duration::ZERO), Outcome::Alive);
        assert_eq!(w.score, 0);
    }

    #[test]
    fn collision_is_terminal_and_suppresses_scoring() {
        let mut w = world(Difficulty::Normal);
        // One crate inside the player, another newly passed the same tick.
        w.obstacles.push(Obstacle {
            x: PLAYER_X + 10.0,
            y: GROUND_Y - OBSTACLE_SIZE,
            w: OBSTACLE_SIZE,
            h: OBSTACLE_SIZE,
            scored: false,
        });
        w.obstacles.push(Obstacle {
            x: -50.0,
            y: GROUND_Y - OBSTACLE_SIZE,
            w: OBSTACLE_SIZE,
            h: OBSTACLE_SIZE,
            scored: false,
        });
        assert_eq!(w.step(false, Instant::now(), Duration::ZERO), Outcome::Dead);
        assert_eq!(w.score, 0);
    }

    #[test]
    fn background_offset_wraps_seamlessly() {
        let mut w = world(Difficulty::Beginner);
        w.bg_offset = -WORLD_W + 1.0;
        w.step(false, Instant::now(), Duration::ZERO);
        assert_eq!(w.bg_offset, 0.0);
        for _ in 0..100 {
            w.step(false, Instant::now(), Duration::ZERO);
            assert!(w.bg_offset > -WORLD_W && w.bg_offset <= 0.0);
        }
    }

    #[test]
    fn fresh_world_is_fully_reset() {
        let mut w = world(Difficulty::Expert);
        let start = Instant::now();
        for i in 0..300 {
            w.step(i % 5 == 0, start + Duration::from_secs(20), Duration::from_millis(4));
        }
        assert!(!w.obstacles.is_empty());

        let w = world(Difficulty::Expert);
        assert_eq!(w.score, 0);
        assert_eq!(w.bg_offset, 0.0);
        assert!(w.obstacles.is_empty());
        assert_eq!(w.player.y, PLAYER_START_Y);
        assert_eq!(w.player.vel_y, 0.0);
    }

    #[test]
    fn spawner_respects_interval() {
        let start = Instant::now();
        let mut spawner = Spawner::new(Duration::from_secs(5), start);
        assert!(!spawner.should_spawn(start));
        assert!(!spawner.should_spawn(start + Duration::from_secs(4)));
        assert!(spawner.should_spawn(start + Duration::from_secs(5)));
        // Timer resets on spawn.
        assert!(!spawner.should_spawn(start + Duration::from_secs(9)));
        assert!(spawner.should_spawn(start + Duration::from_secs(10)));
    }

    #[test]
    fn expert_obstacles_are_double_height() {
        let mut r = rng();
        let short = Obstacle::spawn(&mut r, Difficulty::Normal);
        let tall = Obstacle::spawn(&mut r, Difficulty::Expert);
        assert_eq!(short.h, OBSTACLE_SIZE);
        assert_eq!(tall.h, OBSTACLE_SIZE * 2.0);
        assert_eq!(tall.y, GROUND_Y - OBSTACLE_SIZE * 2.0);
    }

    #[test]
    fn bird_wraps_to_offscreen_right() {
        let mut r = rng();
        let mut bird = Bird::spawn(&mut r);
        bird.x = -BIRD_W - 1.0;
        bird.advance(&mut r);
        assert!(bird.x >= WORLD_W);
        assert!(bird.y >= BIRD_Y_MIN && bird.y < BIRD_Y_MAX);
    }

    #[test]
    fn difficulty_tightens_monotonically() {
        let b = Difficulty::Beginner.profile();
        let n = Difficulty::Normal.profile();
        let e = Difficulty::Expert.profile();
        assert!(e.spawn_interval <= n.spawn_interval);
        assert!(n.spawn_interval <= b.spawn_interval);
        assert!(e.tick_rate >= n.tick_rate);
        assert!(n.tick_rate >= b.tick_rate);
    }
}
