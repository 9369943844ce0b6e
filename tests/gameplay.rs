//! End-to-end simulation runs over the render-free core, driven by a fixed
//! seed and synthetic wall-clock time.

use rand::SeedableRng;
use rand::rngs::StdRng;
use runner_tui::world::{
    Difficulty, GROUND_Y, JUMP_APEX, OBSTACLE_BONUS, Outcome, PLAYER_H, PLAYER_START_Y, PLAYER_W,
    PLAYER_X, World,
};
use std::time::{Duration, Instant};

const TICK: Duration = Duration::from_micros(8_333); // normal's 120 fps

fn world(seed: u64) -> World {
    World::new(Difficulty::Normal, StdRng::seed_from_u64(seed), Instant::now())
}

/// Jump whenever a crate is close enough ahead to threaten.
fn should_jump(world: &World) -> bool {
    world.player.on_ground
        && world.obstacles.iter().any(|o| {
            o.x + o.w >= PLAYER_X && o.x <= PLAYER_X + PLAYER_W + 60.0
        })
}

#[test]
fn idle_player_eventually_dies_without_scoring() {
    let mut w = world(1);
    let start = Instant::now();
    let mut died = false;
    for tick in 0..30_000u64 {
        let now = start + TICK * tick as u32;
        if w.step(false, now, TICK) == Outcome::Dead {
            died = true;
            break;
        }
    }
    assert!(died, "a grounded player must eventually hit a crate");
    assert_eq!(w.score, 0);
}

#[test]
fn timed_jumps_survive_and_score() {
    let mut w = world(2);
    let start = Instant::now();
    for tick in 0..30_000u64 {
        let now = start + TICK * tick as u32;
        let jump = should_jump(&w);
        assert_eq!(
            w.step(jump, now, TICK),
            Outcome::Alive,
            "jumping over every crate must survive (tick {tick})"
        );
        // Clamp invariants hold throughout.
        assert!(w.player.y >= PLAYER_START_Y - JUMP_APEX);
        assert!(w.player.y + PLAYER_H <= GROUND_Y);
        // Score only ever moves in whole bonuses.
        assert_eq!(w.score % OBSTACLE_BONUS, 0);
    }
    assert!(w.score > 0, "passed crates must have scored");
}

#[test]
fn score_grows_by_one_bonus_per_passed_crate() {
    let mut w = world(3);
    let start = Instant::now();
    let mut prev = 0;
    for tick in 0..30_000u64 {
        let now = start + TICK * tick as u32;
        let jump = should_jump(&w);
        if w.step(jump, now, TICK) == Outcome::Dead {
            break;
        }
        assert!(w.score == prev || w.score == prev + OBSTACLE_BONUS);
        prev = w.score;
    }
}

#[test]
fn elapsed_time_accumulates_with_ticks() {
    let mut w = world(4);
    let start = Instant::now();
    for tick in 0..120u64 {
        w.step(false, start + TICK * tick as u32, TICK);
    }
    assert_eq!(w.play_time, TICK * 120);
}
