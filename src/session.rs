//! One play session: a world plus the score bookkeeping that must happen
//! the moment it ends.

use crate::scores::ScoreStore;
use crate::world::{Difficulty, Outcome, World};
use anyhow::Result;
use rand::rngs::StdRng;
use std::time::{Duration, Instant};

/// A live run. Wraps the world so that the fatal tick persists the score
/// under the session's level before control returns to the caller.
pub struct Session {
    pub world: World,
    over: bool,
}

impl Session {
    pub fn new(difficulty: Difficulty, rng: StdRng, now: Instant) -> Self {
        Self {
            world: World::new(difficulty, rng, now),
            over: false,
        }
    }

    /// Advance one tick. A `Dead` outcome records the score before this
    /// returns; further calls are no-ops that stay `Dead`.
    pub fn step(
        &mut self,
        jump_pressed: bool,
        now: Instant,
        dt: Duration,
        store: &mut ScoreStore,
    ) -> Result<Outcome> {
        if self.over {
            return Ok(Outcome::Dead);
        }
        let outcome = self.world.step(jump_pressed, now, dt);
        if outcome == Outcome::Dead {
            self.over = true;
            store.record(self.world.difficulty, self.world.score)?;
        }
        Ok(outcome)
    }

    pub fn score(&self) -> u32 {
        self.world.score
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::{GROUND_Y, OBSTACLE_SIZE, Obstacle, PLAYER_X};
    use rand::SeedableRng;
    use std::path::PathBuf;
    use std::sync::atomic::{AtomicU32, Ordering};

    static COUNTER: AtomicU32 = AtomicU32::new(0);

    fn temp_store() -> (ScoreStore, PathBuf) {
        let n = COUNTER.fetch_add(1, Ordering::Relaxed);
        let path = std::env::temp_dir().join(format!(
            "runner-tui-session-{}-{}.json",
            std::process::id(),
            n
        ));
        (ScoreStore::open(path.clone()).unwrap(), path)
    }

    fn session(difficulty: Difficulty) -> Session {
        Session::new(difficulty, StdRng::seed_from_u64(7), Instant::now())
    }

    fn colliding_crate() -> Obstacle {
        Obstacle {
            x: PLAYER_X + 10.0,
            y: GROUND_Y - OBSTACLE_SIZE,
            w: OBSTACLE_SIZE,
            h: OBSTACLE_SIZE,
            scored: false,
        }
    }

    #[test]
    fn fatal_tick_records_score_before_returning() {
        let (mut store, path) = temp_store();
        let mut s = session(Difficulty::Normal);
        s.world.score = 150;
        s.world.obstacles.push(colliding_crate());

        let outcome = s
            .step(false, Instant::now(), Duration::ZERO, &mut store)
            .unwrap();
        assert_eq!(outcome, Outcome::Dead);
        assert_eq!(store.top_scores(Difficulty::Normal, 5), [150]);
        std::fs::remove_file(path).ok();
    }

    #[test]
    fn finished_session_stays_dead_and_records_once() {
        let (mut store, path) = temp_store();
        let mut s = session(Difficulty::Expert);
        s.world.obstacles.push(colliding_crate());
        s.step(false, Instant::now(), Duration::ZERO, &mut store)
            .unwrap();

        for _ in 0..3 {
            let outcome = s
                .step(false, Instant::now(), Duration::ZERO, &mut store)
                .unwrap();
            assert_eq!(outcome, Outcome::Dead);
        }
        assert_eq!(store.top_scores(Difficulty::Expert, 5), [0]);
        std::fs::remove_file(path).ok();
    }
}
