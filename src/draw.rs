//! World rendering. The simulation lives in a fixed 1280x720 coordinate
//! space; the viewport scales it into however many half-block pixels the
//! terminal offers.

use crate::pixel::{PixelBuf, Rgb, draw_number, draw_text};
use crate::world::{
    BIRD_H, BIRD_W, GROUND_Y, Obstacle, PLAYER_H, PLAYER_W, PLAYER_X, WORLD_H, WORLD_W, World,
};

pub const SKY_TOP: Rgb = Rgb(110, 185, 232);
pub const SKY_BOT: Rgb = Rgb(198, 230, 248);
const HILL_FAR: Rgb = Rgb(130, 200, 120);
const HILL_NEAR: Rgb = Rgb(100, 178, 90);
const GRASS: Rgb = Rgb(84, 168, 55);
const GRASS_LIGHT: Rgb = Rgb(110, 200, 70);
const DIRT: Rgb = Rgb(210, 185, 110);
const DIRT_DARK: Rgb = Rgb(185, 160, 90);
const CRATE: Rgb = Rgb(178, 124, 62);
const CRATE_PLANK: Rgb = Rgb(150, 102, 48);
const CRATE_EDGE: Rgb = Rgb(104, 68, 30);
const RUNNER_SHIRT: Rgb = Rgb(205, 60, 50);
const RUNNER_SKIN: Rgb = Rgb(245, 205, 160);
const RUNNER_LEGS: Rgb = Rgb(44, 62, 118);
const RUNNER_SHOE: Rgb = Rgb(35, 30, 28);
const BIRD_BODY: Rgb = Rgb(70, 78, 96);
const BIRD_WING: Rgb = Rgb(110, 120, 142);
const BIRD_BEAK: Rgb = Rgb(230, 160, 40);
pub const WHITE: Rgb = Rgb(255, 255, 255);
pub const TEXT_BLUE: Rgb = Rgb(0, 62, 151);

/// Maps world coordinates to buffer pixels (and terminal cells back to
/// world coordinates for mouse hits).
#[derive(Clone, Copy)]
pub struct Viewport {
    pw: usize,
    ph: usize,
}

impl Viewport {
    pub fn new(buf: &PixelBuf) -> Self {
        Self { pw: buf.w, ph: buf.h }
    }

    pub fn px(&self, x: f64) -> i32 {
        (x * self.pw as f64 / WORLD_W) as i32
    }

    pub fn py(&self, y: f64) -> i32 {
        (y * self.ph as f64 / WORLD_H) as i32
    }

    /// Terminal cell (column, row) to world coordinates. Rows map to two
    /// pixels; the top one is representative enough for button hits.
    pub fn cell_to_world(&self, col: u16, row: u16) -> (f64, f64) {
        (
            col as f64 * WORLD_W / self.pw as f64,
            (row as f64 * 2.0) * WORLD_H / self.ph as f64,
        )
    }

    /// Fill a world-space rectangle, rounding edges consistently so that
    /// adjacent rectangles stay seamless.
    pub fn fill(&self, buf: &mut PixelBuf, x: f64, y: f64, w: f64, h: f64, c: Rgb) {
        let x0 = self.px(x);
        let y0 = self.py(y);
        let x1 = self.px(x + w).max(x0 + 1);
        let y1 = self.py(y + h).max(y0 + 1);
        buf.fill_rect(x0, y0, x1 - x0, y1 - y0, c);
    }
}

pub fn draw_world(buf: &mut PixelBuf, world: &World) {
    let vp = Viewport::new(buf);

    draw_sky(buf, &vp);
    draw_hills(buf, &vp, world.bg_offset);
    draw_ground(buf, &vp, world.bg_offset);

    for obstacle in &world.obstacles {
        draw_obstacle(buf, &vp, obstacle);
    }
    for bird in &world.birds {
        draw_bird(buf, &vp, bird.x, bird.y, bird.anim.frame);
    }
    draw_runner(buf, &vp, world.player.y, world.player.anim.frame);

    let cx = buf.w as i32 / 2;
    draw_number(buf, cx, 3, world.score, WHITE);
    let secs = world.play_time.as_secs() as u32;
    draw_text(buf, 20, 3, &format!("TIME {secs}"), WHITE);
}

fn draw_sky(buf: &mut PixelBuf, vp: &Viewport) {
    let ground = vp.py(GROUND_Y).max(1) as usize;
    for y in 0..ground.min(buf.h) {
        let t = (y * 256 / ground) as u16;
        let c = Rgb::lerp(SKY_TOP, SKY_BOT, t);
        for x in 0..buf.w {
            buf.set(x as i32, y as i32, c);
        }
    }
}

// The background is one tile, WORLD_W wide, scrolled at the world speed.
// Every phase below completes whole cycles per tile, so the offset wrap
// from -WORLD_W back to 0 lands on identical pixels.
const HILL_FREQ_A: f64 = std::f64::consts::TAU * 4.0 / WORLD_W;
const HILL_FREQ_B: f64 = std::f64::consts::TAU * 9.0 / WORLD_W;

/// World-space x of a pixel column within the scrolled background tile.
fn tile_x(vp: &Viewport, x: i32, offset: f64) -> f64 {
    (x as f64 * WORLD_W / vp.pw as f64 - offset).rem_euclid(WORLD_W)
}

fn draw_hills(buf: &mut PixelBuf, vp: &Viewport, offset: f64) {
    let base = vp.py(GROUND_Y);
    for x in 0..buf.w as i32 {
        let u = tile_x(vp, x, offset);
        let far = (u * HILL_FREQ_A).sin() * 40.0 + 50.0;
        let near = (u * HILL_FREQ_B).sin() * 25.0 + 20.0;
        let far_top = base - vp.py(far.max(0.0)).max(0);
        let near_top = base - vp.py(near.max(0.0)).max(0);
        for y in far_top..base {
            buf.set(x, y, HILL_FAR);
        }
        for y in near_top..base {
            buf.set(x, y, HILL_NEAR);
        }
    }
}

fn draw_ground(buf: &mut PixelBuf, vp: &Viewport, offset: f64) {
    let gy = vp.py(GROUND_Y);
    for x in 0..buf.w as i32 {
        let u = tile_x(vp, x, offset);
        let alt = (u / 16.0) as i32 % 2 == 0;
        buf.set(x, gy, if alt { GRASS } else { GRASS_LIGHT });
        buf.set(x, gy + 1, GRASS);
        for y in (gy + 2)..buf.h as i32 {
            let stripe = ((u / 8.0) as i32 + (y - gy) * 2) % 8 < 4;
            buf.set(x, y, if stripe { DIRT } else { DIRT_DARK });
        }
    }
}

fn draw_obstacle(buf: &mut PixelBuf, vp: &Viewport, obstacle: &Obstacle) {
    let x0 = vp.px(obstacle.x);
    let y0 = vp.py(obstacle.y);
    let x1 = vp.px(obstacle.x + obstacle.w).max(x0 + 2);
    let y1 = vp.py(obstacle.y + obstacle.h).max(y0 + 2);
    let (w, h) = (x1 - x0, y1 - y0);

    buf.fill_rect(x0, y0, w, h, CRATE);
    // Diagonal planks, one X per stacked crate unit.
    let units = (obstacle.h / obstacle.w).round().max(1.0) as i32;
    let unit_h = h / units;
    for u in 0..units {
        let top = y0 + u * unit_h;
        for i in 0..unit_h {
            let t = if unit_h > 1 { i * (w - 1) / (unit_h - 1).max(1) } else { 0 };
            buf.set(x0 + t, top + i, CRATE_PLANK);
            buf.set(x0 + (w - 1 - t), top + i, CRATE_PLANK);
        }
    }
    // Frame.
    buf.fill_rect(x0, y0, w, 1, CRATE_EDGE);
    buf.fill_rect(x0, y1 - 1, w, 1, CRATE_EDGE);
    buf.fill_rect(x0, y0, 1, h, CRATE_EDGE);
    buf.fill_rect(x1 - 1, y0, 1, h, CRATE_EDGE);
}

// Wing lift per animation frame, a full flap over the 9-frame cycle.
const WING_LIFT: [i32; 9] = [-2, -1, 0, 1, 2, 1, 0, -1, -2];

fn draw_bird(buf: &mut PixelBuf, vp: &Viewport, x: f64, y: f64, frame: u32) {
    let x0 = vp.px(x);
    let y0 = vp.py(y);
    let w = (vp.px(x + BIRD_W) - x0).max(3);
    let h = (vp.py(y + BIRD_H) - y0).max(2);

    let body_y = y0 + h / 3;
    buf.fill_rect(x0, body_y, w, (h / 2).max(1), BIRD_BODY);
    buf.set(x0 - 1, body_y, BIRD_BEAK);

    let lift = WING_LIFT[frame as usize % WING_LIFT.len()] * h / 4;
    buf.fill_rect(x0 + w / 3, body_y - 1 + lift, (w / 3).max(1), 1.max(h / 4), BIRD_WING);
}

// Leg spread per animation frame, a run cycle over the 8 poses.
const LEG_SPREAD: [i32; 8] = [0, 1, 2, 3, 3, 2, 1, 0];

fn draw_runner(buf: &mut PixelBuf, vp: &Viewport, y: f64, frame: u32) {
    let x0 = vp.px(PLAYER_X);
    let y0 = vp.py(y);
    let w = (vp.px(PLAYER_X + PLAYER_W) - x0).max(4);
    let h = (vp.py(y + PLAYER_H) - y0).max(6);

    let head_h = (h * 3 / 10).max(1);
    let torso_h = (h * 4 / 10).max(1);
    let leg_h = h - head_h - torso_h;

    // Head with a hint of a face.
    let head_w = (w * 2 / 3).max(2);
    let head_x = x0 + (w - head_w) / 2;
    buf.fill_rect(head_x, y0, head_w, head_h, RUNNER_SKIN);
    buf.set(head_x + head_w - 1, y0 + head_h / 3, RUNNER_SHOE);

    // Torso.
    buf.fill_rect(x0 + w / 6, y0 + head_h, w * 2 / 3, torso_h, RUNNER_SHIRT);
    // Trailing arm.
    buf.fill_rect(x0, y0 + head_h + torso_h / 4, w / 6 + 1, 1.max(torso_h / 4), RUNNER_SKIN);

    // Legs scissor apart and back over the run cycle.
    let spread = LEG_SPREAD[frame as usize % LEG_SPREAD.len()] * w / 8;
    let leg_y = y0 + head_h + torso_h;
    let leg_w = (w / 5).max(1);
    let mid = x0 + w / 2;
    buf.fill_rect(mid - leg_w - spread / 2, leg_y, leg_w, leg_h, RUNNER_LEGS);
    buf.fill_rect(mid + spread / 2, leg_y, leg_w, leg_h, RUNNER_LEGS);
    buf.fill_rect(mid - leg_w - spread / 2, leg_y + leg_h - 1, leg_w, 1, RUNNER_SHOE);
    buf.fill_rect(mid + spread / 2, leg_y + leg_h - 1, leg_w, 1, RUNNER_SHOE);
}
