//! Button-driven screens: main menu, pause and game-over overlays, and the
//! leaderboard. Buttons live in world coordinates so mouse hits go through
//! the same viewport mapping as everything else.

use crate::draw::{SKY_TOP, TEXT_BLUE, Viewport, WHITE};
use crate::pixel::{PixelBuf, Rgb, draw_number, draw_text};
use crate::scores::ScoreStore;
use crate::world::{Difficulty, Rect, WORLD_W};

const BUTTON_FACE: Rgb = Rgb(235, 205, 140);
const BUTTON_EDGE: Rgb = Rgb(160, 128, 70);
const PANEL_FACE: Rgb = Rgb(220, 195, 120);

pub const BUTTON_W: f64 = 250.0;
pub const BUTTON_H: f64 = 100.0;

/// Which screen the leaderboard returns to when dismissed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReturnTo {
    Menu,
    Paused,
    GameOver,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Screen {
    Menu,
    Playing,
    Paused,
    GameOver,
    Leaderboard(ReturnTo),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Action {
    Start(Difficulty),
    Records,
    Resume,
    Retry,
    Menu,
    Quit,
}

pub struct Button {
    pub label: &'static str,
    pub cx: f64,
    pub cy: f64,
    pub action: Action,
}

impl Button {
    const fn new(label: &'static str, cy: f64, action: Action) -> Self {
        Self {
            label,
            cx: WORLD_W / 2.0,
            cy,
            action,
        }
    }

    fn rect(&self) -> Rect {
        Rect {
            x: self.cx - BUTTON_W / 2.0,
            y: self.cy - BUTTON_H / 2.0,
            w: BUTTON_W,
            h: BUTTON_H,
        }
    }

    pub fn hit(&self, x: f64, y: f64) -> bool {
        let r = self.rect();
        x >= r.x && x < r.x + r.w && y >= r.y && y < r.y + r.h
    }
}

pub const MENU_BUTTONS: [Button; 5] = [
    Button::new("BEGINNER", 200.0, Action::Start(Difficulty::Beginner)),
    Button::new("NORMAL", 300.0, Action::Start(Difficulty::Normal)),
    Button::new("EXPERT", 400.0, Action::Start(Difficulty::Expert)),
    Button::new("RECORDS", 500.0, Action::Records),
    Button::new("QUIT", 600.0, Action::Quit),
];

pub const PAUSE_BUTTONS: [Button; 3] = [
    Button::new("RESUME", 250.0, Action::Resume),
    Button::new("RECORDS", 400.0, Action::Records),
    Button::new("MENU", 550.0, Action::Menu),
];

pub const GAME_OVER_BUTTONS: [Button; 3] = [
    Button::new("RETRY", 250.0, Action::Retry),
    Button::new("RECORDS", 400.0, Action::Records),
    Button::new("MENU", 550.0, Action::Menu),
];

fn draw_button(buf: &mut PixelBuf, vp: &Viewport, button: &Button) {
    let r = button.rect();
    vp.fill(buf, r.x, r.y, r.w, r.h, BUTTON_FACE);
    vp.fill(buf, r.x, r.y, r.w, 6.0, BUTTON_EDGE);
    vp.fill(buf, r.x, r.y + r.h - 6.0, r.w, 6.0, BUTTON_EDGE);
    draw_text(
        buf,
        vp.px(button.cx),
        vp.py(button.cy) - 2,
        button.label,
        TEXT_BLUE,
    );
}

pub fn draw_menu(buf: &mut PixelBuf) {
    let vp = Viewport::new(buf);
    buf.fill_rect(0, 0, buf.w as i32, buf.h as i32, SKY_TOP);
    draw_text(buf, vp.px(WORLD_W / 2.0), vp.py(80.0), "BOX RUN", WHITE);
    for button in &MENU_BUTTONS {
        draw_button(buf, &vp, button);
    }
    draw_text(
        buf,
        vp.px(WORLD_W / 2.0),
        vp.py(680.0),
        "CLICK OR PRESS 1 2 3 R Q",
        WHITE,
    );
}

fn draw_overlay(buf: &mut PixelBuf, title: &str, score: Option<u32>, buttons: &[Button]) {
    let vp = Viewport::new(buf);
    buf.dim_all();
    vp.fill(buf, WORLD_W / 2.0 - 300.0, 60.0, 600.0, 110.0, PANEL_FACE);
    draw_text(buf, vp.px(WORLD_W / 2.0), vp.py(85.0), title, TEXT_BLUE);
    if let Some(score) = score {
        draw_number(buf, vp.px(WORLD_W / 2.0), vp.py(125.0), score, TEXT_BLUE);
    }
    for button in buttons {
        draw_button(buf, &vp, button);
    }
}

pub fn draw_pause(buf: &mut PixelBuf) {
    draw_overlay(buf, "PAUSED", None, &PAUSE_BUTTONS);
}

pub fn draw_game_over(buf: &mut PixelBuf, score: u32) {
    draw_overlay(buf, "SCORE", Some(score), &GAME_OVER_BUTTONS);
}

pub fn draw_leaderboard(buf: &mut PixelBuf, store: &ScoreStore) {
    let vp = Viewport::new(buf);
    buf.fill_rect(0, 0, buf.w as i32, buf.h as i32, SKY_TOP);
    draw_text(buf, vp.px(WORLD_W / 2.0), vp.py(60.0), "TOP 5 RECORDS", WHITE);

    for (i, level) in Difficulty::ALL.iter().enumerate() {
        let cx = vp.px(WORLD_W * (2.0 * i as f64 + 1.0) / 6.0);
        draw_text(buf, cx, vp.py(160.0), level.label(), WHITE);
        let scores = store.top_scores(*level, 5);
        if scores.is_empty() {
            draw_text(buf, cx, vp.py(240.0), "NONE YET", TEXT_BLUE);
        }
        for (rank, score) in scores.iter().enumerate() {
            draw_text(
                buf,
                cx,
                vp.py(240.0 + rank as f64 * 70.0),
                &format!("{} {}", rank + 1, score),
                WHITE,
            );
        }
    }
    draw_text(
        buf,
        vp.px(WORLD_W / 2.0),
        vp.py(680.0),
        "ESC TO RETURN",
        WHITE,
    );
}
