use anyhow::Result;
use crossterm::{
    cursor,
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
        KeyModifiers, MouseButton, MouseEventKind,
    },
    execute, terminal,
};
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::io::{self, Write, stdout};
use std::time::{Duration, Instant};

use runner_tui::audio::Audio;
use runner_tui::pixel::PixelBuf;
use runner_tui::scores::ScoreStore;
use runner_tui::screens::{
    self, Action, Button, GAME_OVER_BUTTONS, MENU_BUTTONS, PAUSE_BUTTONS, ReturnTo, Screen,
};
use runner_tui::session::Session;
use runner_tui::world::{Difficulty, Outcome};
use runner_tui::{draw, draw::Viewport};

// Frame cadence outside of play; in play the difficulty's tick rate rules.
const MENU_FRAME: Duration = Duration::from_millis(33);

struct App {
    buf: PixelBuf,
    screen: Screen,
    difficulty: Difficulty,
    session: Option<Session>,
    final_score: u32,
    store: ScoreStore,
    audio: Audio,
    jump_queued: bool,
    quit: bool,
}

impl App {
    fn new(store: ScoreStore, audio: Audio, pw: usize, ph: usize) -> Self {
        Self {
            buf: PixelBuf::new(pw, ph, draw::SKY_TOP),
            screen: Screen::Menu,
            difficulty: Difficulty::Normal,
            session: None,
            final_score: 0,
            store,
            audio,
            jump_queued: false,
            quit: false,
        }
    }

    fn run(&mut self, out: &mut impl Write) -> Result<()> {
        let mut last_frame = Instant::now();
        loop {
            let frame_start = Instant::now();
            let dt = frame_start - last_frame;
            last_frame = frame_start;

            while event::poll(Duration::ZERO)? {
                match event::read()? {
                    Event::Key(key) if key.kind == KeyEventKind::Press => self.handle_key(key)?,
                    Event::Mouse(mouse) => {
                        if let MouseEventKind::Down(MouseButton::Left) = mouse.kind {
                            self.handle_click(mouse.column, mouse.row)?;
                        }
                    }
                    Event::Resize(cols, rows) => {
                        self.buf.resize(cols as usize, rows as usize * 2)
                    }
                    _ => {}
                }
            }
            if self.quit {
                return Ok(());
            }

            if self.screen == Screen::Playing {
                let jump = std::mem::take(&mut self.jump_queued);
                let dead = match self.session.as_mut() {
                    Some(session) => {
                        session.step(jump, frame_start, dt, &mut self.store)? == Outcome::Dead
                    }
                    None => false,
                };
                if dead {
                    self.finish_run();
                }
            }

            self.draw();
            self.buf.render(out)?;

            let frame_dur = match self.screen {
                Screen::Playing => {
                    Duration::from_secs_f64(1.0 / self.difficulty.profile().tick_rate as f64)
                }
                _ => MENU_FRAME,
            };
            let elapsed = frame_start.elapsed();
            if elapsed < frame_dur {
                std::thread::sleep(frame_dur - elapsed);
            }
        }
    }

    fn start_run(&mut self, difficulty: Difficulty) {
        self.difficulty = difficulty;
        self.session = Some(Session::new(
            difficulty,
            StdRng::from_entropy(),
            Instant::now(),
        ));
        self.jump_queued = false;
        self.screen = Screen::Playing;
    }

    /// The fatal tick already persisted the score; this handles the rest.
    fn finish_run(&mut self) {
        self.final_score = self.session.as_ref().map_or(0, Session::score);
        self.audio.death();
        self.screen = Screen::GameOver;
    }

    fn apply(&mut self, action: Action, from: ReturnTo) -> Result<()> {
        match action {
            Action::Start(difficulty) => self.start_run(difficulty),
            Action::Retry => self.start_run(self.difficulty),
            Action::Records => self.screen = Screen::Leaderboard(from),
            Action::Resume => self.screen = Screen::Playing,
            Action::Menu => {
                self.session = None;
                self.screen = Screen::Menu;
            }
            Action::Quit => self.quit = true,
        }
        Ok(())
    }

    fn handle_key(&mut self, key: KeyEvent) -> Result<()> {
        // Global quit, observable from any state.
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.quit = true;
            return Ok(());
        }

        match self.screen {
            Screen::Menu => match key.code {
                KeyCode::Char('1') => {
                    self.apply(Action::Start(Difficulty::Beginner), ReturnTo::Menu)?
                }
                KeyCode::Char('2') => {
                    self.apply(Action::Start(Difficulty::Normal), ReturnTo::Menu)?
                }
                KeyCode::Char('3') => {
                    self.apply(Action::Start(Difficulty::Expert), ReturnTo::Menu)?
                }
                KeyCode::Char('r') => self.apply(Action::Records, ReturnTo::Menu)?,
                KeyCode::Char('q') | KeyCode::Esc => self.quit = true,
                _ => {}
            },
            Screen::Playing => match key.code {
                KeyCode::Char(' ') | KeyCode::Up => {
                    if self.session.as_ref().is_some_and(|s| s.world.player.on_ground) {
                        self.audio.jump();
                    }
                    self.jump_queued = true;
                }
                KeyCode::Esc | KeyCode::Char('p') => self.screen = Screen::Paused,
                KeyCode::Char('q') => self.quit = true,
                _ => {}
            },
            Screen::Paused => match key.code {
                KeyCode::Esc | KeyCode::Enter => self.apply(Action::Resume, ReturnTo::Paused)?,
                KeyCode::Char('r') => self.apply(Action::Records, ReturnTo::Paused)?,
                KeyCode::Char('m') => self.apply(Action::Menu, ReturnTo::Paused)?,
                KeyCode::Char('q') => self.quit = true,
                _ => {}
            },
            Screen::GameOver => match key.code {
                KeyCode::Enter => self.apply(Action::Retry, ReturnTo::GameOver)?,
                KeyCode::Char('r') => self.apply(Action::Records, ReturnTo::GameOver)?,
                KeyCode::Char('m') => self.apply(Action::Menu, ReturnTo::GameOver)?,
                KeyCode::Char('q') | KeyCode::Esc => self.quit = true,
                _ => {}
            },
            Screen::Leaderboard(back) => match key.code {
                KeyCode::Esc | KeyCode::Enter | KeyCode::Char('q') => {
                    self.screen = match back {
                        ReturnTo::Menu => Screen::Menu,
                        ReturnTo::Paused => Screen::Paused,
                        ReturnTo::GameOver => Screen::GameOver,
                    };
                }
                _ => {}
            },
        }
        Ok(())
    }

    fn handle_click(&mut self, col: u16, row: u16) -> Result<()> {
        let vp = Viewport::new(&self.buf);
        let (x, y) = vp.cell_to_world(col, row);
        let (buttons, from): (&[Button], ReturnTo) = match self.screen {
            Screen::Menu => (&MENU_BUTTONS, ReturnTo::Menu),
            Screen::Paused => (&PAUSE_BUTTONS, ReturnTo::Paused),
            Screen::GameOver => (&GAME_OVER_BUTTONS, ReturnTo::GameOver),
            Screen::Playing | Screen::Leaderboard(_) => return Ok(()),
        };
        if let Some(action) = buttons.iter().find(|b| b.hit(x, y)).map(|b| b.action) {
            self.apply(action, from)?;
        }
        Ok(())
    }

    fn draw(&mut self) {
        match self.screen {
            Screen::Menu => screens::draw_menu(&mut self.buf),
            Screen::Playing => {
                if let Some(session) = &self.session {
                    draw::draw_world(&mut self.buf, &session.world);
                }
            }
            Screen::Paused => {
                if let Some(session) = &self.session {
                    draw::draw_world(&mut self.buf, &session.world);
                }
                screens::draw_pause(&mut self.buf);
            }
            Screen::GameOver => {
                if let Some(session) = &self.session {
                    draw::draw_world(&mut self.buf, &session.world);
                }
                screens::draw_game_over(&mut self.buf, self.final_score);
            }
            Screen::Leaderboard(_) => screens::draw_leaderboard(&mut self.buf, &self.store),
        }
    }
}

fn cleanup(out: &mut io::Stdout) -> Result<()> {
    execute!(
        out,
        DisableMouseCapture,
        terminal::LeaveAlternateScreen,
        cursor::Show,
        terminal::EnableLineWrap,
    )?;
    terminal::disable_raw_mode()?;
    Ok(())
}

fn main() -> Result<()> {
    let store = ScoreStore::open(ScoreStore::default_path()?)?;
    let audio = Audio::new()?;
    audio.start_music();

    terminal::enable_raw_mode()?;
    let mut out = stdout();
    execute!(
        out,
        terminal::EnterAlternateScreen,
        cursor::Hide,
        terminal::DisableLineWrap,
        EnableMouseCapture,
    )?;

    let (cols, rows) = terminal::size()?;
    let mut app = App::new(store, audio, cols as usize, rows as usize * 2);
    let result = app.run(&mut out);

    // Restore the terminal even when the loop errored.
    cleanup(&mut out).and(result)
}
