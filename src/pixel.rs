//! Half-block pixel buffer and 3x5 bitmap font. Each terminal cell holds two
//! vertically stacked pixels rendered with the upper-half-block glyph.

use crossterm::{cursor, queue, style, style::Color as CColor};
use std::io::{self, Write};

#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub const fn lerp(a: Rgb, b: Rgb, t_256: u16) -> Rgb {
        let t = t_256 as i32;
        Rgb(
            (a.0 as i32 + (b.0 as i32 - a.0 as i32) * t / 256) as u8,
            (a.1 as i32 + (b.1 as i32 - a.1 as i32) * t / 256) as u8,
            (a.2 as i32 + (b.2 as i32 - a.2 as i32) * t / 256) as u8,
        )
    }

    pub const fn dim(self) -> Rgb {
        Rgb(self.0 / 2, self.1 / 2, self.2 / 2)
    }
}

pub const SHADOW: Rgb = Rgb(30, 30, 30);

pub struct PixelBuf {
    pub w: usize,
    pub h: usize, // pixel height = terminal rows * 2
    px: Vec<Rgb>,
    fill: Rgb,
}

impl PixelBuf {
    pub fn new(w: usize, h: usize, fill: Rgb) -> Self {
        Self {
            w,
            h,
            px: vec![fill; w * h],
            fill,
        }
    }

    pub fn resize(&mut self, w: usize, h: usize) {
        self.w = w;
        self.h = h;
        self.px.clear();
        self.px.resize(w * h, self.fill);
    }

    pub fn set(&mut self, x: i32, y: i32, c: Rgb) {
        if x >= 0 && y >= 0 && (x as usize) < self.w && (y as usize) < self.h {
            self.px[y as usize * self.w + x as usize] = c;
        }
    }

    pub fn get(&self, x: usize, y: usize) -> Rgb {
        self.px[y * self.w + x]
    }

    pub fn fill_rect(&mut self, x: i32, y: i32, w: i32, h: i32, c: Rgb) {
        for dy in 0..h {
            for dx in 0..w {
                self.set(x + dx, y + dy, c);
            }
        }
    }

    /// Darken every pixel, used behind the pause and game-over panels.
    pub fn dim_all(&mut self) {
        for p in &mut self.px {
            *p = p.dim();
        }
    }

    pub fn render(&self, out: &mut impl Write) -> io::Result<()> {
        queue!(out, cursor::MoveTo(0, 0))?;
        let rows = self.h / 2;
        let mut prev_fg = Rgb(0, 0, 0);
        let mut prev_bg = Rgb(0, 0, 0);
        let mut need_fg = true;
        let mut need_bg = true;

        for row in 0..rows {
            for col in 0..self.w {
                let top = self.get(col, row * 2);
                let bot = self.get(col, row * 2 + 1);

                if top == bot {
                    if need_bg || prev_bg != top {
                        queue!(
                            out,
                            style::SetBackgroundColor(CColor::Rgb {
                                r: top.0,
                                g: top.1,
                                b: top.2
                            })
                        )?;
                        prev_bg = top;
                        need_bg = false;
                    }
                    queue!(out, style::Print(' '))?;
                } else {
                    if need_fg || prev_fg != top {
                        queue!(
                            out,
                            style::SetForegroundColor(CColor::Rgb {
                                r: top.0,
                                g: top.1,
                                b: top.2
                            })
                        )?;
                        prev_fg = top;
                        need_fg = false;
                    }
                    if need_bg || prev_bg != bot {
                        queue!(
                            out,
                            style::SetBackgroundColor(CColor::Rgb {
                                r: bot.0,
                                g: bot.1,
                                b: bot.2
                            })
                        )?;
                        prev_bg = bot;
                        need_bg = false;
                    }
                    queue!(out, style::Print('\u{2580}'))?; // ▀
                }
            }
            if row < rows - 1 {
                queue!(out, style::ResetColor, style::Print("\r\n"))?;
                need_fg = true;
                need_bg = true;
            }
        }
        queue!(out, style::ResetColor)?;
        out.flush()
    }
}

// ── 3x5 bitmap glyphs ──────────────────────────────────────────────────────

#[rustfmt::skip]
const DIGITS: [[u8; 15]; 10] = [
    [1,1,1, 1,0,1, 1,0,1, 1,0,1, 1,1,1], // 0
    [0,1,0, 1,1,0, 0,1,0, 0,1,0, 1,1,1], // 1
    [1,1,1, 0,0,1, 1,1,1, 1,0,0, 1,1,1], // 2
    [1,1,1, 0,0,1, 0,1,1, 0,0,1, 1,1,1], // 3
    [1,0,1, 1,0,1, 1,1,1, 0,0,1, 0,0,1], // 4
    [1,1,1, 1,0,0, 1,1,1, 0,0,1, 1,1,1], // 5
    [1,1,1, 1,0,0, 1,1,1, 1,0,1, 1,1,1], // 6
    [1,1,1, 0,0,1, 0,1,0, 0,1,0, 0,1,0], // 7
    [1,1,1, 1,0,1, 1,1,1, 1,0,1, 1,1,1], // 8
    [1,1,1, 1,0,1, 1,1,1, 0,0,1, 1,1,1], // 9
];

#[rustfmt::skip]
const LETTERS: [[u8; 15]; 26] = [
    [0,1,0, 1,0,1, 1,1,1, 1,0,1, 1,0,1], // A
    [1,1,0, 1,0,1, 1,1,0, 1,0,1, 1,1,0], // B
    [0,1,1, 1,0,0, 1,0,0, 1,0,0, 0,1,1], // C
    [1,1,0, 1,0,1, 1,0,1, 1,0,1, 1,1,0], // D
    [1,1,1, 1,0,0, 1,1,0, 1,0,0, 1,1,1], // E
    [1,1,1, 1,0,0, 1,1,0, 1,0,0, 1,0,0], // F
    [0,1,1, 1,0,0, 1,0,1, 1,0,1, 0,1,1], // G
    [1,0,1, 1,0,1, 1,1,1, 1,0,1, 1,0,1], // H
    [1,1,1, 0,1,0, 0,1,0, 0,1,0, 1,1,1], // I
    [0,0,1, 0,0,1, 0,0,1, 1,0,1, 0,1,0], // J
    [1,0,1, 1,0,1, 1,1,0, 1,0,1, 1,0,1], // K
    [1,0,0, 1,0,0, 1,0,0, 1,0,0, 1,1,1], // L
    [1,0,1, 1,1,1, 1,0,1, 1,0,1, 1,0,1], // M
    [1,1,0, 1,0,1, 1,0,1, 1,0,1, 1,0,1], // N
    [0,1,0, 1,0,1, 1,0,1, 1,0,1, 0,1,0], // O
    [1,1,0, 1,0,1, 1,1,0, 1,0,0, 1,0,0], // P
    [0,1,0, 1,0,1, 1,0,1, 1,1,0, 0,1,1], // Q
    [1,1,0, 1,0,1, 1,1,0, 1,0,1, 1,0,1], // R
    [0,1,1, 1,0,0, 0,1,0, 0,0,1, 1,1,0], // S
    [1,1,1, 0,1,0, 0,1,0, 0,1,0, 0,1,0], // T
    [1,0,1, 1,0,1, 1,0,1, 1,0,1, 1,1,1], // U
    [1,0,1, 1,0,1, 1,0,1, 1,0,1, 0,1,0], // V
    [1,0,1, 1,0,1, 1,0,1, 1,1,1, 1,0,1], // W
    [1,0,1, 1,0,1, 0,1,0, 1,0,1, 1,0,1], // X
    [1,0,1, 1,0,1, 0,1,0, 0,1,0, 0,1,0], // Y
    [1,1,1, 0,0,1, 0,1,0, 1,0,0, 1,1,1], // Z
];

fn glyph(ch: char) -> Option<&'static [u8; 15]> {
    match ch {
        '0'..='9' => Some(&DIGITS[ch as usize - '0' as usize]),
        'A'..='Z' => Some(&LETTERS[ch as usize - 'A' as usize]),
        'a'..='z' => Some(&LETTERS[ch as usize - 'a' as usize]),
        _ => None,
    }
}

fn draw_glyph(buf: &mut PixelBuf, x: i32, y: i32, g: &[u8; 15], fg: Rgb, shadow: bool) {
    for row in 0..5 {
        for col in 0..3 {
            if g[row * 3 + col] == 1 {
                let px = x + col as i32;
                let py = y + row as i32;
                if shadow {
                    buf.set(px + 1, py + 1, SHADOW);
                }
                buf.set(px, py, fg);
            }
        }
    }
}

/// Draw `text` centered horizontally at `cx`. Glyphs are 3 pixels wide on a
/// 4-pixel advance; unknown characters (and spaces) leave a gap.
pub fn draw_text(buf: &mut PixelBuf, cx: i32, y: i32, text: &str, fg: Rgb) {
    let total_w = text.chars().count() as i32 * 4 - 1;
    let start_x = cx - total_w / 2;
    for (i, ch) in text.chars().enumerate() {
        if let Some(g) = glyph(ch) {
            draw_glyph(buf, start_x + i as i32 * 4, y, g, fg, true);
        }
    }
}

pub fn draw_number(buf: &mut PixelBuf, cx: i32, y: i32, n: u32, fg: Rgb) {
    draw_text(buf, cx, y, &n.to_string(), fg);
}
