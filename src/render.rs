use crate::config::Tuning;
use crate::game::{Game, Phase};
use crate::notify::{ToastKind, Toasts};
use crate::obstacle::Obstacle;
use crossterm::{
    cursor, queue,
    style::{self, Color as CColor},
};
use std::io::{self, Write};
use std::time::Duration;

// ── Colors ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    const fn lerp(a: Rgb, b: Rgb, t_256: u16) -> Rgb {
        let t = t_256 as i32;
        Rgb(
            (a.0 as i32 + (b.0 as i32 - a.0 as i32) * t / 256) as u8,
            (a.1 as i32 + (b.1 as i32 - a.1 as i32) * t / 256) as u8,
            (a.2 as i32 + (b.2 as i32 - a.2 as i32) * t / 256) as u8,
        )
    }

    const fn halve(self) -> Rgb {
        Rgb(self.0 / 2, self.1 / 2, self.2 / 2)
    }

    /// Half-way to grey, for the dead bird.
    const fn wash_out(self) -> Rgb {
        let luma = ((self.0 as u16 * 77 + self.1 as u16 * 150 + self.2 as u16 * 29) >> 8) as u8;
        Rgb::lerp(self, Rgb(luma, luma, luma), 128)
    }

    fn term(self) -> CColor {
        CColor::Rgb {
            r: self.0,
            g: self.1,
            b: self.2,
        }
    }
}

const NIGHT: Rgb = Rgb(0, 0, 0);
const NIGHT_RED: Rgb = Rgb(70, 8, 8);
const STAR: Rgb = Rgb(255, 255, 255);
const SPIKE_EDGE_L: Rgb = Rgb(0x66, 0x00, 0x00);
const SPIKE_EDGE_R: Rgb = Rgb(0x99, 0x00, 0x00);
const SPIKE_A: Rgb = Rgb(0xe6, 0x00, 0x00);
const SPIKE_B: Rgb = Rgb(0xff, 0x00, 0x00);
const SPIKE_C: Rgb = Rgb(0xcc, 0x00, 0x00);
const BAND: Rgb = Rgb(255, 255, 255);
const BIRD_Y: Rgb = Rgb(245, 200, 66);
const BIRD_HI: Rgb = Rgb(255, 225, 100);
const BIRD_WING: Rgb = Rgb(215, 165, 35);
const BIRD_EYE: Rgb = Rgb(255, 255, 255);
const BIRD_PUPIL: Rgb = Rgb(20, 20, 20);
const BIRD_BEAK: Rgb = Rgb(225, 75, 35);
const WHITE: Rgb = Rgb(255, 255, 255);
const GOLD: Rgb = Rgb(255, 200, 40);
const MUTED: Rgb = Rgb(160, 160, 160);
const SHADOW: Rgb = Rgb(30, 30, 30);
const PANEL: Rgb = Rgb(12, 6, 6);
const PANEL_EDGE: Rgb = Rgb(150, 20, 20);
const TOAST_OK: Rgb = Rgb(120, 230, 120);
const TOAST_ERR: Rgb = Rgb(255, 90, 90);

/// Spike height at the gap edge, in world units.
const SPIKE_TIP: f64 = 20.0;
/// World units between decorative bands on a spike.
const BAND_SPACING: f64 = 50.0;
const STAR_COUNT: usize = 50;

// ── Pixel buffer with half-block rendering ──────────────────────────────────

pub struct PixelBuf {
    w: usize,
    h: usize, // pixel height = terminal rows * 2
    px: Vec<Rgb>,
}

impl PixelBuf {
    pub fn new(w: usize, h: usize) -> Self {
        Self {
            w,
            h,
            px: vec![NIGHT; w * h],
        }
    }

    fn resize(&mut self, w: usize, h: usize) {
        self.w = w;
        self.h = h;
        self.px.resize(w * h, NIGHT);
    }

    fn set(&mut self, x: i32, y: i32, c: Rgb) {
        if x >= 0 && y >= 0 && (x as usize) < self.w && (y as usize) < self.h {
            self.px[y as usize * self.w + x as usize] = c;
        }
    }

    pub fn get(&self, x: usize, y: usize) -> Rgb {
        self.px[y * self.w + x]
    }

    fn fill_rect(&mut self, x: i32, y: i32, w: i32, h: i32, c: Rgb) {
        for dy in 0..h {
            for dx in 0..w {
                self.set(x + dx, y + dy, c);
            }
        }
    }

    fn dim_rect(&mut self, x: i32, y: i32, w: i32, h: i32) {
        let x0 = x.max(0) as usize;
        let y0 = y.max(0) as usize;
        let x1 = ((x + w).max(0) as usize).min(self.w);
        let y1 = ((y + h).max(0) as usize).min(self.h);
        for py in y0..y1 {
            for px in x0..x1 {
                let i = py * self.w + px;
                self.px[i] = self.px[i].halve();
            }
        }
    }

    fn render(&self, out: &mut impl Write) -> io::Result<()> {
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
                        queue!(out, style::SetBackgroundColor(top.term()))?;
                        prev_bg = top;
                        need_bg = false;
                    }
                    queue!(out, style::Print(' '))?;
                } else {
                    if need_fg || prev_fg != top {
                        queue!(out, style::SetForegroundColor(top.term()))?;
                        prev_fg = top;
                        need_fg = false;
                    }
                    if need_bg || prev_bg != bot {
                        queue!(out, style::SetBackgroundColor(bot.term()))?;
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
        queue!(out, style::ResetColor)
    }
}

// ── 3x5 bitmap digits ──────────────────────────────────────────────────────

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

fn draw_digit(buf: &mut PixelBuf, x: i32, y: i32, d: u8, fg: Rgb) {
    let glyph = &DIGITS[d as usize];
    for row in 0..5 {
        for col in 0..3 {
            if glyph[row * 3 + col] == 1 {
                let px = x + col as i32;
                let py = y + row as i32;
                buf.set(px + 1, py + 1, SHADOW);
                buf.set(px, py, fg);
            }
        }
    }
}

fn draw_number(buf: &mut PixelBuf, cx: i32, y: i32, n: u32, fg: Rgb) {
    let s = n.to_string();
    let total_w = s.len() as i32 * 4 - 1; // 3px per digit + 1px spacing
    let start_x = cx - total_w / 2;
    for (i, ch) in s.chars().enumerate() {
        let d = ch as u8 - b'0';
        draw_digit(buf, start_x + i as i32 * 4, y, d, fg);
    }
}

// ── Text overlay ───────────────────────────────────────────────────────────

/// Terminal text printed over the pixel frame.
#[derive(Debug, Clone, PartialEq)]
pub struct Label {
    pub col: u16,
    pub row: u16,
    pub text: String,
    pub fg: Rgb,
}

fn pseudo_rand(seed: u64) -> f64 {
    let x = seed
        .wrapping_mul(6364136223846793005)
        .wrapping_add(1442695040888963407);
    let bits = (x >> 33) ^ x;
    (bits % 1000) as f64 / 1000.0
}

#[derive(Debug, Clone, Copy)]
struct Star {
    x: f64,
    y: f64,
    size: i32,
    phase: f64,
}

// ── Renderer ───────────────────────────────────────────────────────────────

/// Draws a `Game` into the terminal. World units are scaled so the field
/// height fills the terminal; the field width follows from that.
pub struct Renderer {
    buf: PixelBuf,
    labels: Vec<Label>,
    stars: Vec<Star>,
    frame: u64,
}

impl Renderer {
    pub fn new(cols: u16, rows: u16) -> Self {
        let stars = (0..STAR_COUNT as u64)
            .map(|i| Star {
                x: pseudo_rand(i * 4 + 1),
                y: pseudo_rand(i * 4 + 2),
                size: if pseudo_rand(i * 4 + 3) > 0.85 { 2 } else { 1 },
                phase: pseudo_rand(i * 4 + 4) * std::f64::consts::TAU,
            })
            .collect();
        Self {
            buf: PixelBuf::new(cols as usize, rows as usize * 2),
            labels: Vec::new(),
            stars,
            frame: 0,
        }
    }

    pub fn resize(&mut self, cols: u16, rows: u16) {
        self.buf.resize(cols as usize, rows as usize * 2);
    }

    /// World width that matches a terminal of this size.
    pub fn field_width(cols: u16, rows: u16, field_height: f64) -> f64 {
        let ph = (rows as f64 * 2.0).max(1.0);
        cols as f64 * field_height / ph
    }

    pub fn pixels(&self) -> &PixelBuf {
        &self.buf
    }

    pub fn labels(&self) -> &[Label] {
        &self.labels
    }

    fn scale(&self, game: &Game) -> f64 {
        self.buf.h as f64 / game.field().height
    }

    pub fn draw(&mut self, game: &Game, toasts: &Toasts, now: Duration) {
        self.frame += 1;
        self.labels.clear();
        if self.buf.w == 0 || self.buf.h == 0 {
            return;
        }

        self.draw_sky();
        self.draw_stars();
        for obstacle in game.obstacles() {
            self.draw_obstacle(game, obstacle);
        }
        if game.has_started() {
            self.draw_bird(game, now);
            self.draw_scoreboard(game);
        }

        match game.phase() {
            Phase::NotStarted => self.draw_start_screen(game),
            Phase::Over => self.draw_game_over(game),
            Phase::Running => {}
        }

        self.draw_toasts(toasts);
        let footer_row = (self.buf.h / 2).saturating_sub(1) as u16;
        self.center_label(
            footer_row,
            "ANYO Flappy Bird \u{2022} Built for the ANYO_nft community",
            Rgb(110, 110, 110),
        );
    }

    pub fn present(&self, out: &mut impl Write) -> io::Result<()> {
        self.buf.render(out)?;
        let rows = self.buf.h / 2;
        for label in &self.labels {
            if label.row as usize >= rows || label.col as usize >= self.buf.w {
                continue;
            }
            queue!(
                out,
                cursor::MoveTo(label.col, label.row),
                style::SetForegroundColor(label.fg.term())
            )?;
            let room = self.buf.w - label.col as usize;
            for (i, ch) in label.text.chars().take(room).enumerate() {
                let bg = self.buf.get(label.col as usize + i, label.row as usize * 2);
                queue!(out, style::SetBackgroundColor(bg.term()), style::Print(ch))?;
            }
        }
        queue!(out, style::ResetColor)?;
        out.flush()
    }

    fn label(&mut self, col: u16, row: u16, text: impl Into<String>, fg: Rgb) {
        self.labels.push(Label {
            col,
            row,
            text: text.into(),
            fg,
        });
    }

    fn center_label(&mut self, row: u16, text: &str, fg: Rgb) {
        let len = text.chars().count();
        let col = self.buf.w.saturating_sub(len) / 2;
        self.label(col as u16, row, text, fg);
    }

    fn draw_sky(&mut self) {
        let h = self.buf.h;
        for y in 0..h {
            // Black at both edges, deep red through the middle.
            let t = (y as u32 * 512 / h.max(1) as u32) as u16;
            let c = if t < 256 {
                Rgb::lerp(NIGHT, NIGHT_RED, t)
            } else {
                Rgb::lerp(NIGHT_RED, NIGHT, (t - 256).min(256))
            };
            for x in 0..self.buf.w {
                self.buf.set(x as i32, y as i32, c);
            }
        }
    }

    fn draw_stars(&mut self) {
        let (w, h) = (self.buf.w as f64, self.buf.h as f64);
        for star in &self.stars {
            let pulse = ((self.frame as f64 * 0.05 + star.phase).sin() + 1.0) / 2.0;
            let bg = self.buf.get(
                ((star.x * w) as usize).min(self.buf.w - 1),
                ((star.y * h) as usize).min(self.buf.h - 1),
            );
            let c = Rgb::lerp(bg, STAR, (51.0 + pulse * 153.0) as u16);
            let (x, y) = ((star.x * w) as i32, (star.y * h) as i32);
            self.buf.fill_rect(x, y, star.size, star.size, c);
        }
    }

    fn draw_obstacle(&mut self, game: &Game, obstacle: &Obstacle) {
        let tuning = game.tuning();
        let s = self.scale(game);
        let x = (obstacle.x * s).round() as i32;
        let w = ((tuning.obstacle_width * s).round() as i32).max(2);
        let gap_top = (obstacle.gap_top * s).round() as i32;
        let gap_bot = (obstacle.gap_bottom(tuning) * s).round() as i32;
        let floor = self.buf.h as i32;

        self.draw_spike_body(x, w, 0, gap_top, tuning, s);
        self.draw_spike_body(x, w, gap_bot, floor, tuning, s);

        let tip = ((SPIKE_TIP * s).round() as i32).max(1);
        self.draw_spike_tip(x, w, gap_top, tip, true);
        self.draw_spike_tip(x, w, gap_bot, tip, false);
    }

    fn draw_spike_body(&mut self, x: i32, w: i32, top: i32, bottom: i32, tuning: &Tuning, s: f64) {
        if bottom <= top {
            return;
        }
        for dx in 0..w {
            let c = spike_shade(dx, w, tuning);
            for y in top..bottom {
                self.buf.set(x + dx, y, c);
            }
        }

        // Faint bands, spaced evenly down the segment.
        let bands = ((bottom - top) as f64 / (BAND_SPACING * s)).floor() as i32;
        let band_w = (w * 2 / 3).max(1);
        for i in 0..bands {
            let y = top + ((i as f64 + 0.5) * (bottom - top) as f64 / bands as f64) as i32;
            let strength = 40 + (i % 3) as u16 * 15;
            for dx in 0..band_w {
                let px = x + (w - band_w) / 2 + dx;
                if px >= 0 && (px as usize) < self.buf.w && y >= 0 && (y as usize) < self.buf.h {
                    let under = self.buf.get(px as usize, y as usize);
                    self.buf.set(px, y, Rgb::lerp(under, BAND, strength));
                }
            }
        }
    }

    /// Dark triangle on the gap edge of a segment, wide at the gap.
    fn draw_spike_tip(&mut self, x: i32, w: i32, edge: i32, tip: i32, above: bool) {
        let half = w as f64 / 2.0;
        for i in 0..tip {
            let frac = (i + 1) as f64 / tip as f64;
            let reach = (half * frac).round() as i32;
            let y = if above { edge - tip + i } else { edge + tip - 1 - i };
            let cx = x + w / 2;
            for px in (cx - reach)..(cx + reach) {
                self.buf.set(px, y, SPIKE_EDGE_R);
            }
        }
    }

    fn draw_bird(&mut self, game: &Game, now: Duration) {
        let bird = game.bird();
        let tuning = game.tuning();
        let s = self.scale(game);
        let size = (tuning.bird_size * s).max(3.0);
        let flapping = game.is_flapping(now) && !game.is_over();
        self.draw_bird_sprite(
            bird.x * s + size / 2.0,
            bird.y * s + size / 2.0,
            size,
            bird.rotation,
            flapping,
            game.is_over(),
        );
    }

    fn draw_bird_sprite(&mut self, cx: f64, cy: f64, size: f64, degrees: f64, flapping: bool, dead: bool) {
        let (sin, cos) = degrees.to_radians().sin_cos();
        let reach = (size * 0.75).ceil() as i32;
        let (icx, icy) = (cx as i32, cy as i32);
        for py in (icy - reach)..=(icy + reach) {
            for px in (icx - reach)..=(icx + reach) {
                let dx = px as f64 + 0.5 - cx;
                let dy = py as f64 + 0.5 - cy;
                // Undo the tilt to sample the upright sprite.
                let u = (dx * cos + dy * sin) / size + 0.5;
                let v = (-dx * sin + dy * cos) / size + 0.5;
                if let Some(c) = bird_pixel(u, v, flapping) {
                    self.buf.set(px, py, if dead { c.wash_out() } else { c });
                }
            }
        }
    }

    fn draw_scoreboard(&mut self, game: &Game) {
        let cx = self.buf.w as i32 / 2;
        self.buf.dim_rect(cx - 18, 0, 36, 10);
        self.label((cx - 14).max(0) as u16, 0, "SCORE", MUTED);
        self.label((cx + 6).max(0) as u16, 0, "BEST", MUTED);
        draw_number(&mut self.buf, cx - 10, 3, game.score(), WHITE);
        draw_number(&mut self.buf, cx + 8, 3, game.high_score(), GOLD);
        let level = format!("LEVEL {}", game.level());
        self.center_label(5, &level, MUTED);
    }

    fn draw_start_screen(&mut self, game: &Game) {
        let (w, h) = (self.buf.w as i32, self.buf.h as i32);
        self.buf.dim_rect(0, 0, w, h);
        self.buf.dim_rect(0, 0, w, h);

        let rows = (h / 2) as u16;
        let top = rows / 4;
        self.center_label(top, "ANYO Flappy Bird", WHITE);

        // Bobbing mascot between the title and the prompt.
        let s = self.scale(game);
        let size = (game.tuning().bird_size * s * 1.6).max(4.0);
        let bob = (self.frame as f64 * 0.12).sin() * size * 0.15;
        self.draw_bird_sprite(w as f64 / 2.0, h as f64 / 2.0 - size * 0.3 + bob, size, 0.0, false, false);

        let below = rows / 2 + (size as u16) / 2 + 1;
        self.center_label(below, "Help the ANYO fly through obstacles!", MUTED);
        self.center_label(below + 2, "[ Enter ] Start Game", TOAST_ERR);
        self.center_label(below + 4, "Tap the screen or press spacebar to fly", MUTED);
    }

    fn draw_game_over(&mut self, game: &Game) {
        let (w, h) = (self.buf.w as i32, self.buf.h as i32);
        let cx = w / 2;
        let cy = h / 2;
        let panel_w = 40.min(w - 2).max(20);
        let panel_h = 28.min(h - 2).max(16);

        self.buf.dim_rect(0, 0, w, h);

        let px = cx - panel_w / 2;
        let py = cy - panel_h / 2;
        self.buf.fill_rect(px - 1, py - 1, panel_w + 2, panel_h + 2, PANEL_EDGE);
        self.buf.fill_rect(px, py, panel_w, panel_h, PANEL);

        let row0 = (py / 2 + 1).max(0) as u16;
        self.center_label(row0, "Game Over", WHITE);
        self.label((cx - 12).max(0) as u16, row0 + 2, "SCORE", MUTED);
        self.label((cx + 5).max(0) as u16, row0 + 2, "BEST", MUTED);
        let digits_y = (row0 as i32 + 3) * 2;
        draw_number(&mut self.buf, cx - 9, digits_y, game.score(), WHITE);
        draw_number(&mut self.buf, cx + 8, digits_y, game.high_score(), GOLD);

        let mut row = row0 + 7;
        if game.is_new_high_score() {
            self.center_label(row, "* New High Score! *", GOLD);
            row += 1;
        }
        self.center_label(row + 1, "[ Enter ] Try Again", TOAST_ERR);
        self.center_label(row + 2, "Tap or press spacebar to fly", MUTED);
    }

    fn draw_toasts(&mut self, toasts: &Toasts) {
        for (i, toast) in toasts.iter().enumerate() {
            let fg = match toast.kind {
                ToastKind::Info => WHITE,
                ToastKind::Success => TOAST_OK,
                ToastKind::Error => TOAST_ERR,
            };
            let text = format!(" {} ", toast.message);
            let col = self.buf.w.saturating_sub(text.chars().count() + 1) as u16;
            let row = 6 + i as u16;
            self.buf.fill_rect(col as i32, row as i32 * 2, text.chars().count() as i32, 2, PANEL);
            self.label(col, row, text, fg);
        }
    }
}

/// Horizontal shading of a spike segment: dark left rim, red gradient body,
/// darker right rim. Rims scale with the obstacle width.
fn spike_shade(x: i32, total_w: i32, tuning: &Tuning) -> Rgb {
    if total_w <= 2 {
        return SPIKE_B;
    }
    let left = ((4.0 / tuning.obstacle_width) * total_w as f64).ceil() as i32;
    let right = ((8.0 / tuning.obstacle_width) * total_w as f64).ceil() as i32;
    if x < left {
        return SPIKE_EDGE_L;
    }
    if x >= total_w - right {
        return SPIKE_EDGE_R;
    }
    let t = (x as f64 / (total_w - 1) as f64 * 512.0) as u16;
    if t < 256 {
        Rgb::lerp(SPIKE_A, SPIKE_B, t)
    } else {
        Rgb::lerp(SPIKE_B, SPIKE_C, (t - 256).min(256))
    }
}

fn in_ellipse(u: f64, v: f64, cu: f64, cv: f64, ru: f64, rv: f64) -> bool {
    let du = (u - cu) / ru;
    let dv = (v - cv) / rv;
    du * du + dv * dv <= 1.0
}

/// The bird drawn in a unit square facing right; `None` is transparent.
fn bird_pixel(u: f64, v: f64, flapping: bool) -> Option<Rgb> {
    if !(0.0..1.0).contains(&u) || !(0.0..1.0).contains(&v) {
        return None;
    }
    if (0.82..1.0).contains(&u) && (0.5..0.68).contains(&v) {
        return Some(BIRD_BEAK);
    }
    if in_ellipse(u, v, 0.72, 0.38, 0.05, 0.05) {
        return Some(BIRD_PUPIL);
    }
    if in_ellipse(u, v, 0.68, 0.38, 0.12, 0.12) {
        return Some(BIRD_EYE);
    }
    let wing_v = if flapping { 0.42 } else { 0.64 };
    if in_ellipse(u, v, 0.35, wing_v, 0.22, 0.12) {
        return Some(BIRD_WING);
    }
    if in_ellipse(u, v, 0.45, 0.55, 0.42, 0.38) {
        return Some(if v < 0.32 { BIRD_HI } else { BIRD_Y });
    }
    None
}
