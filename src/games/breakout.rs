//! 1979: brick breaker
//!
//! A 12x6 wall sits above the paddle. Every few paddle hits the wall drops
//! one row; if it reaches the paddle the round is lost. Clearing every brick
//! wins, with a bonus for each life left.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use crate::consts::VIDEO_HEIGHT;
use crate::highscores::format_score;
use crate::platform::{InputDevice, Key};
use crate::renderer::FrameBuffer;
use crate::settings::{Difficulty, GameSettings, InputMode};
use crate::sim::{Minigame, TickContext};
use crate::{clampf, lerp};

use super::collision::{Rect, bounce_between, impact_offset};

const PLAY_LEFT: f32 = 8.0;
const PLAY_RIGHT: f32 = 312.0;
const PLAY_TOP: f32 = 16.0;
const PLAY_BOTTOM: f32 = 192.0;

const PADDLE_Y: f32 = 182.0;
const PADDLE_H: f32 = 6.0;
const BALL_SIZE: f32 = 2.0;

pub const BRICK_COLS: usize = 12;
pub const BRICK_ROWS: usize = 6;
const BRICK_W: i32 = 20;
const BRICK_H: i32 = 6;
const BRICK_GAP: i32 = 2;
const AREA_WIDTH: i32 = BRICK_COLS as i32 * BRICK_W + (BRICK_COLS as i32 - 1) * BRICK_GAP;
const AREA_HEIGHT: i32 = BRICK_ROWS as i32 * BRICK_H + (BRICK_ROWS as i32 - 1) * BRICK_GAP;
const BRICK_LEFT: i32 = PLAY_LEFT as i32 + (PLAY_RIGHT as i32 - PLAY_LEFT as i32 - AREA_WIDTH) / 2;

const BALL_MIN_VX_SCALE: f32 = 0.35;
const START_LIVES: u32 = 3;
const LIFE_SCORE_BONUS: u64 = 10_000;
/// 450 ms at 60 Hz, rounded up
const RESET_PAUSE_TICKS: u32 = 27;
/// Attached ball launches on its own after ten seconds
const LAUNCH_TIMEOUT_TICKS: u32 = 600;

const BRICK_COLORS: [u8; BRICK_ROWS] = [87, 86, 85, 84, 83, 82];
const COLOR_PADDLE: u8 = 18;
const COLOR_PADDLE_DOTS: u8 = 15;
const COLOR_BALL: u8 = 15;
const COLOR_HUD: u8 = 7;

#[derive(Debug, Clone, Copy, PartialEq)]
struct BreakoutParams {
    paddle_speed: f32,
    ball_speed: Vec2,
    paddle_w: f32,
    hits_per_drop: u32,
    score_brick: u64,
    score_drop_bonus: u64,
}

impl BreakoutParams {
    fn for_settings(settings: &GameSettings) -> Self {
        let (base, difficulty_scale) = match settings.difficulty {
            Difficulty::Easy => (
                Self {
                    paddle_speed: 3.0,
                    ball_speed: Vec2::new(1.6, 1.7),
                    paddle_w: 48.0,
                    hits_per_drop: 6,
                    score_brick: 120,
                    score_drop_bonus: 250,
                },
                0.40,
            ),
            Difficulty::Normal => (
                Self {
                    paddle_speed: 3.3,
                    ball_speed: Vec2::new(1.9, 2.0),
                    paddle_w: 40.0,
                    hits_per_drop: 5,
                    score_brick: 140,
                    score_drop_bonus: 300,
                },
                0.50,
            ),
            Difficulty::Hard => (
                Self {
                    paddle_speed: 3.6,
                    ball_speed: Vec2::new(2.2, 2.3),
                    paddle_w: 34.0,
                    hits_per_drop: 4,
                    score_brick: 160,
                    score_drop_bonus: 350,
                },
                0.65,
            ),
        };

        let scale = difficulty_scale * settings.speed_multiplier;
        Self {
            paddle_speed: base.paddle_speed * scale,
            ball_speed: base.ball_speed * scale,
            ..base
        }
    }
}

/// The brick wall; `top_y` moves down as the wall drops
#[derive(Debug, Clone, PartialEq)]
struct BrickGrid {
    alive: [[bool; BRICK_COLS]; BRICK_ROWS],
    top_y: i32,
    drop_count: u32,
    remaining: u32,
}

impl BrickGrid {
    fn new() -> Self {
        Self {
            alive: [[true; BRICK_COLS]; BRICK_ROWS],
            top_y: PLAY_TOP as i32,
            drop_count: 0,
            remaining: (BRICK_ROWS * BRICK_COLS) as u32,
        }
    }

    fn bottom(&self) -> i32 {
        self.top_y + AREA_HEIGHT
    }

    fn brick_origin(&self, row: usize, col: usize) -> (i32, i32) {
        (
            BRICK_LEFT + col as i32 * (BRICK_W + BRICK_GAP),
            self.top_y + row as i32 * (BRICK_H + BRICK_GAP),
        )
    }

    /// Live brick under `point`, ignoring the gaps between bricks
    fn brick_at(&self, point: Vec2) -> Option<(usize, usize)> {
        let left = BRICK_LEFT as f32;
        let top = self.top_y as f32;
        if point.x < left
            || point.x >= left + AREA_WIDTH as f32
            || point.y < top
            || point.y >= top + AREA_HEIGHT as f32
        {
            return None;
        }

        let local_x = (point.x - left) as i32;
        let local_y = (point.y - top) as i32;
        let col = (local_x / (BRICK_W + BRICK_GAP)) as usize;
        let row = (local_y / (BRICK_H + BRICK_GAP)) as usize;
        let in_brick =
            local_x % (BRICK_W + BRICK_GAP) < BRICK_W && local_y % (BRICK_H + BRICK_GAP) < BRICK_H;

        (row < BRICK_ROWS && col < BRICK_COLS && in_brick && self.alive[row][col])
            .then_some((row, col))
    }

    fn drop_row(&mut self) {
        self.top_y += BRICK_H + BRICK_GAP;
        self.drop_count += 1;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
struct Snapshot {
    paddle_x: f32,
    ball: Vec2,
}

pub struct Breakout {
    rng: Pcg32,
    settings: GameSettings,
    params: BreakoutParams,
    grid: BrickGrid,
    current: Snapshot,
    previous: Snapshot,
    ball_vel: Vec2,
    attached: bool,
    launch_ticks: u32,
    hits_since_drop: u32,
    score: u64,
    lives: u32,
    reset_delay: u32,
    use_keyboard: bool,
    finished: bool,
    won: bool,
    detail: String,
}

impl Breakout {
    pub fn new(seed: u64) -> Self {
        let settings = GameSettings::default();
        Self {
            rng: Pcg32::seed_from_u64(seed),
            settings,
            params: BreakoutParams::for_settings(&settings),
            grid: BrickGrid::new(),
            current: Snapshot::default(),
            previous: Snapshot::default(),
            ball_vel: Vec2::ZERO,
            attached: true,
            launch_ticks: LAUNCH_TIMEOUT_TICKS,
            hits_since_drop: 0,
            score: 0,
            lives: START_LIVES,
            reset_delay: 0,
            use_keyboard: true,
            finished: false,
            won: false,
            detail: String::new(),
        }
    }

    fn paddle_rect(&self) -> Rect {
        Rect::new(
            self.current.paddle_x,
            PADDLE_Y,
            self.params.paddle_w,
            PADDLE_H,
        )
    }

    /// Ball resting on the paddle's center
    fn attached_ball_pos(&self) -> Vec2 {
        Vec2::new(
            self.current.paddle_x + self.params.paddle_w * 0.5 - BALL_SIZE * 0.5,
            PADDLE_Y - BALL_SIZE - 2.0,
        )
    }

    fn prepare_ball(&mut self) {
        self.attached = true;
        self.launch_ticks = LAUNCH_TIMEOUT_TICKS;
        self.current.ball = self.attached_ball_pos();
        self.ball_vel = Vec2::ZERO;
    }

    fn launch_ball(&mut self) {
        let dir = if self.rng.random_bool(0.5) { 1.0 } else { -1.0 };
        self.attached = false;
        let vx = self.params.ball_speed.x.abs().max(0.1);
        self.ball_vel = Vec2::new(vx * dir, -self.params.ball_speed.y);
    }

    fn reset_positions(&mut self) {
        self.current.paddle_x = (PLAY_LEFT + PLAY_RIGHT - self.params.paddle_w) * 0.5;
        self.prepare_ball();
        self.previous = self.current;
    }

    fn move_paddle(&mut self, input: &dyn InputDevice) {
        let dir = if self.use_keyboard {
            i8::from(input.is_down(Key::Right)) - i8::from(input.is_down(Key::Left))
        } else {
            input.joystick().map_or(0, |joy| joy.dx)
        };
        self.current.paddle_x = clampf(
            self.current.paddle_x + f32::from(dir) * self.params.paddle_speed,
            PLAY_LEFT,
            PLAY_RIGHT - self.params.paddle_w,
        );
    }

    /// Rebound angle follows where the ball struck the paddle
    fn paddle_rebound(&mut self, next: &mut Vec2, ctx: &mut TickContext<'_>) {
        let paddle = self.paddle_rect();
        let half_w = self.params.paddle_w * 0.5;
        let rel = impact_offset(next.x + BALL_SIZE * 0.5, paddle.pos.x + half_w, half_w);

        let base_vx = self.params.ball_speed.x.abs();
        let magnitude = (base_vx * (0.4 + 0.6 * rel.abs())).max(base_vx * BALL_MIN_VX_SCALE);
        let sign = if rel < -0.2 {
            -1.0
        } else if rel > 0.2 {
            1.0
        } else if self.ball_vel.x < 0.0 {
            -1.0
        } else {
            1.0
        };

        self.ball_vel.x = magnitude * sign;
        self.ball_vel.y = -self.ball_vel.y.abs();
        next.y = PADDLE_Y - BALL_SIZE;

        self.hits_since_drop += 1;
        if self.hits_since_drop >= self.params.hits_per_drop {
            self.hits_since_drop = 0;
            self.grid.drop_row();
            self.score += self.params.score_drop_bonus;
            self.tone(ctx, 240, 90);
            log::debug!("Brick wall dropped ({} drops)", self.grid.drop_count);
        }
        self.tone(ctx, 520, 30);
    }

    fn hit_brick(&mut self, next: Vec2, ctx: &mut TickContext<'_>) {
        let center = next + Vec2::splat(BALL_SIZE * 0.5);
        let Some((row, col)) = self.grid.brick_at(center) else {
            return;
        };

        self.grid.alive[row][col] = false;
        self.grid.remaining -= 1;
        self.score += self.params.score_brick;
        self.ball_vel.y = -self.ball_vel.y;
        self.tone(ctx, 420, 35);

        if self.grid.remaining == 0 {
            self.finished = true;
            self.won = true;
            self.tone(ctx, 700, 120);
            log::debug!("Brick wall cleared with {} lives left", self.lives);
        }
    }

    fn tone(&self, ctx: &mut TickContext<'_>, freq_hz: u32, duration_ms: u32) {
        if self.settings.sound_enabled {
            ctx.audio.play_tone(freq_hz, duration_ms);
        }
    }
}

impl Minigame for Breakout {
    fn init(&mut self, settings: &GameSettings, input: &mut dyn InputDevice) {
        self.settings = *settings;
        self.params = BreakoutParams::for_settings(settings);
        self.grid = BrickGrid::new();
        self.finished = false;
        self.won = false;
        self.hits_since_drop = 0;
        self.score = 0;
        self.lives = START_LIVES;
        self.reset_delay = 0;
        self.detail.clear();
        self.reset_positions();

        self.use_keyboard =
            !(settings.input_mode == InputMode::Joystick && input.joystick_available());
        input.clear();
    }

    fn store_previous_state(&mut self) {
        self.previous = self.current;
    }

    fn update(&mut self, ctx: &mut TickContext<'_>) {
        if self.finished {
            return;
        }

        if self.reset_delay > 0 {
            self.reset_delay -= 1;
            if self.reset_delay == 0 {
                self.reset_positions();
            }
            return;
        }

        self.move_paddle(ctx.input);

        if self.attached {
            self.current.ball = self.attached_ball_pos();
            self.launch_ticks = self.launch_ticks.saturating_sub(1);
            let launch_now =
                (self.use_keyboard && ctx.input.is_down(Key::Space)) || self.launch_ticks == 0;
            if !launch_now {
                return;
            }
            self.launch_ball();
        }

        let mut next = self.current.ball + self.ball_vel;

        if bounce_between(
            &mut next.x,
            &mut self.ball_vel.x,
            PLAY_LEFT,
            PLAY_RIGHT - BALL_SIZE,
        )
        .is_some()
        {
            self.tone(ctx, 460, 20);
        }

        if next.y <= PLAY_TOP {
            next.y = PLAY_TOP;
            self.ball_vel.y = -self.ball_vel.y;
            self.tone(ctx, 500, 20);
        }

        if next.y > PLAY_BOTTOM {
            self.lives = self.lives.saturating_sub(1);
            self.tone(ctx, 180, 120);
            if self.lives == 0 {
                self.finished = true;
                self.won = false;
                return;
            }
            self.reset_delay = RESET_PAUSE_TICKS;
            return;
        }

        let ball_rect = Rect::new(next.x, next.y, BALL_SIZE, BALL_SIZE);
        if self.ball_vel.y > 0.0 && ball_rect.overlaps(&self.paddle_rect()) {
            self.paddle_rebound(&mut next, ctx);
        }

        self.hit_brick(next, ctx);

        if self.grid.bottom() >= PADDLE_Y as i32 {
            self.finished = true;
            self.won = false;
            self.tone(ctx, 180, 120);
            return;
        }

        self.current.ball = next;
    }

    fn draw_interpolated(&self, alpha: f32, frame: &mut FrameBuffer) {
        let alpha = clampf(alpha, 0.0, 1.0);
        let paddle_x = lerp(self.previous.paddle_x, self.current.paddle_x, alpha);
        let ball = self.previous.ball.lerp(self.current.ball, alpha);

        frame.clear(0);

        for (row, cells) in self.grid.alive.iter().enumerate() {
            for (col, _) in cells.iter().enumerate().filter(|(_, alive)| **alive) {
                let (x, y) = self.grid.brick_origin(row, col);
                frame.fill_rect(x, y, BRICK_W, BRICK_H, BRICK_COLORS[row]);
            }
        }

        frame.fill_rect(
            ball.x as i32,
            ball.y as i32,
            BALL_SIZE as i32,
            BALL_SIZE as i32,
            COLOR_BALL,
        );
        frame.dotted_rect(
            paddle_x as i32,
            PADDLE_Y as i32,
            self.params.paddle_w as i32,
            PADDLE_H as i32,
            COLOR_PADDLE,
            COLOR_PADDLE_DOTS,
        );

        frame.text(0, 0, "1979", COLOR_HUD);
        let hud = format!(
            "D:{} x{:.2}",
            self.settings.difficulty.short(),
            self.settings.speed_multiplier
        );
        frame.text_right(0, &hud, COLOR_HUD);
        frame.text_centered(0, &format_score(self.score), COLOR_HUD);
        frame.text_right(
            VIDEO_HEIGHT - 8,
            &format!("LIVES {}", self.lives),
            COLOR_HUD,
        );
    }

    fn end(&mut self) {
        if self.won {
            self.score += u64::from(self.lives) * LIFE_SCORE_BONUS;
        }
        self.detail = format!("POINTS {}", format_score(self.score));
    }

    fn is_finished(&self) -> bool {
        self.finished
    }

    fn did_win(&self) -> bool {
        self.won
    }

    fn score(&self) -> u64 {
        self.score
    }

    fn end_detail(&self) -> &str {
        &self.detail
    }
}
