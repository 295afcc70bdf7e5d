//! 1972: paddle duel against the CPU
//!
//! First to three points. The player's paddle is on the left, the CPU tracks
//! the ball with a per-difficulty step, aim error, deadzone and reaction
//! delay. Winning scores by how few points the CPU took, plus a bonus for
//! finishing inside a minute.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use crate::consts::{TICK_US, VIDEO_HEIGHT, VIDEO_WIDTH};
use crate::highscores::format_score;
use crate::platform::{InputDevice, Key};
use crate::renderer::FrameBuffer;
use crate::settings::{Difficulty, GameSettings, InputMode};
use crate::sim::{Minigame, TickContext};
use crate::{clampf, lerp};

use super::collision::{bounce_between, impact_offset};

const PADDLE_W: f32 = 6.0;
const BALL_SIZE: f32 = 2.0;
const LEFT_X: f32 = 16.0;
const RIGHT_X: f32 = VIDEO_WIDTH as f32 - 16.0 - PADDLE_W;
const WIN_TARGET: u32 = 3;
const SPEED_SCALE: f32 = 0.5;
const INITIAL_VY_SCALE: f32 = 0.25;
const SERVE_DELAY_TICKS: u32 = 80;
const TIME_TARGET_MS: u64 = 60_000;
const TIME_BONUS_MAX: u64 = 20_000;

const COLOR_PLAYER: u8 = 18;
const COLOR_PLAYER_DOTS: u8 = 15;
const COLOR_CPU: u8 = 15;
const COLOR_BALL: u8 = 12;
const COLOR_HUD: u8 = 7;
const COLOR_SCORE: u8 = 15;

/// Per-difficulty tuning, already scaled by game speed
#[derive(Debug, Clone, Copy, PartialEq)]
struct PongParams {
    paddle_speed: f32,
    ball_speed: Vec2,
    cpu_step: f32,
    paddle_h: f32,
    cpu_error: f32,
    cpu_deadzone: f32,
    cpu_react_delay: f32,
}

impl PongParams {
    fn for_settings(settings: &GameSettings) -> Self {
        let base = match settings.difficulty {
            Difficulty::Easy => Self {
                paddle_speed: 3.5,
                ball_speed: Vec2::new(2.5, 1.3),
                cpu_step: 2.0,
                paddle_h: 24.0,
                cpu_error: 6.0,
                cpu_deadzone: 4.0,
                cpu_react_delay: 2.2,
            },
            Difficulty::Normal => Self {
                paddle_speed: 3.0,
                ball_speed: Vec2::new(2.2, 1.4),
                cpu_step: 2.35,
                paddle_h: 22.0,
                cpu_error: 4.6,
                cpu_deadzone: 2.5,
                cpu_react_delay: 1.15,
            },
            Difficulty::Hard => Self {
                paddle_speed: 4.0,
                ball_speed: Vec2::new(3.0, 1.6),
                cpu_step: 2.55,
                paddle_h: 20.0,
                cpu_error: 2.8,
                cpu_deadzone: 1.2,
                cpu_react_delay: 0.95,
            },
        };

        let speed = settings.speed_multiplier;
        Self {
            paddle_speed: base.paddle_speed * SPEED_SCALE * speed,
            ball_speed: base.ball_speed * SPEED_SCALE * speed,
            cpu_step: base.cpu_step * SPEED_SCALE * speed,
            ..base
        }
    }
}

/// Everything drawn with interpolation
#[derive(Debug, Clone, Copy, PartialEq, Default)]
struct Snapshot {
    player_y: f32,
    cpu_y: f32,
    ball: Vec2,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Side {
    Player,
    Cpu,
}

pub struct Pong {
    rng: Pcg32,
    settings: GameSettings,
    params: PongParams,
    current: Snapshot,
    previous: Snapshot,
    ball_vel: Vec2,
    player_score: u32,
    cpu_score: u32,
    last_scorer: Option<Side>,
    cpu_react_cd: f32,
    serve_delay: u32,
    use_keyboard: bool,
    ticks: u64,
    finish_tick: u64,
    finished: bool,
    won: bool,
    final_score: u64,
    detail: String,
}

impl Pong {
    pub fn new(seed: u64) -> Self {
        let settings = GameSettings::default();
        Self {
            rng: Pcg32::seed_from_u64(seed),
            settings,
            params: PongParams::for_settings(&settings),
            current: Snapshot::default(),
            previous: Snapshot::default(),
            ball_vel: Vec2::ZERO,
            player_score: 0,
            cpu_score: 0,
            last_scorer: None,
            cpu_react_cd: 0.0,
            serve_delay: 0,
            use_keyboard: true,
            ticks: 0,
            finish_tick: 0,
            finished: false,
            won: false,
            final_score: 0,
            detail: String::new(),
        }
    }

    fn paddle_max_y(&self) -> f32 {
        VIDEO_HEIGHT as f32 - self.params.paddle_h
    }

    /// Center the ball and aim it at whoever just conceded
    fn reset_ball(&mut self, scorer: Option<Side>) {
        let jitter = self.rng.random_range(-10..=10) as f32 / 100.0;
        let vy_scale = clampf(INITIAL_VY_SCALE * (1.0 + jitter), 0.18, 0.32);
        let base = self.params.ball_speed;

        self.current.ball = Vec2::new(
            (VIDEO_WIDTH as f32 - BALL_SIZE) * 0.5,
            (VIDEO_HEIGHT as f32 - BALL_SIZE) * 0.5,
        );
        let vx = if scorer == Some(Side::Player) {
            -base.x
        } else {
            base.x
        };
        let vy = if self.last_scorer == Some(Side::Cpu) {
            -base.y * vy_scale
        } else {
            base.y * vy_scale
        };
        self.ball_vel = Vec2::new(vx, vy);

        self.last_scorer = scorer;
        if scorer.is_some() {
            self.serve_delay = SERVE_DELAY_TICKS;
        }
    }

    fn move_player(&mut self, ctx: &TickContext<'_>) {
        let dir = if self.use_keyboard {
            i8::from(ctx.input.is_down(Key::Down)) - i8::from(ctx.input.is_down(Key::Up))
        } else {
            ctx.input.joystick().map_or(0, |joy| joy.dy)
        };
        self.current.player_y = clampf(
            self.current.player_y + f32::from(dir) * self.params.paddle_speed,
            0.0,
            self.paddle_max_y(),
        );
    }

    fn move_cpu(&mut self) {
        let params = self.params;
        let ball = self.current.ball;
        let receding = self.ball_vel.x < 0.0;

        let mut delay = params.cpu_react_delay;
        if receding {
            delay *= 1.6;
        }
        let mut should_move = true;
        if delay > 0.0 {
            if self.cpu_react_cd > 0.0 {
                self.cpu_react_cd -= 1.0;
                should_move = false;
            } else {
                self.cpu_react_cd = delay;
            }
        }

        let cpu_y = self.current.cpu_y;
        if self.settings.difficulty == Difficulty::Hard {
            let target_y = ball.y - params.paddle_h * 0.5 + params.cpu_error;
            if should_move && (target_y - cpu_y).abs() > params.cpu_deadzone {
                self.current.cpu_y += clampf(target_y - cpu_y, -params.cpu_step, params.cpu_step);
            }
        } else {
            // Lower difficulties drift back to the middle while the ball heads away
            let target_center = if receding {
                VIDEO_HEIGHT as f32 * 0.5
            } else {
                ball.y + BALL_SIZE * 0.5 + params.cpu_error
            };
            let paddle_center = cpu_y + params.paddle_h * 0.5;
            if should_move && (target_center - paddle_center).abs() > params.cpu_deadzone {
                let target_y = target_center - params.paddle_h * 0.5;
                self.current.cpu_y += clampf(target_y - cpu_y, -params.cpu_step, params.cpu_step);
            }
        }

        self.current.cpu_y = clampf(self.current.cpu_y, 0.0, self.paddle_max_y());
    }

    /// Ball rows overlap the paddle rows (whole-pixel test)
    fn rows_overlap(&self, paddle_y: f32) -> bool {
        let paddle_y = paddle_y as i32;
        let ball_y = self.current.ball.y as i32;
        let size = BALL_SIZE as i32;
        let h = self.params.paddle_h as i32;
        ball_y + size - 1 >= paddle_y && ball_y <= paddle_y + h - 1
    }

    fn deflect(&mut self, paddle_y: f32) {
        let impact = impact_offset(
            self.current.ball.y + BALL_SIZE * 0.5,
            paddle_y + self.params.paddle_h * 0.5,
            self.params.paddle_h * 0.5,
        );
        self.ball_vel.x = -self.ball_vel.x;
        self.ball_vel.y = impact * self.params.ball_speed.y;
    }

    fn paddle_hits(&mut self, ctx: &mut TickContext<'_>) {
        let ball = self.current.ball;

        if self.ball_vel.x < 0.0
            && ball.x <= LEFT_X + PADDLE_W
            && ball.x + BALL_SIZE >= LEFT_X
            && self.rows_overlap(self.current.player_y)
        {
            self.current.ball.x = LEFT_X + PADDLE_W + 1.0;
            self.deflect(self.current.player_y);
            self.tone(ctx, 440, 45);
        }

        let ball = self.current.ball;
        if self.ball_vel.x > 0.0
            && ball.x + BALL_SIZE >= RIGHT_X
            && ball.x <= RIGHT_X + PADDLE_W
            && self.rows_overlap(self.current.cpu_y)
        {
            self.current.ball.x = RIGHT_X - BALL_SIZE - 1.0;
            self.deflect(self.current.cpu_y);
            self.tone(ctx, 380, 45);
        }
    }

    fn point_scored(&mut self, scorer: Side, ctx: &mut TickContext<'_>) {
        let total = match scorer {
            Side::Player => {
                self.player_score += 1;
                self.tone(ctx, 520, 80);
                self.player_score
            }
            Side::Cpu => {
                self.cpu_score += 1;
                self.tone(ctx, 260, 80);
                self.cpu_score
            }
        };

        if total >= WIN_TARGET {
            self.finished = true;
            self.won = scorer == Side::Player;
            self.finish_tick = self.ticks;
            log::debug!(
                "Pong finished {}-{} after {} ticks",
                self.player_score,
                self.cpu_score,
                self.ticks
            );
            return;
        }
        self.reset_ball(Some(scorer));
    }

    fn tone(&self, ctx: &mut TickContext<'_>, freq_hz: u32, duration_ms: u32) {
        if self.settings.sound_enabled {
            ctx.audio.play_tone(freq_hz, duration_ms);
        }
    }

    /// Base by CPU points conceded plus a bonus for a quick win
    fn calculate_score(&self) -> u64 {
        let base: u64 = match self.cpu_score {
            0 => 50_000,
            1 => 25_000,
            _ => 10_000,
        };
        let elapsed_ms = self.finish_tick * TICK_US / 1000;
        let bonus = if elapsed_ms < TIME_TARGET_MS {
            (TIME_TARGET_MS - elapsed_ms) * TIME_BONUS_MAX / TIME_TARGET_MS
        } else {
            0
        };
        base + bonus.min(TIME_BONUS_MAX).min(base)
    }
}

impl Minigame for Pong {
    fn init(&mut self, settings: &GameSettings, input: &mut dyn InputDevice) {
        self.settings = *settings;
        self.params = PongParams::for_settings(settings);
        self.player_score = 0;
        self.cpu_score = 0;
        self.finished = false;
        self.won = false;
        self.last_scorer = None;
        self.cpu_react_cd = 0.0;
        self.serve_delay = 0;
        self.ticks = 0;
        self.finish_tick = 0;
        self.final_score = 0;
        self.detail.clear();

        let paddle_y = self.paddle_max_y() * 0.5;
        self.current.player_y = paddle_y;
        self.current.cpu_y = paddle_y;
        self.reset_ball(None);
        self.previous = self.current;

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
        self.ticks += 1;

        self.move_player(ctx);
        self.move_cpu();

        if self.serve_delay > 0 {
            self.serve_delay -= 1;
            return;
        }

        self.current.ball += self.ball_vel;
        if bounce_between(
            &mut self.current.ball.y,
            &mut self.ball_vel.y,
            0.0,
            VIDEO_HEIGHT as f32 - BALL_SIZE,
        )
        .is_some()
        {
            self.tone(ctx, 320, 35);
        }

        self.paddle_hits(ctx);

        if self.current.ball.x < -BALL_SIZE {
            self.point_scored(Side::Cpu, ctx);
        } else if self.current.ball.x > VIDEO_WIDTH as f32 {
            self.point_scored(Side::Player, ctx);
        }
    }

    fn draw_interpolated(&self, alpha: f32, frame: &mut FrameBuffer) {
        let alpha = clampf(alpha, 0.0, 1.0);
        let (prev, cur) = (&self.previous, &self.current);
        let player_y = lerp(prev.player_y, cur.player_y, alpha);
        let cpu_y = lerp(prev.cpu_y, cur.cpu_y, alpha);
        let ball = prev.ball.lerp(cur.ball, alpha);
        let paddle_h = self.params.paddle_h as i32;

        frame.clear(0);
        frame.dotted_rect(
            LEFT_X as i32,
            player_y as i32,
            PADDLE_W as i32,
            paddle_h,
            COLOR_PLAYER,
            COLOR_PLAYER_DOTS,
        );
        frame.fill_rect(
            RIGHT_X as i32,
            cpu_y as i32,
            PADDLE_W as i32,
            paddle_h,
            COLOR_CPU,
        );
        frame.fill_rect(
            ball.x as i32,
            ball.y as i32,
            BALL_SIZE as i32,
            BALL_SIZE as i32,
            COLOR_BALL,
        );

        frame.text(0, 0, "1972", COLOR_HUD);
        let hud = format!(
            "D:{} x{:.2}",
            self.settings.difficulty.short(),
            self.settings.speed_multiplier
        );
        frame.text_right(0, &hud, COLOR_HUD);
        let score = format!("P1 {}  CPU {}", self.player_score, self.cpu_score);
        frame.text_centered(4, &score, COLOR_SCORE);
    }

    fn end(&mut self) {
        if self.won {
            self.final_score = self.calculate_score();
            self.detail = format!("POINTS {}", format_score(self.final_score));
        } else {
            self.final_score = 0;
            self.detail = format!("P1 {} - CPU {}", self.player_score, self.cpu_score);
        }
    }

    fn is_finished(&self) -> bool {
        self.finished
    }

    fn did_win(&self) -> bool {
        self.won
    }

    fn score(&self) -> u64 {
        self.final_score
    }

    fn end_detail(&self) -> &str {
        &self.detail
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::AudioQueue;
    use crate::platform::ScriptedInput;

    fn started(settings: &GameSettings) -> Pong {
        let mut game = Pong::new(42);
        game.init(settings, &mut ScriptedInput::new());
        game
    }

    /// Run `ticks` updates with `input` refreshed before each one
    fn tick(game: &mut Pong, input: &mut ScriptedInput, audio: &mut AudioQueue, ticks: u32) {
        for _ in 0..ticks {
            input.refresh();
            game.store_previous_state();
            let mut ctx = TickContext {
                input: &*input,
                audio: &mut *audio,
            };
            game.update(&mut ctx);
        }
    }

    #[test]
    fn test_init_centers_and_syncs_previous() {
        let game = started(&GameSettings::default());
        assert_eq!(game.previous, game.current);
        assert_eq!(game.current.player_y, game.current.cpu_y);
        assert_eq!(game.current.ball.x, (VIDEO_WIDTH as f32 - BALL_SIZE) * 0.5);
        assert!(!game.is_finished());
        assert_eq!(game.serve_delay, 0);
    }

    #[test]
    fn test_player_paddle_clamped() {
        let mut game = started(&GameSettings::default());
        let mut input = ScriptedInput::new().hold(&[Key::Up], 200);
        let mut audio = AudioQueue::new(true);

        tick(&mut game, &mut input, &mut audio, 200);
        assert_eq!(game.current.player_y, 0.0);
    }

    #[test]
    fn test_left_paddle_returns_ball() {
        let mut game = started(&GameSettings::default());
        let mut input = ScriptedInput::new();
        let mut audio = AudioQueue::new(true);

        let center = game.current.player_y + game.params.paddle_h * 0.5;
        game.current.ball = Vec2::new(22.5, center - 1.0);
        game.ball_vel = Vec2::new(-1.1, 0.3);
        tick(&mut game, &mut input, &mut audio, 1);

        assert!(game.ball_vel.x > 0.0);
        assert_eq!(game.current.ball.x, LEFT_X + PADDLE_W + 1.0);
        audio.advance(0);
        assert_eq!(audio.current().map(|t| t.freq_hz), Some(440));
    }

    #[test]
    fn test_conceding_serves_after_delay() {
        let mut game = started(&GameSettings::default());
        let mut input = ScriptedInput::new();
        let mut audio = AudioQueue::new(true);

        game.current.ball = Vec2::new(-1.5, 100.0);
        game.ball_vel = Vec2::new(-1.1, 0.0);
        tick(&mut game, &mut input, &mut audio, 1);

        assert_eq!(game.cpu_score, 1);
        assert_eq!(game.serve_delay, SERVE_DELAY_TICKS);
        // Served back toward the CPU
        assert!(game.ball_vel.x > 0.0);

        let parked = game.current.ball;
        tick(&mut game, &mut input, &mut audio, SERVE_DELAY_TICKS);
        assert_eq!(game.current.ball, parked);
        tick(&mut game, &mut input, &mut audio, 1);
        assert_ne!(game.current.ball, parked);
    }

    #[test]
    fn test_quick_shutout_scores_with_time_bonus() {
        let mut game = started(&GameSettings::default());
        let mut input = ScriptedInput::new();
        let mut audio = AudioQueue::new(false);

        game.player_score = 2;
        game.ticks = 1799;
        game.current.ball = Vec2::new(319.5, 100.0);
        game.ball_vel = Vec2::new(1.1, 0.0);
        // Keep the CPU paddle out of the way
        game.current.cpu_y = 0.0;
        game.cpu_react_cd = 100.0;
        tick(&mut game, &mut input, &mut audio, 1);

        assert!(game.is_finished());
        assert!(game.did_win());
        game.end();
        // 30 s elapsed: half the time bonus
        assert_eq!(game.score(), 60_000);
        assert_eq!(game.end_detail(), "POINTS 0060000");
        assert!(!audio.is_playing());
    }

    #[test]
    fn test_score_table() {
        let mut game = started(&GameSettings::default());
        game.won = true;
        game.cpu_score = 1;
        game.finish_tick = 4_000;
        assert_eq!(game.calculate_score(), 25_000);

        // Bonus never exceeds the base
        game.cpu_score = 2;
        game.finish_tick = 0;
        assert_eq!(game.calculate_score(), 20_000);
    }

    #[test]
    fn test_loss_detail() {
        let mut game = started(&GameSettings::default());
        game.player_score = 1;
        game.cpu_score = 3;
        game.finished = true;
        game.end();
        assert!(!game.did_win());
        assert_eq!(game.score(), 0);
        assert_eq!(game.end_detail(), "P1 1 - CPU 3");
    }

    #[test]
    fn test_finished_game_ignores_updates() {
        let mut game = started(&GameSettings::default());
        game.finished = true;
        let before = game.current;
        tick(&mut game, &mut ScriptedInput::new(), &mut AudioQueue::new(true), 10);
        assert_eq!(game.current, before);
    }

    #[test]
    fn test_draw_interpolates_ball() {
        let mut game = started(&GameSettings::default());
        game.previous.ball = Vec2::new(100.0, 100.0);
        game.current.ball = Vec2::new(110.0, 100.0);

        let mut frame = FrameBuffer::new();
        game.draw_interpolated(0.5, &mut frame);
        assert_eq!(frame.pixel(105, 100), Some(COLOR_BALL));
        assert_ne!(frame.pixel(100, 100), Some(COLOR_BALL));
        assert!(frame.has_text("P1 0  CPU 0"));
        assert!(frame.has_text("D:N x1.00"));
    }

    #[test]
    fn test_same_seed_same_rally() {
        let settings = GameSettings {
            difficulty: Difficulty::Hard,
            ..GameSettings::default()
        };
        let mut a = Pong::new(9);
        let mut b = Pong::new(9);
        a.init(&settings, &mut ScriptedInput::new());
        b.init(&settings, &mut ScriptedInput::new());

        let script = || ScriptedInput::new().hold(&[Key::Down], 90).hold(&[Key::Up], 300);
        tick(&mut a, &mut script(), &mut AudioQueue::new(true), 600);
        tick(&mut b, &mut script(), &mut AudioQueue::new(true), 600);
        assert_eq!(a.current, b.current);
        assert_eq!((a.player_score, a.cpu_score), (b.player_score, b.cpu_score));
    }

    #[test]
    fn test_turbo_scales_speeds() {
        let normal = PongParams::for_settings(&GameSettings::default());
        let turbo = PongParams::for_settings(&GameSettings {
            speed_multiplier: 1.25,
            ..GameSettings::default()
        });
        assert!((turbo.ball_speed.x - normal.ball_speed.x * 1.25).abs() < 1e-6);
        assert_eq!(turbo.paddle_h, normal.paddle_h);
    }
}
