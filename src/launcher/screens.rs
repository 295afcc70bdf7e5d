//! Between-round screens
//!
//! The launcher only decides *which* screen comes next; what a screen looks
//! like is up to a [`Screens`] implementation. [`TextScreens`] is a plain
//! frame-buffer version for hosts with a display and keyboard.

use crate::consts::TICK_US;
use crate::games::Year;
use crate::highscores::format_score;
use crate::platform::{Console, MenuEvent};
use crate::story::StoryRun;

const POLL_SLEEP_US: u64 = 1_000;
/// End screens stay up this long before accepting input
const END_HOLD_US: u64 = 2_000_000;

const COLOR_TITLE: u8 = 15;
const COLOR_DETAIL: u8 = 7;
const COLOR_SELECTED: u8 = 14;
const COLOR_NORMAL: u8 = 7;

/// What the end-of-round screen shows
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EndScreen<'a> {
    pub won: bool,
    pub detail: &'a str,
    /// The score qualifies for the high-score table
    pub record: bool,
}

/// Context for initials entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InitialsPrompt<'a> {
    pub title: &'a str,
    pub detail: &'a str,
    /// First entry on this table; finishing on the first slot enters "YOU"
    pub table_empty: bool,
}

pub trait Screens {
    fn end_screen(&mut self, console: &mut Console, screen: &EndScreen<'_>);

    /// Returns three characters of initials
    fn enter_initials(&mut self, console: &mut Console, prompt: &InitialsPrompt<'_>) -> String;

    /// Story launch of a single year, shown after a win
    fn next_stage(&mut self, console: &mut Console);

    /// No module is available for `year`
    fn unavailable(&mut self, console: &mut Console, year: Year);

    fn cutscene(&mut self, console: &mut Console, id: &str);

    fn story_final(&mut self, console: &mut Console, run: &StoryRun);

    /// The story final score missed the table
    fn story_not_ranked(&mut self, console: &mut Console, final_score: u64);
}

/// Characters selectable in an initials slot; one past the end is END
const SCORE_CHARS: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789 ";
const SLOT_END: usize = SCORE_CHARS.len();
/// Cursor position of the END button
const POS_END: usize = 3;

/// Three-slot initials editor driven by menu events
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InitialsEntry {
    indices: [usize; 3],
    position: usize,
    table_empty: bool,
}

impl InitialsEntry {
    pub fn new(table_empty: bool) -> Self {
        Self {
            indices: [0; 3],
            position: 0,
            table_empty,
        }
    }

    /// Apply one event; returns the initials once entry is complete
    pub fn handle(&mut self, event: MenuEvent) -> Option<String> {
        let pos = self.position;
        match event {
            MenuEvent::Up if pos < POS_END => {
                self.indices[pos] = match self.indices[pos] {
                    0 => SLOT_END,
                    i => i - 1,
                };
            }
            MenuEvent::Down if pos < POS_END => {
                self.indices[pos] = match self.indices[pos] {
                    SLOT_END => 0,
                    i => i + 1,
                };
            }
            MenuEvent::Char(c) if pos < POS_END => {
                let c = c.to_ascii_uppercase();
                if let Some(index) = SCORE_CHARS.iter().position(|&s| char::from(s) == c) {
                    self.indices[pos] = index;
                }
            }
            MenuEvent::Left => self.position = (pos + POS_END) % (POS_END + 1),
            MenuEvent::Right => self.position = (pos + 1) % (POS_END + 1),
            MenuEvent::Accept => {
                if pos == POS_END {
                    return Some(self.initials());
                }
                if self.indices[pos] == SLOT_END {
                    if pos == 0 && self.table_empty {
                        return Some("YOU".to_string());
                    }
                    self.position = POS_END;
                } else {
                    self.position = (pos + 1).min(POS_END);
                }
            }
            _ => {}
        }
        None
    }

    /// Current slots, END slots read as spaces
    pub fn initials(&self) -> String {
        self.indices
            .iter()
            .map(|&i| SCORE_CHARS.get(i).map_or(' ', |&c| char::from(c)))
            .collect()
    }

    fn draw(&self, console: &mut Console, prompt: &InitialsPrompt<'_>) {
        let frame = &mut console.frame;
        frame.clear(0);
        frame.text_centered(80, prompt.title, COLOR_TITLE);
        if !prompt.detail.is_empty() {
            frame.text_centered(100, prompt.detail, COLOR_DETAIL);
        }
        frame.text_centered(130, "RECORD", COLOR_TITLE);

        let base_x = (frame.width() - 24 * 4) / 2;
        for (slot, &index) in self.indices.iter().enumerate() {
            let label = match SCORE_CHARS.get(index) {
                Some(&c) => char::from(c).to_string(),
                None => "END".to_string(),
            };
            let x = base_x + slot as i32 * 24 + (24 - label.len() as i32 * 8) / 2;
            frame.text(x, 150, &label, slot_color(self.position == slot));
        }
        frame.text(base_x + 3 * 24, 150, "END", slot_color(self.position == POS_END));
        console.present();
    }
}

fn slot_color(selected: bool) -> u8 {
    if selected { COLOR_SELECTED } else { COLOR_NORMAL }
}

/// Block until one of `wanted` arrives
fn wait_for(console: &mut Console, wanted: &[MenuEvent]) -> MenuEvent {
    loop {
        console.input.refresh();
        match console.input.poll_event() {
            MenuEvent::None => console.clock.sleep_us(POLL_SLEEP_US),
            event if wanted.contains(&event) => return event,
            _ => {}
        }
    }
}

/// Keep the current frame up for `us`, letting queued tones play out
fn hold(console: &mut Console, us: u64) {
    let start = console.clock.now_us();
    let mut last = start;
    while console.clock.now_us().saturating_sub(start) < us {
        console.input.refresh();
        console.input.clear();
        console.present();
        console.clock.sleep_us(TICK_US);
        let now = console.clock.now_us();
        console.audio.advance(now.saturating_sub(last));
        last = now;
    }
}

fn cutscene_caption(id: &str) -> &'static str {
    match id {
        "intro" => "IT ALL STARTED WITH A DOT",
        "pre1978" => "THEN THEY CAME FROM SPACE",
        "pre1979" => "WALLS WERE MADE TO BREAK",
        "pre1981" => "CROSSING THE ROAD GOT HARDER",
        "pre1982" => "INSIDE THE MACHINE",
        "pre1983" => "LAST ROUND AT THE BAR",
        "pre1989" => "BUBBLES EVERYWHERE",
        "pre1991" => "BIG APES, BIGGER ARCADES",
        "pre2013" => "ONE TAP TO FLY",
        "ending" => "GAME OVER? NEVER",
        _ => "",
    }
}

/// Plain text screens on the frame buffer
#[derive(Debug, Default)]
pub struct TextScreens;

impl Screens for TextScreens {
    fn end_screen(&mut self, console: &mut Console, screen: &EndScreen<'_>) {
        let message = if screen.won { "YOU WIN" } else { "YOU LOSE" };
        let (title_y, detail_y) = if screen.record { (80, 100) } else { (90, 110) };

        let frame = &mut console.frame;
        frame.clear(0);
        frame.text_centered(title_y, message, COLOR_TITLE);
        if !screen.detail.is_empty() {
            frame.text_centered(detail_y, screen.detail, COLOR_DETAIL);
        }
        if screen.record {
            frame.text_centered(130, "RECORD", COLOR_TITLE);
            console.present();
            return;
        }
        console.present();

        hold(console, END_HOLD_US);
        console.input.clear();
        wait_for(console, &[MenuEvent::Accept]);
        console.input.clear();
    }

    fn enter_initials(&mut self, console: &mut Console, prompt: &InitialsPrompt<'_>) -> String {
        let mut entry = InitialsEntry::new(prompt.table_empty);
        console.input.clear();
        entry.draw(console, prompt);

        loop {
            console.input.refresh();
            let event = console.input.poll_event();
            if event == MenuEvent::None {
                console.clock.sleep_us(POLL_SLEEP_US);
                continue;
            }
            if let Some(initials) = entry.handle(event) {
                console.input.clear();
                return initials;
            }
            entry.draw(console, prompt);
        }
    }

    fn next_stage(&mut self, console: &mut Console) {
        self.notice(console, "NEXT GAME");
    }

    fn unavailable(&mut self, console: &mut Console, year: Year) {
        self.notice(console, &year.number().to_string());
    }

    fn cutscene(&mut self, console: &mut Console, id: &str) {
        let frame = &mut console.frame;
        frame.clear(0);
        frame.text_centered(96, cutscene_caption(id), COLOR_TITLE);
        console.present();
        console.input.clear();
        wait_for(console, &[MenuEvent::Accept, MenuEvent::Cancel]);
        console.input.clear();
    }

    fn story_final(&mut self, console: &mut Console, run: &StoryRun) {
        let frame = &mut console.frame;
        frame.clear(0);
        frame.text_centered(32, "STORY MODE COMPLETE", COLOR_TITLE);
        frame.text(32, 80, &format!("BASE SCORE: {}", run.score), COLOR_DETAIL);
        frame.text(32, 92, &format!("RETRIES: {}", run.retries), COLOR_DETAIL);
        frame.text(32, 104, &format!("BONUS: {}", run.bonus()), COLOR_DETAIL);
        frame.text(32, 120, &format!("FINAL SCORE: {}", run.final_score()), COLOR_TITLE);
        frame.text_centered(160, "PRESS ENTER", COLOR_TITLE);
        console.present();
        console.input.clear();
        wait_for(console, &[MenuEvent::Accept, MenuEvent::Cancel]);
        console.input.clear();
    }

    fn story_not_ranked(&mut self, console: &mut Console, final_score: u64) {
        let frame = &mut console.frame;
        frame.clear(0);
        frame.text_centered(100, "NOT IN TOP 10", COLOR_TITLE);
        frame.text_centered(120, &format_score(final_score), COLOR_DETAIL);
        console.present();
        console.input.clear();
        wait_for(console, &[MenuEvent::Accept, MenuEvent::Cancel]);
        console.input.clear();
    }
}

impl TextScreens {
    fn notice(&self, console: &mut Console, title: &str) {
        let frame = &mut console.frame;
        frame.clear(0);
        frame.text_centered(80, title, COLOR_TITLE);
        frame.text_centered(100, "PRESS ENTER", COLOR_TITLE);
        console.present();
        console.input.clear();
        wait_for(console, &[MenuEvent::Accept]);
        console.input.clear();
    }
}
