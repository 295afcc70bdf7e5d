//! Year catalog and the built-in minigames

pub mod breakout;
pub mod collision;
pub mod pong;

use serde::{Deserialize, Serialize};

use crate::sim::Minigame;

pub use breakout::Breakout;
pub use pong::Pong;

/// One arcade era; each year is one minigame
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Year {
    Y1972,
    Y1978,
    Y1979,
    Y1981,
    Y1982,
    Y1983,
    Y1989,
    Y1991,
    Y2013,
}

impl Year {
    /// Story order
    pub const ALL: [Year; 9] = [
        Year::Y1972,
        Year::Y1978,
        Year::Y1979,
        Year::Y1981,
        Year::Y1982,
        Year::Y1983,
        Year::Y1989,
        Year::Y1991,
        Year::Y2013,
    ];

    pub fn number(&self) -> u16 {
        match self {
            Year::Y1972 => 1972,
            Year::Y1978 => 1978,
            Year::Y1979 => 1979,
            Year::Y1981 => 1981,
            Year::Y1982 => 1982,
            Year::Y1983 => 1983,
            Year::Y1989 => 1989,
            Year::Y1991 => 1991,
            Year::Y2013 => 2013,
        }
    }

    pub fn from_number(n: u16) -> Option<Self> {
        Self::ALL.into_iter().find(|y| y.number() == n)
    }

    pub fn title(&self) -> &'static str {
        match self {
            Year::Y1972 => "Paddle Duel",
            Year::Y1978 => "Invaders",
            Year::Y1979 => "Brick Breaker",
            Year::Y1981 => "Frog Crossing",
            Year::Y1982 => "Light Cycles",
            Year::Y1983 => "Bar Service",
            Year::Y1989 => "Bubble Splitter",
            Year::Y1991 => "Artillery",
            Year::Y2013 => "Flyer",
        }
    }
}

/// Builds a fresh, uninitialized minigame for a year
pub trait Catalog {
    /// `None` when no module exists for `year`
    fn create(&self, year: Year) -> Option<Box<dyn Minigame>>;
}

impl<F> Catalog for F
where
    F: Fn(Year) -> Option<Box<dyn Minigame>>,
{
    fn create(&self, year: Year) -> Option<Box<dyn Minigame>> {
        self(year)
    }
}

/// The minigames shipped with the crate
#[derive(Debug, Clone, Copy, Default)]
pub struct BuiltinCatalog {
    /// Seed for the games' serve/launch randomness
    pub seed: u64,
}

impl BuiltinCatalog {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }
}

impl Catalog for BuiltinCatalog {
    fn create(&self, year: Year) -> Option<Box<dyn Minigame>> {
        match year {
            Year::Y1972 => Some(Box::new(Pong::new(self.seed))),
            Year::Y1979 => Some(Box::new(Breakout::new(self.seed))),
            _ => None,
        }
    }
}
