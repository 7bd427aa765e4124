use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::catalog::Slot;
use crate::rules::selection::Build;

pub const CORE_SLOT_POINTS: u32 = 10;
pub const DUO_POINTS: u32 = 25;
pub const LEGENDARY_POINTS: u32 = 40;

/// Build grade, best first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Tier {
    S,
    A,
    B,
    C,
    D,
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Tier::S => "S",
            Tier::A => "A",
            Tier::B => "B",
            Tier::C => "C",
            Tier::D => "D",
        };
        f.write_str(label)
    }
}

pub fn tier_from_score(score: u32) -> Tier {
    if score >= 150 {
        Tier::S
    } else if score >= 120 {
        Tier::A
    } else if score >= 80 {
        Tier::B
    } else if score >= 50 {
        Tier::C
    } else {
        Tier::D
    }
}

pub fn build_score(build: &Build) -> u32 {
    let filled = build.filled_slots().len().min(Slot::ALL.len()) as u32;
    let duos = build.duos.iter().collect::<BTreeSet<_>>().len() as u32;
    let legendaries = build.legendaries.iter().collect::<BTreeSet<_>>().len() as u32;
    filled * CORE_SLOT_POINTS + duos * DUO_POINTS + legendaries * LEGENDARY_POINTS
}

pub fn score_tier(build: &Build) -> Tier {
    tier_from_score(build_score(build))
}
