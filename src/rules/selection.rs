use std::collections::{BTreeMap, BTreeSet};

use bevy_ecs::prelude::*;
use serde::{Deserialize, Serialize};

use crate::catalog::{CardId, CombinationId, CoreItemId, Slot};
use crate::error::ConfigError;
use crate::rules::budget::GraspCap;

pub const MIN_RANK: u8 = 1;
pub const MAX_RANK: u8 = 4;

/// Card rank, 1..=4.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Rank(u8);

impl Rank {
    pub const BASE: Rank = Rank(MIN_RANK);

    pub fn get(self) -> u8 {
        self.0
    }
}

impl Default for Rank {
    fn default() -> Self {
        Rank::BASE
    }
}

impl TryFrom<u8> for Rank {
    type Error = ConfigError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        if (MIN_RANK..=MAX_RANK).contains(&value) {
            Ok(Rank(value))
        } else {
            Err(ConfigError::RankOutOfRange(value))
        }
    }
}

impl From<Rank> for u8 {
    fn from(rank: Rank) -> Self {
        rank.0
    }
}

/// The mutable build-in-progress owned by one session.
#[derive(Resource, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
    #[serde(default)]
    pub cores: BTreeMap<Slot, CoreItemId>,
    #[serde(default)]
    pub duos: BTreeSet<CombinationId>,
    #[serde(default)]
    pub legendaries: BTreeSet<CombinationId>,
    #[serde(default)]
    pub cards: BTreeMap<CardId, Rank>,
    pub grasp_cap: GraspCap,
}

impl Selection {
    pub fn new(grasp_cap: GraspCap) -> Self {
        Self {
            cores: BTreeMap::new(),
            duos: BTreeSet::new(),
            legendaries: BTreeSet::new(),
            cards: BTreeMap::new(),
            grasp_cap,
        }
    }

    pub fn core_ids(&self) -> BTreeSet<CoreItemId> {
        self.cores.values().copied().collect()
    }

    pub fn card_ids(&self) -> BTreeSet<CardId> {
        self.cards.keys().copied().collect()
    }

    pub fn to_build(&self, name: impl Into<String>, weapon_aspect: Option<String>) -> Build {
        Build {
            name: name.into(),
            weapon_aspect,
            cores: self
                .cores
                .iter()
                .map(|(&slot, &core)| SlotAssignment { slot, core })
                .collect(),
            duos: self.duos.iter().copied().collect(),
            legendaries: self.legendaries.iter().copied().collect(),
            cards: self
                .cards
                .iter()
                .map(|(&card, &rank)| CardPick {
                    card,
                    rank: rank.get(),
                })
                .collect(),
            grasp_cap: self.grasp_cap.get(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotAssignment {
    pub slot: Slot,
    pub core: CoreItemId,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardPick {
    pub card: CardId,
    pub rank: u8,
}

/// A build as submitted for finalization. Carries raw values so malformed
/// submissions can still be described issue by issue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Build {
    pub name: String,
    #[serde(default)]
    pub weapon_aspect: Option<String>,
    #[serde(default)]
    pub cores: Vec<SlotAssignment>,
    #[serde(default)]
    pub duos: Vec<CombinationId>,
    #[serde(default)]
    pub legendaries: Vec<CombinationId>,
    #[serde(default)]
    pub cards: Vec<CardPick>,
    pub grasp_cap: u32,
}

impl Build {
    pub fn core_ids(&self) -> BTreeSet<CoreItemId> {
        self.cores.iter().map(|assignment| assignment.core).collect()
    }

    pub fn card_ids(&self) -> BTreeSet<CardId> {
        self.cards.iter().map(|pick| pick.card).collect()
    }

    pub fn filled_slots(&self) -> BTreeSet<Slot> {
        self.cores.iter().map(|assignment| assignment.slot).collect()
    }
}
