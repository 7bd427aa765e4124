use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CatalogError;

/// Side length of the passive card grid.
pub const GRID_SIZE: u8 = 5;

/// Highest acquisition cost a passive card may carry.
pub const MAX_CARD_COST: u8 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GroupId(pub i64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CoreItemId(pub i64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CombinationId(pub i64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CardId(pub i64);

/// Clustering key for prerequisite alternatives. Not a reference to any table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClauseGroup(pub i64);

impl fmt::Display for CoreItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "core {}", self.0)
    }
}

impl fmt::Display for CombinationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "combination {}", self.0)
    }
}

impl fmt::Display for CardId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "card {}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Slot {
    Attack,
    Special,
    Cast,
    Sprint,
    Magick,
}

impl Slot {
    pub const ALL: [Slot; 5] = [
        Slot::Attack,
        Slot::Special,
        Slot::Cast,
        Slot::Sprint,
        Slot::Magick,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Slot::Attack => "ATTACK",
            Slot::Special => "SPECIAL",
            Slot::Cast => "CAST",
            Slot::Sprint => "SPRINT",
            Slot::Magick => "MAGICK",
        }
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Slot {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ATTACK" => Ok(Slot::Attack),
            "SPECIAL" => Ok(Slot::Special),
            "CAST" => Ok(Slot::Cast),
            "SPRINT" => Ok(Slot::Sprint),
            "MAGICK" => Ok(Slot::Magick),
            _ => Err(CatalogError::UnknownEnum(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoreItem {
    pub id: CoreItemId,
    pub name: String,
    pub group: GroupId,
    pub slot: Slot,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CombinationKind {
    Duo,
    Legendary,
}

impl CombinationKind {
    pub fn as_str(self) -> &'static str {
        match self {
            CombinationKind::Duo => "DUO",
            CombinationKind::Legendary => "LEGENDARY",
        }
    }

    /// Number of owning groups an item of this kind names.
    pub fn group_count(self) -> usize {
        match self {
            CombinationKind::Duo => 2,
            CombinationKind::Legendary => 1,
        }
    }
}

impl FromStr for CombinationKind {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "DUO" => Ok(CombinationKind::Duo),
            "LEGENDARY" => Ok(CombinationKind::Legendary),
            _ => Err(CatalogError::UnknownEnum(s.to_string())),
        }
    }
}

/// One alternative set: any member satisfies the clause group it belongs to.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrerequisiteClause {
    pub group: ClauseGroup,
    pub members: Vec<CoreItemId>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CombinationItem {
    pub id: CombinationId,
    pub name: String,
    pub kind: CombinationKind,
    pub groups: Vec<GroupId>,
    #[serde(default)]
    pub clauses: Vec<PrerequisiteClause>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct GridPosition {
    pub row: u8,
    pub col: u8,
}

impl GridPosition {
    pub fn new(row: u8, col: u8) -> Self {
        Self { row, col }
    }

    pub fn is_on_grid(self) -> bool {
        self.row < GRID_SIZE && self.col < GRID_SIZE
    }

    /// In-bounds Chebyshev neighbours (up to 8, fewer along the edges).
    pub fn neighbors(self) -> Vec<GridPosition> {
        if !self.is_on_grid() {
            return Vec::new();
        }
        let mut out = Vec::with_capacity(8);
        for dr in -1i16..=1 {
            for dc in -1i16..=1 {
                if dr == 0 && dc == 0 {
                    continue;
                }
                let row = self.row as i16 + dr;
                let col = self.col as i16 + dc;
                if (0..GRID_SIZE as i16).contains(&row) && (0..GRID_SIZE as i16).contains(&col) {
                    out.push(GridPosition::new(row as u8, col as u8));
                }
            }
        }
        out
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AwakeningPredicate {
    /// Any grid neighbour is active.
    AdjacencyAny,
    /// Every in-bounds grid neighbour is active.
    AdjacencyAll,
    /// One active card of each cost 1..=5.
    CostCoverage,
    /// No cost value shared by more than two active cards, and at least one costed card.
    CostCardinalityCap,
    /// A complete row or column other than the card's own.
    LineCoverage,
    /// Between one and three costed cards active.
    TotalCardinalityCap,
}

impl AwakeningPredicate {
    pub fn as_str(self) -> &'static str {
        match self {
            AwakeningPredicate::AdjacencyAny => "ADJACENCY_ANY",
            AwakeningPredicate::AdjacencyAll => "ADJACENCY_ALL",
            AwakeningPredicate::CostCoverage => "COST_COVERAGE",
            AwakeningPredicate::CostCardinalityCap => "COST_CARDINALITY_CAP",
            AwakeningPredicate::LineCoverage => "LINE_COVERAGE",
            AwakeningPredicate::TotalCardinalityCap => "TOTAL_CARDINALITY_CAP",
        }
    }
}

impl FromStr for AwakeningPredicate {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ADJACENCY_ANY" => Ok(AwakeningPredicate::AdjacencyAny),
            "ADJACENCY_ALL" => Ok(AwakeningPredicate::AdjacencyAll),
            "COST_COVERAGE" => Ok(AwakeningPredicate::CostCoverage),
            "COST_CARDINALITY_CAP" => Ok(AwakeningPredicate::CostCardinalityCap),
            "LINE_COVERAGE" => Ok(AwakeningPredicate::LineCoverage),
            "TOTAL_CARDINALITY_CAP" => Ok(AwakeningPredicate::TotalCardinalityCap),
            _ => Err(CatalogError::UnknownEnum(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PassiveCard {
    pub id: CardId,
    pub name: String,
    #[serde(default)]
    pub position: Option<GridPosition>,
    pub cost: u8,
    /// Effect text indexed by rank 1..=4.
    pub effects: [String; 4],
    #[serde(default)]
    pub awakening: Option<AwakeningPredicate>,
}

impl PassiveCard {
    pub fn is_awakening(&self) -> bool {
        self.cost == 0
    }

    /// Position usable for grid predicates; off-grid positions count as absent.
    pub fn grid_position(&self) -> Option<GridPosition> {
        self.position.filter(|pos| pos.is_on_grid())
    }

    pub fn effect_at(&self, rank: u8) -> Option<&str> {
        let idx = usize::from(rank).checked_sub(1)?;
        self.effects.get(idx).map(String::as_str)
    }
}
