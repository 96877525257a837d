//! Static level catalog
//!
//! Fixed, ordered set of levels. The order is the carousel order and must
//! match the order the controller keeps its scene nodes in.

use serde::{Deserialize, Serialize};

/// The selectable levels (fixed set, one scene node each)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LevelId {
    TreeHouse = 0,
    FantasyHouse = 1,
    MedievalHouse = 2,
    ChineseHouse = 3,
}

impl LevelId {
    /// Name of the scene node that holds this level's model
    pub const fn node_name(&self) -> &'static str {
        match self {
            LevelId::TreeHouse => "tree_ref",
            LevelId::FantasyHouse => "fantasy_ref",
            LevelId::MedievalHouse => "medieval_ref",
            // Spelling matches the node name baked into the scene asset
            LevelId::ChineseHouse => "chinese_buliding_ref",
        }
    }

    pub const fn title(&self) -> &'static str {
        match self {
            LevelId::TreeHouse => "Treetop Stronghold",
            LevelId::FantasyHouse => "Mythic Township Revival",
            LevelId::MedievalHouse => "Spectral Echoes",
            LevelId::ChineseHouse => "Echoes of the Dynasty",
        }
    }

    pub const fn description(&self) -> &'static str {
        match self {
            LevelId::TreeHouse => {
                "Conquer guardians, climb branches, unveil secrets in this enchanted medieval treehouse adventure."
            }
            LevelId::FantasyHouse => {
                "Embark on quests to gather resources, recruit allies, and fortify your fantasy town against impending threats."
            }
            LevelId::MedievalHouse => {
                "Explore the haunting ruins, uncover dark secrets, and confront spectral entities in this desolate medieval house."
            }
            LevelId::ChineseHouse => {
                "Navigate ancient halls, decipher puzzles, and confront legendary spirits in this mystical Chinese adventure."
            }
        }
    }

    /// Position in carousel order
    pub fn index(&self) -> usize {
        *self as usize
    }
}

/// One catalog entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LevelRecord {
    pub id: LevelId,
    pub title: &'static str,
    pub description: &'static str,
}

impl LevelRecord {
    const fn of(id: LevelId) -> Self {
        Self {
            id,
            title: id.title(),
            description: id.description(),
        }
    }
}

const RECORDS: [LevelRecord; 4] = [
    LevelRecord::of(LevelId::TreeHouse),
    LevelRecord::of(LevelId::FantasyHouse),
    LevelRecord::of(LevelId::MedievalHouse),
    LevelRecord::of(LevelId::ChineseHouse),
];

/// Ordered, immutable view over all level records
pub struct LevelCatalog;

impl LevelCatalog {
    pub fn len() -> usize {
        RECORDS.len()
    }

    /// Record at a carousel index. Callers only pass indices produced by the
    /// controller's wraparound arithmetic.
    pub fn get(index: usize) -> &'static LevelRecord {
        &RECORDS[index]
    }

    pub fn record(id: LevelId) -> &'static LevelRecord {
        Self::get(id.index())
    }

    pub fn iter() -> impl Iterator<Item = &'static LevelRecord> {
        RECORDS.iter()
    }
}
