// crates/spatial_memory/src/types.rs

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

use crate::error::SpatialMemoryError;

/// Game-object names held by a single arena, in first-seen order.
pub type ObjectList = Vec<String>;
/// Arena name -> game objects.
pub type ArenaMap = IndexMap<String, ObjectList>;
/// Sector name -> arenas.
pub type SectorMap = IndexMap<String, ArenaMap>;
/// World name -> sectors. This is the whole tree.
pub type WorldMap = IndexMap<String, SectorMap>;

/// Segment separator used by address strings.
pub const ADDRESS_SEPARATOR: char = ':';

/// Level of the containment hierarchy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Level {
    World,
    Sector,
    Arena,
    GameObject,
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Level::World => "world",
            Level::Sector => "sector",
            Level::Arena => "arena",
            Level::GameObject => "game object",
        };
        f.write_str(name)
    }
}

/// One observed map tile's containment path.
///
/// Every field is optional; `None` and an empty string both mean the tile
/// carries nothing at that level.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileInfo {
    #[serde(default)]
    pub world: Option<String>,
    #[serde(default)]
    pub sector: Option<String>,
    #[serde(default)]
    pub arena: Option<String>,
    #[serde(default)]
    pub game_object: Option<String>,
}

impl TileInfo {
    /// Build a tile from plain strings, treating `""` as absent.
    pub fn new(world: &str, sector: &str, arena: &str, game_object: &str) -> Self {
        fn field(value: &str) -> Option<String> {
            (!value.is_empty()).then(|| value.to_string())
        }

        Self {
            world: field(world),
            sector: field(sector),
            arena: field(arena),
            game_object: field(game_object),
        }
    }

    /// The non-empty name at `level`, if any.
    pub fn name(&self, level: Level) -> Option<&str> {
        let value = match level {
            Level::World => &self.world,
            Level::Sector => &self.sector,
            Level::Arena => &self.arena,
            Level::GameObject => &self.game_object,
        };
        value.as_deref().filter(|name| !name.is_empty())
    }

    pub fn is_empty(&self) -> bool {
        [Level::World, Level::Sector, Level::Arena, Level::GameObject]
            .iter()
            .all(|level| self.name(*level).is_none())
    }
}

fn split_address<const N: usize>(address: &str) -> Result<[String; N], SpatialMemoryError> {
    let segments: Vec<String> = address
        .split(ADDRESS_SEPARATOR)
        .map(str::to_string)
        .collect();
    let found = segments.len();

    segments
        .try_into()
        .map_err(|_| SpatialMemoryError::MalformedAddress {
            address: address.to_string(),
            expected: N,
            found,
        })
}

/// A `world:sector` address. The sector segment may be empty.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SectorAddress {
    pub world: String,
    pub sector: String,
}

impl FromStr for SectorAddress {
    type Err = SpatialMemoryError;

    fn from_str(address: &str) -> Result<Self, Self::Err> {
        let [world, sector] = split_address::<2>(address)?;
        Ok(Self { world, sector })
    }
}

impl fmt::Display for SectorAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{ADDRESS_SEPARATOR}{}", self.world, self.sector)
    }
}

/// A `world:sector:arena` address. The arena segment may be empty.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ArenaAddress {
    pub world: String,
    pub sector: String,
    pub arena: String,
}

impl FromStr for ArenaAddress {
    type Err = SpatialMemoryError;

    fn from_str(address: &str) -> Result<Self, Self::Err> {
        let [world, sector, arena] = split_address::<3>(address)?;
        Ok(Self {
            world,
            sector,
            arena,
        })
    }
}

impl fmt::Display for ArenaAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{ADDRESS_SEPARATOR}{}{ADDRESS_SEPARATOR}{}",
            self.world, self.sector, self.arena
        )
    }
}
