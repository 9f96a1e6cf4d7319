//! The spatial memory index: an agent's record of which worlds, sectors,
//! arenas and game objects it has seen, and how they nest.

use std::{io, path::Path};
use tracing::debug;

use crate::config::{QuerySettings, SnapshotSettings, SpatialMemoryConfig};
use crate::display;
use crate::error::{SpatialMemoryError, SpatialMemoryResult};
use crate::storage::{JsonSnapshotStorage, SnapshotStorage};
use crate::types::{
    ArenaAddress, ArenaMap, Level, ObjectList, SectorAddress, SectorMap, TileInfo, WorldMap,
};

/// Hierarchical location index for a single agent.
///
/// Entries only accumulate: nothing is ever removed from the tree once it
/// has been observed or loaded.
#[derive(Debug, Clone, Default)]
pub struct SpatialMemory {
    tree: WorldMap,
    query: QuerySettings,
    snapshot: SnapshotSettings,
}

impl SpatialMemory {
    /// Create an empty index with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap an existing tree
    pub fn from_tree(tree: WorldMap) -> Self {
        Self {
            tree,
            ..Self::default()
        }
    }

    /// Load the snapshot saved at `path`, or start empty if there is none.
    pub fn load(path: impl AsRef<Path>) -> SpatialMemoryResult<Self> {
        Self::load_with_config(path, &SpatialMemoryConfig::default())
    }

    pub fn load_with_config(
        path: impl AsRef<Path>,
        config: &SpatialMemoryConfig,
    ) -> SpatialMemoryResult<Self> {
        let storage =
            JsonSnapshotStorage::with_settings(path.as_ref(), config.snapshot.clone());
        let mut memory = Self::load_from(&storage)?;
        memory.query = config.query.clone();
        memory.snapshot = config.snapshot.clone();
        Ok(memory)
    }

    /// Load from any snapshot storage, starting empty if it holds nothing.
    pub fn load_from<S: SnapshotStorage>(storage: &S) -> SpatialMemoryResult<Self> {
        let tree = match storage.load()? {
            Some(tree) => tree,
            None => {
                debug!(
                    "Fresh spatial memory, nothing stored at {}",
                    storage.location().display()
                );
                WorldMap::new()
            }
        };
        Ok(Self::from_tree(tree))
    }

    /// Write the whole tree to `path`, replacing whatever is there.
    pub fn save(&self, path: impl AsRef<Path>) -> SpatialMemoryResult<()> {
        let storage = JsonSnapshotStorage::with_settings(path.as_ref(), self.snapshot.clone());
        self.save_to(&storage)
    }

    pub fn save_to<S: SnapshotStorage>(&self, storage: &S) -> SpatialMemoryResult<()> {
        storage.save(&self.tree)?;
        Ok(())
    }

    pub fn tree(&self) -> &WorldMap {
        &self.tree
    }

    pub fn is_empty(&self) -> bool {
        self.tree.is_empty()
    }

    pub fn contains_world(&self, world: &str) -> bool {
        self.tree.contains_key(world)
    }

    pub fn query_settings(&self) -> &QuerySettings {
        &self.query
    }

    // ------------------------------------------------------------------
    // Diagnostics
    // ------------------------------------------------------------------

    /// Indentation-by-depth rendering of the tree
    pub fn render_tree(&self) -> String {
        display::render_tree(&self.tree)
    }

    pub fn write_tree<W: io::Write>(&self, out: &mut W) -> io::Result<()> {
        display::write_tree(out, &self.tree)
    }

    /// Print the tree to stderr
    pub fn print_tree(&self) {
        eprint!("{}", self.render_tree());
    }

    // ------------------------------------------------------------------
    // Lookups
    // ------------------------------------------------------------------

    fn sectors(&self, world: &str) -> SpatialMemoryResult<&SectorMap> {
        self.tree
            .get(world)
            .ok_or_else(|| SpatialMemoryError::missing(Level::World, world))
    }

    fn arenas(&self, world: &str, sector: &str) -> SpatialMemoryResult<&ArenaMap> {
        self.sectors(world)?
            .get(sector)
            .ok_or_else(|| SpatialMemoryError::missing(Level::Sector, sector))
    }

    /// Find an arena's objects: the exact name first, then the lower-cased
    /// name, then the first arena whose name matches ignoring case.
    fn objects<'a>(&self, arenas: &'a ArenaMap, arena: &str) -> Option<&'a ObjectList> {
        if let Some(objects) = arenas.get(arena) {
            return Some(objects);
        }
        if !self.query.arena_case_fallback {
            return None;
        }

        let lowered = arena.to_lowercase();
        if let Some(objects) = arenas.get(lowered.as_str()) {
            return Some(objects);
        }
        arenas
            .iter()
            .find(|(name, _)| name.to_lowercase() == lowered)
            .map(|(_, objects)| objects)
    }

    pub fn world_names(&self) -> Vec<&str> {
        self.tree.keys().map(String::as_str).collect()
    }

    /// Sector names under `world`, in insertion order
    pub fn sector_names(&self, world: &str) -> SpatialMemoryResult<Vec<&str>> {
        Ok(self.sectors(world)?.keys().map(String::as_str).collect())
    }

    /// Arena names under a `world:sector` address, in insertion order.
    ///
    /// An empty sector segment yields no names without any lookup.
    pub fn arena_names(&self, address: &str) -> SpatialMemoryResult<Vec<&str>> {
        let SectorAddress { world, sector } = address.parse::<SectorAddress>()?;
        if sector.is_empty() {
            return Ok(Vec::new());
        }
        Ok(self
            .arenas(&world, &sector)?
            .keys()
            .map(String::as_str)
            .collect())
    }

    /// Game objects under a `world:sector:arena` address, in insertion order.
    ///
    /// An empty arena segment yields no names without any lookup.
    pub fn game_object_names(&self, address: &str) -> SpatialMemoryResult<Vec<&str>> {
        let ArenaAddress {
            world,
            sector,
            arena,
        } = address.parse::<ArenaAddress>()?;
        if arena.is_empty() {
            return Ok(Vec::new());
        }

        let arenas = self.arenas(&world, &sector)?;
        let objects = self
            .objects(arenas, &arena)
            .ok_or_else(|| SpatialMemoryError::missing(Level::Arena, &arena))?;
        Ok(objects.iter().map(String::as_str).collect())
    }

    fn join(&self, names: Vec<&str>) -> String {
        names.join(self.query.separator.as_str())
    }

    /// Summary string of every sector the agent knows in `world`.
    ///
    /// e.g. `"Hobbs Cafe, Oak Hill College, Johnson Park"`
    pub fn accessible_sectors(&self, world: &str) -> SpatialMemoryResult<String> {
        Ok(self.join(self.sector_names(world)?))
    }

    /// Summary string of the arenas in a `world:sector` address.
    ///
    /// e.g. `"bedroom, kitchen, dining room, office, bathroom"`
    pub fn accessible_arenas(&self, address: &str) -> SpatialMemoryResult<String> {
        Ok(self.join(self.arena_names(address)?))
    }

    /// Summary string of the game objects in a `world:sector:arena` address.
    ///
    /// e.g. `"phone, charger, bed, nightstand"`
    pub fn accessible_game_objects(&self, address: &str) -> SpatialMemoryResult<String> {
        Ok(self.join(self.game_object_names(address)?))
    }

    // ------------------------------------------------------------------
    // Updates
    // ------------------------------------------------------------------

    /// Record one observed tile.
    ///
    /// Each level present on the tile is created if it is new, and the game
    /// object is appended to its arena unless already listed. A level given
    /// without its parent on the same tile is rejected before anything is
    /// changed.
    pub fn add_tile_info(&mut self, tile: &TileInfo) -> SpatialMemoryResult<()> {
        let world = tile.name(Level::World);
        let sector = tile.name(Level::Sector);
        let arena = tile.name(Level::Arena);
        let game_object = tile.name(Level::GameObject);

        let chain = [
            (Level::Sector, sector.is_some(), Level::World, world.is_some()),
            (Level::Arena, arena.is_some(), Level::Sector, sector.is_some()),
            (Level::GameObject, game_object.is_some(), Level::Arena, arena.is_some()),
        ];
        for (level, present, parent, parent_present) in chain {
            if present && !parent_present {
                return Err(SpatialMemoryError::MissingParent { level, parent });
            }
        }

        let Some(world) = world else {
            return Ok(());
        };
        let sectors = self.tree.entry(world.to_string()).or_insert_with(|| {
            debug!("New world: {}", world);
            SectorMap::new()
        });

        let Some(sector) = sector else {
            return Ok(());
        };
        let arenas = sectors.entry(sector.to_string()).or_insert_with(|| {
            debug!("New sector: {}:{}", world, sector);
            ArenaMap::new()
        });

        let Some(arena) = arena else {
            return Ok(());
        };
        let objects = arenas.entry(arena.to_string()).or_insert_with(|| {
            debug!("New arena: {}:{}:{}", world, sector, arena);
            ObjectList::new()
        });

        if let Some(game_object) = game_object {
            if !objects.iter().any(|o| o == game_object) {
                objects.push(game_object.to_string());
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn oak_hill() -> SpatialMemory {
        let mut memory = SpatialMemory::new();
        for tile in [
            TileInfo::new("Oak Hill", "Hobbs House", "bedroom", "bed"),
            TileInfo::new("Oak Hill", "Hobbs House", "bedroom", "desk"),
            TileInfo::new("Oak Hill", "Hobbs House", "kitchen", "stove"),
            TileInfo::new("Oak Hill", "Johnson Park", "park garden", ""),
            TileInfo::new("Oak Hill", "Hobbs Cafe", "", ""),
        ] {
            memory.add_tile_info(&tile).unwrap();
        }
        memory
    }

    #[test]
    fn test_objects_listed_in_first_seen_order() {
        let memory = oak_hill();
        assert_eq!(
            memory
                .accessible_game_objects("Oak Hill:Hobbs House:bedroom")
                .unwrap(),
            "bed, desk"
        );
    }

    #[test]
    fn test_sectors_and_arenas_in_insertion_order() {
        let memory = oak_hill();
        assert_eq!(
            memory.accessible_sectors("Oak Hill").unwrap(),
            "Hobbs House, Johnson Park, Hobbs Cafe"
        );
        assert_eq!(
            memory.accessible_arenas("Oak Hill:Hobbs House").unwrap(),
            "bedroom, kitchen"
        );
        assert_eq!(memory.accessible_arenas("Oak Hill:Hobbs Cafe").unwrap(), "");
    }

    #[test]
    fn test_repeated_tile_is_idempotent() {
        let mut memory = oak_hill();
        let before = memory.tree().clone();

        memory
            .add_tile_info(&TileInfo::new("Oak Hill", "Hobbs House", "bedroom", "bed"))
            .unwrap();
        memory
            .add_tile_info(&TileInfo::new("Oak Hill", "Hobbs House", "bedroom", "bed"))
            .unwrap();

        assert_eq!(memory.tree(), &before);
    }

    #[test]
    fn test_empty_tile_is_noop() {
        let mut memory = SpatialMemory::new();
        memory.add_tile_info(&TileInfo::default()).unwrap();
        memory.add_tile_info(&TileInfo::new("", "", "", "")).unwrap();
        assert!(memory.is_empty());
    }

    #[test]
    fn test_partial_tile_creates_only_named_levels() {
        let mut memory = SpatialMemory::new();
        memory
            .add_tile_info(&TileInfo::new("Oak Hill", "", "", ""))
            .unwrap();

        assert!(memory.contains_world("Oak Hill"));
        assert_eq!(memory.accessible_sectors("Oak Hill").unwrap(), "");
    }

    #[test]
    fn test_level_without_parent_is_rejected() {
        let mut memory = oak_hill();
        let before = memory.tree().clone();

        let err = memory
            .add_tile_info(&TileInfo::new("", "Hobbs House", "", ""))
            .unwrap_err();
        assert!(matches!(
            err,
            SpatialMemoryError::MissingParent {
                level: Level::Sector,
                parent: Level::World
            }
        ));

        let err = memory
            .add_tile_info(&TileInfo::new("New World", "", "attic", "trunk"))
            .unwrap_err();
        assert!(matches!(
            err,
            SpatialMemoryError::MissingParent {
                level: Level::Arena,
                parent: Level::Sector
            }
        ));

        let err = memory
            .add_tile_info(&TileInfo::new("Oak Hill", "Hobbs House", "", "lamp"))
            .unwrap_err();
        assert!(matches!(
            err,
            SpatialMemoryError::MissingParent {
                level: Level::GameObject,
                parent: Level::Arena
            }
        ));

        assert_eq!(memory.tree(), &before);
    }

    #[test]
    fn test_empty_segment_short_circuits() {
        let memory = SpatialMemory::new();
        assert_eq!(memory.accessible_arenas("Nowhere:").unwrap(), "");
        assert_eq!(
            memory.accessible_game_objects("Nowhere:Nothing:").unwrap(),
            ""
        );
    }

    #[test]
    fn test_missing_keys_are_reported_by_level() {
        let memory = oak_hill();

        assert!(matches!(
            memory.accessible_sectors("Atlantis"),
            Err(SpatialMemoryError::MissingKey { level: Level::World, .. })
        ));
        assert!(matches!(
            memory.accessible_arenas("Oak Hill:Town Hall"),
            Err(SpatialMemoryError::MissingKey { level: Level::Sector, .. })
        ));
        assert!(matches!(
            memory.accessible_game_objects("Oak Hill:Hobbs House:garage"),
            Err(SpatialMemoryError::MissingKey { level: Level::Arena, .. })
        ));
    }

    #[test]
    fn test_malformed_addresses() {
        let memory = oak_hill();

        assert!(matches!(
            memory.accessible_arenas("Oak Hill"),
            Err(SpatialMemoryError::MalformedAddress { .. })
        ));
        assert!(matches!(
            memory.accessible_game_objects("Oak Hill:Hobbs House"),
            Err(SpatialMemoryError::MalformedAddress { .. })
        ));
    }

    #[test]
    fn test_arena_lookup_falls_back_to_lower_case() {
        let memory = oak_hill();
        assert_eq!(
            memory
                .accessible_game_objects("Oak Hill:Hobbs House:Bedroom")
                .unwrap(),
            "bed, desk"
        );
    }

    #[test]
    fn test_arena_lookup_matches_capitalised_key() {
        let mut memory = SpatialMemory::new();
        memory
            .add_tile_info(&TileInfo::new("w", "s", "Bedroom", "bed"))
            .unwrap();

        assert_eq!(memory.accessible_game_objects("w:s:bedroom").unwrap(), "bed");
        assert_eq!(memory.accessible_game_objects("w:s:Bedroom").unwrap(), "bed");
    }

    #[test]
    fn test_exact_arena_key_wins() {
        let mut memory = SpatialMemory::new();
        memory
            .add_tile_info(&TileInfo::new("w", "s", "Office", "printer"))
            .unwrap();
        memory
            .add_tile_info(&TileInfo::new("w", "s", "office", "desk"))
            .unwrap();

        assert_eq!(memory.accessible_game_objects("w:s:Office").unwrap(), "printer");
        assert_eq!(memory.accessible_game_objects("w:s:office").unwrap(), "desk");
        assert_eq!(memory.accessible_game_objects("w:s:OFFICE").unwrap(), "desk");
    }

    #[test]
    fn test_fallback_can_be_disabled() {
        let mut config = SpatialMemoryConfig::default();
        config.query.arena_case_fallback = false;

        let mut memory = oak_hill();
        memory.query = config.query;

        assert!(matches!(
            memory.accessible_game_objects("Oak Hill:Hobbs House:Bedroom"),
            Err(SpatialMemoryError::MissingKey { level: Level::Arena, .. })
        ));
    }

    #[test]
    fn test_world_and_name_lists() {
        let mut memory = oak_hill();
        memory
            .add_tile_info(&TileInfo::new("the Ville", "", "", ""))
            .unwrap();

        assert_eq!(memory.world_names(), vec!["Oak Hill", "the Ville"]);
        assert_eq!(
            memory.game_object_names("Oak Hill:Hobbs House:kitchen").unwrap(),
            vec!["stove"]
        );
        assert!(memory.arena_names("the Ville:").unwrap().is_empty());
    }

    #[test]
    fn test_print_tree_matches_render() {
        let memory = oak_hill();
        let mut out = Vec::new();
        memory.write_tree(&mut out).unwrap();

        assert_eq!(String::from_utf8(out).unwrap(), memory.render_tree());
        assert!(memory.render_tree().starts_with(" Oak Hill\n > Hobbs House\n"));
        memory.print_tree();
    }
}
