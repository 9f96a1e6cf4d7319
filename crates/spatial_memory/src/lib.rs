//! Spatial Memory - hierarchical location index for a simulated agent
//!
//! Tracks the places an agent has observed as a four-level containment
//! hierarchy:
//!
//! ```text
//! world -> sector -> arena -> game objects
//! ```
//!
//! The index is built up one observed tile at a time, answers summary queries
//! such as "which arenas are in this sector", and persists to a JSON snapshot.
//!
//! ```no_run
//! use spatial_memory::{SpatialMemory, TileInfo};
//!
//! let mut memory = SpatialMemory::load("spatial_memory.json")?;
//! memory.add_tile_info(&TileInfo::new("the Ville", "Hobbs Cafe", "cafe", "counter"))?;
//! assert_eq!(memory.accessible_game_objects("the Ville:Hobbs Cafe:cafe")?, "counter");
//! memory.save("spatial_memory.json")?;
//! # Ok::<(), spatial_memory::SpatialMemoryError>(())
//! ```

pub mod config;
pub mod display;
pub mod error;
pub mod logging;
pub mod memory;
pub mod storage;
pub mod types;

pub use config::{LoggingSettings, QuerySettings, SnapshotSettings, SpatialMemoryConfig};
pub use display::{render_tree, write_tree, TreeNode};
pub use error::{
    ConfigError, ConfigResult, LoggingError, LoggingResult, SpatialMemoryError,
    SpatialMemoryResult, StorageError, StorageResult,
};
pub use logging::setup_logging;
pub use memory::SpatialMemory;
pub use storage::{JsonSnapshotStorage, SnapshotStorage};
pub use types::{
    ArenaAddress, ArenaMap, Level, ObjectList, SectorAddress, SectorMap, TileInfo, WorldMap,
    ADDRESS_SEPARATOR,
};
