//! The world/session seam.
//!
//! The controller never owns game state. Everything it needs from a
//! running game -- camera projection, players, the unit-type catalog,
//! entities, terrain -- goes through [`Session`], passed explicitly into
//! every mode operation. No session means command and painter modes are
//! unavailable.

use std::fmt;

use crate::command::Command;
use crate::coord::{ScreenPos, TilePos, WorldPos};

/// A live entity in the world.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityId(pub u64);

/// A unit or building type from the game data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityTypeId(pub u32);

/// A player slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct PlayerId(pub u16);

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "player {}", self.0)
    }
}

/// A terrain kind, indexing the game's terrain table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct TerrainId(pub u32);

/// Stockpiled resources, for the command mode status line.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Stockpile {
    pub food: f64,
    pub wood: f64,
    pub gold: f64,
    pub stone: f64,
}

/// Player identity as shown on the HUD.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerInfo {
    pub id: PlayerId,
    pub name: String,
    pub color: u8,
}

/// Handle to the running game.
///
/// Object-safe by design: modes receive `&mut dyn Session` (or `&dyn` for
/// rendering). Query methods are infallible lookups returning empty/`None`
/// for anything missing; mutations report success through their return
/// value where the caller branches on it.
pub trait Session {
    /// Project a window position onto the world plane.
    fn world_at(&self, screen: ScreenPos) -> WorldPos;

    fn focused_player(&self) -> PlayerId;
    fn player(&self, id: PlayerId) -> Option<PlayerInfo>;
    fn stockpile(&self, id: PlayerId) -> Stockpile;

    /// Entity-type categories for the painter's brush, in display order.
    fn type_categories(&self) -> Vec<String>;
    /// Types inside one category, in display order.
    fn category_types(&self, category: &str) -> Vec<EntityTypeId>;
    fn type_name(&self, ty: EntityTypeId) -> String;
    /// Building types the player can place, hotkey slot order.
    fn building_catalog(&self, player: PlayerId) -> Vec<EntityTypeId>;
    /// The two unit-type variants the train shortcut picks between.
    fn train_variants(&self, player: PlayerId) -> Option<(EntityTypeId, EntityTypeId)>;
    /// Type created by the debug spawn shortcut.
    fn spawn_type(&self, player: PlayerId) -> Option<EntityTypeId>;

    /// Entity occupying a world position, if any.
    fn entity_at(&self, pos: WorldPos) -> Option<EntityId>;
    /// Entities inside a screen-space rectangle (corners in any order).
    /// A degenerate rectangle is a point pick.
    fn entities_in_region(&self, a: ScreenPos, b: ScreenPos) -> Vec<EntityId>;
    /// Entities standing on a tile.
    fn entities_on_tile(&self, tile: TilePos) -> Vec<EntityId>;
    /// Whether this entity can construct buildings.
    fn can_build(&self, id: EntityId) -> bool;
    /// Returns `None` when the location refuses the entity.
    fn create_entity(
        &mut self,
        ty: EntityTypeId,
        owner: PlayerId,
        pos: WorldPos,
    ) -> Option<EntityId>;
    fn remove_entity(&mut self, id: EntityId);
    fn apply_command(&mut self, entity: EntityId, command: &Command);

    /// Number of terrain kinds in the game data.
    fn terrain_count(&self) -> usize;
    /// Terrain of a tile; `None` while the chunk does not exist yet.
    fn terrain_at(&self, tile: TilePos) -> Option<TerrainId>;
    /// Write a tile's terrain, creating the containing chunk on first use.
    fn paint_terrain(&mut self, tile: TilePos, id: TerrainId);
}
