//! Test fixtures: an in-memory world session and a HUD call recorder.
//!
//! `FakeSession` projects screen to world 1:1, stores entities in a flat
//! table, logs every command it is asked to apply, and keeps terrain in
//! 16x16 chunks created on first write, so tests can observe exactly what
//! the modes did to the world.

use rustc_hash::{FxHashMap, FxHashSet};

use crate::command::Command;
use crate::coord::{ScreenPos, ScreenSize, TilePos, WorldPos};
use crate::hud::HudPainter;
use crate::input::{HeldButtons, Modifiers, MouseButton, PointerEvent, PointerKind, PointerPhase};
use crate::world::{
    EntityId, EntityTypeId, PlayerId, PlayerInfo, Session, Stockpile, TerrainId,
};

const CHUNK_SIZE: i32 = 16;

#[derive(Debug, Clone)]
pub struct FakeEntity {
    pub id: EntityId,
    pub ty: EntityTypeId,
    pub owner: PlayerId,
    pub pos: WorldPos,
}

#[derive(Debug, Clone)]
struct Chunk {
    tiles: [TerrainId; (CHUNK_SIZE * CHUNK_SIZE) as usize],
}

impl Default for Chunk {
    fn default() -> Self {
        Self {
            tiles: [TerrainId::default(); (CHUNK_SIZE * CHUNK_SIZE) as usize],
        }
    }
}

/// An in-memory [`Session`] with a 1:1 screen-to-world projection.
#[derive(Debug, Default)]
pub struct FakeSession {
    pub entities: Vec<FakeEntity>,
    pub commands: Vec<(EntityId, Command)>,
    pub builders: FxHashSet<EntityTypeId>,
    pub categories: Vec<(String, Vec<EntityTypeId>)>,
    pub type_names: FxHashMap<EntityTypeId, String>,
    pub buildings: Vec<EntityTypeId>,
    pub variants: Option<(EntityTypeId, EntityTypeId)>,
    pub spawnable: Option<EntityTypeId>,
    pub terrain_kinds: usize,
    pub players: Vec<PlayerInfo>,
    pub focus: PlayerId,
    pub stock: Stockpile,
    next_id: u64,
    chunks: FxHashMap<(i32, i32), Chunk>,
}

impl FakeSession {
    pub fn new() -> Self {
        Self {
            focus: PlayerId(1),
            players: vec![PlayerInfo {
                id: PlayerId(1),
                name: "Player 1".to_owned(),
                color: 1,
            }],
            ..Default::default()
        }
    }

    pub fn add_entity(&mut self, ty: EntityTypeId, owner: PlayerId, pos: WorldPos) -> EntityId {
        self.next_id += 1;
        let id = EntityId(self.next_id);
        self.entities.push(FakeEntity { id, ty, owner, pos });
        id
    }

    fn chunk_key(tile: TilePos) -> (i32, i32) {
        (tile.x.div_euclid(CHUNK_SIZE), tile.y.div_euclid(CHUNK_SIZE))
    }

    fn chunk_slot(tile: TilePos) -> usize {
        (tile.y.rem_euclid(CHUNK_SIZE) * CHUNK_SIZE + tile.x.rem_euclid(CHUNK_SIZE)) as usize
    }
}

impl Session for FakeSession {
    fn world_at(&self, screen: ScreenPos) -> WorldPos {
        WorldPos::new(screen.x as f32, screen.y as f32)
    }

    fn focused_player(&self) -> PlayerId {
        self.focus
    }

    fn player(&self, id: PlayerId) -> Option<PlayerInfo> {
        self.players.iter().find(|p| p.id == id).cloned()
    }

    fn stockpile(&self, _id: PlayerId) -> Stockpile {
        self.stock
    }

    fn type_categories(&self) -> Vec<String> {
        self.categories.iter().map(|(name, _)| name.clone()).collect()
    }

    fn category_types(&self, category: &str) -> Vec<EntityTypeId> {
        self.categories
            .iter()
            .find(|(name, _)| name == category)
            .map(|(_, types)| types.clone())
            .unwrap_or_default()
    }

    fn type_name(&self, ty: EntityTypeId) -> String {
        self.type_names
            .get(&ty)
            .cloned()
            .unwrap_or_else(|| format!("type {}", ty.0))
    }

    fn building_catalog(&self, _player: PlayerId) -> Vec<EntityTypeId> {
        self.buildings.clone()
    }

    fn train_variants(&self, _player: PlayerId) -> Option<(EntityTypeId, EntityTypeId)> {
        self.variants
    }

    fn spawn_type(&self, _player: PlayerId) -> Option<EntityTypeId> {
        self.spawnable
    }

    fn entity_at(&self, pos: WorldPos) -> Option<EntityId> {
        self.entities
            .iter()
            .find(|e| (e.pos.x - pos.x).abs() <= 0.5 && (e.pos.y - pos.y).abs() <= 0.5)
            .map(|e| e.id)
    }

    fn entities_in_region(&self, a: ScreenPos, b: ScreenPos) -> Vec<EntityId> {
        if a == b {
            return self.entity_at(self.world_at(a)).into_iter().collect();
        }
        let (x0, x1) = (a.x.min(b.x) as f32, a.x.max(b.x) as f32);
        let (y0, y1) = (a.y.min(b.y) as f32, a.y.max(b.y) as f32);
        self.entities
            .iter()
            .filter(|e| e.pos.x >= x0 && e.pos.x <= x1 && e.pos.y >= y0 && e.pos.y <= y1)
            .map(|e| e.id)
            .collect()
    }

    fn entities_on_tile(&self, tile: TilePos) -> Vec<EntityId> {
        self.entities
            .iter()
            .filter(|e| e.pos.to_tile() == tile)
            .map(|e| e.id)
            .collect()
    }

    fn can_build(&self, id: EntityId) -> bool {
        self.entities
            .iter()
            .find(|e| e.id == id)
            .is_some_and(|e| self.builders.contains(&e.ty))
    }

    fn create_entity(
        &mut self,
        ty: EntityTypeId,
        owner: PlayerId,
        pos: WorldPos,
    ) -> Option<EntityId> {
        // The spot must be free, like a real world would demand.
        if self.entity_at(pos).is_some() {
            return None;
        }
        Some(self.add_entity(ty, owner, pos))
    }

    fn remove_entity(&mut self, id: EntityId) {
        self.entities.retain(|e| e.id != id);
    }

    fn apply_command(&mut self, entity: EntityId, command: &Command) {
        self.commands.push((entity, command.clone()));
    }

    fn terrain_count(&self) -> usize {
        self.terrain_kinds
    }

    fn terrain_at(&self, tile: TilePos) -> Option<TerrainId> {
        self.chunks
            .get(&Self::chunk_key(tile))
            .map(|chunk| chunk.tiles[Self::chunk_slot(tile)])
    }

    fn paint_terrain(&mut self, tile: TilePos, id: TerrainId) {
        let chunk = self.chunks.entry(Self::chunk_key(tile)).or_default();
        chunk.tiles[Self::chunk_slot(tile)] = id;
    }
}

/// One recorded HUD draw call.
#[derive(Debug, Clone, PartialEq)]
pub enum HudCall {
    Text {
        pos: ScreenPos,
        size: u32,
        text: String,
    },
    Tile {
        pos: ScreenPos,
        id: TerrainId,
    },
    Entity {
        pos: ScreenPos,
        ty: EntityTypeId,
        owner: PlayerId,
    },
}

/// A [`HudPainter`] that records calls for assertions.
#[derive(Debug)]
pub struct TextHud {
    viewport: ScreenSize,
    pub calls: Vec<HudCall>,
}

impl TextHud {
    pub fn new(width: i32, height: i32) -> Self {
        Self {
            viewport: ScreenSize::new(width, height),
            calls: Vec::new(),
        }
    }

    /// Every text drawn, in draw order.
    pub fn texts(&self) -> Vec<&str> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                HudCall::Text { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }
}

impl HudPainter for TextHud {
    fn viewport(&self) -> ScreenSize {
        self.viewport
    }

    fn text(&mut self, pos: ScreenPos, size: u32, text: &str) {
        self.calls.push(HudCall::Text {
            pos,
            size,
            text: text.to_owned(),
        });
    }

    fn tile_preview(&mut self, pos: ScreenPos, id: TerrainId) {
        self.calls.push(HudCall::Tile { pos, id });
    }

    fn entity_preview(&mut self, pos: ScreenPos, ty: EntityTypeId, owner: PlayerId) {
        self.calls.push(HudCall::Entity { pos, ty, owner });
    }
}

fn pointer(screen: ScreenPos, kind: PointerKind, held: HeldButtons) -> PointerEvent {
    PointerEvent {
        screen,
        kind,
        held,
        modifiers: Modifiers::NONE,
    }
}

/// A plain pointer motion with no buttons held.
pub fn move_to(x: i32, y: i32) -> PointerEvent {
    pointer(ScreenPos::new(x, y), PointerKind::Move, HeldButtons::default())
}

/// A pointer motion with the primary button held.
pub fn left_drag(x: i32, y: i32) -> PointerEvent {
    pointer(
        ScreenPos::new(x, y),
        PointerKind::Move,
        HeldButtons {
            left: true,
            ..Default::default()
        },
    )
}

pub fn left_press(x: i32, y: i32) -> PointerEvent {
    pointer(
        ScreenPos::new(x, y),
        PointerKind::Button {
            button: MouseButton::Left,
            phase: PointerPhase::Press,
        },
        HeldButtons {
            left: true,
            ..Default::default()
        },
    )
}

pub fn left_release(x: i32, y: i32) -> PointerEvent {
    pointer(
        ScreenPos::new(x, y),
        PointerKind::Button {
            button: MouseButton::Left,
            phase: PointerPhase::Release,
        },
        HeldButtons::default(),
    )
}

pub fn right_press(x: i32, y: i32) -> PointerEvent {
    pointer(
        ScreenPos::new(x, y),
        PointerKind::Button {
            button: MouseButton::Right,
            phase: PointerPhase::Press,
        },
        HeldButtons {
            right: true,
            ..Default::default()
        },
    )
}
