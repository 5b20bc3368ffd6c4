//! The drawing seam.
//!
//! Rendering itself is external; modes and the controller describe what to
//! draw through [`HudPainter`]. Coordinates follow the renderer's
//! convention (origin bottom-left, as the game draws text).

use crate::coord::{ScreenPos, ScreenSize};
use crate::world::{EntityTypeId, PlayerId, TerrainId};

/// Sink for HUD draw calls.
pub trait HudPainter {
    /// Current drawable size.
    fn viewport(&self) -> ScreenSize;
    /// Draw a line of text at a pixel position with a font size.
    fn text(&mut self, pos: ScreenPos, size: u32, text: &str);
    /// Draw a terrain-tile preview (the painter's terrain brush).
    fn tile_preview(&mut self, pos: ScreenPos, terrain: TerrainId);
    /// Draw an entity preview in the owner's colors (brush or placement).
    fn entity_preview(&mut self, pos: ScreenPos, ty: EntityTypeId, owner: PlayerId);
}
