//! Painter mode: stamp terrain and entities straight into the world.
//!
//! One brush, two flavors. In terrain flavor the item index picks a
//! terrain kind and painting writes it to the tile under the cursor,
//! creating the chunk if the map has never touched that region. Cycling
//! the category moves to entity flavor, where the index picks a type from
//! the current category and painting spawns one on an empty tile. The
//! index is a free-running integer normalized against whichever list is
//! current, so it survives category changes of different lengths.

use tracing::debug;

use crate::action::GameAction;
use crate::binding::{BindingSet, Trigger};
use crate::coord::{ScreenPos, TilePos, WorldPos};
use crate::input::{Key, MouseButton, NamedKey, PointerEvent, PointerKind, PointerPhase};
use crate::mode::{ControlCtx, ModeBehavior, RenderCtx};
use crate::world::{EntityTypeId, PlayerId, Session, TerrainId};

#[derive(Debug)]
pub struct PainterMode {
    bindings: BindingSet,
    paint_terrain: bool,
    category_index: usize,
    /// Cursor over terrain ids or the category's types; normalized by
    /// `rem_euclid` against the current list before every use.
    item_index: i64,
    brush_type: Option<EntityTypeId>,
    brush_owner: PlayerId,
    cursor_tile: TilePos,
    cursor_world: WorldPos,
    cursor_screen: ScreenPos,
}

impl Default for PainterMode {
    fn default() -> Self {
        Self::new()
    }
}

impl PainterMode {
    pub fn new() -> Self {
        Self {
            bindings: Self::default_bindings(),
            paint_terrain: true,
            category_index: 0,
            item_index: 0,
            brush_type: None,
            brush_owner: PlayerId::default(),
            cursor_tile: TilePos::default(),
            cursor_world: WorldPos::default(),
            cursor_screen: ScreenPos::default(),
        }
    }

    fn default_bindings() -> BindingSet {
        let mut set = BindingSet::new("painter").with_pointer();
        set.bind(
            Trigger::key(Key::named(NamedKey::Space)),
            GameAction::CycleCategory,
        );
        set.bind(
            Trigger::key(Key::named(NamedKey::Right)),
            GameAction::NextItem,
        );
        set.bind(
            Trigger::key(Key::named(NamedKey::Left)),
            GameAction::PrevItem,
        );
        set
    }

    pub fn painting_terrain(&self) -> bool {
        self.paint_terrain
    }

    pub fn category_index(&self) -> usize {
        self.category_index
    }

    pub fn item_index(&self) -> i64 {
        self.item_index
    }

    pub fn brush_type(&self) -> Option<EntityTypeId> {
        self.brush_type
    }

    fn cycle_category(&mut self, ctx: &mut ControlCtx<'_>) {
        let Some(session) = ctx.session.as_deref() else {
            return;
        };
        let categories = session.type_categories();
        if self.paint_terrain {
            // No categories to move into, stay on terrain.
            if categories.is_empty() {
                return;
            }
            self.paint_terrain = false;
            self.category_index = 0;
        } else {
            self.category_index += 1;
            if self.category_index >= categories.len() {
                self.paint_terrain = true;
                self.category_index = 0;
            }
        }
        if self.paint_terrain {
            debug!("brush now terrain");
        } else {
            self.refresh_brush(session);
            debug!("brush now category {}", self.category_index);
        }
    }

    fn step_item(&mut self, direction: i64, ctx: &mut ControlCtx<'_>) {
        let Some(session) = ctx.session.as_deref() else {
            return;
        };
        if self.paint_terrain {
            let count = session.terrain_count();
            if count == 0 {
                return;
            }
            self.item_index = (self.item_index + direction).rem_euclid(count as i64);
        } else {
            let categories = session.type_categories();
            let Some(category) = categories.get(self.category_index) else {
                return;
            };
            let types = session.category_types(category);
            if types.is_empty() {
                return;
            }
            self.item_index = (self.item_index + direction).rem_euclid(types.len() as i64);
            self.brush_type = Some(types[self.item_index as usize]);
            self.brush_owner = session.focused_player();
        }
    }

    /// Snap the item index into the current category and re-derive the
    /// brush from it.
    fn refresh_brush(&mut self, session: &dyn Session) {
        let categories = session.type_categories();
        let Some(category) = categories.get(self.category_index) else {
            return;
        };
        let types = session.category_types(category);
        if types.is_empty() {
            return;
        }
        self.item_index = self.item_index.rem_euclid(types.len() as i64);
        self.brush_type = Some(types[self.item_index as usize]);
        self.brush_owner = session.focused_player();
    }

    fn current_terrain(&self, session: &dyn Session) -> Option<TerrainId> {
        let count = session.terrain_count();
        if count == 0 {
            return None;
        }
        Some(TerrainId(self.item_index.rem_euclid(count as i64) as u32))
    }

    fn paint(&self, session: &mut dyn Session) {
        if self.paint_terrain {
            if let Some(id) = self.current_terrain(session) {
                session.paint_terrain(self.cursor_tile, id);
            }
        } else {
            // An occupied tile refuses the stamp outright.
            if !session.entities_on_tile(self.cursor_tile).is_empty() {
                return;
            }
            let Some(ty) = self.brush_type else {
                return;
            };
            if session
                .create_entity(ty, self.brush_owner, self.cursor_world)
                .is_none()
            {
                debug!("cannot place type {} at {}", ty.0, self.cursor_world);
            }
        }
    }

    fn erase(&self, session: &mut dyn Session) {
        // Terrain is never erased, only painted over.
        if self.paint_terrain {
            return;
        }
        if let Some(&id) = session.entities_on_tile(self.cursor_tile).first() {
            session.remove_entity(id);
        }
    }
}

impl ModeBehavior for PainterMode {
    fn name(&self) -> &'static str {
        "Painter mode"
    }

    fn config_key(&self) -> &'static str {
        "painter"
    }

    fn available(&self, ctx: &ControlCtx<'_>) -> bool {
        ctx.session.is_some()
    }

    fn bindings(&self) -> &BindingSet {
        &self.bindings
    }

    fn bindings_mut(&mut self) -> &mut BindingSet {
        &mut self.bindings
    }

    fn handle_action(&mut self, action: GameAction, ctx: &mut ControlCtx<'_>) -> bool {
        match action {
            GameAction::CycleCategory => {
                self.cycle_category(ctx);
                true
            }
            GameAction::NextItem => {
                self.step_item(1, ctx);
                true
            }
            GameAction::PrevItem => {
                self.step_item(-1, ctx);
                true
            }
            _ => false,
        }
    }

    fn handle_pointer(&mut self, event: &PointerEvent, ctx: &mut ControlCtx<'_>) -> bool {
        self.cursor_screen = event.screen;
        let Some(session) = ctx.session.as_deref_mut() else {
            return false;
        };
        self.cursor_world = session.world_at(event.screen);
        self.cursor_tile = self.cursor_world.to_tile();

        let press_left = matches!(
            event.kind,
            PointerKind::Button {
                button: MouseButton::Left,
                phase: PointerPhase::Press,
            }
        );
        let press_right = matches!(
            event.kind,
            PointerKind::Button {
                button: MouseButton::Right,
                phase: PointerPhase::Press,
            }
        );
        if press_left || event.held.left {
            self.paint(session);
            true
        } else if press_right || event.held.right {
            self.erase(session);
            true
        } else {
            false
        }
    }

    fn render(&self, ctx: &mut RenderCtx<'_>) {
        let Some(session) = ctx.session else {
            ctx.hud
                .text(ScreenPos::new(0, 140), 12, "Painter mode requires a game");
            return;
        };
        let size = ctx.hud.viewport();
        let label_pos = ScreenPos::new(12, size.height - 24);

        if self.paint_terrain {
            if let Some(id) = self.current_terrain(session) {
                ctx.hud.tile_preview(ScreenPos::new(63, 84), id);
                ctx.hud.text(label_pos, 20, &format!("Terrain {}", id.0));
            }
        } else if let Some(ty) = self.brush_type {
            ctx.hud
                .entity_preview(ScreenPos::new(163, 154), ty, self.brush_owner);
            let categories = session.type_categories();
            let category = categories
                .get(self.category_index)
                .map(String::as_str)
                .unwrap_or_default();
            let owner = session
                .player(self.brush_owner)
                .map(|p| p.name)
                .unwrap_or_else(|| self.brush_owner.to_string());
            ctx.hud.text(
                label_pos,
                20,
                &format!("{owner}: {category} - {}", session.type_name(ty)),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{left_drag, left_press, right_press, FakeSession, TextHud};

    fn session_with_types() -> FakeSession {
        let mut session = FakeSession::new();
        session.terrain_kinds = 8;
        session.categories = vec![
            (
                "military".to_owned(),
                vec![EntityTypeId(1), EntityTypeId(2), EntityTypeId(3)],
            ),
            ("civilian".to_owned(), vec![EntityTypeId(4)]),
            ("buildings".to_owned(), vec![EntityTypeId(5), EntityTypeId(6)]),
        ];
        session
    }

    fn cycle(mode: &mut PainterMode, session: &mut FakeSession) {
        let mut ctx = ControlCtx::new(Some(session), None);
        mode.handle_action(GameAction::CycleCategory, &mut ctx);
    }

    fn step(mode: &mut PainterMode, session: &mut FakeSession, action: GameAction) {
        let mut ctx = ControlCtx::new(Some(session), None);
        mode.handle_action(action, &mut ctx);
    }

    #[test]
    fn unavailable_without_a_session() {
        let mode = PainterMode::new();
        assert!(!mode.available(&ControlCtx::detached()));
    }

    #[test]
    fn cycle_walks_categories_then_wraps_to_terrain() {
        let mut session = session_with_types();
        let mut mode = PainterMode::new();
        assert!(mode.painting_terrain());

        cycle(&mut mode, &mut session);
        assert!(!mode.painting_terrain());
        assert_eq!(mode.category_index(), 0);
        cycle(&mut mode, &mut session);
        assert_eq!(mode.category_index(), 1);
        cycle(&mut mode, &mut session);
        assert_eq!(mode.category_index(), 2);

        // Past the last category: back to terrain, category reset.
        cycle(&mut mode, &mut session);
        assert!(mode.painting_terrain());
        assert_eq!(mode.category_index(), 0);
    }

    #[test]
    fn cycle_without_categories_stays_on_terrain() {
        let mut session = FakeSession::new();
        session.terrain_kinds = 4;
        let mut mode = PainterMode::new();
        cycle(&mut mode, &mut session);
        assert!(mode.painting_terrain());
    }

    #[test]
    fn cycle_snaps_the_item_index_into_the_category() {
        let mut session = session_with_types();
        let mut mode = PainterMode::new();
        // Walk the terrain index up to 5 (of 8 kinds).
        for _ in 0..5 {
            step(&mut mode, &mut session, GameAction::NextItem);
        }
        assert_eq!(mode.item_index(), 5);

        // First category has 3 types: 5 mod 3 = 2.
        cycle(&mut mode, &mut session);
        assert_eq!(mode.item_index(), 2);
        assert_eq!(mode.brush_type(), Some(EntityTypeId(3)));
    }

    #[test]
    fn step_wraps_both_directions() {
        let mut session = session_with_types();
        let mut mode = PainterMode::new();
        step(&mut mode, &mut session, GameAction::PrevItem);
        assert_eq!(mode.item_index(), 7);
        step(&mut mode, &mut session, GameAction::NextItem);
        assert_eq!(mode.item_index(), 0);
    }

    #[test]
    fn stepping_in_entity_flavor_refreshes_the_brush() {
        let mut session = session_with_types();
        let mut mode = PainterMode::new();
        cycle(&mut mode, &mut session);
        assert_eq!(mode.brush_type(), Some(EntityTypeId(1)));
        step(&mut mode, &mut session, GameAction::NextItem);
        assert_eq!(mode.brush_type(), Some(EntityTypeId(2)));
        step(&mut mode, &mut session, GameAction::PrevItem);
        step(&mut mode, &mut session, GameAction::PrevItem);
        assert_eq!(mode.item_index(), 2);
        assert_eq!(mode.brush_type(), Some(EntityTypeId(3)));
    }

    #[test]
    fn painting_terrain_creates_the_chunk() {
        let mut session = session_with_types();
        let mut mode = PainterMode::new();
        step(&mut mode, &mut session, GameAction::NextItem);
        step(&mut mode, &mut session, GameAction::NextItem);

        let mut ctx = ControlCtx::new(Some(&mut session), None);
        assert!(mode.handle_pointer(&left_press(40, 3), &mut ctx));
        drop(ctx);
        assert_eq!(session.terrain_at(TilePos::new(40, 3)), Some(TerrainId(2)));
        // Untouched region has no chunk yet.
        assert_eq!(session.terrain_at(TilePos::new(-200, 0)), None);
    }

    #[test]
    fn painting_beyond_the_terrain_table_wraps() {
        let mut session = session_with_types();
        let mut mode = PainterMode::new();
        mode.item_index = -1;
        let mut ctx = ControlCtx::new(Some(&mut session), None);
        mode.handle_pointer(&left_press(0, 0), &mut ctx);
        drop(ctx);
        assert_eq!(session.terrain_at(TilePos::new(0, 0)), Some(TerrainId(7)));
    }

    #[test]
    fn dragging_paints_every_tile_crossed() {
        let mut session = session_with_types();
        let mut mode = PainterMode::new();
        let mut ctx = ControlCtx::new(Some(&mut session), None);
        mode.handle_pointer(&left_press(0, 0), &mut ctx);
        mode.handle_pointer(&left_drag(1, 0), &mut ctx);
        mode.handle_pointer(&left_drag(2, 0), &mut ctx);
        drop(ctx);
        for x in 0..3 {
            assert_eq!(session.terrain_at(TilePos::new(x, 0)), Some(TerrainId(0)));
        }
    }

    #[test]
    fn entity_paint_on_an_occupied_tile_is_refused() {
        let mut session = session_with_types();
        session.add_entity(EntityTypeId(9), PlayerId(1), WorldPos::new(10.5, 10.5));
        let mut mode = PainterMode::new();
        cycle(&mut mode, &mut session);

        let mut ctx = ControlCtx::new(Some(&mut session), None);
        assert!(mode.handle_pointer(&left_press(10, 10), &mut ctx));
        drop(ctx);
        assert_eq!(session.entities.len(), 1);
        assert_eq!(session.entities[0].ty, EntityTypeId(9));
    }

    #[test]
    fn entity_paint_fills_an_empty_tile() {
        let mut session = session_with_types();
        let mut mode = PainterMode::new();
        cycle(&mut mode, &mut session);

        let mut ctx = ControlCtx::new(Some(&mut session), None);
        mode.handle_pointer(&left_press(10, 10), &mut ctx);
        drop(ctx);
        assert_eq!(session.entities.len(), 1);
        assert_eq!(session.entities[0].ty, EntityTypeId(1));
        assert_eq!(session.entities[0].pos, WorldPos::new(10.0, 10.0));
    }

    #[test]
    fn erase_removes_only_the_first_occupant() {
        let mut session = session_with_types();
        let first = session.add_entity(EntityTypeId(9), PlayerId(1), WorldPos::new(10.2, 10.2));
        let second = session.add_entity(EntityTypeId(9), PlayerId(1), WorldPos::new(10.8, 10.8));
        let mut mode = PainterMode::new();
        cycle(&mut mode, &mut session);

        let mut ctx = ControlCtx::new(Some(&mut session), None);
        assert!(mode.handle_pointer(&right_press(10, 10), &mut ctx));
        drop(ctx);
        assert_eq!(session.entities.len(), 1);
        assert_eq!(session.entities[0].id, second);
        assert!(session.entities.iter().all(|e| e.id != first));
    }

    #[test]
    fn erase_never_touches_terrain() {
        let mut session = session_with_types();
        let mut mode = PainterMode::new();
        let mut ctx = ControlCtx::new(Some(&mut session), None);
        mode.handle_pointer(&left_press(3, 3), &mut ctx);
        // Terrain flavor: the erase gesture is consumed but does nothing.
        assert!(mode.handle_pointer(&right_press(3, 3), &mut ctx));
        drop(ctx);
        assert_eq!(session.terrain_at(TilePos::new(3, 3)), Some(TerrainId(0)));
    }

    #[test]
    fn render_shows_the_terrain_brush() {
        let session = session_with_types();
        let mut mode = PainterMode::new();
        mode.item_index = 3;
        let mut hud = TextHud::new(800, 600);
        {
            let mut ctx = RenderCtx::new(Some(&session), None, &mut hud);
            mode.render(&mut ctx);
        }
        assert_eq!(hud.texts(), vec!["Terrain 3"]);
    }

    #[test]
    fn render_names_the_entity_brush() {
        let mut session = session_with_types();
        let mut mode = PainterMode::new();
        cycle(&mut mode, &mut session);
        let mut hud = TextHud::new(800, 600);
        {
            let mut ctx = RenderCtx::new(Some(&session), None, &mut hud);
            mode.render(&mut ctx);
        }
        let texts = hud.texts();
        assert_eq!(texts.len(), 1);
        assert!(texts[0].contains("military - "));
    }

    #[test]
    fn render_without_session_reports_it() {
        let mode = PainterMode::new();
        let mut hud = TextHud::new(800, 600);
        {
            let mut ctx = RenderCtx::new(None, None, &mut hud);
            mode.render(&mut ctx);
        }
        assert_eq!(hud.texts(), vec!["Painter mode requires a game"]);
    }
}
