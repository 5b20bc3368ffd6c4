//! Command mode: select units and order them around.
//!
//! Pointer presses anchor a drag rectangle, releases resolve it into the
//! selection (replace or extend). Secondary clicks compose a command for
//! the clicked entity or position, stamped with the current ability
//! override and the direct flag. Building hotkeys start a placement: a
//! sub-context goes on top of the binding stack so clicks confirm the
//! placement instead of selecting, until a non-repeating confirm or a
//! cancel pops it.

use rand::{rngs::StdRng, Rng, SeedableRng};
use tracing::debug;

use crate::action::GameAction;
use crate::binding::{BindingSet, StackOp, SubContext, Trigger};
use crate::command::{Ability, Command, CommandTarget};
use crate::coord::{ScreenPos, WorldPos};
use crate::input::{Key, Modifiers, MouseButton, NamedKey, PointerEvent, PointerKind, PointerPhase};
use crate::mode::{ControlCtx, ModeBehavior, RenderCtx};
use crate::selection::UnitSelection;
use crate::world::EntityTypeId;

#[derive(Debug)]
pub struct CommandMode {
    bindings: BindingSet,
    placement_bindings: BindingSet,
    ability_override: Option<Ability>,
    /// Building type being placed; set iff the placement sub-context is
    /// on the stack.
    placement: Option<EntityTypeId>,
    selection: UnitSelection,
    cursor_screen: ScreenPos,
    cursor_world: WorldPos,
    /// Only used to pick between the two train variants. Fixed seed keeps
    /// replays deterministic.
    rng: StdRng,
}

impl Default for CommandMode {
    fn default() -> Self {
        Self::new()
    }
}

impl CommandMode {
    pub fn new() -> Self {
        Self {
            bindings: Self::default_bindings(),
            placement_bindings: Self::default_placement_bindings(),
            ability_override: None,
            placement: None,
            selection: UnitSelection::new(),
            cursor_screen: ScreenPos::default(),
            cursor_world: WorldPos::default(),
            rng: StdRng::seed_from_u64(0),
        }
    }

    fn default_bindings() -> BindingSet {
        let mut set = BindingSet::new("command").with_pointer();
        set.bind(Trigger::key(Key::char('t')), GameAction::TrainUnit);
        set.bind(Trigger::key(Key::char('y')), GameAction::SpawnUnit);
        set.bind(
            Trigger::key(Key::named(NamedKey::Delete)),
            GameAction::KillSelection,
        );
        set.bind(Trigger::key(Key::char('x')), GameAction::ClearAbility);
        set.bind(Trigger::key(Key::char('m')), GameAction::AbilityMove);
        set.bind(Trigger::key(Key::char('g')), GameAction::AbilityGather);
        set.bind(Trigger::key(Key::char('r')), GameAction::AbilityGarrison);
        for slot in 0..9u8 {
            let key = char::from(b'1' + slot);
            set.bind(Trigger::key(Key::char(key)), GameAction::OpenPlacement(slot));
        }
        set.bind(Trigger::release(MouseButton::Left), GameAction::Select);
        set.bind(
            Trigger::release(MouseButton::Left).with_modifiers(Modifiers::ctrl()),
            GameAction::ExtendSelection,
        );
        set.bind(Trigger::press(MouseButton::Right), GameAction::Order);
        set
    }

    fn default_placement_bindings() -> BindingSet {
        let mut set = BindingSet::new("placement");
        set.bind(
            Trigger::press(MouseButton::Left),
            GameAction::ConfirmPlacement,
        );
        set.bind(
            Trigger::press(MouseButton::Left).with_modifiers(Modifiers::shift()),
            GameAction::RepeatPlacement,
        );
        set
    }

    pub fn ability(&self) -> Option<Ability> {
        self.ability_override
    }

    pub fn placement(&self) -> Option<EntityTypeId> {
        self.placement
    }

    pub fn selection(&self) -> &UnitSelection {
        &self.selection
    }

    pub fn cursor_world(&self) -> WorldPos {
        self.cursor_world
    }

    /// Refresh the cursor from the pointer event carried by the context,
    /// so mouse-bound actions act on the exact click position.
    fn track_pointer(&mut self, ctx: &ControlCtx<'_>) {
        if let Some(event) = ctx.pointer {
            self.cursor_screen = event.screen;
            if let Some(session) = ctx.session.as_deref() {
                self.cursor_world = session.world_at(event.screen);
            }
        }
    }

    fn open_placement(&mut self, slot: u8, ctx: &mut ControlCtx<'_>) {
        let Some(session) = ctx.session.as_deref() else {
            return;
        };
        let catalog = session.building_catalog(session.focused_player());
        let Some(&ty) = catalog.get(slot as usize) else {
            debug!("no building in slot {}", slot + 1);
            return;
        };
        if !self.selection.contains_builders(session) {
            debug!("placement needs a construction-capable selection");
            return;
        }
        // A hotkey during placement switches the stamp; the sub-context
        // goes up only once.
        if self.placement.is_none() {
            ctx.stack_ops.push(StackOp::Push(SubContext::Placement));
        }
        self.placement = Some(ty);
        debug!("placing building type {}", ty.0);
    }

    fn confirm_placement(&mut self, ctx: &mut ControlCtx<'_>, repeat: bool) {
        self.track_pointer(ctx);
        if let Some(ty) = self.placement {
            if let Some(session) = ctx.session.as_deref_mut() {
                let player = session.focused_player();
                match session.create_entity(ty, player, self.cursor_world) {
                    Some(id) => {
                        let command = Command::direct(player, CommandTarget::Entity(id))
                            .with_ability(Some(Ability::Build));
                        self.selection.issue(session, &command);
                        debug!("placed building {:?} at {}", id, self.cursor_world);
                    }
                    None => debug!("cannot place a building at {}", self.cursor_world),
                }
            }
        }
        if !repeat {
            self.stop_placement(ctx);
        }
    }

    fn stop_placement(&mut self, ctx: &mut ControlCtx<'_>) {
        if self.placement.take().is_some() {
            ctx.stack_ops.push(StackOp::Pop(SubContext::Placement));
        }
    }

    fn order(&mut self, ctx: &mut ControlCtx<'_>) {
        self.track_pointer(ctx);
        // A pending placement is cancelled first; the order still goes out.
        self.stop_placement(ctx);
        let Some(session) = ctx.session.as_deref_mut() else {
            return;
        };
        let target = match session.entity_at(self.cursor_world) {
            Some(id) => CommandTarget::Entity(id),
            None => CommandTarget::Position(self.cursor_world),
        };
        let command = Command::direct(session.focused_player(), target)
            .with_ability(self.ability_override);
        self.selection.issue(session, &command);
        // An armed ability stamps exactly one order.
        self.ability_override = None;
        debug!("ordered {} entities at {:?}", self.selection.len(), target);
    }

    fn finish_drag(&mut self, ctx: &mut ControlCtx<'_>, extend: bool) {
        self.track_pointer(ctx);
        let Some(session) = ctx.session.as_deref() else {
            self.selection.cancel_drag();
            return;
        };
        self.selection.drag_update(self.cursor_screen);
        self.selection.drag_release(session, extend);
    }

    fn train(&mut self, ctx: &mut ControlCtx<'_>) {
        let Some(session) = ctx.session.as_deref_mut() else {
            return;
        };
        let player = session.focused_player();
        let Some((a, b)) = session.train_variants(player) else {
            debug!("no trainable variants for {player}");
            return;
        };
        let ty = if self.rng.gen_bool(0.5) { a } else { b };
        let command = Command::direct(player, CommandTarget::Produce(ty));
        self.selection.issue(session, &command);
        debug!("training type {} on {} entities", ty.0, self.selection.len());
    }

    fn spawn(&mut self, ctx: &mut ControlCtx<'_>) {
        let Some(session) = ctx.session.as_deref_mut() else {
            return;
        };
        let player = session.focused_player();
        let Some(ty) = session.spawn_type(player) else {
            return;
        };
        match session.create_entity(ty, player, self.cursor_world) {
            Some(id) => debug!("spawned {:?} at {}", id, self.cursor_world),
            None => debug!("cannot spawn at {}", self.cursor_world),
        }
    }
}

impl ModeBehavior for CommandMode {
    fn name(&self) -> &'static str {
        "Command mode"
    }

    fn config_key(&self) -> &'static str {
        "command"
    }

    fn available(&self, ctx: &ControlCtx<'_>) -> bool {
        ctx.session.is_some()
    }

    fn on_enter(&mut self, _ctx: &mut ControlCtx<'_>) {
        // The mode's contexts were rebuilt on switch, so transient state
        // starts over: nothing selected, nothing being placed.
        self.selection.clear();
        self.placement = None;
        self.ability_override = None;
    }

    fn bindings(&self) -> &BindingSet {
        &self.bindings
    }

    fn bindings_mut(&mut self) -> &mut BindingSet {
        &mut self.bindings
    }

    fn sub_bindings(&self, sub: SubContext) -> Option<&BindingSet> {
        match sub {
            SubContext::Placement => Some(&self.placement_bindings),
        }
    }

    fn handle_action(&mut self, action: GameAction, ctx: &mut ControlCtx<'_>) -> bool {
        match action {
            GameAction::ClearAbility => {
                self.ability_override = None;
                true
            }
            GameAction::AbilityMove => {
                self.ability_override = Some(Ability::Move);
                true
            }
            GameAction::AbilityGather => {
                self.ability_override = Some(Ability::Gather);
                true
            }
            GameAction::AbilityGarrison => {
                self.ability_override = Some(Ability::Garrison);
                true
            }
            GameAction::OpenPlacement(slot) => {
                self.open_placement(slot, ctx);
                true
            }
            GameAction::ConfirmPlacement => {
                self.confirm_placement(ctx, false);
                true
            }
            GameAction::RepeatPlacement => {
                self.confirm_placement(ctx, true);
                true
            }
            GameAction::Select => {
                self.finish_drag(ctx, false);
                true
            }
            GameAction::ExtendSelection => {
                self.finish_drag(ctx, true);
                true
            }
            GameAction::Order => {
                self.order(ctx);
                true
            }
            GameAction::TrainUnit => {
                self.train(ctx);
                true
            }
            GameAction::SpawnUnit => {
                self.spawn(ctx);
                true
            }
            GameAction::KillSelection => {
                if let Some(session) = ctx.session.as_deref_mut() {
                    self.selection.kill(session);
                }
                true
            }
            _ => false,
        }
    }

    fn handle_pointer(&mut self, event: &PointerEvent, ctx: &mut ControlCtx<'_>) -> bool {
        self.cursor_screen = event.screen;
        if let Some(session) = ctx.session.as_deref() {
            self.cursor_world = session.world_at(event.screen);
        }
        match event.kind {
            PointerKind::Move => {
                if event.held.left && self.placement.is_none() {
                    self.selection.drag_update(event.screen);
                    return true;
                }
                false
            }
            PointerKind::Button {
                button: MouseButton::Left,
                phase: PointerPhase::Press,
            } if self.placement.is_none() => {
                self.selection.drag_begin(event.screen);
                true
            }
            _ => false,
        }
    }

    fn render(&self, ctx: &mut RenderCtx<'_>) {
        let size = ctx.hud.viewport();
        let Some(session) = ctx.session else {
            ctx.hud
                .text(ScreenPos::new(0, 140), 12, "Command mode requires a game");
            return;
        };

        let player = session.focused_player();
        let stock = session.stockpile(player);
        let mut status = format!(
            "Food: {:.0} | Wood: {:.0} | Gold: {:.0} | Stone: {:.0} | Command mode",
            stock.food, stock.wood, stock.gold, stock.stone
        );
        if let Some(info) = session.player(player) {
            status.push_str(&format!(" ([{}] {})", info.color, info.name));
        }
        if let Some(ability) = self.ability_override {
            status.push_str(&format!(" ({ability})"));
        }
        ctx.hud
            .text(ScreenPos::new(5, size.height - 25), 20, &status);

        if let Some(ty) = self.placement {
            ctx.hud.entity_preview(self.cursor_screen, ty, player);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{left_drag, left_press, FakeSession, TextHud};
    use crate::world::{EntityId, PlayerId};

    fn session_with_units() -> (FakeSession, EntityId, EntityId) {
        let mut session = FakeSession::new();
        session.builders.insert(EntityTypeId(10));
        session.buildings = vec![EntityTypeId(70), EntityTypeId(68)];
        let builder = session.add_entity(EntityTypeId(10), PlayerId(1), WorldPos::new(5.0, 5.0));
        let soldier = session.add_entity(EntityTypeId(11), PlayerId(1), WorldPos::new(8.0, 8.0));
        (session, builder, soldier)
    }

    fn select_all(mode: &mut CommandMode, session: &mut FakeSession) {
        let mut ctx = ControlCtx::new(Some(session), None);
        mode.handle_pointer(&left_press(0, 0), &mut ctx);
        mode.handle_pointer(&left_drag(20, 20), &mut ctx);
        ctx.pointer = Some(left_drag(20, 20));
        mode.handle_action(GameAction::Select, &mut ctx);
    }

    #[test]
    fn unavailable_without_a_session() {
        let mode = CommandMode::new();
        assert!(!mode.available(&ControlCtx::detached()));
    }

    #[test]
    fn drag_release_replaces_selection() {
        let (mut session, builder, soldier) = session_with_units();
        let mut mode = CommandMode::new();
        select_all(&mut mode, &mut session);
        assert_eq!(mode.selection().len(), 2);
        assert!(mode.selection().contains(builder));
        assert!(mode.selection().contains(soldier));

        // A new drag around only the builder replaces the set.
        let mut ctx = ControlCtx::new(Some(&mut session), None);
        mode.handle_pointer(&left_press(4, 4), &mut ctx);
        mode.handle_pointer(&left_drag(6, 6), &mut ctx);
        ctx.pointer = Some(left_drag(6, 6));
        mode.handle_action(GameAction::Select, &mut ctx);
        assert_eq!(mode.selection().ids(), &[builder]);
    }

    #[test]
    fn extend_selection_keeps_existing_ids() {
        let (mut session, builder, soldier) = session_with_units();
        let mut mode = CommandMode::new();

        let mut ctx = ControlCtx::new(Some(&mut session), None);
        mode.handle_pointer(&left_press(4, 4), &mut ctx);
        mode.handle_pointer(&left_drag(6, 6), &mut ctx);
        ctx.pointer = Some(left_drag(6, 6));
        mode.handle_action(GameAction::Select, &mut ctx);
        assert_eq!(mode.selection().ids(), &[builder]);

        mode.handle_pointer(&left_press(7, 7), &mut ctx);
        mode.handle_pointer(&left_drag(9, 9), &mut ctx);
        ctx.pointer = Some(left_drag(9, 9));
        mode.handle_action(GameAction::ExtendSelection, &mut ctx);
        assert_eq!(mode.selection().len(), 2);
        assert!(mode.selection().contains(soldier));
    }

    #[test]
    fn placement_requires_builders_in_selection() {
        let (mut session, _, _) = session_with_units();
        let mut mode = CommandMode::new();
        let mut ctx = ControlCtx::new(Some(&mut session), None);
        mode.handle_action(GameAction::OpenPlacement(0), &mut ctx);
        assert_eq!(mode.placement(), None);
        assert!(ctx.stack_ops.is_empty());
    }

    #[test]
    fn placement_opens_with_a_builder_selected() {
        let (mut session, _, _) = session_with_units();
        let mut mode = CommandMode::new();
        select_all(&mut mode, &mut session);

        let mut ctx = ControlCtx::new(Some(&mut session), None);
        mode.handle_action(GameAction::OpenPlacement(0), &mut ctx);
        assert_eq!(mode.placement(), Some(EntityTypeId(70)));
        assert_eq!(
            ctx.stack_ops.as_slice(),
            &[StackOp::Push(SubContext::Placement)]
        );
    }

    #[test]
    fn hotkey_during_placement_switches_the_stamp() {
        let (mut session, _, _) = session_with_units();
        let mut mode = CommandMode::new();
        select_all(&mut mode, &mut session);

        let mut ctx = ControlCtx::new(Some(&mut session), None);
        mode.handle_action(GameAction::OpenPlacement(0), &mut ctx);
        mode.handle_action(GameAction::OpenPlacement(1), &mut ctx);
        assert_eq!(mode.placement(), Some(EntityTypeId(68)));
        // One placement context for the whole exchange.
        assert_eq!(
            ctx.stack_ops.as_slice(),
            &[StackOp::Push(SubContext::Placement)]
        );

        ctx.pointer = Some(left_press(40, 40));
        mode.handle_action(GameAction::ConfirmPlacement, &mut ctx);
        drop(ctx);

        // The confirmed building is the one from the second hotkey.
        assert!(session.entities.iter().any(|e| e.ty == EntityTypeId(68)));
        assert!(session.entities.iter().all(|e| e.ty != EntityTypeId(70)));
    }

    #[test]
    fn unknown_slot_is_refused() {
        let (mut session, _, _) = session_with_units();
        let mut mode = CommandMode::new();
        select_all(&mut mode, &mut session);
        let mut ctx = ControlCtx::new(Some(&mut session), None);
        mode.handle_action(GameAction::OpenPlacement(7), &mut ctx);
        assert_eq!(mode.placement(), None);
    }

    #[test]
    fn confirm_creates_and_issues_build_to_selection() {
        let (mut session, builder, soldier) = session_with_units();
        let mut mode = CommandMode::new();
        select_all(&mut mode, &mut session);

        let mut ctx = ControlCtx::new(Some(&mut session), None);
        mode.handle_action(GameAction::OpenPlacement(0), &mut ctx);
        ctx.pointer = Some(left_press(40, 40));
        mode.handle_action(GameAction::ConfirmPlacement, &mut ctx);
        drop(ctx);

        assert_eq!(mode.placement(), None);
        let placed = session
            .entities
            .iter()
            .find(|e| e.ty == EntityTypeId(70))
            .expect("building created");
        assert_eq!(placed.pos, WorldPos::new(40.0, 40.0));
        // Both selected entities got the build command.
        assert_eq!(session.commands.len(), 2);
        for (id, command) in &session.commands {
            assert!(*id == builder || *id == soldier);
            assert_eq!(command.ability, Some(Ability::Build));
            assert!(command.direct);
            assert_eq!(command.target, CommandTarget::Entity(placed.id));
        }
    }

    #[test]
    fn repeat_keeps_the_placement_open() {
        let (mut session, _, _) = session_with_units();
        let mut mode = CommandMode::new();
        select_all(&mut mode, &mut session);

        let mut ctx = ControlCtx::new(Some(&mut session), None);
        mode.handle_action(GameAction::OpenPlacement(1), &mut ctx);
        ctx.stack_ops.clear();
        ctx.pointer = Some(left_press(40, 40));
        mode.handle_action(GameAction::RepeatPlacement, &mut ctx);
        assert_eq!(mode.placement(), Some(EntityTypeId(68)));
        assert!(ctx.stack_ops.is_empty());

        ctx.pointer = Some(left_press(60, 60));
        mode.handle_action(GameAction::ConfirmPlacement, &mut ctx);
        assert_eq!(mode.placement(), None);
        assert_eq!(
            ctx.stack_ops.as_slice(),
            &[StackOp::Pop(SubContext::Placement)]
        );
        drop(ctx);
        assert_eq!(
            session
                .entities
                .iter()
                .filter(|e| e.ty == EntityTypeId(68))
                .count(),
            2
        );
    }

    #[test]
    fn failed_create_issues_no_command_but_closes_placement() {
        let (mut session, _, _) = session_with_units();
        let mut mode = CommandMode::new();
        select_all(&mut mode, &mut session);
        session.commands.clear();

        let mut ctx = ControlCtx::new(Some(&mut session), None);
        mode.handle_action(GameAction::OpenPlacement(0), &mut ctx);
        // The builder itself occupies (5, 5).
        ctx.pointer = Some(left_press(5, 5));
        mode.handle_action(GameAction::ConfirmPlacement, &mut ctx);
        drop(ctx);

        assert_eq!(mode.placement(), None);
        assert!(session.commands.is_empty());
        assert!(session.entities.iter().all(|e| e.ty != EntityTypeId(70)));
    }

    #[test]
    fn order_cancels_placement_then_targets_position() {
        let (mut session, builder, _) = session_with_units();
        let mut mode = CommandMode::new();
        select_all(&mut mode, &mut session);
        session.commands.clear();

        let mut ctx = ControlCtx::new(Some(&mut session), None);
        mode.handle_action(GameAction::OpenPlacement(0), &mut ctx);
        ctx.stack_ops.clear();
        ctx.pointer = Some(left_press(50, 50));
        mode.handle_action(GameAction::Order, &mut ctx);
        assert_eq!(mode.placement(), None);
        assert_eq!(
            ctx.stack_ops.as_slice(),
            &[StackOp::Pop(SubContext::Placement)]
        );
        drop(ctx);

        // No building appeared, but the order went out.
        assert!(session.entities.iter().all(|e| e.ty != EntityTypeId(70)));
        assert!(session
            .commands
            .iter()
            .any(|(id, c)| *id == builder
                && c.target == CommandTarget::Position(WorldPos::new(50.0, 50.0))));
    }

    #[test]
    fn order_prefers_an_entity_under_the_cursor() {
        let (mut session, builder, soldier) = session_with_units();
        let mut mode = CommandMode::new();

        let mut ctx = ControlCtx::new(Some(&mut session), None);
        mode.handle_pointer(&left_press(4, 4), &mut ctx);
        mode.handle_pointer(&left_drag(6, 6), &mut ctx);
        ctx.pointer = Some(left_drag(6, 6));
        mode.handle_action(GameAction::Select, &mut ctx);
        assert_eq!(mode.selection().ids(), &[builder]);

        ctx.pointer = Some(left_press(8, 8));
        mode.handle_action(GameAction::Order, &mut ctx);
        drop(ctx);

        assert_eq!(session.commands.len(), 1);
        assert_eq!(session.commands[0].0, builder);
        assert_eq!(session.commands[0].1.target, CommandTarget::Entity(soldier));
        assert_eq!(session.commands[0].1.ability, None);
    }

    #[test]
    fn ability_override_arms_exactly_one_order() {
        let (mut session, builder, _) = session_with_units();
        let mut mode = CommandMode::new();

        let mut ctx = ControlCtx::new(Some(&mut session), None);
        mode.handle_pointer(&left_press(4, 4), &mut ctx);
        mode.handle_pointer(&left_drag(6, 6), &mut ctx);
        ctx.pointer = Some(left_drag(6, 6));
        mode.handle_action(GameAction::Select, &mut ctx);

        mode.handle_action(GameAction::AbilityGather, &mut ctx);
        ctx.pointer = Some(left_press(30, 30));
        mode.handle_action(GameAction::Order, &mut ctx);
        // Consumed; the next order goes out un-stamped.
        ctx.pointer = Some(left_press(31, 31));
        mode.handle_action(GameAction::Order, &mut ctx);
        drop(ctx);

        let abilities: Vec<Option<Ability>> = session
            .commands
            .iter()
            .filter(|(id, _)| *id == builder)
            .map(|(_, c)| c.ability)
            .collect();
        assert_eq!(abilities, vec![Some(Ability::Gather), None]);
    }

    #[test]
    fn clear_ability_disarms_an_unused_override() {
        let (mut session, builder, _) = session_with_units();
        let mut mode = CommandMode::new();

        let mut ctx = ControlCtx::new(Some(&mut session), None);
        mode.handle_pointer(&left_press(4, 4), &mut ctx);
        mode.handle_pointer(&left_drag(6, 6), &mut ctx);
        ctx.pointer = Some(left_drag(6, 6));
        mode.handle_action(GameAction::Select, &mut ctx);

        mode.handle_action(GameAction::AbilityMove, &mut ctx);
        mode.handle_action(GameAction::ClearAbility, &mut ctx);
        ctx.pointer = Some(left_press(30, 30));
        mode.handle_action(GameAction::Order, &mut ctx);
        drop(ctx);

        let abilities: Vec<Option<Ability>> = session
            .commands
            .iter()
            .filter(|(id, _)| *id == builder)
            .map(|(_, c)| c.ability)
            .collect();
        assert_eq!(abilities, vec![None]);
    }

    #[test]
    fn train_picks_one_of_the_two_variants() {
        let (mut session, builder, _) = session_with_units();
        session.variants = Some((EntityTypeId(83), EntityTypeId(293)));
        let mut mode = CommandMode::new();

        let mut ctx = ControlCtx::new(Some(&mut session), None);
        mode.handle_pointer(&left_press(4, 4), &mut ctx);
        mode.handle_pointer(&left_drag(6, 6), &mut ctx);
        ctx.pointer = Some(left_drag(6, 6));
        mode.handle_action(GameAction::Select, &mut ctx);
        for _ in 0..8 {
            mode.handle_action(GameAction::TrainUnit, &mut ctx);
        }
        drop(ctx);

        let produced: Vec<EntityTypeId> = session
            .commands
            .iter()
            .filter(|(id, _)| *id == builder)
            .filter_map(|(_, c)| match c.target {
                CommandTarget::Produce(ty) => Some(ty),
                _ => None,
            })
            .collect();
        assert_eq!(produced.len(), 8);
        assert!(produced
            .iter()
            .all(|ty| *ty == EntityTypeId(83) || *ty == EntityTypeId(293)));
    }

    #[test]
    fn train_choices_are_deterministic_across_runs() {
        let run = || {
            let (mut session, _, _) = session_with_units();
            session.variants = Some((EntityTypeId(83), EntityTypeId(293)));
            let mut mode = CommandMode::new();
            select_all(&mut mode, &mut session);
            session.commands.clear();
            let mut ctx = ControlCtx::new(Some(&mut session), None);
            for _ in 0..16 {
                mode.handle_action(GameAction::TrainUnit, &mut ctx);
            }
            drop(ctx);
            session
                .commands
                .iter()
                .filter_map(|(_, c)| match c.target {
                    CommandTarget::Produce(ty) => Some(ty),
                    _ => None,
                })
                .collect::<Vec<_>>()
        };
        assert_eq!(run(), run());
    }

    #[test]
    fn spawn_creates_at_the_cursor() {
        let (mut session, _, _) = session_with_units();
        session.spawnable = Some(EntityTypeId(590));
        let mut mode = CommandMode::new();

        let mut ctx = ControlCtx::new(Some(&mut session), None);
        mode.handle_pointer(&left_drag(33, 44), &mut ctx);
        mode.handle_action(GameAction::SpawnUnit, &mut ctx);
        drop(ctx);

        assert!(session
            .entities
            .iter()
            .any(|e| e.ty == EntityTypeId(590) && e.pos == WorldPos::new(33.0, 44.0)));
    }

    #[test]
    fn kill_removes_the_whole_selection() {
        let (mut session, _, _) = session_with_units();
        let mut mode = CommandMode::new();
        select_all(&mut mode, &mut session);

        let mut ctx = ControlCtx::new(Some(&mut session), None);
        mode.handle_action(GameAction::KillSelection, &mut ctx);
        drop(ctx);

        assert!(session.entities.is_empty());
        assert!(mode.selection().is_empty());
    }

    #[test]
    fn entering_the_mode_resets_transient_state() {
        let (mut session, _, _) = session_with_units();
        let mut mode = CommandMode::new();
        select_all(&mut mode, &mut session);
        let mut ctx = ControlCtx::new(Some(&mut session), None);
        mode.handle_action(GameAction::AbilityMove, &mut ctx);
        mode.handle_action(GameAction::OpenPlacement(0), &mut ctx);
        assert!(mode.placement().is_some());

        mode.on_enter(&mut ctx);
        assert!(mode.selection().is_empty());
        assert_eq!(mode.placement(), None);
        assert_eq!(mode.ability(), None);
    }

    #[test]
    fn render_without_session_reports_it() {
        let mode = CommandMode::new();
        let mut hud = TextHud::new(800, 600);
        {
            let mut ctx = RenderCtx::new(None, None, &mut hud);
            mode.render(&mut ctx);
        }
        assert_eq!(hud.texts(), vec!["Command mode requires a game"]);
    }

    #[test]
    fn render_shows_status_and_ability_suffix() {
        let (session, _, _) = session_with_units();
        let mut mode = CommandMode::new();
        mode.ability_override = Some(Ability::Move);
        let mut hud = TextHud::new(800, 600);
        {
            let mut ctx = RenderCtx::new(Some(&session), None, &mut hud);
            mode.render(&mut ctx);
        }
        let texts = hud.texts();
        assert_eq!(texts.len(), 1);
        assert!(texts[0].starts_with("Food: "));
        assert!(texts[0].contains("| Command mode"));
        assert!(texts[0].ends_with("(move)"));
    }
}
