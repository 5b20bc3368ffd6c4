//! The mode controller: roster, toggle, dispatch, binding overlay.
//!
//! Input arrives as [`InputEvent`]s and is resolved against the context
//! stack top-down. Each layer gets two chances at an event: its binding
//! table first, then the raw pointer/text hooks if its table declared
//! interest. The first handler that reports the event handled stops the
//! walk, so a placement sub-context shadows the command mode's own click
//! bindings while it is on the stack.

use smallvec::SmallVec;
use tracing::{debug, warn};

use crate::action::GameAction;
use crate::binding::{BindingSet, ContextId, ContextStack, StackOp, Trigger};
use crate::config::{ConfigError, KeymapConfig};
use crate::coord::ScreenPos;
use crate::input::{InputEvent, Key, NamedKey, PointerKind};
use crate::mode::{ControlCtx, ModeBehavior, ModeVariant, RenderCtx};
use crate::modes::{CommandMode, InspectorMode, PainterMode};

/// Roster positions; construction order is toggle order.
pub const INSPECTOR: usize = 0;
pub const PAINTER: usize = 1;
pub const COMMAND: usize = 2;

/// Hook fired after every completed mode switch.
pub type ModeChanged = Box<dyn FnMut(usize, &'static str)>;

pub struct ModeController {
    modes: Vec<ModeVariant>,
    /// Index into `modes`; always valid.
    active: usize,
    global: BindingSet,
    stack: ContextStack,
    on_change: Option<ModeChanged>,
}

impl ModeController {
    pub fn new(ctx: &mut ControlCtx<'_>) -> Self {
        let mut controller = Self {
            modes: vec![
                ModeVariant::Inspector(InspectorMode::new()),
                ModeVariant::Painter(PainterMode::new()),
                ModeVariant::Command(CommandMode::new()),
            ],
            active: INSPECTOR,
            global: Self::global_bindings(),
            stack: ContextStack::new(),
            on_change: None,
        };
        controller.modes[INSPECTOR].on_enter(ctx);
        controller.stack.push(ContextId::Mode(INSPECTOR));
        controller.apply_stack_ops(ctx);
        controller
    }

    fn global_bindings() -> BindingSet {
        let mut set = BindingSet::new("global");
        set.bind(
            Trigger::key(Key::named(NamedKey::Tab)),
            GameAction::ToggleMode,
        );
        set
    }

    pub fn active_index(&self) -> usize {
        self.active
    }

    pub fn active_name(&self) -> &'static str {
        self.modes[self.active].name()
    }

    pub fn mode(&self, index: usize) -> Option<&ModeVariant> {
        self.modes.get(index)
    }

    pub fn global(&self) -> &BindingSet {
        &self.global
    }

    /// The registered context layers, bottom (global) to top.
    pub fn contexts(&self) -> &ContextStack {
        &self.stack
    }

    pub fn on_mode_change(&mut self, hook: impl FnMut(usize, &'static str) + 'static) {
        self.on_change = Some(Box::new(hook));
    }

    /// Activate a mode by index: the previous mode's context layers leave
    /// the stack (sub-contexts included), the new mode's `on_enter` runs,
    /// then its context registers above global.
    pub fn set_mode(&mut self, index: usize, ctx: &mut ControlCtx<'_>) {
        if index >= self.modes.len() {
            warn!("no mode at index {index}");
            return;
        }
        self.stack.remove_mode_layers(self.active);
        self.active = index;
        self.modes[index].on_enter(ctx);
        self.stack.push(ContextId::Mode(index));
        self.apply_stack_ops(ctx);

        let name = self.modes[index].name();
        debug!("switched to {name}");
        if let Some(hook) = &mut self.on_change {
            hook(index, name);
        }
    }

    /// Switch to the next mode in roster order. Only the immediate next
    /// mode is probed; if it is unavailable the toggle is refused rather
    /// than skipping ahead.
    pub fn toggle_mode(&mut self, ctx: &mut ControlCtx<'_>) -> bool {
        let next = (self.active + 1) % self.modes.len();
        if !self.modes[next].available(ctx) {
            warn!("cannot switch to {}: unavailable", self.modes[next].name());
            return false;
        }
        self.set_mode(next, ctx);
        true
    }

    /// Dispatch one input event through the context stack. Returns whether
    /// any layer handled it.
    pub fn handle_event(&mut self, event: &InputEvent, ctx: &mut ControlCtx<'_>) -> bool {
        let handled = self.dispatch(event, ctx);
        self.apply_stack_ops(ctx);
        handled
    }

    fn dispatch(&mut self, event: &InputEvent, ctx: &mut ControlCtx<'_>) -> bool {
        // Handlers may switch modes or queue stack changes mid-walk, so
        // the walk runs over a snapshot of the layers.
        let layers: SmallVec<[ContextId; 4]> = self.stack.top_down().collect();
        match event {
            InputEvent::Key { key } => {
                let trigger = Trigger::key(*key);
                for layer in layers {
                    if let Some(action) = self.resolve(layer, &trigger) {
                        if self.deliver(layer, action, ctx) {
                            return true;
                        }
                    }
                }
                false
            }
            InputEvent::Text(ch) => {
                for layer in layers {
                    let wants = self.layer_bindings(layer).is_some_and(BindingSet::wants_text);
                    if !wants {
                        continue;
                    }
                    if let Some(mode) = layer.mode_index() {
                        if self.modes[mode].handle_text(*ch) {
                            return true;
                        }
                    }
                }
                false
            }
            InputEvent::Pointer(pointer) => {
                for layer in layers {
                    if let PointerKind::Button { button, phase } = pointer.kind {
                        let trigger = Trigger::Mouse {
                            button,
                            phase,
                            modifiers: pointer.modifiers,
                        };
                        if let Some(action) = self.resolve(layer, &trigger) {
                            // Hand the click position along with the action.
                            ctx.pointer = Some(*pointer);
                            let handled = self.deliver(layer, action, ctx);
                            ctx.pointer = None;
                            if handled {
                                return true;
                            }
                        }
                    }
                    let wants = self
                        .layer_bindings(layer)
                        .is_some_and(BindingSet::wants_pointer);
                    if !wants {
                        continue;
                    }
                    if let Some(mode) = layer.mode_index() {
                        if self.modes[mode].handle_pointer(pointer, ctx) {
                            return true;
                        }
                    }
                }
                false
            }
        }
    }

    fn layer_bindings(&self, layer: ContextId) -> Option<&BindingSet> {
        match layer {
            ContextId::Global => Some(&self.global),
            ContextId::Mode(i) => Some(self.modes[i].bindings()),
            ContextId::Sub { mode, sub } => self.modes[mode].sub_bindings(sub),
        }
    }

    fn resolve(&self, layer: ContextId, trigger: &Trigger) -> Option<GameAction> {
        self.layer_bindings(layer)?.resolve(trigger)
    }

    fn deliver(&mut self, layer: ContextId, action: GameAction, ctx: &mut ControlCtx<'_>) -> bool {
        match layer {
            ContextId::Global => match action {
                GameAction::ToggleMode => {
                    // A refused toggle still consumes the trigger.
                    self.toggle_mode(ctx);
                    true
                }
                _ => false,
            },
            ContextId::Mode(i) | ContextId::Sub { mode: i, .. } => {
                self.modes[i].handle_action(action, ctx)
            }
        }
    }

    /// Attach queued sub-context pushes/pops to the active mode.
    fn apply_stack_ops(&mut self, ctx: &mut ControlCtx<'_>) {
        for op in ctx.stack_ops.drain(..) {
            match op {
                StackOp::Push(sub) => self.stack.push(ContextId::Sub {
                    mode: self.active,
                    sub,
                }),
                StackOp::Pop(sub) => self.stack.remove(ContextId::Sub {
                    mode: self.active,
                    sub,
                }),
            }
        }
    }

    /// Draw the binding overlay in the top-right corner, then the active
    /// mode's own HUD.
    pub fn render(&self, ctx: &mut RenderCtx<'_>) {
        let size = ctx.hud.viewport();
        let x = size.width - 300;
        let mut y = size.height - 24;

        let mode = &self.modes[self.active];
        ctx.hud.text(ScreenPos::new(x, y), 20, mode.name());
        for line in mode.bindings().lines() {
            y -= 14;
            ctx.hud.text(ScreenPos::new(x, y), 12, &line);
        }

        y -= 20;
        ctx.hud.text(ScreenPos::new(x, y), 20, "Global Bindings");
        for line in self.global.lines() {
            y -= 14;
            ctx.hud.text(ScreenPos::new(x, y), 12, &line);
        }

        mode.render(ctx);
    }

    /// Rebind keys from a loaded keymap file. Sections address the global
    /// table or a mode by its config key; every entry must name an action
    /// that already exists in that table.
    pub fn apply_keymap(&mut self, config: &KeymapConfig) -> Result<(), ConfigError> {
        for (section, overrides) in &config.modes {
            let set = if section == "global" {
                &mut self.global
            } else {
                match self.modes.iter_mut().find(|m| m.config_key() == section) {
                    Some(mode) => mode.bindings_mut(),
                    None => return Err(ConfigError::UnknownMode(section.clone())),
                }
            };
            for (key_text, action_name) in &overrides.keys {
                let key = Key::parse(key_text).map_err(|source| ConfigError::BadKey {
                    key: key_text.clone(),
                    source,
                })?;
                let action = GameAction::parse_name(action_name).ok_or_else(|| {
                    ConfigError::UnknownAction {
                        mode: section.clone(),
                        action: action_name.clone(),
                    }
                })?;
                if !set.rebind(action, Trigger::key(key)) {
                    return Err(ConfigError::UnknownAction {
                        mode: section.clone(),
                        action: action_name.clone(),
                    });
                }
                debug!("bound {key_text} to {action_name} in {section}");
            }
        }
        Ok(())
    }
}
