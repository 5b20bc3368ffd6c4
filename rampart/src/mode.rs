//! The mode interface and its dispatch enum.
//!
//! The three interaction modes are one tagged enum behind one trait;
//! [`enum_dispatch`] generates the forwarding so the controller stores
//! them in a plain `Vec<ModeVariant>` without boxing.

use enum_dispatch::enum_dispatch;
use smallvec::SmallVec;

use crate::action::GameAction;
use crate::binding::{BindingSet, StackOp, SubContext};
use crate::hud::HudPainter;
use crate::input::PointerEvent;
use crate::modes::{CommandMode, InspectorMode, PainterMode};
use crate::value::ValueStore;
use crate::world::Session;

/// Handles passed into every mode operation.
///
/// The session and value store are borrowed from the embedding client per
/// event; there is no global engine state. Stack mutations requested by
/// handlers are queued and applied by the controller after dispatch.
pub struct ControlCtx<'a> {
    pub session: Option<&'a mut dyn Session>,
    pub values: Option<&'a mut dyn ValueStore>,
    pub(crate) stack_ops: SmallVec<[StackOp; 2]>,
    /// The pointer event a mouse-bound action was resolved from, so the
    /// handler sees the exact click position.
    pub(crate) pointer: Option<PointerEvent>,
}

impl<'a> ControlCtx<'a> {
    pub fn new(
        session: Option<&'a mut dyn Session>,
        values: Option<&'a mut dyn ValueStore>,
    ) -> Self {
        Self {
            session,
            values,
            stack_ops: SmallVec::new(),
            pointer: None,
        }
    }

    /// A context with no game attached (menus, tests).
    pub fn detached() -> ControlCtx<'static> {
        ControlCtx::new(None, None)
    }

    pub fn has_session(&self) -> bool {
        self.session.is_some()
    }
}

/// Read-only handles for drawing.
pub struct RenderCtx<'a> {
    pub session: Option<&'a dyn Session>,
    pub values: Option<&'a dyn ValueStore>,
    pub hud: &'a mut dyn HudPainter,
}

impl<'a> RenderCtx<'a> {
    pub fn new(
        session: Option<&'a dyn Session>,
        values: Option<&'a dyn ValueStore>,
        hud: &'a mut dyn HudPainter,
    ) -> Self {
        Self {
            session,
            values,
            hud,
        }
    }
}

/// Behavior shared by all interaction modes.
#[enum_dispatch]
pub trait ModeBehavior {
    /// Display name for the HUD.
    fn name(&self) -> &'static str;

    /// Section key in the keymap config.
    fn config_key(&self) -> &'static str;

    /// Whether the mode can become active right now.
    fn available(&self, _ctx: &ControlCtx<'_>) -> bool {
        true
    }

    /// Called when the mode becomes active, before its context registers.
    fn on_enter(&mut self, _ctx: &mut ControlCtx<'_>) {}

    /// The mode's own binding context.
    fn bindings(&self) -> &BindingSet;

    fn bindings_mut(&mut self) -> &mut BindingSet;

    /// Binding table of a sub-context this mode can push.
    fn sub_bindings(&self, _sub: SubContext) -> Option<&BindingSet> {
        None
    }

    /// Handle a resolved action. Returning false lets lower context layers
    /// try the same trigger.
    fn handle_action(&mut self, action: GameAction, ctx: &mut ControlCtx<'_>) -> bool;

    /// Handle a raw pointer event (only offered when the mode's binding
    /// set declares pointer interest).
    fn handle_pointer(&mut self, _event: &PointerEvent, _ctx: &mut ControlCtx<'_>) -> bool {
        false
    }

    /// Handle one character of text input (only offered when the mode's
    /// binding set declares text interest).
    fn handle_text(&mut self, _ch: char) -> bool {
        false
    }

    /// Draw the mode's own HUD (below the controller's binding overlay).
    fn render(&self, ctx: &mut RenderCtx<'_>);
}

/// The fixed mode roster as one dispatchable value.
#[enum_dispatch(ModeBehavior)]
#[derive(Debug)]
pub enum ModeVariant {
    Inspector(InspectorMode),
    Painter(PainterMode),
    Command(CommandMode),
}
