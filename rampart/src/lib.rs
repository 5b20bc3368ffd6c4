//! Modal interaction control for an RTS client.
//!
//! The host feeds decoded input into a [`ModeController`], which resolves
//! it against a stack of binding contexts and dispatches to the active
//! mode: the inspector (browse and edit generator variables), the command
//! mode (select units, issue orders, place buildings), or the painter
//! (stamp terrain and entities onto the map). Game state stays on the
//! host side of the [`Session`] seam; drawing goes back out through
//! [`HudPainter`].

pub mod action;
pub mod binding;
pub mod command;
pub mod config;
pub mod controller;
pub mod coord;
pub mod hud;
pub mod input;
pub mod mode;
pub mod modes;
pub mod selection;
pub mod value;
pub mod world;

#[cfg(any(test, feature = "test-support"))]
pub mod testing;

pub use rampart_log as log;

pub use action::GameAction;
pub use binding::{BindingSet, ContextId, ContextStack, Trigger};
pub use config::KeymapConfig;
pub use controller::{ModeController, COMMAND, INSPECTOR, PAINTER};
pub use hud::HudPainter;
pub use input::{InputEvent, Key, PointerEvent};
pub use mode::{ControlCtx, ModeBehavior, ModeVariant, RenderCtx};
pub use value::{Registry, Value, ValueStore};
pub use world::Session;
