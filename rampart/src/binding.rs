//! Binding tables and the context stack.
//!
//! A [`BindingSet`] is a named table mapping [`Trigger`]s to
//! [`GameAction`]s; the HUD renders from the same table the dispatcher
//! resolves from, so the two can never disagree. Registered sets live on a
//! [`ContextStack`]: global at the bottom, the active mode above it, and
//! any sub-context (building placement) on top. Resolution walks top-down,
//! so a sub-context shadows the mode's own bindings for the triggers it
//! defines.

use std::fmt;

use rustc_hash::FxHashMap;
use smallvec::SmallVec;

use crate::action::GameAction;
use crate::input::{Key, Modifiers, MouseButton, PointerPhase};

/// What fires a binding: a key press, or a button edge with modifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Trigger {
    Key(Key),
    Mouse {
        button: MouseButton,
        phase: PointerPhase,
        modifiers: Modifiers,
    },
}

impl Trigger {
    pub fn key(key: Key) -> Self {
        Trigger::Key(key)
    }

    pub fn press(button: MouseButton) -> Self {
        Trigger::Mouse {
            button,
            phase: PointerPhase::Press,
            modifiers: Modifiers::NONE,
        }
    }

    pub fn release(button: MouseButton) -> Self {
        Trigger::Mouse {
            button,
            phase: PointerPhase::Release,
            modifiers: Modifiers::NONE,
        }
    }

    pub fn with_modifiers(mut self, m: Modifiers) -> Self {
        if let Trigger::Mouse { modifiers, .. } = &mut self {
            *modifiers = m;
        }
        self
    }
}

impl fmt::Display for Trigger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Trigger::Key(key) => key.fmt(f),
            Trigger::Mouse {
                button,
                phase,
                modifiers,
            } => {
                if modifiers.control {
                    write!(f, "C-")?;
                }
                if modifiers.alt {
                    write!(f, "M-")?;
                }
                if modifiers.shift {
                    write!(f, "S-")?;
                }
                let name = match button {
                    MouseButton::Left => "LMB",
                    MouseButton::Middle => "MMB",
                    MouseButton::Right => "RMB",
                };
                write!(f, "{name}")?;
                if *phase == PointerPhase::Release {
                    write!(f, " release")?;
                }
                Ok(())
            }
        }
    }
}

/// One trigger-to-action entry.
#[derive(Debug, Clone, PartialEq)]
pub struct Binding {
    pub trigger: Trigger,
    pub action: GameAction,
}

/// A named table of bindings plus raw-event interest flags.
#[derive(Debug, Clone, Default)]
pub struct BindingSet {
    name: &'static str,
    bindings: Vec<Binding>,
    index: FxHashMap<Trigger, GameAction>,
    wants_pointer: bool,
    wants_text: bool,
}

impl BindingSet {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            ..Default::default()
        }
    }

    /// Declare interest in raw pointer events (drag tracking, painting).
    pub fn with_pointer(mut self) -> Self {
        self.wants_pointer = true;
        self
    }

    /// Declare interest in text input (the inspector's edit buffer).
    pub fn with_text(mut self) -> Self {
        self.wants_text = true;
        self
    }

    pub fn bind(&mut self, trigger: Trigger, action: GameAction) {
        debug_assert!(
            !self.index.contains_key(&trigger),
            "trigger bound twice in {:?}",
            self.name
        );
        self.index.insert(trigger, action);
        self.bindings.push(Binding { trigger, action });
    }

    pub fn resolve(&self, trigger: &Trigger) -> Option<GameAction> {
        self.index.get(trigger).copied()
    }

    /// Move an action onto a new trigger. Returns false when the action is
    /// not part of this set. A binding already using the new trigger is
    /// dropped; the config decides, last write wins.
    pub fn rebind(&mut self, action: GameAction, trigger: Trigger) -> bool {
        if !self.bindings.iter().any(|b| b.action == action) {
            return false;
        }
        if let Some(shadowed) = self
            .bindings
            .iter()
            .position(|b| b.trigger == trigger && b.action != action)
        {
            let removed = self.bindings.remove(shadowed);
            self.index.remove(&removed.trigger);
        }
        if let Some(pos) = self.bindings.iter().position(|b| b.action == action) {
            let old = std::mem::replace(&mut self.bindings[pos].trigger, trigger);
            self.index.remove(&old);
            self.index.insert(trigger, action);
        }
        true
    }

    /// HUD lines, one per binding, in bind order.
    pub fn lines(&self) -> Vec<String> {
        self.bindings
            .iter()
            .map(|b| format!("{} - {}", b.trigger, b.action.description()))
            .collect()
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn bindings(&self) -> &[Binding] {
        &self.bindings
    }

    pub fn wants_pointer(&self) -> bool {
        self.wants_pointer
    }

    pub fn wants_text(&self) -> bool {
        self.wants_text
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

/// Nested interactions a mode can push above its own context.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubContext {
    /// Building placement awaiting confirm/cancel.
    Placement,
}

/// Identity of a registered context layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContextId {
    Global,
    Mode(usize),
    Sub { mode: usize, sub: SubContext },
}

impl ContextId {
    /// The mode that owns this layer, if any.
    pub fn mode_index(&self) -> Option<usize> {
        match self {
            ContextId::Global => None,
            ContextId::Mode(i) => Some(*i),
            ContextId::Sub { mode, .. } => Some(*mode),
        }
    }
}

/// Deferred stack mutations queued by mode handlers during dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StackOp {
    Push(SubContext),
    Pop(SubContext),
}

/// The registered context layers, bottom (global) to top.
#[derive(Debug, Clone)]
pub struct ContextStack {
    layers: SmallVec<[ContextId; 4]>,
}

impl ContextStack {
    pub fn new() -> Self {
        let mut layers = SmallVec::new();
        layers.push(ContextId::Global);
        Self { layers }
    }

    pub fn push(&mut self, id: ContextId) {
        if !self.contains(id) {
            self.layers.push(id);
        }
    }

    pub fn remove(&mut self, id: ContextId) {
        self.layers.retain(|l| *l != id);
    }

    /// Drop a mode's context and any sub-contexts it pushed.
    pub fn remove_mode_layers(&mut self, mode: usize) {
        self.layers.retain(|l| l.mode_index() != Some(mode));
    }

    pub fn contains(&self, id: ContextId) -> bool {
        self.layers.contains(&id)
    }

    /// Layers in resolution order, topmost first.
    pub fn top_down(&self) -> impl Iterator<Item = ContextId> + '_ {
        self.layers.iter().rev().copied()
    }

    pub fn layers(&self) -> &[ContextId] {
        &self.layers
    }

    pub fn depth(&self) -> usize {
        self.layers.len()
    }
}

impl Default for ContextStack {
    fn default() -> Self {
        Self::new()
    }
}
