//! Inspector mode: browse and edit the generator's variables.
//!
//! The generator exposes named variables and functions through
//! [`ValueStore`](crate::value::ValueStore). A cursor walks the combined
//! list (variables first, then functions); activating a variable starts a
//! text edit, activating again commits it, activating a function invokes
//! it. The cursor is a free-running integer normalized with a mathematical
//! modulo on every activation, so it may sit far outside the list between
//! activations without harm.

use tracing::{debug, warn};

use crate::action::GameAction;
use crate::binding::{BindingSet, Trigger};
use crate::coord::ScreenPos;
use crate::input::{Key, NamedKey};
use crate::mode::{ControlCtx, ModeBehavior, RenderCtx};
use crate::value::{self, Value, ValueError, ValueKind, ValueStore};

#[derive(Debug)]
pub struct InspectorMode {
    bindings: BindingSet,
    /// Free-running cursor; normalized by `rem_euclid` on activation.
    selected: i64,
    editing: bool,
    /// Variable name captured when editing began. Commits target this
    /// name, not whatever the cursor points at by then.
    pending_target: Option<String>,
    pending_value: String,
    last_response: String,
}

impl Default for InspectorMode {
    fn default() -> Self {
        Self::new()
    }
}

impl InspectorMode {
    pub fn new() -> Self {
        Self {
            bindings: Self::default_bindings(),
            selected: 0,
            editing: false,
            pending_target: None,
            pending_value: String::new(),
            last_response: String::new(),
        }
    }

    fn default_bindings() -> BindingSet {
        let mut set = BindingSet::new("inspector").with_text();
        set.bind(
            Trigger::key(Key::named(NamedKey::Enter)),
            GameAction::Activate,
        );
        set.bind(Trigger::key(Key::named(NamedKey::Up)), GameAction::CursorUp);
        set.bind(
            Trigger::key(Key::named(NamedKey::Down)),
            GameAction::CursorDown,
        );
        set
    }

    pub fn selected(&self) -> i64 {
        self.selected
    }

    pub fn is_editing(&self) -> bool {
        self.editing
    }

    pub fn pending_value(&self) -> &str {
        &self.pending_value
    }

    pub fn last_response(&self) -> &str {
        &self.last_response
    }

    /// The normalized index for a list of `size` entries.
    fn normalized(&self, size: usize) -> Option<usize> {
        if size == 0 {
            return None;
        }
        Some(self.selected.rem_euclid(size as i64) as usize)
    }

    fn activate(&mut self, ctx: &mut ControlCtx<'_>) {
        let Some(store) = ctx.values.as_deref_mut() else {
            warn!("inspector activated without a generator");
            return;
        };

        if self.editing {
            // The edit always ends here, whether or not the new value
            // sticks; a rejected literal leaves the variable untouched.
            self.editing = false;
            let target = self.pending_target.take();
            let raw = std::mem::take(&mut self.pending_value);
            if let Some(name) = target {
                match commit_edit(store, &name, &raw) {
                    Ok(()) => debug!("set {name} to {raw:?}"),
                    Err(err) => debug!("could not set {name} to {raw:?}: {err}"),
                }
            }
            return;
        }

        let vars = store.variable_names();
        let funcs = store.function_names();
        let Some(idx) = self.normalized(vars.len() + funcs.len()) else {
            debug!("generator exposes nothing to inspect");
            return;
        };

        if idx >= vars.len() {
            let name = &funcs[idx - vars.len()];
            let response = store
                .invoke(name)
                .map(|v| v.to_string())
                .unwrap_or_default();
            debug!("invoked {name}() -> {response:?}");
            self.last_response = response;
        } else {
            self.pending_target = Some(vars[idx].clone());
            self.pending_value.clear();
            self.editing = true;
        }
    }

    fn move_cursor(&mut self, delta: i64) {
        // The cursor is frozen while an edit is open.
        if !self.editing {
            self.selected += delta;
        }
    }
}

/// Parse the pending text against the variable's kind and write it back:
/// scalars assign, lists append one element.
fn commit_edit(store: &mut dyn ValueStore, name: &str, raw: &str) -> Result<(), ValueError> {
    let kind = store
        .kind(name)
        .ok_or_else(|| ValueError::UnknownName(name.to_owned()))?;
    match kind {
        ValueKind::Scalar(k) => {
            let parsed = value::parse(k, raw)?;
            store.set(name, Value::Scalar(parsed))
        }
        ValueKind::List(k) => {
            let item = value::parse(k, raw)?;
            store.append(name, item)
        }
    }
}

impl ModeBehavior for InspectorMode {
    fn name(&self) -> &'static str {
        "Inspector mode"
    }

    fn config_key(&self) -> &'static str {
        "inspector"
    }

    fn bindings(&self) -> &BindingSet {
        &self.bindings
    }

    fn bindings_mut(&mut self) -> &mut BindingSet {
        &mut self.bindings
    }

    fn handle_action(&mut self, action: GameAction, ctx: &mut ControlCtx<'_>) -> bool {
        match action {
            GameAction::Activate => {
                self.activate(ctx);
                true
            }
            GameAction::CursorUp => {
                self.move_cursor(-1);
                true
            }
            GameAction::CursorDown => {
                self.move_cursor(1);
                true
            }
            _ => false,
        }
    }

    fn handle_text(&mut self, ch: char) -> bool {
        if !self.editing {
            return false;
        }
        self.pending_value.push(ch);
        true
    }

    fn render(&self, ctx: &mut RenderCtx<'_>) {
        let size = ctx.hud.viewport();
        let Some(store) = ctx.values else {
            ctx.hud
                .text(ScreenPos::new(0, 100), 20, "Error: No generator");
            return;
        };

        let vars = store.variable_names();
        let funcs = store.function_names();
        let selected = self.normalized(vars.len() + funcs.len());

        let x = 75;
        let mut y = size.height - 65;
        for (i, name) in vars.iter().enumerate() {
            ctx.hud.text(ScreenPos::new(x, y), 20, name);
            if selected == Some(i) {
                ctx.hud.text(ScreenPos::new(x - 35, y), 20, ">>");
            }
            if let Some(value) = store.value(name) {
                ctx.hud
                    .text(ScreenPos::new(x + 320, y), 20, &value.to_string());
            }
            y -= 24;
        }
        for (i, name) in funcs.iter().enumerate() {
            ctx.hud.text(ScreenPos::new(x, y), 20, &format!("{name}()"));
            if selected == Some(vars.len() + i) {
                ctx.hud.text(ScreenPos::new(x - 35, y), 20, ">>");
            }
            y -= 24;
        }

        if self.editing {
            y -= 36;
            ctx.hud.text(ScreenPos::new(x + 45, y), 20, "set value:");
            ctx.hud
                .text(ScreenPos::new(x + 320, y), 20, &self.pending_value);
        }
        if !self.last_response.is_empty() {
            ctx.hud
                .text(ScreenPos::new(0, 100), 20, &self.last_response);
        }
    }
}
