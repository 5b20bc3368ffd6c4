//! Raw input types delivered by the host.
//!
//! The host decodes OS events into [`InputEvent`]s: key presses with a
//! parsed [`Key`], text input for the inspector's edit buffer, and pointer
//! events carrying position plus held-button state. Key notation follows
//! `C-`/`M-`/`S-` prefixes for control/alt/shift, e.g. `C-x`, `S-Tab`.

use std::fmt;

use thiserror::Error;

use crate::coord::ScreenPos;

/// Modifier keys held during an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Modifiers {
    pub control: bool,
    pub alt: bool,
    pub shift: bool,
}

impl Modifiers {
    pub const NONE: Modifiers = Modifiers {
        control: false,
        alt: false,
        shift: false,
    };

    pub fn ctrl() -> Self {
        Modifiers {
            control: true,
            ..Default::default()
        }
    }

    pub fn shift() -> Self {
        Modifiers {
            shift: true,
            ..Default::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        !self.control && !self.alt && !self.shift
    }
}

/// Non-character keys with stable names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NamedKey {
    Enter,
    Escape,
    Tab,
    Space,
    Backspace,
    Delete,
    Up,
    Down,
    Left,
    Right,
    Home,
    End,
    PageUp,
    PageDown,
    F(u8),
}

impl NamedKey {
    fn as_str(&self) -> String {
        match self {
            NamedKey::Enter => "Enter".into(),
            NamedKey::Escape => "Escape".into(),
            NamedKey::Tab => "Tab".into(),
            NamedKey::Space => "Space".into(),
            NamedKey::Backspace => "Backspace".into(),
            NamedKey::Delete => "Delete".into(),
            NamedKey::Up => "Up".into(),
            NamedKey::Down => "Down".into(),
            NamedKey::Left => "Left".into(),
            NamedKey::Right => "Right".into(),
            NamedKey::Home => "Home".into(),
            NamedKey::End => "End".into(),
            NamedKey::PageUp => "PageUp".into(),
            NamedKey::PageDown => "PageDown".into(),
            NamedKey::F(n) => format!("F{n}"),
        }
    }
}

/// The base of a key press: a printable character or a named key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BaseKey {
    Char(char),
    Named(NamedKey),
}

/// A key press with its modifiers, as bound in keymaps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Key {
    pub base: BaseKey,
    pub modifiers: Modifiers,
}

impl Key {
    pub fn char(c: char) -> Self {
        Key {
            base: BaseKey::Char(c),
            modifiers: Modifiers::NONE,
        }
    }

    pub fn named(named: NamedKey) -> Self {
        Key {
            base: BaseKey::Named(named),
            modifiers: Modifiers::NONE,
        }
    }

    pub fn ctrl(mut self) -> Self {
        self.modifiers.control = true;
        self
    }

    pub fn alt(mut self) -> Self {
        self.modifiers.alt = true;
        self
    }

    pub fn shift(mut self) -> Self {
        self.modifiers.shift = true;
        self
    }

    /// Parse key notation: optional `C-`/`M-`/`S-` prefixes, then either a
    /// single character or a named key (case-insensitive).
    pub fn parse(input: &str) -> Result<Key, KeyParseError> {
        let mut modifiers = Modifiers::NONE;
        let mut rest = input;
        loop {
            // A prefix only counts when something follows it, so "C--"
            // still parses as control plus the '-' character.
            if rest.len() > 2 {
                if let Some(r) = rest.strip_prefix("C-") {
                    modifiers.control = true;
                    rest = r;
                    continue;
                }
                if let Some(r) = rest.strip_prefix("M-") {
                    modifiers.alt = true;
                    rest = r;
                    continue;
                }
                if let Some(r) = rest.strip_prefix("S-") {
                    modifiers.shift = true;
                    rest = r;
                    continue;
                }
            }
            break;
        }

        if rest.is_empty() {
            return Err(KeyParseError::Empty);
        }

        let mut chars = rest.chars();
        let first = chars.next().unwrap_or(' ');
        let base = if chars.next().is_none() {
            BaseKey::Char(first)
        } else {
            BaseKey::Named(parse_named(rest).ok_or_else(|| KeyParseError::Unknown {
                input: input.to_owned(),
            })?)
        };

        Ok(Key { base, modifiers })
    }
}

fn parse_named(name: &str) -> Option<NamedKey> {
    let lower = name.to_ascii_lowercase();
    let named = match lower.as_str() {
        "enter" | "return" => NamedKey::Enter,
        "escape" | "esc" => NamedKey::Escape,
        "tab" => NamedKey::Tab,
        "space" => NamedKey::Space,
        "backspace" => NamedKey::Backspace,
        "delete" | "del" => NamedKey::Delete,
        "up" => NamedKey::Up,
        "down" => NamedKey::Down,
        "left" => NamedKey::Left,
        "right" => NamedKey::Right,
        "home" => NamedKey::Home,
        "end" => NamedKey::End,
        "pageup" => NamedKey::PageUp,
        "pagedown" => NamedKey::PageDown,
        _ => {
            let n: u8 = lower.strip_prefix('f')?.parse().ok()?;
            if (1..=12).contains(&n) {
                NamedKey::F(n)
            } else {
                return None;
            }
        }
    };
    Some(named)
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.modifiers.control {
            write!(f, "C-")?;
        }
        if self.modifiers.alt {
            write!(f, "M-")?;
        }
        if self.modifiers.shift {
            write!(f, "S-")?;
        }
        match self.base {
            BaseKey::Char(c) => write!(f, "{c}"),
            BaseKey::Named(n) => write!(f, "{}", n.as_str()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum KeyParseError {
    #[error("empty key notation")]
    Empty,
    #[error("unknown key notation {input:?}")]
    Unknown { input: String },
}

/// Pointer buttons the controller cares about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    Left,
    Middle,
    Right,
}

/// Which buttons are currently held, as tracked by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HeldButtons {
    pub left: bool,
    pub middle: bool,
    pub right: bool,
}

impl HeldButtons {
    pub fn is_down(&self, button: MouseButton) -> bool {
        match button {
            MouseButton::Left => self.left,
            MouseButton::Middle => self.middle,
            MouseButton::Right => self.right,
        }
    }
}

/// Press or release edge of a button event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PointerPhase {
    Press,
    Release,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerKind {
    Move,
    Button {
        button: MouseButton,
        phase: PointerPhase,
    },
}

/// One pointer event: position, what happened, and held-button state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PointerEvent {
    pub screen: ScreenPos,
    pub kind: PointerKind,
    pub held: HeldButtons,
    pub modifiers: Modifiers,
}

/// Everything the host feeds into the controller.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    /// A non-text key press.
    Key { key: Key },
    /// One decoded character of text input.
    Text(char),
    Pointer(PointerEvent),
}

impl InputEvent {
    pub fn key(key: Key) -> Self {
        InputEvent::Key { key }
    }
}
