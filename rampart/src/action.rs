//! Named actions the binding tables resolve to.
//!
//! Actions are mode-agnostic identifiers; which mode handles one is
//! decided by the binding context it was resolved in. Names (for the
//! keymap config) are snake_case; descriptions feed the HUD binding list.

/// Every action any binding context can produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GameAction {
    /// Switch to the next interaction mode.
    ToggleMode,

    // Inspector.
    Activate,
    CursorUp,
    CursorDown,

    // Command mode.
    TrainUnit,
    SpawnUnit,
    KillSelection,
    ClearAbility,
    AbilityMove,
    AbilityGather,
    AbilityGarrison,
    /// Start placing the building in this catalog slot (0-based).
    OpenPlacement(u8),
    ConfirmPlacement,
    RepeatPlacement,
    Select,
    ExtendSelection,
    Order,

    // Painter.
    CycleCategory,
    NextItem,
    PrevItem,
}

impl GameAction {
    /// Short description for the HUD binding list.
    pub fn description(&self) -> &'static str {
        match self {
            GameAction::ToggleMode => "switch interaction mode",
            GameAction::Activate => "edit variable / call function",
            GameAction::CursorUp => "move cursor up",
            GameAction::CursorDown => "move cursor down",
            GameAction::TrainUnit => "train a unit",
            GameAction::SpawnUnit => "spawn a unit at the cursor",
            GameAction::KillSelection => "remove selected units",
            GameAction::ClearAbility => "clear ability override",
            GameAction::AbilityMove => "force move",
            GameAction::AbilityGather => "force gather",
            GameAction::AbilityGarrison => "force garrison",
            GameAction::OpenPlacement(_) => "choose building to place",
            GameAction::ConfirmPlacement => "place building",
            GameAction::RepeatPlacement => "place building, keep placing",
            GameAction::Select => "select units",
            GameAction::ExtendSelection => "add units to selection",
            GameAction::Order => "order selection to target",
            GameAction::CycleCategory => "next brush category",
            GameAction::NextItem => "next brush item",
            GameAction::PrevItem => "previous brush item",
        }
    }

    /// Resolve a snake_case config name. Placement slots are
    /// `place_building_1` through `place_building_9`.
    pub fn parse_name(name: &str) -> Option<GameAction> {
        if let Some(digits) = name.strip_prefix("place_building_") {
            let slot: u8 = digits.parse().ok()?;
            if (1..=9).contains(&slot) {
                return Some(GameAction::OpenPlacement(slot - 1));
            }
            return None;
        }
        let action = match name {
            "toggle_mode" => GameAction::ToggleMode,
            "activate" => GameAction::Activate,
            "cursor_up" => GameAction::CursorUp,
            "cursor_down" => GameAction::CursorDown,
            "train_unit" => GameAction::TrainUnit,
            "spawn_unit" => GameAction::SpawnUnit,
            "kill_selection" => GameAction::KillSelection,
            "clear_ability" => GameAction::ClearAbility,
            "ability_move" => GameAction::AbilityMove,
            "ability_gather" => GameAction::AbilityGather,
            "ability_garrison" => GameAction::AbilityGarrison,
            "confirm_placement" => GameAction::ConfirmPlacement,
            "repeat_placement" => GameAction::RepeatPlacement,
            "select" => GameAction::Select,
            "extend_selection" => GameAction::ExtendSelection,
            "order" => GameAction::Order,
            "cycle_category" => GameAction::CycleCategory,
            "next_item" => GameAction::NextItem,
            "prev_item" => GameAction::PrevItem,
            _ => return None,
        };
        Some(action)
    }
}
