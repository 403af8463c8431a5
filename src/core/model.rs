// Core model types shared by the resolver, the transition engine and the
// persisted settings.

use serde::{Deserialize, Serialize};

/// Identifier of a host-side visual element (the host's own addon name).
pub type ElementId = &'static str;

/// Named boolean fact about the world, evaluated once per tick.
///
/// Discriminants are stable and must not be renumbered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Condition {
    /// Placeholder for a freshly added rule; never true
    Unassigned = 0,
    /// Terminal fallback; always true
    Default = 1,
    Duty = 2,
    EnemyTarget = 3,
    PlayerTarget = 4,
    NpcTarget = 5,
    Crafting = 6,
    Gathering = 7,
    Mounted = 8,
    Combat = 9,
    WeaponUnsheathed = 10,
    IslandSanctuary = 11,
    ChatFocus = 12,
    UserFocus = 13,
    ChatActivity = 14,
    AltKeyFocus = 15,
    CtrlKeyFocus = 16,
    ShiftKeyFocus = 17,
    InSanctuary = 18,
    InFate = 19,
    IsMoving = 20,
    /// Pointer over the element; special-cased by the resolver
    Hover = 21,
    Occupied = 22,
    LeftTrigger = 23,
    RightTrigger = 24,
    LeftBumper = 25,
    RightBumper = 26,
}

impl Condition {
    /// Every condition, in discriminant order
    pub fn all() -> &'static [Condition] {
        &[
            Self::Unassigned,
            Self::Default,
            Self::Duty,
            Self::EnemyTarget,
            Self::PlayerTarget,
            Self::NpcTarget,
            Self::Crafting,
            Self::Gathering,
            Self::Mounted,
            Self::Combat,
            Self::WeaponUnsheathed,
            Self::IslandSanctuary,
            Self::ChatFocus,
            Self::UserFocus,
            Self::ChatActivity,
            Self::AltKeyFocus,
            Self::CtrlKeyFocus,
            Self::ShiftKeyFocus,
            Self::InSanctuary,
            Self::InFate,
            Self::IsMoving,
            Self::Hover,
            Self::Occupied,
            Self::LeftTrigger,
            Self::RightTrigger,
            Self::LeftBumper,
            Self::RightBumper,
        ]
    }

    /// Presentation order for rule editors. Has no effect on resolution.
    pub fn ui_order() -> &'static [Condition] {
        &[
            Self::Unassigned,
            Self::Default,
            Self::Duty,
            Self::EnemyTarget,
            Self::PlayerTarget,
            Self::NpcTarget,
            Self::Crafting,
            Self::Gathering,
            Self::IsMoving,
            Self::Mounted,
            Self::Combat,
            Self::WeaponUnsheathed,
            Self::InSanctuary,
            Self::InFate,
            Self::IslandSanctuary,
            Self::ChatActivity,
            Self::ChatFocus,
            Self::UserFocus,
            Self::AltKeyFocus,
            Self::CtrlKeyFocus,
            Self::ShiftKeyFocus,
            Self::Hover,
            Self::Occupied,
            Self::LeftTrigger,
            Self::RightTrigger,
            Self::LeftBumper,
            Self::RightBumper,
        ]
    }

    /// Conditions whose value comes from an external provider.
    /// `Default`, `Unassigned` and `Hover` are computed by the engine itself.
    pub fn is_provided(&self) -> bool {
        !matches!(self, Self::Unassigned | Self::Default | Self::Hover)
    }

    /// Whether a rule editor may assign this condition to a rule
    pub fn is_assignable(&self) -> bool {
        !matches!(self, Self::Unassigned | Self::Default)
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Unassigned => "None",
            Self::Default => "Default",
            Self::Duty => "In Duty",
            Self::EnemyTarget => "Enemy Target",
            Self::PlayerTarget => "Player Target",
            Self::NpcTarget => "NPC Target",
            Self::Crafting => "Crafting",
            Self::Gathering => "Gathering",
            Self::Mounted => "Mounted",
            Self::Combat => "In Combat",
            Self::WeaponUnsheathed => "Weapon Unsheathed",
            Self::IslandSanctuary => "Island Sanctuary",
            Self::ChatFocus => "Chat Focus",
            Self::UserFocus => "User Focus",
            Self::ChatActivity => "Chat Activity",
            Self::AltKeyFocus => "Alt Key",
            Self::CtrlKeyFocus => "Ctrl Key",
            Self::ShiftKeyFocus => "Shift Key",
            Self::InSanctuary => "In Sanctuary",
            Self::InFate => "In FATE Area",
            Self::IsMoving => "Moving",
            Self::Hover => "Mouse Hover",
            Self::Occupied => "Occupied",
            Self::LeftTrigger => "Left Trigger",
            Self::RightTrigger => "Right Trigger",
            Self::LeftBumper => "Left Bumper",
            Self::RightBumper => "Right Bumper",
        }
    }
}

/// What a rule does to its element when selected
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Action {
    #[default]
    Show,
    Hide,
}

/// One entry of a group's ordered rule list.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rule {
    pub condition: Condition,
    pub action: Action,
    /// Target opacity in [0, 1]
    #[serde(default = "default_opacity")]
    pub opacity: f32,
}

fn default_opacity() -> f32 {
    1.0
}

impl Rule {
    pub fn new(condition: Condition, action: Action, opacity: f32) -> Self {
        Self {
            condition,
            action,
            opacity: clamp_unit(opacity),
        }
    }

    /// The synthetic fallback inserted into lists that lack one
    pub fn fallback() -> Self {
        Self::new(Condition::Default, Action::Show, 1.0)
    }

    pub fn is_default(&self) -> bool {
        self.condition == Condition::Default
    }

    pub fn is_hover(&self) -> bool {
        self.condition == Condition::Hover
    }

    /// Copy of this rule forced to `Show`, keeping its opacity
    pub fn shown(self) -> Self {
        Self {
            action: Action::Show,
            ..self
        }
    }
}

/// Clamp to [0, 1], mapping NaN to 0.
pub fn clamp_unit(value: f32) -> f32 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    }
}

/// Screen rectangle of an element, in host pixels
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self { x, y, width, height }
    }

    /// Inclusive on all edges
    pub fn contains(&self, point: (f32, f32)) -> bool {
        let (px, py) = point;
        px >= self.x && px <= self.x + self.width && py >= self.y && py <= self.y + self.height
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_discriminants_are_stable() {
        for (index, condition) in Condition::all().iter().enumerate() {
            assert_eq!(*condition as usize, index);
        }
        assert_eq!(Condition::ui_order().len(), Condition::all().len());
    }

    #[test]
    fn test_all_conditions_have_names() {
        for condition in Condition::all() {
            assert!(!condition.display_name().is_empty());
        }
    }

    #[test]
    fn test_rule_opacity_is_clamped() {
        assert_eq!(Rule::new(Condition::Combat, Action::Show, 1.7).opacity, 1.0);
        assert_eq!(Rule::new(Condition::Combat, Action::Show, -0.3).opacity, 0.0);
        assert_eq!(Rule::new(Condition::Combat, Action::Show, f32::NAN).opacity, 0.0);
    }

    #[test]
    fn test_rect_contains_edges() {
        let rect = Rect::new(10.0, 10.0, 100.0, 50.0);
        assert!(rect.contains((10.0, 10.0)));
        assert!(rect.contains((110.0, 60.0)));
        assert!(!rect.contains((110.5, 30.0)));
        assert!(!rect.contains((9.0, 30.0)));
    }

    #[test]
    fn test_shown_keeps_opacity() {
        let rule = Rule::new(Condition::Combat, Action::Hide, 0.4).shown();
        assert_eq!(rule.action, Action::Show);
        assert_eq!(rule.opacity, 0.4);
    }
}
