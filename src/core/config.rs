use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::io;
use std::path::PathBuf;
use std::time::Duration;

use super::hover::HoverGroup;
use super::model::clamp_unit;
use super::registry::Group;
use super::rules::RuleList;
use super::transition::{FadeSpeeds, DEFAULT_HIDE_THRESHOLD};

/// Bumped whenever the persisted layout changes incompatibly
pub const CURRENT_VERSION: u32 = 1;

pub const DEFAULT_HYSTERESIS_MS: u64 = 2000;
pub const DEFAULT_ENTER_SPEED: f32 = 4.0;
pub const DEFAULT_EXIT_SPEED: f32 = 1.0;

/// Per-group fade rates replacing the global ones when `use_custom` is set
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
#[serde(default)]
pub struct FadeOverride {
    pub use_custom: bool,
    pub enter_speed: f32,
    pub exit_speed: f32,
}

impl Default for FadeOverride {
    fn default() -> Self {
        Self {
            use_custom: false,
            enter_speed: DEFAULT_ENTER_SPEED,
            exit_speed: DEFAULT_EXIT_SPEED,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct Settings {
    pub version: u32,
    pub rules: BTreeMap<Group, RuleList>,
    pub disabled_groups: BTreeSet<Group>,
    pub fade_overrides: BTreeMap<Group, FadeOverride>,
    pub hover_groups: Vec<HoverGroup>,
    pub hysteresis_enabled: bool,
    pub hysteresis_window_ms: u64,
    pub enter_speed: f32,
    pub exit_speed: f32,
    /// Alpha a newly seen element starts from
    pub default_alpha: f32,
    pub hide_threshold: f32,
}

impl Default for Settings {
    fn default() -> Self {
        let rules = Group::all()
            .iter()
            .map(|group| (*group, RuleList::default()))
            .collect();
        Self {
            version: CURRENT_VERSION,
            rules,
            disabled_groups: BTreeSet::new(),
            fade_overrides: BTreeMap::new(),
            hover_groups: Vec::new(),
            hysteresis_enabled: true,
            hysteresis_window_ms: DEFAULT_HYSTERESIS_MS,
            enter_speed: DEFAULT_ENTER_SPEED,
            exit_speed: DEFAULT_EXIT_SPEED,
            default_alpha: 1.0,
            hide_threshold: DEFAULT_HIDE_THRESHOLD,
        }
    }
}

// Negative speeds clamp to 0; NaN has no boundary to clamp to.
fn clamp_speed(value: f32, fallback: f32) -> f32 {
    if value.is_nan() {
        fallback
    } else {
        value.max(0.0)
    }
}

impl Settings {
    /// Bring loaded or hand-edited settings back inside their invariants.
    /// Rule lists are already repaired on deserialization.
    pub fn repair(&mut self) {
        for group in Group::all() {
            self.rules.entry(*group).or_default();
        }
        for (group, rules) in &self.rules {
            if rules.hover_unreachable() {
                log::warn!(
                    "{}: Default is Hide, so its Hover rule can never fire",
                    group.display_name()
                );
            }
        }
        if self.hysteresis_window_ms == 0 {
            self.hysteresis_window_ms = DEFAULT_HYSTERESIS_MS;
        }
        self.enter_speed = clamp_speed(self.enter_speed, DEFAULT_ENTER_SPEED);
        self.exit_speed = clamp_speed(self.exit_speed, DEFAULT_EXIT_SPEED);
        for fade in self.fade_overrides.values_mut() {
            fade.enter_speed = clamp_speed(fade.enter_speed, DEFAULT_ENTER_SPEED);
            fade.exit_speed = clamp_speed(fade.exit_speed, DEFAULT_EXIT_SPEED);
        }
        self.default_alpha = clamp_unit(self.default_alpha);
        self.hide_threshold = clamp_unit(self.hide_threshold);
    }

    pub fn rules_for(&self, group: Group) -> RuleList {
        self.rules.get(&group).cloned().unwrap_or_default()
    }

    /// Copy one rule list onto several groups
    pub fn apply_rules(&mut self, groups: &[Group], rules: &RuleList) {
        for group in groups {
            self.rules.insert(*group, rules.clone());
        }
    }

    pub fn speeds_for(&self, group: Group) -> FadeSpeeds {
        match self.fade_overrides.get(&group) {
            Some(fade) if fade.use_custom => FadeSpeeds::new(fade.enter_speed, fade.exit_speed),
            _ => FadeSpeeds::new(self.enter_speed, self.exit_speed),
        }
    }

    pub fn is_disabled(&self, group: Group) -> bool {
        self.disabled_groups.contains(&group)
    }

    pub fn hysteresis(&self) -> Option<Duration> {
        self.hysteresis_enabled
            .then(|| Duration::from_millis(self.hysteresis_window_ms))
    }
}

pub struct ConfigManager {
    config_path: PathBuf,
}

impl ConfigManager {
    pub fn new(app_config_dir: PathBuf) -> Self {
        Self {
            config_path: app_config_dir.join("settings.json"),
        }
    }

    pub fn load(&self) -> Settings {
        let mut settings = self.read().unwrap_or_default();
        settings.repair();
        settings
    }

    fn read(&self) -> Option<Settings> {
        if !self.config_path.exists() {
            return None;
        }
        let content = match fs::read_to_string(&self.config_path) {
            Ok(content) => content,
            Err(e) => {
                log::warn!("Could not read {}: {}", self.config_path.display(), e);
                return None;
            }
        };
        let settings: Settings = match serde_json::from_str(&content) {
            Ok(settings) => settings,
            Err(e) => {
                log::warn!("Could not parse {}: {}", self.config_path.display(), e);
                return None;
            }
        };
        if settings.version != CURRENT_VERSION {
            log::warn!(
                "Settings version {} does not match {}, using defaults",
                settings.version,
                CURRENT_VERSION
            );
            return None;
        }
        Some(settings)
    }

    pub fn save(&self, settings: &Settings) -> io::Result<()> {
        if let Some(parent) = self.config_path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(settings)?;
        fs::write(&self.config_path, content)
    }
}
