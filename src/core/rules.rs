//! Ordered rule lists.
//!
//! A [`RuleList`] always holds exactly one `Default` rule, and that rule is
//! always last. Every constructor and edit preserves this, so resolution can
//! treat the list as total.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::model::{clamp_unit, Action, Condition, Rule};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuleEditError {
    #[error("rule index {index} out of range (list has {len} rules)")]
    OutOfRange { index: usize, len: usize },
    #[error("the Default rule cannot be removed or moved")]
    DefaultIsFixed,
    #[error("condition {0:?} cannot be assigned to a rule")]
    NotAssignable(Condition),
}

/// A group's ordered rule list. Earlier rules win.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "Vec<Rule>", into = "Vec<Rule>")]
pub struct RuleList {
    rules: Vec<Rule>,
}

impl Default for RuleList {
    fn default() -> Self {
        Self {
            rules: vec![Rule::fallback()],
        }
    }
}

impl From<Vec<Rule>> for RuleList {
    fn from(raw: Vec<Rule>) -> Self {
        let (list, repaired) = Self::repair(raw);
        if repaired {
            log::warn!("Repaired malformed rule list: {:?}", list.rules);
        }
        list
    }
}

impl From<RuleList> for Vec<Rule> {
    fn from(list: RuleList) -> Self {
        list.rules
    }
}

impl RuleList {
    /// Build a list from raw rules, restoring the invariants.
    /// Returns the list and whether anything had to be fixed.
    pub fn repair(raw: Vec<Rule>) -> (Self, bool) {
        let mut repaired = false;
        let mut default_rule = None;
        let mut rules = Vec::with_capacity(raw.len() + 1);

        for rule in raw {
            let opacity = clamp_unit(rule.opacity);
            if opacity != rule.opacity {
                repaired = true;
            }
            let rule = Rule { opacity, ..rule };
            if rule.is_default() {
                if default_rule.is_some() {
                    repaired = true;
                } else {
                    default_rule = Some(rule);
                }
            } else {
                if default_rule.is_some() {
                    // something followed Default
                    repaired = true;
                }
                rules.push(rule);
            }
        }

        match default_rule {
            Some(rule) => rules.push(rule),
            None => {
                repaired = true;
                rules.push(Rule::fallback());
            }
        }

        (Self { rules }, repaired)
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Always false; present for API symmetry with `len`
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Rule> {
        self.rules.iter()
    }

    /// The terminal fallback rule
    pub fn default_rule(&self) -> Rule {
        // Invariant: the last rule is Default.
        match self.rules.last() {
            Some(rule) => *rule,
            None => Rule::fallback(),
        }
    }

    pub fn hover_rule(&self) -> Option<Rule> {
        self.rules.iter().copied().find(Rule::is_hover)
    }

    /// True when the element hides itself by default yet expects to be
    /// revealed by hovering. A hidden element cannot be hovered.
    pub fn hover_unreachable(&self) -> bool {
        self.default_rule().action == Action::Hide && self.hover_rule().is_some()
    }

    fn default_index(&self) -> usize {
        self.rules.len() - 1
    }

    fn check_editable(&self, index: usize) -> Result<(), RuleEditError> {
        if index >= self.rules.len() {
            return Err(RuleEditError::OutOfRange {
                index,
                len: self.rules.len(),
            });
        }
        if index == self.default_index() {
            return Err(RuleEditError::DefaultIsFixed);
        }
        Ok(())
    }

    fn check_index(&self, index: usize) -> Result<(), RuleEditError> {
        if index >= self.rules.len() {
            return Err(RuleEditError::OutOfRange {
                index,
                len: self.rules.len(),
            });
        }
        Ok(())
    }

    /// Insert a new unassigned rule just above `Default`; returns its index
    pub fn add(&mut self) -> usize {
        let index = self.default_index();
        self.rules
            .insert(index, Rule::new(Condition::Unassigned, Action::Show, 1.0));
        index
    }

    pub fn remove(&mut self, index: usize) -> Result<Rule, RuleEditError> {
        self.check_editable(index)?;
        Ok(self.rules.remove(index))
    }

    pub fn move_up(&mut self, index: usize) -> Result<(), RuleEditError> {
        self.check_editable(index)?;
        if index == 0 {
            return Ok(());
        }
        self.rules.swap(index - 1, index);
        Ok(())
    }

    pub fn move_down(&mut self, index: usize) -> Result<(), RuleEditError> {
        self.check_editable(index)?;
        if index + 1 == self.default_index() {
            return Err(RuleEditError::DefaultIsFixed);
        }
        self.rules.swap(index, index + 1);
        Ok(())
    }

    pub fn set_condition(&mut self, index: usize, condition: Condition) -> Result<(), RuleEditError> {
        self.check_editable(index)?;
        if !condition.is_assignable() {
            return Err(RuleEditError::NotAssignable(condition));
        }
        self.rules[index].condition = condition;
        Ok(())
    }

    /// Allowed on every rule, including `Default`
    pub fn set_action(&mut self, index: usize, action: Action) -> Result<(), RuleEditError> {
        self.check_index(index)?;
        self.rules[index].action = action;
        Ok(())
    }

    /// Allowed on every rule, including `Default`. Clamped to [0, 1].
    pub fn set_opacity(&mut self, index: usize, opacity: f32) -> Result<(), RuleEditError> {
        self.check_index(index)?;
        self.rules[index].opacity = clamp_unit(opacity);
        Ok(())
    }
}
