//! Host collaborator seams.
//!
//! The engine never reaches into the host directly. A tick driver hands it
//! something implementing [`HostSurface`] (element rectangles, opacity and
//! visibility writes, pointer, global toggles) and [`ConditionSource`]
//! (per-condition boolean providers). [`MemoryHost`] is an in-process
//! implementation used by the demo driver and the tests.

use std::collections::{HashMap, HashSet};

use thiserror::Error;

use super::model::{Condition, ElementId, Rect};

#[derive(Debug, Clone, PartialEq, Error)]
pub enum HostError {
    #[error("element `{0}` is not presented by the host")]
    ElementMissing(String),
    #[error("condition provider for {condition:?} failed: {reason}")]
    Provider { condition: Condition, reason: String },
}

/// Read/write access to host elements. Calls are local and non-blocking
/// but may fail when an element is transiently absent.
pub trait HostSurface {
    /// `None` when the host is not currently presenting the element
    fn element_rect(&self, id: ElementId) -> Option<Rect>;
    fn set_element_opacity(&mut self, id: ElementId, alpha: f32) -> Result<(), HostError>;
    fn set_element_visible(&mut self, id: ElementId, visible: bool) -> Result<(), HostError>;
    fn pointer_position(&self) -> (f32, f32);
    /// The host's own layout editor; forces every element visible while open
    fn is_config_screen_open(&self) -> bool;
    /// Manual on/off switch
    fn is_engine_enabled(&self) -> bool;
    /// False during transient host states (zone loads, logged out)
    fn is_safe_to_run(&self) -> bool {
        true
    }
}

/// Supplies the current value of each provided condition
pub trait ConditionSource {
    fn condition_value(&self, condition: Condition) -> Result<bool, HostError>;
}

/// What the host currently shows for one element
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ElementState {
    pub rect: Rect,
    pub opacity: f32,
    pub visible: bool,
}

/// In-memory host. Elements must be presented before writes succeed.
#[derive(Debug, Clone)]
pub struct MemoryHost {
    elements: HashMap<ElementId, ElementState>,
    conditions: HashMap<Condition, bool>,
    failing: HashSet<Condition>,
    pointer: (f32, f32),
    pub config_screen_open: bool,
    pub enabled: bool,
    pub safe: bool,
}

impl Default for MemoryHost {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryHost {
    pub fn new() -> Self {
        Self {
            elements: HashMap::new(),
            conditions: HashMap::new(),
            failing: HashSet::new(),
            pointer: (-1.0, -1.0),
            config_screen_open: false,
            enabled: true,
            safe: true,
        }
    }

    /// Start presenting an element at `rect`, fully opaque and visible
    pub fn present(&mut self, id: ElementId, rect: Rect) {
        self.elements.insert(
            id,
            ElementState {
                rect,
                opacity: 1.0,
                visible: true,
            },
        );
    }

    pub fn withdraw(&mut self, id: ElementId) {
        self.elements.remove(id);
    }

    pub fn element(&self, id: ElementId) -> Option<&ElementState> {
        self.elements.get(id)
    }

    pub fn opacity(&self, id: ElementId) -> Option<f32> {
        self.elements.get(id).map(|e| e.opacity)
    }

    pub fn visible(&self, id: ElementId) -> Option<bool> {
        self.elements.get(id).map(|e| e.visible)
    }

    pub fn set_condition(&mut self, condition: Condition, value: bool) {
        self.conditions.insert(condition, value);
    }

    /// Make the provider for `condition` fail until cleared
    pub fn set_failing(&mut self, condition: Condition, failing: bool) {
        if failing {
            self.failing.insert(condition);
        } else {
            self.failing.remove(&condition);
        }
    }

    pub fn move_pointer(&mut self, x: f32, y: f32) {
        self.pointer = (x, y);
    }
}

impl HostSurface for MemoryHost {
    fn element_rect(&self, id: ElementId) -> Option<Rect> {
        self.elements.get(id).map(|e| e.rect)
    }

    fn set_element_opacity(&mut self, id: ElementId, alpha: f32) -> Result<(), HostError> {
        let element = self
            .elements
            .get_mut(id)
            .ok_or_else(|| HostError::ElementMissing(id.to_string()))?;
        element.opacity = alpha;
        Ok(())
    }

    fn set_element_visible(&mut self, id: ElementId, visible: bool) -> Result<(), HostError> {
        let element = self
            .elements
            .get_mut(id)
            .ok_or_else(|| HostError::ElementMissing(id.to_string()))?;
        element.visible = visible;
        Ok(())
    }

    fn pointer_position(&self) -> (f32, f32) {
        self.pointer
    }

    fn is_config_screen_open(&self) -> bool {
        self.config_screen_open
    }

    fn is_engine_enabled(&self) -> bool {
        self.enabled
    }

    fn is_safe_to_run(&self) -> bool {
        self.safe
    }
}

impl ConditionSource for MemoryHost {
    fn condition_value(&self, condition: Condition) -> Result<bool, HostError> {
        if self.failing.contains(&condition) {
            return Err(HostError::Provider {
                condition,
                reason: "provider unavailable".to_string(),
            });
        }
        Ok(self.conditions.get(&condition).copied().unwrap_or(false))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_writes_to_missing_element_fail() {
        let mut host = MemoryHost::new();
        let result = host.set_element_opacity("_ActionBar", 0.5);
        assert_eq!(
            result,
            Err(HostError::ElementMissing("_ActionBar".to_string()))
        );
    }

    #[test]
    fn test_present_and_write() {
        let mut host = MemoryHost::new();
        host.present("_ActionBar", Rect::new(0.0, 0.0, 10.0, 10.0));
        host.set_element_opacity("_ActionBar", 0.25).unwrap();
        host.set_element_visible("_ActionBar", false).unwrap();
        assert_eq!(host.opacity("_ActionBar"), Some(0.25));
        assert_eq!(host.visible("_ActionBar"), Some(false));
        host.withdraw("_ActionBar");
        assert!(host.element_rect("_ActionBar").is_none());
    }

    #[test]
    fn test_failing_provider() {
        let mut host = MemoryHost::new();
        host.set_condition(Condition::Combat, true);
        host.set_failing(Condition::Combat, true);
        assert!(host.condition_value(Condition::Combat).is_err());
        host.set_failing(Condition::Combat, false);
        assert_eq!(host.condition_value(Condition::Combat), Ok(true));
    }
}
