//! Hover tracker.
//!
//! One batch pass per tick over every tracked element: read its rectangle,
//! test the pointer against it, then widen the result across hover groups.
//! Nothing is cached between ticks.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use super::host::HostSurface;
use super::model::ElementId;
use super::registry::Group;

/// Named set of groups that hover together
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HoverGroup {
    pub name: String,
    pub groups: Vec<Group>,
}

impl HoverGroup {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            groups: Vec::new(),
        }
    }
}

#[derive(Default)]
pub struct HoverTracker {
    hovered: HashSet<ElementId>,
}

impl HoverTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Recompute hover for `elements`. Returns true if the hovered set
    /// differs from the previous tick.
    pub fn update(
        &mut self,
        host: &dyn HostSurface,
        elements: &[(ElementId, Group)],
        hover_groups: &[HoverGroup],
    ) -> bool {
        let pointer = host.pointer_position();
        let mut hovered: HashSet<ElementId> = elements
            .iter()
            .filter(|(id, _)| {
                host.element_rect(*id)
                    .map(|rect| rect.contains(pointer))
                    .unwrap_or(false)
            })
            .map(|(id, _)| *id)
            .collect();

        if !hovered.is_empty() {
            let hovered_groups: HashSet<Group> = elements
                .iter()
                .filter(|(id, _)| hovered.contains(id))
                .map(|(_, group)| *group)
                .collect();
            for hover_group in hover_groups {
                if hover_group.groups.iter().any(|g| hovered_groups.contains(g)) {
                    for (id, group) in elements {
                        if hover_group.groups.contains(group) {
                            hovered.insert(*id);
                        }
                    }
                }
            }
        }

        let changed = hovered != self.hovered;
        self.hovered = hovered;
        changed
    }

    pub fn is_hovered(&self, id: ElementId) -> bool {
        self.hovered.contains(id)
    }

    /// Drives the coarse `Hover` condition
    pub fn any_hovered(&self) -> bool {
        !self.hovered.is_empty()
    }

    pub fn clear(&mut self) {
        self.hovered.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::host::MemoryHost;
    use crate::core::model::Rect;

    const ELEMENTS: &[(ElementId, Group)] = &[
        ("_ActionBar", Group::Hotbar1),
        ("_ActionBar01", Group::Hotbar2),
        ("_NaviMap", Group::Minimap),
    ];

    fn host() -> MemoryHost {
        let mut host = MemoryHost::new();
        host.present("_ActionBar", Rect::new(0.0, 0.0, 100.0, 20.0));
        host.present("_ActionBar01", Rect::new(0.0, 30.0, 100.0, 20.0));
        host.present("_NaviMap", Rect::new(300.0, 0.0, 50.0, 50.0));
        host
    }

    #[test]
    fn test_pointer_over_single_element() {
        let mut host = host();
        let mut tracker = HoverTracker::new();
        host.move_pointer(50.0, 10.0);

        assert!(tracker.update(&host, ELEMENTS, &[]));
        assert!(tracker.is_hovered("_ActionBar"));
        assert!(!tracker.is_hovered("_ActionBar01"));
        assert!(tracker.any_hovered());

        // same pointer, same result
        assert!(!tracker.update(&host, ELEMENTS, &[]));
    }

    #[test]
    fn test_absent_element_is_not_hovered() {
        let mut host = host();
        let mut tracker = HoverTracker::new();
        host.move_pointer(320.0, 20.0);
        tracker.update(&host, ELEMENTS, &[]);
        assert!(tracker.is_hovered("_NaviMap"));

        host.withdraw("_NaviMap");
        assert!(tracker.update(&host, ELEMENTS, &[]));
        assert!(!tracker.is_hovered("_NaviMap"));
        assert!(!tracker.any_hovered());
    }

    #[test]
    fn test_hover_group_spreads_hover() {
        let mut host = host();
        let mut tracker = HoverTracker::new();
        let mut bars = HoverGroup::new("Bars");
        bars.groups = vec![Group::Hotbar1, Group::Hotbar2];

        host.move_pointer(50.0, 40.0);
        tracker.update(&host, ELEMENTS, std::slice::from_ref(&bars));
        assert!(tracker.is_hovered("_ActionBar"));
        assert!(tracker.is_hovered("_ActionBar01"));
        assert!(!tracker.is_hovered("_NaviMap"));

        host.move_pointer(320.0, 20.0);
        tracker.update(&host, ELEMENTS, std::slice::from_ref(&bars));
        assert!(!tracker.is_hovered("_ActionBar"));
        assert!(tracker.is_hovered("_NaviMap"));
    }
}
