// Signal snapshot: the boolean value of every condition for the current tick.

use std::collections::{HashMap, HashSet};

use super::host::ConditionSource;
use super::model::Condition;

pub struct SignalSnapshot {
    values: HashMap<Condition, bool>,
    /// Providers that failed last tick, so a persistent failure logs once
    failing: HashSet<Condition>,
}

impl Default for SignalSnapshot {
    fn default() -> Self {
        Self::new()
    }
}

impl SignalSnapshot {
    pub fn new() -> Self {
        let values = Condition::all()
            .iter()
            .map(|c| (*c, *c == Condition::Default))
            .collect();
        Self {
            values,
            failing: HashSet::new(),
        }
    }

    /// Re-read every provided condition. Returns true if any value changed.
    /// A failing provider reads as `false` for this tick.
    pub fn update(&mut self, source: &dyn ConditionSource) -> bool {
        let mut changed = false;
        for condition in Condition::all() {
            if !condition.is_provided() {
                continue;
            }
            let value = match source.condition_value(*condition) {
                Ok(value) => {
                    if self.failing.remove(condition) {
                        log::info!("Condition provider for {:?} recovered", condition);
                    }
                    value
                }
                Err(e) => {
                    if self.failing.insert(*condition) {
                        log::warn!("{}; treating as false", e);
                    }
                    false
                }
            };
            changed |= self.set(*condition, value);
        }
        changed
    }

    /// Set one value directly. `Default` stays true and `Unassigned` stays
    /// false whatever is passed. Returns true if the stored value changed.
    pub fn set(&mut self, condition: Condition, value: bool) -> bool {
        let value = match condition {
            Condition::Default => true,
            Condition::Unassigned => false,
            _ => value,
        };
        let previous = self.values.insert(condition, value);
        previous != Some(value)
    }

    pub fn get(&self, condition: Condition) -> bool {
        self.values.get(&condition).copied().unwrap_or(false)
    }
}
