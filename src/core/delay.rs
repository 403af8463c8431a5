// Hysteresis: after conditions fall back to Default, keep showing the last
// non-default rule for a grace window so rapid toggling does not flicker.

use std::time::{Duration, Instant};

use super::model::Rule;

#[derive(Debug, Clone, Copy, PartialEq)]
struct Hold {
    rule: Rule,
    since: Instant,
}

/// Per-element hold slot
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DelaySlot {
    hold: Option<Hold>,
    /// The held rule is currently standing in for Default
    pending: bool,
}

impl DelaySlot {
    /// Remember `rule` as the last active non-default rule
    pub fn record(&mut self, rule: Rule, now: Instant) {
        if self.hold.map(|hold| hold.rule) != Some(rule) {
            log::debug!("Holding {:?}", rule.condition);
        }
        self.hold = Some(Hold { rule, since: now });
        self.pending = false;
    }

    /// The remembered rule while `now - since < window`, otherwise
    /// `default_rule`. An expired hold is dropped.
    pub fn query(&mut self, default_rule: Rule, now: Instant, window: Duration) -> Rule {
        match self.hold {
            Some(hold) if now.saturating_duration_since(hold.since) < window => {
                self.pending = true;
                hold.rule
            }
            Some(hold) => {
                log::debug!("Hold on {:?} expired", hold.rule.condition);
                self.clear();
                default_rule
            }
            None => {
                self.pending = false;
                default_rule
            }
        }
    }

    pub fn clear(&mut self) {
        self.hold = None;
        self.pending = false;
    }

    pub fn is_holding(&self) -> bool {
        self.hold.is_some()
    }

    /// True while a hold is waiting out its window in place of Default.
    /// The element will change on its own once the window closes.
    pub fn is_pending(&self) -> bool {
        self.pending
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::model::{Action, Condition};

    const WINDOW: Duration = Duration::from_millis(2000);

    fn combat() -> Rule {
        Rule::new(Condition::Combat, Action::Show, 0.8)
    }

    #[test]
    fn test_empty_slot_returns_default() {
        let mut slot = DelaySlot::default();
        let now = Instant::now();
        assert_eq!(slot.query(Rule::fallback(), now, WINDOW), Rule::fallback());
    }

    #[test]
    fn test_hold_within_window() {
        let mut slot = DelaySlot::default();
        let t0 = Instant::now();
        slot.record(combat(), t0);

        let just_before = t0 + Duration::from_millis(1999);
        assert_eq!(slot.query(Rule::fallback(), just_before, WINDOW), combat());
        assert!(slot.is_holding());
        assert!(slot.is_pending());
    }

    #[test]
    fn test_hold_expires_at_window() {
        let mut slot = DelaySlot::default();
        let t0 = Instant::now();
        slot.record(combat(), t0);
        assert!(!slot.is_pending());

        assert_eq!(slot.query(Rule::fallback(), t0 + WINDOW, WINDOW), Rule::fallback());
        assert!(!slot.is_holding());
        assert!(!slot.is_pending());
        // stays cleared even when asked about an earlier instant
        assert_eq!(slot.query(Rule::fallback(), t0, WINDOW), Rule::fallback());
    }

    #[test]
    fn test_record_refreshes_timestamp() {
        let mut slot = DelaySlot::default();
        let t0 = Instant::now();
        slot.record(combat(), t0);
        slot.record(combat(), t0 + Duration::from_millis(1500));
        let later = t0 + Duration::from_millis(3000);
        assert_eq!(slot.query(Rule::fallback(), later, WINDOW), combat());
    }

    #[test]
    fn test_record_ends_pending() {
        let mut slot = DelaySlot::default();
        let t0 = Instant::now();
        slot.record(combat(), t0);
        slot.query(Rule::fallback(), t0 + Duration::from_millis(10), WINDOW);
        assert!(slot.is_pending());
        // condition came back on
        slot.record(combat(), t0 + Duration::from_millis(20));
        assert!(!slot.is_pending());
        assert!(slot.is_holding());
    }

    #[test]
    fn test_clear() {
        let mut slot = DelaySlot::default();
        slot.record(combat(), Instant::now());
        slot.clear();
        assert!(!slot.is_holding());
    }
}
