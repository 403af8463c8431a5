// Rule resolver: picks exactly one candidate rule per element per tick.
//
// Order of precedence:
// 1. Hover rule, if the element is hovered
// 2. First rule (list order) whose condition is true, Hover excluded
// 3. Default, or the held non-default rule while the hysteresis window is open

use std::time::{Duration, Instant};

use super::delay::DelaySlot;
use super::model::{Condition, Rule};
use super::rules::RuleList;
use super::signals::SignalSnapshot;

/// Inputs that are the same for every element in one tick
pub struct ResolveContext<'a> {
    pub snapshot: &'a SignalSnapshot,
    pub now: Instant,
    /// `None` when hysteresis is disabled
    pub hysteresis: Option<Duration>,
}

/// Select the candidate rule for one element. Always returns a rule.
///
/// Non-default candidates come back forced to `Show` (on a copy; the list is
/// never touched), so a hold can only keep an element visible.
pub fn resolve(
    rules: &RuleList,
    hovered: bool,
    delay: &mut DelaySlot,
    ctx: &ResolveContext,
) -> Rule {
    let default_rule = rules.default_rule();

    let hover_candidate = if hovered { rules.hover_rule() } else { None };
    let candidate = hover_candidate
        .or_else(|| {
            rules
                .iter()
                .copied()
                .find(|rule| !rule.is_hover() && is_active(rule.condition, ctx.snapshot))
        })
        .unwrap_or(default_rule);

    if !candidate.is_default() {
        let candidate = candidate.shown();
        delay.record(candidate, ctx.now);
        return candidate;
    }

    match ctx.hysteresis {
        Some(window) => delay.query(candidate, ctx.now, window),
        None => candidate,
    }
}

fn is_active(condition: Condition, snapshot: &SignalSnapshot) -> bool {
    match condition {
        Condition::Default => true,
        Condition::Unassigned => false,
        other => snapshot.get(other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::model::Action;

    const WINDOW: Duration = Duration::from_millis(2000);

    fn rule(condition: Condition, opacity: f32) -> Rule {
        Rule::new(condition, Action::Show, opacity)
    }

    fn snapshot(active: &[Condition]) -> SignalSnapshot {
        let mut snapshot = SignalSnapshot::new();
        for condition in active {
            snapshot.set(*condition, true);
        }
        snapshot
    }

    fn ctx(snapshot: &SignalSnapshot, now: Instant) -> ResolveContext<'_> {
        ResolveContext {
            snapshot,
            now,
            hysteresis: Some(WINDOW),
        }
    }

    #[test]
    fn test_list_order_is_priority() {
        let rules = RuleList::from(vec![
            rule(Condition::Combat, 0.2),
            rule(Condition::Mounted, 0.8),
            rule(Condition::Default, 1.0),
        ]);
        let snap = snapshot(&[Condition::Combat, Condition::Mounted]);
        let mut delay = DelaySlot::default();

        let candidate = resolve(&rules, false, &mut delay, &ctx(&snap, Instant::now()));
        assert_eq!(candidate.condition, Condition::Combat);
        assert_eq!(candidate.opacity, 0.2);
    }

    #[test]
    fn test_same_input_same_candidate() {
        let rules = RuleList::from(vec![
            rule(Condition::Combat, 0.2),
            rule(Condition::Mounted, 0.8),
        ]);
        let snap = snapshot(&[Condition::Mounted]);
        let mut delay = DelaySlot::default();
        let now = Instant::now();

        let first = resolve(&rules, false, &mut delay, &ctx(&snap, now));
        for _ in 0..5 {
            assert_eq!(resolve(&rules, false, &mut delay, &ctx(&snap, now)), first);
        }
    }

    #[test]
    fn test_hover_preempts_earlier_rules() {
        let rules = RuleList::from(vec![
            rule(Condition::Combat, 0.2),
            rule(Condition::Hover, 0.9),
        ]);
        let snap = snapshot(&[Condition::Combat, Condition::Hover]);
        let mut delay = DelaySlot::default();
        let now = Instant::now();

        let candidate = resolve(&rules, true, &mut delay, &ctx(&snap, now));
        assert_eq!(candidate.condition, Condition::Hover);

        // the coarse Hover condition alone does not select the hover rule
        let mut delay = DelaySlot::default();
        let candidate = resolve(&rules, false, &mut delay, &ctx(&snap, now));
        assert_eq!(candidate.condition, Condition::Combat);
    }

    #[test]
    fn test_hovered_without_hover_rule_uses_priority() {
        let rules = RuleList::from(vec![rule(Condition::Combat, 0.2)]);
        let snap = snapshot(&[Condition::Combat]);
        let mut delay = DelaySlot::default();
        let candidate = resolve(&rules, true, &mut delay, &ctx(&snap, Instant::now()));
        assert_eq!(candidate.condition, Condition::Combat);
    }

    #[test]
    fn test_unassigned_rule_never_matches() {
        let mut rules = RuleList::default();
        rules.add();
        let snap = snapshot(&[]);
        let mut delay = DelaySlot::default();
        let candidate = resolve(&rules, false, &mut delay, &ctx(&snap, Instant::now()));
        assert!(candidate.is_default());
    }

    #[test]
    fn test_hysteresis_holds_then_drops() {
        let rules = RuleList::from(vec![rule(Condition::Combat, 0.4)]);
        let mut delay = DelaySlot::default();
        let t0 = Instant::now();

        let in_combat = snapshot(&[Condition::Combat]);
        resolve(&rules, false, &mut delay, &ctx(&in_combat, t0));

        let idle = snapshot(&[]);
        let held = resolve(&rules, false, &mut delay, &ctx(&idle, t0 + Duration::from_millis(1999)));
        assert_eq!(held.condition, Condition::Combat);

        let dropped = resolve(&rules, false, &mut delay, &ctx(&idle, t0 + WINDOW));
        assert!(dropped.is_default());
        assert!(!delay.is_holding());
    }

    #[test]
    fn test_no_hold_when_hysteresis_disabled() {
        let rules = RuleList::from(vec![rule(Condition::Combat, 0.4)]);
        let mut delay = DelaySlot::default();
        let t0 = Instant::now();
        let in_combat = snapshot(&[Condition::Combat]);
        resolve(&rules, false, &mut delay, &ctx(&in_combat, t0));

        let idle = snapshot(&[]);
        let ctx = ResolveContext {
            snapshot: &idle,
            now: t0 + Duration::from_millis(10),
            hysteresis: None,
        };
        assert!(resolve(&rules, false, &mut delay, &ctx).is_default());
    }

    #[test]
    fn test_hide_candidate_normalized_without_touching_list() {
        let rules = RuleList::from(vec![Rule::new(Condition::Combat, Action::Hide, 0.3)]);
        let snap = snapshot(&[Condition::Combat]);
        let mut delay = DelaySlot::default();

        let candidate = resolve(&rules, false, &mut delay, &ctx(&snap, Instant::now()));
        assert_eq!(candidate.action, Action::Show);
        assert_eq!(candidate.opacity, 0.3);
        assert_eq!(rules.rules()[0].action, Action::Hide);
    }

    #[test]
    fn test_default_hide_is_kept() {
        let rules = RuleList::from(vec![Rule::new(Condition::Default, Action::Hide, 0.0)]);
        let snap = snapshot(&[]);
        let mut delay = DelaySlot::default();
        let candidate = resolve(&rules, false, &mut delay, &ctx(&snap, Instant::now()));
        assert_eq!(candidate.action, Action::Hide);
    }
}
