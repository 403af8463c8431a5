use std::collections::HashMap;
use std::time::{Duration, Instant};

use super::config::Settings;
use super::host::{ConditionSource, HostError, HostSurface};
use super::hover::HoverTracker;
use super::model::{Condition, ElementId, Rule};
use super::registry::{self, Group};
use super::resolver::{self, ResolveContext};
use super::rules::RuleList;
use super::signals::SignalSnapshot;
use super::transition::{self, ElementRecord, StepInput};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickReport {
    /// Host was in a transient state; nothing was read or written
    Skipped,
    /// Engine disabled or the host's layout editor is open
    ForcedShow,
    Applied {
        /// Any condition value or the hovered set changed
        signals_changed: bool,
        /// Every driven element sits at its target alpha and no hysteresis
        /// hold is waiting to expire
        settled: bool,
        elements: usize,
    },
}

enum Plan {
    Drive { candidate: Rule, hovered: bool },
    Forced,
}

pub struct Fader {
    settings: Settings,
    snapshot: SignalSnapshot,
    hover: HoverTracker,
    records: HashMap<ElementId, ElementRecord>,
    forced: bool,
}

impl Fader {
    pub fn new(mut settings: Settings) -> Self {
        settings.repair();
        Self {
            settings,
            snapshot: SignalSnapshot::new(),
            hover: HoverTracker::new(),
            records: HashMap::new(),
            forced: false,
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Swap in new settings without losing per-element alpha
    pub fn update_config(&mut self, mut settings: Settings) {
        settings.repair();
        if !settings.hysteresis_enabled {
            self.clear_holds();
        }
        self.settings = settings;
        log::info!("Configuration updated");
    }

    pub fn alpha_of(&self, id: ElementId) -> Option<f32> {
        self.records.get(id).map(|r| r.alpha)
    }

    pub fn record(&self, id: ElementId) -> Option<&ElementRecord> {
        self.records.get(id)
    }

    fn clear_holds(&mut self) {
        for record in self.records.values_mut() {
            record.delay.clear();
        }
    }

    pub fn tick<H>(&mut self, host: &mut H, now: Instant, dt: Duration) -> TickReport
    where
        H: HostSurface + ConditionSource,
    {
        if !host.is_safe_to_run() {
            log::debug!("Host not safe, skipping tick");
            return TickReport::Skipped;
        }

        let forced = !host.is_engine_enabled() || host.is_config_screen_open();
        if forced != self.forced {
            if forced {
                log::info!("Fading suspended, showing all elements");
            } else {
                log::info!("Fading resumed");
            }
            self.forced = forced;
        }
        if forced {
            self.force_show_all(host);
            return TickReport::ForcedShow;
        }

        let hysteresis = self.settings.hysteresis();
        if hysteresis.is_none() {
            self.clear_holds();
        }

        let tracked = registry::tracked_elements();
        let mut signals_changed = self.snapshot.update(&*host);
        signals_changed |= self
            .hover
            .update(&*host, tracked, &self.settings.hover_groups);
        self.snapshot.set(Condition::Hover, self.hover.any_hovered());

        // Resolve every element against one consistent snapshot before
        // writing anything back.
        let ctx = ResolveContext {
            snapshot: &self.snapshot,
            now,
            hysteresis,
        };
        let fallback = RuleList::default();
        let default_alpha = self.settings.default_alpha;
        let mut plans: Vec<(ElementId, Group, Plan)> = Vec::with_capacity(tracked.len());
        for (id, group) in tracked {
            let record = self
                .records
                .entry(*id)
                .or_insert_with(|| ElementRecord::new(default_alpha));
            if self.settings.is_disabled(*group) {
                plans.push((*id, *group, Plan::Forced));
                continue;
            }
            let rules = self.settings.rules.get(group).unwrap_or(&fallback);
            let hovered = self.hover.is_hovered(*id);
            let candidate = resolver::resolve(rules, hovered, &mut record.delay, &ctx);
            plans.push((*id, *group, Plan::Drive { candidate, hovered }));
        }

        let dt = dt.as_secs_f32();
        let mut settled = true;
        for (id, group, plan) in plans {
            let Some(record) = self.records.get_mut(id) else {
                continue;
            };
            match plan {
                Plan::Forced => {
                    show_fully(record);
                    write(host, id, 1.0, true);
                }
                Plan::Drive { candidate, hovered } => {
                    let rules = self.settings.rules.get(&group).unwrap_or(&fallback);
                    let input = StepInput {
                        candidate,
                        hovered,
                        dt,
                        speeds: self.settings.speeds_for(group),
                        default_action: rules.default_rule().action,
                        hide_threshold: self.settings.hide_threshold,
                    };
                    let outcome = transition::step(record, &input);
                    settled &= record.settled() && !record.delay.is_pending();
                    write(host, id, outcome.alpha, outcome.visible);
                }
            }
        }

        TickReport::Applied {
            signals_changed,
            settled,
            elements: tracked.len(),
        }
    }

    // Visibility only; opacity stays where it was so fading resumes smoothly.
    fn force_show_all<H: HostSurface>(&mut self, host: &mut H) {
        self.hover.clear();
        for (id, _) in registry::tracked_elements() {
            if let Some(record) = self.records.get_mut(*id) {
                record.hover = transition::HoverPhase::Idle;
            }
            if let Err(e) = host.set_element_visible(*id, true) {
                log::trace!("{}", e);
            }
        }
    }

    /// Restore every element to fully visible and forget runtime state.
    /// Must run before the engine is dropped.
    pub fn shutdown<H: HostSurface>(&mut self, host: &mut H) {
        log::info!("Shutting down, restoring {} elements", self.records.len());
        for (id, _) in registry::tracked_elements() {
            write(host, *id, 1.0, true);
        }
        self.records.clear();
        self.hover.clear();
        self.forced = false;
    }
}

fn show_fully(record: &mut ElementRecord) {
    record.alpha = 1.0;
    record.target = 1.0;
    record.hover = transition::HoverPhase::Idle;
    record.delay.clear();
}

// Absent elements are routine; the write is simply dropped.
fn write<H: HostSurface>(host: &mut H, id: ElementId, alpha: f32, visible: bool) {
    let result: Result<(), HostError> = host
        .set_element_opacity(id, alpha)
        .and_then(|_| host.set_element_visible(id, visible));
    if let Err(e) = result {
        log::trace!("{}", e);
    }
}
