//! Opacity transition engine.
//!
//! Each element keeps an [`ElementRecord`] for the life of the process. Every
//! tick the current alpha moves linearly toward the candidate's target, using
//! the enter speed when brightening and the exit speed when fading. A small
//! hover state machine keeps a hover fade running to completion after the
//! pointer leaves.
//!
//! Visibility is decided separately: an element is only hidden once its group
//! defaults to `Hide` *and* the alpha has decayed below the hide threshold.

use super::delay::DelaySlot;
use super::model::{clamp_unit, Action, Rule};

/// Tolerance for "alpha has reached its target"
pub const ALPHA_EPSILON: f32 = 0.001;

/// Default alpha below which a `Hide` group is actually hidden
pub const DEFAULT_HIDE_THRESHOLD: f32 = 0.05;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum HoverPhase {
    #[default]
    Idle,
    /// Pointer is over the element; alpha heads for the hover opacity
    Hovering { target: f32 },
    /// Pointer left before the hover fade completed; target stays pinned
    Finishing { target: f32 },
}

/// Runtime state of one host element
#[derive(Debug, Clone, PartialEq)]
pub struct ElementRecord {
    pub alpha: f32,
    pub hover: HoverPhase,
    pub delay: DelaySlot,
    /// Target used on the most recent step
    pub target: f32,
}

impl ElementRecord {
    pub fn new(alpha: f32) -> Self {
        let alpha = clamp_unit(alpha);
        Self {
            alpha,
            hover: HoverPhase::Idle,
            delay: DelaySlot::default(),
            target: alpha,
        }
    }

    pub fn settled(&self) -> bool {
        (self.alpha - self.target).abs() <= ALPHA_EPSILON
    }
}

/// Fade rates in opacity per second
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FadeSpeeds {
    pub enter: f32,
    pub exit: f32,
}

impl FadeSpeeds {
    pub fn new(enter: f32, exit: f32) -> Self {
        Self {
            enter: non_negative(enter),
            exit: non_negative(exit),
        }
    }
}

fn non_negative(value: f32) -> f32 {
    if value.is_nan() {
        0.0
    } else {
        value.max(0.0)
    }
}

pub struct StepInput {
    pub candidate: Rule,
    pub hovered: bool,
    /// Seconds since the previous tick
    pub dt: f32,
    pub speeds: FadeSpeeds,
    /// Action of the group's Default rule
    pub default_action: Action,
    pub hide_threshold: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepOutcome {
    pub alpha: f32,
    pub visible: bool,
}

/// Move `current` toward `target` by at most `max_delta`, never overshooting.
pub fn move_towards(current: f32, target: f32, max_delta: f32) -> f32 {
    let max_delta = non_negative(max_delta);
    if (target - current).abs() <= max_delta {
        return target;
    }
    current + (target - current).signum() * max_delta
}

fn reached(alpha: f32, target: f32) -> bool {
    (alpha - target).abs() <= ALPHA_EPSILON
}

fn next_phase(phase: HoverPhase, alpha: f32, candidate: &Rule, hovered: bool) -> HoverPhase {
    if hovered && candidate.is_hover() {
        return HoverPhase::Hovering {
            target: candidate.opacity,
        };
    }
    match phase {
        HoverPhase::Hovering { target } | HoverPhase::Finishing { target } => {
            if reached(alpha, target) {
                HoverPhase::Idle
            } else {
                HoverPhase::Finishing { target }
            }
        }
        HoverPhase::Idle => HoverPhase::Idle,
    }
}

/// Advance one element by one tick.
pub fn step(record: &mut ElementRecord, input: &StepInput) -> StepOutcome {
    let current = clamp_unit(record.alpha);
    record.hover = next_phase(record.hover, current, &input.candidate, input.hovered);

    let target = match record.hover {
        HoverPhase::Hovering { target } | HoverPhase::Finishing { target } => target,
        // a held hover rule without the pointer keeps whatever alpha it reached
        HoverPhase::Idle if input.candidate.is_hover() => current,
        HoverPhase::Idle => match input.candidate.action {
            Action::Show => input.candidate.opacity,
            Action::Hide => 0.0,
        },
    };
    let target = clamp_unit(target);

    let speed = if target > current {
        input.speeds.enter
    } else {
        input.speeds.exit
    };
    let alpha = clamp_unit(move_towards(current, target, speed * non_negative(input.dt)));

    if let HoverPhase::Finishing { target: pinned } = record.hover {
        if reached(alpha, pinned) {
            record.hover = HoverPhase::Idle;
        }
    }

    record.alpha = alpha;
    record.target = target;

    let hidden = input.default_action == Action::Hide && alpha < input.hide_threshold;
    StepOutcome {
        alpha,
        visible: !hidden,
    }
}
