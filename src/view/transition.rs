//! Timed visual steps as data.
//!
//! A `Transition` is a flat list of `Step`s played against a `Surface` on a
//! `Clock`. `Wait` is the only suspension point. After every wait the
//! player checks that the surface is still attached and stops otherwise,
//! so a toast the viewer closed by hand doesn't get touched again.

use std::future::Future;

use chrono::{DateTime, FixedOffset};

use crate::config::Timings;

/// Something a transition can act on (a DOM element in the browser).
pub trait Surface {
    fn set_style(&self, property: &str, value: &str);
    fn set_text(&self, text: &str);
    fn scroll_into_view(&self);
    fn remove(&self);
    fn is_attached(&self) -> bool;
}

/// Time source and task spawner.
#[allow(async_fn_in_trait)]
pub trait Clock: Clone + 'static {
    async fn sleep(&self, ms: u32);
    /// Run `task` detached on the event loop.
    fn spawn(&self, task: impl Future<Output = ()> + 'static);
    /// Current wall-clock time with the viewer's UTC offset.
    fn now(&self) -> DateTime<FixedOffset>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    Style(&'static str, String),
    Text(String),
    Wait(u32),
    ScrollIntoView,
    Remove,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Transition {
    steps: Vec<Step>,
}

impl Transition {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn style(mut self, property: &'static str, value: impl Into<String>) -> Self {
        self.steps.push(Step::Style(property, value.into()));
        self
    }

    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.steps.push(Step::Text(text.into()));
        self
    }

    /// Zero-length waits are dropped.
    pub fn wait(mut self, ms: u32) -> Self {
        if ms > 0 {
            self.steps.push(Step::Wait(ms));
        }
        self
    }

    pub fn scroll_into_view(mut self) -> Self {
        self.steps.push(Step::ScrollIntoView);
        self
    }

    pub fn remove(mut self) -> Self {
        self.steps.push(Step::Remove);
        self
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    /// Sum of all waits.
    pub fn duration_ms(&self) -> u32 {
        self.steps
            .iter()
            .map(|s| match s {
                Step::Wait(ms) => *ms,
                _ => 0,
            })
            .sum()
    }

    /// Apply only the steps before the first wait, synchronously.
    /// Returns the remainder.
    pub fn apply_leading<S: Surface>(self, target: &S) -> Transition {
        let mut steps = self.steps.into_iter().peekable();
        while let Some(step) = steps.next_if(|s| !matches!(s, Step::Wait(_))) {
            apply(&step, target);
        }
        Transition {
            steps: steps.collect(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Played {
    Completed,
    /// The surface left the document during a wait.
    Interrupted,
}

fn apply<S: Surface>(step: &Step, target: &S) {
    match step {
        Step::Style(property, value) => target.set_style(property, value),
        Step::Text(text) => target.set_text(text),
        Step::ScrollIntoView => target.scroll_into_view(),
        Step::Remove => target.remove(),
        Step::Wait(_) => {}
    }
}

/// Play `transition` to the end, or until the target is detached.
pub async fn play<S: Surface, C: Clock>(transition: Transition, target: S, clock: C) -> Played {
    for step in transition.steps {
        if let Step::Wait(ms) = step {
            clock.sleep(ms).await;
            if !target.is_attached() {
                return Played::Interrupted;
            }
        } else {
            apply(&step, &target);
        }
    }
    Played::Completed
}

/// Spawn `transition` on `clock` and don't wait for it.
pub fn animate<S: Surface + 'static, C: Clock>(clock: &C, transition: Transition, target: S) {
    let task_clock = clock.clone();
    clock.spawn(async move {
        play(transition, target, task_clock).await;
    });
}

// ── Stock transitions ──────────────────────────────────────────────

/// Brief press feedback on a clicked control.
pub fn press(timings: &Timings) -> Transition {
    Transition::new()
        .style("transform", "scale(0.95)")
        .wait(timings.press_ms)
        .style("transform", "")
}

/// Pop a counter and swap in its new value at the peak.
pub fn counter_swap(timings: &Timings, value: u32) -> Transition {
    Transition::new()
        .style("transform", "scale(1.5)")
        .wait(timings.counter_swap_ms)
        .text(value.to_string())
        .style("transform", "scale(1)")
}

/// Ease a freshly inserted comment in. The markup starts hidden.
pub fn comment_enter(timings: &Timings) -> Transition {
    Transition::new()
        .wait(timings.comment_enter_ms)
        .style("transition", "all 0.4s ease")
        .style("opacity", "1")
        .style("transform", "translateX(0)")
}

/// Slide a deleted comment out, then remove it.
pub fn comment_exit(timings: &Timings) -> Transition {
    Transition::new()
        .style("transform", "translateX(100px)")
        .style("opacity", "0")
        .wait(timings.comment_exit_ms)
        .remove()
}

/// Scroll a new element into view once layout has settled.
pub fn reveal(timings: &Timings) -> Transition {
    Transition::new().wait(timings.reveal_delay_ms).scroll_into_view()
}

/// Full toast life: slide in, stay, slide out, remove.
pub fn toast_lifecycle(timings: &Timings) -> Transition {
    Transition::new()
        .wait(timings.toast_enter_ms)
        .style("opacity", "1")
        .style("transform", "translateX(0)")
        .wait(timings.toast_dwell_ms)
        .style("opacity", "0")
        .style("transform", "translateX(100px)")
        .wait(timings.toast_exit_ms)
        .remove()
}
