// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use std::time::Duration;
use tracing::{debug, warn};

use crate::{AlertNode, AlertSurface, Locator, NotificationId, Severity};

pub const DEFAULT_DISMISS_AFTER: Duration = Duration::from_millis(5000);
pub const DEFAULT_FADE_DURATION: Duration = Duration::from_millis(300);
pub const DEFAULT_REVEAL_DELAY: Duration = Duration::from_millis(10);
pub const DEFAULT_ALERT_ANCHOR: &str = ".form-header";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NotifierTiming {
    pub reveal_delay: Duration,
    pub dismiss_after: Duration,
    pub fade_duration: Duration,
}

impl Default for NotifierTiming {
    fn default() -> Self {
        Self {
            reveal_delay: DEFAULT_REVEAL_DELAY,
            dismiss_after: DEFAULT_DISMISS_AFTER,
            fade_duration: DEFAULT_FADE_DURATION,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskStage {
    Reveal,
    Fade,
    Detach,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScheduledTask {
    pub due: Duration,
    pub target: NotificationId,
    pub stage: TaskStage,
    seq: u64,
}

/// Owns alert lifetimes on a virtual clock. The host tells it what time it is
/// via [`Notifier::advance_to`]; nothing here reads a real clock.
#[derive(Debug, Clone)]
pub struct Notifier {
    timing: NotifierTiming,
    anchor: Locator,
    now: Duration,
    next_id: u64,
    next_seq: u64,
    tasks: Vec<ScheduledTask>,
}

impl Notifier {
    pub fn new(timing: NotifierTiming) -> Self {
        Self {
            timing,
            anchor: Locator::from(DEFAULT_ALERT_ANCHOR),
            now: Duration::ZERO,
            next_id: 0,
            next_seq: 0,
            tasks: Vec::new(),
        }
    }

    pub fn with_anchor(mut self, anchor: Locator) -> Self {
        self.anchor = anchor;
        self
    }

    pub fn anchor(&self) -> &Locator {
        &self.anchor
    }

    pub fn now(&self) -> Duration {
        self.now
    }

    pub fn pending(&self) -> &[ScheduledTask] {
        &self.tasks
    }

    pub fn next_deadline(&self) -> Option<Duration> {
        self.tasks.iter().map(|task| task.due).min()
    }

    /// Replaces whatever alert is showing with a new one. Pages without the
    /// anchor get the alert at the top of the body instead.
    pub fn emit<S>(&mut self, surface: &mut S, message: &str, severity: Severity) -> NotificationId
    where
        S: AlertSurface + ?Sized,
    {
        let cleared = surface.clear_alerts();
        if cleared > 0 {
            debug!(cleared, "previous alerts removed");
        }
        // Timers for nodes that no longer exist have nothing left to do.
        self.tasks.clear();

        let id = self.allocate_id();
        let node = AlertNode {
            id,
            severity,
            message: message.to_owned(),
        };
        let inserted = surface.insert_alert(Some(&self.anchor), &node) || {
            debug!(anchor = %self.anchor, "alert anchor missing; placing alert at top of page");
            surface.insert_alert(None, &node)
        };
        if inserted {
            self.schedule(id, self.timing.reveal_delay, TaskStage::Reveal);
            self.schedule(id, self.timing.dismiss_after, TaskStage::Fade);
        } else {
            warn!(severity = severity.as_str(), "page has nowhere to show alerts; notification dropped");
        }
        id
    }

    /// Queues fade-and-removal for an alert the server rendered with the page.
    pub fn adopt(&mut self) -> NotificationId {
        let id = self.allocate_id();
        self.schedule(id, self.timing.dismiss_after, TaskStage::Fade);
        id
    }

    /// Close button: remove now and forget the node's timers.
    pub fn dismiss<S>(&mut self, surface: &mut S, id: NotificationId)
    where
        S: AlertSurface + ?Sized,
    {
        self.cancel(id);
        if surface.is_attached(id) {
            surface.detach_alert(id);
        }
    }

    pub fn cancel(&mut self, id: NotificationId) {
        self.tasks.retain(|task| task.target != id);
    }

    /// Runs every task due at or before `now`, earliest first. Tasks queued by
    /// a running task are picked up in the same call when already due.
    pub fn advance_to<S>(&mut self, surface: &mut S, now: Duration) -> usize
    where
        S: AlertSurface + ?Sized,
    {
        if now > self.now {
            self.now = now;
        }

        let mut ran = 0;
        while let Some(index) = self.next_due_index() {
            let task = self.tasks.remove(index);
            self.run(surface, task);
            ran += 1;
        }
        ran
    }

    pub fn advance_by<S>(&mut self, surface: &mut S, elapsed: Duration) -> usize
    where
        S: AlertSurface + ?Sized,
    {
        let target = self.now + elapsed;
        self.advance_to(surface, target)
    }

    fn next_due_index(&self) -> Option<usize> {
        self.tasks
            .iter()
            .enumerate()
            .filter(|(_, task)| task.due <= self.now)
            .min_by_key(|(_, task)| (task.due, task.seq))
            .map(|(index, _)| index)
    }

    fn run<S>(&mut self, surface: &mut S, task: ScheduledTask)
    where
        S: AlertSurface + ?Sized,
    {
        match task.stage {
            TaskStage::Reveal => {
                if surface.is_attached(task.target) {
                    surface.reveal_alert(task.target);
                }
            }
            TaskStage::Fade => {
                if surface.is_attached(task.target) {
                    surface.fade_alert(task.target);
                    let fade = self.timing.fade_duration;
                    self.schedule_at(task.target, task.due + fade, TaskStage::Detach);
                }
            }
            TaskStage::Detach => {
                if surface.is_attached(task.target) {
                    surface.detach_alert(task.target);
                }
            }
        }
    }

    fn allocate_id(&mut self) -> NotificationId {
        self.next_id += 1;
        NotificationId::new(self.next_id)
    }

    fn schedule(&mut self, target: NotificationId, delay: Duration, stage: TaskStage) {
        self.schedule_at(target, self.now + delay, stage);
    }

    fn schedule_at(&mut self, target: NotificationId, due: Duration, stage: TaskStage) {
        self.next_seq += 1;
        self.tasks.push(ScheduledTask {
            due,
            target,
            stage,
            seq: self.next_seq,
        });
    }
}
