// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use console_app::{Config, Console, Outcome, Router, Trigger};
use std::cell::RefCell;
use std::time::Duration;
use tracing::{debug, error, warn};
use wasm_bindgen::JsCast;
use wasm_bindgen::closure::Closure;

use crate::dom::DomPage;

thread_local! {
    static RUNTIME: RefCell<Option<Runtime>> = const { RefCell::new(None) };
}

/// The page's single interaction runtime: console state, the router and the
/// document it drives, plus the one pending browser timeout.
pub struct Runtime {
    pub console: Console,
    pub router: Router,
    pub page: DomPage,
    timer: Option<i32>,
}

impl Runtime {
    pub fn new(console: Console, page: DomPage) -> Self {
        Self {
            console,
            router: Router::standard(),
            page,
            timer: None,
        }
    }

    pub fn config(&self) -> &Config {
        &self.console.config
    }

    fn dispatch(&mut self, trigger: &Trigger) -> Option<Outcome> {
        // Bring the virtual clock up to wall time before anything is scheduled against it.
        let now = self.page.clock();
        self.console.notifier.advance_to(&mut self.page, now);

        let outcome = match self.router.dispatch(&mut self.console, &mut self.page, trigger) {
            Ok(outcome) => Some(outcome),
            Err(err) => {
                error!(kind = ?trigger.kind(), error = ?err, "handler failed");
                None
            }
        };
        self.reschedule(now);
        outcome
    }

    fn reschedule(&mut self, now: Duration) {
        if let Some(handle) = self.timer.take() {
            self.page.window().clear_timeout_with_handle(handle);
        }
        let Some(due) = self.console.notifier.next_deadline() else {
            return;
        };

        let delay = i32::try_from(due.saturating_sub(now).as_millis()).unwrap_or(i32::MAX);
        let callback = Closure::once_into_js(move || {
            with_runtime(|runtime| {
                runtime.timer = None;
                let now = runtime.page.clock();
                runtime.dispatch(&Trigger::TimerFired { now })
            });
        });
        match self
            .page
            .window()
            .set_timeout_with_callback_and_timeout_and_arguments_0(callback.unchecked_ref(), delay)
        {
            Ok(handle) => self.timer = Some(handle),
            Err(err) => warn!(error = ?err, "could not schedule notification timer"),
        }
    }
}

pub fn install(runtime: Runtime) {
    RUNTIME.with(|slot| *slot.borrow_mut() = Some(runtime));
}

/// Runs `f` against the installed runtime. Events that arrive while another
/// handler holds it (or before installation) are dropped.
pub fn with_runtime<T>(f: impl FnOnce(&mut Runtime) -> T) -> Option<T> {
    RUNTIME.with(|slot| {
        let Ok(mut guard) = slot.try_borrow_mut() else {
            debug!("runtime busy; event dropped");
            return None;
        };
        guard.as_mut().map(f)
    })
}

pub fn dispatch(trigger: Trigger) -> Option<Outcome> {
    with_runtime(|runtime| runtime.dispatch(&trigger)).flatten()
}
