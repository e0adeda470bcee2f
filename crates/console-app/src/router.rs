// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

//! Trigger routing. Hosts translate their native events into [`Trigger`]s and
//! hand them to [`Router::dispatch`]; handlers only see capability traits.

use anyhow::Result;
use std::collections::BTreeMap;
use std::time::Duration;
use tracing::debug;

use crate::{
    Config, DeleteOutcome, FORGOT_PASSWORD_MESSAGE, Locator, NotificationId, Notifier, Page,
    PanelCommand, PanelController, PanelEvent, PasswordVisibility, ResourceKind, RowMetadata,
    Severity, SubmitDecision, apply_filter, check_submission, populate_edit_dialog,
    submit_delete,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Trigger {
    /// Runs once after the document is ready. `server_alerts` is how many
    /// alerts the server rendered; the host receives their ids in order.
    PageLoaded { server_alerts: usize },
    EditRequested {
        resource: ResourceKind,
        row: RowMetadata,
    },
    DeleteRequested {
        resource: ResourceKind,
        row: RowMetadata,
    },
    SearchChanged { input: Locator, query: String },
    FormSubmitted { form: Locator },
    PasswordToggled,
    ForgotPassword,
    Panel(PanelCommand),
    AlertDismissed(NotificationId),
    TimerFired { now: Duration },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TriggerKind {
    PageLoaded,
    EditRequested,
    DeleteRequested,
    SearchChanged,
    FormSubmitted,
    PasswordToggled,
    ForgotPassword,
    Panel,
    AlertDismissed,
    TimerFired,
}

impl Trigger {
    pub const fn kind(&self) -> TriggerKind {
        match self {
            Self::PageLoaded { .. } => TriggerKind::PageLoaded,
            Self::EditRequested { .. } => TriggerKind::EditRequested,
            Self::DeleteRequested { .. } => TriggerKind::DeleteRequested,
            Self::SearchChanged { .. } => TriggerKind::SearchChanged,
            Self::FormSubmitted { .. } => TriggerKind::FormSubmitted,
            Self::PasswordToggled => TriggerKind::PasswordToggled,
            Self::ForgotPassword => TriggerKind::ForgotPassword,
            Self::Panel(_) => TriggerKind::Panel,
            Self::AlertDismissed(_) => TriggerKind::AlertDismissed,
            Self::TimerFired { .. } => TriggerKind::TimerFired,
        }
    }
}

/// What the host should do with the native event that produced the trigger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Handled,
    Ignored,
    /// The user declined a confirmation.
    Cancelled,
    /// A synthetic form went out; navigation follows.
    Submitted,
    /// Let the native default action continue.
    Proceed,
    /// Suppress the native default action.
    Blocked,
    /// Ids assigned to adopted server alerts, in document order.
    Adopted(Vec<NotificationId>),
}

/// Interaction state that outlives a single event.
#[derive(Debug, Clone)]
pub struct Console {
    pub config: Config,
    pub panel: PanelController,
    pub notifier: Notifier,
    pub password: PasswordVisibility,
}

impl Console {
    pub fn new(config: Config) -> Result<Self> {
        let notifier = Notifier::new(config.timing()?).with_anchor(config.alert_anchor());
        let panel = PanelController::new(config.collapse_width());
        Ok(Self {
            config,
            panel,
            notifier,
            password: PasswordVisibility::default(),
        })
    }

    pub fn notify(&mut self, page: &mut dyn Page, message: &str, severity: Severity) -> NotificationId {
        self.notifier.emit(page, message, severity)
    }
}

pub type Handler = fn(&mut Console, &mut dyn Page, &Trigger) -> Result<Outcome>;

#[derive(Clone, Default)]
pub struct Router {
    handlers: BTreeMap<TriggerKind, Handler>,
}

impl Router {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn standard() -> Self {
        let mut router = Self::new();
        router.register(TriggerKind::PageLoaded, on_page_loaded);
        router.register(TriggerKind::EditRequested, on_edit);
        router.register(TriggerKind::DeleteRequested, on_delete);
        router.register(TriggerKind::SearchChanged, on_search);
        router.register(TriggerKind::FormSubmitted, on_submit);
        router.register(TriggerKind::PasswordToggled, on_password_toggle);
        router.register(TriggerKind::ForgotPassword, on_forgot_password);
        router.register(TriggerKind::Panel, on_panel);
        router.register(TriggerKind::AlertDismissed, on_alert_dismissed);
        router.register(TriggerKind::TimerFired, on_timer);
        router
    }

    /// Replaces any handler already registered for `kind`.
    pub fn register(&mut self, kind: TriggerKind, handler: Handler) {
        self.handlers.insert(kind, handler);
    }

    pub fn is_registered(&self, kind: TriggerKind) -> bool {
        self.handlers.contains_key(&kind)
    }

    pub fn dispatch(
        &self,
        console: &mut Console,
        page: &mut dyn Page,
        trigger: &Trigger,
    ) -> Result<Outcome> {
        let kind = trigger.kind();
        let Some(handler) = self.handlers.get(&kind) else {
            debug!(?kind, "no handler registered");
            return Ok(Outcome::Ignored);
        };
        handler(console, page, trigger)
    }
}

fn on_page_loaded(console: &mut Console, page: &mut dyn Page, trigger: &Trigger) -> Result<Outcome> {
    let Trigger::PageLoaded { server_alerts } = trigger else {
        return Ok(Outcome::Ignored);
    };
    if console.config.remember_me.restore(page)? {
        debug!("username restored from remember-me preference");
    }
    let adopted = (0..*server_alerts).map(|_| console.notifier.adopt()).collect();
    Ok(Outcome::Adopted(adopted))
}

fn on_edit(console: &mut Console, page: &mut dyn Page, trigger: &Trigger) -> Result<Outcome> {
    let Trigger::EditRequested { resource, row } = trigger else {
        return Ok(Outcome::Ignored);
    };
    let descriptor = console.config.resource(*resource)?;
    populate_edit_dialog(page, descriptor, row)?;
    Ok(Outcome::Handled)
}

fn on_delete(console: &mut Console, page: &mut dyn Page, trigger: &Trigger) -> Result<Outcome> {
    let Trigger::DeleteRequested { resource, row } = trigger else {
        return Ok(Outcome::Ignored);
    };
    let descriptor = console.config.resource(*resource)?;
    Ok(match submit_delete(page, descriptor, row)? {
        DeleteOutcome::Cancelled => Outcome::Cancelled,
        DeleteOutcome::Submitted => Outcome::Submitted,
    })
}

fn on_search(console: &mut Console, page: &mut dyn Page, trigger: &Trigger) -> Result<Outcome> {
    let Trigger::SearchChanged { input, query } = trigger else {
        return Ok(Outcome::Ignored);
    };
    let Some(spec) = console.config.table_for_input(input) else {
        return Ok(Outcome::Ignored);
    };
    let visible = apply_filter(page, spec, query)?;
    debug!(table = %spec.table, visible, "table filtered");
    Ok(Outcome::Handled)
}

fn on_submit(console: &mut Console, page: &mut dyn Page, trigger: &Trigger) -> Result<Outcome> {
    let Trigger::FormSubmitted { form } = trigger else {
        return Ok(Outcome::Ignored);
    };
    let Some(spec) = console.config.form(form).cloned() else {
        return Ok(Outcome::Proceed);
    };
    // The checkbox state is saved on every attempt, blocked or not.
    if spec.remember_me {
        console.config.remember_me.persist(page)?;
    }
    match check_submission(page, &spec)? {
        SubmitDecision::Blocked(violation) => {
            console.notify(page, &violation.message, Severity::Error);
            Ok(Outcome::Blocked)
        }
        SubmitDecision::Proceed => Ok(Outcome::Proceed),
    }
}

fn on_password_toggle(
    console: &mut Console,
    page: &mut dyn Page,
    _trigger: &Trigger,
) -> Result<Outcome> {
    console.password = console.config.password_toggle.apply(page, console.password)?;
    Ok(Outcome::Handled)
}

fn on_forgot_password(
    console: &mut Console,
    page: &mut dyn Page,
    _trigger: &Trigger,
) -> Result<Outcome> {
    console.notify(page, FORGOT_PASSWORD_MESSAGE, Severity::Info);
    Ok(Outcome::Blocked)
}

fn on_panel(console: &mut Console, page: &mut dyn Page, trigger: &Trigger) -> Result<Outcome> {
    let Trigger::Panel(command) = trigger else {
        return Ok(Outcome::Ignored);
    };
    let events = console.panel.dispatch(*command);
    if events.is_empty() {
        return Ok(Outcome::Ignored);
    }
    for PanelEvent::Changed(projection) in events {
        page.project(projection)?;
    }
    Ok(Outcome::Handled)
}

fn on_alert_dismissed(
    console: &mut Console,
    page: &mut dyn Page,
    trigger: &Trigger,
) -> Result<Outcome> {
    let Trigger::AlertDismissed(id) = trigger else {
        return Ok(Outcome::Ignored);
    };
    console.notifier.dismiss(page, *id);
    Ok(Outcome::Handled)
}

fn on_timer(console: &mut Console, page: &mut dyn Page, trigger: &Trigger) -> Result<Outcome> {
    let Trigger::TimerFired { now } = trigger else {
        return Ok(Outcome::Ignored);
    };
    console.notifier.advance_to(page, *now);
    Ok(Outcome::Handled)
}

#[cfg(test)]
mod tests {
    use super::{Router, Trigger, TriggerKind};
    use crate::{Locator, NotificationId, PanelCommand, ResourceKind, RowMetadata};
    use std::time::Duration;

    #[test]
    fn every_trigger_kind_has_a_standard_handler() {
        let router = Router::standard();
        let triggers = [
            Trigger::PageLoaded { server_alerts: 0 },
            Trigger::EditRequested {
                resource: ResourceKind::Course,
                row: RowMetadata::new(),
            },
            Trigger::DeleteRequested {
                resource: ResourceKind::Csr,
                row: RowMetadata::new(),
            },
            Trigger::SearchChanged {
                input: Locator::from("courseSearch"),
                query: String::new(),
            },
            Trigger::FormSubmitted {
                form: Locator::from(".modern-form"),
            },
            Trigger::PasswordToggled,
            Trigger::ForgotPassword,
            Trigger::Panel(PanelCommand::Escape),
            Trigger::AlertDismissed(NotificationId::new(1)),
            Trigger::TimerFired {
                now: Duration::ZERO,
            },
        ];
        for trigger in triggers {
            assert!(router.is_registered(trigger.kind()), "{:?}", trigger.kind());
        }
    }

    #[test]
    fn empty_router_has_no_handlers() {
        assert!(!Router::new().is_registered(TriggerKind::Panel));
    }
}
