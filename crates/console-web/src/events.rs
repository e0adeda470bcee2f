// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

//! Native DOM events to [`Trigger`]s. Everything is delegated from the
//! document, so controls rendered after start-up still route.

use console_app::{
    AlertNode, Config, NotificationId, PanelCommand, ResourceDescriptor, Trigger,
};
use web_sys::Element;

use crate::dom::{
    ALERT_DISMISS_CLASS, ALERT_ID_ATTRIBUTE, BACKDROP_CLASS, DomPage, matches_locator,
    selector_for,
};

const PANEL_TOGGLE: &str = "#toggleSidebar";
const PANEL_CLOSE: &str = "#closeSidebar";
const FORGOT_LINK: &str = ".forgot-link";

fn closest(target: &Element, selector: &str) -> Option<Element> {
    target.closest(selector).ok().flatten()
}

/// Every data attribute the descriptor's flows read, the row id included.
fn metadata_keys(descriptor: &ResourceDescriptor) -> Vec<&str> {
    let mut keys = vec!["id"];
    keys.extend(descriptor.fields.iter().map(|field| field.key.as_str()));
    keys.extend(descriptor.multi.iter().map(|multi| multi.key.as_str()));
    keys.sort_unstable();
    keys.dedup();
    keys
}

pub fn click_trigger(config: &Config, target: &Element) -> Option<Trigger> {
    if let Some(button) = closest(target, &format!(".{ALERT_DISMISS_CLASS}")) {
        let alert = closest(&button, &format!(".{}", AlertNode::CLASS))?;
        let id = alert.get_attribute(ALERT_ID_ATTRIBUTE)?.parse::<u64>().ok()?;
        return Some(Trigger::AlertDismissed(NotificationId::new(id)));
    }

    for descriptor in &config.resources {
        if let Some(control) = closest(target, &format!(".{}", descriptor.edit_trigger)) {
            return Some(Trigger::EditRequested {
                resource: descriptor.kind,
                row: DomPage::row_metadata(&control, metadata_keys(descriptor)),
            });
        }
        if let Some(control) = closest(target, &format!(".{}", descriptor.delete_trigger)) {
            return Some(Trigger::DeleteRequested {
                resource: descriptor.kind,
                row: DomPage::row_metadata(&control, metadata_keys(descriptor)),
            });
        }
    }

    if closest(target, PANEL_TOGGLE).is_some() {
        return Some(Trigger::Panel(PanelCommand::Toggle));
    }
    if closest(target, PANEL_CLOSE).is_some() {
        return Some(Trigger::Panel(PanelCommand::Close));
    }
    if target.class_list().contains(BACKDROP_CLASS) {
        return Some(Trigger::Panel(PanelCommand::BackdropClick));
    }
    if closest(target, &selector_for(&config.password_toggle.control)).is_some() {
        return Some(Trigger::PasswordToggled);
    }
    if closest(target, FORGOT_LINK).is_some() {
        return Some(Trigger::ForgotPassword);
    }
    None
}

pub fn search_trigger(config: &Config, target: &Element, query: String) -> Option<Trigger> {
    let spec = config
        .tables
        .iter()
        .find(|spec| matches_locator(target, &spec.input))?;
    Some(Trigger::SearchChanged {
        input: spec.input.clone(),
        query,
    })
}

pub fn submit_trigger(config: &Config, form: &Element) -> Option<Trigger> {
    let spec = config
        .forms
        .iter()
        .find(|spec| matches_locator(form, &spec.form))?;
    Some(Trigger::FormSubmitted {
        form: spec.form.clone(),
    })
}

pub fn key_trigger(key: &str) -> Option<Trigger> {
    (key == "Escape").then_some(Trigger::Panel(PanelCommand::Escape))
}
