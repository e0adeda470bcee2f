// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

//! Browser entry point: reads the page's config, installs logging and wires
//! document events into the console router.

pub mod dom;
pub mod events;
pub mod logging;
pub mod runtime;

use anyhow::{Context, Result};
use console_app::{Config, Console, Outcome, PanelCommand, Trigger};
use tracing::{error, info};
use wasm_bindgen::JsCast;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;
use web_sys::{Element, Event, EventTarget, HtmlInputElement, KeyboardEvent};

use crate::dom::{DomPage, js_error};
use crate::runtime::{Runtime, dispatch, with_runtime};

pub const CONFIG_ELEMENT_ID: &str = "console-config";
const LOG_ATTRIBUTE: &str = "data-log";

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    run().map_err(|err| JsValue::from_str(&format!("{err:#}")))
}

fn run() -> Result<()> {
    let page = DomPage::from_window()?;
    let source = page.document().get_element_by_id(CONFIG_ELEMENT_ID);
    let directive = source
        .as_ref()
        .and_then(|element| element.get_attribute(LOG_ATTRIBUTE));
    logging::init(directive.as_deref());

    let console = Console::new(load_config(source.as_ref()))?;
    runtime::install(Runtime::new(console, page.clone()));
    wire(&page)?;

    if still_parsing(&page.document().ready_state()) {
        listen(page.document(), "DOMContentLoaded", |_| boot())?;
    } else {
        boot();
    }
    Ok(())
}

/// `document.readyState` is `"loading"` until the parser finishes.
fn still_parsing(ready_state: &str) -> bool {
    ready_state == "loading"
}

fn load_config(source: Option<&Element>) -> Config {
    let Some(raw) = source.and_then(|element| element.text_content()) else {
        return Config::default();
    };
    match Config::parse(&raw) {
        Ok(config) => config,
        Err(err) => {
            error!(error = ?err, "console config rejected; using defaults");
            Config::default()
        }
    }
}

/// Runs once the document is parsed.
fn boot() {
    let adoptable = with_runtime(|runtime| -> Result<Vec<Element>> {
        runtime.page.install_backdrop()?;
        Ok(runtime.page.server_alerts())
    });
    let alerts = match adoptable {
        Some(Ok(alerts)) => alerts,
        Some(Err(err)) => {
            error!(error = ?err, "page setup failed");
            return;
        }
        None => return,
    };

    let trigger = Trigger::PageLoaded {
        server_alerts: alerts.len(),
    };
    if let Some(Outcome::Adopted(ids)) = dispatch(trigger) {
        with_runtime(|runtime| {
            for (alert, id) in alerts.iter().zip(ids) {
                if let Err(err) = runtime.page.tag_alert(alert, id) {
                    error!(%id, error = ?err, "server alert not tagged");
                }
            }
        });
    }
    info!("console ready");
}

fn listen(target: &EventTarget, name: &str, handler: impl FnMut(Event) + 'static) -> Result<()> {
    let closure = Closure::<dyn FnMut(Event)>::new(handler);
    target
        .add_event_listener_with_callback(name, closure.as_ref().unchecked_ref())
        .map_err(js_error)
        .with_context(|| format!("listen for {name}"))?;
    closure.forget();
    Ok(())
}

fn event_element(event: &Event) -> Option<Element> {
    event.target()?.dyn_into::<Element>().ok()
}

fn route(event: &Event, classify: impl FnOnce(&Config, &Element) -> Option<Trigger>) {
    let Some(target) = event_element(event) else {
        return;
    };
    let Some(trigger) = with_runtime(|runtime| classify(runtime.config(), &target)).flatten()
    else {
        return;
    };
    if dispatch(trigger) == Some(Outcome::Blocked) {
        event.prevent_default();
    }
}

fn wire(page: &DomPage) -> Result<()> {
    let document = page.document();

    listen(document, "click", |event| route(&event, events::click_trigger))?;

    listen(document, "keyup", |event| {
        route(&event, |config, target| {
            let query = target.dyn_ref::<HtmlInputElement>()?.value();
            events::search_trigger(config, target, query)
        });
    })?;

    listen(document, "submit", |event| route(&event, events::submit_trigger))?;

    listen(document, "keydown", |event| {
        let Some(key) = event.dyn_ref::<KeyboardEvent>().map(KeyboardEvent::key) else {
            return;
        };
        if let Some(trigger) = events::key_trigger(&key) {
            dispatch(trigger);
        }
    })?;

    listen(page.window(), "resize", |_| {
        let width = with_runtime(|runtime| runtime.page.viewport_width()).flatten();
        if let Some(width) = width {
            dispatch(Trigger::Panel(PanelCommand::Resize { width }));
        }
    })?;

    Ok(())
}
