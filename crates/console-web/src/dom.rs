// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

//! [`console_app::Page`] over the live document.

use anyhow::{Context, Result, anyhow, bail};
use console_app::{
    AlertNode, AlertSurface, ConsoleError, DurableStore, FormBinding, GroupName, Locator,
    NotificationId, PageHost, PanelProjection, PanelView, SyntheticForm, TableRow, TableView,
};
use tracing::{debug, warn};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{
    Document, Element, HtmlButtonElement, HtmlElement, HtmlFormElement, HtmlInputElement,
    HtmlTableRowElement, NodeList, Storage, Window,
};

pub const ALERT_ID_ATTRIBUTE: &str = "data-alert-id";
pub const ALERT_DISMISS_CLASS: &str = "alert-dismiss";
pub const BACKDROP_CLASS: &str = "sidebar-overlay";

const CSRF_SELECTOR: &str = "[name=csrfmiddlewaretoken]";
const PANEL: &str = "#sidebar";
const CONTENT: &str = ".main-content";
const SHOWN_CLASS: &str = "show";
const EXPANDED_CLASS: &str = "sidebar-expanded";
const BUSY_CLASS: &str = "loading";

#[wasm_bindgen]
extern "C" {
    /// Bootstrap's modal component, present when the page loads its bundle.
    #[wasm_bindgen(js_namespace = bootstrap)]
    type Modal;

    #[wasm_bindgen(static_method_of = Modal, js_namespace = bootstrap, js_name = getOrCreateInstance, catch)]
    fn get_or_create_instance(element: &Element) -> Result<Modal, JsValue>;

    #[wasm_bindgen(method, catch)]
    fn show(this: &Modal) -> Result<(), JsValue>;
}

pub fn js_error(value: JsValue) -> anyhow::Error {
    anyhow!("browser call failed: {value:?}")
}

/// A locator that already looks like a selector is used as-is; anything
/// else is an element id.
pub fn selector_for(locator: &Locator) -> String {
    let raw = locator.as_str();
    if is_selector(raw) {
        raw.to_owned()
    } else {
        format!("#{raw}")
    }
}

/// Whether `element` is what `locator` resolves to, by the same rules as
/// [`DomPage::resolve`].
pub fn matches_locator(element: &Element, locator: &Locator) -> bool {
    let raw = locator.as_str();
    if is_selector(raw) {
        return element.matches(raw).unwrap_or(false);
    }
    element.id() == raw || element.get_attribute("name").as_deref() == Some(raw)
}

fn is_selector(raw: &str) -> bool {
    raw.starts_with(['#', '.', '['])
}

fn nodes<T: JsCast>(list: &NodeList) -> Vec<T> {
    (0..list.length())
        .filter_map(|index| list.item(index))
        .filter_map(|node| node.dyn_into::<T>().ok())
        .collect()
}

#[derive(Debug, Clone)]
pub struct DomPage {
    window: Window,
    document: Document,
}

impl DomPage {
    pub fn from_window() -> Result<Self> {
        let window = web_sys::window().context("no global window")?;
        let document = window.document().context("window has no document")?;
        Ok(Self { window, document })
    }

    pub fn window(&self) -> &Window {
        &self.window
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    /// Milliseconds since navigation start, as the notifier's clock.
    pub fn clock(&self) -> std::time::Duration {
        let millis = self
            .window
            .performance()
            .map(|performance| performance.now())
            .unwrap_or_default();
        std::time::Duration::from_secs_f64(millis.max(0.0) / 1000.0)
    }

    pub fn viewport_width(&self) -> Option<u32> {
        let width = self.window.inner_width().ok()?.as_f64()?;
        Some(width.max(0.0) as u32)
    }

    /// Resolves a locator: CSS selector, then element id, then `name`.
    pub fn resolve(&self, locator: &Locator) -> Option<Element> {
        let raw = locator.as_str();
        if is_selector(raw) {
            return self.document.query_selector(raw).ok().flatten();
        }
        self.document
            .get_element_by_id(raw)
            .or_else(|| nodes::<Element>(&self.document.get_elements_by_name(raw)).into_iter().next())
    }

    fn resolve_as<T: JsCast>(&self, locator: &Locator) -> Result<T> {
        self.resolve(locator)
            .and_then(|element| element.dyn_into::<T>().ok())
            .ok_or_else(|| ConsoleError::missing_element(locator).into())
    }

    fn select_all(&self, selector: &str) -> Vec<Element> {
        self.document
            .query_selector_all(selector)
            .map(|list| nodes(&list))
            .unwrap_or_default()
    }

    fn group_inputs(&self, group: &GroupName) -> Vec<HtmlInputElement> {
        self.document
            .query_selector_all(&format!("input[name=\"{group}\"]"))
            .map(|list| nodes(&list))
            .unwrap_or_default()
    }

    fn create<T: JsCast>(&self, tag: &str) -> Result<T> {
        self.document
            .create_element(tag)
            .map_err(js_error)?
            .dyn_into::<T>()
            .map_err(|_| anyhow!("<{tag}> has an unexpected element type"))
    }

    /// Reads `data-<key>` for each key off the control that raised a trigger.
    pub fn row_metadata<'k>(
        element: &Element,
        keys: impl IntoIterator<Item = &'k str>,
    ) -> console_app::RowMetadata {
        keys.into_iter()
            .filter_map(|key| {
                element
                    .get_attribute(&format!("data-{key}"))
                    .map(|value| (key, value))
            })
            .collect()
    }

    /// Alerts the server rendered with the page, in document order.
    pub fn server_alerts(&self) -> Vec<Element> {
        self.select_all(&format!(".{}", AlertNode::CLASS))
    }

    pub fn tag_alert(&self, element: &Element, id: NotificationId) -> Result<()> {
        element
            .set_attribute(ALERT_ID_ATTRIBUTE, &id.to_string())
            .map_err(js_error)
    }

    /// Creates the panel backdrop once so projections always have a target.
    pub fn install_backdrop(&self) -> Result<()> {
        if self.backdrop().is_some() {
            return Ok(());
        }
        let body = self.document.body().context("document has no body")?;
        let backdrop: Element = self.create("div")?;
        backdrop.set_class_name(BACKDROP_CLASS);
        body.append_child(&backdrop).map_err(js_error)?;
        Ok(())
    }

    fn backdrop(&self) -> Option<Element> {
        self.document
            .query_selector(&format!(".{BACKDROP_CLASS}"))
            .ok()
            .flatten()
    }

    fn find_alert(&self, id: NotificationId) -> Option<HtmlElement> {
        let selector = format!(".{}[{ALERT_ID_ATTRIBUTE}=\"{id}\"]", AlertNode::CLASS);
        self.document
            .query_selector(&selector)
            .ok()
            .flatten()
            .and_then(|element| element.dyn_into::<HtmlElement>().ok())
    }

    fn style_alert(&self, id: NotificationId, opacity: &str, transform: &str) {
        let Some(alert) = self.find_alert(id) else {
            return;
        };
        let style = alert.style();
        let styled = style
            .set_property("opacity", opacity)
            .and_then(|()| style.set_property("transform", transform));
        if let Err(err) = styled {
            debug!(%id, error = ?err, "alert style not applied");
        }
    }

    fn build_alert(&self, node: &AlertNode) -> Result<HtmlElement> {
        let alert: HtmlElement = self.create("div")?;
        alert.set_class_name(&node.class_name());
        self.tag_alert(&alert, node.id)?;
        alert.style().set_property("opacity", "0").map_err(js_error)?;

        let icon_slot: Element = self.create("div")?;
        icon_slot.set_class_name("alert-icon");
        let icon: Element = self.create("i")?;
        icon.set_class_name(&format!("fas fa-{}", node.icon()));
        icon_slot.append_child(&icon).map_err(js_error)?;

        let message: Element = self.create("div")?;
        message.set_class_name("alert-message");
        message.set_text_content(Some(&node.message));

        let dismiss: HtmlButtonElement = self.create("button")?;
        dismiss.set_type("button");
        dismiss.set_class_name(ALERT_DISMISS_CLASS);
        let close: Element = self.create("i")?;
        close.set_class_name("fas fa-times");
        dismiss.append_child(&close).map_err(js_error)?;

        alert.append_child(&icon_slot).map_err(js_error)?;
        alert.append_child(&message).map_err(js_error)?;
        alert.append_child(&dismiss).map_err(js_error)?;
        Ok(alert)
    }
}

impl FormBinding for DomPage {
    fn value(&self, field: &Locator) -> Option<String> {
        self.resolve_as::<HtmlInputElement>(field)
            .ok()
            .map(|input| input.value())
    }

    fn set_value(&mut self, field: &Locator, value: &str) -> Result<()> {
        self.resolve_as::<HtmlInputElement>(field)?.set_value(value);
        Ok(())
    }

    fn is_checked(&self, field: &Locator) -> Option<bool> {
        self.resolve_as::<HtmlInputElement>(field)
            .ok()
            .map(|input| input.checked())
    }

    fn set_checked(&mut self, field: &Locator, checked: bool) -> Result<()> {
        self.resolve_as::<HtmlInputElement>(field)?.set_checked(checked);
        Ok(())
    }

    fn group_options(&self, group: &GroupName) -> Vec<String> {
        self.group_inputs(group)
            .iter()
            .map(HtmlInputElement::value)
            .collect()
    }

    fn set_group_option(&mut self, group: &GroupName, value: &str, checked: bool) -> bool {
        let mut matched = false;
        for input in self.group_inputs(group) {
            if input.value() == value {
                input.set_checked(checked);
                matched = true;
            }
        }
        matched
    }

    fn focus(&mut self, field: &Locator) -> Result<()> {
        self.resolve_as::<HtmlElement>(field)?
            .focus()
            .map_err(js_error)
    }

    fn mark_busy(&mut self, control: &Locator) -> Result<()> {
        let element = self
            .resolve(control)
            .ok_or_else(|| ConsoleError::missing_element(control))?;
        element.class_list().add_1(BUSY_CLASS).map_err(js_error)?;
        if let Some(button) = element.dyn_ref::<HtmlButtonElement>() {
            button.set_disabled(true);
        }
        Ok(())
    }

    fn set_input_type(&mut self, field: &Locator, input_type: &str) -> Result<()> {
        self.resolve_as::<HtmlInputElement>(field)?.set_type(input_type);
        Ok(())
    }

    fn set_icon(&mut self, control: &Locator, remove: &str, add: &str) -> Result<()> {
        let control_element = self
            .resolve(control)
            .ok_or_else(|| ConsoleError::missing_element(control))?;
        let icon = control_element
            .query_selector("i")
            .ok()
            .flatten()
            .unwrap_or(control_element);
        let classes = icon.class_list();
        classes.remove_1(remove).map_err(js_error)?;
        classes.add_1(add).map_err(js_error)
    }

    fn show_modal(&mut self, dialog: &Locator) -> Result<()> {
        let modal = self.resolve_as::<HtmlElement>(dialog)?;
        match Modal::get_or_create_instance(&modal).and_then(|instance| instance.show()) {
            Ok(()) => Ok(()),
            Err(err) => {
                debug!(%dialog, error = ?err, "bootstrap modal unavailable; showing dialog directly");
                self.reveal_dialog(&modal)
            }
        }
    }
}

impl DomPage {
    /// What bootstrap's modal does to the markup, for pages without its script.
    fn reveal_dialog(&self, modal: &HtmlElement) -> Result<()> {
        modal.class_list().add_1(SHOWN_CLASS).map_err(js_error)?;
        modal
            .style()
            .set_property("display", "block")
            .map_err(js_error)?;
        modal.remove_attribute("aria-hidden").map_err(js_error)?;
        modal.set_attribute("aria-modal", "true").map_err(js_error)?;
        if let Some(body) = self.document.body() {
            body.class_list().add_1("modal-open").map_err(js_error)?;
        }
        Ok(())
    }
}

impl PageHost for DomPage {
    fn confirm(&mut self, prompt: &str) -> bool {
        self.window.confirm_with_message(prompt).unwrap_or(false)
    }

    fn csrf_token(&self) -> Option<String> {
        self.document
            .query_selector(CSRF_SELECTOR)
            .ok()
            .flatten()
            .and_then(|element| element.dyn_into::<HtmlInputElement>().ok())
            .map(|input| input.value())
    }

    fn submit(&mut self, form: SyntheticForm) -> Result<()> {
        let element: HtmlFormElement = self.create("form")?;
        element.set_method(form.method);
        if form.hidden {
            element
                .style()
                .set_property("display", "none")
                .map_err(js_error)?;
        }
        for (name, value) in &form.fields {
            let input: HtmlInputElement = self.create("input")?;
            input.set_type("hidden");
            input.set_name(name);
            input.set_value(value);
            element.append_child(&input).map_err(js_error)?;
        }
        let body = self.document.body().context("document has no body")?;
        body.append_child(&element).map_err(js_error)?;
        element.submit().map_err(js_error)
    }
}

impl DomPage {
    fn table_rows(&self, table: &Locator) -> Vec<HtmlTableRowElement> {
        let Some(table) = self.resolve(table) else {
            return Vec::new();
        };
        let rows = table.get_elements_by_tag_name("tr");
        (0..rows.length())
            .filter_map(|index| rows.item(index))
            .filter_map(|row| row.dyn_into::<HtmlTableRowElement>().ok())
            .collect()
    }
}

impl TableView for DomPage {
    fn rows(&self, table: &Locator) -> Vec<TableRow> {
        self.table_rows(table)
            .iter()
            .map(|row| {
                let cells = row.cells();
                TableRow::new(
                    (0..cells.length())
                        .filter_map(|index| cells.item(index))
                        .map(|cell| cell.text_content().unwrap_or_default()),
                )
            })
            .collect()
    }

    fn set_rows_visible(&mut self, table: &Locator, visibility: &[Option<bool>]) -> Result<()> {
        let rows = self.table_rows(table);
        if rows.len() < visibility.len() {
            bail!("table {table} has {} rows, expected {}", rows.len(), visibility.len());
        }
        for (row, visible) in rows.iter().zip(visibility) {
            let Some(visible) = visible else {
                continue;
            };
            let display = if *visible { "" } else { "none" };
            row.style()
                .set_property("display", display)
                .map_err(js_error)?;
        }
        Ok(())
    }
}

impl PanelView for DomPage {
    fn project(&mut self, projection: PanelProjection) -> Result<()> {
        let parts = [
            (self.document.query_selector(PANEL).ok().flatten(), SHOWN_CLASS, projection.panel_shown),
            (
                self.document.query_selector(CONTENT).ok().flatten(),
                EXPANDED_CLASS,
                projection.content_expanded,
            ),
            (self.backdrop(), SHOWN_CLASS, projection.backdrop_shown),
        ];
        for (element, class, on) in parts {
            let Some(element) = element else {
                continue;
            };
            element
                .class_list()
                .toggle_with_force(class, on)
                .map_err(js_error)?;
        }
        Ok(())
    }
}

impl AlertSurface for DomPage {
    fn clear_alerts(&mut self) -> usize {
        let alerts = self.server_alerts();
        for alert in &alerts {
            alert.remove();
        }
        alerts.len()
    }

    fn insert_alert(&mut self, anchor: Option<&Locator>, node: &AlertNode) -> bool {
        let (target, position) = match anchor {
            Some(anchor) => (self.resolve(anchor), "afterend"),
            None => (self.document.body().map(Element::from), "afterbegin"),
        };
        let Some(target) = target else {
            return false;
        };
        let inserted = self.build_alert(node).and_then(|alert| {
            target
                .insert_adjacent_element(position, &alert)
                .map_err(js_error)
        });
        match inserted {
            Ok(_) => true,
            Err(err) => {
                warn!(id = %node.id, error = %err, "alert could not be inserted");
                false
            }
        }
    }

    fn reveal_alert(&mut self, id: NotificationId) {
        self.style_alert(id, "1", "translateY(0)");
    }

    fn fade_alert(&mut self, id: NotificationId) {
        self.style_alert(id, "0", "translateY(-20px)");
    }

    fn detach_alert(&mut self, id: NotificationId) {
        if let Some(alert) = self.find_alert(id) {
            alert.remove();
        }
    }

    fn is_attached(&self, id: NotificationId) -> bool {
        self.find_alert(id).is_some()
    }
}

impl DomPage {
    fn storage(&self) -> Option<Storage> {
        self.window.local_storage().ok().flatten()
    }
}

impl DurableStore for DomPage {
    fn get_item(&self, key: &str) -> Option<String> {
        self.storage()?.get_item(key).ok().flatten()
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<()> {
        let storage = self.storage().context("localStorage unavailable")?;
        storage.set_item(key, value).map_err(js_error)
    }

    fn remove_item(&mut self, key: &str) -> Result<()> {
        let storage = self.storage().context("localStorage unavailable")?;
        storage.remove_item(key).map_err(js_error)
    }
}
