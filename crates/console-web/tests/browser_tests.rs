// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

#![cfg(target_arch = "wasm32")]

use console_app::{
    AlertNode, AlertSurface, FormBinding, Locator, NotificationId, Severity, TableView,
};
use console_web::dom::DomPage;
use wasm_bindgen::prelude::*;
use wasm_bindgen_test::{wasm_bindgen_test, wasm_bindgen_test_configure};
use web_sys::Element;

wasm_bindgen_test_configure!(run_in_browser);

#[wasm_bindgen(inline_js = "
export function install_bootstrap() {
    window.bootstrap = {
        Modal: {
            getOrCreateInstance(element) {
                return { show() { element.dataset.shownBy = 'bootstrap'; } };
            },
        },
    };
}
export function remove_bootstrap() {
    delete window.bootstrap;
}
")]
extern "C" {
    fn install_bootstrap();
    fn remove_bootstrap();
}

fn mount(page: &DomPage, markup: &str) -> Element {
    let document = page.document();
    let host = document.create_element("div").expect("create host");
    host.set_inner_html(markup);
    document
        .body()
        .expect("test page has a body")
        .append_child(&host)
        .expect("mount host");
    host
}

#[wasm_bindgen_test]
fn modal_is_shown_through_bootstrap_when_loaded() {
    let mut page = DomPage::from_window().expect("browser window");
    let host = mount(&page, r#"<div id="editCourseModal" class="modal"></div>"#);
    install_bootstrap();

    page.show_modal(&Locator::from("editCourseModal"))
        .expect("modal shown");
    let modal = page.resolve(&Locator::from("editCourseModal")).expect("modal mounted");
    assert_eq!(modal.get_attribute("data-shown-by").as_deref(), Some("bootstrap"));
    assert!(!modal.class_list().contains("show"));

    remove_bootstrap();
    host.remove();
}

#[wasm_bindgen_test]
fn modal_falls_back_to_classes_without_bootstrap() {
    let mut page = DomPage::from_window().expect("browser window");
    let host = mount(&page, r#"<div id="editCSRModal" class="modal" aria-hidden="true"></div>"#);
    remove_bootstrap();

    page.show_modal(&Locator::from("editCSRModal"))
        .expect("modal shown");
    let modal = page.resolve(&Locator::from("editCSRModal")).expect("modal mounted");
    assert!(modal.class_list().contains("show"));
    assert_eq!(modal.get_attribute("aria-hidden"), None);
    assert_eq!(modal.get_attribute("aria-modal").as_deref(), Some("true"));

    host.remove();
}

#[wasm_bindgen_test]
fn alert_goes_to_top_of_body_when_anchor_is_missing() {
    let mut page = DomPage::from_window().expect("browser window");
    let node = AlertNode {
        id: NotificationId::new(901),
        severity: Severity::Error,
        message: "Passwords do not match!".to_owned(),
    };

    assert!(!page.insert_alert(Some(&Locator::from(".no-such-header")), &node));
    assert!(page.insert_alert(None, &node));

    let body = page.document().body().expect("test page has a body");
    let first = body.first_element_child().expect("alert inserted");
    assert!(first.class_list().contains(AlertNode::CLASS));
    assert_eq!(first.get_attribute("data-alert-id").as_deref(), Some("901"));
    first.remove();
}

#[wasm_bindgen_test]
fn rows_are_hidden_in_one_pass_and_placeholders_kept() {
    let mut page = DomPage::from_window().expect("browser window");
    let host = mount(
        &page,
        "<table id=\"rowsTable\">\
         <tr><th>Name</th><th>Trainer</th></tr>\
         <tr><td>Yoga</td><td>Sam</td></tr>\
         <tr><td>Spin</td><td>alice</td></tr>\
         </table>",
    );
    let table = Locator::from("rowsTable");
    assert_eq!(page.rows(&table).len(), 3);

    page.set_rows_visible(&table, &[None, Some(false), Some(true)])
        .expect("rows written");
    let rows = host.query_selector_all("tr").expect("rows");
    let display = |index: u32| {
        rows.item(index)
            .and_then(|node| node.dyn_into::<web_sys::HtmlElement>().ok())
            .and_then(|row| row.style().get_property_value("display").ok())
            .unwrap_or_default()
    };
    assert_eq!(display(0), "");
    assert_eq!(display(1), "none");
    assert_eq!(display(2), "");

    host.remove();
}
