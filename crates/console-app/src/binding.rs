// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

//! Capability seams between the interaction logic and whatever document hosts
//! it. The browser adapter implements these over the DOM; tests use an
//! in-memory page.

use anyhow::Result;

use crate::{GroupName, Locator, NotificationId, Severity};

pub trait FormBinding {
    fn value(&self, field: &Locator) -> Option<String>;
    fn set_value(&mut self, field: &Locator, value: &str) -> Result<()>;
    fn is_checked(&self, field: &Locator) -> Option<bool>;
    fn set_checked(&mut self, field: &Locator, checked: bool) -> Result<()>;
    /// Option values of every checkbox in the group, in document order.
    fn group_options(&self, group: &GroupName) -> Vec<String>;
    /// Returns `false` when no option of the group carries `value`.
    fn set_group_option(&mut self, group: &GroupName, value: &str, checked: bool) -> bool;
    fn focus(&mut self, field: &Locator) -> Result<()>;
    /// Adds the loading style and disables the control. Never reverted here.
    fn mark_busy(&mut self, control: &Locator) -> Result<()>;
    fn set_input_type(&mut self, field: &Locator, input_type: &str) -> Result<()>;
    fn set_icon(&mut self, control: &Locator, remove: &str, add: &str) -> Result<()>;
    fn show_modal(&mut self, dialog: &Locator) -> Result<()>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntheticForm {
    pub method: &'static str,
    pub hidden: bool,
    pub fields: Vec<(String, String)>,
}

impl SyntheticForm {
    pub const CSRF_FIELD: &'static str = "csrfmiddlewaretoken";
    pub const ACTION_FIELD: &'static str = "action";
    pub const DELETE_ACTION: &'static str = "delete";

    pub fn delete(token: &str, id_field: &str, id: &str) -> Self {
        Self {
            method: "POST",
            hidden: true,
            fields: vec![
                (Self::CSRF_FIELD.to_owned(), token.to_owned()),
                (Self::ACTION_FIELD.to_owned(), Self::DELETE_ACTION.to_owned()),
                (id_field.to_owned(), id.to_owned()),
            ],
        }
    }

    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }
}

pub trait PageHost {
    /// Blocks until the user answers.
    fn confirm(&mut self, prompt: &str) -> bool;
    fn csrf_token(&self) -> Option<String>;
    /// Appends the form to the document body and submits it.
    fn submit(&mut self, form: SyntheticForm) -> Result<()>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableRow {
    pub cells: Vec<String>,
}

impl TableRow {
    pub fn new<I, S>(cells: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            cells: cells.into_iter().map(Into::into).collect(),
        }
    }
}

pub trait TableView {
    /// Every `<tr>` of the table, header rows included.
    fn rows(&self, table: &Locator) -> Vec<TableRow>;
    /// One entry per row as returned by [`TableView::rows`], written in a
    /// single pass. `None` leaves that row's visibility alone.
    fn set_rows_visible(&mut self, table: &Locator, visibility: &[Option<bool>]) -> Result<()>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PanelProjection {
    pub panel_shown: bool,
    pub content_expanded: bool,
    pub backdrop_shown: bool,
}

pub trait PanelView {
    fn project(&mut self, projection: PanelProjection) -> Result<()>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlertNode {
    pub id: NotificationId,
    pub severity: Severity,
    pub message: String,
}

impl AlertNode {
    pub const CLASS: &'static str = "modern-alert";

    pub fn class_name(&self) -> String {
        format!("{} alert-{}", Self::CLASS, self.severity.as_str())
    }

    pub fn icon(&self) -> &'static str {
        self.severity.icon()
    }
}

pub trait AlertSurface {
    /// Detaches every node carrying the alert class and returns how many went.
    fn clear_alerts(&mut self) -> usize;
    /// Places the node right after `anchor`, or at the top of the page body
    /// when `anchor` is `None`. `false` when there is nowhere to put it.
    fn insert_alert(&mut self, anchor: Option<&Locator>, node: &AlertNode) -> bool;
    fn reveal_alert(&mut self, id: NotificationId);
    fn fade_alert(&mut self, id: NotificationId);
    fn detach_alert(&mut self, id: NotificationId);
    fn is_attached(&self, id: NotificationId) -> bool;
}

pub trait DurableStore {
    fn get_item(&self, key: &str) -> Option<String>;
    fn set_item(&mut self, key: &str, value: &str) -> Result<()>;
    fn remove_item(&mut self, key: &str) -> Result<()>;
}

pub trait Page: FormBinding + PageHost + TableView + PanelView + AlertSurface + DurableStore {}

impl<T> Page for T where
    T: FormBinding + PageHost + TableView + PanelView + AlertSurface + DurableStore
{
}
