// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Result, bail};
use console_app::{
    AlertNode, AlertSurface, ConsoleError, DurableStore, FormBinding, GroupName, Locator,
    NotificationId, PageHost, PanelProjection, PanelView, RowMetadata, Severity, SyntheticForm,
    TableRow, TableView,
};
use std::collections::{BTreeMap, VecDeque};

pub const CSRF_TOKEN: &str = "tok-4f9c2a";

const COURSE_TEXT_FIELDS: [&str; 4] = [
    "editCourseId",
    "editCourseName",
    "editTrainerName",
    "editCoursePrice",
];
const COURSE_DURATIONS: [&str; 5] = ["mon", "tue", "wed", "weekend", "1_month"];

const CSR_TEXT_FIELDS: [&str; 3] = ["editCSRId", "editFullName", "editUsername"];
const CSR_FLAGS: [&str; 2] = ["editIsActive", "editLeadRole"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FakeAlert {
    pub node: AlertNode,
    pub revealed: bool,
    pub fading: bool,
    /// Placed at the top of the body because the anchor was missing.
    pub at_page_top: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FakeCheckbox {
    pub value: String,
    pub checked: bool,
}

/// In-memory stand-in for a rendered admin page.
#[derive(Debug, Clone, Default)]
pub struct FakePage {
    pub values: BTreeMap<String, String>,
    pub checkboxes: BTreeMap<String, bool>,
    pub groups: BTreeMap<String, Vec<FakeCheckbox>>,
    pub input_types: BTreeMap<String, String>,
    pub icons: BTreeMap<String, String>,
    pub busy: Vec<String>,
    pub focused: Option<String>,
    pub dialogs: Vec<String>,
    pub shown_dialogs: Vec<String>,

    pub csrf_token: Option<String>,
    pub confirm_answers: VecDeque<bool>,
    pub prompts: Vec<String>,
    pub submitted: Vec<SyntheticForm>,

    pub tables: BTreeMap<String, Vec<TableRow>>,
    pub hidden_rows: BTreeMap<String, Vec<usize>>,
    pub table_writes: usize,

    pub panel: Option<PanelProjection>,
    pub projections: usize,

    pub alert_anchor: bool,
    pub page_body: bool,
    pub alerts: Vec<FakeAlert>,
    pub alert_inserts: usize,
    pub alert_detaches: usize,

    pub storage: BTreeMap<String, String>,
}

impl FakePage {
    pub fn new() -> Self {
        Self {
            csrf_token: Some(CSRF_TOKEN.to_owned()),
            alert_anchor: true,
            page_body: true,
            ..Self::default()
        }
    }

    /// The course management page: edit dialog, duration group, search table.
    pub fn course_page() -> Self {
        let mut page = Self::new().with_dialog("editCourseModal");
        for field in COURSE_TEXT_FIELDS {
            page = page.with_field(field, "");
        }
        page = page.with_group("edit_duration", &COURSE_DURATIONS);
        page.with_table(
            "courseTable",
            vec![
                TableRow::new(["Course", "Trainer", "Price", "Duration"]),
                TableRow::new(["Yoga", "Sam", "50", "mon,wed"]),
                TableRow::new(["Spin Class", "alice", "40", "tue"]),
                TableRow::new(["Boxing", "Carla", "60", "weekend"]),
            ],
        )
    }

    /// The CSR management page: edit dialog with two flags and the add form.
    pub fn csr_page() -> Self {
        let mut page = Self::new().with_dialog("editCSRModal");
        for field in CSR_TEXT_FIELDS {
            page = page.with_field(field, "");
        }
        for flag in CSR_FLAGS {
            page = page.with_checkbox(flag, false);
        }
        page.with_field("password", "")
            .with_field("confirmPassword", "")
    }

    pub fn login_page() -> Self {
        Self::new()
            .with_field("username", "")
            .with_field("password", "")
            .with_checkbox("rememberMe", false)
    }

    pub fn with_field(mut self, locator: &str, value: &str) -> Self {
        self.values.insert(locator.to_owned(), value.to_owned());
        self
    }

    pub fn with_checkbox(mut self, locator: &str, checked: bool) -> Self {
        self.checkboxes.insert(locator.to_owned(), checked);
        self
    }

    pub fn with_group(mut self, group: &str, options: &[&str]) -> Self {
        let options = options
            .iter()
            .map(|value| FakeCheckbox {
                value: (*value).to_owned(),
                checked: false,
            })
            .collect();
        self.groups.insert(group.to_owned(), options);
        self
    }

    pub fn with_dialog(mut self, dialog: &str) -> Self {
        self.dialogs.push(dialog.to_owned());
        self
    }

    pub fn with_table(mut self, table: &str, rows: Vec<TableRow>) -> Self {
        self.tables.insert(table.to_owned(), rows);
        self
    }

    pub fn without_csrf_token(mut self) -> Self {
        self.csrf_token = None;
        self
    }

    pub fn without_alert_anchor(mut self) -> Self {
        self.alert_anchor = false;
        self
    }

    /// A document with no body to fall back on, such as a bare fragment.
    pub fn without_page_body(mut self) -> Self {
        self.page_body = false;
        self
    }

    pub fn answer_confirm(mut self, answer: bool) -> Self {
        self.confirm_answers.push_back(answer);
        self
    }

    /// Pretends the server rendered an alert that is already in the document.
    pub fn with_server_alert(mut self, id: NotificationId, message: &str) -> Self {
        self.alerts.push(FakeAlert {
            node: AlertNode {
                id,
                severity: Severity::Info,
                message: message.to_owned(),
            },
            revealed: true,
            fading: false,
            at_page_top: false,
        });
        self
    }

    pub fn field(&self, locator: &str) -> Option<&str> {
        self.values.get(locator).map(String::as_str)
    }

    pub fn checked_options(&self, group: &str) -> Vec<&str> {
        self.groups
            .get(group)
            .map(|options| {
                options
                    .iter()
                    .filter(|option| option.checked)
                    .map(|option| option.value.as_str())
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn row_hidden(&self, table: &str, index: usize) -> bool {
        self.hidden_rows
            .get(table)
            .is_some_and(|hidden| hidden.contains(&index))
    }

    pub fn alert(&self, id: NotificationId) -> Option<&FakeAlert> {
        self.alerts.iter().find(|alert| alert.node.id == id)
    }

    fn alert_mut(&mut self, id: NotificationId) -> Option<&mut FakeAlert> {
        self.alerts.iter_mut().find(|alert| alert.node.id == id)
    }
}

impl FormBinding for FakePage {
    fn value(&self, field: &Locator) -> Option<String> {
        self.values.get(field.as_str()).cloned()
    }

    fn set_value(&mut self, field: &Locator, value: &str) -> Result<()> {
        let Some(slot) = self.values.get_mut(field.as_str()) else {
            return Err(ConsoleError::missing_element(field).into());
        };
        *slot = value.to_owned();
        Ok(())
    }

    fn is_checked(&self, field: &Locator) -> Option<bool> {
        self.checkboxes.get(field.as_str()).copied()
    }

    fn set_checked(&mut self, field: &Locator, checked: bool) -> Result<()> {
        let Some(slot) = self.checkboxes.get_mut(field.as_str()) else {
            return Err(ConsoleError::missing_element(field).into());
        };
        *slot = checked;
        Ok(())
    }

    fn group_options(&self, group: &GroupName) -> Vec<String> {
        self.groups
            .get(group.as_str())
            .map(|options| options.iter().map(|option| option.value.clone()).collect())
            .unwrap_or_default()
    }

    fn set_group_option(&mut self, group: &GroupName, value: &str, checked: bool) -> bool {
        let Some(options) = self.groups.get_mut(group.as_str()) else {
            return false;
        };
        let mut matched = false;
        for option in options.iter_mut().filter(|option| option.value == value) {
            option.checked = checked;
            matched = true;
        }
        matched
    }

    fn focus(&mut self, field: &Locator) -> Result<()> {
        if !self.values.contains_key(field.as_str()) {
            bail!("cannot focus missing element {field}");
        }
        self.focused = Some(field.as_str().to_owned());
        Ok(())
    }

    fn mark_busy(&mut self, control: &Locator) -> Result<()> {
        self.busy.push(control.as_str().to_owned());
        Ok(())
    }

    fn set_input_type(&mut self, field: &Locator, input_type: &str) -> Result<()> {
        self.input_types
            .insert(field.as_str().to_owned(), input_type.to_owned());
        Ok(())
    }

    fn set_icon(&mut self, control: &Locator, _remove: &str, add: &str) -> Result<()> {
        self.icons.insert(control.as_str().to_owned(), add.to_owned());
        Ok(())
    }

    fn show_modal(&mut self, dialog: &Locator) -> Result<()> {
        if !self.dialogs.iter().any(|known| known == dialog.as_str()) {
            return Err(ConsoleError::missing_element(dialog).into());
        }
        self.shown_dialogs.push(dialog.as_str().to_owned());
        Ok(())
    }
}

impl PageHost for FakePage {
    fn confirm(&mut self, prompt: &str) -> bool {
        self.prompts.push(prompt.to_owned());
        self.confirm_answers.pop_front().unwrap_or(false)
    }

    fn csrf_token(&self) -> Option<String> {
        self.csrf_token.clone()
    }

    fn submit(&mut self, form: SyntheticForm) -> Result<()> {
        self.submitted.push(form);
        Ok(())
    }
}

impl TableView for FakePage {
    fn rows(&self, table: &Locator) -> Vec<TableRow> {
        self.tables.get(table.as_str()).cloned().unwrap_or_default()
    }

    fn set_rows_visible(&mut self, table: &Locator, visibility: &[Option<bool>]) -> Result<()> {
        self.table_writes += 1;
        let hidden = self.hidden_rows.entry(table.as_str().to_owned()).or_default();
        for (index, visible) in visibility.iter().enumerate() {
            let Some(visible) = visible else {
                continue;
            };
            hidden.retain(|row| *row != index);
            if !visible {
                hidden.push(index);
            }
        }
        Ok(())
    }
}

impl PanelView for FakePage {
    fn project(&mut self, projection: PanelProjection) -> Result<()> {
        self.panel = Some(projection);
        self.projections += 1;
        Ok(())
    }
}

impl AlertSurface for FakePage {
    fn clear_alerts(&mut self) -> usize {
        let count = self.alerts.len();
        self.alert_detaches += count;
        self.alerts.clear();
        count
    }

    fn insert_alert(&mut self, anchor: Option<&Locator>, node: &AlertNode) -> bool {
        let placed = match anchor {
            Some(_) => self.alert_anchor,
            None => self.page_body,
        };
        if !placed {
            return false;
        }
        self.alert_inserts += 1;
        self.alerts.push(FakeAlert {
            node: node.clone(),
            revealed: false,
            fading: false,
            at_page_top: anchor.is_none(),
        });
        true
    }

    fn reveal_alert(&mut self, id: NotificationId) {
        if let Some(alert) = self.alert_mut(id) {
            alert.revealed = true;
        }
    }

    fn fade_alert(&mut self, id: NotificationId) {
        if let Some(alert) = self.alert_mut(id) {
            alert.fading = true;
        }
    }

    fn detach_alert(&mut self, id: NotificationId) {
        let before = self.alerts.len();
        self.alerts.retain(|alert| alert.node.id != id);
        self.alert_detaches += before - self.alerts.len();
    }

    fn is_attached(&self, id: NotificationId) -> bool {
        self.alert(id).is_some()
    }
}

impl DurableStore for FakePage {
    fn get_item(&self, key: &str) -> Option<String> {
        self.storage.get(key).cloned()
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<()> {
        self.storage.insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    fn remove_item(&mut self, key: &str) -> Result<()> {
        self.storage.remove(key);
        Ok(())
    }
}

pub fn yoga_row() -> RowMetadata {
    RowMetadata::new()
        .with("id", "12")
        .with("name", "Yoga")
        .with("trainer", "Sam")
        .with("price", "50")
        .with("duration", "mon,wed")
}

pub fn csr_row() -> RowMetadata {
    RowMetadata::new()
        .with("id", "4")
        .with("name", "Dana Reyes")
        .with("username", "dreyes")
        .with("active", "true")
        .with("lead", "false")
}
