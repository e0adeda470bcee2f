// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::ids::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    Course,
    Csr,
}

impl ResourceKind {
    pub const ALL: [Self; 2] = [Self::Course, Self::Csr];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Course => "course",
            Self::Csr => "csr",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "course" => Some(Self::Course),
            "csr" => Some(Self::Csr),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Error,
    Success,
    Info,
}

impl Severity {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Success => "success",
            Self::Info => "info",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "error" => Some(Self::Error),
            "success" => Some(Self::Success),
            "info" => Some(Self::Info),
            _ => None,
        }
    }

    /// Font Awesome glyph shown in the alert's icon slot.
    pub const fn icon(self) -> &'static str {
        match self {
            Self::Error => "exclamation-circle",
            Self::Success => "check-circle",
            Self::Info => "info-circle",
        }
    }
}

/// Data attributes read off a trigger control at click time. Never cached.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RowMetadata {
    values: BTreeMap<String, String>,
}

impl RowMetadata {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.values.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &MetaKey) -> Option<&str> {
        self.values.get(key.as_str()).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for RowMetadata
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut metadata = Self::new();
        for (key, value) in iter {
            metadata.insert(key, value);
        }
        metadata
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    Text,
    /// Checkbox driven by a `"true"`/anything-else attribute.
    Flag,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldBinding {
    pub key: MetaKey,
    pub target: Locator,
    #[serde(default = "default_field_kind")]
    pub kind: FieldKind,
}

fn default_field_kind() -> FieldKind {
    FieldKind::Text
}

impl FieldBinding {
    pub fn text(key: &str, target: &str) -> Self {
        Self {
            key: MetaKey::from(key),
            target: Locator::from(target),
            kind: FieldKind::Text,
        }
    }

    pub fn flag(key: &str, target: &str) -> Self {
        Self {
            kind: FieldKind::Flag,
            ..Self::text(key, target)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MultiValueBinding {
    pub key: MetaKey,
    pub group: GroupName,
}

/// Everything resource-specific about the edit and delete flows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceDescriptor {
    pub kind: ResourceKind,
    pub dialog: Locator,
    pub edit_trigger: String,
    pub delete_trigger: String,
    pub delete_field: String,
    pub confirm_prompt: String,
    pub fields: Vec<FieldBinding>,
    #[serde(default)]
    pub multi: Option<MultiValueBinding>,
}

impl ResourceDescriptor {
    pub fn course() -> Self {
        Self {
            kind: ResourceKind::Course,
            dialog: Locator::from("editCourseModal"),
            edit_trigger: "edit-course".to_owned(),
            delete_trigger: "delete-course".to_owned(),
            delete_field: "course_id".to_owned(),
            confirm_prompt: "Are you sure you want to delete this course?".to_owned(),
            fields: vec![
                FieldBinding::text("id", "editCourseId"),
                FieldBinding::text("name", "editCourseName"),
                FieldBinding::text("trainer", "editTrainerName"),
                FieldBinding::text("price", "editCoursePrice"),
            ],
            multi: Some(MultiValueBinding {
                key: MetaKey::from("duration"),
                group: GroupName::from("edit_duration"),
            }),
        }
    }

    pub fn csr() -> Self {
        Self {
            kind: ResourceKind::Csr,
            dialog: Locator::from("editCSRModal"),
            edit_trigger: "edit-csr".to_owned(),
            delete_trigger: "delete-csr".to_owned(),
            delete_field: "csr_id".to_owned(),
            confirm_prompt: "Are you sure you want to delete this CSR?".to_owned(),
            fields: vec![
                FieldBinding::text("id", "editCSRId"),
                FieldBinding::text("name", "editFullName"),
                FieldBinding::text("username", "editUsername"),
                FieldBinding::flag("active", "editIsActive"),
                FieldBinding::flag("lead", "editLeadRole"),
            ],
            multi: None,
        }
    }

    pub fn builtin() -> Vec<Self> {
        vec![Self::course(), Self::csr()]
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableFilterSpec {
    pub input: Locator,
    pub table: Locator,
    pub columns: Vec<usize>,
    #[serde(default = "default_header_rows")]
    pub header_rows: usize,
}

fn default_header_rows() -> usize {
    1
}

impl TableFilterSpec {
    pub fn courses() -> Self {
        Self {
            input: Locator::from("courseSearch"),
            table: Locator::from("courseTable"),
            columns: vec![0, 1],
            header_rows: 1,
        }
    }
}
