// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result, anyhow, bail};
use serde::Deserialize;
use std::collections::BTreeSet;
use std::time::Duration;

use crate::{
    ConsoleError, FormSpec, Locator, NotifierTiming, PasswordToggle, RememberMe,
    ResourceDescriptor, ResourceKind, TableFilterSpec,
};
use crate::notify::{
    DEFAULT_ALERT_ANCHOR, DEFAULT_DISMISS_AFTER, DEFAULT_FADE_DURATION, DEFAULT_REVEAL_DELAY,
};
use crate::state::DEFAULT_COLLAPSE_WIDTH;

const CONFIG_VERSION: i64 = 1;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub version: i64,
    #[serde(default)]
    pub notifications: Notifications,
    #[serde(default)]
    pub panel: Panel,
    #[serde(default = "ResourceDescriptor::builtin")]
    pub resources: Vec<ResourceDescriptor>,
    #[serde(default = "default_tables")]
    pub tables: Vec<TableFilterSpec>,
    #[serde(default = "FormSpec::builtin")]
    pub forms: Vec<FormSpec>,
    #[serde(default)]
    pub remember_me: RememberMe,
    #[serde(default)]
    pub password_toggle: PasswordToggle,
}

fn default_tables() -> Vec<TableFilterSpec> {
    vec![TableFilterSpec::courses()]
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION,
            notifications: Notifications::default(),
            panel: Panel::default(),
            resources: ResourceDescriptor::builtin(),
            tables: default_tables(),
            forms: FormSpec::builtin(),
            remember_me: RememberMe::default(),
            password_toggle: PasswordToggle::default(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Notifications {
    pub reveal_delay: Option<String>,
    pub dismiss_after: Option<String>,
    pub fade_duration: Option<String>,
    /// Alerts go right after this element, or to the top of the page body
    /// when the page has none.
    pub anchor: Option<Locator>,
}

impl Default for Notifications {
    fn default() -> Self {
        Self {
            reveal_delay: Some("10ms".to_owned()),
            dismiss_after: Some("5s".to_owned()),
            fade_duration: Some("300ms".to_owned()),
            anchor: Some(Locator::from(DEFAULT_ALERT_ANCHOR)),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Panel {
    pub collapse_width: Option<u32>,
}

impl Default for Panel {
    fn default() -> Self {
        Self {
            collapse_width: Some(DEFAULT_COLLAPSE_WIDTH),
        }
    }
}

impl Config {
    pub fn parse(raw: &str) -> Result<Self> {
        let value: toml::Value = toml::from_str(raw).context("parse TOML console config")?;

        let version = value
            .get("version")
            .and_then(toml::Value::as_integer)
            .ok_or_else(|| anyhow!("console config is not versioned; add `version = 1`"))?;
        if version != CONFIG_VERSION {
            bail!("unsupported console config version {version}; expected version = 1");
        }

        let config: Config = value.try_into().context("decode console config")?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        self.timing()?;

        if self.alert_anchor().as_str().trim().is_empty() {
            return Err(invalid("notifications.anchor must not be empty"));
        }

        if self.collapse_width() == 0 {
            return Err(invalid("panel.collapse_width must be positive"));
        }

        let mut kinds = BTreeSet::new();
        for resource in &self.resources {
            if !kinds.insert(resource.kind) {
                return Err(invalid(format!(
                    "resource {} is configured more than once",
                    resource.kind.as_str()
                )));
            }
            if resource.delete_field.trim().is_empty() {
                return Err(invalid(format!(
                    "resource {} needs a non-empty delete_field",
                    resource.kind.as_str()
                )));
            }
        }

        for table in &self.tables {
            if table.columns.is_empty() {
                return Err(invalid(format!(
                    "table filter for {} must name at least one column",
                    table.table
                )));
            }
        }

        Ok(())
    }

    pub fn timing(&self) -> Result<NotifierTiming> {
        let reveal_delay = duration_or(&self.notifications.reveal_delay, DEFAULT_REVEAL_DELAY)?;
        let dismiss_after = duration_or(&self.notifications.dismiss_after, DEFAULT_DISMISS_AFTER)?;
        let fade_duration = duration_or(&self.notifications.fade_duration, DEFAULT_FADE_DURATION)?;
        for (name, value) in [
            ("dismiss_after", dismiss_after),
            ("fade_duration", fade_duration),
        ] {
            if value <= Duration::ZERO {
                return Err(invalid(format!("notifications.{name} must be positive")));
            }
        }
        Ok(NotifierTiming {
            reveal_delay,
            dismiss_after,
            fade_duration,
        })
    }

    pub fn alert_anchor(&self) -> Locator {
        self.notifications
            .anchor
            .clone()
            .unwrap_or_else(|| Locator::from(DEFAULT_ALERT_ANCHOR))
    }

    pub fn collapse_width(&self) -> u32 {
        self.panel.collapse_width.unwrap_or(DEFAULT_COLLAPSE_WIDTH)
    }

    pub fn resource(&self, kind: ResourceKind) -> Result<&ResourceDescriptor> {
        self.resources
            .iter()
            .find(|resource| resource.kind == kind)
            .ok_or_else(|| {
                ConsoleError::UnknownResource {
                    kind: kind.as_str().to_owned(),
                }
                .into()
            })
    }

    pub fn table_for_input(&self, input: &Locator) -> Option<&TableFilterSpec> {
        self.tables.iter().find(|table| &table.input == input)
    }

    pub fn form(&self, form: &Locator) -> Option<&FormSpec> {
        self.forms.iter().find(|spec| &spec.form == form)
    }

    pub fn example() -> String {
        "# admin console interaction config\n\
         # Embed in the page as <script type=\"application/toml\" id=\"console-config\">.\n\
         \n\
         version = 1\n\
         \n\
         [notifications]\n\
         reveal_delay = \"10ms\"\n\
         dismiss_after = \"5s\"\n\
         fade_duration = \"300ms\"\n\
         # Alerts are placed after this element, else at the top of the page.\n\
         anchor = \".form-header\"\n\
         \n\
         [panel]\n\
         # Viewport width (px) at or below which an open panel closes itself.\n\
         collapse_width = 992\n\
         \n\
         [[tables]]\n\
         input = \"courseSearch\"\n\
         table = \"courseTable\"\n\
         columns = [0, 1]\n\
         \n\
         [[resources]]\n\
         kind = \"course\"\n\
         dialog = \"editCourseModal\"\n\
         edit_trigger = \"edit-course\"\n\
         delete_trigger = \"delete-course\"\n\
         delete_field = \"course_id\"\n\
         confirm_prompt = \"Are you sure you want to delete this course?\"\n\
         fields = [\n\
         \x20 { key = \"id\", target = \"editCourseId\" },\n\
         \x20 { key = \"name\", target = \"editCourseName\" },\n\
         \x20 { key = \"trainer\", target = \"editTrainerName\" },\n\
         \x20 { key = \"price\", target = \"editCoursePrice\" },\n\
         ]\n\
         multi = { key = \"duration\", group = \"edit_duration\" }\n"
            .to_owned()
    }
}

fn invalid(message: impl Into<String>) -> anyhow::Error {
    ConsoleError::Config {
        message: message.into(),
    }
    .into()
}

fn duration_or(raw: &Option<String>, fallback: Duration) -> Result<Duration> {
    match raw {
        Some(raw) => parse_duration(raw),
        None => Ok(fallback),
    }
}

/// Suffix and its length in milliseconds. `ms` must be tried before `s` and `m`.
const DURATION_UNITS: [(&str, u64); 3] = [("ms", 1), ("s", 1_000), ("m", 60_000)];

fn parse_duration(raw: &str) -> Result<Duration> {
    let parsed = DURATION_UNITS.iter().find_map(|(suffix, unit)| {
        let count = raw.strip_suffix(suffix)?;
        Some(
            count
                .parse::<u64>()
                .ok()
                .and_then(|count| count.checked_mul(*unit)),
        )
    });
    match parsed {
        Some(Some(millis)) => Ok(Duration::from_millis(millis)),
        Some(None) => bail!("invalid duration {raw:?}"),
        None => bail!(
            "invalid duration {raw:?}; use one of: <N>ms, <N>s, <N>m (for example 300ms or 5s)"
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::{Config, parse_duration};
    use crate::{ConsoleError, ResourceKind};
    use anyhow::Result;
    use std::time::Duration;

    #[test]
    fn defaults_carry_both_resources() -> Result<()> {
        let config = Config::default();
        assert_eq!(config.resource(ResourceKind::Course)?.delete_field, "course_id");
        assert_eq!(config.resource(ResourceKind::Csr)?.delete_field, "csr_id");
        assert_eq!(config.collapse_width(), 992);
        assert_eq!(config.timing()?.dismiss_after, Duration::from_secs(5));
        Ok(())
    }

    #[test]
    fn unversioned_config_is_rejected() {
        let error = Config::parse("[panel]\ncollapse_width = 800\n").expect_err("needs version");
        assert!(error.to_string().contains("version = 1"));
    }

    #[test]
    fn unsupported_version_is_rejected() {
        let error = Config::parse("version = 2\n").expect_err("v2 is unknown");
        assert!(error.to_string().contains("unsupported console config version 2"));
    }

    #[test]
    fn malformed_config_returns_parse_error() {
        let error = Config::parse("{{not toml").expect_err("malformed config should fail");
        assert!(error.to_string().contains("parse TOML console config"));
    }

    #[test]
    fn minimal_config_falls_back_to_builtins() -> Result<()> {
        let config = Config::parse("version = 1\n[panel]\ncollapse_width = 768\n")?;
        assert_eq!(config.collapse_width(), 768);
        assert_eq!(config.resources.len(), 2);
        assert_eq!(config.forms.len(), 2);
        assert_eq!(config.remember_me.flag_key, "rememberMe");
        Ok(())
    }

    #[test]
    fn example_config_parses() -> Result<()> {
        let config = Config::parse(&Config::example())?;
        let course = config.resource(ResourceKind::Course)?;
        assert_eq!(course.fields.len(), 4);
        assert!(config.resource(ResourceKind::Csr).is_err());
        Ok(())
    }

    #[test]
    fn duplicate_resource_kinds_are_rejected() {
        let raw = "version = 1\n\
                   [[resources]]\nkind = \"csr\"\ndialog = \"a\"\nedit_trigger = \"e\"\ndelete_trigger = \"d\"\ndelete_field = \"csr_id\"\nconfirm_prompt = \"?\"\nfields = []\n\
                   [[resources]]\nkind = \"csr\"\ndialog = \"b\"\nedit_trigger = \"e\"\ndelete_trigger = \"d\"\ndelete_field = \"csr_id\"\nconfirm_prompt = \"?\"\nfields = []\n";
        let error = Config::parse(raw).expect_err("duplicate kinds");
        assert!(matches!(
            error.downcast_ref::<ConsoleError>(),
            Some(ConsoleError::Config { .. })
        ));
    }

    #[test]
    fn zero_fade_duration_is_rejected() {
        let error = Config::parse("version = 1\n[notifications]\nfade_duration = \"0ms\"\n")
            .expect_err("zero fade");
        assert!(error.to_string().contains("must be positive"));
    }

    #[test]
    fn empty_filter_columns_are_rejected() {
        let raw = "version = 1\n[[tables]]\ninput = \"q\"\ntable = \"t\"\ncolumns = []\n";
        let error = Config::parse(raw).expect_err("no columns");
        assert!(error.to_string().contains("at least one column"));
    }

    #[test]
    fn unknown_resource_lookup_is_typed() {
        let config = Config {
            resources: Vec::new(),
            ..Config::default()
        };
        let error = config.resource(ResourceKind::Course).expect_err("no descriptors");
        assert!(matches!(
            error.downcast_ref::<ConsoleError>(),
            Some(ConsoleError::UnknownResource { .. })
        ));
    }

    #[test]
    fn durations_parse_ms_seconds_and_minutes() -> Result<()> {
        assert_eq!(parse_duration("300ms")?, Duration::from_millis(300));
        assert_eq!(parse_duration("5s")?, Duration::from_secs(5));
        assert_eq!(parse_duration("2m")?, Duration::from_secs(120));
        assert!(parse_duration("soon").is_err());
        Ok(())
    }

    #[test]
    fn malformed_or_overflowing_durations_are_rejected() {
        assert!(parse_duration("ms").is_err());
        assert!(parse_duration("1.5s").is_err());
        assert!(parse_duration("-3s").is_err());
        assert!(parse_duration(&format!("{}m", u64::MAX)).is_err());
    }

    #[test]
    fn alert_anchor_defaults_to_form_header_and_can_be_moved() -> Result<()> {
        assert_eq!(Config::default().alert_anchor().as_str(), ".form-header");

        let config = Config::parse("version = 1\n[notifications]\nanchor = \".page-title\"\n")?;
        assert_eq!(config.alert_anchor().as_str(), ".page-title");
        assert_eq!(config.timing()?.dismiss_after, Duration::from_secs(5));

        let error = Config::parse("version = 1\n[notifications]\nanchor = \" \"\n")
            .expect_err("blank anchor");
        assert!(error.to_string().contains("notifications.anchor"));
        Ok(())
    }
}
