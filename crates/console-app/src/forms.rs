// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::Result;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{FormBinding, Locator};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Rule {
    Required {
        field: Locator,
        message: String,
        #[serde(default)]
        trim: bool,
    },
    MinLength {
        field: Locator,
        min: usize,
        message: String,
        #[serde(default)]
        trim: bool,
    },
    Matches {
        field: Locator,
        other: Locator,
        message: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    pub field: Locator,
    pub message: String,
}

impl Rule {
    pub fn field(&self) -> &Locator {
        match self {
            Self::Required { field, .. }
            | Self::MinLength { field, .. }
            | Self::Matches { field, .. } => field,
        }
    }

    pub fn check<B>(&self, binding: &B) -> Option<Violation>
    where
        B: FormBinding + ?Sized,
    {
        let failed = match self {
            Self::Required { field, trim, .. } => read(binding, field, *trim).is_empty(),
            Self::MinLength {
                field, min, trim, ..
            } => read(binding, field, *trim).chars().count() < *min,
            Self::Matches { field, other, .. } => {
                read(binding, field, false) != read(binding, other, false)
            }
        };
        failed.then(|| Violation {
            field: self.field().clone(),
            message: self.message().to_owned(),
        })
    }

    fn message(&self) -> &str {
        match self {
            Self::Required { message, .. }
            | Self::MinLength { message, .. }
            | Self::Matches { message, .. } => message,
        }
    }
}

fn read<B>(binding: &B, field: &Locator, trim: bool) -> String
where
    B: FormBinding + ?Sized,
{
    let value = binding.value(field).unwrap_or_default();
    if trim { value.trim().to_owned() } else { value }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormSpec {
    pub form: Locator,
    #[serde(default)]
    pub busy_control: Option<Locator>,
    /// Login forms persist the remember-me preference on a passing submit.
    #[serde(default)]
    pub remember_me: bool,
    pub rules: Vec<Rule>,
}

impl FormSpec {
    pub fn login() -> Self {
        let username = Locator::from("username");
        let password = Locator::from("password");
        Self {
            form: Locator::from(".modern-form"),
            busy_control: Some(Locator::from(".submit-btn")),
            remember_me: true,
            rules: vec![
                Rule::Required {
                    field: username.clone(),
                    message: "Please enter your username".to_owned(),
                    trim: true,
                },
                Rule::MinLength {
                    field: username,
                    min: 3,
                    message: "Username must be at least 3 characters long".to_owned(),
                    trim: true,
                },
                Rule::Required {
                    field: password.clone(),
                    message: "Please enter your password".to_owned(),
                    trim: false,
                },
                Rule::MinLength {
                    field: password,
                    min: 6,
                    message: "Password must be at least 6 characters long".to_owned(),
                    trim: false,
                },
            ],
        }
    }

    pub fn add_csr() -> Self {
        Self {
            form: Locator::from("addCSRForm"),
            busy_control: None,
            remember_me: false,
            rules: vec![Rule::Matches {
                field: Locator::from("password"),
                other: Locator::from("confirmPassword"),
                message: "Passwords do not match!".to_owned(),
            }],
        }
    }

    pub fn builtin() -> Vec<Self> {
        vec![Self::login(), Self::add_csr()]
    }

    /// First failing rule in declaration order.
    pub fn first_violation<B>(&self, binding: &B) -> Option<Violation>
    where
        B: FormBinding + ?Sized,
    {
        self.rules.iter().find_map(|rule| rule.check(binding))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitDecision {
    Proceed,
    Blocked(Violation),
}

/// Runs the form's rules. A failure moves focus to the offending field; a
/// pass puts the submit control into its busy state.
pub fn check_submission<B>(binding: &mut B, spec: &FormSpec) -> Result<SubmitDecision>
where
    B: FormBinding + ?Sized,
{
    if let Some(violation) = spec.first_violation(binding) {
        debug!(form = %spec.form, field = %violation.field, "submission blocked");
        binding.focus(&violation.field)?;
        return Ok(SubmitDecision::Blocked(violation));
    }

    if let Some(control) = &spec.busy_control {
        binding.mark_busy(control)?;
    }
    Ok(SubmitDecision::Proceed)
}
