// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::{DurableStore, FormBinding, Locator};

pub const FORGOT_PASSWORD_MESSAGE: &str = "Please contact support for password reset assistance";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RememberMe {
    pub flag_key: String,
    pub username_key: String,
    pub checkbox: Locator,
    pub username_field: Locator,
}

impl Default for RememberMe {
    fn default() -> Self {
        Self {
            flag_key: "rememberMe".to_owned(),
            username_key: "savedUsername".to_owned(),
            checkbox: Locator::from("rememberMe"),
            username_field: Locator::from("username"),
        }
    }
}

impl RememberMe {
    /// The saved username, if the flag is set and a name was stored with it.
    pub fn saved_username<S>(&self, store: &S) -> Option<String>
    where
        S: DurableStore + ?Sized,
    {
        if store.get_item(&self.flag_key).as_deref() != Some("true") {
            return None;
        }
        store
            .get_item(&self.username_key)
            .filter(|username| !username.is_empty())
    }

    /// Fills the login form from storage. Returns whether anything was filled.
    pub fn restore<P>(&self, page: &mut P) -> Result<bool>
    where
        P: DurableStore + FormBinding + ?Sized,
    {
        let Some(username) = self.saved_username(&*page) else {
            return Ok(false);
        };
        page.set_value(&self.username_field, &username)?;
        if page.is_checked(&self.checkbox).is_some() {
            page.set_checked(&self.checkbox, true)?;
        }
        Ok(true)
    }

    /// Writes or clears both keys together, following the checkbox.
    pub fn persist<P>(&self, page: &mut P) -> Result<()>
    where
        P: DurableStore + FormBinding + ?Sized,
    {
        let Some(checked) = page.is_checked(&self.checkbox) else {
            return Ok(());
        };
        if checked {
            let username = page.value(&self.username_field).unwrap_or_default();
            page.set_item(&self.flag_key, "true")?;
            page.set_item(&self.username_key, &username)?;
        } else {
            page.remove_item(&self.flag_key)?;
            page.remove_item(&self.username_key)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PasswordVisibility {
    #[default]
    Masked,
    Revealed,
}

impl PasswordVisibility {
    pub const fn toggled(self) -> Self {
        match self {
            Self::Masked => Self::Revealed,
            Self::Revealed => Self::Masked,
        }
    }

    pub const fn input_type(self) -> &'static str {
        match self {
            Self::Masked => "password",
            Self::Revealed => "text",
        }
    }

    pub const fn icon(self) -> &'static str {
        match self {
            Self::Masked => "fa-eye",
            Self::Revealed => "fa-eye-slash",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PasswordToggle {
    pub field: Locator,
    pub control: Locator,
}

impl Default for PasswordToggle {
    fn default() -> Self {
        Self {
            field: Locator::from("password"),
            control: Locator::from(".toggle-password"),
        }
    }
}

impl PasswordToggle {
    pub fn apply<B>(&self, binding: &mut B, current: PasswordVisibility) -> Result<PasswordVisibility>
    where
        B: FormBinding + ?Sized,
    {
        let next = current.toggled();
        binding.set_input_type(&self.field, next.input_type())?;
        binding.set_icon(&self.control, current.icon(), next.icon())?;
        Ok(next)
    }
}
