// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

//! Failures callers need to tell apart. Everything else travels as plain
//! `anyhow` context.

use thiserror::Error;

use crate::{Locator, MetaKey};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConsoleError {
    /// The page carries no `csrfmiddlewaretoken` input. Deletes refuse to
    /// submit without it.
    #[error("anti-forgery token is missing from the page; refusing to submit an unprotected request")]
    MissingCsrfToken,

    #[error("element {locator} is not present on the page")]
    MissingElement { locator: Locator },

    #[error("trigger metadata has no {key:?} attribute")]
    MissingMetadata { key: MetaKey },

    #[error("no resource descriptor is configured for {kind:?}")]
    UnknownResource { kind: String },

    #[error("invalid console configuration: {message}")]
    Config { message: String },
}

impl ConsoleError {
    pub fn missing_element(locator: &Locator) -> Self {
        Self::MissingElement {
            locator: locator.clone(),
        }
    }
}
