// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result};
use tracing::{debug, info, warn};

use crate::{
    ConsoleError, FieldKind, FormBinding, MetaKey, PageHost, ResourceDescriptor, RowMetadata,
    SyntheticForm,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    Cancelled,
    Submitted,
}

/// Splits a comma-encoded option list, trimming each token and dropping empties.
pub fn split_multi_value(raw: &str) -> impl Iterator<Item = &str> {
    raw.split(',').map(str::trim).filter(|token| !token.is_empty())
}

/// Fills the resource's edit dialog from the trigger's metadata and shows it.
///
/// The checkbox group is cleared before anything else so reopening the
/// dialog never inherits selections from the previous row. Scalar fields are
/// overwritten whether or not the row carries them.
pub fn populate_edit_dialog<B>(
    binding: &mut B,
    descriptor: &ResourceDescriptor,
    row: &RowMetadata,
) -> Result<()>
where
    B: FormBinding + ?Sized,
{
    if let Some(multi) = &descriptor.multi {
        for option in binding.group_options(&multi.group) {
            binding.set_group_option(&multi.group, &option, false);
        }

        let raw = row.get(&multi.key).unwrap_or("");
        for token in split_multi_value(raw) {
            if !binding.set_group_option(&multi.group, token, true) {
                warn!(group = %multi.group, token, "no checkbox for stored option");
            }
        }
    }

    for field in &descriptor.fields {
        let value = row.get(&field.key).unwrap_or("");
        let written = match field.kind {
            FieldKind::Text => binding.set_value(&field.target, value),
            FieldKind::Flag => binding.set_checked(&field.target, value == "true"),
        };
        written.with_context(|| {
            format!("fill {} edit field {}", descriptor.kind.as_str(), field.target)
        })?;
    }

    binding.show_modal(&descriptor.dialog)?;
    debug!(resource = descriptor.kind.as_str(), "edit dialog populated");
    Ok(())
}

/// Asks for confirmation, then posts a hidden delete form for the row.
///
/// Declining touches nothing. Once confirmed, a page without an anti-forgery
/// token is an error and nothing is submitted.
pub fn submit_delete<H>(
    host: &mut H,
    descriptor: &ResourceDescriptor,
    row: &RowMetadata,
) -> Result<DeleteOutcome>
where
    H: PageHost + ?Sized,
{
    if !host.confirm(&descriptor.confirm_prompt) {
        debug!(resource = descriptor.kind.as_str(), "delete declined");
        return Ok(DeleteOutcome::Cancelled);
    }

    let token = host.csrf_token().ok_or(ConsoleError::MissingCsrfToken)?;
    let id_key = MetaKey::from("id");
    let id = row
        .get(&id_key)
        .ok_or_else(|| ConsoleError::MissingMetadata {
            key: id_key.clone(),
        })?;

    let form = SyntheticForm::delete(&token, &descriptor.delete_field, id);
    host.submit(form)
        .with_context(|| format!("submit {} delete for id {id}", descriptor.kind.as_str()))?;
    info!(resource = descriptor.kind.as_str(), id, "delete submitted");
    Ok(DeleteOutcome::Submitted)
}
