//! Field schema derivation.
//!
//! A [`FieldSchema`] is built once per feed from its [`FeedConfig`] and is
//! immutable afterwards. It fixes the ordered input column names, which
//! column is the unique key, which column (if any) is the repeating FOR
//! attribute and how many numbered slots it may fill, and the ordered
//! output column names for the CSV.
//!
//! Slot names are generated from the FOR field's own name:
//! `for` with a bound of 3 yields `for_1`, `for_2`, `for_3`. Output field
//! names that match neither an input field nor a slot name are legal and
//! simply emit empty cells.

use crate::config::FeedConfig;
use crate::error::{ConfigError, ConfigResult};

/// The repeating FOR attribute of a schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForField {
    /// Index of the FOR column in the input fields.
    pub index: usize,
    /// Maximum number of slots retained per key.
    pub max_slots: usize,
    /// Slot name prefix; the FOR column's own name.
    pub prefix: String,
}

impl ForField {
    /// Name of the 1-based `n`th slot.
    pub fn slot_name(&self, n: usize) -> String {
        format!("{}_{}", self.prefix, n)
    }

    /// All slot names, in slot order.
    pub fn slot_names(&self) -> impl Iterator<Item = String> + '_ {
        (1..=self.max_slots).map(|n| self.slot_name(n))
    }
}

/// Immutable per-feed schema: input layout, key column, optional FOR
/// column, and output column order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSchema {
    /// Ordered input column names, aligned with row cells.
    pub input_fields: Vec<String>,
    /// Index of the unique key column in `input_fields`.
    pub key_field: usize,
    /// The repeating FOR attribute, if the feed declares one.
    pub for_field: Option<ForField>,
    /// Ordered output column names for the CSV.
    pub output_fields: Vec<String>,
}

impl FieldSchema {
    /// Derive a schema from a feed's configuration.
    ///
    /// Fails fast on any invalid declaration: missing or duplicate key
    /// markers, duplicate field names, more than one FOR field, or a FOR
    /// bound below 1. The original tool let a later unique_id marker
    /// silently override an earlier one; that is rejected here.
    pub fn from_config(feed: &FeedConfig) -> ConfigResult<Self> {
        if feed.infields.is_empty() {
            return Err(ConfigError::NoInputFields(feed.name.clone()));
        }

        let mut input_fields = Vec::with_capacity(feed.infields.len());
        let mut key_field: Option<usize> = None;
        let mut for_field: Option<ForField> = None;

        for (i, decl) in feed.infields.iter().enumerate() {
            if input_fields.contains(&decl.name) {
                return Err(ConfigError::DuplicateInputField {
                    feed: feed.name.clone(),
                    field: decl.name.clone(),
                });
            }
            input_fields.push(decl.name.clone());

            if decl.unique_id {
                if let Some(first) = key_field {
                    return Err(ConfigError::MultipleKeyFields {
                        feed: feed.name.clone(),
                        first: input_fields[first].clone(),
                        second: decl.name.clone(),
                    });
                }
                key_field = Some(i);
            }

            if let Some(bound) = decl.fors {
                if let Some(ref first) = for_field {
                    return Err(ConfigError::MultipleForFields {
                        feed: feed.name.clone(),
                        first: first.prefix.clone(),
                        second: decl.name.clone(),
                    });
                }
                if bound == 0 {
                    return Err(ConfigError::InvalidForBound {
                        feed: feed.name.clone(),
                        field: decl.name.clone(),
                        bound,
                    });
                }
                for_field = Some(ForField {
                    index: i,
                    max_slots: bound,
                    prefix: decl.name.clone(),
                });
            }
        }

        let key_field = key_field.ok_or_else(|| ConfigError::NoKeyField(feed.name.clone()))?;

        Ok(Self {
            input_fields,
            key_field,
            for_field,
            output_fields: feed.outfields.clone(),
        })
    }

    /// Name of the unique key column.
    pub fn key_name(&self) -> &str {
        &self.input_fields[self.key_field]
    }
}
