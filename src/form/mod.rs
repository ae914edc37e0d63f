//! Host form binding.
//!
//! The calculator only knows a target path and a number. This module maps
//! dot-delimited paths such as `reimbursable.me.meal.2.amount` onto a JSON
//! expense tree so committed values land in the right field.

pub mod currency;

use serde_json::Value;
use std::io::{Read, Write};
use thiserror::Error;

use crate::calculator::CommitPayload;

pub use currency::{format_currency, member_total};

#[derive(Debug, Error)]
pub enum FormError {
    #[error("No field at path '{0}'")]
    PathNotFound(String),
    #[error("'{0}' is not an object or list")]
    NotAContainer(String),
    #[error("Cannot store non-finite value at '{0}'")]
    InvalidValue(String),
    #[error("Invalid expense data: {0}")]
    Json(#[from] serde_json::Error),
}

/// Read and write access to the fields a calculator can target.
pub trait FormBinding {
    /// Current raw value of a field, if it exists.
    fn read(&self, path: &str) -> Option<String>;

    /// Store a committed number.
    fn write(&mut self, path: &str, value: f64) -> Result<(), FormError>;

    /// The seed for opening a calculator on `path`: the current value with
    /// thousands separators removed, or empty when the field is unset.
    fn seed_for(&self, path: &str) -> String {
        self.read(path)
            .map(|raw| raw.replace(',', ""))
            .unwrap_or_default()
    }

    fn apply(&mut self, payload: &CommitPayload) -> Result<(), FormError> {
        self.write(&payload.path, payload.value)
    }
}

/// An expense tree held as JSON.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ExpenseForm {
    root: Value,
}

impl ExpenseForm {
    pub fn new(root: Value) -> Self {
        Self { root }
    }

    pub fn from_reader(reader: impl Read) -> Result<Self, FormError> {
        Ok(Self::new(serde_json::from_reader(reader)?))
    }

    pub fn to_writer(&self, writer: impl Write) -> Result<(), FormError> {
        serde_json::to_writer_pretty(writer, &self.root)?;
        Ok(())
    }

    pub fn root(&self) -> &Value {
        &self.root
    }

    /// Resolve a path for reading.
    pub fn get(&self, path: &str) -> Option<&Value> {
        path.split('.').try_fold(&self.root, |node, segment| match node {
            Value::Object(map) => map.get(segment),
            Value::Array(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
            _ => None,
        })
    }

    /// Resolve a path for writing. The last segment may name a new object key.
    fn slot_mut(&mut self, path: &str) -> Result<&mut Value, FormError> {
        let (parent_path, key) = match path.rsplit_once('.') {
            Some((parent, key)) => (Some(parent), key),
            None => (None, path),
        };

        let mut parent = &mut self.root;
        if let Some(parent_path) = parent_path {
            for segment in parent_path.split('.') {
                parent = match parent {
                    Value::Object(map) => map.get_mut(segment),
                    Value::Array(items) => segment
                        .parse::<usize>()
                        .ok()
                        .and_then(|i| items.get_mut(i)),
                    _ => return Err(FormError::NotAContainer(parent_path.to_string())),
                }
                .ok_or_else(|| FormError::PathNotFound(path.to_string()))?;
            }
        }

        match parent {
            Value::Object(map) => Ok(map.entry(key.to_string()).or_insert(Value::Null)),
            Value::Array(items) => key
                .parse::<usize>()
                .ok()
                .and_then(|i| items.get_mut(i))
                .ok_or_else(|| FormError::PathNotFound(path.to_string())),
            _ => Err(FormError::NotAContainer(
                parent_path.unwrap_or_default().to_string(),
            )),
        }
    }
}

impl FormBinding for ExpenseForm {
    fn read(&self, path: &str) -> Option<String> {
        match self.get(path)? {
            Value::Null => None,
            Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    fn write(&mut self, path: &str, value: f64) -> Result<(), FormError> {
        let number = serde_json::Number::from_f64(value)
            .ok_or_else(|| FormError::InvalidValue(path.to_string()))?;
        // Whole amounts are stored as integers so they read back without ".0"
        let stored = if value.fract() == 0.0 && value.abs() < 9_007_199_254_740_992.0 {
            Value::from(value as i64)
        } else {
            Value::Number(number)
        };

        *self.slot_mut(path)? = stored;
        tracing::debug!(path, value, "Form field updated");
        Ok(())
    }
}
