//! Copies between structs that share field names.
//!
//! Two flavours:
//!
//! * [`BeanCopy`] generates `From<&Source>` at compile time. Use it when both types are known
//!   and every field converts with `Into`.
//! * [`copy_properties`] goes through `serde_json::Value`, so it works for any
//!   `Serialize`/`Deserialize` pair and supports renames and exclusions at runtime. Target
//!   fields that the source does not provide need `#[serde(default)]`.

mod error;

pub use crate::error::{BeanError, BeanErrorExt};
pub use jtool_derive::BeanCopy;

use fxhash::{FxHashMap, FxHashSet};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::trace;

/// Renames and exclusions applied by [`copy_properties`].
#[derive(Debug, Clone, Default)]
pub struct CopyOptions {
    renames: FxHashMap<String, String>,
    excluded: FxHashSet<String>,
}

impl CopyOptions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Source field `from` fills target field `to`.
    #[must_use]
    pub fn rename(mut self, from: impl Into<String>, to: impl Into<String>) -> Self {
        self.renames.insert(from.into(), to.into());
        self
    }

    /// Source field `field` is not copied.
    #[must_use]
    pub fn exclude(mut self, field: impl Into<String>) -> Self {
        self.excluded.insert(field.into());
        self
    }

    fn apply(&self, value: Value) -> Value {
        let Value::Object(fields) = value else {
            return value;
        };
        if self.renames.is_empty() && self.excluded.is_empty() {
            return Value::Object(fields);
        }
        let mapped = fields
            .into_iter()
            .filter(|(name, _)| !self.excluded.contains(name))
            .map(|(name, v)| match self.renames.get(&name) {
                Some(target) => (target.clone(), v),
                None => (name, v),
            })
            .collect();
        Value::Object(mapped)
    }
}

/// Copies same-named fields of `source` into a new `T`.
///
/// Fields the target does not declare are dropped unless the target denies unknown fields.
///
/// # Errors
/// [`BeanError::Mapping`] when serialization fails or a field has an incompatible type.
pub fn copy_properties<S, T>(source: &S, options: &CopyOptions) -> Result<T, BeanError>
where
    S: Serialize + ?Sized,
    T: DeserializeOwned,
{
    let value = serde_json::to_value(source).context("Serializing source")?;
    let target = serde_json::from_value(options.apply(value)).context("Building target")?;
    Ok(target)
}

/// [`copy_properties`] for every element.
///
/// # Errors
/// [`BeanError::EmptySource`] for an empty slice, otherwise the first mapping error.
pub fn copy_list<S, T>(sources: &[S], options: &CopyOptions) -> Result<Vec<T>, BeanError>
where
    S: Serialize,
    T: DeserializeOwned,
{
    copy_list_with(sources, |source| copy_properties(source, options))
}

/// Maps every element with `f`, stopping at the first error.
///
/// # Errors
/// [`BeanError::EmptySource`] for an empty slice, otherwise whatever `f` returns.
pub fn copy_list_with<S, T, F>(sources: &[S], f: F) -> Result<Vec<T>, BeanError>
where
    F: FnMut(&S) -> Result<T, BeanError>,
{
    if sources.is_empty() {
        return Err(BeanError::EmptySource { context: None });
    }
    trace!(items = sources.len(), "copying list");
    sources.iter().map(f).collect()
}
