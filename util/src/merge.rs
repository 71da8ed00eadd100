//! Deep merge of JSON objects.
//!
//! Objects merge key by key, recursively. When both sides hold an array the
//! [`ArrayMerge`] policy decides how they combine; any other pairing is an
//! overwrite by the later value.

use serde_json::{Map, Value};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ArrayMerge {
    /// Concatenate and drop structurally equal duplicates, first occurrence wins.
    #[default]
    Union,
    /// The later array replaces the earlier one.
    Replace,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MergeOptions {
    pub arrays: ArrayMerge,
}

impl MergeOptions {
    pub fn replace_arrays() -> Self {
        Self {
            arrays: ArrayMerge::Replace,
        }
    }
}

fn union(mut current: Vec<Value>, incoming: Vec<Value>) -> Vec<Value> {
    let mut result = Vec::with_capacity(current.len() + incoming.len());

    for value in current.drain(..).chain(incoming) {
        if !result.contains(&value) {
            result.push(value);
        }
    }

    result
}

fn merge_value(current: Value, incoming: Value, options: MergeOptions) -> Value {
    match (current, incoming) {
        (Value::Array(current), Value::Array(incoming)) => match options.arrays {
            ArrayMerge::Union => Value::Array(union(current, incoming)),
            ArrayMerge::Replace => Value::Array(incoming),
        },

        (Value::Object(mut current), Value::Object(incoming)) => {
            merge_into(&mut current, incoming, options);
            Value::Object(current)
        }

        (_, incoming) => incoming,
    }
}

/// Merges `source` into `target` in place.
pub fn merge_into(target: &mut Map<String, Value>, source: Map<String, Value>, options: MergeOptions) {
    for (key, incoming) in source {
        match target.get_mut(&key) {
            Some(current) => {
                let previous = std::mem::take(current);
                *current = merge_value(previous, incoming, options);
            }

            None => {
                target.insert(key, incoming);
            }
        }
    }
}

/// Merges `objects` left to right into a fresh object. None of the inputs are
/// modified.
pub fn merge_with<'a, I>(options: MergeOptions, objects: I) -> Map<String, Value>
where
    I: IntoIterator<Item = &'a Map<String, Value>>,
{
    objects.into_iter().fold(Map::new(), |mut result, object| {
        merge_into(&mut result, object.clone(), options);
        result
    })
}

/// [`merge_with`] using the default array union policy.
pub fn merge<'a, I>(objects: I) -> Map<String, Value>
where
    I: IntoIterator<Item = &'a Map<String, Value>>,
{
    merge_with(MergeOptions::default(), objects)
}
