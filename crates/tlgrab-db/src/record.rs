//! Paragraph-level parsing of the tlpdb text format.
//!
//! A tlpdb paragraph is a run of non-blank lines, each of the form
//! `<key> <rest-of-line>`. The remainder of the line is kept verbatim as one
//! opaque value; `execute` lines with embedded `=` and quoted substrings are
//! not decomposed here. Repeated keys accumulate into an appearance-ordered
//! list.

use std::collections::HashMap;

use serde::Serialize;

/// The value of one record field: a plain string when the key occurred once
/// in the paragraph, an appearance-ordered list when it occurred repeatedly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    /// Exactly one occurrence.
    Single(String),
    /// Two or more occurrences, in first-to-last appearance order.
    Many(Vec<String>),
}

impl FieldValue {
    /// Returns the value when the field occurred exactly once.
    pub fn as_single(&self) -> Option<&str> {
        match self {
            FieldValue::Single(value) => Some(value),
            FieldValue::Many(_) => None,
        }
    }

    /// Iterates over every occurrence; a `Single` yields one item.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        match self {
            FieldValue::Single(value) => std::slice::from_ref(value).iter(),
            FieldValue::Many(values) => values.iter(),
        }
        .map(String::as_str)
    }

    /// Number of occurrences.
    pub fn len(&self) -> usize {
        match self {
            FieldValue::Single(_) => 1,
            FieldValue::Many(values) => values.len(),
        }
    }

    /// Always false; a field without occurrences is never stored.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Appends another occurrence, promoting `Single` to `Many` and keeping
    /// the first value in place.
    fn push(&mut self, value: String) {
        match self {
            FieldValue::Single(first) => {
                let first = std::mem::take(first);
                *self = FieldValue::Many(vec![first, value]);
            }
            FieldValue::Many(values) => values.push(value),
        }
    }
}

/// One parsed tlpdb paragraph: a mapping from field key to [`FieldValue`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Record {
    #[serde(flatten)]
    fields: HashMap<String, FieldValue>,
}

impl Record {
    /// Looks up a field by key.
    pub fn get(&self, key: &str) -> Option<&FieldValue> {
        self.fields.get(key)
    }

    /// The first occurrence of the `name` field, if present and non-empty.
    pub fn name(&self) -> Option<&str> {
        self.values("name").next().filter(|name| !name.is_empty())
    }

    /// Iterates over every occurrence of a field; empty when the key is
    /// absent. This is the tolerant accessor downstream consumers use for
    /// `depend` and `execute`, which may be single- or multi-valued.
    pub fn values(&self, key: &str) -> impl Iterator<Item = &str> {
        self.fields.get(key).into_iter().flat_map(FieldValue::iter)
    }

    /// True when no line of the paragraph contributed a field.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Number of distinct field keys.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Iterates over all fields in unspecified order.
    pub fn fields(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.fields.iter().map(|(key, value)| (key.as_str(), value))
    }

    /// Serializes the record back to `key value` lines, one line per
    /// occurrence. Re-parsing the result yields an equal record.
    pub fn to_paragraph(&self) -> String {
        let mut out = String::new();
        for (key, value) in &self.fields {
            for occurrence in value.iter() {
                out.push_str(key);
                out.push(' ');
                out.push_str(occurrence);
                out.push('\n');
            }
        }
        out
    }

    fn insert(&mut self, key: &str, value: &str) {
        match self.fields.get_mut(key) {
            Some(existing) => existing.push(value.to_string()),
            None => {
                self.fields
                    .insert(key.to_string(), FieldValue::Single(value.to_string()));
            }
        }
    }
}

/// Parses one paragraph into a [`Record`].
///
/// A line contributes a field only when it contains a space, the text before
/// the first space (the key) is non-empty, and the remainder (the value,
/// internal whitespace preserved verbatim) is non-empty. Everything else is
/// ignored: bare file paths under `runfiles`/`binfiles`, lines starting with
/// a space, whitespace-only lines.
pub fn parse_paragraph(paragraph: &str) -> Record {
    let mut record = Record::default();
    for line in paragraph.lines() {
        let Some((key, value)) = line.split_once(' ') else {
            continue;
        };
        if key.is_empty() || value.is_empty() {
            continue;
        }
        record.insert(key, value);
    }
    record
}
