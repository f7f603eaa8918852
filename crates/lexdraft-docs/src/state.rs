use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::Serialize;
use thiserror::Error;
use tracing::debug;

use crate::schema::{DocumentSchema, FieldKind, ListSpec};

/// One structured sub-record of a list field. BTreeMap keeps subfield
/// serialization order stable so identical states render identically.
pub type ListEntry = BTreeMap<String, String>;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    Flag(bool),
    Text(String),
    StringList(Vec<String>),
    List(Vec<ListEntry>),
    Record(BTreeMap<String, String>),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormError {
    #[error("unknown field: {0}")]
    UnknownField(String),
    #[error("field {0} is not a list")]
    NotAList(String),
    #[error("unknown subfield {key:?} for list {field}")]
    UnknownSubfield { field: String, key: String },
    #[error("index {index} out of range for list {field} (len {len})")]
    IndexOutOfRange {
        field: String,
        index: usize,
        len: usize,
    },
    #[error("list {field} must keep at least {min} entries")]
    MinimumSize { field: String, min: usize },
    #[error("value has the wrong type for field {0}")]
    TypeMismatch(String),
}

/// The complete field values of one drafting session.
///
/// Created from schema defaults, mutated exclusively through the named
/// operations below, and never persisted: it lives in the server's draft
/// registry and dies with the session.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FormState {
    pub doc_type: String,
    pub values: BTreeMap<String, FieldValue>,
}

fn blank_entry(spec: &ListSpec) -> ListEntry {
    spec.keys
        .iter()
        .map(|k| (k.clone(), String::new()))
        .collect()
}

impl FormState {
    /// Default state for `schema`. `today` fills date-of-drafting style
    /// fields; it is a parameter so construction stays a pure function.
    pub fn new(schema: &DocumentSchema, today: NaiveDate) -> Self {
        let mut values = BTreeMap::new();
        for field in &schema.fields {
            let value = match &field.kind {
                FieldKind::Text { default } => FieldValue::Text(default.clone()),
                FieldKind::Date { today: seed } => FieldValue::Text(if *seed {
                    today.format("%Y-%m-%d").to_string()
                } else {
                    String::new()
                }),
                FieldKind::Flag { default } => FieldValue::Flag(*default),
                FieldKind::Record { keys } => FieldValue::Record(
                    keys.iter().map(|k| (k.clone(), String::new())).collect(),
                ),
                FieldKind::StringList { defaults } => FieldValue::StringList(defaults.clone()),
                FieldKind::List(spec) => {
                    FieldValue::List(vec![blank_entry(spec); spec.seed])
                }
            };
            values.insert(field.name.clone(), value);
        }
        Self {
            doc_type: schema.name.clone(),
            values,
        }
    }

    // ── Accessors ─────────────────────────────────────────────────────────

    /// Scalar text value, empty string when unset or not a text field.
    pub fn text(&self, name: &str) -> &str {
        match self.values.get(name) {
            Some(FieldValue::Text(s)) => s,
            _ => "",
        }
    }

    pub fn flag(&self, name: &str) -> bool {
        matches!(self.values.get(name), Some(FieldValue::Flag(true)))
    }

    pub fn record(&self, name: &str) -> Option<&BTreeMap<String, String>> {
        match self.values.get(name) {
            Some(FieldValue::Record(map)) => Some(map),
            _ => None,
        }
    }

    pub fn strings(&self, name: &str) -> &[String] {
        match self.values.get(name) {
            Some(FieldValue::StringList(items)) => items,
            _ => &[],
        }
    }

    pub fn entries(&self, name: &str) -> &[ListEntry] {
        match self.values.get(name) {
            Some(FieldValue::List(entries)) => entries,
            _ => &[],
        }
    }

    // ── Scalar / record updates ───────────────────────────────────────────

    /// Update a non-list field from a JSON value, then re-evaluate any
    /// conditional sections gated by it.
    pub fn set_field(
        &mut self,
        schema: &DocumentSchema,
        name: &str,
        value: &serde_json::Value,
    ) -> Result<(), FormError> {
        let field = schema
            .field(name)
            .ok_or_else(|| FormError::UnknownField(name.to_string()))?;

        let new_value = match &field.kind {
            FieldKind::Text { .. } | FieldKind::Date { .. } => {
                let s = value
                    .as_str()
                    .ok_or_else(|| FormError::TypeMismatch(name.to_string()))?;
                FieldValue::Text(s.to_string())
            }
            FieldKind::Flag { .. } => {
                let b = value
                    .as_bool()
                    .ok_or_else(|| FormError::TypeMismatch(name.to_string()))?;
                FieldValue::Flag(b)
            }
            FieldKind::Record { keys } => {
                let obj = value
                    .as_object()
                    .ok_or_else(|| FormError::TypeMismatch(name.to_string()))?;
                let mut map = match self.values.get(name) {
                    Some(FieldValue::Record(map)) => map.clone(),
                    _ => keys.iter().map(|k| (k.clone(), String::new())).collect(),
                };
                for (key, v) in obj {
                    if !keys.contains(key) {
                        return Err(FormError::UnknownSubfield {
                            field: name.to_string(),
                            key: key.clone(),
                        });
                    }
                    let s = v
                        .as_str()
                        .ok_or_else(|| FormError::TypeMismatch(name.to_string()))?;
                    map.insert(key.clone(), s.to_string());
                }
                FieldValue::Record(map)
            }
            FieldKind::StringList { .. } => {
                let arr = value
                    .as_array()
                    .ok_or_else(|| FormError::TypeMismatch(name.to_string()))?;
                let mut items = Vec::with_capacity(arr.len());
                for v in arr {
                    let s = v
                        .as_str()
                        .ok_or_else(|| FormError::TypeMismatch(name.to_string()))?;
                    items.push(s.to_string());
                }
                FieldValue::StringList(items)
            }
            // List fields are edited through append/update_at/remove_at.
            FieldKind::List(_) => return Err(FormError::TypeMismatch(name.to_string())),
        };

        self.values.insert(name.to_string(), new_value);
        self.apply_conditions(schema, name);
        Ok(())
    }

    /// Re-evaluate the sections gated by `toggle`. A "yes" toggle seeds one
    /// blank entry into an empty list; any other value clears the list
    /// (the data loss is intentional: "no children" means none exist).
    /// Idempotent in both steady states.
    fn apply_conditions(&mut self, schema: &DocumentSchema, toggle: &str) {
        let active = self.text(toggle) == "yes";
        let gated: Vec<String> = schema
            .lists_gated_by(toggle)
            .map(str::to_string)
            .collect();
        for list_name in gated {
            let Some(spec) = schema.list_spec(&list_name) else {
                continue;
            };
            let len = self.entries(&list_name).len();
            if active && len == 0 {
                debug!(field = %list_name, "conditional section opened, seeding entry");
                self.values
                    .insert(list_name.clone(), FieldValue::List(vec![blank_entry(spec)]));
            } else if !active && len > 0 {
                debug!(field = %list_name, dropped = len, "conditional section closed");
                self.values
                    .insert(list_name.clone(), FieldValue::List(Vec::new()));
            }
        }
    }

    // ── List editing ──────────────────────────────────────────────────────

    fn list_mut<'a>(
        &'a mut self,
        schema: &DocumentSchema,
        name: &str,
    ) -> Result<(&'a mut Vec<ListEntry>, ListSpec), FormError> {
        let spec = match schema.field(name).map(|f| &f.kind) {
            Some(FieldKind::List(spec)) => spec.clone(),
            Some(_) => return Err(FormError::NotAList(name.to_string())),
            None => return Err(FormError::UnknownField(name.to_string())),
        };
        match self.values.get_mut(name) {
            Some(FieldValue::List(entries)) => Ok((entries, spec)),
            _ => Err(FormError::NotAList(name.to_string())),
        }
    }

    /// Append one blank entry built from the list's template. Also resyncs
    /// the derived list, if any, to the new length.
    pub fn append(&mut self, schema: &DocumentSchema, name: &str) -> Result<usize, FormError> {
        let (entries, spec) = self.list_mut(schema, name)?;
        entries.push(blank_entry(&spec));
        let len = entries.len();
        self.resync_derived(schema, &spec, len);
        Ok(len)
    }

    /// Replace one subfield of the entry at `index`. An out-of-range index
    /// or an undeclared subfield key is a caller error, never a silent no-op.
    pub fn update_at(
        &mut self,
        schema: &DocumentSchema,
        name: &str,
        index: usize,
        key: &str,
        value: &str,
    ) -> Result<(), FormError> {
        let (entries, spec) = self.list_mut(schema, name)?;
        if !spec.keys.iter().any(|k| k == key) {
            return Err(FormError::UnknownSubfield {
                field: name.to_string(),
                key: key.to_string(),
            });
        }
        let len = entries.len();
        let entry = entries
            .get_mut(index)
            .ok_or_else(|| FormError::IndexOutOfRange {
                field: name.to_string(),
                index,
                len,
            })?;
        entry.insert(key.to_string(), value.to_string());
        Ok(())
    }

    /// Remove the entry at `index`, preserving the order of survivors.
    /// Refused when the list is at its document-defined minimum size.
    pub fn remove_at(
        &mut self,
        schema: &DocumentSchema,
        name: &str,
        index: usize,
    ) -> Result<(), FormError> {
        let (entries, spec) = self.list_mut(schema, name)?;
        let len = entries.len();
        if index >= len {
            return Err(FormError::IndexOutOfRange {
                field: name.to_string(),
                index,
                len,
            });
        }
        if len <= spec.min_len {
            return Err(FormError::MinimumSize {
                field: name.to_string(),
                min: spec.min_len,
            });
        }
        entries.remove(index);
        let len = entries.len();
        self.resync_derived(schema, &spec, len);
        Ok(())
    }

    /// Rebuild the derived list as `len` blank entries. Existing derived
    /// content is discarded, mirroring the document semantics: shares must
    /// be re-stated whenever the membership changes.
    fn resync_derived(&mut self, schema: &DocumentSchema, spec: &ListSpec, len: usize) {
        let Some(derived_name) = spec.derived.as_deref() else {
            return;
        };
        let Some(derived_spec) = schema.list_spec(derived_name) else {
            return;
        };
        self.values.insert(
            derived_name.to_string(),
            FieldValue::List(vec![blank_entry(derived_spec); len]),
        );
    }
}
