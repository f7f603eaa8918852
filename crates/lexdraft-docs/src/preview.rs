use serde::Serialize;

use crate::schema::DocumentSchema;
use crate::state::{FormState, ListEntry};

/// Substituted for every referenced scalar field that is empty.
pub const PLACEHOLDER: &str = "__________";

// ── Rendered view ─────────────────────────────────────────────────────────

/// Derived, read-only projection of a [`FormState`] into document prose.
/// Regenerated from scratch on every render; never cached or persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DocumentView {
    pub title: String,
    pub subtitle: Option<String>,
    pub sections: Vec<Section>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Section {
    pub heading: Option<String>,
    pub blocks: Vec<Block>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Block {
    Paragraph { text: String },
    Items { items: Vec<String> },
    Table { columns: Vec<String>, rows: Vec<Vec<String>> },
    Signature { name: String, caption: String },
}

impl Section {
    pub fn new(heading: Option<&str>) -> Self {
        Self {
            heading: heading.map(str::to_string),
            blocks: Vec::new(),
        }
    }

    pub fn para(mut self, text: impl Into<String>) -> Self {
        self.blocks.push(Block::Paragraph { text: text.into() });
        self
    }

    pub fn items(mut self, items: Vec<String>) -> Self {
        if !items.is_empty() {
            self.blocks.push(Block::Items { items });
        }
        self
    }

    pub fn table(mut self, columns: &[&str], rows: Vec<Vec<String>>) -> Self {
        if !rows.is_empty() {
            self.blocks.push(Block::Table {
                columns: columns.iter().map(|c| (*c).to_string()).collect(),
                rows,
            });
        }
        self
    }

    pub fn signature(mut self, name: impl Into<String>, caption: impl Into<String>) -> Self {
        self.blocks.push(Block::Signature {
            name: name.into(),
            caption: caption.into(),
        });
        self
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }
}

impl DocumentView {
    /// Flatten to plain text: the shape fed to the export pipeline and to
    /// drafting-assistance prompts.
    pub fn to_text(&self) -> String {
        let mut out = String::new();
        out.push_str(&self.title);
        out.push('\n');
        if let Some(subtitle) = &self.subtitle {
            out.push_str(subtitle);
            out.push('\n');
        }
        for section in &self.sections {
            out.push('\n');
            if let Some(heading) = &section.heading {
                out.push_str(heading);
                out.push('\n');
            }
            for block in &section.blocks {
                match block {
                    Block::Paragraph { text } => {
                        out.push_str(text);
                        out.push('\n');
                    }
                    Block::Items { items } => {
                        for item in items {
                            out.push_str("- ");
                            out.push_str(item);
                            out.push('\n');
                        }
                    }
                    Block::Table { columns, rows } => {
                        out.push_str(&columns.join(" | "));
                        out.push('\n');
                        for row in rows {
                            out.push_str(&row.join(" | "));
                            out.push('\n');
                        }
                    }
                    Block::Signature { name, caption } => {
                        out.push_str("_______________________________\n");
                        out.push_str(name);
                        out.push('\n');
                        out.push('(');
                        out.push_str(caption);
                        out.push_str(")\n");
                    }
                }
            }
        }
        out
    }
}

// ── Template helper ───────────────────────────────────────────────────────

/// Read access to a [`FormState`] with the substitution rules every
/// document template shares: empty scalars become [`PLACEHOLDER`], optional
/// prose renders only when non-empty, and list rows whose primary subfield
/// is blank are skipped entirely.
pub struct Tpl<'a> {
    pub schema: &'a DocumentSchema,
    pub state: &'a FormState,
}

impl<'a> Tpl<'a> {
    pub fn new(schema: &'a DocumentSchema, state: &'a FormState) -> Self {
        Self { schema, state }
    }

    /// Scalar value, or the placeholder when empty.
    pub fn get(&self, name: &str) -> String {
        let v = self.state.text(name);
        if v.trim().is_empty() {
            PLACEHOLDER.to_string()
        } else {
            v.to_string()
        }
    }

    /// Scalar value only when non-empty; `None` suppresses the block.
    pub fn opt(&self, name: &str) -> Option<String> {
        let v = self.state.text(name).trim();
        if v.is_empty() {
            None
        } else {
            Some(v.to_string())
        }
    }

    pub fn flag(&self, name: &str) -> bool {
        self.state.flag(name)
    }

    /// Record subfield, or the placeholder when empty.
    pub fn rec(&self, name: &str, key: &str) -> String {
        let v = self
            .state
            .record(name)
            .and_then(|map| map.get(key))
            .map(String::as_str)
            .unwrap_or("");
        if v.trim().is_empty() {
            PLACEHOLDER.to_string()
        } else {
            v.to_string()
        }
    }

    /// String-list joined with ", ", or the placeholder when empty.
    pub fn join(&self, name: &str) -> String {
        let items = self.state.strings(name);
        if items.is_empty() {
            PLACEHOLDER.to_string()
        } else {
            items.join(", ")
        }
    }

    /// The renderable rows of a list field, in stored order, with
    /// blank-primary entries dropped. Numbering in templates comes from the
    /// position in this iteration, so it stays dense across edits.
    pub fn rows(&self, name: &str) -> Vec<&'a ListEntry> {
        let primary = self
            .schema
            .list_spec(name)
            .map(|spec| spec.primary.clone())
            .unwrap_or_default();
        self.state
            .entries(name)
            .iter()
            .filter(|entry| {
                entry
                    .get(&primary)
                    .map(|v| !v.trim().is_empty())
                    .unwrap_or(false)
            })
            .collect()
    }

    /// Subfield of a row, or the placeholder when empty.
    pub fn cell(entry: &ListEntry, key: &str) -> String {
        let v = entry.get(key).map(String::as_str).unwrap_or("");
        if v.trim().is_empty() {
            PLACEHOLDER.to_string()
        } else {
            v.to_string()
        }
    }
}
