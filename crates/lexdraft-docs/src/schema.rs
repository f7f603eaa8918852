use serde::{Deserialize, Serialize};

/// Declarative description of one document type: its label and the ordered
/// set of fields a drafting session carries. One generic engine
/// ([`crate::state::FormState`]) interprets these descriptors for all
/// document types.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentSchema {
    /// Stable identifier ("will", "lease", ...).
    pub name: String,
    /// Human-facing title ("Last Will & Testament").
    pub label: String,
    pub fields: Vec<FieldSpec>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldSpec {
    pub name: String,
    #[serde(flatten)]
    pub kind: FieldKind,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FieldKind {
    /// Free-text scalar.
    Text { default: String },
    /// ISO-8601 date scalar; when `today` is set the session seeds it with
    /// the drafting date at creation.
    Date { today: bool },
    /// Boolean scalar.
    Flag { default: bool },
    /// Fixed-shape nested record (e.g. parents: father/mother).
    Record { keys: Vec<String> },
    /// Ordered list of plain strings (e.g. utility responsibilities).
    StringList { defaults: Vec<String> },
    /// Ordered list of structured sub-records.
    List(ListSpec),
}

/// Template and constraints for a repeatable list section.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListSpec {
    /// Key set every entry carries; appended entries are blank copies.
    pub keys: Vec<String>,
    /// The identifying subfield: entries whose value for it is empty are
    /// skipped entirely when rendering.
    pub primary: String,
    /// Removal is refused when it would shrink the list below this.
    pub min_len: usize,
    /// Number of blank entries present when a session starts.
    pub seed: usize,
    /// Name of the toggle field gating this section, if any. "yes" seeds
    /// one blank entry into an empty list; anything else clears it.
    pub gated_by: Option<String>,
    /// Name of a list kept at the same length as this one; resyncs fill it
    /// with blank entries.
    pub derived: Option<String>,
}

impl DocumentSchema {
    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn list_spec(&self, name: &str) -> Option<&ListSpec> {
        match self.field(name).map(|f| &f.kind) {
            Some(FieldKind::List(spec)) => Some(spec),
            _ => None,
        }
    }

    /// Names of list fields whose presence is governed by `toggle`.
    pub fn lists_gated_by<'a>(&'a self, toggle: &'a str) -> impl Iterator<Item = &'a str> {
        self.fields.iter().filter_map(move |f| match &f.kind {
            FieldKind::List(spec) if spec.gated_by.as_deref() == Some(toggle) => {
                Some(f.name.as_str())
            }
            _ => None,
        })
    }
}

// ── Field constructors ────────────────────────────────────────────────────
// Shorthand used by the per-document schema definitions in `doctypes`.

impl FieldSpec {
    pub fn text(name: &str) -> Self {
        Self {
            name: name.into(),
            kind: FieldKind::Text {
                default: String::new(),
            },
        }
    }

    pub fn text_default(name: &str, default: &str) -> Self {
        Self {
            name: name.into(),
            kind: FieldKind::Text {
                default: default.into(),
            },
        }
    }

    pub fn date(name: &str) -> Self {
        Self {
            name: name.into(),
            kind: FieldKind::Date { today: false },
        }
    }

    pub fn date_today(name: &str) -> Self {
        Self {
            name: name.into(),
            kind: FieldKind::Date { today: true },
        }
    }

    pub fn flag(name: &str, default: bool) -> Self {
        Self {
            name: name.into(),
            kind: FieldKind::Flag { default },
        }
    }

    pub fn record(name: &str, keys: &[&str]) -> Self {
        Self {
            name: name.into(),
            kind: FieldKind::Record {
                keys: keys.iter().map(|k| (*k).into()).collect(),
            },
        }
    }

    pub fn string_list(name: &str, defaults: &[&str]) -> Self {
        Self {
            name: name.into(),
            kind: FieldKind::StringList {
                defaults: defaults.iter().map(|d| (*d).into()).collect(),
            },
        }
    }

    pub fn list(name: &str, spec: ListSpec) -> Self {
        Self {
            name: name.into(),
            kind: FieldKind::List(spec),
        }
    }
}

/// Shorthand for a [`ListSpec`] with the given template keys; the first key
/// is the primary subfield.
pub fn entries(keys: &[&str], min_len: usize, seed: usize) -> ListSpec {
    ListSpec {
        keys: keys.iter().map(|k| (*k).into()).collect(),
        primary: (*keys.first().unwrap_or(&"")).into(),
        min_len,
        seed,
        gated_by: None,
        derived: None,
    }
}
