pub mod doctypes;
pub mod export;
pub mod extract;
pub mod preview;
pub mod schema;
pub mod state;

pub use schema::{DocumentSchema, FieldKind, FieldSpec, ListSpec};
pub use state::{FieldValue, FormError, FormState, ListEntry};
