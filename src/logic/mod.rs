pub mod binder;
pub mod validate;

pub use binder::{bind, bind_new, BindError, Bindable, FieldKind, FieldSpec, FieldValue};
pub use validate::{validate_city, validate_state};
