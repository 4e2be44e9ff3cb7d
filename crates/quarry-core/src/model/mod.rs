pub mod entity;
pub mod field;

pub use entity::EntityModel;
pub use field::{FieldKind, FieldModel};
