//! Entity declaration macros.
//!
//! `entity!` expands one declaration into the struct plus its `Path`,
//! `EntityKind`, and `EntityValue` implementations and a static
//! `EntityModel`. `row!` builds an `EntityRow` literal.

/// Declare an entity type and wire it into the runtime contracts.
///
/// ```ignore
/// entity! {
///     /// A user row.
///     pub struct User {
///         primary_key: id,
///         fields: {
///             id: u64 => Uint,
///             first_name: String => Text,
///             last_name: String => Text,
///         },
///     }
/// }
/// ```
///
/// Field kinds are `FieldKind` variant names; variants with payloads take
/// them in parentheses (`manager: Option<u64> => Relation("User")`).
#[macro_export]
macro_rules! entity {
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident {
            primary_key: $pk:ident,
            fields: {
                $( $field:ident : $ty:ty => $kind:ident $( ( $($karg:tt)* ) )? ),* $(,)?
            } $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Clone, Debug, Default, PartialEq)]
        $vis struct $name {
            $( pub $field: $ty, )*
        }

        impl $crate::traits::Path for $name {
            const PATH: &'static str = concat!(module_path!(), "::", stringify!($name));
        }

        impl $crate::traits::EntityKind for $name {
            const ENTITY_NAME: &'static str = stringify!($name);
            const MODEL: &'static $crate::model::EntityModel = &$crate::model::EntityModel {
                path: concat!(module_path!(), "::", stringify!($name)),
                entity_name: stringify!($name),
                primary_key: stringify!($pk),
                fields: &[
                    $(
                        $crate::model::FieldModel {
                            name: stringify!($field),
                            kind: $crate::model::FieldKind::$kind $( ( $($karg)* ) )?,
                        },
                    )*
                ],
            };
        }

        impl $crate::traits::EntityValue for $name {
            fn key(&self) -> $crate::value::Value {
                $crate::value::FieldValue::to_value(&self.$pk)
            }

            fn get(&self, field: &str) -> Option<$crate::value::Value> {
                match field {
                    $(
                        stringify!($field) => {
                            Some($crate::value::FieldValue::to_value(&self.$field))
                        }
                    )*
                    _ => None,
                }
            }

            fn put(&mut self, field: &str, value: $crate::value::Value) {
                match field {
                    $(
                        stringify!($field) => {
                            if let Ok(converted) =
                                <$ty as $crate::value::FieldValue>::from_value(value)
                            {
                                self.$field = converted;
                            }
                        }
                    )*
                    _ => {}
                }
            }
        }
    };
}

/// Build an `EntityRow` from `field => value` pairs.
#[macro_export]
macro_rules! row {
    () => {
        $crate::row::EntityRow::new()
    };
    ( $( $field:expr => $value:expr ),+ $(,)? ) => {{
        let mut row = $crate::row::EntityRow::new();
        $( row.set($field, $value); )+
        row
    }};
}

#[cfg(test)]
mod tests {
    use crate::{
        model::FieldKind,
        traits::{EntityKind, EntityValue},
        value::Value,
    };

    entity! {
        /// Macro expansion fixture.
        struct Widget {
            primary_key: id,
            fields: {
                id: u64 => Uint,
                label: String => Text,
                weight: f64 => Float,
                owner: Option<u64> => Relation("User"),
            },
        }
    }

    #[test]
    fn model_declares_fields_in_order() {
        let names: Vec<&str> = Widget::MODEL.field_names().collect();

        assert_eq!(names, vec!["id", "label", "weight", "owner"]);
        assert_eq!(Widget::MODEL.primary_key, "id");
        assert_eq!(Widget::ENTITY_NAME, "Widget");
        assert_eq!(
            Widget::MODEL.relation("owner").map(|f| f.kind),
            Some(FieldKind::Relation("User"))
        );
    }

    #[test]
    fn get_and_put_round_trip_declared_fields() {
        let mut widget = Widget::default();
        widget.put("id", Value::Uint(7));
        widget.put("label", Value::from("crate"));

        assert_eq!(widget.get("id"), Some(Value::Uint(7)));
        assert_eq!(widget.get("label"), Some(Value::from("crate")));
        assert_eq!(widget.key(), Value::Uint(7));
    }

    #[test]
    fn put_drops_unknown_fields_and_mismatched_payloads() {
        let mut widget = Widget::default();
        widget.put("no_such_field", Value::Uint(1));
        widget.put("label", Value::Uint(1));

        assert_eq!(widget, Widget::default());
    }

    #[test]
    fn row_round_trip_keeps_schema_subset() {
        let row = row! {
            "id" => 3u64,
            "label" => "axle",
            "nickname" => "ignored",
        };
        let widget = Widget::from_row(row);

        assert_eq!(widget.id, 3);
        assert_eq!(widget.label, "axle");

        let back = widget.to_row();
        assert_eq!(back.get("id"), Some(&Value::Uint(3)));
        assert!(!back.contains_key("nickname"));
    }
}
