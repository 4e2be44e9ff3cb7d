use crate::model::field::{FieldKind, FieldModel};

///
/// EntityModel
///
/// Static runtime model for one entity type. Declared once (normally by
/// the `entity!` macro), immutable thereafter. All name lookups return
/// `Option`: an absent name is a lookup failure, never a default.
///

pub struct EntityModel {
    /// Fully-qualified Rust type path (for diagnostics).
    pub path: &'static str,
    /// Stable external name used in store routing.
    pub entity_name: &'static str,
    /// Primary key field name (must name an entry in `fields`).
    pub primary_key: &'static str,
    /// Ordered field list (authoritative for projection planning).
    pub fields: &'static [FieldModel],
}

impl EntityModel {
    /// Look up a scalar field by name. Relations are excluded.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&FieldModel> {
        self.fields
            .iter()
            .find(|field| field.name == name && !field.kind.is_relation())
    }

    /// Look up a relationship by name.
    #[must_use]
    pub fn relation(&self, name: &str) -> Option<&FieldModel> {
        self.fields
            .iter()
            .find(|field| field.name == name && field.kind.is_relation())
    }

    /// Look up any declared member, scalar or relationship. This is the
    /// attribute-then-relationship resolution order used by grouping and
    /// projection.
    #[must_use]
    pub fn member(&self, name: &str) -> Option<&FieldModel> {
        self.field(name).or_else(|| self.relation(name))
    }

    #[must_use]
    pub fn primary_key_field(&self) -> Option<&FieldModel> {
        self.fields
            .iter()
            .find(|field| field.name == self.primary_key)
    }

    #[must_use]
    pub fn field_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.fields.iter().map(|field| field.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MODEL: EntityModel = EntityModel {
        path: "model::tests::Sample",
        entity_name: "Sample",
        primary_key: "id",
        fields: &[
            FieldModel {
                name: "id",
                kind: FieldKind::Uint,
            },
            FieldModel {
                name: "label",
                kind: FieldKind::Text,
            },
            FieldModel {
                name: "owner",
                kind: FieldKind::Relation("User"),
            },
        ],
    };

    #[test]
    fn field_lookup_finds_scalars_only() {
        assert!(MODEL.field("label").is_some());
        assert!(MODEL.field("owner").is_none());
        assert!(MODEL.field("missing").is_none());
    }

    #[test]
    fn relation_lookup_finds_relations_only() {
        assert!(MODEL.relation("owner").is_some());
        assert!(MODEL.relation("label").is_none());
    }

    #[test]
    fn member_resolves_attribute_then_relationship() {
        assert_eq!(MODEL.member("label").map(|f| f.name), Some("label"));
        assert_eq!(MODEL.member("owner").map(|f| f.name), Some("owner"));
        assert!(MODEL.member("missing").is_none());
    }

    #[test]
    fn primary_key_field_resolves_declared_key() {
        assert_eq!(MODEL.primary_key_field().map(|f| f.name), Some("id"));
    }
}
