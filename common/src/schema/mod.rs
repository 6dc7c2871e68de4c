//! Compiled schemas as the form and the preview consume them.
//!
//! A [`Schema`] is loaded once per fetched content type: groups are flattened
//! and every flat field is classified, so renders never re-run the rule table.

pub mod compiler;
pub mod group;
pub mod role;

use crate::model::field::Field;
use group::GroupMapping;
use role::{ClassifiedField, Role};
use serde_json::{Map, Value};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Schema {
    fields: Vec<ClassifiedField>,
    mapping: GroupMapping,
}

impl Schema {
    pub fn load(schema: &[Field]) -> Self {
        let mapping = GroupMapping::new(schema);
        let fields = mapping.flatten().into_iter().map(ClassifiedField::new).collect();
        Self { fields, mapping }
    }

    /// Every flat field, group headers and suppressed fields included.
    pub fn fields(&self) -> &[ClassifiedField] {
        &self.fields
    }

    /// Fields that get a control in the form and a row in the preview.
    pub fn inputs(&self) -> impl Iterator<Item = &ClassifiedField> {
        self.fields.iter().filter(|f| !f.role.is_structural())
    }

    /// Fields rendered by the preview: inputs plus group headers.
    pub fn visible(&self) -> impl Iterator<Item = &ClassifiedField> {
        self.fields.iter().filter(|f| f.role != Role::Suppressed)
    }

    pub fn field(&self, uid: &str) -> Option<&ClassifiedField> {
        self.fields.iter().find(|f| f.uid() == uid)
    }

    pub fn role_of(&self, uid: &str) -> Option<Role> {
        self.field(uid).map(|f| f.role)
    }

    pub fn nest(&self, flat: &Map<String, Value>) -> Map<String, Value> {
        self.mapping.nest(flat)
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_flattens_and_classifies_once() {
        let schema = Schema::load(&[
            Field::text("subject", "Subject"),
            Field::group(
                "footer",
                "Footer",
                vec![Field::text("link_text", "Text"), Field::text("link_style", "Style")],
            ),
        ]);

        let roles: Vec<(&str, Role)> = schema.fields().iter().map(|f| (f.uid(), f.role)).collect();
        assert_eq!(
            roles,
            vec![
                ("subject", Role::Subject),
                ("footer_group_header", Role::GroupHeader),
                ("footer.link_text", Role::LinkPart),
                ("footer.link_style", Role::Suppressed),
            ]
        );
        assert_eq!(schema.inputs().count(), 2);
        assert_eq!(schema.visible().count(), 3);
    }
}
