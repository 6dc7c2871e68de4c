//! Template → content type compilation.
//!
//! Every compiled schema starts with the three structural fields (`title`,
//! `subject`, `recipients`) followed by the fields of each block in block
//! order. Identifiers are `<type>_<blockId>`, with link blocks expanding into
//! a `_text` and a `_url` field.

use crate::error::TemplateError;
use crate::model::field::{ContentType, Field};
use crate::model::template::{AssetConfig, Block, BlockConfig, Template};
use log::debug;
use serde_json::Value;
use std::collections::HashSet;

/// Metadata key on a link's url field naming where the link opens.
pub const LINK_TARGET_KEY: &str = "link_target";

/// Where a compiled link opens, read back from its url field.
pub fn link_target(field: &Field) -> Option<String> {
    field
        .field_metadata
        .extra
        .get(LINK_TARGET_KEY)
        .and_then(Value::as_str)
        .map(String::from)
}

/// Compiles the template's block list into an ordered field list.
///
/// Runs the same singleton check as block insertion, so a block list that
/// was assembled by hand (or deserialized) is rejected here as well. Such a
/// list is also expanded by `order` rather than by position, and may not
/// reuse a block id.
pub fn compile_fields(template: &Template) -> Result<Vec<Field>, TemplateError> {
    template.validate_singletons()?;

    let mut blocks: Vec<&Block> = template.blocks.iter().collect();
    let mut seen = HashSet::new();
    if let Some(dup) = blocks.iter().find(|b| !seen.insert(b.id.as_str())) {
        return Err(TemplateError::DuplicateBlockId(dup.id.clone()));
    }
    blocks.sort_by_key(|b| b.order);

    let mut fields = structural_fields();
    for block in blocks {
        fields.extend(block_fields(block));
    }
    debug!(
        "compiled template `{}`: {} blocks into {} fields",
        template.name,
        template.blocks.len(),
        fields.len()
    );
    Ok(fields)
}

/// Compiles a named template into a publishable content type.
pub fn compile(template: &Template) -> Result<ContentType, TemplateError> {
    let schema = compile_fields(template)?;
    if !template.has_usable_name() {
        return Err(TemplateError::NameRequired);
    }
    let title = template.name.trim().to_string();
    Ok(ContentType {
        uid: slugify(&title),
        description: format!("Notification template \"{}\"", title),
        title,
        schema,
        extra: Default::default(),
    })
}

/// Lowercase ASCII alphanumerics; every other run collapses to one `_`.
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    for c in name.chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
        } else if !slug.is_empty() && !slug.ends_with('_') {
            slug.push('_');
        }
    }
    let slug = slug.trim_end_matches('_');
    if slug.is_empty() {
        "template".to_string()
    } else {
        slug.to_string()
    }
}

fn structural_fields() -> Vec<Field> {
    vec![
        Field::text("title", "Title").described("Internal name of this notification"),
        Field::text("subject", "Subject")
            .described("Email subject line")
            .required(true),
        {
            let mut recipients = Field::text("recipients", "Recipients")
                .described("Comma-separated recipient identifiers")
                .required(true);
            recipients.field_metadata.multiline = true;
            recipients
        },
    ]
}

fn block_fields(block: &Block) -> Vec<Field> {
    let prefix = format!("{}_{}", block.block_type().as_str(), block.id);
    match &block.config {
        BlockConfig::Text(config) => {
            let mut field = Field::text(&prefix, &config.label).required(config.required);
            field.field_metadata.description = config.description.clone();
            field.field_metadata.rich_text_type = config.rich_text.clone();
            field.field_metadata.multiline = config.multiline;
            if !config.content.is_empty() {
                field.field_metadata.default_value = Some(Value::String(config.content.clone()));
            }
            vec![field]
        }
        BlockConfig::Image(config) => vec![asset_field(&prefix, config, true)],
        BlockConfig::File(config) => vec![asset_field(&prefix, config, false)],
        BlockConfig::Link(config) => {
            let mut text = Field::text(format!("{}_text", prefix), format!("{} Text", config.label))
                .required(config.required)
                .with_default(config.link_text.clone());
            text.field_metadata.description = config.description.clone();

            let mut url = Field::text(format!("{}_url", prefix), format!("{} URL", config.label))
                .required(config.required)
                .described("Where the link points to");
            if !config.link_url.is_empty() {
                url.field_metadata.default_value = Some(Value::String(config.link_url.clone()));
            }
            url.field_metadata.extra.insert(
                LINK_TARGET_KEY.to_string(),
                Value::String(config.target.as_str().to_string()),
            );
            vec![text, url]
        }
        BlockConfig::Cc(config) | BlockConfig::Bcc(config) => {
            let mut field = Field::text(&prefix, &config.label).required(config.required);
            field.field_metadata.description = config.description.clone();
            field.field_metadata.multiline = true;
            if !config.recipients.trim().is_empty() {
                field.field_metadata.default_value =
                    Some(Value::String(config.recipients.trim().to_string()));
            }
            vec![field]
        }
    }
}

fn asset_field(uid: &str, config: &AssetConfig, image: bool) -> Field {
    let mut field = Field::file(uid, &config.label).required(config.required);
    field.field_metadata.description = config.description.clone();
    field.field_metadata.image = image;
    field.field_metadata.extensions = config.extensions.clone();
    field.field_metadata.file_size = config.max_size.clone().map(Value::String);
    field
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::field::DataType;
    use crate::model::template::{BlockType, LinkConfig, LinkTarget};
    use pretty_assertions::assert_eq;

    fn uids(fields: &[Field]) -> Vec<&str> {
        fields.iter().map(|f| f.uid.as_str()).collect()
    }

    #[test]
    fn empty_template_yields_structural_fields() {
        let fields = compile_fields(&Template::new("Welcome")).unwrap();
        assert_eq!(uids(&fields), vec!["title", "subject", "recipients"]);
        assert!(!fields[0].mandatory);
        assert!(fields[1].mandatory && fields[2].mandatory);
    }

    #[test]
    fn every_block_type_expands_in_order() {
        let mut template = Template::new("Welcome");
        for block_type in BlockType::ALL {
            template.insert_block(block_type, None).unwrap();
        }

        let fields = compile_fields(&template).unwrap();
        assert_eq!(
            uids(&fields),
            vec![
                "title",
                "subject",
                "recipients",
                "text_1",
                "image_2",
                "file_3",
                "link_4_text",
                "link_4_url",
                "cc_5",
                "bcc_6",
            ]
        );
        assert!(fields[4].is_image());
        assert_eq!(fields[5].data_type, DataType::File);
        assert!(!fields[5].is_image());
        assert!(fields[8].field_metadata.multiline);
    }

    #[test]
    fn link_block_carries_text_url_and_target() {
        let mut template = Template::new("Welcome");
        let id = template.insert_block(BlockType::Link, None).unwrap().id.clone();
        template
            .configure_block(
                &id,
                BlockConfig::Link(LinkConfig {
                    link_url: "https://example.org".into(),
                    target: LinkTarget::SameWindow,
                    ..LinkConfig::default()
                }),
            )
            .unwrap();

        let fields = compile_fields(&template).unwrap();
        let text = &fields[3];
        let url = &fields[4];
        assert_eq!(text.default_text().as_deref(), Some("Click Here"));
        assert_eq!(url.default_text().as_deref(), Some("https://example.org"));
        assert_eq!(link_target(url).as_deref(), Some("_self"));
    }

    #[test]
    fn duplicate_singletons_fail_at_compile_time() {
        let mut template = Template::new("Welcome");
        template.insert_block(BlockType::Link, None).unwrap();
        template.blocks.push(Block {
            id: "9".into(),
            order: 1,
            config: BlockConfig::default_for(BlockType::Link),
        });

        assert_eq!(
            compile_fields(&template).unwrap_err(),
            TemplateError::SchemaConflict {
                block_type: BlockType::Link
            }
        );
    }

    #[test]
    fn reused_block_ids_are_rejected() {
        let mut template = Template::new("Welcome");
        template.insert_block(BlockType::Text, None).unwrap();
        let mut copy = template.blocks[0].clone();
        copy.order = 1;
        template.blocks.push(copy);

        assert_eq!(
            compile_fields(&template).unwrap_err(),
            TemplateError::DuplicateBlockId("1".into())
        );
    }

    #[test]
    fn hand_built_block_lists_expand_by_order() {
        let mut template = Template::new("Welcome");
        for (id, order, block_type) in [
            ("7", 5, BlockType::File),
            ("3", 0, BlockType::Text),
            ("4", 2, BlockType::Image),
        ] {
            template.blocks.push(Block {
                id: id.into(),
                order,
                config: BlockConfig::default_for(block_type),
            });
        }

        let fields = compile_fields(&template).unwrap();
        assert_eq!(
            uids(&fields),
            vec!["title", "subject", "recipients", "text_3", "image_4", "file_7"]
        );
    }

    #[test]
    fn compile_requires_a_real_name() {
        assert_eq!(
            compile(&Template::new("Custom Template")).unwrap_err(),
            TemplateError::NameRequired
        );
        assert_eq!(
            compile(&Template::new("  ")).unwrap_err(),
            TemplateError::NameRequired
        );
    }

    #[test]
    fn content_type_uid_is_a_slug() {
        let content_type = compile(&Template::new("  Order Shipped!  (v2) ")).unwrap();
        assert_eq!(content_type.uid, "order_shipped_v2");
        assert_eq!(content_type.title, "Order Shipped!  (v2)");
        assert_eq!(slugify("¡¡"), "template");
    }

    #[test]
    fn compiled_schema_is_independent_of_later_edits() {
        let mut template = Template::new("Welcome");
        template.insert_block(BlockType::Text, None).unwrap();
        let compiled = compile_fields(&template).unwrap();

        template.remove_block("1").unwrap();
        assert_eq!(compiled.len(), 4);
        assert_eq!(compiled[3].uid, "text_1");
    }
}
