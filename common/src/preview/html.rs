//! HTML preview document.
//!
//! Header roles (subject and the recipient lists) are rendered as an email
//! header block; everything else goes into the body in schema order.
//! Placeholders carry the `placeholder` class so they can be styled apart
//! from real record data.

use super::{PreviewField, PreviewValue};
use crate::html::escape_html;
use crate::schema::role::Role;

pub fn render_html(title: &str, fields: &[PreviewField]) -> String {
    let (header, body): (Vec<&PreviewField>, Vec<&PreviewField>) = fields
        .iter()
        .partition(|f| f.role == Role::Subject || f.role.is_recipient_like());

    let header_rows: String = header.iter().map(|f| header_row(f)).collect();
    let body_rows: String = body.iter().map(|f| body_block(f)).collect();

    format!(
        "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n<title>{}</title>\n</head>\n<body>\n<div class=\"email-preview\">\n<div class=\"email-header\">\n{}</div>\n<div class=\"email-body\">\n{}</div>\n</div>\n</body>\n</html>\n",
        escape_html(title),
        header_rows,
        body_rows
    )
}

fn class_for(field: &PreviewField, base: &str) -> String {
    if field.placeholder {
        format!("{} placeholder", base)
    } else {
        base.to_string()
    }
}

fn header_row(field: &PreviewField) -> String {
    let label = match field.role {
        Role::Subject => "Subject",
        Role::Cc => "CC",
        Role::Bcc => "BCC",
        _ => "To",
    };
    format!(
        "<div class=\"{}\" data-uid=\"{}\"><strong>{}:</strong> {}</div>\n",
        class_for(field, "header-row"),
        escape_html(&field.uid),
        label,
        inline_value(&field.value)
    )
}

fn body_block(field: &PreviewField) -> String {
    let uid = escape_html(&field.uid);
    match &field.value {
        PreviewValue::Header => format!(
            "<h3 class=\"group-header\" data-uid=\"{}\">{}</h3>\n",
            uid,
            escape_html(&field.display_name)
        ),
        value => format!(
            "<div class=\"{}\" data-uid=\"{}\">{}</div>\n",
            class_for(field, "field"),
            uid,
            inline_value(value)
        ),
    }
}

fn inline_value(value: &PreviewValue) -> String {
    match value {
        PreviewValue::Header => String::new(),
        PreviewValue::Text { text } => escape_html(text).replace('\n', "<br>"),
        PreviewValue::RichText { html } => html.clone(),
        PreviewValue::Recipients { addresses } => escape_html(addresses),
        PreviewValue::Tags { tags } => tags
            .iter()
            .map(|t| format!("<span class=\"tag\">{}</span>", escape_html(t)))
            .collect::<Vec<_>>()
            .join(" "),
        PreviewValue::Image { url, name } if !url.is_empty() => format!(
            "<img src=\"{}\" alt=\"{}\">",
            escape_html(url),
            escape_html(name)
        ),
        PreviewValue::File { url, name } if !url.is_empty() => format!(
            "<a href=\"{}\" download>{}</a>",
            escape_html(url),
            escape_html(name)
        ),
        PreviewValue::Image { name, .. } | PreviewValue::File { name, .. } => escape_html(name),
        PreviewValue::Link { text, url, target } => format!(
            "<a href=\"{}\" target=\"{}\">{}</a>",
            escape_html(url),
            escape_html(target),
            escape_html(text)
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::preview::resolve_fields;
    use crate::schema::Schema;
    use crate::model::field::Field;

    #[test]
    fn empty_recipients_render_the_fallback_in_the_header() {
        let schema = Schema::load(&[
            Field::text("subject", "Subject"),
            Field::text("recipients", "Recipients"),
            Field::text("text_1", "Body").described("Main <b>copy</b>"),
        ]);
        let html = render_html("Welcome", &resolve_fields(&schema, None, &[]));

        assert!(html.contains(
            "<strong>To:</strong> user1@example.com, user2@example.com, user3@example.com</div>"
        ));
        assert!(html.contains("<div class=\"field placeholder\" data-uid=\"text_1\">[Main &lt;b&gt;copy&lt;/b&gt;]</div>"));
        assert!(html.contains("<title>Welcome</title>"));
    }

    #[test]
    fn links_open_in_their_target() {
        let value = PreviewValue::Link {
            text: "Go".into(),
            url: "https://example.org/?a=1&b=2".into(),
            target: "_blank".into(),
        };
        assert_eq!(
            inline_value(&value),
            "<a href=\"https://example.org/?a=1&amp;b=2\" target=\"_blank\">Go</a>"
        );
    }
}
