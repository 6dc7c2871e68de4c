//! HTML rendering of the generated form.
//!
//! Controls carry `data-uid` / `data-action` attributes so a thin client can
//! map DOM events back to [`super::messages::Msg`] values.

use super::state::{Control, FileFilter, FormControl, FormState};
use crate::html::{escape_html, format_file_size};
use crate::identities::search;
use crate::model::value::FileRef;
use crate::validate::FieldErrors;

pub fn view(state: &FormState) -> String {
    let mut out = String::from("<form class=\"notification-form\">\n");
    if let Some(message) = &state.submit_error {
        out.push_str(&format!(
            "<div class=\"form-error\" role=\"alert\">{}</div>\n",
            escape_html(message)
        ));
    }
    for control in &state.controls {
        out.push_str(&build_field(state, control, &state.errors));
    }
    out.push_str("<button type=\"submit\" data-action=\"submit\">Save</button>\n</form>\n");
    out
}

fn build_field(state: &FormState, control: &FormControl, errors: &FieldErrors) -> String {
    let field = &control.field.field;
    let uid = escape_html(control.uid());
    let required = if field.mandatory {
        " <span class=\"required\">*</span>"
    } else {
        ""
    };
    let description = field
        .description()
        .map(|d| format!("<p class=\"field-help\">{}</p>", escape_html(d)))
        .unwrap_or_default();
    let error = errors
        .get(control.uid())
        .map(|e| format!("<p class=\"field-error\">{}</p>", escape_html(e.message())))
        .unwrap_or_default();

    format!(
        "<div class=\"form-field\" data-uid=\"{uid}\">\n<label>{label}{required}</label>\n{description}{input}\n{error}</div>\n",
        label = escape_html(&field.display_name),
        input = build_control(state, &uid, &control.control),
    )
}

fn build_control(state: &FormState, uid: &str, control: &Control) -> String {
    match control {
        Control::RecipientPicker { selected, query } => {
            let chips: String = selected
                .iter()
                .map(|id| {
                    let label = state
                        .identity(id)
                        .map_or_else(|| id.clone(), |i| format!("{} <{}>", i.display_name, i.display_email()));
                    chip(uid, "remove-recipient", id, &label)
                })
                .collect();
            let candidates: String = if query.trim().is_empty() {
                String::new()
            } else {
                search(&state.identities, query)
                    .into_iter()
                    .filter(|i| !selected.contains(&i.id))
                    .map(|i| {
                        format!(
                            "<li data-action=\"add-recipient\" data-id=\"{}\">{} &lt;{}&gt;</li>",
                            escape_html(&i.id),
                            escape_html(&i.display_name),
                            escape_html(&i.display_email())
                        )
                    })
                    .collect()
            };
            format!(
                "<div class=\"chips\">{chips}</div><input type=\"search\" name=\"{uid}\" data-action=\"search-recipients\" value=\"{}\" placeholder=\"Search recipients\"><ul class=\"candidates\">{candidates}</ul>",
                escape_html(query)
            )
        }
        Control::TagInput { tags, draft } => {
            let chips: String = tags
                .iter()
                .map(|tag| chip(uid, "remove-tag", tag, tag))
                .collect();
            format!(
                "<div class=\"chips\">{chips}</div><input type=\"text\" name=\"{uid}\" data-action=\"tag-draft\" value=\"{}\" placeholder=\"Type and press Enter\">",
                escape_html(draft)
            )
        }
        Control::SingleLine { value } | Control::PlainText { value } => format!(
            "<input type=\"text\" name=\"{uid}\" value=\"{}\">",
            escape_html(value)
        ),
        Control::MultiLine { value } => format!(
            "<textarea name=\"{uid}\" rows=\"4\">{}</textarea>",
            escape_html(value)
        ),
        Control::RichText { kind, html } => format!(
            "<textarea name=\"{uid}\" class=\"rich-text\" data-rich-text=\"{}\">{}</textarea>",
            escape_html(&String::from(kind.clone())),
            escape_html(html)
        ),
        Control::FilePicker {
            selected,
            filter,
            picker_open,
        } => {
            let summary = match selected {
                Some(file) => format!(
                    "<div class=\"file-summary\">{}<button type=\"button\" data-action=\"open-picker\">Replace</button><button type=\"button\" data-action=\"remove-file\">Remove</button></div>",
                    file_label(file)
                ),
                None => "<button type=\"button\" data-action=\"open-picker\">Choose file</button>".to_string(),
            };
            let picker = if *picker_open {
                build_picker(&state.files, filter)
            } else {
                String::new()
            };
            format!("{summary}{picker}")
        }
    }
}

fn build_picker(files: &[FileRef], filter: &FileFilter) -> String {
    let items: String = files
        .iter()
        .filter(|file| filter.accepts(file))
        .map(|file| {
            format!(
                "<li data-action=\"select-file\" data-id=\"{}\">{}</li>",
                escape_html(&file.id),
                file_label(file)
            )
        })
        .collect();
    let hint = if filter.images_only {
        "Images only".to_string()
    } else if filter.extensions.is_empty() {
        "Any file".to_string()
    } else {
        filter.extensions.join(", ")
    };
    format!(
        "<div class=\"asset-picker\"><p class=\"field-help\">{} · max {}</p><ul>{items}</ul></div>",
        escape_html(&hint),
        format_file_size(filter.max_bytes)
    )
}

fn file_label(file: &FileRef) -> String {
    let size = file
        .size_bytes
        .map(|s| format!(" ({})", format_file_size(s)))
        .unwrap_or_default();
    format!("{}{}", escape_html(&file.display_name), size)
}

fn chip(uid: &str, action: &str, id: &str, label: &str) -> String {
    format!(
        "<span class=\"chip\">{}<button type=\"button\" data-uid=\"{uid}\" data-action=\"{action}\" data-id=\"{}\">×</button></span>",
        escape_html(label),
        escape_html(id)
    )
}
