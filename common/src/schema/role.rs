//! Role inference from field identifiers.
//!
//! There is no role tag on a field: what a field *is* (recipient list, subject,
//! link part, ...) follows from naming conventions in its identifier. The rules
//! below are evaluated top to bottom and the first match wins; an identifier no
//! rule claims is plain text. Schemas are classified once when loaded, see
//! [`super::Schema`].

use crate::model::field::{DataType, Field};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    GroupHeader,
    LinkPart,
    /// A link-like identifier that is neither a text nor a url part. Such
    /// fields are skipped by the form and the preview rather than rejected.
    Suppressed,
    RecipientList,
    TagList,
    Subject,
    Cc,
    Bcc,
    FileUpload,
    GenericText,
}

impl Role {
    /// Recipient-like roles resolve raw identifiers to display identities.
    pub fn is_recipient_like(self) -> bool {
        matches!(self, Role::RecipientList | Role::Cc | Role::Bcc)
    }

    /// Roles that never get an input control.
    pub fn is_structural(self) -> bool {
        matches!(self, Role::GroupHeader | Role::Suppressed)
    }
}

struct Rule {
    role: Role,
    applies: fn(&str, &DataType) -> bool,
}

const LINK_SUFFIXES: [&str; 4] = [".text", "_text", ".url", "_url"];

const RULES: &[Rule] = &[
    Rule {
        role: Role::GroupHeader,
        applies: |_, data_type| *data_type == DataType::GroupHeader,
    },
    Rule {
        role: Role::LinkPart,
        applies: |uid, _| uid.contains("link") && LINK_SUFFIXES.iter().any(|s| uid.ends_with(s)),
    },
    Rule {
        role: Role::Suppressed,
        applies: |uid, _| uid.contains("link"),
    },
    Rule {
        role: Role::RecipientList,
        applies: |uid, _| {
            (uid.contains("recipient") || uid.contains("to") || uid == "recipients")
                && !uid.contains("cc")
                && !uid.contains("bcc")
        },
    },
    Rule {
        role: Role::TagList,
        applies: |uid, _| uid.contains("tag"),
    },
    Rule {
        role: Role::Subject,
        applies: |uid, _| uid.contains("subject"),
    },
    Rule {
        role: Role::Cc,
        applies: |uid, _| uid.contains("cc") && !uid.contains("bcc"),
    },
    Rule {
        role: Role::Bcc,
        applies: |uid, _| uid.contains("bcc"),
    },
    Rule {
        role: Role::FileUpload,
        applies: |_, data_type| *data_type == DataType::File,
    },
];

pub fn classify(uid: &str, data_type: &DataType) -> Role {
    RULES
        .iter()
        .find(|rule| (rule.applies)(uid, data_type))
        .map_or(Role::GenericText, |rule| rule.role)
}

/// Which half of a link a `LinkPart` field carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkHalf {
    Text,
    Url,
}

/// Splits a link part identifier into the shared link key and its half,
/// e.g. `link_3_url` → (`link_3`, Url) and `cta.link.text` → (`cta.link`, Text).
pub fn split_link_part(uid: &str) -> Option<(&str, LinkHalf)> {
    [
        (".text", LinkHalf::Text),
        ("_text", LinkHalf::Text),
        (".url", LinkHalf::Url),
        ("_url", LinkHalf::Url),
    ]
    .into_iter()
    .find_map(|(suffix, half)| uid.strip_suffix(suffix).map(|key| (key, half)))
}

/// True for identifiers naming where a link opens (`link_1_target`, `cta.target`).
pub fn is_link_target(uid: &str) -> bool {
    let last = uid.rsplit('.').next().unwrap_or(uid);
    last == "target" || last.ends_with("_target")
}

/// A field paired with its role, computed once per schema load.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassifiedField {
    pub role: Role,
    #[serde(flatten)]
    pub field: Field,
}

impl ClassifiedField {
    pub fn new(field: Field) -> Self {
        let role = classify(&field.uid, &field.data_type);
        if role == Role::Suppressed {
            log::warn!(
                "field `{}` looks like a link but is neither a text nor a url part; skipping it",
                field.uid
            );
        }
        Self { role, field }
    }

    pub fn uid(&self) -> &str {
        &self.field.uid
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("cc_1", DataType::Text, Role::Cc)]
    #[case("bcc_1", DataType::Text, Role::Bcc)]
    #[case("bcc_notes", DataType::Text, Role::Bcc)]
    #[case("recipients", DataType::Text, Role::RecipientList)]
    #[case("send_to", DataType::Text, Role::RecipientList)]
    #[case("link_1_text", DataType::Text, Role::LinkPart)]
    #[case("link_1_url", DataType::Text, Role::LinkPart)]
    #[case("footer_link.url", DataType::Text, Role::LinkPart)]
    #[case("link_1_target", DataType::Text, Role::Suppressed)]
    #[case("tag_group_header", DataType::GroupHeader, Role::GroupHeader)]
    #[case("tags", DataType::Text, Role::TagList)]
    #[case("subject", DataType::Text, Role::Subject)]
    #[case("image_2", DataType::File, Role::FileUpload)]
    #[case("text_3", DataType::Text, Role::GenericText)]
    #[case("title", DataType::Text, Role::GenericText)]
    #[case("", DataType::Other("number".into()), Role::GenericText)]
    fn classifier_precedence(#[case] uid: &str, #[case] data_type: DataType, #[case] role: Role) {
        assert_eq!(classify(uid, &data_type), role);
    }

    #[test]
    fn recipients_in_a_cc_identifier_are_cc() {
        assert_eq!(classify("cc_recipients", &DataType::Text), Role::Cc);
    }

    #[test]
    fn link_parts_split_into_key_and_half() {
        assert_eq!(split_link_part("link_3_url"), Some(("link_3", LinkHalf::Url)));
        assert_eq!(split_link_part("cta.link.text"), Some(("cta.link", LinkHalf::Text)));
        assert_eq!(split_link_part("link_3"), None);
    }

    #[test]
    fn link_targets_are_recognised_at_any_depth() {
        assert!(is_link_target("link_1_target"));
        assert!(is_link_target("cta.target"));
        assert!(!is_link_target("targeting"));
    }
}
