//! State of one template editing session.

use crate::model::field::ContentType;
use crate::model::template::{Lint, Template, UNNAMED_TEMPLATE};

/// Holds the template being edited plus the feedback shown around it.
///
/// The session owns its template exclusively; nothing else mutates it.
#[derive(Debug, Clone, PartialEq)]
pub struct BuilderState {
    pub template: Template,

    /// Block currently open in the configuration panel.
    pub selected_block: Option<String>,

    /// Last rejection (singleton conflict, missing name, ...), cleared on the
    /// next successful change.
    pub message: Option<String>,

    /// Non-blocking authoring warnings, refreshed after every change.
    pub lints: Vec<Lint>,

    /// Content type produced by the last successful compile.
    pub compiled: Option<ContentType>,

    /// MD5 of the template at the last save. `None` until saved once.
    saved_fingerprint: Option<String>,
}

impl BuilderState {
    pub fn new() -> Self {
        Self::with_template(Template::new(UNNAMED_TEMPLATE))
    }

    pub fn with_template(template: Template) -> Self {
        let lints = template.lint();
        Self {
            template,
            selected_block: None,
            message: None,
            lints,
            compiled: None,
            saved_fingerprint: None,
        }
    }

    /// True when the template differs from what was last saved.
    pub fn is_dirty(&self) -> bool {
        self.saved_fingerprint.as_deref() != Some(self.template.fingerprint().as_str())
    }

    pub(crate) fn mark_saved(&mut self) {
        self.saved_fingerprint = Some(self.template.fingerprint());
    }

    pub(crate) fn refresh_lints(&mut self) {
        self.lints = self.template.lint();
    }
}

impl Default for BuilderState {
    fn default() -> Self {
        Self::new()
    }
}
