use crate::error::{FetchError, SubmitError};
use crate::model::value::{FileRef, Identity, RecordRef};

#[derive(Debug, Clone, PartialEq)]
pub enum Msg {
    /// Text typed into a single-line, multi-line, plain or rich text control.
    SetText { uid: String, value: String },
    SearchRecipients { uid: String, query: String },
    AddRecipient { uid: String, identity_id: String },
    RemoveRecipient { uid: String, identity_id: String },
    SetTagDraft { uid: String, draft: String },
    /// Enter pressed in a tag input.
    CommitTag { uid: String },
    RemoveTag { uid: String, tag: String },
    OpenFilePicker { uid: String },
    CloseFilePicker { uid: String },
    SelectFile { uid: String, file_id: String },
    RemoveFile { uid: String },
    IdentitiesLoaded(Result<Vec<Identity>, FetchError>),
    FilesLoaded(Result<Vec<FileRef>, FetchError>),
    Submit,
    SubmitSucceeded(RecordRef),
    SubmitFailed(SubmitError),
}
