use crate::model::template::{BlockConfig, BlockType, Direction, Template};

#[derive(Debug, Clone, PartialEq)]
pub enum Msg {
    /// Inserts a default block; `at` past the end appends.
    AddBlock { block_type: BlockType, at: Option<usize> },
    RemoveBlock(String),
    MoveBlock { id: String, direction: Direction },
    ConfigureBlock { id: String, config: BlockConfig },
    SelectBlock(Option<String>),
    Rename(String),
    /// Compiles the template into a content type, ready to publish.
    Compile,
    /// The compiled content type was published.
    SaveSucceeded,
    SaveFailed(String),
    SetTemplate(Template),
    DismissMessage,
}
