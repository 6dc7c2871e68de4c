//! The block model: an ordered list of typed content blocks authored in the
//! template builder.
//!
//! A `Template` is owned by exactly one editing session. Every mutation goes
//! through a method here so that the singleton rule (at most one cc, bcc and
//! link block) and the dense `order` sequence hold after each call. The same
//! singleton check is used when inserting a block and when compiling, so a
//! compiled schema can never disagree with the live block list.

use crate::error::TemplateError;
use crate::model::field::RichTextKind;
use serde::{Deserialize, Serialize};
use std::iter;

/// Placeholder name given to fresh templates; saving with it is rejected.
pub const UNNAMED_TEMPLATE: &str = "Custom Template";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BlockType {
    Text,
    Image,
    File,
    Link,
    Cc,
    Bcc,
}

impl BlockType {
    pub const ALL: [BlockType; 6] = [
        BlockType::Text,
        BlockType::Image,
        BlockType::File,
        BlockType::Link,
        BlockType::Cc,
        BlockType::Bcc,
    ];

    /// Block types capped at one occurrence per template.
    pub fn is_singleton(self) -> bool {
        matches!(self, BlockType::Cc | BlockType::Bcc | BlockType::Link)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            BlockType::Text => "text",
            BlockType::Image => "image",
            BlockType::File => "file",
            BlockType::Link => "link",
            BlockType::Cc => "cc",
            BlockType::Bcc => "bcc",
        }
    }

    pub fn upper_name(self) -> &'static str {
        match self {
            BlockType::Text => "TEXT",
            BlockType::Image => "IMAGE",
            BlockType::File => "FILE",
            BlockType::Link => "LINK",
            BlockType::Cc => "CC",
            BlockType::Bcc => "BCC",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LinkTarget {
    #[default]
    #[serde(rename = "_blank")]
    NewWindow,
    #[serde(rename = "_self")]
    SameWindow,
}

impl LinkTarget {
    pub fn as_str(self) -> &'static str {
        match self {
            LinkTarget::NewWindow => "_blank",
            LinkTarget::SameWindow => "_self",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextConfig {
    pub label: String,
    pub description: Option<String>,
    pub required: bool,
    /// Preview/default content for the compiled field.
    pub content: String,
    pub rich_text: Option<RichTextKind>,
    pub multiline: bool,
}

impl Default for TextConfig {
    fn default() -> Self {
        Self {
            label: "Text Content".to_string(),
            description: Some("Enter your text content here".to_string()),
            required: false,
            content: String::new(),
            rich_text: None,
            multiline: false,
        }
    }
}

/// Configuration shared by image and file blocks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssetConfig {
    pub label: String,
    pub description: Option<String>,
    pub required: bool,
    pub extensions: Vec<String>,
    /// Upload limit such as `"10MB"`.
    pub max_size: Option<String>,
}

impl AssetConfig {
    pub fn image() -> Self {
        Self {
            label: "Image".to_string(),
            description: Some("Select an image from the asset library".to_string()),
            required: false,
            extensions: ["jpg", "jpeg", "png", "gif"].map(String::from).to_vec(),
            max_size: None,
        }
    }

    pub fn file() -> Self {
        Self {
            label: "File Attachment".to_string(),
            description: Some("Select a file from the asset library".to_string()),
            required: false,
            extensions: ["pdf", "doc", "docx", "txt"].map(String::from).to_vec(),
            max_size: None,
        }
    }
}

impl Default for AssetConfig {
    fn default() -> Self {
        Self::file()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LinkConfig {
    pub label: String,
    pub description: Option<String>,
    pub required: bool,
    pub link_text: String,
    pub link_url: String,
    pub target: LinkTarget,
}

impl Default for LinkConfig {
    fn default() -> Self {
        Self {
            label: "Link".to_string(),
            description: Some("Add a clickable link".to_string()),
            required: false,
            link_text: "Click Here".to_string(),
            link_url: String::new(),
            target: LinkTarget::NewWindow,
        }
    }
}

/// Configuration shared by cc and bcc blocks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecipientsConfig {
    pub label: String,
    pub description: Option<String>,
    pub required: bool,
    /// Comma or semicolon separated recipient identifiers used as the default.
    pub recipients: String,
}

impl RecipientsConfig {
    pub fn cc() -> Self {
        Self {
            label: "CC Recipients".to_string(),
            description: Some("Carbon copy recipients".to_string()),
            required: false,
            recipients: String::new(),
        }
    }

    pub fn bcc() -> Self {
        Self {
            label: "BCC Recipients".to_string(),
            description: Some("Blind carbon copy recipients".to_string()),
            required: false,
            recipients: String::new(),
        }
    }
}

impl Default for RecipientsConfig {
    fn default() -> Self {
        Self::cc()
    }
}

/// Per-type configuration. The tag doubles as the block's type, so a block
/// can never carry a configuration for another type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum BlockConfig {
    Text(TextConfig),
    Image(AssetConfig),
    File(AssetConfig),
    Link(LinkConfig),
    Cc(RecipientsConfig),
    Bcc(RecipientsConfig),
}

impl BlockConfig {
    pub fn default_for(block_type: BlockType) -> Self {
        match block_type {
            BlockType::Text => BlockConfig::Text(TextConfig::default()),
            BlockType::Image => BlockConfig::Image(AssetConfig::image()),
            BlockType::File => BlockConfig::File(AssetConfig::file()),
            BlockType::Link => BlockConfig::Link(LinkConfig::default()),
            BlockType::Cc => BlockConfig::Cc(RecipientsConfig::cc()),
            BlockType::Bcc => BlockConfig::Bcc(RecipientsConfig::bcc()),
        }
    }

    pub fn block_type(&self) -> BlockType {
        match self {
            BlockConfig::Text(_) => BlockType::Text,
            BlockConfig::Image(_) => BlockType::Image,
            BlockConfig::File(_) => BlockType::File,
            BlockConfig::Link(_) => BlockType::Link,
            BlockConfig::Cc(_) => BlockType::Cc,
            BlockConfig::Bcc(_) => BlockType::Bcc,
        }
    }

    pub fn label(&self) -> &str {
        match self {
            BlockConfig::Text(c) => &c.label,
            BlockConfig::Image(c) | BlockConfig::File(c) => &c.label,
            BlockConfig::Link(c) => &c.label,
            BlockConfig::Cc(c) | BlockConfig::Bcc(c) => &c.label,
        }
    }

    pub fn description(&self) -> Option<&str> {
        match self {
            BlockConfig::Text(c) => c.description.as_deref(),
            BlockConfig::Image(c) | BlockConfig::File(c) => c.description.as_deref(),
            BlockConfig::Link(c) => c.description.as_deref(),
            BlockConfig::Cc(c) | BlockConfig::Bcc(c) => c.description.as_deref(),
        }
    }

    pub fn required(&self) -> bool {
        match self {
            BlockConfig::Text(c) => c.required,
            BlockConfig::Image(c) | BlockConfig::File(c) => c.required,
            BlockConfig::Link(c) => c.required,
            BlockConfig::Cc(c) | BlockConfig::Bcc(c) => c.required,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Block {
    pub id: String,
    pub order: usize,
    pub config: BlockConfig,
}

impl Block {
    pub fn block_type(&self) -> BlockType {
        self.config.block_type()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
}

/// A non-blocking authoring problem found by [`Template::lint`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lint {
    pub block_id: String,
    pub field: String,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Template {
    pub uid: String,
    pub name: String,
    #[serde(default)]
    pub blocks: Vec<Block>,
    /// Next numeric block id. Ids are plain counters so that generated field
    /// identifiers never pick up role keywords by accident.
    #[serde(default)]
    next_block_id: u64,
}

impl Template {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            uid: uuid::Uuid::new_v4().to_string(),
            name: name.into(),
            blocks: Vec::new(),
            next_block_id: 1,
        }
    }

    /// Rejects any block list holding more than one block of a singleton type.
    fn check_singletons(types: impl IntoIterator<Item = BlockType>) -> Result<(), TemplateError> {
        let mut seen: Vec<BlockType> = Vec::new();
        for block_type in types.into_iter().filter(|t| t.is_singleton()) {
            if seen.contains(&block_type) {
                return Err(TemplateError::SchemaConflict { block_type });
            }
            seen.push(block_type);
        }
        Ok(())
    }

    /// Checks the singleton rule against the current block list.
    pub fn validate_singletons(&self) -> Result<(), TemplateError> {
        Self::check_singletons(self.blocks.iter().map(Block::block_type))
    }

    /// Checks whether a block of `block_type` could be added without conflict.
    pub fn admits(&self, block_type: BlockType) -> Result<(), TemplateError> {
        Self::check_singletons(
            self.blocks
                .iter()
                .map(Block::block_type)
                .chain(iter::once(block_type)),
        )
    }

    pub fn contains(&self, block_type: BlockType) -> bool {
        self.blocks.iter().any(|b| b.block_type() == block_type)
    }

    pub fn block(&self, id: &str) -> Option<&Block> {
        self.blocks.iter().find(|b| b.id == id)
    }

    /// Inserts a block with the default configuration for its type.
    ///
    /// `at` beyond the end appends. On conflict the block list is untouched.
    pub fn insert_block(
        &mut self,
        block_type: BlockType,
        at: Option<usize>,
    ) -> Result<&Block, TemplateError> {
        self.admits(block_type)?;

        let id = self.allocate_id();
        let index = at.unwrap_or(self.blocks.len()).min(self.blocks.len());
        self.blocks.insert(
            index,
            Block {
                id,
                order: index,
                config: BlockConfig::default_for(block_type),
            },
        );
        self.renumber();
        Ok(&self.blocks[index])
    }

    pub fn remove_block(&mut self, id: &str) -> Result<Block, TemplateError> {
        let index = self.index_of(id)?;
        let removed = self.blocks.remove(index);
        self.renumber();
        Ok(removed)
    }

    /// Moves a block one slot. Returns `false` when it is already at that edge.
    pub fn move_block(&mut self, id: &str, direction: Direction) -> Result<bool, TemplateError> {
        let index = self.index_of(id)?;
        let target = match direction {
            Direction::Up if index > 0 => index - 1,
            Direction::Down if index + 1 < self.blocks.len() => index + 1,
            _ => return Ok(false),
        };
        self.blocks.swap(index, target);
        self.renumber();
        Ok(true)
    }

    pub fn configure_block(&mut self, id: &str, config: BlockConfig) -> Result<(), TemplateError> {
        let index = self.index_of(id)?;
        let block = &mut self.blocks[index];
        if block.block_type() != config.block_type() {
            return Err(TemplateError::ConfigMismatch {
                block_id: id.to_string(),
                expected: block.block_type(),
            });
        }
        block.config = config;
        Ok(())
    }

    /// Non-blocking authoring checks.
    pub fn lint(&self) -> Vec<Lint> {
        let mut lints = Vec::new();
        let mut push = |block: &Block, field: &str, message: &str| {
            lints.push(Lint {
                block_id: block.id.clone(),
                field: field.to_string(),
                message: message.to_string(),
            })
        };

        for block in &self.blocks {
            match &block.config {
                BlockConfig::Link(link) => {
                    if link.link_text.trim().is_empty() {
                        push(block, "link_text", "Link text is required");
                    }
                    if link.link_url.trim().is_empty() {
                        push(block, "link_url", "Link URL is required");
                    }
                }
                BlockConfig::Cc(r) if r.required && r.recipients.trim().is_empty() => {
                    push(block, "recipients", "CC recipients are required");
                }
                BlockConfig::Bcc(r) if r.required && r.recipients.trim().is_empty() => {
                    push(block, "recipients", "BCC recipients are required");
                }
                _ => {}
            }
        }
        lints
    }

    /// MD5 of the serialized template, used for unsaved-change tracking.
    pub fn fingerprint(&self) -> String {
        let serialized = serde_json::to_string(self).unwrap_or_default();
        format!("{:x}", md5::compute(serialized))
    }

    pub fn has_usable_name(&self) -> bool {
        let name = self.name.trim();
        !name.is_empty() && name != UNNAMED_TEMPLATE
    }

    fn index_of(&self, id: &str) -> Result<usize, TemplateError> {
        self.blocks
            .iter()
            .position(|b| b.id == id)
            .ok_or_else(|| TemplateError::BlockNotFound(id.to_string()))
    }

    fn allocate_id(&mut self) -> String {
        // Templates deserialized from clients may carry a stale counter.
        let floor = self
            .blocks
            .iter()
            .filter_map(|b| b.id.parse::<u64>().ok())
            .max()
            .map_or(1, |max| max + 1);
        let id = self.next_block_id.max(floor);
        self.next_block_id = id + 1;
        id.to_string()
    }

    fn renumber(&mut self) {
        for (index, block) in self.blocks.iter_mut().enumerate() {
            block.order = index;
        }
    }
}
