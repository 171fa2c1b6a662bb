use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::commands::BlockVariant;
use crate::markers::NumericProps;

/// Address of an element inside a section.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ElementTarget {
    pub section_id: String,
    pub element_path: String,
}

impl ElementTarget {
    pub fn new(section_id: impl Into<String>, element_path: impl Into<String>) -> Self {
        Self {
            section_id: section_id.into(),
            element_path: element_path.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextEdit {
    pub id: String,
    pub timestamp: i64,
    pub section_id: String,
    pub element_path: String,
    pub original_text: String,
    pub new_text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_html: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub new_html: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EquationEdit {
    pub id: String,
    pub timestamp: i64,
    pub section_id: String,
    pub component_type: String,
    pub original_latex: String,
    pub new_latex: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color_map: Option<BTreeMap<String, String>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NumericWidgetEdit {
    pub id: String,
    pub timestamp: i64,
    pub section_id: String,
    pub element_path: String,
    pub original_props: NumericProps,
    pub new_props: NumericProps,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StructureAction {
    Add,
    Delete,
    Reorder,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StructureEdit {
    pub id: String,
    pub timestamp: i64,
    pub action: StructureAction,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub section_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub section_ids: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub block_type: Option<BlockVariant>,
}

/// A structure edit before the ledger assigns its id and timestamp.
#[derive(Debug, Clone, PartialEq)]
pub struct StructureChange {
    pub action: StructureAction,
    pub section_id: Option<String>,
    pub section_ids: Option<Vec<String>>,
    pub content: Option<String>,
    pub block_type: Option<BlockVariant>,
}

impl StructureChange {
    fn new(action: StructureAction) -> Self {
        Self {
            action,
            section_id: None,
            section_ids: None,
            content: None,
            block_type: None,
        }
    }

    pub fn add(section_id: impl Into<String>) -> Self {
        Self {
            section_id: Some(section_id.into()),
            ..Self::new(StructureAction::Add)
        }
    }

    pub fn delete(section_id: impl Into<String>) -> Self {
        Self {
            section_id: Some(section_id.into()),
            ..Self::new(StructureAction::Delete)
        }
    }

    pub fn reorder(section_ids: Vec<String>) -> Self {
        Self {
            section_ids: Some(section_ids),
            ..Self::new(StructureAction::Reorder)
        }
    }

    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }

    pub fn with_block_type(mut self, block_type: BlockVariant) -> Self {
        self.block_type = Some(block_type);
        self
    }
}

/// One pending change awaiting persistence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum PendingEdit {
    Text(TextEdit),
    Equation(EquationEdit),
    NumericWidget(NumericWidgetEdit),
    Structure(StructureEdit),
}

impl PendingEdit {
    pub fn id(&self) -> &str {
        match self {
            PendingEdit::Text(edit) => &edit.id,
            PendingEdit::Equation(edit) => &edit.id,
            PendingEdit::NumericWidget(edit) => &edit.id,
            PendingEdit::Structure(edit) => &edit.id,
        }
    }

    pub fn timestamp(&self) -> i64 {
        match self {
            PendingEdit::Text(edit) => edit.timestamp,
            PendingEdit::Equation(edit) => edit.timestamp,
            PendingEdit::NumericWidget(edit) => edit.timestamp,
            PendingEdit::Structure(edit) => edit.timestamp,
        }
    }

    /// Section the edit belongs to, when it targets a single section.
    pub fn section_id(&self) -> Option<&str> {
        match self {
            PendingEdit::Text(edit) => Some(&edit.section_id),
            PendingEdit::Equation(edit) => Some(&edit.section_id),
            PendingEdit::NumericWidget(edit) => Some(&edit.section_id),
            PendingEdit::Structure(edit) => edit.section_id.as_deref(),
        }
    }
}

/// State of the ledger broadcast to the host after every mutation.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct LedgerSnapshot {
    pub edits: Vec<PendingEdit>,
    pub count: usize,
}

impl LedgerSnapshot {
    pub fn new(edits: Vec<PendingEdit>) -> Self {
        let count = edits.len();
        Self { edits, count }
    }
}
