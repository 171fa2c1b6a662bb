//! # Lesson Session
//!
//! Explicit context shared by every editable view of one lesson: the
//! document tree, the edit ledger and the editing-mode flag. Views never get
//! editing callbacks injected into the tree; they go through the session.
//!
//! Sections are the root's children, addressed by identity.

use tracing::debug;

use crate::clock::SharedClock;
use crate::commands::BlockVariant;
use crate::editing::{CommitEvent, IdMinter};
use crate::ledger::{EditLedger, ElementTarget, StructureChange};
use crate::markers::{self, MarkerToken};
use crate::render::{block_node, content_nodes, render_html};
use crate::tree::{self, ContentNode};

/// Content of a freshly added divider section.
const DIVIDER_CONTENT: &str = "---";

/// What happened to a commit event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommitOutcome {
    /// The document changed and the ledger holds the edit.
    Recorded,
    /// Same content and block type as before; nothing recorded.
    Unchanged,
    /// Editing mode is off.
    EditingDisabled,
    /// No section carries the region id.
    UnknownRegion,
}

pub struct LessonSession {
    document: ContentNode,
    ledger: EditLedger,
    editing_enabled: bool,
    ids: IdMinter,
}

impl LessonSession {
    pub fn new(document: ContentNode, clock: SharedClock) -> Self {
        Self {
            document,
            ledger: EditLedger::new(clock.clone()),
            editing_enabled: true,
            ids: IdMinter::new(clock),
        }
    }

    pub fn document(&self) -> &ContentNode {
        &self.document
    }

    pub fn ledger(&self) -> &EditLedger {
        &self.ledger
    }

    pub fn ledger_mut(&mut self) -> &mut EditLedger {
        &mut self.ledger
    }

    pub fn editing_enabled(&self) -> bool {
        self.editing_enabled
    }

    pub fn set_editing_enabled(&mut self, enabled: bool) {
        if self.editing_enabled != enabled {
            debug!(enabled, "editing mode changed");
        }
        self.editing_enabled = enabled;
    }

    /// Section ids in document order.
    pub fn sections(&self) -> Vec<String> {
        tree::child_ids(&self.document)
    }

    /// Marker-encoded content of a section.
    pub fn section_text(&self, section_id: &str) -> Option<String> {
        tree::find(&self.document, section_id).map(markers::encode)
    }

    /// Block variant of a section, derived from its tag.
    pub fn section_variant(&self, section_id: &str) -> Option<BlockVariant> {
        let tag = tree::find(&self.document, section_id)?.tag()?;
        BlockVariant::ALL
            .iter()
            .copied()
            .find(|variant| variant.html_tag() == tag)
    }

    /// Whether a section holds only text and widgets, so that a single
    /// input region can edit it without dropping nested blocks.
    pub fn is_inline_section(&self, section_id: &str) -> bool {
        tree::find(&self.document, section_id).is_some_and(|section| {
            section.children().iter().all(|child| match child {
                ContentNode::Text { .. } => true,
                ContentNode::Element(_) => child.attr(MarkerToken::KIND_ATTR).is_some(),
            })
        })
    }

    /// Applies a region's commit to the document and records it.
    ///
    /// A divider commit adds a divider section after the region. Any other
    /// commit replaces the section's content, retags it when a different
    /// block variant was picked and records a Text edit carrying both text
    /// and HTML. On a section added in this session the pending add also
    /// takes the new block type.
    pub fn apply_commit(&mut self, event: &CommitEvent) -> CommitOutcome {
        if !self.editing_enabled {
            debug!(region = %event.region_id, "commit refused, editing disabled");
            return CommitOutcome::EditingDisabled;
        }
        if event.block_variant == Some(BlockVariant::Divider) {
            return match self.add_block(Some(&event.region_id), BlockVariant::Divider) {
                Some(_) => CommitOutcome::Recorded,
                None => CommitOutcome::EditingDisabled,
            };
        }

        let Some(section) = tree::find(&self.document, &event.region_id) else {
            debug!(region = %event.region_id, "commit for unknown region");
            return CommitOutcome::UnknownRegion;
        };
        let original_text = markers::encode(section);
        let original_html = render_html(section);
        let original_tag = section.tag().unwrap_or_default().to_string();

        let mut updated =
            tree::replace_content(&self.document, &event.region_id, content_nodes(&event.content));
        let retagged = event
            .block_variant
            .filter(|variant| variant.html_tag() != original_tag);
        if let Some(variant) = retagged {
            updated = tree::retag(&updated, &event.region_id, variant.html_tag());
        }
        let new_html = tree::find(&updated, &event.region_id)
            .map(render_html)
            .unwrap_or_default();
        if new_html == original_html {
            return CommitOutcome::Unchanged;
        }

        let path = tree::path_to(&self.document, &event.region_id).unwrap_or_default();
        let target = ElementTarget::new(event.region_id.as_str(), tree::format_path(&path));
        self.document = updated;
        self.ledger.add_text_edit(
            &target,
            &original_text,
            &event.content,
            Some(&original_html),
            Some(&new_html),
        );
        if let Some(variant) = retagged
            && self.ledger.has_pending_add(&event.region_id)
        {
            self.ledger.add_structure_edit(
                StructureChange::add(event.region_id.as_str()).with_block_type(variant),
            );
        }
        CommitOutcome::Recorded
    }

    /// Inserts an empty section after `after` (or at the end) and records a
    /// Structure add. Returns the new section id.
    pub fn add_block(&mut self, after: Option<&str>, variant: BlockVariant) -> Option<String> {
        if !self.editing_enabled {
            return None;
        }
        let id = self.ids.mint_prefixed(variant.as_str());
        let content = if variant == BlockVariant::Divider {
            DIVIDER_CONTENT
        } else {
            ""
        };
        self.document = tree::insert_after(&self.document, after, block_node(&id, variant, content));

        let mut change = StructureChange::add(id.as_str()).with_block_type(variant);
        if !content.is_empty() {
            change = change.with_content(content);
        }
        change.section_ids = Some(self.sections());
        self.ledger.add_structure_edit(change);
        debug!(section_id = %id, %variant, "block added");
        Some(id)
    }

    /// Removes a section and records a Structure delete. Unknown ids are a
    /// no-op.
    pub fn delete_block(&mut self, section_id: &str) -> bool {
        if !self.editing_enabled || tree::find(&self.document, section_id).is_none() {
            return false;
        }
        self.document = tree::remove(&self.document, section_id);
        self.ledger
            .add_structure_edit(StructureChange::delete(section_id));
        debug!(section_id, "block deleted");
        true
    }

    /// Puts the sections in `order` and records exactly one Structure
    /// reorder carrying the full resulting order.
    pub fn reorder_blocks(&mut self, order: &[String]) -> bool {
        if !self.editing_enabled {
            return false;
        }
        let reordered = tree::reorder_children(&self.document, order);
        if reordered == self.document {
            return false;
        }
        self.document = reordered;
        let section_ids = self.sections();
        debug!(?section_ids, "blocks reordered");
        self.ledger
            .add_structure_edit(StructureChange::reorder(section_ids));
        true
    }

    /// Moves a section one place up (`-1`) or down (`1`).
    pub fn move_block(&mut self, section_id: &str, offset: isize) -> bool {
        let mut order = self.sections();
        let Some(from) = order.iter().position(|id| id == section_id) else {
            return false;
        };
        let Some(to) = from.checked_add_signed(offset).filter(|to| *to < order.len()) else {
            return false;
        };
        order.swap(from, to);
        self.reorder_blocks(&order)
    }

    pub fn clear_edits(&mut self) {
        self.ledger.clear();
    }
}
