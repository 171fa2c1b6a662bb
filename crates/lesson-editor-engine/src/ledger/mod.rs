//! # Edit Ledger
//!
//! Ordered collection of pending edits awaiting persistence.
//!
//! The ledger reconciles edits as they arrive:
//!
//! - **Dedup**: at most one Text edit per `(section, element path)`, one
//!   Equation edit per `(section, original latex)`, one NumericWidget edit per
//!   `(section, element path)` and one Structure `add` per section
//! - **Auto-revert**: an edit whose new value equals its captured original is
//!   dropped
//! - **Absorption**: content edits for a section that is still a pending
//!   `add` overwrite that add's `content` instead of creating a new entry
//!
//! Structure `delete` and `reorder` entries are appended as-is; replaying them
//! in order is the consumer's job.
//!
//! Every mutating call notifies the registered [`LedgerObserver`]s
//! synchronously before returning.

pub mod edit;
pub mod focus;
pub mod observer;

use std::collections::BTreeMap;

use tracing::debug;

use crate::clock::SharedClock;
use crate::markers::NumericProps;

pub use edit::{
    ElementTarget, EquationEdit, LedgerSnapshot, NumericWidgetEdit, PendingEdit, StructureAction,
    StructureChange, StructureEdit, TextEdit,
};
pub use focus::{EquationFocus, NumericWidgetFocus, ValidationError, validate_numeric_props};
pub use observer::LedgerObserver;

pub struct EditLedger {
    edits: Vec<PendingEdit>,
    clock: SharedClock,
    observers: Vec<Box<dyn LedgerObserver>>,
    equation_focus: Option<EquationFocus>,
    numeric_focus: Option<NumericWidgetFocus>,
}

impl EditLedger {
    pub fn new(clock: SharedClock) -> Self {
        Self {
            edits: Vec::new(),
            clock,
            observers: Vec::new(),
            equation_focus: None,
            numeric_focus: None,
        }
    }

    pub fn subscribe(&mut self, observer: impl LedgerObserver + 'static) {
        self.observers.push(Box::new(observer));
    }

    pub fn edits(&self) -> &[PendingEdit] {
        &self.edits
    }

    pub fn len(&self) -> usize {
        self.edits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edits.is_empty()
    }

    /// Whether `section_id` was added in this session and not yet saved.
    pub fn has_pending_add(&self, section_id: &str) -> bool {
        self.edits.iter().any(|edit| {
            matches!(edit, PendingEdit::Structure(s)
                if s.action == StructureAction::Add && s.section_id.as_deref() == Some(section_id))
        })
    }

    pub fn snapshot(&self) -> LedgerSnapshot {
        LedgerSnapshot::new(self.edits.clone())
    }

    /// Records a text change of one element.
    pub fn add_text_edit(
        &mut self,
        target: &ElementTarget,
        original_text: &str,
        new_text: &str,
        original_html: Option<&str>,
        new_html: Option<&str>,
    ) {
        let now = self.clock.now_millis();

        if self.absorb_into_pending_add(&target.section_id, new_text, now) {
            self.notify();
            return;
        }

        let existing = self.edits.iter().position(|edit| {
            matches!(edit, PendingEdit::Text(text)
                if text.section_id == target.section_id && text.element_path == target.element_path)
        });

        match existing {
            Some(index) => {
                let PendingEdit::Text(edit) = &mut self.edits[index] else {
                    unreachable!("position matched a text edit");
                };
                let html_reverted = match (edit.original_html.as_deref(), new_html) {
                    (Some(original), Some(new)) => original == new,
                    _ => true,
                };
                if new_text == edit.original_text && html_reverted {
                    debug!(section_id = %target.section_id, path = %target.element_path, "text edit reverted");
                    self.edits.remove(index);
                } else {
                    edit.new_text = new_text.to_string();
                    edit.new_html = new_html.map(str::to_string);
                    edit.timestamp = now;
                    debug!(section_id = %target.section_id, path = %target.element_path, "text edit updated");
                }
            }
            None => {
                debug!(section_id = %target.section_id, path = %target.element_path, "text edit added");
                self.edits.push(PendingEdit::Text(TextEdit {
                    id: new_edit_id(),
                    timestamp: now,
                    section_id: target.section_id.clone(),
                    element_path: target.element_path.clone(),
                    original_text: original_text.to_string(),
                    new_text: new_text.to_string(),
                    original_html: original_html.map(str::to_string),
                    new_html: new_html.map(str::to_string),
                }));
            }
        }
        self.notify();
    }

    /// Records a latex change of one equation.
    pub fn add_equation_edit(
        &mut self,
        section_id: &str,
        component_type: &str,
        original_latex: &str,
        new_latex: &str,
        color_map: Option<BTreeMap<String, String>>,
    ) {
        let now = self.clock.now_millis();

        if self.absorb_into_pending_add(section_id, new_latex, now) {
            self.notify();
            return;
        }

        let existing = self.edits.iter().position(|edit| {
            matches!(edit, PendingEdit::Equation(eq)
                if eq.section_id == section_id && eq.original_latex == original_latex)
        });

        match existing {
            Some(index) => {
                let PendingEdit::Equation(edit) = &mut self.edits[index] else {
                    unreachable!("position matched an equation edit");
                };
                if new_latex == edit.original_latex {
                    debug!(section_id, "equation edit reverted");
                    self.edits.remove(index);
                } else {
                    edit.new_latex = new_latex.to_string();
                    if color_map.is_some() {
                        edit.color_map = color_map;
                    }
                    edit.timestamp = now;
                    debug!(section_id, "equation edit updated");
                }
            }
            None => {
                debug!(section_id, component_type, "equation edit added");
                self.edits.push(PendingEdit::Equation(EquationEdit {
                    id: new_edit_id(),
                    timestamp: now,
                    section_id: section_id.to_string(),
                    component_type: component_type.to_string(),
                    original_latex: original_latex.to_string(),
                    new_latex: new_latex.to_string(),
                    color_map,
                }));
            }
        }
        self.notify();
    }

    /// Records a parameter change of one number scrubber.
    pub fn add_numeric_widget_edit(
        &mut self,
        target: &ElementTarget,
        original_props: &NumericProps,
        new_props: &NumericProps,
    ) {
        let now = self.clock.now_millis();
        let existing = self.edits.iter().position(|edit| {
            matches!(edit, PendingEdit::NumericWidget(w)
                if w.section_id == target.section_id && w.element_path == target.element_path)
        });

        match existing {
            Some(index) => {
                let PendingEdit::NumericWidget(edit) = &mut self.edits[index] else {
                    unreachable!("position matched a numeric widget edit");
                };
                if *new_props == edit.original_props {
                    debug!(section_id = %target.section_id, path = %target.element_path, "widget edit reverted");
                    self.edits.remove(index);
                } else {
                    edit.new_props = new_props.clone();
                    edit.timestamp = now;
                    debug!(section_id = %target.section_id, path = %target.element_path, "widget edit updated");
                }
            }
            None => {
                debug!(section_id = %target.section_id, path = %target.element_path, "widget edit added");
                self.edits.push(PendingEdit::NumericWidget(NumericWidgetEdit {
                    id: new_edit_id(),
                    timestamp: now,
                    section_id: target.section_id.clone(),
                    element_path: target.element_path.clone(),
                    original_props: original_props.clone(),
                    new_props: new_props.clone(),
                }));
            }
        }
        self.notify();
    }

    /// Records a block-level topology change.
    ///
    /// An `add` for a section that already has a pending add is merged into
    /// it; `delete` and `reorder` are always appended.
    pub fn add_structure_edit(&mut self, change: StructureChange) {
        let now = self.clock.now_millis();

        if change.action == StructureAction::Add
            && let Some(section_id) = change.section_id.as_deref()
            && let Some(pending) = self.pending_add_mut(section_id)
        {
            if let Some(section_ids) = change.section_ids {
                pending.section_ids = Some(section_ids);
            }
            if let Some(content) = change.content {
                pending.content = Some(content);
            }
            if let Some(block_type) = change.block_type {
                pending.block_type = Some(block_type);
            }
            pending.timestamp = now;
            debug!(section_id = ?pending.section_id, "structure add merged");
            self.notify();
            return;
        }

        debug!(action = ?change.action, section_id = ?change.section_id, "structure edit added");
        self.edits.push(PendingEdit::Structure(StructureEdit {
            id: new_edit_id(),
            timestamp: now,
            action: change.action,
            section_id: change.section_id,
            section_ids: change.section_ids,
            content: change.content,
            block_type: change.block_type,
        }));
        self.notify();
    }

    /// Drops the edit with `id`; unknown ids are ignored.
    pub fn remove_edit(&mut self, id: &str) {
        self.edits.retain(|edit| edit.id() != id);
        debug!(id, "edit removed");
        self.notify();
    }

    pub fn clear(&mut self) {
        self.edits.clear();
        debug!("ledger cleared");
        self.notify();
    }

    // Equation modal

    /// Focuses an equation, discarding any unsaved equation focus.
    pub fn open_equation(&mut self, focus: EquationFocus) {
        self.equation_focus = Some(focus);
    }

    pub fn equation_focus(&self) -> Option<&EquationFocus> {
        self.equation_focus.as_ref()
    }

    /// Saves the focused equation and closes it. Returns whether an edit was
    /// recorded.
    pub fn save_equation(
        &mut self,
        new_latex: &str,
        color_map: Option<BTreeMap<String, String>>,
    ) -> bool {
        let Some(focus) = self.equation_focus.take() else {
            return false;
        };
        if new_latex == focus.latex {
            return false;
        }
        self.add_equation_edit(
            &focus.section_id,
            &focus.component_type,
            &focus.original_latex,
            new_latex,
            color_map.or(focus.color_map),
        );
        true
    }

    pub fn close_equation(&mut self) {
        self.equation_focus = None;
    }

    // Numeric widget modal

    /// Focuses a number scrubber, discarding any unsaved widget focus.
    pub fn open_numeric_widget(&mut self, focus: NumericWidgetFocus) {
        self.numeric_focus = Some(focus);
    }

    pub fn numeric_widget_focus(&self) -> Option<&NumericWidgetFocus> {
        self.numeric_focus.as_ref()
    }

    /// Validates and saves the focused widget, then closes it.
    ///
    /// On a constraint violation the focus stays open with its
    /// `validation_message` set and the ledger is not touched. Returns
    /// whether an edit was recorded.
    pub fn save_numeric_widget(&mut self, new_props: &NumericProps) -> Result<bool, ValidationError> {
        let Some(focus) = self.numeric_focus.as_mut() else {
            return Ok(false);
        };
        if let Err(err) = validate_numeric_props(new_props) {
            debug!(%err, "widget save refused");
            focus.validation_message = Some(err.to_string());
            return Err(err);
        }

        let Some(focus) = self.numeric_focus.take() else {
            return Ok(false);
        };
        if *new_props == focus.props {
            return Ok(false);
        }
        self.add_numeric_widget_edit(&focus.target, &focus.original_props, new_props);
        Ok(true)
    }

    pub fn close_numeric_widget(&mut self) {
        self.numeric_focus = None;
    }

    fn pending_add_mut(&mut self, section_id: &str) -> Option<&mut StructureEdit> {
        self.edits.iter_mut().find_map(|edit| match edit {
            PendingEdit::Structure(s)
                if s.action == StructureAction::Add && s.section_id.as_deref() == Some(section_id) =>
            {
                Some(s)
            }
            _ => None,
        })
    }

    fn absorb_into_pending_add(&mut self, section_id: &str, content: &str, now: i64) -> bool {
        match self.pending_add_mut(section_id) {
            Some(pending) => {
                pending.content = Some(content.to_string());
                pending.timestamp = now;
                debug!(section_id, "content absorbed into pending add");
                true
            }
            None => false,
        }
    }

    fn notify(&mut self) {
        if self.observers.is_empty() {
            return;
        }
        let snapshot = self.snapshot();
        for observer in &mut self.observers {
            observer.ledger_changed(&snapshot);
        }
    }
}

impl std::fmt::Debug for EditLedger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EditLedger")
            .field("edits", &self.edits)
            .field("observers", &self.observers.len())
            .field("equation_focus", &self.equation_focus)
            .field("numeric_focus", &self.numeric_focus)
            .finish()
    }
}

fn new_edit_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

#[cfg(test)]
mod tests;
