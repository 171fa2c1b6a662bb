use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

use pretty_assertions::assert_eq;

use super::*;
use crate::clock::ManualClock;
use crate::commands::BlockVariant;

fn ledger_at(start: i64) -> (EditLedger, Rc<ManualClock>) {
    let clock = Rc::new(ManualClock::new(start));
    (EditLedger::new(clock.clone()), clock)
}

fn ledger() -> EditLedger {
    ledger_at(1_000).0
}

fn recorder(ledger: &mut EditLedger) -> Rc<RefCell<Vec<LedgerSnapshot>>> {
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = seen.clone();
    ledger.subscribe(move |snapshot: &LedgerSnapshot| sink.borrow_mut().push(snapshot.clone()));
    seen
}

fn scrubber(default_value: f64, min: f64, max: f64, step: f64) -> NumericProps {
    NumericProps {
        variable_name: "speed".to_string(),
        default_value,
        min,
        max,
        step,
    }
}

fn text_edit(edit: &PendingEdit) -> &TextEdit {
    match edit {
        PendingEdit::Text(text) => text,
        other => panic!("expected text edit, got {other:?}"),
    }
}

fn structure_edit(edit: &PendingEdit) -> &StructureEdit {
    match edit {
        PendingEdit::Structure(structure) => structure,
        other => panic!("expected structure edit, got {other:?}"),
    }
}

// Text edits

#[test]
fn first_text_edit_is_appended_with_timestamp() {
    // given
    let (mut ledger, _clock) = ledger_at(42);
    let target = ElementTarget::new("intro", "0");

    // when
    ledger.add_text_edit(&target, "A", "B", Some("<p>A</p>"), Some("<p>B</p>"));

    // then
    assert_eq!(ledger.len(), 1);
    let edit = text_edit(&ledger.edits()[0]);
    assert_eq!(edit.timestamp, 42);
    assert_eq!(edit.original_text, "A");
    assert_eq!(edit.new_text, "B");
    assert_eq!(edit.original_html.as_deref(), Some("<p>A</p>"));
    assert_eq!(edit.new_html.as_deref(), Some("<p>B</p>"));
    assert!(!edit.id.is_empty());
}

#[test]
fn text_edit_back_to_original_is_dropped() {
    // given
    let mut ledger = ledger();
    let target = ElementTarget::new("intro", "0");
    ledger.add_text_edit(&target, "A", "B", None, None);

    // when
    ledger.add_text_edit(&target, "B", "A", None, None);

    // then
    assert!(ledger.is_empty());
}

#[test]
fn text_edit_reverts_only_when_html_matches_too() {
    let mut ledger = ledger();
    let target = ElementTarget::new("intro", "0");
    ledger.add_text_edit(&target, "A", "B", Some("<p>A</p>"), Some("<p>B</p>"));

    ledger.add_text_edit(&target, "B", "A", Some("<p>B</p>"), Some("<h1>A</h1>"));
    assert_eq!(ledger.len(), 1);

    ledger.add_text_edit(&target, "A", "A", Some("<h1>A</h1>"), Some("<p>A</p>"));
    assert!(ledger.is_empty());
}

#[test]
fn repeated_text_edits_update_one_entry_and_keep_first_original() {
    // given
    let (mut ledger, clock) = ledger_at(10);
    let target = ElementTarget::new("intro", "1/0");
    ledger.add_text_edit(&target, "A", "B", None, None);
    let id = ledger.edits()[0].id().to_string();

    // when
    clock.advance(5);
    ledger.add_text_edit(&target, "B", "C", None, Some("<p>C</p>"));

    // then
    assert_eq!(ledger.len(), 1);
    let edit = text_edit(&ledger.edits()[0]);
    assert_eq!(edit.id, id);
    assert_eq!(edit.original_text, "A");
    assert_eq!(edit.new_text, "C");
    assert_eq!(edit.new_html.as_deref(), Some("<p>C</p>"));
    assert_eq!(edit.timestamp, 15);
}

#[test]
fn text_edits_on_different_paths_are_separate() {
    let mut ledger = ledger();
    ledger.add_text_edit(&ElementTarget::new("intro", "0"), "A", "B", None, None);
    ledger.add_text_edit(&ElementTarget::new("intro", "1"), "C", "D", None, None);
    ledger.add_text_edit(&ElementTarget::new("outro", "0"), "E", "F", None, None);

    assert_eq!(ledger.len(), 3);
}

// Absorption into pending adds

#[test]
fn text_edit_on_added_section_is_absorbed() {
    // given
    let (mut ledger, clock) = ledger_at(1);
    ledger.add_structure_edit(StructureChange::add("new-1").with_block_type(BlockVariant::Paragraph));

    // when
    clock.advance(9);
    ledger.add_text_edit(&ElementTarget::new("new-1", "0"), "", "X", None, None);

    // then
    assert_eq!(ledger.len(), 1);
    let edit = structure_edit(&ledger.edits()[0]);
    assert_eq!(edit.action, StructureAction::Add);
    assert_eq!(edit.content.as_deref(), Some("X"));
    assert_eq!(edit.block_type, Some(BlockVariant::Paragraph));
    assert_eq!(edit.timestamp, 10);
}

#[test]
fn equation_edit_on_added_section_is_absorbed() {
    let mut ledger = ledger();
    ledger.add_structure_edit(StructureChange::add("eq-1"));

    ledger.add_equation_edit("eq-1", "BlockMath", "", "x^2", None);

    assert_eq!(ledger.len(), 1);
    assert_eq!(structure_edit(&ledger.edits()[0]).content.as_deref(), Some("x^2"));
}

#[test]
fn numeric_edit_on_added_section_is_not_absorbed() {
    let mut ledger = ledger();
    ledger.add_structure_edit(StructureChange::add("s-1"));

    ledger.add_numeric_widget_edit(
        &ElementTarget::new("s-1", "0"),
        &scrubber(5.0, 0.0, 10.0, 1.0),
        &scrubber(6.0, 0.0, 10.0, 1.0),
    );

    assert_eq!(ledger.len(), 2);
    assert!(matches!(ledger.edits()[1], PendingEdit::NumericWidget(_)));
}

#[test]
fn deleted_section_does_not_absorb() {
    let mut ledger = ledger();
    ledger.add_structure_edit(StructureChange::delete("old"));

    ledger.add_text_edit(&ElementTarget::new("old", "0"), "A", "B", None, None);

    assert_eq!(ledger.len(), 2);
}

// Equation edits

#[test]
fn equation_edits_dedup_on_original_latex() {
    // given
    let mut ledger = ledger();
    let colors = BTreeMap::from([("x".to_string(), "#f00".to_string())]);
    ledger.add_equation_edit("physics", "BlockMath", "E=mc^2", "E=mc^3", Some(colors.clone()));

    // when
    ledger.add_equation_edit("physics", "BlockMath", "E=mc^2", "E=mc^4", None);

    // then
    assert_eq!(ledger.len(), 1);
    let PendingEdit::Equation(edit) = &ledger.edits()[0] else {
        panic!("expected equation edit");
    };
    assert_eq!(edit.new_latex, "E=mc^4");
    assert_eq!(edit.color_map, Some(colors));
}

#[test]
fn equation_edit_back_to_original_is_dropped() {
    let mut ledger = ledger();
    ledger.add_equation_edit("physics", "BlockMath", "a+b", "a-b", None);
    ledger.add_equation_edit("physics", "BlockMath", "a+b", "a+b", None);

    assert!(ledger.is_empty());
}

#[test]
fn two_equations_in_one_section_are_separate() {
    let mut ledger = ledger();
    ledger.add_equation_edit("physics", "BlockMath", "a", "b", None);
    ledger.add_equation_edit("physics", "InlineMath", "c", "d", None);

    assert_eq!(ledger.len(), 2);
}

// Numeric widget edits

#[test]
fn numeric_edit_updates_then_reverts() {
    let mut ledger = ledger();
    let target = ElementTarget::new("sim", "2");
    let original = scrubber(5.0, 0.0, 10.0, 1.0);

    ledger.add_numeric_widget_edit(&target, &original, &scrubber(6.0, 0.0, 10.0, 1.0));
    ledger.add_numeric_widget_edit(&target, &original, &scrubber(7.0, 0.0, 10.0, 1.0));
    assert_eq!(ledger.len(), 1);
    let PendingEdit::NumericWidget(edit) = &ledger.edits()[0] else {
        panic!("expected numeric widget edit");
    };
    assert_eq!(edit.new_props.default_value, 7.0);

    ledger.add_numeric_widget_edit(&target, &original, &original);
    assert!(ledger.is_empty());
}

// Structure edits

#[test]
fn structure_add_for_same_section_merges() {
    // given
    let mut ledger = ledger();
    ledger.add_structure_edit(StructureChange::add("s-1").with_block_type(BlockVariant::H1));

    // when
    ledger.add_structure_edit(StructureChange::add("s-1").with_content("Title"));

    // then
    assert_eq!(ledger.len(), 1);
    let edit = structure_edit(&ledger.edits()[0]);
    assert_eq!(edit.block_type, Some(BlockVariant::H1));
    assert_eq!(edit.content.as_deref(), Some("Title"));
}

#[test]
fn delete_and_reorder_always_append() {
    let mut ledger = ledger();
    ledger.add_structure_edit(StructureChange::delete("a"));
    ledger.add_structure_edit(StructureChange::delete("a"));
    ledger.add_structure_edit(StructureChange::reorder(vec!["b".into(), "c".into()]));
    ledger.add_structure_edit(StructureChange::reorder(vec!["c".into(), "b".into()]));

    assert_eq!(ledger.len(), 4);
    let actions: Vec<_> = ledger
        .edits()
        .iter()
        .map(|edit| structure_edit(edit).action)
        .collect();
    assert_eq!(
        actions,
        vec![
            StructureAction::Delete,
            StructureAction::Delete,
            StructureAction::Reorder,
            StructureAction::Reorder
        ]
    );
}

// Removal and notifications

#[test]
fn remove_edit_by_id() {
    let mut ledger = ledger();
    ledger.add_text_edit(&ElementTarget::new("a", "0"), "A", "B", None, None);
    ledger.add_text_edit(&ElementTarget::new("b", "0"), "C", "D", None, None);
    let first = ledger.edits()[0].id().to_string();

    ledger.remove_edit(&first);
    ledger.remove_edit("missing");

    assert_eq!(ledger.len(), 1);
    assert_eq!(ledger.edits()[0].section_id(), Some("b"));
}

#[test]
fn observers_see_every_mutation_in_order() {
    // given
    let mut ledger = ledger();
    let seen = recorder(&mut ledger);
    let target = ElementTarget::new("intro", "0");

    // when
    ledger.add_text_edit(&target, "A", "B", None, None);
    ledger.add_structure_edit(StructureChange::delete("x"));
    ledger.add_text_edit(&target, "B", "A", None, None);
    ledger.clear();

    // then
    let counts: Vec<usize> = seen.borrow().iter().map(|s| s.count).collect();
    assert_eq!(counts, vec![1, 2, 1, 0]);
    let last = seen.borrow().last().cloned().unwrap();
    assert_eq!(last, ledger.snapshot());
}

#[test]
fn snapshot_count_matches_edits() {
    let mut ledger = ledger();
    ledger.add_text_edit(&ElementTarget::new("a", "0"), "A", "B", None, None);
    ledger.add_structure_edit(StructureChange::add("n"));

    let snapshot = ledger.snapshot();
    assert_eq!(snapshot.count, 2);
    assert_eq!(snapshot.edits.len(), 2);
}

// Modal focus

fn physics_focus() -> EquationFocus {
    EquationFocus {
        section_id: "physics".to_string(),
        component_type: "BlockMath".to_string(),
        original_latex: "F=ma".to_string(),
        latex: "F=ma".to_string(),
        color_map: None,
    }
}

#[test]
fn saving_equation_records_edit_and_closes() {
    let mut ledger = ledger();
    ledger.open_equation(physics_focus());

    assert!(ledger.save_equation("F=m a", None));

    assert!(ledger.equation_focus().is_none());
    assert_eq!(ledger.len(), 1);
}

#[test]
fn saving_unchanged_equation_records_nothing() {
    let mut ledger = ledger();
    ledger.open_equation(physics_focus());

    assert!(!ledger.save_equation("F=ma", None));

    assert!(ledger.equation_focus().is_none());
    assert!(ledger.is_empty());
}

#[test]
fn reopened_equation_keys_on_original_latex() {
    let mut ledger = ledger();
    ledger.open_equation(physics_focus());
    ledger.save_equation("F=2ma", None);

    ledger.open_equation(EquationFocus {
        latex: "F=2ma".to_string(),
        ..physics_focus()
    });
    ledger.save_equation("F=3ma", None);

    assert_eq!(ledger.len(), 1);
    let PendingEdit::Equation(edit) = &ledger.edits()[0] else {
        panic!("expected equation edit");
    };
    assert_eq!(edit.original_latex, "F=ma");
    assert_eq!(edit.new_latex, "F=3ma");
}

#[test]
fn invalid_numeric_save_keeps_focus_and_ledger() {
    // given
    let mut ledger = ledger();
    let seen = recorder(&mut ledger);
    let original = scrubber(5.0, 0.0, 10.0, 1.0);
    ledger.open_numeric_widget(NumericWidgetFocus::new(
        ElementTarget::new("sim", "0"),
        original.clone(),
        original,
    ));

    // when
    let result = ledger.save_numeric_widget(&scrubber(5.0, 10.0, 0.0, 1.0));

    // then
    assert_eq!(
        result,
        Err(ValidationError::RangeInverted {
            min: 10.0,
            max: 0.0
        })
    );
    let focus = ledger.numeric_widget_focus().unwrap();
    assert_eq!(
        focus.validation_message.as_deref(),
        Some("Minimum (10) must be less than maximum (0)")
    );
    assert!(ledger.is_empty());
    assert!(seen.borrow().is_empty());
}

#[test]
fn nan_default_is_refused() {
    let mut ledger = ledger();
    let original = scrubber(5.0, 0.0, 10.0, 1.0);
    ledger.open_numeric_widget(NumericWidgetFocus::new(
        ElementTarget::new("sim", "0"),
        original.clone(),
        original,
    ));

    let result = ledger.save_numeric_widget(&scrubber(f64::NAN, 0.0, 10.0, 1.0));

    assert!(matches!(result, Err(ValidationError::DefaultOutOfRange { .. })));
    assert!(ledger.numeric_widget_focus().is_some());
    assert!(ledger.is_empty());
}

#[test]
fn valid_numeric_save_records_edit_and_closes() {
    let mut ledger = ledger();
    let original = scrubber(5.0, 0.0, 10.0, 1.0);
    ledger.open_numeric_widget(NumericWidgetFocus::new(
        ElementTarget::new("sim", "0"),
        original.clone(),
        original,
    ));

    assert_eq!(ledger.save_numeric_widget(&scrubber(8.0, 0.0, 10.0, 2.0)), Ok(true));
    assert!(ledger.numeric_widget_focus().is_none());
    assert_eq!(ledger.len(), 1);
}

#[test]
fn save_without_focus_is_noop() {
    let mut ledger = ledger();
    assert_eq!(ledger.save_numeric_widget(&scrubber(1.0, 0.0, 2.0, 1.0)), Ok(false));
    assert!(!ledger.save_equation("x", None));
    assert!(ledger.is_empty());
}

#[test]
fn closing_discards_focus() {
    let mut ledger = ledger();
    ledger.open_equation(physics_focus());
    ledger.close_equation();
    ledger.close_numeric_widget();

    assert!(ledger.equation_focus().is_none());
    assert!(ledger.numeric_widget_focus().is_none());
}
