use std::cell::RefCell;
use std::rc::Rc;

use lesson_editor_engine::clock::{ManualClock, SharedClock};
use lesson_editor_engine::commands::{self, BlockVariant, WidgetKind};
use lesson_editor_engine::editing::{ContentInput, InputMode, Key, KeyInput, KeyOutcome};
use lesson_editor_engine::host::{self, HostCommand, HostMessage, JsonLinesChannel};
use lesson_editor_engine::ledger::{LedgerSnapshot, PendingEdit, StructureAction};
use lesson_editor_engine::markers::{self, Segment};
use lesson_editor_engine::session::{CommitOutcome, LessonSession};
use lesson_editor_engine::tree::ContentNode;
use pretty_assertions::assert_eq;

fn clock() -> (SharedClock, Rc<ManualClock>) {
    let manual = Rc::new(ManualClock::new(1_700_000_000_000));
    (manual.clone(), manual)
}

fn lesson() -> ContentNode {
    ContentNode::element("lesson").with_children(vec![
        ContentNode::element("p")
            .with_id("intro")
            .with_children(vec![ContentNode::text("Old intro")]),
        ContentNode::element("p")
            .with_id("body")
            .with_children(vec![ContentNode::text("Body")]),
    ])
}

fn enter() -> KeyInput {
    KeyInput::plain(Key::Enter)
}

#[test]
fn hello_heading_scenario() {
    // given
    let (clock, _) = clock();
    let mut input = ContentInput::new("intro", clock);

    // when
    input.type_text("Hello /hea");

    // then the menu shows the three headings
    assert_eq!(input.active_query(), "hea");
    let labels: Vec<_> = input
        .menu()
        .unwrap()
        .matches()
        .iter()
        .map(|c| c.label)
        .collect();
    assert_eq!(labels, vec!["Heading 1", "Heading 2", "Heading 3"]);

    // when Enter picks the first
    assert_eq!(input.handle_key(enter()), KeyOutcome::Handled);

    // then
    assert_eq!(input.text(), "Hello ");
    assert_eq!(input.mode(), InputMode::BlockSelected(BlockVariant::H1));
    assert_eq!(input.placeholder(), "Heading 1");
    assert!(!input.is_menu_open());
}

#[test]
fn inline_widget_flows_from_keystrokes_to_ledger_and_host() {
    // given a session connected to a host log
    let (clock, _manual) = clock();
    let mut session = LessonSession::new(lesson(), clock.clone());
    let channel = Rc::new(RefCell::new(JsonLinesChannel::new(Vec::<u8>::new())));
    host::connect(&mut session, channel.clone());
    let mut input = ContentInput::new("intro", clock);

    // when the author types text, inserts a scrubber and commits
    input.type_text("Mass /number");
    assert_eq!(input.handle_key(enter()), KeyOutcome::Handled);
    input.type_text("kg");
    let KeyOutcome::Committed(event) = input.handle_key(enter()) else {
        panic!("expected a commit");
    };
    let outcome = session.apply_commit(&event);

    // then the content carries exactly one marker
    assert_eq!(outcome, CommitOutcome::Recorded);
    assert_eq!(event.content, "Mass {{numberScrubber:numberScrubber-1700000000000}} kg");
    let widgets = markers::markers(&event.content);
    assert_eq!(widgets.len(), 1);
    assert_eq!(widgets[0].kind, WidgetKind::NumberScrubber);
    let literal: String = markers::decode(&event.content)
        .into_segments()
        .into_iter()
        .filter_map(|segment| match segment {
            Segment::Text(text) => Some(text),
            Segment::Widget(_) => None,
        })
        .collect();
    assert!(!literal.contains('{') && !literal.contains('}'));

    // and the ledger holds one text edit, broadcast to the host
    let [PendingEdit::Text(edit)] = session.ledger().edits() else {
        panic!("expected one text edit");
    };
    assert_eq!(edit.original_text, "Old intro");
    assert_eq!(
        edit.new_html.as_deref(),
        Some(
            r#"<p id="intro">Mass <span data-widget="numberScrubber" data-widget-id="numberScrubber-1700000000000"></span> kg</p>"#
        )
    );
    let log = String::from_utf8(channel.borrow().get_ref().clone()).unwrap();
    let last: LedgerSnapshot = serde_json::from_str::<HostMessage>(log.lines().last().unwrap())
        .map(|message| match message {
            HostMessage::EditsChanged(snapshot) | HostMessage::EditsSnapshot(snapshot) => snapshot,
        })
        .unwrap();
    assert_eq!(last, session.ledger().snapshot());
}

#[test]
fn divider_commits_without_enter_and_adds_a_block() {
    let (clock, _) = clock();
    let mut session = LessonSession::new(lesson(), clock.clone());
    let mut input = ContentInput::new("intro", clock);

    input.type_text("/div");
    let divider = commands::find("divider").unwrap();
    let event = input.select_command(divider).unwrap();

    assert_eq!(event.content, "---");
    assert_eq!(event.block_variant, Some(BlockVariant::Divider));
    assert_eq!(input.text(), "");
    assert_eq!(session.apply_commit(&event), CommitOutcome::Recorded);

    let [PendingEdit::Structure(edit)] = session.ledger().edits() else {
        panic!("expected one structure edit");
    };
    assert_eq!(edit.action, StructureAction::Add);
    assert_eq!(edit.block_type, Some(BlockVariant::Divider));
    assert_eq!(session.sections().len(), 3);
}

#[test]
fn new_block_text_is_absorbed_and_host_can_toggle_editing() {
    // given
    let (clock, manual) = clock();
    let mut session = LessonSession::new(lesson(), clock.clone());
    let id = session.add_block(Some("body"), BlockVariant::Quote).unwrap();

    // when the author fills the new block
    manual.advance(1_000);
    let mut input = ContentInput::new(id.clone(), clock);
    input.type_text("To be or not to be");
    let KeyOutcome::Committed(event) = input.handle_key(enter()) else {
        panic!("expected a commit");
    };
    session.apply_commit(&event);

    // then there is a single add edit with the content
    let snapshot = match host::handle_command(&mut session, &HostCommand::RequestEdits) {
        Some(HostMessage::EditsSnapshot(snapshot)) => snapshot,
        other => panic!("unexpected reply {other:?}"),
    };
    assert_eq!(snapshot.count, 1);
    let PendingEdit::Structure(edit) = &snapshot.edits[0] else {
        panic!("expected structure edit");
    };
    assert_eq!(edit.content.as_deref(), Some("To be or not to be"));
    assert_eq!(edit.timestamp, 1_700_000_001_000);

    // when the host turns editing off, commits are refused
    host::handle_command(&mut session, &HostCommand::SetEditingMode { enabled: false });
    assert_eq!(session.apply_commit(&event), CommitOutcome::EditingDisabled);
}
