use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::clock::SharedClock;
use crate::commands::{self, BlockVariant, Command, CommandId, MenuSelection, WidgetKind};
use crate::markers::{self, MarkerToken};

use super::commands::RegionCmd;
use super::ids::IdMinter;
use super::patch::Patch;
use super::region::EditableRegion;

/// Placeholder shown while no block variant is chosen.
pub const DEFAULT_PLACEHOLDER: &str = "Type '/' for commands";

/// Character that opens the slash menu.
pub const TRIGGER: char = '/';

/// Composing mode of a region. The slash menu is tracked separately and can
/// be open in either `Composing` or `BlockSelected`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Idle,
    Composing,
    BlockSelected(BlockVariant),
}

/// The open slash menu: query after the trigger and its filtered commands.
#[derive(Debug, Clone, PartialEq)]
pub struct SlashMenu {
    query: String,
    trigger_offset: usize,
    matches: Vec<&'static Command>,
    selection: MenuSelection,
}

impl SlashMenu {
    fn open(query: &str, trigger_offset: usize) -> Self {
        Self {
            query: query.to_string(),
            trigger_offset,
            matches: commands::filter(query),
            selection: MenuSelection::default(),
        }
    }

    fn refresh(&mut self, query: &str, trigger_offset: usize) {
        self.trigger_offset = trigger_offset;
        if self.query != query {
            self.query = query.to_string();
            self.matches = commands::filter(query);
            self.selection.reset();
        }
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn trigger_offset(&self) -> usize {
        self.trigger_offset
    }

    pub fn matches(&self) -> &[&'static Command] {
        &self.matches
    }

    pub fn selected_index(&self) -> usize {
        self.selection.index()
    }

    pub fn highlighted(&self) -> Option<&'static Command> {
        self.matches.get(self.selection.index()).copied()
    }
}

/// Emitted when a region's content is ready to be written into the document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommitEvent {
    pub region_id: String,
    pub content: String,
    pub block_variant: Option<BlockVariant>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Enter,
    Escape,
    Backspace,
    ArrowUp,
    ArrowDown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyInput {
    pub key: Key,
    pub shift: bool,
}

impl KeyInput {
    pub fn plain(key: Key) -> Self {
        Self { key, shift: false }
    }

    pub fn shifted(key: Key) -> Self {
        Self { key, shift: true }
    }
}

/// What the host should do after a key went through the region.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyOutcome {
    /// Not consumed; the host applies its default behavior.
    Ignored,
    /// Consumed with no event.
    Handled,
    /// Consumed and produced a commit.
    Committed(CommitEvent),
}

/// Per-region controller for slash commands and widget insertion.
///
/// Owns its [`EditableRegion`]; nothing outside sees intermediate
/// keystrokes, only the buffer, the placeholder, the caret and commit events.
pub struct ContentInput {
    region_id: String,
    region: EditableRegion,
    mode: InputMode,
    menu: Option<SlashMenu>,
    placeholder: &'static str,
    ids: IdMinter,
}

impl ContentInput {
    pub fn new(region_id: impl Into<String>, clock: SharedClock) -> Self {
        Self {
            region_id: region_id.into(),
            region: EditableRegion::new(),
            mode: InputMode::Idle,
            menu: None,
            placeholder: DEFAULT_PLACEHOLDER,
            ids: IdMinter::new(clock),
        }
    }

    pub fn region_id(&self) -> &str {
        &self.region_id
    }

    pub fn text(&self) -> String {
        self.region.text()
    }

    pub fn caret(&self) -> usize {
        self.region.caret()
    }

    pub fn mode(&self) -> InputMode {
        self.mode
    }

    pub fn menu(&self) -> Option<&SlashMenu> {
        self.menu.as_ref()
    }

    pub fn is_menu_open(&self) -> bool {
        self.menu.is_some()
    }

    pub fn placeholder(&self) -> &'static str {
        self.placeholder
    }

    pub fn selected_variant(&self) -> Option<BlockVariant> {
        match self.mode {
            InputMode::BlockSelected(variant) => Some(variant),
            InputMode::Idle | InputMode::Composing => None,
        }
    }

    pub fn trigger_offset(&self) -> Option<usize> {
        self.menu.as_ref().map(SlashMenu::trigger_offset)
    }

    pub fn active_query(&self) -> &str {
        self.menu.as_ref().map_or("", SlashMenu::query)
    }

    pub fn set_caret(&mut self, caret: usize) {
        self.region.set_caret(caret);
    }

    /// Inserts typed text at the caret.
    pub fn type_text(&mut self, text: &str) -> Patch {
        let patch = self.region.apply(RegionCmd::InsertText {
            at: self.region.caret(),
            text: text.to_string(),
        });
        self.buffer_changed();
        patch
    }

    /// Replaces the whole buffer, as an input event from the host would.
    pub fn set_text(&mut self, text: &str) -> Patch {
        let patch = self.region.apply(RegionCmd::ReplaceRange {
            range: 0..self.region.len(),
            text: text.to_string(),
        });
        self.region.caret_to_end();
        self.buffer_changed();
        patch
    }

    /// Re-derives mode and menu state from the current buffer.
    pub fn buffer_changed(&mut self) {
        let text = self.region.text();
        let normalized_len = text.trim_end_matches(['\n', '\r']).len();
        if normalized_len < text.len() {
            self.region.apply(RegionCmd::DeleteRange {
                range: normalized_len..text.len(),
            });
        }
        let text = &text[..normalized_len];

        if text.is_empty() {
            self.reset_state();
            return;
        }

        if self.mode == InputMode::Idle {
            self.mode = InputMode::Composing;
        }

        match text.rfind(TRIGGER) {
            Some(offset) if !text[offset + TRIGGER.len_utf8()..].contains(' ') => {
                let query = &text[offset + TRIGGER.len_utf8()..];
                match &mut self.menu {
                    Some(menu) => menu.refresh(query, offset),
                    None => {
                        debug!(region = %self.region_id, query, "slash menu opened");
                        self.menu = Some(SlashMenu::open(query, offset));
                    }
                }
            }
            _ => self.close_menu(),
        }
    }

    pub fn handle_key(&mut self, input: KeyInput) -> KeyOutcome {
        match input.key {
            Key::Enter if self.menu.is_some() => match self.select_highlighted() {
                Some(event) => KeyOutcome::Committed(event),
                None => KeyOutcome::Handled,
            },
            Key::Enter if input.shift => KeyOutcome::Ignored,
            Key::Enter => match self.commit() {
                Some(event) => KeyOutcome::Committed(event),
                None => KeyOutcome::Handled,
            },
            Key::Escape if self.menu.is_some() => {
                self.close_menu();
                KeyOutcome::Handled
            }
            Key::Escape => KeyOutcome::Ignored,
            Key::Backspace => {
                self.backspace();
                KeyOutcome::Handled
            }
            Key::ArrowUp | Key::ArrowDown => {
                let Some(menu) = &mut self.menu else {
                    return KeyOutcome::Ignored;
                };
                if input.key == Key::ArrowUp {
                    menu.selection.move_up();
                } else {
                    menu.selection.move_down(menu.matches.len());
                }
                KeyOutcome::Handled
            }
        }
    }

    /// Encodes the buffer into a commit event. The region is left as-is.
    pub fn commit(&mut self) -> Option<CommitEvent> {
        if self.region.text().trim().is_empty() {
            return None;
        }
        let content = markers::finalize(&self.region.text());
        let event = CommitEvent {
            region_id: self.region_id.clone(),
            content,
            block_variant: self.selected_variant(),
        };
        debug!(region = %self.region_id, variant = ?event.block_variant, "region committed");
        Some(event)
    }

    /// Applies the highlighted menu entry.
    pub fn select_highlighted(&mut self) -> Option<CommitEvent> {
        let command = self.menu.as_ref()?.highlighted()?;
        self.select_command(command)
    }

    /// Applies a command picked from the slash menu.
    ///
    /// Only the divider produces a commit event. Other commands are ignored
    /// unless the menu is open.
    pub fn select_command(&mut self, command: &Command) -> Option<CommitEvent> {
        match command.id {
            CommandId::Block(BlockVariant::Divider) => {
                let event = CommitEvent {
                    region_id: self.region_id.clone(),
                    content: "---".to_string(),
                    block_variant: Some(BlockVariant::Divider),
                };
                debug!(region = %self.region_id, "divider committed");
                self.reset();
                Some(event)
            }
            _ if self.menu.is_none() => None,
            CommandId::Inline(kind) => {
                self.remove_trigger();
                let id = self.ids.mint(kind);
                self.insert_widget(kind, &id);
                None
            }
            CommandId::Block(variant) => {
                self.remove_trigger();
                self.mode = InputMode::BlockSelected(variant);
                self.placeholder = variant.placeholder();
                self.region.caret_to_end();
                debug!(region = %self.region_id, %variant, "block variant selected");
                None
            }
        }
    }

    /// Inserts a `{{kind:id}}` marker and one space at the caret, then moves
    /// the caret to the end of the buffer.
    pub fn insert_widget(&mut self, kind: WidgetKind, id: &str) -> Patch {
        let mut token = MarkerToken::for_widget(kind, id);
        token.push(' ');
        let mut patch = self.region.apply(RegionCmd::InsertText {
            at: self.region.caret(),
            text: token,
        });
        self.region.caret_to_end();
        patch.new_caret = self.region.caret();
        self.close_menu();
        if self.mode == InputMode::Idle {
            self.mode = InputMode::Composing;
        }
        trace!(region = %self.region_id, %kind, id, "widget inserted");
        patch
    }

    /// Clears buffer, mode, menu and placeholder, as on unmount or after the
    /// caller replaced the region.
    pub fn reset(&mut self) {
        if !self.region.is_empty() {
            self.region.apply(RegionCmd::DeleteRange {
                range: 0..self.region.len(),
            });
        }
        self.reset_state();
    }

    fn backspace(&mut self) {
        if let Some(prev) = self.region.prev_boundary() {
            self.region.apply(RegionCmd::DeleteRange {
                range: prev..self.region.caret(),
            });
            self.buffer_changed();
        }

        let text = self.region.text();
        if text.is_empty() || text == TRIGGER.to_string() {
            self.close_menu();
        }
        if text.is_empty() && self.selected_variant().is_some() {
            self.reset_state();
        }
    }

    fn remove_trigger(&mut self) {
        if let Some(menu) = self.menu.take() {
            self.region.apply(RegionCmd::DeleteRange {
                range: menu.trigger_offset..self.region.len(),
            });
        }
    }

    fn close_menu(&mut self) {
        if self.menu.take().is_some() {
            debug!(region = %self.region_id, "slash menu closed");
        }
    }

    fn reset_state(&mut self) {
        self.mode = InputMode::Idle;
        self.menu = None;
        self.placeholder = DEFAULT_PLACEHOLDER;
    }
}

impl std::fmt::Debug for ContentInput {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContentInput")
            .field("region_id", &self.region_id)
            .field("region", &self.region)
            .field("mode", &self.mode)
            .field("menu", &self.menu)
            .field("placeholder", &self.placeholder)
            .finish()
    }
}
