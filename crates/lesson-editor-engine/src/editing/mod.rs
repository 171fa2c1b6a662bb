/*!
 * # Region Editing
 *
 * Everything that happens inside one editable input surface before its
 * content reaches the document.
 *
 * ## Architecture Overview
 *
 * ### 1. Rope buffer per region
 * - Each region keeps its text in an **`xi_rope::Rope`**
 * - All edits are **`RegionCmd`**s compiled to xi-rope **Deltas**
 * - Applying a command returns a **`Patch`** (changed ranges, new caret, version)
 *
 * ### 2. Slash-command state machine
 * - **`ContentInput`** derives its state from the buffer after every change
 * - Modes: `Idle`, `Composing`, `BlockSelected(variant)`; the slash menu is
 *   tracked alongside the mode and can be open in either non-idle mode
 * - Inline commands insert a `{{kind:id}}` marker at the caret, block commands
 *   pick the region's block variant, the divider commits immediately
 *
 * ### 3. Commit events
 * - Enter (no shift, menu closed) pushes the buffer through the marker codec
 *   and emits a **`CommitEvent`**; the region is not cleared
 * - The caller decides how the event mutates the document
 *
 * ## Module Structure
 *
 * - **`commands`**: `RegionCmd` and delta compilation
 * - **`region`**: `EditableRegion` buffer + caret
 * - **`input`**: `ContentInput`, keys, menu, commit events
 * - **`ids`**: widget instance id minting
 * - **`patch`**: edit result metadata
 *
 * ## Usage Pattern
 *
 * ```rust
 * use lesson_editor_engine::clock::system_clock;
 * use lesson_editor_engine::editing::{ContentInput, Key, KeyInput, KeyOutcome};
 *
 * let mut input = ContentInput::new("intro", system_clock());
 * input.type_text("Welcome /head");
 * input.handle_key(KeyInput::plain(Key::Enter)); // picks Heading 1
 * input.type_text("to the lesson");
 *
 * if let KeyOutcome::Committed(event) = input.handle_key(KeyInput::plain(Key::Enter)) {
 *     assert_eq!(event.content, "Welcome to the lesson");
 * }
 * ```
 */

pub mod commands;
pub mod ids;
pub mod input;
pub mod patch;
pub mod region;

pub use commands::RegionCmd;
pub use ids::IdMinter;
pub use input::{
    CommitEvent, ContentInput, DEFAULT_PLACEHOLDER, InputMode, Key, KeyInput, KeyOutcome,
    SlashMenu, TRIGGER,
};
pub use patch::Patch;
pub use region::EditableRegion;
