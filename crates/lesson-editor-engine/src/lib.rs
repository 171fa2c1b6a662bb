pub mod clock;
pub mod commands;
pub mod editing;
pub mod host;
pub mod io;
pub mod ledger;
pub mod markers;
pub mod render;
pub mod session;
pub mod tree;

#[cfg(test)]
pub mod tests;

// Re-export key types for easier usage
pub use clock::{Clock, ManualClock, SharedClock, SystemClock, system_clock};
pub use commands::{BlockVariant, Command, CommandId, WidgetKind};
pub use editing::{CommitEvent, ContentInput, InputMode, Key, KeyInput, KeyOutcome};
pub use host::{HostChannel, HostCommand, HostMessage, JsonLinesChannel};
pub use io::*;
pub use ledger::{EditLedger, LedgerSnapshot, PendingEdit};
pub use session::{CommitOutcome, LessonSession};
pub use tree::ContentNode;
