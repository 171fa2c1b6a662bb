//! # Slash Commands
//!
//! Static registry of the commands offered by the `/` menu and the matcher
//! used to narrow it while the author types.
//!
//! - **`catalog`**: `Command`, `CommandId`, `BlockVariant`, `WidgetKind` and the
//!   ordered `COMMANDS` registry
//! - **`matcher`**: substring `filter`, `categorize`, and the clamped
//!   `MenuSelection` used for keyboard navigation
//!
//! Block commands convert the whole region into a typed block; inline
//! commands drop a widget marker into the buffer and keep composing.

pub mod catalog;
pub mod matcher;

pub use catalog::{
    BlockVariant, COMMANDS, Category, Command, CommandId, UnknownCommand, WidgetKind, all, find,
    is_inline_command,
};
pub use matcher::{Categorized, MenuSelection, categorize, filter, filter_in};
