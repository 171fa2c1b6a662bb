//! # Inline Markers
//!
//! Widgets embedded in running text are stored as `{{kind:id}}` tokens in a
//! flat content string. This module converts between that string and an
//! interleaved sequence of literal text and widget instances.
//!
//! ## Modules
//!
//! - **`token`**: `MarkerToken`, owner of the delimiters and widget attributes
//! - **`cursor`**: byte `Cursor` used by the scanner
//! - **`widget`**: `WidgetInstance` and per-kind default parameters
//! - **`codec`**: `encode` (tree → string) and `decode` (string → segments)
//!
//! Malformed tokens are never errors; they stay in the literal text.

pub mod codec;
pub mod cursor;
pub mod token;
pub mod widget;

pub use codec::{
    Decoded, Segment, decode, encode, encode_nodes, finalize, markers, to_nodes, widget_node,
};
pub use token::MarkerToken;
pub use widget::{DropdownProps, NumericProps, TextInputProps, WidgetInstance, WidgetParams};
