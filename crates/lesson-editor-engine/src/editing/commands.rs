use xi_rope::delta::Builder;
use xi_rope::{Delta, Rope, RopeInfo};

/// Buffer edits a region understands
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegionCmd {
    InsertText {
        at: usize,
        text: String,
    },
    DeleteRange {
        range: std::ops::Range<usize>,
    },
    ReplaceRange {
        range: std::ops::Range<usize>,
        text: String,
    },
}

/// Compile a command into a delta over a buffer of `len` bytes
///
/// Offsets past the end are clamped to the buffer length.
pub(crate) fn compile_command(len: usize, cmd: &RegionCmd) -> Delta<RopeInfo> {
    let clamp = |range: &std::ops::Range<usize>| {
        let start = range.start.min(len);
        start..range.end.min(len).max(start)
    };

    let mut builder = Builder::new(len);
    match cmd {
        RegionCmd::InsertText { at, text } => {
            let at = (*at).min(len);
            builder.replace(at..at, Rope::from(text.as_str()));
        }
        RegionCmd::DeleteRange { range } => {
            builder.delete(clamp(range));
        }
        RegionCmd::ReplaceRange { range, text } => {
            builder.replace(clamp(range), Rope::from(text.as_str()));
        }
    }
    builder.build()
}

/// Move the caret through the command
pub(crate) fn transform_caret(caret: usize, len: usize, cmd: &RegionCmd) -> usize {
    match cmd {
        RegionCmd::InsertText { at, text } => {
            // Typing at the caret pushes it along
            if (*at).min(len) <= caret {
                caret + text.len()
            } else {
                caret
            }
        }
        RegionCmd::DeleteRange { range } => {
            let start = range.start.min(len);
            let end = range.end.min(len).max(start);
            if end <= caret {
                caret - (end - start)
            } else if start < caret {
                start
            } else {
                caret
            }
        }
        RegionCmd::ReplaceRange { range, text } => {
            let start = range.start.min(len);
            let end = range.end.min(len).max(start);
            if end <= caret {
                caret - (end - start) + text.len()
            } else if start < caret {
                start + text.len()
            } else {
                caret
            }
        }
    }
}
