use xi_rope::Rope;

use super::commands::{RegionCmd, compile_command, transform_caret};
use super::patch::Patch;

/// Live buffer of one editable input surface.
///
/// The buffer is an xi-rope `Rope`; every change goes through a [`RegionCmd`]
/// compiled to a `Delta`, and the caret is carried through the same edit.
/// The caret is a byte offset that always sits on a char boundary.
#[derive(Clone)]
pub struct EditableRegion {
    buffer: Rope,
    caret: usize,
    version: u64,
}

impl Default for EditableRegion {
    fn default() -> Self {
        Self::from_text("")
    }
}

impl EditableRegion {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_text(text: &str) -> Self {
        Self {
            buffer: Rope::from(text),
            caret: text.len(),
            version: 0,
        }
    }

    /// Apply a command, returning the changed ranges and the new caret
    pub fn apply(&mut self, cmd: RegionCmd) -> Patch {
        let len = self.buffer.len();
        let delta = compile_command(len, &cmd);

        let mut changed = Vec::new();
        let mut cursor = 0;
        for op in delta.els.iter() {
            match op {
                xi_rope::delta::DeltaElement::Copy(_from, to) => {
                    cursor = *to;
                }
                xi_rope::delta::DeltaElement::Insert(inserted) => {
                    let start = cursor;
                    let end = cursor + inserted.len();
                    changed.push(start..end);
                    cursor = end;
                }
            }
        }

        self.buffer = delta.apply(&self.buffer);
        self.caret = self.snap_to_boundary(transform_caret(self.caret, len, &cmd));
        self.version += 1;

        Patch {
            changed,
            new_caret: self.caret,
            version: self.version,
        }
    }

    pub fn text(&self) -> String {
        self.buffer.to_string()
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.len() == 0
    }

    pub fn caret(&self) -> usize {
        self.caret
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn set_caret(&mut self, caret: usize) {
        self.caret = self.snap_to_boundary(caret);
    }

    pub fn caret_to_end(&mut self) {
        self.caret = self.buffer.len();
    }

    /// Byte offset of the char boundary before the caret, if any
    pub fn prev_boundary(&self) -> Option<usize> {
        let text = self.buffer.slice_to_cow(0..self.caret);
        text.char_indices().last().map(|(i, _)| i)
    }

    fn snap_to_boundary(&self, offset: usize) -> usize {
        let text = self.buffer.to_string();
        let mut offset = offset.min(text.len());
        while !text.is_char_boundary(offset) {
            offset -= 1;
        }
        offset
    }
}

impl std::fmt::Debug for EditableRegion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EditableRegion")
            .field("buffer", &self.buffer.to_string())
            .field("caret", &self.caret)
            .field("version", &self.version)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn typing_moves_caret_and_bumps_version() {
        let mut region = EditableRegion::new();
        let patch = region.apply(RegionCmd::InsertText {
            at: 0,
            text: "Hi".to_string(),
        });

        assert_eq!(region.text(), "Hi");
        assert_eq!(patch.new_caret, 2);
        assert_eq!(patch.version, 1);
        assert_eq!(patch.changed, vec![0..2]);
    }

    #[test]
    fn deleting_tail_clamps_caret() {
        let mut region = EditableRegion::from_text("Hello /hea");
        assert_eq!(region.caret(), 10);

        let patch = region.apply(RegionCmd::DeleteRange { range: 6..10 });

        assert_eq!(region.text(), "Hello ");
        assert_eq!(patch.new_caret, 6);
        assert!(patch.changed.is_empty());
    }

    #[test]
    fn caret_never_splits_a_char() {
        let mut region = EditableRegion::from_text("né");
        region.set_caret(2);
        assert_eq!(region.caret(), 1);
        assert_eq!(region.prev_boundary(), Some(0));

        region.caret_to_end();
        assert_eq!(region.prev_boundary(), Some(1));
        region.set_caret(0);
        assert_eq!(region.prev_boundary(), None);
    }
}
