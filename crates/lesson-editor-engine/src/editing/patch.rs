/// Result of applying a command to a region buffer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Patch {
    pub changed: Vec<std::ops::Range<usize>>,
    pub new_caret: usize,
    pub version: u64,
}
