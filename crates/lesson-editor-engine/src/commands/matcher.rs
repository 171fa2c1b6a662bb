use super::catalog::{COMMANDS, Category, Command};

/// Filters the registry by a case-insensitive substring query.
pub fn filter(query: &str) -> Vec<&'static Command> {
    filter_in(COMMANDS, query)
}

/// Matches `query` against label, description and keywords of each command.
///
/// An empty query matches everything. Registry order is preserved.
pub fn filter_in<'a>(commands: &'a [Command], query: &str) -> Vec<&'a Command> {
    let needle = query.to_lowercase();
    commands
        .iter()
        .filter(|command| needle.is_empty() || matches(command, &needle))
        .collect()
}

fn matches(command: &Command, needle: &str) -> bool {
    command.label.to_lowercase().contains(needle)
        || command.description.to_lowercase().contains(needle)
        || command
            .keywords
            .iter()
            .any(|keyword| keyword.to_lowercase().contains(needle))
}

/// Filtered commands split by category, for grouped menu rendering.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct Categorized<'a> {
    pub block: Vec<&'a Command>,
    pub inline: Vec<&'a Command>,
}

pub fn categorize<'a>(matches: &[&'a Command]) -> Categorized<'a> {
    let mut out = Categorized::default();
    for &command in matches {
        match command.category() {
            Category::Block => out.block.push(command),
            Category::Inline => out.inline.push(command),
        }
    }
    out
}

/// Highlight position in the flat filtered list.
///
/// Movement clamps at both ends; there is no wraparound.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct MenuSelection {
    index: usize,
}

impl MenuSelection {
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn move_up(&mut self) {
        self.index = self.index.saturating_sub(1);
    }

    pub fn move_down(&mut self, len: usize) {
        if self.index + 1 < len {
            self.index += 1;
        }
    }

    pub fn reset(&mut self) {
        self.index = 0;
    }
}
