use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Block variants replace the whole region with a typed block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BlockVariant {
    H1,
    H2,
    H3,
    Paragraph,
    Quote,
    Divider,
}

impl BlockVariant {
    pub const ALL: [BlockVariant; 6] = [
        BlockVariant::H1,
        BlockVariant::H2,
        BlockVariant::H3,
        BlockVariant::Paragraph,
        BlockVariant::Quote,
        BlockVariant::Divider,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            BlockVariant::H1 => "h1",
            BlockVariant::H2 => "h2",
            BlockVariant::H3 => "h3",
            BlockVariant::Paragraph => "paragraph",
            BlockVariant::Quote => "quote",
            BlockVariant::Divider => "divider",
        }
    }

    /// Placeholder shown in a region once this variant has been chosen.
    pub const fn placeholder(self) -> &'static str {
        match self {
            BlockVariant::H1 => "Heading 1",
            BlockVariant::H2 => "Heading 2",
            BlockVariant::H3 => "Heading 3",
            BlockVariant::Quote => "Write a quote...",
            BlockVariant::Paragraph | BlockVariant::Divider => "Start writing...",
        }
    }

    /// Element tag used when the block is materialized into the document tree.
    pub const fn html_tag(self) -> &'static str {
        match self {
            BlockVariant::H1 => "h1",
            BlockVariant::H2 => "h2",
            BlockVariant::H3 => "h3",
            BlockVariant::Paragraph => "p",
            BlockVariant::Quote => "blockquote",
            BlockVariant::Divider => "hr",
        }
    }
}

impl fmt::Display for BlockVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BlockVariant {
    type Err = UnknownCommand;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "h1" => Ok(BlockVariant::H1),
            "h2" => Ok(BlockVariant::H2),
            "h3" => Ok(BlockVariant::H3),
            "paragraph" => Ok(BlockVariant::Paragraph),
            "quote" => Ok(BlockVariant::Quote),
            "divider" => Ok(BlockVariant::Divider),
            other => Err(UnknownCommand(other.to_string())),
        }
    }
}

/// Inline widget kinds that can be embedded in running text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum WidgetKind {
    NumberScrubber,
    Dropdown,
    TextInput,
}

impl WidgetKind {
    pub const ALL: [WidgetKind; 3] = [
        WidgetKind::NumberScrubber,
        WidgetKind::Dropdown,
        WidgetKind::TextInput,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            WidgetKind::NumberScrubber => "numberScrubber",
            WidgetKind::Dropdown => "dropdown",
            WidgetKind::TextInput => "textInput",
        }
    }
}

impl fmt::Display for WidgetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WidgetKind {
    type Err = UnknownCommand;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        WidgetKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| UnknownCommand(s.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown command id: {0}")]
pub struct UnknownCommand(pub String);

/// Identity of a registered command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommandId {
    Block(BlockVariant),
    Inline(WidgetKind),
}

impl CommandId {
    pub const fn as_str(self) -> &'static str {
        match self {
            CommandId::Block(variant) => variant.as_str(),
            CommandId::Inline(kind) => kind.as_str(),
        }
    }
}

impl FromStr for CommandId {
    type Err = UnknownCommand;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse::<BlockVariant>()
            .map(CommandId::Block)
            .or_else(|_| s.parse::<WidgetKind>().map(CommandId::Inline))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Block,
    Inline,
}

/// A statically registered slash command.
#[derive(Debug, PartialEq, Eq)]
pub struct Command {
    pub id: CommandId,
    pub label: &'static str,
    pub description: &'static str,
    pub keywords: &'static [&'static str],
}

impl Command {
    pub const fn category(&self) -> Category {
        match self.id {
            CommandId::Block(_) => Category::Block,
            CommandId::Inline(_) => Category::Inline,
        }
    }
}

/// Registry order is the display order of the slash menu.
pub static COMMANDS: &[Command] = &[
    Command {
        id: CommandId::Block(BlockVariant::H1),
        label: "Heading 1",
        description: "Large section title",
        keywords: &["h1", "title", "big"],
    },
    Command {
        id: CommandId::Block(BlockVariant::H2),
        label: "Heading 2",
        description: "Medium section title",
        keywords: &["h2", "subtitle"],
    },
    Command {
        id: CommandId::Block(BlockVariant::H3),
        label: "Heading 3",
        description: "Small section title",
        keywords: &["h3", "small"],
    },
    Command {
        id: CommandId::Block(BlockVariant::Paragraph),
        label: "Paragraph",
        description: "Plain body text",
        keywords: &["p", "text", "body"],
    },
    Command {
        id: CommandId::Block(BlockVariant::Quote),
        label: "Quote",
        description: "Call out a quotation",
        keywords: &["blockquote", "citation", "cite"],
    },
    Command {
        id: CommandId::Block(BlockVariant::Divider),
        label: "Divider",
        description: "Horizontal rule between sections",
        keywords: &["hr", "line", "separator", "rule"],
    },
    Command {
        id: CommandId::Inline(WidgetKind::NumberScrubber),
        label: "Number Scrubber",
        description: "Draggable number bound to a variable",
        keywords: &["number", "slider", "scrub", "drag", "variable"],
    },
    Command {
        id: CommandId::Inline(WidgetKind::Dropdown),
        label: "Dropdown",
        description: "Pick one option from a list",
        keywords: &["select", "choice", "options", "menu"],
    },
    Command {
        id: CommandId::Inline(WidgetKind::TextInput),
        label: "Text Input",
        description: "Free-form answer field",
        keywords: &["input", "field", "answer", "type"],
    },
];

pub fn all() -> &'static [Command] {
    COMMANDS
}

/// Looks a command up by its id string (`"h1"`, `"numberScrubber"`, ...).
pub fn find(id: &str) -> Option<&'static Command> {
    let id = id.parse::<CommandId>().ok()?;
    COMMANDS.iter().find(|command| command.id == id)
}

/// Inline commands insert a widget and keep composing; block commands
/// convert the whole region.
pub const fn is_inline_command(id: CommandId) -> bool {
    matches!(id, CommandId::Inline(_))
}
