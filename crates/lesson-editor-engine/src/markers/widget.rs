use serde::{Deserialize, Serialize};

use crate::commands::WidgetKind;

/// Parameters of a number scrubber, also the payload of numeric widget edits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NumericProps {
    pub variable_name: String,
    pub default_value: f64,
    pub min: f64,
    pub max: f64,
    pub step: f64,
}

impl Default for NumericProps {
    fn default() -> Self {
        Self {
            variable_name: String::new(),
            default_value: 0.0,
            min: 0.0,
            max: 100.0,
            step: 1.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DropdownProps {
    pub variable_name: String,
    pub options: Vec<String>,
    pub selected: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextInputProps {
    pub variable_name: String,
    pub placeholder: String,
}

impl Default for TextInputProps {
    fn default() -> Self {
        Self {
            variable_name: String::new(),
            placeholder: "Type your answer".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum WidgetParams {
    NumberScrubber(NumericProps),
    Dropdown(DropdownProps),
    TextInput(TextInputProps),
}

impl WidgetParams {
    /// Per-kind defaults. Instance-specific values live in the shared
    /// variable store and are resolved outside the codec.
    pub fn defaults(kind: WidgetKind) -> Self {
        match kind {
            WidgetKind::NumberScrubber => WidgetParams::NumberScrubber(NumericProps::default()),
            WidgetKind::Dropdown => WidgetParams::Dropdown(DropdownProps::default()),
            WidgetKind::TextInput => WidgetParams::TextInput(TextInputProps::default()),
        }
    }
}

/// A live widget resolved from a marker.
#[derive(Debug, Clone, PartialEq)]
pub struct WidgetInstance {
    pub kind: WidgetKind,
    pub id: String,
    pub params: WidgetParams,
}

impl WidgetInstance {
    pub fn new(kind: WidgetKind, id: impl Into<String>) -> Self {
        Self {
            kind,
            id: id.into(),
            params: WidgetParams::defaults(kind),
        }
    }
}
