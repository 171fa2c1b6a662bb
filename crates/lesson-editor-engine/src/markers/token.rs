use crate::commands::WidgetKind;

/// Delimiters of the `{{kind:id}}` marker grammar.
pub struct MarkerToken;

impl MarkerToken {
    pub const OPEN: &'static [u8; 2] = b"{{";
    pub const CLOSE: &'static [u8; 2] = b"}}";
    pub const SEP: u8 = b':';
    pub const CLOSE_BYTE: u8 = b'}';

    /// Attribute naming the widget kind on a widget node.
    pub const KIND_ATTR: &'static str = "data-widget";
    /// Attribute carrying the instance id on a widget node.
    pub const ID_ATTR: &'static str = "data-widget-id";

    pub fn format(kind: &str, id: &str) -> String {
        format!("{{{{{kind}:{id}}}}}")
    }

    pub fn for_widget(kind: WidgetKind, id: &str) -> String {
        Self::format(kind.as_str(), id)
    }
}
