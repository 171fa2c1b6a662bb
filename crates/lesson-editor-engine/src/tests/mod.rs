//! Shared fixtures for unit tests.

use std::rc::Rc;

use crate::clock::{ManualClock, SharedClock};
use crate::commands::WidgetKind;
use crate::markers::widget_node;
use crate::tree::ContentNode;

pub fn manual_clock(start: i64) -> SharedClock {
    Rc::new(ManualClock::new(start))
}

/// Three sections: an intro paragraph, a nested `newton` section and a
/// summary holding a number scrubber.
pub fn sample_lesson() -> ContentNode {
    ContentNode::element("lesson").with_children(vec![
        ContentNode::element("p")
            .with_id("intro")
            .with_children(vec![ContentNode::text("Welcome to forces")]),
        ContentNode::element("section")
            .with_id("newton")
            .with_children(vec![
                ContentNode::element("h2").with_children(vec![ContentNode::text("Newton's laws")]),
                ContentNode::element("p").with_children(vec![ContentNode::text("F = ma")]),
            ]),
        ContentNode::element("p").with_id("summary").with_children(vec![
            ContentNode::text("Mass "),
            widget_node(WidgetKind::NumberScrubber, "numberScrubber-1"),
        ]),
    ])
}
