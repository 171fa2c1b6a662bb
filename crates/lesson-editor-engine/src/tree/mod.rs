//! # Document Tree
//!
//! Composite content tree of a lesson and the walkers used to address it.
//!
//! Nodes are located by identity (`get_id`) rather than by position, so a
//! section keeps its address while its content is rewritten. Every
//! operation that changes the tree returns a rebuilt tree.

pub mod node;
pub mod walker;

pub use node::{ContentNode, Element};
pub use walker::{
    child_ids, contains_id, find, format_path, get_id, insert_after, path_to, remove,
    reorder_children, replace_content, retag,
};
