use super::node::{ContentNode, Element};

/// Resolves the identity of a subtree.
///
/// Returns the node's own id when set, otherwise the first id found by a
/// depth-first walk of the children in document order. When two sibling
/// subtrees both carry ids the earlier sibling wins.
pub fn get_id(node: &ContentNode) -> Option<&str> {
    node.own_id()
        .or_else(|| node.children().iter().find_map(get_id))
}

/// True if `get_id` of the node or any descendant equals `target`.
pub fn contains_id(node: &ContentNode, target: &str) -> bool {
    get_id(node) == Some(target) || node.children().iter().any(|c| contains_id(c, target))
}

/// Finds the node whose own id equals `id`.
pub fn find<'a>(node: &'a ContentNode, id: &str) -> Option<&'a ContentNode> {
    if node.own_id() == Some(id) {
        return Some(node);
    }
    node.children().iter().find_map(|child| find(child, id))
}

/// Child-index path from `node` to the node whose own id equals `id`.
pub fn path_to(node: &ContentNode, id: &str) -> Option<Vec<usize>> {
    if node.own_id() == Some(id) {
        return Some(Vec::new());
    }
    node.children().iter().enumerate().find_map(|(i, child)| {
        path_to(child, id).map(|mut rest| {
            rest.insert(0, i);
            rest
        })
    })
}

/// Formats a child-index path as `0/2/1`, the shape used for element paths.
pub fn format_path(path: &[usize]) -> String {
    path.iter()
        .map(usize::to_string)
        .collect::<Vec<_>>()
        .join("/")
}

/// Rebuilds `tree` with the children of the node identified by `target_id`
/// replaced by `new_content`.
///
/// Other properties of the target are preserved and every ancestor on the
/// path is reconstructed. A tree without a match comes back with the same
/// content.
pub fn replace_content(
    tree: &ContentNode,
    target_id: &str,
    new_content: Vec<ContentNode>,
) -> ContentNode {
    let mut slot = Some(new_content);
    rebuild(tree, target_id, &mut slot)
}

fn rebuild(
    node: &ContentNode,
    target_id: &str,
    slot: &mut Option<Vec<ContentNode>>,
) -> ContentNode {
    match node {
        ContentNode::Text { .. } => node.clone(),
        ContentNode::Element(el) => {
            if el.id.as_deref() == Some(target_id)
                && let Some(children) = slot.take()
            {
                return ContentNode::Element(Element {
                    children,
                    ..el.clone()
                });
            }
            ContentNode::Element(Element {
                tag: el.tag.clone(),
                id: el.id.clone(),
                attrs: el.attrs.clone(),
                children: el
                    .children
                    .iter()
                    .map(|child| rebuild(child, target_id, slot))
                    .collect(),
            })
        }
    }
}

/// Rebuilds `tree` with the node whose own id equals `target_id` renamed to
/// `tag`. Children and attributes are kept.
pub fn retag(tree: &ContentNode, target_id: &str, tag: &str) -> ContentNode {
    match tree {
        ContentNode::Text { .. } => tree.clone(),
        ContentNode::Element(el) => ContentNode::Element(Element {
            tag: if el.id.as_deref() == Some(target_id) {
                tag.to_string()
            } else {
                el.tag.clone()
            },
            id: el.id.clone(),
            attrs: el.attrs.clone(),
            children: el
                .children
                .iter()
                .map(|child| retag(child, target_id, tag))
                .collect(),
        }),
    }
}

/// Rebuilds `tree` without the node whose own id equals `target_id`.
pub fn remove(tree: &ContentNode, target_id: &str) -> ContentNode {
    match tree {
        ContentNode::Text { .. } => tree.clone(),
        ContentNode::Element(el) => ContentNode::Element(Element {
            children: el
                .children
                .iter()
                .filter(|child| child.own_id() != Some(target_id))
                .map(|child| remove(child, target_id))
                .collect(),
            ..el.clone()
        }),
    }
}

/// Inserts `node` as a child of `tree`'s root, right after the child whose
/// identity is `after`, or at the end when `after` is `None` or unknown.
pub fn insert_after(tree: &ContentNode, after: Option<&str>, node: ContentNode) -> ContentNode {
    match tree {
        ContentNode::Text { .. } => tree.clone(),
        ContentNode::Element(el) => {
            let mut children = el.children.clone();
            let at = after
                .and_then(|id| children.iter().position(|c| get_id(c) == Some(id)))
                .map_or(children.len(), |i| i + 1);
            children.insert(at, node);
            ContentNode::Element(Element {
                children,
                ..el.clone()
            })
        }
    }
}

/// Rebuilds the root with its children in `order` (by `get_id`).
///
/// Children missing from `order` keep their relative order after the
/// listed ones; ids in `order` that do not exist are ignored.
pub fn reorder_children(tree: &ContentNode, order: &[String]) -> ContentNode {
    match tree {
        ContentNode::Text { .. } => tree.clone(),
        ContentNode::Element(el) => {
            let mut remaining: Vec<Option<&ContentNode>> = el.children.iter().map(Some).collect();
            let mut children = Vec::with_capacity(el.children.len());
            for id in order {
                if let Some(slot) = remaining
                    .iter_mut()
                    .find(|slot| slot.is_some_and(|c| get_id(c) == Some(id.as_str())))
                    && let Some(child) = slot.take()
                {
                    children.push(child.clone());
                }
            }
            children.extend(remaining.into_iter().flatten().cloned());
            ContentNode::Element(Element {
                children,
                ..el.clone()
            })
        }
    }
}

/// Identities of the root's children, in order.
pub fn child_ids(tree: &ContentNode) -> Vec<String> {
    tree.children()
        .iter()
        .filter_map(get_id)
        .map(str::to_string)
        .collect()
}
