//! Empty-text repair.
//!
//! Some rendering surfaces collapse zero-width text, so empty or
//! all-whitespace text content never reaches the output. Replacements
//! rotate through a fixed placeholder list with one counter shared across
//! the whole traversal, in depth-first order.

use sketch_spec::Node;

const PLACEHOLDER_TEXTS: [&str; 3] = ["Sample text", "Label", "Description"];

/// Rewrite the node tree, replacing empty text content with placeholders.
pub fn repair_empty_text(nodes: &[Node]) -> Vec<Node> {
    let mut counter = 0usize;
    nodes
        .iter()
        .map(|node| repair_node(node, &mut counter))
        .collect()
}

fn repair_node(node: &Node, counter: &mut usize) -> Node {
    match node {
        Node::Text {
            content,
            font_size,
            color,
        } => {
            let content = if content.trim().is_empty() {
                let placeholder = PLACEHOLDER_TEXTS[*counter % PLACEHOLDER_TEXTS.len()];
                *counter += 1;
                placeholder.to_string()
            } else {
                content.clone()
            };
            Node::Text {
                content,
                font_size: *font_size,
                color: color.clone(),
            }
        }
        Node::Container {
            layout,
            gap,
            padding,
            children,
            background,
            border_radius,
            border,
        } => Node::Container {
            layout: *layout,
            gap: *gap,
            padding: *padding,
            children: children
                .iter()
                .map(|child| repair_node(child, counter))
                .collect(),
            background: background.clone(),
            border_radius: *border_radius,
            border: border.clone(),
        },
        button @ Node::Button { .. } => button.clone(),
    }
}
