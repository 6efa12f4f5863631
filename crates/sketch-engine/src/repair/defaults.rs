//! Visual-default filling.
//!
//! Fills unset optional visual attributes with context-appropriate
//! defaults. A set attribute is never overwritten; defaults are computed
//! independently per node, and every node kind is visited.

use sketch_spec::{Border, DesignSpec, Frame, Node, TargetLayout};

pub const FRAME_BACKGROUND: &str = "#FFFFFF";
pub const FRAME_BORDER_RADIUS: u32 = 0;
pub const TEXT_PRIMARY_COLOR: &str = "#111827";
pub const TEXT_PLACEHOLDER_COLOR: &str = "#9CA3AF";
pub const BUTTON_BACKGROUND: &str = "#2563EB";
pub const BUTTON_TEXT_COLOR: &str = "#FFFFFF";
pub const BUTTON_BORDER_RADIUS: u32 = 8;
pub const CONTAINER_BACKGROUND: &str = "#F9FAFB";
pub const CONTAINER_BORDER_RADIUS: u32 = 8;
pub const INPUT_BACKGROUND: &str = "#FFFFFF";
pub const INPUT_BORDER_COLOR: &str = "#D1D5DB";
pub const INPUT_BORDER_WIDTH: u32 = 1;

const PLACEHOLDER_TEXT_MARKERS: [&str; 4] = ["enter", "placeholder", "hint", "helper"];
const INPUT_CHILD_MARKERS: [&str; 2] = ["enter", "placeholder"];

pub fn default_frame_height(target: TargetLayout) -> u32 {
    match target {
        TargetLayout::Mobile => 800,
        TargetLayout::Tablet | TargetLayout::Desktop => 900,
    }
}

/// Rewrite the spec with visual defaults filled in.
pub fn fill_visual_defaults(spec: &DesignSpec, target: TargetLayout) -> DesignSpec {
    DesignSpec {
        page: spec.page.clone(),
        frame: fill_frame(&spec.frame, target),
        nodes: spec.nodes.iter().map(fill_node).collect(),
    }
}

fn fill_frame(frame: &Frame, target: TargetLayout) -> Frame {
    Frame {
        height: frame.height.or(Some(default_frame_height(target))),
        background: frame
            .background
            .clone()
            .or_else(|| Some(FRAME_BACKGROUND.to_string())),
        border_radius: frame.border_radius.or(Some(FRAME_BORDER_RADIUS)),
        ..frame.clone()
    }
}

fn fill_node(node: &Node) -> Node {
    match node {
        Node::Text {
            content,
            font_size,
            color,
        } => {
            let tint = if looks_like_placeholder_text(content) {
                TEXT_PLACEHOLDER_COLOR
            } else {
                TEXT_PRIMARY_COLOR
            };
            Node::Text {
                content: content.clone(),
                font_size: *font_size,
                color: color.clone().or_else(|| Some(tint.to_string())),
            }
        }
        Node::Button {
            label,
            background,
            text_color,
            border_radius,
        } => Node::Button {
            label: label.clone(),
            background: background
                .clone()
                .or_else(|| Some(BUTTON_BACKGROUND.to_string())),
            text_color: text_color
                .clone()
                .or_else(|| Some(BUTTON_TEXT_COLOR.to_string())),
            border_radius: border_radius.or(Some(BUTTON_BORDER_RADIUS)),
        },
        Node::Container {
            layout,
            gap,
            padding,
            children,
            background,
            border_radius,
            border,
        } => {
            let input_like = is_input_like(border.as_ref(), children);
            let filled_children: Vec<Node> = children.iter().map(fill_node).collect();
            if input_like {
                // Input fields keep square corners unless the model asked
                // for rounding itself.
                Node::Container {
                    layout: *layout,
                    gap: *gap,
                    padding: *padding,
                    children: filled_children,
                    background: background
                        .clone()
                        .or_else(|| Some(INPUT_BACKGROUND.to_string())),
                    border_radius: *border_radius,
                    border: border.clone().or_else(|| {
                        Some(Border {
                            color: INPUT_BORDER_COLOR.to_string(),
                            width: INPUT_BORDER_WIDTH,
                        })
                    }),
                }
            } else {
                Node::Container {
                    layout: *layout,
                    gap: *gap,
                    padding: *padding,
                    children: filled_children,
                    background: background
                        .clone()
                        .or_else(|| Some(CONTAINER_BACKGROUND.to_string())),
                    border_radius: border_radius.or(Some(CONTAINER_BORDER_RADIUS)),
                    border: border.clone(),
                }
            }
        }
    }
}

fn looks_like_placeholder_text(content: &str) -> bool {
    let content = content.to_lowercase();
    PLACEHOLDER_TEXT_MARKERS
        .iter()
        .any(|marker| content.contains(marker))
}

/// A container reads as an input field when it already has a border, or a
/// direct child text node reads as placeholder copy.
fn is_input_like(border: Option<&Border>, children: &[Node]) -> bool {
    if border.is_some() {
        return true;
    }
    children.iter().any(|child| match child {
        Node::Text { content, .. } => {
            let content = content.to_lowercase();
            INPUT_CHILD_MARKERS
                .iter()
                .any(|marker| content.contains(marker))
        }
        _ => false,
    })
}
