//! Layout/surface classification.
//!
//! A container that carries visual styling should read as a surface: an
//! input field or a card. Styled containers that are neither get flagged so
//! callers can surface the mismatch; the spec itself is never mutated.
//! Traversal recurses into every container, flagged or not.

use sketch_spec::{Node, VisualUsageWarning};

const LAYOUT_ONLY_REASON: &str = "container carries surface styling but is neither an \
input field nor a card; visual styling on pure layout containers is usually unintended";

const INPUT_TEXT_MARKERS: [&str; 3] = ["enter", "placeholder", "hint"];

/// Padding at or above which a styled container counts as a card on its own.
const CARD_PADDING_THRESHOLD: u32 = 16;

/// Walk the node tree and collect warnings for styled layout-only containers.
pub fn classify_containers(nodes: &[Node]) -> Vec<VisualUsageWarning> {
    let mut warnings = Vec::new();
    for (index, node) in nodes.iter().enumerate() {
        visit(node, &format!("nodes[{index}]"), &mut warnings);
    }
    warnings
}

fn visit(node: &Node, path: &str, warnings: &mut Vec<VisualUsageWarning>) {
    let Node::Container {
        padding,
        children,
        background,
        border_radius,
        border,
        ..
    } = node
    else {
        return;
    };

    let styled = background.is_some() || border_radius.is_some() || border.is_some();
    if styled && !is_input_like(border.is_some(), children) {
        let card_like = background.is_some()
            && border_radius.is_some()
            && (*padding >= CARD_PADDING_THRESHOLD || (*padding > 0 && children.len() >= 2));
        if !card_like {
            warnings.push(VisualUsageWarning {
                path: path.to_string(),
                properties: offending_properties(background, border_radius, border.is_some()),
                reason: LAYOUT_ONLY_REASON.to_string(),
            });
        }
    }

    for (index, child) in children.iter().enumerate() {
        visit(child, &format!("{path}.children[{index}]"), warnings);
    }
}

fn is_input_like(has_border: bool, children: &[Node]) -> bool {
    has_border
        && children.iter().any(|child| match child {
            Node::Text { content, .. } => {
                let content = content.to_lowercase();
                INPUT_TEXT_MARKERS
                    .iter()
                    .any(|marker| content.contains(marker))
            }
            _ => false,
        })
}

fn offending_properties(
    background: &Option<String>,
    border_radius: &Option<u32>,
    has_border: bool,
) -> Vec<String> {
    let mut properties = Vec::new();
    if let Some(background) = background {
        properties.push(format!("background=\"{background}\""));
    }
    if let Some(radius) = border_radius {
        properties.push(format!("borderRadius={radius}"));
    }
    if has_border {
        properties.push("border".to_string());
    }
    properties
}

#[cfg(test)]
mod tests {
    use super::*;
    use sketch_spec::{Border, Layout};

    fn text(content: &str) -> Node {
        Node::Text {
            content: content.to_string(),
            font_size: None,
            color: None,
        }
    }

    struct ContainerSpec {
        padding: u32,
        children: Vec<Node>,
        background: Option<&'static str>,
        border_radius: Option<u32>,
        border: bool,
    }

    fn container(spec: ContainerSpec) -> Node {
        Node::Container {
            layout: Layout::Vertical,
            gap: 0,
            padding: spec.padding,
            children: spec.children,
            background: spec.background.map(ToOwned::to_owned),
            border_radius: spec.border_radius,
            border: spec.border.then(|| Border {
                color: "#D1D5DB".to_string(),
                width: 1,
            }),
        }
    }

    #[test]
    fn classify_input_like_container_expected_no_warning() {
        let nodes = vec![container(ContainerSpec {
            padding: 8,
            children: vec![text("Enter your email")],
            background: None,
            border_radius: None,
            border: true,
        })];
        assert!(classify_containers(&nodes).is_empty());
    }

    #[test]
    fn classify_card_like_container_expected_no_warning() {
        let nodes = vec![container(ContainerSpec {
            padding: 24,
            children: vec![text("Title"), text("Body"), text("Footer")],
            background: Some("#F9FAFB"),
            border_radius: Some(12),
            border: false,
        })];
        assert!(classify_containers(&nodes).is_empty());
    }

    #[test]
    fn classify_card_like_by_children_branch_expected_no_warning() {
        // padding below 16 but positive, with two children.
        let nodes = vec![container(ContainerSpec {
            padding: 8,
            children: vec![text("Title"), text("Body")],
            background: Some("#F9FAFB"),
            border_radius: Some(12),
            border: false,
        })];
        assert!(classify_containers(&nodes).is_empty());
    }

    #[test]
    fn classify_radius_only_layout_container_expected_warning_with_properties() {
        let nodes = vec![container(ContainerSpec {
            padding: 0,
            children: vec![text("Plain one"), text("Plain two")],
            background: None,
            border_radius: Some(12),
            border: false,
        })];
        let warnings = classify_containers(&nodes);
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].path, "nodes[0]");
        assert_eq!(warnings[0].properties, vec!["borderRadius=12".to_string()]);
        assert_eq!(warnings[0].reason, LAYOUT_ONLY_REASON);
    }

    #[test]
    fn classify_border_without_placeholder_child_expected_warning() {
        let nodes = vec![container(ContainerSpec {
            padding: 8,
            children: vec![text("Totals")],
            background: None,
            border_radius: None,
            border: true,
        })];
        let warnings = classify_containers(&nodes);
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].properties, vec!["border".to_string()]);
    }

    #[test]
    fn classify_unstyled_container_expected_children_still_visited() {
        let inner = container(ContainerSpec {
            padding: 0,
            children: vec![text("Plain")],
            background: Some("#EEEEEE"),
            border_radius: None,
            border: false,
        });
        let nodes = vec![container(ContainerSpec {
            padding: 0,
            children: vec![text("Plain"), inner],
            background: None,
            border_radius: None,
            border: false,
        })];
        let warnings = classify_containers(&nodes);
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].path, "nodes[0].children[1]");
        assert_eq!(
            warnings[0].properties,
            vec!["background=\"#EEEEEE\"".to_string()]
        );
    }

    #[test]
    fn classify_flagged_container_expected_inner_containers_still_checked() {
        let inner = container(ContainerSpec {
            padding: 0,
            children: vec![text("Inner")],
            background: None,
            border_radius: Some(4),
            border: false,
        });
        let nodes = vec![container(ContainerSpec {
            padding: 0,
            children: vec![inner],
            background: None,
            border_radius: Some(8),
            border: false,
        })];
        let warnings = classify_containers(&nodes);
        assert_eq!(warnings.len(), 2);
        assert_eq!(warnings[0].path, "nodes[0]");
        assert_eq!(warnings[1].path, "nodes[0].children[0]");
    }
}
