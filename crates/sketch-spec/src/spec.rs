use serde::{Deserialize, Serialize};

/// Main-axis direction for a frame or container's children.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Layout {
    Vertical,
    Horizontal,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Border {
    pub color: String,
    pub width: u32,
}

/// Root visual container of a page. Exactly one per DesignSpec.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Frame {
    pub name: String,
    pub width: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
    pub layout: Layout,
    pub gap: u32,
    pub padding: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub border_radius: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub border: Option<Border>,
}

/// A node in the design tree. Closed union, dispatched by the `type` tag.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Node {
    #[serde(rename_all = "camelCase")]
    Text {
        content: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        font_size: Option<u32>,
        #[serde(skip_serializing_if = "Option::is_none")]
        color: Option<String>,
    },
    #[serde(rename_all = "camelCase")]
    Button {
        label: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        background: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        text_color: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        border_radius: Option<u32>,
    },
    #[serde(rename_all = "camelCase")]
    Container {
        layout: Layout,
        gap: u32,
        padding: u32,
        /// Never empty; the validator enforces a minimum of one child.
        children: Vec<Node>,
        #[serde(skip_serializing_if = "Option::is_none")]
        background: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        border_radius: Option<u32>,
        #[serde(skip_serializing_if = "Option::is_none")]
        border: Option<Border>,
    },
}

/// Schema-validated result of one generation request.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DesignSpec {
    pub page: String,
    pub frame: Frame,
    pub nodes: Vec<Node>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn node_serialization_uses_type_tag_and_camel_case() {
        let node = Node::Button {
            label: "Sign in".to_string(),
            background: Some("#2563EB".to_string()),
            text_color: None,
            border_radius: Some(8),
        };
        let value = serde_json::to_value(&node).expect("node should serialize");
        assert_eq!(
            value,
            json!({
                "type": "button",
                "label": "Sign in",
                "background": "#2563EB",
                "borderRadius": 8,
            })
        );
    }

    #[test]
    fn container_deserialization_recurses_into_children() {
        let value = json!({
            "type": "container",
            "layout": "vertical",
            "gap": 8,
            "padding": 12,
            "children": [
                { "type": "text", "content": "Enter your email" }
            ],
        });
        let node: Node = serde_json::from_value(value).expect("container should deserialize");
        match node {
            Node::Container { children, .. } => assert_eq!(children.len(), 1),
            other => panic!("expected container, got {other:?}"),
        }
    }
}
