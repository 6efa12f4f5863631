//! Structural validation of parsed JSON against the DesignSpec schema.
//!
//! Validation is recursive and accumulating: every violation is collected
//! with its field path so callers can report the full set, not just the
//! first failure. Malformed input is a recoverable error, never a panic.

use serde_json::{Map, Value};
use thiserror::Error;

use crate::spec::{Border, DesignSpec, Frame, Layout, Node};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FieldViolation {
    pub path: String,
    pub message: String,
}

impl FieldViolation {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

#[derive(Debug, Error, Clone)]
#[error("design spec validation failed with {} violation(s)", violations.len())]
pub struct ValidationError {
    pub violations: Vec<FieldViolation>,
}

impl ValidationError {
    pub fn new(violations: Vec<FieldViolation>) -> Self {
        Self { violations }
    }
}

/// Validate an arbitrary parsed JSON value as a DesignSpec.
pub fn validate(value: &Value) -> Result<DesignSpec, ValidationError> {
    let mut validator = Validator::default();
    let spec = validator.design_spec(value);
    match spec {
        Some(spec) if validator.violations.is_empty() => Ok(spec),
        _ => Err(ValidationError::new(validator.violations)),
    }
}

#[derive(Default)]
struct Validator {
    violations: Vec<FieldViolation>,
}

impl Validator {
    fn fail(&mut self, path: &str, message: impl Into<String>) {
        self.violations.push(FieldViolation::new(path, message));
    }

    fn design_spec(&mut self, value: &Value) -> Option<DesignSpec> {
        let object = self.object(value, "$")?;
        let page = self.non_empty_string(object, "page", "page");
        let frame = match object.get("frame") {
            Some(frame) => self.frame(frame, "frame"),
            None => {
                self.fail("frame", "is required");
                None
            }
        };
        let nodes = self.node_list(object.get("nodes"), "nodes");
        Some(DesignSpec {
            page: page?,
            frame: frame?,
            nodes: nodes?,
        })
    }

    fn frame(&mut self, value: &Value, path: &str) -> Option<Frame> {
        let object = self.object(value, path)?;
        let name = self.non_empty_string(object, "name", &field(path, "name"));
        let width = self.positive_int(object, "width", &field(path, "width"));
        let height = self.optional_positive_int(object, "height", &field(path, "height"));
        let layout = self.layout(object, &field(path, "layout"));
        let gap = self.non_negative_int(object, "gap", &field(path, "gap"));
        let padding = self.non_negative_int(object, "padding", &field(path, "padding"));
        let background = self.optional_hex(object, "background", &field(path, "background"));
        let border_radius =
            self.optional_non_negative_int(object, "borderRadius", &field(path, "borderRadius"));
        let border = self.optional_border(object, &field(path, "border"));
        Some(Frame {
            name: name?,
            width: width?,
            height: height?,
            layout: layout?,
            gap: gap?,
            padding: padding?,
            background: background?,
            border_radius: border_radius?,
            border: border?,
        })
    }

    fn node_list(&mut self, value: Option<&Value>, path: &str) -> Option<Vec<Node>> {
        let Some(value) = value else {
            self.fail(path, "is required");
            return None;
        };
        let Some(items) = value.as_array() else {
            self.fail(path, "must be an array");
            return None;
        };
        if items.is_empty() {
            self.fail(path, "must contain at least one node");
            return None;
        }
        let mut nodes = Vec::with_capacity(items.len());
        let mut complete = true;
        for (index, item) in items.iter().enumerate() {
            match self.node(item, &format!("{path}[{index}]")) {
                Some(node) => nodes.push(node),
                None => complete = false,
            }
        }
        complete.then_some(nodes)
    }

    // The node validator recurses into itself through container children,
    // to arbitrary depth.
    fn node(&mut self, value: &Value, path: &str) -> Option<Node> {
        let object = self.object(value, path)?;
        let tag_path = field(path, "type");
        let Some(tag) = object.get("type") else {
            self.fail(&tag_path, "is required");
            return None;
        };
        let Some(tag) = tag.as_str() else {
            self.fail(&tag_path, "must be a string");
            return None;
        };
        match tag {
            "text" => {
                let content = self.string(object, "content", &field(path, "content"));
                let font_size =
                    self.optional_positive_int(object, "fontSize", &field(path, "fontSize"));
                let color = self.optional_hex(object, "color", &field(path, "color"));
                Some(Node::Text {
                    content: content?,
                    font_size: font_size?,
                    color: color?,
                })
            }
            "button" => {
                let label = self.non_empty_string(object, "label", &field(path, "label"));
                let background =
                    self.optional_hex(object, "background", &field(path, "background"));
                let text_color = self.optional_hex(object, "textColor", &field(path, "textColor"));
                let border_radius = self.optional_non_negative_int(
                    object,
                    "borderRadius",
                    &field(path, "borderRadius"),
                );
                Some(Node::Button {
                    label: label?,
                    background: background?,
                    text_color: text_color?,
                    border_radius: border_radius?,
                })
            }
            "container" => {
                let layout = self.layout(object, &field(path, "layout"));
                let gap = self.non_negative_int(object, "gap", &field(path, "gap"));
                let padding = self.non_negative_int(object, "padding", &field(path, "padding"));
                let children =
                    self.node_list(object.get("children"), &field(path, "children"));
                let background =
                    self.optional_hex(object, "background", &field(path, "background"));
                let border_radius = self.optional_non_negative_int(
                    object,
                    "borderRadius",
                    &field(path, "borderRadius"),
                );
                let border = self.optional_border(object, &field(path, "border"));
                Some(Node::Container {
                    layout: layout?,
                    gap: gap?,
                    padding: padding?,
                    children: children?,
                    background: background?,
                    border_radius: border_radius?,
                    border: border?,
                })
            }
            other => {
                self.fail(&tag_path, format!("unknown node type '{other}'"));
                None
            }
        }
    }

    fn layout(&mut self, object: &Map<String, Value>, path: &str) -> Option<Layout> {
        match object.get("layout").and_then(Value::as_str) {
            Some("vertical") => Some(Layout::Vertical),
            Some("horizontal") => Some(Layout::Horizontal),
            Some(other) => {
                self.fail(path, format!("must be 'vertical' or 'horizontal', got '{other}'"));
                None
            }
            None => {
                self.fail(path, "is required and must be 'vertical' or 'horizontal'");
                None
            }
        }
    }

    fn optional_border(&mut self, object: &Map<String, Value>, path: &str) -> Option<Option<Border>> {
        let Some(value) = object.get("border") else {
            return Some(None);
        };
        if value.is_null() {
            return Some(None);
        }
        let object = self.object(value, path)?;
        let color = self.hex(object, "color", &field(path, "color"));
        let width = self.non_negative_int(object, "width", &field(path, "width"));
        Some(Some(Border {
            color: color?,
            width: width?,
        }))
    }

    fn object<'a>(&mut self, value: &'a Value, path: &str) -> Option<&'a Map<String, Value>> {
        match value.as_object() {
            Some(object) => Some(object),
            None => {
                self.fail(path, "must be an object");
                None
            }
        }
    }

    fn string(&mut self, object: &Map<String, Value>, key: &str, path: &str) -> Option<String> {
        match object.get(key) {
            Some(Value::String(text)) => Some(text.clone()),
            Some(_) => {
                self.fail(path, "must be a string");
                None
            }
            None => {
                self.fail(path, "is required");
                None
            }
        }
    }

    fn non_empty_string(
        &mut self,
        object: &Map<String, Value>,
        key: &str,
        path: &str,
    ) -> Option<String> {
        let text = self.string(object, key, path)?;
        if text.is_empty() {
            self.fail(path, "must not be empty");
            return None;
        }
        Some(text)
    }

    fn int(&mut self, value: &Value, path: &str) -> Option<u32> {
        let Some(number) = value.as_u64() else {
            self.fail(path, "must be a non-negative integer");
            return None;
        };
        match u32::try_from(number) {
            Ok(number) => Some(number),
            Err(_) => {
                self.fail(path, "is out of range");
                None
            }
        }
    }

    fn non_negative_int(
        &mut self,
        object: &Map<String, Value>,
        key: &str,
        path: &str,
    ) -> Option<u32> {
        match object.get(key) {
            Some(value) => self.int(value, path),
            None => {
                self.fail(path, "is required");
                None
            }
        }
    }

    fn positive_int(&mut self, object: &Map<String, Value>, key: &str, path: &str) -> Option<u32> {
        let number = self.non_negative_int(object, key, path)?;
        if number == 0 {
            self.fail(path, "must be greater than zero");
            return None;
        }
        Some(number)
    }

    fn optional_non_negative_int(
        &mut self,
        object: &Map<String, Value>,
        key: &str,
        path: &str,
    ) -> Option<Option<u32>> {
        match object.get(key) {
            None | Some(Value::Null) => Some(None),
            Some(value) => self.int(value, path).map(Some),
        }
    }

    fn optional_positive_int(
        &mut self,
        object: &Map<String, Value>,
        key: &str,
        path: &str,
    ) -> Option<Option<u32>> {
        match self.optional_non_negative_int(object, key, path)? {
            Some(0) => {
                self.fail(path, "must be greater than zero");
                None
            }
            other => Some(other),
        }
    }

    fn hex(&mut self, object: &Map<String, Value>, key: &str, path: &str) -> Option<String> {
        let text = self.string(object, key, path)?;
        if is_hex_color(&text) {
            Some(text)
        } else {
            self.fail(path, "must be a hex color like '#1F2937'");
            None
        }
    }

    fn optional_hex(
        &mut self,
        object: &Map<String, Value>,
        key: &str,
        path: &str,
    ) -> Option<Option<String>> {
        match object.get(key) {
            None | Some(Value::Null) => Some(None),
            Some(Value::String(text)) if is_hex_color(text) => Some(Some(text.clone())),
            Some(_) => {
                self.fail(path, "must be a hex color like '#1F2937'");
                None
            }
        }
    }
}

fn field(path: &str, key: &str) -> String {
    if path == "$" {
        key.to_string()
    } else {
        format!("{path}.{key}")
    }
}

fn is_hex_color(text: &str) -> bool {
    let Some(digits) = text.strip_prefix('#') else {
        return false;
    };
    matches!(digits.len(), 3 | 6 | 8) && digits.chars().all(|ch| ch.is_ascii_hexdigit())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spec::Layout;
    use serde_json::json;

    fn minimal_spec() -> Value {
        json!({
            "page": "Login",
            "frame": {
                "name": "Root",
                "width": 375,
                "layout": "vertical",
                "gap": 16,
                "padding": 24,
            },
            "nodes": [
                { "type": "text", "content": "Welcome back" }
            ],
        })
    }

    #[test]
    fn validate_minimal_spec_expected_ok() {
        let spec = validate(&minimal_spec()).expect("spec should validate");
        assert_eq!(spec.page, "Login");
        assert_eq!(spec.frame.layout, Layout::Vertical);
        assert_eq!(spec.nodes.len(), 1);
    }

    #[test]
    fn validate_round_trips_serialized_spec() {
        let spec = validate(&minimal_spec()).expect("spec should validate");
        let serialized = serde_json::to_value(&spec).expect("spec should serialize");
        let round_tripped = validate(&serialized).expect("serialized spec should validate");
        assert_eq!(spec, round_tripped);
    }

    #[test]
    fn validate_empty_children_expected_violation() {
        let mut value = minimal_spec();
        value["nodes"] = json!([
            {
                "type": "container",
                "layout": "vertical",
                "gap": 0,
                "padding": 0,
                "children": [],
            }
        ]);
        let error = validate(&value).expect_err("empty children should fail");
        assert!(
            error
                .violations
                .iter()
                .any(|v| v.path == "nodes[0].children"
                    && v.message.contains("at least one node"))
        );
    }

    #[test]
    fn validate_nested_empty_children_expected_violation_at_depth() {
        let mut value = minimal_spec();
        value["nodes"] = json!([
            {
                "type": "container",
                "layout": "vertical",
                "gap": 0,
                "padding": 0,
                "children": [
                    {
                        "type": "container",
                        "layout": "horizontal",
                        "gap": 0,
                        "padding": 0,
                        "children": [],
                    }
                ],
            }
        ]);
        let error = validate(&value).expect_err("nested empty children should fail");
        assert!(
            error
                .violations
                .iter()
                .any(|v| v.path == "nodes[0].children[0].children")
        );
    }

    #[test]
    fn validate_unknown_node_type_expected_violation() {
        let mut value = minimal_spec();
        value["nodes"] = json!([{ "type": "image", "src": "x.png" }]);
        let error = validate(&value).expect_err("unknown type should fail");
        assert!(
            error
                .violations
                .iter()
                .any(|v| v.path == "nodes[0].type" && v.message.contains("image"))
        );
    }

    #[test]
    fn validate_accumulates_multiple_violations() {
        let value = json!({
            "page": "",
            "frame": {
                "name": "Root",
                "width": 0,
                "layout": "diagonal",
                "gap": -1,
                "padding": 24,
            },
            "nodes": [],
        });
        let error = validate(&value).expect_err("multiple violations should fail");
        let paths: Vec<&str> = error.violations.iter().map(|v| v.path.as_str()).collect();
        assert!(paths.contains(&"page"));
        assert!(paths.contains(&"frame.width"));
        assert!(paths.contains(&"frame.layout"));
        assert!(paths.contains(&"frame.gap"));
        assert!(paths.contains(&"nodes"));
    }

    #[test]
    fn validate_bad_hex_color_expected_violation() {
        let mut value = minimal_spec();
        value["frame"]["background"] = json!("cornflower blue");
        let error = validate(&value).expect_err("bad color should fail");
        assert!(
            error
                .violations
                .iter()
                .any(|v| v.path == "frame.background" && v.message.contains("hex color"))
        );
    }

    #[test]
    fn validate_non_object_input_expected_single_violation() {
        let error = validate(&json!("not a spec")).expect_err("non-object should fail");
        assert_eq!(error.violations.len(), 1);
        assert_eq!(error.violations[0].path, "$");
    }

    #[test]
    fn validate_border_requires_color_and_width() {
        let mut value = minimal_spec();
        value["frame"]["border"] = json!({ "color": "#D1D5DB" });
        let error = validate(&value).expect_err("border without width should fail");
        assert!(
            error
                .violations
                .iter()
                .any(|v| v.path == "frame.border.width")
        );
    }
}
