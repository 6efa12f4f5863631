//! Fixed dry-run spec.
//!
//! Dry-run bypasses the backend but still runs the repair pipeline, so the
//! returned spec carries the same filled-in defaults a live generation
//! would.

use sketch_spec::{DesignSpec, Frame, Layout, Node};

pub fn mock_design_spec() -> DesignSpec {
    DesignSpec {
        page: "Mock Page".to_string(),
        frame: Frame {
            name: "Mock Frame".to_string(),
            width: 375,
            height: None,
            layout: Layout::Vertical,
            gap: 16,
            padding: 24,
            background: None,
            border_radius: None,
            border: None,
        },
        nodes: vec![
            Node::Text {
                content: "Welcome back".to_string(),
                font_size: Some(24),
                color: None,
            },
            Node::Container {
                layout: Layout::Vertical,
                gap: 8,
                padding: 12,
                children: vec![Node::Text {
                    content: "Enter your email".to_string(),
                    font_size: Some(14),
                    color: None,
                }],
                background: None,
                border_radius: None,
                border: None,
            },
            Node::Button {
                label: "Sign in".to_string(),
                background: None,
                text_color: None,
                border_radius: None,
            },
        ],
    }
}
