//! Directive assembly.
//!
//! `assemble_directive` is a pure function of the selected rules and the
//! generation context. Section order is part of the contract: callers and
//! tests rely on the exact sequence, so new sections go at a deliberate
//! position, never appended ad hoc.

use sketch_spec::{GenerationContext, UiStrictness};

use crate::docs::{LoadedRules, RuleSet};

const HEADER: &str = "You are generating a structured UI design specification \
from a product prompt. Produce a page with one root frame and a tree of text, \
button, and container nodes.";

const STRICT_LAYOUT_MARKER: &str =
    "MANDATORY: the layout rules below are binding requirements, not suggestions.";

const UX_GROUP_ELEMENTS: &str =
    "Group related elements into containers instead of placing them loose in the frame.";
const UX_FORM_CONTAINER: &str =
    "Wrap form fields and their submit button in a single vertical form container.";
const UX_HELPER_TEXT: &str =
    "Add short helper text under inputs that explains the expected value.";
const UX_FALLBACK: &str =
    "Compose the layout directly from the prompt; keep the hierarchy as flat as it can be.";

const FOOTER: &str = "Respond with a single JSON object matching the DesignSpec \
schema. Do not include prose, markdown fences, or comments.";

/// Fold the selected rules and options into one directive text block.
pub fn assemble_directive(rules: &LoadedRules, context: &GenerationContext) -> String {
    let mut out = String::with_capacity(2048);
    out.push_str(HEADER);
    out.push_str("\n\n");

    push_section(&mut out, "Global rules", &rules.base.rules);

    out.push_str("## Layout rules\n");
    if context.strict_layout {
        out.push_str(STRICT_LAYOUT_MARKER);
        out.push('\n');
    }
    push_bullets(&mut out, layout_rules(&rules.layout, context.ui_strictness));
    out.push('\n');

    push_section(
        &mut out,
        &format!("Device rules ({})", context.target_layout.as_str()),
        &rules.device.rules,
    );

    if let Some(baseline) = &rules.visual_baseline {
        push_section(&mut out, "Visual baseline", &baseline.rules);
    }

    for pattern in &rules.patterns {
        push_section(&mut out, &format!("Pattern: {}", pattern.name), &pattern.rules);
    }

    out.push_str("## Composition guidance\n");
    let ux = &context.ux_patterns;
    let mut any_ux = false;
    if ux.group_elements {
        push_bullet(&mut out, UX_GROUP_ELEMENTS);
        any_ux = true;
    }
    if ux.form_container {
        push_bullet(&mut out, UX_FORM_CONTAINER);
        any_ux = true;
    }
    if ux.helper_text {
        push_bullet(&mut out, UX_HELPER_TEXT);
        any_ux = true;
    }
    if !any_ux {
        push_bullet(&mut out, UX_FALLBACK);
    }
    out.push('\n');

    out.push_str("## Output format\n");
    out.push_str(FOOTER);
    out.push('\n');
    out
}

/// Strict variant when requested and present, else balanced when requested
/// and present, else the default rule list.
fn layout_rules(layout: &RuleSet, strictness: UiStrictness) -> &[String] {
    match strictness {
        UiStrictness::Strict => layout.strict_rules.as_deref().unwrap_or(&layout.rules),
        UiStrictness::Balanced => layout.balanced_rules.as_deref().unwrap_or(&layout.rules),
    }
}

fn push_section(out: &mut String, title: &str, rules: &[String]) {
    out.push_str("## ");
    out.push_str(title);
    out.push('\n');
    push_bullets(out, rules);
    out.push('\n');
}

fn push_bullets(out: &mut String, rules: &[String]) {
    for rule in rules {
        push_bullet(out, rule);
    }
}

fn push_bullet(out: &mut String, rule: &str) {
    out.push_str("- ");
    out.push_str(rule);
    out.push('\n');
}
