use serde::{Deserialize, Serialize};

/// Device class a generation targets. Drives device rule selection and the
/// default frame height.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetLayout {
    #[default]
    Mobile,
    Tablet,
    Desktop,
}

impl TargetLayout {
    pub fn as_str(&self) -> &'static str {
        match self {
            TargetLayout::Mobile => "mobile",
            TargetLayout::Tablet => "tablet",
            TargetLayout::Desktop => "desktop",
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UiStrictness {
    Strict,
    #[default]
    Balanced,
}

/// UX guidance toggles forwarded into the assembled directive.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UxPatterns {
    pub group_elements: bool,
    pub form_container: bool,
    pub helper_text: bool,
}

/// Per-request generation options consumed by rule selection and assembly.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GenerationContext {
    pub target_layout: TargetLayout,
    pub ui_strictness: UiStrictness,
    pub ux_patterns: UxPatterns,
    pub visual_baseline: bool,
    pub strict_layout: bool,
}

impl Default for GenerationContext {
    fn default() -> Self {
        Self {
            target_layout: TargetLayout::default(),
            ui_strictness: UiStrictness::default(),
            ux_patterns: UxPatterns::default(),
            visual_baseline: true,
            strict_layout: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generation_context_defaults_match_contract() {
        let context = GenerationContext::default();
        assert_eq!(context.target_layout, TargetLayout::Mobile);
        assert_eq!(context.ui_strictness, UiStrictness::Balanced);
        assert!(context.visual_baseline);
        assert!(!context.strict_layout);
    }

    #[test]
    fn generation_context_partial_json_fills_defaults() {
        let context: GenerationContext =
            serde_json::from_str(r#"{"targetLayout":"tablet"}"#).expect("context should parse");
        assert_eq!(context.target_layout, TargetLayout::Tablet);
        assert!(context.visual_baseline);
        assert!(!context.ux_patterns.form_container);
    }
}
