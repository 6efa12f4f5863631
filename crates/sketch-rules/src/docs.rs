use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A named list of rule lines, optionally with strict/balanced variants.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleSet {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub rules: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub strict_rules: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub balanced_rules: Option<Vec<String>>,
}

/// A rule set gated behind prompt-keyword detection.
///
/// A pattern with no keywords never matches.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatternRuleSet {
    pub name: String,
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(default)]
    pub rules: Vec<String>,
}

impl PatternRuleSet {
    /// Case-insensitive substring match of any keyword against the prompt.
    pub fn matches(&self, prompt: &str) -> bool {
        let prompt = prompt.to_lowercase();
        self.keywords
            .iter()
            .any(|keyword| !keyword.is_empty() && prompt.contains(&keyword.to_lowercase()))
    }
}

/// Every rule document in the rules directory, loaded once per process.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RuleLibrary {
    pub base: RuleSet,
    pub layout: RuleSet,
    pub devices: BTreeMap<String, RuleSet>,
    pub visual_baseline: Option<RuleSet>,
    pub patterns: Vec<PatternRuleSet>,
}

/// The subset of the library applicable to one generation request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LoadedRules {
    pub base: RuleSet,
    pub layout: RuleSet,
    pub device: RuleSet,
    pub visual_baseline: Option<RuleSet>,
    pub patterns: Vec<PatternRuleSet>,
}
