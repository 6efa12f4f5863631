use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use thiserror::Error;

use sketch_spec::GenerationContext;

use crate::docs::{LoadedRules, PatternRuleSet, RuleLibrary, RuleSet};

/// Environment variable overriding the rules directory.
pub const RULES_DIR_ENV: &str = "SKETCH_RULES_DIR";

const REQUIRED_BASE: &str = "base.json";
const REQUIRED_LAYOUT: &str = "layout.json";
const REQUIRED_DEVICES: &str = "devices.json";
const OPTIONAL_VISUAL_BASELINE: &str = "visual-baseline.json";
const PATTERNS_DIR: &str = "patterns";

#[derive(Debug, Error)]
pub enum RuleError {
    #[error("rules directory not found; set {RULES_DIR_ENV} or pass an explicit directory")]
    DirectoryNotFound,
    #[error("failed to read rule document '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse rule document '{path}': {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("no device rules for target '{0}'")]
    UnknownDevice(String),
}

/// Loads rule documents from a directory, caching the parsed library.
///
/// Rule documents are immutable once deployed, so the cache is populated
/// lazily and shared; concurrent population races are harmless because every
/// population produces equal values. Tests get isolation by constructing a
/// fresh loader over their own directory or calling [`RuleLoader::reset`].
pub struct RuleLoader {
    root: PathBuf,
    cache: Mutex<Option<Arc<RuleLibrary>>>,
}

impl RuleLoader {
    /// Loader over an explicit rules directory.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            cache: Mutex::new(None),
        }
    }

    /// Resolve the rules directory: explicit env override first, then an
    /// upward walk from the current directory looking for `rules/base.json`.
    pub fn discover() -> Result<Self, RuleError> {
        if let Ok(dir) = std::env::var(RULES_DIR_ENV) {
            let dir = dir.trim();
            if !dir.is_empty() {
                return Ok(Self::new(dir));
            }
        }

        let mut current = std::env::current_dir().map_err(|source| RuleError::Io {
            path: ".".to_string(),
            source,
        })?;
        loop {
            let candidate = current.join("rules");
            if candidate.join(REQUIRED_BASE).is_file() {
                return Ok(Self::new(candidate));
            }
            if !current.pop() {
                return Err(RuleError::DirectoryNotFound);
            }
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Drop the cached library so the next access re-reads from disk.
    pub fn reset(&self) {
        *self.cache.lock().expect("rule cache lock") = None;
    }

    /// The full parsed library, loading it on first access.
    pub fn library(&self) -> Result<Arc<RuleLibrary>, RuleError> {
        {
            let cache = self.cache.lock().expect("rule cache lock");
            if let Some(library) = cache.as_ref() {
                return Ok(Arc::clone(library));
            }
        }
        let library = Arc::new(self.read_library()?);
        let mut cache = self.cache.lock().expect("rule cache lock");
        if cache.is_none() {
            *cache = Some(Arc::clone(&library));
        }
        Ok(cache.as_ref().map(Arc::clone).unwrap_or(library))
    }

    /// Select the rule subset applicable to one request.
    ///
    /// Base, layout, and device rules always load; the visual-baseline set
    /// only when the context asks for it; patterns only when a detection
    /// keyword appears in the prompt.
    pub fn load_rules(
        &self,
        prompt: &str,
        context: &GenerationContext,
    ) -> Result<LoadedRules, RuleError> {
        let library = self.library()?;
        let target = context.target_layout.as_str();
        let device = library
            .devices
            .get(target)
            .cloned()
            .ok_or_else(|| RuleError::UnknownDevice(target.to_string()))?;

        Ok(LoadedRules {
            base: library.base.clone(),
            layout: library.layout.clone(),
            device,
            visual_baseline: context
                .visual_baseline
                .then(|| library.visual_baseline.clone())
                .flatten(),
            patterns: library
                .patterns
                .iter()
                .filter(|pattern| pattern.matches(prompt))
                .cloned()
                .collect(),
        })
    }

    fn read_library(&self) -> Result<RuleLibrary, RuleError> {
        let base: RuleSet = self.read_required(REQUIRED_BASE)?;
        let layout: RuleSet = self.read_required(REQUIRED_LAYOUT)?;
        let devices = self.read_required(REQUIRED_DEVICES)?;
        let visual_baseline = self.read_optional(OPTIONAL_VISUAL_BASELINE);
        let patterns = self.read_patterns();
        Ok(RuleLibrary {
            base,
            layout,
            devices,
            visual_baseline,
            patterns,
        })
    }

    fn read_required<T: serde::de::DeserializeOwned>(&self, name: &str) -> Result<T, RuleError> {
        let path = self.root.join(name);
        let text = fs::read_to_string(&path).map_err(|source| RuleError::Io {
            path: path.display().to_string(),
            source,
        })?;
        serde_json::from_str(&text).map_err(|source| RuleError::Parse {
            path: path.display().to_string(),
            source,
        })
    }

    fn read_optional(&self, name: &str) -> Option<RuleSet> {
        let text = fs::read_to_string(self.root.join(name)).ok()?;
        serde_json::from_str(&text).ok()
    }

    // Pattern documents are best-effort: missing or unreadable files are
    // skipped so one broken pattern cannot take generation down.
    fn read_patterns(&self) -> Vec<PatternRuleSet> {
        let dir = self.root.join(PATTERNS_DIR);
        let Ok(entries) = fs::read_dir(&dir) else {
            return Vec::new();
        };
        let mut paths: Vec<PathBuf> = entries
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| path.extension().is_some_and(|ext| ext == "json"))
            .collect();
        paths.sort();

        paths
            .into_iter()
            .filter_map(|path| {
                let text = fs::read_to_string(&path).ok()?;
                serde_json::from_str(&text).ok()
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sketch_spec::TargetLayout;
    use std::fs;
    use tempfile::TempDir;

    fn write_rule_docs(dir: &Path) {
        fs::write(
            dir.join("base.json"),
            r#"{ "name": "base", "rules": ["Use a single page", "Keep copy short"] }"#,
        )
        .expect("base.json should write");
        fs::write(
            dir.join("layout.json"),
            r#"{
                "name": "layout",
                "rules": ["Default layout rule"],
                "strictRules": ["Strict layout rule"],
                "balancedRules": ["Balanced layout rule"]
            }"#,
        )
        .expect("layout.json should write");
        fs::write(
            dir.join("devices.json"),
            r#"{
                "mobile": { "name": "mobile", "rules": ["Frame width 375"] },
                "tablet": { "name": "tablet", "rules": ["Frame width 768"] },
                "desktop": { "name": "desktop", "rules": ["Frame width 1280"] }
            }"#,
        )
        .expect("devices.json should write");
        fs::write(
            dir.join("visual-baseline.json"),
            r#"{ "name": "visual-baseline", "rules": ["Neutral backgrounds"] }"#,
        )
        .expect("visual-baseline.json should write");
        fs::create_dir_all(dir.join("patterns")).expect("patterns dir should create");
        fs::write(
            dir.join("patterns/auth-form.json"),
            r#"{
                "name": "auth-form",
                "keywords": ["login", "sign in", "signup", "password"],
                "rules": ["Group credentials in one container"]
            }"#,
        )
        .expect("auth-form.json should write");
    }

    fn loader_with_docs() -> (TempDir, RuleLoader) {
        let dir = TempDir::new().expect("temp dir should create");
        write_rule_docs(dir.path());
        let loader = RuleLoader::new(dir.path());
        (dir, loader)
    }

    #[test]
    fn load_rules_tablet_expected_tablet_device_rules_only() {
        let (_dir, loader) = loader_with_docs();
        let context = GenerationContext {
            target_layout: TargetLayout::Tablet,
            ..GenerationContext::default()
        };
        let rules = loader
            .load_rules("a dashboard", &context)
            .expect("rules should load");
        assert_eq!(rules.device.rules, vec!["Frame width 768".to_string()]);
    }

    #[test]
    fn load_rules_prompt_keyword_expected_pattern_included() {
        let (_dir, loader) = loader_with_docs();
        let rules = loader
            .load_rules("Create a login form", &GenerationContext::default())
            .expect("rules should load");
        assert_eq!(rules.patterns.len(), 1);
        assert_eq!(rules.patterns[0].name, "auth-form");
    }

    #[test]
    fn load_rules_no_keyword_expected_no_patterns() {
        let (_dir, loader) = loader_with_docs();
        let rules = loader
            .load_rules("Create a pricing table", &GenerationContext::default())
            .expect("rules should load");
        assert!(rules.patterns.is_empty());
    }

    #[test]
    fn load_rules_visual_baseline_disabled_expected_none() {
        let (_dir, loader) = loader_with_docs();
        let context = GenerationContext {
            visual_baseline: false,
            ..GenerationContext::default()
        };
        let rules = loader
            .load_rules("anything", &context)
            .expect("rules should load");
        assert!(rules.visual_baseline.is_none());
    }

    #[test]
    fn load_rules_missing_base_expected_fatal_error() {
        let dir = TempDir::new().expect("temp dir should create");
        let loader = RuleLoader::new(dir.path());
        let error = loader
            .load_rules("anything", &GenerationContext::default())
            .expect_err("missing base should fail");
        assert!(matches!(error, RuleError::Io { .. }));
    }

    #[test]
    fn load_rules_broken_pattern_expected_skipped_silently() {
        let (dir, loader) = loader_with_docs();
        fs::write(dir.path().join("patterns/broken.json"), "{ not json")
            .expect("broken pattern should write");
        let rules = loader
            .load_rules("Create a login form", &GenerationContext::default())
            .expect("rules should still load");
        assert_eq!(rules.patterns.len(), 1);
    }

    #[test]
    fn library_is_cached_until_reset() {
        let (dir, loader) = loader_with_docs();
        let before = loader.library().expect("library should load");
        fs::write(
            dir.path().join("base.json"),
            r#"{ "name": "base", "rules": ["Changed"] }"#,
        )
        .expect("base.json should rewrite");

        let cached = loader.library().expect("library should load from cache");
        assert_eq!(before.base.rules, cached.base.rules);

        loader.reset();
        let reloaded = loader.library().expect("library should reload");
        assert_eq!(reloaded.base.rules, vec!["Changed".to_string()]);
    }
}
