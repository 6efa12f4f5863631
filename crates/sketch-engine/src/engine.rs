//! Generation orchestrator.
//!
//! One request flows strictly forward: validate the inbound request, select
//! rules, assemble the directive, call the backend (or short-circuit to the
//! dry-run mock), validate the raw output against the schema, then run the
//! repair passes. No failure path returns a partially repaired spec.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use sketch_llm::{
    ChatMessage, Completion, CompletionBackend, CompletionOutcome, CompletionRequest, RetryConfig,
    request_completion, supports_temperature,
};
use sketch_rules::{RuleLoader, assemble_directive};
use sketch_spec::{DesignSpec, FieldViolation, GenerationContext, VisualUsageWarning, validate};

use crate::errors::EngineError;
use crate::events::{EngineEventKind, EngineEventSink};
use crate::mock::mock_design_spec;
use crate::repair::{classify_containers, fill_visual_defaults, repair_empty_text};

/// Fixed assistant message: the JSON shape the model must produce, with a
/// worked example.
const SHAPE_GUIDE: &str = r##"The DesignSpec JSON object has this shape:
{
  "page": "<page name>",
  "frame": { "name": "<frame name>", "width": <int>, "height": <int, optional>,
             "layout": "vertical" | "horizontal", "gap": <int>, "padding": <int>,
             "background": "#RRGGBB" (optional), "borderRadius": <int, optional>,
             "border": { "color": "#RRGGBB", "width": <int> } (optional) },
  "nodes": [ <node>, ... ]  // at least one
}
A node is one of:
  { "type": "text", "content": "<string>", "fontSize": <int, optional>, "color": "#RRGGBB" (optional) }
  { "type": "button", "label": "<string>", "background": "#RRGGBB" (optional),
    "textColor": "#RRGGBB" (optional), "borderRadius": <int, optional> }
  { "type": "container", "layout": "vertical" | "horizontal", "gap": <int>, "padding": <int>,
    "children": [ <node>, ... ] (at least one), "background": "#RRGGBB" (optional),
    "borderRadius": <int, optional>, "border": { "color": "#RRGGBB", "width": <int> } (optional) }

Worked example:
{
  "page": "Login",
  "frame": { "name": "Login Frame", "width": 375, "layout": "vertical", "gap": 16, "padding": 24 },
  "nodes": [
    { "type": "text", "content": "Welcome back", "fontSize": 24 },
    { "type": "container", "layout": "vertical", "gap": 8, "padding": 12,
      "children": [ { "type": "text", "content": "Enter your email", "fontSize": 14 } ] },
    { "type": "button", "label": "Sign in" }
  ]
}"##;

/// Engine-level configuration; model and retry policy.
#[derive(Clone, Debug, PartialEq)]
pub struct EngineConfig {
    pub model: String,
    pub temperature: f64,
    /// Models that reject a custom temperature; the field is omitted for
    /// them.
    pub no_temperature_models: Vec<String>,
    pub retry: RetryConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            model: "gpt-4o-mini".to_string(),
            temperature: 0.4,
            no_temperature_models: vec![
                "o1".to_string(),
                "o1-mini".to_string(),
                "o3".to_string(),
                "o3-mini".to_string(),
                "gpt-5".to_string(),
            ],
            retry: RetryConfig::default(),
        }
    }
}

/// Inbound generation request, as produced by the HTTP layer.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateRequest {
    pub prompt: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generation_context: Option<GenerationContext>,
    #[serde(default)]
    pub dry_run: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateResult {
    pub spec: DesignSpec,
    pub warnings: Vec<VisualUsageWarning>,
    /// Correlation id assigned by the engine, present on every event.
    pub request_id: String,
    pub retry_count: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub backend_request_id: Option<String>,
    pub dry_run: bool,
}

pub struct Engine {
    loader: Arc<RuleLoader>,
    backend: Arc<dyn CompletionBackend>,
    config: EngineConfig,
    events: EngineEventSink,
}

impl Engine {
    pub fn new(
        loader: Arc<RuleLoader>,
        backend: Arc<dyn CompletionBackend>,
        config: EngineConfig,
    ) -> Self {
        Self {
            loader,
            backend,
            config,
            events: EngineEventSink::default(),
        }
    }

    pub fn with_events(mut self, events: EngineEventSink) -> Self {
        self.events = events;
        self
    }

    /// Run one generation request through the full pipeline.
    pub async fn generate(&self, request: GenerateRequest) -> Result<GenerateResult, EngineError> {
        let request_id = Uuid::new_v4().to_string();
        validate_request(&request)?;

        self.events.emit(EngineEventKind::GenerationStarted {
            request_id: request_id.clone(),
            dry_run: request.dry_run,
            prompt_chars: request.prompt.chars().count(),
        });

        match self.run(&request, &request_id).await {
            Ok(result) => {
                self.events.emit(EngineEventKind::GenerationCompleted {
                    request_id,
                    node_count: result.spec.nodes.len(),
                    warning_count: result.warnings.len(),
                });
                Ok(result)
            }
            Err(error) => {
                self.events.emit(EngineEventKind::GenerationFailed {
                    request_id,
                    reason: error.to_string(),
                });
                Err(error)
            }
        }
    }

    async fn run(
        &self,
        request: &GenerateRequest,
        request_id: &str,
    ) -> Result<GenerateResult, EngineError> {
        let context = request.generation_context.clone().unwrap_or_default();
        let rules = self.loader.load_rules(&request.prompt, &context)?;
        let directive = assemble_directive(&rules, &context);
        self.events.emit(EngineEventKind::DirectiveAssembled {
            request_id: request_id.to_string(),
            directive_chars: directive.chars().count(),
            pattern_count: rules.patterns.len(),
        });

        let (raw_spec, retry_count, backend_request_id) = if request.dry_run {
            (mock_design_spec(), 0, None)
        } else {
            let (completion, retry_count) =
                self.call_backend(request, request_id, &directive).await?;
            let backend_request_id = completion.backend_request_id.clone();
            (parse_completion(&completion)?, retry_count, backend_request_id)
        };

        // Repair passes run in fixed order; classification reads attributes
        // the defaults pass fills in, so it goes last.
        let repaired_nodes = repair_empty_text(&raw_spec.nodes);
        let spec = fill_visual_defaults(
            &DesignSpec {
                nodes: repaired_nodes,
                ..raw_spec
            },
            context.target_layout,
        );
        let warnings = classify_containers(&spec.nodes);

        Ok(GenerateResult {
            spec,
            warnings,
            request_id: request_id.to_string(),
            retry_count,
            backend_request_id,
            dry_run: request.dry_run,
        })
    }

    async fn call_backend(
        &self,
        request: &GenerateRequest,
        request_id: &str,
        directive: &str,
    ) -> Result<(Completion, u32), EngineError> {
        let temperature = supports_temperature(&self.config.model, &self.config.no_temperature_models)
            .then_some(self.config.temperature);
        let completion_request = CompletionRequest {
            model: self.config.model.clone(),
            messages: vec![
                ChatMessage::system(directive),
                ChatMessage::assistant(SHAPE_GUIDE),
                ChatMessage::user(&request.prompt),
            ],
            temperature,
            json_object: true,
        };

        let result =
            request_completion(self.backend.as_ref(), &completion_request, &self.config.retry)
                .await;
        self.events.emit(EngineEventKind::BackendCompleted {
            request_id: request_id.to_string(),
            outcome: result.outcome.to_string(),
            retry_count: result.retry_count,
            backend_request_id: result.backend_request_id.clone(),
        });

        match result.outcome {
            CompletionOutcome::Success => match result.completion {
                Some(completion) => Ok((completion, result.retry_count)),
                None => Err(EngineError::EmptyResponse),
            },
            outcome => Err(EngineError::Upstream {
                outcome,
                retry_count: result.retry_count,
                reason: result.error.unwrap_or_else(|| "backend failed".to_string()),
            }),
        }
    }
}

fn validate_request(request: &GenerateRequest) -> Result<(), EngineError> {
    let mut violations = Vec::new();
    if request.prompt.trim().is_empty() {
        violations.push(FieldViolation::new("prompt", "must not be empty"));
    }
    if violations.is_empty() {
        Ok(())
    } else {
        Err(EngineError::InvalidRequest { violations })
    }
}

fn parse_completion(completion: &Completion) -> Result<DesignSpec, EngineError> {
    let content = completion.content.trim();
    if content.is_empty() {
        return Err(EngineError::EmptyResponse);
    }
    // Models occasionally wrap the object in fences or prose despite the
    // JSON-only instruction; take the outermost object before parsing.
    let json_text = extract_json_object(content)
        .ok_or_else(|| EngineError::InvalidJson("no JSON object found in response".to_string()))?;
    let value: serde_json::Value =
        serde_json::from_str(json_text).map_err(|error| EngineError::InvalidJson(error.to_string()))?;
    Ok(validate(&value)?)
}

fn extract_json_object(raw: &str) -> Option<&str> {
    let start = raw.find('{')?;
    let end = raw.rfind('}')?;
    (end > start).then(|| &raw[start..=end])
}
