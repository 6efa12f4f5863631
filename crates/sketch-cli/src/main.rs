use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use sketch_engine::{
    Engine, EngineConfig, EngineEvent, EngineEventSink, GenerateRequest, engine_event_channel,
};
use sketch_llm::{CompletionBackend, OpenAiBackend};
use sketch_rules::{RuleLoader, assemble_directive};
use sketch_spec::{GenerationContext, TargetLayout, UiStrictness, UxPatterns, validate};

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

#[derive(Parser, Debug)]
#[command(name = "sketch")]
#[command(about = "Generate schema-validated DesignSpec documents from UI prompts")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run a prompt through the full generation pipeline.
    Generate(GenerateArgs),
    /// Validate a DesignSpec JSON file against the schema.
    Validate(ValidateArgs),
    /// Print the assembled directive for a prompt without calling the backend.
    Prompt(PromptArgs),
}

#[derive(clap::Args, Debug)]
struct GenerateArgs {
    #[arg(long)]
    prompt: Option<String>,
    #[arg(long)]
    prompt_file: Option<PathBuf>,
    #[arg(long, action = ArgAction::SetTrue)]
    dry_run: bool,
    #[command(flatten)]
    context: ContextArgs,
    #[arg(long)]
    rules_dir: Option<PathBuf>,
    #[arg(long)]
    model: Option<String>,
    #[arg(long, action = ArgAction::SetTrue)]
    event_json: bool,
    #[arg(long = "no-stream-events", action = ArgAction::SetTrue)]
    no_stream_events: bool,
    #[arg(long, action = ArgAction::SetTrue)]
    pretty: bool,
    #[arg(long)]
    out: Option<PathBuf>,
}

#[derive(clap::Args, Debug)]
struct ValidateArgs {
    #[arg(long)]
    file: PathBuf,
}

#[derive(clap::Args, Debug)]
struct PromptArgs {
    #[arg(long)]
    prompt: String,
    #[command(flatten)]
    context: ContextArgs,
    #[arg(long)]
    rules_dir: Option<PathBuf>,
}

#[derive(clap::Args, Debug)]
struct ContextArgs {
    #[arg(long, value_enum, default_value_t = TargetArg::Mobile)]
    target: TargetArg,
    #[arg(long, value_enum, default_value_t = StrictnessArg::Balanced)]
    strictness: StrictnessArg,
    #[arg(long, action = ArgAction::SetTrue)]
    group_elements: bool,
    #[arg(long, action = ArgAction::SetTrue)]
    form_container: bool,
    #[arg(long, action = ArgAction::SetTrue)]
    helper_text: bool,
    #[arg(long = "no-visual-baseline", action = ArgAction::SetTrue)]
    no_visual_baseline: bool,
    #[arg(long, action = ArgAction::SetTrue)]
    strict_layout: bool,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum TargetArg {
    Mobile,
    Tablet,
    Desktop,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum StrictnessArg {
    Strict,
    Balanced,
}

impl ContextArgs {
    fn to_context(&self) -> GenerationContext {
        GenerationContext {
            target_layout: match self.target {
                TargetArg::Mobile => TargetLayout::Mobile,
                TargetArg::Tablet => TargetLayout::Tablet,
                TargetArg::Desktop => TargetLayout::Desktop,
            },
            ui_strictness: match self.strictness {
                StrictnessArg::Strict => UiStrictness::Strict,
                StrictnessArg::Balanced => UiStrictness::Balanced,
            },
            ux_patterns: UxPatterns {
                group_elements: self.group_elements,
                form_container: self.form_container,
                helper_text: self.helper_text,
            },
            visual_baseline: !self.no_visual_baseline,
            strict_layout: self.strict_layout,
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Generate(args) => generate_command(args).await,
        Commands::Validate(args) => validate_command(args),
        Commands::Prompt(args) => prompt_command(args),
    };

    match result {
        Ok(code) => code,
        Err(error) => {
            eprintln!("error: {error}");
            ExitCode::from(1)
        }
    }
}

async fn generate_command(args: GenerateArgs) -> Result<ExitCode, String> {
    let prompt = load_prompt(args.prompt.as_deref(), args.prompt_file.as_deref())?;
    let loader = build_loader(args.rules_dir.clone())?;
    let backend = build_backend(args.dry_run)?;

    let mut config = EngineConfig::default();
    if let Some(model) = args.model.or_else(|| std::env::var("SKETCH_MODEL").ok()) {
        config.model = model;
    }

    let (event_sink, event_task) = event_stream(!args.no_stream_events, args.event_json);
    let engine = Engine::new(Arc::new(loader), backend, config).with_events(event_sink);

    let result = engine
        .generate(GenerateRequest {
            prompt,
            generation_context: Some(args.context.to_context()),
            dry_run: args.dry_run,
        })
        .await;

    // Dropping the engine closes the event channel so the stream task can
    // drain and finish.
    drop(engine);
    if let Some(task) = event_task {
        task.await.map_err(|error| error.to_string())?;
    }

    let result = match result {
        Ok(result) => result,
        Err(error) => {
            eprintln!("generation failed: {error}");
            return Ok(ExitCode::from(2));
        }
    };

    for warning in &result.warnings {
        eprintln!(
            "warning: {} [{}]: {}",
            warning.path,
            warning.properties.join(", "),
            warning.reason
        );
    }

    let spec_json = if args.pretty {
        serde_json::to_string_pretty(&result.spec)
    } else {
        serde_json::to_string(&result.spec)
    }
    .map_err(|error| error.to_string())?;

    match args.out {
        Some(path) => std::fs::write(&path, spec_json)
            .map_err(|error| format!("failed to write {}: {error}", path.display()))?,
        None => println!("{spec_json}"),
    }
    Ok(ExitCode::SUCCESS)
}

fn validate_command(args: ValidateArgs) -> Result<ExitCode, String> {
    let text = std::fs::read_to_string(&args.file)
        .map_err(|error| format!("failed to read {}: {error}", args.file.display()))?;
    let value: serde_json::Value =
        serde_json::from_str(&text).map_err(|error| format!("not valid JSON: {error}"))?;
    match validate(&value) {
        Ok(spec) => {
            println!("valid DesignSpec: page '{}', {} node(s)", spec.page, spec.nodes.len());
            Ok(ExitCode::SUCCESS)
        }
        Err(error) => {
            eprintln!("{error}");
            for violation in &error.violations {
                eprintln!("  {}: {}", violation.path, violation.message);
            }
            Ok(ExitCode::from(1))
        }
    }
}

fn prompt_command(args: PromptArgs) -> Result<ExitCode, String> {
    let loader = build_loader(args.rules_dir)?;
    let context = args.context.to_context();
    let rules = loader
        .load_rules(&args.prompt, &context)
        .map_err(|error| error.to_string())?;
    print!("{}", assemble_directive(&rules, &context));
    Ok(ExitCode::SUCCESS)
}

fn load_prompt(inline: Option<&str>, file: Option<&std::path::Path>) -> Result<String, String> {
    match (inline, file) {
        (Some(prompt), None) => Ok(prompt.to_string()),
        (None, Some(path)) => std::fs::read_to_string(path)
            .map_err(|error| format!("failed to read {}: {error}", path.display())),
        (Some(_), Some(_)) => Err("pass either --prompt or --prompt-file, not both".to_string()),
        (None, None) => Err("pass --prompt or --prompt-file".to_string()),
    }
}

fn build_loader(rules_dir: Option<PathBuf>) -> Result<RuleLoader, String> {
    match rules_dir {
        Some(dir) => Ok(RuleLoader::new(dir)),
        None => RuleLoader::discover().map_err(|error| error.to_string()),
    }
}

fn build_backend(dry_run: bool) -> Result<Arc<dyn CompletionBackend>, String> {
    match OpenAiBackend::from_env() {
        Some(backend) => Ok(Arc::new(backend)),
        // Dry runs never reach the backend; a stub keeps them usable
        // without credentials.
        None if dry_run => Ok(Arc::new(UnconfiguredBackend)),
        None => Err("OPENAI_API_KEY is not set".to_string()),
    }
}

struct UnconfiguredBackend;

#[async_trait::async_trait]
impl CompletionBackend for UnconfiguredBackend {
    fn name(&self) -> &str {
        "unconfigured"
    }

    async fn complete(
        &self,
        _request: sketch_llm::CompletionRequest,
    ) -> Result<sketch_llm::Completion, sketch_llm::BackendError> {
        Err(sketch_llm::BackendError::Network(
            "no backend configured".to_string(),
        ))
    }
}

fn event_stream(
    enabled: bool,
    as_json: bool,
) -> (EngineEventSink, Option<tokio::task::JoinHandle<()>>) {
    if !enabled {
        return (EngineEventSink::default(), None);
    }
    let (tx, mut rx) = engine_event_channel();
    let task = tokio::spawn(async move {
        while let Some(event) = rx.recv().await {
            print_event(&event, as_json);
        }
    });
    (EngineEventSink::with_sender(tx), Some(task))
}

fn print_event(event: &EngineEvent, as_json: bool) {
    if as_json {
        if let Ok(line) = serde_json::to_string(event) {
            eprintln!("{line}");
        }
    } else {
        eprintln!("[{}] {:?}", event.timestamp, event.kind);
    }
}
