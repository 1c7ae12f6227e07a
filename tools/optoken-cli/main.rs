use clap::{Parser, Subcommand, ValueEnum};
use optoken::prelude::*;
use serde_json::json;
use std::fs;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

/// Define a CLI-specific enum for clap to parse.
#[derive(Debug, Clone, Copy, ValueEnum)]
enum RouteCli {
    Activation,
    Reduction,
    Shipment,
}

impl From<RouteCli> for Route {
    fn from(route: RouteCli) -> Self {
        match route {
            RouteCli::Activation => Route::Activation,
            RouteCli::Reduction => Route::Reduction,
            RouteCli::Shipment => Route::Shipment,
        }
    }
}

/// Inspect and edit operation-token programs from the command line
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Parse a program string and print its instructions as JSON
    Parse {
        program: String,
        /// Target id used for entries with an empty target field
        #[arg(short, long, default_value = "")]
        fallback: String,
    },
    /// Remove entries whose target is not in the known set
    Sanitize {
        program: String,
        /// Comma-separated list of known entity ids
        #[arg(short, long, value_delimiter = ',')]
        known: Vec<String>,
    },
    /// Print the entity/action tree of a program
    Tree {
        program: String,
        #[arg(short, long, default_value = "")]
        fallback: String,
        #[arg(short, long, value_enum, default_value = "activation")]
        route: RouteCli,
    },
    /// Load a fixture store, apply a list of edit commands and commit the result
    Apply {
        /// Path to the store fixture JSON file
        #[arg(long)]
        fixture: String,
        #[arg(long)]
        entity: String,
        #[arg(long, value_enum)]
        route: RouteCli,
        /// Path to a JSON array of edit commands
        #[arg(long)]
        edits: String,
        /// Optional path to an editor config JSON file
        #[arg(long)]
        config: Option<String>,
    },
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Command::Parse { program, fallback } => run_parse(&program, &fallback),
        Command::Sanitize { program, known } => {
            let known: AHashSet<String> = known.into_iter().collect();
            println!("{}", sanitize(&program, &known));
        }
        Command::Tree {
            program,
            fallback,
            route,
        } => run_tree(&program, &fallback, route.into()),
        Command::Apply {
            fixture,
            entity,
            route,
            edits,
            config,
        } => run_apply(&fixture, &entity, route.into(), &edits, config.as_deref()).await,
    }
}

fn run_parse(program: &str, fallback: &str) {
    let parsed = parse(program, fallback);
    let passthrough: Vec<&str> = parsed.passthrough.iter().map(|p| p.raw.as_str()).collect();
    let warnings: Vec<String> = parsed.warnings.iter().map(|w| w.to_string()).collect();
    print_json(&json!({
        "instructions": parsed.instructions,
        "passthrough": passthrough,
        "warnings": warnings,
    }));
}

fn run_tree(program: &str, fallback: &str, route: Route) {
    let tree = ProgramTree::from_program(program, fallback, route, &EditorConfig::default());
    for row in tree.rows() {
        match row {
            TreeRow::Entity { id, label } => println!("{id} {label}"),
            TreeRow::Action {
                id, instruction, ..
            } => println!(
                "  {id} {}",
                instruction.to_token().unwrap_or_else(|| "<draft>".to_string())
            ),
            TreeRow::AppendAction { .. } => println!("  + action"),
            TreeRow::AppendEntity => println!("+ entity"),
        }
    }
    for entry in tree.passthrough() {
        println!("= {}", entry.raw);
    }
}

async fn run_apply(
    fixture_path: &str,
    entity_id: &str,
    route: Route,
    edits_path: &str,
    config_path: Option<&str>,
) {
    let fixture = read_file(fixture_path);
    let store = MemoryStore::from_json(&fixture).unwrap_or_else(|e| {
        exit_with_error(&format!(
            "Failed to parse fixture '{}': {}",
            fixture_path, e
        ))
    });
    let commands: Vec<EditCommand> = serde_json::from_str(&read_file(edits_path))
        .unwrap_or_else(|e| exit_with_error(&format!("Failed to parse edits JSON: {}", e)));
    let config = match config_path {
        Some(path) => EditorConfig::from_file(path)
            .unwrap_or_else(|e| exit_with_error(&e.to_string())),
        None => EditorConfig::default(),
    };

    let session = EditorSession::open(Arc::new(store), config)
        .await
        .unwrap_or_else(|e| exit_with_error(&format!("Failed to open session: {}", e)));
    let token = session.select(entity_id, route).await;
    if let Err(e) = session.load(token).await {
        exit_with_error(&format!("Failed to load '{}': {}", entity_id, e));
    }

    for command in commands {
        if let Err(e) = session.apply(command.clone()).await {
            exit_with_error(&format!("Edit {:?} failed: {}", command, e));
        }
    }

    let outcome = session
        .commit()
        .await
        .unwrap_or_else(|e| exit_with_error(&format!("Commit failed: {}", e)));
    match outcome {
        CommitOutcome::NoChange => print_json(&json!({ "outcome": "no-change" })),
        CommitOutcome::Committed { program, postops } => print_json(&json!({
            "outcome": "committed",
            "program": program,
            "postops": postops,
        })),
        CommitOutcome::Failed(failure) => {
            let issues = match &failure {
                CommitFailure::Invalid(issues) => issues.clone(),
                CommitFailure::Store(_) => Vec::new(),
            };
            print_json(&json!({
                "outcome": "failed",
                "reason": failure.to_string(),
                "issues": issues,
            }));
            std::process::exit(2);
        }
    }
}

fn read_file(path: &str) -> String {
    fs::read_to_string(path)
        .unwrap_or_else(|e| exit_with_error(&format!("Failed to read file '{}': {}", path, e)))
}

fn print_json(value: &serde_json::Value) {
    match serde_json::to_string_pretty(value) {
        Ok(text) => println!("{text}"),
        Err(e) => exit_with_error(&format!("Failed to serialize output: {}", e)),
    }
}

fn exit_with_error(message: &str) -> ! {
    eprintln!("\nError: {}", message);
    std::process::exit(1);
}
