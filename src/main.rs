//! chartstyle - Chart layout and style injection

use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing::Level;
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

use chartstyle::{
    ApplyRequest, Config, JsonFileStore, MemoryNode, PluginController, StyleOverrides,
    TemplateLibrary, apply_summary, extract_styles, resolve_styles,
};

#[derive(Parser)]
#[command(name = "chartstyle")]
#[command(version, about = "Chart layout and style injection", long_about = None)]
#[command(after_help = "EXAMPLES:
    chartstyle resolve request.json               Print the resolved styles
    chartstyle apply request.json -s scene.json   Apply to a scene and print it
    chartstyle template save \"Dark\" -p dark.json  Save a template")]
struct Cli {
    /// Config file (TOML)
    #[arg(short, long, global = true, default_value = chartstyle::DEFAULT_CONFIG_FILE)]
    config: PathBuf,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, global = true)]
    log_level: Option<String>,

    /// Template store, overriding the config file
    #[arg(long, global = true)]
    store: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve the styles of an apply request without touching a scene
    Resolve {
        /// Apply request (JSON)
        request: PathBuf,
        /// Scene to capture snapshots from
        #[arg(short, long)]
        scene: Option<PathBuf>,
    },
    /// Apply a request to a scene
    Apply {
        /// Apply request (JSON)
        request: PathBuf,
        /// Scene (JSON)
        #[arg(short, long)]
        scene: PathBuf,
        /// Write the updated scene here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Manage saved templates
    Template {
        #[command(subcommand)]
        command: TemplateCommands,
    },
    /// Handle one UI message against a scene and print the replies
    Message {
        /// The message (JSON)
        message: String,
        /// Scene (JSON)
        #[arg(short, long)]
        scene: Option<PathBuf>,
    },
}

#[derive(Subcommand)]
enum TemplateCommands {
    List,
    Save {
        name: String,
        /// Style payload (JSON); empty when omitted
        #[arg(short, long)]
        payload: Option<PathBuf>,
    },
    Rename { id: Uuid, name: String },
    Delete { id: Uuid },
}

fn setup_logging(level: &str) {
    let level = match level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(level.to_string()))
        .with_writer(std::io::stderr)
        .without_time()
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match Config::load(&cli.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("error: {e}");
            return ExitCode::FAILURE;
        }
    };
    setup_logging(cli.log_level.as_deref().unwrap_or(&config.log_level));

    match run(cli, config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> chartstyle::Result<T> {
    let text = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&text)?)
}

fn run(cli: Cli, config: Config) -> chartstyle::Result<()> {
    let store = JsonFileStore::new(cli.store.unwrap_or_else(|| config.template_store.clone()));

    match cli.command {
        Commands::Resolve { request, scene } => {
            let request: ApplyRequest = read_json(&request)?;
            let mut extracted = request.extracted().cloned().unwrap_or_default();
            if let Some(scene) = scene {
                let scene: MemoryNode = read_json(&scene)?;
                extracted = extract_styles(&scene, request.chart.chart_type).or(extracted);
            }
            let resolved =
                resolve_styles(&request.explicit(), &extracted, request.chart.series_count());
            println!("{}", serde_json::to_string_pretty(&resolved)?);
        }
        Commands::Apply {
            request,
            scene,
            output,
        } => {
            let request: ApplyRequest = read_json(&request)?;
            let scene: MemoryNode = read_json(&scene)?;
            let mut controller = PluginController::new(scene, store, config.apply_options());
            let outcome = controller.apply(&request)?;
            eprintln!("{}", apply_summary(&outcome.chart));

            let scene = serde_json::to_string_pretty(controller.scene())?;
            match output {
                Some(path) => fs::write(path, scene)?,
                None => println!("{scene}"),
            }
        }
        Commands::Template { command } => {
            let library = TemplateLibrary::new(store);
            match command {
                TemplateCommands::List => {
                    for item in library.list()? {
                        println!("{}  {}  {}", item.id, item.updated_at.to_rfc3339(), item.name);
                    }
                }
                TemplateCommands::Save { name, payload } => {
                    let payload = match payload {
                        Some(path) => {
                            StyleOverrides::from_raw(&read_json::<serde_json::Value>(&path)?)
                        }
                        None => StyleOverrides::default(),
                    };
                    let item = library.save(&name, payload)?;
                    println!("{}", item.id);
                }
                TemplateCommands::Rename { id, name } => {
                    library.rename(id, &name)?;
                }
                TemplateCommands::Delete { id } => {
                    library.delete(id)?;
                }
            }
        }
        Commands::Message { message, scene } => {
            let scene = match scene {
                Some(path) => read_json(&path)?,
                None => MemoryNode::default(),
            };
            let mut controller = PluginController::new(scene, store, config.apply_options());
            for reply in controller.handle_text(&message) {
                println!("{}", serde_json::to_string(&reply)?);
            }
        }
    }

    Ok(())
}
