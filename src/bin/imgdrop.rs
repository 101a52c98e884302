use clap::{Parser, Subcommand};
use imgdrop::actions::FunctionHandler;
use imgdrop::actions::postimage::PostImageUploaderAction;
use imgdrop::config::{ApiKeyProvider, AppConfig, ChainedKeyProvider, EnvKeyProvider};
use imgdrop::postimage::driver::ChromiumFormDriver;
use imgdrop::runtime::context::Context;
use imgdrop::standard_registry;
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use anyhow::Result;
use tracing::info;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the YAML config file (API keys, endpoints)
    #[arg(long, short, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List registered nodes
    List,

    /// Invoke a node by name with string inputs
    Run {
        /// Node name, e.g. gitee_image_uploader
        node: String,

        /// Inputs (key=value)
        #[arg(long, short = 'D', value_parser = parse_key_val)]
        inputs: Vec<(String, String)>,
    },

    /// Upload images (up to 8) to a Gitee repository
    Gitee {
        /// Repository: owner/repo, https://gitee.com/owner/repo or git@gitee.com:owner/repo
        #[arg(long, short)]
        repo: String,

        /// Image files
        #[arg(required = true, num_args = 1..=8)]
        images: Vec<PathBuf>,
    },

    /// Upload images (up to 8) to PostImage
    Postimage {
        /// Image files
        #[arg(required = true, num_args = 1..=8)]
        images: Vec<PathBuf>,
    },
}

fn parse_key_val(s: &str) -> Result<(String, String), String> {
    let pos = s.find('=').ok_or_else(|| format!("invalid KEY=value: no `=` found in `{}`", s))?;
    Ok((s[..pos].to_string(), s[pos + 1..].to_string()))
}

fn load_config(path: Option<&Path>) -> Result<AppConfig> {
    match path {
        Some(p) => AppConfig::load(p),
        None => Ok(AppConfig::default()),
    }
}

fn image_inputs(images: &[PathBuf]) -> Map<String, Value> {
    images.iter()
        .enumerate()
        .map(|(i, p)| (format!("img{}", i + 1), Value::String(p.to_string_lossy().into_owned())))
        .collect()
}

/// Prints the record; the exit code follows its `success` field.
fn report(output: &Value) -> Result<ExitCode> {
    println!("{}", serde_json::to_string_pretty(output)?);
    let ok = match output.get("success") {
        Some(Value::Bool(b)) => *b,
        Some(Value::String(s)) => s == "true",
        _ => false,
    };
    Ok(if ok { ExitCode::SUCCESS } else { ExitCode::FAILURE })
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    tracing_subscriber::fmt::init();
    let cli = Cli::parse();

    let config = load_config(cli.config.as_deref())?;
    let keys = ChainedKeyProvider::new(vec![
        Box::new(config.clone()) as Box<dyn ApiKeyProvider>,
        Box::new(EnvKeyProvider),
    ]);

    match cli.command {
        Commands::List => {
            let registry = standard_registry(&config, &keys)?;
            for name in registry.names() {
                let description = registry.get(&name)
                    .map(|h| h.description().to_string())
                    .unwrap_or_default();
                println!("{:<30} {}", name, description);
            }
            Ok(ExitCode::SUCCESS)
        }

        Commands::Run { node, inputs } => {
            let registry = standard_registry(&config, &keys)?;
            let inputs: Map<String, Value> = inputs.into_iter()
                .map(|(k, v)| (k, Value::String(v)))
                .collect();
            let output = registry.invoke(&node, Value::Object(inputs), None).await?;
            report(&output)
        }

        Commands::Gitee { repo, images } => {
            let registry = standard_registry(&config, &keys)?;
            let mut inputs = image_inputs(&images);
            inputs.insert("repo_url".to_string(), Value::String(repo));
            info!("Uploading {} file(s) to Gitee", images.len());
            let output = registry.invoke("gitee_image_uploader", Value::Object(inputs), None).await?;
            report(&output)
        }

        // No Gitee token needed here, so skip the full registry.
        Commands::Postimage { images } => {
            let action = PostImageUploaderAction::new(ChromiumFormDriver::new(&config.postimage, &config.browser));
            let inputs = Value::Object(image_inputs(&images));
            action.validate(&inputs)?;
            let ctx = Context::for_node(action.name());
            let output = action.execute(inputs, &ctx).await?;
            report(&output)
        }
    }
}
