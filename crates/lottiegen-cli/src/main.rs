mod document;

use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use document::GraphDocument;
use lottiegen_codegen::CodegenResult;
use lottiegen_core::{LottieGenConfig, TargetLanguage};
use lottiegen_ir::RenderingContext;

#[derive(Parser)]
#[command(
    name = "lottiegen",
    version,
    about = "LottieGen: generates code that instantiates composition graphs"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate the instantiator class for a graph document
    Generate {
        /// Path to the graph document (JSON)
        #[arg()]
        input: PathBuf,

        /// Path to a lottiegen.toml configuration file
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Target language: csharp, cppwinrt, cx
        #[arg(short, long)]
        language: Option<TargetLanguage>,

        /// Namespace of the generated class
        #[arg(long)]
        namespace: Option<String>,

        /// Name of the generated class
        #[arg(long)]
        class_name: Option<String>,

        /// Target the modern composition runtime
        #[arg(long)]
        modern: bool,

        /// Directory to write the generated files to
        #[arg(short, long)]
        out_dir: Option<PathBuf>,
    },

    /// Validate a graph document without writing anything
    Check {
        /// Path to the graph document (JSON)
        #[arg()]
        input: PathBuf,
    },

    /// Optimize a rendering context and print it as JSON
    Optimize {
        /// Path to the rendering context (JSON)
        #[arg()]
        input: PathBuf,
    },

    /// Write a default lottiegen.toml
    InitConfig {
        /// Where to write the file
        #[arg(default_value = "lottiegen.toml")]
        path: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr so `optimize` output can be piped.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Generate {
            input,
            config,
            language,
            namespace,
            class_name,
            modern,
            out_dir,
        } => {
            let mut config = load_config(config.as_deref())?;
            if let Some(language) = language {
                config.codegen.language = language;
            }
            if let Some(namespace) = namespace {
                config.codegen.namespace = namespace;
            }
            if let Some(class_name) = class_name {
                config.codegen.class_name = class_name;
            }
            if modern {
                config.codegen.modern_runtime = true;
            }
            let out_dir = out_dir.unwrap_or_else(|| PathBuf::from(&config.output.directory));
            cmd_generate(&input, &config, &out_dir)
        }
        Commands::Check { input } => cmd_check(&input),
        Commands::Optimize { input } => cmd_optimize(&input),
        Commands::InitConfig { path } => cmd_init_config(&path),
    }
}

fn load_config(path: Option<&Path>) -> Result<LottieGenConfig> {
    match path {
        Some(path) => LottieGenConfig::load_from_file(path)
            .with_context(|| format!("failed to load config: {}", path.display())),
        None => Ok(LottieGenConfig::default()),
    }
}

fn cmd_generate(input: &Path, config: &LottieGenConfig, out_dir: &Path) -> Result<()> {
    let start = Instant::now();
    let document = GraphDocument::load(input)?;
    let target = document.target(&config.codegen)?;
    tracing::info!(
        input = %input.display(),
        language = %target.language,
        objects = document.graph.len(),
        "generating"
    );

    let result = lottiegen_codegen::generate(&document.graph, &target)
        .with_context(|| format!("failed to generate code for {}", input.display()))?;

    std::fs::create_dir_all(out_dir)
        .with_context(|| format!("failed to create output directory: {}", out_dir.display()))?;
    for (name, text) in result.files() {
        let path = out_dir.join(&name);
        std::fs::write(&path, text)
            .with_context(|| format!("failed to write {}", path.display()))?;
        println!("   wrote {}", path.display());
    }
    print_asset_manifest(&result);

    println!(
        "   {} in {:.1}ms (hash {})",
        result.language,
        start.elapsed().as_secs_f64() * 1000.0,
        result.content_hash().short()
    );
    Ok(())
}

fn print_asset_manifest(result: &CodegenResult) {
    if result.assets.is_empty() {
        return;
    }
    println!("   assets:");
    for asset in &result.assets {
        println!("     {}", asset.0);
    }
}

fn cmd_check(input: &Path) -> Result<()> {
    let document = GraphDocument::load(input)?;
    document
        .graph
        .validate()
        .with_context(|| format!("{} is not a valid graph", input.display()))?;
    let reachable = document.graph.preorder()?.len();
    println!(
        "   {}: {} objects, {} reachable, {} bindings",
        input.display(),
        document.graph.len(),
        reachable,
        document.graph.property_bindings().len()
    );
    Ok(())
}

fn cmd_optimize(input: &Path) -> Result<()> {
    let source = std::fs::read_to_string(input)
        .with_context(|| format!("failed to read rendering context: {}", input.display()))?;
    let context: RenderingContext = serde_json::from_str(&source)
        .with_context(|| format!("invalid rendering context: {}", input.display()))?;
    let optimized = lottiegen_ir::optimize(&context);
    tracing::info!(
        before = context.items().len(),
        after = optimized.items().len(),
        "optimized rendering context"
    );
    println!("{}", serde_json::to_string_pretty(&optimized)?);
    Ok(())
}

fn cmd_init_config(path: &Path) -> Result<()> {
    if path.exists() {
        anyhow::bail!("'{}' already exists", path.display());
    }
    LottieGenConfig::default()
        .save_to_file(path)
        .with_context(|| format!("failed to write config: {}", path.display()))?;
    println!("   wrote {}", path.display());
    Ok(())
}
