use std::io::{self, IsTerminal};
use std::path::{Path, PathBuf};
use std::rc::Rc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

use gflows_config::{
  DEFAULT_CONFIG_PATH, EngineKind, GFlowsConfig, GFlowsContext, TemplatesConfig,
};
use gflows_content::{ContentReader, ContentWriter, Logger, ReqwestClient, Styles};
use gflows_engine::{EngineCore, create_engine};
use gflows_fs::{FileSystem, OsFs};
use gflows_manager::WorkflowManager;
use gflows_workflow::Validator;

/// gflows - generate GitHub workflows from jsonnet or ytt templates
#[derive(Parser)]
#[command(name = "gflows")]
#[command(version, about, long_about = None)]
struct Cli {
  /// Location of the config file
  #[arg(short, long, global = true, env = "GFLOWS_CONFIG", default_value = DEFAULT_CONFIG_PATH)]
  config: PathBuf,

  /// Log diagnostics to stderr
  #[arg(long, global = true)]
  debug: bool,

  /// Disable colored output
  #[arg(long, global = true)]
  no_color: bool,

  #[command(subcommand)]
  command: Commands,
}

#[derive(Subcommand)]
enum Commands {
  /// Create a config file and starter templates
  Init {
    /// Template engine for the new context
    #[arg(long, value_enum, default_value_t = EngineArg::Jsonnet)]
    engine: EngineArg,

    /// Name of the workflow checking that generated workflows are up to date
    #[arg(long, default_value = "gflows")]
    workflow_name: String,

    /// Directory receiving generated workflows
    #[arg(long, default_value = ".github/")]
    github_dir: String,
  },

  /// Regenerate workflows from their templates
  Update,

  /// Check that workflows are valid and up to date
  Check {
    /// Print a diff for each out of date workflow
    #[arg(long)]
    show_diffs: bool,
  },

  /// List workflow files and their templates
  Ls,

  /// Create templates for workflows not generated by gflows
  Import,
}

#[derive(Clone, Copy, ValueEnum)]
enum EngineArg {
  Jsonnet,
  Ytt,
}

impl From<EngineArg> for EngineKind {
  fn from(engine: EngineArg) -> Self {
    match engine {
      EngineArg::Jsonnet => EngineKind::Jsonnet,
      EngineArg::Ytt => EngineKind::Ytt,
    }
  }
}

fn main() -> Result<()> {
  let cli = Cli::parse();
  init_logging(cli.debug);

  let fs: Rc<dyn FileSystem> = Rc::new(OsFs::new());
  let styles = Styles::new(!cli.no_color && io::stdout().is_terminal());
  let logger = Logger::stdout(styles);

  match cli.command {
    Commands::Init {
      engine,
      workflow_name,
      github_dir,
    } => {
      let config = GFlowsConfig {
        github_dir: Some(github_dir.clone()),
        templates: TemplatesConfig {
          engine: engine.into(),
          ..TemplatesConfig::default()
        },
        ..GFlowsConfig::default()
      };
      let context = GFlowsContext::from_config(&cli.config, config);
      let manager = build_manager(fs, logger, context)?;
      manager
        .init_workflows(&workflow_name, &github_dir, &cli.config)
        .context("failed to initialize gflows")?;
    }
    Commands::Update => {
      let manager = load_manager(fs, logger, &cli.config)?;
      manager.update_workflows()?;
    }
    Commands::Check { show_diffs } => {
      let manager = load_manager(fs, logger, &cli.config)?;
      manager.validate_workflows(show_diffs)?;
    }
    Commands::Ls => {
      let manager = load_manager(fs, logger, &cli.config)?;
      manager.list_workflows()?;
    }
    Commands::Import => {
      let manager = load_manager(fs, logger, &cli.config)?;
      manager
        .import_workflows()
        .context("failed to import workflows")?;
    }
  }

  Ok(())
}

/// Diagnostics go to stderr so they never interleave with command output.
/// `RUST_LOG` wins over `--debug`.
fn init_logging(debug: bool) {
  let level = if debug { "debug" } else { "warn" };
  let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
  tracing_subscriber::fmt()
    .with_env_filter(filter)
    .with_writer(io::stderr)
    .with_target(false)
    .init();
}

fn load_manager(
  fs: Rc<dyn FileSystem>,
  logger: Logger,
  config_path: &Path,
) -> Result<WorkflowManager> {
  let context = GFlowsContext::load(fs.as_ref(), config_path).context("failed to load config")?;
  build_manager(fs, logger, context)
}

fn build_manager(
  fs: Rc<dyn FileSystem>,
  logger: Logger,
  context: GFlowsContext,
) -> Result<WorkflowManager> {
  let context = Rc::new(context);
  let writer = ContentWriter::new(fs.clone(), logger.clone());
  let reader = ContentReader::new(fs.clone(), Rc::new(ReqwestClient::new()));
  let core = EngineCore::new(fs.clone(), context.clone(), writer.clone(), reader);
  let engine = create_engine(context.engine(), core);
  let validator =
    Validator::new(fs.clone(), context.clone()).context("failed to load the workflow schema")?;

  Ok(WorkflowManager::new(
    fs, logger, validator, context, writer, engine,
  ))
}
