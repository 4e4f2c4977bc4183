use std::fs;
use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use serde_json::{Value, json};
use svgui::config::WidgetConfig;
use svgui::engine::{EngineCore, WidgetError};
use svgui::export::{ExportError, ExportedFile};

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("cannot read {}: {source}", path.display())]
    Read { path: PathBuf, source: std::io::Error },
    #[error("cannot write {}: {source}", path.display())]
    Write { path: PathBuf, source: std::io::Error },
    #[error(transparent)]
    Widget(#[from] WidgetError),
    #[error(transparent)]
    Export(#[from] ExportError),
    #[error("content box could not be measured; nothing to rasterize")]
    NotMeasured,
    #[error("invalid JSON output: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Parser, Debug)]
#[command(name = "svgui-cli", about = "Offline tools for interactive SVG widgets")]
struct Cli {
    /// Widget configuration JSON. Its `svg` markup is replaced by the input
    /// file's contents.
    #[arg(long, env = "SVGUI_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Write the core content (no overlay) as an SVG file.
    ExportSvg(ExportArgs),
    /// Rasterize the view, overlay included, to a PNG file.
    ExportPng {
        #[command(flatten)]
        args: ExportArgs,
        /// Pixels per content unit.
        #[arg(long, env = "SVGUI_PNG_SCALE")]
        scale: Option<f64>,
    },
    /// Print the classified elements and measured bounds as JSON.
    Inspect {
        input: PathBuf,
    },
}

#[derive(Args, Debug)]
struct ExportArgs {
    input: PathBuf,
    /// Output path; defaults to the export's own file name.
    #[arg(long, short)]
    output: Option<PathBuf>,
    /// Ids to select before exporting.
    #[arg(long, value_delimiter = ',')]
    select: Vec<String>,
}

fn main() {
    tracing_subscriber::fmt().with_writer(std::io::stderr).init();

    let cli = Cli::parse();
    if let Err(err) = run(cli) {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        Command::ExportSvg(args) => {
            let core = load(cli.config.as_deref(), &args)?;
            save(&core.export_svg(), args.output)
        }
        Command::ExportPng { args, scale } => {
            let mut core = load(cli.config.as_deref(), &args)?;
            core.set_png_scale(scale);
            let file = core.export_png()?.ok_or(CliError::NotMeasured)?;
            save(&file, args.output)
        }
        Command::Inspect { input } => {
            let core = build(cli.config.as_deref(), &input)?;
            println!("{}", serde_json::to_string_pretty(&summary(&core))?);
            Ok(())
        }
    }
}

// =============================================================================
// Loading
// =============================================================================

fn read(path: &Path) -> Result<String, CliError> {
    fs::read_to_string(path).map_err(|source| CliError::Read { path: path.to_path_buf(), source })
}

fn build(config: Option<&Path>, input: &Path) -> Result<EngineCore, CliError> {
    let mut config = match config {
        Some(path) => WidgetConfig::from_json(&read(path)?).map_err(WidgetError::from)?,
        None => WidgetConfig::default(),
    };
    config.svg_markup = read(input)?;
    Ok(EngineCore::new(config)?)
}

fn load(config: Option<&Path>, args: &ExportArgs) -> Result<EngineCore, CliError> {
    let mut core = build(config, &args.input)?;
    if !args.select.is_empty() {
        let actions = core.update_selection(&args.select);
        tracing::debug!(?actions, "preselected");
    }
    Ok(core)
}

fn save(file: &ExportedFile, output: Option<PathBuf>) -> Result<(), CliError> {
    let path = output.unwrap_or_else(|| PathBuf::from(&file.file_name));
    fs::write(&path, &file.bytes).map_err(|source| CliError::Write { path: path.clone(), source })?;
    tracing::info!(path = %path.display(), bytes = file.bytes.len(), mime = %file.mime, "exported");
    Ok(())
}

// =============================================================================
// Inspection
// =============================================================================

fn summary(core: &EngineCore) -> Value {
    let index = core.index();
    let elements: Vec<Value> = index
        .ids()
        .map(|id| {
            json!({
                "id": id,
                "role": index.role(id),
                "title": index.title(id),
                "present": core.doc().contains_id(id),
            })
        })
        .collect();
    json!({
        "instance_id": core.instance_id().to_string(),
        "view_box": core.viewport().original(),
        "selected": core.selected(),
        "elements": elements,
    })
}
