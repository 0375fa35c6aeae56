use crate::cli::{ClassifyArgs, OutputFormat};
use crate::config;
use crate::data::DataManager;
use crate::error::{CliError, Result};
use crate::utils::progress::CliProgressHandler;
use murzyme::core::models::result::ClassificationResult;
use murzyme::engine::context::ClassifierContext;
use murzyme::engine::progress::ProgressReporter;
use murzyme::workflows::batch::{NamedDocument, classify_batch};
use murzyme::workflows::classify::CascadeReport;
use serde::Serialize;
use std::io::{self, Write};
use std::path::Path;
use tracing::{info, warn};

/// One output record: the file it came from and its classification.
#[derive(Serialize)]
struct ReportLine<'a> {
    file: &'a str,
    #[serde(flatten)]
    result: &'a ClassificationResult,
    #[serde(skip_serializing_if = "Option::is_none")]
    trace: Option<String>,
}

pub fn run(args: ClassifyArgs) -> Result<()> {
    info!("Initializing data manager...");
    let data_manager = DataManager::new()?;

    let app_config = config::build_config(&args.artifacts, &data_manager)?;
    if let Some(path) = &app_config.config_file {
        info!("Configuration loaded from {:?}", path);
    }
    let context = ClassifierContext::from_config(&app_config.core_config);
    if !context.has_model() {
        info!("Classifying without the model tier.");
    }

    let documents = args
        .files
        .iter()
        .map(|path| read_document(path))
        .collect::<Result<Vec<_>>>()?;

    let progress_handler = CliProgressHandler::new();
    let reporter = ProgressReporter::with_callback(progress_handler.get_callback());
    let reports = classify_batch(&context, &documents, &reporter);

    let stdout = io::stdout();
    let mut out = stdout.lock();
    for (path, report) in args.files.iter().zip(&reports) {
        for (tier, error) in report.trace.failures() {
            warn!("{}: {} tier failed: {}", path.display(), tier, error);
        }
        write_report(&mut out, path, report, args.format, args.trace)?;
    }
    out.flush()?;
    Ok(())
}

/// Reads a file for classification. Invalid UTF-8 is replaced, never fatal.
fn read_document(path: &Path) -> Result<NamedDocument> {
    let bytes = std::fs::read(path).map_err(|e| CliError::FileRead {
        path: path.to_path_buf(),
        source: e,
    })?;
    let name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string_lossy().into_owned());
    Ok(NamedDocument::new(name, String::from_utf8_lossy(&bytes)))
}

fn write_report(
    out: &mut impl Write,
    path: &Path,
    report: &CascadeReport,
    format: OutputFormat,
    with_trace: bool,
) -> Result<()> {
    let file = path.to_string_lossy();
    let trace = with_trace.then(|| report.trace.to_string());

    match format {
        OutputFormat::Json => {
            let line = ReportLine {
                file: &file,
                result: &report.result,
                trace,
            };
            let json = serde_json::to_string(&line).map_err(|e| CliError::Other(e.into()))?;
            writeln!(out, "{}", json)?;
        }
        OutputFormat::Text => {
            let result = &report.result;
            write!(
                out,
                "{}: {} ({:.2}%, {})",
                file,
                result.classification(),
                result.confidence(),
                result.source()
            )?;
            if let Some(pdb_id) = result.pdb_id() {
                write!(out, " [{}]", pdb_id)?;
            }
            writeln!(out)?;
            if let Some(note) = result.note() {
                writeln!(out, "    {}", note)?;
            }
            if let Some(trace) = trace {
                writeln!(out, "    {}", trace)?;
            }
        }
    }
    Ok(())
}
