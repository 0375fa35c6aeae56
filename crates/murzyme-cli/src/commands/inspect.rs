use crate::cli::InspectArgs;
use crate::error::{CliError, Result};
use murzyme::core::features::builder::{FeatureBuilder, FeatureSet};
use murzyme::core::io::pdb::PdbReader;
use murzyme::core::io::traits::StructureFile;
use murzyme::core::models::record::ParsedDocument;
use std::io::{self, Write};
use tracing::info;

const BLOCK_LABELS: [&str; 4] = ["atom types", "residues", "distances", "secondary structure"];
const STATISTIC_LABELS: [&str; 7] = ["mean", "std", "min", "max", "median", "p25", "p75"];

pub fn run(args: InspectArgs) -> Result<()> {
    info!("Inspecting {:?}", &args.file);
    let document = PdbReader::new()
        .read_from_path(&args.file)
        .map_err(|e| CliError::FileRead {
            path: args.file.clone(),
            source: e,
        })?;
    let features = FeatureBuilder::new().build(&document);

    let stdout = io::stdout();
    let mut out = stdout.lock();
    write_inspection(&mut out, &document, &features)?;
    out.flush()?;
    Ok(())
}

fn write_inspection(
    out: &mut impl Write,
    document: &ParsedDocument,
    features: &FeatureSet,
) -> Result<()> {
    let header = &document.header;
    writeln!(out, "Identifier:     {}", header.identifier.as_deref().unwrap_or("-"))?;
    for (label, value) in [
        ("Header", &header.classification),
        ("Title", &header.title),
        ("Keywords", &header.keywords),
        ("Compound", &header.compound),
        ("Source", &header.source),
    ] {
        if !value.is_empty() {
            writeln!(out, "{:<16}{}", format!("{}:", label), value)?;
        }
    }
    if !document.identifier_mentions.is_empty() {
        writeln!(out, "Mentions:       {}", document.identifier_mentions.join(", "))?;
    }

    writeln!(out)?;
    writeln!(
        out,
        "Atoms:          {} ({} with coordinates)",
        document.atoms.len(),
        document.positions().count()
    )?;
    writeln!(out, "Atom types:     {}", features.atom_type_counts.len())?;
    writeln!(out, "Residue names:  {}", features.residue_counts.len())?;
    writeln!(out, "Helices:        {}", document.helix_lengths().count())?;
    writeln!(out, "Sheets:         {}", document.sheet_lengths().count())?;

    if !document.anomalies.is_empty() {
        writeln!(out)?;
        writeln!(out, "Recovered anomalies:")?;
        for anomaly in &document.anomalies {
            writeln!(out, "  {}", anomaly)?;
        }
    }

    writeln!(out)?;
    write!(out, "{:<20}", "Features")?;
    for label in STATISTIC_LABELS {
        write!(out, "{:>10}", label)?;
    }
    writeln!(out)?;
    let summary = features.summarize();
    for (index, label) in BLOCK_LABELS.iter().enumerate() {
        write!(out, "{:<20}", label)?;
        for value in summary.block(index).unwrap_or_default() {
            write!(out, "{:>10.3}", value)?;
        }
        writeln!(out)?;
    }
    Ok(())
}
