mod export;
mod mapping;
mod normalizer;
mod parser;
pub mod soft_skills;

pub use export::{export_header, export_table};
pub use parser::import_table;

use crate::scoring::{recalc_section, PerformanceSection};
use mapping::section_for_name;
use serde::Serialize;
use std::io::{Read, Write};
use std::path::Path;
use tracing::debug;

#[derive(Debug)]
pub enum TabularError {
    Io(std::io::Error),
    Csv(csv::Error),
}

impl std::fmt::Display for TabularError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TabularError::Io(err) => write!(f, "failed to access appraisal table: {}", err),
            TabularError::Csv(err) => write!(f, "invalid appraisal CSV data: {}", err),
        }
    }
}

impl std::error::Error for TabularError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TabularError::Io(err) => Some(err),
            TabularError::Csv(err) => Some(err),
        }
    }
}

impl From<std::io::Error> for TabularError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<csv::Error> for TabularError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err)
    }
}

/// Sections parsed from a table plus the section names that were dropped.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ImportOutcome {
    pub sections: Vec<PerformanceSection>,
    pub unrecognized_section_names: Vec<String>,
}

/// Decodes CSV into the plain string table the codec works on.
pub struct TableReader;

impl TableReader {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Vec<Vec<String>>, TabularError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Vec<Vec<String>>, TabularError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let mut table = Vec::new();
        for record in csv_reader.records() {
            let record = record?;
            table.push(record.iter().map(str::to_string).collect());
        }
        Ok(table)
    }
}

/// Writes an exported table as CSV.
pub fn write_csv<W: Write>(table: &[Vec<String>], writer: W) -> Result<(), TabularError> {
    let mut csv_writer = csv::WriterBuilder::new()
        .flexible(true)
        .from_writer(writer);
    for row in table {
        csv_writer.write_record(row)?;
    }
    csv_writer.flush()?;
    Ok(())
}

/// Applies an import on top of existing sections. A section present in the
/// import replaces the existing one with the same canonical name wholesale;
/// sections missing from the import are kept as they were. Imported
/// sections with no existing counterpart are appended.
pub fn merge_import(
    existing: &[PerformanceSection],
    imported: ImportOutcome,
) -> Vec<PerformanceSection> {
    let mut incoming = imported.sections;
    let mut merged = Vec::with_capacity(existing.len() + incoming.len());

    for section in existing {
        let template = section_for_name(&section.name);
        let replacement = template.and_then(|template| {
            incoming
                .iter()
                .position(|candidate| section_for_name(&candidate.name) == Some(template))
        });

        match replacement {
            Some(position) => {
                let replacement = incoming.remove(position);
                debug!(
                    section = %replacement.name,
                    rows = replacement.rows.len(),
                    "section replaced by import"
                );
                merged.push(recalc_section(&replacement));
            }
            None => merged.push(section.clone()),
        }
    }

    merged.extend(incoming.iter().map(recalc_section));
    merged
}
