//! Prompt corpus loading and seeding
//!
//! The corpus is a CSV of exemplar prompts, one per row, with the persona
//! label in the first column and the full prompt text in the second.
//! Record order in the file is preserved; vector positions in the index
//! refer back into this order.

use std::io::Read;
use std::io::Write;
use std::path::Path;

use serde::Deserialize;
use serde::Serialize;
use tracing::debug;
use tracing::info;
use tracing::warn;

use crate::errors::PromptRagError;
use crate::errors::Result;

/// One exemplar prompt from the corpus
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptRecord {
    /// Persona label of the exemplar ("Linux Terminal", "Chef", ...)
    pub persona: String,
    /// Full prompt text
    pub prompt: String,
}

impl PromptRecord {
    pub fn new(persona: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self {
            persona: persona.into(),
            prompt: prompt.into(),
        }
    }
}

/// Load prompt records from a CSV file on disk
pub fn load_corpus<P: AsRef<Path>>(path: P) -> Result<Vec<PromptRecord>> {
    let file = std::fs::File::open(path.as_ref())?;
    let records = read_records(file)?;
    info!(
        "Loaded {} prompt records from {}",
        records.len(),
        path.as_ref().display()
    );
    Ok(records)
}

/// Parse prompt records from CSV data
///
/// The first row is treated as a header and skipped. Rows with fewer than
/// two fields are skipped rather than failing the whole load.
pub fn read_records<R: Read>(reader: R) -> Result<Vec<PromptRecord>> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let mut records = Vec::new();
    let mut skipped = 0usize;
    for row in csv_reader.records() {
        let row = row?;
        match (row.get(0), row.get(1)) {
            (Some(persona), Some(prompt)) => {
                records.push(PromptRecord::new(persona, prompt));
            }
            _ => skipped += 1,
        }
    }

    if skipped > 0 {
        warn!("Skipped {} corpus rows with fewer than 2 fields", skipped);
    }
    debug!("Parsed {} prompt records", records.len());

    Ok(records)
}

/// Download the corpus dataset and store it at `dest`
///
/// The download goes to a temporary file first and is renamed into place,
/// so a failed transfer never clobbers an existing corpus file.
pub async fn download_dataset(url: &str, dest: &Path) -> Result<()> {
    info!("Downloading prompt dataset from {}", url);

    let response = reqwest::get(url)
        .await
        .map_err(|e| PromptRagError::Http(e.to_string()))?;

    if !response.status().is_success() {
        return Err(PromptRagError::Http(format!(
            "Dataset download failed with status: {}",
            response.status()
        )));
    }

    let body = response
        .bytes()
        .await
        .map_err(|e| PromptRagError::Http(e.to_string()))?;

    let dir = match dest.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => {
            std::fs::create_dir_all(parent)?;
            parent
        }
        _ => Path::new("."),
    };

    let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
    tmp.write_all(&body)?;
    tmp.persist(dest).map_err(|e| PromptRagError::Io(e.error))?;

    info!("Saved {} bytes of corpus data to {}", body.len(), dest.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_records_skips_header_and_short_rows() {
        let data = "act,prompt\n\
            Linux Terminal,\"I want you to act as a linux terminal.\"\n\
            orphaned-field\n\
            Chef,\"I require someone who can suggest delicious recipes.\"\n";

        let records = read_records(data.as_bytes()).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].persona, "Linux Terminal");
        assert_eq!(records[1].persona, "Chef");
    }

    #[test]
    fn test_read_records_preserves_order_and_quoting() {
        let data = "act,prompt\n\
            A,\"first, with a comma\"\n\
            B,\"second\nwith a newline\"\n\
            C,third\n";

        let records = read_records(data.as_bytes()).unwrap();
        let personas: Vec<&str> = records.iter().map(|r| r.persona.as_str()).collect();
        assert_eq!(personas, vec!["A", "B", "C"]);
        assert_eq!(records[0].prompt, "first, with a comma");
        assert_eq!(records[1].prompt, "second\nwith a newline");
    }

    #[test]
    fn test_load_corpus_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "act,prompt").unwrap();
        writeln!(file, "Travel Guide,Suggest places to visit.").unwrap();
        file.flush().unwrap();

        let records = load_corpus(file.path()).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].persona, "Travel Guide");
        assert_eq!(records[0].prompt, "Suggest places to visit.");
    }
}
