//
// storage.rs
// DocVerify-Tools-rs
//
// On-disk quarantine store: hash-named copies of held documents plus their JSON records, with path sanitization.
//
// Thales Matheus Mendonça Santos - November 2025

use std::fs;
use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};
use tracing::info;

use crate::error::{DocumentError, Result};
use crate::models::ValidationVerdict;
use crate::quarantine::QuarantineRecord;

const RECORD_EXTENSION: &str = "json";

#[derive(Clone)]
pub struct QuarantineStore {
    root: PathBuf,
}

pub fn sha256_hex(bytes: &[u8]) -> String {
    hex::encode(Sha256::digest(bytes))
}

impl QuarantineStore {
    pub fn new(root: impl AsRef<Path>) -> Result<Self> {
        let root = root.as_ref().to_path_buf();
        // Create the quarantine directory eagerly so later saves do not fail halfway.
        fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Keep a copy of an invalid document and its record. Returns the stored file name,
    /// or `None` when the verdict passed and nothing needed quarantining.
    pub fn save(
        &self,
        original_name: Option<&str>,
        bytes: &[u8],
        verdict: &ValidationVerdict,
        notes: Option<&str>,
    ) -> Result<Option<String>> {
        let hash = sha256_hex(bytes);
        let stem = original_name
            .and_then(|n| Path::new(n).file_stem().and_then(|s| s.to_str()))
            .map(sanitize_filename)
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| "document".to_string());
        let extension = original_name
            .and_then(|n| Path::new(n).extension().and_then(|s| s.to_str()))
            .map(sanitize_filename)
            .filter(|s| !s.is_empty() && s != RECORD_EXTENSION)
            .unwrap_or_else(|| "bin".to_string());
        let filename = format!("{}-{}.{}", stem, &hash[..12], extension.to_ascii_lowercase());

        let Some(record) = QuarantineRecord::from_verdict(&filename, hash, verdict, notes) else {
            return Ok(None);
        };

        fs::write(self.root.join(&filename), bytes)?;
        self.write_record(&record)?;
        info!(document = %filename, reason = %record.reason, "document quarantined");
        Ok(Some(filename))
    }

    pub fn resolve(&self, name: &str) -> Result<PathBuf> {
        let candidate = self.root.join(name);
        let canonical_root = self
            .root
            .canonicalize()
            .unwrap_or_else(|_| self.root.clone());
        let canonical = candidate.canonicalize()?;
        // Guard against path traversal by enforcing the canonical root prefix.
        if !canonical.starts_with(&canonical_root) {
            return Err(DocumentError::Io(std::io::Error::new(
                std::io::ErrorKind::PermissionDenied,
                "Attempt to access file outside quarantine root",
            )));
        }
        Ok(canonical)
    }

    pub fn load(&self, name: &str) -> Result<QuarantineRecord> {
        let path = self.resolve(&record_name(name))?;
        let raw = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    /// All records, sorted by document name.
    pub fn list(&self) -> Result<Vec<QuarantineRecord>> {
        let mut records = Vec::new();
        for entry in fs::read_dir(&self.root)? {
            let path = entry?.path();
            if path.extension().map_or(false, |ext| ext == RECORD_EXTENSION) {
                let raw = fs::read_to_string(&path)?;
                records.push(serde_json::from_str::<QuarantineRecord>(&raw)?);
            }
        }
        records.sort_by(|a, b| a.document.cmp(&b.document));
        Ok(records)
    }

    pub fn release(
        &self,
        name: &str,
        reviewer: &str,
        notes: Option<&str>,
    ) -> Result<QuarantineRecord> {
        let mut record = self.load(name)?;
        record.release(reviewer, notes)?;
        self.write_record(&record)?;
        info!(document = %record.document, reviewer, "document released from quarantine");
        Ok(record)
    }

    fn write_record(&self, record: &QuarantineRecord) -> Result<()> {
        let path = self.root.join(record_name(&record.document));
        fs::write(path, serde_json::to_string_pretty(record)?)?;
        Ok(())
    }
}

fn record_name(document: &str) -> String {
    let stem = Path::new(document)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(document);
    format!("{}.{}", stem, RECORD_EXTENSION)
}

fn sanitize_filename(input: &str) -> String {
    // Keep only ASCII word characters and a few safe separators to avoid filesystem surprises.
    input
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '-' || *c == '_')
        .collect()
}
