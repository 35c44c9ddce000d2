// Seed files: one JSON record per line, optionally gzip-compressed.

use std::{
    fs::File,
    io::{self, prelude::*},
    path::{Path, PathBuf},
    sync::Arc,
};

use anyhow::{Context, Result};
use flate2::read::MultiGzDecoder;
use kdam::tqdm;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::taxonomy::model::{Concept, ConceptDraft, PlainLiterals, Project, SchemeImport};
use crate::taxonomy::Taxonomy;
use crate::tokenize::{Language, NlpWordTokenizer};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum SeedRecord {
    Project {
        slug: String,
        #[serde(default)]
        title: PlainLiterals,
    },
    Concept {
        #[serde(default)]
        id: Option<Uuid>,
        project: String,
        #[serde(flatten)]
        labels: ConceptDraft,
    },
    /// A concept scheme with its concepts, see [`SchemeImport`].
    Scheme {
        project: String,
        #[serde(flatten)]
        import: SchemeImport,
    },
}

/// Line reader over a plain or `.gz` file.
struct LineReader {
    reader: Box<dyn BufRead>,
    buf: String,
}

impl LineReader {
    fn open(path: &Path) -> Result<Self> {
        let file = File::open(path)?;
        let reader: Box<dyn BufRead> = if path.extension().map_or(false, |ext| ext == "gz") {
            Box::new(io::BufReader::new(MultiGzDecoder::new(file)))
        } else {
            Box::new(io::BufReader::new(file))
        };
        Ok(Self {
            reader,
            buf: String::with_capacity(2048),
        })
    }

    fn next_line(&mut self) -> io::Result<Option<&str>> {
        self.buf.clear();
        let read = self.reader.read_line(&mut self.buf)?;
        if read == 0 {
            Ok(None)
        } else {
            Ok(Some(self.buf.trim_end()))
        }
    }
}

/// Yields the records of a seed file, skipping blank lines.
pub struct SeedReader {
    lines: LineReader,
    path: PathBuf,
    line_no: usize,
}

impl SeedReader {
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let lines = LineReader::open(&path)
            .with_context(|| format!("failed to open seed file {}", path.display()))?;
        Ok(Self {
            lines,
            path,
            line_no: 0,
        })
    }
}

impl Iterator for SeedReader {
    type Item = Result<SeedRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            self.line_no += 1;
            let line = match self.lines.next_line() {
                Ok(Some(line)) => line,
                Ok(None) => return None,
                Err(err) => return Some(Err(err.into())),
            };
            if line.is_empty() {
                continue;
            }
            let record = serde_json::from_str(line).with_context(|| {
                format!("{}:{}: invalid seed record", self.path.display(), self.line_no)
            });
            return Some(record);
        }
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ImportSummary {
    pub projects: usize,
    pub concepts: usize,
    pub schemes: usize,
    pub skipped: usize,
}

impl Taxonomy {
    /// Applies seed records in order. Records that conflict with the current
    /// state are logged and skipped.
    pub fn import(&mut self, records: Vec<SeedRecord>) -> ImportSummary {
        let mut summary = ImportSummary::default();
        for record in tqdm!(records.into_iter()) {
            let applied = match record {
                SeedRecord::Project { slug, title } => self
                    .create_project(Project { slug, title })
                    .map(|_| summary.projects += 1),
                SeedRecord::Concept {
                    id,
                    project,
                    labels,
                } => {
                    let concept = Concept::new(id.unwrap_or_else(Uuid::new_v4), &project, labels);
                    self.insert_concept(concept).map(|_| summary.concepts += 1)
                }
                SeedRecord::Scheme { project, import } => {
                    let concepts = import.concepts.len();
                    self.import_scheme(&project, import).map(|_| {
                        summary.schemes += 1;
                        summary.concepts += concepts;
                    })
                }
            };
            if let Err(err) = applied {
                tracing::warn!(%err, "skipping seed record");
                summary.skipped += 1;
            }
        }
        eprintln!();
        summary
    }
}

/// Builds a taxonomy for `language`, importing `seed` when given.
pub fn load_taxonomy(language: &str, seed: Option<&Path>) -> Result<Taxonomy> {
    let language: Language = language.parse()?;
    let tokenizer = Arc::new(NlpWordTokenizer::create(language.code())?);
    let mut taxonomy = Taxonomy::new(tokenizer, language);
    if let Some(path) = seed {
        let records = SeedReader::open(path)?.collect::<Result<Vec<_>>>()?;
        tracing::info!(path = %path.display(), records = records.len(), "importing seed");
        let summary = taxonomy.import(records);
        tracing::info!(
            projects = summary.projects,
            concepts = summary.concepts,
            schemes = summary.schemes,
            skipped = summary.skipped,
            "seed imported"
        );
    }
    Ok(taxonomy)
}
