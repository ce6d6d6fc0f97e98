use std::path::Path;

use chrono::{DateTime, Local, SecondsFormat};
use serde::{Deserialize, Serialize};

use crate::{
    error::{Error, Result},
    ranking::RankedSection,
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentRef {
    pub filename: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Persona {
    pub role: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobToBeDone {
    pub task: String,
}

/// The request describing which documents to rank and for whom.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisInput {
    pub documents: Vec<DocumentRef>,
    pub persona: Persona,
    pub job_to_be_done: JobToBeDone,
}

impl AnalysisInput {
    /// Read and validate an input file.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                Error::NotFound {
                    kind: "input file",
                    name: path.display().to_string(),
                }
            } else {
                Error::Io(e)
            }
        })?;
        serde_json::from_str(&raw).map_err(|source| Error::Input {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn document_names(&self) -> Vec<String> {
        self.documents.iter().map(|d| d.filename.clone()).collect()
    }

    pub fn persona(&self) -> &str {
        &self.persona.role
    }

    pub fn task(&self) -> &str {
        &self.job_to_be_done.task
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Metadata {
    pub input_documents: Vec<String>,
    pub persona: String,
    pub job_to_be_done: String,
    pub processing_timestamp: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedSection {
    pub document: String,
    pub section_title: String,
    pub importance_rank: usize,
    pub page_number: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubsectionAnalysis {
    pub document: String,
    pub refined_text: String,
    pub page_number: u32,
}

/// The final ranked output.
///
/// `extracted_sections` and `subsection_analysis` always have the same length
/// and entry `i` of each describes the same block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Report {
    pub metadata: Metadata,
    pub extracted_sections: Vec<ExtractedSection>,
    pub subsection_analysis: Vec<SubsectionAnalysis>,
}

impl Report {
    /// Shape ranked sections into a report stamped with the current time.
    pub fn new(input: &AnalysisInput, ranked: &[RankedSection]) -> Self {
        Self::with_timestamp(input, ranked, Local::now())
    }

    pub fn with_timestamp(
        input: &AnalysisInput,
        ranked: &[RankedSection],
        generated_at: DateTime<Local>,
    ) -> Self {
        let extracted_sections = ranked
            .iter()
            .map(|r| ExtractedSection {
                document: r.candidate.document.clone(),
                section_title: r.candidate.section_title.clone(),
                importance_rank: r.rank,
                page_number: r.candidate.page_number,
            })
            .collect();

        let subsection_analysis = ranked
            .iter()
            .map(|r| SubsectionAnalysis {
                document: r.candidate.document.clone(),
                refined_text: r.candidate.refined_text.clone(),
                page_number: r.candidate.page_number,
            })
            .collect();

        Self {
            metadata: Metadata {
                input_documents: input.document_names(),
                persona: input.persona().to_string(),
                job_to_be_done: input.task().to_string(),
                processing_timestamp: generated_at
                    .to_rfc3339_opts(SecondsFormat::Micros, false),
            },
            extracted_sections,
            subsection_analysis,
        }
    }

    /// Pretty-printed JSON with two-space indentation.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Write the report to `path`, creating parent directories as needed.
    pub fn write(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)
                .map_err(|_| Error::Directory(parent.to_path_buf()))?;
        }
        let mut json = self.to_json()?;
        json.push('\n');
        std::fs::write(path, json)?;
        Ok(())
    }
}
