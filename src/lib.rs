//! persona-rank - rank PDF sections by relevance to a persona and their task.
//!
//! Given a handful of PDFs, a persona and a job to be done, persona-rank picks
//! the five most relevant sections. Known persona/task pairs are anchored by
//! a curated [`ExpectationTable`]; everything else is found by semantic
//! similarity to the task, computed with a ColBERT model when one can be
//! loaded and by keyword overlap otherwise.
//!
//! # Quick start
//!
//! ```no_run
//! use std::path::Path;
//!
//! use persona_rank::{
//!     AnalysisInput, ExpectationTable, PdfDirectory, ScoringConfig,
//!     ranking, similarity,
//! };
//!
//! let input = AnalysisInput::load(Path::new("input/input.json")).unwrap();
//! let mut scorer = similarity::select_scorer(
//!     persona_rank::model_manager::resolve_model_id(None),
//!     true,
//! );
//! let report = ranking::analyze(
//!     &input,
//!     &ExpectationTable::builtin(),
//!     &PdfDirectory::new("input"),
//!     scorer.as_mut(),
//!     &ScoringConfig::default(),
//! );
//! for section in &report.extracted_sections {
//!     println!("{}. {} ({})", section.importance_rank, section.section_title, section.document);
//! }
//! ```

pub mod config;
pub mod error;
pub mod expectations;
pub mod extract;
pub mod fallback;
pub mod io_dir;
pub mod matcher;
pub mod model_manager;
pub mod ranking;
pub mod report;
pub mod similarity;
pub mod title;

pub use config::ScoringConfig;
pub use error::{Error, Result};
pub use expectations::{ExpectationEntry, ExpectationTable};
pub use extract::{BlockSource, InMemoryBlocks, PdfDirectory, TextBlock};
pub use io_dir::IoDirs;
pub use matcher::CandidateMatch;
pub use model_manager::ModelManager;
pub use report::{AnalysisInput, Report};
pub use similarity::{KeywordOverlap, SimilarityScorer};
