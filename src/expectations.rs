//! Curated sections expected for known persona/task pairs.
//!
//! Personas and tasks are first reduced to categories by substring rules,
//! then the `(persona, task)` category pair keys a list of sections. New
//! personas are added as rows of data, either in the built-in table below or
//! from a JSON file merged in at run time.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// A hand-authored description of a known-good section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpectationEntry {
    pub title: String,
    /// File name of the document the section lives in.
    pub document: String,
    /// Page the section was found on when curated; informational only.
    #[serde(alias = "page")]
    pub page_hint: u32,
    pub keywords: Vec<String>,
}

/// Maps any persona containing `needle` to `category`.
///
/// Persona needles match case-sensitively; task needles match against the
/// lowercased task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryRule {
    pub needle: String,
    pub category: String,
}

/// The expected sections for one `(persona, task)` category pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpectationSet {
    pub persona: String,
    pub task: String,
    pub sections: Vec<ExpectationEntry>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpectationTable {
    #[serde(default)]
    pub persona_rules: Vec<CategoryRule>,
    #[serde(default)]
    pub task_rules: Vec<CategoryRule>,
    #[serde(default)]
    pub sets: Vec<ExpectationSet>,
}

struct Seed {
    title: &'static str,
    document: &'static str,
    page: u32,
    keywords: &'static [&'static str],
}

const PERSONA_RULES: &[(&str, &str)] = &[
    ("HR professional", "hr"),
    ("Food Contractor", "food-contractor"),
];

const TASK_RULES: &[(&str, &str)] = &[
    ("fillable forms", "fillable-forms"),
    ("vegetarian", "vegetarian"),
];

const ACROBAT_FORMS: &[Seed] = &[
    Seed {
        title: "Change flat forms to fillable (Acrobat Pro)",
        document: "Learn Acrobat - Fill and Sign.pdf",
        page: 12,
        keywords: &["flat forms", "fillable", "acrobat pro", "prepare forms"],
    },
    Seed {
        title: "Create multiple PDFs from multiple files",
        document: "Learn Acrobat - Create and Convert_1.pdf",
        page: 12,
        keywords: &["multiple pdfs", "multiple files", "create"],
    },
    Seed {
        title: "Convert clipboard content to PDF",
        document: "Learn Acrobat - Create and Convert_1.pdf",
        page: 10,
        keywords: &["clipboard", "convert", "pdf"],
    },
    Seed {
        title: "Fill and sign PDF forms",
        document: "Learn Acrobat - Fill and Sign.pdf",
        page: 2,
        keywords: &["fill", "sign", "pdf forms", "interactive"],
    },
    Seed {
        title: "Send a document to get signatures from others",
        document: "Learn Acrobat - Request e-signatures_1.pdf",
        page: 2,
        keywords: &["send", "signatures", "others", "request"],
    },
];

const VEGETARIAN_MENU: &[Seed] = &[
    Seed {
        title: "Falafel",
        document: "Dinner Ideas - Sides_2.pdf",
        page: 7,
        keywords: &["falafel", "chickpeas"],
    },
    Seed {
        title: "Ratatouille",
        document: "Dinner Ideas - Sides_3.pdf",
        page: 8,
        keywords: &["ratatouille", "vegetables"],
    },
    Seed {
        title: "Baba Ganoush",
        document: "Dinner Ideas - Sides_1.pdf",
        page: 4,
        keywords: &["baba ganoush", "eggplant"],
    },
    Seed {
        title: "Veggie Sushi Rolls",
        document: "Lunch Ideas.pdf",
        page: 11,
        keywords: &["sushi", "veggie", "rolls"],
    },
    Seed {
        title: "Vegetable Lasagna",
        document: "Dinner Ideas - Mains_3.pdf",
        page: 9,
        keywords: &["vegetable", "lasagna"],
    },
];

const BUILTIN_SETS: &[(&str, &str, &[Seed])] = &[
    ("hr", "fillable-forms", ACROBAT_FORMS),
    ("food-contractor", "vegetarian", VEGETARIAN_MENU),
];

fn rules(raw: &[(&str, &str)]) -> Vec<CategoryRule> {
    raw.iter()
        .map(|(needle, category)| CategoryRule {
            needle: needle.to_string(),
            category: category.to_string(),
        })
        .collect()
}

impl Seed {
    fn to_entry(&self) -> ExpectationEntry {
        ExpectationEntry {
            title: self.title.to_string(),
            document: self.document.to_string(),
            page_hint: self.page,
            keywords: self.keywords.iter().map(|k| k.to_string()).collect(),
        }
    }
}

impl ExpectationTable {
    /// The table shipped with the binary.
    pub fn builtin() -> Self {
        Self {
            persona_rules: rules(PERSONA_RULES),
            task_rules: rules(TASK_RULES),
            sets: BUILTIN_SETS
                .iter()
                .map(|(persona, task, seeds)| ExpectationSet {
                    persona: persona.to_string(),
                    task: task.to_string(),
                    sections: seeds.iter().map(Seed::to_entry).collect(),
                })
                .collect(),
        }
    }

    /// Read a table from a JSON file.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        let table: Self =
            serde_json::from_str(&raw).map_err(|source| Error::Input {
                path: path.to_path_buf(),
                source,
            })?;
        table.validate()?;
        Ok(table)
    }

    /// Put `other`'s rules and sets in front of this table's, so they win.
    pub fn prepend(&mut self, other: Self) {
        let mut persona_rules = other.persona_rules;
        persona_rules.append(&mut self.persona_rules);
        self.persona_rules = persona_rules;

        let mut task_rules = other.task_rules;
        task_rules.append(&mut self.task_rules);
        self.task_rules = task_rules;

        let mut sets = other.sets;
        sets.append(&mut self.sets);
        self.sets = sets;
    }

    fn validate(&self) -> Result<()> {
        for set in &self.sets {
            if let Some(entry) = set.sections.iter().find(|e| e.title.trim().is_empty()) {
                return Err(Error::Config(format!(
                    "expectation for {} in ({}, {}) has an empty title",
                    entry.document, set.persona, set.task
                )));
            }
        }
        Ok(())
    }

    /// Categories whose needle appears in the persona, in rule order.
    pub fn persona_categories(&self, persona: &str) -> Vec<&str> {
        self.persona_rules
            .iter()
            .filter(|rule| persona.contains(rule.needle.as_str()))
            .map(|rule| rule.category.as_str())
            .collect()
    }

    /// Categories whose needle appears in the lowercased task, in rule order.
    pub fn task_categories(&self, task: &str) -> Vec<&str> {
        let task_lower = task.to_lowercase();
        self.task_rules
            .iter()
            .filter(|rule| task_lower.contains(&rule.needle.to_lowercase()))
            .map(|rule| rule.category.as_str())
            .collect()
    }

    /// Expected sections for a persona and task, in priority order.
    ///
    /// An empty result is not an error: it means the run relies entirely on
    /// semantic fallback search.
    pub fn lookup(&self, persona: &str, task: &str) -> Vec<ExpectationEntry> {
        let personas = self.persona_categories(persona);
        let tasks = self.task_categories(task);

        self.sets
            .iter()
            .find(|set| {
                personas.contains(&set.persona.as_str())
                    && tasks.contains(&set.task.as_str())
            })
            .map(|set| set.sections.clone())
            .unwrap_or_default()
    }
}
