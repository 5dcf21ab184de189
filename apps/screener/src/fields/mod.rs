//! Job fields and their static keyword profiles.

pub mod synonyms;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::ScreenerError;

pub use synonyms::SkillSynonyms;

/// Target job category used for both scoring and classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum JobField {
    #[serde(rename = "Software Engineering")]
    SoftwareEngineering,
    #[serde(rename = "Data Analyst")]
    DataAnalyst,
    #[serde(rename = "Consultant")]
    Consultant,
}

impl JobField {
    pub const ALL: [JobField; 3] = [
        JobField::SoftwareEngineering,
        JobField::DataAnalyst,
        JobField::Consultant,
    ];

    pub fn display_name(&self) -> &'static str {
        match self {
            JobField::SoftwareEngineering => "Software Engineering",
            JobField::DataAnalyst => "Data Analyst",
            JobField::Consultant => "Consultant",
        }
    }

    /// Three-letter prefix used for generated dataset ids ("SOF_001").
    pub fn id_prefix(&self) -> &'static str {
        match self {
            JobField::SoftwareEngineering => "SOF",
            JobField::DataAnalyst => "DAT",
            JobField::Consultant => "CON",
        }
    }

    pub fn profile(&self) -> &'static FieldProfile {
        match self {
            JobField::SoftwareEngineering => &SOFTWARE_ENGINEERING,
            JobField::DataAnalyst => &DATA_ANALYST,
            JobField::Consultant => &CONSULTANT,
        }
    }

    pub fn keywords(&self) -> &'static [&'static str] {
        self.profile().keywords
    }
}

impl fmt::Display for JobField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl FromStr for JobField {
    type Err = ScreenerError;

    /// Accepts the display name, snake_case or kebab-case, case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key: String = s
            .trim()
            .to_lowercase()
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .collect();
        match key.as_str() {
            "softwareengineering" | "softwareengineer" | "swe" => Ok(JobField::SoftwareEngineering),
            "dataanalyst" | "dataanalysis" => Ok(JobField::DataAnalyst),
            "consultant" | "consulting" => Ok(JobField::Consultant),
            _ => Err(ScreenerError::Validation(format!(
                "Unknown job field '{s}'. Expected one of: Software Engineering, Data Analyst, Consultant"
            ))),
        }
    }
}

/// Static keyword configuration for one job field.
#[derive(Debug)]
pub struct FieldProfile {
    pub keywords: &'static [&'static str],
    /// Field-specific advice appended to every suggestion list.
    pub tips: &'static [&'static str],
}

static SOFTWARE_ENGINEERING: FieldProfile = FieldProfile {
    keywords: &[
        "python",
        "java",
        "javascript",
        "react",
        "node.js",
        "sql",
        "git",
        "docker",
        "kubernetes",
        "aws",
        "api",
        "database",
        "frontend",
        "backend",
        "full-stack",
        "agile",
        "scrum",
        "testing",
        "debugging",
        "html",
        "css",
        "mongodb",
        "postgresql",
        "redis",
        "microservices",
    ],
    tips: &[
        "Include specific programming projects with GitHub links",
        "Mention software development methodologies (Agile, Scrum)",
        "Add details about system architecture and scalability",
        "Include code quality practices (testing, code reviews)",
    ],
};

static DATA_ANALYST: FieldProfile = FieldProfile {
    keywords: &[
        "python",
        "r",
        "sql",
        "excel",
        "tableau",
        "power bi",
        "pandas",
        "numpy",
        "matplotlib",
        "seaborn",
        "statistics",
        "data visualization",
        "machine learning",
        "regression",
        "classification",
        "clustering",
        "etl",
        "data mining",
        "business intelligence",
        "analytics",
        "spss",
        "sas",
        "hadoop",
        "spark",
        "data warehouse",
    ],
    tips: &[
        "Include data analysis projects with quantifiable results",
        "Mention specific datasets or business problems you've solved",
        "Add experience with statistical analysis and A/B testing",
        "Include data visualization examples and dashboards",
    ],
};

static CONSULTANT: FieldProfile = FieldProfile {
    keywords: &[
        "consulting",
        "strategy",
        "business analysis",
        "project management",
        "stakeholder management",
        "client relations",
        "problem solving",
        "presentation",
        "communication",
        "leadership",
        "change management",
        "process improvement",
        "market research",
        "financial analysis",
        "risk assessment",
        "vendor management",
        "negotiation",
        "strategic planning",
        "business development",
    ],
    tips: &[
        "Highlight client-facing experience and business impact",
        "Include examples of process improvements or cost savings",
        "Add details about stakeholder management and communication",
        "Mention industry expertise and domain knowledge",
    ],
};
