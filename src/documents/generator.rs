// src/documents/generator.rs
use chrono::NaiveDate;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tokio::process::Command;
use tracing::{info, warn};

use super::template_engine::{escape_typst, TemplateEngine};
use crate::config::PersonalInfo;
use crate::error::ItemError;
use crate::fs_ops::FsOps;
use crate::types::JobPosting;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    Resume,
    CoverLetter,
}

impl DocumentKind {
    pub fn file_prefix(self) -> &'static str {
        match self {
            DocumentKind::Resume => "CV",
            DocumentKind::CoverLetter => "Cover_Letter",
        }
    }

    /// `CV_<Company>_<Title>` / `Cover_Letter_<Company>_<Title>`
    pub fn file_stem(self, posting: &JobPosting) -> String {
        format!(
            "{}_{}_{}",
            self.file_prefix(),
            FsOps::sanitize_component(&posting.company),
            FsOps::sanitize_component(&posting.title)
        )
    }
}

const BASE_SUMMARY: &str = "Experienced Data Analyst and Business Intelligence professional with expertise in Python, SQL and advanced analytics. Proven track record in developing data-driven solutions, creating interactive dashboards and implementing ETL processes. Passionate about transforming complex data into actionable business insights.";

const SUMMARY_EXTRAS: [(&str, &str); 3] = [
    (
        "machine learning",
        "Strong background in machine learning algorithms and predictive modeling.",
    ),
    (
        "azure",
        "Experienced with Microsoft Azure cloud platform and Azure Data Factory.",
    ),
    (
        "tableau",
        "Expert in Tableau for data visualization and dashboard creation.",
    ),
];

const SKILL_CATEGORIES: [(&str, &[&str]); 6] = [
    ("Programming", &["Python", "SQL", "R", "JavaScript"]),
    ("BI Tools", &["Power BI", "Tableau", "Qlik Sense", "Looker"]),
    ("Databases", &["PostgreSQL", "MySQL", "MongoDB", "SQLite"]),
    ("Cloud", &["Azure", "AWS", "Google Cloud", "Databricks"]),
    ("Analytics", &["Pandas", "NumPy", "Scikit-learn", "TensorFlow"]),
    ("Other", &["Excel", "Git", "Docker", "Jupyter", "Apache Spark"]),
];

const EXPERIENCE: &str = r#"*Senior Data Analyst* | Tech Solutions Inc. | 2022 - Present
- Developed and maintained 15+ Power BI dashboards for executive reporting
- Implemented ETL processes using Python and SQL, reducing data processing time by 40%
- Created predictive models using machine learning algorithms, improving forecast accuracy by 25%
- Collaborated with cross-functional teams to define KPIs and business metrics

*Junior Business Intelligence Developer* | DataCorp | 2020 - 2022
- Built automated reporting solutions using Python and SQL
- Designed data warehousing solutions for multiple business units
- Performed data quality assessments and implemented data governance procedures
- Supported ad-hoc analysis requests and provided data insights to stakeholders"#;

const EDUCATION: &str = r#"*Master's in Business Intelligence and Big Data Analytics* \
Universidad Politécnica de Madrid (Expected 2025)

*Bachelor's in Computer Science* \
Universidad del País Vasco (2022)"#;

/// Résumé summary with extra sentences for what the posting asks for
pub fn tailored_summary(posting: &JobPosting) -> String {
    let description = posting.description.to_lowercase();
    let mut summary = BASE_SUMMARY.to_string();
    for (needle, sentence) in SUMMARY_EXTRAS {
        if description.contains(needle) {
            summary.push(' ');
            summary.push_str(sentence);
        }
    }
    summary
}

fn skills_markup() -> String {
    SKILL_CATEGORIES
        .iter()
        .map(|(category, skills)| format!("- *{}:* {}", category, skills.join(", ")))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Writes the per-posting Typst documents into one output directory
pub struct DocumentGenerator {
    engine: TemplateEngine,
    personal: PersonalInfo,
    output_dir: PathBuf,
    date: NaiveDate,
    compile_pdf: bool,
}

impl DocumentGenerator {
    pub fn new(engine: TemplateEngine, personal: PersonalInfo, output_dir: &Path, date: NaiveDate) -> Self {
        Self {
            engine,
            personal,
            output_dir: output_dir.to_path_buf(),
            date,
            compile_pdf: false,
        }
    }

    pub fn with_pdf(mut self, compile_pdf: bool) -> Self {
        self.compile_pdf = compile_pdf;
        self
    }

    /// Generate the résumé and cover letter for a posting.
    /// Failures are logged and skipped; what was produced is returned.
    pub async fn generate_for(&self, posting: &JobPosting) -> Vec<PathBuf> {
        let mut artifacts = Vec::new();

        for kind in [DocumentKind::Resume, DocumentKind::CoverLetter] {
            let source = match self.generate(kind, posting).await {
                Ok(path) => path,
                Err(e) => {
                    warn!("Skipping {:?} for '{}': {}", kind, posting.title, e);
                    continue;
                }
            };

            if !self.compile_pdf {
                artifacts.push(source);
                continue;
            }

            match compile_typst(&source).await {
                Ok(pdf) => artifacts.push(pdf),
                Err(e) => {
                    warn!("{}; keeping Typst source", e);
                    artifacts.push(source);
                }
            }
        }

        artifacts
    }

    /// Render and write one Typst source file
    pub async fn generate(&self, kind: DocumentKind, posting: &JobPosting) -> Result<PathBuf, ItemError> {
        let file_name = format!("{}.typ", kind.file_stem(posting));
        let path = self.output_dir.join(&file_name);

        let variables = self.variables(posting);
        let content = match kind {
            DocumentKind::Resume => self.engine.render_resume(&variables),
            DocumentKind::CoverLetter => self.engine.render_cover_letter(&variables),
        };

        tokio::fs::write(&path, content)
            .await
            .map_err(|source| ItemError::Write {
                file: file_name.clone(),
                source,
            })?;

        info!("{} generated: {}", kind.file_prefix(), file_name);
        Ok(path)
    }

    fn variables(&self, posting: &JobPosting) -> HashMap<String, String> {
        let person = &self.personal;
        let mut vars: HashMap<String, String> = [
            ("name", person.name.as_str()),
            ("email", person.email.as_str()),
            ("phone", person.phone.as_str()),
            ("location", person.location.as_str()),
            ("linkedin", person.linkedin.as_str()),
            ("github", person.github.as_str()),
            ("company", posting.company.as_str()),
            ("job_title", posting.title.as_str()),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), escape_typst(v)))
        .collect();

        vars.insert(
            "date".to_string(),
            self.date.format("%B %d, %Y").to_string(),
        );
        vars.insert(
            "summary".to_string(),
            escape_typst(&tailored_summary(posting)),
        );
        vars.insert("skills".to_string(), skills_markup());
        vars.insert("experience".to_string(), EXPERIENCE.to_string());
        vars.insert("education".to_string(), EDUCATION.to_string());

        let skills = crate::scoring::insights::extract_job_skills(posting);
        vars.insert(
            "highlights".to_string(),
            escape_typst(&format!(
                "The role's focus on {} matches the tools I use every day.",
                skills.join(", ")
            )),
        );

        vars
    }
}

/// Compile a Typst source to a PDF next to it
pub async fn compile_typst(source: &Path) -> Result<PathBuf, ItemError> {
    let pdf = source.with_extension("pdf");

    let output = Command::new("typst")
        .arg("compile")
        .arg(source)
        .arg(&pdf)
        .output()
        .await
        .map_err(|e| ItemError::Compile {
            path: source.to_path_buf(),
            message: format!("failed to execute typst: {}", e),
        })?;

    if !output.status.success() {
        return Err(ItemError::Compile {
            path: source.to_path_buf(),
            message: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }

    Ok(pdf)
}
