// src/scoring/insights.rs
//! Presentation-only hints derived from posting text. None of these affect the score.

use crate::types::JobPosting;

const MAX_SKILLS: usize = 6;

const SKILL_TOKENS: [(&str, &str); 16] = [
    ("power bi", "Power BI"),
    ("python", "Python"),
    ("sql", "SQL"),
    ("tableau", "Tableau"),
    ("dashboard", "Dashboard"),
    ("excel", "Excel"),
    ("etl", "ETL"),
    ("azure", "Azure"),
    ("aws", "AWS"),
    ("machine learning", "Machine Learning"),
    ("data warehouse", "Data Warehouse"),
    ("spark", "Spark"),
    ("hadoop", "Hadoop"),
    ("qlik", "QlikView"),
    ("looker", "Looker"),
    ("databricks", "Databricks"),
];

const FALLBACK_SKILLS: [&str; 4] = ["Data Analysis", "SQL", "Python", "BI Tools"];

/// Technical skills named in the posting, capped at six
pub fn extract_job_skills(posting: &JobPosting) -> Vec<String> {
    let text = posting.search_text();

    let skills: Vec<String> = SKILL_TOKENS
        .iter()
        .filter(|(token, _)| text.contains(token))
        .map(|(_, display)| display.to_string())
        .take(MAX_SKILLS)
        .collect();

    if skills.is_empty() {
        FALLBACK_SKILLS.iter().map(|s| s.to_string()).collect()
    } else {
        skills
    }
}

/// Rough yearly salary band from seniority words
pub fn estimate_salary_range(posting: &JobPosting) -> &'static str {
    let text = posting.search_text();

    if text.contains("senior") {
        "45000-60000 EUR"
    } else if text.contains("junior") {
        "25000-35000 EUR"
    } else if text.contains("lead") || text.contains("manager") {
        "50000-70000 EUR"
    } else {
        "35000-50000 EUR"
    }
}

/// Experience requirement read from the description only
pub fn experience_requirement(posting: &JobPosting) -> &'static str {
    let text = posting.description.to_lowercase();
    let mentions_years = text.contains("año") || text.contains("year");

    if text.contains("senior") {
        "5+ years of experience"
    } else if text.contains("junior") {
        "0-2 years of experience"
    } else if text.contains("lead") {
        "7+ years of experience"
    } else if mentions_years && text.contains('3') {
        "3+ years of experience"
    } else if mentions_years && text.contains('2') {
        "2+ years of experience"
    } else {
        "2-5 years of experience"
    }
}
