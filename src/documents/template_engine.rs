// src/documents/template_engine.rs
//! Typst template loading and variable substitution

use anyhow::Result;
use std::collections::HashMap;
use std::path::Path;
use tracing::{info, warn};

use crate::fs_ops::FsOps;

const BUILTIN_RESUME: &str = include_str!("../../templates/resume.typ");
const BUILTIN_COVER_LETTER: &str = include_str!("../../templates/cover_letter.typ");

pub const RESUME_TEMPLATE: &str = "resume.typ";
pub const COVER_LETTER_TEMPLATE: &str = "cover_letter.typ";

/// The two document templates, loaded once per run
#[derive(Debug, Clone)]
pub struct TemplateEngine {
    resume: String,
    cover_letter: String,
}

impl TemplateEngine {
    /// Load templates from `templates_dir`, falling back to the built-in ones per missing file
    pub async fn load(templates_dir: &Path) -> Result<Self> {
        let resume = Self::load_or_builtin(templates_dir, RESUME_TEMPLATE, BUILTIN_RESUME).await?;
        let cover_letter =
            Self::load_or_builtin(templates_dir, COVER_LETTER_TEMPLATE, BUILTIN_COVER_LETTER).await?;

        Ok(Self {
            resume,
            cover_letter,
        })
    }

    /// Engine backed only by the templates compiled into the binary
    pub fn builtin() -> Self {
        Self {
            resume: BUILTIN_RESUME.to_string(),
            cover_letter: BUILTIN_COVER_LETTER.to_string(),
        }
    }

    async fn load_or_builtin(dir: &Path, name: &str, builtin: &str) -> Result<String> {
        let path = dir.join(name);
        match FsOps::read_optional(&path).await? {
            Some(content) => {
                info!("Loaded template: {}", path.display());
                Ok(content)
            }
            None => {
                warn!("Template not found, using built-in {}: {}", name, path.display());
                Ok(builtin.to_string())
            }
        }
    }

    pub fn render_resume(&self, variables: &HashMap<String, String>) -> String {
        Self::process_variables(&self.resume, variables)
    }

    pub fn render_cover_letter(&self, variables: &HashMap<String, String>) -> String {
        Self::process_variables(&self.cover_letter, variables)
    }

    /// Substitute `{{var}}` and `${var}` placeholders in one left-to-right pass.
    /// Unknown placeholders are left as-is and substituted values are never rescanned.
    pub fn process_variables(content: &str, variables: &HashMap<String, String>) -> String {
        let mut result = String::with_capacity(content.len());
        let mut rest = content;

        while let Some(start) = rest.find(|c: char| c == '{' || c == '$') {
            result.push_str(&rest[..start]);
            let tail = &rest[start..];

            if let Some((key, len)) = placeholder_at(tail) {
                if let Some(value) = variables.get(key) {
                    result.push_str(value);
                    rest = &tail[len..];
                    continue;
                }
            }

            // '{' and '$' are single-byte
            result.push_str(&tail[..1]);
            rest = &tail[1..];
        }

        result.push_str(rest);
        result
    }
}

/// Placeholder name at the start of `text` and the length of the whole placeholder
fn placeholder_at(text: &str) -> Option<(&str, usize)> {
    let (open, close) = if text.starts_with("{{") {
        ("{{", "}}")
    } else if text.starts_with("${") {
        ("${", "}")
    } else {
        return None;
    };

    let inner = &text[open.len()..];
    let end = inner.find(close)?;
    let key = &inner[..end];
    if key.is_empty() || !key.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return None;
    }
    Some((key, open.len() + end + close.len()))
}

/// Escape text so Typst markup renders it literally
pub fn escape_typst(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        if matches!(
            c,
            '\\' | '#' | '*' | '_' | '$' | '@' | '<' | '>' | '[' | ']' | '`' | '~' | '=' | '/'
        ) {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_process_variables_both_syntaxes() {
        let out = TemplateEngine::process_variables(
            "Hi {{name}}, welcome to ${company}. {{unknown}}",
            &vars(&[("name", "Ana"), ("company", "Acme")]),
        );
        assert_eq!(out, "Hi Ana, welcome to Acme. {{unknown}}");
    }

    #[test]
    fn test_substituted_values_are_not_expanded_again() {
        let variables = vars(&[
            ("job_title", "{{email}}"),
            ("company", "${email}"),
            ("email", "me@x.io"),
        ]);
        for _ in 0..20 {
            let out = TemplateEngine::process_variables(
                "T={{job_title}} C=${company} E={{email}}",
                &variables,
            );
            assert_eq!(out, "T={{email}} C=${email} E=me@x.io");
        }
    }

    #[test]
    fn test_unclosed_placeholders_are_kept() {
        let out = TemplateEngine::process_variables(
            "cost $5 {{name} {single} ${name",
            &vars(&[("name", "Ana")]),
        );
        assert_eq!(out, "cost $5 {{name} {single} ${name");
    }

    #[test]
    fn test_escape_typst() {
        assert_eq!(escape_typst("C# & SQL"), "C\\# & SQL");
        assert_eq!(escape_typst("https://x.io"), "https:\\/\\/x.io");
        assert_eq!(escape_typst("*bold* [link]"), "\\*bold\\* \\[link\\]");
    }

    #[test]
    fn test_builtin_templates_have_placeholders() {
        let engine = TemplateEngine::builtin();
        let rendered = engine.render_resume(&vars(&[("summary", "SUMMARY")]));
        assert!(rendered.contains("SUMMARY"));
        assert!(rendered.contains("{{name}}"));

        let letter = engine.render_cover_letter(&vars(&[("company", "Acme")]));
        assert!(letter.contains("Dear Acme Hiring Manager"));
    }

    #[tokio::test]
    async fn test_load_prefers_files_on_disk() {
        let dir = tempfile::tempdir().unwrap();
        FsOps::write_file_safe(&dir.path().join(RESUME_TEMPLATE), "custom {{name}}")
            .await
            .unwrap();

        let engine = TemplateEngine::load(dir.path()).await.unwrap();
        assert_eq!(engine.render_resume(&vars(&[("name", "Ana")])), "custom Ana");
        assert!(engine
            .render_cover_letter(&HashMap::new())
            .contains("Hiring Manager"));
    }
}
