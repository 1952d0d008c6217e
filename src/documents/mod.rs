// src/documents/mod.rs
//! Per-posting résumé and cover letter generation from Typst templates

pub mod generator;
pub mod template_engine;

pub use generator::{compile_typst, tailored_summary, DocumentGenerator, DocumentKind};
pub use template_engine::{escape_typst, TemplateEngine};
