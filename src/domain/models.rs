use crate::services::template::TemplateNode;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

fn default_extension() -> String {
    "sh".to_string()
}

fn default_compiler() -> String {
    "pdflatex".to_string()
}

#[derive(Serialize)]
pub struct JsonOut<T: Serialize> {
    pub ok: bool,
    pub data: T,
}

/// Project configuration, key-compatible with the classic `config.json`.
#[derive(Debug, Deserialize)]
pub struct Config {
    pub repository: String,
    #[serde(default = "default_extension")]
    pub extension: String,
    pub input: InputConfig,
    pub output: OutputConfig,
    pub questions: Vec<AssignmentSpec>,
    pub tex: TexConfig,
}

#[derive(Debug, Deserialize)]
pub struct InputConfig {
    pub students: String,
}

#[derive(Debug, Deserialize)]
pub struct OutputConfig {
    pub tests: String,
    pub template: String,
    pub all: String,
}

/// One entry of a participant's required question list. `prefix` is a
/// free-form label copied through to the rendered document; it has no
/// effect on selection.
#[derive(Debug, Clone, Deserialize)]
pub struct AssignmentSpec {
    pub group: String,
    pub prefix: String,
}

#[derive(Debug, Deserialize)]
pub struct TexConfig {
    #[serde(default = "default_compiler")]
    pub compiler: String,
    #[serde(default)]
    pub replaces: BTreeMap<String, String>,
    #[serde(default)]
    pub includes: Vec<String>,
    pub preamble: TemplateNode,
    pub termination: TemplateNode,
    pub test: TestFragments,
    pub template: AnswerKeyFragments,
    pub all: AllFragments,
}

/// Fragments for the per-participant test booklet.
#[derive(Debug, Deserialize)]
pub struct TestFragments {
    pub header: TemplateNode,
    pub before: TemplateNode,
    pub after: TemplateNode,
    pub footer: TemplateNode,
}

/// Fragments for the answer key ("template" in the config schema).
#[derive(Debug, Deserialize)]
pub struct AnswerKeyFragments {
    pub header: TemplateNode,
    pub student: TemplateNode,
    pub answer: TemplateNode,
    pub next: TemplateNode,
    pub footer: TemplateNode,
}

/// Fragments for the all-questions compilation.
#[derive(Debug, Deserialize)]
pub struct AllFragments {
    pub header: TemplateNode,
    pub question: TemplateNode,
    pub answer: TemplateNode,
    pub next: TemplateNode,
    pub footer: TemplateNode,
}

/// A participant as read from the roster file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Participant {
    pub id: String,
    pub name: String,
}

#[derive(Serialize)]
pub struct QuestionListing {
    pub group: String,
    pub questions: Vec<String>,
}

#[derive(Serialize)]
pub struct BuildReport {
    pub document: &'static str,
    pub output: String,
}

#[derive(Serialize)]
pub struct AnswerReport {
    pub group: String,
    pub question: String,
    pub id: String,
    pub answer: String,
}

#[derive(Serialize)]
pub struct AlgorithmReport {
    pub group: String,
    pub question: String,
    pub args: Vec<String>,
    pub result: String,
    pub elapsed_secs: f64,
}
