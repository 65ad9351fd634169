use crate::cli::Cli;
use crate::commands::Project;
use crate::domain::models::BuildReport;
use crate::error::Error;
use crate::services::build::{build, BuildJob};
use crate::services::{assemble, output, roster};
use std::path::{Path, PathBuf};
use tracing::{debug, info, trace};

/// The main flow: one test booklet and one answer key for the whole roster.
pub fn tests_and_key(cli: &Cli, project: &Project) -> anyhow::Result<()> {
    let roster = roster::load(&project.resolve(&project.config.input.students))?;
    let base = assemble::base_replacements(&project.config, &project.overrides);

    let booklet = assemble::test_booklet(&project.repo, &project.config, &roster, &base)?;
    trace!("assembled test booklet:\n{}", booklet.join("\n"));
    let tests_out = project.resolve(&project.config.output.tests);
    compile(project, &booklet, &tests_out)?;
    info!(output = %tests_out.display(), "test booklet written");

    let key = assemble::answer_key(&project.repo, &project.config, &roster, &base)?;
    trace!("assembled answer key:\n{}", key.join("\n"));
    let key_out = project.resolve(&project.config.output.template);
    compile(project, &key, &key_out)?;
    info!(output = %key_out.display(), "answer key written");

    let reports = [
        BuildReport {
            document: "tests",
            output: tests_out.display().to_string(),
        },
        BuildReport {
            document: "answer-key",
            output: key_out.display().to_string(),
        },
    ];
    output::print_out(cli.json, &reports, |r| {
        format!("{} written to {}", r.document, r.output)
    })
}

/// One compilation containing every question in the repository, rendered
/// and answered for the given id.
pub fn all_questions(cli: &Cli, project: &Project, id: &str) -> anyhow::Result<()> {
    let base = assemble::base_replacements(&project.config, &project.overrides);
    let lines = assemble::all_questions(&project.repo, &project.config, id, &base)?;
    trace!("assembled all-questions document:\n{}", lines.join("\n"));
    let out = project.resolve(&project.config.output.all);
    compile(project, &lines, &out)?;
    info!(output = %out.display(), "all-questions document written");

    output::print_one(
        cli.json,
        BuildReport {
            document: "all-questions",
            output: out.display().to_string(),
        },
        |r| format!("{} written to {}", r.document, r.output),
    )
}

fn compile(project: &Project, lines: &[String], output: &Path) -> anyhow::Result<()> {
    let includes: Vec<PathBuf> = project
        .config
        .tex
        .includes
        .iter()
        .map(|i| project.resolve(i))
        .collect();
    let outcome = build(&BuildJob {
        lines,
        output,
        includes: &includes,
        compiler: &project.config.tex.compiler,
    })?;
    if !outcome.success {
        return Err(Error::CompilerFailure { log: outcome.log }.into());
    }
    debug!(log = %outcome.log, "compiler log");
    Ok(())
}
