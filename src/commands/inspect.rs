use crate::cli::Cli;
use crate::commands::Project;
use crate::domain::models::{AlgorithmReport, AnswerReport, QuestionListing};
use crate::services::assignment::draw;
use crate::services::output;
use std::io::Write;
use std::time::Instant;

pub fn list(cli: &Cli, project: &Project) -> anyhow::Result<()> {
    let rows: Vec<QuestionListing> = project
        .repo
        .groups
        .iter()
        .map(|(group, questions)| QuestionListing {
            group: group.clone(),
            questions: questions.keys().cloned().collect(),
        })
        .collect();
    output::print_out(cli.json, &rows, |r| {
        format!("{}\t{}", r.group, r.questions.join(" "))
    })
}

/// Diagnostic answer lookup: `<group>:<question>:<id>`, always with
/// derivation detail.
pub fn question(cli: &Cli, project: &Project, target: &str) -> anyhow::Result<()> {
    let parts: Vec<&str> = target.split(':').collect();
    let &[group, name, id] = parts.as_slice() else {
        anyhow::bail!("argument error, usage: question <group>:<question>:<id>");
    };
    let module = project.repo.module(group, name)?;
    let answer = module.answer(id, true)?;
    output::print_one(
        cli.json,
        AnswerReport {
            group: group.to_string(),
            question: name.to_string(),
            id: id.to_string(),
            answer,
        },
        |r| r.answer.clone(),
    )
}

/// Direct algorithm invocation with raw arguments:
/// `<group>:<question>:<arg>[:<arg>...]`, reporting elapsed time.
pub fn algorithm(cli: &Cli, project: &Project, target: &str) -> anyhow::Result<()> {
    let parts: Vec<&str> = target.split(':').collect();
    if parts.len() < 3 {
        anyhow::bail!("argument error, usage: debug <group>:<question>:<arg>[:<arg>...]");
    }
    let (group, name) = (parts[0], parts[1]);
    let args: Vec<String> = parts[2..].iter().map(|a| a.to_string()).collect();
    let module = project.repo.module(group, name)?;

    let started = Instant::now();
    let result = module.algorithm(&args, cli.verbose > 0)?;
    let elapsed_secs = started.elapsed().as_secs_f64();

    output::print_one(
        cli.json,
        AlgorithmReport {
            group: group.to_string(),
            question: name.to_string(),
            args,
            result,
            elapsed_secs,
        },
        |r| format!("{}\nTime elapsed: {:.12}s", r.result, r.elapsed_secs),
    )
}

/// Read participant ids from stdin and print their resolved assignments
/// with computed answers. EOF ends the session; bad input reports and
/// continues.
pub fn interactive(project: &Project) -> anyhow::Result<()> {
    let stdin = std::io::stdin();
    let mut line = String::new();
    loop {
        print!("Enter an ID (Ctrl+D to exit): ");
        std::io::stdout().flush()?;
        line.clear();
        if stdin.read_line(&mut line)? == 0 {
            println!();
            return Ok(());
        }
        let id = line.trim();
        if id.is_empty() {
            continue;
        }
        match draw(&project.repo, &project.config.questions, id) {
            Ok(assigned) => {
                for q in &assigned {
                    match q.module.answer(id, false) {
                        Ok(answer) => println!(
                            "  {:>16}.{:<16} = {:<32} ({})",
                            q.group, q.question, answer, q.prefix
                        ),
                        Err(e) => println!("  {:>16}.{:<16} = <{}>", q.group, q.question, e),
                    }
                }
            }
            Err(e) => println!("{}", e),
        }
    }
}
