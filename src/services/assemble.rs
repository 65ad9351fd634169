use crate::domain::models::{Config, Participant};
use crate::services::assignment::draw;
use crate::services::repository::Repository;
use crate::services::template::{render, Replacements};
use tracing::{debug, info};

/// Context shared by all three document kinds: config replacements, CLI
/// overrides on top, then the engine-produced total question count.
pub fn base_replacements(config: &Config, overrides: &[(String, String)]) -> Replacements {
    let mut base = Replacements::new(config.tex.replaces.clone());
    for (token, value) in overrides {
        base.set(token.clone(), value.clone());
    }
    base.set("%TOTAL%", config.questions.len().to_string());
    base
}

/// The personalized test booklet: one section per roster participant, each
/// with its own deterministic draw and a reserved answer area per question.
pub fn test_booklet(
    repo: &Repository,
    config: &Config,
    roster: &[Participant],
    base: &Replacements,
) -> anyhow::Result<Vec<String>> {
    let mut lines = render(&config.tex.preamble, base);
    for participant in roster {
        info!(id = %participant.id, name = %participant.name, "assembling test");
        let student = base.overlay([
            ("%ID%", participant.id.clone()),
            ("%NAME%", participant.name.clone()),
        ]);
        lines.extend(render(&config.tex.test.header, &student));
        for (count, assigned) in draw(repo, &config.questions, &participant.id)?
            .iter()
            .enumerate()
        {
            let ctx = student.overlay([
                ("%COUNT%", (count + 1).to_string()),
                ("%PREFIX%", assigned.prefix.clone()),
            ]);
            lines.extend(render(&config.tex.test.before, &ctx));
            lines.push(assigned.module.question(&participant.id, true)?);
            lines.extend(render(&config.tex.test.after, &ctx));
        }
        lines.extend(render(&config.tex.test.footer, &student));
    }
    lines.extend(render(&config.tex.termination, base));
    Ok(lines)
}

/// The answer key: one row block per participant listing the computed
/// answers of exactly the questions that participant drew.
pub fn answer_key(
    repo: &Repository,
    config: &Config,
    roster: &[Participant],
    base: &Replacements,
) -> anyhow::Result<Vec<String>> {
    let mut lines = render(&config.tex.preamble, base);
    lines.extend(render(&config.tex.template.header, base));
    for participant in roster {
        info!(id = %participant.id, name = %participant.name, "assembling answer row");
        let student = base.overlay([
            ("%ID%", participant.id.clone()),
            ("%NAME%", participant.name.clone()),
        ]);
        lines.extend(render(&config.tex.template.student, &student));
        for (count, assigned) in draw(repo, &config.questions, &participant.id)?
            .iter()
            .enumerate()
        {
            let ctx = student.overlay([
                ("%COUNT%", (count + 1).to_string()),
                ("%PREFIX%", assigned.prefix.clone()),
                ("%ANSWER%", assigned.module.answer(&participant.id, false)?),
            ]);
            lines.extend(render(&config.tex.template.answer, &ctx));
        }
        lines.extend(render(&config.tex.template.next, &student));
    }
    lines.extend(render(&config.tex.template.footer, base));
    lines.extend(render(&config.tex.termination, base));
    Ok(lines)
}

/// One document holding every question in the repository, rendered and
/// answered for a single fixed id. `question` and `answer` see the same id.
pub fn all_questions(
    repo: &Repository,
    config: &Config,
    id: &str,
    base: &Replacements,
) -> anyhow::Result<Vec<String>> {
    let base = base.overlay([("%ID%", id.to_string())]);
    let mut lines = render(&config.tex.preamble, &base);
    lines.extend(render(&config.tex.all.header, &base));
    let mut count = 0;
    for module in repo.iter_modules() {
        count += 1;
        debug!(module = %module.qualified(), "adding question");
        let ctx = base.overlay([
            ("%COUNT%", count.to_string()),
            ("%GROUP%", escape_label(&module.group)),
            ("%NAME%", escape_label(&module.name)),
            ("%ANSWER%", module.answer(id, false)?),
        ]);
        lines.extend(render(&config.tex.all.question, &ctx));
        lines.push(module.question(id, false)?);
        lines.extend(render(&config.tex.all.answer, &ctx));
        lines.extend(render(&config.tex.all.next, &ctx));
    }
    lines.extend(render(&config.tex.all.footer, &base));
    lines.extend(render(&config.tex.termination, &base));
    Ok(lines)
}

/// Group and question names come from the filesystem; underscores would
/// break the typesetter when substituted into label fragments.
fn escape_label(raw: &str) -> String {
    raw.replace('_', "\\_")
}
