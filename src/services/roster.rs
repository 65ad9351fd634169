use crate::domain::models::Participant;
use crate::error::Error;
use anyhow::Context;
use std::path::Path;
use tracing::info;

/// Parse a roster: one participant per line, first whitespace-delimited
/// token is the identifier, the remainder the display name.
pub fn parse(text: &str) -> Result<Vec<Participant>, Error> {
    let mut out = Vec::new();
    for (idx, line) in text.lines().enumerate() {
        let mut tokens = line.split_whitespace();
        let Some(id) = tokens.next() else {
            return Err(Error::MalformedRoster { line: idx + 1 });
        };
        out.push(Participant {
            id: id.to_string(),
            name: tokens.collect::<Vec<_>>().join(" "),
        });
    }
    Ok(out)
}

pub fn load(path: &Path) -> anyhow::Result<Vec<Participant>> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading roster file {}", path.display()))?;
    let roster = parse(&text)?;
    info!(participants = roster.len(), file = %path.display(), "roster loaded");
    Ok(roster)
}
