use crate::domain::models::AssignmentSpec;
use crate::error::Error;
use crate::services::repository::{Repository, ScriptModule};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use std::collections::{BTreeMap, VecDeque};

/// One question assigned to one participant, in request order.
#[derive(Debug)]
pub struct ResolvedAssignment<'a> {
    pub group: String,
    pub prefix: String,
    pub question: String,
    pub module: &'a ScriptModule,
}

/// Deterministic seed for a participant. The same id must always yield the
/// same generator state at the start of a draw.
pub fn seed_from_id(id: &str) -> Result<u64, Error> {
    id.trim()
        .parse::<i64>()
        .map(|v| v as u64)
        .map_err(|_| Error::InvalidId(id.to_string()))
}

/// Assign one question per spec to the given participant.
///
/// Every group in the repository is shuffled exactly once, in alphabetic
/// group order, before any spec is consumed. The shuffles draw from a
/// single generator seeded from the id, so the full sequence is identical
/// on every run and stays stable even if later configurations request
/// additional groups. Within a group a question name is never assigned
/// twice to the same participant.
pub fn draw<'a>(
    repo: &'a Repository,
    specs: &[AssignmentSpec],
    id: &str,
) -> Result<Vec<ResolvedAssignment<'a>>, Error> {
    let mut rng = StdRng::seed_from_u64(seed_from_id(id)?);

    let mut pools: BTreeMap<&str, VecDeque<&str>> = BTreeMap::new();
    for (group, questions) in &repo.groups {
        let mut names: Vec<&str> = questions.keys().map(String::as_str).collect();
        names.shuffle(&mut rng);
        pools.insert(group.as_str(), names.into_iter().collect());
    }

    let mut out = Vec::with_capacity(specs.len());
    for spec in specs {
        let pool = pools
            .get_mut(spec.group.as_str())
            .ok_or_else(|| Error::UnknownGroup(spec.group.clone()))?;
        let question = pool
            .pop_front()
            .ok_or_else(|| Error::GroupExhausted(spec.group.clone()))?;
        out.push(ResolvedAssignment {
            group: spec.group.clone(),
            prefix: spec.prefix.clone(),
            question: question.to_string(),
            module: &repo.groups[spec.group.as_str()][question],
        });
    }
    Ok(out)
}
