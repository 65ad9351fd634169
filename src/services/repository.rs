use crate::error::Error;
use anyhow::Context;
use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::{debug, warn};

/// Operations a question module may expose. `Question` and `Answer` are
/// required for document generation; `Algorithm` is diagnostic-only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Capability {
    Question,
    Answer,
    Algorithm,
}

impl Capability {
    pub fn as_str(&self) -> &'static str {
        match self {
            Capability::Question => "question",
            Capability::Answer => "answer",
            Capability::Algorithm => "algorithm",
        }
    }

    fn from_token(token: &str) -> Option<Self> {
        match token {
            "question" => Some(Capability::Question),
            "answer" => Some(Capability::Answer),
            "algorithm" => Some(Capability::Algorithm),
            _ => None,
        }
    }
}

/// One question plugin: an executable script speaking the module protocol
/// (`capabilities` / `question` / `answer` / `algorithm` subcommands).
/// Never mutated after load.
#[derive(Debug, Clone)]
pub struct ScriptModule {
    pub group: String,
    pub name: String,
    pub path: PathBuf,
    pub capabilities: BTreeSet<Capability>,
}

impl ScriptModule {
    pub fn qualified(&self) -> String {
        format!("{}:{}", self.group, self.name)
    }

    pub fn supports(&self, capability: Capability) -> bool {
        self.capabilities.contains(&capability)
    }

    fn require(&self, capability: Capability) -> Result<(), Error> {
        if self.supports(capability) {
            Ok(())
        } else {
            Err(Error::MissingCapability {
                group: self.group.clone(),
                question: self.name.clone(),
                capability: capability.as_str(),
            })
        }
    }

    /// Render the question body for a participant; `answer_area` asks the
    /// module to include a reserved response area.
    pub fn question(&self, id: &str, answer_area: bool) -> Result<String, Error> {
        self.require(Capability::Question)?;
        let mut args = vec!["question", id];
        if answer_area {
            args.push("--answer-area");
        }
        self.invoke(&args)
    }

    /// Compute the canonical answer for a participant id; `debug` appends
    /// derivation detail.
    pub fn answer(&self, id: &str, debug: bool) -> Result<String, Error> {
        self.require(Capability::Answer)?;
        let mut args = vec!["answer", id];
        if debug {
            args.push("--debug");
        }
        self.invoke(&args)
    }

    /// Invoke the underlying computation directly with raw arguments.
    pub fn algorithm(&self, raw_args: &[String], debug: bool) -> Result<String, Error> {
        self.require(Capability::Algorithm)?;
        let mut args = vec!["algorithm"];
        if debug {
            args.push("--debug");
        }
        args.extend(raw_args.iter().map(String::as_str));
        self.invoke(&args)
    }

    fn invoke(&self, args: &[&str]) -> Result<String, Error> {
        debug!(module = %self.qualified(), ?args, "invoking question module");
        let out = Command::new(&self.path)
            .args(args)
            .output()
            .map_err(|e| Error::ModuleInvocation {
                module: self.qualified(),
                message: format!("cannot run {}: {}", self.path.display(), e),
            })?;
        if !out.status.success() {
            return Err(Error::ModuleInvocation {
                module: self.qualified(),
                message: format!(
                    "exit status {}: {}",
                    out.status,
                    String::from_utf8_lossy(&out.stderr).trim_end()
                ),
            });
        }
        Ok(String::from_utf8_lossy(&out.stdout).trim_end().to_string())
    }
}

/// The loaded question bank: group name → question name → module, both
/// levels alphabetically ordered so seeded shuffles are reproducible across
/// filesystems. Built once per invocation, read-only afterwards.
#[derive(Debug, Default)]
pub struct Repository {
    pub groups: BTreeMap<String, BTreeMap<String, ScriptModule>>,
}

impl Repository {
    /// Recursively scan `root` for question scripts. Loading a module runs
    /// its `capabilities` probe, which may execute arbitrary plugin code.
    pub fn load(root: &Path, extension: &str) -> anyhow::Result<Self> {
        if !root.is_dir() {
            return Err(Error::RepositoryNotFound(root.to_path_buf()).into());
        }
        let mut repo = Repository::default();
        scan_dir(root, root, extension, &mut repo.groups)?;
        debug!(
            groups = repo.groups.len(),
            questions = repo.question_count(),
            "repository loaded"
        );
        Ok(repo)
    }

    pub fn group(&self, name: &str) -> Result<&BTreeMap<String, ScriptModule>, Error> {
        self.groups
            .get(name)
            .ok_or_else(|| Error::UnknownGroup(name.to_string()))
    }

    pub fn module(&self, group: &str, question: &str) -> Result<&ScriptModule, Error> {
        self.group(group)?
            .get(question)
            .ok_or_else(|| Error::UnknownQuestion {
                group: group.to_string(),
                question: question.to_string(),
            })
    }

    /// All modules in registry order (alphabetic group, then question).
    pub fn iter_modules(&self) -> impl Iterator<Item = &ScriptModule> {
        self.groups.values().flat_map(|g| g.values())
    }

    pub fn question_count(&self) -> usize {
        self.groups.values().map(|g| g.len()).sum()
    }
}

fn scan_dir(
    root: &Path,
    dir: &Path,
    extension: &str,
    groups: &mut BTreeMap<String, BTreeMap<String, ScriptModule>>,
) -> anyhow::Result<()> {
    for entry in std::fs::read_dir(dir)
        .with_context(|| format!("reading repository directory {}", dir.display()))?
    {
        let entry = entry?;
        let path = entry.path();
        if path.is_dir() {
            scan_dir(root, &path, extension, groups)?;
            continue;
        }
        if path.extension().and_then(|e| e.to_str()) != Some(extension) {
            continue;
        }
        let Some(name) = path.file_stem().and_then(|s| s.to_str()) else {
            continue;
        };
        let group = group_key(root, dir);
        if group.is_empty() {
            warn!(script = %path.display(), "script at repository root has no group, skipping");
            continue;
        }
        let capabilities = probe_capabilities(&path, &group, name)?;
        groups.entry(group.clone()).or_default().insert(
            name.to_string(),
            ScriptModule {
                group,
                name: name.to_string(),
                path,
                capabilities,
            },
        );
    }
    Ok(())
}

/// Group key of a directory: its path relative to the repository root with
/// components joined by `/`, so nested directories become nested group
/// entries keyed by their directory names.
fn group_key(root: &Path, dir: &Path) -> String {
    let rel = dir.strip_prefix(root).unwrap_or(dir);
    rel.components()
        .filter_map(|c| c.as_os_str().to_str())
        .collect::<Vec<_>>()
        .join("/")
}

/// The load-time "import": run the script once and read the operations it
/// advertises. Unknown tokens are ignored. The probe is not sandboxed.
fn probe_capabilities(
    path: &Path,
    group: &str,
    name: &str,
) -> Result<BTreeSet<Capability>, Error> {
    let out = Command::new(path)
        .arg("capabilities")
        .output()
        .map_err(|e| Error::ModuleInvocation {
            module: format!("{}:{}", group, name),
            message: format!("cannot run {}: {}", path.display(), e),
        })?;
    if !out.status.success() {
        return Err(Error::ModuleInvocation {
            module: format!("{}:{}", group, name),
            message: format!(
                "capabilities probe exit status {}: {}",
                out.status,
                String::from_utf8_lossy(&out.stderr).trim_end()
            ),
        });
    }
    Ok(String::from_utf8_lossy(&out.stdout)
        .split_whitespace()
        .filter_map(Capability::from_token)
        .collect())
}
