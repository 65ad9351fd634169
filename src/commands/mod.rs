//! Thin command handlers; all logic lives in the service layer.

pub mod generate;
pub mod inspect;

use crate::cli::{Cli, Commands};
use crate::domain::models::Config;
use crate::services::repository::Repository;
use crate::services::{output, scaffold};
use anyhow::Context;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Everything a command needs: parsed config, the directory it lives in
/// (all relative paths resolve against it), the loaded repository and the
/// CLI replacement overrides.
pub struct Project {
    pub config: Config,
    pub dir: PathBuf,
    pub repo: Repository,
    pub overrides: Vec<(String, String)>,
}

impl Project {
    pub fn load(cli: &Cli) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(&cli.config).with_context(|| {
            format!(
                "config file '{}' not found (use --config, or 'examen init' for a dummy project)",
                cli.config.display()
            )
        })?;
        let config: Config =
            serde_json::from_str(&raw).context("config parser error")?;
        let dir = cli
            .config
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));
        let repo = Repository::load(&resolve(&dir, &config.repository), &config.extension)?;
        debug!(
            config = %cli.config.display(),
            groups = repo.groups.len(),
            "project loaded"
        );
        Ok(Project {
            config,
            dir,
            repo,
            overrides: parse_overrides(&cli.replace)?,
        })
    }

    pub fn resolve(&self, path: &str) -> PathBuf {
        resolve(&self.dir, path)
    }
}

fn resolve(base: &Path, path: &str) -> PathBuf {
    let p = PathBuf::from(path);
    if p.is_absolute() {
        p
    } else {
        base.join(p)
    }
}

fn parse_overrides(raw: &[String]) -> anyhow::Result<Vec<(String, String)>> {
    raw.iter()
        .map(|entry| {
            entry
                .split_once('=')
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .ok_or_else(|| anyhow::anyhow!("invalid --replace '{}', expected KEY=VALUE", entry))
        })
        .collect()
}

pub fn dispatch(cli: &Cli) -> anyhow::Result<()> {
    if matches!(cli.command, Commands::Init) {
        scaffold::create_project(Path::new("."))?;
        return output::print_one(cli.json, "created", |_| {
            "dummy project created (config.json, Questions/, students.txt)".to_string()
        });
    }

    let project = Project::load(cli)?;
    match &cli.command {
        Commands::Generate => generate::tests_and_key(cli, &project),
        Commands::All { id } => generate::all_questions(cli, &project, id),
        Commands::List => inspect::list(cli, &project),
        Commands::Question { target } => inspect::question(cli, &project, target),
        Commands::Debug { target } => inspect::algorithm(cli, &project, target),
        Commands::Interactive => inspect::interactive(&project),
        Commands::Init => unreachable!("handled before project loading"),
    }
}
