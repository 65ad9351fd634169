use anyhow::Context;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::debug;

/// Fixed name of the typeset source inside the working directory; the
/// compiler derives the artifact name from it.
pub const SOURCE_FILE: &str = "source.tex";
const ARTIFACT_FILE: &str = "source.pdf";

/// Non-interactive, fail-fast invocation; the compiler must never sit
/// waiting on a prompt inside a batch run.
const COMPILER_FLAGS: &[&str] = &["-halt-on-error", "-file-line-error", "-output-format=pdf"];

/// Everything one compilation needs. Created right before the build and
/// discarded after it.
pub struct BuildJob<'a> {
    pub lines: &'a [String],
    pub output: &'a Path,
    pub includes: &'a [PathBuf],
    pub compiler: &'a str,
}

/// `success` reflects the compiler's exit status; `log` carries the full
/// captured output either way so the caller can surface the real error.
pub struct BuildOutcome {
    pub success: bool,
    pub log: String,
}

/// Compile `lines` into the job's output artifact.
///
/// The whole run happens in a private, uniquely named working directory
/// under the system temp dir, with the include directories symlinked in so
/// relative asset references resolve without copying. The directory is
/// removed on every exit path (success, compiler failure, or error). The
/// artifact is relocated iff the compiler actually produced it; a failed
/// run leaves the output path untouched. Never retried here.
pub fn build(job: &BuildJob<'_>) -> anyhow::Result<BuildOutcome> {
    let workdir = tempfile::Builder::new()
        .prefix("examen-build-")
        .tempdir()
        .context("creating build working directory")?;
    debug!(dir = %workdir.path().display(), "build working directory ready");

    for include in job.includes {
        let Some(base) = include.file_name() else {
            anyhow::bail!("include directory has no base name: {}", include.display());
        };
        std::os::unix::fs::symlink(include, workdir.path().join(base))
            .with_context(|| format!("linking include directory {}", include.display()))?;
    }

    let source = workdir.path().join(SOURCE_FILE);
    let mut file = std::fs::File::create(&source)
        .with_context(|| format!("creating {}", source.display()))?;
    for line in job.lines {
        writeln!(file, "{}", line).context("writing typeset source")?;
    }
    file.flush().context("flushing typeset source")?;
    drop(file);

    let out = Command::new(job.compiler)
        .args(COMPILER_FLAGS)
        .arg(SOURCE_FILE)
        .current_dir(workdir.path())
        .output()
        .with_context(|| format!("running compiler '{}'", job.compiler))?;

    let mut log = String::from_utf8_lossy(&out.stdout).into_owned();
    let stderr = String::from_utf8_lossy(&out.stderr);
    if !stderr.trim().is_empty() {
        if !log.is_empty() && !log.ends_with('\n') {
            log.push('\n');
        }
        log.push_str(&stderr);
    }

    let artifact = workdir.path().join(ARTIFACT_FILE);
    if artifact.is_file() {
        relocate(&artifact, job.output)?;
        debug!(output = %job.output.display(), "artifact relocated");
    }

    Ok(BuildOutcome {
        success: out.status.success(),
        log,
    })
    // workdir drops here, removing the tree regardless of outcome
}

/// Rename where possible; the temp dir usually lives on another filesystem,
/// so fall back to copy + remove.
fn relocate(from: &Path, to: &Path) -> anyhow::Result<()> {
    if std::fs::rename(from, to).is_ok() {
        return Ok(());
    }
    std::fs::copy(from, to)
        .with_context(|| format!("moving artifact to {}", to.display()))?;
    std::fs::remove_file(from).ok();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{build, BuildJob};
    use std::collections::BTreeSet;
    use std::os::unix::fs::PermissionsExt;
    use std::path::{Path, PathBuf};

    fn stub_compiler(dir: &Path, name: &str, body: &str) -> PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, format!("#!/bin/sh\n{}\n", body)).expect("write stub compiler");
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755))
            .expect("make stub executable");
        path
    }

    fn tmp_build_dirs() -> BTreeSet<String> {
        std::fs::read_dir(std::env::temp_dir())
            .expect("read temp dir")
            .filter_map(|e| e.ok())
            .filter_map(|e| e.file_name().into_string().ok())
            .filter(|n| n.starts_with("examen-build-"))
            .collect()
    }

    fn lines(v: &[&str]) -> Vec<String> {
        v.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn successful_build_relocates_artifact_and_captures_log() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let compiler = stub_compiler(
            tmp.path(),
            "okc.sh",
            "cat source.tex > source.pdf\necho 'pages written'",
        );
        let output = tmp.path().join("out/final.pdf");
        std::fs::create_dir_all(output.parent().unwrap()).unwrap();

        let src = lines(&["line one", "line two"]);
        let outcome = build(&BuildJob {
            lines: &src,
            output: &output,
            includes: &[],
            compiler: compiler.to_str().unwrap(),
        })
        .expect("build runs");

        assert!(outcome.success);
        assert!(outcome.log.contains("pages written"));
        let artifact = std::fs::read_to_string(&output).expect("artifact exists");
        assert_eq!(artifact, "line one\nline two\n");
    }

    #[test]
    fn failed_build_reports_log_and_leaves_output_untouched() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let compiler = stub_compiler(
            tmp.path(),
            "badc.sh",
            "echo 'source.tex:3: undefined control sequence'\nexit 1",
        );
        let output = tmp.path().join("final.pdf");

        let src = lines(&["\\broken"]);
        let outcome = build(&BuildJob {
            lines: &src,
            output: &output,
            includes: &[],
            compiler: compiler.to_str().unwrap(),
        })
        .expect("build itself runs");

        assert!(!outcome.success);
        assert!(outcome.log.contains("undefined control sequence"));
        assert!(!output.exists(), "no partial artifact may appear");
    }

    #[test]
    fn include_directories_are_linked_into_the_working_directory() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let assets = tmp.path().join("img");
        std::fs::create_dir_all(&assets).unwrap();
        std::fs::write(assets.join("logo.txt"), "logo").unwrap();
        // The stub proves the link works by reading through it.
        let compiler = stub_compiler(tmp.path(), "linkc.sh", "cat img/logo.txt > source.pdf");
        let output = tmp.path().join("final.pdf");

        let src = lines(&["body"]);
        let outcome = build(&BuildJob {
            lines: &src,
            output: &output,
            includes: &[assets],
            compiler: compiler.to_str().unwrap(),
        })
        .expect("build runs");

        assert!(outcome.success);
        assert_eq!(std::fs::read_to_string(&output).unwrap(), "logo");
    }

    #[test]
    fn no_residual_working_directory_on_success_or_failure() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let ok = stub_compiler(tmp.path(), "okc.sh", ": > source.pdf");
        let bad = stub_compiler(tmp.path(), "badc.sh", "exit 1");
        let output = tmp.path().join("final.pdf");

        let before = tmp_build_dirs();
        let src = lines(&["x"]);
        build(&BuildJob {
            lines: &src,
            output: &output,
            includes: &[],
            compiler: ok.to_str().unwrap(),
        })
        .expect("ok build");
        build(&BuildJob {
            lines: &src,
            output: &output,
            includes: &[],
            compiler: bad.to_str().unwrap(),
        })
        .expect("failing build still returns");
        let after = tmp_build_dirs();

        assert!(
            after.is_subset(&before),
            "build left working directories behind: {:?}",
            after.difference(&before).collect::<Vec<_>>()
        );
    }
}
