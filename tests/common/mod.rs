use assert_cmd::cargo::cargo_bin_cmd;
use assert_cmd::Command;
use serde_json::Value;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

pub struct TestEnv {
    _tmp: TempDir,
    pub project: PathBuf,
    pub ok_compiler: PathBuf,
    pub bad_compiler: PathBuf,
}

impl TestEnv {
    /// A ready-to-generate project: two groups (Easy: power+sum, Hard:
    /// prime), a two-line roster, token-bearing fragments and a stub
    /// compiler that copies the typeset source into the artifact.
    pub fn new() -> Self {
        let tmp = TempDir::new().expect("create temp dir");
        let project = tmp.path().join("project");
        std::fs::create_dir_all(&project).expect("create project dir");

        write_question(&project, "Questions/Easy/power.sh", "power");
        write_question(&project, "Questions/Easy/sum.sh", "sum");
        write_question(&project, "Questions/Hard/prime.sh", "prime");
        std::fs::write(project.join("students.txt"), "101 Ada Lovelace\n102 Alan Turing\n")
            .expect("write roster");

        let ok_compiler = write_executable(
            tmp.path(),
            "okcc.sh",
            "#!/bin/sh\ncat source.tex > source.pdf\necho 'compiled OK'\n",
        );
        let bad_compiler = write_executable(
            tmp.path(),
            "badcc.sh",
            "#!/bin/sh\necho 'source.tex:1: fatal typesetting error'\nexit 1\n",
        );

        let env = TestEnv {
            _tmp: tmp,
            project,
            ok_compiler,
            bad_compiler,
        };
        env.write_config(&[("Easy", "W1"), ("Hard", "W2")], &env.ok_compiler);
        env
    }

    /// Rewrite config.json with the given assignment specs and compiler.
    pub fn write_config(&self, specs: &[(&str, &str)], compiler: &Path) {
        let questions: Vec<Value> = specs
            .iter()
            .map(|(group, prefix)| serde_json::json!({"group": group, "prefix": prefix}))
            .collect();
        let config = serde_json::json!({
            "repository": "Questions",
            "input": { "students": "students.txt" },
            "output": {
                "tests": "Tests.pdf",
                "template": "Template.pdf",
                "all": "AllQuestions.pdf"
            },
            "questions": questions,
            "tex": {
                "compiler": compiler.to_str().expect("compiler path utf8"),
                "replaces": { "%UNIVERSITY%": "University of XYZ" },
                "includes": [],
                "preamble": ["BEGIN %UNIVERSITY%"],
                "termination": ["END"],
                "test": {
                    "header": ["TEST %NAME% (%ID%)"],
                    "before": ["Question %COUNT% (%PREFIX%):"],
                    "after": [""],
                    "footer": ["--"]
                },
                "template": {
                    "header": ["KEY"],
                    "student": ["STUDENT %NAME% (%ID%)"],
                    "answer": ["%COUNT%: %ANSWER%"],
                    "next": ["/"],
                    "footer": [""]
                },
                "all": {
                    "header": ["ALL id=%ID%"],
                    "question": ["GROUP %GROUP% NAME %NAME%"],
                    "answer": ["ANSWER %ANSWER%"],
                    "next": ["---"],
                    "footer": [""]
                }
            }
        });
        std::fs::write(
            self.project.join("config.json"),
            serde_json::to_string_pretty(&config).expect("serialize config"),
        )
        .expect("write config");
    }

    pub fn cmd(&self) -> Command {
        let mut cmd = cargo_bin_cmd!("examen");
        cmd.current_dir(&self.project);
        cmd
    }

    pub fn run_json(&self, args: &[&str]) -> Value {
        let out = self
            .cmd()
            .arg("--json")
            .args(args)
            .assert()
            .success()
            .get_output()
            .stdout
            .clone();
        serde_json::from_slice(&out).expect("valid json output")
    }

    pub fn run_fail_json(&self, args: &[&str]) -> Value {
        let out = self
            .cmd()
            .arg("--json")
            .args(args)
            .assert()
            .failure()
            .get_output()
            .stdout
            .clone();
        serde_json::from_slice(&out).expect("valid json error output")
    }

    pub fn read(&self, rel: &str) -> String {
        std::fs::read_to_string(self.project.join(rel)).expect("read project file")
    }
}

/// A protocol-conforming question script whose outputs are tagged with the
/// question name and the participant id, so document contents are easy to
/// assert on.
fn write_question(project: &Path, rel: &str, tag: &str) {
    let body = format!(
        r#"#!/bin/sh
case "$1" in
capabilities)
    echo 'question answer algorithm'
    ;;
question)
    if [ "$3" = "--answer-area" ]; then
        echo "Q[{tag}:$2:area]"
    else
        echo "Q[{tag}:$2]"
    fi
    ;;
answer)
    if [ "$3" = "--debug" ]; then
        echo "A[{tag}:$2:debug]"
    else
        echo "A[{tag}:$2]"
    fi
    ;;
algorithm)
    shift
    if [ "$1" = "--debug" ]; then
        shift
    fi
    echo "R[{tag}:$*]"
    ;;
*)
    exit 2
    ;;
esac
"#
    );
    let path = project.join(rel);
    std::fs::create_dir_all(path.parent().expect("group dir")).expect("create group dir");
    std::fs::write(&path, body).expect("write question script");
    std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755))
        .expect("make question executable");
}

pub fn write_executable(dir: &Path, name: &str, body: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, body).expect("write executable");
    std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755))
        .expect("set executable bit");
    path
}
