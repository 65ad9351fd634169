use anyhow::Context;
use std::os::unix::fs::PermissionsExt;
use std::path::Path;

const QUESTION_SCRIPT: &str = r#"#!/bin/sh
# Protocol: capabilities | question <id> [--answer-area]
#         | answer <id> [--debug] | algorithm [--debug] <base> <exp>
op="$1"
[ -n "$op" ] && shift

vars() {
    base=$((100 + $1 % 17 * 10))
    exp=$((2 + $1 % 3))
}

power() {
    r=1
    i=0
    while [ "$i" -lt "$2" ]; do
        r=$((r * $1))
        i=$((i + 1))
    done
    echo "$r"
}

case "$op" in
capabilities)
    echo "question answer algorithm"
    ;;
question)
    vars "$1"
    printf 'How much is $%s^{%s}$?\n' "$base" "$exp"
    if [ "$2" = "--answer-area" ]; then
        printf '%s\n' '\begin{tabularx}{\textwidth}{|X|}\hline \\ \\ \hline\end{tabularx}'
    fi
    ;;
answer)
    vars "$1"
    r=$(power "$base" "$exp")
    if [ "$2" = "--debug" ]; then
        echo "$r [id=$1 base=$base exp=$exp]"
    else
        echo "$r"
    fi
    ;;
algorithm)
    if [ "$1" = "--debug" ]; then
        shift
        echo "base=$1 exp=$2" >&2
    fi
    power "$1" "$2"
    ;;
*)
    echo "unknown operation: $op" >&2
    exit 2
    ;;
esac
"#;

const STUDENTS: &str = "\
10001 Ada Lovelace
10002 Alan Turing
10003 Grace Hopper
10004 Edsger Dijkstra
10005 Barbara Liskov
10006 Donald Knuth
10007 Radia Perlman
10008 Tony Hoare
10009 Frances Allen
10010 John Backus
";

/// Create a dummy project (config, one question group, roster) in `dir`.
/// Refuses to clobber anything that already exists.
pub fn create_project(dir: &Path) -> anyhow::Result<()> {
    for existing in ["config.json", "Questions", "students.txt"] {
        if dir.join(existing).exists() {
            anyhow::bail!("'{}' already exists", existing);
        }
    }

    std::fs::write(
        dir.join("config.json"),
        serde_json::to_string_pretty(&dummy_config())?,
    )
    .context("writing config.json")?;

    let group = dir.join("Questions").join("Easy");
    std::fs::create_dir_all(&group).context("creating Questions/Easy")?;
    let script = group.join("power.sh");
    std::fs::write(&script, QUESTION_SCRIPT).context("writing power.sh")?;
    std::fs::set_permissions(&script, std::fs::Permissions::from_mode(0o755))
        .context("marking power.sh executable")?;

    std::fs::write(dir.join("students.txt"), STUDENTS).context("writing students.txt")?;
    Ok(())
}

fn dummy_config() -> serde_json::Value {
    serde_json::json!({
        "repository": "Questions",
        "input": { "students": "students.txt" },
        "output": {
            "tests": "Tests.pdf",
            "template": "Template.pdf",
            "all": "AllQuestions.pdf"
        },
        "questions": [
            { "group": "Easy", "prefix": "Weight 1" }
        ],
        "tex": {
            "replaces": {
                "%UNIVERSITY%": "University of XYZ",
                "%TEST_NAME%": "First evaluation",
                "%COURSE%": "Programming",
                "%PROFESSOR%": "John",
                "%CLASS%": "A-2",
                "%DATE%": "Today"
            },
            "includes": [],
            "preamble": [
                "\\documentclass[twoside,a4paper,12pt]{article}",
                "\\usepackage[T1]{fontenc}",
                "\\usepackage[top=20mm, bottom=20mm, left=20mm, right=20mm]{geometry}",
                "\\usepackage{tabularx}",
                "\\usepackage{multirow}",
                "\\usepackage{amsmath}",
                "\\begin{document}",
                "\\pagestyle{empty}",
                ""
            ],
            "termination": [
                "\\end{document}"
            ],
            "test": {
                "header": [
                    "",
                    "\\noindent{\\LARGE\\textbf{%UNIVERSITY%}} \\hfill %DATE%\\\\",
                    "{\\large %TEST_NAME% --- %COURSE% (%CLASS%), Prof. %PROFESSOR%}\\\\",
                    "\\textbf{Name:} %NAME% \\hfill \\textbf{ID:} %ID%",
                    ""
                ],
                "before": [
                    "\\textbf{Question %COUNT% (%PREFIX%):}"
                ],
                "after": [
                    ""
                ],
                "footer": [
                    "\\cleardoublepage{}"
                ]
            },
            "template": {
                "header": [
                    "",
                    "\\begin{center}{\\Huge\\textbf{Answer key}}\\end{center}",
                    ""
                ],
                "student": [
                    "\\begin{tabularx}{\\textwidth}{|p{0cm}*{%TOTAL%}{|X}|}",
                    "\\hline",
                    "\\multirow{2}{*}{} & \\multicolumn{%TOTAL%}{|c|}{\\textbf{%NAME% (%ID%)}} \\\\",
                    "\\hline"
                ],
                "answer": [
                    " & {\\scriptsize\\textbf{%COUNT%:}} {\\small %ANSWER%}"
                ],
                "next": [
                    " \\\\ ",
                    "\\hline",
                    "\\end{tabularx}",
                    ""
                ],
                "footer": [
                    ""
                ]
            },
            "all": {
                "header": [
                    "",
                    "\\begin{center}{\\Huge\\textbf{Questions (ID = %ID%)}}\\end{center}",
                    ""
                ],
                "question": [
                    "\\begin{tabularx}{\\textwidth}{|X|}",
                    "\\hline",
                    "\\textbf{Group ``%GROUP%'', question ``%NAME%''} \\\\",
                    "\\hline"
                ],
                "answer": [
                    "\\\\",
                    "\\hline",
                    "\\textbf{Answer:} %ANSWER% \\\\"
                ],
                "next": [
                    "\\hline",
                    "\\end{tabularx}",
                    "",
                    ""
                ],
                "footer": [
                    ""
                ]
            }
        }
    })
}
