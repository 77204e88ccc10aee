//! Contains wrappers for loading problem inputs from files.

use std::fs::read_to_string;

/// One line of a problem file: a goal flag and the formula text.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ProblemLine {
    /// Lines prefixed with `* ` are targets (goals); the rest are hypotheses.
    pub target: bool,
    pub formula: String,
}

/// Read the formulae of a problem from the specified file. Lines prefixed `* ` are
/// targets; blank lines and lines starting with `#` (comments) are ignored.
/// The syntax of the formulae is checked later during parsing.
pub fn load_problem(problem_path: &str) -> Result<Vec<ProblemLine>, String> {
    let problem_string = read_to_string(problem_path).map_err(|e| e.to_string())?;
    Ok(parse_problem_lines(problem_string.as_str()))
}

/// Split raw problem text into classified lines.
pub fn parse_problem_lines(contents: &str) -> Vec<ProblemLine> {
    let mut lines = Vec::new();
    for line in contents.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        if let Some(stripped) = trimmed.strip_prefix("* ") {
            lines.push(ProblemLine {
                target: true,
                formula: stripped.to_string(),
            });
        } else {
            lines.push(ProblemLine {
                target: false,
                formula: trimmed.to_string(),
            });
        }
    }
    lines
}
