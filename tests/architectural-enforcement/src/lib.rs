//! Architectural Enforcement
//!
//! Source scanners used by the integration tests in this package to keep the
//! engine's structure honest:
//! - No blocking sleeps anywhere in the engine
//! - Timed waits only in the scheduling modules (spin and playback)
//!
//! Scanners work on raw source text. Comments and `#[cfg(test)]` modules are
//! skipped.

use std::fs;
use std::path::{Path, PathBuf};

/// A source line that broke a rule
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Violation {
    /// File the line is in
    pub path: PathBuf,
    /// 1-based line number
    pub line: usize,
    /// Trimmed source text
    pub text: String,
}

impl std::fmt::Display for Violation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{} - {}", self.path.display(), self.line, self.text)
    }
}

/// Engine sources, resolved from this package's manifest directory
#[must_use]
pub fn engine_src() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("..")
        .join("conductor")
        .join("core")
        .join("src")
}

/// Every `.rs` file under `dir`
#[must_use]
pub fn rust_files(dir: &Path) -> Vec<PathBuf> {
    walkdir::WalkDir::new(dir)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|e| e.path().extension().and_then(|s| s.to_str()) == Some("rs"))
        .map(|e| e.path().to_path_buf())
        .collect()
}

/// Production lines of a file with their 1-based numbers
///
/// Line comments are stripped and everything from `#[cfg(test)]` on is
/// dropped, since test modules sit at the end of each file.
#[must_use]
pub fn production_lines(content: &str) -> Vec<(usize, String)> {
    content
        .lines()
        .enumerate()
        .take_while(|(_, line)| line.trim() != "#[cfg(test)]")
        .map(|(idx, line)| {
            let code = line.split("//").next().unwrap_or(line);
            (idx + 1, code.to_string())
        })
        .filter(|(_, code)| !code.trim().is_empty())
        .collect()
}

/// Lines under `dir` whose code matches `pattern`, skipping allowed files
#[must_use]
pub fn find_violations(
    dir: &Path,
    pattern: impl Fn(&str) -> bool,
    allowed: impl Fn(&Path) -> bool,
) -> Vec<Violation> {
    let mut violations = Vec::new();

    for path in rust_files(dir) {
        if allowed(&path) {
            continue;
        }
        let Ok(content) = fs::read_to_string(&path) else {
            continue;
        };
        for (line, code) in production_lines(&content) {
            if pattern(&code) {
                violations.push(Violation {
                    path: path.clone(),
                    line,
                    text: code.trim().to_string(),
                });
            }
        }
    }

    violations
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_production_lines_skip_comments_and_tests() {
        let source = "fn a() {}\n// sleep(1)\nlet x = 1; // trailing\n#[cfg(test)]\nmod tests {}\n";
        let lines = production_lines(source);
        assert_eq!(
            lines,
            vec![(1, "fn a() {}".to_string()), (3, "let x = 1; ".to_string())]
        );
    }
}
