//! Reading `go.mod` manifests.
//!
//! Only the parts of a manifest that decide *which files* a build needs are
//! interpreted:
//!
//! - the `module` directive, which names the build unit
//! - `replace` directives, which may redirect a dependency to a local directory
//!
//! Every other directive (`go`, `toolchain`, `require`, `exclude`, `retract`,
//! `godebug`, `tool`, `ignore`) is recognized and skipped, including in
//! parenthesized block form. Version selection is out of scope.
//!
//! # Format
//!
//! ```text
//! module example.com/app
//!
//! go 1.22
//!
//! require example.com/lib v1.0.0
//!
//! replace example.com/lib => ../lib
//!
//! replace (
//!     example.com/old v1.2.0 => example.com/new v1.3.0
//!     "example.com/quoted" => ./vendor/quoted // comment
//! )
//! ```

mod lexer;

use std::path::{Path, PathBuf};

use tracing::trace;

use crate::core::GosrcsError;
use lexer::{Line, tokenize};

/// File name of a module manifest.
pub const MANIFEST_FILE: &str = "go.mod";

/// File name of the checksum file that accompanies a manifest.
pub const CHECKSUM_FILE: &str = "go.sum";

/// Directives that are valid but carry nothing this crate needs.
const SKIPPED_VERBS: &[&str] =
    &["go", "toolchain", "godebug", "require", "exclude", "retract", "tool", "ignore"];

/// A module path with an optional version (empty when absent).
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ModuleVersion {
    /// Module path, or a filesystem path on the right-hand side of a replace
    pub path: String,
    /// Version, empty if none was written
    pub version: String,
}

/// One `replace old [v] => new [v]` directive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Replacement {
    /// The module being replaced
    pub old: ModuleVersion,
    /// What it is replaced with
    pub new: ModuleVersion,
    /// 1-based line of the directive
    pub line: usize,
}

/// The interpreted subset of a `go.mod` file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GoModFile {
    /// The declared module path
    pub module_path: String,
    /// Every `replace` directive, in file order
    pub replacements: Vec<Replacement>,
}

impl GoModFile {
    /// Reads and parses the manifest at `path`.
    ///
    /// # Errors
    ///
    /// [`GosrcsError::ManifestReadError`] if the file cannot be read, and
    /// [`GosrcsError::ManifestParseError`] if its content is invalid.
    pub fn load(path: &Path) -> Result<Self, GosrcsError> {
        let content = std::fs::read_to_string(path).map_err(|e| GosrcsError::ManifestReadError {
            file: path.display().to_string(),
            reason: e.to_string(),
        })?;
        Self::parse(&path.display().to_string(), &content)
    }

    /// Parses manifest `content`; `file` is only used in error messages.
    ///
    /// # Errors
    ///
    /// Returns [`GosrcsError::ManifestParseError`] for unterminated strings
    /// or blocks, unknown directives, malformed `module`/`replace` lines, and
    /// a missing `module` directive.
    pub fn parse(file: &str, content: &str) -> Result<Self, GosrcsError> {
        let err = |line: usize, reason: String| GosrcsError::ManifestParseError {
            file: file.to_string(),
            line,
            reason,
        };

        let lines = tokenize(content).map_err(|(line, reason)| err(line, reason))?;

        let mut module_path: Option<String> = None;
        let mut replacements = Vec::new();
        let mut block: Option<(String, usize)> = None;

        for Line { number, tokens } in lines {
            if let Some((verb, _)) = &block {
                if tokens.len() == 1 && tokens[0] == ")" {
                    block = None;
                    continue;
                }
                let verb = verb.clone();
                apply_directive(&verb, &tokens, number, &mut module_path, &mut replacements)
                    .map_err(|reason| err(number, reason))?;
                continue;
            }

            let verb = tokens[0].clone();
            let args = &tokens[1..];
            if args.first().is_some_and(|t| t == "(") {
                check_verb(&verb).map_err(|reason| err(number, reason))?;
                match args.len() {
                    1 => block = Some((verb, number)),
                    2 if args[1] == ")" => {}
                    _ => return Err(err(number, "syntax error: unexpected tokens after '('".to_string())),
                }
                continue;
            }

            apply_directive(&verb, args, number, &mut module_path, &mut replacements)
                .map_err(|reason| err(number, reason))?;
        }

        if let Some((verb, line)) = block {
            return Err(err(line, format!("unterminated {verb} block")));
        }

        let module_path = module_path.ok_or_else(|| err(1, "no module declaration".to_string()))?;
        trace!("Parsed {}: module {} with {} replacement(s)", file, module_path, replacements.len());

        Ok(Self {
            module_path,
            replacements,
        })
    }
}

fn check_verb(verb: &str) -> Result<(), String> {
    if verb == "module" || verb == "replace" || SKIPPED_VERBS.contains(&verb) {
        Ok(())
    } else {
        Err(format!("unknown directive: {verb}"))
    }
}

fn apply_directive(
    verb: &str,
    args: &[String],
    line: usize,
    module_path: &mut Option<String>,
    replacements: &mut Vec<Replacement>,
) -> Result<(), String> {
    check_verb(verb)?;
    match verb {
        "module" => {
            if module_path.is_some() {
                return Err("repeated module statement".to_string());
            }
            let [path] = args else {
                return Err("usage: module module/path".to_string());
            };
            *module_path = Some(path.clone());
        }
        "replace" => replacements.push(parse_replace(args, line)?),
        _ => {}
    }
    Ok(())
}

fn parse_replace(args: &[String], line: usize) -> Result<Replacement, String> {
    const USAGE: &str = "usage: replace module/path [v1.2.3] => other/module v1.4\n\t or replace module/path [v1.2.3] => ../local/directory";

    let arrow = match args.iter().position(|a| a == "=>") {
        Some(i @ (1 | 2)) => i,
        _ => return Err(USAGE.to_string()),
    };
    let (lhs, rhs) = (&args[..arrow], &args[arrow + 1..]);
    if rhs.is_empty() || rhs.len() > 2 {
        return Err(USAGE.to_string());
    }

    let old = ModuleVersion {
        path: lhs[0].clone(),
        version: lhs.get(1).cloned().unwrap_or_default(),
    };
    let new = ModuleVersion {
        path: rhs[0].clone(),
        version: rhs.get(1).cloned().unwrap_or_default(),
    };

    if new.version.is_empty() && !is_directory_path(&new.path) {
        return Err(
            "replacement module without version must be directory path (rooted or starting with ./ or ../)"
                .to_string(),
        );
    }

    Ok(Replacement {
        old,
        new,
        line,
    })
}

/// Reports whether a replacement target is written as a filesystem path.
fn is_directory_path(path: &str) -> bool {
    path.starts_with("./")
        || path.starts_with("../")
        || path == "."
        || path == ".."
        || path.starts_with('/')
        || (cfg!(windows) && (path.starts_with(".\\") || path.starts_with("..\\")))
        || Path::new(path).is_absolute()
}

/// Finds the nearest directory at or above `start` that contains a manifest.
///
/// # Algorithm
///
/// 1. Check for `go.mod` in the current directory
/// 2. If found, return the directory
/// 3. If not found, move to the parent directory
/// 4. Repeat until found or the filesystem root is reached
///
/// # Errors
///
/// Returns [`GosrcsError::ManifestNotFound`] if no ancestor has a manifest.
pub fn find_manifest_dir(start: &Path) -> Result<PathBuf, GosrcsError> {
    let mut current = start.to_path_buf();
    loop {
        if current.join(MANIFEST_FILE).exists() {
            return Ok(current);
        }
        if !current.pop() {
            return Err(GosrcsError::ManifestNotFound {
                start: start.display().to_string(),
            });
        }
    }
}
