//! Placeholder substitution.
//!
//! Routine sources may reference configured placeholders (`@schema@`,
//! `@max_len%type@`) and the magic constants `__FILE__`, `__ROUTINE__`,
//! `__DIR__`, and `__LINE__`. Configured placeholders come from the shared
//! [`PlaceholderMap`]; magic constants live in a per-load overlay that is
//! discarded afterwards, so they never reach persisted metadata.

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;
use rustc_hash::FxHashMap;
use strata_core::errors::SourceError;
use strata_core::types::PlaceholderMap;
use tracing::debug;

/// Configured placeholder token: `@name@` or `@name%type@`.
static TOKEN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"@[A-Za-z0-9_.]+(?:%type)?@").unwrap());

/// Magic constants, matched in any letter case like ordinary placeholders.
static MAGIC_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)__(?:file|routine|dir|line)__").unwrap());

/// Result of substituting one routine source.
#[derive(Debug, Clone)]
pub struct Substitution {
    /// Source lines with every placeholder and magic constant resolved.
    pub lines: Vec<String>,

    /// Configured placeholders referenced by this source, keyed by the
    /// spelling first seen in the file. Magic constants are excluded.
    pub replace: BTreeMap<String, String>,
}

impl Substitution {
    /// The substituted source as one string, lines joined by `\n`.
    pub fn text(&self) -> String {
        self.lines.join("\n")
    }
}

/// Per-load values of the magic constants.
///
/// `__FILE__`, `__DIR__`, and `__ROUTINE__` are fixed for the whole file;
/// `__LINE__` is recomputed per output line. All four substitute as
/// single-quoted SQL literals.
#[derive(Debug, Clone)]
pub struct MagicOverlay {
    file: String,
    dir: String,
    routine: String,
}

impl MagicOverlay {
    pub fn new(path: &Path, routine_name: &str) -> Self {
        let real_path = std::fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf());
        let dir = real_path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();
        Self {
            file: sql_literal(&real_path.display().to_string()),
            dir: sql_literal(&dir.display().to_string()),
            routine: sql_literal(routine_name),
        }
    }

    fn resolve(&self, token: &str, line_number: usize) -> String {
        match token.to_lowercase().as_str() {
            "__file__" => self.file.clone(),
            "__dir__" => self.dir.clone(),
            "__routine__" => self.routine.clone(),
            "__line__" => sql_literal(&line_number.to_string()),
            _ => token.to_string(),
        }
    }
}

/// Substitutes every placeholder and magic constant in `source`.
///
/// All unknown placeholders are collected and reported together; any
/// unknown name fails the whole substitution, nothing is partially
/// committed.
pub fn substitute(
    source: &str,
    placeholders: &PlaceholderMap,
    magic: &MagicOverlay,
) -> Result<Substitution, SourceError> {
    // Lowercased token -> spelling first seen in the file.
    let mut seen: FxHashMap<String, String> = FxHashMap::default();
    let mut replace = BTreeMap::new();
    let mut unknown = Vec::new();

    for token_match in TOKEN_RE.find_iter(source) {
        let token = token_match.as_str();
        let key = token.to_lowercase();
        match placeholders.resolve(token) {
            Some(value) => {
                if !seen.contains_key(&key) {
                    seen.insert(key, token.to_string());
                    replace.insert(token.to_string(), value.to_string());
                }
            }
            None => {
                if !seen.contains_key(&key) {
                    seen.insert(key, token.to_string());
                    unknown.push(token.to_string());
                }
            }
        }
    }

    if !unknown.is_empty() {
        return Err(SourceError::UnknownPlaceholders {
            placeholders: unknown,
        });
    }

    let lines = source
        .split('\n')
        .enumerate()
        .map(|(index, line)| {
            let resolved = TOKEN_RE.replace_all(line, |captures: &regex::Captures| {
                // Checked above; a vanished key would leave the token as-is.
                placeholders
                    .resolve(&captures[0])
                    .unwrap_or(&captures[0])
                    .to_string()
            });
            MAGIC_RE
                .replace_all(&resolved, |captures: &regex::Captures| {
                    magic.resolve(&captures[0], index + 1)
                })
                .into_owned()
        })
        .collect();

    debug!(referenced = replace.len(), "placeholders substituted");
    Ok(Substitution { lines, replace })
}

fn sql_literal(text: &str) -> String {
    format!("'{}'", text.replace('\'', "''"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn overlay() -> MagicOverlay {
        MagicOverlay::new(Path::new("/tmp/routines/add_user.sql"), "add_user")
    }

    fn map(pairs: &[(&str, &str)]) -> PlaceholderMap {
        PlaceholderMap::from_pairs(pairs.iter().copied())
    }

    #[test]
    fn resolves_tokens_and_records_first_spelling() {
        let placeholders = map(&[("@schema@", "main"), ("@max_len%type@", "80")]);
        let source = "select @Schema@;\nselect @SCHEMA@;\nselect @max_len%type@;";

        let result = substitute(source, &placeholders, &overlay()).unwrap();
        assert_eq!(result.lines[0], "select main;");
        assert_eq!(result.lines[1], "select main;");
        assert_eq!(result.lines[2], "select 80;");

        // One entry per distinct token, keyed by the first spelling seen.
        assert_eq!(result.replace.len(), 2);
        assert_eq!(result.replace.get("@Schema@").map(String::as_str), Some("main"));
        assert!(!result.replace.contains_key("@SCHEMA@"));
    }

    #[test]
    fn every_unknown_placeholder_is_reported() {
        let placeholders = map(&[("@schema@", "main")]);
        let source = "select @schema@, @missing@, @also_gone@;";

        let err = substitute(source, &placeholders, &overlay()).unwrap_err();
        match err {
            SourceError::UnknownPlaceholders { placeholders } => {
                assert_eq!(placeholders, vec!["@missing@", "@also_gone@"]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn unused_placeholders_stay_out_of_replace() {
        let placeholders = map(&[("@schema@", "main"), ("@unused@", "x")]);
        let result = substitute("select @schema@;", &placeholders, &overlay()).unwrap();
        assert_eq!(result.replace.len(), 1);
    }

    #[test]
    fn magic_constants_are_quoted_and_excluded_from_replace() {
        let placeholders = map(&[]);
        let source = "insert into log values(__ROUTINE__, __LINE__);\nselect __line__;";

        let result = substitute(source, &placeholders, &overlay()).unwrap();
        assert_eq!(
            result.lines[0],
            "insert into log values('add_user', '1');"
        );
        assert_eq!(result.lines[1], "select '2';");
        assert!(result.replace.is_empty());
    }

    #[test]
    fn quotes_in_magic_values_are_doubled() {
        let magic = MagicOverlay::new(Path::new("/tmp/o'brien/q.sql"), "q");
        let result = substitute("select __FILE__;", &map(&[]), &magic).unwrap();
        assert!(result.lines[0].contains("o''brien"));
    }

    #[test]
    fn text_joins_lines_back_together() {
        let result = substitute("a\nb", &map(&[]), &overlay()).unwrap();
        assert_eq!(result.text(), "a\nb");
    }
}
