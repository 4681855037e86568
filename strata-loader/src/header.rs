//! Routine name and kind extraction from the `create` header.

use std::sync::LazyLock;

use regex::Regex;
use strata_core::errors::SourceError;
use strata_core::types::RoutineKind;

static HEADER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)create\s+(procedure|function)\s+(?:([A-Za-z0-9_]+)\.)?([A-Za-z0-9_]+)")
        .unwrap()
});

/// The `create procedure|function [schema.]name` header of a source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoutineHeader {
    pub kind: RoutineKind,
    pub schema: Option<String>,
    pub name: String,
}

/// Finds the first `create` header in the substituted source.
pub fn parse_header(source: &str) -> Result<RoutineHeader, SourceError> {
    let captures = HEADER_RE.captures(source).ok_or(SourceError::MissingHeader)?;
    let kind = if captures[1].eq_ignore_ascii_case("function") {
        RoutineKind::Function
    } else {
        RoutineKind::Procedure
    };
    Ok(RoutineHeader {
        kind,
        schema: captures.get(2).map(|m| m.as_str().to_string()),
        name: captures[3].to_string(),
    })
}
