//! Designation annotation parsing.
//!
//! The line immediately before the routine-body start marker must carry
//! `-- type: <designation> [<arguments>]`. Built-in designations are
//! argument-shape-checked; anything else passes through as
//! [`Designation::Other`] for dialect extensions.

use std::sync::LazyLock;

use regex::Regex;
use strata_core::errors::SourceError;
use strata_core::types::Designation;

static ANNOTATION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*--\s*type\s*:\s*(\w+)\s*(.*?)\s*$").unwrap());

/// `<table_name> <comma_separated_columns>`.
static BULK_ARGS_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([A-Za-z0-9_]+)\s+([A-Za-z0-9_]+(?:,[A-Za-z0-9_]+)*)$").unwrap()
});

/// Bare comma-separated column list.
static COLUMNS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_]+(?:,[A-Za-z0-9_]+)*$").unwrap());

/// Parses the designation from the substituted source lines.
///
/// `is_body_start` is the dialect's body-marker test; the annotation is
/// only looked for on the line directly above the first marker line.
pub fn parse_designation<F>(lines: &[String], is_body_start: F) -> Result<Designation, SourceError>
where
    F: Fn(&str) -> bool,
{
    let marker = lines
        .iter()
        .position(|line| is_body_start(line))
        .ok_or(SourceError::MissingBodyMarker)?;
    if marker == 0 {
        return Err(SourceError::MissingAnnotation);
    }

    let line = &lines[marker - 1];
    let captures = ANNOTATION_RE
        .captures(line)
        .ok_or(SourceError::MissingAnnotation)?;
    let tag = captures[1].to_string();
    let arguments = captures[2].to_string();

    match tag.as_str() {
        "procedure" | "function" => {
            if !arguments.is_empty() {
                return Err(SourceError::UnexpectedArguments { tag });
            }
            if tag == "procedure" {
                Ok(Designation::Procedure)
            } else {
                Ok(Designation::Function)
            }
        }
        "bulk_insert" => {
            let captures = BULK_ARGS_RE
                .captures(&arguments)
                .ok_or(SourceError::MalformedBulkInsert)?;
            Ok(Designation::BulkInsert {
                table: captures[1].to_string(),
                columns: split_columns(&captures[2]),
            })
        }
        "rows_with_key" | "rows_with_index" => {
            if !COLUMNS_RE.is_match(&arguments) {
                return Err(SourceError::MalformedAnnotation {
                    line: line.trim().to_string(),
                });
            }
            let columns = split_columns(&arguments);
            if tag == "rows_with_key" {
                Ok(Designation::RowsWithKey { columns })
            } else {
                Ok(Designation::RowsWithIndex { columns })
            }
        }
        _ => Ok(Designation::Other { tag }),
    }
}

fn split_columns(list: &str) -> Vec<String> {
    list.split(',').map(str::to_string).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(source: &str) -> Vec<String> {
        source.split('\n').map(str::to_string).collect()
    }

    fn begin(line: &str) -> bool {
        line.trim().eq_ignore_ascii_case("begin")
    }

    #[test]
    fn plain_procedure_and_function() {
        let source = lines("create procedure p()\n-- type: procedure\nbegin\nend");
        assert_eq!(
            parse_designation(&source, begin).unwrap(),
            Designation::Procedure
        );

        let source = lines("create function f()\n-- type: function\nBEGIN\nend");
        assert_eq!(
            parse_designation(&source, begin).unwrap(),
            Designation::Function
        );
    }

    #[test]
    fn bulk_insert_with_table_and_columns() {
        let source = lines("x\n-- type: bulk_insert users name,email,age\nbegin\nend");
        assert_eq!(
            parse_designation(&source, begin).unwrap(),
            Designation::BulkInsert {
                table: "users".to_string(),
                columns: vec!["name".to_string(), "email".to_string(), "age".to_string()],
            }
        );
    }

    #[test]
    fn bulk_insert_without_columns_is_malformed() {
        let source = lines("x\n-- type: bulk_insert users\nbegin\nend");
        assert!(matches!(
            parse_designation(&source, begin),
            Err(SourceError::MalformedBulkInsert)
        ));
    }

    #[test]
    fn indexed_designations_take_a_column_list() {
        let source = lines("x\n-- type: rows_with_key usr_id,ord_id\nbegin\nend");
        assert_eq!(
            parse_designation(&source, begin).unwrap(),
            Designation::RowsWithKey {
                columns: vec!["usr_id".to_string(), "ord_id".to_string()],
            }
        );

        let source = lines("x\n-- type: rows_with_index usr_id\nbegin\nend");
        assert_eq!(
            parse_designation(&source, begin).unwrap(),
            Designation::RowsWithIndex {
                columns: vec!["usr_id".to_string()],
            }
        );
    }

    #[test]
    fn indexed_designation_without_columns_is_malformed() {
        let source = lines("x\n-- type: rows_with_key\nbegin\nend");
        assert!(matches!(
            parse_designation(&source, begin),
            Err(SourceError::MalformedAnnotation { .. })
        ));
    }

    #[test]
    fn no_argument_designations_reject_arguments() {
        let source = lines("x\n-- type: procedure users\nbegin\nend");
        assert!(matches!(
            parse_designation(&source, begin),
            Err(SourceError::UnexpectedArguments { ref tag }) if tag == "procedure"
        ));
    }

    #[test]
    fn unknown_tags_pass_through() {
        let source = lines("x\n-- type: row1\nbegin\nend");
        assert_eq!(
            parse_designation(&source, begin).unwrap(),
            Designation::Other {
                tag: "row1".to_string(),
            }
        );
    }

    #[test]
    fn missing_marker_and_missing_annotation() {
        let source = lines("create procedure p()\nend");
        assert!(matches!(
            parse_designation(&source, begin),
            Err(SourceError::MissingBodyMarker)
        ));

        let source = lines("create procedure p()\n\nbegin\nend");
        assert!(matches!(
            parse_designation(&source, begin),
            Err(SourceError::MissingAnnotation)
        ));

        let source = lines("begin\nend");
        assert!(matches!(
            parse_designation(&source, begin),
            Err(SourceError::MissingAnnotation)
        ));
    }
}
