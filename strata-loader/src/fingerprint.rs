//! The change fingerprint: does a routine need reloading?
//!
//! A pure predicate over state gathered before any per-routine database
//! work. Deliberately conservative; when in doubt, reload.

use std::collections::BTreeSet;

use strata_core::types::{PlaceholderMap, RoutineMetadata};

/// True when the routine must be (re)loaded. Holds when any of:
///
/// - there is no prior metadata;
/// - the stored modification time differs from the file's;
/// - a previously used placeholder no longer resolves, or resolves to a
///   different value (keys match case-insensitively);
/// - the database has no record of the routine.
pub fn must_reload(
    prior: Option<&RoutineMetadata>,
    mtime: i64,
    placeholders: &PlaceholderMap,
    registry: &BTreeSet<String>,
) -> bool {
    let Some(prior) = prior else {
        return true;
    };

    if prior.timestamp != mtime {
        return true;
    }

    for (token, value) in &prior.replace {
        match placeholders.resolve(token) {
            Some(current) if current == value => {}
            _ => return true,
        }
    }

    !registry.contains(&prior.routine_name)
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use strata_core::types::{Designation, RoutineKind};

    use super::*;

    fn metadata(replace: &[(&str, &str)]) -> RoutineMetadata {
        RoutineMetadata {
            routine_name: "add_user".to_string(),
            schema_name: None,
            kind: RoutineKind::Procedure,
            designation: Designation::Procedure,
            table_name: None,
            columns: None,
            parameters: Vec::new(),
            fields: None,
            column_types: None,
            timestamp: 1000,
            replace: replace
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect::<BTreeMap<_, _>>(),
        }
    }

    fn registry() -> BTreeSet<String> {
        BTreeSet::from(["add_user".to_string()])
    }

    #[test]
    fn no_prior_metadata_forces_reload() {
        let placeholders = PlaceholderMap::new();
        assert!(must_reload(None, 1000, &placeholders, &registry()));
    }

    #[test]
    fn unchanged_inputs_skip_the_reload() {
        let prior = metadata(&[("@Schema@", "main")]);
        let placeholders = PlaceholderMap::from_pairs([("@schema@", "main")]);
        assert!(!must_reload(Some(&prior), 1000, &placeholders, &registry()));
    }

    #[test]
    fn mtime_change_forces_reload() {
        let prior = metadata(&[]);
        let placeholders = PlaceholderMap::new();
        assert!(must_reload(Some(&prior), 1001, &placeholders, &registry()));
    }

    #[test]
    fn changed_placeholder_value_forces_reload() {
        let prior = metadata(&[("@schema@", "main")]);
        let placeholders = PlaceholderMap::from_pairs([("@schema@", "other")]);
        assert!(must_reload(Some(&prior), 1000, &placeholders, &registry()));
    }

    #[test]
    fn dropped_placeholder_key_forces_reload() {
        let prior = metadata(&[("@schema@", "main")]);
        let placeholders = PlaceholderMap::new();
        assert!(must_reload(Some(&prior), 1000, &placeholders, &registry()));
    }

    #[test]
    fn missing_database_record_forces_reload() {
        let prior = metadata(&[]);
        let placeholders = PlaceholderMap::new();
        assert!(must_reload(
            Some(&prior),
            1000,
            &placeholders,
            &BTreeSet::new()
        ));
    }
}
