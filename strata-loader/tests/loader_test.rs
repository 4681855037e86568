//! End-to-end batch runs over real source trees and an in-memory database.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use strata_core::config::{ProjectConfig, StrataConfig};
use strata_core::report::RecordingSink;
use strata_loader::{run_batch, BatchOptions};
use strata_storage::SqliteProvider;

const ADD_USER: &str = "create procedure add_user(p_name varchar(40))\n\
                        -- type: procedure\n\
                        begin\n\
                        insert into users(name) values(p_name);\n\
                        end\n";

const USER_COUNT: &str = "create function user_count()\n\
                          -- type: function\n\
                          begin\n\
                          select count(*) from users;\n\
                          end\n";

fn test_config(root: &Path) -> StrataConfig {
    StrataConfig {
        project: ProjectConfig {
            sources: Some(root.join("routines")),
            metadata: Some(root.join("metadata.json")),
            ..Default::default()
        },
        ..Default::default()
    }
}

fn write_routine(root: &Path, name: &str, source: &str) {
    let dir = root.join("routines");
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join(name), source).unwrap();
}

#[test]
fn first_run_loads_and_second_run_is_unchanged() {
    let dir = tempfile::tempdir().unwrap();
    write_routine(dir.path(), "add_user.sql", ADD_USER);
    write_routine(dir.path(), "user_count.sql", USER_COUNT);

    let config = test_config(dir.path());
    let provider = SqliteProvider::open_in_memory().unwrap();
    let sink = RecordingSink::new();

    let report = run_batch(&config, &provider, &sink, &BatchOptions::default()).unwrap();
    assert!(report.is_success());
    assert_eq!(report.loaded, vec!["add_user", "user_count"]);
    assert!(report.unchanged.is_empty());
    assert!(sink.saw("Loaded procedure 'add_user'."));
    assert!(sink.saw("Loaded function 'user_count'."));
    assert!(dir.path().join("metadata.json").exists());

    let report = run_batch(&config, &provider, &sink, &BatchOptions::default()).unwrap();
    assert!(report.is_success());
    assert!(report.loaded.is_empty());
    assert_eq!(report.unchanged, vec!["add_user", "user_count"]);
}

#[test]
fn failing_routine_does_not_stop_the_batch() {
    let dir = tempfile::tempdir().unwrap();
    write_routine(dir.path(), "add_user.sql", ADD_USER);
    write_routine(
        dir.path(),
        "broken.sql",
        "create procedure broken()\nselect 1;\n",
    );

    let config = test_config(dir.path());
    let provider = SqliteProvider::open_in_memory().unwrap();
    let sink = RecordingSink::new();

    let report = run_batch(&config, &provider, &sink, &BatchOptions::default()).unwrap();
    assert!(!report.is_success());
    assert_eq!(report.loaded, vec!["add_user"]);
    assert_eq!(report.failed.len(), 1);
    assert_eq!(report.failed[0].0, "broken");
    assert!(sink.saw("broken.sql"));

    let stored = fs::read_to_string(dir.path().join("metadata.json")).unwrap();
    assert!(stored.contains("add_user"));
    assert!(!stored.contains("broken"));
}

#[test]
fn changed_placeholder_value_forces_reload() {
    let dir = tempfile::tempdir().unwrap();
    write_routine(
        dir.path(),
        "schema_probe.sql",
        "create procedure schema_probe()\n\
         -- type: procedure\n\
         begin\n\
         select '@schema@';\n\
         end\n",
    );

    let mut config = test_config(dir.path());
    config.placeholders =
        BTreeMap::from([("@schema@".to_string(), "main".to_string())]);
    let provider = SqliteProvider::open_in_memory().unwrap();
    let sink = RecordingSink::new();

    let report = run_batch(&config, &provider, &sink, &BatchOptions::default()).unwrap();
    assert_eq!(report.loaded, vec!["schema_probe"]);

    let report = run_batch(&config, &provider, &sink, &BatchOptions::default()).unwrap();
    assert_eq!(report.unchanged, vec!["schema_probe"]);

    // Same file, same mtime; only the resolved value changed.
    config.placeholders =
        BTreeMap::from([("@schema@".to_string(), "other".to_string())]);
    let report = run_batch(&config, &provider, &sink, &BatchOptions::default()).unwrap();
    assert_eq!(report.loaded, vec!["schema_probe"]);
}

#[test]
fn prune_removes_metadata_of_deleted_sources() {
    let dir = tempfile::tempdir().unwrap();
    write_routine(dir.path(), "add_user.sql", ADD_USER);
    write_routine(dir.path(), "user_count.sql", USER_COUNT);

    let config = test_config(dir.path());
    let provider = SqliteProvider::open_in_memory().unwrap();
    let sink = RecordingSink::new();

    run_batch(&config, &provider, &sink, &BatchOptions::default()).unwrap();
    fs::remove_file(dir.path().join("routines/user_count.sql")).unwrap();

    // Without pruning the stale entry stays.
    let report = run_batch(&config, &provider, &sink, &BatchOptions::default()).unwrap();
    assert!(report.pruned.is_empty());
    let stored = fs::read_to_string(dir.path().join("metadata.json")).unwrap();
    assert!(stored.contains("user_count"));

    let report = run_batch(&config, &provider, &sink, &BatchOptions { prune: true }).unwrap();
    assert_eq!(report.pruned, vec!["user_count"]);
    let stored = fs::read_to_string(dir.path().join("metadata.json")).unwrap();
    assert!(!stored.contains("user_count"));
}
