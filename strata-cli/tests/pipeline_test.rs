//! Full pipeline through the command layer: a real configuration file,
//! a database file on disk, and all three phases in one run.

use std::fs;

use strata_cli::commands::run_all;
use strata_storage::SqliteProvider;

const CONFIG: &str = r#"
[project]
sources = "routines"
metadata = ".strata/metadata.json"

[database]
path = "app.db"

[placeholders]
"@schema@" = "main"

[constants]
registry = "constants.txt"
prefix = "LEN"
module = "generated/constants.rs"
label_pattern = "^[a-z]+_label$"

[wrapper]
module = "generated/routines.rs"
"#;

const ADD_USER: &str = "create procedure add_user(p_company int, p_name varchar(40))\n\
                        -- type: procedure\n\
                        begin\n\
                        insert into users(usr_company, usr_name) values(p_company, p_name);\n\
                        end\n";

const USER_COUNT: &str = "create function user_count()\n\
                          -- type: function\n\
                          begin\n\
                          select count(*) from users;\n\
                          end\n";

#[test]
fn run_all_loads_generates_and_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let config_path = dir.path().join("strata.toml");
    fs::write(&config_path, CONFIG).unwrap();

    let routines = dir.path().join("routines");
    fs::create_dir_all(&routines).unwrap();
    fs::write(routines.join("add_user.sql"), ADD_USER).unwrap();
    fs::write(routines.join("user_count.sql"), USER_COUNT).unwrap();

    // Seed the application schema the constants phase introspects.
    {
        let provider = SqliteProvider::open(&dir.path().join("app.db")).unwrap();
        provider
            .connection()
            .execute_batch(
                "CREATE TABLE users (
                     usr_id      INTEGER PRIMARY KEY,
                     usr_company INTEGER,
                     usr_name    VARCHAR(40)
                 );
                 CREATE TABLE order_state (
                     ost_id    INTEGER PRIMARY KEY,
                     ost_label VARCHAR(20)
                 );
                 INSERT INTO order_state (ost_id, ost_label) VALUES (1, 'ORDER_STATE_PENDING');",
            )
            .unwrap();
    }

    let failures = run_all(&config_path, false).unwrap();
    assert_eq!(failures, 0);

    assert!(dir.path().join(".strata/metadata.json").exists());

    let constants = fs::read_to_string(dir.path().join("generated/constants.rs")).unwrap();
    assert!(constants.contains("pub const LEN_USERS_USR_NAME: i64 = 40;"));
    assert!(constants.contains("pub const LEN_ORDER_STATE_OST_LABEL: i64 = 20;"));
    assert!(constants.contains("pub const ORDER_STATE_PENDING: i64 = 1;"));

    let wrappers = fs::read_to_string(dir.path().join("generated/routines.rs")).unwrap();
    assert!(wrappers.contains(
        "pub fn add_user(conn: &Connection, p_company: i64, p_name: &str) -> Result<usize>"
    ));
    assert!(wrappers.contains("call add_user({}, '{}')"));
    assert!(wrappers.contains("select user_count()"));

    let failures = run_all(&config_path, false).unwrap();
    assert_eq!(failures, 0);
}

#[test]
fn per_routine_failures_surface_in_the_count() {
    let dir = tempfile::tempdir().unwrap();
    let config_path = dir.path().join("strata.toml");
    fs::write(&config_path, CONFIG).unwrap();

    let routines = dir.path().join("routines");
    fs::create_dir_all(&routines).unwrap();
    fs::write(routines.join("add_user.sql"), ADD_USER).unwrap();
    // No annotation line before the body marker.
    fs::write(
        routines.join("broken.sql"),
        "create procedure broken()\nbegin\nselect 1;\nend\n",
    )
    .unwrap();

    {
        let provider = SqliteProvider::open(&dir.path().join("app.db")).unwrap();
        provider
            .connection()
            .execute_batch("CREATE TABLE users (usr_id INTEGER PRIMARY KEY, usr_name VARCHAR(40));")
            .unwrap();
    }

    let failures = run_all(&config_path, false).unwrap();
    assert_eq!(failures, 1);

    let wrappers = fs::read_to_string(dir.path().join("generated/routines.rs")).unwrap();
    assert!(wrappers.contains("pub fn add_user"));
    assert!(!wrappers.contains("pub fn broken"));
}
