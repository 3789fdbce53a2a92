//! End-to-end shell sessions over in-memory input

use pathstore::config::StoreConfig;
use pathstore::tooling::{OutputFormat, Outcome, Shell};
use pathstore::Store;

fn transcript(script: &str) -> String {
    let mut shell = Shell::new(Store::new(), OutputFormat::Text);
    let mut out = Vec::new();
    shell.run(script.as_bytes(), &mut out).unwrap();
    String::from_utf8(out).unwrap()
}

#[test]
fn full_session() {
    let script = "\
set /usr/local/bin rust tools
set /usr/lib libs
set /etc/hosts localhost
print
list /usr
list
find /usr/local
find /usr/local/bin
search libs
search nothing
delete /usr/local
find /usr/local/bin
print
delete /missing
quit
set /never run
";
    let expected = "\
/usr/local/bin rust tools
/usr/lib libs
/etc/hosts localhost
lib
local
etc
usr
no data
rust tools
/usr/lib
not found
not found
/usr/lib libs
/etc/hosts localhost
not found
";
    assert_eq!(transcript(script), expected);
}

#[test]
fn delete_without_path_clears_everything() {
    let out = transcript("set /a 1\nset /b 2\ndelete\nprint\nlist\nfind /a\nset /a 3\nprint\n");
    assert_eq!(out, "not found\n/a 3\n");
}

#[test]
fn search_reports_first_in_document_order() {
    let out = transcript("set /z/deep/er same\nset /a same\nsearch same\n");
    assert_eq!(out, "/z/deep/er\n");
}

#[test]
fn json_print_is_an_array_of_entries() {
    let mut shell = Shell::new(Store::new(), OutputFormat::Json);
    let mut out = Vec::new();
    shell
        .run("set /a 1\nset /a/b 2\nprint\n".as_bytes(), &mut out)
        .unwrap();
    let parsed: serde_json::Value = serde_json::from_slice(&out).unwrap();
    let entries = parsed.as_array().expect("print renders an array");
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0]["path"], "/a");
    assert_eq!(entries[1]["value"], "2");
}

#[test]
fn out_of_memory_ends_session_with_message() {
    let store = Store::with_config(&StoreConfig {
        bucket_count: 17,
        max_nodes: Some(2),
    });
    let mut shell = Shell::new(store, OutputFormat::Text);
    let mut out = Vec::new();
    let outcome = shell
        .run("set /a/b 1\nset /c 2\nprint\n".as_bytes(), &mut out)
        .unwrap();
    assert_eq!(outcome, Outcome::OutOfMemory);
    assert_eq!(String::from_utf8(out).unwrap(), "No memory.\n");
    assert_eq!(shell.store().print().len(), 1);
}

#[test]
fn undecodable_bytes_only_affect_their_own_line() {
    let mut shell = Shell::new(Store::new(), OutputFormat::Text);
    let mut out = Vec::new();
    let outcome = shell
        .run(&b"set /a caf\xE9\nset /b ok\nfind /b\nlist /\n"[..], &mut out)
        .unwrap();
    assert_eq!(outcome, Outcome::Quit);
    assert_eq!(String::from_utf8(out).unwrap(), "ok\na\nb\n");
    assert_eq!(shell.store().print().len(), 2);
}
