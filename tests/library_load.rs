use copycat::fingerprint;
use copycat::library::MoveLibrary;
use cozy_chess::Board;
use pretty_assertions::assert_eq;
use std::fs;
use std::path::PathBuf;

fn temp_book(name: &str, contents: &str) -> PathBuf {
    let path = std::env::temp_dir().join(format!("copycat-{}-{}.json", name, std::process::id()));
    fs::write(&path, contents).expect("write temp book");
    path
}

#[test]
fn loads_book_json_and_orders_entries() {
    let fp = fingerprint::compute(&Board::default());
    let json = format!(
        r#"{{"name":"sample","positions":{{"{fp:016x}":[
            {{"uci":"g1f3","weight":10.0,"success":0.45}},
            {{"uci":"e2e4","weight":155.8,"success":0.541}}
        ]}}}}"#
    );
    let path = temp_book("ok", &json);
    let lib = MoveLibrary::load(&path).expect("book loads");
    fs::remove_file(&path).ok();
    assert_eq!(lib.name(), "sample");
    assert_eq!(lib.len(), 1);
    let entry = lib.lookup(fp);
    assert_eq!(entry[0].uci, "e2e4", "entries must come out weight-sorted");
}

#[test]
fn rejects_negative_weight() {
    let json = r#"{"positions":{"0000000000000001":[{"uci":"e2e4","weight":-3.0,"success":0.5}]}}"#;
    let path = temp_book("neg", json);
    let res = MoveLibrary::load(&path);
    fs::remove_file(&path).ok();
    assert!(res.is_err(), "negative weight must be rejected at load");
}

#[test]
fn rejects_malformed_json() {
    let path = temp_book("bad", "{ not json");
    let res = MoveLibrary::load(&path);
    fs::remove_file(&path).ok();
    assert!(res.is_err());
}

#[test]
fn rejects_bad_fingerprint_key() {
    let json = r#"{"positions":{"not-hex":[{"uci":"e2e4","weight":1.0,"success":0.5}]}}"#;
    let path = temp_book("key", json);
    let res = MoveLibrary::load(&path);
    fs::remove_file(&path).ok();
    assert!(res.is_err());
}
