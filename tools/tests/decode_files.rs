use std::fs;

use codec::{pack_message_to_vec, CompileOptions, Handler, Protocol, Value};
use netproto_tools::{collect_frame_entries, decode_frame, load_registry, BuiltIn, DecodeOutcome};
use packer::Packer;
use tempfile::tempdir;

fn six() -> std::sync::Arc<Protocol> {
    Protocol::from_registry(&BuiltIn::Six.registry(), &CompileOptions::default())
        .unwrap()
        .into_shared()
}

#[test]
fn glob_filters_directory_entries() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("b.frame"), [1u8]).unwrap();
    fs::write(dir.path().join("a.frame"), [1u8, 2]).unwrap();
    fs::write(dir.path().join("notes.txt"), b"skip").unwrap();
    fs::create_dir(dir.path().join("nested.frame")).unwrap();

    let entries = collect_frame_entries(dir.path(), Some("*.frame")).unwrap();
    let names: Vec<_> = entries
        .iter()
        .map(|entry| entry.path.file_name().unwrap().to_str().unwrap())
        .collect();
    assert_eq!(names, vec!["a.frame", "b.frame"]);
    assert_eq!(entries[0].size, 2);

    let all = collect_frame_entries(dir.path(), None).unwrap();
    assert_eq!(all.len(), 3);
}

#[test]
fn invalid_glob_is_an_error() {
    let dir = tempdir().unwrap();
    assert!(collect_frame_entries(dir.path(), Some("[")).is_err());
}

#[test]
fn decodes_captured_frames() {
    let protocol = six();
    let dir = tempdir().unwrap();
    let accepted = pack_message_to_vec(
        &protocol,
        3,
        &[Value::Int(-1), Value::Int(5), Value::from("hello")],
    )
    .unwrap();
    let rejected = pack_message_to_vec(
        &protocol,
        3,
        &[Value::Int(7), Value::Int(5), Value::from("hello")],
    )
    .unwrap();
    fs::write(dir.path().join("1.frame"), &accepted).unwrap();
    fs::write(dir.path().join("2.frame"), &rejected).unwrap();

    let mut handler = Handler::new(protocol);
    let mut outcomes = Vec::new();
    for entry in collect_frame_entries(dir.path(), Some("*.frame")).unwrap() {
        let bytes = fs::read(&entry.path).unwrap();
        outcomes.push(decode_frame(&mut handler, &bytes));
    }

    assert!(matches!(
        &outcomes[0],
        DecodeOutcome::Record { name, .. } if name == "Sv_Chat"
    ));
    assert!(matches!(
        &outcomes[1],
        DecodeOutcome::Failed { reason, .. } if reason == "m_Team"
    ));
}

#[test]
fn unknown_message_id_is_out_of_range() {
    let mut packer = Packer::new();
    packer.add_int(200).unwrap();
    let bytes = packer.finish();

    let mut handler = Handler::new(six());
    assert!(matches!(
        decode_frame(&mut handler, &bytes),
        DecodeOutcome::Failed { reason, .. } if reason == "(type out of range)"
    ));
}

#[test]
fn registry_json_roundtrip_through_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("seven.json");
    let json = serde_json::to_string(&BuiltIn::Seven.registry()).unwrap();
    fs::write(&path, json).unwrap();

    let loaded = load_registry(&path).unwrap();
    assert_eq!(loaded, BuiltIn::Seven.registry());
    assert!(load_registry(&dir.path().join("missing.json")).is_err());
}
