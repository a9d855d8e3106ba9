//! Bootstrap of the camera list from disk.

use std::fs;

use canyon_cams::common::Kind;
use canyon_cams::loader::load_descriptors;

#[test]
fn test_load_yaml() {
	let dir = tempfile::tempdir().unwrap();
	let file = dir.path().join("cameras.yaml");
	fs::write(&file, r#"
- src: https://udottraffic.utah.gov/1_devices/aux16226.jpeg
  alt: Alta
  canyon: LCC
- src: https://www.youtube.com/embed/abc
  alt: Snowbird live
  kind: iframe
  canyon: LCC
- src: https://example.com/road.png
  kind: roadstatus
"#).unwrap();

	let descriptors = load_descriptors(&file).unwrap();
	assert_eq!(descriptors.len(), 3);
	assert_eq!(descriptors[0].alt, "Alta");
	assert_eq!(descriptors[0].kind, Kind::Image);
	assert_eq!(descriptors[1].kind, Kind::Iframe);
	assert_eq!(descriptors[2].kind, Kind::Roadstatus);
	assert_eq!(descriptors[2].canyon, "");
}

#[test]
fn test_load_json() {
	let dir = tempfile::tempdir().unwrap();
	let file = dir.path().join("cameras.json");
	fs::write(&file, r#"[{"src": "http://a/cam.jpg", "alt": "A", "kind": "image", "canyon": "BCC"}]"#).unwrap();

	let descriptors = load_descriptors(&file).unwrap();
	assert_eq!(descriptors.len(), 1);
	assert_eq!(descriptors[0].canyon, "BCC");
}

#[test]
fn test_invalid_src_is_fatal() {
	let dir = tempfile::tempdir().unwrap();
	let file = dir.path().join("cameras.yaml");
	fs::write(&file, "- src: http://a/cam.jpg\n- src: not a url\n  alt: Broken\n").unwrap();

	let err = load_descriptors(&file).unwrap_err();
	assert!(format!("{:#}", err).contains("#2"));
}

#[test]
fn test_empty_src_is_fatal() {
	let dir = tempfile::tempdir().unwrap();
	let file = dir.path().join("cameras.yaml");
	fs::write(&file, "- src: ''\n").unwrap();
	assert!(load_descriptors(&file).is_err());
}

#[test]
fn test_unknown_kind_is_fatal() {
	let dir = tempfile::tempdir().unwrap();
	let file = dir.path().join("cameras.yaml");
	fs::write(&file, "- src: http://a\n  kind: video\n").unwrap();
	assert!(load_descriptors(&file).is_err());
}

#[test]
fn test_missing_file_is_fatal() {
	let dir = tempfile::tempdir().unwrap();
	assert!(load_descriptors(&dir.path().join("absent.yaml")).is_err());
}
