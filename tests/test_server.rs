//! Server assembly. Kept in its own binary because it installs a global logger.

use std::fs;
use std::sync::Mutex;
use std::time::Duration;

use canyon_cams::config::Settings;
use canyon_cams::server;
use log::{Level, LevelFilter, Log, Metadata, Record};

struct CapturingLogger {
	records: Mutex<Vec<(Level, String)>>,
}

impl Log for CapturingLogger {
	fn enabled(&self, _metadata: &Metadata) -> bool {
		true
	}

	fn log(&self, record: &Record) {
		self.records.lock().unwrap().push((record.level(), record.args().to_string()));
	}

	fn flush(&self) {}
}

static LOGGER: CapturingLogger = CapturingLogger { records: Mutex::new(Vec::new()) };

#[test]
fn test_duplicate_sources_are_logged_during_build() {
	log::set_logger(&LOGGER).unwrap();
	log::set_max_level(LevelFilter::Trace);

	let dir = tempfile::tempdir().unwrap();
	let file = dir.path().join("cameras.yaml");
	fs::write(&file, "- src: http://a/cam.jpg\n  alt: first\n- src: http://a/cam.jpg\n  alt: second\n").unwrap();

	let settings = Settings {
		cameras_file: file,
		interval: Duration::from_secs(3600),
		timeout: Duration::from_secs(1),
		max_concurrent: Some(2),
	};
	server::build(&settings).unwrap();

	let records = LOGGER.records.lock().unwrap();
	assert!(records.iter().any(|(level, message)| {
		*level == Level::Warn && message.contains("Duplicate camera source http%3A%2F%2Fa%2Fcam.jpg")
	}));
}

#[test]
fn test_invalid_cameras_file_fails_build() {
	let dir = tempfile::tempdir().unwrap();
	let file = dir.path().join("cameras.yaml");
	fs::write(&file, "- src: not a url\n").unwrap();

	let settings = Settings {
		cameras_file: file,
		interval: Duration::from_secs(3600),
		timeout: Duration::from_secs(1),
		max_concurrent: None,
	};
	assert!(server::build(&settings).is_err());
}
