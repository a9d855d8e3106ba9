use std::path::PathBuf;
use std::time::Duration;

use clap::{value_parser, Arg, ArgMatches, Command};

use crate::fetch::DEFAULT_TIMEOUT;
use crate::refresher::DEFAULT_INTERVAL;



#[derive(Clone)]
#[derive(Debug)]
pub struct Settings {
	pub cameras_file: PathBuf,
	pub interval: Duration,
	pub timeout: Duration,
	pub max_concurrent: Option<usize>,
}

pub fn command() -> Command {
	Command::new("canyon-cams")
		.version(env!("CARGO_PKG_VERSION"))
		.about("Caches and serves canyon webcam snapshots.")
		.arg(
			Arg::new("cameras")
				.short('c')
				.long("cameras")
				.required(true)
				.value_parser(value_parser!(PathBuf))
				.help("YAML or JSON file listing the cameras")
		)
		.arg(
			Arg::new("interval")
				.long("interval")
				.value_parser(value_parser!(u64).range(1..))
				.help(format!("Seconds between refresh cycles (default {})", DEFAULT_INTERVAL.as_secs()))
		)
		.arg(
			Arg::new("timeout")
				.long("timeout")
				.value_parser(value_parser!(u64).range(1..))
				.help(format!("Timeout in seconds for each upstream request (default {})", DEFAULT_TIMEOUT.as_secs()))
		)
		.arg(
			Arg::new("max-concurrent")
				.long("max-concurrent")
				.value_parser(value_parser!(usize))
				.help("Maximum number of cameras fetched at once (unlimited by default)")
		)
}

impl Settings {
	pub fn from_matches(matches: &ArgMatches) -> Settings {
		Settings {
			cameras_file: matches.get_one::<PathBuf>("cameras").cloned().unwrap_or_default(),
			interval: matches.get_one::<u64>("interval").copied().map_or(DEFAULT_INTERVAL, Duration::from_secs),
			timeout: matches.get_one::<u64>("timeout").copied().map_or(DEFAULT_TIMEOUT, Duration::from_secs),
			max_concurrent: matches.get_one::<usize>("max-concurrent").copied(),
		}
	}
}



#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn defaults() {
		let matches = command().get_matches_from(["canyon-cams", "-c", "cams.yaml"]);
		let settings = Settings::from_matches(&matches);
		assert_eq!(settings.cameras_file, PathBuf::from("cams.yaml"));
		assert_eq!(settings.interval, DEFAULT_INTERVAL);
		assert_eq!(settings.timeout, DEFAULT_TIMEOUT);
		assert_eq!(settings.max_concurrent, None);
	}

	#[test]
	fn overrides() {
		let matches = command().get_matches_from([
			"canyon-cams", "--cameras", "cams.json", "--interval", "30", "--timeout", "2", "--max-concurrent", "4",
		]);
		let settings = Settings::from_matches(&matches);
		assert_eq!(settings.interval, Duration::from_secs(30));
		assert_eq!(settings.timeout, Duration::from_secs(2));
		assert_eq!(settings.max_concurrent, Some(4));
	}

	#[test]
	fn cameras_file_is_required() {
		assert!(command().try_get_matches_from(["canyon-cams"]).is_err());
	}
}
