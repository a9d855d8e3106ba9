use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use anyhow::{bail, Context};
use url::Url;

use crate::common::CameraDescriptor;



/// Reads the camera list from a YAML or JSON file.
///
/// Any problem here is fatal: the store is only ever built from a complete, valid list.
pub fn load_descriptors(path: &Path) -> anyhow::Result<Vec<CameraDescriptor>> {
	let file = File::open(path)
		.with_context(|| format!("Failed to open cameras file {}", path.display()))?;
	let buf_reader = BufReader::new(file);

	let is_json = path.extension().map_or(false, |ext| ext.eq_ignore_ascii_case("json"));
	let descriptors: Vec<CameraDescriptor> = if is_json {
		serde_json::from_reader(buf_reader)
			.with_context(|| format!("Failed to parse cameras file {}", path.display()))?
	} else {
		serde_yaml::from_reader(buf_reader)
			.with_context(|| format!("Failed to parse cameras file {}", path.display()))?
	};

	for (index, descriptor) in descriptors.iter().enumerate() {
		validate(descriptor)
			.with_context(|| format!("Invalid camera #{} in {}", index + 1, path.display()))?;
	}

	Ok(descriptors)
}

fn validate(descriptor: &CameraDescriptor) -> anyhow::Result<()> {
	if descriptor.src.trim().is_empty() {
		bail!("camera \"{}\" has an empty src", descriptor.alt);
	}
	Url::parse(&descriptor.src)
		.with_context(|| format!("camera \"{}\" has an invalid src {:?}", descriptor.alt, descriptor.src))?;
	Ok(())
}
