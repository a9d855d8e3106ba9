use std::sync::Arc;

use anyhow::Context;
use rocket::{Build, Request, Response, Rocket};
use rocket::fairing::{Fairing, Info, Kind};
use rocket::http::Header;

use crate::config::Settings;
use crate::fetch::Fetcher;
use crate::loader;
use crate::refresher;
use crate::rest_api;
use crate::store::Store;



// The browser frontend may be served from another origin.
pub struct CORS;

#[rocket::async_trait]
impl Fairing for CORS {
	fn info(&self) -> Info {
		Info {
			name: "Add CORS headers to responses",
			kind: Kind::Response
		}
	}

	async fn on_response<'r>(&self, _request: &'r Request<'_>, response: &mut Response<'r>) {
		response.set_header(Header::new("Access-Control-Allow-Origin", "*"));
		response.set_header(Header::new("Access-Control-Allow-Methods", "GET, HEAD, OPTIONS"));
		response.set_header(Header::new("Access-Control-Allow-Headers", "If-None-Match"));
		response.set_header(Header::new("Access-Control-Expose-Headers", "ETag"));
	}
}

/// Loads the cameras and assembles the server, ready to launch.
///
/// `rocket::build()` installs the logger, so it has to run before the store is built or
/// construction warnings are lost.
pub fn build(settings: &Settings) -> anyhow::Result<Rocket<Build>> {
	let rocket = rocket::build();

	let descriptors = loader::load_descriptors(&settings.cameras_file)?;
	let mut store = Store::new(descriptors);
	if let Some(max) = settings.max_concurrent {
		store = store.with_concurrency_limit(max);
	}
	let store = Arc::new(store);
	let fetcher = Fetcher::new(settings.timeout).context("Failed to build HTTP client")?;

	Ok(rocket
		.attach(rest_api::stage(store.clone()))
		.attach(refresher::stage(store, fetcher, settings.interval))
		.attach(CORS))
}
