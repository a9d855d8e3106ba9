use std::sync::Arc;
use std::time::Duration;

use rocket::fairing::AdHoc;
use tokio::time::{self, MissedTickBehavior};

use log::info;

use crate::fetch::Fetcher;
use crate::store::Store;



pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(60);

/// Refreshes the store every `interval`, starting immediately. Never returns.
///
/// Each cycle is awaited before the next tick, so cycles from this loop never overlap.
pub async fn run(store: Arc<Store>, fetcher: Fetcher, interval: Duration) {
	let mut ticker = time::interval(interval);
	ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

	loop {
		ticker.tick().await;
		store.fetch_all(&fetcher).await;
	}
}

/// Starts the refresh loop once the server is up.
pub fn stage(store: Arc<Store>, fetcher: Fetcher, interval: Duration) -> AdHoc {
	AdHoc::on_liftoff("Camera refresher", move |_rocket| Box::pin(async move {
		info!("Refreshing {} cameras every {:?}", store.len(), interval);
		tokio::spawn(run(store, fetcher, interval));
	}))
}
