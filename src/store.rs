use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::{Mutex, Semaphore};
use tokio::task::JoinSet;

use log::{debug, error, info, warn};

use crate::common::{Camera, CameraDescriptor, CameraId, ValidationHeaders};
use crate::entry::Entry;
use crate::fetch::{FetchOutcome, Fetcher};



/// Tallies for one refresh cycle.
#[derive(Clone)]
#[derive(Debug, PartialEq, Eq)]
#[derive(Serialize)]
pub struct CycleReport {
	pub started: DateTime<Utc>,
	pub finished: DateTime<Utc>,
	pub changed: usize,
	pub unchanged: usize,
	pub errors: usize,
	/// Cameras with nothing to fetch (iframes).
	pub skipped: usize,
}

#[derive(Clone)]
#[derive(Debug)]
#[derive(Serialize)]
pub struct StoreStatus {
	pub cameras: usize,
	pub fetchable: usize,
	pub cycles: u64,
	pub last_cycle: Option<CycleReport>,
}

#[derive(Default)]
struct CycleHistory {
	cycles: u64,
	last: Option<CycleReport>,
}

enum TaskOutcome {
	Changed,
	Unchanged,
	Failed,
}

/// The fixed set of cameras, in display order, plus an id index over them.
///
/// Neither the list nor the index changes after `new` returns; only the cameras inside the
/// entries do.
pub struct Store {
	entries: Vec<Arc<Entry>>,
	registry: HashMap<CameraId, Arc<Entry>>,
	limiter: Option<Arc<Semaphore>>,
	history: Mutex<CycleHistory>,
}

impl Store {
	pub fn new(descriptors: impl IntoIterator<Item = CameraDescriptor>) -> Store {
		let mut entries = Vec::new();
		let mut registry = HashMap::new();

		for descriptor in descriptors {
			let camera = Camera::new(descriptor);
			let id = camera.id.clone();
			let entry = Arc::new(Entry::new(camera));
			entries.push(entry.clone());
			// Later duplicates shadow earlier ones in the index; both stay in the list.
			if registry.insert(id.clone(), entry).is_some() {
				warn!("Duplicate camera source {}; only the last one is reachable by id", id);
			}
		}

		Store {
			entries,
			registry,
			limiter: None,
			history: Mutex::new(CycleHistory::default()),
		}
	}

	/// Caps how many cameras are fetched at once during a cycle.
	pub fn with_concurrency_limit(mut self, max: usize) -> Store {
		self.limiter = Some(Arc::new(Semaphore::new(max.max(1))));
		self
	}

	pub fn len(&self) -> usize {
		self.entries.len()
	}

	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}

	pub fn entries(&self) -> impl Iterator<Item = &Arc<Entry>> {
		self.entries.iter()
	}

	/// Returns a copy of the camera taken under its lock, and whether the id was known.
	pub async fn get(&self, id: &CameraId) -> (Camera, bool) {
		match self.registry.get(id) {
			Some(entry) => (entry.snapshot().await, true),
			None => (Camera::default(), false),
		}
	}

	/// Entries grouped by canyon. Groups and the entries within them keep list order.
	pub async fn by_canyon(&self) -> Vec<(String, Vec<Arc<Entry>>)> {
		let mut groups: Vec<(String, Vec<Arc<Entry>>)> = Vec::new();
		for entry in self.entries() {
			let canyon = entry.with(|camera| camera.canyon.clone()).await;
			match groups.iter_mut().find(|(name, _)| *name == canyon) {
				Some((_, members)) => members.push(entry.clone()),
				None => groups.push((canyon, vec![entry.clone()])),
			}
		}
		groups
	}

	pub async fn status(&self) -> StoreStatus {
		let mut fetchable = 0;
		for entry in self.entries() {
			if entry.with(|camera| camera.kind.is_fetchable()).await {
				fetchable += 1;
			}
		}

		let history = self.history.lock().await;
		StoreStatus {
			cameras: self.entries.len(),
			fetchable,
			cycles: history.cycles,
			last_cycle: history.last.clone(),
		}
	}

	/// Refreshes every fetchable camera concurrently and returns once all of them are done.
	pub async fn fetch_all(&self, fetcher: &Fetcher) -> CycleReport {
		let started = Utc::now();
		let mut skipped = 0;
		let mut tasks = JoinSet::new();

		for entry in self.entries() {
			if !entry.with(|camera| camera.kind.is_fetchable()).await {
				skipped += 1;
				continue;
			}
			let entry = entry.clone();
			let fetcher = fetcher.clone();
			let limiter = self.limiter.clone();
			tasks.spawn(async move {
				let _permit = match limiter {
					Some(limiter) => limiter.acquire_owned().await.ok(),
					None => None,
				};
				refresh_entry(&entry, &fetcher).await
			});
		}

		let mut report = CycleReport {
			started,
			finished: started,
			changed: 0,
			unchanged: 0,
			errors: 0,
			skipped,
		};
		while let Some(result) = tasks.join_next().await {
			match result {
				Ok(TaskOutcome::Changed) => report.changed += 1,
				Ok(TaskOutcome::Unchanged) => report.unchanged += 1,
				Ok(TaskOutcome::Failed) => report.errors += 1,
				Err(err) => {
					error!("Camera refresh task did not complete; error was {}", err);
					report.errors += 1;
				}
			}
		}
		report.finished = Utc::now();

		info!(
			"Refreshed cameras: {} changed, {} unchanged, {} failed, {} skipped",
			report.changed, report.unchanged, report.errors, report.skipped
		);

		let mut history = self.history.lock().await;
		history.cycles += 1;
		history.last = Some(report.clone());
		report
	}
}

async fn refresh_entry(entry: &Entry, fetcher: &Fetcher) -> TaskOutcome {
	let (id, src, etag) = entry.with(|camera| {
		(camera.id.clone(), camera.src.clone(), camera.headers.etag.clone())
	}).await;

	match fetcher.refresh(&src, &etag).await {
		Ok(FetchOutcome::Unchanged) => {
			debug!("Camera {} unchanged", id);
			TaskOutcome::Unchanged
		},
		Ok(FetchOutcome::Changed(fetched)) => {
			entry.with_mut(|camera| {
				camera.headers = ValidationHeaders {
					content_type: fetched.content_type,
					etag: fetched.etag,
					content_length: fetched.content_length,
					status: 200,
				};
				camera.image.bytes = fetched.bytes;
			}).await;
			debug!("Camera {} updated", id);
			TaskOutcome::Changed
		},
		Err(err) => {
			warn!("Failed to refresh camera {}; error was {}", id, err);
			TaskOutcome::Failed
		},
	}
}
