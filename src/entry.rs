use tokio::sync::Mutex;

use crate::common::Camera;



/// Exclusive owner of one camera's live state.
///
/// The camera is only reachable through closures run under the lock. The closures are plain
/// (non-async) functions, so nothing can await a network call while holding it, and the
/// lock is released on return or while unwinding from a panic.
#[derive(Debug)]
pub struct Entry {
	camera: Mutex<Camera>,
}

impl Entry {
	pub fn new(camera: Camera) -> Entry {
		Entry {
			camera: Mutex::new(camera),
		}
	}

	pub async fn with<R>(&self, f: impl FnOnce(&Camera) -> R) -> R {
		let camera = self.camera.lock().await;
		f(&camera)
	}

	pub async fn with_mut<R>(&self, f: impl FnOnce(&mut Camera) -> R) -> R {
		let mut camera = self.camera.lock().await;
		f(&mut camera)
	}

	/// Copy of the whole camera, taken in one critical section.
	pub async fn snapshot(&self) -> Camera {
		self.with(Camera::clone).await
	}
}
