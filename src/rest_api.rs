use std::convert::Infallible;
use std::io::Cursor;
use std::sync::Arc;

use rocket::http::{ContentType, Status};
use rocket::request::{self, FromRequest, Request};
use rocket::response::{self, Responder, Response};
use rocket::serde::json::{json, Json, Value};
use rocket::State;

use crate::common::{Camera, CameraId, Kind};
use crate::store::{Store, StoreStatus};



/// Value of the client's `If-None-Match` header, if it sent one.
pub struct IfNoneMatch(Option<String>);

#[rocket::async_trait]
impl<'r> FromRequest<'r> for IfNoneMatch {
	type Error = Infallible;

	async fn from_request(request: &'r Request<'_>) -> request::Outcome<Self, Self::Error> {
		request::Outcome::Success(IfNoneMatch(request.headers().get_one("If-None-Match").map(str::to_string)))
	}
}

impl IfNoneMatch {
	fn matches(&self, etag: &str) -> bool {
		if etag.is_empty() {
			return false;
		}
		match &self.0 {
			Some(header) => header.split(',')
				.map(|candidate| candidate.trim())
				.any(|candidate| candidate == "*" || candidate.trim_start_matches("W/") == etag.trim_start_matches("W/")),
			None => false,
		}
	}
}

pub enum ImageResponse {
	Image(Camera),
	NotModified(String),
	/// Known camera that has never been fetched successfully.
	Pending,
}

impl<'r> Responder<'r, 'static> for ImageResponse {
	fn respond_to(self, _request: &'r Request<'_>) -> response::Result<'static> {
		let mut builder = Response::build();
		builder.raw_header("Cache-Control", "no-cache");

		match self {
			ImageResponse::Image(camera) => {
				if let Some(content_type) = ContentType::parse_flexible(&camera.headers.content_type) {
					builder.header(content_type);
				}
				if !camera.headers.etag.is_empty() {
					builder.raw_header("ETag", camera.headers.etag);
				}
				let bytes = camera.image.bytes;
				builder.status(Status::Ok)
					.sized_body(bytes.len(), Cursor::new(bytes));
			},
			ImageResponse::NotModified(etag) => {
				builder.status(Status::NotModified)
					.raw_header("ETag", etag);
			},
			ImageResponse::Pending => {
				builder.status(Status::ServiceUnavailable);
			},
		}

		builder.ok()
	}
}

#[derive(Serialize)]
pub struct CameraSummary {
	pub id: CameraId,
	pub kind: Kind,
	pub src: String,
	pub alt: String,
	/// Path of the cached image, for cameras we fetch.
	pub image: Option<String>,
}

impl From<&Camera> for CameraSummary {
	fn from(camera: &Camera) -> CameraSummary {
		CameraSummary {
			id: camera.id.clone(),
			kind: camera.kind,
			src: camera.src.clone(),
			alt: camera.alt.clone(),
			image: camera.kind.is_fetchable().then(|| format!("/image/{}", camera.id)),
		}
	}
}

#[derive(Serialize)]
pub struct CanyonGroup {
	pub canyon: String,
	pub cameras: Vec<CameraSummary>,
}



// Rocket hands us the percent-decoded segment, i.e. the camera's src.
#[get("/image/<id>")]
async fn image(id: &str, if_none_match: IfNoneMatch, store: &State<Arc<Store>>) -> Option<ImageResponse> {
	let (camera, found) = store.get(&CameraId::from_src(id)).await;
	if !found {
		return None;
	}
	if !camera.has_image() {
		return Some(ImageResponse::Pending);
	}
	if if_none_match.matches(&camera.headers.etag) {
		return Some(ImageResponse::NotModified(camera.headers.etag));
	}
	Some(ImageResponse::Image(camera))
}

#[get("/")]
async fn list_cameras(store: &State<Arc<Store>>) -> Json<Vec<CanyonGroup>> {
	let mut groups = Vec::new();
	for (canyon, entries) in store.by_canyon().await {
		let mut cameras = Vec::with_capacity(entries.len());
		for entry in entries {
			cameras.push(entry.with(|camera| CameraSummary::from(camera)).await);
		}
		groups.push(CanyonGroup { canyon, cameras });
	}
	Json(groups)
}

#[get("/")]
async fn status(store: &State<Arc<Store>>) -> Json<StoreStatus> {
	Json(store.status().await)
}

#[catch(404)]
fn not_found() -> Value {
	json!({
		"status": "error",
		"reason": "Resource was not found."
	})
}



pub fn stage(store: Arc<Store>) -> rocket::fairing::AdHoc {
	rocket::fairing::AdHoc::on_ignite("Camera API", move |rocket| async move {
		rocket
			.manage(store)
			.register("/", catchers![not_found])
			.mount("/", routes![image])
			.mount("/v0/cameras", routes![list_cameras])
			.mount("/v0/status", routes![status])
	})
}
