use std::fmt;

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};



// Everything except the URL "unreserved" characters gets escaped, so an id is always a single
// path segment.
const ID_ESCAPE_SET: &AsciiSet = &NON_ALPHANUMERIC
	.remove(b'-')
	.remove(b'.')
	.remove(b'_')
	.remove(b'~');

#[derive(Clone)]
#[derive(Debug, Default, PartialEq, Eq, Hash)]
#[derive(Serialize, Deserialize)]
#[serde(transparent)]
pub struct CameraId(String);

impl CameraId {
	/// Derives the id of a camera from its source URL.
	pub fn from_src(src: &str) -> CameraId {
		CameraId(utf8_percent_encode(src, ID_ESCAPE_SET).to_string())
	}

	pub fn as_str(&self) -> &str {
		&self.0
	}
}

impl fmt::Display for CameraId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.0)
	}
}

#[derive(Clone, Copy)]
#[derive(Debug, Default, PartialEq, Eq)]
#[derive(Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Kind {
	#[default]
	Image,
	Iframe,
	Roadstatus,
}

impl Kind {
	/// Iframes are embedded by the browser; there is no payload for us to fetch.
	pub fn is_fetchable(&self) -> bool {
		!matches!(self, Kind::Iframe)
	}
}

/// One camera as listed in the cameras file.
#[derive(Clone)]
#[derive(Debug)]
#[derive(Serialize, Deserialize)]
pub struct CameraDescriptor {
	pub src: String,
	#[serde(default)]
	pub alt: String,
	#[serde(default)]
	pub kind: Kind,
	#[serde(default)]
	pub canyon: String,
}

#[derive(Clone)]
#[derive(Debug, Default, PartialEq, Eq)]
pub struct Image {
	pub src: String,
	pub bytes: Vec<u8>,
}

#[derive(Clone)]
#[derive(Debug, Default, PartialEq, Eq)]
#[derive(Serialize)]
pub struct ValidationHeaders {
	pub content_type: String,
	pub etag: String,
	pub content_length: u64,
	/// 0 until the first successful fetch.
	pub status: u16,
}

/// Live state of a camera. Only ever reached through its `Entry`.
#[derive(Clone)]
#[derive(Debug, Default, PartialEq, Eq)]
pub struct Camera {
	pub id: CameraId,
	pub kind: Kind,
	pub src: String,
	pub alt: String,
	pub canyon: String,
	pub image: Image,
	pub headers: ValidationHeaders,
}

impl Camera {
	pub fn new(descriptor: CameraDescriptor) -> Camera {
		Camera {
			id: CameraId::from_src(&descriptor.src),
			kind: descriptor.kind,
			image: Image {
				src: descriptor.src.clone(),
				bytes: Vec::new(),
			},
			src: descriptor.src,
			alt: descriptor.alt,
			canyon: descriptor.canyon,
			headers: ValidationHeaders::default(),
		}
	}

	pub fn has_image(&self) -> bool {
		self.headers.status == 200
	}
}
