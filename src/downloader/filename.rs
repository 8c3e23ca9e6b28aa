use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use percent_encoding::percent_decode_str;
use url::Url;

/// Extensions accepted as already image-qualified.
const IMAGE_EXTENSIONS: [&str; 6] = ["jpg", "jpeg", "png", "gif", "bmp", "webp"];

/// Derives the local filename for `url`.
///
/// The candidate is the last non-empty, percent-decoded path segment. A
/// missing or dotless candidate falls back to `downloaded_image_<n>.jpg`,
/// where `<n>` hashes the full URL text so the same URL maps to the same
/// name on every run. A dotted candidate outside the known image extensions
/// gets `.jpg` appended; otherwise it is used unchanged.
pub fn resolve(url: &Url) -> String {
    let path = percent_decode_str(url.path()).decode_utf8_lossy();

    let candidate = path
        .split('/')
        .filter(|segment| !segment.is_empty())
        .last()
        .unwrap_or("");

    if candidate.is_empty() || !candidate.contains('.') {
        return format!("downloaded_image_{}.jpg", url_hash(url.as_str()) % 10_000);
    }

    match candidate.rsplit('.').next() {
        Some(ext) if IMAGE_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()) => {
            candidate.to_string()
        }
        _ => format!("{candidate}.jpg"),
    }
}

fn url_hash(url: &str) -> u64 {
    let mut hasher = DefaultHasher::new();
    url.hash(&mut hasher);
    hasher.finish()
}
