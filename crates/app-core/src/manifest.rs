//! Static media manifest: one `image <ref>` or `video <ref>` per line.

use crate::error::ManifestError;
use crate::media::{MediaDescriptor, MediaKind};

/// The shipped memory list, in ring order.
pub static DEFAULT_MANIFEST: &str = include_str!("../assets/manifest.txt");

pub fn parse_manifest(text: &str) -> Result<Vec<MediaDescriptor>, ManifestError> {
    let mut out = Vec::new();
    for (i, raw) in text.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let line_no = i + 1;
        let mut parts = line.splitn(2, char::is_whitespace);
        let kind = match parts.next() {
            Some("image") => MediaKind::Image,
            Some("video") => MediaKind::Video,
            Some(other) => {
                return Err(ManifestError::UnknownKind {
                    line: line_no,
                    kind: other.to_string(),
                })
            }
            None => continue,
        };
        let source_ref = parts.next().map(str::trim).unwrap_or("");
        if source_ref.is_empty() {
            return Err(ManifestError::MissingSource { line: line_no });
        }
        out.push(MediaDescriptor {
            kind,
            source_ref: source_ref.to_string(),
        });
    }
    Ok(out)
}
