//! Collected response, built once at the `Completed` transition.

use axum::http::{HeaderMap, StatusCode};
use bytes::Bytes;

/// An immutable snapshot of a fully-received response.
///
/// Constructed only after every body frame has been accumulated; no partial
/// body is ever exposed through this type.
#[derive(Debug, Clone)]
pub struct CollectedResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl CollectedResponse {
    /// Body rendered for diagnostics, truncated to keep log lines sane.
    pub fn body_preview(&self) -> String {
        const MAX: usize = 256;
        let text = String::from_utf8_lossy(&self.body);
        if text.len() <= MAX {
            text.into_owned()
        } else {
            let mut cut = MAX;
            while !text.is_char_boundary(cut) {
                cut -= 1;
            }
            format!("{}… ({} bytes)", &text[..cut], self.body.len())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn body_preview_truncates_long_bodies() {
        let response = CollectedResponse {
            status: StatusCode::OK,
            headers: HeaderMap::new(),
            body: Bytes::from(vec![b'a'; 1000]),
        };
        let preview = response.body_preview();
        assert!(preview.len() < 300);
        assert!(preview.contains("1000 bytes"));
    }
}
