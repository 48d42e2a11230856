use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;

use crate::error::RecipesServiceError;

/// Decoded recipe image ready to be written to storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImagePayload {
    pub bytes: Vec<u8>,
    pub extension: String,
}

impl ImagePayload {
    /// Decode a `data:image/<ext>;base64,<data>` URL or bare base64.
    ///
    /// Bare payloads are typed by their magic bytes; anything that is not
    /// PNG, JPEG, GIF or WebP is rejected.
    pub fn from_base64(raw: &str) -> Result<Self, RecipesServiceError> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Err(RecipesServiceError::MissingImage);
        }

        let (declared, data) = match raw.strip_prefix("data:") {
            Some(rest) => {
                let (meta, data) = rest
                    .split_once(',')
                    .ok_or(RecipesServiceError::InvalidImage)?;
                let subtype = meta
                    .strip_suffix(";base64")
                    .and_then(|mime| mime.strip_prefix("image/"))
                    .ok_or(RecipesServiceError::InvalidImage)?;
                (Some(subtype), data)
            }
            None => (None, raw),
        };

        let bytes = STANDARD
            .decode(data)
            .map_err(|_| RecipesServiceError::InvalidImage)?;
        if bytes.is_empty() {
            return Err(RecipesServiceError::InvalidImage);
        }

        let extension = match declared {
            Some(subtype) => normalize_extension(subtype)?,
            None => sniff_extension(&bytes).ok_or(RecipesServiceError::InvalidImage)?,
        };
        Ok(Self {
            bytes,
            extension: extension.to_owned(),
        })
    }
}

fn normalize_extension(subtype: &str) -> Result<&'static str, RecipesServiceError> {
    match subtype.to_ascii_lowercase().as_str() {
        "png" => Ok("png"),
        "jpeg" | "jpg" => Ok("jpg"),
        "gif" => Ok("gif"),
        "webp" => Ok("webp"),
        _ => Err(RecipesServiceError::InvalidImage),
    }
}

fn sniff_extension(bytes: &[u8]) -> Option<&'static str> {
    if bytes.starts_with(b"\x89PNG\r\n\x1a\n") {
        Some("png")
    } else if bytes.starts_with(&[0xFF, 0xD8, 0xFF]) {
        Some("jpg")
    } else if bytes.starts_with(b"GIF8") {
        Some("gif")
    } else if bytes.len() >= 12 && &bytes[..4] == b"RIFF" && &bytes[8..12] == b"WEBP" {
        Some("webp")
    } else {
        None
    }
}
