/// Text helpers used for log output
pub mod text {
    /// First `max_chars` characters of `text` on one line, with an ellipsis when cut.
    pub fn preview(text: &str, max_chars: usize) -> String {
        let flat = text.split_whitespace().collect::<Vec<_>>().join(" ");
        if flat.chars().count() <= max_chars {
            return flat;
        }
        let cut: String = flat.chars().take(max_chars).collect();
        match cut.rfind(' ') {
            Some(last_space) if last_space > 0 => format!("{}...", &cut[..last_space]),
            _ => format!("{}...", cut),
        }
    }
}

/// Media type helpers
pub mod media {
    /// Accepts any `image/*` type, ignoring case and parameters.
    pub fn is_image_mime(mime_type: &str) -> bool {
        let essence = mime_type.split(';').next().unwrap_or("").trim().to_ascii_lowercase();
        match essence.split_once('/') {
            Some(("image", subtype)) => !subtype.is_empty(),
            _ => false,
        }
    }

    /// File suffix for a temporary upload, so providers can sniff the format.
    pub fn suffix_for(mime_type: &str) -> &'static str {
        let essence = mime_type.split(';').next().unwrap_or("").trim().to_ascii_lowercase();
        match essence.as_str() {
            "image/jpeg" | "image/jpg" => ".jpg",
            "image/png" => ".png",
            "image/gif" => ".gif",
            "image/webp" => ".webp",
            "image/bmp" => ".bmp",
            "image/tiff" => ".tiff",
            "image/heic" => ".heic",
            _ => ".img",
        }
    }
}
