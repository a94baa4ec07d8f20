use std::path::Path;
use tempfile::NamedTempFile;

/// MIME types accepted for user photos and blog images
pub const ALLOWED_IMAGE_TYPES: [&str; 3] = ["image/jpeg", "image/png", "image/webp"];

/// A file part from a multipart request, spooled to disk.
///
/// The temp file is removed when the value is dropped.
#[derive(Debug)]
pub struct UploadedFile {
    pub file_name: String,
    pub content_type: String,
    pub size: u64,
    pub temp: NamedTempFile,
}

impl UploadedFile {
    pub fn path(&self) -> &Path {
        self.temp.path()
    }

    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    pub fn is_allowed_image(&self) -> bool {
        ALLOWED_IMAGE_TYPES.contains(&self.content_type.as_str())
    }

    /// Extension used for the stored object, taken from the MIME type first
    pub fn extension(&self) -> Option<String> {
        match self.content_type.as_str() {
            "image/jpeg" => return Some("jpg".to_string()),
            "image/png" => return Some("png".to_string()),
            "image/webp" => return Some("webp".to_string()),
            _ => {}
        }
        Path::new(&self.file_name)
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn upload(name: &str, content_type: &str) -> UploadedFile {
        UploadedFile {
            file_name: name.to_string(),
            content_type: content_type.to_string(),
            size: 3,
            temp: NamedTempFile::new().unwrap(),
        }
    }

    #[test]
    fn test_allowed_image_types() {
        assert!(upload("a.png", "image/png").is_allowed_image());
        assert!(upload("a.webp", "image/webp").is_allowed_image());
        assert!(!upload("a.gif", "image/gif").is_allowed_image());
        assert!(!upload("a.txt", "text/plain").is_allowed_image());
    }

    #[test]
    fn test_extension_prefers_content_type() {
        assert_eq!(upload("photo.jpeg", "image/jpeg").extension().as_deref(), Some("jpg"));
        assert_eq!(upload("scan.TIFF", "image/tiff").extension().as_deref(), Some("tiff"));
        assert_eq!(upload("noext", "application/octet-stream").extension(), None);
    }
}
