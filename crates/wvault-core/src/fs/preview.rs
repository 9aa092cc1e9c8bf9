//! Preview classification for the gallery view.
//!
//! A file previews as an image when its extension is one of
//! [`IMAGE_EXTENSIONS`]; anything else shows a generic file placeholder.
//! Image files whose leading bytes are not a recognizable image header are
//! reported as [`PreviewKind::Unavailable`] instead of failing the gallery.

use serde::Serialize;

/// Extensions (lowercase, without the dot) rendered as image previews.
pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif", "webp"];

/// Number of leading bytes needed to recognize any supported image format.
pub const SNIFF_LEN: usize = 12;

/// Default number of gallery columns.
pub const GALLERY_COLUMNS: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PreviewKind {
    /// Displayable image.
    Image,
    /// Image extension, but the content could not be previewed.
    Unavailable,
    /// Any other file; rendered as a placeholder.
    File,
}

impl PreviewKind {
    /// Classify by extension alone.
    pub fn for_file_name(name: &str) -> Self {
        if is_image_name(name) {
            PreviewKind::Image
        } else {
            PreviewKind::File
        }
    }

    /// Classify by extension, then confirm image files by their header bytes.
    pub fn for_content(name: &str, head: &[u8]) -> Self {
        match Self::for_file_name(name) {
            PreviewKind::Image if !has_image_signature(head) => PreviewKind::Unavailable,
            kind => kind,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            PreviewKind::Image => "image",
            PreviewKind::Unavailable => "preview not available",
            PreviewKind::File => "file",
        }
    }
}

/// Whether a file name carries one of the image extensions (case-insensitive).
pub fn is_image_name(name: &str) -> bool {
    name.rsplit_once('.').is_some_and(|(_, ext)| {
        IMAGE_EXTENSIONS
            .iter()
            .any(|candidate| ext.eq_ignore_ascii_case(candidate))
    })
}

/// Check the magic bytes of JPEG, PNG, GIF and WebP.
pub fn has_image_signature(head: &[u8]) -> bool {
    head.starts_with(&[0xFF, 0xD8, 0xFF])
        || head.starts_with(b"\x89PNG\r\n\x1a\n")
        || head.starts_with(b"GIF87a")
        || head.starts_with(b"GIF89a")
        || (head.len() >= 12 && head.starts_with(b"RIFF") && &head[8..12] == b"WEBP")
}

/// One gallery tile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GalleryItem {
    pub name: String,
    pub kind: PreviewKind,
}

/// The gallery view of a vault: every listed file in listing order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Gallery {
    pub items: Vec<GalleryItem>,
}

impl Gallery {
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Lay the items out in rows of `columns` tiles; the last row may be short.
    ///
    /// A `columns` of zero is treated as one column.
    pub fn rows(&self, columns: usize) -> std::slice::Chunks<'_, GalleryItem> {
        self.items.chunks(columns.max(1))
    }

    pub fn image_count(&self) -> usize {
        self.items
            .iter()
            .filter(|item| item.kind == PreviewKind::Image)
            .count()
    }
}
