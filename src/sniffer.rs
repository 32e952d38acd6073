//! Raster image detection by leading-byte signature.

use std::fmt;

/// Longest prefix any signature needs to look at.
const SNIFF_LEN: usize = 12;

/// Image formats recognised by [`sniff`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ImageKind {
    Jpeg,
    Png,
    Gif,
    Bmp,
    Tiff,
    Webp,
    Exr,
}

impl ImageKind {
    /// Every kind, in the order signatures are tested.
    pub const ALL: [ImageKind; 7] = [
        Self::Jpeg,
        Self::Png,
        Self::Gif,
        Self::Bmp,
        Self::Tiff,
        Self::Webp,
        Self::Exr,
    ];

    /// Lowercase type name, also used as the corrected file extension.
    #[must_use]
    #[inline]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Jpeg => "jpeg",
            Self::Png => "png",
            Self::Gif => "gif",
            Self::Bmp => "bmp",
            Self::Tiff => "tiff",
            Self::Webp => "webp",
            Self::Exr => "exr",
        }
    }

    /// Extension appended to the corrected copy of a mislabeled file.
    #[must_use]
    #[inline]
    pub const fn canonical_extension(self) -> &'static str {
        self.name()
    }

    /// Returns `true` when `extension` (without the dot) ends with the
    /// canonical extension. The comparison is case-sensitive, so `jpg` and
    /// `JPEG` do not describe a JPEG.
    pub fn matches_extension(self, extension: Option<&str>) -> bool {
        extension.is_some_and(|ext| ext.ends_with(self.canonical_extension()))
    }

    fn matches(self, head: &[u8]) -> bool {
        match self {
            Self::Jpeg => head.starts_with(&[0xFF, 0xD8, 0xFF]),
            Self::Png => head.starts_with(&[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A]),
            Self::Gif => head.starts_with(b"GIF87a") || head.starts_with(b"GIF89a"),
            Self::Bmp => head.starts_with(b"BM"),
            Self::Tiff => head.starts_with(b"II*\0") || head.starts_with(b"MM\0*"),
            Self::Webp => head.len() >= 12 && head.starts_with(b"RIFF") && &head[8..12] == b"WEBP",
            Self::Exr => head.starts_with(&[0x76, 0x2F, 0x31, 0x01]),
        }
    }
}

impl fmt::Display for ImageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Identify the image format of `data` from its leading bytes.
///
/// Only the first few bytes are inspected; nothing is decoded.
pub fn sniff(data: &[u8]) -> Option<ImageKind> {
    let head = &data[..data.len().min(SNIFF_LEN)];
    ImageKind::ALL.into_iter().find(|kind| kind.matches(head))
}
