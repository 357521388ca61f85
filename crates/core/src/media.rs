//! Receipt image checks and upload naming.
//!
//! Uploads are inspected from their header bytes only; nothing is decoded
//! beyond what is needed to read the dimensions.

use std::io::Cursor;

use image::ImageReader;

/// Directory (relative to the media root) receipt images are stored under.
pub const EXPENSE_IMAGE_DIR: &str = "expense_image";

/// File extensions accepted for receipt images.
pub const ALLOWED_IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "webp"];

pub const NOT_A_FILE: &str =
    "The submitted data was not a file. Check the encoding type on the form.";
pub const EMPTY_FILE: &str = "The submitted file is empty.";
pub const NO_FILE_NAME: &str = "No filename could be determined.";
pub const INVALID_IMAGE: &str = "Upload a valid image. The file you uploaded was either not an image or a corrupted image.";

/// A file part received in a multipart upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedFile {
    pub file_name: Option<String>,
    pub bytes: Vec<u8>,
}

/// An upload that passed [`inspect_image`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedImage {
    /// Sanitized file name, safe to join onto the storage directory.
    pub file_name: String,
    pub bytes: Vec<u8>,
}

/// Check that an upload is a readable image with an allowed extension.
pub fn inspect_image(upload: UploadedFile) -> Result<ValidatedImage, String> {
    let raw_name = upload
        .file_name
        .filter(|n| !n.trim().is_empty())
        .ok_or_else(|| NO_FILE_NAME.to_string())?;

    if upload.bytes.is_empty() {
        return Err(EMPTY_FILE.to_string());
    }

    let file_name = sanitize_file_name(&raw_name);
    let extension = file_name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();
    if !ALLOWED_IMAGE_EXTENSIONS.contains(&extension.as_str()) {
        return Err(format!(
            "File extension \"{extension}\" is not allowed. Allowed extensions are: {}.",
            ALLOWED_IMAGE_EXTENSIONS.join(", ")
        ));
    }

    let reader = ImageReader::new(Cursor::new(upload.bytes.as_slice()))
        .with_guessed_format()
        .map_err(|_| INVALID_IMAGE.to_string())?;
    if reader.format().is_none() {
        return Err(INVALID_IMAGE.to_string());
    }
    reader
        .into_dimensions()
        .map_err(|_| INVALID_IMAGE.to_string())?;

    Ok(ValidatedImage {
        file_name,
        bytes: upload.bytes,
    })
}

/// Reduce a client-supplied file name to a safe basename.
///
/// Directory components are dropped, spaces become `_`, and anything other
/// than ASCII alphanumerics, `-`, `_` and `.` is removed. Leading dots are
/// stripped so the result is never hidden or a path traversal.
pub fn sanitize_file_name(raw: &str) -> String {
    let base = raw.rsplit(['/', '\\']).next().unwrap_or(raw).trim();
    let cleaned: String = base
        .chars()
        .filter_map(|c| match c {
            ' ' => Some('_'),
            c if c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.') => Some(c),
            _ => None,
        })
        .collect();
    let cleaned = cleaned.trim_start_matches('.');
    if cleaned.is_empty() {
        "upload".to_string()
    } else {
        cleaned.to_string()
    }
}

/// Insert `suffix` before the extension: `receipt.png` -> `receipt_ab12cd3.png`.
pub fn with_suffix(file_name: &str, suffix: &str) -> String {
    match file_name.rsplit_once('.') {
        Some((stem, ext)) => format!("{stem}_{suffix}.{ext}"),
        None => format!("{file_name}_{suffix}"),
    }
}

/// Relative storage path for a receipt image.
pub fn expense_image_path(file_name: &str) -> String {
    format!("{EXPENSE_IMAGE_DIR}/{file_name}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use image::ImageFormat;

    fn png_bytes() -> Vec<u8> {
        let mut bytes = Vec::new();
        image::DynamicImage::ImageRgb8(image::RgbImage::new(2, 1))
            .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
            .unwrap();
        bytes
    }

    #[test]
    fn sanitize_strips_paths_and_odd_characters() {
        assert_eq!(sanitize_file_name("../../etc/passwd"), "passwd");
        assert_eq!(sanitize_file_name("C:\\tmp\\my receipt.png"), "my_receipt.png");
        assert_eq!(sanitize_file_name("café (1).jpg"), "caf_1.jpg");
        assert_eq!(sanitize_file_name(".hidden.png"), "hidden.png");
        assert_eq!(sanitize_file_name("???"), "upload");
    }

    #[test]
    fn suffix_goes_before_extension() {
        assert_eq!(with_suffix("receipt.png", "abc1234"), "receipt_abc1234.png");
        assert_eq!(with_suffix("receipt", "abc1234"), "receipt_abc1234");
    }

    #[test]
    fn accepts_png_header() {
        let image = inspect_image(UploadedFile {
            file_name: Some("lunch receipt.PNG".into()),
            bytes: png_bytes(),
        })
        .unwrap();
        assert_eq!(image.file_name, "lunch_receipt.PNG");
        assert_eq!(image.bytes, png_bytes());
    }

    #[test]
    fn rejects_missing_name_and_empty_body() {
        assert_matches!(
            inspect_image(UploadedFile { file_name: None, bytes: png_bytes() }),
            Err(msg) if msg == NO_FILE_NAME
        );
        assert_matches!(
            inspect_image(UploadedFile { file_name: Some("a.png".into()), bytes: vec![] }),
            Err(msg) if msg == EMPTY_FILE
        );
    }

    #[test]
    fn rejects_disallowed_extension() {
        let err = inspect_image(UploadedFile {
            file_name: Some("notes.txt".into()),
            bytes: png_bytes(),
        })
        .unwrap_err();
        assert!(err.starts_with("File extension \"txt\" is not allowed."));
    }

    #[test]
    fn rejects_non_image_bytes() {
        assert_matches!(
            inspect_image(UploadedFile {
                file_name: Some("fake.png".into()),
                bytes: b"definitely not an image".to_vec(),
            }),
            Err(msg) if msg == INVALID_IMAGE
        );
    }
}
