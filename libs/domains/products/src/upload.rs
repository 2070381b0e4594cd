//! Image uploads: multipart parsing, type checks and on-disk storage.

use axum::body::Bytes;
use axum::extract::Multipart;
use core_config::{ConfigError, FromEnv, env_or_default, env_parse};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};
use strum::{AsRefStr, EnumString};
use tracing::instrument;
use uuid::Uuid;

use crate::error::{ProductError, ProductResult};

pub const DEFAULT_UPLOAD_DIR: &str = "public/uploads";
pub const DEFAULT_PUBLIC_PATH: &str = "/public/uploads/";
pub const DEFAULT_MAX_GALLERY_IMAGES: usize = 10;
pub const DEFAULT_MAX_FILE_SIZE: usize = 5 * 1024 * 1024;

/// Headroom for text fields and multipart framing on top of file bytes
const FORM_OVERHEAD_BYTES: usize = 1024 * 1024;

/// Multipart field carrying the product's main image
pub const IMAGE_FIELD: &str = "image";
/// Multipart field carrying gallery images
pub const GALLERY_FIELD: &str = "images";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadConfig {
    /// Directory files are written to
    pub dir: PathBuf,
    /// URL path the directory is served under, with leading and trailing `/`
    pub public_path: String,
    pub max_gallery_images: usize,
    pub max_file_size_bytes: usize,
}

impl UploadConfig {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            ..Self::default()
        }
    }

    /// Largest request body a gallery upload can legitimately need.
    pub fn body_limit(&self) -> usize {
        self.max_file_size_bytes
            .saturating_mul(self.max_gallery_images.max(1))
            .saturating_add(FORM_OVERHEAD_BYTES)
    }
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from(DEFAULT_UPLOAD_DIR),
            public_path: DEFAULT_PUBLIC_PATH.to_string(),
            max_gallery_images: DEFAULT_MAX_GALLERY_IMAGES,
            max_file_size_bytes: DEFAULT_MAX_FILE_SIZE,
        }
    }
}

impl FromEnv for UploadConfig {
    /// Load from `UPLOAD_DIR`, `UPLOAD_PUBLIC_PATH`,
    /// `UPLOAD_MAX_GALLERY_IMAGES` and `UPLOAD_MAX_FILE_SIZE`.
    fn from_env() -> Result<Self, ConfigError> {
        let public_path = env_or_default("UPLOAD_PUBLIC_PATH", DEFAULT_PUBLIC_PATH);

        Ok(Self {
            dir: PathBuf::from(env_or_default("UPLOAD_DIR", DEFAULT_UPLOAD_DIR)),
            public_path: normalize_public_path(&public_path),
            max_gallery_images: env_parse("UPLOAD_MAX_GALLERY_IMAGES", DEFAULT_MAX_GALLERY_IMAGES)?,
            max_file_size_bytes: env_parse("UPLOAD_MAX_FILE_SIZE", DEFAULT_MAX_FILE_SIZE)?,
        })
    }
}

/// Files are never served from the site root; an empty path keeps the default.
fn normalize_public_path(raw: &str) -> String {
    let trimmed = raw.trim().trim_matches('/');
    if trimmed.is_empty() {
        DEFAULT_PUBLIC_PATH.to_string()
    } else {
        format!("/{trimmed}/")
    }
}

/// Accepted image MIME types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString, AsRefStr)]
pub enum ImageType {
    #[strum(serialize = "image/png")]
    Png,
    #[strum(serialize = "image/jpeg")]
    Jpeg,
    #[strum(serialize = "image/jpg")]
    Jpg,
}

impl ImageType {
    pub fn from_mime(mime: &str) -> Option<Self> {
        mime.trim().parse().ok()
    }

    pub fn extension(&self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Jpeg => "jpeg",
            Self::Jpg => "jpg",
        }
    }
}

/// One uploaded file, fully buffered.
#[derive(Debug, Clone)]
pub struct ImageUpload {
    pub file_name: Option<String>,
    pub content_type: Option<String>,
    pub bytes: Bytes,
}

/// Text fields and optional main image of a create/update request.
#[derive(Debug, Default)]
pub struct ProductUpload {
    pub fields: HashMap<String, String>,
    pub image: Option<ImageUpload>,
}

/// Read a create/update body: text fields plus at most one `image` file.
pub async fn read_product_upload(form: &mut Multipart) -> ProductResult<ProductUpload> {
    let mut upload = ProductUpload::default();

    while let Some(field) = form.next_field().await? {
        let name = field.name().unwrap_or_default().to_string();

        if name == IMAGE_FIELD && field.file_name().is_some() {
            if upload.image.is_some() {
                return Err(ProductError::Upload(
                    "Only one image is allowed".to_string(),
                ));
            }
            let file_name = field.file_name().map(str::to_owned);
            let content_type = field.content_type().map(str::to_owned);
            let bytes = field.bytes().await?;
            upload.image = Some(ImageUpload {
                file_name,
                content_type,
                bytes,
            });
        } else if field.file_name().is_some() {
            return Err(ProductError::Upload(format!("Unexpected file field: {name}")));
        } else {
            let value = field.text().await?;
            upload.fields.insert(name, value);
        }
    }

    Ok(upload)
}

/// Read a gallery body: every `images` file, at most `max_images` of them.
///
/// Other fields are ignored.
pub async fn read_gallery_upload(
    form: &mut Multipart,
    max_images: usize,
) -> ProductResult<Vec<ImageUpload>> {
    let mut images = Vec::new();

    while let Some(field) = form.next_field().await? {
        if field.name() != Some(GALLERY_FIELD) {
            continue;
        }
        if images.len() == max_images {
            return Err(ProductError::Upload(format!(
                "Too many images, at most {max_images} are allowed"
            )));
        }

        let file_name = field.file_name().map(str::to_owned);
        let content_type = field.content_type().map(str::to_owned);
        let bytes = field.bytes().await?;
        images.push(ImageUpload {
            file_name,
            content_type,
            bytes,
        });
    }

    Ok(images)
}

/// Writes uploads under [`UploadConfig::dir`] and builds their public URLs.
#[derive(Debug, Clone)]
pub struct ImageStore {
    config: Arc<UploadConfig>,
}

impl ImageStore {
    pub fn new(config: UploadConfig) -> Self {
        Self {
            config: Arc::new(config),
        }
    }

    pub fn config(&self) -> &UploadConfig {
        &self.config
    }

    /// Check type and size without touching the disk.
    pub fn check(&self, upload: &ImageUpload) -> ProductResult<ImageType> {
        let image_type = upload
            .content_type
            .as_deref()
            .and_then(ImageType::from_mime)
            .ok_or_else(|| ProductError::Upload("Invalid image type".to_string()))?;

        if upload.bytes.len() > self.config.max_file_size_bytes {
            return Err(ProductError::Upload(format!(
                "Image exceeds the maximum size of {} bytes",
                self.config.max_file_size_bytes
            )));
        }

        Ok(image_type)
    }

    /// Check, then write the file; returns the generated file name.
    #[instrument(skip(self, upload), fields(size = upload.bytes.len()))]
    pub async fn store(&self, upload: &ImageUpload) -> ProductResult<String> {
        let image_type = self.check(upload)?;
        let file_name = generate_file_name(upload.file_name.as_deref(), image_type);

        tokio::fs::create_dir_all(&self.config.dir).await?;
        tokio::fs::write(self.config.dir.join(&file_name), &upload.bytes).await?;

        tracing::debug!(file_name = %file_name, "Image stored");
        Ok(file_name)
    }

    /// `{base_url}{public_path}{file_name}`
    pub fn public_url(&self, base_url: &str, file_name: &str) -> String {
        format!(
            "{}{}{}",
            base_url.trim_end_matches('/'),
            self.config.public_path,
            file_name
        )
    }
}

/// Longest stem kept from the client's file name
const MAX_STEM_CHARS: usize = 64;

/// `{stem}-{unix millis}-{8 hex}.{ext}`.
///
/// The stem keeps only `[A-Za-z0-9._-]`; whitespace runs and any other
/// character become `-`, so the name is safe both on disk and in a URL path.
fn generate_file_name(original: Option<&str>, image_type: ImageType) -> String {
    let stem = original
        .map(Path::new)
        .and_then(Path::file_stem)
        .and_then(|s| s.to_str())
        .map(|s| {
            s.split_whitespace()
                .collect::<Vec<_>>()
                .join("-")
                .chars()
                .map(|c| match c {
                    'A'..='Z' | 'a'..='z' | '0'..='9' | '.' | '_' | '-' => c,
                    _ => '-',
                })
                .take(MAX_STEM_CHARS)
                .collect::<String>()
        })
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| "image".to_string());

    let millis = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or_default();
    let suffix = Uuid::new_v4().simple().to_string();

    format!("{stem}-{millis}-{}.{}", &suffix[..8], image_type.extension())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn png(name: &str, bytes: &'static [u8]) -> ImageUpload {
        ImageUpload {
            file_name: Some(name.to_string()),
            content_type: Some("image/png".to_string()),
            bytes: Bytes::from_static(bytes),
        }
    }

    #[test]
    fn test_image_type_from_mime() {
        assert_eq!(ImageType::from_mime("image/png"), Some(ImageType::Png));
        assert_eq!(ImageType::from_mime("image/jpeg"), Some(ImageType::Jpeg));
        assert_eq!(ImageType::from_mime("image/jpg"), Some(ImageType::Jpg));
        assert_eq!(ImageType::from_mime("image/gif"), None);
        assert_eq!(ImageType::Jpeg.extension(), "jpeg");
        assert_eq!(ImageType::Png.as_ref(), "image/png");
    }

    #[test]
    fn test_generate_file_name_replaces_whitespace() {
        let name = generate_file_name(Some("summer  shirt front.png"), ImageType::Png);
        assert!(name.starts_with("summer-shirt-front-"), "{name}");
        assert!(name.ends_with(".png"));
    }

    #[test]
    fn test_generate_file_name_strips_url_unsafe_characters() {
        let name = generate_file_name(Some("shirt#1?v=2%.png"), ImageType::Png);
        assert!(name.starts_with("shirt-1-v-2--"), "{name}");
        assert!(
            name.chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-')),
            "{name}"
        );

        let name = generate_file_name(Some("t\u{e9}l\u{e9} photo.jpg"), ImageType::Jpg);
        assert!(name.starts_with("t-l--photo-"), "{name}");
    }

    #[test]
    fn test_generate_file_name_caps_long_stems() {
        let original = format!("{}.png", "a".repeat(240));
        let name = generate_file_name(Some(&original), ImageType::Png);

        assert!(name.starts_with(&"a".repeat(MAX_STEM_CHARS)));
        assert!(!name.starts_with(&"a".repeat(MAX_STEM_CHARS + 1)));
        assert!(name.len() < 255, "{} bytes", name.len());
    }

    #[test]
    fn test_generate_file_name_falls_back_to_image() {
        let name = generate_file_name(None, ImageType::Jpg);
        assert!(name.starts_with("image-"));
        assert!(name.ends_with(".jpg"));

        let parts: Vec<_> = name.trim_end_matches(".jpg").split('-').collect();
        assert_eq!(parts.len(), 3);
        assert_eq!(parts[2].len(), 8);
    }

    #[test]
    fn test_public_url() {
        let store = ImageStore::new(UploadConfig::default());
        assert_eq!(
            store.public_url("http://localhost:3000", "a.png"),
            "http://localhost:3000/public/uploads/a.png"
        );
    }

    #[test]
    fn test_check_rejects_wrong_type_and_oversize() {
        let store = ImageStore::new(UploadConfig {
            max_file_size_bytes: 4,
            ..UploadConfig::default()
        });

        let mut gif = png("a.gif", b"GIF");
        gif.content_type = Some("image/gif".into());
        assert!(matches!(store.check(&gif), Err(ProductError::Upload(m)) if m == "Invalid image type"));

        let mut untyped = png("a.png", b"PNG");
        untyped.content_type = None;
        assert!(store.check(&untyped).is_err());

        assert!(store.check(&png("big.png", b"too large")).is_err());
        assert_eq!(store.check(&png("ok.png", b"PNG")).unwrap(), ImageType::Png);
    }

    #[tokio::test]
    async fn test_store_writes_file() {
        let dir = TempDir::new().unwrap();
        let uploads = dir.path().join("nested/uploads");
        let store = ImageStore::new(UploadConfig::new(&uploads));

        let file_name = store.store(&png("logo.png", b"\x89PNG")).await.unwrap();

        let written = tokio::fs::read(uploads.join(&file_name)).await.unwrap();
        assert_eq!(written, b"\x89PNG");
    }

    #[test]
    fn test_upload_config_from_env() {
        temp_env::with_vars(
            [
                ("UPLOAD_DIR", Some("/var/catalog/uploads")),
                ("UPLOAD_PUBLIC_PATH", Some("media")),
                ("UPLOAD_MAX_GALLERY_IMAGES", Some("4")),
                ("UPLOAD_MAX_FILE_SIZE", None),
            ],
            || {
                let config = UploadConfig::from_env().unwrap();
                assert_eq!(config.dir, PathBuf::from("/var/catalog/uploads"));
                assert_eq!(config.public_path, "/media/");
                assert_eq!(config.max_gallery_images, 4);
                assert_eq!(config.max_file_size_bytes, DEFAULT_MAX_FILE_SIZE);
            },
        );
    }

    #[test]
    fn test_upload_config_rejects_bad_number() {
        temp_env::with_var("UPLOAD_MAX_GALLERY_IMAGES", Some("many"), || {
            assert!(UploadConfig::from_env().is_err());
        });
    }

    #[test]
    fn test_body_limit_covers_full_gallery() {
        let config = UploadConfig::default();
        assert!(config.body_limit() > config.max_file_size_bytes * config.max_gallery_images);
    }
}
