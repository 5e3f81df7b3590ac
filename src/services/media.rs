/// Resolver for stored image paths against the object-storage public bucket.
#[derive(Clone)]
pub struct MediaService {
    base_url: String,
    bucket: String,
}

impl MediaService {
    pub fn new(base_url: &str, bucket: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            bucket: bucket.to_string(),
        }
    }

    /// Public URL for an object path inside the bucket.
    pub fn public_url(&self, path: &str) -> String {
        format!(
            "{}/storage/v1/object/public/{}/{}",
            self.base_url,
            self.bucket,
            path.trim_start_matches('/')
        )
    }

    /// Only raster formats the mobile client can render are accepted.
    pub fn allowed_extension(extension: &str) -> bool {
        matches!(extension.to_lowercase().as_str(), "jpg" | "jpeg" | "png")
    }
}
