/// S3-backed store for profile pictures.
///
/// The asset host is an external collaborator: failures surface as
/// `AppError::Storage` and are never retried here.
use aws_sdk_s3::config::{Credentials, Region};
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::Client;
use uuid::Uuid;

use crate::config::S3Config;
use crate::error::AppError;

#[derive(Clone)]
pub struct AvatarStore {
    client: Client,
    config: S3Config,
}

impl AvatarStore {
    /// Build an S3 client from the provided configuration.
    pub async fn new(config: &S3Config) -> Result<Self, AppError> {
        let credentials = Credentials::new(
            &config.access_key_id,
            &config.secret_access_key,
            None,
            None,
            "blog-api",
        );

        let shared_config = aws_config::defaults(aws_config::BehaviorVersion::latest())
            .region(Region::new(config.region.clone()))
            .credentials_provider(credentials)
            .load()
            .await;

        let mut builder = aws_sdk_s3::config::Builder::from(&shared_config);
        if let Some(endpoint) = &config.endpoint {
            if !endpoint.trim().is_empty() {
                builder = builder.endpoint_url(endpoint);
            }
        }

        Ok(AvatarStore {
            client: Client::from_conf(builder.build()),
            config: config.clone(),
        })
    }

    /// Upload avatar bytes for a user and return the stable public URL.
    /// One key per user, so a re-upload replaces the previous avatar.
    pub async fn upload_avatar(
        &self,
        user_id: Uuid,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<String, AppError> {
        let key = format!("avatars/{}", user_id);

        self.client
            .put_object()
            .bucket(&self.config.bucket_name)
            .key(&key)
            .content_type(content_type)
            .body(ByteStream::from(bytes))
            .send()
            .await
            .map_err(|e| AppError::Storage(format!("Avatar upload failed: {}", e)))?;

        Ok(self.config.public_url(&key))
    }
}
