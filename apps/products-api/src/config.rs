//! Configuration for Products API

use core_config::{AppInfo, ConfigError, FromEnv, app_info, server::ServerConfig};
use database::common::RetryConfig;
use database::mongodb::MongoConfig;
use domain_products::UploadConfig;

pub use core_config::Environment;

/// Application configuration
#[derive(Clone, Debug)]
pub struct Config {
    pub app: AppInfo,
    pub environment: Environment,
    pub server: ServerConfig,
    pub mongodb: MongoConfig,
    pub retry: RetryConfig,
    pub uploads: UploadConfig,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            app: app_info!(),
            environment: Environment::from_env(),
            server: ServerConfig::from_env()?,
            mongodb: MongoConfig::from_env()?,
            retry: RetryConfig::from_env()?,
            uploads: UploadConfig::from_env()?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_from_env() {
        temp_env::with_vars(
            [
                ("MONGODB_URL", Some("mongodb://db:27017")),
                ("MONGODB_DATABASE", Some("shop")),
                ("PORT", Some("3003")),
                ("UPLOAD_DIR", Some("/var/uploads")),
                ("UPLOAD_MAX_GALLERY_IMAGES", Some("4")),
            ],
            || {
                let config = Config::from_env().unwrap();
                assert_eq!(config.app.name, "products_api");
                assert_eq!(config.server.port, 3003);
                assert_eq!(config.mongodb.url(), "mongodb://db:27017");
                assert_eq!(config.mongodb.database(), "shop");
                assert_eq!(config.uploads.dir.to_str(), Some("/var/uploads"));
                assert_eq!(config.uploads.max_gallery_images, 4);
            },
        );
    }

    #[test]
    fn test_config_requires_mongodb_url() {
        temp_env::with_vars_unset(["MONGODB_URL", "MONGO_URL"], || {
            assert!(matches!(
                Config::from_env(),
                Err(ConfigError::MissingEnvVar(_))
            ));
        });
    }
}
