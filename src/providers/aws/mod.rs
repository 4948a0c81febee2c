//! AWS provider.
//!
//! This provider integrates with RDS, Secrets Manager and the RDS Data API
//! using the official AWS SDK.
//!
//! # Requirements
//!
//! - AWS credentials configured via:
//!   - Environment variables (`AWS_ACCESS_KEY_ID`, `AWS_SECRET_ACCESS_KEY`)
//!   - Shared credentials file (`~/.aws/credentials`), optionally a named profile
//!   - IAM instance role (for EC2/ECS)
//! - Permissions: `rds:DescribeDBClusters`, `secretsmanager:ListSecrets`,
//!   `rds-data:ExecuteStatement`
//!
//! # Example
//!
//! ```no_run
//! use aurora_walkthrough::{factory, ProviderConfig, ProviderType};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> aurora_walkthrough::Result<()> {
//!     let config = ProviderConfig::new(ProviderType::AwsCloudFormation)
//!         .with_region("us-west-2")
//!         .with_option("profile", "sandbox");
//!
//!     let provider = factory::configured_client(config).await?;
//!     for cluster in provider.list_clusters().await? {
//!         println!("{} ({})", cluster.identifier, cluster.engine_mode);
//!     }
//!
//!     Ok(())
//! }
//! ```

mod provider;

pub use provider::AwsProvider;

/// Registers the AWS provider with the factory.
pub fn register() {
    crate::factory::register_provider("awscloudformation", |cfg| {
        Ok(Box::new(AwsProvider::new(cfg)))
    });
}
