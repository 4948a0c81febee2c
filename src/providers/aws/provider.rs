//! AWS provider implementation.

use crate::records::{
    ClusterRecord, Field, SecretPage, SecretRecord, StatementRequest, StatementResult,
};
use crate::{AuroraProvider, ProviderConfig, Result, WalkthroughError};
use async_trait::async_trait;
use aws_sdk_rds::operation::describe_db_clusters::DescribeDBClustersError;
use aws_sdk_rds::types::DbCluster;
use aws_sdk_rdsdata::operation::execute_statement::ExecuteStatementError;
use aws_sdk_rdsdata::types::Field as SdkField;
use tracing::debug;

/// Page size requested from Secrets Manager.
const SECRETS_PAGE_SIZE: i32 = 20;

struct Clients {
    rds: aws_sdk_rds::Client,
    secrets: aws_sdk_secretsmanager::Client,
    data: aws_sdk_rdsdata::Client,
}

/// AWS provider.
///
/// Talks to RDS (cluster discovery), Secrets Manager (credential discovery)
/// and the RDS Data API (database listing) through the official AWS SDK.
pub struct AwsProvider {
    clients: Option<Clients>,
    region: String,
    service: String,
    action: String,
    endpoint: Option<String>,
    profile: Option<String>,
}

impl AwsProvider {
    /// Creates a new AWS provider from configuration.
    pub fn new(config: ProviderConfig) -> Self {
        Self {
            clients: None,
            endpoint: config.get_option("endpoint").cloned(),
            profile: config.get_option("profile").cloned(),
            region: config.region,
            service: config.service,
            action: config.action,
        }
    }

    /// Application name the SDK clients report in their user agent,
    /// derived from the service context and action.
    fn app_name(&self) -> String {
        format!("{}-{}", self.service, self.action)
    }

    fn clients(&self) -> Result<&Clients> {
        self.clients.as_ref().ok_or_else(|| {
            WalkthroughError::Other(anyhow::anyhow!("AWS provider used before init()"))
        })
    }
}

fn cluster_record(cluster: &DbCluster) -> ClusterRecord {
    ClusterRecord {
        identifier: cluster.db_cluster_identifier().unwrap_or("").to_string(),
        arn: cluster.db_cluster_arn().unwrap_or("").to_string(),
        resource_id: cluster.db_cluster_resource_id().unwrap_or("").to_string(),
        engine: cluster.engine().unwrap_or("").to_string(),
        engine_mode: cluster.engine_mode().unwrap_or("").to_string(),
    }
}

fn field(value: &SdkField) -> Field {
    match value {
        SdkField::StringValue(s) => Field::String(s.clone()),
        SdkField::LongValue(n) => Field::Long(*n),
        SdkField::DoubleValue(n) => Field::Double(*n),
        SdkField::BooleanValue(b) => Field::Boolean(*b),
        SdkField::IsNull(_) => Field::Null,
        _ => Field::Unsupported,
    }
}

fn describe_cluster_error(cluster: &str, err: DescribeDBClustersError) -> WalkthroughError {
    let inner = if err.is_db_cluster_not_found_fault() {
        WalkthroughError::NotFound(cluster.to_string())
    } else {
        WalkthroughError::Other(anyhow::anyhow!(
            "{}",
            aws_sdk_rds::error::DisplayErrorContext(&err)
        ))
    };
    WalkthroughError::provider_op("rds", "describe_db_clusters", inner)
}

fn execute_statement_error(err: ExecuteStatementError) -> WalkthroughError {
    let inner = match err {
        ExecuteStatementError::BadRequestException(bad) => {
            WalkthroughError::BadRequest(bad.message().unwrap_or("").to_string())
        }
        err => WalkthroughError::Other(anyhow::anyhow!(
            "{}",
            aws_sdk_rdsdata::error::DisplayErrorContext(&err)
        )),
    };
    WalkthroughError::provider_op("rds-data", "execute_statement", inner)
}

#[async_trait]
impl AuroraProvider for AwsProvider {
    fn name(&self) -> &str {
        "awscloudformation"
    }

    fn region(&self) -> &str {
        &self.region
    }

    async fn init(&mut self) -> Result<()> {
        let app_name = aws_config::AppName::new(self.app_name()).map_err(|e| {
            WalkthroughError::Other(anyhow::anyhow!(
                "invalid client scope '{}': {}",
                self.app_name(),
                e
            ))
        })?;

        let mut config_loader = aws_config::defaults(aws_config::BehaviorVersion::latest())
            .region(aws_config::Region::new(self.region.clone()))
            .app_name(app_name);

        if let Some(ref profile) = self.profile {
            config_loader = config_loader.profile_name(profile);
        }

        // LocalStack
        if let Some(ref endpoint) = self.endpoint {
            config_loader = config_loader.endpoint_url(endpoint);
        }

        let config = config_loader.load().await;
        self.clients = Some(Clients {
            rds: aws_sdk_rds::Client::new(&config),
            secrets: aws_sdk_secretsmanager::Client::new(&config),
            data: aws_sdk_rdsdata::Client::new(&config),
        });

        Ok(())
    }

    async fn list_clusters(&self) -> Result<Vec<ClusterRecord>> {
        let clients = self.clients()?;

        let response = clients
            .rds
            .describe_db_clusters()
            .send()
            .await
            .map_err(|e| {
                WalkthroughError::provider_op(
                    "rds",
                    "describe_db_clusters",
                    WalkthroughError::Other(anyhow::anyhow!(
                        "{}",
                        aws_sdk_rds::error::DisplayErrorContext(&e)
                    )),
                )
            })?;

        let clusters: Vec<ClusterRecord> =
            response.db_clusters().iter().map(cluster_record).collect();
        debug!(count = clusters.len(), region = %self.region, "listed clusters");
        Ok(clusters)
    }

    async fn list_secrets_page(&self, next_token: Option<String>) -> Result<SecretPage> {
        let clients = self.clients()?;

        let response = clients
            .secrets
            .list_secrets()
            .max_results(SECRETS_PAGE_SIZE)
            .set_next_token(next_token)
            .send()
            .await
            .map_err(|e| {
                WalkthroughError::provider_op(
                    "secretsmanager",
                    "list_secrets",
                    WalkthroughError::Other(anyhow::anyhow!(
                        "{}",
                        aws_sdk_secretsmanager::error::DisplayErrorContext(&e)
                    )),
                )
            })?;

        let secrets = response
            .secret_list()
            .iter()
            .filter_map(|secret| {
                let name = secret.name()?;
                Some(SecretRecord::new(name, secret.arn().unwrap_or("")))
            })
            .collect();

        Ok(SecretPage {
            secrets,
            next_token: response
                .next_token()
                .filter(|t| !t.is_empty())
                .map(|t| t.to_string()),
        })
    }

    async fn describe_cluster(&self, cluster: &str) -> Result<ClusterRecord> {
        let clients = self.clients()?;

        let response = clients
            .rds
            .describe_db_clusters()
            .db_cluster_identifier(cluster)
            .send()
            .await
            .map_err(|e| describe_cluster_error(cluster, e.into_service_error()))?;

        response
            .db_clusters()
            .first()
            .map(cluster_record)
            .ok_or_else(|| WalkthroughError::NotFound(cluster.to_string()))
    }

    async fn execute_statement(&self, request: &StatementRequest) -> Result<StatementResult> {
        let clients = self.clients()?;

        let response = clients
            .data
            .execute_statement()
            .resource_arn(&request.resource_arn)
            .secret_arn(&request.secret_arn)
            .sql(&request.sql)
            .set_database(request.database.clone())
            .send()
            .await
            .map_err(|e| execute_statement_error(e.into_service_error()))?;

        Ok(StatementResult {
            records: response
                .records()
                .iter()
                .map(|row| row.iter().map(field).collect())
                .collect(),
        })
    }
}
