//! The Aurora Serverless data source walkthrough.
//!
//! [`Walkthrough::run`] is strictly sequential: precondition check, region,
//! client, cluster, secret, database. Each step finishes (network call or
//! prompt included) before the next starts, and the first failure ends the
//! walkthrough without a partial result.

use crate::config::{ACTION_LIST, SERVICE_CONTEXT};
use crate::defaults::DefaultsSource;
use crate::engine::DatabaseEngine;
use crate::host::{Host, MessageLevel};
use crate::progress::Progress;
use crate::project::ProjectMetadata;
use crate::prompt::{ask_question, Prompter};
use crate::questions::{
    DataSourceMetadata, QuestionSpec, CLUSTER_QUESTION, DATABASE_QUESTION, REGION_QUESTION,
    SECRET_QUESTION,
};
use crate::records::{ClusterRecord, StatementRequest, WalkthroughResult};
use crate::secrets::{collect_all_secrets, match_cluster_secret, SecretMatch};
use crate::{AuroraProvider, ProviderConfig, ProviderType, Result, WalkthroughError};
use tracing::{debug, info};

pub const API_MISSING_MESSAGE: &str = "You must create an AppSync API in your project before \
     adding a graphql datasource. Please use \"amplify api add\" to create the API.";
pub const NO_CLUSTERS_MESSAGE: &str = "No properly configured Aurora Serverless clusters found.";
pub const NO_SECRETS_MESSAGE: &str = "No RDS access credentials found in the AWS Secret Manager.";
pub const NO_DATABASES_MESSAGE: &str = "No properly configured databases found.";

/// Name of the AppSync API resource the data source will be attached to.
///
/// # Errors
///
/// [`WalkthroughError::ResourceDoesNotExist`] if the `api` category is
/// missing or empty, or none of its resources is an AppSync API.
pub fn require_appsync_api(project: &ProjectMetadata) -> Result<String> {
    project
        .appsync_api()
        .map(str::to_string)
        .ok_or_else(|| WalkthroughError::ResourceDoesNotExist(API_MISSING_MESSAGE.to_string()))
}

/// Interactive walkthrough bound to a host and a prompter.
pub struct Walkthrough<'a> {
    host: &'a dyn Host,
    prompter: &'a mut dyn Prompter,
    provider: ProviderType,
    progress: Progress,
}

impl<'a> Walkthrough<'a> {
    /// Creates a walkthrough resolving clients from the CloudFormation
    /// provider, with animated spinners.
    pub fn new(host: &'a dyn Host, prompter: &'a mut dyn Prompter) -> Self {
        Self {
            host,
            prompter,
            provider: ProviderType::AwsCloudFormation,
            progress: Progress::Animated,
        }
    }

    /// Sets the provider clients are resolved from.
    pub fn with_provider(mut self, provider: ProviderType) -> Self {
        self.provider = provider;
        self
    }

    /// Sets whether spinners are drawn.
    pub fn with_progress(mut self, progress: Progress) -> Self {
        self.progress = progress;
        self
    }

    /// The host this walkthrough reports to.
    pub fn host(&self) -> &'a dyn Host {
        self.host
    }

    /// Runs the walkthrough.
    ///
    /// # Errors
    ///
    /// - [`WalkthroughError::ResourceDoesNotExist`]: no AppSync API, no
    ///   serverless cluster, or no user database
    /// - [`WalkthroughError::CredentialsNotFound`]: no secret at all
    /// - Provider, prompt and metadata errors as they occur
    pub async fn run(
        &mut self,
        defaults: &dyn DefaultsSource,
        metadata: &DataSourceMetadata,
    ) -> Result<WalkthroughResult> {
        metadata.validate()?;

        let project = self.host.project_metadata()?;
        let resource_name = require_appsync_api(&project)?;
        let defaults = defaults.defaults(&project);
        info!(api = %resource_name, "adding Aurora Serverless data source");

        let inputs = &metadata.inputs;

        let preselected = Some(defaults.region.as_str())
            .filter(|r| metadata.available_regions.iter().any(|a| a == r));
        let region = ask_question(
            &mut *self.prompter,
            inputs,
            REGION_QUESTION,
            &metadata.available_regions,
            preselected,
        )?;

        let config = ProviderConfig::new(self.provider)
            .with_region(region.as_str())
            .with_context(SERVICE_CONTEXT, ACTION_LIST);
        let client = self.host.provider_client(config).await?;

        let cluster = self.select_cluster(client.as_ref(), inputs).await?;
        let secret_arn = self
            .select_secret(client.as_ref(), inputs, &cluster.resource_id)
            .await?;
        let database_name = self
            .select_database(client.as_ref(), inputs, &cluster.arn, &secret_arn)
            .await?;

        Ok(WalkthroughResult {
            region,
            cluster_arn: cluster.arn,
            secret_arn,
            database_name,
            resource_name,
        })
    }

    async fn select_cluster(
        &mut self,
        client: &dyn AuroraProvider,
        inputs: &[QuestionSpec],
    ) -> Result<ClusterRecord> {
        let spinner = self.progress.start("Fetching Aurora Serverless clusters...");
        let clusters = client.list_clusters().await?;
        drop(spinner);

        let mut eligible: Vec<ClusterRecord> = Vec::new();
        for cluster in clusters.into_iter().filter(ClusterRecord::is_serverless) {
            if !eligible.iter().any(|c| c.identifier == cluster.identifier) {
                eligible.push(cluster);
            }
        }
        debug!(count = eligible.len(), "serverless clusters");

        if eligible.len() > 1 {
            let identifiers: Vec<String> =
                eligible.iter().map(|c| c.identifier.clone()).collect();
            let chosen = ask_question(
                &mut *self.prompter,
                inputs,
                CLUSTER_QUESTION,
                &identifiers,
                None,
            )?;

            return eligible
                .into_iter()
                .find(|c| c.identifier == chosen)
                .ok_or_else(|| {
                    WalkthroughError::Prompt(format!("unknown cluster selected: {}", chosen))
                });
        }

        let cluster = eligible
            .pop()
            .ok_or_else(|| WalkthroughError::ResourceDoesNotExist(NO_CLUSTERS_MESSAGE.to_string()))?;
        self.host.print(
            MessageLevel::Success,
            &format!(
                "Only one Cluster found: {} was automatically selected.",
                cluster.identifier
            ),
        );
        Ok(cluster)
    }

    async fn select_secret(
        &mut self,
        client: &dyn AuroraProvider,
        inputs: &[QuestionSpec],
        cluster_resource_id: &str,
    ) -> Result<String> {
        let spinner = self.progress.start("Fetching secrets...");
        let secrets = collect_all_secrets(client).await?;
        drop(spinner);
        debug!(count = secrets.len(), "listed secrets");

        match match_cluster_secret(secrets, cluster_resource_id) {
            SecretMatch::Detected(secret) => {
                self.host.print(
                    MessageLevel::Success,
                    &format!("Secret Store {} was automatically detected.", secret.arn),
                );
                Ok(secret.arn)
            }
            SecretMatch::Only(secret) => {
                self.host.print(
                    MessageLevel::Success,
                    &format!(
                        "Only one Secret found: {} was automatically selected.",
                        secret.arn
                    ),
                );
                Ok(secret.arn)
            }
            SecretMatch::Choose(secrets) => {
                let names: Vec<String> = secrets.iter().map(|s| s.name.clone()).collect();
                let chosen = ask_question(
                    &mut *self.prompter,
                    inputs,
                    SECRET_QUESTION,
                    &names,
                    None,
                )?;

                secrets
                    .into_iter()
                    .find(|s| s.name == chosen)
                    .map(|s| s.arn)
                    .ok_or_else(|| {
                        WalkthroughError::Prompt(format!("unknown secret selected: {}", chosen))
                    })
            }
            SecretMatch::Empty => Err(WalkthroughError::CredentialsNotFound(
                NO_SECRETS_MESSAGE.to_string(),
            )),
        }
    }

    async fn select_database(
        &mut self,
        client: &dyn AuroraProvider,
        inputs: &[QuestionSpec],
        cluster_arn: &str,
        secret_arn: &str,
    ) -> Result<String> {
        let spinner = self.progress.start("Fetching Aurora Serverless cluster...");

        // Introspection failures are reported here and end up as "no databases".
        let databases = match list_user_databases(client, cluster_arn, secret_arn).await {
            Ok(databases) => {
                spinner.succeed("Fetched Aurora Serverless cluster.");
                databases
            }
            Err(err) => {
                spinner.fail(err.to_string());
                debug!(error = %err, "database introspection failed");
                if err.is_access_denied() {
                    self.host.print(
                        MessageLevel::Error,
                        &format!(
                            "Ensure that '{}' contains your database credentials. Please note \
                             that Aurora Serverless does not support IAM database authentication.",
                            secret_arn
                        ),
                    );
                }
                Vec::new()
            }
        };

        if databases.is_empty() {
            return Err(WalkthroughError::ResourceDoesNotExist(
                NO_DATABASES_MESSAGE.to_string(),
            ));
        }

        ask_question(
            &mut *self.prompter,
            inputs,
            DATABASE_QUESTION,
            &databases,
            None,
        )
    }
}

/// Lists the user databases of a cluster through the data API.
pub async fn list_user_databases(
    client: &dyn AuroraProvider,
    cluster_arn: &str,
    secret_arn: &str,
) -> Result<Vec<String>> {
    let cluster = client.describe_cluster(cluster_arn).await?;
    let engine = DatabaseEngine::classify(&cluster.engine);
    debug!(engine = %engine, cluster = %cluster.identifier, "listing databases");

    let request = StatementRequest {
        resource_arn: cluster_arn.to_string(),
        secret_arn: secret_arn.to_string(),
        sql: engine.list_databases_sql().to_string(),
        database: None,
    };
    let result = client.execute_statement(&request).await?;

    Ok(engine.user_databases(&result))
}
