//! End-to-end walkthrough tests against the in-memory host and provider.

#![cfg(feature = "mock")]

use aurora_walkthrough::defaults::{DefaultValues, DefaultsSource, RdsDefaults, TemplateRef};
use aurora_walkthrough::host::{MessageLevel, MockHost};
use aurora_walkthrough::progress::Progress;
use aurora_walkthrough::project::ProjectMetadata;
use aurora_walkthrough::prompt::ScriptedPrompter;
use aurora_walkthrough::providers::mock::{MockCall, MockProvider};
use aurora_walkthrough::questions::DataSourceMetadata;
use aurora_walkthrough::records::{ClusterRecord, SecretRecord, StatementResult};
use aurora_walkthrough::walkthrough::{
    API_MISSING_MESSAGE, NO_CLUSTERS_MESSAGE, NO_DATABASES_MESSAGE, NO_SECRETS_MESSAGE,
};
use aurora_walkthrough::{runner, Walkthrough, WalkthroughError, WalkthroughResult};

const PROJECT: &str = r#"{
    "providers": { "awscloudformation": { "Region": "us-east-1" } },
    "api": {
        "blogapi": { "service": "AppSync", "providerPlugin": "awscloudformation" }
    }
}"#;

fn project() -> ProjectMetadata {
    ProjectMetadata::from_json(PROJECT).unwrap()
}

fn cluster(identifier: &str, engine: &str, engine_mode: &str) -> ClusterRecord {
    ClusterRecord {
        identifier: identifier.to_string(),
        arn: format!("arn:aws:rds:us-east-1:123456789012:cluster:{}", identifier),
        resource_id: format!("cluster-{}", identifier.to_uppercase()),
        engine: engine.to_string(),
        engine_mode: engine_mode.to_string(),
    }
}

fn secret(name: &str) -> SecretRecord {
    SecretRecord::new(
        name,
        format!("arn:aws:secretsmanager:us-east-1:123456789012:secret:{}", name),
    )
}

async fn run(
    host: &MockHost,
    prompter: &mut ScriptedPrompter,
) -> Result<WalkthroughResult, WalkthroughError> {
    let metadata = DataSourceMetadata::bundled().unwrap();
    let mut walkthrough = Walkthrough::new(host, prompter).with_progress(Progress::Hidden);
    walkthrough.run(&RdsDefaults, &metadata).await
}

#[tokio::test]
async fn test_missing_api_stops_before_provider_calls() {
    let provider = MockProvider::new();
    provider
        .add_cluster(cluster("orders", "aurora-postgresql", "serverless"))
        .await;

    for meta in [
        r#"{}"#,
        r#"{ "api": {} }"#,
        r#"{ "api": { "rest": { "service": "API Gateway" } } }"#,
    ] {
        let host = MockHost::new(ProjectMetadata::from_json(meta).unwrap(), provider.clone());
        let mut prompter = ScriptedPrompter::new();

        let err = run(&host, &mut prompter).await.unwrap_err();
        assert!(matches!(err, WalkthroughError::ResourceDoesNotExist(_)));
        assert_eq!(err.to_string(), API_MISSING_MESSAGE);
        assert!(host.client_requests().is_empty());
        assert!(prompter.asked().is_empty());
    }

    assert!(provider.calls().await.is_empty());
}

#[tokio::test]
async fn test_no_serverless_clusters() {
    let provider = MockProvider::new();
    provider
        .add_cluster(cluster("legacy", "aurora-mysql", "provisioned"))
        .await;
    provider.add_secret(secret("app/db")).await;

    let host = MockHost::new(project(), provider.clone());
    let mut prompter = ScriptedPrompter::new().with_answer("region", "us-east-1");

    let err = run(&host, &mut prompter).await.unwrap_err();
    assert_eq!(err.to_string(), NO_CLUSTERS_MESSAGE);
    assert!(err.is_expected_stop());

    // Only the region was asked; secrets were never listed.
    assert_eq!(prompter.asked_keys(), vec!["region"]);
    assert_eq!(provider.calls().await, vec![MockCall::ListClusters]);
}

#[tokio::test]
async fn test_empty_cluster_list() {
    let provider = MockProvider::new();
    let host = MockHost::new(project(), provider.clone());
    let mut prompter = ScriptedPrompter::new().with_answer("region", "us-east-1");

    let err = run(&host, &mut prompter).await.unwrap_err();
    assert_eq!(
        err.to_string(),
        "No properly configured Aurora Serverless clusters found."
    );
    assert!(!prompter.asked_keys().contains(&"dbClusterArn"));
}

#[tokio::test]
async fn test_single_cluster_with_matching_secret_prompts_database_only() {
    let provider = MockProvider::new();
    provider
        .add_cluster(cluster("orders", "aurora-postgresql", "serverless"))
        .await;
    provider.add_secret(secret("app/other")).await;
    provider
        .add_secret(secret("rds-db-credentials/cluster-ORDERS"))
        .await;
    provider
        .set_statement_result(StatementResult::from_strings(["template0", "orders"]))
        .await;

    let host = MockHost::new(project(), provider.clone());
    let mut prompter = ScriptedPrompter::new()
        .with_answer("region", "us-east-1")
        .with_answer("databaseName", "orders");

    let result = run(&host, &mut prompter).await.unwrap();

    assert_eq!(
        result,
        WalkthroughResult {
            region: "us-east-1".to_string(),
            cluster_arn: "arn:aws:rds:us-east-1:123456789012:cluster:orders".to_string(),
            secret_arn:
                "arn:aws:secretsmanager:us-east-1:123456789012:secret:rds-db-credentials/cluster-ORDERS"
                    .to_string(),
            database_name: "orders".to_string(),
            resource_name: "blogapi".to_string(),
        }
    );

    assert_eq!(prompter.asked_keys(), vec!["region", "databaseName"]);
    assert_eq!(prompter.asked()[1].choices, vec!["orders".to_string()]);

    let announced = host.messages_at(MessageLevel::Success);
    assert!(announced
        .iter()
        .any(|m| m == "Only one Cluster found: orders was automatically selected."));

    assert!(provider.calls().await.contains(&MockCall::ExecuteStatement {
        sql: "SELECT datname FROM pg_database".to_string()
    }));
}

#[tokio::test]
async fn test_secret_detected_across_pages() {
    let provider = MockProvider::new();
    provider
        .add_cluster(cluster("orders", "aurora-postgresql", "serverless"))
        .await;
    for i in 0..20 {
        provider.add_secret(secret(&format!("app/{}", i))).await;
    }
    // Lands on the second page.
    provider
        .add_secret(secret("rds-db-credentials/cluster-ORDERS/admin"))
        .await;
    for i in 20..24 {
        provider.add_secret(secret(&format!("app/{}", i))).await;
    }
    provider
        .set_statement_result(StatementResult::from_strings(["rdsadmin", "postgres", "app_db"]))
        .await;

    let host = MockHost::new(project(), provider.clone());
    let mut prompter = ScriptedPrompter::new()
        .with_answer("region", "us-east-1")
        .with_answer("databaseName", "app_db");

    let result = run(&host, &mut prompter).await.unwrap();
    assert!(result
        .secret_arn
        .ends_with("rds-db-credentials/cluster-ORDERS/admin"));
    assert_eq!(prompter.asked()[1].choices, vec!["app_db".to_string()]);

    let listings = provider
        .calls()
        .await
        .into_iter()
        .filter(|c| matches!(c, MockCall::ListSecretsPage { .. }))
        .count();
    assert_eq!(listings, 2);
}

#[tokio::test]
async fn test_prompts_over_merged_secret_pages() {
    let provider = MockProvider::new();
    provider
        .add_cluster(cluster("orders", "aurora-mysql", "serverless"))
        .await;
    for i in 0..25 {
        provider.add_secret(secret(&format!("team/{:02}", i))).await;
    }
    provider
        .set_statement_result(StatementResult::from_strings(["mysql", "shop"]))
        .await;

    let host = MockHost::new(project(), provider);
    let mut prompter = ScriptedPrompter::new()
        .with_answer("region", "us-east-1")
        .with_answer("secretStoreArn", "team/24")
        .with_answer("databaseName", "shop");

    let result = run(&host, &mut prompter).await.unwrap();

    let secret_question = &prompter.asked()[1];
    assert_eq!(secret_question.key, "secretStoreArn");
    assert_eq!(secret_question.choices.len(), 25);
    assert_eq!(secret_question.choices[0], "team/00");
    assert!(result.secret_arn.ends_with("team/24"));
}

#[tokio::test]
async fn test_single_unrelated_secret_is_auto_selected() {
    let provider = MockProvider::new();
    provider
        .add_cluster(cluster("orders", "aurora-postgresql", "serverless"))
        .await;
    provider.add_secret(secret("shared/db")).await;
    provider
        .set_statement_result(StatementResult::from_strings(["orders"]))
        .await;

    let host = MockHost::new(project(), provider);
    let mut prompter = ScriptedPrompter::new()
        .with_answer("region", "us-east-1")
        .with_answer("databaseName", "orders");

    let result = run(&host, &mut prompter).await.unwrap();
    assert!(result.secret_arn.ends_with("shared/db"));
    assert!(!prompter.asked_keys().contains(&"secretStoreArn"));
}

#[tokio::test]
async fn test_no_secrets() {
    let provider = MockProvider::new();
    provider
        .add_cluster(cluster("orders", "aurora-postgresql", "serverless"))
        .await;

    let host = MockHost::new(project(), provider);
    let mut prompter = ScriptedPrompter::new().with_answer("region", "us-east-1");

    let err = run(&host, &mut prompter).await.unwrap_err();
    assert!(matches!(err, WalkthroughError::CredentialsNotFound(_)));
    assert_eq!(err.to_string(), NO_SECRETS_MESSAGE);
}

#[tokio::test]
async fn test_multiple_clusters_prompt_and_dedup() {
    let provider = MockProvider::new();
    provider
        .add_cluster(cluster("alpha", "aurora-postgresql", "serverless"))
        .await;
    provider
        .add_cluster(cluster("beta", "aurora-mysql", "serverless"))
        .await;
    provider
        .add_cluster(cluster("alpha", "aurora-postgresql", "serverless"))
        .await;
    provider
        .add_cluster(cluster("gamma", "aurora-mysql", "provisioned"))
        .await;
    provider
        .add_secret(secret("rds-db-credentials/cluster-BETA"))
        .await;
    provider
        .set_statement_result(StatementResult::from_strings(["performance_schema", "inventory"]))
        .await;

    let host = MockHost::new(project(), provider.clone());
    let mut prompter = ScriptedPrompter::new()
        .with_answer("region", "us-east-1")
        .with_answer("dbClusterArn", "beta")
        .with_answer("databaseName", "inventory");

    let result = run(&host, &mut prompter).await.unwrap();

    assert_eq!(
        prompter.asked()[1].choices,
        vec!["alpha".to_string(), "beta".to_string()]
    );
    assert_eq!(
        result.cluster_arn,
        "arn:aws:rds:us-east-1:123456789012:cluster:beta"
    );
    assert_eq!(result.database_name, "inventory");
    assert!(provider.calls().await.contains(&MockCall::ExecuteStatement {
        sql: "SHOW databases".to_string()
    }));
}

#[tokio::test]
async fn test_access_denied_prints_diagnostic_and_no_databases() {
    let provider = MockProvider::new();
    provider
        .add_cluster(cluster("orders", "aurora-mysql", "serverless"))
        .await;
    provider
        .add_secret(secret("rds-db-credentials/cluster-ORDERS"))
        .await;
    provider
        .fail_execute_statement(WalkthroughError::BadRequest(
            "Access denied for user 'admin'@'10.0.0.1' (using password: YES)".to_string(),
        ))
        .await;

    let host = MockHost::new(project(), provider);
    let mut prompter = ScriptedPrompter::new().with_answer("region", "us-east-1");
    let metadata = DataSourceMetadata::bundled().unwrap();

    let mut walkthrough = Walkthrough::new(&host, &mut prompter).with_progress(Progress::Hidden);
    let termination = runner::run(&mut walkthrough, &RdsDefaults, &metadata)
        .await
        .unwrap_err();

    assert_eq!(termination.error().to_string(), NO_DATABASES_MESSAGE);
    assert_eq!(termination.code(), 0);

    let errors = host.messages_at(MessageLevel::Error);
    assert_eq!(errors.len(), 2);
    assert_eq!(
        errors[0],
        "Ensure that 'arn:aws:secretsmanager:us-east-1:123456789012:secret:rds-db-credentials/cluster-ORDERS' \
         contains your database credentials. Please note that Aurora Serverless does not support \
         IAM database authentication."
    );
    assert_eq!(errors[1], NO_DATABASES_MESSAGE);
    assert_eq!(host.emitted(), vec!["ResourceDoesNotExistError"]);
}

#[tokio::test]
async fn test_other_introspection_failure_has_no_diagnostic() {
    let provider = MockProvider::new();
    provider
        .add_cluster(cluster("orders", "aurora-postgresql", "serverless"))
        .await;
    provider
        .add_secret(secret("rds-db-credentials/cluster-ORDERS"))
        .await;
    provider
        .fail_describe_cluster(WalkthroughError::NotFound("orders".to_string()))
        .await;

    let host = MockHost::new(project(), provider.clone());
    let mut prompter = ScriptedPrompter::new().with_answer("region", "us-east-1");

    let err = run(&host, &mut prompter).await.unwrap_err();
    assert_eq!(err.to_string(), NO_DATABASES_MESSAGE);
    assert!(host.messages_at(MessageLevel::Error).is_empty());
    assert!(!provider
        .calls()
        .await
        .iter()
        .any(|c| matches!(c, MockCall::ExecuteStatement { .. })));
}

#[tokio::test]
async fn test_only_reserved_databases() {
    let provider = MockProvider::new();
    provider
        .add_cluster(cluster("orders", "aurora-postgresql", "serverless"))
        .await;
    provider
        .add_secret(secret("rds-db-credentials/cluster-ORDERS"))
        .await;
    provider
        .set_statement_result(StatementResult::from_strings(["rdsadmin", "template1"]))
        .await;

    let host = MockHost::new(project(), provider);
    let mut prompter = ScriptedPrompter::new().with_answer("region", "us-east-1");

    let err = run(&host, &mut prompter).await.unwrap_err();
    assert_eq!(err.to_string(), NO_DATABASES_MESSAGE);
    assert!(!prompter.asked_keys().contains(&"databaseName"));
}

#[tokio::test]
async fn test_provider_failure_is_a_fault() {
    let provider = MockProvider::new();
    provider
        .fail_list_clusters(WalkthroughError::BadRequest("throttled".to_string()))
        .await;

    let host = MockHost::new(project(), provider);
    let mut prompter = ScriptedPrompter::new().with_answer("region", "us-east-1");
    let metadata = DataSourceMetadata::bundled().unwrap();

    let mut walkthrough = Walkthrough::new(&host, &mut prompter).with_progress(Progress::Hidden);
    let termination = runner::run(&mut walkthrough, &RdsDefaults, &metadata)
        .await
        .unwrap_err();

    assert_eq!(termination.code(), 1);
    assert_eq!(host.emitted(), vec!["ProviderError"]);
    assert_eq!(
        termination.error().to_string(),
        "rds: describe_db_clusters: bad request: throttled"
    );
}

struct FixedDefaults;

impl DefaultsSource for FixedDefaults {
    fn defaults(&self, _project: &ProjectMetadata) -> DefaultValues {
        DefaultValues {
            resource_name: "fixed".to_string(),
            policy_name: "rds-policy-fixed".to_string(),
            region: "eu-west-1".to_string(),
            auth_role_name: TemplateRef::new("AuthRoleName"),
            unauth_role_name: TemplateRef::new("UnauthRoleName"),
        }
    }
}

#[tokio::test]
async fn test_defaults_source_preselects_region() {
    let host = MockHost::new(project(), MockProvider::new());
    let mut prompter = ScriptedPrompter::new().with_answer("region", "eu-west-1");
    let metadata = DataSourceMetadata::bundled().unwrap();

    let err = Walkthrough::new(&host, &mut prompter)
        .with_progress(Progress::Hidden)
        .run(&FixedDefaults, &metadata)
        .await
        .unwrap_err();

    assert_eq!(err.to_string(), NO_CLUSTERS_MESSAGE);
    assert_eq!(prompter.asked()[0].default.as_deref(), Some("eu-west-1"));
    assert_eq!(host.client_requests()[0].region, "eu-west-1");
}

#[tokio::test]
async fn test_short_metadata_is_rejected() {
    let host = MockHost::new(project(), MockProvider::new());
    let mut prompter = ScriptedPrompter::new();
    // Parsed without validation, as a caller building it by hand would.
    let metadata: DataSourceMetadata = serde_json::from_str(
        r#"{
            "inputs": [ { "type": "list", "key": "region", "question": "Region?" } ],
            "availableRegions": ["us-east-1"]
        }"#,
    )
    .unwrap();

    let err = Walkthrough::new(&host, &mut prompter)
        .with_progress(Progress::Hidden)
        .run(&RdsDefaults, &metadata)
        .await
        .unwrap_err();

    assert!(matches!(err, WalkthroughError::InvalidMetadata(_)));
    assert!(host.client_requests().is_empty());
}

#[tokio::test]
async fn test_unrelated_metadata_shapes_do_not_block_the_walkthrough() {
    let meta = ProjectMetadata::from_json(
        r#"{
            "providers": { "awscloudformation": { "Region": "us-east-1" } },
            "hosting": [],
            "storage": "none",
            "api": { "blogapi": { "service": "AppSync" } }
        }"#,
    )
    .unwrap();

    let provider = MockProvider::new();
    let host = MockHost::new(meta, provider.clone());
    let mut prompter = ScriptedPrompter::new().with_answer("region", "us-east-1");

    let err = run(&host, &mut prompter).await.unwrap_err();
    assert_eq!(err.to_string(), NO_CLUSTERS_MESSAGE);
    assert_eq!(provider.calls().await, vec![MockCall::ListClusters]);
}
