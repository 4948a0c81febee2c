//! Secret discovery: merged paginated listing and credential auto-detection.

use crate::records::SecretRecord;
use crate::{AuroraProvider, Result};
use futures::stream::{self, Stream, TryStreamExt};

/// Name prefix of the secrets Aurora Serverless creates for a cluster;
/// the cluster's resource id follows it.
pub const CREDENTIALS_SECRET_PREFIX: &str = "rds-db-credentials/";

enum Cursor {
    Start,
    Next(String),
    Done,
}

type PageItems = stream::Iter<std::vec::IntoIter<Result<SecretRecord>>>;

async fn next_page(
    provider: &dyn AuroraProvider,
    cursor: Cursor,
) -> Result<Option<(PageItems, Cursor)>> {
    let token = match cursor {
        Cursor::Start => None,
        Cursor::Next(token) => Some(token),
        Cursor::Done => return Ok(None),
    };

    let page = provider.list_secrets_page(token).await?;
    let next = match page.next_token {
        Some(token) => Cursor::Next(token),
        None => Cursor::Done,
    };

    let items: Vec<Result<SecretRecord>> = page.secrets.into_iter().map(Ok).collect();
    Ok(Some((stream::iter(items), next)))
}

/// Streams every secret, following continuation tokens page by page.
///
/// Pages are fetched sequentially and lazily; the stream ends after the
/// page without a token. Each call starts a fresh listing.
pub fn list_all_secrets(
    provider: &dyn AuroraProvider,
) -> impl Stream<Item = Result<SecretRecord>> + Send + '_ {
    stream::try_unfold(Cursor::Start, move |cursor| next_page(provider, cursor)).try_flatten()
}

/// Fetches all pages and merges them, in provider order.
pub async fn collect_all_secrets(provider: &dyn AuroraProvider) -> Result<Vec<SecretRecord>> {
    list_all_secrets(provider).try_collect().await
}

/// Outcome of looking for a cluster's credential secret.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SecretMatch {
    /// A secret follows the naming convention for the cluster.
    Detected(SecretRecord),
    /// Exactly one secret exists; it is used as is.
    Only(SecretRecord),
    /// Several secrets exist and the user has to pick one.
    Choose(Vec<SecretRecord>),
    /// There are no secrets at all.
    Empty,
}

/// Picks the credential secret for a cluster, or says what to ask.
///
/// The first secret whose name starts with
/// [`CREDENTIALS_SECRET_PREFIX`] + `cluster_resource_id` wins.
pub fn match_cluster_secret(secrets: Vec<SecretRecord>, cluster_resource_id: &str) -> SecretMatch {
    let expected = format!("{}{}", CREDENTIALS_SECRET_PREFIX, cluster_resource_id);

    if let Some(found) = secrets.iter().find(|s| s.name.starts_with(&expected)) {
        return SecretMatch::Detected(found.clone());
    }

    let mut secrets = secrets;
    match secrets.len() {
        0 => SecretMatch::Empty,
        1 => SecretMatch::Only(secrets.remove(0)),
        _ => SecretMatch::Choose(secrets),
    }
}
