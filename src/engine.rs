//! Database engine classification and introspection.

use crate::records::StatementResult;
use tracing::debug;

/// Engine family of an Aurora cluster, as far as database listing goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatabaseEngine {
    Postgres,
    /// MySQL-compatible engines (`aurora`, `aurora-mysql`) and anything else
    MySql,
}

impl DatabaseEngine {
    /// Classifies an engine name. Matching is case-sensitive, on the name as
    /// the provider reports it.
    pub fn classify(engine_name: &str) -> Self {
        if engine_name.contains("postgres") {
            Self::Postgres
        } else {
            Self::MySql
        }
    }

    /// Statement listing the cluster's databases.
    pub fn list_databases_sql(self) -> &'static str {
        match self {
            Self::Postgres => "SELECT datname FROM pg_database",
            Self::MySql => "SHOW databases",
        }
    }

    /// System databases never offered as a data source.
    pub fn reserved_databases(self) -> &'static [&'static str] {
        match self {
            Self::Postgres => &["rdsadmin", "postgres", "template1", "template0"],
            Self::MySql => &["information_schema", "performance_schema", "mysql"],
        }
    }

    /// Extracts database names from a listing result: the first column of
    /// each row, minus reserved names. Provider order is kept.
    pub fn user_databases(self, result: &StatementResult) -> Vec<String> {
        let reserved = self.reserved_databases();

        result
            .records
            .iter()
            .filter_map(|row| {
                let name = row.first().and_then(|f| f.as_str());
                if name.is_none() {
                    debug!(?row, "skipping row without a string value");
                }
                name
            })
            .filter(|name| !reserved.contains(name))
            .map(str::to_string)
            .collect()
    }
}

impl std::fmt::Display for DatabaseEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Postgres => write!(f, "postgres"),
            Self::MySql => write!(f, "mysql"),
        }
    }
}
