//! Source endpoint configuration
//!
//! Describes the catalog a collaborator fetches inventories from and renders
//! the qualified names actuation collaborators address entities by.

use serde::{Deserialize, Serialize};

use mica_core::{ColumnKey, TableKey};

use crate::error::{CatalogError, CatalogResult};

/// Source catalog driver type.
///
/// Only SQL Server sources are supported; the type exists so configuration
/// stays explicit about what it points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SourceDriver {
    /// Microsoft SQL Server.
    #[default]
    SqlServer,
}

impl SourceDriver {
    /// Get the default port for this driver.
    #[must_use]
    pub fn default_port(&self) -> u16 {
        match self {
            SourceDriver::SqlServer => 1433,
        }
    }

    /// Get the driver identifier string used in qualified names.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceDriver::SqlServer => "sqlserver",
        }
    }
}

/// Configuration for one source catalog endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Endpoint {
    /// Source driver type.
    pub driver: SourceDriver,

    /// Server hostname or IP address.
    pub host: String,

    /// Server port.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,

    /// Database name.
    pub database: String,

    /// Cluster tag appended to qualified names.
    #[serde(default = "default_cluster_tag")]
    pub cluster_tag: String,
}

fn default_cluster_tag() -> String {
    "cluster1".to_string()
}

impl Endpoint {
    /// Create a new endpoint with required fields.
    pub fn new(driver: SourceDriver, host: impl Into<String>, database: impl Into<String>) -> Self {
        Self {
            driver,
            host: host.into(),
            port: None,
            database: database.into(),
            cluster_tag: default_cluster_tag(),
        }
    }

    /// Set port.
    #[must_use]
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = Some(port);
        self
    }

    /// Set cluster tag.
    pub fn with_cluster_tag(mut self, cluster_tag: impl Into<String>) -> Self {
        self.cluster_tag = cluster_tag.into();
        self
    }

    /// Get the effective port (default if not specified).
    #[must_use]
    pub fn effective_port(&self) -> u16 {
        self.port.unwrap_or_else(|| self.driver.default_port())
    }

    /// Validate the endpoint configuration.
    pub fn validate(&self) -> CatalogResult<()> {
        if self.host.is_empty() {
            return Err(CatalogError::invalid_configuration("host is required"));
        }

        if self.database.is_empty() {
            return Err(CatalogError::invalid_configuration("database is required"));
        }

        if self.cluster_tag.is_empty() {
            return Err(CatalogError::invalid_configuration(
                "cluster_tag is required",
            ));
        }

        Ok(())
    }

    /// Render the qualified name of a table under this endpoint.
    ///
    /// The upstream catalog addresses entities as
    /// `driver://host:port/db.db.schema.table@cluster`, with the database
    /// segment appearing twice.
    #[must_use]
    pub fn table_qualified_name(&self, key: &TableKey) -> String {
        format!(
            "{}://{}:{}/{}.{}.{}.{}@{}",
            self.driver.as_str(),
            self.host,
            self.effective_port(),
            self.database,
            self.database,
            key.schema(),
            key.table(),
            self.cluster_tag
        )
    }

    /// Render the qualified name of a column under this endpoint.
    #[must_use]
    pub fn column_qualified_name(&self, key: &ColumnKey) -> String {
        format!(
            "{}://{}:{}/{}.{}.{}.{}.{}@{}",
            self.driver.as_str(),
            self.host,
            self.effective_port(),
            self.database,
            self.database,
            key.schema(),
            key.table(),
            key.column(),
            self.cluster_tag
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_driver_defaults() {
        assert_eq!(SourceDriver::SqlServer.default_port(), 1433);
        assert_eq!(SourceDriver::SqlServer.as_str(), "sqlserver");
    }

    #[test]
    fn test_endpoint_new() {
        let endpoint = Endpoint::new(SourceDriver::SqlServer, "sql01.example.com", "finance");

        assert_eq!(endpoint.host, "sql01.example.com");
        assert_eq!(endpoint.database, "finance");
        assert_eq!(endpoint.cluster_tag, "cluster1");
        assert_eq!(endpoint.port, None);
    }

    #[test]
    fn test_endpoint_effective_port() {
        let endpoint = Endpoint::new(SourceDriver::SqlServer, "sql01.example.com", "finance");
        assert_eq!(endpoint.effective_port(), 1433);

        let endpoint = endpoint.with_port(14330);
        assert_eq!(endpoint.effective_port(), 14330);
    }

    #[test]
    fn test_endpoint_validation() {
        let endpoint = Endpoint::new(SourceDriver::SqlServer, "sql01.example.com", "finance");
        assert!(endpoint.validate().is_ok());

        let empty_host = Endpoint::new(SourceDriver::SqlServer, "", "finance");
        assert!(empty_host.validate().is_err());

        let empty_database = Endpoint::new(SourceDriver::SqlServer, "sql01.example.com", "");
        assert!(empty_database.validate().is_err());

        let empty_tag = Endpoint::new(SourceDriver::SqlServer, "sql01.example.com", "finance")
            .with_cluster_tag("");
        assert!(empty_tag.validate().is_err());
    }

    #[test]
    fn test_table_qualified_name() {
        let endpoint = Endpoint::new(SourceDriver::SqlServer, "sql01.example.com", "finance");
        let key = TableKey::new("dbo", "Accounts").unwrap();

        assert_eq!(
            endpoint.table_qualified_name(&key),
            "sqlserver://sql01.example.com:1433/finance.finance.dbo.Accounts@cluster1"
        );
    }

    #[test]
    fn test_column_qualified_name() {
        let endpoint = Endpoint::new(SourceDriver::SqlServer, "sql01.example.com", "finance")
            .with_port(14330)
            .with_cluster_tag("east-2");
        let key = ColumnKey::new("dbo", "Accounts", "account_id").unwrap();

        assert_eq!(
            endpoint.column_qualified_name(&key),
            "sqlserver://sql01.example.com:14330/finance.finance.dbo.Accounts.account_id@east-2"
        );
    }

    #[test]
    fn test_endpoint_serialization() {
        let endpoint = Endpoint::new(SourceDriver::SqlServer, "sql01.example.com", "finance")
            .with_cluster_tag("east-2");

        let json = serde_json::to_string(&endpoint).unwrap();
        let parsed: Endpoint = serde_json::from_str(&json).unwrap();

        assert_eq!(parsed.host, "sql01.example.com");
        assert_eq!(parsed.cluster_tag, "east-2");
        assert_eq!(parsed.effective_port(), 1433);
    }

    #[test]
    fn test_endpoint_deserialization_defaults_cluster_tag() {
        let json = r#"{"driver":"sqlserver","host":"sql01","database":"finance"}"#;
        let parsed: Endpoint = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.cluster_tag, "cluster1");
    }
}
