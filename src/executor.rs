//! SQL execution over the hosted REST API
//!
//! Submits statements to the `exec_sql` RPC endpoint with the service-role
//! key. The hosted service does not expose arbitrary SQL this way unless
//! such a function has been installed, so callers should expect
//! `Error 404: ...` results against a stock project.

use reqwest::header::{HeaderMap, HeaderValue, InvalidHeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::Client;
use serde_json::json;
use tracing::{debug, info, warn};

use crate::error::MigrationError;
use crate::schema::Statement;

pub const EXEC_SQL_PATH: &str = "/rest/v1/rpc/exec_sql";

pub struct SqlExecutor {
    base_url: String,
    service_key: String,
    http_client: Client,
}

impl SqlExecutor {
    /// Create new executor for a project base URL and service-role key
    pub fn new(base_url: impl Into<String>, service_key: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            service_key: service_key.into(),
            http_client: Client::new(),
        }
    }

    /// Full URL of the exec_sql RPC
    pub fn endpoint(&self) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), EXEC_SQL_PATH)
    }

    fn headers(&self) -> Result<HeaderMap, MigrationError> {
        let invalid = |_: InvalidHeaderValue| {
            MigrationError::Config("service role key is not a valid header value".to_string())
        };

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert("apikey", HeaderValue::from_str(&self.service_key).map_err(invalid)?);
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", self.service_key)).map_err(invalid)?,
        );
        Ok(headers)
    }

    /// Submit one statement. A 2xx answer yields the raw response body.
    pub async fn try_run_sql(&self, sql: &str) -> Result<String, MigrationError> {
        let url = self.endpoint();
        debug!("Submitting {} bytes of SQL to {}", sql.len(), url);

        let response = self
            .http_client
            .post(&url)
            .headers(self.headers()?)
            .json(&json!({ "sql": sql }))
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if status.is_success() {
            Ok(body)
        } else {
            Err(MigrationError::Http {
                status: status.as_u16(),
                body,
            })
        }
    }

    /// Like [`try_run_sql`](Self::try_run_sql), but failures come back as
    /// their display string, e.g. `Error 400: {...}`.
    pub async fn run_sql(&self, sql: &str) -> String {
        self.try_run_sql(sql)
            .await
            .unwrap_or_else(|e| e.to_string())
    }

    /// Submit statements one at a time, in order. A failed statement is
    /// recorded and the next one is still attempted.
    pub async fn apply(&self, statements: &[Statement]) -> ApplyReport {
        let mut report = ApplyReport::default();

        for (idx, stmt) in statements.iter().enumerate() {
            match self.try_run_sql(&stmt.sql).await {
                Ok(_) => {
                    debug!("Statement {} ({}) applied", idx, stmt.phase);
                    report.succeeded.push(idx);
                }
                Err(e) => {
                    warn!("Statement {} ({}) failed: {}", idx, stmt.phase, e);
                    report.failed.push(StatementFailure {
                        index: idx,
                        error: e.to_string(),
                    });
                }
            }
        }

        info!(
            "Applied {} of {} statements ({} failed)",
            report.succeeded.len(),
            statements.len(),
            report.failed.len()
        );
        report
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatementFailure {
    pub index: usize,
    pub error: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApplyReport {
    pub succeeded: Vec<usize>,
    pub failed: Vec<StatementFailure>,
}

impl ApplyReport {
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }

    pub fn total(&self) -> usize {
        self.succeeded.len() + self.failed.len()
    }
}
