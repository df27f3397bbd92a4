#![allow(dead_code)]

use opelle_migrate::executor::SqlExecutor;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const TEST_SERVICE_KEY: &str = "test-service-role-key";

/// Start a mock server and an executor pointed at it.
pub async fn setup_executor() -> (MockServer, SqlExecutor) {
    let server = MockServer::start().await;
    let executor = SqlExecutor::new(server.uri(), TEST_SERVICE_KEY);
    (server, executor)
}

/// Answer every exec_sql call with the given status and body.
pub async fn mount_exec_sql(server: &MockServer, status: u16, body: &str) {
    Mock::given(method("POST"))
        .and(path("/rest/v1/rpc/exec_sql"))
        .respond_with(ResponseTemplate::new(status).set_body_string(body))
        .mount(server)
        .await;
}
