use std::sync::Once;
use std::time::Duration;

use wiremock::MockServer;
use xata_rs::{ClientConfig, XataClient};

static TRACING: Once = Once::new();

/// Install a test subscriber once. Set `RUST_LOG=xata_client=debug` to see dispatch events.
pub fn init_tracing() {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

/// A client whose control and data planes both point at `server`, with
/// `ws-1` / `docs:main` as defaults and retries off.
pub fn client(server: &MockServer) -> XataClient {
    init_tracing();
    XataClient::builder()
        .api_key("xau_integration")
        .without_env_defaults()
        .workspace_id("ws-1")
        .region("eu-west-1")
        .database("docs")
        .branch("main")
        .control_plane_url(server.uri())
        .data_plane_url(server.uri())
        .config(ClientConfig::builder().without_retry().build())
        .timeout(Duration::from_secs(5))
        .build()
        .expect("client should build")
}
