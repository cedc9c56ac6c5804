mod support;

use serde_json::{json, Value};
use votepaxos_client::realtime::resolve_identity;
use votepaxos_client::{
    ActionError, ClientConfig, IdentitySource, NetworkApi, NetworkClient, RestError, RosterStore,
};
use votepaxos_core::{Voter, VoterData};

use support::{MockBackend, PREFLIGHT_ID};

fn client(backend: &MockBackend) -> (ClientConfig, NetworkClient) {
    let config = ClientConfig::new(&backend.base_url()).expect("config");
    let client = NetworkClient::from_config(&config);
    (config, client)
}

#[test_timeout::tokio_timeout_test]
async fn preflight_returns_backend_identity() {
    let backend = MockBackend::start().await;
    let (config, client) = client(&backend);

    let identity = resolve_identity(&config, &client).await.expect("preflight");
    assert_eq!(identity.as_str(), PREFLIGHT_ID);
    assert_eq!(backend.state.calls().await, ["preflight"]);
}

#[test_timeout::tokio_timeout_test]
async fn fixed_identity_skips_preflight() {
    let backend = MockBackend::start().await;
    let (config, client) = client(&backend);
    let config = config.with_identity(IdentitySource::Fixed("operator-7".into()));

    let identity = resolve_identity(&config, &client).await.expect("identity");
    assert_eq!(identity.as_str(), "operator-7");

    let config = config.with_identity(IdentitySource::Generated);
    let generated = resolve_identity(&config, &client).await.expect("identity");
    assert_eq!(generated.as_str().len(), 36);
    assert!(backend.state.calls().await.is_empty());
}

#[test_timeout::tokio_timeout_test]
async fn spawn_then_refresh_lists_simulated_voters() {
    let backend = MockBackend::start().await;
    let (_, client) = client(&backend);

    let ack = client.spawn_voters(3).await.expect("spawn");
    assert_eq!(ack, json!({"spawned": 3}));

    let roster = client.refresh().await.expect("refresh");
    assert_eq!(roster.voters.len(), 3);
    assert_eq!(roster.simulated_count(), 3);
    let first = roster.voters[0].simulation.as_ref().expect("simulation");
    assert_eq!(first.coordinates.economic, 1.0);
    assert_eq!(first.coordinates.social, -1.0);
    assert_eq!(first.tolerance, 2.5);
}

#[test_timeout::tokio_timeout_test]
async fn kill_unknown_voter_keeps_error_body() {
    let backend = MockBackend::start().await;
    let (_, client) = client(&backend);

    let err = client.kill_voter("ghost").await.unwrap_err();
    match &err {
        RestError::UnexpectedStatus { status, .. } => assert_eq!(status.as_u16(), 404),
        other => panic!("unexpected error: {other:?}"),
    }
    let action = ActionError::from(err);
    assert_eq!(action.user_message("fallback"), "no such voter");
}

#[test_timeout::tokio_timeout_test]
async fn kill_one_and_kill_all() {
    let backend = MockBackend::start().await;
    let (_, client) = client(&backend);

    client.spawn_voters(2).await.expect("spawn");
    assert_eq!(client.kill_voter("sim-1").await.expect("kill"), json!("terminated"));
    assert_eq!(client.refresh().await.expect("refresh").voters.len(), 1);

    assert_eq!(client.kill_all_voters().await.expect("kill all"), Value::Null);
    assert!(client.refresh().await.expect("refresh").voters.is_empty());
    assert_eq!(
        backend.state.calls().await,
        ["spawn/2", "terminate/sim-1", "refresh", "terminate", "refresh"]
    );
}

#[test_timeout::tokio_timeout_test]
async fn unreachable_backend_is_a_transport_error() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("listener bind");
    let addr = listener.local_addr().expect("local addr");
    drop(listener);

    let config = ClientConfig::new(&format!("http://{addr}")).expect("config");
    let client = NetworkClient::from_config(&config);
    let err = client.refresh().await.unwrap_err();
    assert!(matches!(err, RestError::Http(_)), "got {err:?}");
    assert_eq!(ActionError::from(err).user_message("fallback"), "fallback");
}

/// Answers every request with a 200 whose body stops short of its
/// advertised length.
async fn truncated_body_server() -> String {
    use tokio::io::{AsyncReadExt, AsyncWriteExt};

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("listener bind");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        while let Ok((mut stream, _)) = listener.accept().await {
            tokio::spawn(async move {
                let mut request = Vec::new();
                let mut buf = [0u8; 1024];
                while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                    match stream.read(&mut buf).await {
                        Ok(0) | Err(_) => return,
                        Ok(n) => request.extend_from_slice(&buf[..n]),
                    }
                }
                let response = "HTTP/1.1 200 OK\r\ncontent-type: application/json\r\ncontent-length: 500\r\n\r\n{\"voters\":[";
                let _ = stream.write_all(response.as_bytes()).await;
                let _ = stream.shutdown().await;
            });
        }
    });
    format!("http://{addr}")
}

#[test_timeout::tokio_timeout_test]
async fn truncated_success_body_is_a_transport_error() {
    let base = truncated_body_server().await;
    let config = ClientConfig::new(&base).expect("config");
    let client = NetworkClient::from_config(&config);

    let roster = RosterStore::new();
    roster.replace(VoterData {
        voters: vec![Voter::live("me")],
    });

    let err = roster.fetch(&client).await.unwrap_err();
    assert!(matches!(err, RestError::Http(_)), "got {err:?}");
    assert_eq!(roster.voter_count(), 1);
    assert_eq!(roster.generation(), 1);

    let err = client.spawn_voters(2).await.unwrap_err();
    assert!(matches!(err, RestError::Http(_)), "got {err:?}");
}
