//! HTTP-level tests for the OAuth device flow and the sign-in session.

use std::time::{Duration, Instant};

use hubwatch::api::device::GRANT_TYPE;
use hubwatch::api::{AccessToken, DeviceFlow, DeviceFlowError, PollOutcome};
use hubwatch::auth::SettingsStore;
use hubwatch::session::{Session, SignInState};
use serde_json::json;
use tempfile::TempDir;
use wiremock::matchers::{body_string_contains, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn can_bind_localhost() -> bool {
    std::net::TcpListener::bind("127.0.0.1:0").is_ok()
}

fn flow(server: &MockServer) -> DeviceFlow {
    DeviceFlow::new(&server.uri(), "client-123", "read:user,notifications,repo", "hubwatch-tests")
        .unwrap()
        .with_poll_interval(Duration::from_millis(10))
}

async fn mount_device_code(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/login/device/code"))
        .and(header("accept", "application/json"))
        .and(body_string_contains("client_id=client-123"))
        .and(body_string_contains("scope=read%3Auser%2Cnotifications%2Crepo"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "device_code": "dev-code",
            "user_code": "WDJB-MJHT",
            "verification_uri": "https://github.com/login/device",
            "expires_in": 900,
            "interval": 0
        })))
        .mount(server)
        .await;
}

fn token_error(code: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "error": code,
        "error_description": format!("{code} description")
    }))
}

#[tokio::test]
async fn test_request_device_code() {
    if !can_bind_localhost() {
        eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
        return;
    }
    let server = MockServer::start().await;
    mount_device_code(&server).await;

    let code = flow(&server).request_device_code().await.unwrap();
    assert_eq!(code.user_code, "WDJB-MJHT");
    assert_eq!(code.device_code, "dev-code");
    assert_eq!(code.expires_in, 900);
}

#[tokio::test]
async fn test_device_code_error_body() {
    if !can_bind_localhost() {
        eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
        return;
    }
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/login/device/code"))
        .respond_with(token_error("unauthorized_client"))
        .mount(&server)
        .await;

    match flow(&server).request_device_code().await {
        Err(DeviceFlowError::Rejected { code, .. }) => assert_eq!(code, "unauthorized_client"),
        other => panic!("unexpected {other:?}"),
    }
}

#[tokio::test]
async fn test_poll_outcomes() {
    if !can_bind_localhost() {
        eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
        return;
    }
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/login/oauth/access_token"))
        .and(body_string_contains("device_code=pending"))
        .and(body_string_contains(
            "grant_type=urn%3Aietf%3Aparams%3Aoauth%3Agrant-type%3Adevice_code",
        ))
        .respond_with(token_error("authorization_pending"))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/login/oauth/access_token"))
        .and(body_string_contains("device_code=slow"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "error": "slow_down",
            "interval": 10
        })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/login/oauth/access_token"))
        .and(body_string_contains("device_code=denied"))
        .respond_with(token_error("access_denied"))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/login/oauth/access_token"))
        .and(body_string_contains("device_code=broken"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let flow = flow(&server);
    assert_eq!(flow.poll_access_token("pending").await.unwrap(), PollOutcome::Pending);
    assert_eq!(
        flow.poll_access_token("slow").await.unwrap(),
        PollOutcome::SlowDown { interval: Some(10) }
    );
    assert!(matches!(
        flow.poll_access_token("denied").await,
        Err(DeviceFlowError::Denied)
    ));
    // a server error is surfaced, not treated as "still pending"
    assert!(matches!(
        flow.poll_access_token("broken").await,
        Err(DeviceFlowError::Api(_))
    ));
    assert!(GRANT_TYPE.ends_with("device_code"));
}

#[tokio::test]
async fn test_wait_for_token_polls_until_granted() {
    if !can_bind_localhost() {
        eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
        return;
    }
    let server = MockServer::start().await;
    mount_device_code(&server).await;

    // first two polls pending, then granted
    Mock::given(method("POST"))
        .and(path("/login/oauth/access_token"))
        .respond_with(token_error("authorization_pending"))
        .up_to_n_times(2)
        .expect(2)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/login/oauth/access_token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "gho_granted",
            "token_type": "bearer",
            "scope": "repo"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let flow = flow(&server);
    let code = flow.request_device_code().await.unwrap();
    let mut ticks = 0;
    let token = flow
        .wait_for_token(&code, |outcome| {
            assert_eq!(outcome, &PollOutcome::Pending);
            ticks += 1;
        })
        .await
        .unwrap();
    assert_eq!(token, AccessToken::new("gho_granted"));
    assert_eq!(ticks, 2);
}

#[tokio::test]
async fn test_wait_for_token_expired() {
    if !can_bind_localhost() {
        eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
        return;
    }
    let server = MockServer::start().await;
    mount_device_code(&server).await;
    Mock::given(method("POST"))
        .and(path("/login/oauth/access_token"))
        .respond_with(token_error("expired_token"))
        .mount(&server)
        .await;

    let flow = flow(&server);
    let code = flow.request_device_code().await.unwrap();
    assert!(matches!(
        flow.wait_for_token(&code, |_| {}).await,
        Err(DeviceFlowError::Expired)
    ));
}

#[tokio::test]
async fn test_wait_for_token_gives_up_when_code_expires() {
    if !can_bind_localhost() {
        eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
        return;
    }
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/login/device/code"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "device_code": "dev-code",
            "user_code": "WDJB-MJHT",
            "verification_uri": "https://github.com/login/device",
            "expires_in": 1,
            "interval": 0
        })))
        .mount(&server)
        .await;
    // GitHub never answers expired_token here; the local deadline ends the loop
    Mock::given(method("POST"))
        .and(path("/login/oauth/access_token"))
        .respond_with(token_error("authorization_pending"))
        .mount(&server)
        .await;

    let flow = flow(&server);
    let code = flow.request_device_code().await.unwrap();
    let started = Instant::now();
    let mut ticks = 0;
    let result = flow.wait_for_token(&code, |_| ticks += 1).await;

    assert!(matches!(result, Err(DeviceFlowError::Expired)));
    assert!(ticks > 1, "polled {ticks} times");
    assert!(started.elapsed() < Duration::from_secs(5));
}

#[tokio::test]
async fn test_wait_for_token_adopts_slow_down_interval() {
    if !can_bind_localhost() {
        eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
        return;
    }
    let server = MockServer::start().await;
    mount_device_code(&server).await;
    Mock::given(method("POST"))
        .and(path("/login/oauth/access_token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "error": "slow_down",
            "interval": 1
        })))
        .up_to_n_times(1)
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/login/oauth/access_token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "gho_slow"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let flow = flow(&server);
    let code = flow.request_device_code().await.unwrap();
    let started = Instant::now();
    let mut seen = Vec::new();
    let token = flow
        .wait_for_token(&code, |outcome| seen.push(outcome.clone()))
        .await
        .unwrap();

    assert_eq!(token.as_str(), "gho_slow");
    assert_eq!(seen, [PollOutcome::SlowDown { interval: Some(1) }]);
    // the 10ms poll interval was raised to the one second GitHub asked for
    assert!(started.elapsed() >= Duration::from_secs(1));
}

#[tokio::test]
async fn test_session_sign_in_persists_token() {
    if !can_bind_localhost() {
        eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
        return;
    }
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    let store = SettingsStore::at(dir.path().join("credentials.enc"));

    mount_device_code(&server).await;
    Mock::given(method("POST"))
        .and(path("/login/oauth/access_token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "gho_session"
        })))
        .mount(&server)
        .await;

    let mut session = Session::restore(&store).unwrap();
    assert_eq!(session.state(), &SignInState::SignedOut);

    let mut shown = None;
    let token = session
        .sign_in(&flow(&server), &store, |code| shown = Some(code.user_code.clone()))
        .await
        .unwrap();

    assert_eq!(shown.as_deref(), Some("WDJB-MJHT"));
    assert_eq!(token.as_str(), "gho_session");
    assert!(session.state().is_signed_in());
    assert_eq!(store.get_token().unwrap().as_deref(), Some("gho_session"));

    session.sign_out(&store).unwrap();
    assert!(!store.has_token());
}

#[tokio::test]
async fn test_session_sign_in_failure() {
    if !can_bind_localhost() {
        eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
        return;
    }
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    let store = SettingsStore::at(dir.path().join("credentials.enc"));

    mount_device_code(&server).await;
    Mock::given(method("POST"))
        .and(path("/login/oauth/access_token"))
        .respond_with(token_error("access_denied"))
        .mount(&server)
        .await;

    let mut session = Session::default();
    let err = session
        .sign_in(&flow(&server), &store, |_| {})
        .await
        .unwrap_err();
    assert!(err.to_string().contains("denied"));
    assert!(matches!(session.state(), SignInState::Failed { .. }));
    assert!(!store.has_token());
}
