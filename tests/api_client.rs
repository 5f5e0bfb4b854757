//! HTTP-level tests for the GitHub REST client.

use hubwatch::api::{AccessToken, ApiError, GitHubClient};
use serde_json::json;
use wiremock::matchers::{body_string, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn can_bind_localhost() -> bool {
    std::net::TcpListener::bind("127.0.0.1:0").is_ok()
}

fn client(server: &MockServer) -> GitHubClient {
    GitHubClient::new(&server.uri(), AccessToken::new("gho_test"), "hubwatch-tests").unwrap()
}

fn repo_json(name: &str, updated_at: &str) -> serde_json::Value {
    json!({
        "id": 1,
        "name": name,
        "full_name": format!("octo/{name}"),
        "private": false,
        "html_url": format!("https://github.com/octo/{name}"),
        "description": null,
        "owner": {"login": "octo", "id": 9},
        "created_at": "2020-01-01T00:00:00Z",
        "updated_at": updated_at,
        "stargazers_count": 3,
        "forks_count": 1
    })
}

#[tokio::test]
async fn test_user_sends_github_headers() {
    if !can_bind_localhost() {
        eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
        return;
    }
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/user"))
        .and(header("authorization", "Bearer gho_test"))
        .and(header("accept", "application/vnd.github+json"))
        .and(header("x-github-api-version", "2022-11-28"))
        .and(header("user-agent", "hubwatch-tests"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 1,
            "login": "octocat",
            "name": "The Octocat",
            "public_repos": 8,
            "followers": 42,
            "following": 3,
            "created_at": "2011-01-25T18:44:36Z"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let profile = client(&server).user().await.unwrap();
    assert_eq!(profile.login, "octocat");
    assert_eq!(profile.followers, 42);
    assert_eq!(profile.joined_label(), "Joined: January 2011");
    assert_eq!(profile.profile_url, "https://github.com/octocat");
}

#[tokio::test]
async fn test_status_mapping() {
    if !can_bind_localhost() {
        eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
        return;
    }
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/user"))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(json!({"message": "Bad credentials"})),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/repos/octo/missing"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({"message": "Not Found"})))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/notifications"))
        .respond_with(
            ResponseTemplate::new(403).set_body_json(json!({"message": "API rate limit exceeded"})),
        )
        .mount(&server)
        .await;

    let client = client(&server);
    assert!(client.user().await.unwrap_err().is_unauthorized());
    assert!(matches!(
        client.repository("octo/missing").await,
        Err(ApiError::NotFound(_))
    ));
    match client.notifications().await {
        Err(ApiError::Status { status, message }) => {
            assert_eq!(status, 403);
            assert_eq!(message, "API rate limit exceeded");
        }
        other => panic!("unexpected {other:?}"),
    }
}

#[tokio::test]
async fn test_notifications_and_mark_read() {
    if !can_bind_localhost() {
        eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
        return;
    }
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/notifications"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {
                "id": "100",
                "unread": true,
                "reason": "mention",
                "updated_at": "2024-03-01T12:30:05Z",
                "subject": {"title": "Ping", "type": "Issue", "url": null},
                "repository": {"full_name": "octo/hello"}
            },
            {
                "id": "101",
                "unread": false,
                "reason": "subscribed",
                "updated_at": "2024-02-01T08:00:00Z",
                "subject": {"title": "Release", "type": "Release", "url": null},
                "repository": {"full_name": "octo/world"}
            }
        ])))
        .mount(&server)
        .await;
    Mock::given(method("PATCH"))
        .and(path("/notifications/threads/100"))
        .and(body_string(""))
        .respond_with(ResponseTemplate::new(205))
        .expect(1)
        .mount(&server)
        .await;

    let client = client(&server);
    let list = client.notifications().await.unwrap();
    assert_eq!(list.len(), 2);
    assert_eq!(hubwatch::Notification::unread_count(&list), 1);
    assert_eq!(list[0].updated_label(), "Updated: 2024-03-01 12:30:05");

    client.mark_notification_read("100").await.unwrap();
}

#[tokio::test]
async fn test_mark_read_rejects_odd_ids_without_request() {
    if !can_bind_localhost() {
        eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
        return;
    }
    let server = MockServer::start().await;
    Mock::given(method("PATCH"))
        .respond_with(ResponseTemplate::new(205))
        .expect(0)
        .mount(&server)
        .await;

    let client = client(&server);
    assert!(matches!(
        client.mark_notification_read("../user").await,
        Err(ApiError::InvalidId(_))
    ));
    assert!(matches!(
        client.mark_notification_read("").await,
        Err(ApiError::InvalidId(_))
    ));
}

#[tokio::test]
async fn test_mark_read_accepts_not_modified() {
    if !can_bind_localhost() {
        eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
        return;
    }
    let server = MockServer::start().await;
    Mock::given(method("PATCH"))
        .and(path("/notifications/threads/7"))
        .respond_with(ResponseTemplate::new(304))
        .expect(1)
        .mount(&server)
        .await;

    client(&server).mark_notification_read("7").await.unwrap();
}

#[tokio::test]
async fn test_repositories_sorted_by_update() {
    if !can_bind_localhost() {
        eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
        return;
    }
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/user/repos"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            repo_json("old", "2020-01-01T00:00:00Z"),
            repo_json("new", "2024-06-01T00:00:00Z"),
            repo_json("mid", "2022-01-01T00:00:00Z")
        ])))
        .mount(&server)
        .await;

    let repos = client(&server).repositories().await.unwrap();
    let names: Vec<_> = repos.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, ["new", "mid", "old"]);
    assert_eq!(repos[0].description_or_default(), "No description");
}

#[tokio::test]
async fn test_repository_and_events() {
    if !can_bind_localhost() {
        eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
        return;
    }
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/repos/octo/hello"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(repo_json("hello", "2024-01-01T00:00:00Z")),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/repos/octo/hello/events"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {
                "id": "1",
                "type": "PushEvent",
                "actor": {"id": 1, "login": "mona", "display_login": "mona"},
                "payload": {
                    "ref": "refs/heads/main",
                    "commits": [{"sha": "abc", "author": {"name": "Mona"}, "message": "Fix"}]
                },
                "public": true,
                "created_at": "2024-03-01T12:30:05Z"
            },
            {
                "id": "2",
                "type": "WatchEvent",
                "actor": {"id": 2, "login": "hubot"},
                "payload": {"action": "started"},
                "public": true,
                "created_at": "2024-03-01T11:00:00Z"
            }
        ])))
        .mount(&server)
        .await;

    let client = client(&server);
    let repo = client.repository("octo/hello").await.unwrap();
    assert_eq!(repo.full_name, "octo/hello");
    assert_eq!(repo.stars, 3);

    let events = client.repo_events("octo/hello").await.unwrap();
    assert_eq!(events.len(), 2);
    assert_eq!(events[0].display_kind(), "Push");
    assert_eq!(events[0].branch.as_deref(), Some("main"));
    assert!(events[0].is_expandable());
    assert!(!events[1].is_expandable());
}

#[tokio::test]
async fn test_invalid_repository_name() {
    if !can_bind_localhost() {
        eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
        return;
    }
    let server = MockServer::start().await;
    assert!(matches!(
        client(&server).repository("not-a-full-name").await,
        Err(ApiError::InvalidName(_))
    ));
}

#[tokio::test]
async fn test_unreachable_host_is_offline() {
    if !can_bind_localhost() {
        eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
        return;
    }
    // Grab a free port, then close it so nothing is listening
    let port = std::net::TcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap()
        .port();

    let client = GitHubClient::new(
        &format!("http://127.0.0.1:{port}"),
        AccessToken::new("gho_test"),
        "hubwatch-tests",
    )
    .unwrap();
    let err = client.user().await.unwrap_err();
    assert!(err.is_offline(), "expected offline, got {err:?}");
}
