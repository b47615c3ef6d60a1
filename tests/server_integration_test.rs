//! Drives the assembled axum application end to end with a recording executor.

use async_trait::async_trait;
use axum::body::Body;
use axum::extract::ConnectInfo;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use tower::ServiceExt;

use artisan_api::executor::{CommandExecutor, CommandOutput, ExecutorError, Invocation};
use artisan_api::registry::{Command, CommandRegistry, DefaultCommandRegistry, Parameter};
use artisan_api::routing::{HttpMethods, Router, RouterConfig};
use artisan_api::server::{build_app, AccessPolicy, AppState};

/// Records every invocation and answers according to the command name.
#[derive(Default)]
struct RecordingExecutor {
    calls: Mutex<Vec<Vec<String>>>,
}

impl RecordingExecutor {
    fn calls(&self) -> Vec<Vec<String>> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl CommandExecutor for RecordingExecutor {
    async fn execute(&self, invocation: &Invocation) -> Result<CommandOutput, ExecutorError> {
        let argv = invocation.to_argv();
        self.calls.lock().unwrap().push(argv.clone());
        match invocation.command.as_str() {
            "migrate" => Ok(CommandOutput::failure("SQLSTATE[HY000] connection refused", Some(1))),
            "queue:work" => Err(ExecutorError::Timeout(120)),
            "inspire" => Err(ExecutorError::Other("php not found at /usr/bin/php".to_string())),
            _ => Ok(CommandOutput::success(format!("ran {}", argv.join(" ")))),
        }
    }
}

struct Harness {
    app: axum::Router,
    executor: Arc<RecordingExecutor>,
}

fn harness(methods: &[&str], include_hidden: bool) -> Harness {
    let mut registry = DefaultCommandRegistry::new();
    for command in [
        Command::new("about", "Display basic information about your application"),
        Command::new("make:model", "Create a new Eloquent model class")
            .with_parameter(Parameter::required("name"))
            .with_parameter(Parameter::option("migration")),
        Command::new("cache:clear", "Flush the application cache")
            .with_parameter(Parameter::optional("store")),
        Command::new("migrate", "Run the database migrations").with_parameter(Parameter::option("force")),
        Command::new("queue:work", "Start processing jobs on the queue"),
        Command::new("inspire", "Display an inspiring quote"),
        Command::new("tinker", "Interact with your application"),
        Command::new("schedule:finish", "Handle the completion of a scheduled command").with_hidden(true),
        Command::new("make:command", "Create a new Artisan command")
            .with_parameter(Parameter::required("name"))
            .with_parameter(Parameter::option("command")),
    ] {
        registry.register(command).unwrap();
    }

    let mut router = Router::new(RouterConfig {
        methods: HttpMethods::parse(methods).unwrap(),
        forbidden_routes: vec!["tinker".to_string()],
        ..RouterConfig::default()
    })
    .unwrap();
    let table = router.generate(&registry, include_hidden).unwrap();

    let executor = Arc::new(RecordingExecutor::default());
    let access = AccessPolicy::new(["127.0.0.1", "192.168.1.*"]).unwrap();
    let state = AppState::new(table, executor.clone(), access);

    Harness {
        app: build_app(state),
        executor,
    }
}

fn request(method: &str, uri: &str, client: &str, body: Option<Value>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if body.is_some() {
        builder = builder.header("content-type", "application/json");
    }
    let mut request = builder
        .body(body.map_or_else(Body::empty, |b| Body::from(b.to_string())))
        .unwrap();
    let addr: SocketAddr = format!("{}:50000", client).parse().unwrap();
    request.extensions_mut().insert(ConnectInfo(addr));
    request
}

async fn send(app: &axum::Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn test_untrusted_client_gets_404() {
    let h = harness(&["POST"], false);

    let (status, body) = send(&h.app, request("POST", "/artisan/about", "10.0.0.1", None)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({"ok": false, "output": "Not Found"}));

    let (status, _) = send(&h.app, request("POST", "/artisan/all", "10.0.0.1", None)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(h.executor.calls().is_empty());
}

#[tokio::test]
async fn test_missing_client_address_gets_404() {
    let h = harness(&["POST"], false);
    let request = Request::builder()
        .method("POST")
        .uri("/artisan/about")
        .body(Body::empty())
        .unwrap();

    let (status, _) = send(&h.app, request).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_successful_command() {
    let h = harness(&["POST"], false);

    let (status, body) = send(&h.app, request("POST", "/artisan/about", "127.0.0.1", None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"ok": true, "output": "ran about"}));
}

#[tokio::test]
async fn test_glob_trusted_client() {
    let h = harness(&["POST"], false);

    let (status, _) = send(&h.app, request("POST", "/artisan/about", "192.168.1.20", None)).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_parameters_from_path_body_and_query() {
    let h = harness(&["POST"], false);

    let (status, body) = send(
        &h.app,
        request(
            "POST",
            "/artisan/make/model/Post?migration=true",
            "127.0.0.1",
            Some(json!({"name": "Ignored"})),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["output"], "ran make:model --migration -- Post");

    let (status, _) = send(
        &h.app,
        request("POST", "/artisan/cache/clear", "127.0.0.1", Some(json!({"store": "redis"}))),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    assert_eq!(
        h.executor.calls(),
        vec![
            vec!["make:model", "--migration", "--", "Post"],
            vec!["cache:clear", "--", "redis"],
        ]
    );
}

#[tokio::test]
async fn test_missing_and_unknown_parameters_are_422() {
    let h = harness(&["POST"], false);

    let (status, body) = send(&h.app, request("POST", "/artisan/make/model", "127.0.0.1", None)).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["ok"], false);
    assert!(body["output"].as_str().unwrap().contains("name"));

    let (status, body) = send(
        &h.app,
        request("POST", "/artisan/about?verbose=1", "127.0.0.1", None),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["output"].as_str().unwrap().contains("verbose"));

    let (status, _) = send(
        &h.app,
        request("POST", "/artisan/about", "127.0.0.1", Some(json!(["not", "an", "object"]))),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(h.executor.calls().is_empty());
}

#[tokio::test]
async fn test_executor_outcomes() {
    let h = harness(&["POST"], false);

    let (status, body) = send(&h.app, request("POST", "/artisan/migrate", "127.0.0.1", None)).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        body,
        json!({"ok": false, "output": "SQLSTATE[HY000] connection refused"})
    );

    let (status, body) = send(&h.app, request("POST", "/artisan/queue/work", "127.0.0.1", None)).await;
    assert_eq!(status, StatusCode::GATEWAY_TIMEOUT);
    assert_eq!(body["ok"], false);

    let (status, body) = send(&h.app, request("POST", "/artisan/inspire", "127.0.0.1", None)).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(!body["output"].as_str().unwrap().contains("/usr/bin/php"));
}

#[tokio::test]
async fn test_all_lists_routes() {
    let h = harness(&["POST"], false);

    let (status, body) = send(&h.app, request("POST", "/artisan/all", "127.0.0.1", None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["ok"], true);
    assert_eq!(body["static_routes"], json!(["/all", "/command"]));
    assert_eq!(
        body["routes"],
        json!([
            "/artisan/about",
            "/artisan/make/model/{name}/{migration?}",
            "/artisan/cache/clear/{store?}",
            "/artisan/migrate/{force?}",
            "/artisan/queue/work",
            "/artisan/inspire",
            "/artisan/make/command/{name}/{command?}",
        ])
    );
    assert_eq!(
        body["commands"][1],
        json!({
            "name": "make:model",
            "description": "Create a new Eloquent model class",
            "route": "artisan.api.make.model",
            "uri": "/artisan/make/model/{name}/{migration?}",
        })
    );
    assert!(h.executor.calls().is_empty());
}

#[tokio::test]
async fn test_command_route() {
    let h = harness(&["POST"], false);

    let (status, body) = send(
        &h.app,
        request(
            "POST",
            "/artisan/command",
            "127.0.0.1",
            Some(json!({"command": "make:model", "name": "Comment"})),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["output"], "ran make:model -- Comment");

    let (status, _) = send(
        &h.app,
        request("POST", "/artisan/command", "127.0.0.1", Some(json!({"command": "tinker"}))),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(
        &h.app,
        request(
            "POST",
            "/artisan/command",
            "127.0.0.1",
            Some(json!({"command": "schedule:finish"})),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&h.app, request("POST", "/artisan/command", "127.0.0.1", None)).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    // The query string never names the command.
    let (status, _) = send(
        &h.app,
        request("POST", "/artisan/command?command=about", "127.0.0.1", None),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (status, _) = send(
        &h.app,
        request("POST", "/artisan/command", "127.0.0.1", Some(json!({"command": 7}))),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(h.executor.calls(), vec![vec!["make:model", "--", "Comment"]]);
}

#[tokio::test]
async fn test_command_route_passes_own_command_parameter() {
    let h = harness(&["POST"], false);

    let (status, body) = send(
        &h.app,
        request(
            "POST",
            "/artisan/command?command=app:sync",
            "127.0.0.1",
            Some(json!({"command": "make:command", "name": "SyncUsers"})),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["output"], "ran make:command --command=app:sync -- SyncUsers");
}

#[tokio::test]
async fn test_dash_leading_segment_stays_positional() {
    let h = harness(&["POST"], false);

    let (status, _) = send(
        &h.app,
        request("POST", "/artisan/cache/clear/--env=production", "127.0.0.1", None),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(
        &h.app,
        request(
            "POST",
            "/artisan/make/model",
            "127.0.0.1",
            Some(json!({"name": "--force", "migration": true})),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    assert_eq!(
        h.executor.calls(),
        vec![
            vec!["cache:clear", "--", "--env=production"],
            vec!["make:model", "--migration", "--", "--force"],
        ]
    );
}

#[tokio::test]
async fn test_forbidden_and_hidden_have_no_route() {
    let h = harness(&["POST"], false);

    let (status, _) = send(&h.app, request("POST", "/artisan/tinker", "127.0.0.1", None)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&h.app, request("POST", "/artisan/schedule/finish", "127.0.0.1", None)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let h = harness(&["POST"], true);
    let (status, _) = send(&h.app, request("POST", "/artisan/schedule/finish", "127.0.0.1", None)).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = send(&h.app, request("POST", "/artisan/tinker", "127.0.0.1", None)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_method_set() {
    let h = harness(&["POST"], false);
    let (status, body) = send(&h.app, request("GET", "/artisan/about", "127.0.0.1", None)).await;
    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(body["ok"], false);

    // Method tokens are case-sensitive.
    let (status, _) = send(&h.app, request("post", "/artisan/about", "127.0.0.1", None)).await;
    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
    assert!(h.executor.calls().is_empty());

    let h = harness(&["GET", "POST"], false);
    let (status, _) = send(&h.app, request("GET", "/artisan/about", "127.0.0.1", None)).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_unknown_path_is_404_envelope() {
    let h = harness(&["POST"], false);
    let (status, body) = send(&h.app, request("POST", "/artisan/nope", "127.0.0.1", None)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({"ok": false, "output": "Not Found"}));
}
