//! Integration tests for CLI commands

use std::path::Path;
use std::process::{Command, Output};

use serde_json::json;
use tempfile::TempDir;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Scratch directory with an empty config file, secrets and entities
struct Fixture {
    dir: TempDir,
}

impl Fixture {
    fn new() -> Self {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("config.yaml"), "{}\n").unwrap();
        std::fs::create_dir(dir.path().join("secrets")).unwrap();
        std::fs::create_dir(dir.path().join("entities")).unwrap();
        Self { dir }
    }

    fn path(&self, name: &str) -> String {
        self.dir.path().join(name).to_string_lossy().to_string()
    }

    fn write(&self, name: &str, content: &str) {
        std::fs::write(self.dir.path().join(name), content).unwrap();
    }
}

/// Helper to run kubeship with a clean environment
fn kubeship(fixture: &Fixture, args: &[&str]) -> Output {
    let config = fixture.path("config.yaml");
    run_in(fixture.dir.path(), &config, args)
}

fn run_in(cwd: &Path, config: &str, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_kubeship"))
        .current_dir(cwd)
        .env_remove("KUBESHIP_SERVER")
        .env_remove("KUBESHIP_TOKEN")
        .env_remove("KUBESHIP_CONFIG")
        .env_remove("RUST_LOG")
        .arg("--config")
        .arg(config)
        .args(args)
        .output()
        .expect("Failed to execute kubeship")
}

/// Run the binary off the async runtime so the mock server keeps serving
async fn kubeship_async(fixture: &Fixture, args: &[&str]) -> Output {
    let cwd = fixture.dir.path().to_path_buf();
    let config = fixture.path("config.yaml");
    let args: Vec<String> = args.iter().map(|a| a.to_string()).collect();

    tokio::task::spawn_blocking(move || {
        let args: Vec<&str> = args.iter().map(String::as_str).collect();
        run_in(&cwd, &config, &args)
    })
    .await
    .unwrap()
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).to_string()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).to_string()
}

mod general {
    use super::*;

    #[test]
    fn test_unknown_command_not_implemented() {
        let fixture = Fixture::new();
        let output = kubeship(&fixture, &["frobnicate", "--now"]);

        assert!(output.status.success());
        assert_eq!(stdout(&output).trim(), "Not implemented");
    }

    #[test]
    fn test_help_lists_commands() {
        let output = Command::new(env!("CARGO_BIN_EXE_kubeship"))
            .arg("--help")
            .output()
            .unwrap();

        assert!(output.status.success());
        let help = stdout(&output);
        for command in ["create", "update", "delete", "custom", "get", "wait", "render"] {
            assert!(help.contains(command), "missing {} in help", command);
        }
    }

    #[test]
    fn test_missing_server_is_config_error() {
        let fixture = Fixture::new();
        let output = kubeship(&fixture, &["create", "--no-wait"]);

        assert_eq!(output.status.code(), Some(2));
        assert!(stderr(&output).contains("Missing API server URI"));
    }

    #[test]
    fn test_conflicting_auth_is_config_error() {
        let fixture = Fixture::new();
        let output = kubeship(
            &fixture,
            &[
                "get",
                "Pod",
                "nginx",
                "--server",
                "http://127.0.0.1:1",
                "--token",
                "abc",
                "--username",
                "admin",
                "--password",
                "secret",
            ],
        );

        assert_eq!(output.status.code(), Some(2));
        assert!(stderr(&output).contains("specify only one of"));
    }

    #[test]
    fn test_missing_token_file_is_config_error() {
        let fixture = Fixture::new();
        let missing = fixture.path("no-such-token");
        let output = kubeship(
            &fixture,
            &["wait", "--server", "http://127.0.0.1:1", "--token-file", &missing],
        );

        assert_eq!(output.status.code(), Some(2));
        assert!(stderr(&output).contains("no-such-token"));
    }
}

mod render_command {
    use super::*;

    #[test]
    fn test_render_expands_secrets() {
        let fixture = Fixture::new();
        fixture.write("secrets/token", "hello");
        fixture.write(
            "secret.yml.j2",
            "kind: Secret\nmetadata:\n  name: api\ndata:\n  token: {{ secrets.token }}\n",
        );

        let output = kubeship(&fixture, &["render", "secret.yml.j2", "--check"]);

        assert!(output.status.success(), "{}", stderr(&output));
        assert!(stdout(&output).contains("token: aGVsbG8="));
        assert!(stderr(&output).contains("1 entity"));
    }

    #[test]
    fn test_render_missing_file() {
        let fixture = Fixture::new();
        let output = kubeship(&fixture, &["render", "missing.yml.j2"]);

        assert_eq!(output.status.code(), Some(5));
    }
}

mod api_commands {
    use super::*;

    const POD: &str = "kind: Pod\nmetadata:\n  name: nginx\n";

    #[tokio::test]
    async fn test_create_posts_entities() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"versions": ["v1"]})))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/api/v1/namespaces/default/pods"))
            .and(body_partial_json(json!({"metadata": {"name": "nginx"}})))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({"kind": "Pod"})))
            .expect(1)
            .mount(&server)
            .await;

        let fixture = Fixture::new();
        fixture.write("entities/pod.yml", POD);

        let output = kubeship_async(&fixture, &["create", "--server", &server.uri()]).await;

        assert!(output.status.success(), "{}", stderr(&output));
        let out = stdout(&output);
        assert!(out.contains("API server ready"));
        assert!(out.contains("default/Pod/nginx (created)"));
        assert!(out.contains("1 succeeded"));
    }

    #[tokio::test]
    async fn test_delete_reports_failures() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/api/v1/namespaces/default/pods/nginx"))
            .respond_with(ResponseTemplate::new(404).set_body_json(json!({
                "kind": "Status",
                "message": "pods \"nginx\" not found"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let fixture = Fixture::new();
        fixture.write("entities/pod.yml", POD);

        let output = kubeship_async(
            &fixture,
            &["delete", "--no-wait", "--server", &server.uri()],
        )
        .await;

        assert_eq!(output.status.code(), Some(1));
        assert!(stdout(&output).contains("HTTP status code 404"));
        assert!(stderr(&output).contains("1 of 1 entities failed"));
    }

    #[tokio::test]
    async fn test_get_prints_entity() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v1/namespaces/web/services/frontend"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "kind": "Service",
                "metadata": {"name": "frontend", "namespace": "web"}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let fixture = Fixture::new();
        let output = kubeship_async(
            &fixture,
            &["get", "Service", "frontend", "-n", "web", "--server", &server.uri()],
        )
        .await;

        assert!(output.status.success(), "{}", stderr(&output));
        let entity: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
        assert_eq!(entity["metadata"]["name"], "frontend");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_ctrl_c_interrupts_batch() {
        use std::process::Stdio;
        use std::time::Duration;

        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/v1/namespaces/default/pods"))
            .respond_with(ResponseTemplate::new(201).set_delay(Duration::from_secs(25)))
            .mount(&server)
            .await;

        let fixture = Fixture::new();
        fixture.write("entities/pod.yml", POD);

        let child = Command::new(env!("CARGO_BIN_EXE_kubeship"))
            .current_dir(fixture.dir.path())
            .env_remove("KUBESHIP_TOKEN")
            .env_remove("RUST_LOG")
            .args(["--config", &fixture.path("config.yaml")])
            .args(["create", "--no-wait", "--server", &server.uri()])
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .unwrap();

        // Let the batch reach the slow request
        tokio::time::sleep(Duration::from_millis(1500)).await;
        let status = Command::new("kill")
            .args(["-INT", &child.id().to_string()])
            .status()
            .unwrap();
        assert!(status.success());

        let output = tokio::time::timeout(
            Duration::from_secs(10),
            tokio::task::spawn_blocking(move || child.wait_with_output()),
        )
        .await
        .expect("kubeship kept running after Ctrl-C")
        .unwrap()
        .unwrap();

        assert_eq!(output.status.code(), Some(130));
        assert!(stderr(&output).contains("Interrupted"));
    }

    #[tokio::test]
    async fn test_wait_times_out() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let fixture = Fixture::new();
        let output = kubeship_async(
            &fixture,
            &["wait", "--ready-timeout", "1", "--server", &server.uri()],
        )
        .await;

        assert_eq!(output.status.code(), Some(6));
        assert!(stderr(&output).contains("not ready"));
    }
}
