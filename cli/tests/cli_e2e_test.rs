use assert_cmd::{Command, cargo_bin_cmd};
use predicates::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

const OVERRIDE_VARS: [&str; 9] = [
    "DTP_DOMAIN",
    "KPI_DOMAIN",
    "LOG_DIR",
    "DEV_TOKEN",
    "DTP_AUTH_URL",
    "DTP_USER",
    "DTP_PASSWORD",
    "DTP_CONFIG",
    "DTP_MAPPINGS"
];

fn dtp() -> Command {
    let mut cmd = cargo_bin_cmd!("dtp");
    for var in OVERRIDE_VARS {
        cmd.env_remove(var);
    }
    cmd.env("RUST_LOG", "info");
    cmd
}

struct Workspace {
    dir: TempDir,
    config: PathBuf,
    mappings: PathBuf
}

impl Workspace {
    /// Config and mappings pointing at `domain`, with a fresh cached token
    /// unless `token` is `None`.
    fn new(domain: &str, auth_url: &str, token: Option<&str>) -> Self {
        let dir = TempDir::new().unwrap();
        let config = dir.path().join("DTP_config.yaml");
        let mappings = dir.path().join("uri_mappings.yaml");
        let token_path = dir.path().join("token.txt");

        fs::write(
            &config,
            format!(
                "DTP_DOMAIN: {domain}\nKPI_DOMAIN: {domain}\nLOG_DIR: {}\nDEV_TOKEN: {}\nAUTH_URL: {auth_url}\n",
                dir.path().join("logs").display(),
                token_path.display()
            )
        )
        .unwrap();
        fs::write(
            &mappings,
            format!(
                "API_URLS:\n  count_nodes: {domain}/api/v0/count\n  get_node: {domain}/nodes/_ID_\n\
                 ONTOLOGY_URIS:\n  hasTask: https://onto.example.org/hasTask\n  task: https://onto.example.org/Task\n"
            )
        )
        .unwrap();
        if let Some(token) = token {
            fs::write(&token_path, token).unwrap();
        }

        Self {
            dir,
            config,
            mappings
        }
    }

    fn command(&self) -> Command {
        let mut cmd = dtp();
        cmd.arg("--config")
            .arg(&self.config)
            .arg("--mappings")
            .arg(&self.mappings);
        cmd
    }

    fn log_file(&self, name: &str) -> PathBuf {
        self.dir.path().join("logs").join(format!("{name}.log"))
    }

    fn path(&self) -> &Path {
        self.dir.path()
    }
}

mod help_and_version {
    use super::*;

    #[test]
    fn test_help_lists_commands() {
        dtp()
            .arg("--help")
            .assert()
            .success()
            .stdout(predicate::str::contains("Usage:"))
            .stdout(predicate::str::contains("token"))
            .stdout(predicate::str::contains("ontology"))
            .stdout(predicate::str::contains("api-url"))
            .stdout(predicate::str::contains("count"));
    }

    #[test]
    fn test_version_flag() {
        dtp()
            .arg("--version")
            .assert()
            .success()
            .stdout(predicate::str::contains("dtp"));
    }

    #[test]
    fn test_no_args_shows_help() {
        dtp()
            .assert()
            .failure()
            .stderr(predicate::str::contains("Usage:"));
    }

    #[test]
    fn test_count_help() {
        dtp()
            .args(["count", "--help"])
            .assert()
            .success()
            .stdout(predicate::str::contains("tasks"))
            .stdout(predicate::str::contains("asbuilt"))
            .stdout(predicate::str::contains("defects"));
    }
}

mod lookups {
    use super::*;

    const DOMAIN: &str = "https://dtp.example.org";
    const AUTH: &str = "https://auth.example.org/auth";

    #[test]
    fn test_token_from_cache() {
        let ws = Workspace::new(DOMAIN, AUTH, Some("cached-token\n"));
        ws.command()
            .arg("token")
            .assert()
            .success()
            .stdout("cached-token\n");
    }

    #[test]
    fn test_ontology_lookup() {
        let ws = Workspace::new(DOMAIN, AUTH, Some("cached-token"));
        ws.command()
            .args(["ontology", "hasTask"])
            .assert()
            .success()
            .stdout("https://onto.example.org/hasTask\n");
    }

    #[test]
    fn test_unknown_term_fails() {
        let ws = Workspace::new(DOMAIN, AUTH, Some("cached-token"));
        ws.command()
            .args(["ontology", "hasTsk"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("Ontology hasTsk not found"));
    }

    #[test]
    fn test_api_url_with_id() {
        let ws = Workspace::new(DOMAIN, AUTH, Some("cached-token"));
        ws.command()
            .args(["api-url", "get_node", "--id", "42"])
            .assert()
            .success()
            .stdout("https://dtp.example.org/nodes/42\n");
    }

    #[test]
    fn test_run_is_recorded_in_log_dir() {
        let ws = Workspace::new(DOMAIN, AUTH, Some("cached-token"));
        ws.command()
            .args(["--log-name", "lookup", "ontology", "task"])
            .assert()
            .success();

        let log = fs::read_to_string(ws.log_file("lookup")).unwrap();
        assert!(log.contains(" : DTP settings loaded"));
    }

    #[test]
    fn test_invalid_domain_is_fatal() {
        let ws = Workspace::new("not a url", AUTH, Some("cached-token"));
        ws.command()
            .arg("token")
            .assert()
            .failure()
            .stderr(predicate::str::contains("Configuration error"))
            .stderr(predicate::str::contains("DTP_DOMAIN"));
        assert!(!ws.path().join("logs").exists());
    }

    #[test]
    fn test_missing_config_file_is_fatal() {
        dtp()
            .args(["--config", "/nonexistent/DTP_config.yaml", "token"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("Config file not found"));
    }
}

mod platform {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const AUTH: &str = "https://auth.example.org/auth";

    #[tokio::test(flavor = "multi_thread")]
    async fn test_count_tasks() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/v0/count"))
            .and(header("Authorization", "Bearer cached-token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "total_items": 7 })))
            .expect(1)
            .mount(&server)
            .await;

        let ws = Workspace::new(&server.uri(), AUTH, Some("cached-token"));
        ws.command()
            .args(["count", "tasks", "https://node/activity-1"])
            .assert()
            .success()
            .stdout("7\n");
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_count_with_unmapped_term_sends_nothing() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let ws = Workspace::new(&server.uri(), AUTH, Some("cached-token"));
        ws.command()
            .args(["count", "defects", "https://node/asbuilt-1"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("Ontology hasGeometricDefect not found"));
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_token_renewed_with_env_credentials() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/auth"))
            .and(header("Authorization", "Basic dXNlcjpwYXNz"))
            .respond_with(ResponseTemplate::new(200).set_body_string("fresh-token\n"))
            .expect(1)
            .mount(&server)
            .await;

        let auth_url = format!("{}/auth", server.uri());
        let ws = Workspace::new("https://dtp.example.org", &auth_url, None);
        ws.command()
            .env("DTP_USER", "user")
            .env("DTP_PASSWORD", "pass")
            .arg("token")
            .assert()
            .success()
            .stdout("fresh-token\n");

        let cached = fs::read_to_string(ws.path().join("token.txt")).unwrap();
        assert_eq!(cached.trim(), "fresh-token");
    }
}
