use std::process::{Child, Command, Stdio};
use std::sync::OnceLock;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use reqwest::StatusCode;
use serde_json::Value;

static SERVER: OnceLock<TestServer> = OnceLock::new();
static DB_SERVER: OnceLock<TestServer> = OnceLock::new();

/// Env var naming a disposable Postgres database for end-to-end tests
#[allow(dead_code)]
pub const TEST_DATABASE_URL: &str = "CAMPUS_TEST_DATABASE_URL";

pub struct TestServer {
    #[allow(dead_code)]
    pub port: u16,
    pub base_url: String,
    #[allow(dead_code)]
    child: Child,
}

impl TestServer {
    fn spawn(envs: &[(&str, &str)]) -> Result<Self> {
        // Pick an unused port for isolation
        let port = portpicker::pick_unused_port().context("failed to pick free port")?;
        let base_url = format!("http://127.0.0.1:{}", port);

        // Cargo builds the server binary for integration tests
        let mut cmd = Command::new(env!("CARGO_BIN_EXE_campus-api"));
        cmd.env("API_PORT", port.to_string())
            .env("DATABASE_CONNECTION_TIMEOUT", "2")
            .env("SECURITY_JWT_SECRET", "integration-test-secret")
            .envs(envs.iter().copied())
            .stdin(Stdio::null())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit());

        let child = cmd.spawn().context("failed to spawn server binary")?;

        Ok(Self { port, base_url, child })
    }

    async fn wait_until(&self, timeout: Duration, ready: impl Fn(StatusCode) -> bool) -> Result<()> {
        let client = reqwest::Client::new();
        let deadline = Instant::now() + timeout;
        loop {
            if Instant::now() > deadline {
                break;
            }
            let url = format!("{}/health", self.base_url);
            if let Ok(resp) = client.get(&url).send().await {
                if ready(resp.status()) {
                    return Ok(());
                }
            }
            tokio::time::sleep(Duration::from_millis(150)).await;
        }
        anyhow::bail!("server did not become ready on {} within {:?}", self.base_url, timeout)
    }
}

/// Server with whatever DATABASE_URL the environment provides; without a
/// reachable database it still starts and reports a degraded /health
pub async fn ensure_server() -> Result<&'static TestServer> {
    let server = SERVER.get_or_init(|| {
        TestServer::spawn(&[("DATABASE_RUN_MIGRATIONS", "false")]).expect("failed to spawn server binary")
    });
    server
        .wait_until(Duration::from_secs(15), |s| {
            s == StatusCode::OK || s == StatusCode::SERVICE_UNAVAILABLE
        })
        .await?;
    Ok(server)
}

/// Server backed by `CAMPUS_TEST_DATABASE_URL` with migrations applied.
/// `None` when the variable is unset, so database tests skip.
#[allow(dead_code)]
pub async fn ensure_db_server() -> Result<Option<&'static TestServer>> {
    let Ok(url) = std::env::var(TEST_DATABASE_URL) else {
        eprintln!("{} not set; skipping database-backed test", TEST_DATABASE_URL);
        return Ok(None);
    };

    let server = DB_SERVER.get_or_init(|| {
        TestServer::spawn(&[
            ("DATABASE_URL", url.as_str()),
            ("DATABASE_RUN_MIGRATIONS", "true"),
            ("SECURITY_ENFORCE_FACULTY_GATE", "true"),
        ])
        .expect("failed to spawn server binary")
    });
    server.wait_until(Duration::from_secs(20), |s| s == StatusCode::OK).await?;
    Ok(Some(server))
}

/// Thin JSON client for the running server
#[allow(dead_code)]
pub struct Api {
    client: reqwest::Client,
    base_url: String,
}

#[allow(dead_code)]
impl Api {
    pub fn new(server: &TestServer) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: server.base_url.clone(),
        }
    }

    pub async fn get(&self, path: &str, token: &str) -> Result<(StatusCode, Value)> {
        let res = self
            .client
            .get(format!("{}{}", self.base_url, path))
            .bearer_auth(token)
            .send()
            .await?;
        Self::read(res).await
    }

    pub async fn post(&self, path: &str, token: Option<&str>, body: Value) -> Result<(StatusCode, Value)> {
        let mut req = self.client.post(format!("{}{}", self.base_url, path)).json(&body);
        if let Some(token) = token {
            req = req.bearer_auth(token);
        }
        Self::read(req.send().await?).await
    }

    pub async fn put(&self, path: &str, token: &str, body: Value) -> Result<(StatusCode, Value)> {
        let res = self
            .client
            .put(format!("{}{}", self.base_url, path))
            .bearer_auth(token)
            .json(&body)
            .send()
            .await?;
        Self::read(res).await
    }

    /// Sign in and return the bearer token
    pub async fn sign_in(&self, email: &str, password: &str) -> Result<String> {
        let (status, body) = self
            .post("/auth/signin", None, serde_json::json!({ "email": email, "password": password }))
            .await?;
        anyhow::ensure!(status == StatusCode::OK, "sign-in for {} failed: {} {}", email, status, body);
        body["data"]["token"]
            .as_str()
            .map(str::to_string)
            .context("sign-in response has no token")
    }

    async fn read(res: reqwest::Response) -> Result<(StatusCode, Value)> {
        let status = res.status();
        let bytes = res.bytes().await?;
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes)?
        };
        Ok((status, body))
    }
}
