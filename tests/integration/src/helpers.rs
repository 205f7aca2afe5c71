//! Test helpers for integration tests
//!
//! Provides utilities for spawning test servers and driving them with a
//! cookie-carrying client per simulated user.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use blog_api::{create_app, create_app_state};
use blog_common::AppConfig;
use reqwest::cookie::{CookieStore, Jar};
use reqwest::header::LOCATION;
use reqwest::multipart::{Form, Part};
use reqwest::redirect::Policy;
use reqwest::{Client, Response, StatusCode, Url};
use serde::de::DeserializeOwned;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

use crate::fixtures::{PostForm, SignupForm};

/// Test server instance that manages lifecycle
pub struct TestServer {
    pub addr: SocketAddr,
    _handle: JoinHandle<()>,
}

impl TestServer {
    /// Start a new test server
    pub async fn start() -> Result<Self> {
        let config = test_config()?;
        Self::start_with_config(config).await
    }

    /// Start a test server with custom config
    pub async fn start_with_config(config: AppConfig) -> Result<Self> {
        let state = create_app_state(config).await?;
        let app = create_app(state)?;

        let listener = TcpListener::bind(SocketAddr::from(([127, 0, 0, 1], 0))).await?;
        let addr = listener.local_addr()?;

        let handle = tokio::spawn(async move {
            axum::serve(
                listener,
                app.into_make_service_with_connect_info::<SocketAddr>(),
            )
            .await
            .ok();
        });

        // Wait for server to be ready
        tokio::time::sleep(Duration::from_millis(100)).await;

        Ok(Self {
            addr,
            _handle: handle,
        })
    }

    /// Get base URL for the server
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// A fresh visitor with an empty cookie jar
    pub fn browser(&self) -> Result<Browser> {
        Browser::new(self.base_url())
    }

    /// Sign up a new account; the returned browser holds its session
    pub async fn signed_up(&self, prefix: &str) -> Result<(Browser, SignupForm)> {
        let browser = self.browser()?;
        let form = SignupForm::unique(prefix);
        let response = browser.post_form("/signup", &form.fields()).await?;
        assert_redirect(response, "/dashboard").await?;
        Ok((browser, form))
    }
}

/// One simulated user agent: keeps cookies, never follows redirects
pub struct Browser {
    base_url: String,
    jar: Arc<Jar>,
    client: Client,
}

impl Browser {
    pub fn new(base_url: String) -> Result<Self> {
        let jar = Arc::new(Jar::default());
        let client = Client::builder()
            .timeout(Duration::from_secs(10))
            .cookie_provider(Arc::clone(&jar))
            .redirect(Policy::none())
            .build()?;
        Ok(Self {
            base_url,
            jar,
            client,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Make a GET request
    pub async fn get(&self, path: &str) -> Result<Response> {
        Ok(self.client.get(self.url(path)).send().await?)
    }

    /// Make a POST request with a urlencoded body
    pub async fn post_form(&self, path: &str, fields: &[(&str, String)]) -> Result<Response> {
        Ok(self.client.post(self.url(path)).form(fields).send().await?)
    }

    /// Make a multipart POST with text fields plus one file part
    pub async fn post_upload(
        &self,
        path: &str,
        fields: &[(&str, String)],
        file_field: &str,
        file: Part,
    ) -> Result<Response> {
        let form = fields
            .iter()
            .fold(Form::new(), |form, (name, value)| form.text(name.to_string(), value.clone()))
            .part(file_field.to_string(), file);
        Ok(self.client.post(self.url(path)).multipart(form).send().await?)
    }

    /// Make a POST request with a JSON body
    pub async fn post_json<T: serde::Serialize>(&self, path: &str, body: &T) -> Result<Response> {
        Ok(self.client.post(self.url(path)).json(body).send().await?)
    }

    /// Current value of a cookie set by the server
    pub fn cookie(&self, name: &str) -> Option<String> {
        let url = Url::parse(&self.base_url).ok()?;
        let header = self.jar.cookies(&url)?;
        header.to_str().ok()?.split("; ").find_map(|pair| {
            pair.split_once('=')
                .filter(|(key, _)| *key == name)
                .map(|(_, value)| value.to_string())
        })
    }

    /// Submit the create-post form and return the new post's path
    pub async fn create_post(&self, form: &PostForm) -> Result<String> {
        let response = self.post_form("/post/create", &form.fields()).await?;
        let path = format!("/post/{}", form.expected_slug());
        assert_redirect(response, &path).await?;
        Ok(path)
    }

    /// Toggle following `username` through the ajax endpoint
    pub async fn toggle_follow(&self, username: &str) -> Result<Response> {
        self.post_form("/ajax/toggle-follow", &[("username", username.to_string())])
            .await
    }
}

/// Create a test configuration
pub fn test_config() -> Result<AppConfig> {
    // Load from environment or use defaults
    dotenvy::dotenv().ok();

    let mut config = AppConfig::from_env().map_err(|e| anyhow::anyhow!("Config error: {}", e))?;
    config.rate_limit.requests_per_second = 1000;
    config.rate_limit.burst = 1000;
    config.storage.upload_dir = std::env::temp_dir()
        .join("inkwell-test-uploads")
        .to_string_lossy()
        .into_owned();

    Ok(config)
}

/// Helper to check if test environment is available
pub async fn check_test_env() -> bool {
    if std::env::var("DATABASE_URL").is_err() {
        eprintln!("Skipping test: DATABASE_URL not set");
        return false;
    }

    if std::env::var("REDIS_URL").is_err() {
        eprintln!("Skipping test: REDIS_URL not set");
        return false;
    }

    true
}

/// Assert response status and parse JSON body
pub async fn assert_json<T: DeserializeOwned>(response: Response, expected_status: StatusCode) -> Result<T> {
    let status = response.status();
    if status != expected_status {
        let body = response.text().await?;
        anyhow::bail!(
            "Expected status {}, got {}. Body: {}",
            expected_status,
            status,
            body
        );
    }
    Ok(response.json().await?)
}

/// Assert response status without parsing body
pub async fn assert_status(response: Response, expected_status: StatusCode) -> Result<()> {
    assert_text(response, expected_status).await.map(|_| ())
}

/// Assert response status and return the body text
pub async fn assert_text(response: Response, expected_status: StatusCode) -> Result<String> {
    let status = response.status();
    let body = response.text().await?;
    if status != expected_status {
        anyhow::bail!(
            "Expected status {}, got {}. Body: {}",
            expected_status,
            status,
            body
        );
    }
    Ok(body)
}

/// Assert a 303 redirect to `location`
pub async fn assert_redirect(response: Response, location: &str) -> Result<()> {
    let status = response.status();
    let target = response
        .headers()
        .get(LOCATION)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    if status != StatusCode::SEE_OTHER || target.as_deref() != Some(location) {
        let body = response.text().await?;
        anyhow::bail!(
            "Expected redirect to {}, got {} -> {:?}. Body: {}",
            location,
            status,
            target,
            body
        );
    }
    Ok(())
}
