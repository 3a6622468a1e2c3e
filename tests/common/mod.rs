#![allow(dead_code)]

use anyhow::{Context, Result};
use reqwest::header::{COOKIE, LOCATION, SET_COOKIE};
use reqwest::{redirect, Client, Response, StatusCode};
use serde_json::Value;

use petbook::config::AppConfig;
use petbook::AppState;

pub const PASSWORD: &str = "secret-pass";

/// An app instance on its own port with its own in-memory store.
pub struct TestApp {
    pub base_url: String,
    pub client: Client,
    pub state: AppState,
}

pub async fn spawn_app() -> Result<TestApp> {
    spawn_app_with(AppConfig::for_tests()).await
}

pub async fn spawn_app_with(config: AppConfig) -> Result<TestApp> {
    // RUST_LOG=petbook=debug cargo test shows server logs per test
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();

    // Pick an unused port for isolation
    let port = portpicker::pick_unused_port().context("failed to pick free port")?;
    let listener = tokio::net::TcpListener::bind(("127.0.0.1", port))
        .await
        .context("failed to bind test listener")?;

    let state = AppState::memory(config);
    let app = petbook::app(state.clone());
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    // Redirects are asserted on, never followed
    let client = Client::builder().redirect(redirect::Policy::none()).build()?;

    Ok(TestApp {
        base_url: format!("http://127.0.0.1:{}", port),
        client,
        state,
    })
}

impl TestApp {
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub async fn get(&self, path: &str, cookie: Option<&str>) -> Result<Response> {
        let mut request = self.client.get(self.url(path));
        if let Some(cookie) = cookie {
            request = request.header(COOKIE, cookie);
        }
        Ok(request.send().await?)
    }

    pub async fn post_form(&self, path: &str, cookie: Option<&str>, form: &[(&str, &str)]) -> Result<Response> {
        let mut request = self.client.post(self.url(path)).form(form);
        if let Some(cookie) = cookie {
            request = request.header(COOKIE, cookie);
        }
        Ok(request.send().await?)
    }

    pub async fn signup(&self, username: &str, password: &str) -> Result<Response> {
        let email = format!("{}@example.com", username);
        self.post_form(
            "/signup",
            None,
            &[("username", username), ("email", email.as_str()), ("password", password)],
        )
        .await
    }

    /// Logs in and returns the `name=value` pair to send back as Cookie.
    pub async fn login(&self, username: &str, password: &str) -> Result<String> {
        let res = self
            .post_form("/login", None, &[("username", username), ("password", password)])
            .await?;
        anyhow::ensure!(res.status() == StatusCode::SEE_OTHER, "login failed: {}", res.status());
        session_cookie(&res).context("login response carried no session cookie")
    }

    /// Signs up and logs in, returning the session cookie.
    pub async fn register(&self, username: &str) -> Result<String> {
        let res = self.signup(username, PASSWORD).await?;
        anyhow::ensure!(res.status() == StatusCode::SEE_OTHER, "signup failed: {}", res.status());
        self.login(username, PASSWORD).await
    }

    pub async fn add_pet(&self, cookie: &str, form: &[(&str, &str)]) -> Result<Response> {
        self.post_form("/profile/new-pet", Some(cookie), form).await
    }

    /// `data` of the profile page.
    pub async fn profile(&self, cookie: &str) -> Result<Value> {
        let res = self.get("/profile", Some(cookie)).await?;
        anyhow::ensure!(res.status() == StatusCode::OK, "profile failed: {}", res.status());
        page_data(res).await
    }

    /// Ids of the current user's pets, in order.
    pub async fn pet_ids(&self, cookie: &str) -> Result<Vec<String>> {
        let profile = self.profile(cookie).await?;
        Ok(profile["user"]["pets"]
            .as_array()
            .map(|pets| {
                pets.iter()
                    .filter_map(|pet| pet["id"].as_str().map(str::to_string))
                    .collect()
            })
            .unwrap_or_default())
    }
}

/// `sid=<token>` from a response's Set-Cookie headers.
pub fn session_cookie(res: &Response) -> Option<String> {
    res.headers()
        .get_all(SET_COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .find(|value| value.starts_with("sid="))
        .and_then(|value| value.split(';').next())
        .map(str::to_string)
}

pub fn set_cookie_header(res: &Response) -> Option<String> {
    res.headers()
        .get(SET_COOKIE)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string)
}

pub fn location(res: &Response) -> Option<String> {
    res.headers()
        .get(LOCATION)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string)
}

/// Unwraps the `{ success, data }` envelope.
pub async fn page_data(res: Response) -> Result<Value> {
    let body = res.json::<Value>().await?;
    anyhow::ensure!(body["success"] == true, "not a success envelope: {}", body);
    Ok(body["data"].clone())
}

/// Names of the pets on a `/pets` page.
pub fn pet_names(data: &Value) -> Vec<String> {
    data["pets"]
        .as_array()
        .map(|pets| {
            pets.iter()
                .filter_map(|pet| pet["name"].as_str().map(str::to_string))
                .collect()
        })
        .unwrap_or_default()
}
