use crate::domain::model::{
    Credentials, DepartmentGroup, FeedbackListing, FeedbackRecord, FeedbackSubmission,
    LoginResponse, Registration, Session,
};
use crate::domain::ports::{ConfigProvider, FeedbackApi};
use crate::utils::error::{PortalError, Result};
use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use std::time::Duration;

pub const REGISTER_PATH: &str = "/api/User/register";
pub const LOGIN_PATH: &str = "/api/User/login";
pub const SUBMIT_PATH: &str = "/api/Feedback/submit";
pub const LIST_ALL_PATH: &str = "/api/Feedback/all";

pub struct HttpFeedbackApi {
    client: Client,
    base_url: String,
}

impl HttpFeedbackApi {
    pub fn new(base_url: &str, timeout_seconds: Option<u64>) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(seconds) = timeout_seconds {
            builder = builder.timeout(Duration::from_secs(seconds));
        }

        Ok(Self {
            client: builder.build()?,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn from_config<C: ConfigProvider>(config: &C) -> Result<Self> {
        Self::new(config.api_base_url(), config.timeout_seconds())
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn request_failed(path: &str, response: &Response) -> PortalError {
        PortalError::RequestFailed {
            endpoint: path.to_string(),
            status: response.status().as_u16(),
        }
    }
}

/// 登入回應三個欄位缺一不可
fn session_from_login(body: LoginResponse) -> Result<Session> {
    let present = |value: Option<String>| value.filter(|v| !v.trim().is_empty());

    match (present(body.token), present(body.role), present(body.username)) {
        (Some(token), Some(role), Some(username)) => Ok(Session {
            token,
            role: role.into(),
            username,
        }),
        _ => Err(PortalError::InvalidResponse {
            message: "login response is missing token, role or username".to_string(),
        }),
    }
}

/// 管理員拿到的是以部門分組的清單，一般使用者是扁平清單；形狀和角色對不上就是壞回應
fn decode_listing(body: &str, session: &Session) -> Result<FeedbackListing> {
    let invalid = |message: String| PortalError::InvalidResponse { message };

    let value: serde_json::Value = serde_json::from_str(body)
        .map_err(|e| invalid(format!("feedback listing is not valid JSON: {}", e)))?;
    let items = value
        .as_array()
        .ok_or_else(|| invalid("feedback listing is not an array".to_string()))?;

    for (index, item) in items.iter().enumerate() {
        let object = item
            .as_object()
            .ok_or_else(|| invalid(format!("feedback listing item {} is not an object", index)))?;
        let grouped = object.get("feedbacks").is_some_and(|f| f.is_array());

        if session.role.is_admin() && !grouped {
            return Err(invalid(format!(
                "expected department groups for an admin session, item {} has no feedbacks array",
                index
            )));
        }
        if !session.role.is_admin() && object.contains_key("feedbacks") {
            return Err(invalid(format!(
                "expected a flat feedback list, item {} is a department group",
                index
            )));
        }
    }

    let shape_error =
        |e: serde_json::Error| invalid(format!("unexpected feedback listing shape: {}", e));
    if session.role.is_admin() {
        let groups: Vec<DepartmentGroup> = serde_json::from_value(value).map_err(shape_error)?;
        Ok(FeedbackListing::Grouped(groups))
    } else {
        let records: Vec<FeedbackRecord> = serde_json::from_value(value).map_err(shape_error)?;
        Ok(FeedbackListing::Flat(records))
    }
}

#[async_trait]
impl FeedbackApi for HttpFeedbackApi {
    async fn register(&self, registration: &Registration) -> Result<()> {
        tracing::debug!("Registering user '{}' as {}", registration.username, registration.role);
        let response = self
            .client
            .post(self.url(REGISTER_PATH))
            .json(registration)
            .send()
            .await?;

        tracing::debug!("Register response status: {}", response.status());
        match response.status() {
            status if status.is_success() => Ok(()),
            StatusCode::BAD_REQUEST => Err(PortalError::UsernameTaken),
            _ => Err(Self::request_failed(REGISTER_PATH, &response)),
        }
    }

    async fn login(&self, credentials: &Credentials) -> Result<Session> {
        tracing::debug!("Logging in as '{}'", credentials.username);
        let response = self
            .client
            .post(self.url(LOGIN_PATH))
            .json(credentials)
            .send()
            .await?;

        let status = response.status();
        tracing::debug!("Login response status: {}", status);
        if status == StatusCode::UNAUTHORIZED {
            return Err(PortalError::InvalidCredentials);
        }
        if !status.is_success() {
            return Err(Self::request_failed(LOGIN_PATH, &response));
        }

        let body = response.text().await?;
        let parsed: LoginResponse =
            serde_json::from_str(&body).map_err(|e| PortalError::InvalidResponse {
                message: format!("login response is not valid JSON: {}", e),
            })?;
        session_from_login(parsed)
    }

    async fn submit_feedback(&self, session: &Session, content: &str) -> Result<()> {
        let submission = FeedbackSubmission {
            content: content.to_string(),
        };
        let response = self
            .client
            .post(self.url(SUBMIT_PATH))
            .bearer_auth(&session.token)
            .json(&submission)
            .send()
            .await?;

        let status = response.status();
        tracing::debug!("Submit response status: {}", status);
        match status {
            StatusCode::OK => Ok(()),
            StatusCode::UNAUTHORIZED => Err(PortalError::Unauthorized),
            StatusCode::BAD_REQUEST => {
                let message = response.text().await.unwrap_or_default();
                Err(PortalError::BadRequest { message })
            }
            s if s.is_success() => Err(PortalError::UnexpectedStatus {
                endpoint: SUBMIT_PATH.to_string(),
                status: s.as_u16(),
            }),
            _ => Err(Self::request_failed(SUBMIT_PATH, &response)),
        }
    }

    async fn list_feedback(&self, session: &Session) -> Result<FeedbackListing> {
        tracing::debug!("Fetching feedback listing for {} '{}'", session.role, session.username);
        let response = self
            .client
            .get(self.url(LIST_ALL_PATH))
            .bearer_auth(&session.token)
            .send()
            .await?;

        let status = response.status();
        tracing::debug!("Listing response status: {}", status);
        if status == StatusCode::UNAUTHORIZED {
            return Err(PortalError::Unauthorized);
        }
        if !status.is_success() {
            return Err(Self::request_failed(LIST_ALL_PATH, &response));
        }

        let body = response.text().await?;
        decode_listing(&body, session)
    }
}
