use crate::domain::model::{Credentials, FeedbackListing, Registration, Session};
use crate::utils::error::Result;
use async_trait::async_trait;

/// Where dashboard exports are written.
pub trait Storage: Send + Sync {
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn api_base_url(&self) -> &str;
    fn session_path(&self) -> &str;
    fn output_path(&self) -> &str;
    fn timeout_seconds(&self) -> Option<u64>;
}

/// Remote portal API. One attempt per call, no retry.
#[async_trait]
pub trait FeedbackApi: Send + Sync {
    async fn register(&self, registration: &Registration) -> Result<()>;
    async fn login(&self, credentials: &Credentials) -> Result<Session>;
    async fn submit_feedback(&self, session: &Session, content: &str) -> Result<()>;
    async fn list_feedback(&self, session: &Session) -> Result<FeedbackListing>;
}

pub trait SessionStore: Send + Sync {
    fn load(&self) -> Result<Option<Session>>;
    fn save(&self, session: &Session) -> Result<()>;
    fn clear(&self) -> Result<()>;
}
