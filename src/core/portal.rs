use crate::core::aggregation::{build_aggregates, FeedbackAggregates};
use crate::domain::model::{Credentials, FeedbackListing, Registration, Role, Session};
use crate::domain::ports::{FeedbackApi, SessionStore};
use crate::utils::error::{PortalError, Result};
use crate::utils::validation::validate_non_empty_input;
use serde::Serialize;

/// Everything the dashboard screen shows.
#[derive(Debug, Clone, Serialize)]
pub struct Dashboard {
    pub username: String,
    pub role: Role,
    pub listing: FeedbackListing,
    #[serde(flatten)]
    pub aggregates: FeedbackAggregates,
}

pub struct Portal<A: FeedbackApi, S: SessionStore> {
    api: A,
    sessions: S,
}

impl<A: FeedbackApi, S: SessionStore> Portal<A, S> {
    pub fn new(api: A, sessions: S) -> Self {
        Self { api, sessions }
    }

    fn require_session(&self) -> Result<Session> {
        self.sessions.load()?.ok_or(PortalError::NotLoggedIn)
    }

    pub fn current_session(&self) -> Result<Option<Session>> {
        self.sessions.load()
    }

    pub async fn register(&self, registration: Registration) -> Result<()> {
        validate_non_empty_input("username", &registration.username)?;
        validate_non_empty_input("password", &registration.password)?;

        self.api.register(&registration).await?;
        tracing::info!("🎉 Registered '{}' as {}", registration.username, registration.role);
        Ok(())
    }

    pub async fn login(&self, credentials: Credentials) -> Result<Session> {
        validate_non_empty_input("username", &credentials.username)?;
        validate_non_empty_input("password", &credentials.password)?;

        let session = self.api.login(&credentials).await?;
        self.sessions.save(&session)?;
        tracing::info!("✅ Logged in as '{}' ({})", session.username, session.role);
        Ok(session)
    }

    pub fn logout(&self) -> Result<()> {
        self.sessions.clear()?;
        tracing::info!("Session cleared");
        Ok(())
    }

    pub async fn submit_feedback(&self, content: &str) -> Result<()> {
        let session = self.require_session()?;
        validate_non_empty_input("content", content)?;

        match self.api.submit_feedback(&session, content).await {
            Ok(()) => {
                tracing::info!("✅ Feedback submitted by '{}'", session.username);
                Ok(())
            }
            Err(PortalError::Unauthorized) => {
                // token 失效，清掉讓使用者重新登入
                tracing::warn!("Token rejected by server, clearing session");
                self.sessions.clear()?;
                Err(PortalError::Unauthorized)
            }
            Err(e) => Err(e),
        }
    }

    pub async fn dashboard(&self) -> Result<Dashboard> {
        let session = self.require_session()?;

        let listing = self.api.list_feedback(&session).await?;
        tracing::debug!("Fetched {} feedback records", listing.total());

        let aggregates = build_aggregates(&listing);
        Ok(Dashboard {
            username: session.username,
            role: session.role,
            listing,
            aggregates,
        })
    }
}
