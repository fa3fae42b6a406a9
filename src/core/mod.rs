pub mod aggregation;
pub mod portal;
pub mod report;

pub use crate::domain::model::{
    DepartmentCount, DepartmentGroup, FeedbackListing, FeedbackRecord, SentimentCount, Session,
};
pub use crate::domain::ports::{ConfigProvider, FeedbackApi, SessionStore, Storage};
pub use crate::utils::error::Result;
