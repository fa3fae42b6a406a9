// Adapters layer: concrete implementations of the domain ports (http, session file, export directory).

pub mod http;
pub mod session;
pub mod storage;

pub use http::HttpFeedbackApi;
pub use session::FileSessionStore;
pub use storage::ExportDirectory;
