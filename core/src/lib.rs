pub mod agent;
pub mod audit;
pub mod config;
pub mod documents;
pub mod error;
pub mod providers;
pub mod session;
pub mod traits;
pub mod web;

pub use agent::{Agent, ContextBuilder, SourceBundle};
pub use audit::{QueryLog, QueryRecord};
pub use error::{AgentError, FetchError, LoadError, PersistError};
pub use providers::OpenAIProvider;
pub use session::Session;
pub use traits::{ChatMessage, ChatRequest, ChatResponse, Provider};
pub use web::WebFetcher;
