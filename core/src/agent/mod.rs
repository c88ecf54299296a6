pub mod context;
pub mod pipeline;

pub use context::{ContextBuilder, SourceBundle, DEFAULT_KNOWLEDGE, DEFAULT_TRUNCATE_LIMIT, truncate};
pub use pipeline::{Agent, DEFAULT_TEMPERATURE};
