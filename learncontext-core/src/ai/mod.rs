pub mod error;
pub mod mock;
pub mod openai;
pub mod provider;
pub mod types;

pub use error::AiError;
pub use mock::{MockBehavior, MockProvider};
pub use openai::OpenAiProvider;
pub use provider::AiProvider;
pub use types::*;
