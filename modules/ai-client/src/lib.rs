pub mod error;
pub mod gemini;
mod http;
pub mod openai;
pub mod traits;
pub mod util;

pub use error::AiError;
pub use gemini::Gemini;
pub use openai::{OpenAi, UserLocation};
pub use traits::ChatAgent;
pub use util::truncate_to_char_boundary;
