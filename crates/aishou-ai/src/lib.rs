//! AI layer: the fortune oracle seam and its Gemini `generateContent` implementation.

pub mod decode;
mod error;
pub mod gemini;
pub mod oracle;
pub mod prompt;

pub use decode::{DecodeError, decode_reply};
pub use error::FortuneError;
pub use gemini::{DEFAULT_BASE_URL, DEFAULT_MODEL, GeminiClient};
pub use oracle::{FortuneOracle, FortuneRequest};
