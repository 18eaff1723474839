pub mod client;
pub mod compose;

pub use compose::GeminiComposeClient;
