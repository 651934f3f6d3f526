//! LLM-assisted structured extraction and relevance scoring (§4 H-J).

pub mod llm;
pub mod salary;
pub mod scorer;

pub use llm::{ExtractedInfo, OllamaClient};
pub use salary::SalaryEstimate;
