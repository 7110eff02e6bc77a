// Insight pipeline: fingerprint → cache → requester → dashboard actions.
// All LLM calls go through llm_client; no direct Anthropic calls here.

pub mod cache;
pub mod fingerprint;
pub mod handlers;
pub mod models;
pub mod prompts;
pub mod requester;
pub mod service;
