// Proposal generation pipeline.
// Implements: input normalization, technology resolution, job analysis,
// asset lookup, and proposal composition.
// All model calls go through llm_client.

pub mod analyzer;
pub mod assets;
pub mod command;
pub mod composer;
pub mod handlers;
pub mod normalize;
pub mod pipeline;
pub mod prompts;
pub mod technology;
