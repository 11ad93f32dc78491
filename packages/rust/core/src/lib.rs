//! Core report pipeline: search aggregation, alert scanning, prompt
//! composition, text generation, and session history.

pub mod alerts;
pub mod composer;
pub mod llm;
pub mod pipeline;
pub mod session;
