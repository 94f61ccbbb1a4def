//! Agent system wrapping an LLM tool-calling loop around the lookup tools.
//!
//! The reasoning itself belongs to the model; this module only owns the
//! tool registry, the prompt, and the bounded loop that shuttles tool
//! observations back to the model.

mod runner;
mod tools;

pub use runner::{Agent, AgentResponse, ToolCallRecord, APOLOGY};
pub use tools::{parse_tool_call, tool_definitions, ToolCall, ToolContext};
