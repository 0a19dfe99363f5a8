//! Fixed instruction sets and request templates for the two pipeline stages.

use minijinja::{Environment, context};

/// System instruction for the evaluation stage: a 35-criteria rubric scored
/// out of 175, followed by refinement suggestions.
pub const EVALUATOR_SYSTEM_INSTRUCTION: &str = include_str!("../prompts/evaluator.md");

/// System instruction for the revision stage. Asks for the final prompt
/// inside a fenced block.
pub const MODIFIER_SYSTEM_INSTRUCTION: &str = include_str!("../prompts/modifier.md");

const EVALUATE_TEMPLATE: &str = "Please evaluate the following prompt:\n```\n{{ raw_prompt }}\n```";

const MODIFY_TEMPLATE: &str = "Based on the following evaluation report:\n\n---\n{{ report }}\n---\n\nPlease revise the following original prompt:\n```\n{{ raw_prompt }}\n```";

/// Renders the content of the evaluation request.
pub fn render_evaluate_request(raw_prompt: &str) -> Result<String, minijinja::Error> {
    Environment::new().render_str(EVALUATE_TEMPLATE, context! { raw_prompt })
}

/// Renders the content of the revision request.
pub fn render_modify_request(report: &str, raw_prompt: &str) -> Result<String, minijinja::Error> {
    Environment::new().render_str(MODIFY_TEMPLATE, context! { report, raw_prompt })
}
