//! Prompt texts and the drafting-assistance chain.
//!
//! All backends receive the same prompt strings so output stays consistent
//! across providers.

use anyhow::Result;
use lexdraft_core::gateway::TextModel;

/// System prompt for the legal-advisor chatbot.
pub const LEGAL_ADVISOR_SYSTEM: &str =
    "You are pretending to be a legal advisor. You will provide answers to queries based \
     on the ruleset used in India. Give clear steps on how the user can proceed in that \
     situation. Refer to yourself as legal advisor. Only provide the legal side of the \
     queries.";

/// First stage of drafting assistance: turn the assembled form data into a
/// full document draft.
pub fn drafting_prompt(doc_label: &str, form_text: &str) -> String {
    format!(
        "Draft a complete {doc_label} based on the following details. Keep the \
         structure of a formal Indian legal document and fill every clause from the \
         details provided.\n\n{form_text}"
    )
}

/// Second stage: normalise the generated draft to markdown.
pub fn markdown_fix_prompt(draft: &str) -> String {
    format!("Convert the following text to markdown format. Use Titles and whatever necessary: \n\n{draft}")
}

/// Prompt for the document analyser.
pub fn analysis_prompt(content: &str) -> String {
    format!(
        "As a legal advisor, please analyze the following document content and provide:\n\
         1. A summary of the key points\n\
         2. Any legal implications under Indian law\n\
         3. Recommended actions or next steps\n\n\
         Make the content easy to understand for a person with little or no legal knowledge.\n\n\
         Document content:\n{content}"
    )
}

/// The two-stage drafting chain: generate, then markdown-normalise.
/// Either round trip failing fails the whole operation; there is no retry
/// and no partial result.
pub async fn draft_document(
    model: &dyn TextModel,
    doc_label: &str,
    form_text: &str,
) -> Result<String> {
    let draft = model.complete(&drafting_prompt(doc_label, form_text)).await?;
    model.complete(&markdown_fix_prompt(&draft)).await
}
