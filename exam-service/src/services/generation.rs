//! Question-generation orchestrators.
//!
//! Stateless: build a task-specific prompt, run it through the retrying
//! generator, interpret the response as free text. Persistence is the
//! caller's job and happens only after a successful result.

use service_core::genai::invoker::TextGenerator;
use service_core::genai::response::{Extracted, ResponseShape};
use service_core::genai::GenAiError;

/// Rephrase one question so it still fits the paper it belongs to.
pub async fn rephrase_question(
    generator: &TextGenerator,
    document_context: &str,
    original: &str,
    extra_instruction: Option<&str>,
) -> Result<String, GenAiError> {
    let mut prompt = format!(
        r#"You are an academic assistant designing an exam.

**Full Document Context:**
"{document_context}"

**Task:**
Rephrase the following single question. The new question must adhere to these primary rules:
1. Be conceptually similar to the original.
2. Use different wording and sentence structure.
3. Fit naturally within the context of the full document provided above.
4. Be a clear, direct question.
"#
    );

    if let Some(instruction) = extra_instruction {
        prompt.push_str(&format!(
            "\n**HIGH-PRIORITY INSTRUCTION:** You must also follow this specific instruction: \"{instruction}\"\n"
        ));
    }

    prompt.push_str(&format!(
        r#"
**Original Question to Rephrase:**
"{original}"

**New Question:**
"#
    ));

    let raw = generator.generate(&prompt).await?;
    let Extracted::Text(text) = ResponseShape::FreeText.parse(&raw)? else {
        return Err(GenAiError::EmptyText);
    };
    Ok(text)
}

/// Generate one new question covering the paper's material without
/// rephrasing any existing question.
pub async fn new_question_from_context(
    generator: &TextGenerator,
    document_context: &str,
) -> Result<String, GenAiError> {
    let prompt = format!(
        r#"You are an academic assistant designing an exam.

**Existing Questions in Document:**
"{document_context}"

**Task:**
Analyze the existing questions and generate one completely new question that is relevant to the topics covered but is NOT a rephrase of any existing question.
The new question should explore a related concept or test the material in a different way.

**New Question:**
"#
    );

    let raw = generator.generate(&prompt).await?;
    let Extracted::Text(text) = ResponseShape::FreeText.parse(&raw)? else {
        return Err(GenAiError::EmptyText);
    };
    Ok(text)
}
