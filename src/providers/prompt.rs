//! Prompt assembly shared by the model-backed providers.

use std::sync::Arc;

use crate::style::ReferenceArticle;
use crate::types::GenerationRequest;

/// Characters of each style example included in the system prompt.
const EXAMPLE_EXCERPT_CHARS: usize = 600;

/// System prompt framing the writing task, with style-example excerpts
/// appended when any were retrieved.
pub(crate) fn build_system_prompt(style_examples: &[Arc<ReferenceArticle>]) -> String {
    let mut prompt = String::from(
        "You are a senior business trend writer producing publication-ready \
         articles for executives. Write in clear markdown with a title on \
         the first line, section headings, and a strong conclusion.",
    );
    if !style_examples.is_empty() {
        prompt.push_str(
            "\n\nMatch the voice and structure of these reference excerpts:\n",
        );
        for example in style_examples {
            let excerpt: String = example.body.chars().take(EXAMPLE_EXCERPT_CHARS).collect();
            prompt.push_str("\n---\n");
            prompt.push_str(&example.title);
            prompt.push('\n');
            prompt.push_str(&excerpt);
            prompt.push('\n');
        }
    }
    prompt
}

/// User prompt carrying the request parameters.
pub(crate) fn build_user_prompt(request: &GenerationRequest) -> String {
    let mut prompt = format!(
        "Write a professional business article about {} in the {} category. \
         Target audience: {}. Tone: {}.",
        request.topic, request.category, request.target_audience, request.tone,
    );
    if !request.keywords.is_empty() {
        prompt.push_str(&format!(" Keywords: {}.", request.keywords.join(", ")));
    }
    if let Some(style) = &request.style {
        if let Some(industry) = &style.industry {
            prompt.push_str(&format!(" Industry context: {industry}."));
        }
        if let Some(length) = style.target_length {
            prompt.push_str(&format!(" Target length: about {length} words."));
        }
        if style.include_statistics {
            prompt.push_str(" Include a section with market statistics.");
        }
        if style.include_case_studies {
            prompt.push_str(" Include an illustrative case study.");
        }
        if style.include_call_to_action {
            prompt.push_str(" Close with a call to action.");
        }
    }
    prompt
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::StyleParameters;

    #[test]
    fn user_prompt_carries_request_fields() {
        let request = GenerationRequest::new("AI in Retail", "Technology")
            .keywords(["ai", "retail"])
            .tone("Technical");
        let prompt = build_user_prompt(&request);
        assert!(prompt.contains("AI in Retail"));
        assert!(prompt.contains("Technology"));
        assert!(prompt.contains("ai, retail"));
        assert!(prompt.contains("Technical"));
    }

    #[test]
    fn style_parameters_extend_the_prompt() {
        let request = GenerationRequest::new("t", "c").style(StyleParameters {
            industry: Some("fintech".into()),
            target_length: Some(800),
            include_statistics: true,
            include_case_studies: false,
            include_call_to_action: true,
        });
        let prompt = build_user_prompt(&request);
        assert!(prompt.contains("fintech"));
        assert!(prompt.contains("800 words"));
        assert!(prompt.contains("statistics"));
        assert!(!prompt.contains("case study"));
        assert!(prompt.contains("call to action"));
    }

    #[test]
    fn system_prompt_includes_example_excerpts() {
        let example = Arc::new(ReferenceArticle {
            id: "r1".into(),
            category: "Marketing".into(),
            title: "Brand Storytelling".into(),
            body: "body text".into(),
            tags: vec![],
        });
        let with = build_system_prompt(&[example]);
        assert!(with.contains("Brand Storytelling"));
        let without = build_system_prompt(&[]);
        assert!(!without.contains("reference excerpts"));
    }
}
