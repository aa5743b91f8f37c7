//! Deterministic template-based article generator.
//!
//! Final link of the provider chain: no I/O, no randomness, cannot fail.
//! Assembles an article from category-keyed opening patterns, structured
//! sections with keyword substitution, and pattern-derived titles, so two
//! identical requests always yield byte-identical output.

use std::sync::Arc;

use async_trait::async_trait;

use crate::Result;
use crate::style::ReferenceArticle;
use crate::types::{GenerationRequest, StyleParameters};

use super::traits::{ArticleProvider, ProviderArticle};

/// Infallible template generator.
#[derive(Debug, Default)]
pub struct TemplateProvider;

impl TemplateProvider {
    /// Create the template provider.
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ArticleProvider for TemplateProvider {
    fn name(&self) -> &str {
        "template"
    }

    async fn generate(
        &self,
        request: &GenerationRequest,
        _style_examples: &[Arc<ReferenceArticle>],
    ) -> Result<ProviderArticle> {
        Ok(render(request))
    }
}

/// Keyword at `index`, falling back to a generic phrase when the request
/// carries fewer keywords.
fn kw<'a>(keywords: &'a [String], index: usize, default: &'a str) -> &'a str {
    keywords.get(index).map_or(default, String::as_str)
}

fn title_case(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

fn render(request: &GenerationRequest) -> ProviderArticle {
    let topic = &request.topic;
    let topic_lower = topic.to_lowercase();
    let category = &request.category;
    let keywords = &request.keywords;
    let style = request.style.clone().unwrap_or_default();

    let mut sections = vec![opening(category, &topic_lower)];

    if topic_lower.contains("what is") || matches!(category.as_str(), "Technology" | "Consumer Insights")
    {
        sections.push(what_is_section(topic, &topic_lower, keywords));
        sections.push(why_important_section(topic, &topic_lower, keywords));
    } else if category == "Futurist" || topic_lower.contains("trend") {
        sections.push(tips_trends_section(topic, &topic_lower, category, keywords));
    } else if category == "Experience" || topic_lower.contains("tips") {
        sections.push(tips_trends_section(topic, &topic_lower, category, keywords));
    } else {
        sections.push(what_is_section(topic, &topic_lower, keywords));
        sections.push(tips_trends_section(topic, &topic_lower, category, keywords));
    }

    if style.include_statistics {
        sections.push(statistics_section(topic, &topic_lower, keywords));
    }
    if style.include_case_studies {
        sections.push(case_study_section(topic, &topic_lower, keywords));
    }

    sections.push(conclusion(category, topic, &topic_lower, keywords));
    if style.include_call_to_action {
        sections.push(format!(
            "If your organization is seeking expert guidance in {topic_lower}, our team \
             offers comprehensive solutions tailored to your goals. Contact us today to \
             get started."
        ));
    }

    let body = trim_to_length(sections.join("\n\n"), &style);
    ProviderArticle {
        title: title(request, &topic_lower),
        body,
    }
}

fn opening(category: &str, topic_lower: &str) -> String {
    match category {
        "Futurist" | "Technology" => format!(
            "Customer experience is no longer just about providing good service. \
             {topic_lower} has become the cornerstone of strategy across all sectors.",
        ),
        "Marketing" | "Experience" => format!(
            "In today's digital era, {topic_lower} has become a critical strategy for \
             brands to stand out."
        ),
        _ => format!("In today's data-driven world, {topic_lower} is key to staying competitive."),
    }
}

fn what_is_section(topic: &str, topic_lower: &str, keywords: &[String]) -> String {
    format!(
        "## What Is {topic}?\n\n\
         {topic} is the strategic process of leveraging {k0} to achieve business \
         objectives. The goal is to enhance {k1}, strengthen {k2}, and drive \
         measurable business results. Ultimately, {topic_lower} aims to develop \
         lasting customer relationships.\n\n\
         What does {topic_lower} involve? It depends on the business objectives \
         and market conditions. Examples include:\n\n\
         - {e0} implementation\n\
         - {e1} optimization\n\
         - {e2} transformation\n\
         - Performance measurement and analysis\n\
         - Continuous improvement initiatives",
        k0 = kw(keywords, 0, "strategic approaches"),
        k1 = kw(keywords, 1, "customer engagement"),
        k2 = kw(keywords, 2, "brand recognition"),
        e0 = title_case(kw(keywords, 0, "strategic")),
        e1 = title_case(kw(keywords, 1, "customer")),
        e2 = title_case(kw(keywords, 2, "digital")),
    )
}

fn why_important_section(topic: &str, topic_lower: &str, keywords: &[String]) -> String {
    format!(
        "## Why Is {topic} Important?\n\n\
         Traditional methods are no longer enough to meet modern expectations. \
         Today's businesses need to create innovative {topic_lower} strategies \
         that resonate. The importance of {topic_lower} lies in its ability to \
         deliver:\n\n\
         - Enhanced {k0} across the organization\n\
         - Improved {k1} at every customer touchpoint\n\
         - Greater {k2} in crowded markets\n\
         - Competitive advantage in the market\n\
         - Long-term strategic value creation",
        k0 = kw(keywords, 0, "performance"),
        k1 = kw(keywords, 1, "efficiency"),
        k2 = kw(keywords, 2, "impact"),
    )
}

fn tips_trends_section(
    topic: &str,
    topic_lower: &str,
    category: &str,
    keywords: &[String],
) -> String {
    let trends = topic_lower.contains("trend") || category == "Futurist";
    let label = if trends { "Trends" } else { "Tips" };
    let count = if topic_lower.contains("tips") {
        7
    } else if topic_lower.contains("trends") {
        9
    } else {
        5
    };

    let items = [
        format!(
            "1. Put {k0} at the center\n\
             Organizations that lead with {k0} outperform peers on adoption and \
             retention. Start with a focused pilot and expand on evidence.",
            k0 = kw(keywords, 0, "strategy"),
        ),
        format!(
            "2. Invest in {k1} capabilities\n\
             Building internal {k1} expertise compounds. Pair practitioner training \
             with clear ownership of outcomes.",
            k1 = kw(keywords, 1, "data"),
        ),
        format!(
            "3. Rethink the {k2} journey\n\
             Map where {k2} creates or destroys value for customers, then remove \
             the friction points one by one.",
            k2 = kw(keywords, 2, "customer"),
        ),
        "4. Measure what matters\n\
         Tie every initiative to a business outcome. Vanity metrics stall programs; \
         revenue and retention sustain them."
            .to_string(),
        "5. Build for continuous change\n\
         Treat the operating model as a living system. Quarterly reviews keep \
         priorities aligned with a shifting market."
            .to_string(),
    ];

    format!("## {count} {topic} {label}\n\n{}", items.join("\n\n"))
}

fn statistics_section(topic: &str, topic_lower: &str, keywords: &[String]) -> String {
    format!(
        "## Market Indicators\n\n\
         The integration of {k0} is reshaping traditional business models. Key \
         market indicators show:\n\n\
         - Accelerated adoption: industry leaders are implementing {k1} at an \
         unprecedented pace\n\
         - Investment growth: funding in {topic_lower} initiatives has increased \
         sharply over the past two years\n\
         - Regulatory evolution: governments worldwide are adapting frameworks to \
         support {k2}\n\n\
         Together these signals point to {topic} moving from early adoption into \
         mainstream practice.",
        k0 = kw(keywords, 0, "innovative technologies"),
        k1 = kw(keywords, 1, "new solutions"),
        k2 = kw(keywords, 2, "innovation"),
    )
}

fn case_study_section(topic: &str, topic_lower: &str, keywords: &[String]) -> String {
    format!(
        "## Case in Point\n\n\
         A mid-sized enterprise recently rebuilt its {k0} program around \
         {topic_lower}. Within two quarters it saw stronger {k1} engagement and a \
         measurable lift in conversion, validating a staged rollout over a \
         big-bang launch. The lesson for {topic} adopters: sequence investments \
         behind customer-visible wins.",
        k0 = kw(keywords, 0, "digital"),
        k1 = kw(keywords, 1, "customer"),
    )
}

fn conclusion(category: &str, topic: &str, topic_lower: &str, keywords: &[String]) -> String {
    match category {
        "Marketing" => format!(
            "{topic} is more than a simple process. It is a strategic communication \
             tool that builds sustainable value."
        ),
        "Experience" => format!(
            "In a world where consumer choices are abundant, a well-planned \
             {topic_lower} strategy can set your brand apart and drive long-term \
             success."
        ),
        _ => format!(
            "{topic} goes far beyond using basic tools. It is about creating \
             meaningful connections through {elements}.",
            elements = if keywords.is_empty() {
                "innovation, strategy, and execution".to_string()
            } else {
                keywords
                    .iter()
                    .take(3)
                    .cloned()
                    .collect::<Vec<_>>()
                    .join(", ")
            },
        ),
    }
}

fn title(request: &GenerationRequest, topic_lower: &str) -> String {
    let topic = &request.topic;
    let keywords = &request.keywords;
    if topic_lower.contains("what is") {
        format!(
            "What Is {topic}? {k} Guide for {audience}",
            k = title_case(kw(keywords, 0, "strategic")),
            audience = request.target_audience,
        )
    } else if matches!(request.category.as_str(), "Futurist" | "Experience") {
        format!("{n} {topic} Trends to Watch", n = keywords.len() + 3)
    } else {
        format!(
            "{topic}: Building Better {k} for Modern Business",
            k = kw(keywords, 0, "strategies"),
        )
    }
}

/// Soft length cap: drop trailing sections once the target is exceeded,
/// keeping at least the opening.
fn trim_to_length(body: String, style: &StyleParameters) -> String {
    let Some(target) = style.target_length else {
        return body;
    };
    let mut kept = String::new();
    let mut words = 0usize;
    for (i, section) in body.split("\n\n").enumerate() {
        if i > 0 && words >= target {
            break;
        }
        if i > 0 {
            kept.push_str("\n\n");
        }
        kept.push_str(section);
        words += section.split_whitespace().count();
    }
    kept
}
