//! 生成创意所用的提示词

use crate::types::idea::ContentCategory;

/// 直接生成模式写入prompt的历史创意上限
pub const DIRECT_PRIOR_IDEAS_LIMIT: usize = 20;

/// 直接生成模式写入prompt的调研片段上限
pub const DIRECT_RESEARCH_LIMIT: usize = 5;

pub const DIRECT_SYSTEM_PROMPT: &str = "Always respond with valid JSON only.";

pub const REGENERATE_SYSTEM_PROMPT: &str = "Return only the improved post text (no JSON).";

/// Agent模式的系统提示词
pub fn agent_system_prompt() -> String {
    let categories = ContentCategory::ALL
        .iter()
        .map(|category| format!("- {}: {}", category.label(), category_example(*category)))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        r#"You are a content strategist who writes LinkedIn post drafts for a professional audience of founders, engineers and product people.
Every post belongs to exactly one of these content categories:
{categories}

You may call the research tool with a short query when a fact or example would make the post stronger. Keep tool use brief.

Output rules:
- When you are done, output ONLY a compact JSON object. No markdown, no backticks, no commentary.
- The object must have exactly these keys: name, idea, title, text, image.
- name: short series name (2-3 words)
- idea: the central angle, starting with the category label followed by a colon (e.g. "Case study: ...")
- title: short and descriptive hook
- text: the LinkedIn post content
- image: a concise visual description for an illustration"#
    )
}

fn category_example(category: ContentCategory) -> &'static str {
    match category {
        ContentCategory::TimelessPrinciple => {
            "a durable lesson that stays true for years (e.g. \"clarity beats cleverness\")"
        }
        ContentCategory::CaseStudy => {
            "a concrete story of a team or company and what happened (e.g. \"how a startup cut churn by fixing onboarding\")"
        }
        ContentCategory::GrowthHack => {
            "a specific, actionable tactic readers can try this week (e.g. \"turn support replies into a public FAQ\")"
        }
        ContentCategory::ControversialTopic => {
            "a respectful but opinionated take that invites debate (e.g. \"daily standups waste senior engineers' time\")"
        }
    }
}

/// 过滤空创意并截取前 `limit` 条，以分号拼接；没有历史时返回 `none`
pub fn join_prior_ideas<S: AsRef<str>>(prior_ideas: &[S], limit: usize) -> String {
    let used: Vec<&str> = prior_ideas
        .iter()
        .map(AsRef::as_ref)
        .filter(|idea| !idea.trim().is_empty())
        .take(limit)
        .collect();

    if used.is_empty() {
        "none".to_string()
    } else {
        used.join("; ")
    }
}

/// Agent模式的任务提示词
pub fn agent_task_prompt<S: AsRef<str>>(
    prior_ideas: &[S],
    limit: usize,
    category: ContentCategory,
    topic: Option<&str>,
) -> String {
    let mut prompt = String::new();

    prompt.push_str("Write one new LinkedIn post draft. Avoid repeating prior ideas.\n");
    prompt.push_str(&format!(
        "Previously used ideas: {}.\n",
        join_prior_ideas(prior_ideas, limit)
    ));
    prompt.push_str(&format!(
        "Target category: {} (it is the least used so far). Start the idea field with \"{}:\".\n",
        category.label(),
        category.label()
    ));
    if let Some(topic) = topic {
        prompt.push_str(&format!("Focus topic: {}.\n", topic));
    }
    prompt.push_str("Return ONLY the JSON object with keys name, idea, title, text, image.");

    prompt
}

/// 直接生成模式的单条prompt
pub fn direct_prompt<S: AsRef<str>>(
    prior_ideas: &[S],
    topic: Option<&str>,
    research_snippets: &[String],
) -> String {
    let mut lines = vec![
        "You are an assistant that generates unique LinkedIn post drafts.".to_string(),
        "Return ONLY a compact JSON object with keys: name, idea, title, text, image. No markdown, no backticks.".to_string(),
        "Constraints:".to_string(),
        format!(
            "- Avoid repeating any of these previously used ideas: {}",
            join_prior_ideas(prior_ideas, DIRECT_PRIOR_IDEAS_LIMIT)
        ),
        "- Keep tone helpful and concise.".to_string(),
        "- Target professional audience.".to_string(),
    ];

    let research: Vec<&str> = research_snippets
        .iter()
        .take(DIRECT_RESEARCH_LIMIT)
        .map(String::as_str)
        .collect();
    if !research.is_empty() {
        lines.push(format!("Inspiration from research: {}", research.join(" | ")));
    }
    if let Some(topic) = topic {
        lines.push(format!("Focus topic: {}", topic));
    }

    lines.join("\n")
}

/// 正文改写的prompt
pub fn regenerate_prompt(title: &str, text: &str) -> String {
    format!(
        "Improve and tighten this LinkedIn post while preserving the author's voice. Title: {}\n\nPost:\n{}",
        title, text
    )
}
