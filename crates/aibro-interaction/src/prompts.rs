//! Prompt templates for the ranking oracle.
//!
//! Templates are Jinja2 (rendered with `minijinja`) and take a typed request
//! struct as their context.

use aibro_core::catalog::Announcement;
use aibro_core::oracle::OracleError;
use aibro_core::profile::UserProfile;
use minijinja::Environment;
use serde::Serialize;

/// System instruction sent with every ranking request.
pub const RANKING_SYSTEM_INSTRUCTION: &str = "\
You are 'AI Bro', an expert on government policy funds for small-business owners.
From the announcements provided, recommend the TOP 3 that best fit the owner's business profile.

Rules:
1. The score is between 0 and 100 and expresses how well the owner and the announcement fit. State clearly that it is NOT a loan approval probability.
2. Write each reason as a factual comparison, e.g. \"The owner is A, while this program requires B\".
3. For every recommendation, produce 3 to 5 \"needs confirmation\" checklist items.
4. If the region does not match or information is missing, describe it honestly in the risk note.
5. Exaggerated claims (\"guaranteed approval\", \"100% certain\") are forbidden.";

/// System instruction for title summarization.
pub const TITLE_SYSTEM_INSTRUCTION: &str =
    "Return only one short title that summarizes the chat. No quotes, no punctuation around it.";

const RANKING_TEMPLATE: &str = r#"Business profile: {{ profile_json }}

Candidate announcements:
{% for candidate in candidates -%}
[ID: {{ candidate.policy_id }}] {{ candidate.title }}: {{ candidate.content }}
{% if not loop.last %}
{% endif %}
{%- endfor %}"#;

const TITLE_TEMPLATE: &str =
    r#"Write a chat title of at most {{ max_chars }} characters. First message: "{{ first_message }}""#;

/// Maximum title length requested from the oracle.
pub const TITLE_MAX_CHARS: usize = 10;

#[derive(Debug, Serialize)]
struct CandidateLine<'a> {
    policy_id: &'a str,
    title: &'a str,
    content: &'a str,
}

/// Context of [`RANKING_TEMPLATE`].
#[derive(Debug, Serialize)]
struct RankingRequest<'a> {
    profile_json: String,
    candidates: Vec<CandidateLine<'a>>,
}

/// Context of [`TITLE_TEMPLATE`].
#[derive(Debug, Serialize)]
struct TitleRequest<'a> {
    first_message: &'a str,
    max_chars: usize,
}

fn environment() -> Result<Environment<'static>, OracleError> {
    let mut env = Environment::new();
    env.add_template("ranking", RANKING_TEMPLATE)
        .map_err(template_error)?;
    env.add_template("title", TITLE_TEMPLATE)
        .map_err(template_error)?;
    Ok(env)
}

fn template_error(err: minijinja::Error) -> OracleError {
    OracleError::Config(format!("prompt template error: {err}"))
}

/// Renders the user turn of a ranking request.
pub fn render_ranking_prompt(
    profile: &UserProfile,
    candidates: &[Announcement],
) -> Result<String, OracleError> {
    let profile_json = serde_json::to_string(profile)
        .map_err(|e| OracleError::Config(format!("failed to encode profile: {e}")))?;
    let request = RankingRequest {
        profile_json,
        candidates: candidates
            .iter()
            .map(|c| CandidateLine {
                policy_id: &c.policy_id,
                title: &c.title,
                content: &c.content,
            })
            .collect(),
    };

    let env = environment()?;
    env.get_template("ranking")
        .and_then(|t| t.render(&request))
        .map_err(template_error)
}

/// Renders the title summarization request for a first user message.
pub fn render_title_prompt(first_message: &str) -> Result<String, OracleError> {
    let request = TitleRequest {
        first_message,
        max_chars: TITLE_MAX_CHARS,
    };
    let env = environment()?;
    env.get_template("title")
        .and_then(|t| t.render(&request))
        .map_err(template_error)
}

#[cfg(test)]
mod tests {
    use super::*;
    use aibro_core::catalog::Catalog;
    use serde_json::json;

    fn candidates() -> Vec<Announcement> {
        Catalog::from_raw(&[
            json!({"policy_id": "L001", "title": "Market Loan", "content": "Low-rate loans."}),
            json!({"policy_id": "Y001", "title": "Tech Guarantee", "content": "No collateral."}),
        ])
        .items()
        .to_vec()
    }

    #[test]
    fn test_ranking_prompt_lists_candidates() {
        let prompt = render_ranking_prompt(&UserProfile::placeholder(), &candidates()).unwrap();

        assert!(prompt.starts_with("Business profile: {\"region\":\"nationwide\""));
        assert!(prompt.contains("[ID: L001] Market Loan: Low-rate loans."));
        assert!(prompt.contains("[ID: Y001] Tech Guarantee: No collateral."));
        let first = prompt.find("[ID: L001]").unwrap();
        let second = prompt.find("[ID: Y001]").unwrap();
        assert!(first < second);
    }

    #[test]
    fn test_ranking_prompt_without_candidates() {
        let prompt = render_ranking_prompt(&UserProfile::placeholder(), &[]).unwrap();
        assert!(!prompt.contains("[ID:"));
    }

    #[test]
    fn test_title_prompt() {
        let prompt = render_title_prompt("I need working capital").unwrap();
        assert_eq!(
            prompt,
            "Write a chat title of at most 10 characters. First message: \"I need working capital\""
        );
    }

    #[test]
    fn test_system_instruction_forbids_guarantees() {
        assert!(RANKING_SYSTEM_INSTRUCTION.contains("NOT a loan approval probability"));
        assert!(RANKING_SYSTEM_INSTRUCTION.contains("3 to 5"));
    }
}
