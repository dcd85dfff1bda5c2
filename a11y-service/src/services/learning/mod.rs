//! Learning content: static catalogue lookup and AI-generated lessons.

pub mod catalog;

use crate::models::{Issue, LearningContent, ManualTestSteps, ResourceLink};
use crate::services::providers::{complete_json, ChatProvider, ChatRequest, ProviderError};
use crate::services::reply::{array, string_list, text, text_or_empty};
use catalog::CatalogEntry;
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;
use service_core::error::AppError;
use std::sync::Arc;

const SYSTEM_PROMPT: &str = "You are an expert accessibility educator specializing in WCAG 2.1/2.2 guidelines. Your role is to help developers understand accessibility issues by providing comprehensive, clear, and actionable educational content. You always provide real, accessible article URLs and YouTube video URLs when suggesting resources.";

const TEMPERATURE: f32 = 0.7;
const MAX_TOKENS: u32 = 3000;
const EXCLUDED_ARTICLE_DOMAIN: &str = "a11yproject.com";

static YOUTUBE_URL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)^https?://(?:(?:www\.)?youtube\.com/(?:watch\?v=|embed/|v/|playlist\?list=)|youtu\.be/)[\w-]+",
    )
    .expect("valid youtube pattern")
});

/// A WCAG success criterion and the catalogue entry its findings map to.
struct CriterionRule {
    criterion: [u8; 3],
    /// Extra substrings that also select this rule (technique ids).
    aliases: &'static [&'static str],
    resolve: fn(&str) -> &'static str,
}

fn heading_or_form_label(code: &str) -> &'static str {
    let mentions_heading = contains_any(code, &["heading", "h1", "h2", "h3"]);
    if !mentions_heading && contains_any(code, &["form", "label", "input"]) {
        "form-label"
    } else {
        "heading-order"
    }
}

fn button_or_aria(code: &str) -> &'static str {
    if code.contains("aria") && !contains_any(code, &["button", "btn"]) {
        "aria-usage"
    } else {
        "button-name"
    }
}

const fn rule(criterion: [u8; 3], resolve: fn(&str) -> &'static str) -> CriterionRule {
    CriterionRule {
        criterion,
        aliases: &[],
        resolve,
    }
}

fn image_alt(_: &str) -> &'static str {
    "image-alt"
}

fn color_contrast(_: &str) -> &'static str {
    "color-contrast"
}

fn keyboard_access(_: &str) -> &'static str {
    "keyboard-access"
}

fn link_name(_: &str) -> &'static str {
    "link-name"
}

fn focus_visible(_: &str) -> &'static str {
    "focus-visible"
}

fn language_attribute(_: &str) -> &'static str {
    "language-attribute"
}

fn form_label(_: &str) -> &'static str {
    "form-label"
}

const CRITERION_RULES: &[CriterionRule] = &[
    rule([1, 1, 1], image_alt),
    rule([1, 3, 1], heading_or_form_label),
    CriterionRule {
        criterion: [1, 4, 3],
        aliases: &["g18"],
        resolve: color_contrast,
    },
    rule([2, 1, 1], keyboard_access),
    rule([2, 4, 4], link_name),
    rule([2, 4, 7], focus_visible),
    rule([3, 1, 1], language_attribute),
    rule([3, 3, 2], form_label),
    rule([4, 1, 2], button_or_aria),
];

/// `principleX.guidelineX_Y.Z` style references, one pattern per rule.
static PRINCIPLE_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    CRITERION_RULES
        .iter()
        .map(|rule| {
            let [p, g, c] = rule.criterion;
            Regex::new(&format!(
                "principle{p}[._-]guideline{p}[._-]{g}[._-]{c}"
            ))
            .expect("valid principle pattern")
        })
        .collect()
});

/// Keyword fallbacks tried after criterion matching, in order.
const KEYWORD_FALLBACKS: &[(&[&str], &str)] = &[
    (&["image", "img"], "image-alt"),
    (&["link", "a "], "link-name"),
    (&["heading", "h1", "h2"], "heading-order"),
    (&["color", "contrast"], "color-contrast"),
    (&["form", "label", "input"], "form-label"),
];

fn contains_any(haystack: &str, needles: &[&str]) -> bool {
    needles.iter().any(|needle| haystack.contains(needle))
}

fn mentions_criterion(code: &str, rule: &CriterionRule, pattern: &Regex) -> bool {
    let [p, g, c] = rule.criterion;
    ["_", ".", "-"]
        .iter()
        .any(|sep| code.contains(&format!("{p}{sep}{g}{sep}{c}")))
        || pattern.is_match(code)
        || contains_any(code, rule.aliases)
}

fn content_from(entry: &CatalogEntry) -> LearningContent {
    LearningContent {
        why_it_matters: entry.why_it_matters.to_string(),
        wcag_guideline: entry.wcag_guideline.to_string(),
        how_to_test_manually: ManualTestSteps::Text(entry.how_to_test_manually.to_string()),
        article_links: None,
        youtube_video_links: None,
    }
}

/// Resolve a scanner code (or catalogue key) to a catalogue entry.
///
/// Tries the exact key, then substring overlap with a key, then the WCAG
/// criterion the code references, then loose keywords.
pub fn lookup_entry(code: &str) -> Option<&'static CatalogEntry> {
    let code = code.trim().to_lowercase();

    if let Some(entry) = catalog::entry(&code) {
        return Some(entry);
    }

    if let Some(entry) = catalog::CATALOG
        .iter()
        .find(|entry| code.contains(entry.key) || entry.key.contains(code.as_str()))
    {
        return Some(entry);
    }

    let by_criterion = CRITERION_RULES
        .iter()
        .zip(PRINCIPLE_PATTERNS.iter())
        .find(|(rule, pattern)| mentions_criterion(&code, rule, pattern))
        .map(|(rule, _)| (rule.resolve)(&code));

    let key = by_criterion.or_else(|| {
        KEYWORD_FALLBACKS
            .iter()
            .find(|(keywords, _)| contains_any(&code, keywords))
            .map(|(_, key)| *key)
    })?;

    catalog::entry(key)
}

pub fn lookup(code: &str) -> Option<LearningContent> {
    lookup_entry(code).map(content_from)
}

pub fn is_youtube_url(url: &str) -> bool {
    YOUTUBE_URL.is_match(url)
}

fn resource_from(value: &Value) -> Option<ResourceLink> {
    Some(ResourceLink {
        title: text(value, "title")?,
        url: text(value, "url")?,
        description: text(value, "description"),
    })
}

/// Shape a model reply, keeping only usable links.
pub fn parse_reply(parsed: &Value) -> LearningContent {
    let how_to_test = match parsed.get("howToTestManually") {
        Some(Value::Array(_)) => {
            ManualTestSteps::Steps(string_list(parsed, "howToTestManually").unwrap_or_default())
        }
        _ => ManualTestSteps::Text(text_or_empty(parsed, "howToTestManually")),
    };

    let article_links = array(parsed, "articleLinks")
        .iter()
        .filter_map(resource_from)
        .filter(|link| {
            (link.url.starts_with("http://") || link.url.starts_with("https://"))
                && !link.url.contains(EXCLUDED_ARTICLE_DOMAIN)
        })
        .collect();

    let youtube_video_links = array(parsed, "youtubeVideoLinks")
        .iter()
        .filter_map(resource_from)
        .filter(|link| is_youtube_url(&link.url))
        .collect();

    LearningContent {
        why_it_matters: text_or_empty(parsed, "whyItMatters"),
        wcag_guideline: text_or_empty(parsed, "wcagGuideline"),
        how_to_test_manually: how_to_test,
        article_links: Some(article_links),
        youtube_video_links: Some(youtube_video_links),
    }
}

pub fn build_prompt(issue: &Issue) -> String {
    let context = if issue.context.is_empty() {
        "N/A"
    } else {
        issue.context.as_str()
    };

    format!(
        r#"Generate comprehensive learning content for the following accessibility issue. Your response should help developers understand why this issue matters, what WCAG guidelines apply, and how to test it manually.

Accessibility Issue:
- Code: {code}
- Message: {message}
- Context: {context}
- Type: {issue_type}

Provide the response in the following JSON format:

{{
  "whyItMatters": "A clear, detailed explanation (2-3 paragraphs) of why this accessibility issue matters. Explain the impact on users, particularly those using assistive technologies. Be specific about how this barrier affects real users.",
  "wcagGuideline": "Detailed WCAG guideline information including the specific success criterion number and name (e.g., 'WCAG 2.1 Success Criterion 1.1.1 (Level A): Non-text Content'). Include the level (A, AA, or AAA) and provide context about what the guideline requires.",
  "howToTestManually": "Step-by-step instructions (numbered list) on how to manually test this issue. Include multiple testing methods such as screen reader testing, keyboard navigation, browser DevTools inspection, and visual inspection. Make it actionable for developers.",
  "articleLinks": [
    {{
      "title": "Article title",
      "url": "Full URL to the article (must be a real, accessible article from reputable sources like MDN, WebAIM, W3C, A11Y Project, etc.)",
      "description": "Brief description of what the article covers"
    }}
  ],
  "youtubeVideoLinks": [
    {{
      "title": "Video title",
      "url": "Full YouTube URL starting with https://www.youtube.com/watch?v=, https://youtu.be/, or https://www.youtube.com/playlist?list= (must be a real, accessible YouTube video or playlist)",
      "description": "Brief description of what the video teaches"
    }}
  ]
}}

IMPORTANT REQUIREMENTS:
- Provide 1-2 high-quality article links from reputable sources (MDN Web Docs, WebAIM, W3C WAI, A11y Wins, etc.)
- DO NOT include articles from https://www.a11yproject.com/ - exclude this domain from recommendations
- All URLs must be real and accessible (do not make up URLs)
- YouTube URLs must be in the format: https://www.youtube.com/watch?v=VIDEO_ID or https://youtu.be/VIDEO_ID
- YouTube playlist URLs are also acceptable: https://www.youtube.com/playlist?list=PLAYLIST_ID
- All URLs must start with http:// or https://
- Highly recommended article resources (prioritize these when relevant):
  * https://www.w3.org/WAI/ARIA/apg/ - ARIA Authoring Practices Guide (excellent for ARIA patterns and widgets)
- Suggested YouTube videos for accessibility education (use when relevant):
  * https://www.youtube.com/watch?v=pIvX0J6_3GU
  * https://www.youtube.com/watch?v=UaRAXFT_rwk
  * https://www.youtube.com/watch?v=RjpvOqZigao
  * https://www.youtube.com/watch?v=NEK3aMPs1Us
  * https://www.youtube.com/watch?v=e2nkq3h1P68
  * https://www.youtube.com/playlist?list=PLsvet3tE97XcMTCT6U_tZKkGYIn0qeRuD
  * https://www.youtube.com/playlist?list=PLsvet3tE97XetxAvwTeG8ttKggrbG6Tm1
- Focus on educational content that helps developers learn and understand
- Make the content practical and actionable
- Use clear, developer-friendly language
- Ensure all JSON is valid and properly formatted"#,
        code = issue.code,
        message = issue.message,
        issue_type = issue.issue_type.as_str(),
    )
}

#[derive(Clone)]
pub struct LearningService {
    provider: Arc<dyn ChatProvider>,
}

impl LearningService {
    pub fn new(provider: Arc<dyn ChatProvider>) -> Self {
        Self { provider }
    }

    /// AI lesson for `issue`. Falls back to the catalogue when the model call
    /// fails, but not when no key is configured.
    pub async fn generate(&self, issue: &Issue) -> Result<LearningContent, AppError> {
        if !self.provider.is_configured() {
            return Err(AppError::InternalError(ProviderError::NotConfigured.into()));
        }

        let request = ChatRequest::json(SYSTEM_PROMPT, build_prompt(issue), TEMPERATURE, MAX_TOKENS);
        match complete_json(self.provider.as_ref(), "learning", &request).await {
            Ok(parsed) => Ok(parse_reply(&parsed)),
            Err(e) => {
                tracing::error!(code = %issue.code, error = %e, "AI learning content error");
                lookup(&issue.code).ok_or_else(|| {
                    AppError::InternalError(anyhow::anyhow!(
                        "Failed to generate learning content: {}",
                        e
                    ))
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::providers::mock::MockChatProvider;
    use serde_json::json;

    fn key_for(code: &str) -> Option<&'static str> {
        lookup_entry(code).map(|entry| entry.key)
    }

    #[test]
    fn catalogue_has_ten_entries() {
        assert_eq!(catalog::CATALOG.len(), 10);
        assert!(catalog::entry("language-attribute").is_some());
    }

    #[test]
    fn exact_and_partial_keys() {
        assert_eq!(key_for("  Image-Alt "), Some("image-alt"));
        assert_eq!(key_for("axe.color-contrast.enhanced"), Some("color-contrast"));
        assert_eq!(key_for("focus"), Some("focus-visible"));
        // Every key contains the empty string, so a blank code takes the first entry.
        assert_eq!(key_for(""), Some("image-alt"));
        assert_eq!(key_for("   "), Some("image-alt"));
    }

    #[test]
    fn pa11y_codes_resolve_by_criterion() {
        assert_eq!(
            key_for("WCAG2AA.Principle1.Guideline1_1.1_1_1.H37"),
            Some("image-alt")
        );
        assert_eq!(
            key_for("WCAG2AA.Principle1.Guideline1_4.1_4_3.G18.Fail"),
            Some("color-contrast")
        );
        assert_eq!(
            key_for("WCAG2AA.Principle2.Guideline2_4.2_4_4.H77,H78,H79,H80,H81"),
            Some("link-name")
        );
        assert_eq!(
            key_for("WCAG2AA.Principle3.Guideline3_1.3_1_1.H57.2"),
            Some("language-attribute")
        );
        assert_eq!(
            key_for("WCAG2AA.Principle1.Guideline1_3.1_3_1.F68"),
            Some("heading-order")
        );
        assert_eq!(
            key_for("WCAG2AA.Principle1.Guideline1_3.1_3_1.H44.NonExistentFragment.Label"),
            Some("form-label")
        );
        assert_eq!(
            key_for("WCAG2AA.Principle4.Guideline4_1.4_1_2.H91.A.EmptyNoId"),
            Some("button-name")
        );
        assert_eq!(key_for("4.1.2 aria-hidden"), Some("aria-usage"));
    }

    #[test]
    fn keyword_fallback_and_miss() {
        assert_eq!(key_for("img-redundant"), Some("image-alt"));
        assert_eq!(key_for("low-contrast-text"), Some("color-contrast"));
        assert_eq!(key_for("html-has-lang-x"), None);
    }

    #[test]
    fn static_content_has_no_links() {
        let content = lookup("image-alt").unwrap();
        assert!(content.why_it_matters.starts_with("Images without alternative text"));
        assert!(content.article_links.is_none());
        assert!(matches!(content.how_to_test_manually, ManualTestSteps::Text(_)));
    }

    #[test]
    fn youtube_patterns() {
        assert!(is_youtube_url("https://www.youtube.com/watch?v=pIvX0J6_3GU"));
        assert!(is_youtube_url("https://youtube.com/watch?v=abc&utm_source=x"));
        assert!(is_youtube_url("http://youtu.be/UaRAXFT_rwk"));
        assert!(is_youtube_url("https://www.youtube.com/embed/RjpvOqZigao"));
        assert!(is_youtube_url("https://www.youtube.com/v/NEK3aMPs1Us"));
        assert!(is_youtube_url(
            "https://www.youtube.com/playlist?list=PLsvet3tE97XcMTCT6U_tZKkGYIn0qeRuD"
        ));
        assert!(!is_youtube_url("https://vimeo.com/123"));
        assert!(!is_youtube_url("https://www.youtube.com/channel/UC123"));
        assert!(!is_youtube_url("youtube.com/watch?v=abc"));
    }

    #[test]
    fn reply_links_are_filtered() {
        let reply = json!({
            "whyItMatters": "Because.",
            "wcagGuideline": "WCAG 2.1 SC 1.1.1",
            "howToTestManually": ["Open a screen reader", "Tab through images"],
            "articleLinks": [
                { "title": "MDN", "url": "https://developer.mozilla.org/alt" },
                { "title": "Project", "url": "https://www.a11yproject.com/posts/alt" },
                { "title": "Relative", "url": "/docs/alt" },
                { "url": "https://webaim.org/techniques/alttext/" }
            ],
            "youtubeVideoLinks": [
                { "title": "Alt text", "url": "https://youtu.be/UaRAXFT_rwk", "description": "Basics" },
                { "title": "Elsewhere", "url": "https://example.com/video" }
            ]
        });

        let content = parse_reply(&reply);

        assert_eq!(
            content.how_to_test_manually,
            ManualTestSteps::Steps(vec![
                "Open a screen reader".into(),
                "Tab through images".into()
            ])
        );
        let articles = content.article_links.unwrap();
        assert_eq!(articles.len(), 1);
        assert_eq!(articles[0].title, "MDN");
        let videos = content.youtube_video_links.unwrap();
        assert_eq!(videos.len(), 1);
        assert_eq!(videos[0].description.as_deref(), Some("Basics"));
    }

    fn issue(code: &str) -> Issue {
        Issue {
            code: code.into(),
            message: "Img element missing an alt attribute.".into(),
            selector: "img".into(),
            ..Issue::default()
        }
    }

    #[tokio::test]
    async fn model_failure_falls_back_to_catalogue() {
        let provider = Arc::new(MockChatProvider::new(true));
        provider.push_reply("not json");
        let service = LearningService::new(provider);

        let content = service.generate(&issue("image-alt")).await.unwrap();
        assert!(content.article_links.is_none());
        assert!(content.why_it_matters.starts_with("Images without alternative text"));
    }

    #[tokio::test]
    async fn model_failure_without_catalogue_match_is_an_error() {
        let provider = Arc::new(MockChatProvider::new(true));
        provider.push_error(ProviderError::RateLimited);
        let service = LearningService::new(provider);

        let err = service.generate(&issue("html-has-lang-x")).await.unwrap_err();
        assert!(err
            .to_string()
            .contains("Failed to generate learning content: OpenAI API rate limit exceeded"));
    }

    #[tokio::test]
    async fn missing_key_does_not_fall_back() {
        let service = LearningService::new(Arc::new(MockChatProvider::new(false)));
        let err = service.generate(&issue("image-alt")).await.unwrap_err();
        assert!(err.to_string().contains("OpenAI API key is not configured"));
    }

    #[tokio::test]
    async fn model_reply_is_used_when_valid() {
        let provider = Arc::new(MockChatProvider::new(true));
        provider.push_reply(r#"{"whyItMatters": "AI text", "howToTestManually": "1. Look"}"#);
        let service = LearningService::new(provider.clone());

        let content = service.generate(&issue("image-alt")).await.unwrap();
        assert_eq!(content.why_it_matters, "AI text");
        assert_eq!(content.article_links, Some(vec![]));
        assert_eq!(provider.requests()[0].max_tokens, 3000);
    }
}
