use serde::Serialize;

/// Manual test instructions: prose from the catalogue, or steps from the model.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ManualTestSteps {
    Text(String),
    Steps(Vec<String>),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceLink {
    pub title: String,
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LearningContent {
    pub why_it_matters: String,
    pub wcag_guideline: String,
    pub how_to_test_manually: ManualTestSteps,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub article_links: Option<Vec<ResourceLink>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub youtube_video_links: Option<Vec<ResourceLink>>,
}
