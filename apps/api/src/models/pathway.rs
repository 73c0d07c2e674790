use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

/// A labelled link to an official government or institution page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OfficialLink {
    pub label: String,
    pub url: String,
}

/// One recommended immigration route.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pathway {
    pub title: String,
    pub best_for: String,
    pub difficulty: Difficulty,
    pub timeline: String,
    pub estimated_cost: String,
    pub steps: Vec<String>,
    pub requirements: Vec<String>,
    pub documents: Vec<String>,
    pub official_links: Vec<OfficialLink>,
    pub warnings: Vec<String>,
    pub next_actions: Vec<String>,
}

/// The model's full answer, returned to the client unchanged once it passes
/// shape validation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathwayResponse {
    pub summary: String,
    pub pathways: Vec<Pathway>,
}
