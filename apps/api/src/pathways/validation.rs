
use crate::models::pathway::PathwayResponse;

/// The prompt asks for this many pathways. Counts outside it are tolerated.
pub const EXPECTED_PATHWAYS: std::ops::RangeInclusive<usize> = 3..=6;

#[derive(Debug, Clone)]
pub struct ShapeValidation {
    pub passed: bool,
    /// Problems that make the response unusable by the results page.
    pub problems: Vec<String>,
    /// Deviations from the prompt that the results page can still render.
    pub warnings: Vec<String>,
}

/// Checks a deserialized model response beyond what the type system enforces.
///
/// FAIL conditions:
/// - blank `summary`
/// - no pathways at all
/// - a pathway with a blank `title`
///
/// WARN conditions:
/// - pathway count outside 3–6
/// - a pathway with no steps or no official links
/// - an official link whose url is not http(s)
pub fn validate_shape(response: &PathwayResponse) -> ShapeValidation {
    let mut problems = Vec::new();
    let mut warnings = Vec::new();

    if response.summary.trim().is_empty() {
        problems.push("summary is empty".to_string());
    }

    if response.pathways.is_empty() {
        problems.push("pathways is empty".to_string());
    } else if !EXPECTED_PATHWAYS.contains(&response.pathways.len()) {
        warnings.push(format!(
            "expected {}-{} pathways, got {}",
            EXPECTED_PATHWAYS.start(),
            EXPECTED_PATHWAYS.end(),
            response.pathways.len()
        ));
    }

    for (i, pathway) in response.pathways.iter().enumerate() {
        if pathway.title.trim().is_empty() {
            problems.push(format!("pathways[{i}].title is empty"));
        }
        if pathway.steps.is_empty() {
            warnings.push(format!("pathways[{i}] has no steps"));
        }
        if pathway.official_links.is_empty() {
            warnings.push(format!("pathways[{i}] has no official links"));
        }
        for (j, link) in pathway.official_links.iter().enumerate() {
            let url = link.url.trim();
            if !(url.starts_with("https://") || url.starts_with("http://")) {
                warnings.push(format!(
                    "pathways[{i}].official_links[{j}] is not an http(s) url"
                ));
            }
        }
    }

    ShapeValidation {
        passed: problems.is_empty(),
        problems,
        warnings,
    }
}
