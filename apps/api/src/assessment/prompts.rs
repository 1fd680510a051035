// Prompt for the narrative classification call. The model only decorates the
// score vector; the label it returns is checked against the fixed set.

use crate::assessment::definitions::AssessmentDefinition;
use crate::assessment::scoring::ScoreVector;

pub const CLASSIFY_PROMPT: &str = r#"A user completed the "{title}" assessment.
Their dimension scores on a 0-100 scale are:
{scores}

Classify them into exactly ONE of these labels: {labels}.

Return a JSON object with this exact shape:
{
  "label": "<one of the labels above, spelled exactly>",
  "interpretation": "<two or three sentences addressed to the user>",
  "strengths": ["<short phrase>", ...],
  "growth_areas": ["<short phrase>", ...],
  "recommendations": ["<short actionable suggestion>", ...]
}

Base every statement on the scores above. Keep each list to at most four items."#;

pub fn build_classify_prompt(definition: &AssessmentDefinition, scores: &ScoreVector) -> String {
    let score_lines = scores
        .iter()
        .map(|(dimension, score)| format!("- {dimension}: {score:.1}"))
        .collect::<Vec<_>>()
        .join("\n");

    CLASSIFY_PROMPT
        .replace("{title}", definition.title)
        .replace("{scores}", &score_lines)
        .replace("{labels}", &definition.labels.join(", "))
}
