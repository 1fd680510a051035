//! Kind-specific extras attached to an assessment result: the work-style
//! descriptor profile with career suggestions, and the empathy summary.

use serde::{Deserialize, Serialize};

use crate::assessment::definitions::{
    AGREEABLENESS, CONSCIENTIOUSNESS, EXTRAVERSION, NEUROTICISM, OPENNESS,
};
use crate::assessment::scoring::ScoreVector;

const MAX_SUGGESTIONS: usize = 5;
const FALLBACK_CAREERS: &[&str] = &["Full-Stack Developer", "Business Analyst", "Project Manager"];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkStyleProfile {
    pub social_style: String,
    pub work_approach: String,
    pub learning_style: String,
    pub team_role: String,
    pub stress_management: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AssessmentDetails {
    WorkStyle {
        profile: WorkStyleProfile,
        career_suggestions: Vec<String>,
    },
    Empathy {
        empathy_score: f64,
        empathy_level: String,
    },
}

pub fn work_style_details(scores: &ScoreVector) -> AssessmentDetails {
    AssessmentDetails::WorkStyle {
        profile: work_style_profile(scores),
        career_suggestions: career_suggestions(scores),
    }
}

pub fn empathy_details(scores: &ScoreVector) -> AssessmentDetails {
    let empathy_score = scores.mean();
    AssessmentDetails::Empathy {
        empathy_score,
        empathy_level: empathy_level(empathy_score).to_string(),
    }
}

fn band(score: f64, high: &'static str, mid: &'static str, low: &'static str) -> String {
    let descriptor = if score >= 70.0 {
        high
    } else if score >= 40.0 {
        mid
    } else {
        low
    };
    descriptor.to_string()
}

pub fn work_style_profile(scores: &ScoreVector) -> WorkStyleProfile {
    let stability = 100.0 - scores.score(NEUROTICISM);

    WorkStyleProfile {
        social_style: band(
            scores.score(EXTRAVERSION),
            "Team Player - You thrive in collaborative environments",
            "Balanced - You adapt well to solo or team work",
            "Independent Contributor - You excel in focused, solo work",
        ),
        work_approach: band(
            scores.score(CONSCIENTIOUSNESS),
            "Structured Planner - You excel at organization and follow-through",
            "Flexible Executor - You balance planning with adaptability",
            "Spontaneous Creator - You thrive with flexibility and freedom",
        ),
        learning_style: band(
            scores.score(OPENNESS),
            "Innovative Explorer - You love learning and trying new approaches",
            "Pragmatic Learner - You balance new ideas with proven methods",
            "Consistent Specialist - You master established techniques",
        ),
        team_role: band(
            scores.score(AGREEABLENESS),
            "Collaborative Supporter - You build consensus and help others",
            "Balanced Contributor - You collaborate while maintaining independence",
            "Direct Leader - You drive results and challenge status quo",
        ),
        stress_management: band(
            stability,
            "Calm Under Pressure - You maintain composure in challenges",
            "Resilient Adapter - You manage stress effectively",
            "Mindful Responder - You benefit from structured support",
        ),
    }
}

/// Careers suggested by trait combinations, first-seen order, at most five.
pub fn career_suggestions(scores: &ScoreVector) -> Vec<String> {
    let e = scores.score(EXTRAVERSION);
    let c = scores.score(CONSCIENTIOUSNESS);
    let o = scores.score(OPENNESS);
    let a = scores.score(AGREEABLENESS);
    let n = scores.score(NEUROTICISM);

    let table: [(bool, &[&str]); 5] = [
        (
            e >= 60.0 && c >= 60.0,
            &["Product Manager", "Sales Engineer", "Team Lead"],
        ),
        (
            o >= 60.0 && c >= 60.0,
            &["Software Architect", "Data Scientist", "UX Researcher"],
        ),
        (
            e < 40.0 && c >= 60.0,
            &["Backend Engineer", "Data Analyst", "Quality Assurance"],
        ),
        (
            e >= 60.0 && a >= 60.0,
            &["Customer Success", "HR Manager", "Teacher"],
        ),
        (
            o >= 60.0 && n < 40.0,
            &["Entrepreneur", "Creative Director", "Innovation Consultant"],
        ),
    ];

    let mut picked: Vec<String> = Vec::new();
    for career in table
        .iter()
        .filter(|(applies, _)| *applies)
        .flat_map(|(_, careers)| careers.iter())
    {
        if !picked.iter().any(|p| p == career) {
            picked.push(career.to_string());
        }
    }

    if picked.is_empty() {
        return FALLBACK_CAREERS.iter().map(|c| c.to_string()).collect();
    }
    picked.truncate(MAX_SUGGESTIONS);
    picked
}

pub fn empathy_level(score: f64) -> &'static str {
    if score >= 80.0 {
        "Highly Empathetic"
    } else if score >= 60.0 {
        "Empathetic"
    } else if score >= 40.0 {
        "Moderately Empathetic"
    } else {
        "Developing Empathy"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn big_five(e: f64, c: f64, o: f64, a: f64, n: f64) -> ScoreVector {
        [
            (EXTRAVERSION, e),
            (CONSCIENTIOUSNESS, c),
            (OPENNESS, o),
            (AGREEABLENESS, a),
            (NEUROTICISM, n),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect()
    }

    #[test]
    fn test_profile_bands() {
        let profile = work_style_profile(&big_five(80.0, 50.0, 10.0, 70.0, 90.0));
        assert!(profile.social_style.starts_with("Team Player"));
        assert!(profile.work_approach.starts_with("Flexible Executor"));
        assert!(profile.learning_style.starts_with("Consistent Specialist"));
        assert!(profile.team_role.starts_with("Collaborative Supporter"));
        // stability = 10
        assert!(profile.stress_management.starts_with("Mindful Responder"));
    }

    #[test]
    fn test_suggestions_fallback_when_no_rule_matches() {
        let careers = career_suggestions(&big_five(50.0, 50.0, 50.0, 50.0, 50.0));
        assert_eq!(
            careers,
            vec!["Full-Stack Developer", "Business Analyst", "Project Manager"]
        );
    }

    #[test]
    fn test_suggestions_capped_at_five_in_rule_order() {
        let careers = career_suggestions(&big_five(90.0, 90.0, 90.0, 90.0, 10.0));
        assert_eq!(careers.len(), 5);
        assert_eq!(careers[0], "Product Manager");
        assert_eq!(careers[3], "Software Architect");
    }

    #[test]
    fn test_introvert_planner_suggestions() {
        let careers = career_suggestions(&big_five(20.0, 80.0, 50.0, 50.0, 50.0));
        assert_eq!(
            careers,
            vec!["Backend Engineer", "Data Analyst", "Quality Assurance"]
        );
    }

    #[test]
    fn test_empathy_levels() {
        assert_eq!(empathy_level(80.0), "Highly Empathetic");
        assert_eq!(empathy_level(65.0), "Empathetic");
        assert_eq!(empathy_level(50.0), "Moderately Empathetic");
        assert_eq!(empathy_level(39.9), "Developing Empathy");
    }

    #[test]
    fn test_empathy_details_average_quadrants() {
        let scores: ScoreVector = [("say", 100.0), ("do", 50.0), ("think", 50.0), ("feel", 0.0)]
            .into_iter()
            .map(|(k, v)| (k.to_string(), v))
            .collect();
        match empathy_details(&scores) {
            AssessmentDetails::Empathy {
                empathy_score,
                empathy_level,
            } => {
                assert_eq!(empathy_score, 50.0);
                assert_eq!(empathy_level, "Moderately Empathetic");
            }
            other => panic!("unexpected details {other:?}"),
        }
    }
}
