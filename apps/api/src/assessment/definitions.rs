//! Static assessment tables: questions, dimensions, label sets and the
//! threshold rules used for deterministic classification.
//!
//! These are deploy-time constants. Nothing here is mutated at runtime.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AssessmentKind {
    /// Big Five work-style questionnaire.
    WorkStyle,
    /// SAY / DO / THINK / FEEL empathy map.
    Empathy,
}

impl AssessmentKind {
    pub const ALL: [AssessmentKind; 2] = [AssessmentKind::WorkStyle, AssessmentKind::Empathy];

    pub fn as_str(&self) -> &'static str {
        match self {
            AssessmentKind::WorkStyle => "work-style",
            AssessmentKind::Empathy => "empathy",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.as_str() == value)
    }
}

impl std::fmt::Display for AssessmentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Question {
    pub id: u32,
    pub text: &'static str,
    pub dimension: &'static str,
    /// Inverts the 1–5 scale (`6 - raw`) before aggregation.
    pub reverse: bool,
}

/// A single comparison against one dimension score. Both bounds are strict.
#[derive(Debug, Clone, Copy)]
pub enum Condition {
    Above(&'static str, f64),
    Below(&'static str, f64),
}

/// A row of the threshold table. All conditions must hold for the label to apply.
#[derive(Debug, Clone, Copy)]
pub struct Rule {
    pub label: &'static str,
    pub conditions: &'static [Condition],
}

#[derive(Debug)]
pub struct AssessmentDefinition {
    pub kind: AssessmentKind,
    pub title: &'static str,
    pub instructions: &'static str,
    pub estimated_time_minutes: u32,
    pub dimensions: &'static [&'static str],
    pub questions: &'static [Question],
    /// Minimum number of answered questions before scoring is attempted.
    pub min_answers: usize,
    /// Fixed label set. Classification output is always one of these.
    pub labels: &'static [&'static str],
    pub default_label: &'static str,
    /// Evaluated in order; first match wins.
    pub rules: &'static [Rule],
}

impl AssessmentDefinition {
    pub fn question(&self, id: u32) -> Option<&Question> {
        self.questions.iter().find(|q| q.id == id)
    }

    #[cfg(test)]
    pub fn has_label(&self, label: &str) -> bool {
        self.labels.iter().any(|l| *l == label)
    }
}

pub fn definition(kind: AssessmentKind) -> &'static AssessmentDefinition {
    match kind {
        AssessmentKind::WorkStyle => &WORK_STYLE,
        AssessmentKind::Empathy => &EMPATHY,
    }
}

const fn q(id: u32, dimension: &'static str, reverse: bool, text: &'static str) -> Question {
    Question {
        id,
        text,
        dimension,
        reverse,
    }
}

pub const EXTRAVERSION: &str = "extraversion";
pub const CONSCIENTIOUSNESS: &str = "conscientiousness";
pub const OPENNESS: &str = "openness";
pub const AGREEABLENESS: &str = "agreeableness";
pub const NEUROTICISM: &str = "neuroticism";

pub const SAY: &str = "say";
pub const DO: &str = "do";
pub const THINK: &str = "think";
pub const FEEL: &str = "feel";

pub static WORK_STYLE: AssessmentDefinition = AssessmentDefinition {
    kind: AssessmentKind::WorkStyle,
    title: "Discover Your Work Style",
    instructions: "Rate each statement from 1 (Strongly Disagree) to 5 (Strongly Agree)",
    estimated_time_minutes: 6,
    dimensions: &[
        EXTRAVERSION,
        CONSCIENTIOUSNESS,
        OPENNESS,
        AGREEABLENESS,
        NEUROTICISM,
    ],
    questions: &[
        q(1, EXTRAVERSION, false, "I enjoy working in teams and collaborating with others"),
        q(2, EXTRAVERSION, true, "I prefer working independently rather than in groups"),
        q(3, EXTRAVERSION, false, "I feel energized after networking events or team meetings"),
        q(4, EXTRAVERSION, true, "I tend to be quiet in group settings"),
        q(5, EXTRAVERSION, false, "I enjoy leading discussions and presenting ideas"),
        q(6, CONSCIENTIOUSNESS, false, "I always plan ahead before starting a new project"),
        q(7, CONSCIENTIOUSNESS, true, "I often leave tasks unfinished"),
        q(8, CONSCIENTIOUSNESS, false, "I pay close attention to details"),
        q(9, CONSCIENTIOUSNESS, false, "I prefer to keep my workspace organized"),
        q(10, CONSCIENTIOUSNESS, true, "I sometimes procrastinate on important tasks"),
        q(11, OPENNESS, false, "I enjoy learning new skills and exploring new ideas"),
        q(12, OPENNESS, true, "I prefer routine and familiar tasks"),
        q(13, OPENNESS, false, "I'm comfortable adapting to changes in plans"),
        q(14, OPENNESS, false, "I enjoy creative problem-solving"),
        q(15, OPENNESS, true, "I stick to traditional methods rather than trying new approaches"),
        q(16, AGREEABLENESS, false, "I value harmony and avoid conflicts with teammates"),
        q(17, AGREEABLENESS, true, "I'm comfortable challenging others' ideas"),
        q(18, AGREEABLENESS, false, "I enjoy helping colleagues solve their problems"),
        q(19, AGREEABLENESS, false, "I prioritize team success over individual recognition"),
        q(20, AGREEABLENESS, true, "I tend to be direct and assertive in discussions"),
        q(21, NEUROTICISM, true, "I stay calm under pressure and tight deadlines"),
        q(22, NEUROTICISM, false, "I often worry about work-related tasks"),
        q(23, NEUROTICISM, true, "I handle criticism and feedback well"),
        q(24, NEUROTICISM, false, "I get stressed when things don't go as planned"),
        q(25, NEUROTICISM, true, "I maintain a positive outlook even during challenges"),
    ],
    min_answers: 20,
    labels: &[
        "Leader",
        "Collaborator",
        "Innovator",
        "Organizer",
        "Analyzer",
        "Balanced",
    ],
    default_label: "Balanced",
    rules: &[
        Rule {
            label: "Leader",
            conditions: &[
                Condition::Above(EXTRAVERSION, 70.0),
                Condition::Above(OPENNESS, 70.0),
            ],
        },
        Rule {
            label: "Collaborator",
            conditions: &[
                Condition::Above(EXTRAVERSION, 70.0),
                Condition::Above(AGREEABLENESS, 70.0),
            ],
        },
        Rule {
            label: "Innovator",
            conditions: &[
                Condition::Above(OPENNESS, 70.0),
                Condition::Below(CONSCIENTIOUSNESS, 40.0),
            ],
        },
        Rule {
            label: "Organizer",
            conditions: &[
                Condition::Above(CONSCIENTIOUSNESS, 70.0),
                Condition::Below(OPENNESS, 40.0),
            ],
        },
        Rule {
            label: "Analyzer",
            conditions: &[
                Condition::Below(EXTRAVERSION, 40.0),
                Condition::Above(CONSCIENTIOUSNESS, 70.0),
            ],
        },
    ],
};

pub static EMPATHY: AssessmentDefinition = AssessmentDefinition {
    kind: AssessmentKind::Empathy,
    title: "Empathy & Team Compatibility Assessment",
    instructions: "Rate each statement from 1 (Strongly Disagree) to 5 (Strongly Agree)",
    estimated_time_minutes: 5,
    dimensions: &[SAY, DO, THINK, FEEL],
    questions: &[
        q(1, SAY, false, "I openly share my thoughts and feelings with my team"),
        q(2, SAY, false, "I find it easy to articulate my ideas clearly"),
        q(3, SAY, true, "I avoid expressing disagreement even when I have concerns"),
        q(4, SAY, false, "I actively participate in group discussions"),
        q(5, SAY, true, "I prefer to keep my opinions to myself in meetings"),
        q(6, DO, false, "I take initiative to help colleagues without being asked"),
        q(7, DO, false, "I follow through on my commitments consistently"),
        q(8, DO, true, "I tend to wait for others to take the lead"),
        q(9, DO, false, "I actively seek feedback to improve my work"),
        q(10, DO, true, "I struggle to adapt my approach when plans change"),
        q(11, THINK, false, "I genuinely consider others' perspectives before making decisions"),
        q(12, THINK, true, "I find it difficult to understand why people react differently than I would"),
        q(13, THINK, false, "I try to see situations from multiple angles"),
        q(14, THINK, true, "I tend to judge situations based solely on my own experience"),
        q(15, THINK, false, "I recognize patterns in how different people approach problems"),
        q(16, FEEL, false, "I notice when someone seems upset or uncomfortable"),
        q(17, FEEL, true, "I'm often surprised by others' emotional reactions"),
        q(18, FEEL, false, "I can sense the mood of a room when I enter"),
        q(19, FEEL, true, "I struggle to connect with people's feelings"),
        q(20, FEEL, false, "I feel energized when helping someone through a difficult time"),
    ],
    min_answers: 15,
    labels: &["Leader", "Collaborator", "Analyst", "Mediator", "Contributor"],
    default_label: "Contributor",
    rules: &[
        Rule {
            label: "Leader",
            conditions: &[Condition::Above(SAY, 70.0), Condition::Above(DO, 70.0)],
        },
        Rule {
            label: "Collaborator",
            conditions: &[Condition::Above(DO, 75.0)],
        },
        Rule {
            label: "Analyst",
            conditions: &[Condition::Above(THINK, 75.0)],
        },
        Rule {
            label: "Mediator",
            conditions: &[Condition::Above(FEEL, 75.0)],
        },
    ],
};

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn check_table(def: &AssessmentDefinition) {
        let ids: HashSet<u32> = def.questions.iter().map(|q| q.id).collect();
        assert_eq!(ids.len(), def.questions.len(), "duplicate question ids");

        for q in def.questions {
            assert!(
                def.dimensions.contains(&q.dimension),
                "question {} has unknown dimension {}",
                q.id,
                q.dimension
            );
        }
        for rule in def.rules {
            assert!(def.has_label(rule.label), "rule label {} not in set", rule.label);
            for c in rule.conditions {
                let dim = match c {
                    Condition::Above(d, _) | Condition::Below(d, _) => d,
                };
                assert!(def.dimensions.contains(dim));
            }
        }
        assert!(def.has_label(def.default_label));
        assert!(def.min_answers <= def.questions.len());
    }

    #[test]
    fn test_work_style_table_is_consistent() {
        check_table(&WORK_STYLE);
        assert_eq!(WORK_STYLE.questions.len(), 25);
        assert_eq!(WORK_STYLE.min_answers, 20);
    }

    #[test]
    fn test_empathy_table_is_consistent() {
        check_table(&EMPATHY);
        assert_eq!(EMPATHY.questions.len(), 20);
        assert_eq!(EMPATHY.min_answers, 15);
    }

    #[test]
    fn test_each_dimension_has_five_questions() {
        for def in [&WORK_STYLE, &EMPATHY] {
            for dim in def.dimensions {
                let count = def.questions.iter().filter(|q| q.dimension == *dim).count();
                assert_eq!(count, 5, "{} / {}", def.kind, dim);
            }
        }
    }

    #[test]
    fn test_kind_round_trips_through_path_segment() {
        for kind in AssessmentKind::ALL {
            assert_eq!(AssessmentKind::parse(kind.as_str()), Some(kind));
            let json = serde_json::to_string(&kind).unwrap();
            assert_eq!(json, format!("\"{}\"", kind.as_str()));
        }
        assert_eq!(AssessmentKind::parse("psychometric"), None);
    }
}
