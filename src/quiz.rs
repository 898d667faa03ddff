//! Quiz model: question variants, instructor drafts, student attempts and
//! the grading analysis attached to each attempt.

use chrono::{DateTime, Utc};

/// Score below which a graded attempt triggers remediation. The comparison
/// is exclusive: 89.9 needs remediation, 90.0 does not.
pub const PASSING_THRESHOLD: f64 = 90.0;

pub fn needs_remediation(overall_score: f64) -> bool {
    overall_score < PASSING_THRESHOLD
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuizType {
    MultipleChoice,
    Conversational,
    LongAnswer,
}

impl QuizType {
    pub const ALL: [QuizType; 3] = [
        QuizType::MultipleChoice,
        QuizType::Conversational,
        QuizType::LongAnswer,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            QuizType::MultipleChoice => "Multiple Choice (MCQ)",
            QuizType::Conversational => "Conversational",
            QuizType::LongAnswer => "Long Answer",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        QuizType::ALL.into_iter().find(|t| t.label() == label)
    }
}

#[derive(Debug, Clone)]
pub struct Question {
    pub question: String,
    pub learning_objective: String,
    pub cognitive_level: String,
    pub kind: QuestionKind,
}

/// Per-type payload of a question.
#[derive(Debug, Clone)]
pub enum QuestionKind {
    MultipleChoice {
        options: Vec<String>,
        correct_answer: String,
        explanation: String,
    },
    Conversational {
        sample_answer: String,
        key_points: Vec<String>,
    },
    LongAnswer {
        rubric: Rubric,
        expected_length: String,
    },
}

#[derive(Debug, Clone, Default)]
pub struct Rubric {
    pub excellent: String,
    pub good: String,
    pub needs_improvement: String,
}

impl Question {
    /// Answer options, for question kinds that offer any.
    pub fn options(&self) -> &[String] {
        match &self.kind {
            QuestionKind::MultipleChoice { options, .. } => options,
            _ => &[],
        }
    }

    /// The reference quoted to the grader as the expected answer.
    pub fn answer_key(&self) -> String {
        match &self.kind {
            QuestionKind::MultipleChoice { correct_answer, .. } => correct_answer.clone(),
            QuestionKind::Conversational { sample_answer, .. } => sample_answer.clone(),
            QuestionKind::LongAnswer { .. } => "See rubric".to_string(),
        }
    }
}

/// A generated question set under instructor review. Questions can be
/// removed before publishing; there is no editing in place.
#[derive(Debug, Clone)]
pub struct QuizDraft {
    pub title: String,
    pub quiz_type: QuizType,
    pub learning_objectives: String,
    pub questions: Vec<Question>,
}

impl QuizDraft {
    /// Drop a candidate question by its 1-based number.
    pub fn remove_question(&mut self, number: usize) -> Option<Question> {
        if number == 0 || number > self.questions.len() {
            return None;
        }
        Some(self.questions.remove(number - 1))
    }

    pub(crate) fn into_quiz(self, id: String, created_at: DateTime<Utc>) -> Quiz {
        Quiz {
            id,
            title: self.title,
            quiz_type: self.quiz_type,
            learning_objectives: self.learning_objectives,
            questions: self.questions,
            created_at,
        }
    }
}

/// A published quiz. Immutable after save; there is no update operation.
#[derive(Debug, Clone)]
pub struct Quiz {
    pub id: String,
    pub title: String,
    pub quiz_type: QuizType,
    pub learning_objectives: String,
    pub questions: Vec<Question>,
    pub created_at: DateTime<Utc>,
}

/// One answer as submitted, aligned by index with the quiz's question list.
/// Multiple-choice answers hold the selected option's literal text.
#[derive(Debug, Clone)]
pub struct StudentAnswer {
    pub answer: String,
}

#[derive(Debug, Clone)]
pub struct QuizAttempt {
    pub answers: Vec<StudentAnswer>,
    pub analysis: Analysis,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct QuestionScore {
    pub question_number: u32,
    pub points_earned: f64,
    pub max_points: f64,
    pub feedback: String,
}

/// Grading result for one submission, produced by the grading agent.
#[derive(Debug, Clone)]
pub struct Analysis {
    pub overall_score: f64,
    pub question_scores: Vec<QuestionScore>,
    pub weak_areas: Vec<String>,
    pub strong_areas: Vec<String>,
    pub recommendations: Vec<String>,
    pub overall_feedback: String,
    /// Derived locally from the score, never taken from the model.
    pub needs_remediation: bool,
}

impl Analysis {
    /// Zero-score rendering of a failed grading call, shown to the student
    /// in place of a model-produced analysis. Never persisted.
    pub fn failure(reason: &str) -> Self {
        Self {
            overall_score: 0.0,
            question_scores: Vec::new(),
            weak_areas: Vec::new(),
            strong_areas: Vec::new(),
            recommendations: Vec::new(),
            overall_feedback: format!("Failed to analyze performance: {}", reason),
            needs_remediation: true,
        }
    }
}

/// Question/reference pair the grading prompt is built from. Official and
/// practice quizzes both reduce to these, so the grader stays independent of
/// the question representation.
#[derive(Debug, Clone)]
pub struct GradingItem {
    pub question: String,
    pub answer_key: String,
}

impl GradingItem {
    pub fn from_quiz(quiz: &Quiz) -> Vec<GradingItem> {
        quiz.questions
            .iter()
            .map(|q| GradingItem {
                question: q.question.clone(),
                answer_key: q.answer_key(),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mcq(text: &str) -> Question {
        Question {
            question: text.to_string(),
            learning_objective: "objective".to_string(),
            cognitive_level: "Apply".to_string(),
            kind: QuestionKind::MultipleChoice {
                options: vec!["A. one".to_string(), "B. two".to_string()],
                correct_answer: "A".to_string(),
                explanation: "because".to_string(),
            },
        }
    }

    #[test]
    fn remediation_threshold_is_exclusive_at_ninety() {
        assert!(needs_remediation(89.9));
        assert!(!needs_remediation(90.0));
        assert!(!needs_remediation(100.0));
        assert!(needs_remediation(0.0));
    }

    #[test]
    fn answer_key_per_question_kind() {
        assert_eq!(mcq("q").answer_key(), "A");

        let conversational = Question {
            question: "q".to_string(),
            learning_objective: String::new(),
            cognitive_level: String::new(),
            kind: QuestionKind::Conversational {
                sample_answer: "a good answer".to_string(),
                key_points: vec![],
            },
        };
        assert_eq!(conversational.answer_key(), "a good answer");

        let long_answer = Question {
            question: "q".to_string(),
            learning_objective: String::new(),
            cognitive_level: String::new(),
            kind: QuestionKind::LongAnswer {
                rubric: Rubric::default(),
                expected_length: "2-3 paragraphs".to_string(),
            },
        };
        assert_eq!(long_answer.answer_key(), "See rubric");
    }

    #[test]
    fn draft_removal_is_one_based_and_bounded() {
        let mut draft = QuizDraft {
            title: "Quiz".to_string(),
            quiz_type: QuizType::MultipleChoice,
            learning_objectives: "obj".to_string(),
            questions: vec![mcq("first"), mcq("second")],
        };

        assert!(draft.remove_question(0).is_none());
        assert!(draft.remove_question(3).is_none());
        assert_eq!(draft.remove_question(1).map(|q| q.question), Some("first".to_string()));
        assert_eq!(draft.questions.len(), 1);
        assert_eq!(draft.questions[0].question, "second");
    }

    #[test]
    fn failure_analysis_is_zero_score_with_remediation() {
        let analysis = Analysis::failure("connection reset");
        assert_eq!(analysis.overall_score, 0.0);
        assert!(analysis.needs_remediation);
        assert!(analysis.overall_feedback.contains("connection reset"));
        assert!(analysis.question_scores.is_empty());
    }

    #[test]
    fn quiz_type_labels_round_trip() {
        for quiz_type in QuizType::ALL {
            assert_eq!(QuizType::from_label(quiz_type.label()), Some(quiz_type));
        }
        assert_eq!(QuizType::from_label("essay"), None);
    }
}
