//! Grading agent: analyzes a full submission against the quiz's answer keys
//! and renders the student-facing summary report.

use chatgpt::client::ChatGPT;
use chatgpt::types::{ChatMessage, Role};
use serde::Deserialize;

use super::{build_client, parse_reply, AgentError};
use crate::quiz::{needs_remediation, Analysis, GradingItem, QuestionScore, StudentAnswer};

pub struct Reviewer {
    client: ChatGPT,
}

impl Reviewer {
    pub fn new(api_key: &str) -> Result<Self, AgentError> {
        // low temperature for consistent grading
        Ok(Self {
            client: build_client(api_key, 0.3)?,
        })
    }

    /// Grade one submission. Answers are aligned by index with the grading
    /// items; a missing answer is reported to the grader as such.
    pub async fn analyze(
        &self,
        items: &[GradingItem],
        answers: &[StudentAnswer],
        quiz_type_label: &str,
    ) -> Result<Analysis, AgentError> {
        let history = vec![
            ChatMessage {
                role: Role::System,
                content: system_prompt(quiz_type_label),
            },
            ChatMessage {
                role: Role::User,
                content: analysis_prompt(items, answers),
            },
        ];

        log::debug!("grading a submission of {} answers", answers.len());
        let response = self.client.send_history(&history).await?;
        parse_analysis(&response.message().content)
    }
}

fn system_prompt(quiz_type_label: &str) -> String {
    format!(
        "You are an expert educational evaluator and learning analytics specialist. Grade \
         fairly and consistently, give constructive and actionable feedback, identify the \
         specific knowledge gaps behind wrong answers, suggest targeted improvements, and \
         acknowledge what the student understood well.\n\n\
         Quiz type: {}\n\n\
         Grading principles: be fair but rigorous, award partial credit where earned, explain \
         why points were given or withheld, grade understanding rather than surface \
         correctness, and name misconceptions rather than just errors.\n\n\
         Reply with a single JSON object:\n\
         {{\"overall_score\": <percentage>, \"question_scores\": [{{\"question_number\": 1, \
         \"points_earned\": <number>, \"max_points\": <number>, \"feedback\": \"...\"}}], \
         \"weak_areas\": [\"...\"], \"strong_areas\": [\"...\"], \
         \"recommendations\": [\"...\"], \"overall_feedback\": \"...\"}}",
        quiz_type_label
    )
}

fn analysis_prompt(items: &[GradingItem], answers: &[StudentAnswer]) -> String {
    let mut prompt = String::from("Analyze this quiz submission:\n");
    for (index, item) in items.iter().enumerate() {
        let answer = answers
            .get(index)
            .map(|a| a.answer.as_str())
            .filter(|a| !a.is_empty())
            .unwrap_or("No answer provided");
        prompt.push_str(&format!(
            "\nQUESTION {n}:\n{question}\nCorrect Answer: {key}\n\nSTUDENT ANSWER {n}:\n{answer}\n\n---\n",
            n = index + 1,
            question = item.question,
            key = item.answer_key,
            answer = answer,
        ));
    }
    prompt.push_str(
        "\nProvide individual question scores and feedback, the overall score, the specific \
         weak areas, the strong areas, and actionable study recommendations.",
    );
    prompt
}

pub(crate) fn parse_analysis(raw: &str) -> Result<Analysis, AgentError> {
    let wire: AnalysisWire = parse_reply(raw)?;
    Ok(Analysis {
        needs_remediation: needs_remediation(wire.overall_score),
        overall_score: wire.overall_score,
        question_scores: wire
            .question_scores
            .into_iter()
            .map(|q| QuestionScore {
                question_number: q.question_number,
                points_earned: q.points_earned,
                max_points: q.max_points,
                feedback: q.feedback,
            })
            .collect(),
        weak_areas: wire.weak_areas,
        strong_areas: wire.strong_areas,
        recommendations: wire.recommendations,
        overall_feedback: wire.overall_feedback,
    })
}

#[derive(Deserialize)]
struct AnalysisWire {
    #[serde(default)]
    overall_score: f64,
    #[serde(default)]
    question_scores: Vec<QuestionScoreWire>,
    #[serde(default)]
    weak_areas: Vec<String>,
    #[serde(default)]
    strong_areas: Vec<String>,
    #[serde(default)]
    recommendations: Vec<String>,
    #[serde(default)]
    overall_feedback: String,
}

#[derive(Deserialize)]
struct QuestionScoreWire {
    #[serde(default)]
    question_number: u32,
    #[serde(default)]
    points_earned: f64,
    #[serde(default)]
    max_points: f64,
    #[serde(default)]
    feedback: String,
}

/// Student-facing summary of an analysis, in Telegram HTML.
pub fn summary_report(analysis: &Analysis) -> String {
    let mut report = format!(
        "📊 <b>Quiz Performance Summary</b>\n\n<b>Overall Score:</b> {:.1}%\n",
        analysis.overall_score
    );

    if !analysis.strong_areas.is_empty() {
        report.push_str("\n✅ <b>Strengths:</b>\n");
        for area in &analysis.strong_areas {
            report.push_str(&format!("  • {}\n", area));
        }
    }

    if !analysis.weak_areas.is_empty() {
        report.push_str("\n⚠️ <b>Areas for Improvement:</b>\n");
        for area in &analysis.weak_areas {
            report.push_str(&format!("  • {}\n", area));
        }
    }

    if !analysis.recommendations.is_empty() {
        report.push_str("\n💡 <b>Recommendations:</b>\n");
        for (index, recommendation) in analysis.recommendations.iter().enumerate() {
            report.push_str(&format!("  {}. {}\n", index + 1, recommendation));
        }
    }

    if !analysis.overall_feedback.is_empty() {
        report.push_str(&format!("\n{}\n", analysis.overall_feedback));
    }

    if analysis.needs_remediation {
        report.push_str(
            "\n📚 <b>Next Steps:</b>\nYour AI tutor will focus on the areas above in future \
             sessions. Practice quizzes on these topics will help too.",
        );
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn remediation_is_derived_from_the_score_not_the_model() {
        // even if the model claimed otherwise, only the score decides
        let raw = r#"{"overall_score": 89.9, "needs_remediation": false}"#;
        let analysis = parse_analysis(raw).unwrap();
        assert!(analysis.needs_remediation);

        let raw = r#"{"overall_score": 90.0}"#;
        let analysis = parse_analysis(raw).unwrap();
        assert!(!analysis.needs_remediation);
    }

    #[test]
    fn missing_fields_default_to_empty() {
        let analysis = parse_analysis("{}").unwrap();
        assert_eq!(analysis.overall_score, 0.0);
        assert!(analysis.needs_remediation);
        assert!(analysis.question_scores.is_empty());
        assert!(analysis.weak_areas.is_empty());
    }

    #[test]
    fn full_analysis_parses() {
        let raw = r#"{
            "overall_score": 75,
            "question_scores": [
                {"question_number": 1, "points_earned": 5, "max_points": 10, "feedback": "Half right."}
            ],
            "weak_areas": ["recursion"],
            "strong_areas": ["iteration"],
            "recommendations": ["Redo the recursion worksheet"],
            "overall_feedback": "Solid effort."
        }"#;
        let analysis = parse_analysis(raw).unwrap();
        assert_eq!(analysis.overall_score, 75.0);
        assert_eq!(analysis.question_scores.len(), 1);
        assert_eq!(analysis.question_scores[0].max_points, 10.0);
        assert_eq!(analysis.weak_areas, vec!["recursion"]);
        assert!(analysis.needs_remediation);
    }

    #[test]
    fn summary_report_includes_next_steps_only_below_threshold() {
        let raw = r#"{"overall_score": 60, "weak_areas": ["joins"]}"#;
        let failing = parse_analysis(raw).unwrap();
        assert!(summary_report(&failing).contains("Next Steps"));

        let raw = r#"{"overall_score": 95, "strong_areas": ["joins"]}"#;
        let passing = parse_analysis(raw).unwrap();
        let report = summary_report(&passing);
        assert!(!report.contains("Next Steps"));
        assert!(report.contains("95.0%"));
    }

    #[test]
    fn analysis_prompt_pairs_questions_with_answers() {
        let items = vec![
            GradingItem {
                question: "What is a mutex?".to_string(),
                answer_key: "A lock".to_string(),
            },
            GradingItem {
                question: "What is a semaphore?".to_string(),
                answer_key: "A counter".to_string(),
            },
        ];
        let answers = vec![StudentAnswer {
            answer: "A lock".to_string(),
        }];
        let prompt = analysis_prompt(&items, &answers);
        assert!(prompt.contains("QUESTION 1"));
        assert!(prompt.contains("STUDENT ANSWER 2:\nNo answer provided"));
    }
}
