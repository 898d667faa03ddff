//! Quiz generation: turns slide content and learning objectives into a
//! typed question set of the requested kind.

use chatgpt::client::ChatGPT;
use chatgpt::types::{ChatMessage, Role};
use serde::Deserialize;

use super::{build_client, parse_reply, AgentError};
use crate::quiz::{Question, QuestionKind, QuizType, Rubric};

pub struct QuizGenerator {
    client: ChatGPT,
}

impl QuizGenerator {
    pub fn new(api_key: &str) -> Result<Self, AgentError> {
        Ok(Self {
            client: build_client(api_key, 0.7)?,
        })
    }

    pub async fn generate(
        &self,
        slide_content: &str,
        learning_objectives: &str,
        quiz_type: QuizType,
        num_questions: usize,
    ) -> Result<Vec<Question>, AgentError> {
        let history = vec![
            ChatMessage {
                role: Role::System,
                content: system_prompt(quiz_type),
            },
            ChatMessage {
                role: Role::User,
                content: user_prompt(slide_content, learning_objectives, num_questions),
            },
        ];

        log::debug!(
            "requesting {} questions of type {}",
            num_questions,
            quiz_type.label()
        );
        let response = self.client.send_history(&history).await?;
        parse_questions(&response.message().content, quiz_type)
    }
}

const BASE_PROMPT: &str = "You are an expert educational assessment designer. You write \
high-quality, pedagogically sound quiz questions that align with the stated learning objectives.\n\
For every question provide the question text, the specific learning objective it addresses, and \
the cognitive level (Remember, Understand, Apply, Analyze, Evaluate, Create).";

fn system_prompt(quiz_type: QuizType) -> String {
    let shape = match quiz_type {
        QuizType::MultipleChoice => {
            "Write multiple-choice questions with exactly 4 options (A, B, C, D), one correct \
             answer, and plausible distractors that probe common misconceptions.\n\
             Reply with a single JSON object:\n\
             {\"questions\": [{\"question\": \"...\", \"options\": [\"A. ...\", \"B. ...\", \
             \"C. ...\", \"D. ...\"], \"correct_answer\": \"A\", \"learning_objective\": \"...\", \
             \"cognitive_level\": \"Apply\", \"explanation\": \"...\"}]}"
        }
        QuizType::Conversational => {
            "Write open-ended conversational questions that invite critical thinking, allow \
             several valid approaches, and test understanding rather than recall.\n\
             Reply with a single JSON object:\n\
             {\"questions\": [{\"question\": \"...\", \"learning_objective\": \"...\", \
             \"cognitive_level\": \"Analyze\", \"sample_answer\": \"...\", \
             \"key_points\": [\"...\", \"...\"]}]}"
        }
        QuizType::LongAnswer => {
            "Write long-answer questions that demand detailed, structured responses and come \
             with explicit rubric criteria.\n\
             Reply with a single JSON object:\n\
             {\"questions\": [{\"question\": \"...\", \"learning_objective\": \"...\", \
             \"cognitive_level\": \"Evaluate\", \"rubric\": {\"excellent\": \"...\", \
             \"good\": \"...\", \"needs_improvement\": \"...\"}, \
             \"expected_length\": \"2-3 paragraphs\"}]}"
        }
    };
    format!("{}\n\n{}", BASE_PROMPT, shape)
}

fn user_prompt(slide_content: &str, learning_objectives: &str, num_questions: usize) -> String {
    format!(
        "Generate {} quiz questions from the following material.\n\n\
         SLIDE CONTENT:\n{}\n\n\
         LEARNING OBJECTIVES:\n{}\n\n\
         Every question must map to one of the objectives and test the appropriate cognitive level.",
        num_questions, slide_content, learning_objectives
    )
}

pub(crate) fn parse_questions(raw: &str, quiz_type: QuizType) -> Result<Vec<Question>, AgentError> {
    match quiz_type {
        QuizType::MultipleChoice => {
            let wire: QuestionList<McqWire> = parse_reply(raw)?;
            Ok(wire.questions.into_iter().map(Question::from).collect())
        }
        QuizType::Conversational => {
            let wire: QuestionList<ConversationalWire> = parse_reply(raw)?;
            Ok(wire.questions.into_iter().map(Question::from).collect())
        }
        QuizType::LongAnswer => {
            let wire: QuestionList<LongAnswerWire> = parse_reply(raw)?;
            Ok(wire.questions.into_iter().map(Question::from).collect())
        }
    }
}

#[derive(Deserialize)]
struct QuestionList<T> {
    #[serde(default = "Vec::new")]
    questions: Vec<T>,
}

#[derive(Deserialize)]
struct McqWire {
    question: String,
    #[serde(default)]
    options: Vec<String>,
    #[serde(default)]
    correct_answer: String,
    #[serde(default)]
    learning_objective: String,
    #[serde(default)]
    cognitive_level: String,
    #[serde(default)]
    explanation: String,
}

impl From<McqWire> for Question {
    fn from(wire: McqWire) -> Self {
        Question {
            question: wire.question,
            learning_objective: wire.learning_objective,
            cognitive_level: wire.cognitive_level,
            kind: QuestionKind::MultipleChoice {
                options: wire.options,
                correct_answer: wire.correct_answer,
                explanation: wire.explanation,
            },
        }
    }
}

#[derive(Deserialize)]
struct ConversationalWire {
    question: String,
    #[serde(default)]
    learning_objective: String,
    #[serde(default)]
    cognitive_level: String,
    #[serde(default)]
    sample_answer: String,
    #[serde(default)]
    key_points: Vec<String>,
}

impl From<ConversationalWire> for Question {
    fn from(wire: ConversationalWire) -> Self {
        Question {
            question: wire.question,
            learning_objective: wire.learning_objective,
            cognitive_level: wire.cognitive_level,
            kind: QuestionKind::Conversational {
                sample_answer: wire.sample_answer,
                key_points: wire.key_points,
            },
        }
    }
}

#[derive(Deserialize)]
struct LongAnswerWire {
    question: String,
    #[serde(default)]
    learning_objective: String,
    #[serde(default)]
    cognitive_level: String,
    #[serde(default)]
    rubric: RubricWire,
    #[serde(default)]
    expected_length: String,
}

#[derive(Deserialize, Default)]
struct RubricWire {
    #[serde(default)]
    excellent: String,
    #[serde(default)]
    good: String,
    #[serde(default)]
    needs_improvement: String,
}

impl From<LongAnswerWire> for Question {
    fn from(wire: LongAnswerWire) -> Self {
        Question {
            question: wire.question,
            learning_objective: wire.learning_objective,
            cognitive_level: wire.cognitive_level,
            kind: QuestionKind::LongAnswer {
                rubric: Rubric {
                    excellent: wire.rubric.excellent,
                    good: wire.rubric.good,
                    needs_improvement: wire.rubric.needs_improvement,
                },
                expected_length: wire.expected_length,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_mcq_reply() {
        let raw = r#"{
            "questions": [{
                "question": "What is a stack?",
                "options": ["A. LIFO", "B. FIFO", "C. Tree", "D. Graph"],
                "correct_answer": "A",
                "learning_objective": "Understand basic data structures",
                "cognitive_level": "Understand",
                "explanation": "A stack is last-in, first-out."
            }]
        }"#;
        let questions = parse_questions(raw, QuizType::MultipleChoice).unwrap();
        assert_eq!(questions.len(), 1);
        assert_eq!(questions[0].options().len(), 4);
        assert_eq!(questions[0].answer_key(), "A");
    }

    #[test]
    fn parses_conversational_reply_with_missing_optionals() {
        let raw = r#"{"questions": [{"question": "Why use hashing?"}]}"#;
        let questions = parse_questions(raw, QuizType::Conversational).unwrap();
        assert_eq!(questions.len(), 1);
        assert_eq!(questions[0].answer_key(), "");
        assert!(questions[0].options().is_empty());
    }

    #[test]
    fn parses_long_answer_reply() {
        let raw = r#"{
            "questions": [{
                "question": "Compare BFS and DFS.",
                "learning_objective": "Analyze traversal strategies",
                "cognitive_level": "Analyze",
                "rubric": {
                    "excellent": "Covers complexity and use cases",
                    "good": "Covers one dimension",
                    "needs_improvement": "Definitions only"
                },
                "expected_length": "2-3 paragraphs"
            }]
        }"#;
        let questions = parse_questions(raw, QuizType::LongAnswer).unwrap();
        assert_eq!(questions[0].answer_key(), "See rubric");
        match &questions[0].kind {
            QuestionKind::LongAnswer { rubric, expected_length } => {
                assert_eq!(rubric.excellent, "Covers complexity and use cases");
                assert_eq!(expected_length, "2-3 paragraphs");
            }
            other => panic!("unexpected kind: {:?}", other),
        }
    }

    #[test]
    fn fenced_reply_is_accepted() {
        let raw = "```json\n{\"questions\": []}\n```";
        let questions = parse_questions(raw, QuizType::MultipleChoice).unwrap();
        assert!(questions.is_empty());
    }

    #[test]
    fn prose_reply_is_rejected() {
        let result = parse_questions("I could not generate questions.", QuizType::MultipleChoice);
        assert!(matches!(result, Err(AgentError::MalformedReply(_))));
    }
}
