//! Practice-question agent: exam-prep questions at a chosen difficulty,
//! optionally steered toward the student's weak areas.

use chatgpt::client::ChatGPT;
use chatgpt::types::{ChatMessage, Role};
use serde::Deserialize;

use super::{build_client, parse_reply, AgentError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

    pub fn label(&self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Medium => "Medium",
            Difficulty::Hard => "Hard",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        Difficulty::ALL.into_iter().find(|d| d.label() == label)
    }

    fn guidance(&self) -> &'static str {
        match self {
            Difficulty::Easy => {
                "Stick to fundamental concepts and definitions, straightforward scenarios, \
                 and basic recall and understanding."
            }
            Difficulty::Medium => {
                "Mix conceptual understanding with application, include problem-solving \
                 scenarios, and connect related concepts."
            }
            Difficulty::Hard => {
                "Lean on advanced application and analysis, multi-step problems, critical \
                 thinking and synthesis, and challenge common assumptions."
            }
        }
    }
}

/// One practice question as the model shapes it: mixed types, options only
/// for multiple choice.
#[derive(Debug, Clone, Deserialize)]
pub struct PracticeQuestion {
    #[serde(default)]
    pub question: String,
    #[serde(rename = "type", default)]
    pub question_type: String,
    #[serde(default)]
    pub options: Vec<String>,
    #[serde(default)]
    pub correct_answer: String,
    #[serde(default)]
    pub explanation: String,
    #[serde(default)]
    pub difficulty: String,
    #[serde(default)]
    pub topic: String,
}

impl PracticeQuestion {
    /// The reference quoted to the grader as the expected answer.
    pub fn answer_key(&self) -> String {
        if self.correct_answer.is_empty() {
            "See explanation".to_string()
        } else {
            self.correct_answer.clone()
        }
    }
}

/// A single drill question on one topic.
#[derive(Debug, Clone, Deserialize)]
pub struct QuickQuestion {
    #[serde(default)]
    pub question: String,
    #[serde(default)]
    pub answer: String,
    #[serde(default)]
    pub explanation: String,
    #[serde(default)]
    pub hints: Vec<String>,
}

pub struct PracticeGenerator {
    client: ChatGPT,
}

impl PracticeGenerator {
    pub fn new(api_key: &str) -> Result<Self, AgentError> {
        Ok(Self {
            client: build_client(api_key, 0.8)?,
        })
    }

    pub async fn generate(
        &self,
        slide_content: &str,
        difficulty: Difficulty,
        num_questions: usize,
        focus_areas: &[String],
    ) -> Result<Vec<PracticeQuestion>, AgentError> {
        let history = vec![
            ChatMessage {
                role: Role::System,
                content: system_prompt(difficulty),
            },
            ChatMessage {
                role: Role::User,
                content: user_prompt(slide_content, num_questions, focus_areas),
            },
        ];

        log::debug!(
            "requesting {} practice questions at {} difficulty",
            num_questions,
            difficulty.label()
        );
        let response = self.client.send_history(&history).await?;
        let wire: PracticeList = parse_reply(&response.message().content)?;
        Ok(wire.questions)
    }

    /// One quick drill question on a named topic.
    pub async fn quick_question(&self, topic: &str) -> Result<QuickQuestion, AgentError> {
        let prompt = format!(
            "Generate one practice question on the topic: {}\n\n\
             Make it thought-provoking: test understanding, not memorization. Include the \
             answer and a brief explanation.\n\n\
             Reply with a single JSON object:\n\
             {{\"question\": \"...\", \"answer\": \"...\", \"explanation\": \"...\", \
             \"hints\": [\"...\", \"...\"]}}",
            topic
        );
        let history = vec![ChatMessage {
            role: Role::User,
            content: prompt,
        }];
        let response = self.client.send_history(&history).await?;
        parse_reply(&response.message().content)
    }
}

fn system_prompt(difficulty: Difficulty) -> String {
    format!(
        "You are an expert test designer writing practice questions that prepare students \
         for exams.\n\nDifficulty level: {}. {}\n\n\
         Questions must test understanding rather than recall, use clear wording, come with \
         detailed answers and explanations, and span several cognitive levels.\n\n\
         Reply with a single JSON object:\n\
         {{\"questions\": [{{\"question\": \"...\", \"type\": \"MCQ or Short Answer or \
         Problem Solving\", \"options\": [\"A. ...\", \"B. ...\", \"C. ...\", \"D. ...\"], \
         \"correct_answer\": \"...\", \"explanation\": \"...\", \"difficulty\": \"{}\", \
         \"topic\": \"...\"}}]}}\n\
         Omit the options field for anything that is not multiple choice.",
        difficulty.label(),
        difficulty.guidance(),
        difficulty.label()
    )
}

fn user_prompt(slide_content: &str, num_questions: usize, focus_areas: &[String]) -> String {
    let mut prompt = format!(
        "Generate {} practice questions from this content:\n\nCONTENT:\n{}\n",
        num_questions, slide_content
    );
    if !focus_areas.is_empty() {
        prompt.push_str(&format!(
            "\nFOCUS AREAS (prioritize questions on these topics):\n{}\n",
            focus_areas.join(", ")
        ));
    }
    prompt.push_str(
        "\nMix question types (multiple choice, short answer, problem solving) so the set \
         works as exam preparation.",
    );
    prompt
}

#[derive(Deserialize)]
struct PracticeList {
    #[serde(default)]
    questions: Vec<PracticeQuestion>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn difficulty_labels_round_trip() {
        for difficulty in Difficulty::ALL {
            assert_eq!(Difficulty::from_label(difficulty.label()), Some(difficulty));
        }
        assert_eq!(Difficulty::from_label("Brutal"), None);
    }

    #[test]
    fn practice_reply_parses_mixed_types() {
        let raw = r#"{
            "questions": [
                {
                    "question": "Which structure gives O(1) lookup?",
                    "type": "MCQ",
                    "options": ["A. List", "B. Hash map", "C. Tree", "D. Queue"],
                    "correct_answer": "B",
                    "explanation": "Hash maps hash the key to a bucket.",
                    "difficulty": "Easy",
                    "topic": "hashing"
                },
                {
                    "question": "Walk through inserting 5 into this heap.",
                    "type": "Problem Solving",
                    "correct_answer": "Bubble up from the last position.",
                    "topic": "heaps"
                }
            ]
        }"#;
        let wire: PracticeList = super::super::parse_reply(raw).unwrap();
        assert_eq!(wire.questions.len(), 2);
        assert_eq!(wire.questions[0].options.len(), 4);
        assert!(wire.questions[1].options.is_empty());
        assert_eq!(wire.questions[1].answer_key(), "Bubble up from the last position.");
    }

    #[test]
    fn answer_key_falls_back_to_explanation_note() {
        let question = PracticeQuestion {
            question: "q".to_string(),
            question_type: "Short Answer".to_string(),
            options: Vec::new(),
            correct_answer: String::new(),
            explanation: "long explanation".to_string(),
            difficulty: "Medium".to_string(),
            topic: "t".to_string(),
        };
        assert_eq!(question.answer_key(), "See explanation");
    }
}
