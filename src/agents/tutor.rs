//! Tutoring agent: free-text explanations over the selected slide, biased
//! toward the student's weak areas, with a bounded conversation memory.

use chatgpt::client::ChatGPT;
use chatgpt::types::{ChatMessage, Role};

use super::{build_client, AgentError};

/// History entries kept between exchanges; the oldest are dropped beyond
/// this so the outgoing request stays a fixed size.
const HISTORY_LIMIT: usize = 10;

pub struct Tutor {
    client: ChatGPT,
    history: Vec<ChatMessage>,
}

impl Tutor {
    pub fn new(api_key: &str) -> Result<Self, AgentError> {
        Ok(Self {
            client: build_client(api_key, 0.7)?,
            history: Vec::new(),
        })
    }

    /// Explain the slide, or answer a specific student question about it.
    /// The exchange is appended to the conversation memory on both sides.
    pub async fn teach(
        &mut self,
        slide_content: &str,
        weak_areas: &[String],
        user_question: Option<&str>,
    ) -> Result<String, AgentError> {
        let user_message = match user_question {
            Some(question) => format!(
                "SLIDE CONTENT:\n{}\n\nSTUDENT QUESTION:\n{}\n\n\
                 Please give a clear explanation with examples.",
                slide_content, question
            ),
            None => {
                let focus = if weak_areas.is_empty() {
                    String::new()
                } else {
                    format!("\nFocus especially on: {}", weak_areas.join(", "))
                };
                format!(
                    "SLIDE CONTENT:\n{}\n\n\
                     Please explain these concepts with:\n\
                     1. Clear, concise explanations\n\
                     2. Practical numerical examples\n\
                     3. Visual descriptions where they help\n\
                     4. Real-world applications\n{}",
                    slide_content, focus
                )
            }
        };

        let mut messages = Vec::with_capacity(self.history.len() + 2);
        messages.push(ChatMessage {
            role: Role::System,
            content: system_prompt(weak_areas),
        });
        messages.extend(self.history.iter().cloned());
        messages.push(ChatMessage {
            role: Role::User,
            content: user_message.clone(),
        });

        let response = self.client.send_history(&messages).await?;
        let reply = response.message().content.clone();
        self.record_exchange(user_message, reply.clone());
        Ok(reply)
    }

    /// Forget the conversation; a fresh topic session starts from here.
    pub fn reset(&mut self) {
        self.history.clear();
    }

    fn record_exchange(&mut self, question: String, answer: String) {
        self.history.push(ChatMessage {
            role: Role::User,
            content: question,
        });
        self.history.push(ChatMessage {
            role: Role::Assistant,
            content: answer,
        });
        if self.history.len() > HISTORY_LIMIT {
            let excess = self.history.len() - HISTORY_LIMIT;
            self.history.drain(..excess);
        }
    }
}

fn system_prompt(weak_areas: &[String]) -> String {
    let mut prompt = String::from(
        "You are an expert tutor who explains complex concepts clearly and concisely. \
         Break topics into digestible parts, work through numerical examples step by step, \
         offer real-world analogies, describe diagrams in words when they help, and keep the \
         student engaged. Be conversational and encouraging, explain why things work rather \
         than only how, and address common misconceptions before they take hold.",
    );
    if !weak_areas.is_empty() {
        prompt.push_str(&format!(
            "\n\nThe student has struggled with: {}. Give these concepts extra examples, \
             break them down more thoroughly, check understanding more often, and offer \
             alternative explanations.",
            weak_areas.join(", ")
        ));
    }
    prompt
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn history_is_bounded_and_drops_oldest_first() {
        let mut tutor = Tutor::new("test-key").unwrap();
        for n in 0..9 {
            tutor.record_exchange(format!("q{}", n), format!("a{}", n));
        }
        assert_eq!(tutor.history.len(), HISTORY_LIMIT);
        // the first exchanges are gone, the latest is present
        assert_eq!(tutor.history[0].content, "q4");
        assert_eq!(tutor.history.last().unwrap().content, "a8");
    }

    #[test]
    fn reset_clears_history() {
        let mut tutor = Tutor::new("test-key").unwrap();
        tutor.record_exchange("q".to_string(), "a".to_string());
        tutor.reset();
        assert!(tutor.history.is_empty());
    }

    #[test]
    fn weak_areas_appear_in_system_prompt() {
        let prompt = system_prompt(&["recursion".to_string(), "pointers".to_string()]);
        assert!(prompt.contains("recursion, pointers"));
        assert!(!system_prompt(&[]).contains("struggled"));
    }
}
