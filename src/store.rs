//! In-memory session storage for courses, slides, quizzes, attempts and
//! student progress. One store lives for exactly one bot session: it is
//! constructed in `main`, handed to the handlers, and dies with the process.
//! Nothing in here touches disk.

use std::collections::{BTreeSet, HashMap};

use chrono::{DateTime, Utc};

use crate::quiz::{Quiz, QuizAttempt, QuizDraft};
use crate::slides::Slide;

/// One quiz within one course. Quiz ids repeat across courses, so every
/// attempt lookup must carry both parts.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct QuizKey {
    course: String,
    quiz_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct ProgressKey {
    course: String,
    student: String,
}

/// Accumulated learning state for one student in one course.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StudentProgress {
    pub weak_areas: BTreeSet<String>,
    pub quiz_history: Vec<QuizRecord>,
    pub learning_context: String,
}

/// One graded quiz outcome, kept for the student's history.
#[derive(Debug, Clone, PartialEq)]
pub struct QuizRecord {
    pub quiz_id: String,
    pub score: f64,
    pub taken_at: DateTime<Utc>,
}

#[derive(Debug, Default)]
pub struct SessionStore {
    courses: Vec<String>,
    slides: HashMap<String, Vec<Slide>>,
    quizzes: HashMap<String, Vec<Quiz>>,
    attempts: HashMap<QuizKey, HashMap<String, Vec<QuizAttempt>>>,
    progress: HashMap<ProgressKey, StudentProgress>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_courses<I, S>(courses: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            courses: courses.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    pub fn courses(&self) -> &[String] {
        &self.courses
    }

    /// Append freshly ingested slides to a course. Existing slides are never
    /// replaced or renumbered.
    pub fn save_slides(&mut self, course: &str, slides: Vec<Slide>) {
        self.slides.entry(course.to_string()).or_default().extend(slides);
    }

    pub fn slides(&self, course: &str) -> Vec<Slide> {
        self.slides.get(course).cloned().unwrap_or_default()
    }

    pub fn slide_count(&self, course: &str) -> usize {
        self.slides.get(course).map_or(0, Vec::len)
    }

    /// Remove a slide by position in the course's slide list. Later slides
    /// keep their original `order` values.
    pub fn remove_slide(&mut self, course: &str, index: usize) -> Option<Slide> {
        let slides = self.slides.get_mut(course)?;
        if index < slides.len() {
            Some(slides.remove(index))
        } else {
            None
        }
    }

    /// Publish a reviewed draft. The id is sequential within the course
    /// (`quiz_0`, `quiz_1`, ...) and is returned to the caller.
    pub fn save_quiz(&mut self, course: &str, draft: QuizDraft) -> String {
        let quizzes = self.quizzes.entry(course.to_string()).or_default();
        let id = format!("quiz_{}", quizzes.len());
        quizzes.push(draft.into_quiz(id.clone(), Utc::now()));
        log::info!("published quiz {} for course {}", id, course);
        id
    }

    pub fn quizzes(&self, course: &str) -> Vec<Quiz> {
        self.quizzes.get(course).cloned().unwrap_or_default()
    }

    /// Record a graded submission. Attempts are append-only; earlier attempts
    /// are never touched.
    pub fn save_attempt(&mut self, course: &str, quiz_id: &str, student: &str, attempt: QuizAttempt) {
        self.attempts
            .entry(QuizKey {
                course: course.to_string(),
                quiz_id: quiz_id.to_string(),
            })
            .or_default()
            .entry(student.to_string())
            .or_default()
            .push(attempt);
    }

    /// Every student's attempts for one quiz, keyed by student name.
    pub fn attempts(&self, course: &str, quiz_id: &str) -> HashMap<String, Vec<QuizAttempt>> {
        self.attempts
            .get(&QuizKey {
                course: course.to_string(),
                quiz_id: quiz_id.to_string(),
            })
            .cloned()
            .unwrap_or_default()
    }

    pub fn progress(&self, course: &str, student: &str) -> StudentProgress {
        self.progress
            .get(&ProgressKey {
                course: course.to_string(),
                student: student.to_string(),
            })
            .cloned()
            .unwrap_or_default()
    }

    /// Merge newly identified weak areas into the student's record. The merge
    /// is a set union performed here, so callers never read-modify-write the
    /// whole record; history and context are left untouched.
    pub fn merge_weak_areas(&mut self, course: &str, student: &str, new_areas: &[String]) {
        let entry = self
            .progress
            .entry(ProgressKey {
                course: course.to_string(),
                student: student.to_string(),
            })
            .or_default();
        entry.weak_areas.extend(new_areas.iter().cloned());
    }

    pub fn append_quiz_history(&mut self, course: &str, student: &str, record: QuizRecord) {
        self.progress
            .entry(ProgressKey {
                course: course.to_string(),
                student: student.to_string(),
            })
            .or_default()
            .quiz_history
            .push(record);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quiz::{Analysis, QuizType, StudentAnswer};
    use crate::slides::SlideKind;

    fn slide(order: usize) -> Slide {
        Slide {
            id: format!("slide_{}", order),
            title: format!("Slide {}", order),
            kind: SlideKind::Image,
            pages: vec![vec![0u8]],
            page_count: 1,
            order,
            content: String::new(),
            original_filename: format!("slide_{}.png", order),
        }
    }

    fn draft(title: &str) -> QuizDraft {
        QuizDraft {
            title: title.to_string(),
            quiz_type: QuizType::MultipleChoice,
            learning_objectives: "objectives".to_string(),
            questions: Vec::new(),
        }
    }

    fn attempt(score: f64) -> QuizAttempt {
        QuizAttempt {
            answers: vec![StudentAnswer {
                answer: "A. something".to_string(),
            }],
            analysis: Analysis {
                overall_score: score,
                question_scores: Vec::new(),
                weak_areas: Vec::new(),
                strong_areas: Vec::new(),
                recommendations: Vec::new(),
                overall_feedback: String::new(),
                needs_remediation: score < crate::quiz::PASSING_THRESHOLD,
            },
            timestamp: Utc::now(),
        }
    }

    #[test]
    fn quiz_ids_are_sequential_per_course() {
        let mut store = SessionStore::new();
        for n in 0..3 {
            let id = store.save_quiz("algorithms", draft(&format!("Quiz {}", n)));
            assert_eq!(id, format!("quiz_{}", n));
        }
        // a different course starts counting from zero again
        assert_eq!(store.save_quiz("databases", draft("Quiz")), "quiz_0");

        let ids: Vec<String> = store
            .quizzes("algorithms")
            .iter()
            .map(|q| q.id.clone())
            .collect();
        assert_eq!(ids, vec!["quiz_0", "quiz_1", "quiz_2"]);
    }

    #[test]
    fn missing_keys_yield_empty_defaults() {
        let store = SessionStore::new();
        assert!(store.slides("nowhere").is_empty());
        assert!(store.quizzes("nowhere").is_empty());
        assert!(store.attempts("nowhere", "quiz_0").is_empty());
        assert_eq!(store.progress("nowhere", "nobody"), StudentProgress::default());
    }

    #[test]
    fn attempts_are_append_only_and_ordered() {
        let mut store = SessionStore::new();
        store.save_attempt("algorithms", "quiz_0", "ada", attempt(42.0));
        store.save_attempt("algorithms", "quiz_0", "ada", attempt(95.0));

        let attempts = store.attempts("algorithms", "quiz_0");
        let ada = &attempts["ada"];
        assert_eq!(ada.len(), 2);
        assert_eq!(ada[0].analysis.overall_score, 42.0);
        assert_eq!(ada[1].analysis.overall_score, 95.0);
    }

    #[test]
    fn attempts_are_scoped_by_course_and_quiz() {
        let mut store = SessionStore::new();
        store.save_attempt("algorithms", "quiz_0", "ada", attempt(50.0));
        store.save_attempt("databases", "quiz_0", "ada", attempt(60.0));

        assert_eq!(store.attempts("algorithms", "quiz_0")["ada"].len(), 1);
        assert_eq!(store.attempts("databases", "quiz_0")["ada"].len(), 1);
        assert!(store.attempts("algorithms", "quiz_1").is_empty());
    }

    #[test]
    fn weak_areas_merge_as_set_union() {
        let mut store = SessionStore::new();
        store.merge_weak_areas("ml", "ada", &["gradients".to_string(), "backprop".to_string()]);
        store.merge_weak_areas("ml", "ada", &["backprop".to_string(), "softmax".to_string()]);

        let progress = store.progress("ml", "ada");
        let areas: Vec<&str> = progress.weak_areas.iter().map(String::as_str).collect();
        assert_eq!(areas, vec!["backprop", "gradients", "softmax"]);
    }

    #[test]
    fn weak_area_merge_keeps_history_and_context() {
        let mut store = SessionStore::new();
        store.append_quiz_history(
            "ml",
            "ada",
            QuizRecord {
                quiz_id: "quiz_0".to_string(),
                score: 55.0,
                taken_at: Utc::now(),
            },
        );
        store.merge_weak_areas("ml", "ada", &["gradients".to_string()]);

        let progress = store.progress("ml", "ada");
        assert_eq!(progress.quiz_history.len(), 1);
        assert!(progress.weak_areas.contains("gradients"));
    }

    #[test]
    fn slides_append_across_batches() {
        let mut store = SessionStore::new();
        store.save_slides("ml", vec![slide(0), slide(1)]);
        store.save_slides("ml", vec![slide(2)]);

        let orders: Vec<usize> = store.slides("ml").iter().map(|s| s.order).collect();
        assert_eq!(orders, vec![0, 1, 2]);
    }

    #[test]
    fn remove_slide_out_of_range_is_none() {
        let mut store = SessionStore::new();
        store.save_slides("ml", vec![slide(0)]);
        assert!(store.remove_slide("ml", 5).is_none());
        assert!(store.remove_slide("nowhere", 0).is_none());
        assert_eq!(store.remove_slide("ml", 0).map(|s| s.order), Some(0));
    }
}
