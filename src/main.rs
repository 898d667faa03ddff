mod agents;
mod quiz;
mod slides;
mod store;

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use chrono::Utc;
use dotenv::dotenv;
use teloxide::{
    dispatching::dialogue::InMemStorage,
    net::Download,
    prelude::*,
    types::{ChatAction, InputFile, KeyboardButton, KeyboardMarkup, KeyboardRemove, ParseMode},
};

use crate::agents::tester::{Difficulty, PracticeQuestion, QuickQuestion};
use crate::agents::{reviewer, PracticeGenerator, QuizGenerator, Reviewer, Tutor};
use crate::quiz::{
    Analysis, GradingItem, QuestionKind, Quiz, QuizAttempt, QuizDraft, QuizType, StudentAnswer,
};
use crate::slides::{PdfiumRenderer, Slide, SlideIngestor, UploadedFile};
use crate::store::{QuizRecord, SessionStore};

type BotDialogue = Dialogue<State, InMemStorage<State>>;
type HandlerResult = Result<(), Box<dyn std::error::Error + Send + Sync>>;
type SharedStore = Arc<Mutex<SessionStore>>;
type SharedIngestor = Arc<SlideIngestor>;
type SharedAgents = Arc<Agents>;
type SharedTutors = Arc<tokio::sync::Mutex<HashMap<ChatId, Tutor>>>;

/// The completion-service wrappers every handler can reach. Tutors are kept
/// separately, one per chat, because they carry conversation state.
struct Agents {
    generator: QuizGenerator,
    reviewer: Reviewer,
    practice: PracticeGenerator,
    api_key: String,
}

const DEFAULT_COURSES: [&str; 4] = [
    "Introduction to Computer Science",
    "Data Structures and Algorithms",
    "Machine Learning Fundamentals",
    "Web Development",
];

const PRACTICE_QUESTION_COUNT: usize = 3;
const MAX_QUIZ_QUESTIONS: usize = 20;

#[derive(Clone)]
pub enum Role {
    Instructor,
    Student,
}

/// Who is talking and which course they are working in.
#[derive(Clone)]
pub struct Ctx {
    pub name: String,
    pub course: String,
}

#[derive(Clone, Default)]
pub enum State {
    #[default]
    Start,
    ReceiveName,
    ReceiveRole {
        name: String,
    },
    ReceiveCourse {
        name: String,
        role: Role,
    },
    InstructorMenu {
        ctx: Ctx,
    },
    ReceiveSlides {
        ctx: Ctx,
    },
    ReceiveQuizTitle {
        ctx: Ctx,
    },
    ReceiveQuizType {
        ctx: Ctx,
        title: String,
    },
    ReceiveQuizCount {
        ctx: Ctx,
        title: String,
        quiz_type: QuizType,
    },
    ReceiveSlideChoice {
        ctx: Ctx,
        title: String,
        quiz_type: QuizType,
        count: usize,
    },
    ReceiveObjectives {
        ctx: Ctx,
        title: String,
        quiz_type: QuizType,
        count: usize,
        slide_indices: Vec<usize>,
    },
    ReviewDraft {
        ctx: Ctx,
        draft: QuizDraft,
    },
    ReceiveReportChoice {
        ctx: Ctx,
    },
    StudentMenu {
        ctx: Ctx,
    },
    ReceiveTutorTopic {
        ctx: Ctx,
    },
    Tutoring {
        ctx: Ctx,
        slide_index: usize,
    },
    ReceivePracticeTopic {
        ctx: Ctx,
    },
    ReceivePracticeDifficulty {
        ctx: Ctx,
        slide_index: usize,
    },
    PracticeQuiz {
        ctx: Ctx,
        questions: Vec<PracticeQuestion>,
        answers: Vec<String>,
    },
    ReceiveQuizChoice {
        ctx: Ctx,
    },
    TakingQuiz {
        ctx: Ctx,
        quiz_index: usize,
        answers: Vec<String>,
    },
}

#[tokio::main]
async fn main() {
    dotenv().expect("Failed to load .env file");
    let api_key = std::env::var("OPENAI_API_KEY").expect("OPENAI_API_KEY is not set");

    pretty_env_logger::init();
    log::info!("Starting course companion bot...");

    let bot = Bot::from_env();

    let store: SharedStore = Arc::new(Mutex::new(SessionStore::with_courses(DEFAULT_COURSES)));
    let ingestor: SharedIngestor = Arc::new(SlideIngestor::new(Box::new(PdfiumRenderer)));
    let agents: SharedAgents = Arc::new(Agents {
        generator: QuizGenerator::new(&api_key).expect("Unable to set up the quiz generator"),
        reviewer: Reviewer::new(&api_key).expect("Unable to set up the reviewer"),
        practice: PracticeGenerator::new(&api_key).expect("Unable to set up the practice generator"),
        api_key,
    });
    let tutors: SharedTutors = Arc::new(tokio::sync::Mutex::new(HashMap::new()));

    Dispatcher::builder(
        bot,
        Update::filter_message()
            .enter_dialogue::<Message, InMemStorage<State>, State>()
            .branch(dptree::case![State::Start].endpoint(start))
            .branch(dptree::case![State::ReceiveName].endpoint(receive_name))
            .branch(dptree::case![State::ReceiveRole { name }].endpoint(receive_role))
            .branch(dptree::case![State::ReceiveCourse { name, role }].endpoint(receive_course))
            .branch(dptree::case![State::InstructorMenu { ctx }].endpoint(instructor_menu))
            .branch(dptree::case![State::ReceiveSlides { ctx }].endpoint(receive_slides))
            .branch(dptree::case![State::ReceiveQuizTitle { ctx }].endpoint(receive_quiz_title))
            .branch(dptree::case![State::ReceiveQuizType { ctx, title }].endpoint(receive_quiz_type))
            .branch(
                dptree::case![State::ReceiveQuizCount { ctx, title, quiz_type }]
                    .endpoint(receive_quiz_count),
            )
            .branch(
                dptree::case![State::ReceiveSlideChoice { ctx, title, quiz_type, count }]
                    .endpoint(receive_slide_choice),
            )
            .branch(
                dptree::case![State::ReceiveObjectives {
                    ctx,
                    title,
                    quiz_type,
                    count,
                    slide_indices
                }]
                .endpoint(receive_objectives),
            )
            .branch(dptree::case![State::ReviewDraft { ctx, draft }].endpoint(review_draft))
            .branch(dptree::case![State::ReceiveReportChoice { ctx }].endpoint(receive_report_choice))
            .branch(dptree::case![State::StudentMenu { ctx }].endpoint(student_menu))
            .branch(dptree::case![State::ReceiveTutorTopic { ctx }].endpoint(receive_tutor_topic))
            .branch(dptree::case![State::Tutoring { ctx, slide_index }].endpoint(tutoring))
            .branch(dptree::case![State::ReceivePracticeTopic { ctx }].endpoint(receive_practice_topic))
            .branch(
                dptree::case![State::ReceivePracticeDifficulty { ctx, slide_index }]
                    .endpoint(receive_practice_difficulty),
            )
            .branch(
                dptree::case![State::PracticeQuiz { ctx, questions, answers }]
                    .endpoint(practice_quiz),
            )
            .branch(dptree::case![State::ReceiveQuizChoice { ctx }].endpoint(receive_quiz_choice))
            .branch(
                dptree::case![State::TakingQuiz { ctx, quiz_index, answers }].endpoint(taking_quiz),
            ),
    )
    .dependencies(dptree::deps![
        InMemStorage::<State>::new(),
        store,
        ingestor,
        agents,
        tutors
    ])
    .enable_ctrlc_handler()
    .build()
    .dispatch()
    .await;
}

const GREETING_TEXT: &str = "Hi! I'm your course companion. Instructors publish slides and \
quizzes through me; students study them with an AI tutor. Let's get acquainted — what's your name?";

const ROLE_INSTRUCTOR: &str = "Instructor";
const ROLE_STUDENT: &str = "Student";

const BTN_UPLOAD: &str = "Upload slides";
const BTN_CREATE_QUIZ: &str = "Create quiz";
const BTN_REPORTS: &str = "Quiz reports";
const BTN_SWITCH: &str = "Switch course";
const BTN_VIEW_SLIDES: &str = "View slides";
const BTN_TUTOR: &str = "Study companion";
const BTN_PRACTICE: &str = "Practice quiz";
const BTN_TAKE_QUIZ: &str = "Take quiz";
const BTN_DONE: &str = "Done";
const BTN_CANCEL: &str = "Cancel";
const BTN_PUBLISH: &str = "Publish";
const BTN_END: &str = "End session";

// ---- onboarding ----

async fn start(bot: Bot, dialogue: BotDialogue, msg: Message) -> HandlerResult {
    bot.send_message(msg.chat.id, GREETING_TEXT).await?;
    dialogue.update(State::ReceiveName).await?;
    Ok(())
}

async fn receive_name(bot: Bot, dialogue: BotDialogue, msg: Message) -> HandlerResult {
    let Some(name) = msg.text() else {
        bot.send_message(msg.chat.id, "Please send your name as text.").await?;
        return Ok(());
    };

    bot.send_message(msg.chat.id, format!("Nice to meet you, {}!", name))
        .await?;
    bot.send_message(msg.chat.id, "Are you an instructor or a student?")
        .reply_markup(keyboard(vec![vec![ROLE_INSTRUCTOR, ROLE_STUDENT]]))
        .await?;

    dialogue
        .update(State::ReceiveRole {
            name: name.to_string(),
        })
        .await?;
    Ok(())
}

async fn receive_role(
    bot: Bot,
    dialogue: BotDialogue,
    name: String,
    msg: Message,
    store: SharedStore,
) -> HandlerResult {
    let role = match msg.text() {
        Some(ROLE_INSTRUCTOR) => Role::Instructor,
        Some(ROLE_STUDENT) => Role::Student,
        _ => {
            bot.send_message(msg.chat.id, "Please pick one of the two roles.")
                .reply_markup(keyboard(vec![vec![ROLE_INSTRUCTOR, ROLE_STUDENT]]))
                .await?;
            return Ok(());
        }
    };

    let courses = store.lock().unwrap().courses().to_vec();
    send_course_menu(&bot, msg.chat.id, &courses).await?;
    dialogue.update(State::ReceiveCourse { name, role }).await?;
    Ok(())
}

async fn receive_course(
    bot: Bot,
    dialogue: BotDialogue,
    (name, role): (String, Role),
    msg: Message,
    store: SharedStore,
) -> HandlerResult {
    let courses = store.lock().unwrap().courses().to_vec();
    let Some(course) = msg.text().map(str::to_string).filter(|c| courses.contains(c)) else {
        bot.send_message(msg.chat.id, "Please pick a course from the keyboard.")
            .await?;
        send_course_menu(&bot, msg.chat.id, &courses).await?;
        return Ok(());
    };

    bot.send_message(msg.chat.id, format!("Course selected: {}", course))
        .await?;
    let ctx = Ctx { name, course };
    match role {
        Role::Instructor => to_instructor_menu(&bot, &dialogue, msg.chat.id, ctx).await,
        Role::Student => to_student_menu(&bot, &dialogue, msg.chat.id, ctx).await,
    }
}

// ---- instructor flows ----

async fn instructor_menu(
    bot: Bot,
    dialogue: BotDialogue,
    ctx: Ctx,
    msg: Message,
    store: SharedStore,
) -> HandlerResult {
    match msg.text() {
        Some(BTN_UPLOAD) => {
            bot.send_message(
                msg.chat.id,
                "Send slide files as documents or photos. 'list' shows what is stored, \
                 'remove <n>' deletes one, Done finishes.",
            )
            .reply_markup(keyboard(vec![vec![BTN_DONE]]))
            .await?;
            dialogue.update(State::ReceiveSlides { ctx }).await?;
        }
        Some(BTN_CREATE_QUIZ) => {
            if store.lock().unwrap().slide_count(&ctx.course) == 0 {
                bot.send_message(
                    msg.chat.id,
                    "⚠️ Upload slides first — quizzes are generated from slide content.",
                )
                .await?;
                return Ok(());
            }
            bot.send_message(msg.chat.id, "What should the quiz be called?")
                .reply_markup(KeyboardRemove::new())
                .await?;
            dialogue.update(State::ReceiveQuizTitle { ctx }).await?;
        }
        Some(BTN_REPORTS) => {
            let quizzes = store.lock().unwrap().quizzes(&ctx.course);
            if quizzes.is_empty() {
                bot.send_message(msg.chat.id, "No quizzes created yet. Create one to see reports!")
                    .await?;
                return Ok(());
            }
            bot.send_message(
                msg.chat.id,
                format!("{}\n\nWhich quiz number?", quiz_listing(&quizzes)),
            )
            .reply_markup(KeyboardRemove::new())
            .await?;
            dialogue.update(State::ReceiveReportChoice { ctx }).await?;
        }
        Some(BTN_SWITCH) => {
            let courses = store.lock().unwrap().courses().to_vec();
            send_course_menu(&bot, msg.chat.id, &courses).await?;
            dialogue
                .update(State::ReceiveCourse {
                    name: ctx.name,
                    role: Role::Instructor,
                })
                .await?;
        }
        _ => {
            send_instructor_menu(&bot, msg.chat.id).await?;
        }
    }
    Ok(())
}

async fn receive_slides(
    bot: Bot,
    dialogue: BotDialogue,
    ctx: Ctx,
    msg: Message,
    store: SharedStore,
    ingestor: SharedIngestor,
) -> HandlerResult {
    if let Some(text) = msg.text() {
        if text == BTN_DONE {
            let total = store.lock().unwrap().slide_count(&ctx.course);
            bot.send_message(
                msg.chat.id,
                format!("📚 {} slide set(s) stored for {}.", total, ctx.course),
            )
            .await?;
            return to_instructor_menu(&bot, &dialogue, msg.chat.id, ctx).await;
        }
        if text.eq_ignore_ascii_case("list") {
            let slides = store.lock().unwrap().slides(&ctx.course);
            let listing = if slides.is_empty() {
                "No slides uploaded yet.".to_string()
            } else {
                slide_listing(&slides)
            };
            bot.send_message(msg.chat.id, listing).await?;
            return Ok(());
        }
        if let Some(rest) = text.strip_prefix("remove ") {
            let removed = {
                let mut guard = store.lock().unwrap();
                let count = guard.slide_count(&ctx.course);
                parse_index(rest, count).and_then(|i| guard.remove_slide(&ctx.course, i))
            };
            match removed {
                Some(slide) => {
                    bot.send_message(msg.chat.id, format!("Removed {}.", slide.title))
                        .await?
                }
                None => bot.send_message(msg.chat.id, "No slide with that number.").await?,
            };
            return Ok(());
        }
        bot.send_message(
            msg.chat.id,
            "Send a document or photo, 'list', 'remove <n>', or Done.",
        )
        .await?;
        return Ok(());
    }

    let file_ref = if let Some(doc) = msg.document() {
        Some((
            doc.file.id.clone(),
            doc.file_name
                .clone()
                .unwrap_or_else(|| "document.pdf".to_string()),
        ))
    } else if let Some(photo) = msg.photo().and_then(|sizes| sizes.last()) {
        Some((
            photo.file.id.clone(),
            format!("photo_{}.jpg", photo.file.unique_id),
        ))
    } else {
        None
    };
    let Some((file_id, name)) = file_ref else {
        bot.send_message(msg.chat.id, "Please send a document or photo.")
            .await?;
        return Ok(());
    };

    let file = bot.get_file(file_id).await?;
    let mut bytes = Vec::new();
    bot.download_file(&file.path, &mut bytes).await?;
    log::debug!("downloaded {} ({} bytes)", name, bytes.len());

    let existing = store.lock().unwrap().slide_count(&ctx.course);
    let report = ingestor.ingest_batch(vec![UploadedFile { name, bytes }], existing);
    for warning in &report.warnings {
        bot.send_message(msg.chat.id, format!("⚠️ {}", warning)).await?;
    }
    if !report.accepted.is_empty() {
        let summary: Vec<String> = report
            .accepted
            .iter()
            .map(|s| format!("{} ({} page(s))", s.title, s.page_count))
            .collect();
        store.lock().unwrap().save_slides(&ctx.course, report.accepted);
        bot.send_message(msg.chat.id, format!("✅ Uploaded {}.", summary.join(", ")))
            .await?;
    }
    Ok(())
}

async fn receive_quiz_title(
    bot: Bot,
    dialogue: BotDialogue,
    ctx: Ctx,
    msg: Message,
) -> HandlerResult {
    if msg.text() == Some(BTN_CANCEL) {
        return to_instructor_menu(&bot, &dialogue, msg.chat.id, ctx).await;
    }
    let Some(title) = msg.text().map(str::trim).filter(|t| !t.is_empty()) else {
        bot.send_message(msg.chat.id, "Please send a quiz title.").await?;
        return Ok(());
    };

    let rows = QuizType::ALL.iter().map(|t| vec![t.label()]).collect();
    bot.send_message(msg.chat.id, "Quiz type?")
        .reply_markup(keyboard(rows))
        .await?;
    dialogue
        .update(State::ReceiveQuizType {
            ctx,
            title: title.to_string(),
        })
        .await?;
    Ok(())
}

async fn receive_quiz_type(
    bot: Bot,
    dialogue: BotDialogue,
    (ctx, title): (Ctx, String),
    msg: Message,
) -> HandlerResult {
    if msg.text() == Some(BTN_CANCEL) {
        return to_instructor_menu(&bot, &dialogue, msg.chat.id, ctx).await;
    }
    let Some(quiz_type) = msg.text().and_then(QuizType::from_label) else {
        bot.send_message(msg.chat.id, "Please pick a quiz type from the keyboard.")
            .await?;
        return Ok(());
    };

    bot.send_message(msg.chat.id, "How many questions?")
        .reply_markup(keyboard(vec![vec!["3"], vec!["5"], vec!["10"]]))
        .await?;
    dialogue
        .update(State::ReceiveQuizCount { ctx, title, quiz_type })
        .await?;
    Ok(())
}

async fn receive_quiz_count(
    bot: Bot,
    dialogue: BotDialogue,
    (ctx, title, quiz_type): (Ctx, String, QuizType),
    msg: Message,
    store: SharedStore,
) -> HandlerResult {
    if msg.text() == Some(BTN_CANCEL) {
        return to_instructor_menu(&bot, &dialogue, msg.chat.id, ctx).await;
    }
    let count = match msg.text().and_then(|t| t.trim().parse::<usize>().ok()) {
        Some(n) if (1..=MAX_QUIZ_QUESTIONS).contains(&n) => n,
        _ => {
            bot.send_message(
                msg.chat.id,
                format!("Please send a number between 1 and {}.", MAX_QUIZ_QUESTIONS),
            )
            .await?;
            return Ok(());
        }
    };

    let slides = store.lock().unwrap().slides(&ctx.course);
    bot.send_message(
        msg.chat.id,
        format!(
            "{}\n\nWhich slides should the quiz draw on? Send numbers (e.g. '1 3') or 'all'.",
            slide_listing(&slides)
        ),
    )
    .reply_markup(KeyboardRemove::new())
    .await?;
    dialogue
        .update(State::ReceiveSlideChoice {
            ctx,
            title,
            quiz_type,
            count,
        })
        .await?;
    Ok(())
}

async fn receive_slide_choice(
    bot: Bot,
    dialogue: BotDialogue,
    (ctx, title, quiz_type, count): (Ctx, String, QuizType, usize),
    msg: Message,
    store: SharedStore,
) -> HandlerResult {
    if msg.text() == Some(BTN_CANCEL) {
        return to_instructor_menu(&bot, &dialogue, msg.chat.id, ctx).await;
    }
    let slide_count = store.lock().unwrap().slide_count(&ctx.course);
    let Some(text) = msg.text() else {
        bot.send_message(msg.chat.id, "Send slide numbers or 'all'.").await?;
        return Ok(());
    };

    let slide_indices: Vec<usize> = if text.trim().eq_ignore_ascii_case("all") {
        (0..slide_count).collect()
    } else {
        let mut indices = Vec::new();
        for token in text
            .split(|c: char| c == ' ' || c == ',')
            .filter(|t| !t.is_empty())
        {
            match parse_index(token, slide_count) {
                Some(i) if !indices.contains(&i) => indices.push(i),
                Some(_) => {}
                None => {
                    bot.send_message(
                        msg.chat.id,
                        format!("'{}' is not a valid slide number.", token),
                    )
                    .await?;
                    return Ok(());
                }
            }
        }
        indices
    };

    if slide_indices.is_empty() {
        bot.send_message(msg.chat.id, "Please select at least one slide.")
            .await?;
        return Ok(());
    }

    bot.send_message(
        msg.chat.id,
        "What are the learning objectives for this quiz? (one or more lines)",
    )
    .await?;
    dialogue
        .update(State::ReceiveObjectives {
            ctx,
            title,
            quiz_type,
            count,
            slide_indices,
        })
        .await?;
    Ok(())
}

async fn receive_objectives(
    bot: Bot,
    dialogue: BotDialogue,
    (ctx, title, quiz_type, count, slide_indices): (Ctx, String, QuizType, usize, Vec<usize>),
    msg: Message,
    store: SharedStore,
    agents: SharedAgents,
) -> HandlerResult {
    if msg.text() == Some(BTN_CANCEL) {
        return to_instructor_menu(&bot, &dialogue, msg.chat.id, ctx).await;
    }
    let Some(objectives) = msg.text().map(str::trim).filter(|t| !t.is_empty()) else {
        bot.send_message(msg.chat.id, "Please enter the learning objectives for this quiz.")
            .await?;
        return Ok(());
    };

    let slide_content = {
        let guard = store.lock().unwrap();
        slides::compile_content(&guard.slides(&ctx.course), &slide_indices)
    };

    bot.send_message(msg.chat.id, "🤖 Generating quiz questions...").await?;
    let _ = bot.send_chat_action(msg.chat.id, ChatAction::Typing).await;

    match agents
        .generator
        .generate(&slide_content, objectives, quiz_type, count)
        .await
    {
        Ok(questions) if questions.is_empty() => {
            bot.send_message(
                msg.chat.id,
                "The model returned no questions — try rephrasing the objectives.",
            )
            .await?;
        }
        Ok(questions) => {
            let draft = QuizDraft {
                title,
                quiz_type,
                learning_objectives: objectives.to_string(),
                questions,
            };
            bot.send_message(msg.chat.id, render_draft(&draft))
                .reply_markup(keyboard(vec![vec![BTN_PUBLISH, BTN_CANCEL]]))
                .await?;
            dialogue.update(State::ReviewDraft { ctx, draft }).await?;
        }
        Err(err) => {
            log::warn!("quiz generation failed: {}", err);
            bot.send_message(
                msg.chat.id,
                format!(
                    "Failed to generate quiz: {}. Adjust the objectives and try again, or Cancel.",
                    err
                ),
            )
            .await?;
        }
    }
    Ok(())
}

async fn review_draft(
    bot: Bot,
    dialogue: BotDialogue,
    (ctx, mut draft): (Ctx, QuizDraft),
    msg: Message,
    store: SharedStore,
) -> HandlerResult {
    let text = msg.text().unwrap_or_default();

    if text == BTN_PUBLISH {
        if draft.questions.is_empty() {
            bot.send_message(
                msg.chat.id,
                "Every question was removed — nothing to publish. Cancel and regenerate.",
            )
            .await?;
            return Ok(());
        }
        let id = store.lock().unwrap().save_quiz(&ctx.course, draft);
        bot.send_message(msg.chat.id, format!("🎉 Quiz published! Id: {}", id))
            .await?;
        return to_instructor_menu(&bot, &dialogue, msg.chat.id, ctx).await;
    }

    if text == BTN_CANCEL {
        bot.send_message(msg.chat.id, "Draft discarded.").await?;
        return to_instructor_menu(&bot, &dialogue, msg.chat.id, ctx).await;
    }

    if let Some(rest) = text.strip_prefix("remove ") {
        match rest
            .trim()
            .parse::<usize>()
            .ok()
            .and_then(|n| draft.remove_question(n))
        {
            Some(question) => {
                bot.send_message(msg.chat.id, format!("Removed: {}", question.question))
                    .await?;
                bot.send_message(msg.chat.id, render_draft(&draft))
                    .reply_markup(keyboard(vec![vec![BTN_PUBLISH, BTN_CANCEL]]))
                    .await?;
            }
            None => {
                bot.send_message(msg.chat.id, "No question with that number.").await?;
            }
        }
        dialogue.update(State::ReviewDraft { ctx, draft }).await?;
        return Ok(());
    }

    bot.send_message(msg.chat.id, "Publish, remove <number>, or Cancel.")
        .await?;
    Ok(())
}

async fn receive_report_choice(
    bot: Bot,
    dialogue: BotDialogue,
    ctx: Ctx,
    msg: Message,
    store: SharedStore,
) -> HandlerResult {
    if msg.text() == Some(BTN_CANCEL) {
        return to_instructor_menu(&bot, &dialogue, msg.chat.id, ctx).await;
    }
    let quizzes = store.lock().unwrap().quizzes(&ctx.course);
    let Some(index) = msg.text().and_then(|t| parse_index(t, quizzes.len())) else {
        bot.send_message(msg.chat.id, "Send the number of a quiz from the list.")
            .await?;
        return Ok(());
    };

    let quiz = &quizzes[index];
    let attempts = store.lock().unwrap().attempts(&ctx.course, &quiz.id);
    if attempts.is_empty() {
        bot.send_message(msg.chat.id, "No student submissions yet for this quiz.")
            .await?;
        return to_instructor_menu(&bot, &dialogue, msg.chat.id, ctx).await;
    }

    let mut students: Vec<_> = attempts.iter().collect();
    students.sort_by(|a, b| a.0.cmp(b.0));

    let mut text = format!(
        "📈 Report for {} ({})\nSubmissions from {} student(s)\n",
        quiz.title,
        quiz.id,
        attempts.len()
    );
    for (student, list) in students {
        text.push_str(&format!("\n👤 {} — {} attempt(s)\n", student, list.len()));
        for (n, attempt) in list.iter().enumerate() {
            text.push_str(&format!(
                "  Attempt {} ({}): {:.1}%\n",
                n + 1,
                attempt.timestamp.format("%Y-%m-%d %H:%M"),
                attempt.analysis.overall_score
            ));
            for score in &attempt.analysis.question_scores {
                text.push_str(&format!(
                    "    Q{}: {}/{} — {}\n",
                    score.question_number, score.points_earned, score.max_points, score.feedback
                ));
            }
            if !attempt.analysis.weak_areas.is_empty() {
                text.push_str(&format!(
                    "    Weak areas: {}\n",
                    attempt.analysis.weak_areas.join(", ")
                ));
            }
        }
    }
    bot.send_message(msg.chat.id, text).await?;
    to_instructor_menu(&bot, &dialogue, msg.chat.id, ctx).await
}

// ---- student flows ----

async fn student_menu(
    bot: Bot,
    dialogue: BotDialogue,
    ctx: Ctx,
    msg: Message,
    store: SharedStore,
    agents: SharedAgents,
) -> HandlerResult {
    let text = msg.text().unwrap_or_default();

    if text == BTN_VIEW_SLIDES {
        let slides = store.lock().unwrap().slides(&ctx.course);
        if slides.is_empty() {
            bot.send_message(
                msg.chat.id,
                "📭 No slides available yet. Your instructor will upload them soon!",
            )
            .await?;
        } else {
            bot.send_message(
                msg.chat.id,
                format!(
                    "{}\n\nSend 'slide <n>' to see a first page, or 'drill <topic>' for a \
                     quick practice question.",
                    slide_listing(&slides)
                ),
            )
            .await?;
        }
        return Ok(());
    }

    if let Some(rest) = text.strip_prefix("slide ") {
        let slides = store.lock().unwrap().slides(&ctx.course);
        match parse_index(rest, slides.len()) {
            Some(index) => {
                let slide = &slides[index];
                match slide.pages.first() {
                    Some(page) => {
                        bot.send_photo(msg.chat.id, InputFile::memory(page.clone()))
                            .caption(format!("{} — page 1 of {}", slide.title, slide.page_count))
                            .await?;
                    }
                    None => {
                        bot.send_message(msg.chat.id, "No preview available for that slide.")
                            .await?;
                    }
                }
            }
            None => {
                bot.send_message(msg.chat.id, "No slide with that number.").await?;
            }
        }
        return Ok(());
    }

    if let Some(topic) = text.strip_prefix("drill ") {
        let _ = bot.send_chat_action(msg.chat.id, ChatAction::Typing).await;
        match agents.practice.quick_question(topic.trim()).await {
            Ok(question) => {
                bot.send_message(msg.chat.id, render_quick_question(&question))
                    .await?;
            }
            Err(err) => {
                log::warn!("quick question failed: {}", err);
                bot.send_message(msg.chat.id, format!("Failed to generate a question: {}", err))
                    .await?;
            }
        }
        return Ok(());
    }

    if text == BTN_TUTOR || text == BTN_PRACTICE {
        let slides = store.lock().unwrap().slides(&ctx.course);
        if slides.is_empty() {
            bot.send_message(
                msg.chat.id,
                "⚠️ No slides available yet — please wait for your instructor.",
            )
            .await?;
            return Ok(());
        }
        bot.send_message(
            msg.chat.id,
            format!("{}\n\nWhich slide number?", slide_listing(&slides)),
        )
        .reply_markup(KeyboardRemove::new())
        .await?;
        let next = if text == BTN_TUTOR {
            State::ReceiveTutorTopic { ctx }
        } else {
            State::ReceivePracticeTopic { ctx }
        };
        dialogue.update(next).await?;
        return Ok(());
    }

    if text == BTN_TAKE_QUIZ {
        let quizzes = store.lock().unwrap().quizzes(&ctx.course);
        if quizzes.is_empty() {
            bot.send_message(msg.chat.id, "📭 No quizzes available yet. Check back later!")
                .await?;
            return Ok(());
        }
        bot.send_message(
            msg.chat.id,
            format!("{}\n\nWhich quiz number?", quiz_listing(&quizzes)),
        )
        .reply_markup(KeyboardRemove::new())
        .await?;
        dialogue.update(State::ReceiveQuizChoice { ctx }).await?;
        return Ok(());
    }

    if text == BTN_SWITCH {
        let courses = store.lock().unwrap().courses().to_vec();
        send_course_menu(&bot, msg.chat.id, &courses).await?;
        dialogue
            .update(State::ReceiveCourse {
                name: ctx.name,
                role: Role::Student,
            })
            .await?;
        return Ok(());
    }

    send_student_menu(&bot, msg.chat.id).await?;
    Ok(())
}

async fn receive_tutor_topic(
    bot: Bot,
    dialogue: BotDialogue,
    ctx: Ctx,
    msg: Message,
    store: SharedStore,
    agents: SharedAgents,
    tutors: SharedTutors,
) -> HandlerResult {
    if msg.text() == Some(BTN_CANCEL) {
        return to_student_menu(&bot, &dialogue, msg.chat.id, ctx).await;
    }
    let slides = store.lock().unwrap().slides(&ctx.course);
    let Some(index) = msg.text().and_then(|t| parse_index(t, slides.len())) else {
        bot.send_message(msg.chat.id, "Send the number of the slide you want to study.")
            .await?;
        return Ok(());
    };

    let weak_areas: Vec<String> = {
        let guard = store.lock().unwrap();
        guard
            .progress(&ctx.course, &ctx.name)
            .weak_areas
            .into_iter()
            .collect()
    };
    if !weak_areas.is_empty() {
        bot.send_message(
            msg.chat.id,
            format!(
                "🎯 Focus areas: {}\nYour tutor will pay special attention to these.",
                weak_areas.join(", ")
            ),
        )
        .await?;
    }

    let slide = &slides[index];
    let content = format!("{}\n{}", slide.title, slide.content);
    let _ = bot.send_chat_action(msg.chat.id, ChatAction::Typing).await;

    let fresh = Tutor::new(&agents.api_key)?;
    let mut tutors_guard = tutors.lock().await;
    let tutor = tutors_guard.entry(msg.chat.id).or_insert(fresh);
    // fresh topic session: previous conversation is gone
    tutor.reset();

    match tutor.teach(&content, &weak_areas, None).await {
        Ok(reply) => {
            bot.send_message(msg.chat.id, reply)
                .reply_markup(keyboard(vec![vec![BTN_END]]))
                .await?;
            bot.send_message(
                msg.chat.id,
                "Ask me follow-up questions about this topic, or press End session.",
            )
            .await?;
            dialogue
                .update(State::Tutoring {
                    ctx,
                    slide_index: index,
                })
                .await?;
        }
        Err(err) => {
            log::warn!("tutor call failed: {}", err);
            bot.send_message(
                msg.chat.id,
                format!("The tutor is unavailable right now: {}. Try again.", err),
            )
            .await?;
        }
    }
    Ok(())
}

async fn tutoring(
    bot: Bot,
    dialogue: BotDialogue,
    (ctx, slide_index): (Ctx, usize),
    msg: Message,
    store: SharedStore,
    tutors: SharedTutors,
) -> HandlerResult {
    let Some(text) = msg.text() else {
        bot.send_message(msg.chat.id, "Please ask your question as text.").await?;
        return Ok(());
    };

    if text == BTN_END {
        if let Some(tutor) = tutors.lock().await.get_mut(&msg.chat.id) {
            tutor.reset();
        }
        return to_student_menu(&bot, &dialogue, msg.chat.id, ctx).await;
    }

    let (content, weak_areas) = {
        let guard = store.lock().unwrap();
        let slides = guard.slides(&ctx.course);
        let content = slides
            .get(slide_index)
            .map(|s| format!("{}\n{}", s.title, s.content))
            .unwrap_or_default();
        let weak: Vec<String> = guard
            .progress(&ctx.course, &ctx.name)
            .weak_areas
            .into_iter()
            .collect();
        (content, weak)
    };

    let _ = bot.send_chat_action(msg.chat.id, ChatAction::Typing).await;
    let mut tutors_guard = tutors.lock().await;
    let Some(tutor) = tutors_guard.get_mut(&msg.chat.id) else {
        bot.send_message(msg.chat.id, "The session was lost — pick a topic again.")
            .await?;
        return to_student_menu(&bot, &dialogue, msg.chat.id, ctx).await;
    };

    match tutor.teach(&content, &weak_areas, Some(text)).await {
        Ok(reply) => {
            bot.send_message(msg.chat.id, reply)
                .reply_markup(keyboard(vec![vec![BTN_END]]))
                .await?;
        }
        Err(err) => {
            log::warn!("tutor call failed: {}", err);
            bot.send_message(
                msg.chat.id,
                format!("The tutor is unavailable right now: {}. Try again.", err),
            )
            .await?;
        }
    }
    Ok(())
}

async fn receive_practice_topic(
    bot: Bot,
    dialogue: BotDialogue,
    ctx: Ctx,
    msg: Message,
    store: SharedStore,
) -> HandlerResult {
    if msg.text() == Some(BTN_CANCEL) {
        return to_student_menu(&bot, &dialogue, msg.chat.id, ctx).await;
    }
    let slide_count = store.lock().unwrap().slide_count(&ctx.course);
    let Some(index) = msg.text().and_then(|t| parse_index(t, slide_count)) else {
        bot.send_message(msg.chat.id, "Send the number of the slide to practice on.")
            .await?;
        return Ok(());
    };

    let rows = Difficulty::ALL.iter().map(|d| vec![d.label()]).collect();
    bot.send_message(msg.chat.id, "Difficulty level?")
        .reply_markup(keyboard(rows))
        .await?;
    dialogue
        .update(State::ReceivePracticeDifficulty {
            ctx,
            slide_index: index,
        })
        .await?;
    Ok(())
}

async fn receive_practice_difficulty(
    bot: Bot,
    dialogue: BotDialogue,
    (ctx, slide_index): (Ctx, usize),
    msg: Message,
    store: SharedStore,
    agents: SharedAgents,
) -> HandlerResult {
    if msg.text() == Some(BTN_CANCEL) {
        return to_student_menu(&bot, &dialogue, msg.chat.id, ctx).await;
    }
    let Some(difficulty) = msg.text().and_then(Difficulty::from_label) else {
        bot.send_message(msg.chat.id, "Please pick a difficulty from the keyboard.")
            .await?;
        return Ok(());
    };

    let (content, weak_areas) = {
        let guard = store.lock().unwrap();
        let slides = guard.slides(&ctx.course);
        let content = slides
            .get(slide_index)
            .map(|s| format!("{}\n{}", s.title, s.content))
            .unwrap_or_default();
        let weak: Vec<String> = guard
            .progress(&ctx.course, &ctx.name)
            .weak_areas
            .into_iter()
            .collect();
        (content, weak)
    };
    if !weak_areas.is_empty() {
        bot.send_message(
            msg.chat.id,
            format!("🎯 Questions will focus on: {}", weak_areas.join(", ")),
        )
        .await?;
    }

    bot.send_message(msg.chat.id, "🤖 Creating practice questions...").await?;
    let _ = bot.send_chat_action(msg.chat.id, ChatAction::Typing).await;

    match agents
        .practice
        .generate(&content, difficulty, PRACTICE_QUESTION_COUNT, &weak_areas)
        .await
    {
        Ok(questions) if questions.is_empty() => {
            bot.send_message(msg.chat.id, "The model returned no questions — try again.")
                .await?;
            to_student_menu(&bot, &dialogue, msg.chat.id, ctx).await?;
        }
        Ok(questions) => {
            bot.send_message(
                msg.chat.id,
                format!("📝 Practice quiz: {} question(s). Let's go!", questions.len()),
            )
            .await?;
            let first = &questions[0];
            send_question(&bot, msg.chat.id, 1, questions.len(), &first.question, &first.options)
                .await?;
            dialogue
                .update(State::PracticeQuiz {
                    ctx,
                    questions,
                    answers: Vec::new(),
                })
                .await?;
        }
        Err(err) => {
            log::warn!("practice generation failed: {}", err);
            bot.send_message(
                msg.chat.id,
                format!("Failed to generate the practice quiz: {}", err),
            )
            .await?;
            to_student_menu(&bot, &dialogue, msg.chat.id, ctx).await?;
        }
    }
    Ok(())
}

async fn practice_quiz(
    bot: Bot,
    dialogue: BotDialogue,
    (ctx, questions, mut answers): (Ctx, Vec<PracticeQuestion>, Vec<String>),
    msg: Message,
    store: SharedStore,
    agents: SharedAgents,
) -> HandlerResult {
    let Some(text) = msg.text() else {
        bot.send_message(msg.chat.id, "Please answer as text.").await?;
        return Ok(());
    };
    answers.push(text.to_string());

    if answers.len() < questions.len() {
        let next = &questions[answers.len()];
        send_question(
            &bot,
            msg.chat.id,
            answers.len() + 1,
            questions.len(),
            &next.question,
            &next.options,
        )
        .await?;
        dialogue
            .update(State::PracticeQuiz { ctx, questions, answers })
            .await?;
        return Ok(());
    }

    bot.send_message(msg.chat.id, "📊 Reviewing your answers...").await?;
    let _ = bot.send_chat_action(msg.chat.id, ChatAction::Typing).await;

    let items: Vec<GradingItem> = questions
        .iter()
        .map(|q| GradingItem {
            question: q.question.clone(),
            answer_key: q.answer_key(),
        })
        .collect();
    let student_answers: Vec<StudentAnswer> = answers
        .iter()
        .map(|a| StudentAnswer { answer: a.clone() })
        .collect();

    match agents.reviewer.analyze(&items, &student_answers, "Practice").await {
        Ok(analysis) => {
            if analysis.needs_remediation {
                store
                    .lock()
                    .unwrap()
                    .merge_weak_areas(&ctx.course, &ctx.name, &analysis.weak_areas);
            }
            bot.send_message(msg.chat.id, reviewer::summary_report(&analysis))
                .parse_mode(ParseMode::Html)
                .await?;
        }
        Err(err) => {
            log::warn!("practice review failed: {}", err);
            bot.send_message(
                msg.chat.id,
                reviewer::summary_report(&Analysis::failure(&err.to_string())),
            )
            .parse_mode(ParseMode::Html)
            .await?;
        }
    }
    to_student_menu(&bot, &dialogue, msg.chat.id, ctx).await
}

async fn receive_quiz_choice(
    bot: Bot,
    dialogue: BotDialogue,
    ctx: Ctx,
    msg: Message,
    store: SharedStore,
) -> HandlerResult {
    if msg.text() == Some(BTN_CANCEL) {
        return to_student_menu(&bot, &dialogue, msg.chat.id, ctx).await;
    }
    let quizzes = store.lock().unwrap().quizzes(&ctx.course);
    let Some(index) = msg.text().and_then(|t| parse_index(t, quizzes.len())) else {
        bot.send_message(msg.chat.id, "Send the number of a quiz from the list.")
            .await?;
        return Ok(());
    };

    let quiz = &quizzes[index];
    if quiz.questions.is_empty() {
        bot.send_message(msg.chat.id, "That quiz has no questions.").await?;
        return to_student_menu(&bot, &dialogue, msg.chat.id, ctx).await;
    }

    bot.send_message(
        msg.chat.id,
        format!(
            "📝 {}\nType: {}\nQuestions: {}",
            quiz.title,
            quiz.quiz_type.label(),
            quiz.questions.len()
        ),
    )
    .await?;
    let first = &quiz.questions[0];
    send_question(
        &bot,
        msg.chat.id,
        1,
        quiz.questions.len(),
        &first.question,
        first.options(),
    )
    .await?;
    dialogue
        .update(State::TakingQuiz {
            ctx,
            quiz_index: index,
            answers: Vec::new(),
        })
        .await?;
    Ok(())
}

async fn taking_quiz(
    bot: Bot,
    dialogue: BotDialogue,
    (ctx, quiz_index, mut answers): (Ctx, usize, Vec<String>),
    msg: Message,
    store: SharedStore,
    agents: SharedAgents,
) -> HandlerResult {
    let Some(text) = msg.text() else {
        bot.send_message(msg.chat.id, "Please answer as text.").await?;
        return Ok(());
    };

    let quiz = store
        .lock()
        .unwrap()
        .quizzes(&ctx.course)
        .into_iter()
        .nth(quiz_index);
    let Some(quiz) = quiz else {
        bot.send_message(msg.chat.id, "This quiz is no longer available.").await?;
        return to_student_menu(&bot, &dialogue, msg.chat.id, ctx).await;
    };

    answers.push(text.to_string());

    if answers.len() < quiz.questions.len() {
        let next = &quiz.questions[answers.len()];
        send_question(
            &bot,
            msg.chat.id,
            answers.len() + 1,
            quiz.questions.len(),
            &next.question,
            next.options(),
        )
        .await?;
        dialogue
            .update(State::TakingQuiz { ctx, quiz_index, answers })
            .await?;
        return Ok(());
    }

    bot.send_message(msg.chat.id, "📊 Grading your quiz...").await?;
    let _ = bot.send_chat_action(msg.chat.id, ChatAction::Typing).await;

    let items = GradingItem::from_quiz(&quiz);
    let student_answers: Vec<StudentAnswer> = answers
        .iter()
        .map(|a| StudentAnswer { answer: a.clone() })
        .collect();

    match agents
        .reviewer
        .analyze(&items, &student_answers, quiz.quiz_type.label())
        .await
    {
        Ok(analysis) => {
            {
                let mut guard = store.lock().unwrap();
                guard.save_attempt(
                    &ctx.course,
                    &quiz.id,
                    &ctx.name,
                    QuizAttempt {
                        answers: student_answers,
                        analysis: analysis.clone(),
                        timestamp: Utc::now(),
                    },
                );
                if analysis.needs_remediation {
                    guard.merge_weak_areas(&ctx.course, &ctx.name, &analysis.weak_areas);
                }
                guard.append_quiz_history(
                    &ctx.course,
                    &ctx.name,
                    QuizRecord {
                        quiz_id: quiz.id.clone(),
                        score: analysis.overall_score,
                        taken_at: Utc::now(),
                    },
                );
            }
            bot.send_message(msg.chat.id, "✅ Quiz submitted!").await?;
            bot.send_message(msg.chat.id, reviewer::summary_report(&analysis))
                .parse_mode(ParseMode::Html)
                .await?;
        }
        Err(err) => {
            log::warn!("grading failed for {}: {}", quiz.id, err);
            bot.send_message(
                msg.chat.id,
                reviewer::summary_report(&Analysis::failure(&err.to_string())),
            )
            .parse_mode(ParseMode::Html)
            .await?;
            bot.send_message(
                msg.chat.id,
                "Your attempt was not recorded — please take the quiz again.",
            )
            .await?;
        }
    }
    to_student_menu(&bot, &dialogue, msg.chat.id, ctx).await
}

// ---- shared rendering and navigation ----

fn keyboard(rows: Vec<Vec<&str>>) -> KeyboardMarkup {
    KeyboardMarkup::new(
        rows.into_iter()
            .map(|row| row.into_iter().map(KeyboardButton::new).collect::<Vec<_>>())
            .collect::<Vec<_>>(),
    )
}

async fn send_course_menu(bot: &Bot, chat: ChatId, courses: &[String]) -> HandlerResult {
    let rows = courses.iter().map(|c| vec![c.as_str()]).collect();
    bot.send_message(chat, "Select a course")
        .reply_markup(keyboard(rows))
        .await?;
    Ok(())
}

async fn send_instructor_menu(bot: &Bot, chat: ChatId) -> HandlerResult {
    bot.send_message(chat, "What would you like to do?")
        .reply_markup(keyboard(vec![
            vec![BTN_UPLOAD, BTN_CREATE_QUIZ],
            vec![BTN_REPORTS, BTN_SWITCH],
        ]))
        .await?;
    Ok(())
}

async fn send_student_menu(bot: &Bot, chat: ChatId) -> HandlerResult {
    bot.send_message(chat, "What would you like to do?")
        .reply_markup(keyboard(vec![
            vec![BTN_VIEW_SLIDES, BTN_TUTOR],
            vec![BTN_PRACTICE, BTN_TAKE_QUIZ],
            vec![BTN_SWITCH],
        ]))
        .await?;
    Ok(())
}

async fn to_instructor_menu(
    bot: &Bot,
    dialogue: &BotDialogue,
    chat: ChatId,
    ctx: Ctx,
) -> HandlerResult {
    send_instructor_menu(bot, chat).await?;
    dialogue.update(State::InstructorMenu { ctx }).await?;
    Ok(())
}

async fn to_student_menu(
    bot: &Bot,
    dialogue: &BotDialogue,
    chat: ChatId,
    ctx: Ctx,
) -> HandlerResult {
    send_student_menu(bot, chat).await?;
    dialogue.update(State::StudentMenu { ctx }).await?;
    Ok(())
}

async fn send_question(
    bot: &Bot,
    chat: ChatId,
    number: usize,
    total: usize,
    question: &str,
    options: &[String],
) -> HandlerResult {
    let text = format!("Question {}/{}:\n\n{}", number, total, question);
    if options.is_empty() {
        bot.send_message(chat, text)
            .reply_markup(KeyboardRemove::new())
            .await?;
    } else {
        let rows: Vec<Vec<KeyboardButton>> = options
            .iter()
            .map(|option| vec![KeyboardButton::new(option.clone())])
            .collect();
        bot.send_message(chat, text)
            .reply_markup(KeyboardMarkup::new(rows))
            .await?;
    }
    Ok(())
}

/// 1-based user input -> 0-based index, bounded by `len`.
fn parse_index(text: &str, len: usize) -> Option<usize> {
    let n: usize = text.trim().parse().ok()?;
    if n >= 1 && n <= len {
        Some(n - 1)
    } else {
        None
    }
}

fn slide_listing(slides: &[Slide]) -> String {
    slides
        .iter()
        .enumerate()
        .map(|(i, slide)| {
            let pages = if slide.page_count > 1 {
                format!(" ({} pages)", slide.page_count)
            } else {
                String::new()
            };
            format!("{}. {}{}", i + 1, slide.title, pages)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn quiz_listing(quizzes: &[Quiz]) -> String {
    quizzes
        .iter()
        .enumerate()
        .map(|(i, quiz)| {
            format!(
                "{}. {} — {} ({} questions)",
                i + 1,
                quiz.title,
                quiz.quiz_type.label(),
                quiz.questions.len()
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn render_draft(draft: &QuizDraft) -> String {
    let mut text = format!(
        "📝 Review: {} ({}, {} question(s))\n",
        draft.title,
        draft.quiz_type.label(),
        draft.questions.len()
    );
    for (i, question) in draft.questions.iter().enumerate() {
        text.push_str(&format!("\n{}. {}\n", i + 1, question.question));
        match &question.kind {
            QuestionKind::MultipleChoice {
                options,
                correct_answer,
                explanation,
            } => {
                for option in options {
                    text.push_str(&format!("   {}\n", option));
                }
                text.push_str(&format!("   Correct: {}\n", correct_answer));
                if !explanation.is_empty() {
                    text.push_str(&format!("   Why: {}\n", explanation));
                }
            }
            QuestionKind::Conversational {
                sample_answer,
                key_points,
            } => {
                if !sample_answer.is_empty() {
                    text.push_str(&format!("   Sample answer: {}\n", sample_answer));
                }
                if !key_points.is_empty() {
                    text.push_str(&format!("   Key points: {}\n", key_points.join("; ")));
                }
            }
            QuestionKind::LongAnswer {
                rubric,
                expected_length,
            } => {
                if !expected_length.is_empty() {
                    text.push_str(&format!("   Expected length: {}\n", expected_length));
                }
                if !rubric.excellent.is_empty() {
                    text.push_str(&format!("   Excellent: {}\n", rubric.excellent));
                }
            }
        }
        if !question.learning_objective.is_empty() {
            text.push_str(&format!(
                "   Objective: {} ({})\n",
                question.learning_objective, question.cognitive_level
            ));
        }
    }
    text.push_str("\nPublish, remove <number>, or Cancel.");
    text
}

fn render_quick_question(question: &QuickQuestion) -> String {
    let mut text = format!("❓ {}\n", question.question);
    if !question.hints.is_empty() {
        text.push_str("\nHints:\n");
        for hint in &question.hints {
            text.push_str(&format!("  • {}\n", hint));
        }
    }
    text.push_str(&format!("\nAnswer: {}\n{}", question.answer, question.explanation));
    text
}
