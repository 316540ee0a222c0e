mod common;

use common::FakeBackend;
use letsquiz::app::commands::{execute, load_questions, spawn_command, submit_metadata};
use letsquiz::app::{AppEvent, Command, NetworkEvent};
use letsquiz::client::QuizBackend;
use letsquiz::models::{Answer, CreateQuizOrigin, Question, QuizMetadata};
use letsquiz::AppError;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;

fn draft() -> QuizMetadata {
    QuizMetadata {
        title: "Dates".to_string(),
        time_limit_in_mins: 5,
        question_count: 3,
        is_active: true,
        ..Default::default()
    }
}

#[tokio::test]
async fn test_create_resolves_category_and_creator() {
    let backend = FakeBackend::new();
    let submission = submit_metadata(
        &backend,
        draft(),
        "History",
        CreateQuizOrigin::CreateButton,
        Some("ada"),
    )
    .await
    .unwrap();

    assert!(submission.warning.is_none());
    assert_eq!(submission.quiz.id, 101);
    assert_eq!(submission.quiz.category_id, 5);
    assert_eq!(submission.quiz.creator_id, 11);
    assert!(submission.quiz.creation_date.is_some());
    assert_eq!(backend.state().quizzes[0], submission.quiz);
}

#[tokio::test]
async fn test_unknown_creator_is_not_fatal() {
    let backend = FakeBackend::new();
    let submission = submit_metadata(
        &backend,
        draft(),
        "History",
        CreateQuizOrigin::CreateButton,
        Some("grace"),
    )
    .await
    .unwrap();

    assert_eq!(submission.quiz.creator_id, 0);
    assert!(submission.quiz.is_persisted());
}

#[tokio::test]
async fn test_unknown_category_fails_submission() {
    let backend = FakeBackend::new();
    let result = submit_metadata(
        &backend,
        draft(),
        "Astrology",
        CreateQuizOrigin::CreateButton,
        None,
    )
    .await;

    assert!(matches!(result, Err(AppError::LookupNotFound(name)) if name == "Astrology"));
    assert_eq!(backend.count_calls("POST /quizzes"), 0);
}

#[tokio::test]
async fn test_update_keeps_id() {
    let backend = FakeBackend::new().with_existing_quiz();
    let mut quiz = backend.state().quizzes[0].clone();
    quiz.title = "World capitals".to_string();

    let submission = submit_metadata(&backend, quiz, "Geography", CreateQuizOrigin::Table, Some("ada"))
        .await
        .unwrap();

    assert!(submission.warning.is_none());
    assert_eq!(submission.quiz.id, 4);
    assert_eq!(backend.count_calls("PUT /quizzes/4"), 1);
    assert_eq!(backend.count_calls("GET /users"), 0);
    assert_eq!(backend.state().quizzes[0].title, "World capitals");
}

#[tokio::test]
async fn test_failed_write_becomes_warning() {
    let backend = FakeBackend::new();
    backend.state().fail_quiz_writes = true;

    let submission = submit_metadata(&backend, draft(), "History", CreateQuizOrigin::CreateButton, None)
        .await
        .unwrap();

    assert_eq!(submission.quiz.id, 0);
    let warning = submission.warning.unwrap();
    assert!(warning.starts_with("Quiz was not saved"));
    assert!(warning.contains("500"));
}

#[tokio::test]
async fn test_load_questions_with_answers() {
    let backend = FakeBackend::new().with_existing_quiz();
    let loaded = load_questions(&backend, 4).await.unwrap();

    assert_eq!(loaded.len(), 1);
    let (question, answers) = &loaded[0];
    assert_eq!(question.id, 9);
    let texts: Vec<&str> = answers.iter().map(|a| a.text.as_str()).collect();
    assert_eq!(texts, vec!["Paris", "Lyon"]);

    assert!(matches!(
        load_questions(&backend, 77).await,
        Err(AppError::NotFound(_))
    ));
}

#[tokio::test]
async fn test_fetch_quizzes_resolves_names() {
    let backend = FakeBackend::new().with_existing_quiz();
    {
        let mut state = backend.state();
        let mut orphan = state.quizzes[0].clone();
        orphan.id = 8;
        orphan.creator_id = 99;
        state.quizzes.push(orphan);
    }
    let backend: Arc<dyn QuizBackend> = Arc::new(backend);

    match execute(backend, Command::FetchQuizzes).await {
        NetworkEvent::QuizzesLoaded(Ok(rows)) => {
            assert_eq!(rows.len(), 1);
            assert_eq!(rows[0].id, 4);
            assert_eq!(rows[0].category, "Geography");
            assert_eq!(rows[0].creator, "ada");
        }
        other => panic!("unexpected event {:?}", other),
    }
}

#[tokio::test]
async fn test_spawned_command_reports_result() {
    let backend: Arc<dyn QuizBackend> = Arc::new(FakeBackend::new());
    let (tx, mut rx) = mpsc::unbounded_channel();

    spawn_command(backend, Command::LoadCategoryNames, Duration::from_secs(5), tx)
        .await
        .unwrap();

    match rx.recv().await {
        Some(AppEvent::Network(NetworkEvent::CategoryNamesLoaded(Ok(names)))) => {
            assert_eq!(names, vec!["Geography", "History"]);
        }
        other => panic!("unexpected event {:?}", other),
    }
}

#[tokio::test]
async fn test_stalled_call_times_out() {
    let backend = FakeBackend::new();
    backend.state().call_delay = Some(Duration::from_millis(500));
    let backend: Arc<dyn QuizBackend> = Arc::new(backend);
    let (tx, mut rx) = mpsc::unbounded_channel();

    spawn_command(backend, Command::FetchQuizzes, Duration::from_millis(10), tx)
        .await
        .unwrap();

    match rx.recv().await {
        Some(AppEvent::Network(NetworkEvent::QuizzesLoaded(Err(AppError::Timeout(msg))))) => {
            assert!(msg.contains("list_quizzes"));
        }
        other => panic!("unexpected event {:?}", other),
    }
}

#[tokio::test]
async fn test_slow_backend_with_many_questions_still_loads() {
    let backend = FakeBackend::new().with_existing_quiz();
    {
        let mut state = backend.state();
        for n in 0..30 {
            let id = 200 + n;
            state.questions.push(Question {
                id,
                quiz_id: 4,
                text: format!("Question {}", n),
                ..Default::default()
            });
            state.answers.push(Answer {
                id: 300 + n,
                question_id: id,
                text: "yes".to_string(),
                is_correct: true,
                ..Default::default()
            });
        }
        state.call_delay = Some(Duration::from_millis(10));
    }
    let backend: Arc<dyn QuizBackend> = Arc::new(backend);
    let (tx, mut rx) = mpsc::unbounded_channel();

    // 32 calls of 10ms each, every one well inside its own 30ms deadline
    spawn_command(
        backend,
        Command::LoadQuestions { quiz_id: 4 },
        Duration::from_millis(30),
        tx,
    )
    .await
    .unwrap();

    match rx.recv().await {
        Some(AppEvent::Network(NetworkEvent::QuestionsLoaded { quiz_id, result })) => {
            assert_eq!(quiz_id, 4);
            let loaded = result.unwrap();
            assert_eq!(loaded.len(), 31);
            assert!(loaded.iter().all(|(_, answers)| !answers.is_empty()));
        }
        other => panic!("unexpected event {:?}", other),
    }
}
