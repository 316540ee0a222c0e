mod common;

use common::FakeBackend;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use letsquiz::app::commands::execute;
use letsquiz::app::screens::questions::StatusLine;
use letsquiz::app::screens::Screen;
use letsquiz::app::{AppEvent, Command, ScreenKind, Session, SessionOptions};
use letsquiz::audio::AudioControl;
use letsquiz::client::QuizBackend;
use std::sync::Arc;

struct Harness {
    session: Session,
    backend: Arc<FakeBackend>,
}

impl Harness {
    fn new(backend: FakeBackend) -> Self {
        let options = SessionOptions {
            confirm_exit: false,
            creator_name: Some("ada".to_string()),
        };
        let mut session = Session::new(options, AudioControl::new(false));
        assert!(session.start().is_empty());
        session.dispatch(AppEvent::Resize(120, 40));
        Self {
            session,
            backend: Arc::new(backend),
        }
    }

    /// Dispatch an event and run every resulting command to completion,
    /// feeding results back in order
    async fn dispatch(&mut self, event: AppEvent) {
        let mut commands = self.session.dispatch(event);
        while !commands.is_empty() {
            let mut next = Vec::new();
            for command in commands {
                let backend: Arc<dyn QuizBackend> = self.backend.clone();
                let result = execute(backend, command).await;
                next.extend(self.session.dispatch(AppEvent::Network(result)));
            }
            commands = next;
        }
    }

    async fn press(&mut self, code: KeyCode) {
        self.dispatch(AppEvent::Key(KeyEvent::new(code, KeyModifiers::NONE)))
            .await;
    }

    async fn chord(&mut self, code: KeyCode) {
        self.dispatch(AppEvent::Key(KeyEvent::new(code, KeyModifiers::CONTROL)))
            .await;
    }

    async fn type_text(&mut self, text: &str) {
        for c in text.chars() {
            self.press(KeyCode::Char(c)).await;
        }
    }

    fn kind(&self) -> ScreenKind {
        self.session.screen_kind()
    }

    /// Login, then pick "Create/Edit Questionnaire & Answers"
    async fn open_editor(&mut self) {
        self.press(KeyCode::Enter).await;
        assert_eq!(self.kind(), ScreenKind::Menu);
        self.press(KeyCode::Down).await;
        self.press(KeyCode::Down).await;
        self.press(KeyCode::Enter).await;
        assert_eq!(self.kind(), ScreenKind::EditQuestionnaireList);
    }

    fn questions(&self) -> &letsquiz::app::screens::DynamicQuestionsScreen {
        match self.session.screen() {
            Screen::DynamicQuestions(screen) => screen,
            _ => panic!("not on the question forms"),
        }
    }
}

#[tokio::test]
async fn test_create_quiz_end_to_end() {
    let mut h = Harness::new(FakeBackend::new());

    h.press(KeyCode::Enter).await;
    match h.session.screen() {
        Screen::Menu(menu) => {
            assert_eq!(menu.choices().choices().len(), 6);
            assert_eq!(menu.choices().cursor(), 0);
        }
        _ => panic!("expected the menu"),
    }
    h.press(KeyCode::Down).await;
    h.press(KeyCode::Down).await;
    h.press(KeyCode::Enter).await;

    match h.session.screen() {
        Screen::EditQuestionnaire(edit) => {
            assert!(edit.quizzes().is_empty());
            assert_eq!(
                edit.focus(),
                letsquiz::app::screens::edit_questionnaire::Focus::CreateButton
            );
        }
        _ => panic!("expected the quiz table"),
    }

    h.press(KeyCode::Enter).await;
    assert_eq!(h.kind(), ScreenKind::QuizMetadataForm);
    match h.session.screen() {
        Screen::QuizMetadata(form) => {
            assert_eq!(form.form().get("title"), "");
            assert_eq!(form.form().get("category"), "");
        }
        _ => panic!("expected the metadata form"),
    }

    h.type_text("Capitals").await;
    h.press(KeyCode::Enter).await; // description
    h.press(KeyCode::Enter).await; // content url
    h.press(KeyCode::Enter).await; // category
    h.type_text("geo").await;
    h.press(KeyCode::Tab).await;
    h.press(KeyCode::Enter).await; // time limit
    h.type_text("10").await;
    h.press(KeyCode::Enter).await; // question count
    h.type_text("2").await;
    h.press(KeyCode::Enter).await; // active
    h.press(KeyCode::Left).await;
    h.press(KeyCode::Enter).await; // done
    h.press(KeyCode::Char('y')).await;
    h.press(KeyCode::Enter).await;

    assert_eq!(h.kind(), ScreenKind::DynamicQuestionForms);
    {
        let state = h.backend.state();
        let quiz = state.quizzes.last().unwrap();
        assert_eq!(quiz.title, "Capitals");
        assert_eq!(quiz.category_id, 3);
        assert_eq!(quiz.creator_id, 11);
        assert_eq!(quiz.time_limit_in_mins, 10);
        assert!(quiz.is_active);
    }
    let quiz_id = h.backend.state().quizzes.last().unwrap().id;
    assert_eq!(h.questions().quiz_id(), quiz_id);
    assert_eq!(h.questions().slots().len(), 2);
    assert_eq!(h.questions().cursor(), 0);

    h.type_text("Pick B").await;
    for _ in 0..6 {
        h.press(KeyCode::Enter).await;
    }
    h.type_text("A,B").await;
    h.press(KeyCode::Enter).await;
    h.type_text("B").await;
    h.chord(KeyCode::Right).await;

    assert_eq!(h.questions().cursor(), 1);
    assert_eq!(h.backend.count_calls("POST /questions"), 1);
    assert_eq!(h.backend.count_calls("POST /answers"), 2);
    {
        let state = h.backend.state();
        let question = state.questions.last().unwrap();
        assert_eq!(question.text, "Pick B");
        assert_eq!(question.quiz_id, quiz_id);
        let answers: Vec<_> = state
            .answers
            .iter()
            .filter(|a| a.question_id == question.id)
            .map(|a| (a.text.as_str(), a.is_correct))
            .collect();
        assert_eq!(answers, vec![("A", false), ("B", true)]);
    }
    let first = &h.questions().slots()[0];
    assert!(first.question().id > 0);
    assert!(matches!(h.questions().status(), Some(StatusLine::Info(_))));

    // Advancing again from the last, blank slot updates instead of duplicating
    h.chord(KeyCode::Right).await;
    assert_eq!(h.questions().cursor(), 1);
    assert_eq!(h.backend.count_calls("POST /questions"), 1);
    assert_eq!(h.backend.count_calls("POST /answers"), 2);
    assert_eq!(h.backend.count_calls("PUT /questions/"), 1);
    assert_eq!(h.backend.count_calls("PUT /answers/"), 2);
    assert_eq!(h.kind(), ScreenKind::DynamicQuestionForms);

    h.press(KeyCode::Esc).await;
    assert!(h.session.should_quit());
}

#[tokio::test]
async fn test_edit_existing_quiz() {
    let mut h = Harness::new(FakeBackend::new().with_existing_quiz());
    h.open_editor().await;

    match h.session.screen() {
        Screen::EditQuestionnaire(edit) => {
            assert_eq!(edit.quizzes().len(), 1);
            assert_eq!(edit.quizzes()[0].category, "Geography");
            assert_eq!(edit.quizzes()[0].creator, "ada");
        }
        _ => panic!("expected the quiz table"),
    }

    h.press(KeyCode::Tab).await;
    h.press(KeyCode::Enter).await;
    match h.session.screen() {
        Screen::QuizMetadata(form) => {
            assert_eq!(form.form().get("title"), "Capitals");
            assert_eq!(form.form().get("category"), "Geography");
            assert_eq!(form.form().get("question_count"), "2");
            assert_eq!(form.form().get("active"), "Yes");
        }
        _ => panic!("expected the metadata form"),
    }

    for _ in 0..7 {
        h.press(KeyCode::Enter).await;
    }
    h.press(KeyCode::Char('y')).await;
    h.press(KeyCode::Enter).await;

    assert_eq!(h.kind(), ScreenKind::DynamicQuestionForms);
    assert_eq!(h.backend.count_calls("PUT /quizzes/4"), 1);
    assert_eq!(h.backend.count_calls("POST /quizzes"), 0);

    // Prefetched question fills the first slot
    let slot = &h.questions().slots()[0];
    assert_eq!(slot.question().id, 9);
    assert_eq!(slot.form().get("answers"), "Paris,Lyon");
    assert_eq!(slot.form().get("correct_answer"), "Paris");
    assert!(h.questions().slots()[1].is_blank());

    h.chord(KeyCode::Right).await;
    assert_eq!(h.backend.count_calls("PUT /questions/9"), 1);
    assert_eq!(h.backend.count_calls("PUT /answers/20"), 1);
    assert_eq!(h.backend.count_calls("PUT /answers/21"), 1);
    assert_eq!(h.backend.count_calls("POST /questions"), 0);
    assert_eq!(h.backend.count_calls("POST /answers"), 0);
}

#[tokio::test]
async fn test_unknown_category_blocks_metadata() {
    let mut h = Harness::new(FakeBackend::new());
    h.open_editor().await;
    h.press(KeyCode::Enter).await;

    h.type_text("Capitals").await;
    h.press(KeyCode::Enter).await;
    h.press(KeyCode::Enter).await;
    h.press(KeyCode::Enter).await;
    h.type_text("Astrology").await;
    h.press(KeyCode::Enter).await;
    h.type_text("5").await;
    h.press(KeyCode::Enter).await;
    h.type_text("1").await;
    h.press(KeyCode::Enter).await;
    h.press(KeyCode::Enter).await;
    h.press(KeyCode::Char('y')).await;
    h.press(KeyCode::Enter).await;

    assert_eq!(h.kind(), ScreenKind::QuizMetadataForm);
    match h.session.screen() {
        Screen::QuizMetadata(form) => {
            assert!(form.error().unwrap().contains("Astrology"));
            assert!(!form.is_submitting());
        }
        _ => panic!("expected the metadata form"),
    }
    assert_eq!(h.backend.count_calls("POST /quizzes"), 0);
}

#[tokio::test]
async fn test_failed_quiz_save_still_progresses() {
    let backend = FakeBackend::new();
    backend.state().fail_quiz_writes = true;
    let mut h = Harness::new(backend);
    h.open_editor().await;
    h.press(KeyCode::Enter).await;

    h.type_text("Capitals").await;
    h.press(KeyCode::Enter).await;
    h.press(KeyCode::Enter).await;
    h.press(KeyCode::Enter).await;
    h.type_text("History").await;
    h.press(KeyCode::Enter).await;
    h.type_text("5").await;
    h.press(KeyCode::Enter).await;
    h.type_text("3").await;
    h.press(KeyCode::Enter).await;
    h.press(KeyCode::Enter).await;
    h.press(KeyCode::Char('y')).await;
    h.press(KeyCode::Enter).await;

    assert_eq!(h.kind(), ScreenKind::DynamicQuestionForms);
    assert_eq!(h.questions().slots().len(), 3);
    assert_eq!(h.questions().quiz_id(), 0);
    match h.questions().status() {
        Some(StatusLine::Error(text)) => assert!(text.contains("not saved")),
        other => panic!("unexpected status {:?}", other),
    }
}

#[tokio::test]
async fn test_finishing_last_question_quits() {
    let mut h = Harness::new(FakeBackend::new().with_existing_quiz());
    h.open_editor().await;
    h.press(KeyCode::Tab).await;
    h.press(KeyCode::Enter).await;
    for _ in 0..7 {
        h.press(KeyCode::Enter).await;
    }
    h.press(KeyCode::Char('y')).await;
    h.press(KeyCode::Enter).await;
    assert_eq!(h.kind(), ScreenKind::DynamicQuestionForms);

    h.chord(KeyCode::Right).await;
    assert_eq!(h.questions().cursor(), 1);

    h.type_text("Capital of Spain?").await;
    for _ in 0..6 {
        h.press(KeyCode::Enter).await;
    }
    h.type_text("Madrid,Seville").await;
    h.press(KeyCode::Enter).await;
    h.type_text("Madrid").await;
    h.press(KeyCode::Enter).await;
    assert!(h.questions().current().is_completed());
    assert!(!h.session.should_quit());

    h.press(KeyCode::Enter).await;
    assert!(h.session.should_quit());
    let state = h.backend.state();
    assert!(state.questions.iter().any(|q| q.text == "Capital of Spain?" && q.quiz_id == 4));
}

#[tokio::test]
async fn test_backend_down_keeps_session_alive() {
    let backend = FakeBackend::new();
    backend.state().offline = true;
    let mut h = Harness::new(backend);
    h.open_editor().await;

    match h.session.screen() {
        Screen::EditQuestionnaire(edit) => {
            assert!(edit.error().is_some());
            assert!(!edit.is_loading());
        }
        _ => panic!("expected the quiz table"),
    }

    // Creating still works locally
    h.press(KeyCode::Enter).await;
    assert_eq!(h.kind(), ScreenKind::QuizMetadataForm);
    assert!(!h.session.should_quit());
}

#[tokio::test]
async fn test_menu_choice_fetches_quizzes() {
    let mut session = Session::new(SessionOptions::default(), AudioControl::new(false));
    let commands = session.dispatch(AppEvent::Tick);
    assert!(commands.is_empty());
    let commands = session.dispatch(AppEvent::Key(KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE)));
    assert!(commands.is_empty());
    let commands = session.dispatch(AppEvent::Key(KeyEvent::new(KeyCode::Char('j'), KeyModifiers::NONE)));
    assert!(commands.is_empty());
    session.dispatch(AppEvent::Key(KeyEvent::new(KeyCode::Char('j'), KeyModifiers::NONE)));
    let commands = session.dispatch(AppEvent::Key(KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE)));
    assert!(matches!(commands.as_slice(), [Command::FetchQuizzes]));
}
