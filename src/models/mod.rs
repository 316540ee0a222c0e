//! Data models module
//!
//! Wire-level entities exchanged with the backend (quizzes, categories,
//! users, questions, answers) and the projections the screens work with.

pub mod question;
pub mod quiz;

// Re-export commonly used types
pub use question::{derive_answers, join_answers, Answer, Difficulty, Question, QuestionType};
pub use quiz::{Category, CreateQuizOrigin, QuizMetadata, QuizRow, User};
