pub mod paper;
pub mod user;

pub use paper::{PaperWithQuestions, Question, QuestionPaper};
pub use user::User;
