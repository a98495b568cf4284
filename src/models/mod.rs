pub mod answer;
pub mod document;
pub mod loaders;
pub mod question;
pub mod report;

pub use answer::AnswerKey;
pub use document::{DocumentTask, RawDocument};
pub use loaders::{load_all_toml_files, load_toml_to_task};
pub use question::{
    OptionSet, PassageGroup, QuestionChunk, QuestionKind, QuestionRecord, OPTION_LETTERS,
};
pub use report::{ValidationReport, ValidationStatus};
