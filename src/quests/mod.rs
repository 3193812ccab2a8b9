//! Quest content models
//!
//! YAML quest-system files and CSV quest sheets, plus the default-filling
//! rules applied before upload.

mod csv;
mod model;

pub use csv::{parse_quest_csv, QuestRow, REQUIRED_COLUMNS};
pub use model::{QuestSpec, QuestSystemFile};
