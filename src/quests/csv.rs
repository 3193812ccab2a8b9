//! Quest CSV parsing
//!
//! Bulk uploads come in as CSV with one row per quest, keyed by
//! `questSystemName`. Rows are parsed into typed [`QuestRow`]s and grouped
//! by system.

use crate::error::{Error, Result};
use crate::store::Value;
use std::collections::BTreeMap;

/// Column names every quest CSV must carry
pub const REQUIRED_COLUMNS: &[&str] = &[
    "questSystemName",
    "questName",
    "questRank",
    "questPrompt",
    "questAuraGranted",
    "questEventCount",
    "questEventUnits",
];

/// One typed quest row
#[derive(Debug, Clone, PartialEq)]
pub struct QuestRow {
    pub system_name: String,
    pub quest_name: String,
    pub quest_rank: i64,
    pub quest_prompt: String,
    pub aura_granted: f64,
    pub event_count: f64,
    pub event_units: String,
}

impl QuestRow {
    /// Document id for this quest: `{questName}_{questRank}`
    pub fn doc_id(&self) -> String {
        format!("{}_{}", self.quest_name, self.quest_rank)
    }

    /// Field map of the quest document
    pub fn fields(&self) -> BTreeMap<String, Value> {
        BTreeMap::from([
            ("questName".to_string(), Value::Text(self.quest_name.clone())),
            ("questRank".to_string(), Value::Integer(self.quest_rank)),
            (
                "questPrompt".to_string(),
                Value::Text(self.quest_prompt.clone()),
            ),
            (
                "questAuraGranted".to_string(),
                Value::Double(self.aura_granted),
            ),
            (
                "questEventCount".to_string(),
                Value::Double(self.event_count),
            ),
            (
                "questEventUnits".to_string(),
                Value::Text(self.event_units.clone()),
            ),
        ])
    }
}

/// Parse a quest CSV and group rows by system name
pub fn parse_quest_csv(content: &str) -> Result<BTreeMap<String, Vec<QuestRow>>> {
    // Authoring tools routinely prepend a BOM
    let content = content.strip_prefix('\u{feff}').unwrap_or(content);
    let mut lines = content.lines();

    let headers = match lines.next() {
        Some(line) => parse_csv_line(line, ','),
        None => return Ok(BTreeMap::new()),
    };
    for column in REQUIRED_COLUMNS {
        if !headers.iter().any(|h| h == column) {
            return Err(Error::csv(format!("missing required column '{column}'")));
        }
    }

    let mut systems: BTreeMap<String, Vec<QuestRow>> = BTreeMap::new();
    for (line_no, line) in lines.enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let fields = parse_csv_line(line, ',');
        let mut record = BTreeMap::new();
        for (i, header) in headers.iter().enumerate() {
            record.insert(header.as_str(), fields.get(i).cloned().unwrap_or_default());
        }

        let row = parse_row(&record).map_err(|e| {
            // Header is line 1, so data rows start at line 2
            Error::csv(format!("line {}: {e}", line_no + 2))
        })?;
        systems.entry(row.system_name.clone()).or_default().push(row);
    }

    Ok(systems)
}

fn parse_row(record: &BTreeMap<&str, String>) -> Result<QuestRow> {
    let get = |column: &str| record.get(column).cloned().unwrap_or_default();

    Ok(QuestRow {
        system_name: get("questSystemName"),
        quest_name: get("questName"),
        quest_rank: parse_number(&get("questRank"), "questRank")?,
        quest_prompt: get("questPrompt"),
        aura_granted: parse_number(&get("questAuraGranted"), "questAuraGranted")?,
        event_count: parse_number(&get("questEventCount"), "questEventCount")?,
        event_units: get("questEventUnits"),
    })
}

fn parse_number<T: std::str::FromStr>(text: &str, column: &str) -> Result<T>
where
    T::Err: std::fmt::Display,
{
    text.trim()
        .parse()
        .map_err(|e| Error::csv(format!("invalid {column} '{text}': {e}")))
}

/// Parse a CSV line into fields, honoring double-quote escaping
fn parse_csv_line(line: &str, delimiter: char) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        if c == '"' {
            if in_quotes {
                // Doubled quote inside a quoted field is a literal quote
                if chars.peek() == Some(&'"') {
                    current.push('"');
                    chars.next();
                } else {
                    in_quotes = false;
                }
            } else {
                in_quotes = true;
            }
        } else if c == delimiter && !in_quotes {
            fields.push(current.trim().to_string());
            current = String::new();
        } else {
            current.push(c);
        }
    }
    fields.push(current.trim().to_string());

    fields
}
