//! Quest system content model
//!
//! Quest systems are authored as YAML files: system metadata plus a list
//! of quests. Uploads fill in the fields older files omit so every stored
//! quest carries `questAuraGranted`, `questEventCount` and
//! `questEventUnits`.

use crate::error::{Error, Result};
use crate::store::Value;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;
use std::collections::BTreeMap;

static PROMPT_COUNT: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d+").expect("valid regex"));

/// One quest system YAML file
#[derive(Debug, Clone, Deserialize)]
pub struct QuestSystemFile {
    /// Document id of the system
    #[serde(default)]
    pub id: String,
    /// Display name, stored as `name`
    #[serde(rename = "shortName", default)]
    pub short_name: String,
    #[serde(default)]
    pub description: String,
    #[serde(rename = "defaultTimeToComplete", default)]
    pub default_time_to_complete: BTreeMap<String, serde_yaml::Value>,
    #[serde(rename = "defaultQuestCooldown", default)]
    pub default_quest_cooldown: BTreeMap<String, serde_yaml::Value>,
    #[serde(rename = "defaultRepeatDebuff", default = "default_repeat_debuff")]
    pub default_repeat_debuff: f64,
    #[serde(default)]
    pub quests: Vec<QuestSpec>,
}

fn default_repeat_debuff() -> f64 {
    1.0
}

impl QuestSystemFile {
    /// Parse a quest system from YAML
    pub fn from_yaml_str(content: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(content)?)
    }

    /// Check the fields every system file must carry
    pub fn validate(&self) -> Result<()> {
        if self.id.is_empty() {
            return Err(Error::missing_field("id"));
        }
        if self.short_name.is_empty() {
            return Err(Error::missing_field("shortName"));
        }
        if self.description.is_empty() {
            return Err(Error::missing_field("description"));
        }
        Ok(())
    }

    /// Field map of the system document
    pub fn system_fields(&self) -> Result<BTreeMap<String, Value>> {
        let mut fields = BTreeMap::new();
        fields.insert("name".to_string(), Value::Text(self.short_name.clone()));
        fields.insert(
            "description".to_string(),
            Value::Text(self.description.clone()),
        );
        fields.insert(
            "defaultTimeToComplete".to_string(),
            yaml_map_value(&self.default_time_to_complete)?,
        );
        fields.insert(
            "defaultQuestCooldown".to_string(),
            yaml_map_value(&self.default_quest_cooldown)?,
        );
        fields.insert(
            "defaultRepeatDebuff".to_string(),
            Value::Double(self.default_repeat_debuff),
        );
        Ok(fields)
    }
}

fn yaml_map_value(map: &BTreeMap<String, serde_yaml::Value>) -> Result<Value> {
    let mut fields = BTreeMap::new();
    for (key, value) in map {
        fields.insert(key.clone(), Value::from_yaml(value)?);
    }
    Ok(Value::Map(fields))
}

/// One quest entry in a system file
///
/// Beyond `questId` the fields are free-form; everything else is carried
/// through to the stored document as-is.
#[derive(Debug, Clone, Deserialize)]
pub struct QuestSpec {
    /// Document id of the quest; entries without one are skipped
    #[serde(rename = "questId", default)]
    pub quest_id: Option<String>,
    /// Remaining quest fields
    #[serde(flatten)]
    pub fields: BTreeMap<String, serde_yaml::Value>,
}

impl QuestSpec {
    /// Field map of the quest document, with required fields filled in
    ///
    /// `questAuraGranted` defaults to the quest's rank;
    /// `questEventCount`/`questEventUnits` are derived from the prompt
    /// text when absent (first number in the prompt, `minute` vs `rep`).
    pub fn quest_fields(&self) -> Result<BTreeMap<String, Value>> {
        let mut fields = BTreeMap::new();
        if let Some(id) = &self.quest_id {
            fields.insert("questId".to_string(), Value::Text(id.clone()));
        }
        for (key, value) in &self.fields {
            fields.insert(key.clone(), Value::from_yaml(value)?);
        }

        if !fields.contains_key("questAuraGranted") {
            let rank = fields.get("rank").map_or(0.0, numeric_value);
            fields.insert("questAuraGranted".to_string(), Value::Double(rank));
        }

        if !fields.contains_key("questEventCount") || !fields.contains_key("questEventUnits") {
            let prompt = fields
                .get("prompt")
                .and_then(Value::as_text)
                .unwrap_or("")
                .to_string();
            let count = PROMPT_COUNT
                .find(&prompt)
                .and_then(|m| m.as_str().parse::<f64>().ok())
                .unwrap_or(0.0);
            let unit = if prompt.to_lowercase().contains("minute") {
                "minute"
            } else {
                "rep"
            };
            fields.insert("questEventCount".to_string(), Value::Double(count));
            fields.insert("questEventUnits".to_string(), Value::Text(unit.to_string()));
        }

        Ok(fields)
    }
}

/// Best-effort numeric reading of a field value, for rank defaults
fn numeric_value(value: &Value) -> f64 {
    match value {
        Value::Integer(i) => *i as f64,
        Value::Double(d) => *d,
        Value::Text(s) => s.trim().parse().unwrap_or(0.0),
        _ => 0.0,
    }
}
