//! Pre-harvest action script enumeration.

use serde::{Deserialize, Serialize};

/// The condition language block actions evaluate against the last
/// `check_element` result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum Condition {
    CheckPassed,
    CheckFailed,
    ValueEquals { value: String },
    ValueNotEquals { value: String },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginFields {
    pub username: String,
    pub password: String,
    pub username_selector: String,
    pub password_selector: String,
    pub submit_selector: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckElementFields {
    pub selector: String,
    pub check: String,
    #[serde(default)]
    pub value: Option<String>,
    #[serde(default)]
    pub attribute: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConditionalWaitFields {
    pub condition: Condition,
    pub wait_time_ms: u64,
    pub max_retries: u32,
    pub retry_from_action: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkipIfFields {
    pub condition: Condition,
    pub skip_count: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogMessageFields {
    pub message: String,
    #[serde(default)]
    pub level: Option<String>,
    #[serde(default)]
    pub log_file: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StartGenerationDownloadsFields {
    pub max_downloads: Option<u64>,
    pub downloads_folder: String,
    pub logs_folder: String,
    pub completed_task_selector: String,
    #[serde(default)]
    pub start_from: Option<String>,
}

/// One step of the pre-harvest action script. Variants not relevant to
/// deduplication/harvesting semantics (`while_end`, `break`, `continue`,
/// `if_end`) carry no payload beyond their position in the script.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum Action {
    Login(LoginFields),
    Wait { milliseconds: u64 },
    WaitForElement { selector: String },
    ClickButton { selector: String },
    InputText { selector: String, value: String },
    ToggleSetting { selector: String, value: bool },
    CheckElement(CheckElementFields),
    IfBegin { condition: Condition },
    Elif { condition: Condition },
    Else,
    IfEnd,
    WhileBegin { condition: Condition },
    WhileEnd,
    Break,
    Continue,
    ConditionalWait(ConditionalWaitFields),
    SkipIf(SkipIfFields),
    SetVariable { name: String, value: String },
    IncrementVariable { name: String, amount: i64 },
    LogMessage(LogMessageFields),
    StartGenerationDownloads(StartGenerationDownloadsFields),
    StopGenerationDownloads,
    CheckGenerationStatus,
    RefreshPage,
    StopAutomation,
}
