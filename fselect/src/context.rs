//! Contextual signals fed into tool scoring.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeOfDay {
    Morning,
    Afternoon,
    Evening,
    Night,
}

impl TimeOfDay {
    pub fn from_hour(hour: u8) -> Self {
        match hour {
            5..=11 => TimeOfDay::Morning,
            12..=16 => TimeOfDay::Afternoon,
            17..=21 => TimeOfDay::Evening,
            _ => TimeOfDay::Night,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TimeOfDay::Morning => "morning",
            TimeOfDay::Afternoon => "afternoon",
            TimeOfDay::Evening => "evening",
            TimeOfDay::Night => "night",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SelectionContext {
    #[serde(default)]
    pub time_of_day: Option<TimeOfDay>,
    #[serde(default)]
    pub recent_apps: Vec<String>,
}

impl SelectionContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_time_of_day(mut self, time_of_day: TimeOfDay) -> Self {
        self.time_of_day = Some(time_of_day);
        self
    }

    pub fn with_hour(self, hour: u8) -> Self {
        self.with_time_of_day(TimeOfDay::from_hour(hour))
    }

    pub fn with_recent_app(mut self, app: impl Into<String>) -> Self {
        self.recent_apps.push(app.into());
        self
    }

    /// True when any recent-app hint occurs in the (lowercased) tool text.
    pub fn hint_matches(&self, tool_text: &str) -> bool {
        self.recent_apps
            .iter()
            .map(|app| app.trim().to_lowercase())
            .any(|app| !app.is_empty() && tool_text.contains(&app))
    }
}
