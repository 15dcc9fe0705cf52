//! Rolling per-tool usage aggregates.

use std::time::SystemTime;

use serde::{Deserialize, Serialize};

use crate::SelectionContext;

/// Parameter keys kept per tool; older keys fall out first.
pub const MAX_PARAMETER_KEYS: usize = 20;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolUsagePattern {
    pub tool_name: String,
    pub frequency: u64,
    pub avg_duration_ms: f64,
    pub success_rate: f64,
    pub last_used_at: SystemTime,
    pub contexts: Vec<String>,
    pub parameter_keys: Vec<String>,
}

impl ToolUsagePattern {
    pub fn first(
        tool_name: impl Into<String>,
        duration_ms: u64,
        success: bool,
        parameter_keys: &[String],
        context: &SelectionContext,
    ) -> Self {
        let mut pattern = Self {
            tool_name: tool_name.into(),
            frequency: 1,
            avg_duration_ms: duration_ms as f64,
            success_rate: outcome(success),
            last_used_at: SystemTime::now(),
            contexts: Vec::new(),
            parameter_keys: Vec::new(),
        };
        pattern.absorb(parameter_keys, context);
        pattern
    }

    /// Folds one more observation into the aggregate with
    /// `avg' = (avg * (n - 1) + x) / n`.
    pub fn observe(
        &mut self,
        duration_ms: u64,
        success: bool,
        parameter_keys: &[String],
        context: &SelectionContext,
    ) {
        self.frequency += 1;
        let n = self.frequency as f64;
        self.avg_duration_ms = (self.avg_duration_ms * (n - 1.0) + duration_ms as f64) / n;
        self.success_rate = (self.success_rate * (n - 1.0) + outcome(success)) / n;
        self.last_used_at = SystemTime::now();
        self.absorb(parameter_keys, context);
    }

    fn absorb(&mut self, parameter_keys: &[String], context: &SelectionContext) {
        for key in parameter_keys {
            if !self.parameter_keys.contains(key) {
                self.parameter_keys.push(key.clone());
            }
        }
        if self.parameter_keys.len() > MAX_PARAMETER_KEYS {
            let excess = self.parameter_keys.len() - MAX_PARAMETER_KEYS;
            self.parameter_keys.drain(..excess);
        }

        if let Some(time_of_day) = context.time_of_day {
            let tag = time_of_day.as_str();
            if !self.contexts.iter().any(|existing| existing == tag) {
                self.contexts.push(tag.to_string());
            }
        }
    }
}

fn outcome(success: bool) -> f64 {
    if success { 1.0 } else { 0.0 }
}
