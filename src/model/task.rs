//! Which page a result belongs to.

use serde::{Deserialize, Serialize};

/// Result-producing task. Each task owns its own bar chart and busy flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskId {
    Inference,
    Learning,
}

impl TaskId {
    pub const ALL: [TaskId; 2] = [TaskId::Inference, TaskId::Learning];

    pub fn as_str(self) -> &'static str {
        match self {
            TaskId::Inference => "inference",
            TaskId::Learning => "learning",
        }
    }
}

impl std::fmt::Display for TaskId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
