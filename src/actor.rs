use serde::{Deserialize, Serialize};

/// Who performed a payroll action. Batch runs and bonus entry are usually
/// system-initiated, so the actor is threaded into the engine explicitly
/// instead of fabricating a placeholder user at the call site.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Actor {
    User { id: u64, name: String },
    System { label: String },
}

impl Actor {
    pub fn system(label: impl Into<String>) -> Self {
        Self::System {
            label: label.into(),
        }
    }

    /// The string stamped into `generated_by` / `added_by` columns.
    pub fn label(&self) -> &str {
        match self {
            Self::User { name, .. } => name,
            Self::System { label } => label,
        }
    }
}
