use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IncompleteField {
    Amount,
    Provider,
    Phone,
}

#[derive(Debug, Error)]
pub enum WizardError {
    #[error("selection incomplete: {0:?} not set")]
    Incomplete(IncompleteField),
    #[error("phone number fails mobile-range validation")]
    InvalidPhone,
}
