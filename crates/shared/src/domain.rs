use serde::{Deserialize, Serialize};

macro_rules! id_newtype {
    ($name:ident) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub struct $name(pub i64);
    };
}

id_newtype!(ProviderId);

/// A balance-transfer agent the user can route a top-up through.
/// Read-only to the wizard; only available providers are selectable.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Provider {
    pub id: ProviderId,
    pub name: String,
    pub contact_address: String,
    pub available: bool,
}

impl Provider {
    /// Contact address reduced to digits, the form the messaging deep link
    /// addresses. Strips `+`, spaces, and separator punctuation.
    pub fn contact_digits(&self) -> String {
        self.contact_address
            .chars()
            .filter(char::is_ascii_digit)
            .collect()
    }
}

/// A confirmed top-up quantity. The numeric text is kept exactly as the user
/// entered it; the display label appends the currency unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Amount {
    raw: String,
    value: f64,
}

impl Amount {
    /// Parses free-form numeric text. Returns `None` unless the value is a
    /// finite number strictly greater than zero.
    pub fn parse(text: &str) -> Option<Self> {
        let raw = text.trim();
        let value: f64 = raw.parse().ok()?;
        if value.is_finite() && value > 0.0 {
            Some(Self {
                raw: raw.to_string(),
                value,
            })
        } else {
            None
        }
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// `"100"` + `"CUP"` -> `"100 CUP"`, the form embedded in the message.
    pub fn label(&self, currency_unit: &str) -> String {
        format!("{} {}", self.raw, currency_unit)
    }
}

/// Wizard progress, derived from which selection fields are populated.
/// Never stored independently.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Step {
    Amount,
    Provider,
    Phone,
    Confirm,
}

impl Step {
    pub fn number(self) -> u8 {
        match self {
            Step::Amount => 1,
            Step::Provider => 2,
            Step::Phone => 3,
            Step::Confirm => 4,
        }
    }
}

/// The persisted slice of an in-progress selection. Provider and step are
/// never persisted; only the last entered amount and phone survive a session.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SelectionDraft {
    pub amount: Option<String>,
    pub phone: String,
}
