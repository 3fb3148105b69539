use anyhow::{Context, Result};
use tracing::{info, warn};
use url::Url;

use shared::{
    domain::{Amount, Provider, ProviderId, SelectionDraft, Step},
    error::{IncompleteField, WizardError},
};

pub mod config;
pub mod events;
pub mod providers;

pub use config::{load_settings, Settings};

const MOBILE_SUBSCRIBER_LEN: usize = 8;
const MOBILE_RANGE_PREFIX: u8 = b'5';

/// The in-progress user choice of amount, provider, and phone.
/// Mutated only through [`Wizard`] operations.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Selection {
    amount: Option<Amount>,
    provider: Option<ProviderId>,
    phone: String,
}

impl Selection {
    pub fn amount(&self) -> Option<&Amount> {
        self.amount.as_ref()
    }

    pub fn provider(&self) -> Option<ProviderId> {
        self.provider
    }

    pub fn phone(&self) -> &str {
        &self.phone
    }

    /// The persistable slice: amount text and phone. Provider and step are
    /// deliberately left out.
    pub fn draft(&self) -> SelectionDraft {
        SelectionDraft {
            amount: self.amount.as_ref().map(|a| a.raw().to_string()),
            phone: self.phone.clone(),
        }
    }
}

/// Input for the amount step: one of the configured presets, or free-form
/// text from the custom field.
#[derive(Debug, Clone, PartialEq)]
pub enum AmountInput {
    Preset(usize),
    Custom(String),
}

/// A ready-to-open messaging link plus the exact message it carries.
#[derive(Debug, Clone, PartialEq)]
pub struct DeepLink {
    pub url: Url,
    pub message: String,
}

/// Owns the [`Selection`], enforces step ordering, validates input, and
/// produces the final deep link. Single-actor: every operation is a
/// synchronous response to one discrete user input.
pub struct Wizard {
    settings: Settings,
    messaging_base: Url,
    providers: Vec<Provider>,
    selection: Selection,
}

impl Wizard {
    pub fn new(settings: Settings) -> Result<Self> {
        let messaging_base = Url::parse(&settings.messaging_base_url).with_context(|| {
            format!(
                "invalid messaging base url '{}'",
                settings.messaging_base_url
            )
        })?;
        Ok(Self {
            settings,
            messaging_base,
            providers: Vec::new(),
            selection: Selection::default(),
        })
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn providers(&self) -> &[Provider] {
        &self.providers
    }

    pub fn set_providers(&mut self, providers: Vec<Provider>) {
        self.providers = providers;
    }

    /// One-shot provider list load at startup. A fetch failure leaves the
    /// wizard with an empty list; there is nothing to choose, and no retry.
    pub async fn load_providers(&mut self, source: &dyn providers::ProviderSource) {
        match source.fetch_providers().await {
            Ok(list) => {
                info!(count = list.len(), "provider list loaded");
                self.set_providers(list);
            }
            Err(err) => {
                warn!(error = %err, "provider fetch failed; continuing with empty list");
                self.set_providers(Vec::new());
            }
        }
    }

    /// Applies a persisted draft to the empty selection. The same checks as
    /// live input apply, so a stale or corrupt draft degrades to an unset
    /// field instead of poisoning the session.
    pub fn hydrate(&mut self, draft: SelectionDraft) {
        self.selection.amount = draft.amount.as_deref().and_then(Amount::parse);
        self.selection.phone = sanitize_phone(&draft.phone);
    }

    /// Reads the persisted draft once at startup. Read failures are logged
    /// and leave the selection empty.
    pub async fn restore_draft(&mut self, store: &storage::DraftStore) {
        match store.load_draft().await {
            Ok(Some(draft)) => self.hydrate(draft),
            Ok(None) => {}
            Err(err) => warn!(error = %err, "failed to load persisted draft"),
        }
    }

    /// Fire-and-forget draft write, called after every state change.
    /// Persistence failures never interrupt the interactive flow.
    pub async fn persist_draft(&self, store: &storage::DraftStore) {
        if let Err(err) = store.save_draft(&self.selection.draft()).await {
            warn!(error = %err, "failed to persist selection draft");
        }
    }

    /// Sets the amount from a preset or free-form text. Text that does not
    /// parse strictly greater than zero clears the amount: it is treated as
    /// "not yet selected", never as an error. Provider and phone survive an
    /// amount change; the derived step gates progression regardless.
    pub fn select_amount(&mut self, input: AmountInput) {
        self.selection.amount = match input {
            AmountInput::Preset(index) => self
                .settings
                .preset_amounts
                .get(index)
                .and_then(|value| Amount::parse(&value.to_string())),
            AmountInput::Custom(text) => Amount::parse(&text),
        };
    }

    /// Sets the provider. Unknown or unavailable providers are ignored and
    /// the prior choice is kept.
    pub fn select_provider(&mut self, provider_id: ProviderId) {
        if self.provider_selectable(provider_id) {
            self.selection.provider = Some(provider_id);
        }
    }

    pub fn provider_selectable(&self, provider_id: ProviderId) -> bool {
        self.providers
            .iter()
            .any(|p| p.id == provider_id && p.available)
    }

    /// Stores the sanitized phone input. Validity is a separate derived
    /// check; raw input is never rejected here.
    pub fn set_phone(&mut self, raw: &str) {
        self.selection.phone = sanitize_phone(raw);
    }

    pub fn validate_phone(&self, phone: &str) -> bool {
        validate_phone(phone, &self.settings.country_code)
    }

    /// 1 without an amount; 2 with amount only; 3 with amount and provider
    /// but an empty phone; 4 with all three populated. Provider and phone
    /// never advance the step while an upstream field is missing.
    pub fn current_step(&self) -> Step {
        if self.selection.amount.is_none() {
            Step::Amount
        } else if self.selection.provider.is_none() {
            Step::Provider
        } else if self.selection.phone.is_empty() {
            Step::Phone
        } else {
            Step::Confirm
        }
    }

    pub fn can_submit(&self) -> bool {
        self.selection.amount.is_some()
            && self.selection.provider.is_some()
            && self.validate_phone(&self.selection.phone)
    }

    /// Display label for the chosen amount, e.g. `"100 CUP"`.
    pub fn amount_label(&self) -> Option<String> {
        self.selection
            .amount
            .as_ref()
            .map(|a| a.label(&self.settings.currency_unit))
    }

    pub fn selected_provider(&self) -> Option<&Provider> {
        let id = self.selection.provider?;
        self.providers.iter().find(|p| p.id == id)
    }

    /// Builds the messaging deep link for the completed selection.
    /// Deterministic: the same selection always yields the same link.
    pub fn build_deep_link(&self) -> std::result::Result<DeepLink, WizardError> {
        let amount = self
            .selection
            .amount
            .as_ref()
            .ok_or(WizardError::Incomplete(IncompleteField::Amount))?;
        let provider = self
            .selected_provider()
            .ok_or(WizardError::Incomplete(IncompleteField::Provider))?;
        if self.selection.phone.is_empty() {
            return Err(WizardError::Incomplete(IncompleteField::Phone));
        }
        if !self.validate_phone(&self.selection.phone) {
            return Err(WizardError::InvalidPhone);
        }

        let message = format!(
            "Hola, solicito una transferencia de saldo a mi número {} por un monto de {}. ¡Gracias!",
            self.selection.phone,
            amount.label(&self.settings.currency_unit),
        );

        let mut url = self.messaging_base.clone();
        url.set_path(&provider.contact_digits());
        url.query_pairs_mut().append_pair("text", &message);

        Ok(DeepLink { url, message })
    }
}

/// Keeps digits and at most one leading `+`; everything else is dropped.
pub fn sanitize_phone(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        if c.is_ascii_digit() {
            out.push(c);
        } else if c == '+' && out.is_empty() {
            out.push(c);
        }
    }
    out
}

/// A phone is a valid mobile number iff its digits form an 8-digit
/// subscriber number starting with `5`, optionally prefixed by the 2-digit
/// country code (digits-only form matches `^(53)?5\d{7}$`).
pub fn validate_phone(phone: &str, country_code: &str) -> bool {
    let digits: String = phone.chars().filter(char::is_ascii_digit).collect();

    let subscriber = match digits.strip_prefix(country_code) {
        Some(rest) if rest.len() == MOBILE_SUBSCRIBER_LEN => rest,
        _ => digits.as_str(),
    };

    subscriber.len() == MOBILE_SUBSCRIBER_LEN
        && subscriber.as_bytes()[0] == MOBILE_RANGE_PREFIX
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
