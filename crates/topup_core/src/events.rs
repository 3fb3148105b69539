//! Discrete user input events and the single dispatch seam into the wizard.
//! The embedding surface renders from wizard state and persists the draft
//! after each dispatched event; it never mutates the selection directly.

use shared::domain::ProviderId;

use crate::{AmountInput, DeepLink, Wizard};

/// One discrete user input from the embedding surface.
#[derive(Debug, Clone, PartialEq)]
pub enum WizardEvent {
    PresetChosen(usize),
    CustomAmountInput(String),
    ProviderChosen(ProviderId),
    PhoneInput(String),
    Submit,
}

/// What a dispatched event did, for the embedding surface to render.
#[derive(Debug, Clone, PartialEq)]
pub enum DispatchOutcome {
    Updated,
    Ignored,
    LinkReady(DeepLink),
}

pub fn dispatch(wizard: &mut Wizard, event: WizardEvent) -> DispatchOutcome {
    let event_name = match &event {
        WizardEvent::PresetChosen(_) => "preset_chosen",
        WizardEvent::CustomAmountInput(_) => "custom_amount_input",
        WizardEvent::ProviderChosen(_) => "provider_chosen",
        WizardEvent::PhoneInput(_) => "phone_input",
        WizardEvent::Submit => "submit",
    };
    tracing::debug!(event = event_name, "dispatching wizard event");

    match event {
        WizardEvent::PresetChosen(index) => {
            wizard.select_amount(AmountInput::Preset(index));
            DispatchOutcome::Updated
        }
        WizardEvent::CustomAmountInput(text) => {
            wizard.select_amount(AmountInput::Custom(text));
            DispatchOutcome::Updated
        }
        WizardEvent::ProviderChosen(provider_id) => {
            if wizard.provider_selectable(provider_id) {
                wizard.select_provider(provider_id);
                DispatchOutcome::Updated
            } else {
                DispatchOutcome::Ignored
            }
        }
        WizardEvent::PhoneInput(raw) => {
            wizard.set_phone(&raw);
            DispatchOutcome::Updated
        }
        WizardEvent::Submit => match wizard.build_deep_link() {
            Ok(link) => DispatchOutcome::LinkReady(link),
            Err(err) => {
                tracing::debug!(error = %err, "submit withheld");
                DispatchOutcome::Ignored
            }
        },
    }
}
