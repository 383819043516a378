//! Wizard state machine: gates forward navigation on step validation,
//! merges the per-step field sets into the flat submission payload, and
//! drives the terminal account-creation call.

use async_trait::async_trait;
use shared::domain::{AccountKind, CreatedAccount, FileRecord, RegistrationDto, UserId};
use tracing::{info, warn};

use crate::{
    error::ClientError,
    fields,
    forms::{registration_steps, FieldErrors, PictureAsset, RegistrationForm, StepValidationEngine},
    notify::{Notice, Notifier},
};

const SUBMIT_FAILED_MESSAGE: &str = "Something went wrong, try again later";

/// Submission seam: one account-creation call, optionally followed by one
/// picture upload scoped to the created identity.
#[async_trait]
pub trait RegistrationBackend: Send + Sync {
    async fn create_account(&self, dto: &RegistrationDto) -> Result<CreatedAccount, ClientError>;
    async fn upload_picture(
        &self,
        owner: UserId,
        asset: &PictureAsset,
    ) -> Result<Option<FileRecord>, ClientError>;
}

/// Result of a forward transition.
#[derive(Debug)]
pub enum StepAdvance {
    /// Validation or submission failed; the error map explains why.
    Stayed,
    Advanced { step: usize },
    Submitted { account: CreatedAccount },
    /// The wizard already submitted; the call had no effect.
    AlreadySubmitted,
}

/// Result of a backward transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepBack {
    SteppedBack { step: usize },
    /// Already on the first step; the caller should pop the wizard screen.
    PopRequested,
}

pub struct WizardController {
    engine: StepValidationEngine,
    form: RegistrationForm,
    current_step: usize,
    errors: FieldErrors,
    submitted: bool,
}

impl WizardController {
    pub fn new(account_kind: AccountKind) -> Self {
        let engine = registration_steps();
        let current_step = engine.first_applicable(account_kind);
        Self {
            engine,
            form: RegistrationForm::new(account_kind),
            current_step,
            errors: FieldErrors::new(),
            submitted: false,
        }
    }

    pub fn current_step(&self) -> usize {
        self.current_step
    }

    pub fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    pub fn form(&self) -> &RegistrationForm {
        &self.form
    }

    pub fn is_submitted(&self) -> bool {
        self.submitted
    }

    pub fn set_field(&mut self, field: &'static str, value: impl Into<String>) {
        self.form.set(field, value);
    }

    pub fn attach_picture(&mut self, picture: PictureAsset) {
        self.form.attach_picture(picture);
    }

    /// Validates the current step and either publishes its error map,
    /// advances to the next applicable step, or — on the last step —
    /// submits. Submission failure keeps the step and the entered data;
    /// after a successful submission further calls are no-ops.
    pub async fn next(
        &mut self,
        backend: &dyn RegistrationBackend,
        notifier: &dyn Notifier,
    ) -> StepAdvance {
        // Submitted is terminal: never re-validate or re-submit.
        if self.submitted {
            return StepAdvance::AlreadySubmitted;
        }
        self.errors.clear();

        if let Err(errors) = self.engine.validate_step(self.current_step, &self.form) {
            self.errors = errors;
            return StepAdvance::Stayed;
        }

        let kind = self.form.account_kind();
        if self.engine.is_last_applicable(self.current_step, kind) {
            return self.submit(backend, notifier).await;
        }

        // Applicability was checked when this step was entered, and the
        // engine guarantees a next step exists here.
        if let Some(step) = self.engine.next_applicable(self.current_step, kind) {
            self.current_step = step;
        }
        StepAdvance::Advanced {
            step: self.current_step,
        }
    }

    /// Steps back without re-validating; entered data is preserved. On the
    /// first applicable step the wizard asks the caller to exit instead.
    pub fn prev(&mut self) -> StepBack {
        let kind = self.form.account_kind();
        match self.engine.prev_applicable(self.current_step, kind) {
            Some(step) => {
                self.current_step = step;
                StepBack::SteppedBack { step }
            }
            None => StepBack::PopRequested,
        }
    }

    async fn submit(
        &mut self,
        backend: &dyn RegistrationBackend,
        notifier: &dyn Notifier,
    ) -> StepAdvance {
        let dto = self.resolve_dto();

        let account = match backend.create_account(&dto).await {
            Ok(account) => account,
            Err(err) => {
                warn!(error = %err, "account creation failed");
                self.errors
                    .insert(fields::SUBMIT, SUBMIT_FAILED_MESSAGE.to_string());
                notifier.notify(Notice::new("Registration failed", err.to_string()));
                return StepAdvance::Stayed;
            }
        };
        info!(user_id = account.id.0, "account created");

        // The upload is secondary: its failure must not undo or mask the
        // successful registration.
        if let Some(picture) = self.form.picture() {
            if let Err(err) = backend.upload_picture(account.id, picture).await {
                warn!(user_id = account.id.0, error = %err, "picture upload failed");
                let partial = ClientError::PartialSubmission(err.to_string());
                notifier.notify(Notice::new("Profile picture not uploaded", partial.to_string()));
            }
        }

        self.submitted = true;
        StepAdvance::Submitted { account }
    }

    /// Builds the flat submission payload, resolving the two mutually
    /// exclusive identity representations into the canonical
    /// firstName/lastName pair the backend expects.
    fn resolve_dto(&self) -> RegistrationDto {
        let form = &self.form;
        let kind = form.account_kind();
        let (first_name, last_name) = match kind {
            AccountKind::Physical => (
                form.value(fields::FIRST_NAME).to_string(),
                form.value(fields::LAST_NAME).to_string(),
            ),
            AccountKind::Organization => {
                split_organization_name(form.value(fields::ORGANIZATION_NAME))
            }
        };

        RegistrationDto {
            first_name,
            last_name,
            email: form.value(fields::EMAIL).to_string(),
            password: form.value(fields::PASSWORD).to_string(),
            confirm_password: form.value(fields::CONFIRM_PASSWORD).to_string(),
            phone: form.value(fields::PHONE).to_string(),
            date_of_birth: form.value(fields::DATE_OF_BIRTH).to_string(),
            job: form.value_opt(fields::JOB),
            cpf: form.value_opt(fields::CPF),
            cnpj: form.value_opt(fields::CNPJ),
            description: form.value_opt(fields::DESCRIPTION),
            kind,
            street: form.value(fields::STREET).to_string(),
            number: form.value_opt(fields::NUMBER),
            neighborhood: form.value(fields::NEIGHBORHOOD).to_string(),
            city: form.value(fields::CITY).to_string(),
            state: form.value(fields::STATE).to_string(),
        }
    }
}

/// Splits an organization name into first/last tokens on the first
/// whitespace boundary. Deliberately lossy for multi-word names: the
/// backend only knows firstName/lastName, so "Patas Felizes Abrigo"
/// becomes ("Patas", "Felizes Abrigo") and a single word leaves lastName
/// empty.
fn split_organization_name(name: &str) -> (String, String) {
    let name = name.trim();
    match name.split_once(char::is_whitespace) {
        Some((first, rest)) => (first.to_string(), rest.trim_start().to_string()),
        None => (name.to_string(), String::new()),
    }
}

#[cfg(test)]
#[path = "tests/wizard_tests.rs"]
mod tests;
