use std::sync::Mutex;

use shared::domain::{AccountKind, CreatedAccount, FileRecord, RegistrationDto, UserId};

use super::*;
use crate::{fields, forms::PictureAsset, notify::Notice};

#[derive(Default)]
struct FakeBackend {
    created: Mutex<Vec<RegistrationDto>>,
    uploads: Mutex<Vec<(UserId, String)>>,
    fail_create: bool,
    fail_upload: bool,
}

impl FakeBackend {
    fn failing_create() -> Self {
        Self {
            fail_create: true,
            ..Self::default()
        }
    }

    fn failing_upload() -> Self {
        Self {
            fail_upload: true,
            ..Self::default()
        }
    }

    fn created_dtos(&self) -> Vec<RegistrationDto> {
        self.created.lock().expect("lock").clone()
    }
}

#[async_trait::async_trait]
impl RegistrationBackend for FakeBackend {
    async fn create_account(&self, dto: &RegistrationDto) -> Result<CreatedAccount, ClientError> {
        if self.fail_create {
            return Err(ClientError::Decode("backend down".into()));
        }
        self.created.lock().expect("lock").push(dto.clone());
        Ok(CreatedAccount {
            id: UserId(99),
            first_name: dto.first_name.clone(),
            last_name: dto.last_name.clone(),
            email: dto.email.clone(),
            kind: dto.kind,
        })
    }

    async fn upload_picture(
        &self,
        owner: UserId,
        asset: &PictureAsset,
    ) -> Result<Option<FileRecord>, ClientError> {
        if self.fail_upload {
            return Err(ClientError::Decode("upload down".into()));
        }
        self.uploads
            .lock()
            .expect("lock")
            .push((owner, asset.filename.clone()));
        Ok(None)
    }
}

#[derive(Default)]
struct RecordingNotifier {
    notices: Mutex<Vec<Notice>>,
}

impl RecordingNotifier {
    fn titles(&self) -> Vec<String> {
        self.notices
            .lock()
            .expect("lock")
            .iter()
            .map(|notice| notice.title.clone())
            .collect()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notice: Notice) {
        self.notices.lock().expect("lock").push(notice);
    }
}

fn filled_physical_wizard() -> WizardController {
    let mut wizard = WizardController::new(AccountKind::Physical);
    wizard.set_field(fields::FIRST_NAME, "John");
    wizard.set_field(fields::LAST_NAME, "Doe");
    wizard.set_field(fields::EMAIL, "johndoe@example.com");
    wizard.set_field(fields::PASSWORD, "mysecretpassword");
    wizard.set_field(fields::CONFIRM_PASSWORD, "mysecretpassword");
    wizard.set_field(fields::DATE_OF_BIRTH, "1990-01-01");
    wizard.set_field(fields::PHONE, "11999990000");
    wizard.set_field(fields::STREET, "123 Main Street");
    wizard.set_field(fields::NEIGHBORHOOD, "Anyone");
    wizard.set_field(fields::CITY, "New York");
    wizard.set_field(fields::STATE, "NY");
    wizard
}

fn filled_organization_wizard(name: &str) -> WizardController {
    let mut wizard = WizardController::new(AccountKind::Organization);
    wizard.set_field(fields::ORGANIZATION_NAME, name);
    wizard.set_field(fields::EMAIL, "contato@patas.org");
    wizard.set_field(fields::PASSWORD, "mysecretpassword");
    wizard.set_field(fields::CONFIRM_PASSWORD, "mysecretpassword");
    wizard.set_field(fields::DATE_OF_BIRTH, "2010-05-20");
    wizard.set_field(fields::PHONE, "1133334444");
    wizard.set_field(fields::STREET, "Rua das Flores");
    wizard.set_field(fields::NEIGHBORHOOD, "Centro");
    wizard.set_field(fields::CITY, "Sao Paulo");
    wizard.set_field(fields::STATE, "SP");
    wizard
}

#[tokio::test]
async fn invalid_step_blocks_advancement_and_reports_fields() {
    let backend = FakeBackend::default();
    let notifier = RecordingNotifier::default();
    let mut wizard = WizardController::new(AccountKind::Physical);
    wizard.set_field(fields::FIRST_NAME, "");

    let outcome = wizard.next(&backend, &notifier).await;
    assert!(matches!(outcome, StepAdvance::Stayed));
    assert_eq!(wizard.current_step(), 0);
    assert_eq!(wizard.errors()[fields::FIRST_NAME], "This field is required");
    assert!(backend.created_dtos().is_empty());
}

#[tokio::test]
async fn valid_steps_advance_and_skip_non_applicable_ones() {
    let backend = FakeBackend::default();
    let notifier = RecordingNotifier::default();
    let mut wizard = filled_organization_wizard("Patas Felizes");

    let outcome = wizard.next(&backend, &notifier).await;
    // Organization accounts skip the physical-only personal-details step.
    assert!(matches!(outcome, StepAdvance::Advanced { step: 2 }));

    let outcome = wizard.next(&backend, &notifier).await;
    assert!(matches!(outcome, StepAdvance::Advanced { step: 3 }));
}

#[tokio::test]
async fn prev_preserves_data_and_pops_at_the_first_step() {
    let backend = FakeBackend::default();
    let notifier = RecordingNotifier::default();
    let mut wizard = filled_physical_wizard();

    wizard.next(&backend, &notifier).await;
    assert_eq!(wizard.current_step(), 1);

    assert_eq!(wizard.prev(), StepBack::SteppedBack { step: 0 });
    assert_eq!(wizard.form().value(fields::DATE_OF_BIRTH), "1990-01-01");
    assert_eq!(wizard.form().value(fields::FIRST_NAME), "John");

    // Forward again lands on the same step without data loss.
    wizard.next(&backend, &notifier).await;
    assert_eq!(wizard.current_step(), 1);

    wizard.prev();
    assert_eq!(wizard.prev(), StepBack::PopRequested);
    assert_eq!(wizard.current_step(), 0);
}

#[tokio::test]
async fn terminal_step_submits_a_resolved_physical_dto() {
    let backend = FakeBackend::default();
    let notifier = RecordingNotifier::default();
    let mut wizard = filled_physical_wizard();

    wizard.next(&backend, &notifier).await;
    wizard.next(&backend, &notifier).await;
    let outcome = wizard.next(&backend, &notifier).await;

    let StepAdvance::Submitted { account } = outcome else {
        panic!("expected submission");
    };
    assert_eq!(account.id, UserId(99));
    assert!(wizard.is_submitted());

    let dtos = backend.created_dtos();
    assert_eq!(dtos.len(), 1);
    assert_eq!(dtos[0].first_name, "John");
    assert_eq!(dtos[0].last_name, "Doe");
    assert_eq!(dtos[0].kind, AccountKind::Physical);
    assert_eq!(dtos[0].job, None);
}

#[tokio::test]
async fn submitted_wizard_ignores_further_next_calls() {
    let backend = FakeBackend::default();
    let notifier = RecordingNotifier::default();
    let mut wizard = filled_physical_wizard();

    wizard.next(&backend, &notifier).await;
    wizard.next(&backend, &notifier).await;
    let outcome = wizard.next(&backend, &notifier).await;
    assert!(matches!(outcome, StepAdvance::Submitted { .. }));

    // A repeated tap on the submit action must not create a second account.
    let outcome = wizard.next(&backend, &notifier).await;
    assert!(matches!(outcome, StepAdvance::AlreadySubmitted));
    assert_eq!(backend.created_dtos().len(), 1);
    assert!(wizard.is_submitted());
}

#[tokio::test]
async fn organization_name_splits_on_first_whitespace() {
    let backend = FakeBackend::default();
    let notifier = RecordingNotifier::default();
    let mut wizard = filled_organization_wizard("Patas Felizes");

    wizard.next(&backend, &notifier).await;
    wizard.next(&backend, &notifier).await;
    wizard.next(&backend, &notifier).await;

    let dtos = backend.created_dtos();
    assert_eq!(dtos[0].first_name, "Patas");
    assert_eq!(dtos[0].last_name, "Felizes");
    assert_eq!(dtos[0].kind, AccountKind::Organization);
}

#[tokio::test]
async fn single_word_organization_name_leaves_last_name_empty() {
    let backend = FakeBackend::default();
    let notifier = RecordingNotifier::default();
    let mut wizard = filled_organization_wizard("Amigos");

    wizard.next(&backend, &notifier).await;
    wizard.next(&backend, &notifier).await;
    wizard.next(&backend, &notifier).await;

    let dtos = backend.created_dtos();
    assert_eq!(dtos[0].first_name, "Amigos");
    assert_eq!(dtos[0].last_name, "");
}

#[tokio::test]
async fn submission_failure_keeps_the_step_and_publishes_a_generic_error() {
    let backend = FakeBackend::failing_create();
    let notifier = RecordingNotifier::default();
    let mut wizard = filled_physical_wizard();

    wizard.next(&backend, &notifier).await;
    wizard.next(&backend, &notifier).await;
    let outcome = wizard.next(&backend, &notifier).await;

    assert!(matches!(outcome, StepAdvance::Stayed));
    assert_eq!(wizard.current_step(), 3);
    assert!(!wizard.is_submitted());
    assert_eq!(
        wizard.errors()[fields::SUBMIT],
        "Something went wrong, try again later"
    );
    assert_eq!(notifier.titles(), vec!["Registration failed".to_string()]);
    // Entered data survives for a corrected resubmission.
    assert_eq!(wizard.form().value(fields::EMAIL), "johndoe@example.com");
}

#[tokio::test]
async fn picture_upload_failure_is_a_secondary_notice_only() {
    let backend = FakeBackend::failing_upload();
    let notifier = RecordingNotifier::default();
    let mut wizard = filled_physical_wizard();
    wizard.attach_picture(PictureAsset {
        filename: "me.jpg".into(),
        mime_type: Some("image/jpeg".into()),
        bytes: Some(vec![1, 2, 3]),
    });

    wizard.next(&backend, &notifier).await;
    wizard.next(&backend, &notifier).await;
    let outcome = wizard.next(&backend, &notifier).await;

    assert!(matches!(outcome, StepAdvance::Submitted { .. }));
    assert!(wizard.is_submitted());
    assert_eq!(
        notifier.titles(),
        vec!["Profile picture not uploaded".to_string()]
    );
    let notices = notifier.notices.lock().expect("lock").clone();
    assert!(notices[0].detail.contains("picture upload failed"));
    assert!(notices[0].detail.contains("upload down"));
}

#[tokio::test]
async fn successful_submission_uploads_exactly_one_picture() {
    let backend = FakeBackend::default();
    let notifier = RecordingNotifier::default();
    let mut wizard = filled_physical_wizard();
    wizard.attach_picture(PictureAsset {
        filename: "me.jpg".into(),
        mime_type: Some("image/jpeg".into()),
        bytes: Some(vec![1, 2, 3]),
    });

    wizard.next(&backend, &notifier).await;
    wizard.next(&backend, &notifier).await;
    wizard.next(&backend, &notifier).await;

    let uploads = backend.uploads.lock().expect("lock").clone();
    assert_eq!(uploads, vec![(UserId(99), "me.jpg".to_string())]);
    assert_eq!(backend.created_dtos().len(), 1);
    assert!(notifier.titles().is_empty());
}
