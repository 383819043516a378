//! Data-synchronization and form-orchestration core of the adopet mobile
//! client: query composition, incremental list fetching with stale-response
//! protection, step-scoped registration validation, and the wizard state
//! machine that drives terminal submission.

pub mod api;
pub mod collection;
pub mod error;
pub mod fields;
pub mod forms;
pub mod notify;
pub mod query;
pub mod wizard;

pub use api::{AdoptionApi, ClientConfig, Session};
pub use collection::{LoadOutcome, PageFetcher, PaginatedCollectionController};
pub use error::ClientError;
pub use forms::{PictureAsset, RegistrationForm, StepValidationEngine};
pub use notify::{Notice, Notifier, TracingNotifier};
pub use wizard::{RegistrationBackend, StepAdvance, StepBack, WizardController};
