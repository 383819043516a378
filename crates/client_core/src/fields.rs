//! Registration field identifiers, matching the backend's payload naming.
//! Error maps published by the wizard are keyed by these.

pub const FIRST_NAME: &str = "firstName";
pub const LAST_NAME: &str = "lastName";
pub const ORGANIZATION_NAME: &str = "organizationName";
pub const EMAIL: &str = "email";
pub const PASSWORD: &str = "password";
pub const CONFIRM_PASSWORD: &str = "confirmPassword";
pub const DATE_OF_BIRTH: &str = "dateOfBirth";
pub const PHONE: &str = "phone";
pub const JOB: &str = "job";
pub const CPF: &str = "cpf";
pub const CNPJ: &str = "cnpj";
pub const DESCRIPTION: &str = "description";
pub const STREET: &str = "street";
pub const NUMBER: &str = "number";
pub const NEIGHBORHOOD: &str = "neighborhood";
pub const CITY: &str = "city";
pub const STATE: &str = "state";

/// Key used for the step-independent submission failure message.
pub const SUBMIT: &str = "submit";
