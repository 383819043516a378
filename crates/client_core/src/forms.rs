//! Registration form data, per-field rules, and the step validation engine.
//!
//! Steps are data: a schema over the fields they own plus an optional
//! account-kind predicate. The engine knows nothing about which fields
//! exist; cross-field behaviour (password confirmation, kind-dependent
//! identity requirements) lives in schema-level refinements.

use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDate;
use shared::domain::AccountKind;

use crate::fields;

/// Locally picked image, possibly without a binary payload (the picker can
/// hand back a reference-only asset).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PictureAsset {
    pub filename: String,
    pub mime_type: Option<String>,
    pub bytes: Option<Vec<u8>>,
}

/// Superset of every step's fields. Values are append-only by key: steps
/// only add or overwrite the fields they own, nothing is dropped when the
/// user navigates backwards.
#[derive(Debug, Clone)]
pub struct RegistrationForm {
    values: BTreeMap<&'static str, String>,
    account_kind: AccountKind,
    picture: Option<PictureAsset>,
}

impl RegistrationForm {
    pub fn new(account_kind: AccountKind) -> Self {
        Self {
            values: BTreeMap::new(),
            account_kind,
            picture: None,
        }
    }

    pub fn set(&mut self, field: &'static str, value: impl Into<String>) {
        self.values.insert(field, value.into());
    }

    /// Current value of a field, empty string when never entered.
    pub fn value(&self, field: &str) -> &str {
        self.values.get(field).map(String::as_str).unwrap_or("")
    }

    /// `None` when the field is unset or empty, for optional DTO slots.
    pub fn value_opt(&self, field: &str) -> Option<String> {
        let value = self.value(field);
        (!value.is_empty()).then(|| value.to_string())
    }

    pub fn account_kind(&self) -> AccountKind {
        self.account_kind
    }

    pub fn set_account_kind(&mut self, kind: AccountKind) {
        self.account_kind = kind;
    }

    pub fn attach_picture(&mut self, picture: PictureAsset) {
        self.picture = Some(picture);
    }

    pub fn picture(&self) -> Option<&PictureAsset> {
        self.picture.as_ref()
    }
}

/// Per-field validation errors, one message per failing field.
pub type FieldErrors = BTreeMap<&'static str, String>;

#[derive(Debug, Clone, Copy)]
pub enum Rule {
    MinLen(usize),
    MaxLen(usize),
    Email,
    IsoDate,
    Digits,
}

impl Rule {
    fn check(&self, value: &str) -> Option<String> {
        match self {
            Rule::MinLen(min) => (value.chars().count() < *min)
                .then(|| format!("Must be at least {min} characters")),
            Rule::MaxLen(max) => (value.chars().count() > *max)
                .then(|| format!("Must be at most {max} characters")),
            Rule::Email => {
                let valid = value
                    .split_once('@')
                    .is_some_and(|(local, domain)| !local.is_empty() && domain.contains('.'));
                (!valid).then(|| "Enter a valid e-mail address".to_string())
            }
            Rule::IsoDate => NaiveDate::parse_from_str(value, "%Y-%m-%d")
                .is_err()
                .then(|| "Enter a date as YYYY-MM-DD".to_string()),
            Rule::Digits => (!value.chars().all(|c| c.is_ascii_digit()))
                .then(|| "Digits only".to_string()),
        }
    }
}

#[derive(Debug, Clone)]
pub struct FieldSpec {
    name: &'static str,
    required: bool,
    rules: Vec<Rule>,
}

impl FieldSpec {
    pub fn required(name: &'static str) -> Self {
        Self {
            name,
            required: true,
            rules: Vec::new(),
        }
    }

    pub fn optional(name: &'static str) -> Self {
        Self {
            name,
            required: false,
            rules: Vec::new(),
        }
    }

    pub fn rule(mut self, rule: Rule) -> Self {
        self.rules.push(rule);
        self
    }

    fn validate(&self, form: &RegistrationForm) -> Option<(&'static str, String)> {
        let value = form.value(self.name);
        if value.is_empty() {
            return self
                .required
                .then(|| (self.name, "This field is required".to_string()));
        }
        self.rules
            .iter()
            .find_map(|rule| rule.check(value))
            .map(|message| (self.name, message))
    }
}

/// Cross-field rule. `check` returns true when the form is acceptable;
/// on false the message lands under `field`.
#[derive(Clone, Copy)]
pub struct Refinement {
    pub field: &'static str,
    pub message: &'static str,
    pub check: fn(&RegistrationForm) -> bool,
}

#[derive(Clone, Default)]
pub struct StepSchema {
    fields: Vec<FieldSpec>,
    refinements: Vec<Refinement>,
}

impl StepSchema {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn field(mut self, spec: FieldSpec) -> Self {
        self.fields.push(spec);
        self
    }

    pub fn refine(mut self, refinement: Refinement) -> Self {
        self.refinements.push(refinement);
        self
    }

    /// Runs every field rule and refinement; never stops at the first
    /// failure so the UI can show all messages at once. A refinement does
    /// not overwrite a message the field's own rules already produced.
    pub fn validate(&self, form: &RegistrationForm) -> FieldErrors {
        let mut errors = FieldErrors::new();
        for spec in &self.fields {
            if let Some((field, message)) = spec.validate(form) {
                errors.insert(field, message);
            }
        }
        for refinement in &self.refinements {
            if !(refinement.check)(form) {
                errors
                    .entry(refinement.field)
                    .or_insert_with(|| refinement.message.to_string());
            }
        }
        errors
    }
}

pub struct StepDefinition {
    pub title: &'static str,
    pub schema: StepSchema,
    pub owned_fields: BTreeSet<&'static str>,
    pub conditional_on: Option<fn(AccountKind) -> bool>,
}

impl StepDefinition {
    pub fn applies_to(&self, kind: AccountKind) -> bool {
        self.conditional_on.map_or(true, |predicate| predicate(kind))
    }
}

/// Ordered step list plus navigation helpers that skip steps whose
/// predicate rejects the current account kind.
pub struct StepValidationEngine {
    steps: Vec<StepDefinition>,
}

impl StepValidationEngine {
    pub fn new(steps: Vec<StepDefinition>) -> Self {
        Self { steps }
    }

    pub fn step_count(&self) -> usize {
        self.steps.len()
    }

    pub fn step(&self, index: usize) -> &StepDefinition {
        &self.steps[index]
    }

    /// Validates one step against the form. Steps that do not apply to the
    /// form's account kind are auto-valid.
    pub fn validate_step(&self, index: usize, form: &RegistrationForm) -> Result<(), FieldErrors> {
        let step = &self.steps[index];
        if !step.applies_to(form.account_kind()) {
            return Ok(());
        }
        let errors = step.schema.validate(form);
        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    pub fn first_applicable(&self, kind: AccountKind) -> usize {
        self.steps
            .iter()
            .position(|step| step.applies_to(kind))
            .unwrap_or(0)
    }

    pub fn next_applicable(&self, from: usize, kind: AccountKind) -> Option<usize> {
        ((from + 1)..self.steps.len()).find(|&i| self.steps[i].applies_to(kind))
    }

    pub fn prev_applicable(&self, from: usize, kind: AccountKind) -> Option<usize> {
        (0..from).rev().find(|&i| self.steps[i].applies_to(kind))
    }

    pub fn is_last_applicable(&self, index: usize, kind: AccountKind) -> bool {
        self.next_applicable(index, kind).is_none()
    }

    /// Union of `owned_fields` across the steps that apply to `kind`; must
    /// cover every field the submission payload needs for that kind.
    pub fn owned_fields_for(&self, kind: AccountKind) -> BTreeSet<&'static str> {
        self.steps
            .iter()
            .filter(|step| step.applies_to(kind))
            .flat_map(|step| step.owned_fields.iter().copied())
            .collect()
    }
}

fn is_physical(kind: AccountKind) -> bool {
    kind == AccountKind::Physical
}

fn is_organization(kind: AccountKind) -> bool {
    kind == AccountKind::Organization
}

/// The four registration steps: identity & credentials, personal details
/// (physical accounts), organization details (ONG accounts), address.
pub fn registration_steps() -> StepValidationEngine {
    let identity = StepDefinition {
        title: "Identity & credentials",
        schema: StepSchema::new()
            .field(
                FieldSpec::optional(fields::FIRST_NAME)
                    .rule(Rule::MinLen(2))
                    .rule(Rule::MaxLen(50)),
            )
            .field(
                FieldSpec::optional(fields::LAST_NAME)
                    .rule(Rule::MinLen(2))
                    .rule(Rule::MaxLen(50)),
            )
            .field(
                FieldSpec::optional(fields::ORGANIZATION_NAME)
                    .rule(Rule::MinLen(2))
                    .rule(Rule::MaxLen(100)),
            )
            .field(FieldSpec::required(fields::EMAIL).rule(Rule::Email))
            .field(FieldSpec::required(fields::PASSWORD).rule(Rule::MinLen(8)))
            .field(FieldSpec::required(fields::CONFIRM_PASSWORD))
            .refine(Refinement {
                field: fields::FIRST_NAME,
                message: "This field is required",
                check: |form| {
                    !is_physical(form.account_kind()) || !form.value(fields::FIRST_NAME).is_empty()
                },
            })
            .refine(Refinement {
                field: fields::LAST_NAME,
                message: "This field is required",
                check: |form| {
                    !is_physical(form.account_kind()) || !form.value(fields::LAST_NAME).is_empty()
                },
            })
            .refine(Refinement {
                field: fields::ORGANIZATION_NAME,
                message: "This field is required",
                check: |form| {
                    !is_organization(form.account_kind())
                        || !form.value(fields::ORGANIZATION_NAME).is_empty()
                },
            })
            .refine(Refinement {
                field: fields::CONFIRM_PASSWORD,
                message: "Passwords must match",
                check: |form| {
                    form.value(fields::CONFIRM_PASSWORD) == form.value(fields::PASSWORD)
                },
            }),
        owned_fields: BTreeSet::from([
            fields::FIRST_NAME,
            fields::LAST_NAME,
            fields::ORGANIZATION_NAME,
            fields::EMAIL,
            fields::PASSWORD,
            fields::CONFIRM_PASSWORD,
        ]),
        conditional_on: None,
    };

    let personal = StepDefinition {
        title: "Personal details",
        schema: StepSchema::new()
            .field(FieldSpec::required(fields::DATE_OF_BIRTH).rule(Rule::IsoDate))
            .field(FieldSpec::required(fields::PHONE).rule(Rule::Digits))
            .field(FieldSpec::optional(fields::JOB))
            .field(FieldSpec::optional(fields::CPF).rule(Rule::Digits)),
        owned_fields: BTreeSet::from([
            fields::DATE_OF_BIRTH,
            fields::PHONE,
            fields::JOB,
            fields::CPF,
        ]),
        conditional_on: Some(is_physical),
    };

    let organization = StepDefinition {
        title: "Organization details",
        schema: StepSchema::new()
            .field(FieldSpec::required(fields::DATE_OF_BIRTH).rule(Rule::IsoDate))
            .field(FieldSpec::required(fields::PHONE).rule(Rule::Digits))
            .field(FieldSpec::optional(fields::CNPJ).rule(Rule::Digits))
            .field(FieldSpec::optional(fields::DESCRIPTION).rule(Rule::MaxLen(500))),
        owned_fields: BTreeSet::from([
            fields::DATE_OF_BIRTH,
            fields::PHONE,
            fields::CNPJ,
            fields::DESCRIPTION,
        ]),
        conditional_on: Some(is_organization),
    };

    let address = StepDefinition {
        title: "Address",
        schema: StepSchema::new()
            .field(FieldSpec::required(fields::STREET))
            .field(FieldSpec::optional(fields::NUMBER))
            .field(FieldSpec::required(fields::NEIGHBORHOOD))
            .field(FieldSpec::required(fields::CITY))
            .field(FieldSpec::required(fields::STATE)),
        owned_fields: BTreeSet::from([
            fields::STREET,
            fields::NUMBER,
            fields::NEIGHBORHOOD,
            fields::CITY,
            fields::STATE,
        ]),
        conditional_on: None,
    };

    StepValidationEngine::new(vec![identity, personal, organization, address])
}

#[cfg(test)]
#[path = "tests/forms_tests.rs"]
mod tests;
