use ::std::collections::{BTreeMap, HashMap};
use ::std::hash::BuildHasher;
use lazy_static::lazy_static;
use serde::Serialize;
use thiserror::Error;

use crate::{
    Validators::{Validator, ValidationError, ValidationResult},
    Constants,
};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FormError {
    #[error("form {form} has no field named {field}")]
    UnknownField {
        form: &'static str,
        field: String,
    },
}

/// The widget a field is rendered with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FieldKind {
    Text,
    Email,
    Password,
    RichText,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    pub name: &'static str,
    pub label: &'static str,
    pub kind: FieldKind,
    pub validators: Vec<Validator>,
}

impl Field {
    pub fn new(name: &'static str, label: &'static str, kind: FieldKind) -> Self {
        Field {
            name,
            label,
            kind,
            validators: Vec::new(),
        }
    }

    pub fn with(mut self, validator: Validator) -> Self {
        self.validators.push(validator);
        self
    }

    /// Runs the validators in order and collects every error, except that a
    /// failed `Required` ends the chain.
    pub fn check(&self, value: Option<&str>) -> Vec<ValidationError> {
        let mut errors = Vec::new();
        for validator in self.validators.iter() {
            if let Err(err) = validator.check(value) {
                errors.push(err);
                if validator.stops_chain_on_failure() {
                    break;
                }
            }
        }
        errors
    }

    pub fn validate(&self, value: Option<&str>) -> ValidationResult {
        match self.check(value).into_iter().next() {
            None => ValidationResult::pass(),
            Some(err) => ValidationResult::fail(err),
        }
    }
}

/// Submitted form data, looked up by field name
pub trait Submitted {
    fn value(&self, key: &str) -> Option<&str>;
}

impl<S: BuildHasher> Submitted for HashMap<String, String, S> {
    fn value(&self, key: &str) -> Option<&str> {
        self.get(key).map(String::as_str)
    }
}

impl Submitted for BTreeMap<String, String> {
    fn value(&self, key: &str) -> Option<&str> {
        self.get(key).map(String::as_str)
    }
}

// Repeated keys resolve to the first occurrence
impl<'a> Submitted for [(&'a str, &'a str)] {
    fn value(&self, key: &str) -> Option<&str> {
        self.iter().find(|(name, _)| *name == key).map(|(_, value)| *value)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldResult {
    pub name: &'static str,
    pub value: Option<String>,
    pub errors: Vec<ValidationError>,
}

impl FieldResult {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn messages(&self) -> Vec<String> {
        self.errors.iter().map(ToString::to_string).collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FormReport {
    pub form: &'static str,
    pub fields: Vec<FieldResult>,
}

impl FormReport {
    pub fn is_valid(&self) -> bool {
        self.fields.iter().all(FieldResult::is_valid)
    }

    pub fn field(&self, name: &str) -> Option<&FieldResult> {
        self.fields.iter().find(|field| field.name == name)
    }

    /// Messages of every failing field, in declaration order
    pub fn errors(&self) -> Vec<(&'static str, Vec<String>)> {
        self.fields.iter()
            .filter(|field| !field.is_valid())
            .map(|field| (field.name, field.messages()))
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Form {
    pub name: &'static str,
    pub submit_label: &'static str,
    fields: Vec<Field>,
}

impl Form {
    pub fn new(name: &'static str, submit_label: &'static str) -> Self {
        Form {
            name,
            submit_label,
            fields: Vec::new(),
        }
    }

    pub fn field(mut self, field: Field) -> Self {
        self.fields.push(field);
        self
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    pub fn get(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|field| field.name == name)
    }

    pub fn validate_field(&self, name: &str, value: Option<&str>) -> Result<ValidationResult, FormError> {
        let field = self.get(name).ok_or_else(|| FormError::UnknownField {
            form: self.name,
            field: name.to_string(),
        })?;
        Ok(field.validate(value))
    }

    /// Validates every declared field against the submission. Keys the form
    /// does not declare are ignored.
    #[tracing::instrument(skip(self, submitted), fields(form=%self.name))]
    pub fn validate<S: Submitted + ?Sized>(&self, submitted: &S) -> FormReport {
        let fields = self.fields.iter()
            .map(|field| {
                let value = submitted.value(field.name);
                FieldResult {
                    name: field.name,
                    value: value.map(str::to_string),
                    errors: field.check(value),
                }
            })
            .collect();
        let report = FormReport {
            form: self.name,
            fields,
        };
        if !report.is_valid() {
            tracing::info!("Validation failed with reason: {:?}", report.errors());
        }
        report
    }
}

fn url_validator() -> Validator {
    Validator::Url {
        require_tld: *Constants::URL_REQUIRE_TLD,
        allow_ip: *Constants::URL_ALLOW_IP,
    }
}

fn email_validator() -> Validator {
    Validator::Email {
        require_tld: *Constants::EMAIL_REQUIRE_TLD,
    }
}

lazy_static!{
    static ref CREATE_POST: Form = Form::new("CreatePost", "Submit Post")
        .field(Field::new("title", "Blog Post Title", FieldKind::Text).with(Validator::Required))
        .field(Field::new("subtitle", "Subtitle", FieldKind::Text).with(Validator::Required))
        .field(Field::new("img_url", "Blog Image URL", FieldKind::Text).with(Validator::Required).with(url_validator()))
        .field(Field::new("body", "Blog Content", FieldKind::RichText).with(Validator::Required));

    static ref REGISTER: Form = Form::new("Register", "Sign Me Up!")
        .field(Field::new("email", "Email", FieldKind::Email).with(Validator::Required).with(email_validator()))
        .field(Field::new("password", "Password", FieldKind::Password).with(Validator::Required).with(Validator::PasswordComplexity))
        .field(Field::new("name", "Name", FieldKind::Text).with(Validator::Required));

    // Password complexity is only enforced at registration
    static ref LOGIN: Form = Form::new("Login", "Let Me In!")
        .field(Field::new("email", "Email", FieldKind::Email).with(Validator::Required).with(email_validator()))
        .field(Field::new("password", "Password", FieldKind::Password).with(Validator::Required));

    static ref COMMENT: Form = Form::new("Comment", "Submit Comment")
        .field(Field::new("comment_text", "Comment", FieldKind::RichText).with(Validator::Required));
}

pub fn create_post() -> &'static Form {
    &CREATE_POST
}

pub fn register() -> &'static Form {
    &REGISTER
}

pub fn login() -> &'static Form {
    &LOGIN
}

pub fn comment() -> &'static Form {
    &COMMENT
}

pub fn all() -> [&'static Form; 4] {
    [create_post(), register(), login(), comment()]
}
