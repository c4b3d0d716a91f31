use serde::{de::DeserializeOwned, Deserialize, Serialize};
use garde::Validate;

use crate::Forms::{self, Form};

/// A typed form body tied to the form definition that validates it.
pub trait Submission: DeserializeOwned + Validate<Context = ()> {
    fn form() -> &'static Form;
}

// Routes a garde rule through the form definition so both paths agree
fn check_field(form: &Form, name: &str, value: &str) -> garde::Result {
    match form.validate_field(name, Some(value)) {
        Ok(result) if result.ok => Ok(()),
        Ok(result) => Err(garde::Error::new(result.message.unwrap_or_default())),
        Err(err) => Err(garde::Error::new(err.to_string())),
    }
}

// Missing keys deserialize to empty strings, so they fail as MissingValue
// instead of failing deserialization
#[derive(Deserialize, Serialize, Debug, Clone, Default, Validate)]
pub struct CreatePostPayload {
    #[serde(default)]
    #[garde(custom(create_post_title))]
    pub title: String,
    #[serde(default)]
    #[garde(custom(create_post_subtitle))]
    pub subtitle: String,
    #[serde(default)]
    #[garde(custom(create_post_img_url))]
    pub img_url: String,
    #[serde(default)]
    #[garde(custom(create_post_body))]
    pub body: String,
}

fn create_post_title(value: &String, _: &()) -> garde::Result {
    check_field(Forms::create_post(), "title", value)
}

fn create_post_subtitle(value: &String, _: &()) -> garde::Result {
    check_field(Forms::create_post(), "subtitle", value)
}

fn create_post_img_url(value: &String, _: &()) -> garde::Result {
    check_field(Forms::create_post(), "img_url", value)
}

fn create_post_body(value: &String, _: &()) -> garde::Result {
    check_field(Forms::create_post(), "body", value)
}

impl Submission for CreatePostPayload {
    fn form() -> &'static Form {
        Forms::create_post()
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, Default, Validate)]
pub struct RegisterPayload {
    #[serde(default)]
    #[garde(custom(register_email))]
    pub email: String,
    #[serde(default)]
    #[garde(custom(register_password))]
    pub password: String,
    #[serde(default)]
    #[garde(custom(register_name))]
    pub name: String,
}

fn register_email(value: &String, _: &()) -> garde::Result {
    check_field(Forms::register(), "email", value)
}

fn register_password(value: &String, _: &()) -> garde::Result {
    check_field(Forms::register(), "password", value)
}

fn register_name(value: &String, _: &()) -> garde::Result {
    check_field(Forms::register(), "name", value)
}

impl Submission for RegisterPayload {
    fn form() -> &'static Form {
        Forms::register()
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, Default, Validate)]
pub struct LoginPayload {
    #[serde(default)]
    #[garde(custom(login_email))]
    pub email: String,
    #[serde(default)]
    #[garde(custom(login_password))]
    pub password: String,
}

fn login_email(value: &String, _: &()) -> garde::Result {
    check_field(Forms::login(), "email", value)
}

fn login_password(value: &String, _: &()) -> garde::Result {
    check_field(Forms::login(), "password", value)
}

impl Submission for LoginPayload {
    fn form() -> &'static Form {
        Forms::login()
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, Default, Validate)]
pub struct CommentPayload {
    #[serde(default)]
    #[garde(custom(self::comment_text))]
    pub comment_text: String,
}

fn comment_text(value: &String, _: &()) -> garde::Result {
    check_field(Forms::comment(), "comment_text", value)
}

impl Submission for CommentPayload {
    fn form() -> &'static Form {
        Forms::comment()
    }
}
