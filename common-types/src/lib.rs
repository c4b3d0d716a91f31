mod validators;
mod forms;
mod payloads;

#[allow(non_snake_case)]
pub mod Validators {
    pub use crate::validators::*;
}

#[allow(non_snake_case)]
pub mod Forms {
    pub use crate::forms::*;
}

#[allow(non_snake_case)]
pub mod Payloads {
    pub use crate::payloads::*;
}

#[allow(non_snake_case)]
pub mod Constants {
    use lazy_static::lazy_static;

    fn flag_or_default(key: &str, default: bool) -> bool {
        let maybe = dotenvy::var(key);
        let mut flag = default;
        match maybe {
            Ok(raw) => {
                if let Ok(parsed) = raw.parse() {
                    flag = parsed;
                    tracing::info!("Using custom {key}: {flag}");
                } else {
                    tracing::info!("Failed to parse {key}, using default, {flag}");
                }
            }
            _ => ()
        }
        flag
    }

    // WARNING: These are read once, the first time a form
    // definition is touched, and are fixed for the process after
    lazy_static!{
        pub static ref URL_REQUIRE_TLD: bool = flag_or_default("URL_REQUIRE_TLD", true);
        pub static ref URL_ALLOW_IP: bool = flag_or_default("URL_ALLOW_IP", true);
        pub static ref EMAIL_REQUIRE_TLD: bool = flag_or_default("EMAIL_REQUIRE_TLD", true);
    }
}
