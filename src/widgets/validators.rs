use regex::Regex;

pub const DEFAULT_VALIDATION_MESSAGE: &str = "Invalid Value.";

pub type Validator = Box<dyn Fn(&str) -> bool + Send + Sync>;

/// A missing validator accepts everything.
pub fn is_valid(validator: Option<&Validator>, value: &str) -> bool {
    validator.is_none_or(|validate| validate(value))
}

pub fn non_empty() -> Validator {
    Box::new(|value: &str| !value.is_empty())
}

pub fn required() -> Validator {
    Box::new(|value: &str| !value.trim().is_empty())
}

pub fn min_length(min: usize) -> Validator {
    Box::new(move |value: &str| value.chars().count() >= min)
}

pub fn max_length(max: usize) -> Validator {
    Box::new(move |value: &str| value.chars().count() <= max)
}

pub fn pattern(pattern: &str) -> Result<Validator, regex::Error> {
    let re = Regex::new(pattern)?;
    Ok(Box::new(move |value: &str| re.is_match(value)))
}

pub fn email() -> Validator {
    let re = Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$")
        .expect("email pattern is a valid regex");
    Box::new(move |value: &str| re.is_match(value))
}

pub fn custom<F>(f: F) -> Validator
where
    F: Fn(&str) -> bool + Send + Sync + 'static,
{
    Box::new(f)
}

/// Passes only when every validator passes.
pub fn all(validators: Vec<Validator>) -> Validator {
    Box::new(move |value: &str| validators.iter().all(|validate| validate(value)))
}
