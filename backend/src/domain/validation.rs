//! Required-field checks shared by the record services.

use serde_json::json;

use super::Error;

/// Input that fails basic shape checks.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// A required field was blank or missing.
    #[error("a {field} is required")]
    MissingField { field: &'static str },
    /// A field carried a value outside its accepted set.
    #[error("invalid {field}: {message}")]
    InvalidValue {
        field: &'static str,
        message: String,
    },
}

impl ValidationError {
    /// Name of the offending field.
    pub fn field(&self) -> &'static str {
        match self {
            Self::MissingField { field } | Self::InvalidValue { field, .. } => field,
        }
    }
}

impl From<ValidationError> for Error {
    fn from(value: ValidationError) -> Self {
        Error::invalid_request(value.to_string()).with_details(json!({ "field": value.field() }))
    }
}

/// Whether a value counts as "not supplied" for required-field checks.
///
/// Strings are blank when empty after trimming and options when `None`.
/// Every other kind is present regardless of its value, so `0` and `false`
/// satisfy a requirement.
pub trait Presence {
    /// `true` when the value should be treated as missing.
    fn is_blank(&self) -> bool;
}

impl Presence for str {
    fn is_blank(&self) -> bool {
        self.trim().is_empty()
    }
}

impl Presence for String {
    fn is_blank(&self) -> bool {
        self.as_str().is_blank()
    }
}

impl<T: Presence + ?Sized> Presence for &T {
    fn is_blank(&self) -> bool {
        (**self).is_blank()
    }
}

impl<T: Presence> Presence for Option<T> {
    fn is_blank(&self) -> bool {
        self.as_ref().is_none_or(Presence::is_blank)
    }
}

macro_rules! always_present {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Presence for $ty {
                fn is_blank(&self) -> bool {
                    false
                }
            }
        )*
    };
}

always_present!(bool, i32, i64, u32, u64, f64);

/// Fail with the first blank field, in argument order.
///
/// # Examples
/// ```
/// use appliedto::domain::{require, ValidationError};
///
/// let err = require(&[("title", &"Engineer"), ("company", &"  ")]).unwrap_err();
/// assert_eq!(err, ValidationError::MissingField { field: "company" });
/// assert_eq!(err.to_string(), "a company is required");
/// ```
pub fn require(fields: &[(&'static str, &dyn Presence)]) -> Result<(), ValidationError> {
    match fields.iter().find(|(_, value)| value.is_blank()) {
        Some((field, _)) => Err(ValidationError::MissingField { field: *field }),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("", true)]
    #[case("  \t", true)]
    #[case("x", false)]
    fn strings_are_blank_when_whitespace_only(#[case] value: &str, #[case] blank: bool) {
        assert_eq!(value.is_blank(), blank);
    }

    #[rstest]
    fn options_are_blank_when_none_or_inner_blank() {
        assert!(None::<String>.is_blank());
        assert!(Some(" ".to_owned()).is_blank());
        assert!(!Some("x".to_owned()).is_blank());
    }

    #[rstest]
    fn zero_values_count_as_present() {
        assert!(!0_i64.is_blank());
        assert!(!false.is_blank());
        assert!(!Some(0_u32).is_blank());
    }

    #[rstest]
    fn reports_first_missing_field() {
        let first = String::new();
        let result = require(&[("firstname", &first), ("lastname", &""), ("email", &"a@b.c")]);
        assert_eq!(
            result,
            Err(ValidationError::MissingField { field: "firstname" })
        );
    }

    #[rstest]
    fn passes_when_all_present() {
        assert!(require(&[("title", &"Engineer"), ("hours", &0_u32)]).is_ok());
    }

    #[rstest]
    fn converts_to_invalid_request_naming_the_field() {
        let err = Error::from(ValidationError::MissingField { field: "email" });
        assert_eq!(err.code(), crate::domain::ErrorCode::InvalidRequest);
        assert_eq!(err.message(), "a email is required");
        assert_eq!(err.details(), Some(&json!({ "field": "email" })));
    }
}
