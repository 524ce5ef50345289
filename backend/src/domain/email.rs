//! Email canonicalisation used for validation and as the uniqueness key.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Longest accepted address in bytes.
pub const MAX_EMAIL_LEN: usize = 254;
/// Longest accepted local part in bytes.
pub const MAX_LOCAL_LEN: usize = 64;

/// Reasons an address cannot be normalised.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum EmailError {
    /// Empty, missing `@`, whitespace or an unmappable domain.
    #[error("invalid email")]
    Invalid,
    /// Local part or full address exceeds the length limits.
    #[error("email too long")]
    TooLong,
}

/// Canonical email: lowercase local part, `@`, lowercase ASCII domain.
///
/// ## Invariants
/// - Normalising the inner value again yields the same value.
///
/// # Examples
/// ```
/// use appliedto::domain::NormalizedEmail;
///
/// let email = NormalizedEmail::parse(" Ann <Ann@EXAMPLE.com> ").unwrap();
/// assert_eq!(email.as_ref(), "ann@example.com");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct NormalizedEmail(String);

impl NormalizedEmail {
    /// Normalise and validate raw user input.
    pub fn parse(raw: &str) -> Result<Self, EmailError> {
        normalize(raw).map(Self)
    }
}

impl AsRef<str> for NormalizedEmail {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for NormalizedEmail {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<NormalizedEmail> for String {
    fn from(value: NormalizedEmail) -> Self {
        value.0
    }
}

impl TryFrom<String> for NormalizedEmail {
    type Error = EmailError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

/// Canonicalise `raw` into its normalised string form.
///
/// A display-name wrapper such as `Ann <ann@example.com>` is stripped when the
/// input parses as a single mailbox; otherwise the trimmed input is used
/// verbatim.
pub fn normalize(raw: &str) -> Result<String, EmailError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(EmailError::Invalid);
    }

    let address = mailbox_address(trimmed).unwrap_or_else(|| trimmed.to_owned());

    let Some((local, domain)) = address.rsplit_once('@') else {
        return Err(EmailError::Invalid);
    };
    if local.is_empty() || domain.is_empty() {
        return Err(EmailError::Invalid);
    }
    if local.len() > MAX_LOCAL_LEN || address.len() > MAX_EMAIL_LEN {
        return Err(EmailError::TooLong);
    }
    if has_forbidden_chars(local) || has_forbidden_chars(domain) {
        return Err(EmailError::Invalid);
    }

    let ascii_domain = idna::domain_to_ascii_strict(domain).map_err(|_| EmailError::Invalid)?;
    if ascii_domain.is_empty() {
        return Err(EmailError::Invalid);
    }

    Ok(format!(
        "{}@{}",
        local.to_lowercase(),
        ascii_domain.to_lowercase()
    ))
}

fn mailbox_address(input: &str) -> Option<String> {
    let parsed = mailparse::addrparse(input).ok()?;
    let info = parsed.extract_single_info()?;
    (!info.addr.is_empty()).then_some(info.addr)
}

fn has_forbidden_chars(part: &str) -> bool {
    part.chars().any(|c| c.is_whitespace() || c.is_control())
}
