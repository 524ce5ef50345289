//! Shared helpers for unit tests in `src/` and integration tests in `tests/`.
//!
//! Compiled for `cfg(test)` and behind the `test-support` feature.

use std::sync::Arc;

use chrono::{DateTime, Local, TimeZone, Utc};
use mockable::Clock;

use crate::domain::{PasswordHasher, MIN_COST, TokenIssuer, TokenSettings};

/// Clock frozen at a fixed instant.
#[derive(Debug, Clone, Copy)]
pub struct FixtureClock {
    utc_now: DateTime<Utc>,
}

impl FixtureClock {
    /// Freeze the clock at `utc_now`.
    pub fn at(utc_now: DateTime<Utc>) -> Self {
        Self { utc_now }
    }
}

impl Clock for FixtureClock {
    fn local(&self) -> DateTime<Local> {
        self.utc_now.with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        self.utc_now
    }
}

/// Instant used by fixtures that need a stable `createdAt`.
pub fn fixture_instant() -> DateTime<Utc> {
    Utc.timestamp_opt(1_735_689_600, 0)
        .single()
        .unwrap_or_default()
}

/// Cheapest valid bcrypt cost keeps hashing tests fast.
pub fn fast_hasher() -> PasswordHasher {
    PasswordHasher::new(MIN_COST)
}

/// Token issuer using the real clock so expiry checks line up with wall time.
pub fn token_issuer(issuer: Option<&str>) -> TokenIssuer {
    TokenIssuer::new(
        TokenSettings::new(
            b"integration-secret".to_vec(),
            issuer.map(str::to_owned),
            chrono::Duration::hours(1),
        ),
        Arc::new(mockable::DefaultClock),
    )
}
