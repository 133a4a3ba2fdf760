//! Synthetic record generation for `GET /search/putsample`.

use chrono::{DateTime, Duration, TimeZone, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use usersearch_core::model::UserRecord;

/// Address pairs assigned to sample records in rotation.
const SAMPLE_MAILS: [[&str; 2]; 3] = [
    ["mail1@sample.com", "mail2@sample.com"],
    ["mail2@sample.com", "mail3@sample.com"],
    ["mail4@sample.com", "mail5@sample.com"],
];

/// ## Summary
/// Produces sample user records.
///
/// Record `i` (zero based) is named `Sample User{i+1}`, gets the mail pair
/// `i mod 3`, user id `i+1` and facet values `HOGE{i+1}`/`FUGA{i+1}`. Visits
/// are a whole number in `[0, 100)` and the birthday falls between
/// 1989-12-31 and 1990-01-28.
#[derive(Debug)]
pub struct SampleGenerator<R> {
    rng: R,
    now: DateTime<Utc>,
}

impl SampleGenerator<StdRng> {
    #[must_use]
    pub fn from_entropy(now: DateTime<Utc>) -> Self {
        Self::with_rng(StdRng::from_entropy(), now)
    }

    /// Deterministic generator, for tests and reproducible demos.
    #[must_use]
    pub fn seeded(seed: u64, now: DateTime<Utc>) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed), now)
    }
}

impl<R: Rng> SampleGenerator<R> {
    #[must_use]
    pub fn with_rng(rng: R, now: DateTime<Utc>) -> Self {
        Self { rng, now }
    }

    pub fn record(&mut self, i: usize) -> UserRecord {
        let n = i + 1;
        let epoch = Utc
            .with_ymd_and_hms(1990, 1, 1, 0, 0, 0)
            .single()
            .unwrap_or(DateTime::UNIX_EPOCH);
        let day_offset: i64 = self.rng.gen_range(-1..28);

        UserRecord {
            id: None,
            name: format!("Sample User{n}"),
            comment: format!("<p>Sample Comment{n}</p>"),
            visits: f64::from(self.rng.gen_range(0u8..100)),
            last_visit: self.now,
            birthday: epoch + Duration::days(day_offset),
            mail: SAMPLE_MAILS[i % SAMPLE_MAILS.len()]
                .iter()
                .map(ToString::to_string)
                .collect(),
            user_id: i64::try_from(n).unwrap_or(i64::MAX),
            field1: format!("HOGE{n}"),
            field2: format!("FUGA{n}"),
        }
    }

    pub fn generate(&mut self, count: usize) -> Vec<UserRecord> {
        (0..count).map(|i| self.record(i)).collect()
    }
}
