//! Exam booking API client

use async_trait::async_trait;

use crate::error::Result;
use crate::slots::SlotRecord;

pub mod sbat;

pub use sbat::SbatClient;

/// Operations against the exam booking API.
///
/// The concrete client takes its endpoints from the config, so tests point
/// implementations at local mock servers instead of production.
#[async_trait]
pub trait ExamApi: Send + Sync {
    /// Exchange the configured account credentials for a fresh bearer token.
    ///
    /// This is the one fatal call of a polling run: without a token no
    /// center can be queried, so failure here aborts the pass.
    async fn authenticate(&self) -> Result<String>;

    /// Fetch the open slots for one exam center.
    ///
    /// `start_date` is the shared "search from" timestamp computed once per
    /// run. A failed or undecodable response yields an empty list; the run
    /// carries on with the remaining centers.
    async fn available_slots(
        &self,
        token: &str,
        center_id: u32,
        start_date: &str,
    ) -> Vec<SlotRecord>;
}
