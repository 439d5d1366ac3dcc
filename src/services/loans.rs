//! Loan renewal workflow and borrowed-copy queries

use chrono::{Duration, NaiveDate};
use uuid::Uuid;

use crate::{
    error::AppResult,
    models::instance::{BorrowedCopy, InstanceDetails},
    repository::Repository,
};

/// Renewal period proposed to librarians by default.
pub const DEFAULT_RENEWAL_WEEKS: i64 = 3;
/// Furthest ahead a renewal may be booked. The boundary itself is valid.
pub const MAX_RENEWAL_WEEKS: i64 = 4;

/// Proposed renewal date rejected by the date rules
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenewalDateError {
    InPast,
    TooFarAhead,
}

impl RenewalDateError {
    pub fn message(&self) -> &'static str {
        match self {
            RenewalDateError::InPast => "Invalid date - renewal in past",
            RenewalDateError::TooFarAhead => "Invalid date - renewal more than 4 weeks ahead",
        }
    }
}

impl std::fmt::Display for RenewalDateError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

/// Due-back date proposed when the renewal form is first presented,
/// computed from the current date rather than from the copy's state.
pub fn default_renewal_date(today: NaiveDate) -> NaiveDate {
    today + Duration::weeks(DEFAULT_RENEWAL_WEEKS)
}

/// Validate a proposed due-back date against today.
///
/// Checked in order: dates before today are rejected first, then dates more
/// than four weeks out. Today and today + 4 weeks are both acceptable.
pub fn validate_renewal_date(
    today: NaiveDate,
    proposed: NaiveDate,
) -> Result<(), RenewalDateError> {
    if proposed < today {
        return Err(RenewalDateError::InPast);
    }
    if proposed > today + Duration::weeks(MAX_RENEWAL_WEEKS) {
        return Err(RenewalDateError::TooFarAhead);
    }
    Ok(())
}

#[derive(Clone)]
pub struct LoansService {
    repository: Repository,
}

impl LoansService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Look up a copy for the renewal form
    pub async fn get_instance(&self, id: Uuid) -> AppResult<InstanceDetails> {
        self.repository.instances.get_details(id).await
    }

    /// Commit a validated renewal: set the copy's due-back date.
    /// Borrower and status are left unchanged.
    pub async fn renew(&self, id: Uuid, due_back: NaiveDate) -> AppResult<()> {
        self.repository.instances.set_due_back(id, due_back).await?;
        tracing::info!(copy = %id, due_back = %due_back, "loan renewed");
        Ok(())
    }

    /// Copies on loan to the given borrower, ascending by due-back date
    pub async fn borrowed_by_user(
        &self,
        borrower_id: i32,
        limit: i64,
        offset: i64,
    ) -> AppResult<(Vec<BorrowedCopy>, i64)> {
        self.repository
            .instances
            .borrowed_by_user(borrower_id, limit, offset)
            .await
    }

    /// All copies on loan, ascending by due-back date
    pub async fn borrowed_all(
        &self,
        limit: i64,
        offset: i64,
    ) -> AppResult<(Vec<BorrowedCopy>, i64)> {
        self.repository.instances.borrowed_all(limit, offset).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 15).unwrap()
    }

    #[test]
    fn default_proposal_is_three_weeks_out() {
        assert_eq!(
            default_renewal_date(today()),
            today() + Duration::weeks(3)
        );
    }

    #[test]
    fn today_is_a_valid_renewal_date() {
        assert_eq!(validate_renewal_date(today(), today()), Ok(()));
    }

    #[test]
    fn four_weeks_ahead_exactly_is_valid() {
        let proposed = today() + Duration::weeks(4);
        assert_eq!(validate_renewal_date(today(), proposed), Ok(()));
    }

    #[test]
    fn one_day_past_four_weeks_is_too_far() {
        let proposed = today() + Duration::weeks(4) + Duration::days(1);
        assert_eq!(
            validate_renewal_date(today(), proposed),
            Err(RenewalDateError::TooFarAhead)
        );
    }

    #[test]
    fn yesterday_is_in_the_past() {
        let proposed = today() - Duration::days(1);
        assert_eq!(
            validate_renewal_date(today(), proposed),
            Err(RenewalDateError::InPast)
        );
    }

    #[test]
    fn a_week_ago_is_rejected_with_the_past_message() {
        let proposed = today() - Duration::weeks(1);
        let err = validate_renewal_date(today(), proposed).unwrap_err();
        assert_eq!(err.message(), "Invalid date - renewal in past");
    }

    #[test]
    fn five_weeks_out_is_rejected_with_the_ahead_message() {
        let proposed = today() + Duration::weeks(5);
        let err = validate_renewal_date(today(), proposed).unwrap_err();
        assert_eq!(err.message(), "Invalid date - renewal more than 4 weeks ahead");
    }

    #[test]
    fn two_weeks_out_is_accepted() {
        let proposed = today() + Duration::weeks(2);
        assert_eq!(validate_renewal_date(today(), proposed), Ok(()));
    }

    #[test]
    fn past_takes_precedence_over_range_for_ancient_dates() {
        // A date far in the past is reported as "in past", never "too far".
        let proposed = NaiveDate::from_ymd_opt(1970, 1, 1).unwrap();
        assert_eq!(
            validate_renewal_date(today(), proposed),
            Err(RenewalDateError::InPast)
        );
    }

    #[test]
    fn whole_valid_window_is_accepted() {
        for days in 0..=28 {
            let proposed = today() + Duration::days(days);
            assert_eq!(
                validate_renewal_date(today(), proposed),
                Ok(()),
                "day offset {} should be valid",
                days
            );
        }
        assert!(validate_renewal_date(today(), today() + Duration::days(29)).is_err());
    }
}
