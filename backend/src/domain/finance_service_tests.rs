//! Tests for the finance service.

use chrono::{DateTime, Local, TimeZone, Utc};
use rstest::{fixture, rstest};

use super::*;
use crate::domain::ErrorCode;
use crate::domain::finance::{FinanceSeed, MortgageSeed};
use crate::domain::ports::{
    FixtureBonusPaymentRepository, FixtureMortgageRepository, FixtureSavingsRepository,
    MockBonusPaymentRepository, MockFinanceSeedSource, MockMortgageRepository,
    MockSavingsRepository,
};

struct FixtureClock {
    utc_now: DateTime<Utc>,
}

impl Clock for FixtureClock {
    fn local(&self) -> DateTime<Local> {
        self.utc_now.with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        self.utc_now
    }
}

#[fixture]
fn clock() -> Arc<dyn Clock> {
    let utc_now = Utc
        .with_ymd_and_hms(2024, 7, 15, 12, 0, 0)
        .single()
        .expect("valid fixture timestamp");
    Arc::new(FixtureClock { utc_now })
}

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid date")
}

fn service<M, B, S>(
    mortgages: M,
    bonuses: B,
    savings: S,
    seed: MockFinanceSeedSource,
    clock: Arc<dyn Clock>,
) -> FinanceService<M, B, S> {
    FinanceService::new(
        FinanceRepositories {
            mortgages: Arc::new(mortgages),
            bonuses: Arc::new(bonuses),
            savings: Arc::new(savings),
        },
        Arc::new(seed),
        clock,
    )
}

fn mortgage(id: i32) -> Mortgage {
    MortgageDraft::try_new(300_000.0, 0.06, date(2021, 8, 1), 360, 400.0)
        .expect("valid draft")
        .into_mortgage(id)
}

#[rstest]
#[tokio::test]
async fn mortgage_summary_includes_payment_and_escrow(clock: Arc<dyn Clock>) {
    let mut repo = MockMortgageRepository::new();
    repo.expect_find().return_once(|id| Ok(Some(mortgage(id))));

    let summary = service(
        repo,
        FixtureBonusPaymentRepository,
        FixtureSavingsRepository,
        MockFinanceSeedSource::new(),
        clock,
    )
    .get_mortgage(4)
    .await
    .expect("summary");

    assert_eq!(summary.mortgage.id, 4);
    assert!((summary.monthly_payment - 1798.65).abs() < 0.01);
    assert!((summary.monthly_total - summary.monthly_payment - 400.0).abs() < 1e-9);
}

#[rstest]
#[tokio::test]
async fn missing_mortgage_uses_legacy_message(clock: Arc<dyn Clock>) {
    let mut repo = MockMortgageRepository::new();
    repo.expect_delete().return_once(|_| Ok(false));

    let error = service(
        repo,
        FixtureBonusPaymentRepository,
        FixtureSavingsRepository,
        MockFinanceSeedSource::new(),
        clock,
    )
    .delete_mortgage(99)
    .await
    .expect_err("not found");

    assert_eq!(error.code(), ErrorCode::NotFound);
    assert_eq!(error.message(), "Mortgage details not found.");
}

#[rstest]
#[tokio::test]
async fn reload_replaces_mortgages_with_seed(clock: Arc<dyn Clock>) {
    let mut seed = MockFinanceSeedSource::new();
    seed.expect_load().times(1).return_once(|| {
        Ok(FinanceSeed {
            mortgage: MortgageSeed {
                principal: 250_000.0,
                interest_rate: 0.0,
                start_date: date(2020, 1, 1),
                loan_term: 250,
                monthly_escrow: 0.0,
            },
        })
    });
    let mut repo = MockMortgageRepository::new();
    repo.expect_replace_all()
        .withf(|draft: &MortgageDraft| draft.principal() == 250_000.0)
        .times(1)
        .return_once(|draft| Ok(draft.into_mortgage(1)));

    let summary = service(
        repo,
        FixtureBonusPaymentRepository,
        FixtureSavingsRepository,
        seed,
        clock,
    )
    .reload_mortgages()
    .await
    .expect("reloaded");

    assert_eq!(summary.monthly_payment, 1000.0);
}

#[rstest]
#[tokio::test]
async fn invalid_seed_does_not_touch_storage(clock: Arc<dyn Clock>) {
    let mut seed = MockFinanceSeedSource::new();
    seed.expect_load()
        .return_once(|| Err(FinanceSeedSourceError::malformed("missing field `mortgage`")));
    let mut repo = MockMortgageRepository::new();
    repo.expect_replace_all().times(0);

    let error = service(
        repo,
        FixtureBonusPaymentRepository,
        FixtureSavingsRepository,
        seed,
        clock,
    )
    .reload_mortgages()
    .await
    .expect_err("malformed seed");
    assert_eq!(error.code(), ErrorCode::InternalError);
}

#[rstest]
#[tokio::test]
async fn aggregates_upcoming_rsu_payouts_from_current_month(clock: Arc<dyn Clock>) {
    let mut bonuses = MockBonusPaymentRepository::new();
    bonuses
        .expect_list_by_type()
        .withf(|kind: &BonusType| *kind == BonusType::Rsu)
        .return_once(|_| {
            Ok(vec![
                BonusPaymentDraft::try_new(BonusType::Rsu, 6000.0, date(2023, 3, 1), 2023)
                    .expect("valid")
                    .into_payment(1),
                BonusPaymentDraft::try_new(BonusType::Rsu, 1200.0, date(2024, 3, 1), 2024)
                    .expect("valid")
                    .into_payment(2),
            ])
        });

    let payouts = service(
        FixtureMortgageRepository,
        bonuses,
        FixtureSavingsRepository,
        MockFinanceSeedSource::new(),
        clock,
    )
    .aggregated_rsu_payouts()
    .await
    .expect("payouts");

    let first = payouts.first().expect("at least one payout");
    assert_eq!((first.year, first.month), (2024, 12));
    assert_eq!(first.amount, 1000.0);
    let june_2025 = payouts
        .iter()
        .find(|p| (p.year, p.month) == (2025, 6))
        .expect("overlapping month");
    assert_eq!(june_2025.amount, 1200.0);
}

#[rstest]
#[tokio::test]
async fn finance_without_database_is_unavailable(clock: Arc<dyn Clock>) {
    let error = service(
        FixtureMortgageRepository,
        FixtureBonusPaymentRepository,
        FixtureSavingsRepository,
        MockFinanceSeedSource::new(),
        clock,
    )
    .list_savings()
    .await
    .expect_err("no database");
    assert_eq!(error.code(), ErrorCode::ServiceUnavailable);
}

#[rstest]
#[tokio::test]
async fn latest_savings_without_rows_is_not_found(clock: Arc<dyn Clock>) {
    let mut savings = MockSavingsRepository::new();
    savings.expect_latest().return_once(|| Ok(None));

    let error = service(
        FixtureMortgageRepository,
        FixtureBonusPaymentRepository,
        savings,
        MockFinanceSeedSource::new(),
        clock,
    )
    .latest_savings()
    .await
    .expect_err("nothing recorded");
    assert_eq!(error.code(), ErrorCode::NotFound);
}

#[rstest]
fn countdown_starts_from_clock_date(clock: Arc<dyn Clock>) {
    let summary = service(
        FixtureMortgageRepository,
        FixtureBonusPaymentRepository,
        FixtureSavingsRepository,
        MockFinanceSeedSource::new(),
        clock,
    )
    .days_left(date(2024, 7, 22), &[]);
    assert_eq!(summary.total_days, 7);
    assert_eq!(summary.weekdays, 5);
}
