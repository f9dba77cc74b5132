use std::sync::Arc;

use log::info;
use rollcall_domain::freeze::{FreezeToken, StreakFreezeRepository};
use rollcall_domain::shared::{Clock, DomainError, EventId, UserId};

use crate::application::dtos::FreezeDto;

/// Freeze bookkeeping outside of a check-in.
///
/// The check-in itself claims freezes inside its own transaction; this
/// service is for listing tokens and for claiming one on its own.
pub struct FreezeService {
    freeze_repo: Arc<dyn StreakFreezeRepository>,
    clock: Arc<dyn Clock>,
}

impl FreezeService {
    pub fn new(freeze_repo: Arc<dyn StreakFreezeRepository>, clock: Arc<dyn Clock>) -> Self {
        Self { freeze_repo, clock }
    }

    /// Unused, unexpired tokens for the pair, oldest first.
    pub async fn available_freezes(
        &self,
        user_id: &str,
        event_id: &str,
    ) -> Result<Vec<FreezeDto>, DomainError> {
        let (user_id, event_id) = parse_pair(user_id, event_id)?;
        let today = self.clock.today();

        let tokens = self
            .freeze_repo
            .list_available(&user_id, &event_id, today)
            .await?;

        Ok(tokens
            .iter()
            .map(|token| FreezeDto::from_token(token, today))
            .collect())
    }

    /// Mark the oldest available token as used today.
    ///
    /// Returns `false` without touching anything when there is none.
    pub async fn use_oldest_available(
        &self,
        user_id: &str,
        event_id: &str,
    ) -> Result<bool, DomainError> {
        let (user_id, event_id) = parse_pair(user_id, event_id)?;
        let today = self.clock.today();

        match self
            .freeze_repo
            .claim_oldest_available(&user_id, &event_id, today)
            .await?
        {
            Some(freeze_id) => {
                info!(
                    "[freeze] Used freeze {} for user {} in event {} on {}",
                    freeze_id, user_id, event_id, today
                );
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Every token of the pair, consumed and expired ones included.
    pub async fn list_freezes(
        &self,
        user_id: &str,
        event_id: &str,
    ) -> Result<Vec<FreezeDto>, DomainError> {
        let (user_id, event_id) = parse_pair(user_id, event_id)?;
        let today = self.clock.today();

        let tokens: Vec<FreezeToken> = self.freeze_repo.list_all(&user_id, &event_id).await?;
        Ok(tokens
            .iter()
            .map(|token| FreezeDto::from_token(token, today))
            .collect())
    }
}

pub(crate) fn parse_pair(user_id: &str, event_id: &str) -> Result<(UserId, EventId), DomainError> {
    Ok((UserId::parse(user_id)?, EventId::parse(event_id)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::NaiveDate;
    use mockall::mock;
    use mockall::predicate::*;
    use rollcall_domain::freeze::FreezeStatus;
    use rollcall_domain::shared::{FixedClock, FreezeId};

    mock! {
        pub FreezeRepo {}

        #[async_trait]
        impl StreakFreezeRepository for FreezeRepo {
            async fn save(&self, token: &FreezeToken) -> Result<(), DomainError>;
            async fn find_by_id(&self, id: &FreezeId) -> Result<Option<FreezeToken>, DomainError>;
            async fn list_available(
                &self,
                user_id: &UserId,
                event_id: &EventId,
                today: NaiveDate,
            ) -> Result<Vec<FreezeToken>, DomainError>;
            async fn list_all(
                &self,
                user_id: &UserId,
                event_id: &EventId,
            ) -> Result<Vec<FreezeToken>, DomainError>;
            async fn claim_oldest_available(
                &self,
                user_id: &UserId,
                event_id: &EventId,
                today: NaiveDate,
            ) -> Result<Option<FreezeId>, DomainError>;
        }
    }

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn service(repo: MockFreezeRepo, today: NaiveDate) -> FreezeService {
        FreezeService::new(Arc::new(repo), Arc::new(FixedClock::on_day(today)))
    }

    #[tokio::test]
    async fn test_use_oldest_available_without_tokens_returns_false() {
        let today = day(2024, 5, 3);
        let mut repo = MockFreezeRepo::new();
        repo.expect_claim_oldest_available()
            .with(always(), always(), eq(today))
            .times(1)
            .returning(|_, _, _| Ok(None));

        let used = service(repo, today)
            .use_oldest_available(&UserId::new().to_string(), &EventId::new().to_string())
            .await
            .unwrap();
        assert!(!used);
    }

    #[tokio::test]
    async fn test_use_oldest_available_reports_claim() {
        let today = day(2024, 5, 3);
        let mut repo = MockFreezeRepo::new();
        repo.expect_claim_oldest_available()
            .times(1)
            .returning(|_, _, _| Ok(Some(FreezeId::new())));

        let used = service(repo, today)
            .use_oldest_available(&UserId::new().to_string(), &EventId::new().to_string())
            .await
            .unwrap();
        assert!(used);
    }

    #[tokio::test]
    async fn test_malformed_id_rejected_before_repository() {
        let mut repo = MockFreezeRepo::new();
        repo.expect_claim_oldest_available().never();
        repo.expect_list_all().never();

        let svc = service(repo, day(2024, 5, 3));
        let err = svc
            .use_oldest_available("not-a-uuid", &EventId::new().to_string())
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::InvalidIdentifier(_)));

        let err = svc
            .list_freezes(&UserId::new().to_string(), "")
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::InvalidIdentifier(_)));
    }

    #[tokio::test]
    async fn test_list_freezes_reports_status_for_today() {
        let today = day(2024, 5, 10);
        let user = UserId::new();
        let event = EventId::new();
        let created = day(2024, 5, 1).and_hms_opt(9, 0, 0).unwrap().and_utc();

        let tokens = vec![
            FreezeToken::restore(FreezeId::new(), user.clone(), event.clone(), false, None, None, created),
            FreezeToken::restore(
                FreezeId::new(),
                user.clone(),
                event.clone(),
                true,
                Some(day(2024, 5, 4)),
                None,
                created,
            ),
            FreezeToken::restore(
                FreezeId::new(),
                user.clone(),
                event.clone(),
                false,
                None,
                Some(today),
                created,
            ),
        ];

        let mut repo = MockFreezeRepo::new();
        repo.expect_list_all()
            .times(1)
            .returning(move |_, _| Ok(tokens.clone()));

        let listed = service(repo, today)
            .list_freezes(user.as_str(), event.as_str())
            .await
            .unwrap();

        let statuses: Vec<FreezeStatus> = listed.iter().map(|dto| dto.status).collect();
        assert_eq!(
            statuses,
            vec![FreezeStatus::Available, FreezeStatus::Consumed, FreezeStatus::Expired]
        );
        assert_eq!(listed[1].used_on_day.as_deref(), Some("2024-05-04"));
    }
}
