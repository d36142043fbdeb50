//! Registration admission service

use std::sync::Arc;

use tracing::{debug, error, info};

use crate::domain::{
    normalize_email, validate_submission, CapacityPolicy, DomainError, DomainResult,
    NewRegistration, Registration, RegistrationSubmission, RepositoryProvider,
};

/// Admits participants to events, enforcing uniqueness and capacity.
pub struct RegistrationService {
    repos: Arc<dyn RepositoryProvider>,
    policy: CapacityPolicy,
}

impl RegistrationService {
    pub fn new(repos: Arc<dyn RepositoryProvider>, policy: CapacityPolicy) -> Self {
        Self { repos, policy }
    }

    pub fn policy(&self) -> &CapacityPolicy {
        &self.policy
    }

    /// Validate a raw form submission, then admit it.
    pub async fn register(&self, submission: &RegistrationSubmission) -> DomainResult<Registration> {
        let valid = match validate_submission(submission) {
            Ok(valid) => valid,
            Err(errors) => {
                let err = DomainError::Validation(errors);
                record_outcome(&Err(err.clone()));
                debug!(%err, "Registration rejected");
                return Err(err);
            }
        };
        self.admit(valid.event_id, &valid.email, &valid.name).await
    }

    /// Admit an already-validated participant to `event_id`.
    ///
    /// Checks run in order: the event exists, the email is not yet
    /// registered for it, and the event still has room. The final write
    /// repeats the last two checks atomically in storage.
    pub async fn admit(&self, event_id: i32, email: &str, name: &str) -> DomainResult<Registration> {
        let result = self.try_admit(event_id, email, name).await;
        record_outcome(&result);

        match &result {
            Ok(registration) => info!(
                event_id,
                registration_id = registration.id,
                "Registration admitted"
            ),
            Err(e) if e.is_rejection() => debug!(event_id, kind = e.kind(), %e, "Registration rejected"),
            Err(e) => error!(event_id, %e, "Registration failed"),
        }
        result
    }

    async fn try_admit(&self, event_id: i32, email: &str, name: &str) -> DomainResult<Registration> {
        if self.repos.events().find_by_id(event_id).await?.is_none() {
            return Err(DomainError::EventNotFound(event_id));
        }

        let email = normalize_email(email);
        let registrations = self.repos.registrations();

        if registrations
            .find_by_event_and_email(event_id, &email)
            .await?
            .is_some()
        {
            return Err(DomainError::DuplicateRegistration { event_id, email });
        }

        let limit = self.policy.limit_for(event_id);
        if let Some(capacity) = limit {
            let count = registrations.count_for_event(event_id).await?;
            if count >= u64::from(capacity) {
                return Err(DomainError::EventFull { event_id, capacity });
            }
        }

        registrations
            .insert(NewRegistration::new(event_id, &email, name), limit)
            .await
    }
}

fn record_outcome(result: &DomainResult<Registration>) {
    match result {
        Ok(_) => metrics::counter!("registrations_admitted_total").increment(1),
        Err(e) => metrics::counter!("registrations_rejected_total", "kind" => e.kind()).increment(1),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::event::sample_event;
    use crate::infrastructure::database::{init_and_migrate, DatabaseConfig};
    use crate::infrastructure::{InMemoryRepositoryProvider, SeaOrmRepositoryProvider};

    async fn memory_service(event_ids: &[i32]) -> RegistrationService {
        let repos = Arc::new(InMemoryRepositoryProvider::new());
        repos
            .events()
            .insert_many(event_ids.iter().map(|id| sample_event(*id)).collect())
            .await
            .unwrap();
        RegistrationService::new(repos, CapacityPolicy::default())
    }

    async fn sqlite_service(event_ids: &[i32]) -> RegistrationService {
        let db = init_and_migrate(&DatabaseConfig::in_memory()).await.unwrap();
        let repos = Arc::new(SeaOrmRepositoryProvider::new(db));
        repos
            .events()
            .insert_many(event_ids.iter().map(|id| sample_event(*id)).collect())
            .await
            .unwrap();
        RegistrationService::new(repos, CapacityPolicy::default())
    }

    fn submission(event_id: i64, name: &str, email: &str) -> RegistrationSubmission {
        RegistrationSubmission {
            event_id: Some(serde_json::json!(event_id)),
            name: name.to_string(),
            email: email.to_string(),
        }
    }

    #[tokio::test]
    async fn register_normalizes_and_admits() {
        let service = memory_service(&[1]).await;
        let reg = service
            .register(&submission(1, "  Ann Lee ", "Ann.Lee@Schools.NYC.gov"))
            .await
            .unwrap();
        assert_eq!(reg.event_id, 1);
        assert_eq!(reg.name, "Ann Lee");
        assert_eq!(reg.email, "ann.lee@schools.nyc.gov");
    }

    #[tokio::test]
    async fn foreign_domain_is_a_validation_error_on_email() {
        let service = memory_service(&[1]).await;
        let err = service
            .register(&submission(1, "Ann Lee", "ann@gmail.com"))
            .await
            .unwrap_err();
        match err {
            DomainError::Validation(fields) => {
                assert!(fields.contains("email"));
                assert!(!fields.contains("name"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn unknown_event_is_not_found() {
        let service = memory_service(&[1]).await;
        let err = service
            .admit(99, "a@schools.nyc.gov", "Ann")
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::EventNotFound(99)));
    }

    #[tokio::test]
    async fn duplicate_pair_is_rejected_in_any_case() {
        for service in [memory_service(&[1]).await, sqlite_service(&[1]).await] {
            service.admit(1, "a@schools.nyc.gov", "Ann").await.unwrap();
            let err = service
                .admit(1, "A@Schools.Nyc.Gov", "Ann")
                .await
                .unwrap_err();
            assert!(matches!(err, DomainError::DuplicateRegistration { event_id: 1, .. }));
        }
    }

    #[tokio::test]
    async fn standard_event_takes_two() {
        for service in [memory_service(&[3]).await, sqlite_service(&[3]).await] {
            service.admit(3, "a@schools.nyc.gov", "Ann").await.unwrap();
            service.admit(3, "b@schools.nyc.gov", "Bob").await.unwrap();
            let err = service
                .admit(3, "c@schools.nyc.gov", "Cy")
                .await
                .unwrap_err();
            assert!(matches!(err, DomainError::EventFull { event_id: 3, capacity: 2 }));
        }
    }

    #[tokio::test]
    async fn duplicate_wins_over_full() {
        let service = memory_service(&[3]).await;
        service.admit(3, "a@schools.nyc.gov", "Ann").await.unwrap();
        service.admit(3, "b@schools.nyc.gov", "Bob").await.unwrap();
        let err = service
            .admit(3, "a@schools.nyc.gov", "Ann")
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::DuplicateRegistration { .. }));
    }

    #[tokio::test]
    async fn unlimited_event_takes_ten() {
        for service in [memory_service(&[14]).await, sqlite_service(&[14]).await] {
            for i in 0..10 {
                service
                    .admit(14, &format!("p{}@schools.nyc.gov", i), "Person")
                    .await
                    .unwrap();
            }
            assert_eq!(
                service.repos.registrations().count_for_event(14).await.unwrap(),
                10
            );
        }
    }

    #[tokio::test]
    async fn concurrent_admissions_respect_capacity() {
        let service = Arc::new(memory_service(&[5]).await);
        let mut handles = Vec::new();
        for i in 0..16 {
            let service = service.clone();
            handles.push(tokio::spawn(async move {
                service
                    .admit(5, &format!("p{}@schools.nyc.gov", i), "Person")
                    .await
            }));
        }

        let mut admitted = 0;
        for handle in handles {
            match handle.await.unwrap() {
                Ok(_) => admitted += 1,
                Err(e) => assert!(matches!(e, DomainError::EventFull { .. })),
            }
        }
        assert_eq!(admitted, 2);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_sqlite_admissions_respect_capacity() {
        let path = std::env::temp_dir().join(format!("grad-{}.db", uuid::Uuid::new_v4()));
        let db = init_and_migrate(&DatabaseConfig::sqlite(&path.display().to_string()))
            .await
            .unwrap();
        let repos = Arc::new(SeaOrmRepositoryProvider::new(db.clone()));
        repos.events().insert_many(vec![sample_event(5)]).await.unwrap();
        let service = Arc::new(RegistrationService::new(repos.clone(), CapacityPolicy::default()));

        let mut handles = Vec::new();
        for i in 0..24 {
            let service = service.clone();
            handles.push(tokio::spawn(async move {
                // six distinct people, each submitting four times
                service
                    .admit(5, &format!("p{}@schools.nyc.gov", i % 6), "Person")
                    .await
            }));
        }

        let mut admitted = 0;
        for handle in handles {
            match handle.await.unwrap() {
                Ok(_) => admitted += 1,
                Err(e) => assert!(
                    matches!(
                        e,
                        DomainError::EventFull { .. } | DomainError::DuplicateRegistration { .. }
                    ),
                    "unexpected error: {e:?}"
                ),
            }
        }
        assert_eq!(admitted, 2);
        assert_eq!(repos.registrations().count_for_event(5).await.unwrap(), 2);

        db.close().await.unwrap();
        let _ = std::fs::remove_file(&path);
    }

    #[tokio::test]
    async fn custom_policy_is_honored() {
        let repos = Arc::new(InMemoryRepositoryProvider::new());
        repos.events().insert_many(vec![sample_event(1)]).await.unwrap();
        let service = RegistrationService::new(repos, CapacityPolicy::new(1, Vec::new()));

        service.admit(1, "a@schools.nyc.gov", "Ann").await.unwrap();
        let err = service
            .admit(1, "b@schools.nyc.gov", "Bob")
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::EventFull { capacity: 1, .. }));
    }
}
