//! SeaORM implementation of RepositoryProvider

use sea_orm::DatabaseConnection;

use crate::domain::{EventRepository, RegistrationRepository, RepositoryProvider};

use super::event_repository::SeaOrmEventRepository;
use super::registration_repository::SeaOrmRegistrationRepository;

/// Repository provider backed by SeaORM.
///
/// Holds one connection pool shared by both repositories.
///
/// ```ignore
/// let repos = SeaOrmRepositoryProvider::new(db.clone());
/// let event = repos.events().find_by_id(1).await?;
/// ```
pub struct SeaOrmRepositoryProvider {
    events: SeaOrmEventRepository,
    registrations: SeaOrmRegistrationRepository,
}

impl SeaOrmRepositoryProvider {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            events: SeaOrmEventRepository::new(db.clone()),
            registrations: SeaOrmRegistrationRepository::new(db),
        }
    }
}

impl RepositoryProvider for SeaOrmRepositoryProvider {
    fn events(&self) -> &dyn EventRepository {
        &self.events
    }

    fn registrations(&self) -> &dyn RegistrationRepository {
        &self.registrations
    }

    fn backend(&self) -> &'static str {
        "sqlite"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::event::sample_event;
    use crate::domain::{DomainError, ImportReport, NewRegistration};
    use crate::infrastructure::database::{init_and_migrate, DatabaseConfig};

    async fn repos() -> SeaOrmRepositoryProvider {
        let db = init_and_migrate(&DatabaseConfig::in_memory()).await.unwrap();
        SeaOrmRepositoryProvider::new(db)
    }

    #[tokio::test]
    async fn events_round_trip_in_id_order() {
        let repos = repos().await;
        repos
            .events()
            .insert_many(vec![sample_event(2), sample_event(1)])
            .await
            .unwrap();

        let events = repos.events().find_all().await.unwrap();
        assert_eq!(events.iter().map(|e| e.id).collect::<Vec<_>>(), vec![1, 2]);
        assert_eq!(events[0], sample_event(1));
        assert_eq!(repos.events().count().await.unwrap(), 2);
        assert!(repos.events().find_by_id(9).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn replace_all_keeps_registrations() {
        let repos = repos().await;
        repos
            .events()
            .insert_many(vec![sample_event(1), sample_event(2)])
            .await
            .unwrap();
        repos
            .registrations()
            .insert(NewRegistration::new(1, "a@schools.nyc.gov", "Ann"), Some(2))
            .await
            .unwrap();

        let report = repos
            .events()
            .replace_all(vec![sample_event(3)])
            .await
            .unwrap();
        assert_eq!(
            report,
            ImportReport {
                deleted: 2,
                inserted: 1,
                total: 1
            }
        );
        assert_eq!(repos.registrations().count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn unique_index_rejects_duplicate_pair() {
        let repos = repos().await;
        let store = repos.registrations();
        store
            .insert(NewRegistration::new(1, "a@schools.nyc.gov", "Ann"), None)
            .await
            .unwrap();

        let err = store
            .insert(NewRegistration::new(1, "A@SCHOOLS.NYC.GOV", "Ann"), None)
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::DuplicateRegistration { event_id: 1, .. }));

        let err = store
            .insert(NewRegistration::new(1, "a@schools.nyc.gov", "Ann"), Some(5))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::DuplicateRegistration { .. }));
    }

    #[tokio::test]
    async fn bounded_insert_stops_at_capacity() {
        let repos = repos().await;
        let store = repos.registrations();
        let first = store
            .insert(NewRegistration::new(4, "a@schools.nyc.gov", "Ann"), Some(2))
            .await
            .unwrap();
        let second = store
            .insert(NewRegistration::new(4, "b@schools.nyc.gov", "Bob"), Some(2))
            .await
            .unwrap();
        assert!(second.id > first.id);

        let err = store
            .insert(NewRegistration::new(4, "c@schools.nyc.gov", "Cy"), Some(2))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::EventFull { event_id: 4, capacity: 2 }));
        assert_eq!(store.count_for_event(4).await.unwrap(), 2);

        // other events are unaffected
        store
            .insert(NewRegistration::new(5, "c@schools.nyc.gov", "Cy"), Some(2))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn listing_and_grouping() {
        let repos = repos().await;
        let store = repos.registrations();
        for (event_id, email) in [(1, "a"), (2, "b"), (1, "c")] {
            store
                .insert(
                    NewRegistration::new(event_id, &format!("{}@schools.nyc.gov", email), "Name"),
                    None,
                )
                .await
                .unwrap();
        }

        let all = store.find_all().await.unwrap();
        assert_eq!(all.len(), 3);
        assert_eq!(all[0].email, "c@schools.nyc.gov");

        let counts = store.count_by_event().await.unwrap();
        assert_eq!(counts.get(&1), Some(&2));
        assert_eq!(counts.get(&2), Some(&1));

        let found = store
            .find_by_event_and_email(2, "b@schools.nyc.gov")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found.name, "Name");
        assert_eq!(store.count_for_event(1).await.unwrap(), 2);
    }
}
