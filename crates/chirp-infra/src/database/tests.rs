#[cfg(test)]
mod tests {
    use chrono::{TimeDelta, Utc};
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};

    use chirp_core::domain::PostStatus;
    use chirp_core::ports::PostRepository;

    use crate::database::entity::post;
    use crate::database::postgres_repo::PostgresPostRepository;

    fn due_model(now: chrono::DateTime<Utc>) -> post::Model {
        post::Model {
            id: uuid::Uuid::new_v4(),
            owner_id: uuid::Uuid::new_v4(),
            content: "due post".to_owned(),
            scheduled_time: now - TimeDelta::seconds(30),
            status: "scheduled".to_owned(),
            ai_generated: false,
            likes: 0,
            retweets: 0,
            replies: 0,
            impressions: 0,
            created_at: now - TimeDelta::hours(1),
            posted_at: None,
        }
    }

    #[tokio::test]
    async fn test_find_due_maps_to_domain() {
        let now = Utc::now();
        let model = due_model(now);
        let expected_id = model.id;

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![vec![model]])
            .into_connection();

        let repo = PostgresPostRepository::new(db);
        let due = repo.find_due(now).await.unwrap();

        assert_eq!(due.len(), 1);
        assert_eq!(due[0].id, expected_id);
        assert_eq!(due[0].status, PostStatus::Scheduled);
        assert!(due[0].posted_at.is_none());
    }

    #[tokio::test]
    async fn test_unknown_status_surfaces_as_query_error() {
        let now = Utc::now();
        let mut model = due_model(now);
        model.status = "draft".to_owned();

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![vec![model]])
            .into_connection();

        let repo = PostgresPostRepository::new(db);
        assert!(repo.find_due(now).await.is_err());
    }

    #[tokio::test]
    async fn test_transition_reports_whether_it_applied() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results(vec![
                MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 1,
                },
                MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 0,
                },
            ])
            .into_connection();

        let repo = PostgresPostRepository::new(db);
        let id = uuid::Uuid::new_v4();
        let now = Utc::now();

        // First CAS wins, the repeat finds the row already transitioned.
        assert!(
            repo.try_transition(id, PostStatus::Scheduled, PostStatus::Posted, Some(now))
                .await
                .unwrap()
        );
        assert!(
            !repo
                .try_transition(id, PostStatus::Scheduled, PostStatus::Posted, Some(now))
                .await
                .unwrap()
        );
    }
}
