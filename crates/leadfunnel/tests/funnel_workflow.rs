//! Integration scenarios for the lead-capture funnel.
//!
//! Scenarios exercise the public service facade and HTTP router end to end so
//! validation, scoring, insight generation, and retrieval are checked without
//! reaching into private modules.

mod common {
    use std::collections::{BTreeMap, HashMap};
    use std::sync::{Arc, Mutex};

    use serde_json::{json, Value};
    use uuid::Uuid;

    use leadfunnel::config::FunnelConfig;
    use leadfunnel::funnel::{
        DisabledEnrichment, FunnelService, LeadRecord, LeadRepository, LeadSubmission,
        MailTransport, QuestionCatalog, RenderError, RenderedReport, ReportEmail, ReportRenderer,
        ReportView, RepositoryError, TransportError,
    };

    #[derive(Default, Clone)]
    pub(super) struct MemoryRepository {
        records: Arc<Mutex<HashMap<Uuid, LeadRecord>>>,
    }

    impl LeadRepository for MemoryRepository {
        fn insert(&self, record: LeadRecord) -> Result<LeadRecord, RepositoryError> {
            let mut guard = self.records.lock().expect("lock");
            if guard.contains_key(&record.id) {
                return Err(RepositoryError::Conflict);
            }
            guard.insert(record.id, record.clone());
            Ok(record)
        }

        fn update(&self, record: LeadRecord) -> Result<(), RepositoryError> {
            let mut guard = self.records.lock().expect("lock");
            guard.insert(record.id, record);
            Ok(())
        }

        fn fetch(&self, id: &Uuid) -> Result<Option<LeadRecord>, RepositoryError> {
            let guard = self.records.lock().expect("lock");
            Ok(guard.get(id).cloned())
        }
    }

    #[derive(Default, Clone)]
    pub(super) struct MemoryMail {
        sent: Arc<Mutex<Vec<ReportEmail>>>,
    }

    impl MemoryMail {
        pub(super) fn sent(&self) -> Vec<ReportEmail> {
            self.sent.lock().expect("lock").clone()
        }
    }

    impl MailTransport for MemoryMail {
        fn send(&self, email: ReportEmail) -> Result<(), TransportError> {
            self.sent.lock().expect("lock").push(email);
            Ok(())
        }
    }

    #[derive(Default, Clone)]
    pub(super) struct TextRenderer;

    impl ReportRenderer for TextRenderer {
        fn render(&self, view: &ReportView) -> Result<RenderedReport, RenderError> {
            let mut text = format!(
                "{}\nRecord: {}\n{} <{}> {}\n{}\n",
                view.title, view.record_id, view.name, view.email, view.location, view.score_line
            );
            for (index, insight) in view.insights.iter().enumerate() {
                text.push_str(&format!("{}. {}\n", index + 1, insight));
            }
            for answer in &view.answers {
                text.push_str(&format!("{}: {}\n", answer.label, answer.answer));
            }
            text.push_str(view.next_step);
            Ok(RenderedReport {
                filename: format!("readiness-report-{}.txt", view.record_id),
                content_type: "text/plain; charset=utf-8",
                bytes: text.into_bytes(),
            })
        }
    }

    pub(super) fn funnel_config() -> FunnelConfig {
        FunnelConfig {
            location_required: true,
            insight_display_cap: 5,
            enrichment_timeout_ms: 200,
            mail_sender: None,
        }
    }

    pub(super) fn build_service() -> (
        Arc<FunnelService<MemoryRepository, MemoryMail, DisabledEnrichment>>,
        Arc<MemoryRepository>,
        Arc<MemoryMail>,
    ) {
        let repository = Arc::new(MemoryRepository::default());
        let mail = Arc::new(MemoryMail::default());
        let service = Arc::new(FunnelService::new(
            repository.clone(),
            mail.clone(),
            Arc::new(DisabledEnrichment),
            Arc::new(TextRenderer),
            funnel_config(),
        ));
        (service, repository, mail)
    }

    pub(super) fn all_yes_answers() -> BTreeMap<String, Value> {
        QuestionCatalog::standard()
            .best_practices()
            .map(|definition| (definition.id.as_str().to_string(), json!("yes")))
            .collect()
    }

    pub(super) fn submission(answers: BTreeMap<String, Value>) -> LeadSubmission {
        LeadSubmission {
            name: "Dana Fields".to_string(),
            email: "dana@brightsmiles.example".to_string(),
            location: "Des Moines".to_string(),
            consent: true,
            answers,
        }
    }

    pub(super) fn submission_json(answers: BTreeMap<String, Value>) -> Value {
        json!({
            "name": "Dana Fields",
            "email": "dana@brightsmiles.example",
            "location": "Des Moines",
            "consent": true,
            "answers": answers,
        })
    }
}

mod service {
    use super::common::*;
    use leadfunnel::funnel::{DeliveryOutcome, LeadRepository, ScoreBand};
    use std::collections::BTreeMap;

    #[tokio::test]
    async fn completed_funnel_persists_scores_and_delivers() {
        let (service, repository, mail) = build_service();
        let receipt = service
            .submit(submission(all_yes_answers()))
            .await
            .expect("submission succeeds");

        assert_eq!(receipt.report.percentage, 100);
        assert_eq!(receipt.report.band, ScoreBand::Green);
        assert_eq!(receipt.delivery, DeliveryOutcome::Sent);

        let stored = repository
            .fetch(&receipt.record_id)
            .expect("fetch")
            .expect("record present");
        assert_eq!(stored.score.percentage, 100);
        assert_eq!(stored.delivery, Some(DeliveryOutcome::Sent));

        let emails = mail.sent();
        assert_eq!(emails.len(), 1);
        assert!(emails[0].subject.contains("Dana Fields"));
        assert!(!emails[0].attachment.is_empty());
    }

    #[tokio::test]
    async fn stored_record_round_trips_deep_equal() {
        let (service, repository, _) = build_service();
        let receipt = service
            .submit(submission(all_yes_answers()))
            .await
            .expect("submission succeeds");

        let first = repository
            .fetch(&receipt.record_id)
            .expect("fetch")
            .expect("record present");
        let second = repository
            .fetch(&receipt.record_id)
            .expect("fetch again")
            .expect("record still present");
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn empty_quiz_lands_in_red_with_recommendations() {
        let (service, _, _) = build_service();
        let receipt = service
            .submit(submission(BTreeMap::new()))
            .await
            .expect("submission succeeds");

        assert_eq!(receipt.report.percentage, 0);
        assert_eq!(receipt.report.band, ScoreBand::Red);
        assert!(receipt.report.insights.len() >= 2);
        // Every unanswered question shows as such in the labeled listing.
        assert!(receipt
            .report
            .answers
            .iter()
            .all(|answer| answer.answer == "not answered"));
    }
}

mod routing {
    use super::common::*;
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Request, StatusCode};
    use serde_json::Value;
    use tower::ServiceExt;

    use leadfunnel::funnel::funnel_router;

    #[tokio::test]
    async fn post_submission_returns_receipt() {
        let (service, _, _) = build_service();
        let router = funnel_router(service);

        let request = Request::builder()
            .method("POST")
            .uri("/api/v1/funnel/submissions")
            .header("content-type", "application/json")
            .body(Body::from(
                serde_json::to_vec(&submission_json(all_yes_answers())).expect("serialize"),
            ))
            .expect("request");

        let response = router.oneshot(request).await.expect("router dispatch");
        assert_eq!(response.status(), StatusCode::CREATED);

        let body = to_bytes(response.into_body(), 1024 * 1024)
            .await
            .expect("body");
        let payload: Value = serde_json::from_slice(&body).expect("json");
        assert!(payload.get("record_id").is_some());
        assert_eq!(
            payload
                .pointer("/report/percentage")
                .and_then(Value::as_u64),
            Some(100)
        );
        assert_eq!(
            payload.pointer("/report/band").and_then(Value::as_str),
            Some("green")
        );
    }

    #[tokio::test]
    async fn post_with_empty_email_stays_unprocessable() {
        let (service, _, mail) = build_service();
        let router = funnel_router(service);

        let mut body = submission_json(all_yes_answers());
        body["email"] = Value::String(String::new());

        let request = Request::builder()
            .method("POST")
            .uri("/api/v1/funnel/submissions")
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_vec(&body).expect("serialize")))
            .expect("request");

        let response = router.oneshot(request).await.expect("router dispatch");
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let body = to_bytes(response.into_body(), 1024).await.expect("body");
        let payload: Value = serde_json::from_slice(&body).expect("json");
        assert_eq!(
            payload.get("error").and_then(Value::as_str),
            Some("email address looks invalid")
        );
        assert!(mail.sent().is_empty());
    }

    #[tokio::test]
    async fn report_can_be_fetched_by_id_without_side_effects() {
        let (service, _, mail) = build_service();
        let receipt = service
            .submit(submission(all_yes_answers()))
            .await
            .expect("submission succeeds");

        let router = funnel_router(service);
        let response = router
            .oneshot(
                Request::builder()
                    .method("GET")
                    .uri(format!("/api/v1/funnel/reports/{}", receipt.record_id))
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("router dispatch");

        assert_eq!(response.status(), StatusCode::OK);
        let body = to_bytes(response.into_body(), 1024 * 1024)
            .await
            .expect("body");
        let payload: Value = serde_json::from_slice(&body).expect("json");
        assert_eq!(
            payload.get("percentage").and_then(Value::as_u64),
            Some(100)
        );
        assert_eq!(
            payload.get("title").and_then(Value::as_str),
            Some("Practice Readiness Scorecard")
        );
        // Retrieval re-renders; it never re-sends.
        assert_eq!(mail.sent().len(), 1);
    }

    #[tokio::test]
    async fn unknown_report_id_is_not_found() {
        let (service, _, _) = build_service();
        let router = funnel_router(service);

        for uri in [
            "/api/v1/funnel/reports/00000000-0000-0000-0000-000000000000",
            "/api/v1/funnel/reports/not-a-uuid",
        ] {
            let response = router
                .clone()
                .oneshot(
                    Request::builder()
                        .method("GET")
                        .uri(uri)
                        .body(Body::empty())
                        .expect("request"),
                )
                .await
                .expect("router dispatch");

            assert_eq!(response.status(), StatusCode::NOT_FOUND, "uri={uri}");
            let body = to_bytes(response.into_body(), 1024).await.expect("body");
            let payload: Value = serde_json::from_slice(&body).expect("json");
            assert_eq!(
                payload.get("error").and_then(Value::as_str),
                Some("no such record")
            );
        }
    }

    #[tokio::test]
    async fn document_download_reproduces_the_report() {
        let (service, _, _) = build_service();
        let receipt = service
            .submit(submission(all_yes_answers()))
            .await
            .expect("submission succeeds");

        let router = funnel_router(service);
        let response = router
            .oneshot(
                Request::builder()
                    .method("GET")
                    .uri(format!(
                        "/api/v1/funnel/reports/{}/document",
                        receipt.record_id
                    ))
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("router dispatch");

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response
                .headers()
                .get(header::CONTENT_TYPE)
                .and_then(|value| value.to_str().ok()),
            Some("text/plain; charset=utf-8")
        );

        let body = to_bytes(response.into_body(), 1024 * 1024)
            .await
            .expect("body");
        let text = String::from_utf8(body.to_vec()).expect("utf8 document");
        assert!(text.contains("Practice Readiness Scorecard"));
        assert!(text.contains(&receipt.record_id.to_string()));
        assert!(text.contains("Dana Fields"));
        assert!(text.contains("Next step:"));
    }
}
