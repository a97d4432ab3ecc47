// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use super::helpers::{setup_db, spawn_fake_llm, TableLauncher};
use billbrief::config::settings::Settings;
use billbrief::domain::repositories::bill_repository::BillRepository;
use billbrief::domain::services::extraction_service::ExtractionService;
use billbrief::domain::services::ingestion_service::{
    IngestionError, IngestionOutcome, IngestionService,
};
use billbrief::engines::reqwest_engine::ReqwestEngine;
use billbrief::engines::tracker_navigator::TrackerNavigator;
use billbrief::infrastructure::repositories::bill_repo_impl::BillRepositoryImpl;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn mount_detail_page(server: &MockServer, index: usize) {
    let html = format!(
        "<html><head><title>Bill {index} | TechPolicy Press</title></head>\
        <body><h1>Bill {index}</h1>\n   <p>Section one of bill {index}.</p>\n<p>Section two.</p></body></html>"
    );
    Mock::given(method("GET"))
        .and(path(format!("/tracker/bill-{}", index)))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "text/html")
                .set_body_string(html),
        )
        .mount(server)
        .await;
}

struct Pipeline {
    service: IngestionService,
    repo: Arc<BillRepositoryImpl>,
    launcher: Arc<TableLauncher>,
}

async fn pipeline(rows: usize, detail_pages: usize) -> (Pipeline, MockServer) {
    let settings = Settings::defaults().unwrap();
    let detail_server = MockServer::start().await;
    for index in 1..=detail_pages {
        mount_detail_page(&detail_server, index).await;
    }

    let llm = spawn_fake_llm().await;
    let repo = Arc::new(BillRepositoryImpl::new(setup_db().await));
    let launcher = Arc::new(TableLauncher::new(detail_server.uri(), rows));

    let service = IngestionService::new(
        repo.clone(),
        launcher.clone(),
        Arc::new(TrackerNavigator::new(&settings.tracker)),
        Arc::new(ExtractionService::new(
            ReqwestEngine::new(&settings.fetch).unwrap(),
        )),
        Arc::new(llm.client()),
    );

    (
        Pipeline {
            service,
            repo,
            launcher,
        },
        detail_server,
    )
}

#[tokio::test]
async fn full_run_commits_five_summarized_bills() {
    let (p, _server) = pipeline(5, 5).await;

    let outcome = p.service.run_ingestion().await.unwrap();

    assert_eq!(outcome, IngestionOutcome::Completed { committed: 5 });
    let bills = p.repo.find_first(10).await.unwrap();
    assert_eq!(bills.len(), 5);
    assert_eq!(bills[0].name, "Bill 1");
    assert_eq!(bills[4].name, "Bill 5");
    assert_eq!(
        bills[0].summary,
        "The bill regulates AI systems. It sets obligations. It takes effect soon."
    );
    assert_eq!(p.launcher.closes.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn second_run_is_skipped_without_browser() {
    let (p, _server) = pipeline(5, 5).await;

    p.service.run_ingestion().await.unwrap();
    let second = p.service.run_ingestion().await.unwrap();

    assert_eq!(second, IngestionOutcome::Skipped { existing: 5 });
    assert_eq!(p.launcher.launches.load(Ordering::SeqCst), 1);
    assert_eq!(p.repo.count().await.unwrap(), 5);
}

#[tokio::test]
async fn short_result_table_commits_nothing() {
    let (p, _server) = pipeline(3, 3).await;

    let err = p.service.run_ingestion().await.unwrap_err();

    assert!(matches!(err, IngestionError::Navigation(e) if e.is_timeout()));
    assert_eq!(p.repo.count().await.unwrap(), 0);
    assert_eq!(p.launcher.closes.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn missing_detail_page_commits_nothing() {
    let (p, _server) = pipeline(5, 4).await;

    let err = p.service.run_ingestion().await.unwrap_err();

    assert!(matches!(err, IngestionError::Extraction(_)));
    assert_eq!(p.repo.count().await.unwrap(), 0);
}
