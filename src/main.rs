// Copyright 2025 Kirky.X
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use axum::Extension;
use billbrief::config::settings::Settings;
use billbrief::domain::repositories::bill_repository::BillRepository;
use billbrief::domain::repositories::user_query_repository::UserQueryRepository;
use billbrief::domain::services::extraction_service::ExtractionService;
use billbrief::domain::services::ingestion_service::IngestionService;
use billbrief::domain::services::llm_service::{LLMService, LLMServiceTrait};
use billbrief::domain::services::newsletter_service::NewsletterService;
use billbrief::domain::services::query_service::QueryService;
use billbrief::engines::chromium_session::ChromiumLauncher;
use billbrief::engines::reqwest_engine::ReqwestEngine;
use billbrief::engines::tracker_navigator::TrackerNavigator;
use billbrief::infrastructure::database::connection;
use billbrief::infrastructure::mailer::LogMailer;
use billbrief::infrastructure::repositories::bill_repo_impl::BillRepositoryImpl;
use billbrief::infrastructure::repositories::subscription_repo_impl::SubscriptionRepositoryImpl;
use billbrief::infrastructure::repositories::user_query_repo_impl::UserQueryRepositoryImpl;
use billbrief::presentation::routes;
use billbrief::workers::ingestion_worker::IngestionWorker;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

use billbrief::utils::telemetry;
use migration::{Migrator, MigratorTrait};

/// 主函数
///
/// 应用程序入口点，负责初始化所有组件并启动服务
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Initialize logging
    telemetry::init_telemetry();
    info!("Starting billbrief...");

    // 2. Load configuration
    let settings = Arc::new(Settings::new()?);
    info!("Configuration loaded");

    // 3. Connect to database
    let db = connection::create_pool(&settings.database).await?;
    let db = Arc::new(db);
    info!("Database connection established");

    info!("Running database migrations...");
    Migrator::up(db.as_ref(), None).await?;
    info!("Database migrations applied");

    // 4. Initialize components
    let bill_repo: Arc<dyn BillRepository> = Arc::new(BillRepositoryImpl::new(db.clone()));
    let user_query_repo: Arc<dyn UserQueryRepository> =
        Arc::new(UserQueryRepositoryImpl::new(db.clone()));
    let subscription_repo = Arc::new(SubscriptionRepositoryImpl::new(
        db.clone(),
        settings.subscriptions.unique_email,
    ));

    let llm: Arc<dyn LLMServiceTrait> = Arc::new(LLMService::from_settings(&settings.llm)?);
    let extractor = Arc::new(ExtractionService::new(ReqwestEngine::new(&settings.fetch)?));
    let launcher = Arc::new(ChromiumLauncher::new(settings.tracker.clone()));
    let navigator = Arc::new(TrackerNavigator::new(&settings.tracker));

    let ingestion = Arc::new(IngestionService::new(
        bill_repo.clone(),
        launcher,
        navigator,
        extractor,
        llm.clone(),
    ));
    let query_service = Arc::new(QueryService::new(bill_repo.clone(), llm));
    let newsletter = Arc::new(NewsletterService::new(
        bill_repo.clone(),
        subscription_repo,
        Arc::new(LogMailer),
    ));

    // 5. Populate the store before serving
    if settings.ingestion.run_on_startup {
        match ingestion.run_ingestion().await {
            Ok(outcome) => info!(?outcome, "Startup ingestion finished"),
            Err(e) => error!(error = %e, "Startup ingestion failed"),
        }
    }

    // 6. Start workers
    if let Some(secs) = settings.ingestion.interval_secs.filter(|secs| *secs > 0) {
        IngestionWorker::new(ingestion.clone(), Duration::from_secs(secs)).start();
    }

    // 7. Start HTTP server
    let app = routes::routes()
        .layer(Extension(bill_repo))
        .layer(Extension(user_query_repo))
        .layer(Extension(query_service))
        .layer(Extension(newsletter))
        .layer(Extension(settings.clone()))
        .layer(TraceLayer::new_for_http());

    let addr = format!("{}:{}", settings.server.host, settings.server.port);
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
