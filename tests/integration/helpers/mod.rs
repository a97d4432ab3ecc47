// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use async_trait::async_trait;
use axum::{routing::post, Extension, Json, Router};
use axum_test::TestServer;
use billbrief::domain::models::bill::NewBill;
use billbrief::domain::repositories::bill_repository::BillRepository;
use billbrief::domain::repositories::user_query_repository::UserQueryRepository;
use billbrief::domain::services::llm_service::{LLMService, LLMServiceTrait};
use billbrief::domain::services::newsletter_service::NewsletterService;
use billbrief::domain::services::query_service::QueryService;
use billbrief::engines::traits::{BrowserLauncher, BrowserSession, EngineError};
use billbrief::infrastructure::database::connection;
use billbrief::infrastructure::mailer::Mailer;
use billbrief::infrastructure::repositories::bill_repo_impl::BillRepositoryImpl;
use billbrief::infrastructure::repositories::subscription_repo_impl::SubscriptionRepositoryImpl;
use billbrief::infrastructure::repositories::user_query_repo_impl::UserQueryRepositoryImpl;
use billbrief::presentation::routes;
use migration::{Migrator, MigratorTrait};
use once_cell::sync::Lazy;
use regex::Regex;
use sea_orm::DatabaseConnection;
use serde_json::{json, Value};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::net::TcpListener;

static ROW_INDEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"tr\[(\d+)\]").unwrap());

/// 内存数据库，已执行迁移
pub async fn setup_db() -> Arc<DatabaseConnection> {
    let db = connection::create_in_memory().await.unwrap();
    Migrator::up(&db, None).await.unwrap();
    Arc::new(db)
}

pub async fn seed_bills(repo: &BillRepositoryImpl, count: usize) {
    let bills = (1..=count)
        .map(|i| NewBill::new(format!("Bill {}", i), format!("Summary of bill {}", i)).unwrap())
        .collect();
    repo.save_batch(bills).await.unwrap();
}

/// 本地模型服务，记录收到的请求体
pub struct FakeLlm {
    pub base_url: String,
    pub requests: Arc<Mutex<Vec<Value>>>,
}

impl FakeLlm {
    pub fn client(&self) -> LLMService {
        LLMService::new_with_config(
            "test-key".to_string(),
            "gpt-4o".to_string(),
            self.base_url.clone(),
        )
    }

    pub fn system_prompts(&self) -> Vec<String> {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .filter_map(|body| body["messages"][0]["content"].as_str().map(str::to_string))
            .collect()
    }
}

async fn chat_completions(
    Extension(requests): Extension<Arc<Mutex<Vec<Value>>>>,
    Json(body): Json<Value>,
) -> Json<Value> {
    let system = body["messages"][0]["content"].as_str().unwrap_or_default();
    let content = if system.starts_with("You are an expert at summarizing") {
        "  The bill regulates AI systems. It sets obligations. It takes effect soon.  "
            .to_string()
    } else {
        format!(
            "Answer drawn from {} bills.",
            system.matches("Bill(id=").count()
        )
    };
    requests.lock().unwrap().push(body);

    Json(json!({
        "choices": [{ "message": { "role": "assistant", "content": content } }],
        "usage": { "prompt_tokens": 42, "completion_tokens": 12, "total_tokens": 54 }
    }))
}

pub async fn spawn_fake_llm() -> FakeLlm {
    let requests = Arc::new(Mutex::new(Vec::new()));
    let app = Router::new()
        .route("/v1/chat/completions", post(chat_completions))
        .layer(Extension(requests.clone()));

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    FakeLlm {
        base_url: format!("http://{}/v1", addr),
        requests,
    }
}

/// 记录发送内容的邮件发送器
#[derive(Default)]
pub struct OutboxMailer {
    pub sent: Mutex<Vec<String>>,
}

#[async_trait]
impl Mailer for OutboxMailer {
    async fn send(&self, to: &str, _subject: &str, _html_body: &str) -> anyhow::Result<()> {
        self.sent.lock().unwrap().push(to.to_string());
        Ok(())
    }
}

#[allow(dead_code)]
pub struct TestApp {
    pub server: TestServer,
    pub db: Arc<DatabaseConnection>,
    pub bill_repo: Arc<BillRepositoryImpl>,
    pub llm: FakeLlm,
    pub mailer: Arc<OutboxMailer>,
}

pub async fn create_test_app(seeded_bills: usize, unique_email: bool) -> TestApp {
    let db = setup_db().await;
    let bill_repo = Arc::new(BillRepositoryImpl::new(db.clone()));
    seed_bills(&bill_repo, seeded_bills).await;

    let llm = spawn_fake_llm().await;
    let llm_client: Arc<dyn LLMServiceTrait> = Arc::new(llm.client());
    let mailer = Arc::new(OutboxMailer::default());

    let bills: Arc<dyn BillRepository> = bill_repo.clone();
    let user_queries: Arc<dyn UserQueryRepository> =
        Arc::new(UserQueryRepositoryImpl::new(db.clone()));
    let query_service = Arc::new(QueryService::new(bills.clone(), llm_client));
    let newsletter = Arc::new(NewsletterService::new(
        bills.clone(),
        Arc::new(SubscriptionRepositoryImpl::new(db.clone(), unique_email)),
        mailer.clone(),
    ));

    let app = routes::routes()
        .layer(Extension(bills))
        .layer(Extension(user_queries))
        .layer(Extension(query_service))
        .layer(Extension(newsletter));

    TestApp {
        server: TestServer::new(app).unwrap(),
        db,
        bill_repo,
        llm,
        mailer,
    }
}

/// 脚本化浏览器会话：筛选控件总能点击，结果表格有 `rows` 行
pub struct TableSession {
    pub detail_base: String,
    pub rows: usize,
    pub closes: Arc<AtomicUsize>,
}

#[async_trait]
impl BrowserSession for TableSession {
    async fn open(&mut self, _url: &str) -> Result<(), EngineError> {
        Ok(())
    }

    async fn click(&mut self, _xpath: &str, _wait: Duration) -> Result<(), EngineError> {
        Ok(())
    }

    async fn link_href(&mut self, xpath: &str, wait: Duration) -> Result<Option<String>, EngineError> {
        let index: usize = ROW_INDEX
            .captures(xpath)
            .and_then(|caps| caps[1].parse().ok())
            .unwrap_or(0);
        if index == 0 || index > self.rows {
            return Err(EngineError::Timeout {
                locator: xpath.to_string(),
                waited: wait,
            });
        }
        Ok(Some(format!("{}/tracker/bill-{}", self.detail_base, index)))
    }

    async fn page_source(&mut self) -> Result<String, EngineError> {
        Ok("<html><body><table></table></body></html>".to_string())
    }

    async fn close(&mut self) -> Result<(), EngineError> {
        self.closes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

pub struct TableLauncher {
    pub detail_base: String,
    pub rows: usize,
    pub launches: AtomicUsize,
    pub closes: Arc<AtomicUsize>,
}

impl TableLauncher {
    pub fn new(detail_base: String, rows: usize) -> Self {
        Self {
            detail_base,
            rows,
            launches: AtomicUsize::new(0),
            closes: Arc::new(AtomicUsize::new(0)),
        }
    }
}

#[async_trait]
impl BrowserLauncher for TableLauncher {
    async fn launch(&self) -> Result<Box<dyn BrowserSession>, EngineError> {
        self.launches.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(TableSession {
            detail_base: self.detail_base.clone(),
            rows: self.rows,
            closes: self.closes.clone(),
        }))
    }
}
