// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::integration::helpers::{seed_bills, setup_db, spawn_fake_llm};
use billbrief::domain::services::query_service::QueryService;
use billbrief::infrastructure::repositories::bill_repo_impl::BillRepositoryImpl;
use std::sync::Arc;

/// 不同仓库规模下上下文中的法案数
#[tokio::test]
async fn context_is_capped_at_five_bills() {
    for (stored, expected) in [(0, 0), (1, 1), (5, 5), (100, 5)] {
        let repo = Arc::new(BillRepositoryImpl::new(setup_db().await));
        seed_bills(&repo, stored).await;
        let llm = spawn_fake_llm().await;
        let service = QueryService::new(repo, Arc::new(llm.client()));

        let answer = service.answer_question("What is covered?").await.unwrap();

        assert_eq!(answer, format!("Answer drawn from {} bills.", expected));
        let prompts = llm.system_prompts();
        assert_eq!(prompts.len(), 1);
        assert_eq!(prompts[0].matches("Bill(id=").count(), expected);
    }
}

#[tokio::test]
async fn context_uses_lowest_ids_first() {
    let repo = Arc::new(BillRepositoryImpl::new(setup_db().await));
    seed_bills(&repo, 8).await;
    let llm = spawn_fake_llm().await;
    let service = QueryService::new(repo, Arc::new(llm.client()));

    service.answer_question("Anything new?").await.unwrap();

    let prompt = &llm.system_prompts()[0];
    assert!(prompt.contains("Bill(id=1, name=Bill 1, summary=Summary of bill 1)"));
    assert!(!prompt.contains("Bill 6"));
}
