//! End-to-end query behaviour: index with doubles, then answer.

mod common;

use std::sync::Arc;

use common::{MockEmbeddingProvider, RecordingGenerator, StubLoader, touch};
use docqa_rag::{
    Citation, InMemoryVectorStore, Indexer, NOT_FOUND_ANSWER, QueryPipeline, RagConfig, RagError,
    Retriever, VectorStore, grounding_instruction,
};

async fn indexed_store(file: &str, pages: &[&str]) -> Arc<InMemoryVectorStore> {
    let dir = tempfile::tempdir().unwrap();
    touch(dir.path(), &[file]);
    let loader = StubLoader::default().with_file(file, pages);
    let store = Arc::new(InMemoryVectorStore::new());
    Indexer::builder()
        .loader(Arc::new(loader))
        .embedding_provider(Arc::new(MockEmbeddingProvider::default()))
        .vector_store(store.clone())
        .build()
        .unwrap()
        .index_corpus(dir.path(), 1000, 200)
        .await
        .unwrap();
    store
}

fn pipeline(store: Arc<InMemoryVectorStore>, generator: Arc<RecordingGenerator>) -> QueryPipeline {
    QueryPipeline::builder()
        .config(RagConfig::default())
        .embedding_provider(Arc::new(MockEmbeddingProvider::default()))
        .vector_store(store)
        .generator(generator)
        .build()
        .unwrap()
}

#[tokio::test]
async fn payment_question_cites_the_contract_page() {
    let store = indexed_store("contract.pdf", &["Clause 1. Payment due in 30 days."]).await;
    let generator = Arc::new(RecordingGenerator::answering("Payment is due in 30 days (Page 1)."));

    let answer =
        pipeline(store, generator.clone()).answer("What is the payment term?").await.unwrap();

    assert_eq!(answer.text, "Payment is due in 30 days (Page 1).");
    assert_eq!(
        answer.citations,
        vec![Citation {
            page: "1".into(),
            file: "contract.pdf".into(),
            snippet: "Clause 1. Payment due in 30 days....".into(),
        }]
    );

    let prompts = generator.prompts();
    assert_eq!(prompts.len(), 1);
    let (system, user) = &prompts[0];
    assert_eq!(user, "What is the payment term?");
    assert_eq!(
        system,
        &grounding_instruction("\nPage 1 — contract.pdf\nClause 1. Payment due in 30 days.\n")
    );
}

#[tokio::test]
async fn empty_collection_still_asks_the_generator() {
    let store = Arc::new(InMemoryVectorStore::new());
    store.create_collection("law_docs", common::DIMENSIONS).await.unwrap();
    let generator = Arc::new(RecordingGenerator::answering(NOT_FOUND_ANSWER));

    let answer = pipeline(store, generator.clone()).answer("Who is the landlord?").await.unwrap();

    assert!(answer.citations.is_empty());
    assert_eq!(answer.text, NOT_FOUND_ANSWER);
    let prompts = generator.prompts();
    assert_eq!(prompts.len(), 1);
    assert_eq!(prompts[0].0, grounding_instruction(""));
    assert!(prompts[0].0.ends_with("CONTEXT:\n\n"));
    assert_eq!(prompts[0].1, "Who is the landlord?");
}

#[tokio::test]
async fn citations_follow_retrieval_rank_and_are_capped_at_top_k() {
    let pages: Vec<String> = (1..=8).map(|i| format!("Section {i} of the lease.")).collect();
    let page_refs: Vec<&str> = pages.iter().map(String::as_str).collect();
    let store = indexed_store("lease.pdf", &page_refs).await;

    let retriever = Retriever::new(
        Arc::new(MockEmbeddingProvider::default()),
        store.clone(),
        "law_docs",
    );
    let ranked = retriever.retrieve("Section 3 of the lease.", 5).await.unwrap();
    assert_eq!(ranked.len(), 5);
    // identical text embeds identically, so it ranks first
    assert_eq!(ranked[0].text, "Section 3 of the lease.");

    let generator = Arc::new(RecordingGenerator::answering("See page 3."));
    let answer = pipeline(store, generator).answer("Section 3 of the lease.").await.unwrap();
    let cited: Vec<&str> = answer.citations.iter().map(|c| c.page.as_str()).collect();
    let expected: Vec<&str> = ranked.iter().map(|c| c.page_label().unwrap()).collect();
    assert_eq!(cited, expected);
}

#[tokio::test]
async fn generation_failure_propagates_unchanged() {
    let store = indexed_store("contract.pdf", &["Clause 1. Payment due in 30 days."]).await;

    let err = pipeline(store, Arc::new(RecordingGenerator::failing()))
        .answer("What is the payment term?")
        .await
        .unwrap_err();

    assert!(matches!(err, RagError::GenerationError { provider, .. } if provider == "recording"));
}

#[tokio::test]
async fn missing_collection_is_a_store_error() {
    let generator = Arc::new(RecordingGenerator::answering("unused"));
    let err = pipeline(Arc::new(InMemoryVectorStore::new()), generator.clone())
        .answer("anything")
        .await
        .unwrap_err();

    assert!(matches!(err, RagError::VectorStoreError { .. }));
    assert!(generator.prompts().is_empty());
}

#[tokio::test]
async fn embedding_failure_during_query_propagates() {
    let store = indexed_store("contract.pdf", &["Clause 1."]).await;
    let err = QueryPipeline::builder()
        .embedding_provider(Arc::new(MockEmbeddingProvider::failing()))
        .vector_store(store)
        .generator(Arc::new(RecordingGenerator::answering("unused")))
        .build()
        .unwrap()
        .answer("anything")
        .await
        .unwrap_err();

    assert!(matches!(err, RagError::EmbeddingError { .. }));
}

#[tokio::test]
async fn retriever_rejects_zero_k() {
    let retriever = Retriever::new(
        Arc::new(MockEmbeddingProvider::default()),
        Arc::new(InMemoryVectorStore::new()),
        "law_docs",
    );
    assert!(matches!(retriever.retrieve("q", 0).await, Err(RagError::ConfigError(_))));
}

#[test]
fn builder_requires_a_generator() {
    let result = QueryPipeline::builder()
        .embedding_provider(Arc::new(MockEmbeddingProvider::default()))
        .vector_store(Arc::new(InMemoryVectorStore::new()))
        .build();
    assert!(matches!(result, Err(RagError::ConfigError(msg)) if msg.contains("generator")));
}
