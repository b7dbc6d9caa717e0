//! End-to-end tests of the question-answering and summarization flows with
//! a local embedder and a scripted completion model.

use std::sync::Arc;

use async_trait::async_trait;
use folio_model::{
    GenerationParams, MockModel, ModelError, OpenAICompatibleClient, OpenAICompatibleConfig,
};
use folio_rag::{
    DocumentAssistant, EmbeddingProvider, ErrorKind, HashingEmbedder, RagConfig, RagError,
};

const SKY: &str = "The sky is blue. Grass is green. Water is wet.";

fn sky_config(top_k: usize) -> RagConfig {
    RagConfig::builder().chunk_size(20).chunk_overlap(5).top_k(top_k).build().unwrap()
}

fn assistant(config: RagConfig, model: Arc<MockModel>) -> DocumentAssistant {
    DocumentAssistant::builder()
        .config(config)
        .embedder(Arc::new(HashingEmbedder::default()))
        .model(model)
        .build()
        .unwrap()
}

/// Counts calls and always fails with the given error.
struct FailingEmbedder {
    calls: std::sync::atomic::AtomicUsize,
}

#[async_trait]
impl EmbeddingProvider for FailingEmbedder {
    async fn embed(&self, _text: &str) -> folio_rag::Result<Vec<f32>> {
        self.calls.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
        Err(RagError::Encoding { provider: "failing".into(), message: "boom".into() })
    }

    fn dimensions(&self) -> usize {
        4
    }
}

#[tokio::test]
async fn answers_from_the_most_relevant_chunk() {
    let model = Arc::new(MockModel::new("  Blue.  "));
    let assistant = assistant(sky_config(1), Arc::clone(&model));

    let answer = assistant.answer_question(SKY, "What color is the sky?").await.unwrap();

    assert_eq!(answer.answer, "Blue.");
    assert_eq!(answer.sources.len(), 1);
    assert_eq!(answer.sources[0].rank, 1);
    assert!(answer.sources[0].text.contains("The sky is blue"));

    let prompts = model.prompts();
    assert_eq!(prompts.len(), 1);
    assert!(prompts[0].contains("The sky is blue."));
    assert!(prompts[0].contains("Question: What color is the sky?"));
    assert!(!prompts[0].contains("Water is wet"));
    assert_eq!(model.params(), [GenerationParams::new(0.2, 512)]);
}

#[tokio::test]
async fn returns_all_chunks_when_fewer_than_top_k() {
    let model = Arc::new(MockModel::new("ok"));
    let assistant = assistant(RagConfig::default(), model);

    let answer = assistant.answer_question("One short page.", "What is it?").await.unwrap();

    assert_eq!(answer.sources.len(), 1);
    assert_eq!(answer.sources[0].text, "One short page.");
}

#[tokio::test]
async fn sources_are_ranked_in_order() {
    let model = Arc::new(MockModel::new("ok"));
    let assistant = assistant(sky_config(3), model);

    let answer = assistant.answer_question(SKY, "What color is the sky?").await.unwrap();

    let ranks: Vec<usize> = answer.sources.iter().map(|s| s.rank).collect();
    assert_eq!(ranks, [1, 2, 3]);
    assert!(answer.sources[0].text.contains("sky"));
}

#[tokio::test]
async fn summarizes_with_summary_parameters() {
    let model = Arc::new(MockModel::new("\n- Revenue grew 12%\n- Margins held\n"));
    let assistant = assistant(RagConfig::default(), Arc::clone(&model));

    let summary = assistant.summarize("Revenue grew 12% in 2023. Margins held.").await.unwrap();

    assert_eq!(summary, "- Revenue grew 12%\n- Margins held");
    let prompts = model.prompts();
    assert!(prompts[0].contains("6-10 bullet points"));
    assert!(prompts[0].ends_with("Revenue grew 12% in 2023. Margins held."));
    assert_eq!(model.params(), [GenerationParams::new(0.2, 400)]);
}

#[tokio::test]
async fn empty_text_is_rejected_before_any_call() {
    let model = Arc::new(MockModel::new("unused"));
    let embedder = Arc::new(FailingEmbedder { calls: Default::default() });
    let assistant = DocumentAssistant::builder()
        .embedder(Arc::clone(&embedder) as Arc<dyn EmbeddingProvider>)
        .model(Arc::clone(&model) as Arc<dyn folio_model::CompletionModel>)
        .build()
        .unwrap();

    let err = assistant.summarize("").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);

    let err = assistant.summarize("  \n\t ").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);

    let err = assistant.answer_question("", "Anything?").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);

    let err = assistant.answer_question(SKY, "   ").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);

    assert_eq!(model.call_count(), 0);
    assert_eq!(embedder.calls.load(std::sync::atomic::Ordering::SeqCst), 0);
}

#[tokio::test]
async fn embedding_failure_stops_before_completion() {
    let model = Arc::new(MockModel::new("unused"));
    let assistant = DocumentAssistant::builder()
        .embedder(Arc::new(FailingEmbedder { calls: Default::default() }))
        .model(Arc::clone(&model) as Arc<dyn folio_model::CompletionModel>)
        .build()
        .unwrap();

    let err = assistant.answer_question(SKY, "What color is the sky?").await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Encoding);
    assert_eq!(model.call_count(), 0);
}

#[tokio::test]
async fn completion_errors_keep_their_kind() {
    let model = Arc::new(MockModel::new("unused").with_results([
        Err(ModelError::RateLimit {
            provider: "mock".into(),
            message: "slow down".into(),
            retry_after: None,
        }),
        Err(ModelError::Upstream { provider: "mock".into(), status: 502, message: "bad".into() }),
    ]));
    let assistant = assistant(sky_config(1), model);

    let err = assistant.answer_question(SKY, "What color is the sky?").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::RateLimit);

    let err = assistant.summarize(SKY).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Upstream);
}

#[tokio::test]
async fn missing_credential_is_an_authentication_error() {
    let config =
        OpenAICompatibleConfig::new("").with_api_key(None).with_base_url("http://127.0.0.1:9");
    let client = OpenAICompatibleClient::new(config).unwrap();
    let assistant = DocumentAssistant::builder()
        .embedder(Arc::new(HashingEmbedder::default()))
        .model(Arc::new(client))
        .build()
        .unwrap();

    let err = assistant.summarize(SKY).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Authentication);

    let err = assistant.answer_question(SKY, "What color is the sky?").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Authentication);
}

#[test]
fn builder_requires_model_and_embedder() {
    let err = DocumentAssistant::builder()
        .embedder(Arc::new(HashingEmbedder::default()))
        .build()
        .err()
        .unwrap();
    assert_eq!(err.kind(), ErrorKind::Config);

    let err = DocumentAssistant::builder()
        .model(Arc::new(MockModel::new("x")))
        .build()
        .err()
        .unwrap();
    assert_eq!(err.kind(), ErrorKind::Config);
}

#[test]
fn builder_rejects_invalid_config() {
    let config = RagConfig { chunk_overlap: 900, ..RagConfig::default() };
    let err = DocumentAssistant::builder()
        .config(config)
        .embedder(Arc::new(HashingEmbedder::default()))
        .model(Arc::new(MockModel::new("x")))
        .build()
        .err()
        .unwrap();
    assert!(matches!(err, RagError::Config(_)));
}
