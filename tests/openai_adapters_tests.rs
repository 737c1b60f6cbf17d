//! OpenAI embedding and extraction adapters against a mocked API.

use reviewvault::{
    DomainError, EmbeddingService, ExtractionRequest, FetchedPage, OpenAiEmbedding,
    OpenAiReviewExtractor, ReviewExtractor,
};
use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn chat_reply(content: &str) -> serde_json::Value {
    json!({
        "id": "chatcmpl-1",
        "object": "chat.completion",
        "choices": [{
            "index": 0,
            "message": { "role": "assistant", "content": content, "refusal": null },
            "finish_reason": "stop"
        }]
    })
}

fn flora_page() -> FetchedPage {
    FetchedPage::new(
        "https://pitchfork.com/reviews/albums/hiroshi-yoshimura-flora/",
        "Flora\n\nHiroshi Yoshimura\n\n8.5\n\nGentle synth miniatures.",
    )
    .with_title("Hiroshi Yoshimura: Flora Album Review | Pitchfork")
}

#[tokio::test]
async fn embedding_posts_model_and_input() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/embeddings"))
        .and(header("authorization", "Bearer sk-test"))
        .and(body_partial_json(json!({
            "model": "text-embedding-3-small",
            "input": "Gentle synth miniatures."
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "object": "list",
            "data": [{ "object": "embedding", "index": 0, "embedding": vec![0.25f32; 1536] }],
            "model": "text-embedding-3-small"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let service = OpenAiEmbedding::new("sk-test", &server.uri(), "text-embedding-3-small").unwrap();
    let vector = service.embed_text("Gentle synth miniatures.").await.unwrap();

    assert_eq!(vector.len(), 1536);
    assert_eq!(service.config().dimensions(), 1536);
}

#[tokio::test]
async fn embedding_http_error_is_embedding_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/embeddings"))
        .respond_with(ResponseTemplate::new(429).set_body_string("rate limited"))
        .mount(&server)
        .await;

    let service = OpenAiEmbedding::new("sk-test", &server.uri(), "text-embedding-3-small").unwrap();
    let err = service.embed_text("text").await.unwrap_err();

    assert!(matches!(err, DomainError::EmbeddingError(_)));
    assert!(err.to_string().contains("429"));
}

#[tokio::test]
async fn embedding_rejects_empty_text_without_a_request() {
    let server = MockServer::start().await;
    let service = OpenAiEmbedding::new("sk-test", &server.uri(), "text-embedding-3-small").unwrap();

    assert!(service.embed_text("   ").await.is_err());
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn extraction_sends_schema_and_parses_reply() {
    let server = MockServer::start().await;
    let reply = json!({
        "title": "Flora",
        "artist": "Hiroshi Yoshimura",
        "score": 8.5,
        "review_text": "Gentle synth miniatures.",
        "url": "https://pitchfork.com/reviews/albums/hiroshi-yoshimura-flora/",
        "date": "2024-01-01"
    })
    .to_string();

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(header("authorization", "Bearer sk-test"))
        .and(body_partial_json(json!({
            "model": "gpt-4o-mini",
            "temperature": 0.0,
            "response_format": {
                "type": "json_schema",
                "json_schema": { "name": "album_review", "strict": true }
            }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(chat_reply(&reply)))
        .expect(1)
        .mount(&server)
        .await;

    let extractor = OpenAiReviewExtractor::new("sk-test", &server.uri(), "gpt-4o-mini").unwrap();
    let review = extractor
        .extract(&flora_page(), &ExtractionRequest::album_review())
        .await
        .unwrap();

    assert_eq!(review.title, "Flora");
    assert_eq!(review.artist, "Hiroshi Yoshimura");
    assert_eq!(review.score, 8.5);
    assert_eq!(review.date, "2024-01-01");

    let requests = server.received_requests().await.unwrap();
    let body: serde_json::Value = serde_json::from_slice(&requests[0].body).unwrap();
    let required = body["response_format"]["json_schema"]["schema"]["required"]
        .as_array()
        .unwrap()
        .len();
    assert_eq!(required, 6);
    let user = body["messages"][1]["content"].as_str().unwrap();
    assert!(user.contains("complete review text"));
    assert!(user.contains("Gentle synth miniatures."));
}

#[tokio::test]
async fn extraction_reply_missing_fields_fails() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(chat_reply(r#"{"title":"Flora","artist":"Hiroshi Yoshimura"}"#)),
        )
        .mount(&server)
        .await;

    let extractor = OpenAiReviewExtractor::new("sk-test", &server.uri(), "gpt-4o-mini").unwrap();
    let err = extractor
        .extract(&flora_page(), &ExtractionRequest::album_review())
        .await
        .unwrap_err();

    assert!(matches!(err, DomainError::Extraction(_)));
}

#[tokio::test]
async fn extraction_refusal_fails() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [{
                "index": 0,
                "message": { "role": "assistant", "content": null, "refusal": "I can't help with that." }
            }]
        })))
        .mount(&server)
        .await;

    let extractor = OpenAiReviewExtractor::new("sk-test", &server.uri(), "gpt-4o-mini").unwrap();
    let err = extractor
        .extract(&flora_page(), &ExtractionRequest::album_review())
        .await
        .unwrap_err();

    assert!(err.to_string().contains("refused"));
}
