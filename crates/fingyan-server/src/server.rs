//! Router assembly and the serve loop

use crate::config::ServerConfig;
use crate::engine::ChatEngine;
use crate::routes::{AppState, chat, health};
use axum::Router;
use axum::routing::{get, post};
use fingyan_llm::LLMProvider;
use fingyan_markets::{MarketConfig, market_tool_registry};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

/// Build the application router
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/chat", post(chat))
        // The chat UI is served from a different origin in development
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Build the tool registry, wire up the engine and serve until shutdown
pub async fn serve(config: ServerConfig, provider: Arc<dyn LLMProvider>) -> anyhow::Result<()> {
    let market_config = MarketConfig::default().with_env_api_key();
    let registry = Arc::new(market_tool_registry(&market_config)?);
    info!(
        tool_count = registry.len(),
        provider = provider.name(),
        model = %config.model,
        "starting chat engine"
    );

    let engine = ChatEngine::new(provider, registry, config.engine_config());
    let state = Arc::new(AppState { engine });
    let app = router(state);

    let listener = tokio::net::TcpListener::bind(config.bind).await?;
    info!(addr = %config.bind, "listening");
    axum::serve(listener, app).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::EngineConfig;
    use async_trait::async_trait;
    use fingyan_llm::{
        CompletionRequest, CompletionResponse, CompletionStream, Message, StopReason, StreamDelta,
        TokenUsage,
    };
    use fingyan_tools::ToolRegistry;

    struct CannedProvider;

    #[async_trait]
    impl LLMProvider for CannedProvider {
        async fn complete(
            &self,
            _request: CompletionRequest,
        ) -> fingyan_llm::Result<CompletionResponse> {
            Ok(CompletionResponse {
                message: Message::assistant("ok"),
                stop_reason: StopReason::EndTurn,
                usage: TokenUsage::default(),
            })
        }

        async fn complete_stream(
            &self,
            request: CompletionRequest,
        ) -> fingyan_llm::Result<CompletionStream> {
            let response = self.complete(request).await?;
            Ok(Box::pin(futures::stream::iter(vec![Ok(
                StreamDelta::Done(response),
            )])))
        }

        fn name(&self) -> &str {
            "canned"
        }
    }

    fn test_state() -> Arc<AppState> {
        let engine = ChatEngine::new(
            Arc::new(CannedProvider),
            Arc::new(ToolRegistry::new()),
            EngineConfig::default(),
        );
        Arc::new(AppState { engine })
    }

    #[tokio::test]
    async fn test_health_endpoint() {
        use axum::body::Body;
        use axum::http::{Request, StatusCode};
        use tower::ServiceExt;

        let app = router(test_state());
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/health")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_empty_messages_rejected() {
        use axum::body::Body;
        use axum::http::{Request, StatusCode};
        use tower::ServiceExt;

        let app = router(test_state());
        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/chat")
                    .header("content-type", "application/json")
                    .body(Body::from(r#"{"messages":[]}"#))
                    .expect("request"),
            )
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_chat_streams_sse() {
        use axum::body::Body;
        use axum::http::{Request, StatusCode, header};
        use tower::ServiceExt;

        let app = router(test_state());
        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/chat")
                    .header("content-type", "application/json")
                    .body(Body::from(
                        r#"{"messages":[{"role":"user","content":"hi"}]}"#,
                    ))
                    .expect("request"),
            )
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::OK);
        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default();
        assert!(content_type.starts_with("text/event-stream"));
    }
}
