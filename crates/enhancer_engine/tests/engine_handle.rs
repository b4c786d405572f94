use std::sync::Arc;
use std::time::Duration;

use enhancer_core::{Fragment, FragmentNode, FragmentScope, RequestId};
use enhancer_engine::{
    EngineEvent, EngineHandle, FetchError, FetchSettings, Fetcher, FetchMetadata, FetchOutput,
};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const WAIT: Duration = Duration::from_secs(5);

#[tokio::test(flavor = "multi_thread")]
async fn completed_fetch_arrives_parsed_and_scoped() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(
            "<html><body><div id=\"hits\"><p>hit</p></div></body></html>",
            "text/html; charset=utf-8",
        ))
        .mount(&server)
        .await;

    let engine = EngineHandle::new(FetchSettings::default()).unwrap();
    engine.fetch(
        RequestId(4),
        format!("{}/search", server.uri()),
        FragmentScope::ElementById("hits".into()),
    );

    let event = tokio::task::spawn_blocking(move || engine.recv_timeout(WAIT))
        .await
        .unwrap()
        .expect("completion");
    assert_eq!(
        event,
        EngineEvent::FetchCompleted {
            request_id: RequestId(4),
            result: Ok(Fragment::new(vec![
                FragmentNode::element("p").with_text("hit")
            ])),
        }
    );
}

/// Serves a body with a stray invalid byte under a non-HTML content type.
struct StrayByte;

#[async_trait::async_trait]
impl Fetcher for StrayByte {
    async fn fetch(&self, url: &str) -> Result<FetchOutput, FetchError> {
        let bytes = b"<p>caf\xff</p>".to_vec();
        Ok(FetchOutput {
            metadata: FetchMetadata {
                original_url: url.to_string(),
                final_url: url.to_string(),
                status: 200,
                redirect_count: 0,
                content_type: Some("text/xml; charset=utf-8".into()),
                byte_len: bytes.len() as u64,
            },
            bytes,
        })
    }
}

#[test]
fn malformed_bytes_are_replaced_instead_of_failing_the_fetch() {
    let engine = EngineHandle::with_fetcher(Arc::new(StrayByte)).unwrap();
    engine.fetch(RequestId(1), "https://example.com/x", FragmentScope::Body);

    let Some(EngineEvent::FetchCompleted { request_id, result }) = engine.recv_timeout(WAIT)
    else {
        panic!("no completion");
    };
    assert_eq!(request_id, RequestId(1));
    assert_eq!(
        result.unwrap(),
        Fragment::new(vec![FragmentNode::element("p").with_text("caf\u{fffd}")])
    );
}
