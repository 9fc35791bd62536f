//! End-to-end pipeline tests: synthetic SSE wire bytes in, finalized history
//! entries out.

use std::sync::Arc;

use bytes::Bytes;
use futures::stream;

use xc_core::api::ExplainRequest;
use xc_core::history::HistoryStore;
use xc_core::session::ExplainSession;
use xc_core::stream::ExplainDecoder;
use xc_core::ExplainError;

fn sse_frame(content: &str) -> String {
    format!(
        "data: {}\n",
        serde_json::json!({"choices": [{"delta": {"content": content}}]})
    )
}

/// The wire for a small, fully-escaped explanation object.
fn sample_wire() -> String {
    [
        sse_frame("{\"title\":\"Quick sort\","),
        sse_frame("\"language\":\"rust\","),
        sse_frame("\"explanation\":\"Partition, then recurse.\\n"),
        sse_frame("Average O(n log n).\"}"),
        "data: [DONE]\n".to_string(),
    ]
    .concat()
}

fn request() -> ExplainRequest {
    ExplainRequest {
        code: "fn sort() {}".to_string(),
        language: "text".to_string(),
    }
}

#[test]
fn whole_wire_decodes_to_final_object() {
    let mut decoder = ExplainDecoder::new("text");
    decoder.push_chunk(sample_wire().as_bytes());
    let fields = decoder.finish();
    assert_eq!(fields.title, "Quick sort");
    assert_eq!(fields.language, "rust");
    assert_eq!(fields.explanation, "Partition, then recurse.\nAverage O(n log n).");
}

#[test]
fn every_chunk_partition_yields_the_same_triple() {
    let wire = sample_wire();
    let mut reference = ExplainDecoder::new("text");
    reference.push_chunk(wire.as_bytes());
    let expected = reference.finish();

    for size in [1, 3, 5, 9, 17, 101] {
        let mut decoder = ExplainDecoder::new("text");
        for chunk in wire.as_bytes().chunks(size) {
            decoder.push_chunk(chunk);
        }
        assert_eq!(decoder.finish(), expected, "chunk size {size}");
    }
}

#[test]
fn multibyte_explanation_survives_any_chunk_partition() {
    // "é" is two bytes on the wire; byte-sized chunks split it mid-character.
    let wire = [
        sse_frame("{\"title\":\"Café\",\"language\":\"rust\","),
        sse_frame("\"explanation\":\"café time\"}"),
    ]
    .concat();

    let mut reference = ExplainDecoder::new("text");
    reference.push_chunk(wire.as_bytes());
    let expected = reference.finish();
    assert_eq!(expected.title, "Café");
    assert_eq!(expected.explanation, "café time");

    for size in [1, 2, 3, 5] {
        let mut decoder = ExplainDecoder::new("text");
        for chunk in wire.as_bytes().chunks(size) {
            decoder.push_chunk(chunk);
        }
        assert_eq!(decoder.finish(), expected, "chunk size {size}");
    }
}

#[test]
fn multi_line_payload_crosses_the_whole_pipeline() {
    // One envelope split across two data lines with no blank line between.
    // The assembler rejoins them with a newline, which must land between JSON
    // tokens for the envelope to parse; the payload here splits after `delta`.
    let wire = concat!(
        "data: {\"choices\":[{\"delta\":\n",
        "{\"content\":\"{\\\"title\\\":\\\"T\\\",\"}}]}\n",
    );

    let mut decoder = ExplainDecoder::new("go");
    let snapshot = decoder
        .push_chunk(wire.as_bytes())
        .expect("rejoined payload parses and carries content");
    assert_eq!(snapshot.title, "T");
    assert_eq!(decoder.accumulated(), "{\"title\":\"T\",");
}

#[tokio::test]
async fn session_persists_only_after_success() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("history.json");

    let store = Arc::new(HistoryStore::load(path.clone()).expect("load"));
    let session = ExplainSession::new(
        xc_core::api::ExplainClient::new("http://localhost:0"),
        store.clone(),
    );

    // Failed session first: one good chunk, then a transport error.
    let failing = stream::iter(vec![
        Ok(Bytes::from(sse_frame("{\"title\":\"Doomed\","))),
        Err(ExplainError::Api {
            status: 500,
            message: "boom".into(),
        }),
    ]);
    session
        .run_with_stream(request(), failing, |_| {}, |_| {})
        .await
        .expect_err("fails");

    let reloaded = HistoryStore::load(path.clone()).expect("reload");
    assert!(reloaded.is_empty(), "failed session must leave no trace");

    // Then a successful one.
    let wire = sample_wire().into_bytes();
    let ok_stream = stream::iter(
        wire.chunks(7)
            .map(|c| Ok(Bytes::copy_from_slice(c)))
            .collect::<Vec<Result<Bytes, ExplainError>>>(),
    );
    let done = session
        .run_with_stream(request(), ok_stream, |_| {}, |_| {})
        .await
        .expect("succeeds");
    assert_eq!(done.title, "Quick sort");

    let reloaded = HistoryStore::load(path).expect("reload");
    assert_eq!(reloaded.entries().len(), 1);
    assert_eq!(reloaded.entries()[0].title, "Quick sort");
    assert_eq!(reloaded.entries()[0].language, "rust");
}
