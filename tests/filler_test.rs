use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use civic_cli::assistant::{FillState, FormFiller};
use civic_cli::client::CivicClient;
use civic_cli::types::Category;

async fn client_for(server: &MockServer) -> CivicClient {
    CivicClient::new(&server.uri(), None).unwrap()
}

fn refined_body() -> serde_json::Value {
    // The service wraps a JSON-encoded report inside the `refined` string.
    json!({
        "refined": serde_json::to_string(&json!({
            "title": "Overflowing garbage bin",
            "description": "A garbage bin is overflowing near the park entrance.",
            "urgency": "24-48 hours",
            "details": "Attracting stray animals",
            "contact": "N/A",
        }))
        .unwrap()
    })
}

#[tokio::test]
async fn five_turns_fully_populate_the_draft() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/refine-description/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(refined_body()))
        .expect(1)
        .mount(&server)
        .await;

    let mut client = client_for(&server).await;
    let mut filler = FormFiller::new();

    let reply = filler.handle_message(&mut client, "Fill the form please").await;
    assert_eq!(filler.state(), FillState::AwaitingTitle);
    assert!(reply.lines[0].contains("title"));

    filler.handle_message(&mut client, "Garbage").await;
    assert_eq!(filler.state(), FillState::AwaitingDescription);

    let reply = filler
        .handle_message(&mut client, "garbage everywhere near the park")
        .await;
    assert_eq!(filler.state(), FillState::AwaitingCategory);
    assert!(reply.lines.iter().any(|l| l.contains("HYGIENE")));

    filler.handle_message(&mut client, "hygiene").await;
    assert_eq!(filler.state(), FillState::AwaitingAddress);

    let reply = filler.handle_message(&mut client, "MG Road, near the park").await;
    assert_eq!(filler.state(), FillState::Idle);

    let draft = reply.completed.expect("draft should be complete");
    // Refinement overwrote both title and description.
    assert_eq!(draft.title, "Overflowing garbage bin");
    assert!(draft
        .description
        .starts_with("A garbage bin is overflowing near the park entrance."));
    assert!(draft.description.contains("Urgency: 24-48 hours"));
    assert!(draft.description.contains("Details: Attracting stray animals"));
    assert_eq!(draft.category, Some(Category::Hygiene));
    assert_eq!(draft.address, "MG Road, near the park");
}

#[tokio::test]
async fn refinement_network_failure_keeps_raw_text_and_advances() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/refine-description/"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let mut client = client_for(&server).await;
    let mut filler = FormFiller::new();

    filler.handle_message(&mut client, "fill the form").await;
    filler.handle_message(&mut client, "Streetlight out").await;
    let reply = filler
        .handle_message(&mut client, "the streetlight has been dark for a week")
        .await;

    // Non-fatal by contract: a visible failure line, then the next prompt.
    assert!(reply.lines.iter().any(|l| l.contains("Failed to refine")));
    assert_eq!(filler.state(), FillState::AwaitingCategory);

    filler.handle_message(&mut client, "ELECTRICITY").await;
    let reply = filler.handle_message(&mut client, "5th Avenue").await;

    let draft = reply.completed.expect("flow should still complete");
    assert_eq!(draft.title, "Streetlight out");
    assert_eq!(draft.description, "the streetlight has been dark for a week");
}

#[tokio::test]
async fn malformed_refinement_json_is_non_fatal() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/refine-description/"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "refined": "I could not help with that" })),
        )
        .mount(&server)
        .await;

    let mut client = client_for(&server).await;
    let mut filler = FormFiller::new();

    filler.handle_message(&mut client, "fill the form").await;
    filler.handle_message(&mut client, "Broken bench").await;
    let reply = filler
        .handle_message(&mut client, "a park bench is broken")
        .await;

    assert!(reply.lines.iter().any(|l| l.contains("Failed to refine")));
    assert_eq!(filler.state(), FillState::AwaitingCategory);
}

#[tokio::test]
async fn unknown_category_falls_back_to_other() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/refine-description/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(refined_body()))
        .mount(&server)
        .await;

    let mut client = client_for(&server).await;
    let mut filler = FormFiller::new();

    filler.handle_message(&mut client, "fill the form").await;
    filler.handle_message(&mut client, "t").await;
    filler.handle_message(&mut client, "d").await;
    filler.handle_message(&mut client, "potholes???").await;
    let reply = filler.handle_message(&mut client, "somewhere").await;

    assert_eq!(reply.completed.unwrap().category, Some(Category::Other));
}

#[tokio::test]
async fn idle_messages_go_to_general_chat() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/ai-chat/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "reply": "You can report it with 'fill the form'.",
        })))
        .expect(1)
        .mount(&server)
        .await;

    let mut client = client_for(&server).await;
    let mut filler = FormFiller::new();

    let reply = filler
        .handle_message(&mut client, "how do I report a pothole?")
        .await;
    assert_eq!(reply.lines, vec!["You can report it with 'fill the form'."]);
    assert_eq!(filler.state(), FillState::Idle);
}

#[tokio::test]
async fn chat_failure_is_absorbed_into_a_visible_line() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/ai-chat/"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let mut client = client_for(&server).await;
    let mut filler = FormFiller::new();

    let reply = filler.handle_message(&mut client, "hello?").await;
    assert_eq!(reply.lines, vec!["AI response failed."]);

    // An empty reply gets the fallback line instead.
    server.reset().await;
    Mock::given(method("POST"))
        .and(path("/api/ai-chat/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "reply": "" })))
        .mount(&server)
        .await;

    let reply = filler.handle_message(&mut client, "hello again?").await;
    assert_eq!(reply.lines, vec!["Sorry, I couldn't understand that."]);
}

#[tokio::test]
async fn transcript_records_both_sides() {
    let server = MockServer::start().await;
    let mut client = client_for(&server).await;
    let mut filler = FormFiller::new();

    filler.handle_message(&mut client, "fill the form").await;
    filler.handle_message(&mut client, "Garbage").await;

    let transcript = filler.transcript();
    assert_eq!(transcript.len(), 4);
    assert_eq!(transcript[0].message, "fill the form");
    assert!(transcript[1].message.contains("title"));
    assert_eq!(transcript[2].message, "Garbage");
}
