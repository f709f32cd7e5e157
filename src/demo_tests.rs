use super::*;

use liveview_core::SessionRouter;

use crate::testing::SinkConnection;

fn action(id: &str) -> ClientEvent {
    ClientEvent::new("live-action", "token").with_id(id)
}

#[test]
fn test_components_paths() {
    let paths: Vec<String> = components().iter().map(|c| c.path().to_string()).collect();
    assert_eq!(paths, vec!["/", "/profile"]);
}

#[tokio::test]
async fn test_counter_increment_and_reset() {
    let counter = CounterPage::new();
    let sink = SinkConnection::new();
    let connection: ConnectionHandle = sink.clone();

    counter.receive_event(&connection, &action("increment")).await.unwrap();
    counter.receive_event(&connection, &action("increment")).await.unwrap();
    counter.receive_event(&connection, &action("reset")).await.unwrap();

    assert_eq!(
        sink.take(),
        vec![
            ServerCommand::update_node_value("#count", "1"),
            ServerCommand::update_node_value("#count", "2"),
            ServerCommand::update_node_value("#count", "0"),
        ]
    );
}

#[tokio::test]
async fn test_counter_unknown_action_fails() {
    let counter = CounterPage::new();
    let connection: ConnectionHandle = SinkConnection::new();

    let result = counter.receive_event(&connection, &action("explode")).await;

    assert!(matches!(result, Err(ComponentError::EventFailed(_))));
}

#[tokio::test]
async fn test_counter_load_sets_title() {
    let counter = CounterPage::new();
    let sink = SinkConnection::new();
    let connection: ConnectionHandle = sink.clone();

    counter
        .receive_event(&connection, &ClientEvent::new("live-load", "token"))
        .await
        .unwrap();

    assert_eq!(sink.take(), vec![ServerCommand::set_title("Counter")]);
}

#[tokio::test]
async fn test_counter_template_reflects_context() {
    let counter = CounterPage::new();
    counter.load_from_context(json!({ "count": 7 })).unwrap();

    let html = counter.base_template().await.unwrap();

    assert!(html.contains(r#"<span id="count">7</span>"#));
    assert_eq!(counter.context_snapshot(), Some(json!({ "count": 7 })));
}

#[test]
fn test_counter_rejects_bad_context() {
    let counter = CounterPage::new();
    let result = counter.load_from_context(json!({ "count": "seven" }));
    assert!(matches!(result, Err(ComponentError::InvalidContext(_))));
}

#[tokio::test]
async fn test_profile_renders_query_id() {
    let router = SessionRouter::new().with_components(components()).unwrap();
    let sink = SinkConnection::new();

    router.attach(sink.clone(), "/profile?id=42").await.unwrap();

    let commands = sink.take();
    assert_eq!(commands.len(), 1);
    assert!(commands[0].value.contains("<h1>Profile 42</h1>"));
}

#[tokio::test]
async fn test_profile_forgets_id_after_navigating_away() {
    let router = SessionRouter::new().with_components(components()).unwrap();
    let sink = SinkConnection::new();
    router.attach(sink.clone(), "/profile?id=42").await.unwrap();

    router.navigate("/").await.unwrap();
    router.navigate("/profile").await.unwrap();

    let last = sink.take().pop().unwrap();
    assert!(last.value.contains("No profile selected"));
}

#[tokio::test]
async fn test_profile_escapes_id() {
    let profile = ProfilePage::new();
    let mut parameters = QueryParameters::new();
    parameters.insert("id".to_string(), "<b>x</b>".to_string());
    profile.set_query_parameters(parameters, Uuid::new_v4());

    let html = profile.base_template().await.unwrap();

    assert!(html.contains("Profile &lt;b&gt;x&lt;/b&gt;"));
}

#[tokio::test]
async fn test_profile_greets_input() {
    let profile = ProfilePage::new();
    let sink = SinkConnection::new();
    let connection: ConnectionHandle = sink.clone();

    profile
        .receive_event(
            &connection,
            &ClientEvent::new("live-input", "token").with_value(" Ada "),
        )
        .await
        .unwrap();
    profile
        .receive_event(&connection, &ClientEvent::new("live-input", "token").with_value(""))
        .await
        .unwrap();

    assert_eq!(
        sink.take(),
        vec![
            ServerCommand::update_node_value("#greeting", "Hello, Ada!"),
            ServerCommand::update_node_value("#greeting", ""),
        ]
    );
}
