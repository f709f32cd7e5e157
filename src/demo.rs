//! Sample components mounted by the demo server.

use std::sync::Arc;

use async_trait::async_trait;
use liveview_core::ComponentHandle;
use liveview_protocols::{
    ClientAction, ClientEvent, ComponentError, ConnectionHandle, QueryParameters,
    RoutableComponent, ServerCommand,
};
use parking_lot::Mutex;
use serde_json::{Value, json};
use uuid::Uuid;

/// Component set of one session.
pub fn components() -> Vec<ComponentHandle> {
    vec![
        Arc::new(CounterPage::new()) as ComponentHandle,
        Arc::new(ProfilePage::new()) as ComponentHandle,
    ]
}

/// Page shown for URLs no component is mounted at.
pub fn not_found_page() -> String {
    r#"<main><h1>Not found</h1><p><a href="/" live-href>Back to the counter</a></p></main>"#
        .to_string()
}

fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}

/// Counter at `/`.
#[derive(Default)]
pub struct CounterPage {
    count: Mutex<i64>,
}

impl CounterPage {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RoutableComponent for CounterPage {
    fn path(&self) -> &str {
        "/"
    }

    fn context_snapshot(&self) -> Option<Value> {
        Some(json!({ "count": *self.count.lock() }))
    }

    fn load_from_context(&self, context: Value) -> Result<(), ComponentError> {
        let count = context
            .get("count")
            .and_then(Value::as_i64)
            .ok_or_else(|| ComponentError::InvalidContext("missing integer `count`".into()))?;
        *self.count.lock() = count;
        Ok(())
    }

    async fn base_template(&self) -> Result<String, ComponentError> {
        let count = *self.count.lock();
        Ok(format!(
            r#"<main live-load id="counter">
<h1>Counter</h1>
<p>Count: <span id="count">{count}</span></p>
<button id="increment" live-action>+1</button>
<button id="reset" live-action>Reset</button>
<p><a href="/profile?id=42" live-href>Profile 42</a></p>
</main>"#
        ))
    }

    async fn receive_event(
        &self,
        connection: &ConnectionHandle,
        event: &ClientEvent,
    ) -> Result<(), ComponentError> {
        match event.known_action() {
            Some(ClientAction::LiveLoad) => {
                self.send_command(&**connection, &ServerCommand::set_title("Counter"))
                    .await;
            }
            Some(ClientAction::LiveAction) => {
                let count = {
                    let mut count = self.count.lock();
                    match event.id.as_deref() {
                        Some("increment") => *count += 1,
                        Some("reset") => *count = 0,
                        other => {
                            return Err(ComponentError::EventFailed(format!(
                                "unknown counter action {:?}",
                                other
                            )));
                        }
                    }
                    *count
                };
                self.send_command(
                    &**connection,
                    &ServerCommand::update_node_value("#count", count.to_string()),
                )
                .await;
            }
            _ => {}
        }
        Ok(())
    }
}

/// Profile at `/profile?id=..`.
#[derive(Default)]
pub struct ProfilePage {
    profile_id: Mutex<Option<String>>,
}

impl ProfilePage {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RoutableComponent for ProfilePage {
    fn path(&self) -> &str {
        "/profile"
    }

    async fn base_template(&self) -> Result<String, ComponentError> {
        let body = match self.profile_id.lock().as_deref() {
            Some(id) => format!(
                r#"<h1>Profile {}</h1>
<input id="name" placeholder="Your name" live-input>
<p id="greeting"></p>"#,
                escape_html(id)
            ),
            None => "<h1>No profile selected</h1>".to_string(),
        };
        Ok(format!(
            r#"<main>
{body}
<p><a href="/" live-href>Back to the counter</a></p>
</main>"#
        ))
    }

    fn set_query_parameters(&self, parameters: QueryParameters, _router_id: Uuid) {
        *self.profile_id.lock() = parameters.get("id").cloned();
    }

    fn clean_up(&self, _router_id: Uuid) {
        *self.profile_id.lock() = None;
    }

    async fn receive_event(
        &self,
        connection: &ConnectionHandle,
        event: &ClientEvent,
    ) -> Result<(), ComponentError> {
        if event.known_action() == Some(ClientAction::LiveInput) {
            let name = event.value.as_deref().unwrap_or_default().trim();
            let greeting = if name.is_empty() {
                String::new()
            } else {
                format!("Hello, {name}!")
            };
            self.send_command(
                &**connection,
                &ServerCommand::update_node_value("#greeting", greeting),
            )
            .await;
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "demo_tests.rs"]
mod tests;
