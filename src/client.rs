//! Host page and the inline browser client.
//!
//! Every path not claimed by the transport routes answers with the same
//! host page. The inlined client reuses the token kept in `sessionStorage`
//! (fetching one on first load), opens the WebSocket with
//! the page's own URL as `initialURL` and applies incoming server commands.

use std::sync::Arc;

use axum::Router;
use axum::extract::State;
use axum::response::Html;
use liveview_api::{RouteConfig, inject_script};

const HOST_PAGE: &str = r#"<!DOCTYPE html>
<html>
<head>
<meta charset="utf-8">
<title>LiveView</title>
</head>
<body>
<p>Connecting...</p>
</body>
</html>"#;

const CLIENT_SCRIPT: &str = r#"
(function () {
  "use strict";
  const TOKEN_PATH = __TOKEN_PATH__;
  const WEBSOCKET_PATH = __WEBSOCKET_PATH__;
  const TOKEN_KEY = "authToken";
  let socket = null;
  let token = "";

  function find(target) {
    return document.querySelector(target) || document.getElementById(target);
  }

  function send(action, element, value) {
    if (!socket || socket.readyState !== WebSocket.OPEN) {
      return;
    }
    socket.send(JSON.stringify({
      id: element && element.id ? element.id : null,
      value: value === null || value === undefined ? null : String(value),
      action: action,
      authToken: token,
    }));
  }

  function once(element, marker) {
    if (element.dataset[marker]) {
      return false;
    }
    element.dataset[marker] = "1";
    return true;
  }

  function wire(root) {
    root.querySelectorAll("[live-href]").forEach(function (element) {
      if (!once(element, "liveHref")) return;
      element.addEventListener("click", function (event) {
        event.preventDefault();
        const href = element.getAttribute("href");
        history.pushState({}, "", href);
        send("live-href", element, href);
      });
    });
    root.querySelectorAll("[live-action]").forEach(function (element) {
      if (!once(element, "liveAction")) return;
      element.addEventListener("click", function (event) {
        event.preventDefault();
        send("live-action", element, element.getAttribute("live-action") || null);
      });
    });
    root.querySelectorAll("[live-input]").forEach(function (element) {
      if (!once(element, "liveInput")) return;
      element.addEventListener("input", function () {
        send("live-input", element, element.value);
      });
    });
    root.querySelectorAll("[live-load]").forEach(function (element) {
      if (!once(element, "liveLoad")) return;
      send("live-load", element, null);
    });
  }

  function setAttributes(element, attributes, remove) {
    attributes.forEach(function (attribute) {
      if (remove) {
        element.removeAttribute(attribute.name);
      } else {
        element.setAttribute(attribute.name, attribute.value);
      }
    });
  }

  function apply(command) {
    const tag = Object.keys(command.action)[0];
    const args = command.action[tag];
    const element = args.target ? find(args.target) : null;
    if (args.target && !element) {
      console.warn("liveview: no element for", tag, args.target);
      return;
    }
    switch (tag) {
      case "replaceBody":
        document.body.innerHTML = command.value;
        wire(document.body);
        break;
      case "insertNode":
        element.innerHTML = command.value;
        wire(element);
        break;
      case "appendNode":
        element.insertAdjacentHTML("beforeend", command.value);
        wire(element);
        break;
      case "remove":
        document.querySelectorAll(args.selector).forEach(function (node) {
          node.remove();
        });
        break;
      case "setTitle":
        document.title = args.title;
        break;
      case "addAttribute":
      case "updateAttribute":
        setAttributes(element, args.attributes, false);
        wire(element.parentNode || document.body);
        break;
      case "removeAttribute":
        setAttributes(element, args.attributes, true);
        break;
      case "addStyle": {
        const style = document.createElement("style");
        style.textContent = command.value;
        document.head.appendChild(style);
        break;
      }
      case "addStyleTo":
        Object.assign(element.style, JSON.parse(command.value));
        break;
      case "removeStyle":
        element.removeAttribute("style");
        break;
      case "setInput":
        element.value = command.value;
        break;
      case "updateNodeValue":
        element.textContent = command.value;
        break;
      default:
        console.warn("liveview: unknown command", tag);
    }
  }

  function connect() {
    const scheme = location.protocol === "https:" ? "wss://" : "ws://";
    const initialURL = location.pathname + location.search;
    const url = scheme + location.host + WEBSOCKET_PATH
      + "?authToken=" + encodeURIComponent(token)
      + "&initialURL=" + encodeURIComponent(initialURL);
    socket = new WebSocket(url);
    socket.onmessage = function (message) {
      apply(JSON.parse(message.data));
    };
    socket.onclose = function () {
      console.info("liveview: connection closed");
    };
  }

  window.addEventListener("popstate", function () {
    send("live-href", null, location.pathname + location.search);
  });

  const cached = sessionStorage.getItem(TOKEN_KEY);
  if (cached) {
    token = cached;
    connect();
  } else {
    fetch(TOKEN_PATH, { cache: "no-store" })
      .then(function (response) { return response.text(); })
      .then(function (issued) {
        token = issued.trim();
        sessionStorage.setItem(TOKEN_KEY, token);
        connect();
      });
  }
})();
"#;

/// Client script with the transport paths filled in.
pub fn client_script(routes: &RouteConfig) -> String {
    CLIENT_SCRIPT
        .replace("__TOKEN_PATH__", &js_string(&routes.token_path))
        .replace("__WEBSOCKET_PATH__", &js_string(&routes.websocket_path))
}

/// The host page with the client inlined.
pub fn host_page(routes: &RouteConfig) -> String {
    inject_script(HOST_PAGE, &client_script(routes))
}

/// Router answering every unclaimed path with the host page.
pub fn page_routes(routes: &RouteConfig) -> Router {
    Router::new()
        .fallback(serve_page)
        .with_state(Arc::new(host_page(routes)))
}

async fn serve_page(State(page): State<Arc<String>>) -> Html<String> {
    Html(page.as_str().to_owned())
}

/// JSON string literals are valid JavaScript string literals.
fn js_string(text: &str) -> String {
    serde_json::Value::String(text.to_string()).to_string()
}
