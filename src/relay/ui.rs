//! UI route handler for the relay.
//!
//! The root handler serves an embedded single-page chat client that talks
//! to `POST /api/chat`. The page is an opaque asset — the API surface is
//! what the rest of the crate specifies and tests.

use axum::response::Html;

// ── Root page ─────────────────────────────────────────────────────────────────

const ROOT_INDEX_HTML: &str = r#"<!doctype html>
<html lang="en">
<head>
  <meta charset="utf-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1" />
  <title>Chat</title>
  <style>
    *, *::before, *::after { box-sizing: border-box; margin: 0; padding: 0; }
    body {
      font-family: system-ui, -apple-system, sans-serif;
      background: #0b141a; color: #e9edef;
      display: flex; align-items: center; justify-content: center;
      height: 100vh;
    }
    .app {
      display: flex; flex-direction: column;
      width: min(480px, 100vw); height: min(720px, 100vh);
      background: #111b21; border: 1px solid #222e35; border-radius: 12px;
      overflow: hidden;
    }
    header {
      padding: 0.9rem 1.2rem; background: #202c33;
      font-weight: 600; font-size: 1rem;
    }
    #chat {
      flex: 1; overflow-y: auto; padding: 1rem;
      display: flex; flex-direction: column; gap: 0.4rem;
    }
    .bubble {
      max-width: 80%; padding: 0.5rem 0.8rem;
      border-radius: 8px; font-size: 0.92rem; line-height: 1.35;
      white-space: pre-wrap; word-break: break-word;
    }
    .from-me   { align-self: flex-end;   background: #005c4b; }
    .from-them { align-self: flex-start; background: #202c33; }
    form {
      display: flex; gap: 0.5rem; padding: 0.7rem; background: #202c33;
    }
    input {
      flex: 1; padding: 0.6rem 0.9rem; border: none; border-radius: 20px;
      background: #2a3942; color: #e9edef; font-size: 0.95rem; outline: none;
    }
    button {
      padding: 0.6rem 1.2rem; border: none; border-radius: 20px;
      background: #00a884; color: #111b21; font-weight: 600; cursor: pointer;
    }
    button:disabled { opacity: 0.5; cursor: default; }
  </style>
</head>
<body>
  <div class="app">
    <header>Chat</header>
    <div id="chat"></div>
    <form id="composer">
      <input id="message" autocomplete="off" placeholder="Type a message" />
      <button id="send" type="submit">Send</button>
    </form>
  </div>
  <script>
    const chat = document.getElementById('chat');
    const input = document.getElementById('message');
    const send = document.getElementById('send');

    function bubble(text, mine) {
      const div = document.createElement('div');
      div.className = 'bubble ' + (mine ? 'from-me' : 'from-them');
      div.textContent = text;
      chat.appendChild(div);
      chat.scrollTop = chat.scrollHeight;
    }

    document.getElementById('composer').addEventListener('submit', async (ev) => {
      ev.preventDefault();
      const message = input.value.trim();
      if (!message) return;
      bubble(message, true);
      input.value = '';
      send.disabled = true;
      try {
        const res = await fetch('/api/chat', {
          method: 'POST',
          headers: { 'Content-Type': 'application/json' },
          body: JSON.stringify({ message }),
        });
        const data = await res.json();
        bubble(data.reply ?? data.error ?? 'no reply', false);
      } catch (err) {
        bubble('Connection error: ' + err, false);
      } finally {
        send.disabled = false;
        input.focus();
      }
    });
  </script>
</body>
</html>
"#;

// ── Handlers ──────────────────────────────────────────────────────────────────

/// GET / — embedded chat page.
pub(super) async fn root() -> Html<&'static str> {
    Html(ROOT_INDEX_HTML)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_posts_to_the_chat_endpoint() {
        assert!(ROOT_INDEX_HTML.contains("/api/chat"));
        assert!(ROOT_INDEX_HTML.contains("message"));
    }
}
