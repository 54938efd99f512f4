// Chat session for the terminal front end

use crate::router::{Answer, QueryRouter};
use crate::Result;
use chrono::{DateTime, Utc};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tracing::info;
use uuid::Uuid;

pub const GREETING: &str =
    "👋 Hai! Mau masak apa hari ini? Tanya aja judul, bahan, atau cara masaknya ya~";

const EXIT_COMMANDS: &[&str] = &["exit", "quit", "keluar"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    User,
    Assistant,
}

#[derive(Debug, Clone)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
    pub at: DateTime<Utc>,
}

/// In-memory conversation; display history only, routing stays stateless
#[derive(Debug, Clone)]
pub struct ChatSession {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    messages: Vec<ChatMessage>,
}

impl Default for ChatSession {
    fn default() -> Self {
        Self::new()
    }
}

impl ChatSession {
    pub fn new() -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            created_at: now,
            messages: vec![ChatMessage {
                role: Role::Assistant,
                content: GREETING.to_string(),
                at: now,
            }],
        }
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    fn push(&mut self, role: Role, content: String) {
        self.messages.push(ChatMessage {
            role,
            content,
            at: Utc::now(),
        });
    }

    /// Record the user's text, answer it, and record the reply
    pub async fn ask(&mut self, router: &QueryRouter, text: &str) -> Answer {
        self.push(Role::User, text.to_string());
        let answer = router.answer(text).await;
        self.push(Role::Assistant, answer.text.clone());
        answer
    }
}

/// Read questions line by line until EOF or an exit command
pub async fn run_repl<R, W>(router: &QueryRouter, input: R, mut output: W) -> Result<ChatSession>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut session = ChatSession::new();
    info!("Chat session {} started", session.id);

    output.write_all(format!("{GREETING}\n").as_bytes()).await?;

    let mut lines = input.lines();
    loop {
        output.write_all(b"\n> ").await?;
        output.flush().await?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        let text = line.trim();
        if text.is_empty() {
            continue;
        }
        if EXIT_COMMANDS.iter().any(|c| text.eq_ignore_ascii_case(c)) {
            break;
        }

        let answer = session.ask(router, text).await;
        output
            .write_all(format!("\n{}\n", answer.text).as_bytes())
            .await?;
    }

    output.write_all("\nSampai jumpa! 🍲\n".as_bytes()).await?;
    output.flush().await?;

    info!(
        "Chat session {} ended after {} messages",
        session.id,
        session.messages().len()
    );
    Ok(session)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RouterConfig;
    use crate::dataset::{Recipe, RecipeTable};

    fn router() -> QueryRouter {
        QueryRouter::new(
            RecipeTable::new(vec![Recipe::new(
                "Pisang Goreng",
                "pisang--tepung",
                "Celup pisang ke adonan lalu goreng.",
            )]),
            RouterConfig::default(),
        )
    }

    #[test]
    fn test_new_session_starts_with_greeting() {
        let session = ChatSession::new();
        assert_eq!(session.messages().len(), 1);
        assert_eq!(session.messages()[0].role, Role::Assistant);
        assert_eq!(session.messages()[0].content, GREETING);
    }

    #[tokio::test]
    async fn test_ask_records_both_turns() {
        let router = router();
        let mut session = ChatSession::new();

        let answer = session.ask(&router, "pisang goreng").await;

        let messages = session.messages();
        assert_eq!(messages.len(), 3);
        assert_eq!(messages[1].role, Role::User);
        assert_eq!(messages[1].content, "pisang goreng");
        assert_eq!(messages[2].role, Role::Assistant);
        assert_eq!(messages[2].content, answer.text);
        assert!(answer.text.starts_with("🍽 Pisang Goreng"));
    }

    #[tokio::test]
    async fn test_repl_stops_on_exit() {
        let router = router();
        let input: &[u8] = b"pisang goreng\n\n   \nkeluar\npisang goreng\n";
        let mut output = Vec::new();

        let session = run_repl(&router, input, &mut output).await.unwrap();

        // greeting + one question + one answer
        assert_eq!(session.messages().len(), 3);
        let printed = String::from_utf8(output).unwrap();
        assert!(printed.starts_with(GREETING));
        assert!(printed.contains("🍽 Pisang Goreng"));
        assert!(printed.contains("Sampai jumpa!"));
    }

    #[tokio::test]
    async fn test_repl_stops_on_eof() {
        let router = router();
        let input: &[u8] = b"pisang goreng";
        let mut output = Vec::new();

        let session = run_repl(&router, input, &mut output).await.unwrap();
        assert_eq!(session.messages().len(), 3);
    }
}
