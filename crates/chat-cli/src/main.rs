//! Interactive terminal chat with the safety assistant.

mod session;

use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

use assistant_core::{AgentEvent, UserMessage};
use openrouter_agent::{OpenRouterAgent, OpenRouterConfig};
use safety_tools::{default_registry, ToolsConfig};
use session::ChatSession;
use tracing::info;

/// What one line of user input asks for.
enum Input {
    /// Send this message to the agent.
    Message(UserMessage),
    /// End the session.
    Quit,
    /// Nothing to do (blank line).
    Empty,
}

/// Parse one input line.
///
/// `/quit` and `/exit` end the session. `/image <path> <text>` attaches an
/// image to the message. Everything else is sent as-is.
fn parse_input(line: &str) -> Input {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return Input::Empty;
    }
    if trimmed == "/quit" || trimmed == "/exit" {
        return Input::Quit;
    }
    if let Some(rest) = trimmed.strip_prefix("/image ") {
        let mut parts = rest.trim().splitn(2, char::is_whitespace);
        let path = parts.next().unwrap_or("").to_string();
        let text = parts.next().unwrap_or("What do you see in this image?");
        return Input::Message(UserMessage::with_image(text.trim(), PathBuf::from(path)));
    }
    Input::Message(UserMessage::text(trimmed))
}

/// Print one streamed event.
fn print_event(event: &AgentEvent) {
    match event {
        AgentEvent::TextDelta(delta) => {
            print!("{}", delta);
            let _ = std::io::stdout().flush();
        }
        AgentEvent::ToolStarted { name } => {
            println!("\n[using {}...]", name);
        }
        AgentEvent::ToolCompleted {
            name,
            artifact_path,
        } => match artifact_path {
            Some(path) => println!("[{} wrote {}]", name, path.display()),
            None => println!("[{} done]", name),
        },
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt::init();

    let tools_config = ToolsConfig::from_env();
    if tools_config.mapbox_token.is_none() {
        info!("MAPBOX_ACCESS_TOKEN not set; map and directions tools will degrade");
    }
    if tools_config.twilio.is_none() {
        info!("Twilio credentials not set; case notifications will be written locally");
    }

    let registry = Arc::new(default_registry(tools_config));
    let agent_config = OpenRouterConfig::from_env()?;
    let agent = Arc::new(OpenRouterAgent::new(agent_config, registry));

    let mut session = ChatSession::new(agent);

    println!("Safety assistant ({})", session.agent_name());
    println!("Type a message, /image <path> <text> to attach a photo, /quit to exit.\n");

    let stdin = std::io::stdin();
    loop {
        print!("you> ");
        let _ = std::io::stdout().flush();

        let mut line = String::new();
        if stdin.read_line(&mut line)? == 0 {
            break;
        }

        let message = match parse_input(&line) {
            Input::Quit => break,
            Input::Empty => continue,
            Input::Message(message) => message,
        };

        session.send(message, print_event).await;
        println!("\n");
    }

    println!("Stay safe.");
    Ok(())
}
