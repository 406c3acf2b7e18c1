//! `cogwork agent` — Interactive or single-message chat mode.

use std::io::Write;
use std::sync::Arc;

use anyhow::Context;
use cogwork_agent::{Agent, AugmentedGateway};
use cogwork_config::AppConfig;
use cogwork_core::event::{AgentEvent, EventBus};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::broadcast;
use tracing::debug;

pub async fn run(message: Option<String>) -> anyhow::Result<()> {
    let config = AppConfig::load().context("Failed to load config")?;
    let backend_name = config.default_provider.clone();

    // Check for an API key early — give a clear error
    if backend_name != "mock" && config.api_key_for(&backend_name).is_none() {
        eprintln!();
        eprintln!("  ERROR: No API key configured!");
        eprintln!();
        eprintln!("  Set one of these environment variables:");
        eprintln!("    COGWORK_API_KEY=sk-...      (generic)");
        eprintln!("    OPENAI_API_KEY=sk-...       (for OpenAI)");
        eprintln!("    ANTHROPIC_API_KEY=sk-...    (for Anthropic)");
        eprintln!();
        eprintln!("  Or add it to your config file:");
        eprintln!(
            "    {}",
            AppConfig::config_dir().join("config.toml").display()
        );
        eprintln!();
        anyhow::bail!("No API key found. See above for setup instructions.");
    }

    let backend = cogwork_providers::gateway_from_config(&config)
        .context("Failed to initialize model backend")?;
    let catalog = Arc::new(cogwork_tools::default_catalog());

    debug!(
        backend = %backend_name,
        model = %config.model_for(&backend_name),
        tools = catalog.len(),
        "Agent wiring resolved"
    );

    let events = Arc::new(EventBus::default());
    let gateway = AugmentedGateway::new(backend).with_max_turns(config.agent.max_memories);
    let mut agent = Agent::new(
        &config.agent.name,
        &config.agent.instructions,
        gateway,
        catalog,
    )
    .with_max_iterations(config.agent.max_iterations)
    .with_recent_window(config.agent.recent_turns)
    .with_event_bus(events.clone());

    if let Some(msg) = message {
        // Single message mode
        let mut rx = events.subscribe();

        eprint!("  Thinking...");
        let result = agent.run(&msg).await;
        eprint!("\r             \r");

        let answer = result?;
        println!("{answer}");
        print_run_summary(&mut rx);
        return Ok(());
    }

    // Interactive mode
    println!();
    println!("  Cogwork Agent — Interactive Mode");
    println!("  ================================");
    println!();
    println!("  Backend:  {backend_name}");
    println!("  Model:    {}", config.model_for(&backend_name));
    println!("  Tools:    {}", agent.available_tools().len());
    println!("  Agent:    {}", agent.name());
    println!();
    println!("  Type your message and press Enter.");
    println!("  Type 'exit' or Ctrl+D to quit.");
    println!();

    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    print!("  You > ");
    std::io::stdout().flush()?;

    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line.is_empty() {
            print!("  You > ");
            std::io::stdout().flush()?;
            continue;
        }
        if matches!(line, "exit" | "quit" | "/exit" | "/quit" | ":q") {
            break;
        }

        let mut rx = events.subscribe();
        eprint!("  ...");

        match agent.run(line).await {
            Ok(answer) => {
                eprint!("\r     \r");
                println!();
                for answer_line in answer.lines() {
                    println!("  Assistant > {answer_line}");
                }
                print_run_summary(&mut rx);
                println!();
            }
            Err(e) => {
                eprint!("\r     \r");
                eprintln!("  [Error] {e}");
                println!();
            }
        }

        print!("  You > ");
        std::io::stdout().flush()?;
    }

    println!();
    println!("  Goodbye!");
    println!();

    Ok(())
}

/// Drain the events of a finished run and print a one-line summary.
fn print_run_summary(rx: &mut broadcast::Receiver<Arc<AgentEvent>>) {
    let mut iterations = None;
    let mut tool_calls = 0;
    let mut total_tokens: u32 = 0;

    while let Ok(event) = rx.try_recv() {
        match event.as_ref() {
            AgentEvent::ResponseGenerated {
                usage: Some(usage), ..
            } => total_tokens += usage.total_tokens,
            AgentEvent::ToolExecuted { .. } => tool_calls += 1,
            AgentEvent::RunCompleted { iterations: n, .. } => iterations = Some(*n),
            _ => {}
        }
    }

    if let Some(n) = iterations {
        eprintln!("  [{n} iteration(s), {tool_calls} tool call(s), {total_tokens} tokens]");
    }
}
