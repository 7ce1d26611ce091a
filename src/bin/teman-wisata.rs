//! Interactive chat with Teman Wisata, a travel and culture companion for
//! Indonesia.
//!
//! # Usage
//!
//! ```bash
//! # Chat with the default free model, history in ./chat_history.json
//! teman-wisata
//!
//! # Use another model and keep files elsewhere
//! teman-wisata --model meta-llama/llama-3.3-70b-instruct \
//!     --history-file ~/.teman-wisata/history.json --key-file ~/.teman-wisata/key
//!
//! # Disable colors (useful for piping output)
//! teman-wisata --no-color
//! ```
//!
//! # Commands
//!
//! While chatting, you can use slash commands:
//! - `/help` - Show available commands
//! - `/new` - Start a new chat
//! - `/list`, `/select <n>`, `/delete <n>` - Manage chats
//! - `/region <name>` - Focus answers on a region
//! - `/key <api-key>` - Save your OpenRouter API key
//! - `/quit` - Exit the application

use arrrg::CommandLine;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use teman_wisata::chat::{
    ChatApp, ChatArgs, ChatCommand, ChatConfig, MISSING_KEY_NOTICE, PlainTextRenderer, Renderer,
    help_text, parse_command,
};
use teman_wisata::{Error, Region};

/// Main entry point for the teman-wisata application.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    let (args, _) = ChatArgs::from_command_line_relaxed("teman-wisata [OPTIONS]");
    let config = ChatConfig::from(args);

    let mut app = ChatApp::open(&config)?;
    let mut renderer = PlainTextRenderer::with_color(config.use_color);
    let mut rl = DefaultEditor::new()?;

    println!("Teman Wisata");
    println!("Sahabat Perjalanan & Budaya Indonesia");
    print_status(&app);
    println!("Type /help for commands, /quit to exit\n");
    show_current(&app, &mut renderer);

    // A chat left unanswered by a previous run is answered first.
    if app.state().is_pending() && app.status().api_key_active {
        let outcome = app.respond_rendered(&mut renderer).await;
        report_unrendered(&mut renderer, outcome);
    }

    loop {
        let prompt = format!("{} ", app.context().placeholder());
        let readline = rl.readline(&prompt);

        match readline {
            Ok(line) => {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }

                let _ = rl.add_history_entry(line);

                // Check for slash commands
                if let Some(cmd) = parse_command(line) {
                    match cmd {
                        ChatCommand::Quit => {
                            println!("Sampai jumpa!");
                            break;
                        }
                        ChatCommand::Help => {
                            for line in help_text().lines() {
                                println!("    {}", line);
                            }
                        }
                        ChatCommand::New => match app.new_chat().map(|_| ()) {
                            Ok(_) => show_current(&app, &mut renderer),
                            Err(err) => renderer.print_error(&err.to_string()),
                        },
                        ChatCommand::List => print_chats(&app),
                        ChatCommand::Select(selector) => match app.select(&selector).map(|_| ()) {
                            Ok(_) => {
                                show_current(&app, &mut renderer);
                                if app.state().is_pending() {
                                    renderer.print_info(
                                        "This chat has an unanswered message. Use /retry to ask again.",
                                    );
                                }
                            }
                            Err(err) => renderer.print_error(&err.to_string()),
                        },
                        ChatCommand::Delete(selector) => match app.delete(&selector) {
                            Ok(title) => {
                                renderer.print_info(&format!("Deleted chat: {title}"));
                                show_current(&app, &mut renderer);
                            }
                            Err(err) => renderer.print_error(&err.to_string()),
                        },
                        ChatCommand::Region(name) => match name.parse::<Region>() {
                            Ok(region) => {
                                renderer.print_info(&format!("Fokus daerah: {region}"));
                                app.set_region(Some(region));
                            }
                            Err(err) => renderer.print_error(&err),
                        },
                        ChatCommand::ClearRegion => {
                            app.set_region(None);
                            renderer.print_info("Regional focus cleared.");
                        }
                        ChatCommand::Key(secret) => match app.set_api_key(&secret) {
                            Ok(true) => renderer.print_info("API Key tersimpan otomatis!"),
                            Ok(false) => renderer.print_info("API key unchanged."),
                            Err(err) => renderer.print_error(&err.to_string()),
                        },
                        ChatCommand::Status => print_status(&app),
                        ChatCommand::Ideas => print_suggestions(&app, &mut renderer),
                        ChatCommand::Ask(n) => match app.ask_suggestion(n) {
                            Ok(()) => {
                                if let Some(message) =
                                    app.current().and_then(|chat| chat.last_message())
                                {
                                    renderer.print_message(message);
                                }
                                let outcome = app.respond_rendered(&mut renderer).await;
                                report_unrendered(&mut renderer, outcome);
                            }
                            Err(err) => report(&mut renderer, &err),
                        },
                        ChatCommand::Retry => {
                            if app.state().is_pending() {
                                let outcome = app.respond_rendered(&mut renderer).await;
                                report_unrendered(&mut renderer, outcome);
                            } else {
                                renderer.print_info("Nothing to retry.");
                            }
                        }
                        ChatCommand::History => show_current(&app, &mut renderer),
                        ChatCommand::Invalid(message) => {
                            renderer.print_error(&message);
                        }
                    }
                    continue;
                }

                // Regular message - send to API
                let outcome = app.converse(line, &mut renderer).await;
                report_unrendered(&mut renderer, outcome);
            }
            Err(ReadlineError::Interrupted) => {
                // Ctrl+C at prompt - soft interrupt
                println!();
                continue;
            }
            Err(ReadlineError::Eof) => {
                // Ctrl+D - exit
                println!("\nSampai jumpa!");
                break;
            }
            Err(err) => {
                renderer.print_error(&format!("Input error: {}", err));
                break;
            }
        }
    }

    Ok(())
}

/// Initialize tracing subscriber with environment filter
fn init_tracing() {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("teman_wisata=warn"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn report(renderer: &mut dyn Renderer, err: &Error) {
    if err.is_precondition() {
        renderer.print_info(MISSING_KEY_NOTICE);
    } else {
        renderer.print_error(&err.to_string());
    }
}

fn report_unrendered(renderer: &mut dyn Renderer, outcome: Result<(), Error>) {
    if let Err(err) = outcome {
        if !ChatApp::renders_failure(&err) {
            report(renderer, &err);
        }
    }
}

fn show_current(app: &ChatApp, renderer: &mut dyn Renderer) {
    if let Some(chat) = app.current() {
        renderer.print_info(&format!("== {} ({}) ==", chat.title, chat.timestamp));
        renderer.print_transcript(chat);
    }
    if app.suggestions().is_some() {
        print_suggestions(app, renderer);
    }
}

fn print_suggestions(app: &ChatApp, renderer: &mut dyn Renderer) {
    match app.suggestions() {
        Some(suggestions) => {
            renderer.print_info("Ide Pertanyaan (use /ask <n>):");
            for (i, question) in suggestions.iter().enumerate() {
                renderer.print_info(&format!("  {}. {}", i + 1, question));
            }
        }
        None => renderer.print_info("Suggestions are shown in a fresh chat (/new)."),
    }
}

fn print_chats(app: &ChatApp) {
    let current = app.current().map(|chat| chat.id.as_str());
    println!("    Riwayat Chat:");
    for (i, chat) in app.sessions().sessions().iter().enumerate() {
        let marker = if Some(chat.id.as_str()) == current {
            "*"
        } else {
            " "
        };
        println!(
            "    {marker} {}. {}  [{}  {}]",
            i + 1,
            chat.title,
            chat.timestamp,
            short_id(&chat.id)
        );
    }
}

/// First eight characters of a session id.
fn short_id(id: &str) -> String {
    id.chars().take(8).collect()
}

fn print_status(app: &ChatApp) {
    let status = app.status();
    println!("    Status API: {}", status.api_key_label());
    println!("    Model: {}", status.model);
    match status.region {
        Some(ref region) => println!("    Fokus daerah: {region}"),
        None => println!("    Fokus daerah: (none)"),
    }
    println!(
        "    Chat: {} ({} messages, {})",
        status.current_title, status.message_count, status.state
    );
    println!("    Chats: {}", status.chat_count);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_id_counts_characters() {
        assert_eq!(short_id("3fa85f64-5717-4562"), "3fa85f64");
        assert_eq!(short_id("abc"), "abc");
        assert_eq!(short_id("ñandú-ñandú-ñandú"), "ñandú-ña");
    }
}
