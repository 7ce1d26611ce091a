//! Output rendering for the chat application.
//!
//! This module provides a trait-based rendering abstraction so the chat
//! driver does not care whether it writes to a terminal or to a test buffer.
//! The default implementation uses ANSI escape codes to tell the speakers
//! apart.

use std::io::{self, Stdout, Write};

use crate::types::{ChatSession, Message, Role};

/// ANSI escape code for dim text (used for info and status lines).
const ANSI_DIM: &str = "\x1b[2m";

/// ANSI escape code for bold text (used for speaker labels).
const ANSI_BOLD: &str = "\x1b[1m";

/// ANSI escape code to reset all styling.
const ANSI_RESET: &str = "\x1b[0m";

/// ANSI escape code for cyan text (used for the assistant).
const ANSI_CYAN: &str = "\x1b[36m";

/// ANSI escape code for yellow text (used for the user).
const ANSI_YELLOW: &str = "\x1b[33m";

/// ANSI escape code for red text (used for errors).
const ANSI_RED: &str = "\x1b[31m";

/// Label shown before assistant messages.
pub const ASSISTANT_LABEL: &str = "Teman Wisata";

/// Label shown before user messages.
pub const USER_LABEL: &str = "Kamu";

/// Trait for rendering chat output.
pub trait Renderer: Send {
    /// Print one transcript message with its speaker label.
    fn print_message(&mut self, message: &Message);

    /// Print an error message.
    fn print_error(&mut self, error: &str);

    /// Print an informational message.
    fn print_info(&mut self, info: &str);

    /// Show a loading indicator while a reply is being fetched.
    fn start_pending(&mut self, status: &str);

    /// Remove the loading indicator.
    fn finish_pending(&mut self);

    /// Print every message of a session in order.
    fn print_transcript(&mut self, session: &ChatSession) {
        for message in &session.messages {
            self.print_message(message);
        }
    }
}

/// Plain text renderer with optional ANSI styling.
pub struct PlainTextRenderer {
    stdout: Stdout,
    use_color: bool,
    pending: bool,
}

impl PlainTextRenderer {
    /// Creates a new PlainTextRenderer with ANSI colors enabled.
    pub fn new() -> Self {
        Self::with_color(true)
    }

    /// Creates a new PlainTextRenderer with specified color setting.
    pub fn with_color(use_color: bool) -> Self {
        Self {
            stdout: io::stdout(),
            use_color,
            pending: false,
        }
    }

    /// Flushes stdout to ensure immediate display.
    fn flush(&mut self) {
        let _ = self.stdout.flush();
    }

    fn clear_pending(&mut self) {
        if self.pending {
            if self.use_color {
                print!("\r\x1b[2K");
            } else {
                println!();
            }
            self.pending = false;
        }
    }
}

impl Default for PlainTextRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl Renderer for PlainTextRenderer {
    fn print_message(&mut self, message: &Message) {
        self.clear_pending();
        let (label, color) = match message.role {
            Role::User => (USER_LABEL, ANSI_YELLOW),
            Role::Assistant => (ASSISTANT_LABEL, ANSI_CYAN),
            Role::System => ("system", ANSI_DIM),
        };
        if self.use_color {
            println!("{ANSI_BOLD}{color}{label}:{ANSI_RESET}");
        } else {
            println!("{label}:");
        }
        println!("{}\n", message.content);
        self.flush();
    }

    fn print_error(&mut self, error: &str) {
        self.clear_pending();
        if self.use_color {
            eprintln!("{ANSI_RED}Error: {error}{ANSI_RESET}");
        } else {
            eprintln!("Error: {error}");
        }
    }

    fn print_info(&mut self, info: &str) {
        self.clear_pending();
        if self.use_color {
            println!("{ANSI_DIM}{info}{ANSI_RESET}");
        } else {
            println!("{info}");
        }
    }

    fn start_pending(&mut self, status: &str) {
        self.clear_pending();
        if self.use_color {
            print!("{ANSI_DIM}{status}{ANSI_RESET}");
        } else {
            print!("{status}");
        }
        self.pending = true;
        self.flush();
    }

    fn finish_pending(&mut self) {
        self.clear_pending();
        self.flush();
    }
}
