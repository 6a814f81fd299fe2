//! Color and formatting utilities for terminal output

pub struct Colors;

impl Colors {
    pub const RESET: &'static str = "\x1b[0m";
    pub const BOLD: &'static str = "\x1b[1m";
    pub const DIM: &'static str = "\x1b[2m";

    // Basic colors
    pub const RED: &'static str = "\x1b[31m";
    pub const GREEN: &'static str = "\x1b[32m";
    pub const YELLOW: &'static str = "\x1b[33m";
    pub const CYAN: &'static str = "\x1b[36m";

    // Bright colors
    pub const BRIGHT_RED: &'static str = "\x1b[91m";
    pub const BRIGHT_GREEN: &'static str = "\x1b[92m";
    pub const BRIGHT_CYAN: &'static str = "\x1b[96m";
    pub const BRIGHT_WHITE: &'static str = "\x1b[97m";
}

/// Apply color to text if terminal supports it
pub fn colorize(text: &str, color: &str) -> String {
    if supports_formatting() {
        format!("{}{}{}", color, text, Colors::RESET)
    } else {
        text.to_string()
    }
}

/// Enhanced terminal capability detection
pub fn supports_formatting() -> bool {
    use std::env;
    use std::io::IsTerminal;

    // Check if colors are explicitly disabled
    if env::var("NO_COLOR").is_ok() || env::var("FORCE_COLOR").as_deref() == Ok("0") {
        return false;
    }

    // Force enable if explicitly requested
    if env::var("FORCE_COLOR").is_ok() {
        return true;
    }

    // Disable formatting when running tests
    if cfg!(test) {
        return false;
    }

    // Check if output is being redirected
    if !std::io::stdout().is_terminal() {
        return false;
    }

    // Check TERM environment variable
    if let Ok(term) = env::var("TERM") {
        if term == "dumb" || term.is_empty() {
            return false;
        }

        if term.contains("color")
            || term.contains("256")
            || term.starts_with("xterm")
            || term.starts_with("screen")
            || term.starts_with("tmux")
            || term == "linux"
        {
            return true;
        }
    }

    // Check for modern terminal programs
    if let Ok(term_program) = env::var("TERM_PROGRAM") {
        matches!(
            term_program.as_str(),
            "Apple_Terminal" | "iTerm.app" | "vscode" | "Hyper" | "Alacritty" | "kitty" | "WezTerm"
        )
    } else {
        false
    }
}
