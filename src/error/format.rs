use crate::error::{ErrorContext, FetchError};

struct Palette {
    red: &'static str,
    yellow: &'static str,
    cyan: &'static str,
    bold: &'static str,
    reset: &'static str,
}

impl Palette {
    fn new(use_color: bool) -> Self {
        if use_color {
            Self {
                red: "\x1b[31m",
                yellow: "\x1b[33m",
                cyan: "\x1b[36m",
                bold: "\x1b[1m",
                reset: "\x1b[0m",
            }
        } else {
            Self {
                red: "",
                yellow: "",
                cyan: "",
                bold: "",
                reset: "",
            }
        }
    }
}

/// Format an error for a terminal, with ANSI colors when `use_color` is set.
pub fn format_error_with_color(error: &FetchError, use_color: bool) -> String {
    let Palette {
        red,
        yellow,
        cyan,
        bold,
        reset,
    } = Palette::new(use_color);

    let context = ErrorContext::new(error);
    let mut output = format!("{red}{bold}Error:{reset} {error}\n");

    if let Some(details) = &context.details {
        output.push_str(&format!("\n{details}\n"));
    }

    if let Some(suggestion) = &context.suggestion {
        output.push_str(&format!("\n{yellow}{bold}Suggestions:{reset}\n"));
        for line in suggestion.lines().filter(|line| !line.trim().is_empty()) {
            output.push_str(&format!("{cyan}• {}{reset}\n", line.trim()));
        }
    }

    // Never leave the terminal in a colored state
    if use_color {
        output.push_str(reset);
    }

    output
}
