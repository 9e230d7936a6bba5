use std::io::IsTerminal;

use anstyle::{AnsiColor, Effects, Style};

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum OutputStyle {
    Plain,
    Rich,
}

/// Rich output only when stdout is a terminal and `NO_COLOR` is unset, so
/// piped and scripted runs stay machine-friendly.
pub fn current_output_style() -> OutputStyle {
    if std::env::var_os("NO_COLOR").is_some() {
        return OutputStyle::Plain;
    }
    if std::io::stdout().is_terminal() {
        OutputStyle::Rich
    } else {
        OutputStyle::Plain
    }
}

/// Status badges stay plain ASCII; color is layered on only at print time.
pub fn render_status_line(style: OutputStyle, status: &str, message: &str) -> String {
    match style {
        OutputStyle::Plain => message.to_string(),
        OutputStyle::Rich => format!("[{}] {}", status.to_ascii_uppercase(), message),
    }
}

pub fn print_status(style: OutputStyle, status: &str, message: &str) {
    println!("{}", render_status_line(style, status, message));
}

pub fn print_warning(style: OutputStyle, message: &str) {
    match style {
        OutputStyle::Plain => eprintln!("warning: {message}"),
        OutputStyle::Rich => {
            eprintln!("{} {}", colorize(status_style("warn"), "[WARN]"), message);
        }
    }
}

fn status_style(status: &str) -> Style {
    let color = match status {
        "ok" => AnsiColor::BrightGreen,
        "warn" => AnsiColor::BrightYellow,
        "err" => AnsiColor::BrightRed,
        _ => AnsiColor::BrightCyan,
    };
    Style::new().fg_color(Some(color.into())).effects(Effects::BOLD)
}

fn colorize(style: Style, text: &str) -> String {
    format!("{style}{text}{style:#}")
}
