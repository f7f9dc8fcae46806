// Terminal status output, matching the tone of the generated-file log:
// one colored line per file or decision.

use std::io::Write;

use anyhow::Result;
use colored::Colorize;

pub fn print_success(message: &str) {
    println!("{}", message.bright_green().bold());
}

pub fn print_error(message: &str) {
    eprintln!("{}", message.bright_red().bold());
}

pub fn print_info(message: &str) {
    println!("{}", message.bright_blue());
}

pub fn print_warning(message: &str) {
    println!("{}", message.bright_yellow().bold());
}

/// Ask a yes/no question on stdin. Empty input takes the default.
pub fn confirm(prompt: &str, default: bool) -> Result<bool> {
    let hint = if default { "(Y/n)" } else { "(y/N)" };
    print!("{} {} ", prompt.bright_yellow().bold(), hint);
    std::io::stdout().flush()?;

    let mut input = String::new();
    std::io::stdin().read_line(&mut input)?;
    let answer = input.trim().to_lowercase();

    if answer.is_empty() {
        return Ok(default);
    }
    Ok(answer == "y" || answer == "yes")
}

/// Ask for a line of input on stdin. Empty input takes the default.
pub fn prompt(question: &str, default: Option<&str>) -> Result<String> {
    match default {
        Some(value) if !value.is_empty() => {
            print!("{} {} ", question.bright_blue(), format!("[{}]", value).italic())
        }
        _ => print!("{} ", question.bright_blue()),
    }
    std::io::stdout().flush()?;

    let mut input = String::new();
    std::io::stdin().read_line(&mut input)?;
    let answer = input.trim();

    if answer.is_empty() {
        return Ok(default.unwrap_or("").to_string());
    }
    Ok(answer.to_string())
}
