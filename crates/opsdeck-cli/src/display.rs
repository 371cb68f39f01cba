//! Display utilities for the CLI

use colored::*;
use opsdeck_types::{ChatTurn, User, UserStatus};

/// Print a section header
pub fn section(title: &str) {
    println!();
    println!("{}", "━".repeat(60).bright_black());
    println!(" {}", title.bright_white().bold());
    println!("{}", "━".repeat(60).bright_black());
}

/// Print a success message
pub fn success(message: &str) {
    println!("  {} {}", "✓".bright_green(), message);
}

/// Print an error message
pub fn error(message: &str) {
    println!("  {} {}", "✗".bright_red(), message.bright_red());
}

/// Print an info message
pub fn info(message: &str) {
    println!("  {} {}", "→".bright_blue(), message);
}

/// Print a warning message
pub fn warning(message: &str) {
    println!("  {} {}", "⚠".yellow(), message.yellow());
}

/// Print a key-value pair
pub fn kv(key: &str, value: &str) {
    println!("      {}: {}", key, value.bright_cyan());
}

/// Print one transcript turn
pub fn turn(turn: &ChatTurn) {
    if turn.is_user() {
        println!("  {} {}", "you>".bright_yellow().bold(), turn.text);
    } else {
        println!("  {} {}", " ai>".bright_cyan().bold(), turn.text);
    }
}

/// Print the user directory as a table
pub fn user_table(users: &[User]) {
    println!(
        "  {:<4} {:<24} {:<10} {:<10} {}",
        "ID".bright_white(),
        "Name".bright_white(),
        "Role".bright_white(),
        "Status".bright_white(),
        "Last Login".bright_white()
    );
    println!("  {}", "─".repeat(66).bright_black());
    for user in users {
        let status = match user.status {
            UserStatus::Active => user.status.to_string().bright_green(),
            UserStatus::Inactive => user.status.to_string().bright_black(),
        };
        println!(
            "  {:<4} {:<24} {:<10} {:<10} {}",
            user.id,
            user.name,
            user.role.to_string(),
            status,
            user.last_login.format("%Y-%m-%d %H:%M").to_string().bright_black()
        );
    }
}
