//! Input predicates shared by validation and the prompt layer

use super::MIN_WEBSOCKET_PORT;
use regex::Regex;
use std::sync::OnceLock;

fn kebab_case_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[a-z][a-z0-9]*(-[a-z0-9]+)*$").expect("valid kebab-case regex"))
}

fn domain_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r"^[a-zA-Z0-9]([a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?(\.[a-zA-Z0-9]([a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?)*$",
        )
        .expect("valid domain regex")
    })
}

fn email_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email regex"))
}

/// Lowercase letters and digits in hyphen-separated words, starting with a letter
pub fn is_valid_kebab_case(name: &str) -> bool {
    kebab_case_re().is_match(name)
}

pub fn is_valid_port(port: u16) -> bool {
    port >= MIN_WEBSOCKET_PORT
}

pub fn is_valid_domain(domain: &str) -> bool {
    domain_re().is_match(domain)
}

pub fn is_valid_email(email: &str) -> bool {
    email_re().is_match(email)
}

/// Check a project name the way the prompt shows it to the user
pub fn check_project_name(input: &str) -> Result<(), &'static str> {
    if input.trim().is_empty() {
        return Err("Project name is required.");
    }
    if !is_valid_kebab_case(input) {
        return Err("Use kebab-case (e.g. my-risu-plugin): lowercase letters, digits and hyphens, not starting or ending with a hyphen.");
    }
    Ok(())
}

/// Parse a port typed at a prompt
pub fn parse_port(input: &str) -> Result<u16, &'static str> {
    let port: u32 = input.trim().parse().map_err(|_| "Only digits are allowed.")?;
    match u16::try_from(port) {
        Ok(port) if is_valid_port(port) => Ok(port),
        _ => Err("Port must be in the range 1024-65535."),
    }
}

/// `my-risu-plugin` -> `My Risu Plugin`
pub fn to_title_words(kebab: &str) -> String {
    kebab
        .split('-')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Description offered when the user does not type one
pub fn default_description(project_name: &str) -> String {
    format!("{} for RISU AI", to_title_words(project_name))
}
