//! Prompt Formatter Module
//!
//! Expands the user-configurable prompt template into the displayed
//! prompt. The template is scanned once; `$`-escapes come from a fixed
//! table and unknown letters are dropped silently. `${VAR}` environment
//! references are expanded before the scan. The clock is injected so
//! date/time escapes stay deterministic under test.

use chrono::{Local, NaiveDateTime};

/// Source of "now" for the `$D`/`$T` escapes
pub trait Clock {
    fn now(&self) -> NaiveDateTime;
}

/// Wall-clock time
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

/// Everything the template can refer to besides the clock
#[derive(Debug, Clone, Default)]
pub struct PromptContext {
    pub cur_dir: String,
    pub home_dir: String,
    pub user_name: String,
    pub host_name: String,
    pub is_admin: bool,
    /// One `+` per level for the `$+` escape
    pub push_dir_depth: usize,
}

impl PromptContext {
    /// Build a context from the process environment
    pub fn from_env(cur_dir: &str) -> Self {
        let user_name = std::env::var("USER").unwrap_or_default();
        Self {
            cur_dir: cur_dir.to_string(),
            home_dir: std::env::var("HOME").unwrap_or_default(),
            host_name: std::env::var("HOSTNAME").unwrap_or_default(),
            is_admin: user_name == "root",
            user_name,
            push_dir_depth: 0,
        }
    }
}

/// Expand `${VAR}` environment references; unset variables expand to
/// nothing. A bare `$X` is left alone for the escape table.
pub fn expand_env(template: &str) -> String {
    let mut out = String::with_capacity(template.len());
    let mut chars = template.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch == '$' && chars.peek() == Some(&'{') {
            chars.next();
            let mut name = String::new();
            let mut closed = false;
            for inner in chars.by_ref() {
                if inner == '}' {
                    closed = true;
                    break;
                }
                name.push(inner);
            }
            if closed {
                if let Ok(value) = std::env::var(&name) {
                    out.push_str(&value);
                }
            } else {
                out.push_str("${");
                out.push_str(&name);
            }
        } else {
            out.push(ch);
        }
    }

    out
}

/// Expand a prompt template against `ctx` and `clock`.
pub fn expand_prompt(template: &str, ctx: &PromptContext, clock: &dyn Clock) -> String {
    // literal single-character escapes
    const CHR_FMT: &[(char, char)] = &[
        ('A', '&'),
        ('B', '|'),
        ('C', '('),
        ('F', ')'),
        ('G', '>'),
        ('L', '<'),
        ('Q', '='),
        ('S', ' '),
        ('$', '$'),
    ];

    let expanded = expand_env(template);
    let mut out = String::with_capacity(expanded.len());
    let mut chars = expanded.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch != '$' {
            out.push(ch);
            continue;
        }

        // a trailing lone '$' is dropped
        let Some(escape) = chars.next() else {
            break;
        };
        let escape = escape.to_ascii_uppercase();

        if let Some(&(_, literal)) = CHR_FMT.iter().find(|&&(e, _)| e == escape) {
            out.push(literal);
            continue;
        }

        match escape {
            '+' => {
                for _ in 0..ctx.push_dir_depth {
                    out.push('+');
                }
            }
            'H' => {
                out.pop();
            }
            '@' => {
                // $@xy - admin marker wrapped in x/y, admin only
                let lb = chars.next();
                let rb = chars.next();
                if ctx.is_admin {
                    if let (Some(lb), Some(rb)) = (lb, rb) {
                        out.push(lb);
                        out.push_str("Admin");
                        out.push(rb);
                    }
                }
            }
            'D' => {
                out.push_str(&clock.now().format("%m/%d/%y").to_string());
            }
            'T' => {
                out.push_str(&clock.now().format("%H:%M:%S").to_string());
            }
            'R' => {
                out.push_str(&ctx.cur_dir);
            }
            'P' => {
                if !ctx.home_dir.is_empty() && ctx.cur_dir.starts_with(&ctx.home_dir) {
                    out.push('~');
                    out.push_str(&ctx.cur_dir[ctx.home_dir.len()..]);
                } else {
                    out.push_str(&ctx.cur_dir);
                }
            }
            '#' => {
                out.push(if ctx.is_admin { '#' } else { '$' });
            }
            'U' => {
                out.push_str(&ctx.user_name);
            }
            'N' => {
                out.push_str(&ctx.host_name);
            }
            _ => {} // unknown escapes are dropped
        }
    }

    out
}
