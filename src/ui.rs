//! Terminal output utilities.
//!
//! A leveled logger and a small Unicode table, shared by every command
//! handler. The log level is process-global; `--quiet` drops it to errors
//! only, `--verbose` raises it to debug.

use colored::*;
use std::cmp;
use std::sync::atomic::{AtomicU8, Ordering};

/// Logging verbosity, ordered from silent to chatty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    None = 0,
    Error = 1,
    Warn = 2,
    Info = 3,
    Debug = 4,
}

static LOG_LEVEL: AtomicU8 = AtomicU8::new(LogLevel::Info as u8);

pub fn set_log_level(level: LogLevel) {
    LOG_LEVEL.store(level as u8, Ordering::Relaxed);
}

fn enabled(level: LogLevel) -> bool {
    LOG_LEVEL.load(Ordering::Relaxed) >= level as u8
}

pub fn log_error(msg: impl AsRef<str>) {
    if enabled(LogLevel::Error) {
        eprintln!("{} {}", "[Error]".red().bold(), msg.as_ref());
    }
}

pub fn log_warn(msg: impl AsRef<str>) {
    if enabled(LogLevel::Warn) {
        eprintln!("{} {}", "[Warn]".yellow(), msg.as_ref());
    }
}

pub fn log_info(msg: impl AsRef<str>) {
    if enabled(LogLevel::Info) {
        println!("{} {}", "[Info]".cyan(), msg.as_ref());
    }
}

pub fn log_debug(msg: impl AsRef<str>) {
    if enabled(LogLevel::Debug) {
        println!("{} {}", "[Debug]".dimmed(), msg.as_ref());
    }
}

/// Auto-sizing table with Unicode box-drawing borders.
pub struct Table {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new(headers: &[&str]) -> Self {
        Self {
            headers: headers.iter().map(|s| s.to_string()).collect(),
            rows: Vec::new(),
        }
    }

    pub fn add_row(&mut self, row: Vec<String>) {
        if row.len() == self.headers.len() {
            self.rows.push(row);
        }
    }

    pub fn print(&self) {
        if self.headers.is_empty() {
            return;
        }

        // Column widths measured ANSI-aware so colored cells line up.
        let mut widths: Vec<usize> = self
            .headers
            .iter()
            .map(|h| console::measure_text_width(h))
            .collect();
        for row in &self.rows {
            for (i, cell) in row.iter().enumerate() {
                widths[i] = cmp::max(widths[i], console::measure_text_width(cell));
            }
        }

        let sep = |left: &str, mid: &str, right: &str| -> String {
            let mut s = String::from("  ");
            s.push_str(left);
            for (i, w) in widths.iter().enumerate() {
                s.push_str(&"─".repeat(w + 2));
                s.push_str(if i + 1 < widths.len() { mid } else { right });
            }
            s
        };

        println!("{}", sep("┌", "┬", "┐"));
        print!("  │");
        for (i, header) in self.headers.iter().enumerate() {
            let pad = widths[i] - console::measure_text_width(header);
            print!(" {}{} │", header.bold(), " ".repeat(pad));
        }
        println!();
        println!("{}", sep("├", "┼", "┤"));
        for row in &self.rows {
            print!("  │");
            for (i, cell) in row.iter().enumerate() {
                let pad = widths[i] - console::measure_text_width(cell);
                print!(" {}{} │", cell, " ".repeat(pad));
            }
            println!();
        }
        println!("{}", sep("└", "┴", "┘"));
    }
}
