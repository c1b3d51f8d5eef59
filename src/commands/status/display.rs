use colored::{ColoredString, Colorize};

use crate::models::{FrameKeys, MasterframeRow, ObservationStatus, StatusRow};
use crate::monitor::EmptyReason;

use crate::commands::common::truncate_for_display;

const OBJECT_WIDTH: usize = 16;

pub fn display_science_header() {
    println!(
        "{}",
        format!(
            "{:>4}  {:<16} {:<7} {:<14} {:>5}  {:>5} {:>5} {:>5}",
            "ID", "OBJECT", "FILTER", "STATUS", "PROG", "WARN", "ERR", "CMT"
        )
        .bold()
    );
}

pub fn display_science_row(row: &StatusRow) {
    println!(
        "{:>4}  {:<16} {:<7} {:<14} {:>5}  {} {} {}",
        row.id,
        truncate_for_display(&row.object, OBJECT_WIDTH),
        row.filter,
        colored_status(&row.status),
        format!("{}%", row.progress),
        colored_count(row.warnings, |s| s.yellow()),
        colored_count(row.errors, |s| s.red()),
        format!("{:>5}", row.comments).cyan(),
    );
}

pub fn display_masterframe_header() {
    println!(
        "{}",
        format!(
            "{:<8} {:<5} {:<20} {:<20} {:>5} {:>5} {:>5}",
            "UNIT", "BIAS", "DARK", "FLAT", "WARN", "ERR", "CMT"
        )
        .bold()
    );
}

pub fn display_masterframe_row(row: &MasterframeRow) {
    let bias = if row.bias { "yes".green() } else { "no".dimmed() };
    println!(
        "{:<8} {:<5} {:<20} {:<20} {} {} {}",
        row.unit,
        bias,
        format_keys(&row.dark),
        format_keys(&row.flat),
        colored_count(row.warnings, |s| s.yellow()),
        colored_count(row.errors, |s| s.red()),
        format!("{:>5}", row.comments).cyan(),
    );
}

pub fn display_empty(reason: Option<EmptyReason>) {
    match reason {
        Some(EmptyReason::NotStarted) => {
            println!("{}", "Raw data found, but processing has not started yet.".yellow())
        }
        Some(EmptyReason::NoData) => println!("{}", "No data acquired for this night.".dimmed()),
        None => println!("{}", "No matching units.".dimmed()),
    }
}

fn colored_status(status: &ObservationStatus) -> ColoredString {
    let text = format!("{:<14}", status.to_string());
    match status {
        ObservationStatus::Completed => text.green(),
        ObservationStatus::Initialized => text.dimmed(),
        ObservationStatus::Stage(_) => text.yellow(),
    }
}

fn colored_count(count: usize, paint: fn(&str) -> ColoredString) -> ColoredString {
    let text = format!("{count:>5}");
    if count == 0 {
        text.dimmed()
    } else {
        paint(&text)
    }
}

fn format_keys(keys: &FrameKeys) -> String {
    if keys.is_empty() {
        "-".to_string()
    } else {
        keys.iter().collect::<Vec<_>>().join(",")
    }
}
