use std::fmt::Write;

use crate::{Session, Status};

const TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Render the session as the operator-facing status table.
///
/// By default everything below the last good entry is suppressed and printing
/// stops after the first bad row; `all` overrides both. A trailing summary
/// line reports the visible commit count and the 1-based position of the
/// current candidate inside that window, unless the bisection has converged,
/// in which case a banner replaces it.
pub fn render(session: &Session, all: bool) -> String {
    let mut out = String::new();
    let last_good = if all { 1 } else { session.last_good_position() };
    if last_good > 1 {
        out.push_str("Skipping print of all commits before last good\n");
    }

    let found = session.is_found();
    if found {
        let _ = writeln!(out, "{}", "*".repeat(160));
        let _ = writeln!(out, "{} Done {}", "*".repeat(77), "*".repeat(77));
        let _ = writeln!(out, "{}", "*".repeat(160));
    }

    let _ = writeln!(out, "\n{:^10} {:^45} {:^25} {}", "Status", "Hash", "Time", "Log");
    let mut count = 0usize;
    let mut current = -1i64;
    for e in &session.entries {
        count += 1;
        if count < last_good {
            continue;
        }
        if e.status == Status::Current {
            current = count as i64;
        }
        let _ = writeln!(
            out,
            "{:^10} {:^45} {:^25} {}",
            e.status.to_string(),
            e.hash,
            e.timestamp.format(TIME_FORMAT).to_string(),
            e.summary
        );
        if !all && e.status == Status::Bad {
            out.push_str("Skipping print of all commits after first bad\n");
            break;
        }
    }
    if !found {
        let _ = writeln!(
            out,
            "{} commits, current is {}",
            count - last_good + 1,
            current - last_good as i64 + 1
        );
    }
    out
}
