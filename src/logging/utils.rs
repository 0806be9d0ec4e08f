//! Helpers shared by the console formatter and the file layer.
use std::time::Duration;

/// Strip ANSI escape sequences from a string.
///
/// Handles CSI sequences (ending in any byte of the `@`..`~` range), so
/// colours and cursor movement are both removed; two-byte escapes drop the
/// byte after `ESC`.
pub(super) fn strip_ansi(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars();
    while let Some(c) = chars.next() {
        if c != '\x1b' {
            out.push(c);
            continue;
        }
        if chars.next() == Some('[') {
            for inner in chars.by_ref() {
                if ('@'..='~').contains(&inner) {
                    break;
                }
            }
        }
    }
    out
}

/// Format a run-relative timestamp as `SSSS.mmm`.
pub(super) fn format_elapsed(elapsed: Duration) -> String {
    format!("{:>8.3}", elapsed.as_secs_f64())
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    #[test]
    fn strip_ansi_removes_colors() {
        assert_eq!(strip_ansi("\x1b[31mERROR\x1b[0m conflict"), "ERROR conflict");
        assert_eq!(strip_ansi("plain"), "plain");
        assert_eq!(
            strip_ansi("\x1b[1;34m==>\x1b[0m \x1b[1mPlanning\x1b[0m"),
            "==> Planning"
        );
    }

    #[test]
    fn strip_ansi_handles_other_escapes() {
        assert_eq!(strip_ansi("\x1b[2Jcleared"), "cleared");
        assert_eq!(strip_ansi("\x1b7saved"), "saved");
        assert_eq!(strip_ansi(""), "");
    }

    #[test]
    fn elapsed_has_millisecond_precision() {
        assert_eq!(format_elapsed(Duration::from_millis(1500)), "   1.500");
        assert_eq!(format_elapsed(Duration::ZERO).trim(), "0.000");
    }
}
