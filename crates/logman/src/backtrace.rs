//! Call stack capture and rendering

use crate::buffer::{BufferPool, WriteError};
use crate::channel::ErrorChannel;

use std::backtrace::{Backtrace, BacktraceStatus};

/// Most frames kept from a single capture
pub const MAX_FRAMES: usize = 128;

/// Captures the current call stack as one description per frame.
///
/// Returns an empty list when the platform cannot capture a backtrace.
#[must_use]
pub fn capture_frames(limit: usize) -> Vec<String> {
    let trace = Backtrace::force_capture();
    if trace.status() != BacktraceStatus::Captured {
        return Vec::new();
    }
    parse_frames(&trace.to_string(), limit)
}

/// Folds the std rendering (`N: symbol` lines followed by optional
/// `at file:line` lines) into single-line frame descriptions.
fn parse_frames(rendered: &str, limit: usize) -> Vec<String> {
    let mut frames: Vec<String> = Vec::new();

    for line in rendered.lines() {
        let line = line.trim();

        if let Some(location) = line.strip_prefix("at ") {
            if let Some(frame) = frames.last_mut() {
                frame.push_str(" at ");
                frame.push_str(location);
            }
            continue;
        }

        let Some((index, symbol)) = line.split_once(": ") else {
            continue;
        };
        if index.is_empty() || !index.bytes().all(|b| b.is_ascii_digit()) {
            continue;
        }
        if frames.len() == limit {
            break;
        }
        frames.push(format!("{index}: {symbol}"));
    }

    frames
}

/// Renders `frames` into the message buffer, one line each.
///
/// The frames are first stored in the backtrace scratch buffer, dropping
/// whatever no longer fits. Rendering stops at the first frame that would
/// overflow the message buffer; the frames rendered before it are kept.
/// Returns whether there is anything to write out.
pub(crate) fn render(pool: &mut BufferPool, errors: &mut ErrorChannel, frames: &[String]) -> bool {
    let BufferPool {
        message, backtrace, ..
    } = pool;

    let Some(message) = message.as_mut() else {
        errors.report(format_args!("LOGMAN_ERROR::Message buffer uninitialized\n"));
        return false;
    };
    let Some(scratch) = backtrace.as_mut() else {
        errors.report(format_args!("LOGMAN_ERROR::Backtrace buffer uninitialized\n"));
        return false;
    };
    if frames.is_empty() {
        errors.report(format_args!("LOGMAN_ERROR::Unable to capture backtrace\n"));
        return false;
    }

    scratch.clear();
    for frame in frames {
        if scratch.append(format_args!("{frame}\n")).is_err() {
            break;
        }
    }

    message.clear();
    for frame in scratch.as_str().lines() {
        if let Err(e) = message.append(format_args!("{frame}\n")) {
            if e == WriteError::Overflow {
                errors.report(format_args!("LOGMAN_ERROR::Message buffer overflow\n"));
            }
            break;
        }
    }

    !message.is_empty()
}
