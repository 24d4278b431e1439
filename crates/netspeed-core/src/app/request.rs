//! Minimal HTTP/1.1 request formatting and response line counting

use core::fmt::Write as _;

use heapless::{String, Vec};

use crate::config::TelemetryTarget;
use crate::domain::entity::Observation;
use crate::error::SessionError;

pub const MAX_REQUEST_LEN: usize = 512;
pub const MAX_PATH_LEN: usize = 256;
pub const MAX_LINE_LEN: usize = 256;

pub type RequestBuf = String<MAX_REQUEST_LEN>;
pub type PathBuf = String<MAX_PATH_LEN>;

/// `GET` request asking the server to close the connection after responding
pub fn write_get_request(buf: &mut RequestBuf, host: &str, path: &str) -> Result<(), SessionError> {
    buf.clear();
    write!(
        buf,
        "GET {} HTTP/1.1\r\nHost: {}\r\nConnection: close\r\n\r\n",
        path, host
    )?;
    Ok(())
}

/// `WriteValue` path of the telemetry API, value with 4 decimal places
pub fn write_value_path(
    buf: &mut PathBuf,
    target: &TelemetryTarget<'_>,
    observation: &Observation<'_>,
) -> Result<(), SessionError> {
    buf.clear();
    write!(
        buf,
        "/WriteValue?Key={}&Value={:.4}&Token={}",
        observation.key, observation.value, target.token
    )?;
    Ok(())
}

/// Splits a byte stream into lines and counts them
///
/// Lines end at `\r`, `\n` or `\r\n`, so CR-only streams count the same
/// as CRLF ones. Text past [`MAX_LINE_LEN`] bytes is cut off but the line
/// still counts.
#[derive(Debug, Default)]
pub struct LineCounter {
    current: Vec<u8, MAX_LINE_LEN>,
    pending: bool,
    /// Last byte was `\r`, a following `\n` belongs to the same line end
    after_cr: bool,
    lines: usize,
}

impl LineCounter {
    pub const fn new() -> Self {
        Self {
            current: Vec::new(),
            pending: false,
            after_cr: false,
            lines: 0,
        }
    }

    pub fn feed(&mut self, bytes: &[u8], mut on_line: impl FnMut(&str)) {
        for &byte in bytes {
            if core::mem::take(&mut self.after_cr) && byte == b'\n' {
                continue;
            }
            match byte {
                b'\n' => self.emit(&mut on_line),
                b'\r' => {
                    self.emit(&mut on_line);
                    self.after_cr = true;
                }
                _ => {
                    self.pending = true;
                    let _ = self.current.push(byte);
                }
            }
        }
    }

    /// Flush an unterminated last line
    pub fn finish(&mut self, mut on_line: impl FnMut(&str)) {
        if self.pending {
            self.emit(&mut on_line);
        }
    }

    pub fn lines(&self) -> usize {
        self.lines
    }

    fn emit(&mut self, on_line: &mut impl FnMut(&str)) {
        let text = match core::str::from_utf8(&self.current) {
            Ok(text) => text,
            Err(e) => core::str::from_utf8(&self.current[..e.valid_up_to()]).unwrap_or(""),
        };
        on_line(text);
        self.lines += 1;
        self.current.clear();
        self.pending = false;
    }
}
