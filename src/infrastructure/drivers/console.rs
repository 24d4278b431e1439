use core::fmt;

use esp_println::println;
use netspeed_core::DiagnosticSink;

/// Diagnostic lines on the UART console, next to the log output
#[derive(Debug, Clone, Copy, Default)]
pub struct SerialConsole;

impl DiagnosticSink for SerialConsole {
    fn write_line(&mut self, line: fmt::Arguments<'_>) {
        println!("{}", line);
    }
}
