//! Console report: one block per (function, fixture group).

use std::io::{self, Write};

pub const LINE_WIDTH: usize = 100;

#[derive(Debug, Clone, PartialEq)]
pub struct AggregateResult {
    pub name: String,
    pub mean_ns_per_op: f64,
    pub error_pct: f64,
}

/// Formats a byte count with metric units (e.g. "100 B", "1.0 kB")
pub fn format_size(bytes: usize) -> String {
    const KB: f64 = 1e3;
    const MB: f64 = 1e6;
    const GB: f64 = 1e9;
    const TB: f64 = 1e12;

    let value = bytes as f64;
    if value >= TB {
        format!("{:.1} TB", value / TB)
    } else if value >= GB {
        format!("{:.1} GB", value / GB)
    } else if value >= MB {
        format!("{:.1} MB", value / MB)
    } else if value >= KB {
        format!("{:.1} kB", value / KB)
    } else {
        format!("{} B", bytes)
    }
}

pub fn format_line(result: &AggregateResult) -> String {
    format!(
        "{}: {:.2} us/op ({:.2} op/s), ±{:.2} %",
        result.name,
        result.mean_ns_per_op / 1000.0,
        1e9 / result.mean_ns_per_op,
        result.error_pct
    )
}

/// Entry with the lowest mean; the first one wins on ties.
pub fn fastest(results: &[AggregateResult]) -> Option<&AggregateResult> {
    results.iter().reduce(|best, candidate| {
        if candidate.mean_ns_per_op < best.mean_ns_per_op {
            candidate
        } else {
            best
        }
    })
}

fn separator(c: char) -> String {
    std::iter::repeat(c).take(LINE_WIDTH).collect()
}

/// Writes the report blocks. The opening `=` line is only printed once.
pub struct ReportPrinter<W: Write> {
    out: W,
    started: bool,
}

impl<W: Write> ReportPrinter<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            started: false,
        }
    }

    pub fn begin_block(&mut self, function: &str, size: usize) -> io::Result<()> {
        if !self.started {
            writeln!(self.out, "{}", separator('='))?;
            self.started = true;
        }
        writeln!(
            self.out,
            "Benchmarking function: {} (size: {})",
            function,
            format_size(size)
        )?;
        writeln!(self.out, "{}", separator('-'))
    }

    pub fn result(&mut self, result: &AggregateResult) -> io::Result<()> {
        writeln!(self.out, "{}", format_line(result))
    }

    pub fn end_block(&mut self, results: &[AggregateResult]) -> io::Result<()> {
        if results.len() > 1 {
            if let Some(best) = fastest(results) {
                writeln!(self.out, "{}", separator('-'))?;
                writeln!(self.out, "Fastest: {}", best.name)?;
            }
        }
        writeln!(self.out, "{}", separator('='))?;
        self.out.flush()
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}
