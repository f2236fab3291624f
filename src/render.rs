//! Span output
//!
//! Writers for the command-line front end: ANSI-colored text through
//! crossterm, plain text, a one-line-per-span dump, and a report of scan
//! diagnostics.

use std::io::Write;

use crossterm::queue;
use crossterm::style::{
    self as term, Attribute, Print, ResetColor, SetAttribute, SetBackgroundColor,
    SetForegroundColor,
};

use crate::error::Result;
use crate::syntax::{Automaton, Color, Scan, Span, Style, Termination, Theme};

/// Map a palette color to crossterm's
fn term_color(color: Color) -> term::Color {
    match color {
        Color::Default => term::Color::Reset,
        Color::Black => term::Color::Black,
        Color::Red => term::Color::DarkRed,
        Color::Green => term::Color::DarkGreen,
        Color::Yellow => term::Color::DarkYellow,
        Color::Blue => term::Color::DarkBlue,
        Color::Magenta => term::Color::DarkMagenta,
        Color::Cyan => term::Color::DarkCyan,
        Color::White => term::Color::Grey,
        Color::BrightBlack => term::Color::DarkGrey,
        Color::BrightRed => term::Color::Red,
        Color::BrightGreen => term::Color::Green,
        Color::BrightYellow => term::Color::Yellow,
        Color::BrightBlue => term::Color::Blue,
        Color::BrightMagenta => term::Color::Magenta,
        Color::BrightCyan => term::Color::Cyan,
        Color::BrightWhite => term::Color::White,
    }
}

fn apply_style<W: Write>(out: &mut W, style: Style) -> Result<()> {
    if style.fg != Color::Default {
        queue!(out, SetForegroundColor(term_color(style.fg)))?;
    }
    if style.bg != Color::Default {
        queue!(out, SetBackgroundColor(term_color(style.bg)))?;
    }
    if style.bold {
        queue!(out, SetAttribute(Attribute::Bold))?;
    }
    if style.italic {
        queue!(out, SetAttribute(Attribute::Italic))?;
    }
    if style.underline {
        queue!(out, SetAttribute(Attribute::Underlined))?;
    }
    Ok(())
}

/// Write spans with terminal colors from `theme`
pub fn write_colored<W: Write>(out: &mut W, spans: &[Span], theme: &Theme) -> Result<()> {
    for span in spans {
        let style = theme.style_for(span.class, span.flags);
        if style.is_default() {
            queue!(out, Print(span.text))?;
            continue;
        }
        apply_style(out, style)?;
        queue!(out, Print(span.text), SetAttribute(Attribute::Reset), ResetColor)?;
    }
    out.flush()?;
    Ok(())
}

/// Write the spans' text unchanged
pub fn write_plain<W: Write>(out: &mut W, spans: &[Span]) -> Result<()> {
    for span in spans {
        out.write_all(span.text.as_bytes())?;
    }
    out.flush()?;
    Ok(())
}

/// Write one line per span: offset, length, class, state and escaped text
pub fn write_span_dump<W: Write>(out: &mut W, automaton: &Automaton, spans: &[Span]) -> Result<()> {
    for span in spans {
        writeln!(
            out,
            "{}\t{}\t{}\t{}\t{:?}",
            span.offset,
            span.len(),
            span.class.unwrap_or("-"),
            automaton.state(span.state).name,
            span.text
        )?;
    }
    out.flush()?;
    Ok(())
}

/// Write forced-advance diagnostics and end-of-scan notes
pub fn write_report<W: Write>(out: &mut W, automaton: &Automaton, scan: &Scan) -> Result<()> {
    for diagnostic in &scan.diagnostics {
        writeln!(out, "warning: {}", diagnostic)?;
    }
    if !scan.is_balanced() {
        let open: Vec<&str> = scan
            .unclosed()
            .into_iter()
            .map(|id| automaton.state(id).name.as_str())
            .collect();
        writeln!(out, "note: unclosed at end of input: {}", open.join(" > "))?;
    }
    if let Termination::Quit { offset } = scan.termination {
        writeln!(
            out,
            "note: `{}` entered at offset {}; rest of input passed through",
            automaton.state(scan.final_state).name,
            offset
        )?;
    }
    out.flush()?;
    Ok(())
}
