//! Output formatting for query results and tree statistics

use crate::input::Origin;
use crate::tree::{Suffix, TreeStats};
use crate::utils::format_size;
use roaring::RoaringBitmap;
use std::io::{self, Write};
use termcolor::{Color, ColorChoice, ColorSpec, WriteColor};

pub fn color_choice(color: bool) -> ColorChoice {
    if color {
        ColorChoice::Auto
    } else {
        ColorChoice::Never
    }
}

/// Label for a source index: its origin when known, the index otherwise
fn source_label(origins: &[Origin], source: usize) -> String {
    match origins.get(source) {
        Some(origin) => origin.to_string(),
        None => format!("#{}", source),
    }
}

/// Write characters with control characters escaped, so multi-line
/// strings stay on one output line
fn write_escaped<W: Write>(out: &mut W, chars: &[char]) -> io::Result<()> {
    for &ch in chars {
        if ch.is_control() {
            write!(out, "{}", ch.escape_default())?;
        } else {
            write!(out, "{}", ch)?;
        }
    }
    Ok(())
}

/// Print suffixes as `origin:offset<TAB>text`, highlighting the first
/// `highlight` characters of each.
///
/// Returns how many suffixes were printed.
pub fn print_suffixes<'t, W: WriteColor>(
    out: &mut W,
    suffixes: impl Iterator<Item = Suffix<'t>>,
    origins: &[Origin],
    highlight: usize,
    limit: Option<usize>,
) -> io::Result<usize> {
    let mut printed = 0;

    for suffix in suffixes.take(limit.unwrap_or(usize::MAX)) {
        out.set_color(ColorSpec::new().set_fg(Some(Color::Magenta)))?;
        write!(out, "{}", source_label(origins, suffix.source()))?;
        out.reset()?;
        write!(out, ":")?;
        out.set_color(ColorSpec::new().set_fg(Some(Color::Green)))?;
        write!(out, "{}", suffix.offset())?;
        out.reset()?;
        write!(out, "\t")?;

        let chars = suffix.chars();
        let split = highlight.min(chars.len());
        if split > 0 {
            out.set_color(ColorSpec::new().set_fg(Some(Color::Red)).set_bold(true))?;
            write_escaped(out, &chars[..split])?;
            out.reset()?;
        }
        write_escaped(out, &chars[split..])?;
        writeln!(out)?;

        printed += 1;
    }

    Ok(printed)
}

/// Print one line per source in `sources`
pub fn print_sources<W: WriteColor>(
    out: &mut W,
    sources: &RoaringBitmap,
    origins: &[Origin],
) -> io::Result<()> {
    for source in sources {
        out.set_color(ColorSpec::new().set_fg(Some(Color::Magenta)))?;
        writeln!(out, "{}", source_label(origins, source as usize))?;
        out.reset()?;
    }
    Ok(())
}

pub fn print_stats<W: WriteColor>(out: &mut W, stats: &TreeStats) -> io::Result<()> {
    out.set_color(ColorSpec::new().set_bold(true))?;
    writeln!(out, "Tree Statistics")?;
    out.reset()?;
    writeln!(out, "===============")?;
    writeln!(out)?;

    writeln!(out, "Strings:          {}", stats.string_count)?;
    writeln!(
        out,
        "Characters:       {} ({})",
        stats.text_len,
        format_size((stats.text_len * std::mem::size_of::<char>()) as u64)
    )?;
    writeln!(out, "Nodes:            {}", stats.node_count)?;
    writeln!(out, "  Internal:       {}", stats.internal_count)?;
    writeln!(out, "  Terminal:       {}", stats.terminal_count)?;
    writeln!(out, "  Empty terminal: {}", stats.empty_terminal_count)?;

    writeln!(out)?;
    if stats.suffix_links_built {
        writeln!(out, "Suffix links:     {}", stats.suffix_link_count)?;
    } else {
        writeln!(out, "Suffix links:     released")?;
    }

    Ok(())
}

pub fn stats_json(stats: &TreeStats) -> serde_json::Result<String> {
    serde_json::to_string_pretty(stats)
}
