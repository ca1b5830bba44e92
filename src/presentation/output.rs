use crate::domain::model::{AppMode, Translation, TranslationSource};
use crate::presentation::theme::Theme;
use std::fmt::Write;

const CUTOFF_WIDTH: usize = 40;

pub fn source_indicator(source: TranslationSource, enable_emoji: bool) -> &'static str {
    match (source, enable_emoji) {
        (TranslationSource::Online, true) => "🌐 [online]",
        (TranslationSource::Online, false) => "[online]",
        (TranslationSource::MemoryCache, true) => "💾 [cache]",
        (TranslationSource::MemoryCache, false) => "[cache]",
        (TranslationSource::DiskCache, true) => "📚 [cache]",
        (TranslationSource::DiskCache, false) => "[cache]",
    }
}

pub fn cutoff(theme: &Theme) -> String {
    (theme.line)(&"⸺".repeat(CUTOFF_WIDTH))
}

/// Header shown above streamed or finished output.
pub fn format_header(
    theme: &Theme,
    mode: AppMode,
    model: &str,
    title: Option<&str>,
    source: Option<TranslationSource>,
    enable_emoji: bool,
) -> String {
    let mut output = String::new();
    let heading = match (mode, title) {
        (AppMode::Document, Some(name)) => format!("DE → EN  {}", name),
        _ => "DE → EN".to_string(),
    };
    write!(output, "{} {}", (theme.title)(&heading), (theme.label)(model)).ok();
    if let Some(source) = source {
        write!(output, " {}", (theme.source)(source_indicator(source, enable_emoji))).ok();
    }
    writeln!(output).ok();
    writeln!(output, "  {}", cutoff(theme)).ok();
    output
}

/// Format a finished translation as string (for pager support)
pub fn format_translation(
    translation: &Translation,
    theme: &Theme,
    title: Option<&str>,
    enable_emoji: bool,
) -> String {
    let mut output = format_header(
        theme,
        translation.mode,
        &translation.model,
        title,
        Some(translation.source),
        enable_emoji,
    );

    for line in translation.output.lines() {
        writeln!(output, "  {}", (theme.body)(line)).ok();
    }
    writeln!(output).ok();
    output
}

/// Print output with pager if configured
pub fn print_with_pager(output: &str, pager_command: &str) -> anyhow::Result<()> {
    use std::process::{Command, Stdio};

    // Parse pager command (e.g., "less -RF" -> ["less", "-RF"])
    let parts: Vec<&str> = pager_command.split_whitespace().collect();
    let Some((program, args)) = parts.split_first() else {
        print!("{}", output);
        return Ok(());
    };

    let mut child = match Command::new(program)
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .spawn()
    {
        Ok(child) => child,
        Err(e) => {
            tracing::warn!("Pager '{}' not found: {}. Printing directly.", program, e);
            print!("{}", output);
            return Ok(());
        }
    };

    if let Some(mut stdin) = child.stdin.take() {
        use std::io::Write;
        stdin.write_all(output.as_bytes())?;
        stdin.flush()?;
    }

    child.wait()?;

    Ok(())
}

/// Clear the terminal screen
pub fn clear_screen<W: std::io::Write>(out: &mut W) {
    // ANSI escape sequence: clear screen and move cursor to top-left
    write!(out, "\x1B[2J\x1B[1;1H").ok();
    out.flush().ok();
}
