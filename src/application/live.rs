// Interactive mode: type German, get English once typing pauses
use crate::application::debounce::Debouncer;
use crate::application::translate::translate_text;
use crate::domain::model::{AppMode, TranslationState};
use crate::presentation::output::{clear_screen, format_header};
use crate::presentation::theme::Theme;
use crate::state::AppState;
use chrono::Local;
use std::collections::VecDeque;
use std::io::Write;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::sync::mpsc;
use tokio::time::Duration;
use tracing::{debug, info};

const LOG_CAPACITY: usize = 50;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LiveEvent {
    /// Full input text after an edit.
    Edit(String),
    Clear,
    Copy,
    Log,
    Quit,
}

/// Turn one input line into an event, updating the typed buffer.
pub fn parse_line(line: &str, buffer: &mut String) -> LiveEvent {
    match line.trim() {
        ":quit" | ":q" => LiveEvent::Quit,
        ":clear" => {
            buffer.clear();
            LiveEvent::Clear
        }
        ":copy" => LiveEvent::Copy,
        ":log" => LiveEvent::Log,
        _ => {
            if !buffer.is_empty() {
                buffer.push('\n');
            }
            buffer.push_str(line);
            LiveEvent::Edit(buffer.clone())
        }
    }
}

#[derive(Debug, Default)]
pub struct LiveSession {
    pub state: TranslationState,
    pub log: VecDeque<String>,
    pub requests: usize,
}

impl LiveSession {
    fn log(&mut self, message: impl Into<String>) {
        if self.log.len() == LOG_CAPACITY {
            self.log.pop_front();
        }
        self.log
            .push_back(format!("[{}] {}", Local::now().format("%H:%M:%S"), message.into()));
    }
}

async fn read_events<R>(reader: R, tx: mpsc::Sender<LiveEvent>)
where
    R: AsyncBufRead + Unpin,
{
    let mut lines = reader.lines();
    let mut buffer = String::new();
    loop {
        let event = match lines.next_line().await {
            Ok(Some(line)) => parse_line(&line, &mut buffer),
            Ok(None) => break,
            Err(e) => {
                tracing::warn!("Failed to read input: {}", e);
                break;
            }
        };
        let quit = event == LiveEvent::Quit;
        if tx.send(event).await.is_err() || quit {
            break;
        }
    }
}

/// Run the live loop until `:quit` or end of input.
///
/// Requests run one at a time; edits made while a translation streams are
/// queued and debounced afterwards.
pub async fn run_live<R, W>(
    state: &AppState,
    reader: R,
    out: &mut W,
    theme: &Theme,
) -> anyhow::Result<LiveSession>
where
    R: AsyncBufRead + Unpin + Send + 'static,
    W: Write + Send,
{
    let (delay, clear, enable_emoji) = {
        let config = state.config.read().await;
        (
            Duration::from_millis(config.debounce_ms),
            config.clear_screen,
            config.enable_emoji,
        )
    };

    let (tx, mut events) = mpsc::channel(64);
    let reader_task = tokio::spawn(read_events(reader, tx));

    let mut session = LiveSession::default();
    let mut debouncer = Debouncer::new(delay);
    session.log(format!("live mode started, debounce {} ms", delay.as_millis()));

    loop {
        tokio::select! {
            event = events.recv() => match event {
                Some(LiveEvent::Edit(text)) => {
                    session.state.set_input(text.clone());
                    debouncer.push(text);
                }
                Some(LiveEvent::Clear) => {
                    debouncer.cancel();
                    session.state.clear();
                    session.log("cleared");
                    if clear {
                        clear_screen(out);
                    }
                    writeln!(out, "{}", (theme.hint)("(cleared)"))?;
                }
                Some(LiveEvent::Copy) => {
                    // Raw output, no styling, so it can be piped or selected.
                    writeln!(out, "{}", session.state.output_text)?;
                }
                Some(LiveEvent::Log) => {
                    for line in &session.log {
                        writeln!(out, "{}", (theme.line)(line))?;
                    }
                }
                Some(LiveEvent::Quit) | None => {
                    if let Some(text) = debouncer.flush() {
                        translate_live(state, &text, &mut session, out, theme, clear, enable_emoji).await?;
                    }
                    break;
                }
            },
            text = debouncer.settled() => {
                translate_live(state, &text, &mut session, out, theme, clear, enable_emoji).await?;
            }
        }
    }

    reader_task.abort();
    session.log("live mode finished");
    info!(requests = session.requests, "live session ended");
    Ok(session)
}

async fn translate_live<W: Write + Send>(
    state: &AppState,
    text: &str,
    session: &mut LiveSession,
    out: &mut W,
    theme: &Theme,
    clear: bool,
    enable_emoji: bool,
) -> anyhow::Result<()> {
    if text.trim().is_empty() {
        session.state.reset_output();
        return Ok(());
    }

    debug!(chars = text.chars().count(), "debounced input settled");
    session.requests += 1;
    session.log(format!("translating {} chars", text.chars().count()));

    if clear {
        clear_screen(out);
        writeln!(out, "{}", text)?;
    }
    let model = state.translator.model().to_string();
    write!(
        out,
        "{}",
        format_header(theme, AppMode::Text, &model, None, None, enable_emoji)
    )?;
    out.flush()?;

    session.state.begin();
    let result = {
        let translation_state = &mut session.state;
        let mut relay = |chunk: &str| {
            translation_state.push_chunk(chunk);
            write!(out, "{}", (theme.body)(chunk)).ok();
            out.flush().ok();
        };
        translate_text(state, text, false, Some(&mut relay)).await
    };

    match result {
        Ok(translation) => {
            session.state.finish();
            writeln!(out)?;
            session.log(format!(
                "done ({:?}, {} chars)",
                translation.source,
                translation.output.chars().count()
            ));
        }
        Err(e) => {
            let message = e.user_message();
            session.state.fail(message.clone());
            writeln!(out)?;
            writeln!(out, "{}", (theme.error)(&message))?;
            session.log(format!("error: {}", e));
        }
    }
    Ok(())
}
