use anyhow::Result;
use cloudnav_resource_search::Resource;
use cloudnav_resource_search::SearchEngine;
use cloudnav_search_session::SearchSession;
use cloudnav_search_session::SessionConfig;
use cloudnav_search_session::SessionEffect;
use cloudnav_search_session::SessionKey;
use crossterm::cursor::MoveTo;
use crossterm::event::Event;
use crossterm::event::KeyCode;
use crossterm::event::KeyModifiers;
use crossterm::event::{self};
use crossterm::execute;
use crossterm::queue;
use crossterm::style::Print;
use crossterm::terminal::Clear;
use crossterm::terminal::ClearType;
use crossterm::terminal::EnterAlternateScreen;
use crossterm::terminal::LeaveAlternateScreen;
use crossterm::terminal::disable_raw_mode;
use crossterm::terminal::enable_raw_mode;
use crossterm::terminal::{self};
use std::io::Write;
use std::io::{self};
use std::sync::Arc;

const HINT: &str = "type to search · ↑/↓ select · PgUp/PgDn history · Tab complete · Enter commit · Esc quit";
const DETAIL_ROWS: usize = 8;

struct TerminalGuard {
    stdout: io::Stdout,
}

impl TerminalGuard {
    fn enter() -> Result<Self> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        Ok(Self { stdout })
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = execute!(self.stdout, LeaveAlternateScreen);
        let _ = disable_raw_mode();
    }
}

pub(crate) fn run(engine: Arc<SearchEngine>, config: SessionConfig) -> Result<()> {
    let mut session = SearchSession::new(Arc::clone(&engine), config);
    session.enter();
    let mut details: Option<Resource> = None;
    let mut guard = TerminalGuard::enter()?;

    loop {
        let (width, height) = terminal::size()?;
        let frame = render_frame(&session, &engine, details.as_ref(), height as usize);
        draw(&mut guard.stdout, &frame, width as usize)?;

        let Event::Key(key_event) = event::read()? else {
            continue;
        };
        if key_event.code == KeyCode::Char('c') && key_event.modifiers.contains(KeyModifiers::CONTROL)
        {
            break;
        }
        let Some(key) = SessionKey::from_key_event(&key_event) else {
            continue;
        };
        match session.handle_key(key) {
            SessionEffect::RestoreUnfiltered => break,
            SessionEffect::LoadDetails(id) => details = engine.resource(&id),
            SessionEffect::Refreshed => details = None,
            SessionEffect::None => {}
        }
    }
    Ok(())
}

fn draw(out: &mut impl Write, frame: &[String], width: usize) -> Result<()> {
    queue!(out, Clear(ClearType::All))?;
    for (row, line) in frame.iter().enumerate() {
        let clipped: String = line.chars().take(width).collect();
        queue!(out, MoveTo(0, row as u16), Print(clipped))?;
    }
    out.flush()?;
    Ok(())
}

/// Lines for one screen of the browser, top to bottom.
fn render_frame(
    session: &SearchSession,
    engine: &SearchEngine,
    details: Option<&Resource>,
    height: usize,
) -> Vec<String> {
    let mut lines = vec![format!("search: {}", session.query())];
    let suggestions = session.inline_suggestions();
    lines.push(if suggestions.is_empty() {
        String::new()
    } else {
        format!("  ↳ {}", suggestions.join(" · "))
    });

    let detail_rows = if details.is_some() { DETAIL_ROWS } else { 0 };
    let list_rows = height.saturating_sub(lines.len() + detail_rows + 1);

    if session.shows_unfiltered() {
        let resources = engine.resources();
        lines.push(format!("{} resources", resources.len()));
        for resource in resources.iter().take(list_rows.saturating_sub(1)) {
            lines.push(format!("  {}  {}  {}", resource.name, resource.resource_type, resource.location));
        }
    } else {
        let results = session.results();
        lines.push(format!("{} results", results.len()));
        for (idx, result) in results.iter().take(list_rows.saturating_sub(1)).enumerate() {
            let marker = if session.selected() == Some(idx) { '>' } else { ' ' };
            lines.push(format!(
                "{marker} {}  {:.1}  {}={}",
                result.name, result.score, result.match_type, result.match_value
            ));
        }
    }

    if let Some(resource) = details {
        lines.push(format!("── {} ──", resource.id));
        lines.push(format!("type: {}  location: {}", resource.resource_type, resource.location));
        lines.push(format!("resource group: {}", resource.resource_group));
        lines.extend(
            resource
                .properties
                .iter()
                .take(DETAIL_ROWS - 3)
                .map(|(key, value)| format!("{key}: {value}")),
        );
    }

    lines.push(HINT.to_string());
    lines
}
