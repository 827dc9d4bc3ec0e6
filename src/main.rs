//! posterm - Actor-based terminal point-of-sale client
//!
//! Architecture:
//! - UI Layer (Ratatui) - synchronous terminal rendering
//! - App Layer - central state machine processing events
//! - Network Layer (Tokio) - async backend, identity and printer I/O

use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use crossterm::{
    event::{self, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{prelude::*, widgets::*};
use tokio::sync::mpsc;
use tracing_subscriber::EnvFilter;

use posterm::constants::{APP_NAME, APP_VERSION, LOG_FILE, PRINTER_TIMEOUT_SECS};
use posterm::messages::render::{DetailView, FormView, NoticeView, TableView};
use posterm::messages::ui_events::{key_to_ui_event, InputMode, Overlay, Screen};
use posterm::network::client::create_client;
use posterm::storage::{default_data_dir, expand_home, Storage};
use posterm::ui::{centered_rect, form_lines, render_input, render_tabs, tone_style};
use posterm::{
    ApiClient, AppActor, AppState, NetworkActor, NetworkCommand, NetworkResponse, RenderState, RestIdentity, Settings,
    UiEvent,
};

/// Terminal point-of-sale client
#[derive(Parser, Debug)]
#[command(name = "posterm", version, about)]
struct Cli {
    /// Directory holding settings, session and saved documents
    #[arg(long, value_name = "DIR")]
    data_dir: Option<String>,

    /// Backend base URL (overrides settings and POSTERM_BASE_URL)
    #[arg(long, value_name = "URL")]
    base_url: Option<String>,

    /// Log filter, e.g. `debug` or `posterm=trace` (defaults to RUST_LOG, then `info`)
    #[arg(long, value_name = "FILTER")]
    log_level: Option<String>,

    /// Log file path (defaults to posterm.log in the data directory)
    #[arg(long, value_name = "FILE")]
    log_file: Option<String>,
}

/// Terminal cleanup guard
struct TerminalGuard;

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let data_dir = cli.data_dir.as_deref().map(expand_home).unwrap_or_else(default_data_dir);
    std::fs::create_dir_all(&data_dir)
        .with_context(|| format!("creating data directory {}", data_dir.display()))?;

    // Initialize logging to file; the terminal belongs to the TUI
    let log_path = cli
        .log_file
        .as_deref()
        .map(expand_home)
        .unwrap_or_else(|| data_dir.join(LOG_FILE));
    let log_dir = log_path.parent().map(PathBuf::from).unwrap_or_else(|| PathBuf::from("."));
    let log_name = log_path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| String::from(LOG_FILE));
    let file_appender = tracing_appender::rolling::never(log_dir, log_name);
    let (non_blocking, _log_guard) = tracing_appender::non_blocking(file_appender);
    let filter = match cli.log_level.as_deref() {
        Some(level) => EnvFilter::try_new(level).with_context(|| format!("invalid log level {:?}", level))?,
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(non_blocking)
        .with_ansi(false)
        .init();

    // Settings: file, then environment, then flags
    let mut settings = Settings::load(&data_dir)?;
    settings.apply_env(|key| std::env::var(key).ok());
    if let Some(url) = cli.base_url {
        settings.base_url = url;
    }
    tracing::info!(
        app = APP_NAME,
        version = APP_VERSION,
        data_dir = %data_dir.display(),
        backend = settings.backend_url(),
        "Starting"
    );

    let timeout = Duration::from_secs(settings.request_timeout_secs);
    let api = ApiClient::new(create_client(timeout), settings.backend_url());
    let identity = RestIdentity::new(
        settings.identity_base_url.clone(),
        settings.identity_api_key.clone(),
        timeout,
    );
    let state = AppState::new(settings, Storage::new(data_dir));

    // Terminal setup
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let _guard = TerminalGuard;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Create channels
    let (ui_tx, ui_rx) = mpsc::unbounded_channel::<UiEvent>();
    let (net_cmd_tx, net_cmd_rx) = mpsc::unbounded_channel::<NetworkCommand>();
    let (net_resp_tx, net_resp_rx) = mpsc::unbounded_channel::<NetworkResponse>();
    let (render_tx, mut render_rx) = mpsc::unbounded_channel::<RenderState>();

    // Spawn network actor
    let network_actor = NetworkActor::new(
        api,
        Arc::new(identity),
        net_resp_tx,
        Duration::from_secs(PRINTER_TIMEOUT_SECS),
    );
    tokio::spawn(network_actor.run(net_cmd_rx));

    // Spawn app actor
    let app_actor = AppActor::new(state, net_cmd_tx, render_tx);
    tokio::spawn(app_actor.run(ui_rx, net_resp_rx));

    // Run UI loop (synchronous with async polling)
    run_ui_loop(&mut terminal, ui_tx, &mut render_rx).await?;

    tracing::info!("Shutting down");
    Ok(())
}

/// Run the synchronous UI rendering loop
async fn run_ui_loop(
    terminal: &mut Terminal<impl Backend>,
    ui_tx: mpsc::UnboundedSender<UiEvent>,
    render_rx: &mut mpsc::UnboundedReceiver<RenderState>,
) -> anyhow::Result<()> {
    let mut current_state = RenderState::default();

    loop {
        // Draw with current state
        terminal.draw(|f| draw_ui(f, &current_state))?;

        // Poll for events with timeout
        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                if let Some(event) = key_to_ui_event(
                    key,
                    current_state.screen,
                    current_state.input_mode,
                    current_state.overlay,
                ) {
                    if matches!(event, UiEvent::Quit) {
                        let _ = ui_tx.send(event);
                        break;
                    }
                    let _ = ui_tx.send(event);
                }
            }
        }

        // Check for state updates (non-blocking)
        while let Ok(state) = render_rx.try_recv() {
            current_state = state;
        }
    }

    Ok(())
}

// ============================================================================
// UI Drawing Functions
// ============================================================================

fn draw_ui(f: &mut Frame, state: &RenderState) {
    let area = f.area();

    let main_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Tab bar
            Constraint::Min(0),    // Content
            Constraint::Length(1), // Key hints
            Constraint::Length(1), // Status bar
        ])
        .split(area);

    draw_tab_bar(f, state, main_chunks[0]);
    draw_content(f, state, main_chunks[1]);

    let hints = Paragraph::new(format!(" {}", state.key_hints)).style(Style::default().fg(Color::DarkGray));
    f.render_widget(hints, main_chunks[2]);

    draw_status_bar(f, state, main_chunks[3]);

    // Popups
    if state.overlay == Overlay::Help {
        draw_help_popup(f, state.screen, area);
    }
    if let Some(message) = &state.confirm {
        draw_confirm_popup(f, message, area);
    }
    if let Some(notice) = &state.notice {
        draw_notice_popup(f, notice, area);
    }
}

fn draw_tab_bar(f: &mut Frame, state: &RenderState, area: Rect) {
    if state.screen.is_auth() {
        let title = Line::from(vec![
            Span::styled(format!(" {} ", APP_NAME), Style::default().fg(Color::Black).bg(Color::Cyan).bold()),
            Span::raw(format!(" {}", state.screen.title())),
        ]);
        f.render_widget(Paragraph::new(title), area);
        return;
    }

    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(0), Constraint::Length(30)])
        .split(area);
    f.render_widget(render_tabs(state.screen), chunks[0]);

    let user = state.user.clone().unwrap_or_default();
    f.render_widget(
        Paragraph::new(Line::from(user).right_aligned()).style(Style::default().fg(Color::Green)),
        chunks[1],
    );
}

fn draw_content(f: &mut Frame, state: &RenderState, area: Rect) {
    let mut constraints = Vec::new();
    if state.input.is_some() {
        constraints.push(Constraint::Length(3));
    }
    constraints.push(Constraint::Min(3));
    if !state.summary.is_empty() {
        constraints.push(Constraint::Length(state.summary.len() as u16 + 2));
    }
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(area);

    let mut next = 0;
    if let Some(input) = &state.input {
        f.render_widget(render_input(input), chunks[next]);
        next += 1;
    }
    draw_main_area(f, state, chunks[next]);
    if !state.summary.is_empty() {
        draw_summary(f, &state.summary, chunks[next + 1]);
    }
}

fn draw_main_area(f: &mut Frame, state: &RenderState, area: Rect) {
    // At most two panes: primary (form or table) and a side pane (detail or preview)
    let side = state.detail.is_some() && (state.form.is_some() || state.table.is_some()) || state.preview.is_some();
    let (main, side_area) = if side {
        let chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
            .split(area);
        (chunks[0], Some(chunks[1]))
    } else {
        (area, None)
    };

    if let Some(form) = &state.form {
        draw_form(f, form, main);
    } else if let Some(table) = &state.table {
        draw_table(f, table, main);
    } else if let Some(detail) = &state.detail {
        draw_detail(f, detail, main);
    }

    if let Some(side_area) = side_area {
        if let Some(preview) = &state.preview {
            let block = Block::default().borders(Borders::ALL).title(" Last receipt ");
            f.render_widget(Paragraph::new(preview.as_str()).block(block), side_area);
        } else if let Some(detail) = &state.detail {
            draw_detail(f, detail, side_area);
        }
    }
}

fn draw_form(f: &mut Frame, form: &FormView, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow))
        .title(format!(" {} ", form.title));

    let mut lines = form_lines(&form.rows);
    if !form.hint.is_empty() {
        lines.push(Line::raw(""));
        lines.push(Line::styled(form.hint.clone(), Style::default().fg(Color::DarkGray)));
    }

    // Keep the focused row visible in long forms (purchase orders)
    let focused = form.rows.iter().position(|r| r.focused).unwrap_or(0) as u16;
    let visible = area.height.saturating_sub(2);
    let scroll = focused.saturating_sub(visible.saturating_sub(1));

    f.render_widget(Paragraph::new(lines).block(block).scroll((scroll, 0)), area);
}

fn draw_table(f: &mut Frame, table: &TableView, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(format!(" {} ({}) ", table.title, table.rows.len()));

    if table.rows.is_empty() {
        let empty = Paragraph::new(table.empty_message.as_str())
            .style(Style::default().fg(Color::DarkGray))
            .block(block);
        f.render_widget(empty, area);
        return;
    }

    let header = Row::new(table.columns.iter().map(|c| Cell::from(c.as_str())))
        .style(Style::default().fg(Color::Yellow).bold());
    let rows = table.rows.iter().enumerate().map(|(i, cells)| {
        let style = table.tones.get(i).copied().map(tone_style).unwrap_or_default();
        Row::new(cells.iter().map(|c| Cell::from(c.as_str()))).style(style)
    });
    let widths = vec![Constraint::Fill(1); table.columns.len().max(1)];

    let widget = Table::new(rows, widths)
        .header(header)
        .block(block)
        .row_highlight_style(Style::default().bg(Color::DarkGray).bold())
        .highlight_symbol("> ");

    let mut table_state = TableState::default();
    table_state.select(table.selected);
    f.render_stateful_widget(widget, area, &mut table_state);
}

fn draw_detail(f: &mut Frame, detail: &DetailView, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!(" {} ", detail.title));
    let width = detail.lines.iter().map(|(k, _)| k.chars().count()).max().unwrap_or(0);
    let lines: Vec<Line> = detail
        .lines
        .iter()
        .map(|(key, value)| {
            Line::from(vec![
                Span::styled(format!("{:<width$}  ", key, width = width), Style::default().fg(Color::Cyan)),
                Span::raw(value.clone()),
            ])
        })
        .collect();
    f.render_widget(Paragraph::new(lines).block(block).wrap(Wrap { trim: false }), area);
}

fn draw_summary(f: &mut Frame, summary: &[(String, String)], area: Rect) {
    let lines: Vec<Line> = summary
        .iter()
        .map(|(key, value)| {
            Line::from(vec![
                Span::styled(format!("{}: ", key), Style::default().fg(Color::Gray)),
                Span::styled(value.clone(), Style::default().bold()),
            ])
        })
        .collect();
    let block = Block::default().borders(Borders::ALL).title(" Summary ");
    f.render_widget(Paragraph::new(lines).block(block), area);
}

fn draw_status_bar(f: &mut Frame, state: &RenderState, area: Rect) {
    let mode = if state.input_mode == InputMode::Editing { "EDIT" } else { "NORMAL" };
    let loading = if state.loading { " Loading..." } else { "" };
    let bar = Paragraph::new(format!(" [{}]{} {}", mode, loading, state.status))
        .style(Style::default().fg(Color::DarkGray));
    f.render_widget(bar, area);
}

fn draw_help_popup(f: &mut Frame, screen: Screen, area: Rect) {
    let popup_area = centered_rect(60, 70, area);

    let screen_keys = match screen {
        Screen::SignIn | Screen::SignUp => "   Tab / Shift+Tab    Next / previous field\n   Enter              Submit\n   Ctrl+U             Create an account\n   Ctrl+R             Send password reset",
        Screen::Sales => "   Enter / a          Add selected product to cart\n   /                  Search by name or code\n   b                  Barcode entry\n   c                  Cycle category",
        Screen::Cart => "   + / -              Change quantity\n   x                  Remove line\n   u                  Cycle currency\n   c                  Choose customer\n   p                  Enter amount paid\n   s                  Submit sale\n   P                  Reprint last receipt",
        Screen::Products => "   /                  Search\n   n                  New product\n   e / Enter          Edit product\n   t                  Transfer stock\n   d                  Delete product",
        Screen::Suppliers => "   /                  Search\n   Enter              Supplier details\n   n                  New supplier\n   e                  Edit supplier\n   d                  Delete supplier",
        Screen::PurchaseOrders => "   n                  New purchase order\n   e / Enter          Edit purchase order\n   d                  Delete purchase order\n   f                  Download PDF\n   Ctrl+N / Ctrl+D    Add / remove item (in form)",
        Screen::LowStock => "   Enter              Product details\n   r                  Refresh now",
        Screen::Settings => "   p                  Printer settings\n   t                  Print test page\n   w                  Change password\n   o                  Sign out",
    };

    let help_text = format!(
        "\n {} {} - {}\n\n NAVIGATION\n   1-7                Switch screen\n   ↑ / ↓ (k / j)      Move selection\n   r                  Refresh\n\n {}\n{}\n\n FORMS\n   Tab / ↑ / ↓        Move between fields\n   Space / ← / →      Cycle choices, toggle checkboxes\n   Enter              Save\n   Esc                Cancel\n\n GENERAL\n   ?                  Toggle this help\n   q / Ctrl+C         Quit\n\n Press any key to close...\n",
        APP_NAME,
        APP_VERSION,
        screen.title(),
        screen.title().to_uppercase(),
        screen_keys,
    );

    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Help ")
        .style(Style::default().bg(Color::Black));

    let help = Paragraph::new(help_text)
        .block(block)
        .wrap(Wrap { trim: false });

    f.render_widget(Clear, popup_area);
    f.render_widget(help, popup_area);
}

fn draw_confirm_popup(f: &mut Frame, message: &str, area: Rect) {
    let popup_area = centered_rect(50, 30, area);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow))
        .title(" Confirm ")
        .title_bottom(Line::from(" [y] yes  [n] no ").right_aligned())
        .style(Style::default().bg(Color::Black));

    let text = Paragraph::new(message).block(block).wrap(Wrap { trim: false });
    f.render_widget(Clear, popup_area);
    f.render_widget(text, popup_area);
}

fn draw_notice_popup(f: &mut Frame, notice: &NoticeView, area: Rect) {
    let popup_area = centered_rect(60, 30, area);
    let color = if notice.title == "Error" || notice.title.ends_with("failed") || notice.title.ends_with("error") {
        Color::Red
    } else {
        Color::Cyan
    };
    let keys = if notice.can_retry {
        " [r] retry  [Enter] close "
    } else {
        " [Enter] close "
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(color))
        .title(format!(" {} ", notice.title))
        .title_bottom(Line::from(keys).right_aligned())
        .style(Style::default().bg(Color::Black));

    let text = Paragraph::new(notice.message.as_str()).block(block).wrap(Wrap { trim: false });
    f.render_widget(Clear, popup_area);
    f.render_widget(text, popup_area);
}
