//! form-hierarchy: browse the repeat structure of a filled-in form.
#![allow(clippy::multiple_crate_versions)]

use clap::Parser;
use form_hierarchy::builder::HierarchyBuilder;
use form_hierarchy::config::Config;
use form_hierarchy::cursor::FormCursor;
use form_hierarchy::form_index::FormIndex;
use form_hierarchy::memory::{FormDefinition, MemoryCursor};
use form_hierarchy::session::HierarchySession;
use form_hierarchy::ui;
use ratatui::crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

type Session = HierarchySession<MemoryCursor, ui::Screen>;

#[derive(Parser)]
#[command(name = "form-hierarchy")]
#[command(about = "Collapsible hierarchy navigation for survey forms", long_about = None)]
struct Args {
    /// Form outline to browse (JSON)
    #[arg(value_name = "FORM")]
    form: PathBuf,

    /// Index to open the hierarchy at, e.g. /household[1]/head
    #[arg(long, default_value = "<beginning>")]
    start: FormIndex,

    /// Print the hierarchy level as JSON instead of opening the browser
    #[arg(long)]
    print: bool,

    /// Prefix for repeat instance rows
    #[arg(long, value_name = "STR")]
    indent: Option<String>,

    /// Show a ".." row that ascends one level
    #[arg(long)]
    up_row: bool,

    /// Load configuration from this file instead of form-hierarchy.toml
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Write logs to this file instead of stderr
    #[arg(long, value_name = "PATH")]
    log_file: Option<PathBuf>,
}

fn main() -> io::Result<()> {
    let args = Args::parse();
    init_logging(args.log_file.as_deref())?;

    let mut cfg = match &args.config {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    };

    // Override config with command line args
    if let Some(indent) = args.indent {
        cfg.child_indent = indent;
    }
    if args.up_row {
        cfg.show_up_row = true;
    }

    let form = FormDefinition::load(&args.form)?;
    let mut cursor = MemoryCursor::new(&form);
    cursor
        .jump_to(&args.start)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;

    if args.print {
        let view = HierarchyBuilder::new(&cfg)
            .build(&mut cursor)
            .map_err(io::Error::other)?;
        let json = serde_json::to_string_pretty(&view).map_err(io::Error::other)?;
        println!("{json}");
        return Ok(());
    }

    let screen = ui::Screen::new(cursor.title());
    run_tui(HierarchySession::open(cursor, screen, cfg))
}

fn init_logging(log_file: Option<&Path>) -> io::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let subscriber = tracing_subscriber::fmt().with_env_filter(filter);
    match log_file {
        Some(path) => subscriber
            .with_writer(Mutex::new(File::create(path)?))
            .with_ansi(false)
            .init(),
        None => subscriber.with_writer(io::stderr).init(),
    }
    Ok(())
}

fn run_tui(mut session: Session) -> io::Result<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, &mut session);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(e) = result {
        eprintln!("Error: {e}");
    } else {
        let summary = serde_json::json!({
            "outcome": session.outcome(),
            "index": session.cursor().current_index().to_string(),
        });
        let json = serde_json::to_string_pretty(&summary).map_err(io::Error::other)?;
        println!("{json}");
    }

    Ok(())
}

fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    session: &mut Session,
) -> io::Result<()> {
    loop {
        terminal.draw(|f| ui::draw(f, session.host(), session.focus()))?;

        if session.outcome().is_some() {
            return Ok(());
        }

        if let Event::Key(key) = event::read()? {
            if key.kind != KeyEventKind::Press {
                continue;
            }

            // Any key acknowledges a pending error
            if session.host_mut().message.take().is_some() {
                continue;
            }

            match key.code {
                KeyCode::Char('q') | KeyCode::Esc => session.back(),
                KeyCode::Up | KeyCode::Char('k') => session.move_focus(-1),
                KeyCode::Down | KeyCode::Char('j') => session.move_focus(1),
                KeyCode::Enter | KeyCode::Right | KeyCode::Char('l') => session.select_focused(),
                KeyCode::Backspace | KeyCode::Left | KeyCode::Char('u' | 'h') => {
                    if session.view().ascend_enabled {
                        session.ascend();
                    }
                }
                KeyCode::Char('g') | KeyCode::Home => session.jump_to_beginning(),
                KeyCode::Char('G') | KeyCode::End => session.jump_to_end(),
                _ => {}
            }
        }
    }
}
