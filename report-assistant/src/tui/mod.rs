//! Terminal UI (TUI) for the report assistant.
//!
//! Layout:
//! - Centered window frame titled "SCADA Assistant"
//! - Login card until a session is established
//! - Shell: breadcrumb top bar, sidebar navigation, content pane
//! - Report generator: step indicator, active panel, bottom row [ Back ] [ Next ] [ Cancel ]
//! - Modal confirmations and transient notifications (top right)
//!
//! Slow calls (login, report submission) run on a worker thread with its own current-thread
//! runtime and report back over an mpsc channel drained once per tick.
//!
//! Note: Logging is file-only in TUI mode (stdout logging is disabled) to avoid corrupting the terminal UI.

mod draw;
mod input;

use crate::backend::auth::{authenticate_with_retry, AuthError, StubAuthenticator};
use crate::backend::reporting::{submit_with_timeout, GenerationError, StubReportBackend};
use crate::config::AppConfig;
use crate::data::{DataProvider, MockDataProvider};
use crate::models::draft::{ReportDraft, ReportType};
use crate::models::requests::{AuthMode, Credentials, LoginForm};
use crate::models::responses::{ReportHandle, Session};
use crate::navigation::Route;
use crate::panels::preview::SortKey;
use crate::panels::{report_wizard, ReportForms};
use crate::utils::logging::mask_sensitive;
use crate::utils::validation::FieldErrors;
use crate::wizard::{Wizard, WizardError};
use anyhow::Result;
use chrono::{NaiveDate, Utc};
use crossterm::event::{self, Event, KeyCode};
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use crossterm::ExecutableCommand;
use log::{info, warn};
use ratatui::backend::{CrosstermBackend, TestBackend};
use ratatui::buffer::Buffer;
use ratatui::Terminal;
use std::io::{self, Stdout};
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};
use uuid::Uuid;

const WINDOW_WIDTH: u16 = 100;
const WINDOW_HEIGHT: u16 = 30;
const TOAST_TTL: Duration = Duration::from_secs(4);
const DATE_FORMAT: &str = "%Y-%m-%d";

/// Smoke targets that are not plain route names.
pub const SMOKE_TARGETS: [&str; 9] = [
    "login",
    "login-windows",
    "dashboard",
    "criteria",
    "template",
    "preview",
    "charts",
    "output",
    "cancel",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Page {
    Login,
    Route(Route),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Pane {
    Sidebar,
    Content,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ButtonFocus {
    Back,
    Next,
    Cancel,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FocusTarget {
    Field(usize),
    Button(ButtonFocus),
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Modal {
    /// Abandon the report in progress.
    ConfirmCancel,
    /// Leave the application.
    ConfirmQuit,
    Message { title: String, body: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ToastKind {
    Info,
    Success,
    Error,
}

#[derive(Debug, Clone)]
struct Toast {
    title: String,
    body: String,
    kind: ToastKind,
    shown_at: Instant,
}

#[derive(Debug)]
enum UiMsg {
    LoginFinished(Result<Session, AuthError>),
    ReportFinished(Result<ReportHandle, GenerationError>),
}

/// Single-line editable text. `cursor` counts chars, not bytes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct TextInput {
    value: String,
    cursor: usize,
}

impl TextInput {
    fn new(value: impl Into<String>) -> Self {
        let mut input = Self::default();
        input.set(value);
        input
    }

    fn set(&mut self, value: impl Into<String>) {
        self.value = value.into();
        self.cursor = self.value.chars().count();
    }

    fn char_len(&self) -> usize {
        self.value.chars().count()
    }

    fn byte_index(&self) -> usize {
        self.value
            .char_indices()
            .nth(self.cursor)
            .map(|(i, _)| i)
            .unwrap_or(self.value.len())
    }

    fn handle_key(&mut self, code: KeyCode) -> bool {
        match code {
            KeyCode::Char(c) => {
                let idx = self.byte_index();
                self.value.insert(idx, c);
                self.cursor += 1;
                true
            }
            KeyCode::Backspace => {
                if self.cursor > 0 {
                    self.cursor -= 1;
                    let idx = self.byte_index();
                    self.value.remove(idx);
                }
                true
            }
            KeyCode::Delete => {
                if self.cursor < self.char_len() {
                    let idx = self.byte_index();
                    self.value.remove(idx);
                }
                true
            }
            KeyCode::Left => {
                self.cursor = self.cursor.saturating_sub(1);
                true
            }
            KeyCode::Right => {
                self.cursor = (self.cursor + 1).min(self.char_len());
                true
            }
            KeyCode::Home => {
                self.cursor = 0;
                true
            }
            KeyCode::End => {
                self.cursor = self.char_len();
                true
            }
            _ => false,
        }
    }
}

struct LoginState {
    mode: AuthMode,
    server: TextInput,
    database: TextInput,
    username: TextInput,
    password: TextInput,
    show_password: bool,
    errors: FieldErrors,
    pending: bool,
}

impl LoginState {
    fn new() -> Self {
        Self {
            mode: AuthMode::Sql,
            server: TextInput::default(),
            database: TextInput::default(),
            username: TextInput::default(),
            password: TextInput::default(),
            show_password: false,
            errors: FieldErrors::new(),
            pending: false,
        }
    }

    /// Switching tabs starts from a blank form.
    fn switch_mode(&mut self, mode: AuthMode) {
        if mode != self.mode {
            *self = Self {
                mode,
                ..Self::new()
            };
        }
    }

    fn form(&self) -> LoginForm {
        let mut form = LoginForm::default();
        form.set_mode(self.mode);
        form.server = self.server.value.clone();
        form.database = self.database.value.clone();
        form.username = self.username.value.clone();
        form.password = self.password.value.clone();
        form.show_password = self.show_password;
        form
    }

    fn field_count(&self) -> usize {
        match self.mode {
            // tabs, server, database, username, password, show password
            AuthMode::Sql => 6,
            // tabs, username
            AuthMode::Windows => 2,
        }
    }

    fn input_mut(&mut self, field: usize) -> Option<&mut TextInput> {
        match (self.mode, field) {
            (AuthMode::Sql, 1) => Some(&mut self.server),
            (AuthMode::Sql, 2) => Some(&mut self.database),
            (AuthMode::Sql, 3) | (AuthMode::Windows, 1) => Some(&mut self.username),
            (AuthMode::Sql, 4) => Some(&mut self.password),
            _ => None,
        }
    }
}

/// Report generator: wizard, panel forms, and the text inputs and cursors that feed them.
struct ReportState {
    wizard: Wizard<ReportForms, ReportDraft>,
    forms: ReportForms,
    errors: FieldErrors,
    submitting: bool,

    date_from: TextInput,
    date_to: TextInput,
    machine_search: TextInput,
    machine_cursor: usize,

    template_search: TextInput,
    template_cursor: usize,

    preview_search: TextInput,
    sort_column: SortKey,
    row_cursor: usize,

    file_name: TextInput,
    recipients: TextInput,
    email_message: TextInput,
}

impl ReportState {
    fn new(provider: &dyn DataProvider, today: NaiveDate) -> Result<Self, WizardError> {
        let mut state = Self {
            wizard: report_wizard()?,
            forms: ReportForms::from_provider(provider, today),
            errors: FieldErrors::new(),
            submitting: false,
            date_from: TextInput::default(),
            date_to: TextInput::default(),
            machine_search: TextInput::default(),
            machine_cursor: 0,
            template_search: TextInput::default(),
            template_cursor: 0,
            preview_search: TextInput::default(),
            sort_column: SortKey::Timestamp,
            row_cursor: 0,
            file_name: TextInput::default(),
            recipients: TextInput::default(),
            email_message: TextInput::default(),
        };
        state.load_inputs();
        Ok(state)
    }

    /// Back to the first step with fresh panels.
    fn reset(&mut self, today: NaiveDate) {
        self.wizard.reset();
        self.forms.reset(today);
        self.errors = FieldErrors::new();
        self.machine_cursor = 0;
        self.template_cursor = 0;
        self.sort_column = SortKey::Timestamp;
        self.row_cursor = 0;
        self.load_inputs();
    }

    /// Copy form values into the text inputs.
    fn load_inputs(&mut self) {
        let fmt = |d: Option<NaiveDate>| {
            d.map(|d| d.format(DATE_FORMAT).to_string())
                .unwrap_or_default()
        };
        self.date_from.set(fmt(self.forms.criteria.date_from));
        self.date_to.set(fmt(self.forms.criteria.date_to));
        self.machine_search
            .set(self.forms.criteria.machine_search.clone());
        self.template_search.set(self.forms.template.search.clone());
        self.preview_search.set(self.forms.preview.search().to_string());
        self.file_name.set(self.forms.output.file_name.clone());
        self.recipients.set(self.forms.output.recipients.clone());
        self.email_message
            .set(self.forms.output.email_message.clone());
    }

    /// Copy text inputs into the forms. Unparseable dates count as missing.
    fn sync_forms(&mut self) {
        let parse = |s: &str| NaiveDate::parse_from_str(s.trim(), DATE_FORMAT).ok();
        self.forms.criteria.date_from = parse(&self.date_from.value);
        self.forms.criteria.date_to = parse(&self.date_to.value);
        self.forms.criteria.machine_search = self.machine_search.value.clone();
        self.forms.template.search = self.template_search.value.clone();
        self.forms.preview.set_search(self.preview_search.value.clone());
        self.forms.output.file_name = self.file_name.value.clone();
        self.forms.output.recipients = self.recipients.value.clone();
        self.forms.output.email_message = self.email_message.value.clone();
    }

    fn step(&self) -> usize {
        self.wizard.step_index()
    }

    fn field_count(&self) -> usize {
        match self.step() {
            // from, to, machine search, machine list, report type
            0 => 5,
            // search, category, view mode, template list
            1 => 4,
            // search, sort column, select all, rows
            2 => 4,
            // include toggle, then type, x, y, colors when included
            3 => {
                if self.forms.charts.include_charts() {
                    5
                } else {
                    1
                }
            }
            // format, file name, email toggle, then recipients and message when emailing
            _ => {
                if self.forms.output.email_immediately() {
                    5
                } else {
                    3
                }
            }
        }
    }
}

struct AppState {
    page: Page,
    pane: Pane,
    sidebar_index: usize,
    focus: FocusTarget,
    modal: Option<Modal>,
    toast: Option<Toast>,
    quit: bool,

    session: Option<Session>,
    login: LoginState,
    report: ReportState,

    config: AppConfig,
    today: NaiveDate,
}

impl AppState {
    fn new(config: AppConfig, provider: &dyn DataProvider, today: NaiveDate) -> Result<Self> {
        Ok(Self {
            page: Page::Login,
            pane: Pane::Content,
            sidebar_index: 0,
            focus: FocusTarget::Field(0),
            modal: None,
            toast: None,
            quit: false,
            session: None,
            login: LoginState::new(),
            report: ReportState::new(provider, today)?,
            config,
            today,
        })
    }

    fn route(&self) -> Option<Route> {
        match self.page {
            Page::Login => None,
            Page::Route(route) => Some(route),
        }
    }

    fn show_toast(&mut self, title: impl Into<String>, body: impl Into<String>, kind: ToastKind) {
        self.toast = Some(Toast {
            title: title.into(),
            body: body.into(),
            kind,
            shown_at: Instant::now(),
        });
    }

    fn expire_toast(&mut self) {
        if self
            .toast
            .as_ref()
            .is_some_and(|t| t.shown_at.elapsed() >= TOAST_TTL)
        {
            self.toast = None;
        }
    }
}

/// Move to `route` and hand focus to its content.
fn navigate(state: &mut AppState, route: Route) {
    info!(
        "[PHASE: navigation] [STEP: route] {} -> {}",
        state.route().map(|r| r.path()).unwrap_or("/login"),
        route.path()
    );
    state.page = Page::Route(route);
    state.pane = Pane::Content;
    state.sidebar_index = Route::ALL.iter().position(|r| *r == route).unwrap_or(0);
    state.focus = match route {
        Route::ReportGenerator => FocusTarget::Button(ButtonFocus::Next),
        _ => FocusTarget::Field(0),
    };
}

pub fn run(config: &AppConfig) -> Result<()> {
    info!("[PHASE: tui] [STEP: start] Starting TUI");

    let mut terminal = setup_terminal()?;
    let result = run_loop(&mut terminal, config);
    restore_terminal(&mut terminal)?;

    result
}

fn new_real_app_state(config: &AppConfig) -> Result<AppState> {
    let provider = MockDataProvider::new(config.mock_seed);
    info!(
        "[PHASE: tui] [STEP: data] Mock data ready (seed={})",
        provider.seed()
    );
    AppState::new(
        config.clone(),
        &provider,
        chrono::Local::now().date_naive(),
    )
}

/// Smoke-only: seeded state for deterministic page rendering in CI/tooling.
fn new_smoke_app_state(config: &AppConfig, target: &str) -> Result<AppState> {
    let now = chrono::TimeZone::with_ymd_and_hms(&Utc, 2024, 2, 1, 9, 0, 0)
        .single()
        .unwrap_or_else(Utc::now);
    let provider = MockDataProvider::generate(config.mock_seed.unwrap_or(7), now);
    let mut state = AppState::new(config.clone(), &provider, now.date_naive())?;

    let session = Session {
        session_id: Uuid::nil(),
        username: "operator".to_string(),
        mode: AuthMode::Sql,
        established_at: now,
    };

    let wizard_step = match target {
        "login" => return Ok(state),
        "login-windows" => {
            state.login.switch_mode(AuthMode::Windows);
            state.login.username.set("PLANT\\operator");
            return Ok(state);
        }
        "criteria" | "cancel" => Some(0),
        "template" => Some(1),
        "preview" => Some(2),
        "charts" => Some(3),
        "output" => Some(4),
        _ => None,
    };

    state.session = Some(session);

    let Some(step) = wizard_step else {
        let route = if target == "dashboard" {
            Route::Dashboard
        } else {
            Route::from_path(&format!("/{}", target)).ok_or_else(|| {
                anyhow::anyhow!(
                    "unknown smoke target '{}' (expected one of {} or a route name)",
                    target,
                    SMOKE_TARGETS.join("|")
                )
            })?
        };
        navigate(&mut state, route);
        return Ok(state);
    };

    navigate(&mut state, Route::ReportGenerator);
    let report = &mut state.report;
    report.date_from.set("2024-01-01");
    report.date_to.set("2024-01-31");
    report.forms.criteria.toggle_machine("MACHINE-001");
    report.forms.criteria.report_type = Some(ReportType::ProductionSummary);
    report.forms.charts.set_include_charts(true);
    report.sync_forms();
    for _ in 0..step {
        if let Err(errors) = report.wizard.next(&report.forms) {
            anyhow::bail!("smoke state could not reach step {}: {}", step, errors);
        }
    }

    if target == "cancel" {
        state.modal = Some(Modal::ConfirmCancel);
    }
    Ok(state)
}

fn render_frame(state: &AppState, width: u16, height: u16) -> Result<Buffer> {
    let backend = TestBackend::new(width, height);
    let mut terminal = Terminal::new(backend)?;
    terminal.draw(|f| draw::draw(f.size(), f, state))?;
    Ok(terminal.backend().buffer().clone())
}

/// Non-interactive smoke mode: render a single frame and exit.
/// Targets: login|login-windows|dashboard|criteria|template|preview|charts|output|cancel, or
/// a route name such as `templates` or `scheduler`.
pub fn smoke(config: &AppConfig, target: &str) -> Result<()> {
    info!(
        "[PHASE: tui] [STEP: smoke] Rendering single-frame TUI smoke target={}",
        target
    );

    let t = target.trim().to_ascii_lowercase();
    let state = new_smoke_app_state(config, t.as_str())?;

    // In-memory backend: no raw mode or alternate screen.
    render_frame(&state, WINDOW_WIDTH, WINDOW_HEIGHT)?;

    Ok(())
}

fn setup_terminal() -> Result<Terminal<CrosstermBackend<Stdout>>> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    stdout.execute(EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend)?;
    Ok(terminal)
}

fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> Result<()> {
    disable_raw_mode()?;
    terminal.backend_mut().execute(LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}

fn run_loop(terminal: &mut Terminal<CrosstermBackend<Stdout>>, config: &AppConfig) -> Result<()> {
    let tick_rate = Duration::from_millis(100);
    let mut last_tick = Instant::now();
    let mut state = new_real_app_state(config)?;
    let (tx, rx) = mpsc::channel::<UiMsg>();

    while !state.quit {
        drain_messages(&mut state, &rx);
        terminal.draw(|f| draw::draw(f.size(), f, &state))?;

        let timeout = tick_rate
            .checked_sub(last_tick.elapsed())
            .unwrap_or_else(|| Duration::from_millis(0));

        if event::poll(timeout)? {
            match event::read()? {
                Event::Key(key) => input::handle_key(&mut state, key.code, &tx),
                Event::Resize(_, _) => {}
                _ => {}
            }
        }

        if last_tick.elapsed() >= tick_rate {
            state.expire_toast();
            last_tick = Instant::now();
        }
    }

    info!("[PHASE: tui] [STEP: exit] TUI closed");
    Ok(())
}

fn drain_messages(state: &mut AppState, rx: &mpsc::Receiver<UiMsg>) {
    while let Ok(msg) = rx.try_recv() {
        apply_message(state, msg);
    }
}

fn apply_message(state: &mut AppState, msg: UiMsg) {
    match msg {
        UiMsg::LoginFinished(Ok(session)) => {
            state.login.pending = false;
            info!(
                "[PHASE: auth] [STEP: session] Session {} established for {}",
                session.session_id,
                mask_sensitive(&session.username)
            );
            state.session = Some(session);
            state.show_toast(
                "Login Successful",
                "Redirecting to dashboard...",
                ToastKind::Success,
            );
            navigate(state, Route::Dashboard);
        }
        UiMsg::LoginFinished(Err(e)) => {
            state.login.pending = false;
            state.toast = None;
            state.modal = Some(Modal::Message {
                title: "Login Failed".to_string(),
                body: e.user_message(),
            });
            state.focus = FocusTarget::Button(ButtonFocus::Next);
        }
        UiMsg::ReportFinished(Ok(handle)) => {
            state.report.submitting = false;
            state.show_toast(handle.title, handle.message, ToastKind::Success);
            let today = state.today;
            state.report.reset(today);
            state.focus = FocusTarget::Button(ButtonFocus::Next);
        }
        UiMsg::ReportFinished(Err(e)) => {
            // The draft stays as it was so the user can retry.
            state.report.submitting = false;
            state.show_toast(
                "Report Generation Failed",
                e.user_message(),
                ToastKind::Error,
            );
        }
    }
}

fn start_login(state: &mut AppState, credentials: Credentials, tx: &mpsc::Sender<UiMsg>) {
    state.login.pending = true;
    state.show_toast(
        "Login Attempt",
        format!("Authenticating as {}...", credentials.username()),
        ToastKind::Info,
    );

    let authenticator = StubAuthenticator {
        delay: state.config.login_delay(),
        timeout: state.config.auth_timeout(),
        max_retries: state.config.auth_max_retries,
    };
    let tx = tx.clone();
    thread::spawn(move || {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build();
        let result = match rt {
            Ok(rt) => rt.block_on(authenticate_with_retry(&authenticator, &credentials)),
            Err(e) => Err(AuthError::Unavailable {
                internal_details: format!("Internal error starting login: {}", e),
            }),
        };
        let _ = tx.send(UiMsg::LoginFinished(result));
    });
}

fn start_report_submission(state: &mut AppState, draft: ReportDraft, tx: &mpsc::Sender<UiMsg>) {
    state.report.submitting = true;

    let backend = StubReportBackend::new(
        state.report.forms.templates().to_vec(),
        state.config.submit_delay(),
    );
    let tx = tx.clone();
    thread::spawn(move || {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build();
        let result = match rt {
            Ok(rt) => rt.block_on(submit_with_timeout(&backend, &draft)),
            Err(e) => {
                warn!(
                    "[PHASE: report] [STEP: submit] Could not start runtime: {}",
                    e
                );
                Err(GenerationError::ExportFailed {
                    internal_details: format!("Internal error starting submission: {}", e),
                })
            }
        };
        let _ = tx.send(UiMsg::ReportFinished(result));
    });
}
