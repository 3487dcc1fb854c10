// Rendering. Pure functions of `AppState`; nothing here mutates state.

use super::{
    AppState, ButtonFocus, FocusTarget, Modal, Page, Pane, TextInput, Toast, ToastKind,
    WINDOW_HEIGHT, WINDOW_WIDTH,
};
use crate::models::draft::ChartType;
use crate::models::requests::{AuthMode, FIELD_DATABASE, FIELD_PASSWORD, FIELD_SERVER, FIELD_USERNAME};
use crate::navigation::pages::{
    placeholder, HealthState, Severity, Trend, QUICK_ACTIONS, RECENT_ACTIVITY, SERVICE_STATUS,
    STAT_CARDS, SUPPORT_CONTACT, WELCOME_TITLE,
};
use crate::navigation::{breadcrumbs, is_active, nav_items, Route};
use crate::panels::charts::{FIELD_CHART_TYPE, FIELD_COLOR_SCHEME, FIELD_X_AXIS, FIELD_Y_AXIS};
use crate::panels::criteria::{FIELD_DATE_RANGE, FIELD_MACHINE_IDS, FIELD_REPORT_TYPE};
use crate::panels::output::{FIELD_FILE_NAME, FIELD_FORMAT, FIELD_RECIPIENTS};
use crate::panels::preview::{SortDirection, FIELD_ROWS};
use crate::panels::template::{ViewMode, ALL_CATEGORIES, FIELD_TEMPLATE};
use crate::utils::validation::FieldErrors;
use crate::wizard::StepStatus;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Margin, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span, Text};
use ratatui::widgets::{Bar, BarChart, BarGroup, Block, Borders, Clear, Paragraph, Sparkline, Wrap};
use ratatui::Frame;

const APP_VERSION: &str = "1.0.0";
const SIDEBAR_WIDTH: u16 = 26;
const MACHINE_LIST_ROWS: usize = 6;

pub(super) fn draw(area: Rect, f: &mut Frame<'_>, state: &AppState) {
    let window_area = centered_window(area, WINDOW_WIDTH, WINDOW_HEIGHT);

    let outer_block = Block::default()
        .borders(Borders::ALL)
        .title("SCADA Assistant");
    f.render_widget(outer_block, window_area);

    let inner = window_area.inner(&Margin {
        vertical: 1,
        horizontal: 1,
    });

    match state.page {
        Page::Login => draw_login(f, inner, state),
        Page::Route(route) => draw_shell(f, inner, state, route),
    }

    if let Some(toast) = state.toast.as_ref() {
        draw_toast(f, window_area, toast);
    }

    // Modal overlay
    if let Some(modal) = state.modal.as_ref() {
        match modal {
            Modal::ConfirmCancel => draw_confirm_modal(
                f,
                window_area,
                "Cancel Report?",
                "If you cancel now, the report settings you entered will be discarded.",
                "Yes, cancel",
                state,
            ),
            Modal::ConfirmQuit => draw_confirm_modal(
                f,
                window_area,
                "Exit SCADA Assistant?",
                "Any report in progress will be lost.",
                "Yes, exit",
                state,
            ),
            Modal::Message { title, body } => draw_message_modal(f, window_area, title, body, state),
        }
    }
}

fn centered_window(area: Rect, width: u16, height: u16) -> Rect {
    let w = width.min(area.width.saturating_sub(2)).max(60).min(area.width);
    let h = height.min(area.height.saturating_sub(2)).max(20).min(area.height);
    let x = area.x + (area.width.saturating_sub(w)) / 2;
    let y = area.y + (area.height.saturating_sub(h)) / 2;
    Rect {
        x,
        y,
        width: w,
        height: h,
    }
}

fn centered_rect(area: Rect, width: u16, height: u16) -> Rect {
    let w = width.min(area.width);
    let h = height.min(area.height);
    Rect {
        x: area.x + (area.width - w) / 2,
        y: area.y + (area.height - h) / 2,
        width: w,
        height: h,
    }
}

fn is_focused(state: &AppState, field: usize) -> bool {
    state.pane == Pane::Content && state.focus == FocusTarget::Field(field)
}

/// Value with a bar at the cursor position.
fn with_cursor(text: &str, cursor: usize) -> String {
    let mut out = String::with_capacity(text.len() + 3);
    let mut placed = false;
    for (i, c) in text.chars().enumerate() {
        if i == cursor {
            out.push('▏');
            placed = true;
        }
        out.push(c);
    }
    if !placed {
        out.push('▏');
    }
    out
}

fn input_text(input: &TextInput, focused: bool) -> String {
    if focused {
        with_cursor(&input.value, input.cursor)
    } else {
        input.value.clone()
    }
}

fn field_line(focused: bool, label: &str, value: String) -> Line<'static> {
    let prefix = if focused { ">" } else { " " };
    let value_style = if focused {
        Style::default().add_modifier(Modifier::BOLD)
    } else {
        Style::default()
    };
    let label = if label.is_empty() {
        format!("{} ", prefix)
    } else {
        format!("{} {}: ", prefix, label)
    };
    Line::from(vec![Span::raw(label), Span::styled(value, value_style)])
}

fn error_lines(errors: &FieldErrors, field: &str) -> Vec<Line<'static>> {
    errors
        .get(field)
        .unwrap_or_default()
        .iter()
        .map(|m| {
            Line::from(Span::styled(
                format!("    ! {}", m),
                Style::default().fg(Color::Red),
            ))
        })
        .collect()
}

fn checkbox(checked: bool) -> &'static str {
    if checked {
        "[x]"
    } else {
        "[ ]"
    }
}

fn hint(text: &str) -> Line<'static> {
    Line::from(Span::styled(
        text.to_string(),
        Style::default().fg(Color::DarkGray),
    ))
}

fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        text.to_string()
    } else {
        let mut out: String = text.chars().take(width.saturating_sub(1)).collect();
        out.push('…');
        out
    }
}

// ---------------------------------------------------------------------------------------------
// Login

fn draw_login(f: &mut Frame<'_>, area: Rect, state: &AppState) {
    let card = centered_rect(area, 64, 24);
    f.render_widget(
        Block::default().borders(Borders::ALL).title("Welcome Back"),
        card,
    );

    let inner = card.inner(&Margin {
        vertical: 1,
        horizontal: 2,
    });
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints(
            [
                Constraint::Min(0),
                Constraint::Length(1),
                Constraint::Length(1),
            ]
            .as_ref(),
        )
        .split(inner);

    let login = &state.login;
    let form = login.form();

    let mut lines = vec![
        Line::from(Span::styled(
            "Sign in to SCADA Assistant",
            Style::default().add_modifier(Modifier::BOLD),
        )),
        hint("Choose how you want to authenticate."),
        Line::from(""),
    ];

    let tab = |mode: AuthMode| {
        let mut style = Style::default();
        if login.mode == mode {
            style = style.fg(Color::Cyan).add_modifier(Modifier::BOLD);
            if is_focused(state, 0) {
                style = style.add_modifier(Modifier::REVERSED);
            }
        } else {
            style = style.fg(Color::DarkGray);
        }
        Span::styled(format!(" {} ", mode.as_str()), style)
    };
    let tab_prefix = if is_focused(state, 0) { "> " } else { "  " };
    lines.push(Line::from(vec![
        Span::raw(tab_prefix),
        tab(AuthMode::Sql),
        Span::raw(" | "),
        tab(AuthMode::Windows),
    ]));
    lines.push(Line::from(""));

    match login.mode {
        AuthMode::Sql => {
            lines.push(field_line(
                is_focused(state, 1),
                "Server",
                input_text(&login.server, is_focused(state, 1)),
            ));
            lines.extend(error_lines(&login.errors, FIELD_SERVER));
            lines.push(field_line(
                is_focused(state, 2),
                "Database",
                input_text(&login.database, is_focused(state, 2)),
            ));
            lines.extend(error_lines(&login.errors, FIELD_DATABASE));
            lines.push(field_line(
                is_focused(state, 3),
                "Username",
                input_text(&login.username, is_focused(state, 3)),
            ));
            lines.extend(error_lines(&login.errors, FIELD_USERNAME));

            let password = form.password_display();
            let password = if is_focused(state, 4) {
                with_cursor(&password, login.password.cursor)
            } else {
                password
            };
            lines.push(field_line(is_focused(state, 4), "Password", password));
            lines.extend(error_lines(&login.errors, FIELD_PASSWORD));
            lines.push(field_line(
                is_focused(state, 5),
                "",
                format!("{} Show password", checkbox(login.show_password)),
            ));
        }
        AuthMode::Windows => {
            lines.push(field_line(
                is_focused(state, 1),
                "Username (domain\\user)",
                input_text(&login.username, is_focused(state, 1)),
            ));
            lines.extend(error_lines(&login.errors, FIELD_USERNAME));
            lines.push(hint("  Your current Windows session is used for the password."));
        }
    }

    if login.pending {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            "  Signing in...",
            Style::default().fg(Color::Cyan),
        )));
    }

    f.render_widget(
        Paragraph::new(Text::from(lines)).wrap(Wrap { trim: false }),
        rows[0],
    );

    let login_label = if login.pending { "Signing in..." } else { "Login" };
    let buttons = Line::from(vec![
        button_text(
            login_label,
            state.focus == FocusTarget::Button(ButtonFocus::Next),
            !login.pending,
        ),
        Span::raw(" "),
        button_text(
            "Exit",
            state.focus == FocusTarget::Button(ButtonFocus::Cancel),
            true,
        ),
    ]);
    f.render_widget(
        Paragraph::new(Text::from(buttons)).alignment(Alignment::Right),
        rows[1],
    );

    f.render_widget(
        Paragraph::new(hint(&format!(
            "Version {} · Support: {}",
            APP_VERSION, SUPPORT_CONTACT
        )))
        .alignment(Alignment::Center),
        rows[2],
    );
}

// ---------------------------------------------------------------------------------------------
// Shell

fn draw_shell(f: &mut Frame<'_>, area: Rect, state: &AppState, route: Route) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints(
            [
                Constraint::Length(1),
                Constraint::Min(0),
                Constraint::Length(1),
            ]
            .as_ref(),
        )
        .split(area);

    draw_top_bar(f, rows[0], state, route);

    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(SIDEBAR_WIDTH), Constraint::Min(0)].as_ref())
        .split(rows[1]);

    draw_sidebar(f, cols[0], state, route);

    let border_style = if state.pane == Pane::Content {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default()
    };
    f.render_widget(
        Block::default()
            .borders(Borders::ALL)
            .border_style(border_style)
            .title(route.label()),
        cols[1],
    );
    let content = cols[1].inner(&Margin {
        vertical: 1,
        horizontal: 1,
    });

    match route {
        Route::Dashboard => draw_dashboard(f, content, state),
        Route::ReportGenerator => draw_wizard(f, content, state),
        other => draw_placeholder(f, content, other),
    }

    // Bottom row: wizard buttons, otherwise key hints
    if route == Route::ReportGenerator {
        draw_buttons(f, rows[2], state);
    } else {
        let keys = if state.pane == Pane::Sidebar {
            "Up/Down: choose · Enter: open · Tab: back to page · q: quit"
        } else {
            "Esc: menu · Tab: next · Enter: select · q: quit"
        };
        f.render_widget(Paragraph::new(hint(keys)), rows[2]);
    }
}

fn draw_top_bar(f: &mut Frame<'_>, area: Rect, state: &AppState, route: Route) {
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(0), Constraint::Length(36)].as_ref())
        .split(area);

    let crumbs = breadcrumbs(route.path());
    let last = crumbs.len().saturating_sub(1);
    let mut spans = Vec::new();
    for (i, crumb) in crumbs.into_iter().enumerate() {
        if i > 0 {
            spans.push(Span::styled(" > ", Style::default().fg(Color::DarkGray)));
        }
        let style = if i == last {
            Style::default().add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        spans.push(Span::styled(crumb.label, style));
    }
    f.render_widget(Paragraph::new(Line::from(spans)), cols[0]);

    if let Some(session) = state.session.as_ref() {
        let who = format!("{} ({})", session.username, session.mode.as_str());
        f.render_widget(
            Paragraph::new(hint(&truncate(&who, 36))).alignment(Alignment::Right),
            cols[1],
        );
    }
}

fn draw_sidebar(f: &mut Frame<'_>, area: Rect, state: &AppState, route: Route) {
    let items = nav_items();
    let help_index = items.len().saturating_sub(1);
    let mut lines = Vec::new();

    for (i, item) in items.iter().enumerate() {
        if i == help_index {
            lines.push(Line::from(""));
        }
        let active = is_active(route.path(), item.href);
        let mut style = Style::default();
        if active {
            style = style.fg(Color::Cyan).add_modifier(Modifier::BOLD);
        }
        if state.pane == Pane::Sidebar && i == state.sidebar_index {
            style = style.add_modifier(Modifier::REVERSED);
        }
        let marker = if active { "▸" } else { " " };
        lines.push(Line::from(Span::styled(
            format!("{} {}", marker, item.label),
            style,
        )));
    }

    let border_style = if state.pane == Pane::Sidebar {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default()
    };
    f.render_widget(
        Paragraph::new(Text::from(lines)).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(border_style)
                .title("Menu"),
        ),
        area,
    );
}

fn draw_dashboard(f: &mut Frame<'_>, area: Rect, state: &AppState) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints(
            [
                Constraint::Length(2),
                Constraint::Length(4),
                Constraint::Length(5),
                Constraint::Min(0),
            ]
            .as_ref(),
        )
        .split(area);

    let now = chrono::Local::now().format("%A, %B %-d, %Y - %H:%M").to_string();
    f.render_widget(
        Paragraph::new(Text::from(vec![
            Line::from(Span::styled(
                WELCOME_TITLE,
                Style::default().add_modifier(Modifier::BOLD),
            )),
            hint(&now),
        ])),
        rows[0],
    );

    let cards = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Ratio(1, 4); 4].as_ref())
        .split(rows[1]);
    for (card, area) in STAT_CARDS.iter().zip(cards.iter()) {
        let description_style = match card.trend {
            Some(Trend::Up) => Style::default().fg(Color::Green),
            Some(Trend::Down) => Style::default().fg(Color::Red),
            None => Style::default().fg(Color::DarkGray),
        };
        let lines = vec![
            Line::from(Span::styled(
                card.value,
                Style::default().add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(card.description.unwrap_or(""), description_style)),
        ];
        f.render_widget(
            Paragraph::new(Text::from(lines))
                .block(Block::default().borders(Borders::ALL).title(card.title)),
            *area,
        );
    }

    let actions: Vec<Line> = QUICK_ACTIONS
        .iter()
        .enumerate()
        .map(|(i, action)| {
            Line::from(vec![
                button_text(action.title, is_focused(state, i), true),
                Span::raw(" "),
                Span::styled(action.description, Style::default().fg(Color::DarkGray)),
            ])
        })
        .collect();
    f.render_widget(
        Paragraph::new(Text::from(actions))
            .block(Block::default().borders(Borders::ALL).title("Quick Actions")),
        rows[2],
    );

    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(62), Constraint::Percentage(38)].as_ref())
        .split(rows[3]);

    let mut activity = Vec::new();
    for item in RECENT_ACTIVITY.iter() {
        let (glyph, color) = match item.severity {
            Severity::Success => ("✓", Color::Green),
            Severity::Info => ("•", Color::Cyan),
            Severity::Error => ("✗", Color::Red),
        };
        activity.push(Line::from(vec![
            Span::styled(format!("{} ", glyph), Style::default().fg(color)),
            Span::raw(item.title),
        ]));
        activity.push(hint(&format!("  {} · {}", item.description, item.time)));
    }
    f.render_widget(
        Paragraph::new(Text::from(activity))
            .block(Block::default().borders(Borders::ALL).title("Recent Activity")),
        cols[0],
    );

    let status: Vec<Line> = SERVICE_STATUS
        .iter()
        .map(|s| {
            let color = match s.state {
                HealthState::Ok => Color::Green,
                HealthState::Degraded => Color::Yellow,
            };
            Line::from(vec![
                Span::raw(format!("{}: ", s.name)),
                Span::styled(s.status, Style::default().fg(color)),
            ])
        })
        .collect();
    f.render_widget(
        Paragraph::new(Text::from(status))
            .block(Block::default().borders(Borders::ALL).title("System Status"))
            .wrap(Wrap { trim: true }),
        cols[1],
    );
}

fn draw_placeholder(f: &mut Frame<'_>, area: Rect, route: Route) {
    let Some(page) = placeholder(route) else {
        return;
    };
    let lines = vec![
        Line::from(Span::styled(
            page.title,
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(page.description),
        Line::from(""),
        Line::from(""),
        Line::from(Span::styled(
            page.coming_soon,
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )),
        hint(page.teaser),
    ];
    f.render_widget(
        Paragraph::new(Text::from(lines)).wrap(Wrap { trim: false }),
        area,
    );
}

// ---------------------------------------------------------------------------------------------
// Report generator

fn draw_wizard(f: &mut Frame<'_>, area: Rect, state: &AppState) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(0)].as_ref())
        .split(area);

    let report = &state.report;
    let wizard_state = report.wizard.state();

    let mut steps = Vec::new();
    for (i, (_, status)) in report.wizard.progress().into_iter().enumerate() {
        if i > 0 {
            steps.push(Span::styled("──", Style::default().fg(Color::DarkGray)));
        }
        let span = match status {
            StepStatus::Completed => {
                Span::styled("[✓]", Style::default().fg(Color::Green))
            }
            StepStatus::Current => Span::styled(
                format!("[{}]", i + 1),
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD | Modifier::REVERSED),
            ),
            StepStatus::Upcoming => Span::styled(
                format!("[{}]", i + 1),
                Style::default().fg(Color::DarkGray),
            ),
        };
        steps.push(span);
    }
    let heading = Line::from(Span::styled(
        format!(
            "Step {} of {} · {}",
            wizard_state.step_index() + 1,
            wizard_state.step_count(),
            wizard_state.current_label()
        ),
        Style::default().add_modifier(Modifier::BOLD),
    ));
    f.render_widget(
        Paragraph::new(Text::from(vec![Line::from(steps), heading])),
        rows[0],
    );

    let panel = rows[1];
    match report.step() {
        0 => render_lines(f, panel, criteria_lines(state)),
        1 => render_lines(f, panel, template_lines(state)),
        2 => render_lines(f, panel, preview_lines(state)),
        3 => draw_charts_step(f, panel, state),
        _ => render_lines(f, panel, output_lines(state)),
    }
}

fn render_lines(f: &mut Frame<'_>, area: Rect, lines: Vec<Line<'static>>) {
    f.render_widget(
        Paragraph::new(Text::from(lines)).wrap(Wrap { trim: false }),
        area,
    );
}

fn criteria_lines(state: &AppState) -> Vec<Line<'static>> {
    let r = &state.report;
    let criteria = &r.forms.criteria;
    let mut lines = vec![
        field_line(
            is_focused(state, 0),
            "From (YYYY-MM-DD)",
            input_text(&r.date_from, is_focused(state, 0)),
        ),
        field_line(
            is_focused(state, 1),
            "To   (YYYY-MM-DD)",
            input_text(&r.date_to, is_focused(state, 1)),
        ),
    ];
    lines.extend(error_lines(&r.errors, FIELD_DATE_RANGE));
    lines.push(Line::from(""));

    lines.push(field_line(
        is_focused(state, 2),
        "Search machines",
        input_text(&r.machine_search, is_focused(state, 2)),
    ));
    lines.push(field_line(
        is_focused(state, 3),
        "Machines",
        format!(
            "{} selected (Space toggles)",
            criteria.machine_ids.len()
        ),
    ));

    let machines = criteria.filtered_machines(r.forms.machines());
    if machines.is_empty() {
        lines.push(hint("    No machines match your search."));
    }
    let start = if r.machine_cursor >= MACHINE_LIST_ROWS {
        r.machine_cursor + 1 - MACHINE_LIST_ROWS
    } else {
        0
    };
    for (i, m) in machines
        .iter()
        .enumerate()
        .skip(start)
        .take(MACHINE_LIST_ROWS)
    {
        let style = if is_focused(state, 3) && i == r.machine_cursor {
            Style::default().add_modifier(Modifier::REVERSED)
        } else {
            Style::default()
        };
        lines.push(Line::from(vec![
            Span::raw("    "),
            Span::styled(
                format!("{} {} ({})", checkbox(criteria.is_selected(&m.id)), m.name, m.id),
                style,
            ),
        ]));
    }
    lines.extend(error_lines(&r.errors, FIELD_MACHINE_IDS));
    lines.push(Line::from(""));

    lines.push(field_line(
        is_focused(state, 4),
        "Report type",
        format!(
            "< {} >",
            criteria
                .report_type
                .map(|t| t.as_str())
                .unwrap_or("Select a report type")
        ),
    ));
    lines.extend(error_lines(&r.errors, FIELD_REPORT_TYPE));
    lines
}

fn template_lines(state: &AppState) -> Vec<Line<'static>> {
    let r = &state.report;
    let form = &r.forms.template;
    let catalog = r.forms.templates();

    let category = if form.category == ALL_CATEGORIES {
        "All categories".to_string()
    } else {
        form.category.clone()
    };
    let view = match form.view_mode {
        ViewMode::Grid => "Grid",
        ViewMode::List => "List",
    };

    let mut lines = vec![
        field_line(
            is_focused(state, 0),
            "Search templates",
            input_text(&r.template_search, is_focused(state, 0)),
        ),
        field_line(is_focused(state, 1), "Category", format!("< {} >", category)),
        field_line(is_focused(state, 2), "View", format!("< {} >", view)),
        Line::from(""),
    ];

    let visible = form.filtered(catalog);
    if visible.is_empty() {
        lines.push(hint("    No templates match your filters."));
    }

    let cell_style = |i: usize| {
        if is_focused(state, 3) && i == r.template_cursor {
            Style::default().add_modifier(Modifier::REVERSED)
        } else {
            Style::default()
        }
    };
    let radio = |id: &str| if form.is_selected(id) { "(•)" } else { "( )" };

    match form.view_mode {
        ViewMode::Grid => {
            for (row, pair) in visible.chunks(2).enumerate() {
                let mut names = vec![Span::raw("    ")];
                let mut categories = vec![Span::raw("        ")];
                for (col, t) in pair.iter().enumerate() {
                    let i = row * 2 + col;
                    names.push(Span::styled(
                        format!("{} {:<28}", radio(t.id.as_str()), truncate(&t.name, 28)),
                        cell_style(i),
                    ));
                    names.push(Span::raw(" "));
                    categories.push(Span::styled(
                        format!("{:<29}", t.category),
                        Style::default().fg(Color::DarkGray),
                    ));
                    categories.push(Span::raw("  "));
                }
                lines.push(Line::from(names));
                lines.push(Line::from(categories));
            }
        }
        ViewMode::List => {
            for (i, t) in visible.iter().enumerate() {
                lines.push(Line::from(vec![
                    Span::raw("    "),
                    Span::styled(
                        format!("{} {} [{}]", radio(t.id.as_str()), t.name, t.category),
                        cell_style(i),
                    ),
                ]));
                lines.push(hint(&format!("        {}", truncate(&t.description, 56))));
            }
        }
    }
    lines.extend(error_lines(&r.errors, FIELD_TEMPLATE));
    lines.push(Line::from(""));

    let selected = form
        .selected
        .as_deref()
        .and_then(|id| r.forms.template_name(id))
        .unwrap_or("none");
    lines.push(hint(&format!("  Selected template: {}", selected)));
    lines
}

fn preview_lines(state: &AppState) -> Vec<Line<'static>> {
    let r = &state.report;
    let table = &r.forms.preview;

    let current_sort = match table.sort() {
        Some(spec) => {
            let arrow = match spec.direction {
                SortDirection::Ascending => "↑",
                SortDirection::Descending => "↓",
            };
            format!("(sorted by {} {})", spec.key.as_str(), arrow)
        }
        None => "(unsorted)".to_string(),
    };

    let mut lines = vec![
        field_line(
            is_focused(state, 0),
            "Search",
            input_text(&r.preview_search, is_focused(state, 0)),
        ),
        field_line(
            is_focused(state, 1),
            "Sort column",
            format!("< {} > {}", r.sort_column.as_str(), current_sort),
        ),
        field_line(
            is_focused(state, 2),
            "",
            format!(
                "{} Include all rows  ({})",
                checkbox(table.all_selected()),
                if table.page_all_selected() {
                    "this page: all included"
                } else {
                    "this page: some excluded"
                }
            ),
        ),
        Line::from(Span::styled(
            format!(
                "    {:<3} {:<19} {:<11} {:<9} {:>8} {:<4}",
                "Inc", "Timestamp", "Machine", "Parameter", "Value", "Unit"
            ),
            Style::default().add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
        )),
    ];

    let page_rows = table.page_rows();
    if page_rows.is_empty() {
        lines.push(hint("    No data matches your search."));
    }
    for (i, row) in page_rows.iter().enumerate() {
        let style = if is_focused(state, 3) && i == r.row_cursor {
            Style::default().add_modifier(Modifier::REVERSED)
        } else if row.included {
            Style::default()
        } else {
            Style::default().fg(Color::DarkGray)
        };
        lines.push(Line::from(vec![
            Span::raw("    "),
            Span::styled(
                format!(
                    "{:<3} {:<19} {:<11} {:<9} {:>8} {:<4}",
                    checkbox(row.included),
                    row.timestamp_display(),
                    row.machine,
                    row.parameter,
                    row.value_display(),
                    row.unit
                ),
                style,
            ),
        ]));
    }

    lines.push(hint(&format!(
        "  Page {} of {} · {} rows · {} included · PgUp/PgDn to page",
        table.page(),
        table.total_pages().max(1),
        table.visible_rows().len(),
        table.included_ids().len()
    )));
    lines.extend(error_lines(&r.errors, FIELD_ROWS));
    lines
}

fn draw_charts_step(f: &mut Frame<'_>, area: Rect, state: &AppState) {
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(34), Constraint::Min(0)].as_ref())
        .split(area);

    let r = &state.report;
    let charts = &r.forms.charts;

    let mut lines = vec![field_line(
        is_focused(state, 0),
        "",
        format!("{} Include charts", checkbox(charts.include_charts())),
    )];

    if charts.include_charts() {
        lines.push(Line::from(""));
        let option = |value: Option<&'static str>| format!("< {} >", value.unwrap_or("Select"));
        lines.push(field_line(
            is_focused(state, 1),
            "Type",
            option(charts.chart_type.map(|c| c.as_str())),
        ));
        lines.extend(error_lines(&r.errors, FIELD_CHART_TYPE));
        lines.push(field_line(
            is_focused(state, 2),
            "X axis",
            option(charts.x_field.map(|x| x.as_str())),
        ));
        lines.extend(error_lines(&r.errors, FIELD_X_AXIS));
        lines.push(field_line(
            is_focused(state, 3),
            "Y axis",
            option(charts.y_field.map(|y| y.as_str())),
        ));
        lines.extend(error_lines(&r.errors, FIELD_Y_AXIS));
        lines.push(field_line(
            is_focused(state, 4),
            "Colors",
            option(charts.color_scheme.map(|c| c.as_str())),
        ));
        lines.extend(error_lines(&r.errors, FIELD_COLOR_SCHEME));
    } else {
        lines.push(Line::from(""));
        lines.push(hint("  Charts will not be included in this report."));
    }
    render_lines(f, cols[0], lines);

    let block = Block::default().borders(Borders::ALL).title("Preview");
    let Some(preview) = charts.preview(r.forms.series()) else {
        f.render_widget(
            Paragraph::new(hint("Enable charts to see a preview.")).block(block),
            cols[1],
        );
        return;
    };

    let rgb = |(red, green, blue): (u8, u8, u8)| Color::Rgb(red, green, blue);
    let values: Vec<u64> = preview.values.iter().map(|v| v.round() as u64).collect();

    match preview.spec.chart_type {
        ChartType::Bar => {
            let bars: Vec<Bar> = preview
                .labels
                .iter()
                .zip(values.iter())
                .zip(preview.colors.iter())
                .map(|((label, value), color)| {
                    Bar::default()
                        .value(*value)
                        .label(Line::from(truncate(label, 6)))
                        .style(Style::default().fg(rgb(*color)))
                })
                .collect();
            let chart = BarChart::default()
                .block(block)
                .bar_width(6)
                .bar_gap(1)
                .max(preview.max_value().ceil() as u64)
                .data(BarGroup::default().bars(&bars));
            f.render_widget(chart, cols[1]);
        }
        ChartType::Line => {
            let color = preview.colors.first().copied().map(rgb).unwrap_or(Color::Cyan);
            let sparkline = Sparkline::default()
                .block(block)
                .data(&values)
                .style(Style::default().fg(color));
            f.render_widget(sparkline, cols[1]);
        }
        ChartType::Pie => {
            let legend: Vec<Line> = preview
                .labels
                .iter()
                .zip(preview.percentages())
                .zip(preview.colors.iter())
                .map(|((label, pct), color)| {
                    let width = (pct as usize / 5).max(1);
                    Line::from(vec![
                        Span::styled("█".repeat(width), Style::default().fg(rgb(*color))),
                        Span::raw(format!(" {} {}%", truncate(label, 14), pct)),
                    ])
                })
                .collect();
            f.render_widget(Paragraph::new(Text::from(legend)).block(block), cols[1]);
        }
    }
}

fn output_lines(state: &AppState) -> Vec<Line<'static>> {
    let r = &state.report;
    let output = &r.forms.output;

    let mut lines = vec![field_line(
        is_focused(state, 0),
        "Format",
        format!(
            "< {} >",
            output.format.map(|f| f.as_str()).unwrap_or("Select a format")
        ),
    )];
    lines.extend(error_lines(&r.errors, FIELD_FORMAT));

    let mut file_line = field_line(
        is_focused(state, 1),
        "File name",
        input_text(&r.file_name, is_focused(state, 1)),
    );
    if let Some(format) = output.format {
        file_line.spans.push(Span::styled(
            format!(".{}", format.extension()),
            Style::default().fg(Color::DarkGray),
        ));
    }
    lines.push(file_line);
    lines.extend(error_lines(&r.errors, FIELD_FILE_NAME));
    lines.push(hint(&format!("  Save location: {}", output.location_label())));
    lines.push(Line::from(""));

    lines.push(field_line(
        is_focused(state, 2),
        "",
        format!(
            "{} Email report immediately",
            checkbox(output.email_immediately())
        ),
    ));
    if output.email_immediately() {
        lines.push(field_line(
            is_focused(state, 3),
            "Recipients",
            input_text(&r.recipients, is_focused(state, 3)),
        ));
        lines.push(hint("    Separate addresses with commas."));
        lines.extend(error_lines(&r.errors, FIELD_RECIPIENTS));
        lines.push(field_line(
            is_focused(state, 4),
            "Message",
            input_text(&r.email_message, is_focused(state, 4)),
        ));
    }

    if r.submitting {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            "  Submitting report...",
            Style::default().fg(Color::Cyan),
        )));
    }
    lines
}

fn draw_buttons(f: &mut Frame<'_>, area: Rect, state: &AppState) {
    let report = &state.report;
    let wizard_state = report.wizard.state();
    let in_content = state.pane == Pane::Content;

    let next_label = if report.submitting {
        "Generating..."
    } else if wizard_state.is_last() {
        "Generate Report"
    } else {
        "Next"
    };

    let back = button_text(
        "Back",
        in_content && state.focus == FocusTarget::Button(ButtonFocus::Back),
        !wizard_state.is_first() && !report.submitting,
    );
    let next = button_text(
        next_label,
        in_content && state.focus == FocusTarget::Button(ButtonFocus::Next),
        !report.submitting,
    );
    let cancel = button_text(
        "Cancel",
        in_content && state.focus == FocusTarget::Button(ButtonFocus::Cancel),
        !report.submitting,
    );

    let line = Line::from(vec![back, Span::raw(" "), next, Span::raw(" "), cancel]);

    let p = Paragraph::new(Text::from(line)).alignment(Alignment::Right);
    f.render_widget(p, area);
}

fn button_text(label: &str, focused: bool, enabled: bool) -> Span<'static> {
    let mut style = Style::default();
    if !enabled {
        style = style.fg(Color::DarkGray);
    }
    if focused && enabled {
        style = style.add_modifier(Modifier::REVERSED);
    }
    Span::styled(format!("[ {} ]", label), style)
}

// ---------------------------------------------------------------------------------------------
// Overlays

fn draw_toast(f: &mut Frame<'_>, window_area: Rect, toast: &Toast) {
    let w = 46u16.min(window_area.width.saturating_sub(4));
    let h = 4u16;
    let area = Rect {
        x: window_area.x + window_area.width.saturating_sub(w + 2),
        y: window_area.y + 1,
        width: w,
        height: h,
    };
    let color = match toast.kind {
        ToastKind::Info => Color::Cyan,
        ToastKind::Success => Color::Green,
        ToastKind::Error => Color::Red,
    };

    f.render_widget(Clear, area);
    f.render_widget(
        Paragraph::new(Text::from(toast.body.clone()))
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(color))
                    .title(toast.title.clone()),
            )
            .wrap(Wrap { trim: true }),
        area,
    );
}

fn draw_confirm_modal(
    f: &mut Frame<'_>,
    window_area: Rect,
    title: &str,
    body: &str,
    yes_label: &str,
    state: &AppState,
) {
    let modal_w = 60u16.min(window_area.width.saturating_sub(4)).max(40);
    let modal_h = 7u16;
    let x = window_area.x + (window_area.width.saturating_sub(modal_w)) / 2;
    let y = window_area.y + (window_area.height.saturating_sub(modal_h)) / 2;
    let area = Rect {
        x,
        y,
        width: modal_w,
        height: modal_h,
    };

    f.render_widget(Clear, area);
    let block = Block::default().borders(Borders::ALL).title(title.to_string());
    let body = Paragraph::new(Text::from(vec![
        Line::from(body.to_string()),
        Line::from(""),
        Line::from(""),
    ]))
    .block(block)
    .wrap(Wrap { trim: false });
    f.render_widget(body, area);

    // Buttons: [Yes] [No] (primary on right)
    let buttons_area = Rect {
        x: area.x + 1,
        y: area.y + area.height - 2,
        width: area.width - 2,
        height: 1,
    };

    let yes_focused = state.focus == FocusTarget::Button(ButtonFocus::Cancel);
    let line = Line::from(vec![
        button_text(yes_label, yes_focused, true),
        Span::raw(" "),
        button_text("No", !yes_focused, true),
    ]);
    let p = Paragraph::new(Text::from(line)).alignment(Alignment::Right);
    f.render_widget(p, buttons_area);
}

fn draw_message_modal(
    f: &mut Frame<'_>,
    window_area: Rect,
    title: &str,
    body: &str,
    state: &AppState,
) {
    let modal_w = 60u16.min(window_area.width.saturating_sub(4)).max(40);
    let modal_h = 8u16.min(window_area.height.saturating_sub(4)).max(7);
    let x = window_area.x + (window_area.width.saturating_sub(modal_w)) / 2;
    let y = window_area.y + (window_area.height.saturating_sub(modal_h)) / 2;
    let area = Rect {
        x,
        y,
        width: modal_w,
        height: modal_h,
    };

    f.render_widget(Clear, area);
    let block = Block::default().borders(Borders::ALL).title(title.to_string());
    let p = Paragraph::new(Text::from(body.to_string()))
        .block(block)
        .wrap(Wrap { trim: false });
    f.render_widget(p, area);

    let buttons_area = Rect {
        x: area.x + 1,
        y: area.y + area.height - 2,
        width: area.width - 2,
        height: 1,
    };
    let ok = button_text(
        "OK",
        matches!(state.focus, FocusTarget::Button(ButtonFocus::Next)),
        true,
    );
    let p = Paragraph::new(Text::from(Line::from(vec![ok]))).alignment(Alignment::Right);
    f.render_widget(p, buttons_area);
}
