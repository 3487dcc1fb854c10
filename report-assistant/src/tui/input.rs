// Key handling for the TUI. Every handler mutates `AppState` in place; slow work is handed
// to a worker thread through `tx`.

use super::{
    navigate, start_login, start_report_submission, AppState, ButtonFocus, FocusTarget, Modal,
    Page, Pane, ReportState, UiMsg,
};
use crate::models::draft::OutputFormat;
use crate::models::requests::AuthMode;
use crate::navigation::pages::QUICK_ACTIONS;
use crate::navigation::Route;
use crate::panels::preview::SortKey;
use crate::panels::template::ViewMode;
use crate::utils::validation::FieldErrors;
use crate::wizard::SubmitError;
use crossterm::event::KeyCode;
use log::info;
use std::sync::mpsc;

pub(super) fn handle_key(state: &mut AppState, code: KeyCode, tx: &mpsc::Sender<UiMsg>) {
    if let Some(modal) = state.modal.clone() {
        handle_modal_key(state, modal, code);
        return;
    }

    match state.page {
        Page::Login => handle_login_key(state, code, tx),
        Page::Route(_) if state.pane == Pane::Sidebar => handle_sidebar_key(state, code),
        Page::Route(route) => {
            if code == KeyCode::Esc {
                state.pane = Pane::Sidebar;
                return;
            }
            match route {
                Route::Dashboard => handle_dashboard_key(state, code),
                Route::ReportGenerator => handle_wizard_key(state, code, tx),
                _ => handle_placeholder_key(state, code),
            }
        }
    }
}

fn focused_button(state: &AppState) -> ButtonFocus {
    match state.focus {
        FocusTarget::Button(b) => b,
        _ => ButtonFocus::Next,
    }
}

fn set_focused_button(state: &mut AppState, b: ButtonFocus) {
    state.focus = FocusTarget::Button(b);
}

fn open_modal(state: &mut AppState, modal: Modal) {
    state.modal = Some(modal);
    // "No" is the default answer.
    set_focused_button(state, ButtonFocus::Next);
}

fn handle_modal_key(state: &mut AppState, modal: Modal, code: KeyCode) {
    match modal {
        Modal::ConfirmCancel | Modal::ConfirmQuit => match code {
            KeyCode::Left | KeyCode::Right | KeyCode::Tab => {
                let next = match focused_button(state) {
                    ButtonFocus::Cancel => ButtonFocus::Next,
                    _ => ButtonFocus::Cancel,
                };
                set_focused_button(state, next);
            }
            KeyCode::Enter => {
                let confirm = focused_button(state) == ButtonFocus::Cancel;
                state.modal = None;
                set_focused_button(state, ButtonFocus::Next);

                if confirm {
                    if modal == Modal::ConfirmCancel {
                        info!("[PHASE: wizard] [STEP: cancel] Report discarded by user");
                        let today = state.today;
                        state.report.reset(today);
                        navigate(state, Route::Dashboard);
                    } else {
                        state.quit = true;
                    }
                }
            }
            KeyCode::Esc => {
                state.modal = None;
            }
            _ => {}
        },
        Modal::Message { .. } => {
            if matches!(code, KeyCode::Enter | KeyCode::Esc) {
                state.modal = None;
            }
        }
    }
}

/// Fields first, then the page's buttons.
fn focus_order(state: &AppState) -> Vec<FocusTarget> {
    let (fields, buttons): (usize, &[ButtonFocus]) = match state.page {
        Page::Login => (
            state.login.field_count(),
            &[ButtonFocus::Next, ButtonFocus::Cancel],
        ),
        Page::Route(Route::ReportGenerator) => (
            state.report.field_count(),
            &[ButtonFocus::Back, ButtonFocus::Next, ButtonFocus::Cancel],
        ),
        Page::Route(Route::Dashboard) => (QUICK_ACTIONS.len(), &[]),
        Page::Route(_) => (0, &[]),
    };
    (0..fields)
        .map(FocusTarget::Field)
        .chain(buttons.iter().copied().map(FocusTarget::Button))
        .collect()
}

fn cycle_focus(state: &mut AppState, forward: bool) {
    let order = focus_order(state);
    if order.is_empty() {
        return;
    }
    let next = match (order.iter().position(|f| *f == state.focus), forward) {
        (Some(i), true) => (i + 1) % order.len(),
        (Some(i), false) => (i + order.len() - 1) % order.len(),
        (None, _) => 0,
    };
    state.focus = order[next];
}

fn move_button(state: &mut AppState, forward: bool) {
    let buttons: Vec<FocusTarget> = focus_order(state)
        .into_iter()
        .filter(|f| matches!(f, FocusTarget::Button(_)))
        .collect();
    let Some(pos) = buttons.iter().position(|f| *f == state.focus) else {
        return;
    };
    let next = if forward {
        (pos + 1).min(buttons.len() - 1)
    } else {
        pos.saturating_sub(1)
    };
    state.focus = buttons[next];
}

fn handle_login_key(state: &mut AppState, code: KeyCode, tx: &mpsc::Sender<UiMsg>) {
    match code {
        KeyCode::Tab | KeyCode::Down => {
            cycle_focus(state, true);
            return;
        }
        KeyCode::BackTab | KeyCode::Up => {
            cycle_focus(state, false);
            return;
        }
        KeyCode::Esc => {
            open_modal(state, Modal::ConfirmQuit);
            return;
        }
        _ => {}
    }

    if state.login.pending {
        return;
    }

    match state.focus {
        FocusTarget::Field(0) => {
            if matches!(code, KeyCode::Left | KeyCode::Right | KeyCode::Char(' ')) {
                let mode = state.login.mode.toggle();
                state.login.switch_mode(mode);
            } else if code == KeyCode::Enter {
                submit_login(state, tx);
            }
        }
        FocusTarget::Field(5) if state.login.mode == AuthMode::Sql => {
            if matches!(code, KeyCode::Char(' ') | KeyCode::Enter) {
                state.login.show_password = !state.login.show_password;
            }
        }
        FocusTarget::Field(i) => {
            if code == KeyCode::Enter {
                submit_login(state, tx);
            } else if let Some(input) = state.login.input_mut(i) {
                input.handle_key(code);
            }
        }
        FocusTarget::Button(b) => match code {
            KeyCode::Left => move_button(state, false),
            KeyCode::Right => move_button(state, true),
            KeyCode::Enter => match b {
                ButtonFocus::Next => submit_login(state, tx),
                ButtonFocus::Cancel => open_modal(state, Modal::ConfirmQuit),
                ButtonFocus::Back => {}
            },
            _ => {}
        },
    }
}

fn submit_login(state: &mut AppState, tx: &mpsc::Sender<UiMsg>) {
    if state.login.pending {
        return;
    }
    match state.login.form().submit() {
        Ok(credentials) => {
            state.login.errors = FieldErrors::new();
            start_login(state, credentials, tx);
        }
        Err(errors) => {
            info!(
                "[PHASE: auth] [STEP: validate] Login form has {} invalid field(s)",
                errors.len()
            );
            state.login.errors = errors;
        }
    }
}

fn handle_sidebar_key(state: &mut AppState, code: KeyCode) {
    let count = Route::ALL.len();
    match code {
        KeyCode::Up => state.sidebar_index = (state.sidebar_index + count - 1) % count,
        KeyCode::Down => state.sidebar_index = (state.sidebar_index + 1) % count,
        KeyCode::Enter | KeyCode::Right => {
            let route = Route::ALL[state.sidebar_index.min(count - 1)];
            navigate(state, route);
        }
        KeyCode::Tab => state.pane = Pane::Content,
        KeyCode::Esc | KeyCode::Char('q') => open_modal(state, Modal::ConfirmQuit),
        _ => {}
    }
}

fn handle_dashboard_key(state: &mut AppState, code: KeyCode) {
    match code {
        KeyCode::Tab | KeyCode::Down | KeyCode::Right => cycle_focus(state, true),
        KeyCode::BackTab | KeyCode::Up => cycle_focus(state, false),
        KeyCode::Left => state.pane = Pane::Sidebar,
        KeyCode::Enter | KeyCode::Char(' ') => {
            if let FocusTarget::Field(i) = state.focus {
                if let Some(action) = QUICK_ACTIONS.get(i) {
                    navigate(state, action.route);
                }
            }
        }
        KeyCode::Char('q') => open_modal(state, Modal::ConfirmQuit),
        _ => {}
    }
}

fn handle_placeholder_key(state: &mut AppState, code: KeyCode) {
    match code {
        KeyCode::Left | KeyCode::Tab | KeyCode::BackTab => state.pane = Pane::Sidebar,
        KeyCode::Char('q') => open_modal(state, Modal::ConfirmQuit),
        _ => {}
    }
}

fn handle_wizard_key(state: &mut AppState, code: KeyCode, tx: &mpsc::Sender<UiMsg>) {
    if state.report.submitting {
        return;
    }

    match code {
        KeyCode::Tab => {
            cycle_focus(state, true);
            return;
        }
        KeyCode::BackTab => {
            cycle_focus(state, false);
            return;
        }
        KeyCode::PageDown if state.report.step() == 2 => {
            state.report.forms.preview.next_page();
            state.report.row_cursor = 0;
            return;
        }
        KeyCode::PageUp if state.report.step() == 2 => {
            state.report.forms.preview.prev_page();
            state.report.row_cursor = 0;
            return;
        }
        _ => {}
    }

    match state.focus {
        FocusTarget::Button(b) => match code {
            KeyCode::Left => move_button(state, false),
            KeyCode::Right => move_button(state, true),
            KeyCode::Up => cycle_focus(state, false),
            KeyCode::Enter => match b {
                ButtonFocus::Back => go_back(state),
                ButtonFocus::Next => advance(state, tx),
                ButtonFocus::Cancel => open_modal(state, Modal::ConfirmCancel),
            },
            _ => {}
        },
        FocusTarget::Field(field) => {
            let report = &mut state.report;
            let wants_advance = match report.step() {
                0 => criteria_key(report, field, code),
                1 => template_key(report, field, code),
                2 => preview_key(report, field, code),
                3 => charts_key(report, field, code),
                _ => output_key(report, field, code),
            };
            report.sync_forms();
            if wants_advance {
                advance(state, tx);
            }
        }
    }

    // Toggling a section off can remove the focused field.
    if let FocusTarget::Field(i) = state.focus {
        if i >= state.report.field_count() {
            set_focused_button(state, ButtonFocus::Next);
        }
    }
}

fn go_back(state: &mut AppState) {
    let report = &mut state.report;
    report.sync_forms();
    report.wizard.back();
    report.errors = FieldErrors::new();
}

/// Next on every step but the last; submit on the last.
fn advance(state: &mut AppState, tx: &mpsc::Sender<UiMsg>) {
    state.report.sync_forms();
    if state.report.wizard.state().is_last() {
        submit_report(state, tx);
        return;
    }

    let report = &mut state.report;
    match report.wizard.next(&report.forms) {
        Ok(_) => report.errors = FieldErrors::new(),
        Err(errors) => report.errors = errors,
    }
}

fn submit_report(state: &mut AppState, tx: &mpsc::Sender<UiMsg>) {
    let report = &mut state.report;
    match report.wizard.submit(&report.forms, |draft| draft.clone()) {
        Ok(draft) => {
            report.errors = FieldErrors::new();
            info!("[PHASE: wizard] [STEP: submit] Submitting completed report draft");
            start_report_submission(state, draft, tx);
        }
        Err(SubmitError::Invalid(errors)) => report.errors = errors,
        Err(SubmitError::NotOnLastStep) => {}
    }
}

// Panel handlers return true when the key asks to move on (Enter on a plain field).

fn criteria_key(r: &mut ReportState, field: usize, code: KeyCode) -> bool {
    match field {
        0 | 1 => {
            if code == KeyCode::Enter {
                return true;
            }
            let input = if field == 0 {
                &mut r.date_from
            } else {
                &mut r.date_to
            };
            input.handle_key(code);
        }
        2 => {
            if code == KeyCode::Enter {
                return true;
            }
            if r.machine_search.handle_key(code) {
                r.machine_cursor = 0;
            }
        }
        3 => {
            let ids: Vec<String> = r
                .forms
                .criteria
                .filtered_machines(r.forms.machines())
                .iter()
                .map(|m| m.id.clone())
                .collect();
            match code {
                KeyCode::Up => r.machine_cursor = r.machine_cursor.saturating_sub(1),
                KeyCode::Down => {
                    r.machine_cursor = (r.machine_cursor + 1).min(ids.len().saturating_sub(1))
                }
                KeyCode::Char(' ') | KeyCode::Enter => {
                    if let Some(id) = ids.get(r.machine_cursor) {
                        r.forms.criteria.toggle_machine(id);
                    }
                }
                _ => {}
            }
        }
        _ => match code {
            KeyCode::Left | KeyCode::Right | KeyCode::Char(' ') => {
                r.forms.criteria.cycle_report_type()
            }
            KeyCode::Enter => return true,
            _ => {}
        },
    }
    false
}

fn template_key(r: &mut ReportState, field: usize, code: KeyCode) -> bool {
    match field {
        0 => {
            if code == KeyCode::Enter {
                return true;
            }
            if r.template_search.handle_key(code) {
                r.template_cursor = 0;
            }
        }
        1 => match code {
            KeyCode::Left | KeyCode::Right | KeyCode::Char(' ') => {
                let catalog = r.forms.templates().to_vec();
                r.forms.template.cycle_category(&catalog);
                r.template_cursor = 0;
            }
            KeyCode::Enter => return true,
            _ => {}
        },
        2 => match code {
            KeyCode::Left | KeyCode::Right | KeyCode::Char(' ') => {
                r.forms.template.view_mode = r.forms.template.view_mode.toggle()
            }
            KeyCode::Enter => return true,
            _ => {}
        },
        _ => {
            let ids: Vec<String> = r
                .forms
                .template
                .filtered(r.forms.templates())
                .iter()
                .map(|t| t.id.clone())
                .collect();
            let last = ids.len().saturating_sub(1);
            // The grid shows two cards per row.
            let row_step = match r.forms.template.view_mode {
                ViewMode::Grid => 2,
                ViewMode::List => 1,
            };
            match code {
                KeyCode::Up => r.template_cursor = r.template_cursor.saturating_sub(row_step),
                KeyCode::Down => r.template_cursor = (r.template_cursor + row_step).min(last),
                KeyCode::Left => r.template_cursor = r.template_cursor.saturating_sub(1),
                KeyCode::Right => r.template_cursor = (r.template_cursor + 1).min(last),
                KeyCode::Char(' ') | KeyCode::Enter => {
                    if let Some(id) = ids.get(r.template_cursor) {
                        r.forms.template.select(id);
                    }
                }
                _ => {}
            }
        }
    }
    false
}

fn preview_key(r: &mut ReportState, field: usize, code: KeyCode) -> bool {
    match field {
        0 => {
            if code == KeyCode::Enter {
                return true;
            }
            if r.preview_search.handle_key(code) {
                r.row_cursor = 0;
            }
        }
        1 => {
            let pos = SortKey::ALL
                .iter()
                .position(|k| *k == r.sort_column)
                .unwrap_or(0);
            let count = SortKey::ALL.len();
            match code {
                KeyCode::Left => r.sort_column = SortKey::ALL[(pos + count - 1) % count],
                KeyCode::Right => r.sort_column = SortKey::ALL[(pos + 1) % count],
                KeyCode::Char(' ') | KeyCode::Enter => {
                    r.forms.preview.request_sort(r.sort_column);
                    r.row_cursor = 0;
                }
                _ => {}
            }
        }
        2 => {
            if matches!(code, KeyCode::Char(' ') | KeyCode::Enter) {
                let all = r.forms.preview.all_selected();
                r.forms.preview.select_all(!all);
            }
        }
        _ => {
            let ids: Vec<String> = r
                .forms
                .preview
                .page_rows()
                .iter()
                .map(|row| row.id.clone())
                .collect();
            match code {
                KeyCode::Up => r.row_cursor = r.row_cursor.saturating_sub(1),
                KeyCode::Down => {
                    r.row_cursor = (r.row_cursor + 1).min(ids.len().saturating_sub(1))
                }
                KeyCode::Left => {
                    r.forms.preview.prev_page();
                    r.row_cursor = 0;
                }
                KeyCode::Right => {
                    r.forms.preview.next_page();
                    r.row_cursor = 0;
                }
                KeyCode::Char(' ') | KeyCode::Enter => {
                    if let Some(id) = ids.get(r.row_cursor) {
                        r.forms.preview.toggle_row(id);
                    }
                }
                _ => {}
            }
        }
    }
    false
}

fn charts_key(r: &mut ReportState, field: usize, code: KeyCode) -> bool {
    let charts = &mut r.forms.charts;
    match (field, code) {
        (0, KeyCode::Char(' ') | KeyCode::Left | KeyCode::Right) => charts.toggle_include_charts(),
        (_, KeyCode::Enter) => return true,
        (1, KeyCode::Char(' ') | KeyCode::Left | KeyCode::Right) => charts.cycle_chart_type(),
        (2, KeyCode::Char(' ') | KeyCode::Left | KeyCode::Right) => charts.cycle_x_field(),
        (3, KeyCode::Char(' ') | KeyCode::Left | KeyCode::Right) => charts.cycle_y_field(),
        (4, KeyCode::Char(' ') | KeyCode::Left | KeyCode::Right) => charts.cycle_color_scheme(),
        _ => {}
    }
    false
}

fn output_key(r: &mut ReportState, field: usize, code: KeyCode) -> bool {
    if code == KeyCode::Enter && field != 2 {
        return true;
    }
    match field {
        0 => {
            if matches!(code, KeyCode::Left | KeyCode::Right | KeyCode::Char(' ')) {
                let output = &mut r.forms.output;
                output.format = Some(output.format.map_or(OutputFormat::Pdf, |f| f.toggle()));
            }
        }
        1 => {
            r.file_name.handle_key(code);
        }
        2 => {
            if matches!(code, KeyCode::Char(' ') | KeyCode::Enter) {
                r.forms.output.toggle_email_immediately();
                r.recipients.set(r.forms.output.recipients.clone());
                r.email_message
                    .set(r.forms.output.email_message.clone());
            }
        }
        3 => {
            r.recipients.handle_key(code);
        }
        _ => {
            r.email_message.handle_key(code);
        }
    }
    false
}
