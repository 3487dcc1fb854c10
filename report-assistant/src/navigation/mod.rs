//! Path-based navigation for the application shell.
//!
//! Routes are addressed by path (`/report-generator`) the same way the sidebar, breadcrumbs
//! and quick actions refer to them; [`Route`] is the typed view of the known paths.

pub mod pages;

use serde::Serialize;

pub const HOME_PATH: &str = "/dashboard";
pub const LOGIN_PATH: &str = "/login";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    Dashboard,
    ReportGenerator,
    Templates,
    Settings,
    WinccActivityLogger,
    LogsErrors,
    EmailSender,
    Scheduler,
    Help,
}

impl Route {
    /// Sidebar order; `Help` is pinned to the bottom.
    pub const ALL: [Route; 9] = [
        Route::Dashboard,
        Route::ReportGenerator,
        Route::Templates,
        Route::Settings,
        Route::WinccActivityLogger,
        Route::LogsErrors,
        Route::EmailSender,
        Route::Scheduler,
        Route::Help,
    ];

    pub fn path(&self) -> &'static str {
        match self {
            Route::Dashboard => "/dashboard",
            Route::ReportGenerator => "/report-generator",
            Route::Templates => "/templates",
            Route::Settings => "/settings",
            Route::WinccActivityLogger => "/wincc-activity-logger",
            Route::LogsErrors => "/logs-errors",
            Route::EmailSender => "/email-sender",
            Route::Scheduler => "/scheduler",
            Route::Help => "/help",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Route::Dashboard => "Dashboard",
            Route::ReportGenerator => "Report Generator",
            Route::Templates => "Templates",
            Route::Settings => "Settings",
            Route::WinccActivityLogger => "WinCC Activity Logger",
            Route::LogsErrors => "Logs/Errors",
            Route::EmailSender => "Email Sender",
            Route::Scheduler => "Scheduler",
            Route::Help => "Help",
        }
    }

    /// Exact match on a known path (trailing slash ignored).
    pub fn from_path(path: &str) -> Option<Route> {
        let trimmed = path.trim_end_matches('/');
        Self::ALL.into_iter().find(|r| r.path() == trimmed)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct NavItem {
    pub href: &'static str,
    pub label: &'static str,
}

pub fn nav_items() -> Vec<NavItem> {
    Route::ALL
        .iter()
        .map(|r| NavItem {
            href: r.path(),
            label: r.label(),
        })
        .collect()
}

/// Sidebar highlight rule. The dashboard only matches exactly; every other item also matches
/// its sub-paths.
pub fn is_active(current_path: &str, href: &str) -> bool {
    current_path == href || (href != HOME_PATH && current_path.starts_with(href))
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Breadcrumb {
    pub label: String,
    pub href: String,
}

/// `Home` followed by one crumb per path segment, each hyphenated word title-cased.
pub fn breadcrumbs(path: &str) -> Vec<Breadcrumb> {
    let mut crumbs = vec![Breadcrumb {
        label: "Home".to_string(),
        href: HOME_PATH.to_string(),
    }];

    let mut current = String::new();
    for segment in path.split('/').filter(|s| !s.is_empty()) {
        current.push('/');
        current.push_str(segment);
        crumbs.push(Breadcrumb {
            label: title_case_segment(segment),
            href: current.clone(),
        });
    }
    crumbs
}

fn title_case_segment(segment: &str) -> String {
    segment
        .split('-')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
