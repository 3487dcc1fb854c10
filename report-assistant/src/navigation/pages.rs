// Static content for the dashboard and the not-yet-built sections.

use super::Route;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trend {
    Up,
    Down,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatCard {
    pub title: &'static str,
    pub value: &'static str,
    pub description: Option<&'static str>,
    pub trend: Option<Trend>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuickAction {
    pub title: &'static str,
    pub route: Route,
    pub description: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Success,
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActivityItem {
    pub title: &'static str,
    pub description: &'static str,
    pub time: &'static str,
    pub severity: Severity,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HealthState {
    Ok,
    Degraded,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServiceStatus {
    pub name: &'static str,
    pub status: &'static str,
    pub state: HealthState,
}

pub const WELCOME_TITLE: &str = "Welcome to SCADA Assistant";
pub const SUPPORT_CONTACT: &str = "support@scada-assistant.com";

pub const STAT_CARDS: [StatCard; 4] = [
    StatCard {
        title: "Reports Generated (Month)",
        value: "1,234",
        description: Some("+20.1% from last month"),
        trend: Some(Trend::Up),
    },
    StatCard {
        title: "Scheduled Tasks",
        value: "42",
        description: Some("5 overdue"),
        trend: Some(Trend::Down),
    },
    StatCard {
        title: "Active Users",
        value: "7",
        description: None,
        trend: None,
    },
    StatCard {
        title: "System Status",
        value: "Operational",
        description: Some("All systems green"),
        trend: Some(Trend::Up),
    },
];

pub const QUICK_ACTIONS: [QuickAction; 3] = [
    QuickAction {
        title: "New Report",
        route: Route::ReportGenerator,
        description: "Generate a new SCADA report.",
    },
    QuickAction {
        title: "View Templates",
        route: Route::Templates,
        description: "Manage and edit report templates.",
    },
    QuickAction {
        title: "Check Schedule",
        route: Route::Scheduler,
        description: "View and manage scheduled tasks.",
    },
];

pub const RECENT_ACTIVITY: [ActivityItem; 5] = [
    ActivityItem {
        title: "Report 'Daily Production' Generated",
        description: "Generated by System Scheduler",
        time: "10 min ago",
        severity: Severity::Success,
    },
    ActivityItem {
        title: "User 'john.doe' Logged In",
        description: "From IP: 192.168.1.100",
        time: "45 min ago",
        severity: Severity::Info,
    },
    ActivityItem {
        title: "Template 'ShiftSummary_v2' Updated",
        description: "By admin@example.com",
        time: "2 hours ago",
        severity: Severity::Info,
    },
    ActivityItem {
        title: "Scheduled Task 'WeeklyBackup' Failed",
        description: "Error: Connection timed out",
        time: "5 hours ago",
        severity: Severity::Error,
    },
    ActivityItem {
        title: "New User 'jane.smith' Added",
        description: "Role: Operator",
        time: "1 day ago",
        severity: Severity::Info,
    },
];

pub const SERVICE_STATUS: [ServiceStatus; 4] = [
    ServiceStatus {
        name: "Database Connection",
        status: "Connected",
        state: HealthState::Ok,
    },
    ServiceStatus {
        name: "WinCC Interface",
        status: "Active",
        state: HealthState::Ok,
    },
    ServiceStatus {
        name: "Email Service",
        status: "Degraded",
        state: HealthState::Degraded,
    },
    ServiceStatus {
        name: "Report Engine",
        status: "Idle",
        state: HealthState::Ok,
    },
];

/// Title, intended functionality and teaser of a section without working logic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placeholder {
    pub title: &'static str,
    pub description: &'static str,
    pub coming_soon: &'static str,
    pub teaser: &'static str,
}

pub fn placeholder(route: Route) -> Option<Placeholder> {
    let p = match route {
        Route::Templates => Placeholder {
            title: "Template Manager",
            description: "This section will allow you to manage and edit report templates. \
                Functionality to create, view, edit, and delete templates will be available here.",
            coming_soon: "Template Management Coming Soon",
            teaser: "Check back later for full template editing capabilities.",
        },
        Route::Settings => Placeholder {
            title: "Application Settings",
            description: "Configure application-wide settings here. This may include options for \
                database connections, default behaviors, user preferences, and integration settings.",
            coming_soon: "Settings Configuration Coming Soon",
            teaser: "Detailed application settings will be available in a future update.",
        },
        Route::WinccActivityLogger => Placeholder {
            title: "WinCC Activity Logger",
            description: "This module will display a timeline view of WinCC activities. You'll be \
                able to filter activities by date range, category, and user.",
            coming_soon: "WinCC Activity Tracking Coming Soon",
            teaser: "Monitor SCADA system activities effectively in an upcoming release.",
        },
        Route::LogsErrors => Placeholder {
            title: "System Logs & Errors",
            description: "View system logs and error reports in this section. Features will \
                include filtering, searching, and detailed log views.",
            coming_soon: "Log Viewer Coming Soon",
            teaser: "Comprehensive logging and error tracking will be implemented here.",
        },
        Route::EmailSender => Placeholder {
            title: "Email Sender Configuration & Logs",
            description: "Configure SMTP settings, manage email templates, view an address book, \
                and monitor the email queue and send history.",
            coming_soon: "Email Management Tools Coming Soon",
            teaser: "Full email configuration and logging capabilities are under development.",
        },
        Route::Scheduler => Placeholder {
            title: "Task Scheduler",
            description: "Manage scheduled tasks using a calendar view (monthly/weekly/daily). Add \
                new tasks, edit existing ones, and monitor their status.",
            coming_soon: "Task Scheduler Coming Soon",
            teaser: "Automate your report generation and other tasks with the upcoming scheduler.",
        },
        Route::Help => Placeholder {
            title: "Help & Support",
            description: "User guides and troubleshooting notes for SCADA Assistant will be \
                collected here.",
            coming_soon: "Help Center Coming Soon",
            teaser: SUPPORT_CONTACT,
        },
        Route::Dashboard | Route::ReportGenerator => return None,
    };
    Some(p)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_section_without_logic_has_a_placeholder() {
        for route in Route::ALL {
            let has_page = matches!(route, Route::Dashboard | Route::ReportGenerator);
            assert_eq!(placeholder(route).is_none(), has_page, "{:?}", route);
        }
        assert_eq!(
            placeholder(Route::Scheduler).map(|p| p.title),
            Some("Task Scheduler")
        );
    }

    #[test]
    fn dashboard_content_is_complete() {
        assert_eq!(STAT_CARDS[0].value, "1,234");
        assert_eq!(STAT_CARDS[1].trend, Some(Trend::Down));
        assert_eq!(QUICK_ACTIONS[0].route, Route::ReportGenerator);
        assert_eq!(RECENT_ACTIVITY.len(), 5);
        assert_eq!(
            SERVICE_STATUS
                .iter()
                .filter(|s| s.state == HealthState::Degraded)
                .count(),
            1
        );
    }
}
