use std::path::PathBuf;

fn main() {
    let args: Vec<String> = std::env::args().collect();

    // Optional config file override: --config <path>
    let config_path = args
        .iter()
        .position(|a| a == "--config")
        .and_then(|i| args.get(i + 1))
        .map(PathBuf::from);

    // Print the merged configuration as TOML and exit.
    if args.iter().any(|a| a == "--print-config") {
        report_assistant::print_config(config_path.as_deref());
        return;
    }

    // Non-interactive wizard proof mode.
    // Prints a JSON transcript of the completed draft and the report handle, exits 0/1.
    if args.iter().any(|a| a == "--wizard-smoke") {
        report_assistant::run_wizard_smoke(config_path.as_deref());
        return;
    }

    // Non-interactive TUI smoke test mode (for automated checks).
    // Renders a single frame for a specific page and exits 0.
    // Usage: --tui-smoke or --tui-smoke=login|dashboard|criteria|template|preview|charts|output|cancel|<route>
    if let Some(arg) = args
        .iter()
        .find(|a| a.as_str() == "--tui-smoke" || a.starts_with("--tui-smoke="))
    {
        let target = arg
            .split_once('=')
            .map(|(_, v)| v.to_string())
            .filter(|v| !v.trim().is_empty());
        report_assistant::run_tui_smoke(target, config_path.as_deref());
        return;
    }

    report_assistant::run_tui(config_path.as_deref());
}
