use clap::{Arg, ArgAction, Command};

pub fn build_cli() -> Command {
    Command::new("winwho")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Report which process owns the currently focused window")
        .long_about(
            "winwho detects the session's windowing backend (X11, Sway-style IPC, or a \
             compositor introspection helper), asks it for the focused window's owning \
             process, and prints that process's short command name. Built as the \
             follow-the-focus source for per-application volume control and similar \
             consumers.",
        )
        .arg(
            Arg::new("quiet")
                .short('q')
                .long("quiet")
                .help("Only log errors")
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(
            Command::new("current")
                .about("Resolve the focused window's process name(s) once")
                .arg(
                    Arg::new("json")
                        .long("json")
                        .help("Emit a JSON object instead of plain lines")
                        .action(ArgAction::SetTrue),
                ),
        )
        .subcommand(
            Command::new("watch")
                .about("Poll the resolver and print the process name(s) on every change")
                .arg(
                    Arg::new("interval-ms")
                        .long("interval-ms")
                        .help("Polling interval in milliseconds")
                        .value_parser(clap::value_parser!(u64))
                        .default_value("250"),
                ),
        )
        .subcommand(Command::new("env").about("Print the detected windowing environment"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parses_current() {
        let matches = build_cli()
            .try_get_matches_from(["winwho", "current", "--json"])
            .unwrap();
        let (name, sub) = matches.subcommand().unwrap();
        assert_eq!(name, "current");
        assert!(sub.get_flag("json"));
    }

    #[test]
    fn test_cli_watch_interval_default() {
        let matches = build_cli()
            .try_get_matches_from(["winwho", "watch"])
            .unwrap();
        let (_, sub) = matches.subcommand().unwrap();
        assert_eq!(sub.get_one::<u64>("interval-ms"), Some(&250));
    }

    #[test]
    fn test_cli_requires_subcommand() {
        assert!(build_cli().try_get_matches_from(["winwho"]).is_err());
    }
}
