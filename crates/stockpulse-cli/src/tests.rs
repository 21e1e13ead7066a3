use super::*;

#[test]
fn parses_db_ping_command() {
    let cli = Cli::try_parse_from(["stockpulse", "db", "ping"]).expect("expected valid cli args");

    assert!(matches!(
        cli.command,
        Some(Commands::Db {
            command: DbCommands::Ping
        })
    ));
}

#[test]
fn parses_db_migrate_command() {
    let cli =
        Cli::try_parse_from(["stockpulse", "db", "migrate"]).expect("expected valid cli args");

    assert!(matches!(
        cli.command,
        Some(Commands::Db {
            command: DbCommands::Migrate
        })
    ));
}

#[test]
fn no_command_is_none() {
    let cli = Cli::try_parse_from(["stockpulse"]).expect("expected valid cli args");
    assert!(cli.command.is_none());
}

#[test]
fn collect_defaults_to_all_stocks() {
    let cli = Cli::try_parse_from(["stockpulse", "collect"]).unwrap();
    assert!(matches!(
        cli.command,
        Some(Commands::Collect {
            stock: None,
            dry_run: false
        })
    ));
}

#[test]
fn collect_with_stock_and_dry_run() {
    let cli =
        Cli::try_parse_from(["stockpulse", "collect", "--stock", "005930", "--dry-run"]).unwrap();
    assert!(matches!(
        cli.command,
        Some(Commands::Collect {
            stock: Some(ref code),
            dry_run: true
        }) if code == "005930"
    ));
}

#[test]
fn stage_commands_accept_stock_filter() {
    let cli = Cli::try_parse_from(["stockpulse", "filter", "--stock", "000660"]).unwrap();
    assert!(matches!(cli.command, Some(Commands::Filter { stock: Some(ref c) }) if c == "000660"));

    let cli = Cli::try_parse_from(["stockpulse", "enrich"]).unwrap();
    assert!(matches!(cli.command, Some(Commands::Enrich { stock: None })));

    let cli = Cli::try_parse_from(["stockpulse", "sentiment", "--stock", "035720"]).unwrap();
    assert!(matches!(cli.command, Some(Commands::Sentiment { stock: Some(ref c) }) if c == "035720"));

    let cli = Cli::try_parse_from(["stockpulse", "analyze", "--stock", "005930"]).unwrap();
    assert!(matches!(cli.command, Some(Commands::Analyze { stock: Some(ref c) }) if c == "005930"));
}

#[test]
fn parses_schedule_command() {
    let cli = Cli::try_parse_from(["stockpulse", "schedule"]).unwrap();
    assert!(matches!(cli.command, Some(Commands::Schedule)));
}

#[test]
fn dry_run_is_only_a_collect_flag() {
    assert!(Cli::try_parse_from(["stockpulse", "filter", "--dry-run"]).is_err());
}

#[test]
fn unknown_db_subcommand_is_rejected() {
    assert!(Cli::try_parse_from(["stockpulse", "db", "seed"]).is_err());
}

#[test]
fn stage_names_match_job_run_types() {
    use crate::runner::Stage;

    let names: Vec<&str> = [
        Stage::Collect,
        Stage::Filter,
        Stage::Enrich,
        Stage::Sentiment,
        Stage::Analyze,
    ]
    .into_iter()
    .map(Stage::as_str)
    .collect();
    assert_eq!(names, ["collect", "filter", "enrich", "sentiment", "analyze"]);
    assert_eq!(Trigger::Cli.as_str(), "cli");
    assert_eq!(Trigger::Scheduler.as_str(), "scheduler");
}
