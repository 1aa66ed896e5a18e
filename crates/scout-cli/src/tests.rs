use super::*;
use scout_core::{FilterSpec, FollowerRange, Hashtag};

fn discover_args(argv: &[&str]) -> DiscoverArgs {
    let mut full = vec!["scout-cli", "discover"];
    full.extend_from_slice(argv);
    match Cli::try_parse_from(full).expect("expected valid cli args").command {
        Commands::Discover(args) => args,
        Commands::Status { .. } => panic!("expected discover command"),
    }
}

#[test]
fn parses_status_command() {
    let cli = Cli::try_parse_from(["scout-cli", "status", "job-42"]).expect("expected valid cli args");
    assert!(matches!(
        cli.command,
        Commands::Status { ref job_id } if job_id == "job-42"
    ));
}

#[test]
fn status_requires_job_id() {
    assert!(Cli::try_parse_from(["scout-cli", "status"]).is_err());
}

#[test]
fn subcommand_is_required() {
    assert!(Cli::try_parse_from(["scout-cli"]).is_err());
}

#[test]
fn discover_without_flags_uses_default_filters() {
    let args = discover_args(&[]);
    let filters = discover::build_filters(&args).unwrap();
    assert_eq!(filters, FilterSpec::default());
    assert_eq!(filters.platform, Platform::Instagram);
}

#[test]
fn discover_parses_platform_case_insensitively() {
    let args = discover_args(&["--platform", "YouTube"]);
    assert_eq!(args.platform, Some(Platform::Youtube));
}

#[test]
fn discover_rejects_unknown_platform() {
    assert!(Cli::try_parse_from(["scout-cli", "discover", "--platform", "myspace"]).is_err());
}

#[test]
fn discover_flags_build_filters() {
    let args = discover_args(&[
        "--platform",
        "tiktok",
        "--max-results",
        "250",
        "--min-followers",
        "50000",
        "--lookalike-type",
        "creator",
        "--lookalike-username",
        "somecreator",
        "--interest",
        "Fitness",
        "--interest",
        "Beauty",
        "--hashtag",
        "#vegan",
        "--bio-phrase",
        "coach",
    ]);
    let filters = discover::build_filters(&args).unwrap();

    assert_eq!(filters.platform, Platform::Tiktok);
    assert_eq!(filters.max_results, Some(250));
    assert_eq!(
        filters.follower_count,
        Some(FollowerRange {
            min: Some(50_000),
            max: None
        })
    );
    assert_eq!(filters.lookalike_type, Some(LookalikeKind::Creator));
    assert_eq!(filters.lookalike_username.as_deref(), Some("somecreator"));
    assert_eq!(filters.creator_interests, vec!["Fitness", "Beauty"]);
    assert_eq!(
        filters.hashtags,
        vec![Hashtag {
            name: "vegan".to_string()
        }]
    );
    assert_eq!(filters.bio_phrase.as_deref(), Some("coach"));
    assert!(filters.validate().is_ok());
}

#[test]
fn flags_override_filter_file() {
    let path = std::env::temp_dir().join(format!("scout-cli-filters-{}.json", std::process::id()));
    std::fs::write(
        &path,
        r#"{"platform":"facebook","max_results":100,"follower_count":{"min":1000,"max":5000}}"#,
    )
    .unwrap();

    let path_arg = path.to_string_lossy().into_owned();
    let args = discover_args(&["--filters", &path_arg, "--max-followers", "9000"]);
    let filters = discover::build_filters(&args).unwrap();
    std::fs::remove_file(&path).ok();

    assert_eq!(filters.platform, Platform::Facebook);
    assert_eq!(filters.max_results, Some(100));
    assert_eq!(
        filters.follower_count,
        Some(FollowerRange {
            min: Some(1000),
            max: Some(9000)
        })
    );
}

#[test]
fn unreadable_filter_file_is_an_error() {
    let args = discover_args(&["--filters", "/definitely/not/here.json"]);
    let err = discover::build_filters(&args).unwrap_err();
    assert!(err.to_string().contains("reading filter file"));
}

#[test]
fn lookalike_type_without_handle_fails_validation() {
    let args = discover_args(&["--lookalike-type", "audience"]);
    let filters = discover::build_filters(&args).unwrap();
    assert!(filters.validate().is_err());
}
