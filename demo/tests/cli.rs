use test_driver::TestSession;

const VERSION: &str = env!("CARGO_PKG_VERSION");

fn demo() -> TestSession {
    TestSession::new(env!("CARGO_BIN_EXE_clopt-demo")).env_remove("CLOPT_DEMO_LOG")
}

fn usage_block() -> String {
    format!(
        "clopt-demo {VERSION} - Projectile launcher demonstrating the clopt option parser\n\
         Usage:\n    clopt-demo [OPTIONS] [FILE1 [FILE2 [...]]]\n\n"
    )
}

#[test]
fn version_prints_name_and_version() {
    let out = demo().arg("--version").wait_exit(0);
    assert_eq!(out.stdout, format!("clopt-demo {VERSION}\n"));
    assert_eq!(out.stderr, "");

    let out = demo().arg("-V").wait_exit(0);
    assert_eq!(out.stdout, format!("clopt-demo {VERSION}\n"));
}

#[test]
fn help_prints_usage_description_and_options() {
    let out = demo().arg("-h").wait_exit(0);
    assert!(out.stdout.starts_with(&usage_block()), "stdout:\n{}", out.stdout);
    assert!(out.stdout.contains("Nothing is launched.\n\nOptions:\n"));
    // Too wide for the description column, so the text moves to its own line.
    assert!(out.stdout.contains(&format!(
        "  -q, --quality=<GOOD|BAD|UGLY>\n{:28}Quality of the projectiles to be used.\n",
        ""
    )));
    assert!(out.stdout.ends_with(&format!(
        "{:<28}Display this help screen and quit.\n",
        "  -h, --help"
    )));
    assert_eq!(out.stderr, "");
}

#[test]
fn collects_every_option() {
    let out = demo()
        .args([
            "--automatic",
            "--label",
            "rocket",
            "--rating=4.75",
            "--direction",
            "-90",
            "-v",
            "12",
            "-q",
            "Bad",
            "first",
            "second",
        ])
        .wait_exit(0);

    assert_eq!(
        out.stdout,
        "The following information was retrieved from the command line:\n\
         \x20   Label:          rocket\n\
         \x20   Operation type: automatic (manual opt: no, automatic opt: yes)\n\
         \x20   Direction:      -90\n\
         \x20   Velocity:       12\n\
         \x20   Rating:         4.75\n\
         \x20   Quality:        bad\n\
         \n\
         If this program did anything, it would process the following files:\n\
         \x20   \"first\"\n\
         \x20   \"second\"\n"
    );
    assert_eq!(out.stderr, "");
}

#[test]
fn short_cluster_takes_arguments_in_order() {
    let out = demo().args(["-alq", "rocket", "ugly", "file"]).wait_exit(0);
    assert!(out.stdout.contains("    Label:          rocket\n"));
    assert!(out.stdout.contains("    Quality:        ugly\n"));
    assert!(out.stdout.contains("    Operation type: automatic"));
    assert!(out.stdout.ends_with("files:\n    \"file\"\n"));
}

#[test]
fn stopper_keeps_option_lookalikes_as_files() {
    let out = demo().args(["--", "-a", "--label"]).wait_exit(0);
    assert!(out
        .stdout
        .contains("    Operation type: manual (manual opt: no, automatic opt: no)\n"));
    assert!(out.stdout.ends_with("files:\n    \"-a\"\n    \"--label\"\n"));
}

#[test]
fn help_wins_over_errors() {
    let out = demo().args(["--bogus", "--help"]).wait_exit(0);
    assert_eq!(out.stderr, "clopt-demo: Unrecognized option --bogus\n\n");
    assert!(out.stdout.starts_with(&usage_block()));
    assert!(out.stdout.contains("Options:\n"));
}

#[test]
fn negative_velocity_is_a_parse_error() {
    let out = demo().args(["-v", "-3"]).wait_exit(1);
    assert_eq!(
        out.stderr,
        "clopt-demo: Argument `-3' passed to option -v is not a valid unsigned integer.\n\n"
    );
    assert_eq!(
        out.stdout,
        format!(
            "{}See `clopt-demo --help' for more details.\n",
            usage_block()
        )
    );
}

#[test]
fn every_error_is_reported() {
    let out = demo()
        .args(["--automatic=yes", "-x", "--rating", "1e999", "--label"])
        .wait_exit(1);
    assert_eq!(
        out.stderr,
        "clopt-demo: Argument `yes' not expected for option --automatic\n\
         clopt-demo: Unrecognized option -x\n\
         clopt-demo: Argument `1e999' passed to option --rating is too large.\n\
         clopt-demo: Missing argument for option --label\n\
         \n"
    );
}

#[test]
fn unknown_quality_uses_callback_message() {
    let out = demo().args(["--quality=shiny"]).wait_exit(1);
    assert_eq!(
        out.stderr,
        "clopt-demo: Argument `shiny' passed to option --quality is not a valid quality \
         specifier (allowed values: good, bad, ugly).\n\n"
    );
}

#[test]
fn empty_file_name_is_rejected_after_parsing() {
    let out = demo().args(["-a", ""]).wait_exit(1);
    assert_eq!(out.stderr, "clopt-demo: Empty file name given.\n\n");
    assert!(out.stdout.ends_with("See `clopt-demo --help' for more details.\n"));
    assert!(!out.stdout.contains("retrieved from the command line"));
}

#[test]
fn log_level_from_environment() {
    let out = demo().env("CLOPT_DEMO_LOG", "debug").arg("-a").wait_exit(0);
    assert!(out.stderr.contains("[DEBUG] [clopt::scan]"), "stderr:\n{}", out.stderr);
    assert!(out.stderr.contains("parse finished"));

    let out = demo().arg("-a").wait_exit(0);
    assert_eq!(out.stderr, "");
}
