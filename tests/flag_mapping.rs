use deckbake::cli::CliArgs;
use deckbake::pipeline::{stage_plan, Flags};

#[test]
fn baking_is_on_by_default_and_nobake_disables_it() {
    let flags = Flags::from_args(&CliArgs::default());
    assert!(flags.bake);
    assert!(!flags.relink);
    assert!(!flags.publish);

    let args = CliArgs {
        nobake: true,
        ..CliArgs::default()
    };
    assert!(!Flags::from_args(&args).bake);
}

#[test]
fn dev_expands_to_watch_veev2rel_clean_without_slow_stages() {
    let args = CliArgs {
        dev: true,
        screenshots: true,
        package: true,
        ..CliArgs::default()
    };
    let flags = Flags::from_args(&args);

    assert!(flags.watch);
    assert!(flags.veev2rel);
    assert!(flags.clean);
    assert!(!flags.screenshots);
    assert!(!flags.package);
}

#[test]
fn publish_only_skips_baking() {
    let args = CliArgs {
        publish_only: true,
        ..CliArgs::default()
    };
    let flags = Flags::from_args(&args);

    assert!(!flags.bake);
    assert!(flags.publish);
    assert!(!flags.controls);
}

#[test]
fn stage_plan_follows_the_chain_order() {
    let flags = Flags {
        bake: true,
        clean: true,
        ..Flags::default()
    };
    let plan = stage_plan(&flags);

    let names: Vec<_> = plan.iter().map(|(name, _)| *name).collect();
    assert_eq!(
        names,
        vec![
            "ensure-temp",
            "bake-partials",
            "compile-styles",
            "relink",
            "convert-format",
            "screenshot",
            "package",
            "generate-control-files",
            "publish",
            "clean",
        ]
    );

    let enabled: Vec<_> = plan.iter().filter(|(_, on)| *on).map(|(n, _)| *n).collect();
    assert_eq!(enabled, vec!["ensure-temp", "bake-partials", "compile-styles", "clean"]);
}
