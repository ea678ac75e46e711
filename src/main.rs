use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;

use git_autotag::cli::{self, Workflow};
use git_autotag::config;
use git_autotag::diagnostics::Diagnostic;
use git_autotag::domain::prerelease::DevVersionStyle;
use git_autotag::git::{Git2Repository, Repository};
use git_autotag::ui;

#[derive(clap::Parser)]
#[command(
    name = "git-autotag",
    version,
    about = "Derive the next semantic version from conventional commits and apply it as git tags"
)]
struct Args {
    #[arg(
        short,
        long,
        env = "GITHUB_WORKSPACE",
        help = "Path to the repository to work on"
    )]
    repository: Option<PathBuf>,

    #[arg(short, long, env = "MAIN_BRANCH", help = "The name of the main branch")]
    main_branch: Option<String>,

    #[arg(
        short,
        long,
        env = "DEV_BRANCH",
        help = "The dev branch to tag with a pre-release version instead of the main branch"
    )]
    dev_branch: Option<String>,

    #[arg(
        short = 's',
        long,
        env = "DEV_SUFFIX",
        help = "The pre-release suffix to use for dev tags"
    )]
    dev_suffix: Option<String>,

    #[arg(
        short,
        long,
        env = "INCLUDE_SHORTER_VERSIONS",
        help = "Include shorter versions of tags that move as new versions are created"
    )]
    include_shorter_versions: bool,

    #[arg(
        short,
        long,
        env = "PUSH",
        help = "Push any new tags to the remote repository"
    )]
    push: bool,

    #[arg(
        long,
        env = "USE_SEMANTIC_DEV_VERSIONS",
        help = "Encode a nested semantic version in dev pre-releases instead of a flat counter"
    )]
    semantic_dev_versions: bool,

    #[arg(
        short = 'c',
        long,
        env = "CHANGELOG_FILE",
        help = "The file to write the changelog to"
    )]
    changelog_file: Option<PathBuf>,

    #[arg(
        short = 'g',
        long,
        env = "CHANGELOG_MESSAGE",
        help = "An optional changelog message to add"
    )]
    changelog_message: Option<String>,

    #[arg(long, help = "Don't fetch from the remote before resolving versions")]
    no_fetch: bool,

    #[arg(long, help = "Custom configuration file path")]
    config: Option<String>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = match config::load_config(args.config.as_deref()) {
        Ok(cfg) => cfg,
        Err(e) => {
            ui::display_error(&format!("Error loading config: {}", e));
            std::process::exit(1);
        }
    };

    // Command-line arguments (and their env defaults) win over the file.
    if let Some(main_branch) = args.main_branch {
        config.main_branch = main_branch;
    }
    if let Some(dev_branch) = args.dev_branch {
        config.dev.branch = Some(dev_branch);
    }
    if let Some(suffix) = args.dev_suffix {
        config.dev.suffix = suffix;
    }
    if args.include_shorter_versions {
        config.include_shorter_versions = true;
    }
    if args.push {
        config.push = true;
    }
    if args.semantic_dev_versions {
        config.dev.semantic = true;
    }
    if let Some(file) = args.changelog_file {
        config.changelog.file = Some(file);
    }
    if let Some(message) = args.changelog_message {
        config.changelog.message = Some(message);
    }

    let repo_path = args.repository.unwrap_or_else(|| PathBuf::from("."));
    let repo = match Git2Repository::open(&repo_path) {
        Ok(repo) => repo,
        Err(e) => {
            ui::display_error(&format!("Git repository error: {}", e));
            std::process::exit(1);
        }
    };

    let mut diagnostics = Vec::new();
    if !args.no_fetch {
        ui::display_status("Fetching latest data from remote...");
        match repo.fetch(&config.remote) {
            Ok(()) => ui::display_success("Fetched branches and tags"),
            Err(e) => diagnostics.push(Diagnostic::FetchFailed {
                remote: config.remote.clone(),
                reason: e.to_string(),
            }),
        }
    }

    let workflow = Workflow::new(&repo, &config);
    let style = if config.dev.semantic {
        DevVersionStyle::Semantic
    } else {
        DevVersionStyle::Incrementing
    };

    let result = match config.dev.branch.clone() {
        Some(dev_branch) => workflow.tag_dev(&dev_branch, &config.dev.suffix, style),
        None => workflow.tag_main(),
    };

    match result {
        Ok(mut outcome) => {
            ui::display_outcome(&outcome);
            cli::write_ci_output(
                "previous-version",
                &outcome.previous_version,
                &mut outcome.diagnostics,
            )?;
            cli::write_ci_output("new-version", &outcome.new_version, &mut outcome.diagnostics)?;

            diagnostics.extend(outcome.diagnostics);
            ui::display_diagnostics(&diagnostics);
            Ok(())
        }
        Err(e) => {
            ui::display_diagnostics(&diagnostics);
            ui::display_error(&e.to_string());
            std::process::exit(1);
        }
    }
}
