use clap::Parser;
use milestone_warden::{Args, Command, command, result::Result};

fn initialize_logger(debug: bool) -> Result<()> {
    let filter = if debug {
        simplelog::LevelFilter::Debug
    } else {
        simplelog::LevelFilter::Info
    };

    let config = simplelog::ConfigBuilder::new()
        .add_filter_allow_str("milestone_warden")
        .build();

    simplelog::TermLogger::init(
        filter,
        config,
        simplelog::TerminalMode::Mixed,
        simplelog::ColorChoice::Auto,
    )?;

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    let cli_args = Args::parse();

    initialize_logger(cli_args.debug)?;

    match &cli_args.command {
        Command::ValidateMilestones {
            prompt,
            release_branch,
        } => {
            command::validate_milestones::execute(
                &cli_args,
                *prompt,
                release_branch.clone(),
            )
            .await
        }
        Command::CheckLabels { labels } => {
            command::check_labels::execute(labels)
        }
    }
}
