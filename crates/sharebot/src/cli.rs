use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "sharelink")]
#[command(author, version, about = "Telegram bot that turns uploads into short-lived shareable links", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Commands {
    /// Run the bot with long polling
    Run,
}

impl Cli {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_subcommand_defaults_to_none() {
        let cli = Cli::try_parse_from(["sharelink"]).unwrap();
        assert_eq!(cli.command, None);
    }

    #[test]
    fn test_run_subcommand() {
        let cli = Cli::try_parse_from(["sharelink", "run"]).unwrap();
        assert_eq!(cli.command, Some(Commands::Run));
    }

    #[test]
    fn test_unknown_subcommand_fails() {
        assert!(Cli::try_parse_from(["sharelink", "serve"]).is_err());
    }
}
