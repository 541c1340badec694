use clap::Parser;

/// Parley: a terminal chat client for hosted language models.
#[derive(Parser, Debug)]
#[command(name = "parley", version, about)]
pub struct Args {
    /// Config file path override.
    #[arg(long)]
    pub config: Option<String>,

    /// Stream replies token by token.
    #[arg(long)]
    pub stream: bool,

    /// Model name override.
    #[arg(long)]
    pub model: Option<String>,

    /// Log level override (tracing filter directive, e.g. `parley=debug`).
    #[arg(long)]
    pub log_level: Option<String>,
}

pub fn parse() -> Args {
    Args::parse()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_flags() {
        let args = Args::try_parse_from([
            "parley",
            "--stream",
            "--model",
            "gemini-1.5-pro",
            "--config",
            "/tmp/p.toml",
        ])
        .unwrap();
        assert!(args.stream);
        assert_eq!(args.model.as_deref(), Some("gemini-1.5-pro"));
        assert_eq!(args.config.as_deref(), Some("/tmp/p.toml"));
        assert_eq!(args.log_level, None);
    }

    #[test]
    fn defaults_to_sync_mode() {
        let args = Args::try_parse_from(["parley"]).unwrap();
        assert!(!args.stream);
    }
}
