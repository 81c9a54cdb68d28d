use clap::{CommandFactory, Parser};

pub const DEFAULT_ASK: &str = "What is <3?";

/// Ask a question answered from an OpenSearch index through Amazon Bedrock.
#[derive(Parser, Debug)]
#[command(name = "bedrock_rag")]
pub struct Cli {
    /// Question to answer
    #[arg(long, default_value = DEFAULT_ASK)]
    pub ask: String,

    /// AWS region (overrides AWS_REGION_NAME)
    #[arg(long)]
    pub region: Option<String>,

    /// OpenSearch domain, index and secret name (overrides RAG_INDEX_NAME)
    #[arg(long)]
    pub index_name: Option<String>,
}

impl Cli {
    /// Parses the flags this program knows and returns everything else untouched.
    pub fn parse_known_from<I, T>(args: I) -> (Self, Vec<String>)
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        let (known, unknown) = split_known_args(args.into_iter().map(Into::into));
        (Self::parse_from(known), unknown)
    }

    pub fn parse_known() -> (Self, Vec<String>) {
        Self::parse_known_from(std::env::args())
    }
}

fn split_known_args(mut args: impl Iterator<Item = String>) -> (Vec<String>, Vec<String>) {
    let command = Cli::command();
    let flags: Vec<String> = command
        .get_arguments()
        .filter_map(|arg| arg.get_long())
        .map(|long| format!("--{}", long))
        .collect();

    let mut known: Vec<String> = args.next().into_iter().collect();
    let mut unknown = Vec::new();

    while let Some(arg) = args.next() {
        if matches!(arg.as_str(), "-h" | "--help") {
            known.push(arg);
            continue;
        }

        let flag = arg.split_once('=').map_or(arg.as_str(), |(flag, _)| flag);
        if !flags.iter().any(|f| f == flag) {
            unknown.push(arg);
            continue;
        }

        // Rejoin as `--flag=value` so values starting with `-` stay values.
        if arg.contains('=') {
            known.push(arg);
        } else if let Some(value) = args.next() {
            known.push(format!("{}={}", arg, value));
        } else {
            known.push(arg);
        }
    }

    (known, unknown)
}
