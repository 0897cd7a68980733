mod analyze;
mod audience;
mod compare;
mod load;
mod render;

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;
use vkpulse_analytics::Metric;

#[derive(Debug, Parser)]
#[command(name = "vkpulse")]
#[command(about = "Content and engagement analytics for community wall posts")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum OutputFormat {
    Markdown,
    Json,
}

/// Ranking field for top posts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum MetricArg {
    Likes,
    Reposts,
    Comments,
    Views,
    Engagement,
}

impl From<MetricArg> for Metric {
    fn from(arg: MetricArg) -> Self {
        match arg {
            MetricArg::Likes => Metric::Likes,
            MetricArg::Reposts => Metric::Reposts,
            MetricArg::Comments => Metric::Comments,
            MetricArg::Views => Metric::Views,
            MetricArg::Engagement => Metric::Engagement,
        }
    }
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Print the content label for a piece of text
    Classify {
        /// Post text to classify
        text: String,
    },
    /// Classify and aggregate one community's posts
    Analyze {
        /// JSON file of collected posts
        #[arg(long)]
        posts: PathBuf,

        /// Community name used in the report
        #[arg(long, default_value = "community")]
        name: String,

        /// Subscriber count, used for the engagement rate
        #[arg(long)]
        subscribers: Option<u64>,

        /// Number of top posts to list (defaults to VKPULSE_TOP_N)
        #[arg(long)]
        top: Option<usize>,

        /// Ranking field for top posts
        #[arg(long, value_enum, default_value_t = MetricArg::Likes)]
        metric: MetricArg,

        #[arg(long, value_enum, default_value_t = OutputFormat::Markdown)]
        format: OutputFormat,
    },
    /// Compare engagement and content mix across communities
    Compare {
        /// YAML file listing communities and their post files
        #[arg(long)]
        communities: PathBuf,

        #[arg(long, value_enum, default_value_t = OutputFormat::Markdown)]
        format: OutputFormat,
    },
    /// Recommend a content strategy for the primary community
    Strategy {
        /// YAML file listing communities; exactly one must be primary
        #[arg(long)]
        communities: PathBuf,

        #[arg(long, value_enum, default_value_t = OutputFormat::Markdown)]
        format: OutputFormat,
    },
    /// Summarize subscriber demographics, or compare several audiences
    Audience {
        /// JSON file of collected subscribers
        #[arg(long, required_unless_present = "communities", conflicts_with = "communities")]
        subscribers: Option<PathBuf>,

        /// YAML file listing communities with `members` files to compare
        #[arg(long)]
        communities: Option<PathBuf>,

        #[arg(long, value_enum, default_value_t = OutputFormat::Markdown)]
        format: OutputFormat,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = vkpulse_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    tracing::debug!(env = %config.env, "configuration loaded");

    match cli.command {
        Some(Commands::Classify { text }) => {
            let classifier = load::load_classifier(&config)?;
            println!("{}", classifier.classify(&text));
        }
        Some(Commands::Analyze {
            posts,
            name,
            subscribers,
            top,
            metric,
            format,
        }) => {
            let args = analyze::AnalyzeArgs {
                posts,
                name,
                subscribers,
                top,
                metric: metric.into(),
            };
            analyze::run_analyze(&config, args, format).await?;
        }
        Some(Commands::Compare {
            communities,
            format,
        }) => compare::run_compare(&config, &communities, format).await?,
        Some(Commands::Strategy {
            communities,
            format,
        }) => compare::run_strategy(&config, &communities, format).await?,
        Some(Commands::Audience {
            subscribers,
            communities,
            format,
        }) => match (subscribers, communities) {
            (_, Some(communities)) => {
                audience::run_audience_comparison(&config, &communities, format).await?;
            }
            (Some(subscribers), None) => {
                audience::run_audience(&config, &subscribers, format).await?;
            }
            (None, None) => anyhow::bail!("pass --subscribers or --communities"),
        },
        None => println!("vkpulse: run with --help to list commands"),
    }

    Ok(())
}
