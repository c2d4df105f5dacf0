mod cli;
mod config;
mod error;
mod ingest;
mod insight;
mod lexicon;
mod logging;
mod report;
mod scoring;
mod stats;
mod types;

use crate::cli::{Commands, DatasetArgs, TaxonomyArg};
use crate::error::MotiveError;
use crate::ingest::Dataset;
use crate::types::config::{MotiveConfig, ReportSettings};
use crate::types::profile::Taxonomy;
use crate::types::report::{Report, ReportBody, ReportMeta};
use clap::Parser;

pub mod exit_code {
    pub const SUCCESS: i32 = 0;
    pub const WARNINGS: i32 = 1;
    pub const RUNTIME_FAILURE: i32 = 3;
}

/// Everything a command needs once the dataset and configuration are loaded.
struct Session {
    dataset: Dataset,
    config: Option<MotiveConfig>,
    registry: &'static lexicon::LexiconRegistry,
    settings: ReportSettings,
}

impl Session {
    fn open(args: &DatasetArgs) -> Result<Self, MotiveError> {
        let dataset = ingest::load_dataset(&args.path)?;

        let root = ingest::config_root(&args.path);
        let config = config::load_config(&root)?;
        match &config {
            Some(cfg) => cfg.validate()?,
            None => tracing::info!(
                root = %root.display(),
                "no {} found; using built-in lexicons",
                config::DEFAULT_CONFIG_FILE
            ),
        }

        let registry = lexicon::install(lexicon::LexiconRegistry::from_config(config.as_ref())?);
        let settings = config
            .as_ref()
            .map(MotiveConfig::report_settings)
            .unwrap_or_default();

        Ok(Self {
            dataset,
            config,
            registry,
            settings,
        })
    }

    fn observations(&self) -> &[types::observation::Observation] {
        &self.dataset.observations
    }

    fn finish(self, body: ReportBody) -> Report {
        let meta = ReportMeta::new(
            self.config
                .as_ref()
                .and_then(MotiveConfig::project_name)
                .map(str::to_string),
            self.dataset.digest,
            self.dataset.observations.len(),
        );
        Report { meta, body }
    }
}

fn taxonomy(arg: TaxonomyArg) -> Taxonomy {
    match arg {
        TaxonomyArg::Yee => Taxonomy::Yee,
        TaxonomyArg::Bartle => Taxonomy::Bartle,
    }
}

fn output_format(format: cli::ReportFormat) -> report::OutputFormat {
    match format {
        cli::ReportFormat::Json => report::OutputFormat::Json,
        cli::ReportFormat::Md => report::OutputFormat::Md,
    }
}

fn build_report(command: &Commands) -> Result<Report, MotiveError> {
    match command {
        Commands::Profile(cmd) => {
            let session = Session::open(&cmd.dataset)?;
            let profiles = scoring::compute_profiles(session.observations(), session.registry);
            let taxonomies = match cmd.taxonomy {
                Some(arg) => vec![taxonomy(arg)],
                None => vec![Taxonomy::Yee, Taxonomy::Bartle],
            };
            let summaries = taxonomies
                .into_iter()
                .map(|taxonomy| scoring::normalize::summarize(profiles.get(taxonomy)))
                .collect();
            Ok(session.finish(ReportBody::Profiles(summaries)))
        }
        Commands::Radar(cmd) => {
            let session = Session::open(&cmd.dataset)?;
            let profiles = scoring::compute_profiles(session.observations(), session.registry);
            let radar = scoring::normalize::radar(profiles.get(taxonomy(cmd.taxonomy)), &cmd.user)?;
            Ok(session.finish(ReportBody::Radar(radar)))
        }
        Commands::Compass(cmd) => {
            let session = Session::open(&cmd.dataset)?;
            let profiles = scoring::compute_profiles(session.observations(), session.registry);
            let normalize = session.settings.compass_normalize && !cmd.raw;
            let compass = scoring::compass::bartle_compass(&profiles.bartle, normalize);
            Ok(session.finish(ReportBody::Compass(compass)))
        }
        Commands::Stats(args) => {
            let session = Session::open(args)?;
            let stats = insight::user_stats::user_stats(session.observations());
            Ok(session.finish(ReportBody::Stats(stats)))
        }
        Commands::Library(cmd) => {
            let mut session = Session::open(&cmd.dataset)?;
            if let Some(top) = cmd.top {
                session.settings.top_games = top;
            }
            let library = insight::library::library_report(session.observations(), &session.settings);
            Ok(session.finish(ReportBody::Library(library)))
        }
        Commands::Explore(args) => {
            let session = Session::open(args)?;
            let summary = insight::group::group_summary(session.observations(), &session.settings);
            Ok(session.finish(ReportBody::Explore(summary)))
        }
        Commands::Tags(args) => {
            let session = Session::open(args)?;
            let inventory = insight::library::tag_inventory(session.observations());
            Ok(session.finish(ReportBody::Tags(inventory)))
        }
    }
}

fn dataset_args(command: &Commands) -> &DatasetArgs {
    match command {
        Commands::Profile(cmd) => &cmd.dataset,
        Commands::Radar(cmd) => &cmd.dataset,
        Commands::Compass(cmd) => &cmd.dataset,
        Commands::Library(cmd) => &cmd.dataset,
        Commands::Stats(args) | Commands::Explore(args) | Commands::Tags(args) => args,
    }
}

fn run() -> Result<i32, MotiveError> {
    let cli = cli::Cli::parse();
    logging::init(cli.verbose, cli.quiet);

    let report = build_report(&cli.command)?;
    let rendered = report::render(&report, output_format(dataset_args(&cli.command).format))?;
    println!("{rendered}");

    if report.has_warnings() {
        if let ReportBody::Profiles(summaries) = &report.body {
            for summary in summaries {
                for user in summary.users_without_signal() {
                    tracing::warn!(user, taxonomy = summary.taxonomy.title(), "no signal");
                }
            }
        }
        Ok(exit_code::WARNINGS)
    } else {
        Ok(exit_code::SUCCESS)
    }
}

fn main() {
    match run() {
        Ok(code) => {
            if code != exit_code::SUCCESS {
                std::process::exit(code);
            }
        }
        Err(e) => {
            eprintln!("error: {}", e);
            std::process::exit(exit_code::RUNTIME_FAILURE);
        }
    }
}
