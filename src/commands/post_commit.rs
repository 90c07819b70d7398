// ABOUTME: post-commit command implementation.
// ABOUTME: Classifies the committed revision and dispatches the executor for tags.

use std::path::Path;
use std::process::ExitCode;
use tagdeploy::config::{Config, TriggerSettings};
use tagdeploy::dispatch::Dispatcher;
use tagdeploy::error::Result;
use tagdeploy::logging::{self, LogSettings};
use tagdeploy::process::ProcessRunner;
use tagdeploy::report::{Notifier, Reporter};
use tagdeploy::trigger::{self, TriggerOutcome};
use tagdeploy::types::RepositoryUrl;
use tagdeploy::vcs::SvnClient;

/// Handle one post-commit hook call.
pub async fn post_commit(config_path: &Path, verbosity: u8, repos: &str, revision: u64) -> ExitCode {
    let settings = match load_settings(config_path, verbosity) {
        Ok(settings) => settings,
        Err(e) => {
            logging::init(&LogSettings::terminal_only(verbosity));
            return Reporter::default().fail(&e).await;
        }
    };
    logging::init(&settings.log);

    let notifier = match Notifier::from_config(&settings.notify, revision) {
        Ok(notifier) => notifier,
        Err(e) => {
            tracing::warn!("Failure notification disabled: {}", e);
            None
        }
    };
    let reporter = Reporter::new(notifier);

    let repository = RepositoryUrl::from_hook_arg(repos);
    let vcs = SvnClient::new(&settings.svn, ProcessRunner);
    let dispatcher = Dispatcher::new(
        settings.dispatch.clone(),
        settings.deploy_command.display().to_string(),
        settings.deploy_args.clone(),
        ProcessRunner,
    );

    match trigger::handle(&settings, &repository, revision, &vcs, &dispatcher).await {
        Ok(TriggerOutcome::Deployed { tag, .. }) => {
            tracing::debug!("Revision {} deployed as tag {}", revision, tag);
            ExitCode::SUCCESS
        }
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => reporter.fail(&e).await,
    }
}

fn load_settings(config_path: &Path, verbosity: u8) -> Result<TriggerSettings> {
    let config = Config::load_or_default(config_path)?;
    TriggerSettings::resolve(&config, verbosity)
}
