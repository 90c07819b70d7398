// ABOUTME: build-tag command implementation.
// ABOUTME: Resolves executor settings and runs one locked deployment.

use std::path::Path;
use std::process::ExitCode;
use tagdeploy::config::{Config, ExecutorSettings, install_root};
use tagdeploy::deploy::{self, DeployReport};
use tagdeploy::error::Result;
use tagdeploy::logging::{self, LogSettings};
use tagdeploy::process::ProcessRunner;
use tagdeploy::report::Reporter;
use tagdeploy::types::TagName;
use tagdeploy::vcs::SvnClient;

/// Deploy `tag` on this host.
pub async fn build_tag(config_path: &Path, verbosity: u8, tag: TagName) -> ExitCode {
    let reporter = Reporter::default();

    let settings = match load_settings(config_path, verbosity) {
        Ok(settings) => settings,
        Err(e) => {
            logging::init(&LogSettings::terminal_only(verbosity));
            return reporter.fail(&e).await;
        }
    };
    logging::init(&settings.log);

    match deploy_tag(&settings, tag).await {
        Ok(report) => {
            tracing::info!(
                "Tag {} deployed in {:.1}s",
                report.tag,
                report.elapsed_secs()
            );
            ExitCode::SUCCESS
        }
        Err(e) => reporter.fail(&e).await,
    }
}

fn load_settings(config_path: &Path, verbosity: u8) -> Result<ExecutorSettings> {
    let config = Config::load(config_path)?;
    ExecutorSettings::resolve(&config, &install_root()?, verbosity)
}

async fn deploy_tag(settings: &ExecutorSettings, tag: TagName) -> Result<DeployReport> {
    settings.check_runtime()?;

    let vcs = SvnClient::new(&settings.svn, ProcessRunner);
    Ok(deploy::run(settings, tag, &vcs, &ProcessRunner).await?)
}
