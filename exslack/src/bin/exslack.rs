use clap::Parser;
use exslack::{
    cli::Cli,
    config::{
        self,
        Config,
    },
    logfile::{
        LogFile,
        Rotation,
    },
    notifier::WebhookNotifier,
    sink::AppSink,
};
use exsrun::{
    executor::CommandExecutor,
    runtime::Builder,
};

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let args = Cli::parse();
    stderrlog::new()
        .module(module_path!())
        .module("exsjob")
        .module("exsrun")
        .verbosity((args.verbose as usize) + 1)
        .timestamp(stderrlog::Timestamp::Second)
        .init()?;

    let config_path = match &args.config {
        Some(path) => path.clone(),
        None => config::default_path()?,
    };
    let config = Config::load(&config_path)?;

    let mut log_file = match (&args.logfile, &config.log_dir) {
        (Some(path), _) => Some(LogFile::append(path)?),
        (None, Some(dir)) => Some(LogFile::rotating(dir, Rotation::from(&config))?),
        (None, None) => None,
    };
    if let Some(log_file) = &log_file {
        log::debug!("logging command output to {}", log_file.path().display());
    }

    let jobs = args.load_jobs_logged(log_file.as_mut())?;

    let sink = AppSink::new(WebhookNotifier::from(&config), log_file);
    let runtime = Builder::from(CommandExecutor::new(sink.captures_output()))
        .cpus(args.cpus)
        .concurrent(args.conc)
        .build()?;
    let completed = runtime.run(jobs, &sink)?;
    log::debug!("{} job(s) reported", completed.len());
    Ok(())
}
