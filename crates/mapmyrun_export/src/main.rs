use anyhow::Context;
use clap::Parser;
use mapmyrun_client::config::Config;
use mapmyrun_client::http_client::ReqwestMapMyRunClient;
use mapmyrun_export::cli::Cli;
use mapmyrun_export::{ExportOptions, logging, run_export};

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    logging::init_logging(cli.verbose, cli.quiet);

    // Flags may repair an env-only range, so validation happens in `apply`.
    let cfg = Config::read_env().and_then(|cfg| cli.apply(cfg));
    let cfg = match cfg {
        Ok(cfg) => cfg,
        Err(e) => {
            tracing::error!(%e, "missing or invalid configuration; aborting");
            return Err(e).context("loading configuration");
        }
    };

    let client = ReqwestMapMyRunClient::from_config(&cfg).context("building http client")?;
    let options = ExportOptions::from(&cfg);

    let summary = run_export(&client, &options).await.inspect_err(|e| {
        tracing::error!(%e, "export aborted");
    })?;

    println!("{}", serde_json::to_string(&summary)?);
    Ok(())
}
