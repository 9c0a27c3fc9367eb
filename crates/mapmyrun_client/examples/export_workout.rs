use mapmyrun_client::{MapMyRunClient, config::Config, http_client::ReqwestMapMyRunClient};
use std::path::PathBuf;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cfg = Config::from_env()?;

    let workout_id = std::env::args()
        .nth(1)
        .or_else(|| std::env::var("MAPMYRUN_WORKOUT_ID").ok());

    let Some(workout_id) = workout_id else {
        eprintln!("usage: cargo run -p mapmyrun_client --example export_workout -- <workout_id>");
        eprintln!("or set MAPMYRUN_WORKOUT_ID");
        return Ok(());
    };

    let output_path = std::env::var("MAPMYRUN_OUTPUT")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(format!("workout-{workout_id}.tcx")));

    let client = ReqwestMapMyRunClient::from_config(&cfg)?;

    let bytes = client
        .export_workout_tcx(&workout_id, &output_path)
        .await
        .map_err(|e| format!("export failed: {e}"))?;

    println!(
        "Saved workout {workout_id} ({bytes} bytes) to {}",
        output_path.display()
    );
    Ok(())
}
