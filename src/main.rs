//! Capillary Sim entry point
//!
//! Usage: `capillary-sim [settings.json]`
//!
//! Runs one batch with the given settings (defaults when omitted), writes the
//! result file and logs the batch report. Set `RUST_LOG=info` to see progress.

use capillary_sim::{BatchDriver, Scene, SimError, SimSettings};

fn main() -> Result<(), SimError> {
    env_logger::init();
    log::info!("Capillary Sim starting...");

    let settings = match std::env::args().nth(1) {
        Some(path) => SimSettings::load(path)?,
        None => {
            log::info!("No settings file given, using defaults");
            SimSettings::default()
        }
    };
    settings.validate()?;

    let scene = Scene::from_config(&settings.geometry)?;
    let report = BatchDriver::new(&scene, &settings).run()?;

    println!(
        "{} of {} trajectories recorded to {}",
        report.recorded,
        report.requested,
        settings.output.display()
    );
    if let Some(summary) = report.summary {
        println!(
            "{}: mean {:.4}, std dev {:.4}",
            settings.record.as_str(),
            summary.mean,
            summary.std_dev
        );
    }
    Ok(())
}
