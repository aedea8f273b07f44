use hko_yesterday::{HkoError, HkoYesterday};
use log::info;

#[tokio::main]
async fn main() -> Result<(), HkoError> {
    // Set RUST_LOG=info (or debug) to see the pipeline milestones.
    env_logger::init();

    let client = HkoYesterday::builder().build()?;
    match client.run().await {
        Ok(report) => {
            if report.skipped_rows > 0 {
                info!("{} rows were skipped for unparseable times", report.skipped_rows);
            }
            println!("Saved: {}", report.weather_csv.display());
            println!("Saved: {}", report.radiation_csv.display());
            println!("Saved: {}", report.merged_csv.display());
            println!("Saved: {}", report.chart.display());
            Ok(())
        }
        Err(e) => {
            eprintln!("Error: {e}");
            Err(e)
        }
    }
}
