use circlefit::{fit_report, FitMethod, RansacConfig, RefineConfig};
use std::error::Error;

fn main() -> Result<(), Box<dyn Error>> {
    let args: Vec<String> = std::env::args().collect();
    if args.len() < 2 {
        eprintln!("Usage: {} <points.json> [out.json]", args[0]);
        std::process::exit(2);
    }

    let text = std::fs::read_to_string(&args[1])?;
    let points: Vec<[f64; 2]> = serde_json::from_str(&text)?;

    let report = fit_report(
        &points,
        FitMethod::Geometric,
        &RansacConfig::default(),
        &RefineConfig::default(),
    )?;

    println!(
        "Fitted circle: center=({:.4}, {:.4}) r={:.4} over {} points (rms={:.4})",
        report.circle.cx, report.circle.cy, report.circle.r, report.n_points, report.rms_residual
    );

    if let Some(out_path) = args.get(2) {
        let json = serde_json::to_string_pretty(&report)?;
        std::fs::write(out_path, json)?;
        println!("Wrote {out_path}");
    }
    Ok(())
}
