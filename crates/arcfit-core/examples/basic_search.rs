use arcfit_core::{run_search, ArcSpec, RigLengths, SearchParams};
use std::error::Error;

fn main() -> Result<(), Box<dyn Error>> {
    let args: Vec<String> = std::env::args().collect();
    if args.len() < 4 {
        eprintln!(
            "Usage: {} <radius> <central_angle_deg> <tolerance> [out.json]",
            args[0]
        );
        std::process::exit(2);
    }

    let radius: f64 = args[1].parse()?;
    let central_angle_deg: f64 = args[2].parse()?;
    let tolerance: f64 = args[3].parse()?;

    let arc = ArcSpec::new(radius, central_angle_deg);
    let params = SearchParams {
        tolerance,
        ..SearchParams::default()
    };
    let result = run_search(&arc, &params);

    let n_accepted = result.attempts.iter().filter(|a| a.accepted).count();
    println!(
        "Evaluated {} attempts ({} accepted).",
        result.attempts.len(),
        n_accepted
    );

    match &result.best {
        Some(best) => {
            let rig = RigLengths::derive(&arc, &best.ellipse());
            println!(
                "Best ellipse: a={:.4} b={:.4} h={:.4} (max error {:.6})",
                best.a, best.b, best.h, best.max_error
            );
            println!(
                "Rig lengths:  L1={:.4} L2={:.4} L3={:.4}",
                rig.l1, rig.l2, rig.l3
            );
        }
        None => println!("No candidate stayed within tolerance."),
    }

    if let Some(out_path) = args.get(4) {
        let json = serde_json::to_string_pretty(&result)?;
        std::fs::write(out_path, json)?;
        println!("Wrote {out_path}");
    }
    Ok(())
}
