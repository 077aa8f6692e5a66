//! Curve inspection command

use crate::CurveArgs;
use anyhow::Result;
use gamut_curve::Segment;
use gamut_map::MapperConfig;
use tracing::debug;

pub fn run(args: CurveArgs, config: MapperConfig, verbose: u8) -> Result<()> {
    let mapper = super::build_mapper(config)?;
    let points = mapper.control_points()?;
    let table = mapper.sample_table()?;
    let curve = &mapper.config().curve;

    println!(
        "slope {}  grey ({}, {})  exposure [{}, {}] stops",
        curve.slope, curve.mid_grey.x, curve.mid_grey.y, curve.min_exposure, curve.max_exposure
    );
    for (i, p) in points.points().iter().enumerate() {
        println!("P{i}  x={:<12.6} y={:.6}", p.x, p.y);
    }

    if verbose > 0 {
        for segment in Segment::ALL {
            let range = table.segment_range(segment);
            println!("{:<9} samples {}..{}", segment.name(), range.start, range.end);
        }
        println!(
            "compression threshold {:.6}",
            gamut_map::compression_threshold(curve)?
        );
    }

    if args.samples > 0 {
        let n = table.len();
        let rows = args.samples.min(n);
        println!("{:>6} {:>14} {:>10} {:>10}", "index", "x", "t", "y");
        for k in 0..rows {
            let i = if rows == 1 { 0 } else { k * (n - 1) / (rows - 1) };
            if let Some((x, t, y)) = table.sample(i) {
                println!("{i:>6} {x:>14.6} {t:>10.6} {y:>10.6}");
            }
        }
    }

    debug!(samples = table.len(), "curve inspected");
    Ok(())
}
