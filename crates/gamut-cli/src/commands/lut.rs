//! LUT dump command

use crate::LutArgs;
use anyhow::{Context, Result};
use gamut_map::{CurveLut, MapperConfig};
use std::io::{BufWriter, Write};

pub fn run(args: LutArgs, config: MapperConfig, verbose: u8) -> Result<()> {
    let mapper = super::build_mapper(config)?;
    let lut = if args.three_d {
        mapper.export_lut_3d(args.size)?
    } else {
        mapper.export_curve_lut(args.size)?
    };

    match &args.output {
        Some(path) => {
            let file = std::fs::File::create(path)
                .with_context(|| format!("Failed to create: {}", path.display()))?;
            write_triples(&lut, BufWriter::new(file))
                .with_context(|| format!("Failed to write: {}", path.display()))?;
            if verbose > 0 {
                println!("Wrote {} entries to {}", lut.entries.len(), path.display());
            }
        }
        None => write_triples(&lut, BufWriter::new(std::io::stdout().lock()))?,
    }
    Ok(())
}

/// Writes a commented header and one triple per line.
fn write_triples<W: Write>(lut: &CurveLut, mut out: W) -> std::io::Result<()> {
    let kind = if lut.is_3d() { "3d" } else { "1d" };
    writeln!(out, "# {}", lut.title)?;
    writeln!(out, "# {kind} size {} domain [{}, {}]", lut.size, lut.domain_min, lut.domain_max)?;
    writeln!(
        out,
        "# input shaper log2 pivot {} stops [{}, {}]",
        lut.shaper.pivot, lut.shaper.min_exposure, lut.shaper.max_exposure
    )?;
    for e in &lut.entries {
        writeln!(out, "{:.6} {:.6} {:.6}", e[0], e[1], e[2])?;
    }
    out.flush()
}

#[cfg(test)]
mod tests {
    use super::*;
    use gamut_map::GamutMapper;

    #[test]
    fn test_write_triples() {
        let mapper = GamutMapper::new(MapperConfig::default()).unwrap();
        let lut = mapper.export_curve_lut(4).unwrap();
        let mut buf = Vec::new();
        write_triples(&lut, &mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3 + 4);
        assert_eq!(lines[3], "0.000000 0.000000 0.000000");
        assert_eq!(lines[6], "1.000000 1.000000 1.000000");
    }
}
