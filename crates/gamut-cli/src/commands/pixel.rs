//! Single-pixel mapping command

use crate::PixelArgs;
use anyhow::Result;
use gamut_map::MapperConfig;

pub fn run(args: PixelArgs, config: MapperConfig, verbose: u8) -> Result<()> {
    let mapper = super::build_mapper(config)?;
    let input = [args.r, args.g, args.b];
    let out = mapper.map_pixel(input, args.exposure)?;

    if verbose > 0 {
        println!(
            "in  {:.6} {:.6} {:.6}  @ {:+} stops ({:?}, compression {})",
            input[0],
            input[1],
            input[2],
            args.exposure,
            mapper.config().mode,
            if mapper.config().compression { "on" } else { "off" }
        );
    }
    println!("{:.6} {:.6} {:.6}", out[0], out[1], out[2]);
    Ok(())
}
