use clap::Parser;
use csgeo::{
    console::{create_intro, Args, PartialArgs},
    error::CsgResult,
    raster::rasterize,
};
use log::info;
use std::time::Instant;

fn main() -> CsgResult<()> {
    env_logger::init();
    //parse CLI arguments
    let args = Args::try_from(PartialArgs::parse())?;
    print!("{}", create_intro());

    //build the selected geometry
    let start = Instant::now();
    let geo = args.geometry.build()?;
    info!("geometry '{}' built in {:?}", args.geometry, start.elapsed());
    if args.describe {
        println!("{geo}");
        return Ok(());
    }

    //trace and save the image
    let image = rasterize(&geo, &args.image)?;
    image.save(&args.output)?;
    println!(
        "Wrote {}x{} image of geometry '{}' to {}",
        image.width(),
        image.height(),
        args.geometry,
        args.output.display()
    );
    Ok(())
}
