use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};

use hsfm_rs::logger::{self, info, warn};
use hsfm_rs::photogrammetry::{
    AspPipeline, CameraRequest, FrameSpec, GeoPoint, Heading, PairState, PipelineConfig,
    corner_coordinates_string,
};

/// Historical aerial photogrammetry with the Ames Stereo Pipeline.
#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Args {
    /// Log at debug level and echo tool output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Log every ASP call at info level
    #[arg(long, global = true)]
    print_calls: bool,

    /// Directory containing the ASP executables (defaults to PATH lookup)
    #[arg(long, global = true)]
    asp_bin: Option<PathBuf>,

    /// Scanned pixel pitch on film, in millimetres
    #[arg(long, global = true, default_value_t = 0.02)]
    pixel_pitch: f64,

    /// Nominal flying height above ground, in metres
    #[arg(long, global = true, default_value_t = 1500.0)]
    altitude: f64,

    /// PROJ string for point2dem (defaults to UTM zone 10N)
    #[arg(long, global = true)]
    target_srs: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print the cam_gen --lon-lat-values string for one frame
    Corners {
        #[arg(long, allow_hyphen_values = true)]
        lat: f64,
        #[arg(long, allow_hyphen_values = true)]
        lon: f64,
        #[arg(long)]
        focal_length: f64,
        #[arg(long)]
        width: u32,
        #[arg(long)]
        height: u32,
        /// Degrees clockwise from north
        #[arg(long, allow_hyphen_values = true)]
        heading: f64,
    },
    /// Generate a pinhole camera for one scanned image with cam_gen
    Camera {
        image: PathBuf,
        #[arg(long)]
        reference_dem: PathBuf,
        #[arg(long, allow_hyphen_values = true)]
        lat: f64,
        #[arg(long, allow_hyphen_values = true)]
        lon: f64,
        #[arg(long)]
        focal_length: f64,
        #[arg(long, allow_hyphen_values = true)]
        heading: f64,
        #[arg(long, default_value = "cameras")]
        output_dir: PathBuf,
        /// Use these corner coordinates instead of deriving them
        #[arg(long, allow_hyphen_values = true)]
        corners: Option<String>,
    },
    /// Bundle adjust all images against their cameras
    BundleAdjust {
        image_dir: PathBuf,
        camera_dir: PathBuf,
        output_prefix: PathBuf,
    },
    /// Run stereo and gridding on every pair with a match file
    StereoPairs {
        match_dir: PathBuf,
        image_dir: PathBuf,
        camera_dir: PathBuf,
        output_dir: PathBuf,
    },
    /// Mosaic the per-pair DEMs below a stereo output directory
    Mosaic { stereo_dir: PathBuf, output: PathBuf },
    /// Align a DEM to a reference DEM and grid the result
    Align {
        input_dem: PathBuf,
        reference_dem: PathBuf,
        output_prefix: PathBuf,
    },
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    logger::init(if args.verbose { "debug" } else { "info" });

    let mut builder = PipelineConfig::builder()
        .pixel_pitch_mm(args.pixel_pitch)
        .altitude_m(args.altitude)
        .asp_bin_directory(args.asp_bin)
        .print_calls(args.print_calls)
        .verbose(args.verbose);
    if let Some(srs) = args.target_srs {
        builder = builder.target_srs(srs);
    }
    let config = builder.build();
    let pipeline = AspPipeline::new(config.clone());

    match args.command {
        Command::Corners {
            lat,
            lon,
            focal_length,
            width,
            height,
            heading,
        } => {
            let frame = FrameSpec::new(focal_length, config.pixel_pitch_mm, width, height);
            let corners = corner_coordinates_string(
                GeoPoint::new(lat, lon),
                &frame,
                Heading::from_degrees(heading)?,
                config.altitude_m,
            )?;
            println!("{corners}");
        }
        Command::Camera {
            image,
            reference_dem,
            lat,
            lon,
            focal_length,
            heading,
            output_dir,
            corners,
        } => {
            let request = CameraRequest {
                image,
                center: GeoPoint::new(lat, lon),
                heading: Heading::from_degrees(heading)?,
                focal_length_mm: focal_length,
                reference_dem,
                corner_coordinates: corners,
            };
            let camera = pipeline
                .generate_camera(&request, &output_dir)
                .with_context(|| format!("camera generation for {}", request.image.display()))?;
            println!("{}", camera.display());
        }
        Command::BundleAdjust {
            image_dir,
            camera_dir,
            output_prefix,
        } => {
            pipeline
                .bundle_adjust(&image_dir, &camera_dir, &output_prefix)
                .context("bundle adjustment")?;
        }
        Command::StereoPairs {
            match_dir,
            image_dir,
            camera_dir,
            output_dir,
        } => {
            let reports = pipeline
                .iter_stereo_pairs(&match_dir, &image_dir, &camera_dir, &output_dir)
                .context("stereo pair processing")?;
            for report in reports {
                match report.state {
                    PairState::Gridded(dem) => info!("{}: {}", report.pair.name(), dem.display()),
                    PairState::StereoFailed(reason) | PairState::GriddingFailed(reason) => {
                        warn!("{}: {}", report.pair.name(), reason)
                    }
                    other => warn!("{}: stopped in {:?}", report.pair.name(), other),
                }
            }
        }
        Command::Mosaic { stereo_dir, output } => {
            let mosaic = pipeline
                .dem_mosaic(&stereo_dir, &output)
                .context("DEM mosaic")?;
            println!("{}", mosaic.display());
        }
        Command::Align {
            input_dem,
            reference_dem,
            output_prefix,
        } => {
            let dem = pipeline
                .pc_align(&input_dem, &reference_dem, &output_prefix)
                .context("alignment")?;
            println!("{}", dem.display());
        }
    }

    Ok(())
}
