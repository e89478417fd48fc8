use std::path::PathBuf;

use anyhow::{anyhow, bail, Context, Result};
use clap::Parser;
use nalgebra::Point3;

use room_kinematics::frame::{FrameId, Robot};
use room_kinematics::parameters::RoomParameters;
use room_kinematics::room::TreatmentRoom;
use room_kinematics::utils::{format_matrix, format_point, format_pose, rotation_degrees};

/// Transforms between frames of the treatment room for given joint values.
#[derive(Parser, Debug)]
#[command(name = "room-kinematics", version)]
struct Args {
    /// Room geometry YAML file. The built-in Cabin 26A geometry is used if not given.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Table joint values A1..A6 in degrees, comma separated.
    #[arg(long, value_delimiter = ',', allow_hyphen_values = true)]
    table: Vec<f64>,

    /// C-arm joint values in degrees, comma separated.
    #[arg(long, value_delimiter = ',', allow_hyphen_values = true)]
    carm: Vec<f64>,

    /// Source frame.
    #[arg(long, default_value = "TableTop")]
    from: String,

    /// Target frame.
    #[arg(long, default_value = "FixedReference")]
    to: String,

    /// Point in the source frame to map into the target frame, as x,y,z.
    #[arg(long, value_delimiter = ',', allow_hyphen_values = true)]
    point: Option<Vec<f64>>,

    /// Use beam mode composition instead of the static model pose.
    #[arg(long)]
    beam: bool,

    /// Print every edge transform of the room.
    #[arg(long)]
    dump: bool,
}

fn frame(name: &str) -> Result<FrameId> {
    FrameId::from_name(name).ok_or_else(|| anyhow!("Unknown frame '{}'", name))
}

fn main() -> Result<()> {
    let args = Args::parse();

    let parameters = match &args.config {
        Some(path) => RoomParameters::from_yaml_file(path)
            .with_context(|| format!("Cannot read room geometry from {}", path.display()))?,
        None => RoomParameters::cabin26a(),
    };
    let mut room = TreatmentRoom::new(parameters)?;

    for (robot, values) in [(Robot::Table, &args.table), (Robot::CArm, &args.carm)] {
        let applied = room.set_joint_values(robot, values)?;
        for (given, used) in values.iter().zip(&applied) {
            if given != used {
                println!("{} joint value {} clamped to {}", robot, given, used);
            }
        }
        room.update_all(robot)?;
    }

    let from = frame(&args.from)?;
    let to = frame(&args.to)?;
    let pose = if args.beam {
        room.beam_pose(from, to)?
    } else {
        room.frame_transform(from, to)?
    };
    println!("{} -> {}:", from, to);
    print!("{}", format_matrix(&pose));
    println!("  {}", format_pose(&pose));
    let [roll, pitch, yaw] = rotation_degrees(&pose);
    println!("  roll: {:.4}, pitch: {:.4}, yaw: {:.4} deg", roll, pitch, yaw);

    if let Some(coordinates) = &args.point {
        if coordinates.len() != 3 {
            bail!("Point needs 3 coordinates, {} given", coordinates.len());
        }
        let point = Point3::new(coordinates[0], coordinates[1], coordinates[2]);
        let mapped = room.transform_point(&point, from, to)?;
        println!("{} in {} is {} in {}", format_point(&point), from, format_point(&mapped), to);
    }

    if args.dump {
        print!("{}", room);
    }
    Ok(())
}
