//! `sceneryfs` — a minimal command-line front end for `scenery-vfs`. Loads a
//! scenery install from disk, resolves one virtual path against a query
//! point, and prints the result.

use std::error::Error;
use std::path::PathBuf;

use clap::Parser;
use log::info;

#[derive(Parser, Debug)]
#[command(version, about)]
struct Clap {
	/// Path to the X-Plane install root (containing `Resources/default
	/// scenery`).
	#[arg(long)]
	xp_root: PathBuf,

	/// Path to the active package (the package currently being worked on;
	/// its own asset tree is swept directly, with no manifest required).
	#[arg(long)]
	active_package: PathBuf,

	/// A custom package root. May be given multiple times; first occurrence
	/// has highest priority.
	#[arg(long = "scenery-pack")]
	scenery_packs: Vec<PathBuf>,

	/// Query latitude, in degrees.
	#[arg(long, allow_hyphen_values = true)]
	lat: f64,

	/// Query longitude, in degrees.
	#[arg(long, allow_hyphen_values = true)]
	lon: f64,

	/// Season character: 's'/'d' (summer/default), 'w' (winter), 'f' (fall),
	/// 'p' (spring). Defaults to 'd'.
	#[arg(long, default_value_t = 'd')]
	season: char,

	/// Virtual path to resolve, e.g. `lib/g10/autogen/bldg1.obj`.
	#[arg(long)]
	virtual_path: String,
}

fn main() -> Result<(), Box<dyn Error>> {
	env_logger::init();

	let args = Clap::parse();

	let vfs = scenery_vfs::load_file_system(&args.xp_root, &args.active_package, &args.scenery_packs)?;

	info!(
		"loaded {} definitions, {} regions",
		vfs.definitions().len(),
		vfs.regions().len()
	);

	match vfs.resolve(&args.virtual_path, args.lat, args.lon, args.season) {
		Some(path) => println!("{}", path.display()),
		None => {
			eprintln!("no match for {} at ({}, {})", args.virtual_path, args.lat, args.lon);
			std::process::exit(1);
		}
	}

	Ok(())
}
