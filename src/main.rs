use log::{error, info, warn};
use std::path::PathBuf;
use std::process;
use structopt::StructOpt;

use unitcell::rendering::export_projection_svg;
use unitcell::utils::{logger, report};
use unitcell::{AppState, Config, ProjectionMode, StructureType};

/// Builds a crystal unit cell and optionally projects it onto a lattice plane.
#[derive(Debug, StructOpt)]
#[structopt(name = "unitcell")]
struct Opt {
    /// Structure: simple-cubic, bcc, fcc, nacl, cscl, zns, hexagonal,
    /// fluorite, antifluorite. Defaults to the saved config.
    #[structopt(short, long)]
    structure: Option<StructureType>,

    /// Lattice parameter a in Angstroms
    #[structopt(short)]
    a: Option<f64>,

    /// Lattice parameter b (kept equal to a)
    #[structopt(short)]
    b: Option<f64>,

    /// Lattice parameter c. Sets a=b=c on cubic cells
    #[structopt(short)]
    c: Option<f64>,

    /// Miller indices of the projection plane, e.g. `--miller 1 -1 0`
    #[structopt(long, number_of_values = 3, allow_hyphen_values = true)]
    miller: Vec<i32>,

    /// Plane offset
    #[structopt(long, default_value = "0", allow_hyphen_values = true)]
    offset: i32,

    /// Atoms to project: base, sites or all
    #[structopt(long)]
    mode: Option<ProjectionMode>,

    /// Print where the plane sits and the outline it cuts in the cell
    #[structopt(long)]
    plane: bool,

    /// Show the anion/cation nested cells (ionic structures)
    #[structopt(long)]
    nested: bool,

    /// Show internal bonds (BCC, hexagonal)
    #[structopt(long)]
    internal: bool,

    /// Write the projection diagram to this SVG file
    #[structopt(long, parse(from_os_str))]
    svg: Option<PathBuf>,

    /// Size of the SVG diagram in pixels
    #[structopt(long, default_value = "800")]
    svg_size: u32,

    /// Remember structure, parameter and toggles for the next run
    #[structopt(long)]
    save_config: bool,

    /// Verbosity (-v, -vv, -vvv)
    #[structopt(short, long, parse(from_occurrences))]
    verbose: u8,
}

/// `--miller` takes exactly one triple.
fn miller_indices(values: &[i32]) -> Result<Option<[i32; 3]>, String> {
    match values {
        [] => Ok(None),
        [h, k, l] => Ok(Some([*h, *k, *l])),
        _ => Err(format!(
            "--miller expects exactly three indices h k l, got {} values",
            values.len()
        )),
    }
}

fn run(opt: Opt) -> Result<(), String> {
    let miller = miller_indices(&opt.miller)?;

    let (mut config, msg) = Config::load();
    info!("{}", msg);

    let mut state = AppState::from_config(&config);

    if let Some(structure) = opt.structure {
        state.select_structure(structure);
    }
    if let Some(a) = opt.a {
        state.set_a(a)?;
    }
    if let Some(b) = opt.b {
        state.set_b(b)?;
    }
    if let Some(c) = opt.c {
        state.set_c(c)?;
    }
    if opt.nested && !state.show_nested_cells && !state.toggle_nested_cells() {
        warn!("Nested cells only apply to ionic structures");
    }
    if opt.internal && !state.show_internal_lines && !state.toggle_internal_lines() {
        warn!("{} has no internal bonds", state.structure);
    }
    if let Some(mode) = opt.mode {
        state.set_projection_mode(mode);
    }

    print!("{}", report::cell_summary(state.geometry()));

    if let Some([h, k, l]) = miller {
        state.set_plane(h, k, l, opt.offset);
    }

    if opt.plane {
        match state.reticular_plane() {
            Some(plane) if state.show_reticular_plane() => {
                println!();
                print!("{}", report::plane_summary(&plane, &state.plane_section()));
            }
            _ => warn!("(0 0 0) is not a plane; nothing to show"),
        }
    }

    if miller.is_some() {
        match state.show_projection() {
            Some(projection) => {
                println!();
                print!("{}", report::projection_summary(projection));

                if let Some(path) = &opt.svg {
                    export_projection_svg(path, projection, &config.style, (opt.svg_size, opt.svg_size))
                        .map_err(|e| format!("Failed to write {:?}: {}", path, e))?;
                    info!("Projection written to {:?}", path);
                }
            }
            None => warn!("(0 0 0) is not a plane; nothing to project"),
        }
    } else if opt.svg.is_some() {
        warn!("--svg needs --miller h k l");
    }

    if opt.save_config {
        state.store_config(&mut config);
        info!("{}", config.save());
    }

    Ok(())
}

fn main() {
    let opt = Opt::from_args();
    let _ = logger::init(logger::level_for_verbosity(opt.verbose));

    if let Err(e) = run(opt) {
        error!("{}", e);
        process::exit(1);
    }
}
