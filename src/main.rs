use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use log::info;

use dust_emissivities::data::loader::load_opacity;
use dust_emissivities::plot::save_heatmap;
use dust_emissivities::{Emissivities, LteConfig, OpacityModel, TableSet};

#[derive(Parser, Debug)]
#[command(name = "dust-emissivities", about = "Compute and inspect LTE dust emissivity tables")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Compute LTE emissivities from an opacity table and write a table set.
    Compute {
        /// Opacity table (.parquet, .json or .csv) with `nu` and `kappa`.
        #[arg(long)]
        opacity: PathBuf,

        /// Output table-set directory.
        #[arg(long)]
        output: PathBuf,

        /// JSON file with `n_temp`, `temp_min`, `temp_max`.
        #[arg(long)]
        config: Option<PathBuf>,

        #[arg(long)]
        n_temp: Option<usize>,

        #[arg(long)]
        temp_min: Option<f64>,

        #[arg(long)]
        temp_max: Option<f64>,

        /// Also write a PNG heatmap of the normalized table.
        #[arg(long)]
        plot: Option<PathBuf>,
    },

    /// Print the dimensions and fingerprint of a stored table set.
    Inspect {
        /// Table-set directory written by `compute`.
        dir: PathBuf,

        /// Write a PNG heatmap.
        #[arg(long)]
        plot: Option<PathBuf>,
    },
}

const PLOT_WIDTH: u32 = 800;
const PLOT_HEIGHT: u32 = 600;

fn main() -> Result<()> {
    env_logger::init();

    match Cli::parse().command {
        Command::Compute {
            opacity,
            output,
            config,
            n_temp,
            temp_min,
            temp_max,
            plot,
        } => {
            let mut lte = match &config {
                Some(path) => LteConfig::from_json_file(path)?,
                None => LteConfig::default(),
            };
            if let Some(n) = n_temp {
                lte.n_temp = n;
            }
            if let Some(t) = temp_min {
                lte.temp_min = t;
            }
            if let Some(t) = temp_max {
                lte.temp_max = t;
            }
            lte.validate()?;

            let model = load_opacity(&opacity)?;
            info!("Loaded opacity table with {} frequencies", model.nu().len());

            let mut emissivities = Emissivities::new();
            emissivities
                .set_lte_with(&model, &lte)
                .context("computing LTE emissivities")?;

            let mut table_set = TableSet::new();
            emissivities.to_table_set(&mut table_set)?;
            table_set.write_dir(&output)?;
            info!("Wrote table set to {}", output.display());

            println!("{}", emissivities.hash()?);

            if let Some(path) = plot {
                save_heatmap(&emissivities, &path, PLOT_WIDTH, PLOT_HEIGHT)?;
            }
        }
        Command::Inspect { dir, plot } => {
            let table_set = TableSet::read_dir(&dir)?;
            let emissivities = Emissivities::from_table_set(&table_set)
                .with_context(|| format!("decoding emissivities in {}", dir.display()))?;

            let n_nu = emissivities.nu().map_or(0, |nu| nu.len());
            let n_var = emissivities.var().map_or(0, |var| var.len());
            println!("lte:         {}", emissivities.is_lte());
            if let Some(var_name) = emissivities.var_name() {
                println!("variable:    {var_name}");
            }
            println!("frequencies: {n_nu}");
            println!("states:      {n_var}");
            println!("hash:        {}", emissivities.hash()?);

            if let Some(path) = plot {
                save_heatmap(&emissivities, &path, PLOT_WIDTH, PLOT_HEIGHT)?;
            }
        }
    }

    Ok(())
}
