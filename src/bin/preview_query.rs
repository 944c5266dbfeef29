//! Print a ready-to-paste SELECT statement for a rerun.
//!
//! Usage:
//!   preview_query [RERUN] [--flux] [--aper] [--shape] [--no-psf] [--no-cmodel] [--json]
//!
//! With `--json` the alias → column mapping is printed instead of SQL.

use anyhow::{bail, Context, Result};
use log::info;

use hscq::query::columns::{basic_forced_photometry, PhotometrySelection};
use hscq::query::sql::select_clause;

fn main() -> Result<()> {
    env_logger::init();

    let mut rerun = "pdr2_wide".to_string();
    let mut selection = PhotometrySelection::default();
    let mut as_json = false;

    for arg in std::env::args().skip(1) {
        match arg.as_str() {
            "--flux" => selection.flux = true,
            "--aper" => selection.aper = true,
            "--shape" => selection.shape = true,
            "--no-psf" => selection.psf = false,
            "--no-cmodel" => selection.cmodel = false,
            "--json" => as_json = true,
            other if !other.starts_with('-') => rerun = other.to_string(),
            other => bail!("unknown option: {other}"),
        }
    }

    let columns = basic_forced_photometry(&rerun, &selection)
        .with_context(|| format!("building column mapping for {rerun}"))?;
    info!("{} columns selected for {rerun}", columns.len());

    if as_json {
        println!("{}", serde_json::to_string_pretty(&columns)?);
    } else {
        println!("{}", select_clause(&columns, true));
    }

    Ok(())
}
