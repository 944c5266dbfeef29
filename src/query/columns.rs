use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use thiserror::Error;

// ---------------------------------------------------------------------------
// ColumnSpec – insertion-ordered alias → column mapping
// ---------------------------------------------------------------------------

/// The five HSC broadband filters, in survey order.
pub const BANDS: [&str; 5] = ["g", "r", "i", "z", "y"];

/// An ordered mapping from output alias to fully-qualified column name.
///
/// Iteration order is insertion order, which fixes the column order of the
/// rendered `SELECT` clause. Re-inserting an existing alias overwrites the
/// column in place and keeps its original position.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnSpec {
    entries: Vec<(String, String)>,
}

impl ColumnSpec {
    pub fn new() -> Self {
        Self::default()
    }

    /// Map `alias` to `column`. Last write wins on a repeated alias.
    pub fn insert(&mut self, alias: impl Into<String>, column: impl Into<String>) {
        let alias = alias.into();
        let column = column.into();
        match self.entries.iter_mut().find(|(a, _)| *a == alias) {
            Some((_, c)) => *c = column,
            None => self.entries.push((alias, column)),
        }
    }

    /// Union another spec into this one. Collisions silently overwrite,
    /// matching plain dictionary-update semantics.
    pub fn merge(&mut self, other: ColumnSpec) {
        for (alias, column) in other.entries {
            self.insert(alias, column);
        }
    }

    /// Look up the source column for an alias.
    pub fn get(&self, alias: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(a, _)| a == alias)
            .map(|(_, c)| c.as_str())
    }

    pub fn contains(&self, alias: &str) -> bool {
        self.get(alias).is_some()
    }

    /// Iterate `(alias, column)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(a, c)| (a.as_str(), c.as_str()))
    }

    /// Iterate aliases in insertion order.
    pub fn aliases(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(a, _)| a.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Serializes as a JSON object whose key order is the insertion order.
impl Serialize for ColumnSpec {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (alias, column) in &self.entries {
            map.serialize_entry(alias, column)?;
        }
        map.end()
    }
}

// ---------------------------------------------------------------------------
// PhotometrySelection – which measurement blocks to include
// ---------------------------------------------------------------------------

/// Which photometry blocks go into the column mapping.
///
/// `flux` switches every enabled block between flux-space and
/// magnitude-space measurement columns; `aper_type` is the matched-aperture
/// token embedded into the `forced4` column names (e.g. `"3_20"` for a
/// 1.5-arcsec target seeing). The token is passed through unvalidated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhotometrySelection {
    pub psf: bool,
    pub cmodel: bool,
    pub aper: bool,
    pub shape: bool,
    pub flux: bool,
    pub aper_type: String,
}

impl Default for PhotometrySelection {
    fn default() -> Self {
        Self {
            psf: true,
            cmodel: true,
            aper: false,
            shape: false,
            flux: false,
            aper_type: "3_20".to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum QueryError {
    /// The rerun name does not belong to a supported data release.
    #[error("unsupported rerun name: {0}")]
    UnsupportedRerun(String),
}

// ---------------------------------------------------------------------------
// basic_forced_photometry – assemble the full mapping
// ---------------------------------------------------------------------------

/// Build the alias → column mapping for basic forced photometry.
///
/// The identity block (object id, coordinates, tract/patch, per-band
/// extinction) and the pixel-quality block are always present; the
/// measurement blocks follow the [`PhotometrySelection`]. Only the PDR2
/// rerun family is supported; any other rerun name is rejected outright.
pub fn basic_forced_photometry(
    rerun: &str,
    selection: &PhotometrySelection,
) -> Result<ColumnSpec, QueryError> {
    if !rerun.contains("pdr2") {
        return Err(QueryError::UnsupportedRerun(rerun.to_string()));
    }

    let mut spec = identity_block();
    if selection.cmodel {
        spec.merge(cmodel_block(selection.flux));
    }
    if selection.psf {
        spec.merge(psf_block(selection.flux));
    }
    if selection.aper {
        spec.merge(aper_block(selection.flux, &selection.aper_type));
    }
    if selection.shape {
        spec.merge(shape_block());
    }
    spec.merge(pixel_quality_block());

    Ok(spec)
}

// ---------------------------------------------------------------------------
// Per-block builders (PDR2 naming scheme)
// ---------------------------------------------------------------------------

/// Object id, sky position, tract/patch, and per-band galactic extinction.
fn identity_block() -> ColumnSpec {
    let mut spec = ColumnSpec::new();
    spec.insert("object_id", "forced.object_id");
    spec.insert("ra", "forced.ra");
    spec.insert("dec", "forced.dec");
    spec.insert("tract", "forced.tract");
    spec.insert("patch", "forced.patch");
    for band in BANDS {
        spec.insert(format!("a_{band}"), format!("forced.a_{band}"));
    }
    spec
}

/// CModel photometry from the `forced` table.
fn cmodel_block(flux: bool) -> ColumnSpec {
    let mut spec = ColumnSpec::new();
    if flux {
        for band in BANDS {
            spec.insert(
                format!("{band}_cmodel_flux"),
                format!("forced.{band}_cmodel_flux"),
            );
        }
    } else {
        for band in BANDS {
            spec.insert(
                format!("{band}_cmodel_mag"),
                format!("forced.{band}_cmodel_mag"),
            );
        }
    }
    // The archive only publishes the flux-space uncertainty for cmodel, so
    // the error alias stays `flux_err` even in magnitude mode.
    for band in BANDS {
        spec.insert(
            format!("{band}_cmodel_flux_err"),
            format!("forced.{band}_cmodel_fluxsigma"),
        );
    }
    for band in BANDS {
        spec.insert(
            format!("{band}_cmodel_flag"),
            format!("forced.{band}_cmodel_flag"),
        );
    }
    spec
}

/// PSF photometry from the `forced2` table.
fn psf_block(flux: bool) -> ColumnSpec {
    let mut spec = ColumnSpec::new();
    if flux {
        for band in BANDS {
            spec.insert(
                format!("{band}_psf_flux"),
                format!("forced2.{band}_psfflux_flux"),
            );
        }
        for band in BANDS {
            spec.insert(
                format!("{band}_psf_flux_err"),
                format!("forced2.{band}_psfflux_fluxsigma"),
            );
        }
    } else {
        for band in BANDS {
            spec.insert(
                format!("{band}_psf_mag"),
                format!("forced2.{band}_psfflux_mag"),
            );
        }
        for band in BANDS {
            spec.insert(
                format!("{band}_psf_mag_err"),
                format!("forced2.{band}_psfflux_magsigma"),
            );
        }
    }
    for band in BANDS {
        spec.insert(
            format!("{band}_psf_flag"),
            format!("forced2.{band}_psfflux_flag"),
        );
    }
    spec
}

/// Matched-aperture photometry from the `forced4` table.
///
/// `aper_type` selects the target-seeing/radius combination embedded in the
/// column names.
fn aper_block(flux: bool, aper_type: &str) -> ColumnSpec {
    let mut spec = ColumnSpec::new();
    if flux {
        for band in BANDS {
            spec.insert(
                format!("{band}_aper_flux"),
                format!("forced4.{band}_convolvedflux_{aper_type}_flux"),
            );
        }
        for band in BANDS {
            spec.insert(
                format!("{band}_aper_flux_err"),
                format!("forced4.{band}_convolvedflux_{aper_type}_fluxsigma"),
            );
        }
    } else {
        for band in BANDS {
            spec.insert(
                format!("{band}_aper_mag"),
                format!("forced4.{band}_convolvedmag_{aper_type}_mag"),
            );
        }
        for band in BANDS {
            spec.insert(
                format!("{band}_aper_mag_err"),
                format!("forced4.{band}_convolvedmag_{aper_type}_magsigma"),
            );
        }
    }
    for band in BANDS {
        spec.insert(
            format!("{band}_aper_flag"),
            format!("forced4.{band}_convolvedflux_{aper_type}_flag"),
        );
    }
    spec
}

/// Second-moment shapes from the `forced2` table, band-major order.
fn shape_block() -> ColumnSpec {
    let mut spec = ColumnSpec::new();
    for band in BANDS {
        for moment in ["11", "22", "12"] {
            spec.insert(
                format!("{band}_sdssshape_{moment}"),
                format!("forced2.{band}_sdssshape_shape{moment}"),
            );
        }
    }
    spec
}

/// Pixel-quality flags, input counts, and extendedness. Always included.
fn pixel_quality_block() -> ColumnSpec {
    let mut spec = ColumnSpec::new();
    spec.insert("merge_peak_sky", "forced.merge_peak_sky");
    for band in BANDS {
        spec.insert(
            format!("{band}_inputcount"),
            format!("forced.{band}_inputcount_value"),
        );
    }
    for (alias_suffix, source_suffix) in [
        ("edge", "edge"),
        ("saturated", "saturated"),
        ("interpolated", "interpolated"),
        ("saturated_cen", "saturatedcenter"),
        ("interpolated_cen", "interpolatedcenter"),
    ] {
        for band in BANDS {
            spec.insert(
                format!("{band}_flag_{alias_suffix}"),
                format!("forced.{band}_pixelflags_{source_suffix}"),
            );
        }
    }
    // The archive view serves extendedness without a table prefix.
    for band in BANDS {
        spec.insert(
            format!("{band}_extendedness"),
            format!("{band}_extendedness_value"),
        );
    }
    spec
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
