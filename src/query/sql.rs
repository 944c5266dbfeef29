use serde::{Deserialize, Serialize};

use super::columns::{basic_forced_photometry, ColumnSpec, PhotometrySelection, QueryError};

// ---------------------------------------------------------------------------
// SELECT clause rendering
// ---------------------------------------------------------------------------

/// Render a [`ColumnSpec`] into a `SELECT` clause fragment.
///
/// Each entry becomes `"<column> AS <alias>"`, joined by `", "`; the
/// `SELECT ` keyword is prepended when `select` is true. Column order is
/// the insertion order of the mapping.
pub fn select_clause(columns: &ColumnSpec, select: bool) -> String {
    let fragment = columns
        .iter()
        .map(|(alias, column)| format!("{column} AS {alias}"))
        .collect::<Vec<_>>()
        .join(", ");
    if select {
        format!("SELECT {fragment}")
    } else {
        fragment
    }
}

// ---------------------------------------------------------------------------
// Schema-help templates
// ---------------------------------------------------------------------------

/// SQL that lists every schema object matching a keyword.
pub fn help_basic(keyword: &str) -> String {
    format!("SELECT * FROM help('{keyword}');")
}

/// SQL that describes a single table of a rerun.
pub fn table_schema(rerun: &str, table: &str) -> String {
    format!("SELECT * FROM help('{rerun}.{table}');")
}

/// SQL that lists the columns of a rerun whose name contains a keyword.
pub fn columns_contain(rerun: &str, keyword: &str) -> String {
    format!("SELECT * FROM help('{rerun}.%{keyword}%');")
}

/// SQL that finds the coadded patches covering a sky position (degrees).
pub fn patch_contain(rerun: &str, ra: f64, dec: f64) -> String {
    format!(
        "--- Find coadded patch images\n\
         SELECT\n\
         \x20   mosaic.tract,\n\
         \x20   mosaic.patch,\n\
         \x20   mosaic.filter01\n\
         FROM\n\
         \x20   {rerun}.mosaic JOIN public.skymap USING (skymap_id)\n\
         WHERE\n\
         \x20   patch_contains(patch_area, wcs, {ra}, {dec})\n\
         ;"
    )
}

// ---------------------------------------------------------------------------
// Archive context + search templates
// ---------------------------------------------------------------------------

/// The archive context the query builders read: which data release and
/// which rerun within it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Archive {
    pub dr: String,
    pub rerun: String,
}

impl Default for Archive {
    fn default() -> Self {
        Self {
            dr: "pdr2".to_string(),
            rerun: "pdr2_wide".to_string(),
        }
    }
}

/// Selection fragment for a rectangular sky search against the forced table.
///
/// Only the `SELECT` part is assembled so far.
/// TODO: append the `boxSearch(coord, ...)` WHERE clause once the primary /
/// clean-sample cuts are agreed with the archive side.
pub fn box_search_template(
    archive: &Archive,
    selection: &PhotometrySelection,
) -> Result<String, QueryError> {
    let columns = basic_forced_photometry(&archive.rerun, selection)?;
    Ok(select_clause(&columns, true))
}

/// Selection fragment for a cone (point + radius) search.
///
/// Same state as [`box_search_template`]: the WHERE clause is still pending.
pub fn cone_search_template(
    archive: &Archive,
    selection: &PhotometrySelection,
) -> Result<String, QueryError> {
    let columns = basic_forced_photometry(&archive.rerun, selection)?;
    Ok(select_clause(&columns, true))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn select_clause_single_entry() {
        let mut spec = ColumnSpec::new();
        spec.insert("a", "x.y");
        assert_eq!(select_clause(&spec, true), "SELECT x.y AS a");
        assert_eq!(select_clause(&spec, false), "x.y AS a");
    }

    #[test]
    fn select_clause_preserves_order() {
        let mut spec = ColumnSpec::new();
        spec.insert("ra", "forced.ra");
        spec.insert("dec", "forced.dec");
        assert_eq!(
            select_clause(&spec, false),
            "forced.ra AS ra, forced.dec AS dec"
        );
    }

    #[test]
    fn help_templates() {
        assert_eq!(help_basic("forced"), "SELECT * FROM help('forced');");
        assert_eq!(
            table_schema("pdr2_wide", "forced"),
            "SELECT * FROM help('pdr2_wide.forced');"
        );
        assert_eq!(
            columns_contain("pdr2_wide", "cmodel"),
            "SELECT * FROM help('pdr2_wide.%cmodel%');"
        );
    }

    #[test]
    fn patch_contain_embeds_position() {
        let sql = patch_contain("pdr2_wide", 150.1, 2.2);
        assert!(sql.contains("pdr2_wide.mosaic JOIN public.skymap"));
        assert!(sql.contains("patch_contains(patch_area, wcs, 150.1, 2.2)"));
    }

    #[test]
    fn search_templates_build_the_selection() {
        let archive = Archive::default();
        let sql = box_search_template(&archive, &PhotometrySelection::default()).unwrap();
        assert!(sql.starts_with("SELECT forced.object_id AS object_id, "));

        let cone = cone_search_template(&archive, &PhotometrySelection::default()).unwrap();
        assert_eq!(sql, cone);
    }

    #[test]
    fn search_templates_reject_unknown_rerun() {
        let archive = Archive {
            dr: "pdr1".to_string(),
            rerun: "pdr1_wide".to_string(),
        };
        assert!(box_search_template(&archive, &PhotometrySelection::default()).is_err());
    }
}
