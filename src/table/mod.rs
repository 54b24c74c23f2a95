//! Tabular catalog output
//!
//! The catalog table is a CSV file with one row per discovered item. It
//! is written in two passes:
//!
//! - `write_catalog` records the discovery result (id, link, price)
//! - `enrich_table` rewrites the file in place, appending the fields
//!   extracted from the cached detail pages
//!
//! Enrichment never fails on a single row: rows without a cached
//! document keep sentinel values and the rewrite continues.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

use crate::cache::FsCache;
use crate::catalog::Catalog;
use crate::extract::{extract_fields, ListingFields};

/// Errors raised while reading or writing the catalog table
#[derive(Error, Debug)]
pub enum TableError {
    #[error("Table I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Table format error: {0}")]
    Csv(#[from] csv::Error),
}

/// One row of the discovery table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogRow {
    pub object_id: String,
    pub link: String,
    pub price: String,
}

/// One row of the enriched table
///
/// Extends [`CatalogRow`] with the fields pulled from the cached detail
/// page. Header names follow the published table layout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EnrichedRow {
    pub object_id: String,
    pub link: String,
    pub price: String,
    #[serde(rename = "Title")]
    pub title: String,
    #[serde(rename = "Stars")]
    pub stars: String,
    #[serde(rename = "No. of reviews")]
    pub reviews: String,
    #[serde(rename = "No. of bedrooms")]
    pub bedrooms: String,
    #[serde(rename = "Size [m2]")]
    pub size: String,
    #[serde(rename = "Max people")]
    pub max_people: String,
    #[serde(rename = "Features")]
    pub features: String,
    #[serde(rename = "Latitude")]
    pub latitude: String,
    #[serde(rename = "Longitude")]
    pub longitude: String,
    #[serde(rename = "Description")]
    pub description: String,
}

impl EnrichedRow {
    fn new(row: &CatalogRow, fields: ListingFields) -> Self {
        EnrichedRow {
            object_id: row.object_id.clone(),
            link: row.link.clone(),
            price: row.price.clone(),
            title: fields.title,
            stars: fields.stars,
            reviews: fields.reviews,
            bedrooms: fields.bedrooms,
            size: fields.size,
            max_people: fields.max_people,
            features: fields.features,
            latitude: fields.latitude,
            longitude: fields.longitude,
            description: fields.description,
        }
    }
}

/// Result of an enrichment pass
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnrichSummary {
    /// Rows rewritten
    pub rows: usize,
    /// Rows without a cached document
    pub missing: usize,
}

/// Writes the discovery table
///
/// One row per catalog record, ordered by id. Items seen without a
/// price carry `N/A`.
///
/// # Arguments
///
/// * `path` - Destination CSV path
/// * `catalog` - Discovery result to record
pub fn write_catalog(path: &Path, catalog: &Catalog) -> Result<(), TableError> {
    let mut writer = csv::Writer::from_path(path)?;

    for record in catalog.records() {
        writer.serialize(CatalogRow {
            object_id: record.id.clone(),
            link: record.url.clone(),
            price: record.price_display().to_string(),
        })?;
    }

    writer.flush()?;
    Ok(())
}

/// Reads a discovery table back into rows
pub fn read_catalog(path: &Path) -> Result<Vec<CatalogRow>, TableError> {
    let mut reader = csv::Reader::from_path(path)?;
    let mut rows = Vec::new();

    for row in reader.deserialize() {
        rows.push(row?);
    }

    Ok(rows)
}

/// Rewrites the catalog table in place with extracted detail fields
///
/// Each row's cached document is loaded by object id and run through
/// the field extractor. Rows whose document is not in the cache are
/// logged and written with sentinel fields. The rewrite goes through a
/// sibling temp file so a failure cannot truncate the existing table.
///
/// # Arguments
///
/// * `path` - Catalog table to enrich
/// * `cache` - Cache holding the downloaded detail pages
pub fn enrich_table(path: &Path, cache: &FsCache) -> Result<EnrichSummary, TableError> {
    let rows = read_catalog(path)?;
    let temp_path = path.with_extension("tmp");

    // A failed rewrite must not leave its temp sibling behind
    let summary = match rewrite_rows(&temp_path, &rows, cache) {
        Ok(summary) => summary,
        Err(error) => {
            let _ = fs::remove_file(&temp_path);
            return Err(error);
        }
    };

    if let Err(error) = fs::rename(&temp_path, path) {
        let _ = fs::remove_file(&temp_path);
        return Err(error.into());
    }

    Ok(summary)
}

fn rewrite_rows(
    temp_path: &Path,
    rows: &[CatalogRow],
    cache: &FsCache,
) -> Result<EnrichSummary, TableError> {
    let mut writer = csv::Writer::from_path(temp_path)?;
    let mut missing = 0;

    for row in rows {
        let fields = match cache.load(&row.object_id) {
            Ok(html) => extract_fields(&html),
            Err(error) => {
                warn!(id = %row.object_id, error = %error, "No cached document for row");
                missing += 1;
                ListingFields::default()
            }
        };

        writer.serialize(EnrichedRow::new(row, fields))?;
    }

    writer.flush()?;

    Ok(EnrichSummary {
        rows: rows.len(),
        missing,
    })
}
