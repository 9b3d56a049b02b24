//! Directory records and their deduplication identity.

use serde::{Deserialize, Serialize};

use crate::utils::clean;

/// Number of columns in a result row.
pub const FIELD_COUNT: usize = 8;

/// Persisted column order.
pub const COLUMNS: [&str; FIELD_COUNT] = [
    "Denomination",
    "Address",
    "Postal Code",
    "Municipality",
    "Province",
    "Region",
    "Internal Code",
    "Tax ID",
];

/// Separator used to build a [`CompositeKey`]. Never appears in display text.
const KEY_SEPARATOR: char = '|';

/// One row of the results table.
///
/// Fields are opaque display strings; a missing cell is an empty string.
/// Serialized field names follow [`COLUMNS`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Record {
    #[serde(rename = "Denomination")]
    denomination: String,
    #[serde(rename = "Address")]
    address: String,
    #[serde(rename = "Postal Code")]
    postal_code: String,
    #[serde(rename = "Municipality")]
    municipality: String,
    #[serde(rename = "Province")]
    province: String,
    #[serde(rename = "Region")]
    region: String,
    #[serde(rename = "Internal Code")]
    internal_code: String,
    #[serde(rename = "Tax ID")]
    tax_id: String,
}

impl Record {
    /// Build a record from raw table cells.
    ///
    /// Each cell is whitespace-normalized. Cells past the eighth are dropped
    /// and missing trailing cells become empty strings.
    pub fn from_cells<I, S>(cells: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut fields: [String; FIELD_COUNT] = Default::default();
        for (slot, cell) in fields.iter_mut().zip(cells) {
            *slot = clean(cell.as_ref());
        }
        let [denomination, address, postal_code, municipality, province, region, internal_code, tax_id] =
            fields;
        Self {
            denomination,
            address,
            postal_code,
            municipality,
            province,
            region,
            internal_code,
            tax_id,
        }
    }

    pub fn denomination(&self) -> &str {
        &self.denomination
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    pub fn postal_code(&self) -> &str {
        &self.postal_code
    }

    pub fn municipality(&self) -> &str {
        &self.municipality
    }

    pub fn province(&self) -> &str {
        &self.province
    }

    pub fn region(&self) -> &str {
        &self.region
    }

    pub fn internal_code(&self) -> &str {
        &self.internal_code
    }

    pub fn tax_id(&self) -> &str {
        &self.tax_id
    }

    /// Fields in persisted column order.
    pub fn fields(&self) -> [&str; FIELD_COUNT] {
        [
            &self.denomination,
            &self.address,
            &self.postal_code,
            &self.municipality,
            &self.province,
            &self.region,
            &self.internal_code,
            &self.tax_id,
        ]
    }

    /// Identity used for deduplication: internal code, tax id and address.
    pub fn key(&self) -> CompositeKey {
        CompositeKey(format!(
            "{}{sep}{}{sep}{}",
            self.internal_code,
            self.tax_id,
            self.address,
            sep = KEY_SEPARATOR
        ))
    }
}

/// Deduplication key of a [`Record`].
///
/// Two records with equal keys are the same pharmacy even when other fields
/// differ.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CompositeKey(String);

impl CompositeKey {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for CompositeKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
