// ============================================================
// RESERVATION RECORD
// ============================================================
// One flat booking row keyed by the export's header names

use serde::ser::{Serialize, SerializeMap, Serializer};

/// A single reservation from the dashboard export.
///
/// Field order matches the CSV header, and every record built from the
/// same header carries the same key set: an empty cell is kept as an
/// explicit `None` rather than dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReservationRecord {
    fields: Vec<(String, Option<String>)>,
}

impl ReservationRecord {
    /// Zip one data row against the header, positionally.
    ///
    /// Callers are expected to have verified that `cells` has the same
    /// width as `header` (the CSV reader rejects ragged rows).
    pub fn from_cells(header: &[String], cells: &[String]) -> Self {
        debug_assert_eq!(header.len(), cells.len());
        let fields = header
            .iter()
            .zip(cells)
            .map(|(name, value)| (name.clone(), normalize_cell(value)))
            .collect();
        Self { fields }
    }

    /// Field names in header order.
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(name, _)| name.as_str())
    }

    /// Cell values in header order, `None` for empty cells.
    pub fn cells(&self) -> impl Iterator<Item = Option<&str>> {
        self.fields.iter().map(|(_, value)| value.as_deref())
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(n, _)| n == name)
            .and_then(|(_, value)| value.as_deref())
    }

    /// Booking reference is the only field with identity semantics
    /// (uniqueness is not enforced by the export).
    pub fn booking_reference(&self) -> Option<&str> {
        self.get("Booking reference")
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Keep only `columns`, in the order they are listed.
    ///
    /// Columns absent from the record are skipped; validating the
    /// selection against the header is the normalizer's job.
    pub fn select(&self, columns: &[String]) -> Self {
        let fields = columns
            .iter()
            .filter_map(|column| self.fields.iter().find(|(name, _)| name == column).cloned())
            .collect();
        Self { fields }
    }
}

/// Empty and whitespace-only cells become explicit nulls; anything else
/// is kept verbatim, with no type inference.
fn normalize_cell(value: &str) -> Option<String> {
    if value.trim().is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

// Serialized as a JSON object in header order. A derived map type would
// not guarantee key order, which is part of the output contract.
impl Serialize for ReservationRecord {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (name, value) in &self.fields {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}
