use serde::{Deserialize, Serialize};

/// Query string accepted by the sheet proxy endpoint.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SheetQuery {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tab: Option<String>,
}

/// Subset of the spreadsheet "values" payload the clients care about.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SheetValues {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub range: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub major_dimension: Option<String>,
    #[serde(default)]
    pub values: Vec<Vec<serde_json::Value>>,
}

impl SheetValues {
    pub fn header(&self) -> Option<&[serde_json::Value]> {
        self.values.first().map(Vec::as_slice)
    }

    /// Rows after the header row.
    pub fn rows(&self) -> &[Vec<serde_json::Value>] {
        self.values.get(1..).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sheet_values_decode_google_shape() {
        let raw = serde_json::json!({
            "range": "Writers!A1:Z1000",
            "majorDimension": "ROWS",
            "values": [["name", "born"], ["George Orwell", "1903"]]
        });
        let values: SheetValues = serde_json::from_value(raw).expect("decode");
        assert_eq!(values.range.as_deref(), Some("Writers!A1:Z1000"));
        assert_eq!(values.major_dimension.as_deref(), Some("ROWS"));
        assert_eq!(values.header().map(<[_]>::len), Some(2));
        assert_eq!(values.rows().len(), 1);
    }

    #[test]
    fn empty_sheet_has_no_rows() {
        let values: SheetValues =
            serde_json::from_value(serde_json::json!({ "range": "Empty!A1:Z1000" }))
                .expect("decode");
        assert!(values.header().is_none());
        assert!(values.rows().is_empty());
    }
}
