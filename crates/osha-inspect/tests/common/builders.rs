//! Builders for detail pages, mapping tables and datasets.

#![allow(dead_code)]

use osha_inspect::dataset::Dataset;
use osha_inspect::mapping::{CodeTable, MappingTables, VariantTable};

/// Renders an inspection-detail page shaped like the live site.
#[derive(Debug, Clone)]
pub struct PageBuilder {
    case_status: Option<String>,
    header: Option<String>,
    union_status: String,
    naics_line: String,
    inspection_type: String,
    scope: String,
    advance_notice: String,
    ownership: String,
    safety_health: String,
    summary_totals: Option<[String; 5]>,
    layout_blocks: usize,
}

impl PageBuilder {
    /// A closed, fully populated inspection.
    pub fn new() -> Self {
        Self {
            case_status: Some("CLOSED".to_string()),
            header: Some("317191393 - Sabert Corporation".to_string()),
            union_status: "NonUnion".to_string(),
            naics_line: "NAICS: 326199/All Other Plastics Product Manufacturing".to_string(),
            inspection_type: "Referral".to_string(),
            scope: "Partial".to_string(),
            advance_notice: "N".to_string(),
            ownership: "Private".to_string(),
            safety_health: "Safety".to_string(),
            summary_totals: Some([
                "1".to_string(),
                "1".to_string(),
                "$70,000".to_string(),
                "$42,000".to_string(),
                "$0".to_string(),
            ]),
            layout_blocks: 8,
        }
    }

    pub fn case_status(mut self, status: &str) -> Self {
        self.case_status = Some(status.to_string());
        self
    }

    pub fn without_case_status(mut self) -> Self {
        self.case_status = None;
        self
    }

    pub fn header(mut self, header: &str) -> Self {
        self.header = Some(header.to_string());
        self
    }

    pub fn without_header(mut self) -> Self {
        self.header = None;
        self
    }

    pub fn union_status(mut self, value: &str) -> Self {
        self.union_status = value.to_string();
        self
    }

    /// Full NAICS line, e.g. `"NAICS: 491110/Postal Service"`.
    pub fn naics_line(mut self, line: &str) -> Self {
        self.naics_line = line.to_string();
        self
    }

    pub fn inspection_type(mut self, value: &str) -> Self {
        self.inspection_type = value.to_string();
        self
    }

    pub fn scope(mut self, value: &str) -> Self {
        self.scope = value.to_string();
        self
    }

    pub fn advance_notice(mut self, value: &str) -> Self {
        self.advance_notice = value.to_string();
        self
    }

    /// Raw ownership value; `"&nbsp;"` renders the unset marker.
    pub fn ownership(mut self, value: &str) -> Self {
        self.ownership = value.to_string();
        self
    }

    pub fn safety_health(mut self, value: &str) -> Self {
        self.safety_health = value.to_string();
        self
    }

    pub fn summary_totals(mut self, totals: [&str; 5]) -> Self {
        self.summary_totals = Some(totals.map(str::to_string));
        self
    }

    pub fn without_summary(mut self) -> Self {
        self.summary_totals = None;
        self
    }

    pub fn layout_blocks(mut self, count: usize) -> Self {
        self.layout_blocks = count;
        self
    }

    pub fn build(&self) -> String {
        let mut html = String::from("<!DOCTYPE html>\n<html><head><title>Inspection Detail</title></head><body>\n");

        if let Some(header) = &self.header {
            html.push_str(&format!("<h4>{}</h4>\n", header));
        }
        if let Some(status) = &self.case_status {
            html.push_str(&format!(
                "<div class=\"well well-small\">\n<strong>Case Status: </strong>{}\n</div>\n",
                status
            ));
        }

        let blocks = [
            "Inspection Nr: 317191393".to_string(),
            "Report ID: 0524500".to_string(),
            "Date Opened: 09/14/2023".to_string(),
            "Site Address:\nSabert Corporation\n2288 Main Street\nSayreville, NJ 08872".to_string(),
            format!("Mailing Address:\nUnion Status: {}", self.union_status),
            format!("SIC:\n{}", self.naics_line),
            format!(
                "Inspection Type: {}\nScope: {}\nAdvanced Notice: {}\nOwnership: {}",
                self.inspection_type, self.scope, self.advance_notice, self.ownership
            ),
            format!("Safety/Health: {}\nClose Conference: 10/02/2023", self.safety_health),
        ];
        for block in blocks.iter().take(self.layout_blocks) {
            html.push_str(&format!("<div class=\"span4\">\n{}\n</div>\n", block));
        }

        if let Some(totals) = &self.summary_totals {
            let labels = [
                "Initial Violations",
                "Current Violations",
                "Initial Penalty",
                "Current Penalty",
                "FTA Amount",
            ];
            html.push_str("<table class=\"table\">\n<caption>Violation Summary</caption>\n");
            html.push_str(
                "<tr><th></th><th>Serious</th><th>Willful</th><th>Repeat</th><th>Other</th><th>Unclass</th><th>Total</th></tr>\n",
            );
            for (label, total) in labels.iter().zip(totals.iter()) {
                html.push_str(&format!(
                    "<tr><td>{}</td><td>{}</td><td></td><td></td><td></td><td></td><td>{}</td></tr>\n",
                    label, total, total
                ));
            }
            html.push_str("</table>\n");
        }

        html.push_str("</body></html>\n");
        html
    }
}

impl Default for PageBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Small but realistic mapping tables.
pub fn mapping_tables() -> MappingTables {
    let employers: VariantTable = [
        (
            "U.S. Postal Service",
            vec!["USPS", "United States Postal Service", "US Postal Service"],
        ),
        ("Walmart", vec!["WALMART #1234", "Wal-Mart Stores"]),
    ]
    .into_iter()
    .collect();
    let fatalities: VariantTable = [("Struck-by", vec!["Struck by object", "Struck By"])]
        .into_iter()
        .collect();
    let two_digit: CodeTable = [
        ("31", "Manufacturing"),
        ("32", "Manufacturing"),
        ("33", "Manufacturing"),
        ("44", "Retail Trade"),
        ("49", "Transportation and Warehousing"),
    ]
    .into_iter()
    .collect();
    let four_digit: CodeTable = [("4911", "Postal Service"), ("4451", "Grocery Stores")]
        .into_iter()
        .collect();
    let states: CodeTable = [("CA", "California"), ("NJ", "New Jersey"), ("TX", "Texas")]
        .into_iter()
        .collect();

    MappingTables::new(employers, fatalities, two_digit, four_digit, states)
}

pub fn dataset(headers: &[&str], rows: &[&[&str]]) -> Dataset {
    Dataset::new(
        headers.iter().map(|h| h.to_string()).collect(),
        rows.iter()
            .map(|row| row.iter().map(|c| c.to_string()).collect())
            .collect(),
    )
}
