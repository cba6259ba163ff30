use std::sync::LazyLock;

use log::warn;
use scraper::{ElementRef, Html, Selector};

use crate::convert::currency_to_number;
use crate::error::ParseError;
use crate::inspection::labels;
use crate::inspection::model::{
    AdvanceNotice, CaseStatus, Inspection, InspectionType, LabelValue, Ownership,
    SafetyOrHealth, Scope, UnionStatus, NULL_INT, NULL_STRING,
};

// Selectors are compile-time constants; parse() only fails on invalid CSS.
static STATUS_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("div.well.well-small").unwrap());
static LAYOUT_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("div.span4").unwrap());
static HEADER_SELECTOR: LazyLock<Selector> = LazyLock::new(|| Selector::parse("h4").unwrap());
static TABLE_SELECTOR: LazyLock<Selector> = LazyLock::new(|| Selector::parse("table").unwrap());
static ROW_SELECTOR: LazyLock<Selector> = LazyLock::new(|| Selector::parse("tr").unwrap());
static CELL_SELECTOR: LazyLock<Selector> = LazyLock::new(|| Selector::parse("th, td").unwrap());

// Positions of the `div.span4` blocks on the detail page.
const UNION_BLOCK: usize = 4;
const NAICS_BLOCK: usize = 5;
const DETAILS_BLOCK: usize = 6;
const SAFETY_HEALTH_BLOCK: usize = 7;
const LAYOUT_BLOCKS: usize = SAFETY_HEALTH_BLOCK + 1;

const TOTAL_COLUMN: &str = "Total";

/// Parses one inspection-detail page.
///
/// Only a missing employer header or missing layout blocks fail the
/// document; every other gap degrades to the field's null sentinel.
pub fn parse_inspection(html: &str) -> Result<Inspection, ParseError> {
    let document = Html::parse_document(html);

    let case_status = case_status_in(&document);

    let blocks: Vec<String> = document.select(&LAYOUT_SELECTOR).map(element_text).collect();
    if blocks.len() < LAYOUT_BLOCKS {
        return Err(ParseError::MissingLayoutBlocks {
            found: blocks.len(),
            expected: LAYOUT_BLOCKS,
        });
    }

    let employer_name = employer_name(&document)?;

    let (naics_code, naics_name) = match labels::naics_parts(&blocks[NAICS_BLOCK]) {
        Some((code, name)) => (
            code.parse::<i64>().unwrap_or(NULL_INT),
            name.unwrap_or(NULL_STRING).to_string(),
        ),
        None => (NULL_INT, NULL_STRING.to_string()),
    };

    let details = &blocks[DETAILS_BLOCK];
    let ownership = match labels::ownership_value(details) {
        Some(text) => recognize(text, labels::OWNERSHIP),
        None => Ownership::UNSET,
    };

    let summary = violation_summary(&document);

    Ok(Inspection {
        case_status,
        employer_name,
        union_status: categorical(&blocks[UNION_BLOCK], labels::UNION_STATUS),
        naics_code,
        naics_name,
        inspection_type: categorical::<InspectionType>(details, labels::INSPECTION_TYPE),
        scope: categorical::<Scope>(details, labels::SCOPE),
        advance_notice: categorical::<AdvanceNotice>(details, labels::ADVANCE_NOTICE),
        ownership,
        safety_or_health: categorical::<SafetyOrHealth>(
            &blocks[SAFETY_HEALTH_BLOCK],
            labels::SAFETY_HEALTH,
        ),
        total_initial_violations: summary.initial_violations,
        total_current_violations: summary.current_violations,
        total_initial_penalty: summary.initial_penalty,
        total_current_penalty: summary.current_penalty,
        total_fta_penalty: summary.fta_penalty,
    })
}

/// Reads only the case-status block. Cheaper than a full parse when all
/// that matters is whether a cached page is final.
pub fn case_status(html: &str) -> CaseStatus {
    case_status_in(&Html::parse_document(html))
}

fn case_status_in(document: &Html) -> CaseStatus {
    document
        .select(&STATUS_SELECTOR)
        .next()
        .map(element_text)
        .and_then(|text| labels::value_after_label(&text, labels::CASE_STATUS).map(str::to_string))
        .map(|status| recognize(&status, labels::CASE_STATUS))
        .unwrap_or(CaseStatus::UNSET)
}

fn employer_name(document: &Html) -> Result<String, ParseError> {
    let header = document
        .select(&HEADER_SELECTOR)
        .next()
        .map(element_text)
        .ok_or(ParseError::MissingEmployerHeader)?;

    labels::employer_from_header(&header)
        .map(str::to_string)
        .ok_or_else(|| ParseError::MalformedEmployerHeader(header.trim().to_string()))
}

fn categorical<T: LabelValue>(block: &str, label: &str) -> T {
    match labels::value_after_label(block, label) {
        Some(text) => recognize(text, label),
        None => T::UNSET,
    }
}

fn recognize<T: LabelValue>(text: &str, label: &str) -> T {
    T::from_label(text).unwrap_or_else(|| {
        warn!("Unrecognized value '{}' for '{}'", text, label.trim_end());
        T::UNSET
    })
}

struct ViolationSummary {
    initial_violations: i64,
    current_violations: i64,
    initial_penalty: String,
    current_penalty: String,
    fta_penalty: String,
}

/// `Total` column of the "Violation Summary" table. Each cell is read
/// independently; a missing table or cell only blanks its own field.
fn violation_summary(document: &Html) -> ViolationSummary {
    let totals = summary_table(document)
        .map(|table| total_column(&table))
        .unwrap_or_default();
    let cell = |row: usize| totals.get(row).map(String::as_str);

    ViolationSummary {
        initial_violations: count_cell(cell(0)),
        current_violations: count_cell(cell(1)),
        initial_penalty: penalty_cell(cell(2)),
        current_penalty: penalty_cell(cell(3)),
        fta_penalty: penalty_cell(cell(4)),
    }
}

fn summary_table(document: &Html) -> Option<ElementRef<'_>> {
    // Layout tables wrapping the summary also contain its caption text; the
    // last match in document order is the innermost one.
    document
        .select(&TABLE_SELECTOR)
        .filter(|table| element_text(*table).contains(labels::VIOLATION_SUMMARY))
        .last()
}

/// Cells under the `Total` header, for every row after the header row.
fn total_column(table: &ElementRef<'_>) -> Vec<String> {
    let rows: Vec<Vec<String>> = table
        .select(&ROW_SELECTOR)
        .map(|row| {
            row.select(&CELL_SELECTOR)
                .map(|cell| element_text(cell).trim().to_string())
                .collect()
        })
        .collect();

    let Some((header_row, total_index)) = rows.iter().enumerate().find_map(|(i, cells)| {
        cells
            .iter()
            .position(|cell| cell == TOTAL_COLUMN)
            .map(|column| (i, column))
    }) else {
        return Vec::new();
    };

    rows[header_row + 1..]
        .iter()
        .map(|cells| cells.get(total_index).cloned().unwrap_or_default())
        .collect()
}

fn count_cell(cell: Option<&str>) -> i64 {
    cell.and_then(|text| text.replace(',', "").parse::<i64>().ok())
        .unwrap_or(NULL_INT)
}

fn penalty_cell(cell: Option<&str>) -> String {
    match cell {
        Some(text) if currency_to_number(text).is_ok() => text.to_string(),
        _ => NULL_STRING.to_string(),
    }
}

fn element_text(element: ElementRef<'_>) -> String {
    element.text().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(status: Option<&str>, ownership_line: &str, summary: Option<&str>) -> String {
        let status_block = status
            .map(|s| format!("<div class=\"well well-small\">Case Status: {}</div>", s))
            .unwrap_or_default();
        format!(
            r#"<html><body>
<h4>1437214.015 - U.S. Postal Service - Pomona Main Post Office</h4>
{status_block}
<div class="span4">Inspection Nr: 1437214.015</div>
<div class="span4">Report ID: 0950611</div>
<div class="span4">Date Opened: 10/02/2019</div>
<div class="span4">Site Address: Pomona, CA</div>
<div class="span4">Union Status: NonUnion</div>
<div class="span4">
SIC: 4311
NAICS: 491110/Postal Service
</div>
<div class="span4">
Inspection Type: Planned
Scope: Complete
Advanced Notice: N
{ownership_line}
</div>
<div class="span4">
Close Conference: 10/10/2019
Safety/Health: Safety
</div>
{summary}
</body></html>"#,
            status_block = status_block,
            ownership_line = ownership_line,
            summary = summary.unwrap_or(""),
        )
    }

    const SUMMARY: &str = r#"<table>
<caption>Violation Summary</caption>
<tr><th></th><th>Serious</th><th>Willful</th><th>Repeat</th><th>Other</th><th>Unclass</th><th>Total</th></tr>
<tr><td>Initial Violations</td><td>5</td><td></td><td></td><td></td><td></td><td>5</td></tr>
<tr><td>Current Violations</td><td>4</td><td></td><td></td><td></td><td></td><td>4</td></tr>
<tr><td>Initial Penalty</td><td>$68,282</td><td></td><td></td><td></td><td></td><td>$68,282</td></tr>
<tr><td>Current Penalty</td><td>$44,013</td><td></td><td></td><td></td><td></td><td>$44,013</td></tr>
<tr><td>FTA Amount</td><td>$0</td><td></td><td></td><td></td><td></td><td>$0</td></tr>
</table>"#;

    #[test]
    fn test_parse_full_page() {
        let html = page(Some("CLOSED"), "Ownership: Private", Some(SUMMARY));
        let inspection = parse_inspection(&html).unwrap();

        assert_eq!(inspection.case_status, CaseStatus::Closed);
        assert_eq!(
            inspection.employer_name,
            "U.S. Postal Service - Pomona Main Post Office"
        );
        assert_eq!(inspection.union_status, UnionStatus::NonUnion);
        assert_eq!(inspection.naics_code, 491110);
        assert_eq!(inspection.naics_name, "Postal Service");
        assert_eq!(inspection.inspection_type, InspectionType::Planned);
        assert_eq!(inspection.scope, Scope::Complete);
        assert_eq!(inspection.advance_notice, AdvanceNotice::No);
        assert_eq!(inspection.ownership, Ownership::Private);
        assert_eq!(inspection.safety_or_health, SafetyOrHealth::Safety);
        assert_eq!(inspection.total_initial_violations, 5);
        assert_eq!(inspection.total_current_violations, 4);
        assert_eq!(inspection.total_initial_penalty, "$68,282");
        assert_eq!(inspection.total_current_penalty, "$44,013");
        assert_eq!(inspection.total_fta_penalty, "$0");
    }

    #[test]
    fn test_missing_status_block_is_unknown() {
        let html = page(None, "Ownership: Private", Some(SUMMARY));
        let inspection = parse_inspection(&html).unwrap();
        assert_eq!(inspection.case_status, CaseStatus::Unknown);
    }

    #[test]
    fn test_ownership_nbsp_is_unknown() {
        let html = page(Some("OPEN"), "Ownership: &nbsp;", Some(SUMMARY));
        let inspection = parse_inspection(&html).unwrap();
        assert_eq!(inspection.case_status, CaseStatus::Open);
        assert_eq!(inspection.ownership, Ownership::Unknown);
    }

    #[test]
    fn test_missing_summary_uses_sentinels() {
        let html = page(Some("CLOSED"), "Ownership: Private", None);
        let inspection = parse_inspection(&html).unwrap();

        assert_eq!(inspection.total_initial_violations, NULL_INT);
        assert_eq!(inspection.total_current_violations, NULL_INT);
        assert_eq!(inspection.total_initial_penalty, NULL_STRING);
        assert_eq!(inspection.total_current_penalty, NULL_STRING);
        assert_eq!(inspection.total_fta_penalty, NULL_STRING);
        assert_eq!(inspection.naics_code, 491110);
        assert_eq!(inspection.scope, Scope::Complete);
    }

    #[test]
    fn test_missing_header_is_document_error() {
        let html = page(Some("CLOSED"), "Ownership: Private", Some(SUMMARY))
            .replace("<h4>", "<h5>")
            .replace("</h4>", "</h5>");
        assert_eq!(
            parse_inspection(&html),
            Err(ParseError::MissingEmployerHeader)
        );
    }

    #[test]
    fn test_missing_layout_blocks_is_document_error() {
        let html = "<html><body><h4>1 - Acme</h4><div class=\"span4\">x</div></body></html>";
        assert_eq!(
            parse_inspection(html),
            Err(ParseError::MissingLayoutBlocks {
                found: 1,
                expected: 8
            })
        );
    }

    #[test]
    fn test_case_status_only() {
        assert_eq!(
            case_status(&page(Some("OPEN"), "Ownership: Private", None)),
            CaseStatus::Open
        );
        assert_eq!(case_status("<html><body></body></html>"), CaseStatus::Unknown);
    }

    #[test]
    fn test_summary_cells_fail_independently() {
        let summary = SUMMARY
            .replace("<td>4</td></tr>", "<td></td></tr>")
            .replace("<td>$44,013</td></tr>", "<td>n/a</td></tr>");
        let html = page(Some("CLOSED"), "Ownership: Private", Some(&summary));
        let inspection = parse_inspection(&html).unwrap();

        assert_eq!(inspection.total_initial_violations, 5);
        assert_eq!(inspection.total_current_violations, NULL_INT);
        assert_eq!(inspection.total_initial_penalty, "$68,282");
        assert_eq!(inspection.total_current_penalty, NULL_STRING);
        assert_eq!(inspection.total_fta_penalty, "$0");
    }

    #[test]
    fn test_summary_nested_in_layout_table() {
        let nested = format!("<table><tr><td>{}</td></tr></table>", SUMMARY);
        let html = page(Some("CLOSED"), "Ownership: Private", Some(&nested));
        let inspection = parse_inspection(&html).unwrap();
        assert_eq!(inspection.total_initial_violations, 5);
        assert_eq!(inspection.total_fta_penalty, "$0");
    }
}
