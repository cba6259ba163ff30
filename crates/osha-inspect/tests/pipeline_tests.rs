//! End-to-end tests for loading, cleaning, filtering and classifying
//! establishment data.

mod common;

use std::fs::File;
use std::io::Write;

use common::{dataset, mapping_tables, TestHarness};
use osha_inspect::convert::{naics_to_four_digit_name, naics_to_two_digit_name, NON_CLASSIFIABLE};
use osha_inspect::dataset::{clean, load_inputs, save_csv, load_csv, DROPPED_COLUMNS};
use osha_inspect::filter::{
    self, naics_sector_predicate, ownership_predicate, Predicate, ALL, STATE_COLUMN, YEAR_COLUMN,
};
use osha_inspect::mapping::audit;
use osha_inspect::unify::{expand_state_name, unify_employer_name};
use zip::write::SimpleFileOptions;
use zip::ZipWriter;

const HEADER: &str = "id,establishment_name,street_address,zip_code,state,naics_code,establishment_type,annual_average_employees,total_hours_worked,total_dafw_days,total_djtr_days,total_deaths,year_filing_for,created_timestamp\n";

const PART_2021: &str = "\
1,Sabert Corporation,2288 Main St,08872,NJ,326199,1,450,900000,12,4,0,2021,2022-01-03\n\
2,USPS,1 Post Office Way,91766,CA,491110,3,120,250000,30,0,1,2021,2022-01-04\n\
3,Bad Row Inc,1 Nowhere,00000,TX,445110,1,2000000,5000,0,0,0,2021,2022-01-05\n\
4,No Year LLC,5 Elm,75001,TX,445110,1,20,40000,0,0,0,,2022-01-06\n";

const PART_2022: &str = "\
5,Walmart,9 Market St,75002,TX,445110,1,310,620000,5,2,0,2022,2023-01-02\n\
6,County Roads,4 Depot Rd,95814,CA,237310,2,75,150000,-3,0,0,2022,2023-01-03\n\
7,Grocer Co,12 Oak,95815,CA,445110,1,75,150000,0,1,0,2022.0,2023-01-04\n";

fn write_inputs(harness: &TestHarness) -> Vec<std::path::PathBuf> {
    let csv_path = harness.path("ITA_2021.csv");
    std::fs::write(&csv_path, format!("{}{}", HEADER, PART_2021)).unwrap();

    let zip_path = harness.path("ITA_2022.zip");
    let mut writer = ZipWriter::new(File::create(&zip_path).unwrap());
    writer
        .start_file("ITA Case Detail Data 2022.CSV", SimpleFileOptions::default())
        .unwrap();
    writer
        .write_all(format!("{}{}", HEADER, PART_2022).as_bytes())
        .unwrap();
    writer
        .start_file("README.txt", SimpleFileOptions::default())
        .unwrap();
    writer.write_all(b"not data").unwrap();
    writer.finish().unwrap();

    vec![csv_path, zip_path]
}

#[test]
fn test_load_and_clean_inputs() {
    let harness = TestHarness::new();
    let raw = load_inputs(&write_inputs(&harness)).unwrap();
    assert_eq!(raw.len(), 7);

    let cleaned = clean(raw).unwrap();
    for dropped in DROPPED_COLUMNS {
        assert!(cleaned.column_index(dropped).is_none(), "{} was not dropped", dropped);
    }
    assert_eq!(
        cleaned.column("establishment_name").unwrap(),
        vec!["Sabert Corporation", "USPS", "Walmart", "Grocer Co"],
        "oversized, yearless and negative-day rows are removed in order"
    );
}

#[test]
fn test_cleaned_dataset_round_trips_through_csv() {
    let harness = TestHarness::new();
    let cleaned = clean(load_inputs(&write_inputs(&harness)).unwrap()).unwrap();

    let output = harness.path("cleaned.csv");
    save_csv(&cleaned, &output).unwrap();
    let reloaded = load_csv(&output).unwrap();

    assert_eq!(reloaded.headers(), cleaned.headers());
    assert_eq!(reloaded.rows(), cleaned.rows());
}

#[test]
fn test_unsupported_input_is_rejected() {
    let harness = TestHarness::new();
    let path = harness.path("data.xlsx");
    std::fs::write(&path, "x").unwrap();
    assert!(load_inputs(&[path]).is_err());
}

struct FilterCase {
    name: &'static str,
    states: &'static [&'static str],
    years: &'static [&'static str],
    sectors: &'static [&'static str],
    ownership: &'static [&'static str],
    employees: Option<(f64, f64)>,
    expected: &'static [&'static str],
}

const FILTER_CASES: &[FilterCase] = &[
    FilterCase {
        name: "everything",
        states: &[ALL],
        years: &[ALL],
        sectors: &[ALL],
        ownership: &[ALL],
        employees: Some((75.0, 450.0)),
        expected: &["Sabert Corporation", "USPS", "Walmart", "Grocer Co"],
    },
    FilterCase {
        name: "single state",
        states: &["CA"],
        years: &[ALL],
        sectors: &[ALL],
        ownership: &[ALL],
        employees: None,
        expected: &["USPS", "Grocer Co"],
    },
    FilterCase {
        name: "year compares numerically",
        states: &[ALL],
        years: &["2022"],
        sectors: &[ALL],
        ownership: &[ALL],
        employees: None,
        expected: &["Walmart", "Grocer Co"],
    },
    FilterCase {
        name: "sector by name",
        states: &[ALL],
        years: &[ALL],
        sectors: &["Retail Trade"],
        ownership: &[ALL],
        employees: None,
        expected: &["Walmart", "Grocer Co"],
    },
    FilterCase {
        name: "local government only",
        states: &[ALL],
        years: &[ALL],
        sectors: &[ALL],
        ownership: &["Local Government entity"],
        employees: None,
        expected: &["USPS"],
    },
    FilterCase {
        name: "exact employee count",
        states: &[ALL],
        years: &[ALL],
        sectors: &[ALL],
        ownership: &[ALL],
        employees: Some((75.0, 75.0)),
        expected: &["Grocer Co"],
    },
    FilterCase {
        name: "no state selected",
        states: &[],
        years: &[ALL],
        sectors: &[ALL],
        ownership: &[ALL],
        employees: None,
        expected: &[],
    },
];

#[test]
fn test_filter_combinations() {
    let harness = TestHarness::new();
    let cleaned = clean(load_inputs(&write_inputs(&harness)).unwrap()).unwrap();
    let tables = mapping_tables();

    for case in FILTER_CASES {
        let mut predicates = vec![
            Predicate::categorical(STATE_COLUMN, case.states.iter().copied()),
            Predicate::categorical(YEAR_COLUMN, case.years.iter().copied()),
        ];
        predicates.extend(naics_sector_predicate(case.sectors, &tables));
        predicates.extend(ownership_predicate(case.ownership));
        if let Some((low, high)) = case.employees {
            predicates.push(Predicate::range("annual_average_employees", low, high));
        }

        let view = filter::apply(&cleaned, &predicates).unwrap();
        assert_eq!(
            view.column("establishment_name").unwrap(),
            case.expected.to_vec(),
            "Test '{}'",
            case.name
        );
    }
}

#[test]
fn test_full_range_from_column_bounds_keeps_every_row() {
    let data = dataset(
        &["state", "annual_average_employees"],
        &[&["CA", "10"], &["TX", "250.5"], &["NJ", "3"]],
    );
    let (low, high) = filter::column_bounds(&data, "annual_average_employees")
        .unwrap()
        .unwrap();
    let view = filter::apply(
        &data,
        &[
            Predicate::categorical(STATE_COLUMN, [ALL]),
            Predicate::range("annual_average_employees", low, high),
        ],
    )
    .unwrap();
    assert_eq!(view.len(), 3);
}

struct NaicsCase {
    code: Option<&'static str>,
    two_digit: &'static str,
    four_digit: &'static str,
}

const NAICS_CASES: &[NaicsCase] = &[
    NaicsCase {
        code: Some("491110"),
        two_digit: "Transportation and Warehousing",
        four_digit: "Postal Service",
    },
    NaicsCase {
        code: Some("445299"),
        two_digit: "Retail Trade",
        four_digit: "Other Retail Trade",
    },
    NaicsCase {
        code: Some("991234"),
        two_digit: NON_CLASSIFIABLE,
        four_digit: "Other Non-classifiable",
    },
    NaicsCase {
        code: None,
        two_digit: NON_CLASSIFIABLE,
        four_digit: NON_CLASSIFIABLE,
    },
];

#[test]
fn test_naics_classification() {
    let tables = mapping_tables();
    for case in NAICS_CASES {
        assert_eq!(
            naics_to_two_digit_name(case.code, &tables),
            case.two_digit,
            "code {:?}",
            case.code
        );
        assert_eq!(
            naics_to_four_digit_name(case.code, &tables),
            case.four_digit,
            "code {:?}",
            case.code
        );
    }
}

#[test]
fn test_unify_and_audit_employer_column() {
    let tables = mapping_tables();
    let mut data = dataset(
        &["employer_name", "state"],
        &[
            &["USPS", "CA"],
            &["US Postal Service", "TX"],
            &["WALMART #1234", "TX"],
            &["Acme", "NJ"],
        ],
    );

    let absent = audit::variants_absent_from(
        tables.employer_names(),
        data.column("employer_name").unwrap(),
    );
    assert_eq!(absent, vec!["United States Postal Service", "Wal-Mart Stores"]);

    data.map_column("employer_name", |name| unify_employer_name(name, &tables))
        .unwrap();
    data.map_column("state", |code| expand_state_name(code, &tables))
        .unwrap();

    assert_eq!(
        data.value_counts("employer_name").unwrap(),
        vec![
            ("U.S. Postal Service".to_string(), 2),
            ("Walmart".to_string(), 1),
            ("Acme".to_string(), 1),
        ]
    );
    assert_eq!(
        data.column("state").unwrap(),
        vec!["California", "Texas", "Texas", "New Jersey"]
    );
}
