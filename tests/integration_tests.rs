use lvr_stats::models::{AggregateRecord, Granularity, QuarterKey};
use lvr_stats::processors::QuarterlyPipeline;
use lvr_stats::writers::{JsonWriter, ParquetWriter};
use lvr_stats::{PipelineConfig, ProcessingError};
use pretty_assertions::assert_eq;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

const HEADER: &str = "鄉鎮市區,交易標的,土地位置建物門牌,交易年月日,總價元,單價元平方公尺,備註";
const DESCRIPTION: &str = "The villages and towns urban district,transaction sign,land sector position building sector house number plate,transaction year month and day,total price NTD,the unit price (NTD / square meter),the note";

fn write_city_csv(dir: &Path, file_name: &str, rows: &[&str]) {
    fs::create_dir_all(dir).unwrap();
    let mut text = format!("\u{feff}{}\n{}\n", HEADER, DESCRIPTION);
    for row in rows {
        text.push_str(row);
        text.push('\n');
    }
    fs::write(dir.join(file_name), text).unwrap();
}

fn build_land_data() -> TempDir {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let base = temp_dir.path();

    write_city_csv(
        &base.join("2025-q3"),
        "a_lvr_land_a.csv",
        &[
            "大安區,房地,臺北市大安區某路1號,1140701,20000000,300000,",
            "大安區,房地,臺北市大安區某路2號,1140702,30000000,400000,",
            "信義區,房地,臺北市信義區某路3號,1140703,40000000,500001,",
        ],
    );

    let q4 = base.join("2025-Q4");
    write_city_csv(
        &q4,
        "a_lvr_land_a.csv",
        &[
            "大安區,房地,臺北市大安區某路4號,1141001,12000000,250000,",
            "大安區,房地,臺北市大安區某路5號,1141399,15000000,250000,",
            "大安區,房地,臺北市大安區某路6號,1141002,800000,250000,親友間交易",
        ],
    );
    write_city_csv(
        &q4,
        "o_lvr_land_a.csv",
        &[
            "新竹市,房地,新竹市某路1號,1141005,8000000,150000,",
            "新竹市,房地,新竹市某路2號,1141006,9000000,180000,",
            "新竹市,房地,新竹市某路3號,1141007,10000000,200000,",
        ],
    );
    write_city_csv(
        &q4,
        "y_lvr_land_a.csv",
        &["某區,房地,某路,1141001,9000000,200000,"],
    );

    // Every row filtered out: the quarter must not appear at all
    write_city_csv(
        &base.join("2025-q2"),
        "a_lvr_land_a.csv",
        &["大安區,房地,臺北市大安區某路7號,1140401,500000,250000,"],
    );

    write_city_csv(
        &base.join("2025-q7"),
        "a_lvr_land_a.csv",
        &["大安區,房地,臺北市大安區某路8號,1140401,50000000,250000,"],
    );
    fs::create_dir_all(base.join("notes")).unwrap();

    temp_dir
}

fn quarter(s: &str) -> QuarterKey {
    s.parse().unwrap()
}

#[test]
fn test_town_pipeline_end_to_end() {
    let land_data = build_land_data();
    let pipeline = QuarterlyPipeline::new(Granularity::Town, &PipelineConfig::default());

    let (document, report) = pipeline.run(land_data.path(), None).unwrap();

    assert_eq!(document.quarters, vec![quarter("2025Q3"), quarter("2025Q4")]);

    let q3 = &document.data[&quarter("2025Q3")];
    assert_eq!(
        q3.get("臺北市大安區"),
        Some(&AggregateRecord::new(2, 25_000_000, 1_157_025))
    );
    assert_eq!(
        q3.get("臺北市信義區"),
        Some(&AggregateRecord::new(1, 40_000_000, 1_652_896))
    );

    let q4 = &document.data[&quarter("2025Q4")];
    assert_eq!(
        q4.get("臺北市大安區"),
        Some(&AggregateRecord::new(1, 12_000_000, 826_446))
    );

    let hsinchu = AggregateRecord::new(3, 9_000_000, 595_041).as_synthetic();
    for district in ["新竹市東區", "新竹市北區", "新竹市香山區"] {
        assert_eq!(q4.get(district), Some(&hsinchu), "{}", district);
    }
    assert!(!q4.contains_key("新竹市"));
    assert_eq!(q4.len(), 4);

    assert_eq!(report.skipped_files.len(), 1);
    assert_eq!(report.empty_quarters, vec![quarter("2025Q2")]);
    assert_eq!(report.city_wide_files, 1);
    assert_eq!(report.rules_fired, 1);
    assert_eq!(report.synthetic_records, 3);
    assert_eq!(report.invalid_dates, 1);
}

#[test]
fn test_county_pipeline_end_to_end() {
    let land_data = build_land_data();
    let pipeline = QuarterlyPipeline::new(Granularity::County, &PipelineConfig::default());

    let (document, report) = pipeline.run(land_data.path(), None).unwrap();

    assert_eq!(document.quarters, vec![quarter("2025Q3"), quarter("2025Q4")]);

    let q3 = &document.data[&quarter("2025Q3")];
    assert_eq!(
        q3.get("臺北市"),
        Some(&AggregateRecord::new(3, 30_000_000, 1_322_314))
    );

    let q4 = &document.data[&quarter("2025Q4")];
    assert_eq!(
        q4.get("新竹市"),
        Some(&AggregateRecord::new(3, 9_000_000, 595_041))
    );
    assert_eq!(q4.len(), 2);
    assert_eq!(report.synthetic_records, 0);
}

#[test]
fn test_min_sample_count_applies_across_quarters() {
    let land_data = build_land_data();
    let config = PipelineConfig::default().with_min_sample_count(2);
    let pipeline = QuarterlyPipeline::new(Granularity::Town, &config);

    let (document, report) = pipeline.run(land_data.path(), None).unwrap();

    let q3 = &document.data[&quarter("2025Q3")];
    assert_eq!(q3.keys().collect::<Vec<_>>(), vec!["臺北市大安區"]);

    let q4 = &document.data[&quarter("2025Q4")];
    assert_eq!(q4.len(), 3);
    assert!(q4.values().all(|r| r.synthetic));
    assert_eq!(report.groups_below_min, 2);
}

#[test]
fn test_genuine_districts_are_not_replicated() {
    let temp_dir = TempDir::new().unwrap();
    write_city_csv(
        &temp_dir.path().join("2024-q1"),
        "o_lvr_land_a.csv",
        &[
            "東區,房地,新竹市東區某路1號,1130105,8000000,150000,",
            "北區,房地,新竹市北區某路2號,1130106,9000000,180000,",
        ],
    );

    let pipeline = QuarterlyPipeline::new(Granularity::Town, &PipelineConfig::default());
    let (document, report) = pipeline.run(temp_dir.path(), None).unwrap();

    let q1 = &document.data[&quarter("2024Q1")];
    assert_eq!(
        q1.keys().collect::<Vec<_>>(),
        vec!["新竹市北區", "新竹市東區"]
    );
    assert!(q1.values().all(|r| !r.synthetic));
    assert_eq!(report.rules_fired, 0);
}

#[test]
fn test_duplicate_quarter_folders_keep_the_later_one() {
    let temp_dir = TempDir::new().unwrap();
    write_city_csv(
        &temp_dir.path().join("2025-q3"),
        "a_lvr_land_a.csv",
        &["大安區,房地,臺北市大安區某路1號,1140701,20000000,300000,"],
    );
    write_city_csv(
        &temp_dir.path().join("2025-Q4"),
        "a_lvr_land_a.csv",
        &["大安區,房地,臺北市大安區某路2號,1141001,12000000,250000,"],
    );
    write_city_csv(
        &temp_dir.path().join("2025-q4"),
        "a_lvr_land_a.csv",
        &["大安區,房地,臺北市大安區某路3號,1141101,30000000,400000,"],
    );

    let pipeline = QuarterlyPipeline::new(Granularity::Town, &PipelineConfig::default());
    let (document, report) = pipeline.run(temp_dir.path(), None).unwrap();

    assert_eq!(document.quarters, vec![quarter("2025Q3"), quarter("2025Q4")]);
    assert_eq!(report.duplicate_quarters, 1);
    assert_eq!(report.quarters_written, 2);

    // "2025-Q4" sorts before "2025-q4", so the lower-case folder wins
    let q4 = &document.data[&quarter("2025Q4")];
    assert_eq!(
        q4.get("臺北市大安區"),
        Some(&AggregateRecord::new(1, 30_000_000, 1_322_314))
    );
}

#[test]
fn test_no_quarter_folders_is_fatal() {
    let temp_dir = TempDir::new().unwrap();
    fs::create_dir_all(temp_dir.path().join("2025-q5")).unwrap();
    fs::create_dir_all(temp_dir.path().join("misc")).unwrap();

    let pipeline = QuarterlyPipeline::new(Granularity::Town, &PipelineConfig::default());
    let result = pipeline.run(temp_dir.path(), None);

    assert!(matches!(result, Err(ProcessingError::Config(_))));
}

#[test]
fn test_written_outputs() {
    let land_data = build_land_data();
    let out_dir = TempDir::new().unwrap();
    let json_path = out_dir.path().join("stats_by_town_quarter.json");
    let parquet_path = out_dir.path().join("stats_by_town_quarter.parquet");

    let pipeline = QuarterlyPipeline::new(Granularity::Town, &PipelineConfig::default());
    let (document, _) = pipeline.run(land_data.path(), None).unwrap();

    JsonWriter::new().write_document(&document, &json_path).unwrap();
    let text = fs::read_to_string(&json_path).unwrap();
    assert!(text.starts_with(r#"{"quarters":["2025Q3","2025Q4"],"data":{"#));
    assert!(text.contains(r#""新竹市香山區":{"count":3,"median_total_price":9000000,"median_unit_price_ping":595041,"synthetic":true}"#));
    assert_eq!(JsonWriter::read_document(&json_path).unwrap(), document);

    let writer = ParquetWriter::new();
    writer.write_document(&document, &parquet_path).unwrap();
    let info = writer.get_file_info(&parquet_path).unwrap();
    assert_eq!(info.total_rows, document.total_regions() as i64);
}
