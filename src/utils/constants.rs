/// Column names in the LVR transaction CSV header row
pub const DISTRICT_COLUMN: &str = "鄉鎮市區";
pub const TRADE_DATE_COLUMN: &str = "交易年月日";
pub const TOTAL_PRICE_COLUMN: &str = "總價元";
pub const UNIT_PRICE_COLUMN: &str = "單價元平方公尺";

/// File and directory names
pub const CITY_FILE_SUFFIX: &str = "_lvr_land_a.csv";
pub const DEFAULT_INPUT_DIR: &str = "./land-data";
pub const TOWN_OUTPUT_FILE: &str = "stats_by_town_quarter.json";
pub const COUNTY_OUTPUT_FILE: &str = "stats_by_county_quarter.json";

/// Square meters per ping
pub const PING_FACTOR: f64 = 3.305785;

/// Cleaning thresholds (exclusive bounds)
pub const MIN_TOTAL_PRICE: f64 = 1_000_000.0;
pub const MIN_UNIT_PRICE_PING: f64 = 50_000.0;
pub const MAX_UNIT_PRICE_PING: f64 = 5_000_000.0;

/// Aggregation defaults
pub const DEFAULT_MIN_SAMPLE_COUNT: usize = 1;

/// ROC calendar year 1 is Gregorian 1912
pub const ROC_YEAR_OFFSET: i32 = 1911;

/// Filename prefix code -> county/city name
pub const CITY_CODES: [(char, &str); 22] = [
    ('a', "臺北市"),
    ('b', "臺中市"),
    ('c', "基隆市"),
    ('d', "臺南市"),
    ('e', "高雄市"),
    ('f', "新北市"),
    ('g', "宜蘭縣"),
    ('h', "桃園市"),
    ('i', "嘉義市"),
    ('j', "新竹縣"),
    ('k', "苗栗縣"),
    ('m', "南投縣"),
    ('n', "彰化縣"),
    ('o', "新竹市"),
    ('p', "雲林縣"),
    ('q', "嘉義縣"),
    ('t', "屏東縣"),
    ('u', "花蓮縣"),
    ('v', "臺東縣"),
    ('w', "金門縣"),
    ('x', "澎湖縣"),
    ('z', "連江縣"),
];

/// Cities published without district breakdown, and the districts their
/// city-wide figures are copied onto
pub const HSINCHU_CITY: &str = "新竹市";
pub const HSINCHU_CITY_DISTRICTS: [&str; 3] = ["東區", "北區", "香山區"];

/// Parquet compression options
pub const COMPRESSION_SNAPPY: &str = "snappy";
pub const COMPRESSION_GZIP: &str = "gzip";
pub const COMPRESSION_LZ4: &str = "lz4";
pub const COMPRESSION_ZSTD: &str = "zstd";
pub const COMPRESSION_NONE: &str = "none";

/// Look up the city name for a filename prefix code (case-insensitive)
pub fn city_for_code(code: char) -> Option<&'static str> {
    let code = code.to_ascii_lowercase();
    CITY_CODES
        .iter()
        .find(|(c, _)| *c == code)
        .map(|(_, name)| *name)
}
