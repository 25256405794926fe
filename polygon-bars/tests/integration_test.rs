//! Integration tests for polygon-bars

use chrono::NaiveDateTime;
use polygon_bars::config::{WindowConfig, DEFAULT_COLUMNS};
use polygon_bars::data::{
    add_change_column, bars_to_table, Bar, Column, Table, Value, CHANGE_COLUMN, TIMESTAMP_COLUMN,
};
use polygon_bars::exchange::{AggregatesQuery, PolygonClient};
use polygon_bars::normalize::{normalize_, MinMax, Normalization, ZScore};
use polygon_bars::window::{create_window, rolling_windows};
use polygon_bars::Error;
use std::io::{BufRead, BufReader, Write};
use std::net::TcpListener;
use std::thread;

const DAY_MS: i64 = 86_400_000;
/// 2022-01-03 00:00:00 UTC
const BASE_TS: i64 = 1_641_168_000_000;

/// Helper function to create test bars, one per day
fn create_test_bars(count: usize, base_price: f64) -> Vec<Bar> {
    (0..count)
        .map(|i| {
            let price = base_price + (i as f64 * 0.1) + (i as f64 % 10.0) * 0.5;
            Bar::new(
                BASE_TS + i as i64 * DAY_MS,
                price,
                price + 1.0,
                price - 1.0,
                price + 0.25,
                1000.0 + (i * 37 % 11) as f64 * 100.0,
                price + 0.1,
                500 + (i as i64 * 13 % 7),
            )
        })
        .collect()
}

fn table_with_change(count: usize) -> Table {
    let mut table = bars_to_table(&create_test_bars(count, 100.0), true).unwrap();
    add_change_column(&mut table, "close").unwrap();
    table
}

fn float_bits(column: &Column) -> Vec<u64> {
    match column {
        Column::Float(values) => values.iter().map(|v| v.to_bits()).collect(),
        other => panic!("expected float column, got {:?}", other),
    }
}

#[test]
fn test_table_preserves_order() {
    let bars = create_test_bars(12, 100.0);
    let table = bars_to_table(&bars, false).unwrap();

    assert_eq!(table.len(), bars.len());
    assert_eq!(
        table.column(TIMESTAMP_COLUMN).unwrap(),
        &Column::Int(bars.iter().map(|b| b.timestamp).collect())
    );
    assert_eq!(
        table.column("close").unwrap(),
        &Column::Float(bars.iter().map(|b| b.close).collect())
    );
    assert_eq!(
        table.column("transactions").unwrap(),
        &Column::Int(bars.iter().map(|b| b.transactions).collect())
    );
}

#[test]
fn test_decoded_timestamps_non_decreasing() {
    let table = bars_to_table(&create_test_bars(20, 100.0), true).unwrap();

    let timestamps: Vec<NaiveDateTime> = match table.column(TIMESTAMP_COLUMN).unwrap() {
        Column::Timestamp(values) => values.clone(),
        other => panic!("timestamp column not decoded: {:?}", other),
    };
    assert_eq!(timestamps.len(), 20);
    assert!(timestamps.windows(2).all(|w| w[0] <= w[1]));
    assert_eq!(timestamps[0].to_string(), "2022-01-03 00:00:00");
}

#[test]
fn test_zscore_default_columns() {
    let mut table = table_with_change(40);
    normalize_(&ZScore, &mut table, DEFAULT_COLUMNS).unwrap();

    for &name in DEFAULT_COLUMNS {
        let values = table.numeric_column(name).unwrap();
        let mean = values.iter().sum::<f64>() / values.len() as f64;
        assert!(mean.abs() < 1e-9, "{} mean {}", name, mean);
    }
    // not listed, so untouched
    assert!(matches!(table.column(TIMESTAMP_COLUMN).unwrap(), Column::Timestamp(_)));
}

#[test]
fn test_window_of_thirty_rows() {
    let table = table_with_change(30);
    let window = create_window(&table, 0, 28, DEFAULT_COLUMNS).unwrap();

    assert_eq!(window.data.dim(), (28, DEFAULT_COLUMNS.len()));
    assert_eq!(
        Value::Float(window.target),
        table.column(CHANGE_COLUMN).unwrap().get(27).unwrap()
    );
    assert_eq!(window.timestamp, table.column(TIMESTAMP_COLUMN).unwrap().get(27).unwrap());
    // first feature column is `open`
    assert_eq!(window.data[[27, 0]], create_test_bars(30, 100.0)[27].open);
}

#[test]
fn test_window_truncates_short_table() {
    let table = table_with_change(10);
    let window = create_window(&table, 0, 28, DEFAULT_COLUMNS).unwrap();

    assert!(window.rows() < 28);
    assert_eq!(window.rows(), 10);
    assert_eq!(window.timestamp, table.column(TIMESTAMP_COLUMN).unwrap().get(9).unwrap());
}

#[test]
fn test_minmax_volume_only_leaves_other_columns() {
    let bars = vec![
        Bar::new(BASE_TS, 10.0, 11.0, 9.5, 10.5, 1200.0, 10.2, 40),
        Bar::new(BASE_TS + DAY_MS, 10.5, 12.0, 10.1, 11.7, 3400.0, 11.1, 75),
        Bar::new(BASE_TS + 2 * DAY_MS, 11.7, 11.9, 10.8, 11.0, 800.0, 11.3, 52),
        Bar::new(BASE_TS + 3 * DAY_MS, 11.0, 11.4, 10.2, 10.3, 2100.0, 10.7, 61),
        Bar::new(BASE_TS + 4 * DAY_MS, 10.3, 10.9, 9.9, 10.8, 1500.0, 10.4, 48),
    ];
    let before = bars_to_table(&bars, true).unwrap();
    let mut after = before.clone();

    normalize_(&MinMax, &mut after, &["volume"]).unwrap();

    assert_eq!(
        after.column_names().collect::<Vec<_>>(),
        before.column_names().collect::<Vec<_>>()
    );
    assert_eq!(after.len(), 5);
    for name in ["open", "high", "low", "close", "vwap"] {
        assert_eq!(
            float_bits(after.column(name).unwrap()),
            float_bits(before.column(name).unwrap()),
            "{} changed",
            name
        );
    }
    assert_eq!(after.column("transactions").unwrap(), before.column("transactions").unwrap());
    assert_eq!(after.column(TIMESTAMP_COLUMN).unwrap(), before.column(TIMESTAMP_COLUMN).unwrap());

    let volume = after.numeric_column("volume").unwrap();
    assert_eq!(volume[2], 0.0);
    assert_eq!(volume[1], 1.0);
}

#[test]
fn test_constant_column_through_table() {
    let mut table = Table::from_columns(vec![
        ("a", Column::Float(vec![5.0; 4])),
        ("b", Column::Float(vec![5.0; 4])),
    ])
    .unwrap();

    normalize_(&Normalization::ZScore, &mut table, &["a"]).unwrap();
    normalize_(&Normalization::MinMax, &mut table, &["b"]).unwrap();

    assert!(table.numeric_column("a").unwrap().iter().all(|v| v.is_nan()));
    assert!(table.numeric_column("b").unwrap().iter().all(|v| v.is_nan()));
}

#[test]
fn test_change_column_normalizes_around_leading_nan() {
    let close = Column::Float(vec![100.0, 110.0, 99.0, 105.0]);
    let mut zscored = Table::from_columns(vec![("close", close)]).unwrap();
    add_change_column(&mut zscored, "close").unwrap();
    let mut scaled = zscored.clone();

    normalize_(&ZScore, &mut zscored, &[CHANGE_COLUMN]).unwrap();
    normalize_(&MinMax, &mut scaled, &[CHANGE_COLUMN]).unwrap();

    let z = zscored.numeric_column(CHANGE_COLUMN).unwrap();
    assert!(z[0].is_nan());
    assert!(z[1..].iter().all(|v| v.is_finite()));
    assert!((z[1..].iter().sum::<f64>() / 3.0).abs() < 1e-12);

    let m = scaled.numeric_column(CHANGE_COLUMN).unwrap();
    assert!(m[0].is_nan());
    assert!(m[1..].iter().all(|v| (0.0..=1.0).contains(v)));
    assert_eq!(m[1], 1.0);
    assert_eq!(m[2], 0.0);
}

#[test]
fn test_window_config_rolling() {
    let table = table_with_change(35);
    let config = WindowConfig {
        step: 7,
        ..WindowConfig::default()
    };

    let windows = config.windows(&table).unwrap();
    // starts 0 and 7
    assert_eq!(windows.len(), 2);
    assert_eq!(windows, rolling_windows(&table, 28, 7, DEFAULT_COLUMNS).unwrap());
    assert_eq!(config.window(&table).unwrap(), windows[0]);
}

/// Serve one canned HTTP response on a local port; yields the request line
fn serve_once(status_line: &'static str, body: String) -> (String, thread::JoinHandle<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();

    let handle = thread::spawn(move || {
        let (mut stream, _) = listener.accept().unwrap();
        let mut reader = BufReader::new(stream.try_clone().unwrap());

        let mut request_line = String::new();
        reader.read_line(&mut request_line).unwrap();
        loop {
            let mut header = String::new();
            let read = reader.read_line(&mut header).unwrap();
            if read == 0 || header == "\r\n" {
                break;
            }
        }

        let response = format!(
            "{}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            status_line,
            body.len(),
            body
        );
        stream.write_all(response.as_bytes()).unwrap();
        stream.flush().unwrap();
        request_line
    });

    (format!("http://{}", addr), handle)
}

fn local_client(base_url: &str) -> PolygonClient {
    let http = reqwest::blocking::Client::builder().no_proxy().build().unwrap();
    PolygonClient::with_http_client("secret", base_url, http)
}

#[test]
fn test_fetch_aggregates() {
    let body = r#"{"ticker":"TSLA","queryCount":2,"resultsCount":2,"adjusted":true,"results":[
        {"v":64000000,"vw":397.12,"o":382.58,"c":399.93,"h":400.36,"l":378.68,"t":1641186000000,"n":850000},
        {"v":55300000,"vw":389.1,"o":396.52,"c":383.2,"h":402.67,"l":382.0,"t":1641272400000,"n":701000}
    ],"status":"OK","request_id":"r1","count":2}"#;
    let (base_url, server) = serve_once("HTTP/1.1 200 OK", body.to_string());

    let bars = local_client(&base_url).get_aggs(&AggregatesQuery::default()).unwrap();
    let request_line = server.join().unwrap();

    assert!(request_line.starts_with("GET /v2/aggs/ticker/TSLA/range/1/day/2021-01-09/2023-01-10?"));
    assert!(request_line.contains("limit=5000"));
    assert!(request_line.contains("apiKey=secret"));

    assert_eq!(bars.len(), 2);
    assert_eq!(bars[0].timestamp, 1_641_186_000_000);
    assert_eq!(bars[1].transactions, 701_000);
    assert_eq!(bars[1].volume, 55_300_000.0);
}

#[test]
fn test_fetch_auth_error() {
    let body = r#"{"status":"ERROR","request_id":"r2","error":"Unknown API Key"}"#;
    let (base_url, server) = serve_once("HTTP/1.1 401 Unauthorized", body.to_string());

    let err = local_client(&base_url)
        .get_aggs(&AggregatesQuery::new("AAPL"))
        .unwrap_err();
    server.join().unwrap();

    match err {
        Error::Api { status, message } => {
            assert_eq!(status, 401);
            assert_eq!(message, "Unknown API Key");
        }
        other => panic!("unexpected error: {:?}", other),
    }
}

#[test]
fn test_fetch_missing_transactions() {
    let body = r#"{"status":"OK","results":[{"v":10,"vw":1.0,"o":1,"c":1,"h":1,"l":1,"t":0}]}"#;
    let (base_url, server) = serve_once("HTTP/1.1 200 OK", body.to_string());

    let err = local_client(&base_url)
        .get_aggs(&AggregatesQuery::default())
        .unwrap_err();
    server.join().unwrap();

    assert!(matches!(err, Error::MissingField(ref f) if f == "transactions"));
}
