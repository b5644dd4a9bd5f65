// Loader scenarios against a one-shot local HTTP server.

use std::io::{Read, Write};
use std::net::TcpListener;
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use arrow::array::{Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use cartelera_viewer::data::{load_dataset, FetchOptions, LoadErrorKind, Value};
use cartelera_viewer::selection::TableView;
use flate2::write::GzEncoder;
use flate2::Compression;
use parquet::arrow::ArrowWriter;

/// Serve a single response, then shut down.
fn serve_once(status: &str, body: Vec<u8>) -> (String, JoinHandle<()>) {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind test http listener");
    let addr = listener.local_addr().expect("listener addr");
    let status = status.to_string();

    let handle = thread::spawn(move || {
        let (mut socket, _) = listener.accept().expect("accept");

        // Read until end of headers so the client doesn't see an early close.
        let mut buf = [0u8; 1024];
        let mut request = Vec::new();
        loop {
            let n = socket.read(&mut buf).expect("read request");
            if n == 0 {
                break;
            }
            request.extend_from_slice(&buf[..n]);
            if request.windows(4).any(|w| w == b"\r\n\r\n") || request.len() > 16 * 1024 {
                break;
            }
        }

        let headers = format!(
            "HTTP/1.1 {status}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
            body.len()
        );
        let _ = socket.write_all(headers.as_bytes());
        let _ = socket.write_all(&body);
    });

    (format!("http://{addr}/database/20251002.parquet.gz"), handle)
}

fn options() -> FetchOptions {
    FetchOptions {
        timeout: Duration::from_secs(10),
        ..FetchOptions::default()
    }
}

fn gzip(bytes: &[u8]) -> Vec<u8> {
    let mut enc = GzEncoder::new(Vec::new(), Compression::default());
    enc.write_all(bytes).unwrap();
    enc.finish().unwrap()
}

fn events_parquet() -> Vec<u8> {
    let schema = Arc::new(Schema::new(vec![
        Field::new("Evento ", DataType::Utf8, false),
        Field::new("evento", DataType::Int64, false),
        Field::new("Recinto!", DataType::Utf8, false),
    ]));
    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            Arc::new(StringArray::from(vec!["A", "B", "C"])),
            Arc::new(Int64Array::from(vec![1, 2, 3])),
            Arc::new(StringArray::from(vec!["Foro", "Faro", "Museo"])),
        ],
    )
    .unwrap();
    let mut writer = ArrowWriter::try_new(Vec::new(), schema, None).unwrap();
    writer.write(&batch).unwrap();
    writer.into_inner().unwrap()
}

#[test]
fn not_found_is_a_retrieval_error() {
    let (url, handle) = serve_once("404 Not Found", b"no such snapshot".to_vec());
    let err = load_dataset(&url, &options()).unwrap_err();
    assert_eq!(err.kind(), LoadErrorKind::Retrieval, "{err}");
    assert!(err.to_string().contains("404"), "{err}");
    handle.join().unwrap();
}

#[test]
fn invalid_gzip_is_a_decompression_error() {
    let (url, handle) = serve_once("200 OK", events_parquet());
    let err = load_dataset(&url, &options()).unwrap_err();
    assert_eq!(err.kind(), LoadErrorKind::Decompression, "{err}");
    handle.join().unwrap();
}

#[test]
fn gzip_of_non_table_is_a_parse_error() {
    let (url, handle) = serve_once("200 OK", gzip(b"[{\"evento\": \"A\"}]"));
    let err = load_dataset(&url, &options()).unwrap_err();
    assert_eq!(err.kind(), LoadErrorKind::Parse, "{err}");
    handle.join().unwrap();
}

#[test]
fn oversized_body_is_a_retrieval_error() {
    let (url, handle) = serve_once("200 OK", vec![0x1f; 4096]);
    let opts = FetchOptions {
        max_bytes: 1024,
        ..options()
    };
    let err = load_dataset(&url, &opts).unwrap_err();
    assert_eq!(err.kind(), LoadErrorKind::Retrieval, "{err}");
    handle.join().unwrap();
}

#[test]
fn unreachable_host_is_a_retrieval_error() {
    // Bind then drop to get a port nobody is listening on.
    let port = TcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap()
        .port();
    let err = load_dataset(&format!("http://127.0.0.1:{port}/x.parquet.gz"), &options())
        .unwrap_err();
    assert_eq!(err.kind(), LoadErrorKind::Retrieval, "{err}");
}

#[test]
fn served_snapshot_loads_and_drives_the_view() {
    let (url, handle) = serve_once("200 OK", gzip(&events_parquet()));
    let dataset = load_dataset(&url, &options()).unwrap();
    handle.join().unwrap();

    assert_eq!(dataset.column_names(), vec!["evento", "evento_2", "recinto"]);
    assert_eq!(dataset.len(), 3);

    let mut view = TableView::new(Arc::new(dataset));
    assert!(view.subset().is_empty());
    view.click_row(1);
    view.click_row(0);
    view.click_row(1);
    let subset = view.subset();
    assert_eq!(subset.indices(), vec![0]);
    assert_eq!(
        subset.rows[0].cells,
        vec![Value::String("A".into()), Value::Integer(1), Value::String("Foro".into())]
    );
}

#[test]
fn local_path_loads_like_a_url() {
    let mut file = tempfile::Builder::new()
        .suffix(".parquet.gz")
        .tempfile()
        .unwrap();
    file.write_all(&gzip(&events_parquet())).unwrap();
    let path = file.path().to_str().unwrap().to_string();

    let from_path = load_dataset(&path, &options()).unwrap();
    let from_url = load_dataset(&format!("file://{path}"), &options()).unwrap();
    assert_eq!(from_path, from_url);
    assert_eq!(from_path.len(), 3);
}
