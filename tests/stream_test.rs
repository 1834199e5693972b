//! Integration tests for the range-aware streaming routes.

mod common;

use common::{pattern, TestHarness};
use reqwest::header::RANGE;

#[tokio::test]
async fn full_stream_serves_whole_file() {
    let (h, addr) = TestHarness::with_server().await;
    let data = h.write_video("movie.mp4", 4096);

    let resp = reqwest::get(format!("http://{addr}/videos/movie.mp4"))
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    assert_eq!(resp.headers()["content-type"], "video/mp4");
    assert_eq!(resp.headers()["accept-ranges"], "bytes");
    assert_eq!(resp.headers()["content-length"], "4096");
    assert!(resp.headers().get("content-range").is_none());

    let body = resp.bytes().await.unwrap();
    assert_eq!(body.as_ref(), data.as_slice());
}

#[tokio::test]
async fn api_prefix_serves_same_bytes() {
    let (h, addr) = TestHarness::with_server().await;
    let data = h.write_video("movie.webm", 512);

    let resp = reqwest::get(format!("http://{addr}/api/videos/movie.webm"))
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    assert_eq!(resp.headers()["content-type"], "video/webm");
    assert_eq!(resp.bytes().await.unwrap().as_ref(), data.as_slice());
}

#[tokio::test]
async fn bounded_range_returns_partial_content() {
    let (h, addr) = TestHarness::with_server().await;
    let data = h.write_video("movie.mp4", 1000);

    let client = reqwest::Client::new();
    let resp = client
        .get(format!("http://{addr}/videos/movie.mp4"))
        .header(RANGE, "bytes=100-199")
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 206);
    assert_eq!(resp.headers()["content-range"], "bytes 100-199/1000");
    assert_eq!(resp.headers()["content-length"], "100");

    let body = resp.bytes().await.unwrap();
    assert_eq!(body.as_ref(), &data[100..200]);
}

#[tokio::test]
async fn open_ended_range_runs_to_last_byte() {
    let (h, addr) = TestHarness::with_server().await;
    let data = h.write_video("movie.mp4", 1000);

    let client = reqwest::Client::new();
    let resp = client
        .get(format!("http://{addr}/videos/movie.mp4"))
        .header(RANGE, "bytes=900-")
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 206);
    assert_eq!(resp.headers()["content-range"], "bytes 900-999/1000");
    assert_eq!(resp.bytes().await.unwrap().as_ref(), &data[900..]);
}

#[tokio::test]
async fn single_byte_range() {
    let (h, addr) = TestHarness::with_server().await;
    h.write_video("movie.mp4", 1000);

    let client = reqwest::Client::new();
    let resp = client
        .get(format!("http://{addr}/videos/movie.mp4"))
        .header(RANGE, "bytes=999-999")
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 206);
    assert_eq!(resp.headers()["content-range"], "bytes 999-999/1000");
    let body = resp.bytes().await.unwrap();
    assert_eq!(body.as_ref(), &pattern(1000)[999..]);
}

#[tokio::test]
async fn unsatisfiable_range_is_416() {
    let (h, addr) = TestHarness::with_server().await;
    h.write_video("movie.mp4", 1000);

    let client = reqwest::Client::new();
    for range in ["bytes=1000-1001", "bytes=500-2000", "bytes=200-100", "bytes=-500"] {
        let resp = client
            .get(format!("http://{addr}/videos/movie.mp4"))
            .header(RANGE, range)
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), 416, "range {range}");
        assert_eq!(resp.headers()["content-range"], "bytes */1000");
        assert!(resp.bytes().await.unwrap().is_empty());
    }

    assert_eq!(h.ctx.active_streams.count(), 0);
}

#[tokio::test]
async fn head_reports_headers_without_body() {
    let (h, addr) = TestHarness::with_server().await;
    h.write_video("movie.mkv", 2048);

    let client = reqwest::Client::new();
    let resp = client
        .head(format!("http://{addr}/videos/movie.mkv"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    assert_eq!(resp.headers()["content-type"], "video/x-matroska");
    assert_eq!(resp.headers().get("content-length").unwrap(), "2048");
    assert_eq!(resp.headers()["accept-ranges"], "bytes");
    assert!(resp.headers().contains_key("last-modified"));
}

#[tokio::test]
async fn missing_file_is_404() {
    let (_h, addr) = TestHarness::with_server().await;

    let resp = reqwest::get(format!("http://{addr}/videos/nope.mp4"))
        .await
        .unwrap();
    assert_eq!(resp.status(), 404);

    let client = reqwest::Client::new();
    let resp = client
        .head(format!("http://{addr}/videos/nope.mp4"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 404);
}

#[tokio::test]
async fn unsupported_extension_is_not_streamed() {
    let (h, addr) = TestHarness::with_server().await;
    h.write_file("notes.txt", b"hello");

    let resp = reqwest::get(format!("http://{addr}/videos/notes.txt"))
        .await
        .unwrap();
    assert_eq!(resp.status(), 404);
}

#[tokio::test]
async fn encoded_traversal_is_rejected() {
    let (h, addr) = TestHarness::with_server().await;
    h.write_video("movie.mp4", 16);

    let resp = reqwest::get(format!("http://{addr}/videos/..%2F..%2Fetc%2Fpasswd.mp4"))
        .await
        .unwrap();
    assert_eq!(resp.status(), 404);
}

#[tokio::test]
async fn filenames_with_spaces_stream() {
    let (h, addr) = TestHarness::with_server().await;
    let data = h.write_video("my holiday clip.mp4", 300);

    let resp = reqwest::get(format!("http://{addr}/videos/my%20holiday%20clip.mp4"))
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    assert_eq!(resp.bytes().await.unwrap().as_ref(), data.as_slice());
}

#[tokio::test]
async fn completed_stream_releases_counter() {
    let (h, addr) = TestHarness::with_server().await;
    h.write_video("movie.mp4", 10_000);

    let resp = reqwest::get(format!("http://{addr}/videos/movie.mp4"))
        .await
        .unwrap();
    let body = resp.bytes().await.unwrap();
    assert_eq!(body.len(), 10_000);

    // The guard drops once hyper finishes writing the body.
    for _ in 0..50 {
        if h.ctx.active_streams.count() == 0 {
            break;
        }
        tokio::time::sleep(std::time::Duration::from_millis(10)).await;
    }
    assert_eq!(h.ctx.active_streams.count(), 0);
}
