use std::{
    fs,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    },
    time::Duration,
};

use anyhow::Result;
use axum::{
    body::Bytes,
    extract::State,
    http::{header::CONTENT_TYPE, HeaderMap, StatusCode},
    routing::post,
    Json, Router,
};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde_json::{json, Value};
use tempfile::tempdir;

use crate::common::{
    call, closed_port_url, connect, error_value, shutdown, spawn_upstream, structured_of,
    test_config, text_of, HitCounter,
};

const TABLE_MARKDOWN: &str = "# Invoice 42\n\n| Item | Qty |\n|------|-----|\n| Bolt | 3 |\n";
const PNG_BYTES: &[u8] = b"\x89PNG\r\n\x1a\nfake-image-body";

/// Fake OCR microservice: echoes the URL into Markdown, slows down `slow` URLs,
/// fails `broken` URLs with 500 and reports `missing` URLs as download errors.
async fn fake_ocr(State(hits): State<HitCounter>, Json(body): Json<Value>) -> (StatusCode, Json<Value>) {
    hits.hit();
    let url = body["urls"][0].as_str().unwrap_or_default().to_string();
    if url.contains("slow") {
        tokio::time::sleep(Duration::from_millis(300)).await;
    }
    if url.contains("broken") {
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "detail": "model crashed" })),
        );
    }
    let result = if url.contains("missing") {
        json!({
            "url": url,
            "status": "error",
            "error": "HTTP 404 when downloading document",
            "error_type": "download_error"
        })
    } else if url.ends_with("invoice.png") {
        json!({ "url": url, "status": "success", "text": TABLE_MARKDOWN, "pages": 1 })
    } else {
        json!({ "url": url, "status": "success", "text": format!("text for {url}"), "pages": 1 })
    };
    (
        StatusCode::OK,
        Json(json!({ "results": [result], "total_processed": 1 })),
    )
}

async fn fake_upload(
    State(hits): State<HitCounter>,
    headers: HeaderMap,
    body: Bytes,
) -> (StatusCode, Json<Value>) {
    hits.hit();
    let content_type = headers
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default();
    let body = String::from_utf8_lossy(&body);
    if !content_type.starts_with("multipart/form-data")
        || !body.contains("name=\"file\"")
        || !body.contains("filename=\"scan.png\"")
        || !body.contains("fake-image-body")
    {
        return (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(json!({ "detail": "expected a multipart `file` part" })),
        );
    }
    (
        StatusCode::OK,
        Json(json!({
            "status": "success",
            "text": "## Scanned page\n\nHello from the upload.",
            "pages": 1,
            "filename": "scan.png"
        })),
    )
}

async fn ocr_backend() -> Result<(String, HitCounter)> {
    let hits = HitCounter::default();
    let router = Router::new()
        .route("/ocr", post(fake_ocr))
        .route("/ocr_upload", post(fake_upload))
        .with_state(hits.clone());
    let (url, _task) = spawn_upstream(router).await?;
    Ok((url, hits))
}

#[tokio::test]
async fn ocr_document_returns_service_markdown_verbatim() -> Result<()> {
    let (ocr_url, hits) = ocr_backend().await?;
    let mut config = test_config(&closed_port_url().await?)?;
    config.ocr.service_url = ocr_url;
    let (client, server_task) = connect(config).await?;

    let result = call(
        &client,
        "ocr_document",
        json!({ "url": "https://docs.example.com/invoice.png" }),
    )
    .await?;
    shutdown(client, server_task).await;

    assert_eq!(text_of(&result)?, TABLE_MARKDOWN);
    assert_eq!(hits.count(), 1);
    Ok(())
}

#[tokio::test]
async fn ocr_document_rejects_bad_urls_without_calling_the_service() -> Result<()> {
    let (ocr_url, hits) = ocr_backend().await?;
    let mut config = test_config(&closed_port_url().await?)?;
    config.ocr.service_url = ocr_url;
    let (client, server_task) = connect(config).await?;

    let error = error_value(
        call(&client, "ocr_document", json!({ "url": "ftp://example.com/a.png" })).await,
    )?;
    shutdown(client, server_task).await;

    assert_eq!(error["code"], json!(-32602));
    assert_eq!(error["data"]["code"], json!("invalid_url"));
    assert_eq!(hits.count(), 0);
    Ok(())
}

#[tokio::test]
async fn ocr_document_surfaces_service_reported_failures() -> Result<()> {
    let (ocr_url, _hits) = ocr_backend().await?;
    let mut config = test_config(&closed_port_url().await?)?;
    config.ocr.service_url = ocr_url;
    let (client, server_task) = connect(config).await?;

    let error = error_value(
        call(
            &client,
            "ocr_document",
            json!({ "url": "https://docs.example.com/missing.pdf" }),
        )
        .await,
    )?;
    shutdown(client, server_task).await;

    assert_eq!(error["data"]["code"], json!("ocr_failed"));
    assert_eq!(error["data"]["details"]["error_type"], json!("download_error"));
    assert!(error["message"]
        .as_str()
        .unwrap_or_default()
        .contains("HTTP 404 when downloading document"));
    Ok(())
}

#[tokio::test]
async fn ocr_document_reports_unreachable_service_as_retryable() -> Result<()> {
    let config = test_config(&closed_port_url().await?)?;
    let (client, server_task) = connect(config).await?;

    let error = error_value(
        call(
            &client,
            "ocr_document",
            json!({ "url": "https://docs.example.com/a.png" }),
        )
        .await,
    )?;
    shutdown(client, server_task).await;

    assert_eq!(error["data"]["code"], json!("upstream_failed"));
    assert_eq!(error["data"]["retryable"], json!(true));
    assert_eq!(error["data"]["details"]["service"], json!("ocr_service"));
    Ok(())
}

#[tokio::test]
async fn batch_results_follow_input_order_with_per_item_failures() -> Result<()> {
    let (ocr_url, hits) = ocr_backend().await?;
    let mut config = test_config(&closed_port_url().await?)?;
    config.ocr.service_url = ocr_url;
    config.ocr.max_batch_size = 10;
    let (client, server_task) = connect(config).await?;

    let urls = [
        "https://docs.example.com/slow-first.png",
        "https://docs.example.com/second.png",
        "not a url",
        "https://docs.example.com/broken.pdf",
        "https://docs.example.com/missing.tif",
    ];
    let result = call(&client, "ocr_batch_documents", json!({ "urls": urls })).await?;
    shutdown(client, server_task).await;

    let payload = structured_of(result)?;
    let results = payload["results"].as_array().cloned().unwrap_or_default();
    let returned: Vec<&str> = results
        .iter()
        .map(|item| item["url"].as_str().unwrap_or_default())
        .collect();
    assert_eq!(returned, urls);

    assert_eq!(results[0]["status"], json!("success"));
    assert_eq!(
        results[0]["text"],
        json!("text for https://docs.example.com/slow-first.png")
    );
    assert_eq!(results[1]["status"], json!("success"));
    assert_eq!(results[2]["error_type"], json!("invalid_url"));
    assert_eq!(results[3]["error_type"], json!("upstream_error"));
    assert_eq!(results[4]["error_type"], json!("download_error"));

    assert_eq!(payload["total_processed"], json!(5));
    assert_eq!(payload["successful"], json!(2));
    assert_eq!(payload["failed"], json!(3));
    // The malformed entry never reaches the service.
    assert_eq!(hits.count(), 4);
    Ok(())
}

#[tokio::test]
async fn batch_over_the_limit_is_rejected_before_any_request() -> Result<()> {
    let (ocr_url, hits) = ocr_backend().await?;
    let mut config = test_config(&closed_port_url().await?)?;
    config.ocr.service_url = ocr_url;
    config.ocr.max_batch_size = 10;
    let (client, server_task) = connect(config).await?;

    let urls: Vec<String> = (0..11)
        .map(|index| format!("https://docs.example.com/{index}.png"))
        .collect();
    let too_many = error_value(call(&client, "ocr_batch_documents", json!({ "urls": urls })).await)?;
    let empty = error_value(call(&client, "ocr_batch_documents", json!({ "urls": [] })).await)?;
    shutdown(client, server_task).await;

    assert_eq!(too_many["data"]["code"], json!("invalid_batch"));
    assert_eq!(too_many["data"]["details"], json!({ "count": 11, "max": 10 }));
    assert_eq!(empty["data"]["details"], json!({ "count": 0 }));
    assert_eq!(hits.count(), 0);
    Ok(())
}

#[derive(Clone, Default)]
struct InFlightGauge {
    current: Arc<AtomicUsize>,
    peak: Arc<AtomicUsize>,
}

async fn gauged_ocr(State(gauge): State<InFlightGauge>, Json(body): Json<Value>) -> Json<Value> {
    let now = gauge.current.fetch_add(1, Ordering::SeqCst) + 1;
    gauge.peak.fetch_max(now, Ordering::SeqCst);
    tokio::time::sleep(Duration::from_millis(200)).await;
    gauge.current.fetch_sub(1, Ordering::SeqCst);

    let url = body["urls"][0].as_str().unwrap_or_default();
    Json(json!({ "results": [{ "url": url, "status": "success", "text": "ok" }] }))
}

#[tokio::test]
async fn batch_runs_up_to_the_configured_limit_concurrently() -> Result<()> {
    let gauge = InFlightGauge::default();
    let router = Router::new()
        .route("/ocr", post(gauged_ocr))
        .with_state(gauge.clone());
    let (ocr_url, _task) = spawn_upstream(router).await?;

    let mut config = test_config(&closed_port_url().await?)?;
    config.ocr.service_url = ocr_url;
    config.ocr.max_batch_size = 3;
    let (client, server_task) = connect(config).await?;

    let urls: Vec<String> = (0..3)
        .map(|index| format!("https://docs.example.com/page-{index}.png"))
        .collect();
    let result = call(&client, "ocr_batch_documents", json!({ "urls": urls })).await?;
    let too_many = error_value(
        call(
            &client,
            "ocr_batch_documents",
            json!({ "urls": [&urls[0], &urls[1], &urls[2], &urls[0]] }),
        )
        .await,
    )?;
    shutdown(client, server_task).await;

    let payload = structured_of(result)?;
    assert_eq!(payload["successful"], json!(3));
    assert_eq!(gauge.peak.load(Ordering::SeqCst), 3);
    assert_eq!(too_many["data"]["details"], json!({ "count": 4, "max": 3 }));
    Ok(())
}

#[tokio::test]
async fn uploaded_document_is_sent_as_multipart() -> Result<()> {
    let (ocr_url, hits) = ocr_backend().await?;
    let mut config = test_config(&closed_port_url().await?)?;
    config.ocr.service_url = ocr_url;
    let (client, server_task) = connect(config).await?;

    let dir = tempdir()?;
    let path = dir.path().join("scan.png");
    fs::write(&path, PNG_BYTES)?;

    let result = call(
        &client,
        "ocr_uploaded_document",
        json!({ "file_path": path.to_string_lossy() }),
    )
    .await?;
    shutdown(client, server_task).await;

    let payload = structured_of(result)?;
    assert_eq!(payload["filename"], json!("scan.png"));
    assert_eq!(payload["file_path"], json!(path.to_string_lossy()));
    assert_eq!(
        payload["text"],
        json!("## Scanned page\n\nHello from the upload.")
    );
    assert_eq!(hits.count(), 1);
    Ok(())
}

#[tokio::test]
async fn nonexistent_local_file_never_reaches_the_service() -> Result<()> {
    let (ocr_url, hits) = ocr_backend().await?;
    let mut config = test_config(&closed_port_url().await?)?;
    config.ocr.service_url = ocr_url;
    let (client, server_task) = connect(config).await?;

    let dir = tempdir()?;
    let missing = dir.path().join("nope.png");
    let error = error_value(
        call(
            &client,
            "ocr_uploaded_document",
            json!({ "file_path": missing.to_string_lossy() }),
        )
        .await,
    )?;
    shutdown(client, server_task).await;

    assert_eq!(error["code"], json!(-32602));
    assert_eq!(error["data"]["code"], json!("invalid_document"));
    assert_eq!(error["data"]["details"]["reason"], json!("not_found"));
    assert_eq!(hits.count(), 0);
    Ok(())
}

#[tokio::test]
async fn local_glm_sends_base64_image_to_ollama() -> Result<()> {
    let hits = HitCounter::default();
    let router = Router::new()
        .route(
            "/api/generate",
            post(|State(hits): State<HitCounter>, Json(body): Json<Value>| async move {
                hits.hit();
                let expected = STANDARD.encode(PNG_BYTES);
                if body["images"][0] != json!(expected)
                    || body["stream"] != json!(false)
                    || body["model"] != json!("glm-ocr")
                    || body["prompt"] != json!("Text Recognition:")
                {
                    return (StatusCode::BAD_REQUEST, Json(json!({ "error": "bad body" })));
                }
                (
                    StatusCode::OK,
                    Json(json!({
                        "model": "glm-ocr",
                        "response": "\n  # Receipt\n\nTotal: 12.00  \n",
                        "done": true
                    })),
                )
            }),
        )
        .with_state(hits.clone());
    let (ollama_url, _task) = spawn_upstream(router).await?;

    let mut config = test_config(&closed_port_url().await?)?;
    config.ollama.base_url = ollama_url;
    config.ollama.model = "glm-ocr".into();
    let (client, server_task) = connect(config).await?;

    let dir = tempdir()?;
    let path = dir.path().join("receipt.png");
    fs::write(&path, PNG_BYTES)?;

    let result = call(
        &client,
        "ocr_local_glm",
        json!({ "file_path": path.to_string_lossy() }),
    )
    .await?;
    shutdown(client, server_task).await;

    assert_eq!(text_of(&result)?, "# Receipt\n\nTotal: 12.00");
    assert_eq!(hits.count(), 1);
    Ok(())
}

#[tokio::test]
async fn local_glm_only_sends_png_or_jpeg() -> Result<()> {
    let hits = HitCounter::default();
    let router = Router::new()
        .route(
            "/api/generate",
            post(|State(hits): State<HitCounter>| async move {
                hits.hit();
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "error": "illegal base64 data" })),
                )
            }),
        )
        .with_state(hits.clone());
    let (ollama_url, _task) = spawn_upstream(router).await?;

    let mut config = test_config(&closed_port_url().await?)?;
    config.ollama.base_url = ollama_url;
    let (client, server_task) = connect(config).await?;

    let dir = tempdir()?;
    let mut reasons = Vec::new();
    for name in ["notes.txt", "invoice.pdf", "scan.tiff"] {
        let path = dir.path().join(name);
        fs::write(&path, b"not an inline image")?;
        let error = error_value(
            call(
                &client,
                "ocr_local_glm",
                json!({ "file_path": path.to_string_lossy() }),
            )
            .await,
        )?;
        reasons.push(error["data"]["details"]["reason"].clone());
    }
    shutdown(client, server_task).await;

    assert!(reasons.iter().all(|reason| reason == "unsupported_type"), "{reasons:?}");
    assert_eq!(hits.count(), 0);
    Ok(())
}

#[tokio::test]
async fn complex_document_joins_paddle_text_lines() -> Result<()> {
    let router = Router::new().route(
        "/predict/ocr_system",
        post(|Json(body): Json<Value>| async move {
            let has_image = body["images"][0]
                .as_str()
                .is_some_and(|image| image == STANDARD.encode(PNG_BYTES));
            if !has_image {
                return Json(json!({ "status": "101", "msg": "no image" }));
            }
            Json(json!({
                "msg": "",
                "status": "000",
                "results": [[
                    { "text": "Quarterly report", "confidence": 0.99 },
                    { "text": "Revenue | 1.2M", "confidence": 0.95 }
                ]]
            }))
        }),
    );
    let (paddle_base, _task) = spawn_upstream(router).await?;

    let mut config = test_config(&closed_port_url().await?)?;
    config.paddle_serving.url = format!("{paddle_base}/predict/ocr_system");
    let (client, server_task) = connect(config).await?;

    let dir = tempdir()?;
    let path = dir.path().join("report.png");
    fs::write(&path, PNG_BYTES)?;

    let result = call(
        &client,
        "analyze_complex_document",
        json!({ "image_path": path.to_string_lossy() }),
    )
    .await?;
    shutdown(client, server_task).await;

    assert_eq!(text_of(&result)?, "Quarterly report\nRevenue | 1.2M");
    Ok(())
}
