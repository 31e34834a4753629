//! Server API tests

use super::*;
use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use chrono::NaiveDate;
use http_body_util::BodyExt;
use tempfile::TempDir;
use tower::ServiceExt;

use tally_core::extract::{ExtractorClient, MockExtractor};
use tally_core::models::{Category, ExtractedTransaction};
use tally_core::time::today_reference;

const BOUNDARY: &str = "tally-test-boundary";

fn setup_test_app(extractor: Option<ExtractorClient>) -> (Router, TempDir) {
    // The TempDir must outlive the app so the ledger file stays around
    let dir = TempDir::new().unwrap();
    let ledger = Ledger::open(dir.path().join("ledger.json")).unwrap();
    let app = create_router_with_options(ledger, ServerConfig::default(), extractor);
    (app, dir)
}

async fn get_body_json(response: axum::response::Response) -> serde_json::Value {
    let body = response.into_body();
    let bytes = body.collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn candidate(
    date: &str,
    description: &str,
    amount: f64,
    merchant: &str,
    category: Category,
    confidence: f64,
) -> ExtractedTransaction {
    ExtractedTransaction {
        date: date.parse::<NaiveDate>().unwrap(),
        description: description.to_string(),
        amount,
        merchant_canonical: merchant.to_string(),
        category,
        confidence,
    }
}

fn multipart_body(files: &[(&str, &[u8])]) -> Vec<u8> {
    let mut body = Vec::new();
    for (filename, data) in files {
        body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
        body.extend_from_slice(
            format!(
                "Content-Disposition: form-data; name=\"files\"; filename=\"{}\"\r\n\
                 Content-Type: application/pdf\r\n\r\n",
                filename
            )
            .as_bytes(),
        );
        body.extend_from_slice(data);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());
    body
}

fn upload_request(files: &[(&str, &[u8])]) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/upload")
        .header(
            "content-type",
            format!("multipart/form-data; boundary={}", BOUNDARY),
        )
        .body(Body::from(multipart_body(files)))
        .unwrap()
}

fn get_request(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

async fn upload_pdfs(app: &Router, files: &[(&str, &[u8])]) -> serde_json::Value {
    let response = app.clone().oneshot(upload_request(files)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    get_body_json(response).await
}

// ========== Upload Tests ==========

#[tokio::test]
async fn test_upload_without_credentials_returns_500() {
    let (app, _dir) = setup_test_app(None);

    let response = app
        .oneshot(upload_request(&[("jan.pdf", b"%PDF-1.4")]))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let json = get_body_json(response).await;
    assert!(json["error"]
        .as_str()
        .unwrap()
        .contains("credentials not configured"));
}

#[tokio::test]
async fn test_upload_success() {
    let extractor = ExtractorClient::Mock(MockExtractor::with_transactions(vec![
        candidate("2024-01-15", "SALARY", 5000.0, "Acme", Category::Income, 0.95),
        candidate(
            "2024-01-16",
            "GROCER MART",
            -80.0,
            "Grocer Mart",
            Category::FoodDining,
            0.9,
        ),
    ]));
    let (app, _dir) = setup_test_app(Some(extractor));

    let json = upload_pdfs(&app, &[("jan.pdf", b"%PDF-1.4")]).await;
    assert_eq!(json["parsed_count"].as_u64().unwrap(), 2);
    assert!(!json["import_id"].as_str().unwrap().is_empty());

    let response = app.oneshot(get_request("/transactions")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = get_body_json(response).await;
    let transactions = json["transactions"].as_array().unwrap();
    assert_eq!(transactions.len(), 2);
    assert_eq!(transactions[0]["category"], "Income");
}

#[tokio::test]
async fn test_upload_extraction_failure_names_file_and_commits_nothing() {
    let extractor = ExtractorClient::Mock(MockExtractor::failing());
    let (app, _dir) = setup_test_app(Some(extractor));

    let response = app
        .clone()
        .oneshot(upload_request(&[("jan.pdf", b"%PDF-1.4")]))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let json = get_body_json(response).await;
    assert!(json["error"].as_str().unwrap().contains("jan.pdf"));

    // Nothing was committed
    let response = app.oneshot(get_request("/transactions")).await.unwrap();
    let json = get_body_json(response).await;
    assert!(json["transactions"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_upload_skips_unrecognized_file_types() {
    let extractor = ExtractorClient::Mock(MockExtractor::with_transactions(vec![candidate(
        "2024-01-15",
        "SALARY",
        5000.0,
        "Acme",
        Category::Income,
        0.95,
    )]));
    let (app, _dir) = setup_test_app(Some(extractor));

    let json = upload_pdfs(
        &app,
        &[("notes.txt", b"not a statement"), ("jan.pdf", b"%PDF-1.4")],
    )
    .await;

    // Only the pdf contributes; the txt is skipped without error
    assert_eq!(json["parsed_count"].as_u64().unwrap(), 1);
}

#[tokio::test]
async fn test_upload_applies_refinement_and_recurrence() {
    let extractor = ExtractorClient::Mock(MockExtractor::with_transactions(vec![
        // Low-confidence miscategorized coffee: refiner overrides
        candidate(
            "2024-01-05",
            "STARBUCKS RESERVE",
            -6.5,
            "Starbucks",
            Category::Income,
            0.3,
        ),
        // Monthly cadence: gaps 31 and 30 days
        candidate(
            "2024-01-01",
            "NETFLIX.COM",
            -15.99,
            "Netflix",
            Category::BillsUtilities,
            0.9,
        ),
        candidate(
            "2024-02-01",
            "NETFLIX.COM",
            -15.99,
            "Netflix",
            Category::BillsUtilities,
            0.9,
        ),
        candidate(
            "2024-03-02",
            "NETFLIX.COM",
            -15.99,
            "Netflix",
            Category::BillsUtilities,
            0.9,
        ),
    ]));
    let (app, _dir) = setup_test_app(Some(extractor));

    upload_pdfs(&app, &[("q1.pdf", b"%PDF-1.4")]).await;

    let response = app
        .clone()
        .oneshot(get_request("/transactions"))
        .await
        .unwrap();
    let json = get_body_json(response).await;
    let transactions = json["transactions"].as_array().unwrap();
    let starbucks = transactions
        .iter()
        .find(|t| t["merchant_canonical"] == "Starbucks")
        .unwrap();
    assert_eq!(starbucks["category"], "Food & Dining");

    let response = app.oneshot(get_request("/recurring")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = get_body_json(response).await;
    let recurring = json["transactions"].as_array().unwrap();
    assert_eq!(recurring.len(), 3);
    assert!(recurring
        .iter()
        .all(|t| t["merchant_canonical"] == "Netflix"));
}

// ========== Transaction Query Tests ==========

#[tokio::test]
async fn test_transactions_date_range_is_inclusive() {
    let extractor = ExtractorClient::Mock(MockExtractor::with_transactions(vec![
        candidate("2024-01-10", "A", -1.0, "M", Category::FoodDining, 0.9),
        candidate("2024-01-15", "B", -2.0, "M", Category::FoodDining, 0.9),
        candidate("2024-01-18", "C", -3.0, "M", Category::FoodDining, 0.9),
        candidate("2024-01-20", "D", -4.0, "M", Category::FoodDining, 0.9),
        candidate("2024-01-25", "E", -5.0, "M", Category::FoodDining, 0.9),
    ]));
    let (app, _dir) = setup_test_app(Some(extractor));
    upload_pdfs(&app, &[("jan.pdf", b"%PDF-1.4")]).await;

    let response = app
        .clone()
        .oneshot(get_request("/transactions?start=2024-01-15&end=2024-01-20"))
        .await
        .unwrap();
    let json = get_body_json(response).await;
    let descriptions: Vec<&str> = json["transactions"]
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["description"].as_str().unwrap())
        .collect();
    assert_eq!(descriptions, vec!["B", "C", "D"]);

    // Open-ended bounds
    let response = app
        .clone()
        .oneshot(get_request("/transactions?start=2024-01-20"))
        .await
        .unwrap();
    let json = get_body_json(response).await;
    assert_eq!(json["transactions"].as_array().unwrap().len(), 2);

    let response = app
        .oneshot(get_request("/transactions?end=2024-01-10"))
        .await
        .unwrap();
    let json = get_body_json(response).await;
    assert_eq!(json["transactions"].as_array().unwrap().len(), 1);
}

// ========== Summary Tests ==========

#[tokio::test]
async fn test_summary_daily_current_month_only() {
    let today = today_reference();
    let today_key = today.format("%Y-%m-%d").to_string();

    let extractor = ExtractorClient::Mock(MockExtractor::with_transactions(vec![
        candidate(&today_key, "SALARY", 1000.0, "Acme", Category::Income, 0.95),
        candidate(
            &today_key,
            "GROCER",
            -400.0,
            "Grocer",
            Category::FoodDining,
            0.9,
        ),
        // A year earlier: always outside the current month
        candidate(
            &prior_year_date(today),
            "OLD",
            -50.0,
            "Old",
            Category::FoodDining,
            0.9,
        ),
    ]));
    let (app, _dir) = setup_test_app(Some(extractor));
    upload_pdfs(&app, &[("jan.pdf", b"%PDF-1.4")]).await;

    let response = app.oneshot(get_request("/summary/daily")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = get_body_json(response).await;
    let bucket = &json["summary"][&today_key];
    assert_eq!(bucket["income"].as_f64().unwrap(), 1000.0);
    assert_eq!(bucket["spend"].as_f64().unwrap(), 400.0);
    assert_eq!(bucket["net"].as_f64().unwrap(), 600.0);
    // The prior-year transaction is excluded, not just unbucketed
    assert_eq!(json["summary"].as_object().unwrap().len(), 1);
}

/// Mid-month date one year before `today` (mid-month avoids leap-day edges).
fn prior_year_date(today: NaiveDate) -> String {
    use chrono::Datelike;
    format!("{:04}-{:02}-15", today.year() - 1, today.month())
}

#[tokio::test]
async fn test_summary_weekly_and_monthly_keys() {
    let extractor = ExtractorClient::Mock(MockExtractor::with_transactions(vec![
        candidate("2024-01-10", "A", -100.0, "M", Category::FoodDining, 0.9),
        candidate("2024-01-11", "B", 250.0, "Acme", Category::Income, 0.9),
        candidate("2024-02-05", "C", -30.0, "M", Category::FoodDining, 0.9),
    ]));
    let (app, _dir) = setup_test_app(Some(extractor));
    upload_pdfs(&app, &[("q1.pdf", b"%PDF-1.4")]).await;

    let response = app
        .clone()
        .oneshot(get_request("/summary/weekly"))
        .await
        .unwrap();
    let json = get_body_json(response).await;
    // 2024-01-10 and 2024-01-11 fall in ISO week 2024-W02
    let bucket = &json["summary"]["2024-W02"];
    assert_eq!(bucket["income"].as_f64().unwrap(), 250.0);
    assert_eq!(bucket["spend"].as_f64().unwrap(), 100.0);
    assert_eq!(bucket["net"].as_f64().unwrap(), 150.0);

    let response = app.oneshot(get_request("/summary/monthly")).await.unwrap();
    let json = get_body_json(response).await;
    assert_eq!(json["summary"]["2024-01"]["net"].as_f64().unwrap(), 150.0);
    assert_eq!(json["summary"]["2024-02"]["spend"].as_f64().unwrap(), 30.0);
    assert_eq!(json["summary"].as_object().unwrap().len(), 2);
}

#[tokio::test]
async fn test_summary_category_counts() {
    let extractor = ExtractorClient::Mock(MockExtractor::with_transactions(vec![
        candidate("2024-01-10", "A", -10.0, "M", Category::FoodDining, 0.9),
        candidate("2024-01-11", "B", 5.0, "M", Category::FoodDining, 0.9),
        candidate("2024-01-12", "C", -20.0, "T", Category::TransportMobility, 0.9),
    ]));
    let (app, _dir) = setup_test_app(Some(extractor));
    upload_pdfs(&app, &[("jan.pdf", b"%PDF-1.4")]).await;

    let response = app.oneshot(get_request("/summary/category")).await.unwrap();
    let json = get_body_json(response).await;
    let food = &json["summary"]["Food & Dining"];
    // Count is sign-independent
    assert_eq!(food["count"].as_u64().unwrap(), 2);
    assert_eq!(food["income"].as_f64().unwrap(), 5.0);
    assert_eq!(food["spend"].as_f64().unwrap(), 10.0);
    assert_eq!(
        json["summary"]["Transport & Mobility"]["count"]
            .as_u64()
            .unwrap(),
        1
    );
}

#[tokio::test]
async fn test_summaries_are_idempotent_over_unchanged_store() {
    let extractor = ExtractorClient::Mock(MockExtractor::with_transactions(vec![
        candidate("2024-01-10", "A", -100.0, "M", Category::FoodDining, 0.9),
        candidate("2024-02-05", "B", 250.0, "Acme", Category::Income, 0.9),
    ]));
    let (app, _dir) = setup_test_app(Some(extractor));
    upload_pdfs(&app, &[("q1.pdf", b"%PDF-1.4")]).await;

    for uri in [
        "/summary/daily",
        "/summary/weekly",
        "/summary/monthly",
        "/summary/category",
    ] {
        let first = get_body_json(app.clone().oneshot(get_request(uri)).await.unwrap()).await;
        let second = get_body_json(app.clone().oneshot(get_request(uri)).await.unwrap()).await;
        assert_eq!(first, second, "{} not idempotent", uri);
    }
}

#[tokio::test]
async fn test_empty_ledger_summaries_are_empty() {
    let (app, _dir) = setup_test_app(None);

    for uri in [
        "/summary/daily",
        "/summary/weekly",
        "/summary/monthly",
        "/summary/category",
    ] {
        let response = app.clone().oneshot(get_request(uri)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json = get_body_json(response).await;
        assert!(json["summary"].as_object().unwrap().is_empty());
    }
}
