//! End-to-end tests of the HTTP surface through the assembled router.

use std::sync::Arc;

use anyhow::Result;
use axum::{
    body::Body,
    http::{Method, Request, StatusCode, header},
};
use serde_json::json;
use tower::ServiceExt;
use uuid::Uuid;

#[path = "test_utils/mod.rs"]
mod test_utils;
use test_utils::{
    OPERATOR_TOKEN, ScriptedModel, api_request, create_test_material, create_test_tenant,
    operator_request, read_json, setup_test_db, test_app, test_state, text_reply,
};
use zycle::server::create_app;

#[tokio::test]
async fn root_and_health_need_no_credentials() -> Result<()> {
    let (app, _db) = test_app().await?;

    let root = app
        .clone()
        .oneshot(Request::get("/").body(Body::empty())?)
        .await?;
    assert_eq!(root.status(), StatusCode::OK);
    assert_eq!(read_json(root).await["service"], "zycle-api");

    let health = app
        .oneshot(Request::get("/healthz").body(Body::empty())?)
        .await?;
    assert_eq!(health.status(), StatusCode::OK);
    assert_eq!(read_json(health).await["database"], "ok");
    Ok(())
}

#[tokio::test]
async fn api_rejects_missing_or_wrong_credentials() -> Result<()> {
    let (app, _db) = test_app().await?;
    let tenant = Uuid::new_v4();

    let missing = app
        .clone()
        .oneshot(
            Request::get("/api/v1/materials")
                .header("X-Tenant-Id", tenant.to_string())
                .header("X-Trace-Id", "trace-401")
                .body(Body::empty())?,
        )
        .await?;
    assert_eq!(missing.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(
        missing.headers().get(header::CONTENT_TYPE).unwrap(),
        "application/problem+json"
    );
    assert_eq!(missing.headers().get("x-trace-id").unwrap(), "trace-401");
    let body = read_json(missing).await;
    assert_eq!(body["code"], "UNAUTHORIZED");
    assert_eq!(body["trace_id"], "trace-401");

    let wrong = app
        .clone()
        .oneshot(
            Request::get("/api/v1/materials")
                .header(header::AUTHORIZATION, "Bearer not-the-token")
                .header("X-Tenant-Id", tenant.to_string())
                .body(Body::empty())?,
        )
        .await?;
    assert_eq!(wrong.status(), StatusCode::UNAUTHORIZED);

    let no_tenant = app
        .oneshot(
            Request::get("/api/v1/materials")
                .header(header::AUTHORIZATION, format!("Bearer {OPERATOR_TOKEN}"))
                .body(Body::empty())?,
        )
        .await?;
    assert_eq!(no_tenant.status(), StatusCode::BAD_REQUEST);
    assert_eq!(read_json(no_tenant).await["code"], "VALIDATION_FAILED");
    Ok(())
}

#[tokio::test]
async fn tenant_registration_returns_location() -> Result<()> {
    let (app, _db) = test_app().await?;

    let created = app
        .clone()
        .oneshot(operator_request(
            Method::POST,
            "/api/v1/tenants",
            Some(json!({ "name": "  Reciclajes del Valle  " })),
        ))
        .await?;
    assert_eq!(created.status(), StatusCode::CREATED);
    let location = created
        .headers()
        .get(header::LOCATION)
        .unwrap()
        .to_str()?
        .to_string();
    let body = read_json(created).await;
    assert_eq!(body["name"], "Reciclajes del Valle");
    assert_eq!(location, format!("/api/v1/tenants/{}", body["id"].as_str().unwrap()));

    let fetched = app
        .clone()
        .oneshot(operator_request(Method::GET, &location, None))
        .await?;
    assert_eq!(fetched.status(), StatusCode::OK);

    let blank = app
        .oneshot(operator_request(
            Method::POST,
            "/api/v1/tenants",
            Some(json!({ "name": "   " })),
        ))
        .await?;
    assert_eq!(blank.status(), StatusCode::BAD_REQUEST);
    Ok(())
}

#[tokio::test]
async fn unregistered_company_cannot_write() -> Result<()> {
    let (app, _db) = test_app().await?;
    let unknown = Uuid::new_v4();

    let material = app
        .clone()
        .oneshot(api_request(
            Method::POST,
            "/api/v1/materials",
            unknown,
            Some(json!({
                "name": "Cartón",
                "purchase_price": 300.0,
                "sale_price": 450.0,
                "stock": 0.0
            })),
        ))
        .await?;
    assert_eq!(material.status(), StatusCode::NOT_FOUND);
    let body = read_json(material).await;
    assert_eq!(body["code"], "NOT_FOUND");
    assert_eq!(body["details"]["resource"], "Tenant");

    let profile = app
        .oneshot(api_request(
            Method::PUT,
            "/api/v1/profile",
            unknown,
            Some(json!({ "company_name": "Reciclajes Fantasma" })),
        ))
        .await?;
    assert_eq!(profile.status(), StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn purchase_invoice_lifecycle() -> Result<()> {
    let (app, db) = test_app().await?;
    let tenant = create_test_tenant(&db, "Reciclajes A").await?;

    let material = app
        .clone()
        .oneshot(api_request(
            Method::POST,
            "/api/v1/materials",
            tenant,
            Some(json!({
                "name": "Chatarra",
                "purchase_price": 800.0,
                "sale_price": 1100.0,
                "stock": 0.0
            })),
        ))
        .await?;
    assert_eq!(material.status(), StatusCode::CREATED);
    let material = read_json(material).await;
    assert_eq!(material["unit"], "kg");
    let material_id = material["id"].as_str().unwrap().to_string();

    let created = app
        .clone()
        .oneshot(api_request(
            Method::POST,
            "/api/v1/purchase-invoices",
            tenant,
            Some(json!({
                "invoice_number": "C-001",
                "counterparty": "Chatarrería El Sol",
                "lines": [{ "material_id": material_id, "quantity": 12.5 }]
            })),
        ))
        .await?;
    assert_eq!(created.status(), StatusCode::CREATED);
    let invoice = read_json(created).await;
    assert_eq!(invoice["status"], "pending");
    assert_eq!(invoice["total"], 10000.0);
    assert_eq!(invoice["lines"][0]["material_name"], "Chatarra");
    assert_eq!(invoice["lines"][0]["unit_price"], 800.0);
    let status_uri = format!(
        "/api/v1/purchase-invoices/{}/status",
        invoice["id"].as_str().unwrap()
    );

    let paid = app
        .clone()
        .oneshot(api_request(
            Method::PATCH,
            &status_uri,
            tenant,
            Some(json!({ "status": "paid" })),
        ))
        .await?;
    assert_eq!(paid.status(), StatusCode::OK);
    assert_eq!(read_json(paid).await["status"], "paid");

    let back_to_pending = app
        .clone()
        .oneshot(api_request(
            Method::PATCH,
            &status_uri,
            tenant,
            Some(json!({ "status": "pending" })),
        ))
        .await?;
    assert_eq!(back_to_pending.status(), StatusCode::BAD_REQUEST);

    let empty_lines = app
        .clone()
        .oneshot(api_request(
            Method::POST,
            "/api/v1/purchase-invoices",
            tenant,
            Some(json!({
                "invoice_number": "C-002",
                "counterparty": "Chatarrería El Sol",
                "lines": []
            })),
        ))
        .await?;
    assert_eq!(empty_lines.status(), StatusCode::BAD_REQUEST);

    let listed = app
        .oneshot(api_request(
            Method::GET,
            "/api/v1/purchase-invoices",
            tenant,
            None,
        ))
        .await?;
    let listed = read_json(listed).await;
    assert_eq!(listed["invoices"].as_array().map(Vec::len), Some(1));
    Ok(())
}

#[tokio::test]
async fn sale_total_beyond_f64_range_is_a_validation_error() -> Result<()> {
    let (app, db) = test_app().await?;
    let tenant = create_test_tenant(&db, "Reciclajes A").await?;

    let material = app
        .clone()
        .oneshot(api_request(
            Method::POST,
            "/api/v1/materials",
            tenant,
            Some(json!({
                "name": "Cobre",
                "purchase_price": 1.0e200,
                "sale_price": 1.0e200,
                "stock": 0.0
            })),
        ))
        .await?;
    assert_eq!(material.status(), StatusCode::CREATED);
    let material_id = read_json(material).await["id"].as_str().unwrap().to_string();

    let sale = app
        .clone()
        .oneshot(api_request(
            Method::POST,
            "/api/v1/sale-invoices",
            tenant,
            Some(json!({
                "invoice_number": "V-001",
                "counterparty": "Fundición Andina",
                "lines": [{ "material_id": material_id, "quantity": 1.0e200 }]
            })),
        ))
        .await?;
    assert_eq!(sale.status(), StatusCode::BAD_REQUEST);

    let listed = app
        .oneshot(api_request(Method::GET, "/api/v1/sale-invoices", tenant, None))
        .await?;
    assert_eq!(listed.status(), StatusCode::OK);
    assert_eq!(
        read_json(listed).await["invoices"].as_array().map(Vec::len),
        Some(0)
    );
    Ok(())
}

#[tokio::test]
async fn loan_payments_reduce_balance_and_refuse_overpayment() -> Result<()> {
    let (app, db) = test_app().await?;
    let tenant = create_test_tenant(&db, "Reciclajes A").await?;

    let collaborator = app
        .clone()
        .oneshot(api_request(
            Method::POST,
            "/api/v1/collaborators",
            tenant,
            Some(json!({
                "full_name": "Marta Gómez",
                "document_id": "52000111",
                "role": "Clasificadora"
            })),
        ))
        .await?;
    assert_eq!(collaborator.status(), StatusCode::CREATED);
    let collaborator_id = read_json(collaborator).await["id"].clone();

    let loan = app
        .clone()
        .oneshot(api_request(
            Method::POST,
            "/api/v1/loans",
            tenant,
            Some(json!({ "collaborator_id": collaborator_id, "amount": 100000.0 })),
        ))
        .await?;
    assert_eq!(loan.status(), StatusCode::CREATED);
    let loan = read_json(loan).await;
    assert_eq!(loan["balance"], 100000.0);
    let payments_uri = format!("/api/v1/loans/{}/payments", loan["id"].as_str().unwrap());

    let partial = app
        .clone()
        .oneshot(api_request(
            Method::POST,
            &payments_uri,
            tenant,
            Some(json!({ "amount": 60000.0 })),
        ))
        .await?;
    assert_eq!(partial.status(), StatusCode::CREATED);
    let partial = read_json(partial).await;
    assert_eq!(partial["loan"]["balance"], 40000.0);
    assert_eq!(partial["loan"]["status"], "active");

    let overpayment = app
        .clone()
        .oneshot(api_request(
            Method::POST,
            &payments_uri,
            tenant,
            Some(json!({ "amount": 50000.0 })),
        ))
        .await?;
    assert_eq!(overpayment.status(), StatusCode::BAD_REQUEST);

    let settle = app
        .clone()
        .oneshot(api_request(
            Method::POST,
            &payments_uri,
            tenant,
            Some(json!({ "amount": 40000.0 })),
        ))
        .await?;
    let settle = read_json(settle).await;
    assert_eq!(settle["loan"]["balance"], 0.0);
    assert_eq!(settle["loan"]["status"], "paid");

    let payments = app
        .oneshot(api_request(Method::GET, &payments_uri, tenant, None))
        .await?;
    let payments = read_json(payments).await;
    assert_eq!(payments["payments"].as_array().map(Vec::len), Some(2));
    Ok(())
}

#[tokio::test]
async fn modules_report_placeholders() -> Result<()> {
    let (app, db) = test_app().await?;
    let tenant = create_test_tenant(&db, "Reciclajes A").await?;

    let response = app
        .oneshot(api_request(Method::GET, "/api/v1/modules", tenant, None))
        .await?;
    assert_eq!(response.status(), StatusCode::OK);

    let body = read_json(response).await;
    let coming_soon: Vec<&str> = body["modules"]
        .as_array()
        .unwrap()
        .iter()
        .filter(|module| module["status"] == "coming_soon")
        .filter_map(|module| module["key"].as_str())
        .collect();
    assert_eq!(coming_soon, vec!["cash_box", "attendance", "payslips"]);
    Ok(())
}

#[tokio::test]
async fn pqs_validates_fields_before_calling_the_model() -> Result<()> {
    let (app, db) = test_app().await?;
    let tenant = create_test_tenant(&db, "Reciclajes A").await?;

    let invalid = app
        .clone()
        .oneshot(api_request(
            Method::POST,
            "/api/v1/pqs",
            tenant,
            Some(json!({
                "name": "",
                "email": "ana.example.com",
                "subject": "Recolección",
                "message": "El camión no pasó.",
                "company_email": "pqs@zycle.co"
            })),
        ))
        .await?;
    assert_eq!(invalid.status(), StatusCode::BAD_REQUEST);
    let details = read_json(invalid).await["details"].clone();
    assert!(details.get("name").is_some());
    assert!(details.get("email").is_some());
    assert!(details.get("subject").is_none());

    let unconfigured = app
        .oneshot(api_request(
            Method::POST,
            "/api/v1/pqs",
            tenant,
            Some(json!({
                "name": "Ana",
                "email": "ana@example.com",
                "subject": "Recolección",
                "message": "El camión no pasó.",
                "company_email": "pqs@zycle.co"
            })),
        ))
        .await?;
    assert_eq!(unconfigured.status(), StatusCode::SERVICE_UNAVAILABLE);
    Ok(())
}

#[tokio::test]
async fn zia_answers_for_the_header_tenant() -> Result<()> {
    let db = setup_test_db().await?;
    let tenant = create_test_tenant(&db, "Reciclajes A").await?;
    create_test_material(&db, tenant, "PET", 75.0).await?;

    let model = Arc::new(ScriptedModel::new(vec![text_reply("Tienes 75 kg de PET.")]));
    let app = create_app(test_state(db, model.clone()));

    let empty = app
        .clone()
        .oneshot(api_request(
            Method::POST,
            "/api/v1/assistant/zia",
            tenant,
            Some(json!({ "query": "  " })),
        ))
        .await?;
    assert_eq!(empty.status(), StatusCode::BAD_REQUEST);
    assert_eq!(model.call_count(), 0);

    let answered = app
        .oneshot(api_request(
            Method::POST,
            "/api/v1/assistant/zia",
            tenant,
            Some(json!({ "query": "¿Cuánto PET tengo?" })),
        ))
        .await?;
    assert_eq!(answered.status(), StatusCode::OK);
    assert_eq!(
        read_json(answered).await,
        json!({ "response": "Tienes 75 kg de PET." })
    );
    assert_eq!(model.call_count(), 1);
    Ok(())
}

#[tokio::test]
async fn openapi_document_is_served() -> Result<()> {
    let (app, _db) = test_app().await?;

    let response = app
        .oneshot(Request::get("/openapi.json").body(Body::empty())?)
        .await?;
    assert_eq!(response.status(), StatusCode::OK);

    let doc = read_json(response).await;
    assert_eq!(doc["info"]["title"], "ZYCLE API");
    assert!(doc["paths"]["/api/v1/purchase-invoices"]["post"].is_object());
    Ok(())
}
