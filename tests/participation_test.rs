// Integration tests for clipper participation and both dashboards

use axum::http::StatusCode;
use serde_json::json;
use uuid::Uuid;

mod common;
use common::{
    create_campaign, register_account, register_and_token, setup_test_app, unique_email,
};

#[tokio::test]
async fn test_join_active_campaign() {
    let app = match setup_test_app().await {
        Some(app) => app,
        None => return,
    };

    let brand_token = register_and_token(&app, &unique_email("host"), "Brand").await;
    let campaign = create_campaign(&app, &brand_token, "Joinable").await;
    let campaign_id = campaign["id"].as_str().unwrap();

    let clipper_token = register_and_token(&app, &unique_email("joiner"), "Clipper").await;

    let response = app
        .post(&format!("/clipper/campaigns/{}/participate", campaign_id))
        .bearer(&clipper_token)
        .send()
        .await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let body: serde_json::Value = response.json().await;
    assert_eq!(
        body["message"].as_str().unwrap(),
        "Successfully participated in campaign"
    );
    assert_eq!(
        body["participation"]["campaign_id"].as_str().unwrap(),
        campaign_id
    );
    assert_eq!(body["participation"]["status"].as_str().unwrap(), "pending");
}

#[tokio::test]
async fn test_duplicate_join_rejected() {
    let app = match setup_test_app().await {
        Some(app) => app,
        None => return,
    };

    let brand_token = register_and_token(&app, &unique_email("dupbrand"), "Brand").await;
    let campaign = create_campaign(&app, &brand_token, "Once only").await;
    let campaign_id = campaign["id"].as_str().unwrap();

    let clipper_token = register_and_token(&app, &unique_email("dupclipper"), "Clipper").await;

    let response = app
        .post(&format!("/clipper/campaigns/{}/participate", campaign_id))
        .bearer(&clipper_token)
        .send()
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = app
        .post(&format!("/clipper/campaigns/{}/participate", campaign_id))
        .bearer(&clipper_token)
        .send()
        .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = response.json().await;
    assert_eq!(
        body["error"].as_str().unwrap(),
        "You have already participated in this campaign"
    );
}

#[tokio::test]
async fn test_join_paused_campaign_rejected() {
    let app = match setup_test_app().await {
        Some(app) => app,
        None => return,
    };

    // A brand publishes a campaign and immediately pauses it
    let brand_token = register_and_token(&app, &unique_email("pauser"), "Brand").await;
    let response = app
        .post("/brand/campaigns")
        .bearer(&brand_token)
        .json(&json!({
            "name": "Launch",
            "description": "ten chars min",
            "rules": "rules!",
            "budget": 100,
        }))
        .send()
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let body: serde_json::Value = response.json().await;
    let campaign = &body["campaign"];
    assert_eq!(campaign["status"].as_str().unwrap(), "active");
    let campaign_id = campaign["id"].as_str().unwrap();

    let response = app
        .patch(&format!("/brand/campaigns/{}/toggle", campaign_id))
        .bearer(&brand_token)
        .send()
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body: serde_json::Value = response.json().await;
    assert_eq!(body["campaign"]["status"].as_str().unwrap(), "paused");

    // Joining the paused campaign fails
    let clipper_token = register_and_token(&app, &unique_email("latecomer"), "Clipper").await;
    let response = app
        .post(&format!("/clipper/campaigns/{}/participate", campaign_id))
        .bearer(&clipper_token)
        .send()
        .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = response.json().await;
    assert_eq!(body["error"].as_str().unwrap(), "Campaign is not active");
}

#[tokio::test]
async fn test_join_missing_campaign() {
    let app = match setup_test_app().await {
        Some(app) => app,
        None => return,
    };

    let clipper_token = register_and_token(&app, &unique_email("lost"), "Clipper").await;

    let response = app
        .post(&format!("/clipper/campaigns/{}/participate", Uuid::new_v4()))
        .bearer(&clipper_token)
        .send()
        .await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body: serde_json::Value = response.json().await;
    assert_eq!(body["error"].as_str().unwrap(), "Campaign not found");
}

#[tokio::test]
async fn test_active_listing_carries_brand_email() {
    let app = match setup_test_app().await {
        Some(app) => app,
        None => return,
    };

    let brand_email = unique_email("publisher");
    let brand_token = register_and_token(&app, &brand_email, "Brand").await;
    let active = create_campaign(&app, &brand_token, "Visible").await;

    // A paused campaign must not appear
    let paused = create_campaign(&app, &brand_token, "Hidden").await;
    let response = app
        .patch(&format!(
            "/brand/campaigns/{}/toggle",
            paused["id"].as_str().unwrap()
        ))
        .bearer(&brand_token)
        .send()
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let clipper_token = register_and_token(&app, &unique_email("browser"), "Clipper").await;
    let response = app
        .get("/clipper/campaigns")
        .bearer(&clipper_token)
        .send()
        .await;

    assert_eq!(response.status(), StatusCode::OK);
    let body: serde_json::Value = response.json().await;
    let campaigns = body["campaigns"].as_array().unwrap();

    let listed = campaigns
        .iter()
        .find(|c| c["id"] == active["id"])
        .expect("active campaign missing from discovery listing");
    assert_eq!(listed["brand_email"].as_str().unwrap(), brand_email);

    assert!(
        campaigns.iter().all(|c| c["id"] != paused["id"]),
        "paused campaign leaked into discovery listing"
    );
}

#[tokio::test]
async fn test_my_participations_carry_campaign_context() {
    let app = match setup_test_app().await {
        Some(app) => app,
        None => return,
    };

    let brand_email = unique_email("contextbrand");
    let brand_token = register_and_token(&app, &brand_email, "Brand").await;
    let campaign = create_campaign(&app, &brand_token, "Context").await;
    let campaign_id = campaign["id"].as_str().unwrap();

    let clipper_token = register_and_token(&app, &unique_email("contextclip"), "Clipper").await;
    let response = app
        .post(&format!("/clipper/campaigns/{}/participate", campaign_id))
        .bearer(&clipper_token)
        .send()
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = app
        .get("/clipper/participations")
        .bearer(&clipper_token)
        .send()
        .await;

    assert_eq!(response.status(), StatusCode::OK);
    let body: serde_json::Value = response.json().await;
    let participations = body["participations"].as_array().unwrap();
    assert_eq!(participations.len(), 1);

    let entry = &participations[0];
    assert_eq!(entry["campaign_id"].as_str().unwrap(), campaign_id);
    assert_eq!(entry["campaign_name"].as_str().unwrap(), "Context");
    assert_eq!(
        entry["campaign_description"].as_str().unwrap(),
        "A campaign description long enough to pass"
    );
    assert_eq!(entry["brand_email"].as_str().unwrap(), brand_email);
    assert_eq!(entry["status"].as_str().unwrap(), "pending");
}

#[tokio::test]
async fn test_brand_lists_campaign_participants() {
    let app = match setup_test_app().await {
        Some(app) => app,
        None => return,
    };

    let brand_token = register_and_token(&app, &unique_email("reviewer"), "Brand").await;
    let campaign = create_campaign(&app, &brand_token, "Reviewed").await;
    let campaign_id = campaign["id"].as_str().unwrap();

    let clipper_email = unique_email("reviewed");
    let clipper_token = register_and_token(&app, &clipper_email, "Clipper").await;
    let response = app
        .post(&format!("/clipper/campaigns/{}/participate", campaign_id))
        .bearer(&clipper_token)
        .send()
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = app
        .get(&format!("/brand/campaigns/{}/participants", campaign_id))
        .bearer(&brand_token)
        .send()
        .await;

    assert_eq!(response.status(), StatusCode::OK);
    let body: serde_json::Value = response.json().await;
    let participants = body["participants"].as_array().unwrap();
    assert_eq!(participants.len(), 1);
    assert_eq!(
        participants[0]["clipper_email"].as_str().unwrap(),
        clipper_email
    );

    // The owner's listing also reflects the new participant count
    let response = app.get("/brand/campaigns").bearer(&brand_token).send().await;
    assert_eq!(response.status(), StatusCode::OK);
    let body: serde_json::Value = response.json().await;
    let mine = body["campaigns"]
        .as_array()
        .unwrap()
        .iter()
        .find(|c| c["id"] == campaign["id"])
        .expect("campaign missing from own listing")
        .clone();
    assert_eq!(mine["participants_count"].as_i64().unwrap(), 1);
}

#[tokio::test]
async fn test_participants_listing_hides_foreign_campaigns() {
    let app = match setup_test_app().await {
        Some(app) => app,
        None => return,
    };

    let owner_token = register_and_token(&app, &unique_email("realowner"), "Brand").await;
    let campaign = create_campaign(&app, &owner_token, "Private").await;
    let campaign_id = campaign["id"].as_str().unwrap();

    let other_token = register_and_token(&app, &unique_email("snoop"), "Brand").await;
    let response = app
        .get(&format!("/brand/campaigns/{}/participants", campaign_id))
        .bearer(&other_token)
        .send()
        .await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body: serde_json::Value = response.json().await;
    assert_eq!(
        body["error"].as_str().unwrap(),
        "Campaign not found or unauthorized"
    );
}

#[tokio::test]
async fn test_clipper_routes_reject_brands() {
    let app = match setup_test_app().await {
        Some(app) => app,
        None => return,
    };

    let brand_token = register_and_token(&app, &unique_email("notaclipper"), "Brand").await;

    let response = app
        .get("/clipper/campaigns")
        .bearer(&brand_token)
        .send()
        .await;

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let body: serde_json::Value = response.json().await;
    assert_eq!(
        body["error"].as_str().unwrap(),
        "Forbidden - Insufficient permissions"
    );
}

#[tokio::test]
async fn test_brand_dashboard_aggregates() {
    let app = match setup_test_app().await {
        Some(app) => app,
        None => return,
    };

    let brand_email = unique_email("dashbrand");
    let brand_token = register_and_token(&app, &brand_email, "Brand").await;

    let first = create_campaign(&app, &brand_token, "Dash one").await;
    let second = create_campaign(&app, &brand_token, "Dash two").await;

    // Pause the second so active and total diverge
    let response = app
        .patch(&format!(
            "/brand/campaigns/{}/toggle",
            second["id"].as_str().unwrap()
        ))
        .bearer(&brand_token)
        .send()
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let clipper_token = register_and_token(&app, &unique_email("dashclip"), "Clipper").await;
    let response = app
        .post(&format!(
            "/clipper/campaigns/{}/participate",
            first["id"].as_str().unwrap()
        ))
        .bearer(&clipper_token)
        .send()
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = app.get("/brand/dashboard").bearer(&brand_token).send().await;

    assert_eq!(response.status(), StatusCode::OK);
    let body: serde_json::Value = response.json().await;
    assert_eq!(
        body["message"].as_str().unwrap(),
        format!("Welcome to Brand dashboard, {}", brand_email)
    );
    assert_eq!(body["data"]["total_campaigns"].as_i64().unwrap(), 2);
    assert_eq!(body["data"]["active_campaigns"].as_i64().unwrap(), 1);
    assert_eq!(body["data"]["total_participants"].as_i64().unwrap(), 1);
}

#[tokio::test]
async fn test_clipper_dashboard_aggregates() {
    let app = match setup_test_app().await {
        Some(app) => app,
        None => return,
    };

    let brand_token = register_and_token(&app, &unique_email("tallybrand"), "Brand").await;
    let campaign = create_campaign(&app, &brand_token, "Tally").await;

    let clipper_email = unique_email("tallyclip");
    let clipper_token = register_and_token(&app, &clipper_email, "Clipper").await;
    let response = app
        .post(&format!(
            "/clipper/campaigns/{}/participate",
            campaign["id"].as_str().unwrap()
        ))
        .bearer(&clipper_token)
        .send()
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = app
        .get("/clipper/dashboard")
        .bearer(&clipper_token)
        .send()
        .await;

    assert_eq!(response.status(), StatusCode::OK);
    let body: serde_json::Value = response.json().await;
    assert_eq!(
        body["message"].as_str().unwrap(),
        format!("Welcome to Clipper dashboard, {}", clipper_email)
    );
    assert_eq!(body["data"]["total_participations"].as_i64().unwrap(), 1);
    assert_eq!(body["data"]["pending"].as_i64().unwrap(), 1);
    assert_eq!(body["data"]["approved"].as_i64().unwrap(), 0);
    assert_eq!(body["data"]["rejected"].as_i64().unwrap(), 0);
}

#[tokio::test]
async fn test_participations_survive_campaign_deletion() {
    let app = match setup_test_app().await {
        Some(app) => app,
        None => return,
    };

    let brand_token = register_and_token(&app, &unique_email("vanisher"), "Brand").await;
    let campaign = create_campaign(&app, &brand_token, "Short lived").await;
    let campaign_id = campaign["id"].as_str().unwrap();

    let clipper_token = register_and_token(&app, &unique_email("survivor"), "Clipper").await;
    let response = app
        .post(&format!("/clipper/campaigns/{}/participate", campaign_id))
        .bearer(&clipper_token)
        .send()
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = app
        .delete(&format!("/brand/campaigns/{}", campaign_id))
        .bearer(&brand_token)
        .send()
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    // No cascade: the participation row still counts for the clipper
    let response = app
        .get("/clipper/dashboard")
        .bearer(&clipper_token)
        .send()
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body: serde_json::Value = response.json().await;
    assert_eq!(body["data"]["total_participations"].as_i64().unwrap(), 1);
}
