//! HTTP tests for the progress endpoints over the in-memory store

mod common;

use axum::http::StatusCode;
use common::{date, TestApp};
use fitness_progress_shared::models::{MealType, NutritionLogEntry};
use serde_json::{json, Value};
use uuid::Uuid;

async fn app_with_user() -> (TestApp, Uuid, String) {
    let app = TestApp::in_memory();
    let user = Uuid::new_v4();
    app.store().add_user(user).await;
    let token = app.token_for(user);
    (app, user, token)
}

#[tokio::test]
async fn test_missing_token_is_401() {
    let app = TestApp::in_memory();
    let (status, body) = app.get("/api/v1/progress/streak", None).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert!(body.contains("UNAUTHORIZED"));
}

#[tokio::test]
async fn test_log_session_then_read_back() {
    let (app, _user, token) = app_with_user().await;
    let squat = Uuid::new_v4();
    app.store().add_exercise(squat, "Squat").await;

    let first = json!({
        "date": "2025-05-05",
        "exercises": [{
            "exercise_id": squat,
            "weight_used": 100.0,
            "sets_completed": 5,
            "reps_completed": 5
        }]
    });
    let (status, body) = app
        .post("/api/v1/progress/sessions", &first.to_string(), Some(&token))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    let logged: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(logged["entries"][0]["max_pr"], 100.0);
    assert_eq!(logged["entries"][0]["is_new_record"], true);

    let second = json!({
        "date": "2025-05-06",
        "exercises": [{ "exercise_id": squat, "weight_used": 80.0 }]
    });
    let (status, body) = app
        .post("/api/v1/progress/sessions", &second.to_string(), Some(&token))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    let logged: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(logged["entries"][0]["max_pr"], 100.0);
    assert_eq!(logged["entries"][0]["is_new_record"], false);

    let (status, body) = app
        .get("/api/v1/progress/personal-bests", Some(&token))
        .await;
    assert_eq!(status, StatusCode::OK);
    let bests: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(bests[0]["name"], "Squat");
    assert_eq!(bests[0]["max_weight"], 100.0);

    let (status, body) = app
        .get("/api/v1/progress/weekly?week_start=2025-05-04", Some(&token))
        .await;
    assert_eq!(status, StatusCode::OK);
    let weekly: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(weekly["total_workout_sessions"], 2);
    assert_eq!(weekly["workout_type_distribution"][0]["name"], "No Type");
    assert_eq!(weekly["workout_type_distribution"][0]["value"], 2);
    assert_eq!(weekly["workout_type_distribution"][0]["minutes"], 10);
}

#[tokio::test]
async fn test_non_positive_weight_is_400() {
    let (app, _user, token) = app_with_user().await;
    let body = json!({
        "date": "2025-05-05",
        "exercises": [{ "exercise_id": Uuid::new_v4(), "weight_used": 0.0 }]
    });

    let (status, body) = app
        .post("/api/v1/progress/sessions", &body.to_string(), Some(&token))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body.contains("VALIDATION_ERROR"));
}

#[tokio::test]
async fn test_daily_range_end_before_start_is_400() {
    let (app, _user, token) = app_with_user().await;

    let (status, body) = app
        .get(
            "/api/v1/progress/daily?start=2025-05-10&end=2025-05-01",
            Some(&token),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body.contains("INVALID_RANGE"));
}

#[tokio::test]
async fn test_daily_summaries_are_dense() {
    let (app, user, token) = app_with_user().await;
    app.store()
        .add_nutrition(NutritionLogEntry {
            user_id: user,
            date: date(2025, 5, 2),
            meal_type: MealType::Lunch,
            total_calories: 650.0,
            protein: 40.0,
            carbs: 70.0,
            fats: 15.0,
            hydration: 250.0,
        })
        .await;

    let (status, body) = app
        .get(
            "/api/v1/progress/daily?start=2025-05-01&end=2025-05-03",
            Some(&token),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    let days: Value = serde_json::from_str(&body).unwrap();
    let days = days.as_array().unwrap();
    assert_eq!(days.len(), 3);
    assert_eq!(days[1]["date"], "2025-05-02");
    assert_eq!(days[1]["calorie_intake"], 650.0);
    assert_eq!(days[0]["calorie_intake"], 0.0);
}

#[tokio::test]
async fn test_weekly_export_is_csv() {
    let (app, _user, token) = app_with_user().await;

    let (status, body) = app
        .get(
            "/api/v1/progress/weekly/export?week_start=2025-05-04",
            Some(&token),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    let lines: Vec<&str> = body.lines().collect();
    assert_eq!(lines.len(), 8);
    assert!(lines[0].starts_with("date,"));
    assert!(lines[1].starts_with("2025-05-04,"));
}

#[tokio::test]
async fn test_streak_response_includes_reference_day() {
    let (app, _user, token) = app_with_user().await;

    let (status, body) = app.get("/api/v1/progress/streak", Some(&token)).await;
    assert_eq!(status, StatusCode::OK);
    let streak: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(streak["streak"], 0);
    assert!(streak["as_of"].is_string());
}
