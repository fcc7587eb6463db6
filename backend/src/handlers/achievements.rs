use actix_web::{web, HttpRequest, HttpResponse, Result};
use shared::ErrorResponse;

use crate::models::{AchievementPayload, AppState};
use crate::services::achievements::{self as achievements_service, AchievementError};
use crate::services::list_params::ListParams;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/achievements")
            .route("", web::get().to(list_achievements))
            .route("", web::post().to(create_achievement))
            .route("/{id}", web::get().to(get_achievement))
            .route("/{id}", web::put().to(replace_achievement))
            .route("/{id}", web::delete().to(delete_achievement)),
    );
}

fn not_found() -> HttpResponse {
    HttpResponse::NotFound().json(ErrorResponse::new("not_found", "Achievement not found"))
}

fn service_error(action: &str, e: AchievementError) -> HttpResponse {
    match e {
        AchievementError::NotFound => not_found(),
        e => {
            log::error!("Error {} achievement: {:?}", action, e);
            HttpResponse::InternalServerError().json(ErrorResponse::new(
                "internal_error",
                format!("Failed {} achievement", action),
            ))
        }
    }
}

fn query_pairs(req: &HttpRequest) -> Vec<(String, String)> {
    url::form_urlencoded::parse(req.query_string().as_bytes())
        .into_owned()
        .collect()
}

async fn list_achievements(state: web::Data<AppState>, req: HttpRequest) -> Result<HttpResponse> {
    let params = match ListParams::parse(&query_pairs(&req)) {
        Ok(params) => params,
        Err(e) => {
            return Ok(HttpResponse::BadRequest().json(ErrorResponse::new(
                "invalid_query",
                e.to_string(),
            )));
        }
    };

    match achievements_service::list_achievements(&state.db, &params).await {
        Ok(result) => Ok(HttpResponse::Ok().json(result)),
        Err(e) => Ok(service_error("listing", e)),
    }
}

async fn get_achievement(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse> {
    match achievements_service::get_achievement(&state.db, &path.into_inner()).await {
        Ok(Some(achievement)) => Ok(HttpResponse::Ok().json(achievement)),
        Ok(None) => Ok(not_found()),
        Err(e) => Ok(service_error("loading", e)),
    }
}

async fn create_achievement(
    state: web::Data<AppState>,
    body: web::Json<AchievementPayload>,
) -> Result<HttpResponse> {
    let payload = body.into_inner();
    if payload.title.trim().is_empty() {
        return Ok(HttpResponse::BadRequest().json(ErrorResponse::new(
            "validation_error",
            "Achievement title is required",
        )));
    }

    match achievements_service::create_achievement(&state.db, &payload).await {
        Ok(achievement) => Ok(HttpResponse::Created().json(achievement)),
        Err(e) => Ok(service_error("creating", e)),
    }
}

async fn replace_achievement(
    state: web::Data<AppState>,
    path: web::Path<String>,
    body: web::Json<AchievementPayload>,
) -> Result<HttpResponse> {
    let payload = body.into_inner();
    if payload.title.trim().is_empty() {
        return Ok(HttpResponse::BadRequest().json(ErrorResponse::new(
            "validation_error",
            "Achievement title is required",
        )));
    }

    match achievements_service::replace_achievement(&state.db, &path.into_inner(), &payload).await
    {
        Ok(achievement) => Ok(HttpResponse::Ok().json(achievement)),
        Err(e) => Ok(service_error("updating", e)),
    }
}

async fn delete_achievement(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse> {
    match achievements_service::delete_achievement(&state.db, &path.into_inner()).await {
        Ok(achievement) => Ok(HttpResponse::Ok().json(achievement)),
        Err(e) => Ok(service_error("deleting", e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::services::achievements::tests::setup_test_db;
    use actix_web::{http::StatusCode, test, App};
    use serde_json::{json, Value};
    use shared::Achievement;

    fn test_config() -> Config {
        Config {
            host: "127.0.0.1".to_string(),
            port: 0,
            database_url: "sqlite::memory:".to_string(),
            static_files_path: None,
            cors_origins: Vec::new(),
            seed_file: None,
        }
    }

    async fn app_state() -> web::Data<AppState> {
        web::Data::new(AppState {
            db: setup_test_db().await,
            config: test_config(),
        })
    }

    #[actix_web::test]
    async fn test_crud_round() {
        let state = app_state().await;
        let app = test::init_service(
            App::new()
                .app_data(state.clone())
                .configure(crate::handlers::configure_routes),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/api/achievements")
            .set_json(json!({
                "title": "Speaker",
                "description": "Conference talk",
                "category": "Education",
                "todos": [{"id": 1, "title": "Slides", "done": true}]
            }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);
        let created: Achievement = test::read_body_json(resp).await;
        assert_eq!(created.progress, Some(100));

        let req = test::TestRequest::get()
            .uri(&format!("/api/achievements/{}", created.id))
            .to_request();
        let fetched: Achievement = test::call_and_read_body_json(&app, req).await;
        assert_eq!(fetched, created);

        let req = test::TestRequest::put()
            .uri(&format!("/api/achievements/{}", created.id))
            .set_json(json!({
                "id": created.id,
                "title": "Keynote speaker",
                "description": "Conference talk",
                "category": "Education",
                "todos": [],
                "progress": 0,
                "createdAt": created.created_at,
                "updatedAt": created.updated_at + 60
            }))
            .to_request();
        let updated: Achievement = test::call_and_read_body_json(&app, req).await;
        assert_eq!(updated.title, "Keynote speaker");
        assert_eq!(updated.updated_at, created.updated_at + 60);

        let req = test::TestRequest::delete()
            .uri(&format!("/api/achievements/{}", created.id))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let req = test::TestRequest::delete()
            .uri(&format!("/api/achievements/{}", created.id))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["error"], "not_found");
    }

    #[actix_web::test]
    async fn test_list_shapes() {
        let state = app_state().await;
        for title in ["One", "Two", "Three"] {
            achievements_service::create_achievement(
                &state.db,
                &AchievementPayload {
                    title: title.to_string(),
                    category: "Award".to_string(),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        }
        let app = test::init_service(
            App::new()
                .app_data(state.clone())
                .configure(crate::handlers::configure_routes),
        )
        .await;

        let req = test::TestRequest::get().uri("/api/achievements").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body.as_array().map(Vec::len), Some(3));

        let req = test::TestRequest::get()
            .uri("/api/achievements?_page=1&_per_page=2&_sort=title&title_like=o")
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["items"], 2);
        assert_eq!(body["pages"], 1);
        assert!(body["next"].is_null());
        assert_eq!(body["data"][0]["title"], "One");
        assert_eq!(body["data"][1]["title"], "Two");

        let req = test::TestRequest::get()
            .uri("/api/achievements?_page=0")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn test_blank_title_is_rejected() {
        let state = app_state().await;
        let app = test::init_service(
            App::new()
                .app_data(state.clone())
                .configure(crate::handlers::configure_routes),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/api/achievements")
            .set_json(json!({"title": "   "}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }
}
