//! HTTP 接口集成测试

use std::sync::Arc;

use actix_web::http::StatusCode;
use actix_web::{App, test, web};
use serde_json::{Value, json};

use rust_cfp_evaluaciones::evaluation::EvaluationSequencer;
use rust_cfp_evaluaciones::routes;
use rust_cfp_evaluaciones::runtime::lifetime::startup::StartupContext;
use rust_cfp_evaluaciones::storage::Storage;
use rust_cfp_evaluaciones::storage::sea_orm_storage::SeaOrmStorage;
use rust_cfp_evaluaciones::utils::{json_error_handler, query_error_handler};

async fn app_state() -> (Arc<dyn Storage>, Arc<EvaluationSequencer>) {
    let context = StartupContext::new(Arc::new(SeaOrmStorage::in_memory().await.unwrap()));
    (context.storage, context.sequencer)
}

macro_rules! init_app {
    ($storage:expr, $sequencer:expr) => {
        test::init_service(
            App::new()
                .app_data(web::QueryConfig::default().error_handler(query_error_handler))
                .app_data(web::JsonConfig::default().error_handler(json_error_handler))
                .app_data(web::Data::new($storage.clone()))
                .app_data(web::Data::new($sequencer.clone()))
                .configure(routes::configure_api_routes),
        )
        .await
    };
}

macro_rules! post_json {
    ($app:expr, $uri:expr, $body:expr) => {{
        let req = test::TestRequest::post()
            .uri($uri)
            .set_json($body)
            .to_request();
        let resp = test::call_service(&$app, req).await;
        let status = resp.status();
        let body: Value = test::read_body_json(resp).await;
        (status, body)
    }};
}

macro_rules! get_json {
    ($app:expr, $uri:expr) => {{
        let req = test::TestRequest::get().uri($uri).to_request();
        let resp = test::call_service(&$app, req).await;
        let status = resp.status();
        let body: Value = test::read_body_json(resp).await;
        (status, body)
    }};
}

#[actix_web::test]
async fn test_create_student_and_reject_duplicates() {
    let (storage, sequencer) = app_state().await;
    let app = init_app!(storage, sequencer);

    let student = json!({
        "dni": "30.111.222",
        "email": "Ana@CFP.edu.ar",
        "nombre": "Ana",
        "apellido": "Pérez"
    });

    let (status, body) = post_json!(app, "/api/v1/students", &student);
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["code"], 0);
    assert_eq!(body["data"]["estudiante"]["dni"], "30111222");
    assert_eq!(body["data"]["estudiante"]["email"], "ana@cfp.edu.ar");
    assert_eq!(body["data"]["estudiante"]["estatus"], "Regular");

    let (status, _) = post_json!(app, "/api/v1/students", &student);
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, body) = post_json!(
        app,
        "/api/v1/students",
        &json!({ "dni": "abc", "email": "x@y.com", "nombre": "A", "apellido": "B" })
    );
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 2002);
}

#[actix_web::test]
async fn test_unknown_student_is_not_found() {
    let (storage, sequencer) = app_state().await;
    let app = init_app!(storage, sequencer);

    let (status, _) = get_json!(app, "/api/v1/students/999");
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = get_json!(app, "/api/v1/evaluations/students/999/blocks/1/status");
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], 1004);
}

#[actix_web::test]
async fn test_invalid_path_id_is_bad_request() {
    let (storage, sequencer) = app_state().await;
    let app = init_app!(storage, sequencer);

    let (status, body) = get_json!(app, "/api/v1/students/abc");
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 1000);
}

#[actix_web::test]
async fn test_exam_must_have_exactly_one_owner() {
    let (storage, sequencer) = app_state().await;
    let app = init_app!(storage, sequencer);

    let (_, block) = post_json!(app, "/api/v1/blocks", &json!({ "nombre": "Programación" }));
    let block_id = block["data"]["id"].as_i64().unwrap();
    let (_, module) = post_json!(
        app,
        &format!("/api/v1/blocks/{block_id}/modules"),
        &json!({ "nombre": "Lógica" })
    );
    let module_id = module["data"]["id"].as_i64().unwrap();

    let (status, body) = post_json!(
        app,
        "/api/v1/exams",
        &json!({ "modulo_id": module_id, "bloque_id": block_id, "tipo_examen": "PARCIAL" })
    );
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 3003);

    let (status, _) = post_json!(app, "/api/v1/exams", &json!({ "tipo_examen": "PARCIAL" }));
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // 模块下不能建期末
    let (status, _) = post_json!(
        app,
        "/api/v1/exams",
        &json!({ "modulo_id": module_id, "tipo_examen": "FINAL_SINC" })
    );
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = post_json!(
        app,
        "/api/v1/exams",
        &json!({ "bloque_id": block_id, "tipo_examen": "FINAL_VIRTUAL", "fecha": "2024-07-01" })
    );
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["tipo_examen"], "FINAL_VIRTUAL");
    assert_eq!(body["data"]["fecha"], "2024-07-01");

    let (status, _) = post_json!(
        app,
        "/api/v1/exams",
        &json!({ "bloque_id": 999, "tipo_examen": "FINAL_VIRTUAL" })
    );
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn test_full_evaluation_flow_over_http() {
    let (storage, sequencer) = app_state().await;
    let app = init_app!(storage, sequencer);

    let (_, student) = post_json!(
        app,
        "/api/v1/students",
        &json!({ "dni": "40123456", "email": "juan@cfp.edu.ar", "nombre": "Juan", "apellido": "Gómez" })
    );
    let student_id = student["data"]["estudiante"]["id"].as_i64().unwrap();

    let (_, block) = post_json!(app, "/api/v1/blocks", &json!({ "nombre": "Redes", "orden": 2 }));
    let block_id = block["data"]["id"].as_i64().unwrap();

    let mut partials = Vec::new();
    for name in ["Cableado", "Routing"] {
        let (_, module) = post_json!(
            app,
            &format!("/api/v1/blocks/{block_id}/modules"),
            &json!({ "nombre": name })
        );
        let module_id = module["data"]["id"].as_i64().unwrap();
        let (_, exam) = post_json!(
            app,
            "/api/v1/exams",
            &json!({ "modulo_id": module_id, "tipo_examen": "PARCIAL" })
        );
        partials.push(exam["data"]["id"].as_i64().unwrap());
    }

    let (_, virtual_exam) = post_json!(
        app,
        "/api/v1/exams",
        &json!({ "bloque_id": block_id, "tipo_examen": "FINAL_VIRTUAL" })
    );
    let virtual_id = virtual_exam["data"]["id"].as_i64().unwrap();
    let (_, sync_exam) = post_json!(
        app,
        "/api/v1/exams",
        &json!({ "bloque_id": block_id, "tipo_examen": "FINAL_SINC" })
    );
    let sync_id = sync_exam["data"]["id"].as_i64().unwrap();

    let status_uri = format!("/api/v1/evaluations/students/{student_id}/blocks/{block_id}/status");

    // 期中未通过时不能参加线上期末
    let (status, body) = post_json!(
        app,
        "/api/v1/evaluations/grades",
        &json!({ "estudiante_id": student_id, "examen_id": virtual_id, "calificacion": 9 })
    );
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 4003);
    assert!(body["message"].as_str().unwrap().contains("Cableado"));

    for (i, exam_id) in partials.iter().enumerate() {
        let (status, body) = post_json!(
            app,
            "/api/v1/evaluations/grades",
            &json!({
                "estudiante_id": student_id,
                "examen_id": exam_id,
                "calificacion": 7.5,
                "fecha_calificacion": format!("2024-05-0{}T10:00:00Z", i + 1)
            })
        );
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["data"]["intento"], 1);
        assert_eq!(body["data"]["es_nota_definitiva"], false);
    }

    let (status, body) = get_json!(app, &status_uri);
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["puede_virtual"], true);
    assert_eq!(body["data"]["puede_sincronico"], false);
    assert_eq!(body["data"]["siguiente_paso"], "Puede rendir Final Virtual");

    let (status, _) = post_json!(
        app,
        "/api/v1/evaluations/grades",
        &json!({
            "estudiante_id": student_id,
            "examen_id": virtual_id,
            "calificacion": 6,
            "fecha_calificacion": "2024-06-01T10:00:00Z"
        })
    );
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = get_json!(
        app,
        &format!("/api/v1/evaluations/students/{student_id}/blocks/{block_id}/synchronous-eligibility")
    );
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["habilitado"], true);
    assert!(body["data"]["virtual_habilitante_id"].is_i64());

    let (status, body) = post_json!(
        app,
        "/api/v1/evaluations/grades",
        &json!({
            "estudiante_id": student_id,
            "examen_id": sync_id,
            "calificacion": 8.25,
            "fecha_calificacion": "2024-07-01T10:00:00Z"
        })
    );
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["es_nota_definitiva"], true);

    let (_, body) = get_json!(app, &status_uri);
    assert_eq!(body["data"]["aprobado"], true);
    assert_eq!(body["data"]["nota_final"], 8.25);
    assert_eq!(body["data"]["siguiente_paso"], "Bloque aprobado con nota 8.25");
    assert_eq!(body["data"]["historial"].as_array().unwrap().len(), 4);

    let (_, body) = get_json!(
        app,
        &format!("/api/v1/evaluations/students/{student_id}/blocks/{block_id}/definitive-grade")
    );
    assert_eq!(body["data"]["tiene_nota"], true);
    assert_eq!(body["data"]["calificacion"], 8.25);

    let (_, body) = get_json!(
        app,
        &format!("/api/v1/grades?estudiante_id={student_id}&bloque_id={block_id}")
    );
    assert_eq!(body["data"]["items"].as_array().unwrap().len(), 2);
}

#[actix_web::test]
async fn test_equivalence_endpoint() {
    let (storage, sequencer) = app_state().await;
    let app = init_app!(storage, sequencer);

    let (_, student) = post_json!(
        app,
        "/api/v1/students",
        &json!({ "dni": "35000111", "email": "eva@cfp.edu.ar", "nombre": "Eva", "apellido": "Ruiz" })
    );
    let student_id = student["data"]["estudiante"]["id"].as_i64().unwrap();
    let (_, block) = post_json!(app, "/api/v1/blocks", &json!({ "nombre": "Bases de datos" }));
    let block_id = block["data"]["id"].as_i64().unwrap();
    let (_, exam) = post_json!(
        app,
        "/api/v1/exams",
        &json!({ "bloque_id": block_id, "tipo_examen": "EQUIVALENCIA" })
    );
    let exam_id = exam["data"]["id"].as_i64().unwrap();

    // 等效认定不能走普通登记
    let (status, body) = post_json!(
        app,
        "/api/v1/evaluations/grades",
        &json!({ "estudiante_id": student_id, "examen_id": exam_id, "calificacion": 8 })
    );
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 4002);

    let (status, body) = post_json!(
        app,
        "/api/v1/evaluations/equivalences",
        &json!({
            "estudiante_id": student_id,
            "examen_id": exam_id,
            "calificacion": 9,
            "origen_equivalencia": "UTN FRBA",
            "fecha_ref_equivalencia": "2023-11-30"
        })
    );
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["es_nota_definitiva"], true);

    let (_, body) = get_json!(
        app,
        &format!("/api/v1/evaluations/students/{student_id}/blocks/{block_id}/definitive-grade")
    );
    assert_eq!(body["data"]["tiene_nota"], true);
    assert_eq!(body["data"]["calificacion"], 9.0);
}

#[actix_web::test]
async fn test_malformed_json_uses_envelope() {
    let (storage, sequencer) = app_state().await;
    let app = init_app!(storage, sequencer);

    let req = test::TestRequest::post()
        .uri("/api/v1/evaluations/grades")
        .insert_header(("content-type", "application/json"))
        .set_payload("{\"estudiante_id\": ")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["code"], 1000);
}

#[actix_web::test]
async fn test_backdated_grade_date_is_rejected() {
    let (storage, sequencer) = app_state().await;
    let app = init_app!(storage, sequencer);

    let (_, student) = post_json!(
        app,
        "/api/v1/students",
        &json!({ "dni": "36000222", "email": "leo@cfp.edu.ar", "nombre": "Leo", "apellido": "Sosa" })
    );
    let student_id = student["data"]["estudiante"]["id"].as_i64().unwrap();
    let (_, block) = post_json!(app, "/api/v1/blocks", &json!({ "nombre": "Sistemas" }));
    let block_id = block["data"]["id"].as_i64().unwrap();
    let (_, virtual_exam) = post_json!(
        app,
        "/api/v1/exams",
        &json!({ "bloque_id": block_id, "tipo_examen": "FINAL_VIRTUAL" })
    );
    let (_, sync_exam) = post_json!(
        app,
        "/api/v1/exams",
        &json!({ "bloque_id": block_id, "tipo_examen": "FINAL_SINC" })
    );

    let (status, _) = post_json!(
        app,
        "/api/v1/evaluations/grades",
        &json!({
            "estudiante_id": student_id,
            "examen_id": virtual_exam["data"]["id"],
            "calificacion": 7,
            "fecha_calificacion": "2024-06-10T10:00:00Z"
        })
    );
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = post_json!(
        app,
        "/api/v1/evaluations/grades",
        &json!({
            "estudiante_id": student_id,
            "examen_id": sync_exam["data"]["id"],
            "calificacion": 4,
            "fecha_calificacion": "2024-06-01T10:00:00Z"
        })
    );
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 1001);

    let (_, body) = get_json!(
        app,
        &format!("/api/v1/evaluations/students/{student_id}/blocks/{block_id}/history")
    );
    assert_eq!(body["data"].as_array().unwrap().len(), 1);
}
