//! 路径参数提取器
//!
//! 解析失败时直接返回统一格式的 400 响应，而不是 actix 默认的纯文本错误。

use std::future::{Ready, ready};

use actix_web::dev::Payload;
use actix_web::error::InternalError;
use actix_web::{FromRequest, HttpRequest, HttpResponse};

use crate::models::{ApiResponse, ErrorCode};

fn parse_positive_id(req: &HttpRequest, name: &str) -> Result<i64, actix_web::Error> {
    let raw = req.match_info().get(name).unwrap_or_default();

    match raw.parse::<i64>() {
        Ok(id) if id > 0 => Ok(id),
        _ => {
            let response = HttpResponse::BadRequest().json(ApiResponse::error_empty(
                ErrorCode::BadRequest,
                format!("Parámetro de ruta inválido: {name}='{raw}'"),
            ));
            Err(InternalError::from_response(format!("invalid path parameter {name}"), response).into())
        }
    }
}

/// 路径中的 `{id}`
#[derive(Debug, Clone, Copy)]
pub struct SafeIDI64(pub i64);

impl FromRequest for SafeIDI64 {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(parse_positive_id(req, "id").map(SafeIDI64))
    }
}

/// 路径中的 `{sid}/blocks/{bid}`
#[derive(Debug, Clone, Copy)]
pub struct StudentBlockPath {
    pub student_id: i64,
    pub block_id: i64,
}

impl FromRequest for StudentBlockPath {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let parsed = parse_positive_id(req, "sid").and_then(|student_id| {
            parse_positive_id(req, "bid").map(|block_id| StudentBlockPath {
                student_id,
                block_id,
            })
        });
        ready(parsed)
    }
}
