use actix_web::HttpResponse;

/// `GET /health_check`
///
/// 200 with an empty body; touches neither Postgres nor Mailchimp
pub async fn health_check() -> HttpResponse { HttpResponse::Ok().finish() }
