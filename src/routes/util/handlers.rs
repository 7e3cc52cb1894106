use actix_web::{HttpResponse, Responder};

#[utoipa::path(
    get,
    path = "/api/util/health_check",
    tag = "Util",
    responses(
        (status=200, description= "Server is running", body= String),
    )
)]
#[tracing::instrument(name = "Health check")]
pub async fn health_check() -> impl Responder {
    HttpResponse::Ok().body("Running Server")
}
