use crate::helpers::spawn_app;

#[actix_web::test]
async fn requests_without_client_headers_are_rejected() {
    let app = spawn_app().await;

    let response = app
        .api_client
        .get(format!("{}/api/product/list", &app.address))
        .send()
        .await
        .expect("Failed to execute request.");

    assert_eq!(response.status().as_u16(), 400);
    let body: serde_json::Value = response.json().await.expect("Invalid json body.");
    assert_eq!(body["status"], false);
}

#[actix_web::test]
async fn protected_routes_require_a_token() {
    let app = spawn_app().await;

    for path in ["/api/user/profile", "/api/cart", "/api/admin/stats"] {
        let response = app
            .get(path)
            .send()
            .await
            .expect("Failed to execute request.");
        assert_eq!(response.status().as_u16(), 401, "{}", path);
    }
}

#[actix_web::test]
async fn malformed_token_is_rejected() {
    let app = spawn_app().await;

    let response = app
        .get("/api/order/list")
        .bearer_auth("not-a-jwt")
        .send()
        .await
        .expect("Failed to execute request.");

    assert_eq!(response.status().as_u16(), 401);
}
