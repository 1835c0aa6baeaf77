use actix_web::{web, HttpResponse};
use uuid::Uuid;

use crate::domain::order::{ChangeOrderStatus, CreateOrder, OrderPaginationQuery};
use crate::error::Fault;
use crate::service::OrderService;

pub async fn create_order(
    service: web::Data<OrderService>,
    body: web::Json<CreateOrder>,
) -> Result<HttpResponse, Fault> {
    let request = body.into_inner();
    request.validate()?;

    let order = service.create(request).await?;
    Ok(HttpResponse::Created().json(order))
}

pub async fn find_all_orders(
    service: web::Data<OrderService>,
    query: web::Query<OrderPaginationQuery>,
) -> Result<HttpResponse, Fault> {
    let pagination = query.into_inner().validate(service.statuses())?;

    let page = service.find_all(&pagination).await?;
    Ok(HttpResponse::Ok().json(page))
}

pub async fn find_one_order(
    service: web::Data<OrderService>,
    id: web::Path<Uuid>,
) -> Result<HttpResponse, Fault> {
    let order = service.find_one(id.into_inner()).await?;
    Ok(HttpResponse::Ok().json(order))
}

pub async fn change_order_status(
    service: web::Data<OrderService>,
    id: web::Path<Uuid>,
    body: web::Json<ChangeOrderStatus>,
) -> Result<HttpResponse, Fault> {
    let status = body.validate(service.statuses())?;

    let order = service.change_status(id.into_inner(), status).await?;
    Ok(HttpResponse::Ok().json(order))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::configure;
    use crate::catalog::{CatalogError, ProductCatalog, ValidatedProduct};
    use crate::domain::order::{OrderStatusSet, ProductId};
    use crate::metrics::Metrics;
    use crate::store::InMemoryOrderStore;
    use actix_web::http::StatusCode;
    use actix_web::{test, App};
    use async_trait::async_trait;
    use rust_decimal::Decimal;
    use serde_json::{json, Value};
    use std::sync::Arc;

    struct FixedCatalog;

    #[async_trait]
    impl ProductCatalog for FixedCatalog {
        async fn validate(&self, ids: &[ProductId]) -> Result<Vec<ValidatedProduct>, CatalogError> {
            let known = [(5, "A", 10), (6, "B", 20)];
            Ok(known
                .iter()
                .filter(|(id, _, _)| ids.contains(id))
                .map(|(id, name, price)| ValidatedProduct {
                    id: *id,
                    name: name.to_string(),
                    price: Decimal::from(*price),
                })
                .collect())
        }
    }

    fn order_service() -> web::Data<OrderService> {
        web::Data::new(OrderService::new(
            Arc::new(InMemoryOrderStore::new()),
            Arc::new(FixedCatalog),
            OrderStatusSet::default(),
            Arc::new(Metrics::new().unwrap()),
        ))
    }

    macro_rules! app {
        ($service:expr) => {
            test::init_service(App::new().app_data($service.clone()).configure(configure)).await
        };
    }

    #[actix_web::test]
    async fn test_create_order_returns_totals() {
        let service = order_service();
        let app = app!(service);

        let req = test::TestRequest::post()
            .uri("/orders")
            .set_json(json!({"items": [{"productId": 5, "quantity": 2}, {"productId": 6, "quantity": 1}]}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["totalItems"], 3);
        assert_eq!(body["totalAmount"].as_str().map(|s| Decimal::from_str_exact(s).unwrap()), Some(Decimal::from(40)));
        assert_eq!(body["status"], "PENDING");
        assert_eq!(body["items"][0]["name"], "A");
    }

    #[actix_web::test]
    async fn test_create_order_rejects_empty_items() {
        let service = order_service();
        let app = app!(service);

        let req = test::TestRequest::post()
            .uri("/orders")
            .set_json(json!({"items": []}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body, json!({"status": 400, "message": "Order items cannot be empty"}));
    }

    #[actix_web::test]
    async fn test_create_order_unknown_product_is_opaque() {
        let service = order_service();
        let app = app!(service);

        let req = test::TestRequest::post()
            .uri("/orders")
            .set_json(json!({"items": [{"productId": 77, "quantity": 1}]}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body, json!({"status": 400, "message": "Check logs"}));
    }

    #[actix_web::test]
    async fn test_malformed_json_uses_fault_shape() {
        let service = order_service();
        let app = app!(service);

        let req = test::TestRequest::post()
            .uri("/orders")
            .insert_header(("content-type", "application/json"))
            .set_payload("{\"items\": ")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["status"], 400);
    }

    #[actix_web::test]
    async fn test_find_one_not_found() {
        let service = order_service();
        let app = app!(service);
        let id = uuid::Uuid::new_v4();

        let req = test::TestRequest::get().uri(&format!("/orders/{}", id)).to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["message"], format!("Order with id: {} not found", id));
    }

    #[actix_web::test]
    async fn test_find_one_rejects_non_uuid() {
        let service = order_service();
        let app = app!(service);

        let req = test::TestRequest::get().uri("/orders/not-a-uuid").to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn test_find_all_with_pagination() {
        let service = order_service();
        let app = app!(service);

        for _ in 0..3 {
            let req = test::TestRequest::post()
                .uri("/orders")
                .set_json(json!({"items": [{"productId": 5, "quantity": 1}]}))
                .to_request();
            test::call_service(&app, req).await;
        }

        let req = test::TestRequest::get()
            .uri("/orders?page=2&limit=2&status=PENDING")
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;

        assert_eq!(body["data"].as_array().unwrap().len(), 1);
        assert_eq!(body["meta"], json!({"total": 3, "page": 2, "lastPage": 2}));
    }

    #[actix_web::test]
    async fn test_find_all_rejects_unknown_status() {
        let service = order_service();
        let app = app!(service);

        let req = test::TestRequest::get().uri("/orders?status=LOST").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let body: Value = test::read_body_json(resp).await;
        assert!(body["message"].as_str().unwrap().starts_with("Valid status are"));
    }

    #[actix_web::test]
    async fn test_change_status_flow() {
        let service = order_service();
        let app = app!(service);

        let req = test::TestRequest::post()
            .uri("/orders")
            .set_json(json!({"items": [{"productId": 6, "quantity": 1}]}))
            .to_request();
        let created: Value = test::call_and_read_body_json(&app, req).await;
        let id = created["id"].as_str().unwrap().to_string();

        for _ in 0..2 {
            let req = test::TestRequest::patch()
                .uri(&format!("/orders/{}", id))
                .set_json(json!({"status": "CANCELLED"}))
                .to_request();
            let resp = test::call_service(&app, req).await;
            assert_eq!(resp.status(), StatusCode::OK);

            let body: Value = test::read_body_json(resp).await;
            assert_eq!(body["status"], "CANCELLED");
        }
    }

    #[actix_web::test]
    async fn test_change_status_unknown_order() {
        let service = order_service();
        let app = app!(service);

        let req = test::TestRequest::patch()
            .uri(&format!("/orders/{}", uuid::Uuid::new_v4()))
            .set_json(json!({"status": "DELIVERED"}))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }
}
