// Private module declaration
mod handlers;

use actix_web::{error, web};

use crate::error::Fault;

// ============================================================================
// HTTP API - transport adapter for the order operations
// ============================================================================
//
//   POST  /orders        create_order
//   GET   /orders        find_all_orders   (?page=&limit=&status=)
//   GET   /orders/{id}   find_one_order
//   PATCH /orders/{id}   change_order_status
//
// Every failure, including malformed JSON, query strings and paths, answers
// with the Fault shape. Expects `web::Data<OrderService>` in app data.
//
// ============================================================================

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(|err, _| {
        error::Error::from(Fault::bad_request(err.to_string()))
    }))
    .app_data(web::QueryConfig::default().error_handler(|err, _| {
        error::Error::from(Fault::bad_request(err.to_string()))
    }))
    .app_data(web::PathConfig::default().error_handler(|err, _| {
        error::Error::from(Fault::bad_request(err.to_string()))
    }))
    .service(
        web::resource("/orders")
            .route(web::post().to(handlers::create_order))
            .route(web::get().to(handlers::find_all_orders)),
    )
    .service(
        web::resource("/orders/{id}")
            .route(web::get().to(handlers::find_one_order))
            .route(web::patch().to(handlers::change_order_status)),
    );
}
