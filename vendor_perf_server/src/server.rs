use std::time::Duration;

use actix_web::{
    dev::Server,
    error::{JsonPayloadError, PathError, QueryPayloadError},
    http::KeepAlive,
    middleware::{Logger, NormalizePath},
    web,
    App,
    HttpRequest,
    HttpServer,
};
use log::*;
use vendor_perf_engine::{AuthApi, PurchaseOrderApi, SqliteDatabase, VendorApi};

use crate::{
    auth::TokenIssuer,
    config::ServerConfig,
    errors::ServerError,
    middleware::BearerAuthMiddlewareFactory,
    routes::{
        health,
        AcknowledgePurchaseOrderRoute,
        CreatePurchaseOrderRoute,
        CreateVendorRoute,
        DeletePurchaseOrderRoute,
        DeleteVendorRoute,
        LoginRoute,
        PurchaseOrderRoute,
        PurchaseOrdersRoute,
        RegisterRoute,
        TokenRefreshRoute,
        TokenRoute,
        UpdatePurchaseOrderRoute,
        UpdateVendorRoute,
        VendorPerformanceRoute,
        VendorRoute,
        VendorsRoute,
    },
};

pub async fn run_server(config: ServerConfig) -> Result<(), ServerError> {
    let db = SqliteDatabase::new_with_url(&config.database_url, config.max_connections)
        .await
        .map_err(|e| ServerError::InitializeError(e.to_string()))?;
    if config.auto_migrate {
        db.migrate().await.map_err(|e| ServerError::InitializeError(format!("Could not run migrations. {e}")))?;
        info!("🚀️ Database migrations are up to date");
    }
    let srv = create_server_instance(config, db)?;
    srv.await.map_err(|e| ServerError::Unspecified(e.to_string()))
}

pub fn create_server_instance(config: ServerConfig, db: SqliteDatabase) -> Result<Server, ServerError> {
    let srv = HttpServer::new(move || {
        let vendor_api = VendorApi::new(db.clone());
        let orders_api = PurchaseOrderApi::new(db.clone());
        let auth_api = AuthApi::new(db.clone());
        let jwt_signer = TokenIssuer::new(&config.auth);
        let app = App::new()
            .wrap(NormalizePath::trim())
            .wrap(Logger::new("%t (%D ms) %s %a %{Host}i %U").log_target("vpm::access_log"))
            .app_data(json_config())
            .app_data(query_config())
            .app_data(path_config())
            .app_data(web::Data::new(vendor_api))
            .app_data(web::Data::new(orders_api))
            .app_data(web::Data::new(auth_api))
            .app_data(web::Data::new(config.auth.clone()))
            .app_data(web::Data::new(jwt_signer));
        // Routes that require a bearer access token
        let api_scope = web::scope("/api")
            .wrap(BearerAuthMiddlewareFactory::new())
            .service(VendorsRoute::<SqliteDatabase>::new())
            .service(CreateVendorRoute::<SqliteDatabase>::new())
            .service(VendorPerformanceRoute::<SqliteDatabase>::new())
            .service(VendorRoute::<SqliteDatabase>::new())
            .service(UpdateVendorRoute::<SqliteDatabase>::new())
            .service(DeleteVendorRoute::<SqliteDatabase>::new())
            .service(PurchaseOrdersRoute::<SqliteDatabase>::new())
            .service(CreatePurchaseOrderRoute::<SqliteDatabase>::new())
            .service(AcknowledgePurchaseOrderRoute::<SqliteDatabase>::new())
            .service(PurchaseOrderRoute::<SqliteDatabase>::new())
            .service(UpdatePurchaseOrderRoute::<SqliteDatabase>::new())
            .service(DeletePurchaseOrderRoute::<SqliteDatabase>::new());
        app.service(health)
            .service(RegisterRoute::<SqliteDatabase>::new())
            .service(LoginRoute::<SqliteDatabase>::new())
            .service(TokenRoute::<SqliteDatabase>::new())
            .service(TokenRefreshRoute::<SqliteDatabase>::new())
            .service(api_scope)
    })
    .keep_alive(KeepAlive::Timeout(Duration::from_secs(600)))
    .bind((config.host.as_str(), config.port))?
    .run();
    Ok(srv)
}

/// Malformed JSON bodies are reported as a 400 with an `error` body, like every other non-field error.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err: JsonPayloadError, _req: &HttpRequest| {
        debug!("💻️ Rejected request body. {err}");
        ServerError::InvalidRequestBody(err.to_string()).into()
    })
}

pub fn query_config() -> web::QueryConfig {
    web::QueryConfig::default().error_handler(|err: QueryPayloadError, _req: &HttpRequest| {
        debug!("💻️ Rejected query string. {err}");
        ServerError::InvalidRequestBody(err.to_string()).into()
    })
}

/// Ids in paths are integers. Anything else cannot name an existing record.
pub fn path_config() -> web::PathConfig {
    web::PathConfig::default().error_handler(|err: PathError, req: &HttpRequest| {
        debug!("💻️ Rejected path {}. {err}", req.path());
        ServerError::NoRecordFound(format!("{} does not exist", req.path())).into()
    })
}
