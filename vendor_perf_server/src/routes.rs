//! Request handler definitions
//!
//! Define each route and its handler here. Handlers that grow beyond a few lines should delegate to the engine APIs;
//! this module only translates between HTTP and the engine.
//!
//! Handlers run concurrently on actix worker threads, so nothing in here may block. Password hashing and checking
//! are CPU-heavy and are pushed onto the blocking thread pool with [`web::block`].
//!
//! Paths are registered without a trailing slash. The server strips trailing slashes before routing, so
//! `/api/vendors/` and `/api/vendors` reach the same handler.
use actix_web::{get, web, HttpResponse, Responder};
use log::*;
use vendor_perf_engine::{
    db_types::{NewPurchaseOrder, NewUserAccount, NewVendor, PurchaseOrderUpdate, UserAccount, VendorUpdate},
    order_objects::OrderQueryFilter,
    validation::validate_registration,
    AuthApi,
    AuthApiError,
    AuthManagement,
    PerformanceHistory,
    PurchaseOrderApi,
    VendorApi,
    VendorManagement,
    VendorPerformanceDatabase,
};

use crate::{
    auth::{hash_password, verify_password, TokenIssuer, TokenType},
    config::AuthConfig,
    data_objects::{
        AccessToken,
        CredentialsRequest,
        LoginTokens,
        MessageResponse,
        RefreshRequest,
        RegisterRequest,
        RegisteredUser,
    },
    errors::{AuthError, ServerError},
};

// Web-actix cannot handle generics in handlers, so it's implemented manually using the `route!` macro
#[macro_export]
macro_rules! route {
    ($name:ident => $method:ident $path:literal impl $($bounds:path),+) => {
        paste::paste! { pub struct [<$name:camel Route>]<A>(core::marker::PhantomData<fn() -> A>);}
        paste::paste! { impl<A> [<$name:camel Route>]<A> {
            #[allow(clippy::new_without_default)]
            pub fn new() -> Self {
                Self(core::marker::PhantomData::<fn() -> A>)
            }
        }}
        paste::paste! { impl<A> actix_web::dev::HttpServiceFactory for [<$name:camel Route>]<A>
        where
            A: $($bounds +)+ 'static,
        {
            fn register(self, config: &mut actix_web::dev::AppService) {
                let res = actix_web::Resource::new($path)
                    .name(stringify!($name))
                    .guard(actix_web::guard::$method())
                    .to($name::<A>);
                actix_web::dev::HttpServiceFactory::register(res, config);
            }
        }}
    };
}

// ----------------------------------------------   Health  ----------------------------------------------------
#[get("/health")]
pub async fn health() -> impl Responder {
    trace!("💻️ Received health check request");
    HttpResponse::Ok().body("👍️\n")
}

//----------------------------------------------   Accounts  ----------------------------------------------------
route!(register => Post "/register" impl AuthManagement);
/// Creates a new user account. The password is stored as a bcrypt hash.
pub async fn register<A: AuthManagement>(
    body: web::Json<RegisterRequest>,
    api: web::Data<AuthApi<A>>,
    auth_config: web::Data<AuthConfig>,
) -> Result<HttpResponse, ServerError> {
    let RegisterRequest { username, email, password } = body.into_inner();
    debug!("💻️ POST register for {username}");
    validate_registration(&username, &password).map_err(ServerError::ValidationFailed)?;
    let cost = auth_config.bcrypt_cost;
    let password_hash = web::block(move || hash_password(&password, cost))
        .await
        .map_err(|e| ServerError::Unspecified(e.to_string()))??;
    let user = api.register_user(NewUserAccount { username, email, password_hash }).await?;
    Ok(HttpResponse::Created().json(RegisteredUser::from(user)))
}

route!(login => Post "/login" impl AuthManagement);
/// Exchanges a username and password for an access and refresh token pair.
///
/// The refresh token is returned as `refresh_token`. Bad credentials are a 400 here, with an `errors` body. Use
/// `/token` for a 401 instead.
pub async fn login<A: AuthManagement>(
    body: web::Json<CredentialsRequest>,
    api: web::Data<AuthApi<A>>,
    signer: web::Data<TokenIssuer>,
) -> Result<HttpResponse, ServerError> {
    debug!("💻️ POST login for {}", body.username);
    let user = authenticate(api.as_ref(), body.into_inner()).await?;
    let tokens = signer.issue_token_pair(&user)?;
    Ok(HttpResponse::Ok().json(LoginTokens::from(tokens)))
}

route!(token => Post "/token" impl AuthManagement);
pub async fn token<A: AuthManagement>(
    body: web::Json<CredentialsRequest>,
    api: web::Data<AuthApi<A>>,
    signer: web::Data<TokenIssuer>,
) -> Result<HttpResponse, ServerError> {
    debug!("💻️ POST token for {}", body.username);
    let user = authenticate(api.as_ref(), body.into_inner()).await.map_err(|e| match e {
        AuthApiError::InvalidCredentials => ServerError::AuthenticationError(AuthError::InvalidCredentials),
        e => e.into(),
    })?;
    let tokens = signer.issue_token_pair(&user)?;
    Ok(HttpResponse::Ok().json(tokens))
}

route!(token_refresh => Post "/token/refresh" impl AuthManagement);
/// Issues a new access token in exchange for a valid refresh token.
pub async fn token_refresh<A: AuthManagement>(
    body: web::Json<RefreshRequest>,
    api: web::Data<AuthApi<A>>,
    signer: web::Data<TokenIssuer>,
) -> Result<HttpResponse, ServerError> {
    trace!("💻️ POST token refresh");
    let claims = signer.validate(&body.refresh, TokenType::Refresh)?;
    let user = api.user_by_id(claims.user_id).await?.ok_or_else(|| {
        warn!("🔑️ Refresh token presented for user {} who no longer exists", claims.user_id);
        AuthError::InvalidToken("User not found".into())
    })?;
    let access = signer.issue_token(&user, TokenType::Access)?;
    Ok(HttpResponse::Ok().json(AccessToken { access }))
}

async fn authenticate<A: AuthManagement>(
    api: &AuthApi<A>,
    credentials: CredentialsRequest,
) -> Result<UserAccount, AuthApiError> {
    let CredentialsRequest { username, password } = credentials;
    let user = api.user_by_username(&username).await?.ok_or_else(|| {
        debug!("🔑️ Login attempt for unknown user {username}");
        AuthApiError::InvalidCredentials
    })?;
    let hash = user.password_hash.clone();
    let matches = web::block(move || verify_password(&password, &hash)).await.unwrap_or_else(|e| {
        error!("🔑️ Could not check password for {username}. {e}");
        false
    });
    if matches {
        debug!("🔑️ {} logged in", user.username);
        Ok(user)
    } else {
        debug!("🔑️ Wrong password for {}", user.username);
        Err(AuthApiError::InvalidCredentials)
    }
}

//----------------------------------------------   Vendors  ----------------------------------------------------
route!(vendors => Get "/vendors" impl VendorManagement, PerformanceHistory);
pub async fn vendors<B>(api: web::Data<VendorApi<B>>) -> Result<HttpResponse, ServerError>
where B: VendorManagement + PerformanceHistory {
    debug!("💻️ GET vendors");
    let vendors = api.fetch_vendors().await?;
    Ok(HttpResponse::Ok().json(vendors))
}

route!(create_vendor => Post "/vendors" impl VendorManagement, PerformanceHistory);
pub async fn create_vendor<B>(
    body: web::Json<NewVendor>,
    api: web::Data<VendorApi<B>>,
) -> Result<HttpResponse, ServerError>
where
    B: VendorManagement + PerformanceHistory,
{
    debug!("💻️ POST vendor {}", body.vendor_code);
    let vendor = api.create_vendor(body.into_inner()).await?;
    Ok(HttpResponse::Created().json(vendor))
}

route!(vendor => Get "/vendors/{id}" impl VendorManagement, PerformanceHistory);
pub async fn vendor<B>(path: web::Path<i64>, api: web::Data<VendorApi<B>>) -> Result<HttpResponse, ServerError>
where B: VendorManagement + PerformanceHistory {
    let id = path.into_inner();
    debug!("💻️ GET vendor {id}");
    let vendor = api
        .fetch_vendor(id)
        .await?
        .ok_or_else(|| ServerError::NoRecordFound(format!("Vendor {id} does not exist")))?;
    Ok(HttpResponse::Ok().json(vendor))
}

route!(update_vendor => Put "/vendors/{id}" impl VendorManagement, PerformanceHistory);
/// Updates a vendor's descriptive fields. Any metric fields in the body are ignored.
pub async fn update_vendor<B>(
    path: web::Path<i64>,
    body: web::Json<VendorUpdate>,
    api: web::Data<VendorApi<B>>,
) -> Result<HttpResponse, ServerError>
where
    B: VendorManagement + PerformanceHistory,
{
    let id = path.into_inner();
    debug!("💻️ PUT vendor {id}");
    let vendor = api.update_vendor(id, body.into_inner()).await?;
    Ok(HttpResponse::Ok().json(vendor))
}

route!(delete_vendor => Delete "/vendors/{id}" impl VendorManagement, PerformanceHistory);
/// Deletes the vendor, together with its purchase orders and performance history.
pub async fn delete_vendor<B>(path: web::Path<i64>, api: web::Data<VendorApi<B>>) -> Result<HttpResponse, ServerError>
where B: VendorManagement + PerformanceHistory {
    let id = path.into_inner();
    debug!("💻️ DELETE vendor {id}");
    api.delete_vendor(id).await?;
    Ok(HttpResponse::NoContent().finish())
}

route!(vendor_performance => Get "/vendors/{id}/performance" impl VendorManagement, PerformanceHistory);
/// The vendor's performance snapshots, oldest first.
pub async fn vendor_performance<B>(
    path: web::Path<i64>,
    api: web::Data<VendorApi<B>>,
) -> Result<HttpResponse, ServerError>
where
    B: VendorManagement + PerformanceHistory,
{
    let id = path.into_inner();
    debug!("💻️ GET performance history for vendor {id}");
    let history = api.performance_history(id).await?;
    Ok(HttpResponse::Ok().json(history))
}

//----------------------------------------------   Purchase orders  ----------------------------------------------
route!(purchase_orders => Get "/purchase_orders" impl VendorPerformanceDatabase);
/// Lists purchase orders, optionally filtered with `?vendor_id=` and `?status=`.
pub async fn purchase_orders<B: VendorPerformanceDatabase>(
    query: web::Query<OrderQueryFilter>,
    api: web::Data<PurchaseOrderApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let query = query.into_inner();
    debug!("💻️ GET purchase orders. {query}");
    let orders = api.search_purchase_orders(query).await?;
    Ok(HttpResponse::Ok().json(orders))
}

route!(create_purchase_order => Post "/purchase_orders" impl VendorPerformanceDatabase);
/// Creates a purchase order. Creating an order does not change the vendor's metrics.
pub async fn create_purchase_order<B: VendorPerformanceDatabase>(
    body: web::Json<NewPurchaseOrder>,
    api: web::Data<PurchaseOrderApi<B>>,
) -> Result<HttpResponse, ServerError> {
    debug!("💻️ POST purchase order {} for vendor {}", body.po_number, body.vendor);
    let order = api.create_purchase_order(body.into_inner()).await?;
    Ok(HttpResponse::Created().json(order))
}

route!(purchase_order => Get "/purchase_orders/{id}" impl VendorPerformanceDatabase);
pub async fn purchase_order<B: VendorPerformanceDatabase>(
    path: web::Path<i64>,
    api: web::Data<PurchaseOrderApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let id = path.into_inner();
    debug!("💻️ GET purchase order {id}");
    let order = api
        .fetch_purchase_order(id)
        .await?
        .ok_or_else(|| ServerError::NoRecordFound(format!("Purchase order {id} does not exist")))?;
    Ok(HttpResponse::Ok().json(order))
}

route!(update_purchase_order => Put "/purchase_orders/{id}" impl VendorPerformanceDatabase);
/// Saves changes to a purchase order. The vendor's metrics and history are brought up to date before the response
/// is sent.
pub async fn update_purchase_order<B: VendorPerformanceDatabase>(
    path: web::Path<i64>,
    body: web::Json<PurchaseOrderUpdate>,
    api: web::Data<PurchaseOrderApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let id = path.into_inner();
    debug!("💻️ PUT purchase order {id}");
    let saved = api.update_purchase_order(id, body.into_inner()).await?;
    Ok(HttpResponse::Ok().json(saved.order))
}

route!(delete_purchase_order => Delete "/purchase_orders/{id}" impl VendorPerformanceDatabase);
pub async fn delete_purchase_order<B: VendorPerformanceDatabase>(
    path: web::Path<i64>,
    api: web::Data<PurchaseOrderApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let id = path.into_inner();
    debug!("💻️ DELETE purchase order {id}");
    api.delete_purchase_order(id).await?;
    Ok(HttpResponse::NoContent().finish())
}

route!(acknowledge_purchase_order => Put "/purchase_orders/{id}/acknowledge" impl VendorPerformanceDatabase);
/// Records that the vendor acknowledged the order, at the current server time.
pub async fn acknowledge_purchase_order<B: VendorPerformanceDatabase>(
    path: web::Path<i64>,
    api: web::Data<PurchaseOrderApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let id = path.into_inner();
    debug!("💻️ PUT acknowledge purchase order {id}");
    let result = api.acknowledge_purchase_order(id).await?;
    let message = if result.is_new() {
        "Purchase order acknowledged successfully"
    } else {
        "Purchase order was already acknowledged"
    };
    Ok(HttpResponse::Ok().json(MessageResponse::new(message)))
}
