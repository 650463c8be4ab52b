pub mod application;
pub mod db;
pub mod domain;
pub mod errors;
pub mod handlers;
pub mod infrastructure;
pub mod schema;

use std::sync::Arc;

use actix_web::{middleware::Logger, web, App, HttpServer};
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use application::cart_service::CartService;
use application::checkout::CheckoutOrchestrator;
use application::single_flight::SingleFlight;
use infrastructure::cart_repo::DieselCartRepository;
use infrastructure::order_repo::DieselOrderRepository;
use infrastructure::product_repo::DieselProductCatalog;

pub use db::{create_pool, DbPool};

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// The services as wired against Postgres.
pub type AppCartService = CartService<DieselCartRepository, DieselProductCatalog>;
pub type AppCheckout =
    CheckoutOrchestrator<DieselCartRepository, DieselOrderRepository, DieselProductCatalog>;

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::cart::add_to_cart,
        handlers::cart::remove_from_cart,
        handlers::cart::list_cart,
        handlers::checkout::checkout,
        handlers::products::list_products,
        handlers::products::create_listing,
    ),
    tags(
        (name = "cart", description = "Cart management"),
        (name = "checkout", description = "Order placement"),
        (name = "products", description = "Product catalog"),
    )
)]
pub struct ApiDoc;

/// Run any pending Diesel migrations against the pool's database.
pub fn run_migrations(pool: &DbPool) {
    let mut conn = pool.get().expect("Failed to get DB connection for migrations");
    conn.run_pending_migrations(MIGRATIONS)
        .expect("Failed to run database migrations");
}

/// Build and return an actix-web `Server` bound to `host:port`.
///
/// The caller is responsible for `.await`-ing (or `tokio::spawn`-ing) the
/// returned server.
pub fn build_server(
    pool: DbPool,
    host: &str,
    port: u16,
) -> std::io::Result<actix_web::dev::Server> {
    // One flight registry for the whole process: the cart service and the
    // checkout orchestrator must see each other's in-flight work, across
    // all HTTP workers.
    let flights = Arc::new(SingleFlight::new());
    let cart_service = web::Data::new(CartService::new(
        DieselCartRepository::new(pool.clone()),
        DieselProductCatalog::new(pool.clone()),
        Arc::clone(&flights),
    ));
    let checkout = web::Data::new(CheckoutOrchestrator::new(
        DieselCartRepository::new(pool.clone()),
        DieselOrderRepository::new(pool.clone()),
        DieselProductCatalog::new(pool.clone()),
        flights,
    ));
    let catalog = web::Data::new(DieselProductCatalog::new(pool));

    Ok(HttpServer::new(move || {
        App::new()
            .app_data(cart_service.clone())
            .app_data(checkout.clone())
            .app_data(catalog.clone())
            .wrap(Logger::default())
            .service(
                web::scope("/cart")
                    .route("/items", web::post().to(handlers::cart::add_to_cart))
                    .route(
                        "/{user_id}/items/{product_id}",
                        web::delete().to(handlers::cart::remove_from_cart),
                    )
                    .route("/{user_id}", web::get().to(handlers::cart::list_cart)),
            )
            .route("/checkout", web::post().to(handlers::checkout::checkout))
            .service(
                web::scope("/products")
                    .route("", web::get().to(handlers::products::list_products))
                    .route("", web::post().to(handlers::products::create_listing)),
            )
            .service(
                SwaggerUi::new("/swagger-ui/{_tail:.*}")
                    .url("/api-docs/openapi.json", ApiDoc::openapi()),
            )
    })
    .bind((host.to_string(), port))?
    .run())
}
