//! API routes

use crate::api::handlers::{
    create_card, create_equipment, create_site, delete_card, delete_equipment, delete_site,
    get_card, get_equipment, get_site, list_cards, list_equipment, list_sites, quote_equipment,
    update_card, update_equipment, update_site, AppState, Servers, Towers,
};
use crate::auth::handlers::{
    change_password_mandatory, delete_user, list_users, login, register, update_user_role,
};
use crate::auth::middleware::{authenticate, authorize, ADMIN_ONLY, ANY_ROLE};
use axum::{
    extract::Request,
    middleware::{self, Next},
    routing::{get, post, put},
    Router,
};

/// Build the API routes
///
/// Reads are open to every authenticated role, writes and account
/// administration to admins only.
pub fn build_api_routes(state: AppState) -> Router {
    let public_routes = Router::new()
        .route("/api/auth/login", post(login))
        .route(
            "/api/auth/change-password-mandatory",
            post(change_password_mandatory),
        );

    let read_routes = Router::new()
        .route("/api/torres", get(list_sites::<Towers>))
        .route("/api/torres/:id", get(get_site::<Towers>))
        .route("/api/servidores", get(list_sites::<Servers>))
        .route("/api/servidores/:id", get(get_site::<Servers>))
        .route("/api/equipos", get(list_equipment))
        .route("/api/equipos/:id", get(get_equipment))
        .route("/api/equipos/cotizacion", post(quote_equipment))
        .route("/api/dashboard", get(list_cards))
        .route("/api/dashboard/:id", get(get_card))
        .route_layer(middleware::from_fn(|req: Request, next: Next| {
            authorize(ANY_ROLE, req, next)
        }));

    let admin_routes = Router::new()
        .route("/api/auth/register", post(register))
        .route("/api/auth/users", get(list_users))
        .route(
            "/api/auth/users/:id",
            put(update_user_role).delete(delete_user),
        )
        .route("/api/torres", post(create_site::<Towers>))
        .route(
            "/api/torres/:id",
            put(update_site::<Towers>).delete(delete_site::<Towers>),
        )
        .route("/api/servidores", post(create_site::<Servers>))
        .route(
            "/api/servidores/:id",
            put(update_site::<Servers>).delete(delete_site::<Servers>),
        )
        .route("/api/equipos", post(create_equipment))
        .route(
            "/api/equipos/:id",
            put(update_equipment).delete(delete_equipment),
        )
        .route("/api/dashboard", post(create_card))
        .route("/api/dashboard/:id", put(update_card).delete(delete_card))
        .route_layer(middleware::from_fn(|req: Request, next: Next| {
            authorize(ADMIN_ONLY, req, next)
        }));

    let protected_routes = read_routes
        .merge(admin_routes)
        .route_layer(middleware::from_fn_with_state(state.clone(), authenticate));

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .with_state(state)
}
