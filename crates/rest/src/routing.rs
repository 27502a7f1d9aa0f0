//! Route configuration for the clinic REST API.

use axum::routing::{get, post};
use axum::Router;

use clinic_persistence::ClinicStorage;

use crate::handlers::{admissions, appointments, auth, dashboard, doctors, drugs, health, patients};
use crate::state::AppState;

/// Creates all clinic REST API routes.
///
/// Everything under `/api` except the sign-in endpoint requires a live
/// session. Health endpoints live at the root so probes need no
/// credentials. Static path segments (`search`, `low-stock`, `active`)
/// are registered alongside `/{id}` routes; the router prefers the
/// literal match.
///
/// ## Auth
/// - `POST /api/auth/login` - Sign in, sets the session cookie
/// - `POST /api/auth/logout` - Sign out
/// - `GET /api/auth/user` - Current user
///
/// ## Entities
/// - `GET|POST /api/{entity}` - List / create
/// - `GET /api/{entity}/search?q=` - Search (patients, doctors, drugs)
/// - `GET|PUT|DELETE /api/{entity}/{id}` - Read / update / delete
/// - `GET /api/drugs/low-stock` - Low inventory
/// - `GET /api/admissions/active` - Active admissions
///
/// ## Aggregation
/// - `GET /api/dashboard/stats` - Dashboard counts
pub fn create_routes<S>(state: AppState<S>) -> Router
where
    S: ClinicStorage + 'static,
{
    let api = Router::new()
        // Auth
        .route("/auth/login", post(auth::login::<S>))
        .route("/auth/logout", post(auth::logout::<S>))
        .route("/auth/user", get(auth::current_user::<S>))
        // Dashboard
        .route("/dashboard/stats", get(dashboard::stats::<S>))
        // Patients
        .route("/patients", get(patients::list::<S>).post(patients::create::<S>))
        .route("/patients/search", get(patients::search::<S>))
        .route(
            "/patients/{id}",
            get(patients::get::<S>)
                .put(patients::update::<S>)
                .delete(patients::delete::<S>),
        )
        // Doctors
        .route("/doctors", get(doctors::list::<S>).post(doctors::create::<S>))
        .route("/doctors/search", get(doctors::search::<S>))
        .route(
            "/doctors/{id}",
            get(doctors::get::<S>)
                .put(doctors::update::<S>)
                .delete(doctors::delete::<S>),
        )
        // Drugs
        .route("/drugs", get(drugs::list::<S>).post(drugs::create::<S>))
        .route("/drugs/search", get(drugs::search::<S>))
        .route("/drugs/low-stock", get(drugs::low_stock::<S>))
        .route(
            "/drugs/{id}",
            get(drugs::get::<S>)
                .put(drugs::update::<S>)
                .delete(drugs::delete::<S>),
        )
        // Appointments
        .route(
            "/appointments",
            get(appointments::list::<S>).post(appointments::create::<S>),
        )
        .route(
            "/appointments/{id}",
            get(appointments::get::<S>)
                .put(appointments::update::<S>)
                .delete(appointments::delete::<S>),
        )
        // Admissions
        .route(
            "/admissions",
            get(admissions::list::<S>).post(admissions::create::<S>),
        )
        .route("/admissions/active", get(admissions::active::<S>))
        .route(
            "/admissions/{id}",
            get(admissions::get::<S>)
                .put(admissions::update::<S>)
                .delete(admissions::delete::<S>),
        );

    Router::new()
        .route("/health", get(health::health::<S>))
        .route("/_liveness", get(health::liveness))
        .nest("/api", api)
        .with_state(state)
}
