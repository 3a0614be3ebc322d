pub use crate::configuration;
use crate::configuration::get_configuration;
use crate::routes::auth::{current_user_handler, login_handler, register_handler};
use crate::routes::idea::{create_idea, delete_idea, get_idea, list_ideas, update_idea};
use crate::services::auth::AuthService;
use crate::services::idea::IdeaService;
use crate::store::IdeaRepository;
use crate::store::user::UserRepository;

use axum::{
    Router,
    routing::{get, post},
};
use sqlx::postgres::PgPoolOptions;

#[derive(Clone, Debug)]
pub struct AppState {
    pub idea_service: IdeaService,
    pub auth_service: AuthService,
}

pub async fn run() {
    let cfg = get_configuration().expect("could not get config");

    let pg_pool = PgPoolOptions::new()
        .acquire_timeout(std::time::Duration::from_secs(2))
        .connect_lazy_with(cfg.database.with_db());

    sqlx::migrate!()
        .run(&pg_pool)
        .await
        .expect("could not run database migrations");

    let idea_repo = IdeaRepository::new(pg_pool.clone());
    let idea_service = IdeaService::new(idea_repo);

    let user_repo = UserRepository::new(pg_pool.clone());
    let auth_service = AuthService::new(user_repo);
    let app_state = AppState {
        idea_service,
        auth_service,
    };

    let app = Router::new()
        .route("/users", post(register_handler))
        .route("/users/login", post(login_handler))
        .route("/user", get(current_user_handler))
        .route("/ideas", get(list_ideas).post(create_idea))
        .route(
            "/ideas/{id}",
            get(get_idea).put(update_idea).delete(delete_idea),
        )
        .with_state(app_state);

    let addr = format!("{}:{}", cfg.application.host, cfg.application.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("could not bind listener");
    tracing::info!("Listening on http://{}", addr);
    axum::serve(listener, app)
        .await
        .expect("could not start server");
}
