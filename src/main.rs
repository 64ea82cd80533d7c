use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpServer};
use std::io;

use todo_api::auth::AUTH_HEADER;
use todo_api::config::Config;
use todo_api::{routes, AppState};

#[actix_web::main]
async fn main() -> io::Result<()> {
    dotenv::dotenv().ok();
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    let config = Config::from_env().map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;

    let state = AppState::from_config(&config)
        .await
        .map_err(|e| io::Error::new(io::ErrorKind::Other, e))?;
    let state = web::Data::new(state);

    log::info!("Starting todo API at {}", config.server_url());
    HttpServer::new(move || {
        App::new()
            .wrap(
                Cors::default()
                    .allow_any_origin()
                    .allow_any_method()
                    .allow_any_header()
                    .expose_headers([AUTH_HEADER])
                    .max_age(3600),
            )
            .wrap(Logger::default())
            .configure(routes::config(state.clone()))
    })
    .bind((config.server_host.as_str(), config.server_port))?
    .run()
    .await
}
