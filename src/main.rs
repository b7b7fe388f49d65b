use std::io;

use dotenvy::dotenv;
use shipment_service::{build_server, build_service, create_pool, run_migrations, AppConfig};

fn main() -> io::Result<()> {
    dotenv().ok();
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    let config =
        AppConfig::from_env().map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;

    let pool = create_pool(&config.database_url).map_err(io::Error::other)?;
    run_migrations(&pool).map_err(io::Error::other)?;

    // The GHTK client is blocking and has to be created outside the runtime.
    let service = build_service(pool, &config.carrier).map_err(io::Error::other)?;

    log::info!("Starting server at http://{}:{}", config.host, config.port);

    actix_web::rt::System::new().block_on(async move {
        build_server(service, &config.host, config.port)?.await
    })
}
