use crate::{
    config::{Config, SessionBackend},
    error, info,
    server::{AppState, start_api_server},
};

pub async fn serve(mut config: Config, addr: Option<String>) {
    if let Some(addr) = addr {
        config.server_address = addr;
    }

    match &config.session_backend {
        SessionBackend::Memory => info!("Sessions are kept in memory"),
        SessionBackend::File(path) => info!("Sessions are stored in {}", path.display()),
    }
    info!("Serving on http://{}", config.server_address);

    let state = match AppState::from_config(config).await {
        Ok(state) => state,
        Err(e) => error!("Cannot initialize server. Err: {}", e),
    };

    if let Err(e) = start_api_server(state).await {
        error!("Server stopped. Err: {}", e);
    }
}
