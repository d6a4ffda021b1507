use movie_expert::{
    api::{create_router, AppState},
    config::Config,
    datasets,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    movie_expert::init_tracing("info");

    let config = Config::from_env()?;

    let context = datasets::load_data(&config.data_dir, config.dataset.as_deref());
    if let Some(error) = &context.error {
        tracing::warn!(error = %error, "Serving without a dataset; recommendation routes will return 503");
    }

    let state = AppState::new(context);
    tracing::info!(rules = state.engine.rules().len(), "Rule base ready");

    let app = create_router(state);

    let address = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&address).await?;
    tracing::info!(address = %address, "Server running");
    axum::serve(listener, app).await?;

    Ok(())
}
