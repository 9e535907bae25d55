use std::{process, sync::Arc};

use folio::{
    application::{
        admin::{AdminEditorService, PostListManager},
        error::AppError,
        repos::{PostsRepo, PostsWriteRepo},
        site::{SiteProfile, SiteService},
    },
    config,
    infra::{
        backend::BackendClient,
        error::InfraError,
        http::{self, AdminState, HttpState},
        telemetry,
    },
};
use tokio::try_join;
use tracing::{Dispatch, Level, dispatcher, error, info};
use tracing_subscriber::fmt as tracing_fmt;

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        report_application_error(&error);
        process::exit(1);
    }
}

fn report_application_error(error: &AppError) {
    if dispatcher::has_been_set() {
        error!(error = %error, "application error");
        return;
    }

    let subscriber = tracing_fmt().with_max_level(Level::ERROR).finish();
    let dispatch = Dispatch::new(subscriber);
    dispatcher::with_default(&dispatch, || {
        error!(error = %error, "application error");
    });
}

async fn run() -> Result<(), AppError> {
    let (cli_args, settings) = config::load_with_cli()
        .map_err(|err| AppError::unexpected(format!("failed to load configuration: {err}")))?;

    let command = cli_args
        .command
        .unwrap_or(config::Command::Serve(Box::<config::ServeArgs>::default()));

    telemetry::init(&settings.logging).map_err(AppError::from)?;

    match command {
        config::Command::Serve(_) => run_serve(settings).await,
    }
}

async fn run_serve(settings: config::Settings) -> Result<(), AppError> {
    let backend = Arc::new(BackendClient::from_settings(&settings.backend)?);
    info!(
        target = "folio::serve",
        table_url = %backend.table_url(),
        "Backend client ready"
    );

    let (http_state, admin_state) = build_application_context(backend, &settings).await?;
    serve_http(&settings, http_state, admin_state).await
}

async fn build_application_context(
    backend: Arc<BackendClient>,
    settings: &config::Settings,
) -> Result<(HttpState, AdminState), AppError> {
    let reader: Arc<dyn PostsRepo> = backend.clone();
    let writer: Arc<dyn PostsWriteRepo> = backend;

    let initial = reader
        .fetch_initial()
        .await
        .map_err(|err| AppError::from(InfraError::from(err)))?;
    info!(
        target = "folio::serve",
        posts = initial.len(),
        "Loaded working list"
    );

    let profile = SiteProfile {
        author: settings.site.author.clone(),
        about: settings.site.about.clone(),
    };

    let http_state = HttpState {
        site: Arc::new(SiteService::new(reader.clone(), profile)),
    };
    let admin_state = AdminState {
        posts: reader.clone(),
        list: Arc::new(PostListManager::new(initial, writer.clone())),
        editor: Arc::new(AdminEditorService::new(
            reader,
            writer,
            settings.site.admin_author_id.clone(),
        )),
    };

    Ok((http_state, admin_state))
}

async fn serve_http(
    settings: &config::Settings,
    http_state: HttpState,
    admin_state: AdminState,
) -> Result<(), AppError> {
    let public_router = http::build_router(http_state);
    let admin_router = http::build_admin_router(admin_state);

    let public_listener = tokio::net::TcpListener::bind(settings.server.public_addr)
        .await
        .map_err(|err| AppError::from(InfraError::from(err)))?;
    let admin_listener = tokio::net::TcpListener::bind(settings.server.admin_addr)
        .await
        .map_err(|err| AppError::from(InfraError::from(err)))?;

    info!(
        target = "folio::serve",
        public = %settings.server.public_addr,
        admin = %settings.server.admin_addr,
        "Listening"
    );

    let public_server = axum::serve(public_listener, public_router.into_make_service());
    let admin_server = axum::serve(admin_listener, admin_router.into_make_service());

    try_join!(public_server, admin_server)
        .map_err(|err| AppError::unexpected(format!("server error: {err}")))?;

    Ok(())
}
