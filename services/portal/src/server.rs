use crate::cli::ServeArgs;
use crate::infra::{AdminAuth, AppState};
use crate::routes::with_portal_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use talent_pool::config::AppConfig;
use talent_pool::error::AppError;
use talent_pool::telemetry;
use talent_pool::workflows::talentpool::{
    applicants_from_path, InMemoryPortalAccounts, InMemoryTalentStore, TalentPoolService,
    TalentRepository,
};
use tracing::info;

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let store = Arc::new(InMemoryTalentStore::default());
    for name in &args.jobs {
        let job = store.insert_job(name.clone(), true);
        info!(job_id = %job.id, name = %job.name, "job opening published");
    }
    if let Some(path) = args.applicants_csv.as_ref() {
        let drafts = applicants_from_path(path)?;
        let count = drafts.len();
        for draft in drafts {
            store.insert_applicant(draft)?;
        }
        info!(count, path = %path.display(), "applicants imported");
    }

    if config.talent_pool.admin_api_key.is_none() {
        info!("TALENTPOOL_ADMIN_API_KEY not set; admin routes will refuse every call");
    }

    let service = Arc::new(
        TalentPoolService::new(store, Arc::new(InMemoryPortalAccounts::default()))
            .with_matching(config.talent_pool.matching_rule()),
    );
    let admin_auth = AdminAuth::new(config.talent_pool.admin_api_key.clone());

    let app = with_portal_routes(service, admin_auth)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "talent pool portal ready");

    axum::serve(listener, app).await?;
    Ok(())
}
