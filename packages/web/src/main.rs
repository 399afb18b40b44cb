use dioxus::prelude::*;

use ui::views::{
    AboutView, AdminLoginView, AdminView, BlogPostView, BlogsView, EducationView, HomeView,
    ProjectsView,
};
use ui::{Navbar, SessionProvider};

#[derive(Debug, Clone, Routable, PartialEq)]
#[rustfmt::skip]
enum Route {
    #[layout(SiteLayout)]
        #[route("/")]
        HomeView {},
        #[route("/about")]
        AboutView {},
        #[route("/education")]
        EducationView {},
        #[route("/projects")]
        ProjectsView {},
        #[route("/blogs")]
        BlogsView {},
        #[route("/blog/:slug")]
        BlogPostView { slug: String },
        #[route("/admin?:edit")]
        AdminView { edit: String },
        #[route("/admin-login")]
        AdminLoginView {},
    #[end_layout]
    #[route("/:..segments")]
    NotFound { segments: Vec<String> },
}

const MAIN_CSS: Asset = asset!("/assets/main.css");

fn main() {
    #[cfg(feature = "server")]
    {
        init_tracing();
        let runtime = tokio::runtime::Runtime::new().expect("Failed to start tokio runtime");
        if let Err(e) = runtime.block_on(launch_server()) {
            tracing::error!("Server exited: {e}");
            std::process::exit(1);
        }
    }

    #[cfg(not(feature = "server"))]
    {
        dioxus::launch(App);
    }
}

#[cfg(feature = "server")]
fn init_tracing() {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

#[cfg(feature = "server")]
async fn launch_server() -> Result<(), Box<dyn std::error::Error>> {
    use dioxus::server::{DioxusRouterExt, ServeConfig};
    use tower_sessions::cookie::{time, SameSite};
    use tower_sessions::{Expiry, SessionManagerLayer};
    use tower_sessions_sqlx_store::PostgresStore;

    dotenvy::dotenv().ok();
    let config = api::config::config().await?;

    let pool = api::db::get_pool().await?;
    api::db::migrate(pool).await?;
    api::db::seed_admin(pool, config).await?;

    let session_store = PostgresStore::new(pool.clone());
    session_store.migrate().await?;

    let session_layer = SessionManagerLayer::new(session_store)
        .with_secure(config.session_secure)
        .with_same_site(SameSite::Lax)
        .with_expiry(Expiry::OnInactivity(time::Duration::days(
            config.session_inactivity_days,
        )));

    let router = axum::Router::new()
        .serve_dioxus_application(ServeConfig::new(), App)
        .layer(session_layer);

    let addr = dioxus::cli_config::fullstack_address_or_localhost();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, router.into_make_service()).await?;
    Ok(())
}

#[component]
fn App() -> Element {
    rsx! {
        document::Link { rel: "stylesheet", href: MAIN_CSS }

        SessionProvider {
            Router::<Route> {}
        }
    }
}

#[component]
fn SiteLayout() -> Element {
    let brand = use_hook(|| {
        store::SiteProfile::bundled()
            .map(|profile| profile.owner.name)
            .unwrap_or_else(|e| {
                tracing::error!("Failed to load site profile: {e}");
                String::from("Portfolio")
            })
    });

    rsx! {
        Navbar { brand }
        main { class: "site-main", Outlet::<Route> {} }
    }
}

#[component]
fn NotFound(segments: Vec<String>) -> Element {
    let path = segments.join("/");
    rsx! {
        div {
            class: "view-page",
            h1 { class: "view-title", "Page not found" }
            p { class: "view-muted", "Nothing lives at /{path}." }
            Link { to: Route::HomeView {}, class: "btn btn-secondary", "Back home" }
        }
    }
}
